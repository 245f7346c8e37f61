/*
    This file is part of Echolog.

    Copyright © 2026 Max Rodriguez <me@maxrdz.com>

    Echolog is free software; you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License,
    as published by the Free Software Foundation, either version 3
    of the License, or (at your option) any later version.

    Echolog is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public
    License along with Echolog. If not, see <https://www.gnu.org/licenses/>.
*/

//! The current-datagram view and the sub-records shared across kinds.

use super::calib::Fcf;
use super::header::DgmHeader;
use super::install::{Bist, ParamText};
use super::ping::{Mrz, Mwc};
use super::sensor::{Che, Cpo, Scl, Sde, Shi, Skm, Spo, Svp, Svt};
use crate::bytes::{FieldSlice, PackedView};
use crate::error::ReaderError;

/// One parsed KMA datagram.
///
/// Borrowed from the reader that produced it; valid until the next
/// `read()` or `close()` on that reader.
#[derive(Debug)]
pub struct KmaDgm<'a> {
    /// The fixed header, copied out of the frame.
    pub header: DgmHeader,
    /// The typed body laid out over the reader's buffer.
    pub body: KmaBody<'a>,
}

/// The per-kind body of a KMA datagram.
#[derive(Debug)]
pub enum KmaBody<'a> {
    /// `#IIP` installation parameters.
    Iip(ParamText<'a>),
    /// `#IOP` runtime operator parameters.
    Iop(ParamText<'a>),
    /// `#IBE` built-in self test error report.
    Ibe(Bist<'a>),
    /// `#IBR` built-in self test reply.
    Ibr(Bist<'a>),
    /// `#IBS` built-in self test short reply.
    Ibs(Bist<'a>),
    /// `#MRZ` soundings ping.
    Mrz(Mrz<'a>),
    /// `#MWC` water column ping.
    Mwc(Mwc<'a>),
    /// `#SPO` sensor position.
    Spo(Spo<'a>),
    /// `#SKM` sensor attitude samples.
    Skm(Skm<'a>),
    /// `#SVP` sound velocity profile.
    Svp(Svp<'a>),
    /// `#SVT` sound velocity at transducer.
    Svt(Svt<'a>),
    /// `#SCL` sensor clock.
    Scl(Scl<'a>),
    /// `#SDE` sensor depth.
    Sde(Sde<'a>),
    /// `#SHI` sensor height.
    Shi(Shi<'a>),
    /// `#CPO` compatibility position.
    Cpo(Cpo<'a>),
    /// `#CHE` compatibility heave.
    Che(Che<'a>),
    /// `#FCF` backscatter calibration file.
    Fcf(Fcf<'a>),
    /// A type code outside the catalogue; the raw body, header-framed
    /// but not interpreted.
    Unknown(&'a [u8]),
}

// ---------- Shared Sub-Records ---------- //

/// The partition carried by multi-part capable datagrams (MRZ, MWC, FCF).
///
/// The recording system rejoins split datagrams before they reach disk,
/// so a stored partition must always be datagram 1 of 1.
#[derive(Debug, Copy, Clone)]
pub struct Partition<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for Partition<'a> {
    const SIZE: usize = 4;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl Partition<'_> {
    pub fn num_of_dgms(&self) -> u16 {
        self.raw.get_u16(0)
    }

    pub fn dgm_num(&self) -> u16 {
        self.raw.get_u16(2)
    }

    /// Fails with bad-data unless this is datagram 1 of 1.
    pub(crate) fn require_unsplit(&self) -> Result<(), ReaderError> {
        if self.num_of_dgms() != 1 || self.dgm_num() != 1 {
            log::debug!(
                "split datagram on disk: partition {}/{}",
                self.dgm_num(),
                self.num_of_dgms()
            );
            return Err(ReaderError::BadData("datagram stored split into partitions"));
        }
        Ok(())
    }
}

/// The common part of the multibeam (`M`) datagrams.
#[derive(Debug, Copy, Clone)]
pub struct MCommon<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for MCommon<'a> {
    const SIZE: usize = 12;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl MCommon<'_> {
    /// Size of this part as stored, for skipping to the next part.
    pub fn num_bytes_cmn_part(&self) -> u16 {
        self.raw.get_u16(0)
    }

    /// Ping counter, incremented per transmit.
    pub fn ping_cnt(&self) -> u16 {
        self.raw.get_u16(2)
    }

    pub fn rx_fans_per_ping(&self) -> u8 {
        self.raw.get_u8(4)
    }

    pub fn rx_fan_index(&self) -> u8 {
        self.raw.get_u8(5)
    }

    pub fn swaths_per_ping(&self) -> u8 {
        self.raw.get_u8(6)
    }

    pub fn swath_along_position(&self) -> u8 {
        self.raw.get_u8(7)
    }

    pub fn tx_transducer_ind(&self) -> u8 {
        self.raw.get_u8(8)
    }

    pub fn rx_transducer_ind(&self) -> u8 {
        self.raw.get_u8(9)
    }

    pub fn num_rx_transducers(&self) -> u8 {
        self.raw.get_u8(10)
    }

    pub fn algorithm_type(&self) -> u8 {
        self.raw.get_u8(11)
    }
}

/// The common part of the sensor (`S`) datagrams.
#[derive(Debug, Copy, Clone)]
pub struct SCommon<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for SCommon<'a> {
    const SIZE: usize = 8;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl SCommon<'_> {
    /// Size of this part as stored, for skipping to the next part.
    pub fn num_bytes_cmn_part(&self) -> u16 {
        self.raw.get_u16(0)
    }

    /// Which sensor interface produced the data.
    pub fn sensor_system(&self) -> u16 {
        self.raw.get_u16(2)
    }

    /// Active/inactive and quality bits as reported by the sounder.
    pub fn sensor_status(&self) -> u16 {
        self.raw.get_u16(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_accepts_only_one_of_one() {
        let unsplit: &[u8] = &[1, 0, 1, 0];
        assert!(Partition::wrap(unsplit).require_unsplit().is_ok());

        let split: &[u8] = &[2, 0, 1, 0];
        assert!(matches!(
            Partition::wrap(split).require_unsplit(),
            Err(ReaderError::BadData(_))
        ));

        let second: &[u8] = &[1, 0, 2, 0];
        assert!(Partition::wrap(second).require_unsplit().is_err());
    }

    #[test]
    fn m_common_fields() {
        let mut raw: Vec<u8> = vec![0u8; 12];
        raw[0..2].copy_from_slice(&12u16.to_le_bytes());
        raw[2..4].copy_from_slice(&777u16.to_le_bytes());
        raw[4] = 2; // rx fans per ping
        raw[5] = 1; // rx fan index
        raw[11] = 3; // algorithm type

        let common = MCommon::wrap(&raw);
        assert_eq!(common.num_bytes_cmn_part(), 12);
        assert_eq!(common.ping_cnt(), 777);
        assert_eq!(common.rx_fans_per_ping(), 2);
        assert_eq!(common.rx_fan_index(), 1);
        assert_eq!(common.algorithm_type(), 3);
    }

    #[test]
    fn s_common_fields() {
        let mut raw: Vec<u8> = vec![0u8; 8];
        raw[0..2].copy_from_slice(&8u16.to_le_bytes());
        raw[2..4].copy_from_slice(&1u16.to_le_bytes());
        raw[4..6].copy_from_slice(&0x0102u16.to_le_bytes());

        let common = SCommon::wrap(&raw);
        assert_eq!(common.num_bytes_cmn_part(), 8);
        assert_eq!(common.sensor_system(), 1);
        assert_eq!(common.sensor_status(), 0x0102);
    }
}
