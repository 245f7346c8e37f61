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

//! The 20-byte KMA datagram header and its validation rules.

use crate::bytes::FieldSlice;
use crate::error::ReaderError;
use crate::globals::*;
use chrono::{DateTime, Utc};
use log::debug;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Builds a KMA type code word from its four ASCII bytes.
pub const fn type_code(tag: [u8; 4]) -> TypeCode {
    u32::from_le_bytes(tag)
}

/// The KMA datagram kinds this reader lays out.
///
/// An unlisted code is still framed and returned; see
/// [`KmaBody::Unknown`](super::dgm::KmaBody::Unknown).
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DgmType {
    /// `#IIP`: installation parameters.
    Iip,
    /// `#IOP`: runtime operator parameters.
    Iop,
    /// `#IBE`: built-in self test error report.
    Ibe,
    /// `#IBR`: built-in self test reply.
    Ibr,
    /// `#IBS`: built-in self test short reply.
    Ibs,
    /// `#MRZ`: multibeam raw range and depth (soundings).
    Mrz,
    /// `#MWC`: multibeam water column.
    Mwc,
    /// `#SPO`: sensor position.
    Spo,
    /// `#SKM`: sensor attitude (KM binary samples).
    Skm,
    /// `#SVP`: sound velocity profile.
    Svp,
    /// `#SVT`: sound velocity at transducer.
    Svt,
    /// `#SCL`: sensor clock.
    Scl,
    /// `#SDE`: sensor depth.
    Sde,
    /// `#SHI`: sensor height.
    Shi,
    /// `#CPO`: compatibility position.
    Cpo,
    /// `#CHE`: compatibility heave.
    Che,
    /// `#FCF`: backscatter calibration file.
    Fcf,
}

impl DgmType {
    /// The four-byte little-endian type code word for this kind.
    pub fn code(self) -> TypeCode {
        match self {
            DgmType::Iip => type_code(*b"#IIP"),
            DgmType::Iop => type_code(*b"#IOP"),
            DgmType::Ibe => type_code(*b"#IBE"),
            DgmType::Ibr => type_code(*b"#IBR"),
            DgmType::Ibs => type_code(*b"#IBS"),
            DgmType::Mrz => type_code(*b"#MRZ"),
            DgmType::Mwc => type_code(*b"#MWC"),
            DgmType::Spo => type_code(*b"#SPO"),
            DgmType::Skm => type_code(*b"#SKM"),
            DgmType::Svp => type_code(*b"#SVP"),
            DgmType::Svt => type_code(*b"#SVT"),
            DgmType::Scl => type_code(*b"#SCL"),
            DgmType::Sde => type_code(*b"#SDE"),
            DgmType::Shi => type_code(*b"#SHI"),
            DgmType::Cpo => type_code(*b"#CPO"),
            DgmType::Che => type_code(*b"#CHE"),
            DgmType::Fcf => type_code(*b"#FCF"),
        }
    }

    /// Looks a code word up in the catalogue.
    pub fn from_code(code: TypeCode) -> Option<DgmType> {
        DgmType::iter().find(|kind| kind.code() == code)
    }
}

/// The fixed header that starts every KMA datagram.
///
/// The leading 4-byte length field of the frame is the header's first
/// field, so the header is decoded from the first 20 bytes of the frame.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DgmHeader {
    /// Total datagram length in bytes, both length fields included.
    pub num_bytes_dgm: u32,
    /// Four ASCII bytes as a little-endian word; low byte is `'#'`.
    pub dgm_type: TypeCode,
    /// Layout revision of the datagram body.
    pub dgm_version: u8,
    /// Sounder system index, for multi-head installations.
    pub system_id: u8,
    /// Echo sounder model id.
    pub echo_sounder_id: u16,
    /// UTC time of the datagram, seconds since the Unix epoch.
    pub time_sec: u32,
    /// Nanosecond remainder of the timestamp.
    pub time_nanosec: u32,
}

impl DgmHeader {
    pub const SIZE: usize = 20;

    /// Decodes a header from the first bytes of a frame.
    pub fn decode(raw: &[u8; Self::SIZE]) -> Self {
        let raw: &[u8] = raw;
        Self {
            num_bytes_dgm: raw.get_u32(0),
            dgm_type: raw.get_u32(4),
            dgm_version: raw.get_u8(8),
            system_id: raw.get_u8(9),
            echo_sounder_id: raw.get_u16(10),
            time_sec: raw.get_u32(12),
            time_nanosec: raw.get_u32(16),
        }
    }

    /// Checks the frame-level sanity of the header.
    ///
    /// The type code is only checked for the `'#'` magic; unknown codes
    /// must pass so they can be framed and handed back raw.
    pub fn validate(&self) -> Result<(), ReaderError> {
        if self.num_bytes_dgm < KMA_MIN_DGM_BYTES {
            debug!("numBytesDgm {} below datagram minimum", self.num_bytes_dgm);
            return Err(ReaderError::BadData("declared length below datagram minimum"));
        }
        if self.num_bytes_dgm > MAX_DGM_BYTES {
            debug!("numBytesDgm {} above sanity bound", self.num_bytes_dgm);
            return Err(ReaderError::BadData("declared length above sanity bound"));
        }
        if self.dgm_type.to_le_bytes()[0] != KMA_MAGIC {
            debug!("dgmType {:#010x} does not start with '#'", self.dgm_type);
            return Err(ReaderError::BadData("type code does not start with '#'"));
        }
        if self.time_nanosec > MAX_NANOSEC {
            debug!("time_nanosec {} out of range", self.time_nanosec);
            return Err(ReaderError::BadData("nanosecond field out of range"));
        }
        Ok(())
    }

    /// The catalogued kind of this datagram, if it is one.
    pub fn kind(&self) -> Option<DgmType> {
        DgmType::from_code(self.dgm_type)
    }

    /// The type code as its four ASCII bytes, for diagnostics.
    pub fn type_tag(&self) -> [u8; 4] {
        self.dgm_type.to_le_bytes()
    }

    /// The header timestamp as a UTC datetime.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::from(self.time_sec), self.time_nanosec)
    }
}
