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

//! The EMX record header, type catalogue, and checksum rules.
//!
//! An EMX record is a 4-byte outer length, an STX byte, a 19-byte
//! header rest, the payload, and a terminator of ETX plus a 16-bit
//! checksum field. The checksum value is the 8-bit sum (mod 256) of
//! every byte strictly between STX and ETX.

use crate::bytes::FieldSlice;
use crate::error::ReaderError;
use crate::globals::*;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use log::debug;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// The EMX datagram kinds this reader lays out.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EmxType {
    /// `'I'`: installation parameters.
    Install = 0x49,
    /// `'R'`: runtime parameters.
    Runtime = 0x52,
    /// `'P'`: position.
    Position = 0x50,
    /// `'A'`: attitude samples.
    Attitude = 0x41,
    /// `'C'`: external clock.
    Clock = 0x43,
    /// `'h'`: height.
    Height = 0x68,
    /// `'H'`: heading samples.
    Heading = 0x48,
    /// `'G'`: surface sound speed samples.
    SurfaceSoundSpeed = 0x47,
    /// `'U'`: sound speed profile.
    SoundSpeedProfile = 0x55,
    /// `'X'`: depth per beam (XYZ).
    XyzDepth = 0x58,
    /// `'N'`: raw range and beam angle.
    RawRangeAngle = 0x4e,
    /// `'Y'`: sidescan (seabed image) samples.
    Sidescan = 0x59,
    /// `'k'`: water column samples.
    WaterColumn = 0x6b,
}

impl EmxType {
    pub fn code(self) -> EmxCode {
        self as EmxCode
    }

    /// Looks a type byte up in the catalogue.
    pub fn from_code(code: EmxCode) -> Option<EmxType> {
        EmxType::iter().find(|kind| kind.code() == code)
    }
}

/// The fixed header of an EMX record: the outer length field, the STX
/// byte, and the 19 header bytes after it.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmxHeader {
    /// Bytes following the length field: STX through checksum.
    pub num_bytes: u32,
    /// Stored start byte; 0x02 on a well-formed record.
    pub stx: u8,
    /// Single-byte datagram type code.
    pub dgm_type: EmxCode,
    /// Sounder model number.
    pub em_model: u16,
    /// Date as decimal YYYYMMDD, sounder clock.
    pub date: u32,
    /// Milliseconds since midnight, sounder clock.
    pub time_ms: u32,
    /// Sequential datagram counter.
    pub counter: u16,
    /// System serial number.
    pub serial: u16,
    /// Serial number of a second sounder head, when fitted.
    pub second_serial: u16,
}

impl EmxHeader {
    /// Header bytes consumed from the file: length field included.
    pub const SIZE: usize = 24;

    pub fn decode(raw: &[u8; Self::SIZE]) -> Self {
        let raw: &[u8] = raw;
        Self {
            num_bytes: raw.get_u32(0),
            stx: raw.get_u8(4),
            dgm_type: raw.get_u8(5),
            em_model: raw.get_u16(6),
            date: raw.get_u32(8),
            time_ms: raw.get_u32(12),
            counter: raw.get_u16(16),
            serial: raw.get_u16(18),
            second_serial: raw.get_u16(20),
        }
    }

    /// Checks the frame-level sanity of the header.
    ///
    /// Unknown type bytes pass; the terminator and checksum live at the
    /// end of the record and are checked after the payload is read.
    pub fn validate(&self) -> Result<(), ReaderError> {
        if self.stx != EMX_STX {
            debug!("record starts with {:#04x}, not STX", self.stx);
            return Err(ReaderError::BadData("record does not start with STX"));
        }
        if self.num_bytes < EMX_MIN_NUM_BYTES {
            debug!("record length {} below record minimum", self.num_bytes);
            return Err(ReaderError::BadData("declared length below record minimum"));
        }
        if self.num_bytes > MAX_DGM_BYTES {
            debug!("record length {} above sanity bound", self.num_bytes);
            return Err(ReaderError::BadData("declared length above sanity bound"));
        }
        Ok(())
    }

    /// The catalogued kind of this record, if it is one.
    pub fn kind(&self) -> Option<EmxType> {
        EmxType::from_code(self.dgm_type)
    }

    /// The sounder clock as a UTC datetime, or `None` when the header's
    /// date or milliseconds do not form one.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let year: i32 = (self.date / 10_000) as i32;
        let month: u32 = self.date / 100 % 100;
        let day: u32 = self.date % 100;
        let date: NaiveDate = NaiveDate::from_ymd_opt(year, month, day)?;

        let time: NaiveTime = NaiveTime::from_num_seconds_from_midnight_opt(
            self.time_ms / 1000,
            self.time_ms % 1000 * 1_000_000,
        )?;
        Some(DateTime::from_naive_utc_and_offset(
            NaiveDateTime::new(date, time),
            Utc,
        ))
    }

    /// The header timestamp decomposed into Unix epoch seconds plus
    /// nanoseconds, as the KMA header stores natively.
    pub fn epoch(&self) -> Option<(u32, u32)> {
        let ts: DateTime<Utc> = self.timestamp()?;
        Some((ts.timestamp() as u32, ts.timestamp_subsec_nanos()))
    }
}

/// The 8-bit record checksum: the byte sum mod 256 over every region
/// between STX and ETX.
pub(crate) fn checksum(regions: &[&[u8]]) -> u8 {
    let mut sum: u32 = 0;
    for region in regions {
        for byte in *region {
            sum = (sum + u32::from(*byte)) & 0xff;
        }
    }
    sum as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_header(dgm_type: u8, num_bytes: u32) -> [u8; EmxHeader::SIZE] {
        let mut raw = [0u8; EmxHeader::SIZE];
        raw[0..4].copy_from_slice(&num_bytes.to_le_bytes());
        raw[4] = EMX_STX;
        raw[5] = dgm_type;
        raw[6..8].copy_from_slice(&1002u16.to_le_bytes());
        raw[8..12].copy_from_slice(&20260704u32.to_le_bytes());
        raw[12..16].copy_from_slice(&43_200_500u32.to_le_bytes()); // 12:00:00.500
        raw[16..18].copy_from_slice(&9u16.to_le_bytes());
        raw[18..20].copy_from_slice(&123u16.to_le_bytes());
        raw
    }

    #[test]
    fn decode_and_validate() {
        let header: EmxHeader = EmxHeader::decode(&sample_header(0x50, 100));

        assert!(header.validate().is_ok());
        assert_eq!(header.kind(), Some(EmxType::Position));
        assert_eq!(header.em_model, 1002);
        assert_eq!(header.counter, 9);
        assert_eq!(header.serial, 123);
    }

    #[test]
    fn timestamp_from_date_and_millis() {
        let header: EmxHeader = EmxHeader::decode(&sample_header(0x50, 100));
        let ts = header.timestamp().unwrap();

        assert_eq!(ts.to_rfc3339(), "2026-07-04T12:00:00.500+00:00");
        let (sec, nanos) = header.epoch().unwrap();
        assert_eq!(nanos, 500_000_000);
        assert_eq!(i64::from(sec), ts.timestamp());
    }

    #[test]
    fn nonsense_date_has_no_timestamp() {
        let mut raw = sample_header(0x50, 100);
        raw[8..12].copy_from_slice(&20261399u32.to_le_bytes()); // month 13

        assert!(EmxHeader::decode(&raw).timestamp().is_none());
    }

    #[test]
    fn rejects_missing_stx() {
        let mut raw = sample_header(0x50, 100);
        raw[4] = 0x7b;

        assert!(matches!(
            EmxHeader::decode(&raw).validate(),
            Err(ReaderError::BadData(_))
        ));
    }

    #[test]
    fn rejects_length_below_minimum() {
        let header: EmxHeader = EmxHeader::decode(&sample_header(0x50, 10));
        assert!(header.validate().is_err());
    }

    #[test]
    fn checksum_sums_mod_256() {
        assert_eq!(checksum(&[&[1, 2, 3]]), 6);
        assert_eq!(checksum(&[&[200], &[100]]), 44); // 300 mod 256
        assert_eq!(checksum(&[]), 0);
    }

    #[test]
    fn catalogue_round_trips() {
        for kind in EmxType::iter() {
            assert_eq!(EmxType::from_code(kind.code()), Some(kind));
        }
        assert_eq!(EmxType::from_code(0x7b), None);
    }
}
