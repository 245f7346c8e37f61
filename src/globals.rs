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

//! Type aliases and framing constants shared by the format readers.

use cfg_if::cfg_if;

// ---------- Type Definitions --------- //

/// A KMA datagram type code: four ASCII bytes as a little-endian word.
pub type TypeCode = u32;
/// An EMX datagram type code: a single byte.
pub type EmxCode = u8;
/// The outer length field carried by every datagram.
pub type DgmLength = u32;

// ---------- Framing Limits ---------- //

/// Generous upper bound on a declared datagram length, both formats.
pub const MAX_DGM_BYTES: DgmLength = 1 << 30;
/// Upper bound on the nanosecond part of a KMA header timestamp.
pub const MAX_NANOSEC: u32 = 1_000_000_000;

// ---------- KMA Framing ---------- //

cfg_if! {
    if #[cfg(feature = "kma")] {
        /// Low byte of every KMA type code word ('#').
        pub const KMA_MAGIC: u8 = 0x23;
        /// A KMA datagram is at least a header plus the trailing length field.
        pub const KMA_MIN_DGM_BYTES: DgmLength = 20 + 4;
    }
}

// ---------- EMX Framing ---------- //

cfg_if! {
    if #[cfg(feature = "emx")] {
        /// Start-of-record byte following the EMX outer length field.
        pub const EMX_STX: u8 = 0x02;
        /// End-of-record byte preceding the EMX checksum field.
        pub const EMX_ETX: u8 = 0x03;
        /// Bytes of terminator after an EMX payload: ETX plus a 16-bit
        /// checksum field.
        pub const EMX_TERMINATOR_BYTES: usize = 3;
        /// The EMX outer length counts the record after the length field:
        /// STX, the 19-byte header rest, payload, and terminator.
        pub const EMX_MIN_NUM_BYTES: DgmLength = 20 + 3;
    }
}
