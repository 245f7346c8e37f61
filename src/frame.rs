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

//! Thin framing wrappers over blocking file I/O.
//!
//! Interrupted reads (`ErrorKind::Interrupted`) are retried here, so the
//! readers above only ever see a full buffer, a clean end-of-file, or a
//! hard failure.

use crate::error::ReaderError;
use log::debug;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};

/// Outcome of trying to fill a buffer at a frame boundary.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Filled {
    /// The buffer was filled completely.
    Full,
    /// Zero bytes were available: the file ended exactly at the boundary.
    Eof,
}

/// Fills `buf` from the file, distinguishing a clean end-of-file.
///
/// A partial fill means the file ends inside a frame and is reported as
/// bad-data; a zero fill is [`Filled::Eof`].
pub(crate) fn read_frame_start(file: &mut File, buf: &mut [u8]) -> Result<Filled, ReaderError> {
    let mut filled: usize = 0;

    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ReaderError::ReadFailed(e)),
        }
    }
    if filled == 0 {
        return Ok(Filled::Eof);
    }
    if filled < buf.len() {
        debug!("file ends inside a datagram header ({}/{} bytes)", filled, buf.len());
        return Err(ReaderError::BadData("log ends inside a datagram header"));
    }
    Ok(Filled::Full)
}

/// Fills `buf` from the file; any shortfall is bad-data.
pub(crate) fn read_payload(file: &mut File, buf: &mut [u8]) -> Result<(), ReaderError> {
    match file.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            debug!("file ends inside a datagram payload of {} bytes", buf.len());
            Err(ReaderError::BadData("log ends inside a datagram payload"))
        }
        Err(e) => Err(ReaderError::ReadFailed(e)),
    }
}

/// Advances the file position by `bytes` without reading.
pub(crate) fn skip_forward(file: &mut File, bytes: u64) -> Result<(), ReaderError> {
    match file.seek(SeekFrom::Current(bytes as i64)) {
        Ok(_) => Ok(()),
        Err(e) => Err(ReaderError::SeekFailed(e)),
    }
}
