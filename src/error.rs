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

//! Reader-level error handling.

use thiserror::Error;

/// Custom error type for the format readers.
///
/// End-of-file is not an error: `read()` reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The log file could not be opened.
    #[error("failed to open log file; {0}")]
    OpenFailed(std::io::Error),
    /// The log file could not be closed cleanly.
    #[error("failed to close log file; {0}")]
    CloseFailed(std::io::Error),
    /// A file read failed below the framing layer.
    #[error("read failed; {0}")]
    ReadFailed(std::io::Error),
    /// A relative seek past a skipped datagram failed.
    #[error("seek failed; {0}")]
    SeekFailed(std::io::Error),
    /// This error kind is returned when a datagram's framing or
    /// self-declared sizes are inconsistent: a bad length or magic,
    /// a truncated payload, a counted array overrunning the datagram,
    /// or a partition other than (1, 1).
    #[error("bad datagram; {0}")]
    BadData(&'static str),
    /// The read buffer could not be grown to hold the payload.
    #[error("read buffer allocation failed")]
    OutOfMemory,
}

/// The persistent per-reader error code.
///
/// Mirrors the last [`ReaderError`] a reader returned. It is overwritten
/// by later failures and is never cleared by a successful read, so after
/// `read()` returns `Ok(None)` a caller can distinguish a clean
/// end-of-file (code still [`ErrorCode::None`]) from iteration that was
/// abandoned after a failure.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCode {
    #[default]
    None,
    OpenFailed,
    CloseFailed,
    ReadFailed,
    SeekFailed,
    BadData,
    OutOfMemory,
}

impl ReaderError {
    /// Returns the persistent code a reader records for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ReaderError::OpenFailed(_) => ErrorCode::OpenFailed,
            ReaderError::CloseFailed(_) => ErrorCode::CloseFailed,
            ReaderError::ReadFailed(_) => ErrorCode::ReadFailed,
            ReaderError::SeekFailed(_) => ErrorCode::SeekFailed,
            ReaderError::BadData(_) => ErrorCode::BadData,
            ReaderError::OutOfMemory => ErrorCode::OutOfMemory,
        }
    }
}
