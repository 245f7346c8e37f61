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

//! Pull-style reader for legacy EMX format log files.
//!
//! An EMX record is a 4-byte outer length, an STX byte, a 19-byte
//! header rest, the payload, and an ETX plus checksum terminator.
//! [`EmxReader::read`] frames, checksums, and lays out the next record.
//! Checksum verification can be switched off for logs written by
//! systems known to store bad sums.

pub mod bathy;
pub mod dgm;
pub mod header;
pub mod nav;

pub use dgm::{EmxBody, EmxDgm};
pub use header::{EmxHeader, EmxType};

use crate::buffer::ReadBuffer;
use crate::bytes::FieldSlice;
use crate::error::{ErrorCode, ReaderError};
use crate::frame::{self, Filled};
use crate::globals::{EMX_ETX, EMX_TERMINATOR_BYTES};
use header::checksum;
use log::debug;
use std::fs::File;
use std::path::Path;

/// A reader over one open EMX log file.
pub struct EmxReader {
    file: File,
    buffer: ReadBuffer,
    last_error: ErrorCode,
    ignore_watercolumn: bool,
    ignore_checksum: bool,
}

impl EmxReader {
    /// Opens a log file for sequential reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReaderError> {
        crate::init_logger();
        let file: File = File::open(path.as_ref()).map_err(ReaderError::OpenFailed)?;

        Ok(Self {
            file,
            buffer: ReadBuffer::new(),
            last_error: ErrorCode::None,
            ignore_watercolumn: false,
            ignore_checksum: false,
        })
    }

    /// Frames, checksums, and lays out the next record in file order.
    ///
    /// `Ok(None)` is a clean end-of-file at a record boundary and does
    /// not touch [`last_error`](Self::last_error).
    pub fn read(&mut self) -> Result<Option<EmxDgm<'_>>, ReaderError> {
        let (header, payload_len) = match self.next_frame()? {
            Some(frame) => frame,
            None => return Ok(None),
        };
        // Strip the ETX and checksum trailer from the layout region.
        let body: &[u8] = &self.buffer.slice(payload_len)[..payload_len - EMX_TERMINATOR_BYTES];

        match dispatch(&header, body) {
            Ok(body) => Ok(Some(EmxDgm { header, body })),
            Err(e) => {
                self.last_error = e.code();
                Err(e)
            }
        }
    }

    /// Drops the file and buffer. The reader cannot be reopened.
    pub fn close(self) -> Result<(), ReaderError> {
        drop(self.file);
        Ok(())
    }

    /// The code of the most recent failure on this reader.
    pub fn last_error(&self) -> ErrorCode {
        self.last_error
    }

    /// Skips `'k'` water-column records by seeking past their payloads.
    pub fn set_ignore_watercolumn(&mut self, ignore: bool) {
        self.ignore_watercolumn = ignore;
    }

    /// Disables record checksum verification.
    pub fn set_ignore_checksum(&mut self, ignore: bool) {
        self.ignore_checksum = ignore;
    }

    fn next_frame(&mut self) -> Result<Option<(EmxHeader, usize)>, ReaderError> {
        match self.frame_once() {
            Ok(frame) => Ok(frame),
            Err(e) => {
                self.last_error = e.code();
                Err(e)
            }
        }
    }

    fn frame_once(&mut self) -> Result<Option<(EmxHeader, usize)>, ReaderError> {
        loop {
            let mut raw = [0u8; EmxHeader::SIZE];
            if frame::read_frame_start(&mut self.file, &mut raw)? == Filled::Eof {
                return Ok(None);
            }
            let header: EmxHeader = EmxHeader::decode(&raw);
            header.validate()?;

            // The outer length counts from STX; the STX byte and the 19
            // header bytes after it were read with the length field.
            let payload_len: usize = header.num_bytes as usize - 20;
            if header.kind() == Some(EmxType::WaterColumn) && self.ignore_watercolumn {
                debug!("skipping water column record of {} bytes", header.num_bytes);
                frame::skip_forward(&mut self.file, payload_len as u64)?;
                continue;
            }

            self.buffer.ensure_capacity(payload_len)?;
            frame::read_payload(&mut self.file, self.buffer.slice_mut(payload_len))?;
            self.check_terminator(&raw, payload_len)?;
            return Ok(Some((header, payload_len)));
        }
    }

    fn check_terminator(&self, raw_header: &[u8], payload_len: usize) -> Result<(), ReaderError> {
        let payload: &[u8] = self.buffer.slice(payload_len);
        let trailer: &[u8] = &payload[payload_len - EMX_TERMINATOR_BYTES..];

        if trailer.get_u8(0) != EMX_ETX {
            debug!("record ends with {:#04x}, not ETX", trailer.get_u8(0));
            return Err(ReaderError::BadData("record does not end with ETX"));
        }
        if self.ignore_checksum {
            return Ok(());
        }

        let stored: u16 = trailer.get_u16(1);
        let summed: u8 = checksum(&[
            &raw_header[5..], // header rest, after STX
            &payload[..payload_len - EMX_TERMINATOR_BYTES],
        ]);
        if stored != u16::from(summed) {
            debug!("record checksum {} does not match sum {}", stored, summed);
            return Err(ReaderError::BadData("record checksum mismatch"));
        }
        Ok(())
    }
}

/// Checks whether `path` plausibly is an EMX log file.
///
/// Reads and validates exactly one header; the record terminator is not
/// consulted, so this is as loose as the KMA variant.
pub fn identify(path: impl AsRef<Path>) -> Result<bool, ReaderError> {
    crate::init_logger();
    let mut file: File = File::open(path.as_ref()).map_err(ReaderError::OpenFailed)?;

    let mut raw = [0u8; EmxHeader::SIZE];
    match frame::read_frame_start(&mut file, &mut raw) {
        Ok(Filled::Full) => Ok(EmxHeader::decode(&raw).validate().is_ok()),
        Ok(Filled::Eof) => Ok(false),
        Err(ReaderError::BadData(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

fn dispatch<'a>(header: &EmxHeader, body: &'a [u8]) -> Result<EmxBody<'a>, ReaderError> {
    let kind: EmxType = match header.kind() {
        Some(kind) => kind,
        None => {
            debug!("unknown record type {:#04x}, returning raw body", header.dgm_type);
            return Ok(EmxBody::Unknown(body));
        }
    };

    Ok(match kind {
        EmxType::Install => EmxBody::Install(nav::layout_text(body)?),
        EmxType::Runtime => EmxBody::Runtime(nav::layout_runtime(body)?),
        EmxType::Position => EmxBody::Position(nav::layout_position(body)?),
        EmxType::Attitude => EmxBody::Attitude(nav::layout_attitude(body)?),
        EmxType::Clock => EmxBody::Clock(nav::layout_clock(body)?),
        EmxType::Height => EmxBody::Height(nav::layout_height(body)?),
        EmxType::Heading => EmxBody::Heading(nav::layout_heading(body)?),
        EmxType::SurfaceSoundSpeed => EmxBody::SurfaceSoundSpeed(nav::layout_surface_sound_speed(body)?),
        EmxType::SoundSpeedProfile => EmxBody::SoundSpeedProfile(nav::layout_sound_speed_profile(body)?),
        EmxType::XyzDepth => EmxBody::XyzDepth(bathy::layout_xyz_depth(body)?),
        EmxType::RawRangeAngle => EmxBody::RawRangeAngle(bathy::layout_raw_range(body)?),
        EmxType::Sidescan => EmxBody::Sidescan(bathy::layout_sidescan(body)?),
        EmxType::WaterColumn => EmxBody::WaterColumn(bathy::layout_water_column(body)?),
    })
}
