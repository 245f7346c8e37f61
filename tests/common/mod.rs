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

//! Shared test support: a little-endian frame builder for synthesizing
//! log files, and temp-file plumbing.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// Builds the little-endian byte image of one datagram body or frame.
#[derive(Debug, Default, Clone)]
pub struct FrameBuilder {
    buffer: Vec<u8>,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_u8(&mut self, v: u8) -> &mut Self {
        self.buffer.push(v);
        self
    }

    pub fn add_i8(&mut self, v: i8) -> &mut Self {
        self.add_u8(v as u8)
    }

    pub fn add_u16(&mut self, v: u16) -> &mut Self {
        self.buffer.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn add_i16(&mut self, v: i16) -> &mut Self {
        self.add_u16(v as u16)
    }

    pub fn add_u32(&mut self, v: u32) -> &mut Self {
        self.buffer.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn add_i32(&mut self, v: i32) -> &mut Self {
        self.add_u32(v as u32)
    }

    pub fn add_f32(&mut self, v: f32) -> &mut Self {
        self.buffer.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn add_f64(&mut self, v: f64) -> &mut Self {
        self.buffer.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn add_data(&mut self, v: &[u8]) -> &mut Self {
        self.buffer.extend_from_slice(v);
        self
    }

    /// Appends `count` zero bytes, for spares and unexercised fields.
    pub fn pad(&mut self, count: usize) -> &mut Self {
        self.buffer.resize(self.buffer.len() + count, 0);
        self
    }

    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    pub fn take(self) -> Vec<u8> {
        self.buffer
    }
}

/// Frames `body` as one KMA datagram: 20-byte header (the leading
/// length field included), body, repeated trailing length.
pub fn kma_frame(tag: &[u8; 4], dgm_version: u8, body: &[u8]) -> Vec<u8> {
    let num_bytes: u32 = (20 + body.len() + 4) as u32;
    let mut frame = FrameBuilder::new();
    frame
        .add_u32(num_bytes)
        .add_data(tag)
        .add_u8(dgm_version)
        .add_u8(0) // system id
        .add_u16(2040) // echo sounder id
        .add_u32(1_700_000_000) // time seconds
        .add_u32(250_000_000) // time nanoseconds
        .add_data(body)
        .add_u32(num_bytes);
    frame.take()
}

/// Frames `body` as one EMX record with a correct checksum.
pub fn emx_frame(dgm_type: u8, body: &[u8]) -> Vec<u8> {
    let num_bytes: u32 = (20 + body.len() + 3) as u32;
    let mut frame = FrameBuilder::new();
    frame
        .add_u32(num_bytes)
        .add_u8(0x02) // STX
        .add_u8(dgm_type)
        .add_u16(1002) // model
        .add_u32(20260704) // date
        .add_u32(43_200_000) // ms since midnight
        .add_u16(17) // counter
        .add_u16(345) // serial
        .add_u16(0) // second serial
        .add_u16(0) // spare
        .add_data(body)
        .add_u8(0x03); // ETX

    // The checksum region runs from after STX up to, not including, ETX.
    let summed: u32 = frame.buffer[5..frame.size() - 1].iter().map(|b| u32::from(*b)).sum();
    frame.add_u16((summed & 0xff) as u16);
    frame.take()
}

/// Writes `contents` to a unique temp file and returns its path.
pub fn write_temp_log(name: &str, contents: &[u8]) -> PathBuf {
    let mut path: PathBuf = std::env::temp_dir();
    path.push(format!("echolog-it-{}-{}", std::process::id(), name));
    let mut file = File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    path
}
