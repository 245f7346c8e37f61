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

//! The per-reader growable payload buffer.

use crate::error::ReaderError;

/// A single reusable byte buffer, overwritten by every read.
///
/// Grows monotonically and never shrinks; one water-column datagram early
/// in a file typically sizes the buffer for the rest of it.
#[derive(Debug, Default)]
pub(crate) struct ReadBuffer {
    data: Vec<u8>,
}

impl ReadBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes at least `wanted` bytes of contiguous storage available.
    ///
    /// Previous contents are discarded on growth. Growth reserves
    /// `wanted + ceil(wanted / 2)` so a slightly larger later datagram
    /// does not force another allocation. On allocation failure the
    /// existing buffer is left as it was.
    pub fn ensure_capacity(&mut self, wanted: usize) -> Result<(), ReaderError> {
        if self.data.len() >= wanted {
            return Ok(());
        }
        let target: usize = wanted + wanted.div_ceil(2);

        let mut grown: Vec<u8> = Vec::new();
        if grown.try_reserve_exact(target).is_err() {
            return Err(ReaderError::OutOfMemory);
        }
        grown.resize(target, 0);
        self.data = grown;
        Ok(())
    }

    /// Current usable size in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The first `len` bytes, for laying out a parsed payload.
    pub fn slice(&self, len: usize) -> &[u8] {
        &self.data[..len]
    }

    /// The first `len` bytes, writable, for filling from the file.
    pub fn slice_mut(&mut self, len: usize) -> &mut [u8] {
        &mut self.data[..len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_by_half_again() {
        let mut buffer = ReadBuffer::new();

        buffer.ensure_capacity(100).unwrap();
        assert_eq!(buffer.capacity(), 150);

        // Requests inside the grown capacity do not reallocate.
        buffer.ensure_capacity(120).unwrap();
        assert_eq!(buffer.capacity(), 150);

        buffer.ensure_capacity(151).unwrap();
        assert_eq!(buffer.capacity(), 151 + 76);
    }

    #[test]
    fn growth_rounds_odd_requests_up() {
        let mut buffer = ReadBuffer::new();

        buffer.ensure_capacity(3).unwrap();
        assert_eq!(buffer.capacity(), 5); // 3 + ceil(3/2)
    }

    #[test]
    fn zero_request_allocates_nothing() {
        let mut buffer = ReadBuffer::new();

        buffer.ensure_capacity(0).unwrap();
        assert_eq!(buffer.capacity(), 0);
        assert!(buffer.slice(0).is_empty());
    }

    #[test]
    fn slices_cover_requested_length() {
        let mut buffer = ReadBuffer::new();

        buffer.ensure_capacity(8).unwrap();
        buffer.slice_mut(8).copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(buffer.slice(8), &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(buffer.slice(4), &[1, 2, 3, 4]);
    }
}
