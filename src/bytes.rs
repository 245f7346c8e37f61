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

//! Byte-layout primitives for packed little-endian records.
//!
//! Datagram records are 1-byte aligned on disk, so every multi-byte field
//! may sit at an unaligned offset. The getters here copy the field bytes
//! out and decode with `from_le_bytes`, which is well-defined at any
//! alignment on every platform.

use crate::error::ReaderError;
use std::marker::PhantomData;

/// Little-endian field access into a packed record slice.
///
/// Offsets are relative to the start of the slice. The wrapping view
/// guarantees the slice covers the record's fixed prefix, so getters
/// index without a runtime length check of their own.
pub trait FieldSlice {
    fn get_u8(&self, off: usize) -> u8;
    fn get_i8(&self, off: usize) -> i8;
    fn get_u16(&self, off: usize) -> u16;
    fn get_i16(&self, off: usize) -> i16;
    fn get_u32(&self, off: usize) -> u32;
    fn get_i32(&self, off: usize) -> i32;
    fn get_u64(&self, off: usize) -> u64;
    fn get_f32(&self, off: usize) -> f32;
    fn get_f64(&self, off: usize) -> f64;
}

impl FieldSlice for [u8] {
    #[inline]
    fn get_u8(&self, off: usize) -> u8 {
        self[off]
    }

    #[inline]
    fn get_i8(&self, off: usize) -> i8 {
        self[off] as i8
    }

    #[inline]
    fn get_u16(&self, off: usize) -> u16 {
        u16::from_le_bytes(self[off..off + 2].try_into().unwrap())
    }

    #[inline]
    fn get_i16(&self, off: usize) -> i16 {
        i16::from_le_bytes(self[off..off + 2].try_into().unwrap())
    }

    #[inline]
    fn get_u32(&self, off: usize) -> u32 {
        u32::from_le_bytes(self[off..off + 4].try_into().unwrap())
    }

    #[inline]
    fn get_i32(&self, off: usize) -> i32 {
        i32::from_le_bytes(self[off..off + 4].try_into().unwrap())
    }

    #[inline]
    fn get_u64(&self, off: usize) -> u64 {
        u64::from_le_bytes(self[off..off + 8].try_into().unwrap())
    }

    #[inline]
    fn get_f32(&self, off: usize) -> f32 {
        f32::from_le_bytes(self[off..off + 4].try_into().unwrap())
    }

    #[inline]
    fn get_f64(&self, off: usize) -> f64 {
        f64::from_le_bytes(self[off..off + 8].try_into().unwrap())
    }
}

/// A typed view over the fixed prefix of one packed record.
///
/// `SIZE` is the number of prefix bytes the view's accessors read.
/// Records on disk may be larger than `SIZE` (their stride comes from
/// the datagram itself); the extra bytes are simply not interpreted.
pub trait PackedView<'a>: Sized {
    const SIZE: usize;

    /// Wraps a slice whose length is at least `SIZE`.
    fn wrap(raw: &'a [u8]) -> Self;
}

/// A counted array of packed records with a stride declared by the
/// datagram that carries it.
#[derive(Debug, Copy, Clone)]
pub struct PackedArray<'a, T> {
    raw: &'a [u8],
    count: usize,
    stride: usize,
    marker: PhantomData<T>,
}

impl<'a, T: PackedView<'a>> PackedArray<'a, T> {
    /// Lays the array out over `raw`.
    ///
    /// Fails with bad-data when the declared stride is smaller than the
    /// record's fixed prefix or `count * stride` overruns `raw`.
    pub fn new(raw: &'a [u8], count: usize, stride: usize) -> Result<Self, ReaderError> {
        if stride < T::SIZE {
            return Err(ReaderError::BadData("array stride below record size"));
        }
        let total: usize = match count.checked_mul(stride) {
            Some(total) => total,
            None => return Err(ReaderError::BadData("array extent overflows")),
        };
        if total > raw.len() {
            return Err(ReaderError::BadData("counted array overruns datagram"));
        }
        Ok(Self {
            raw: &raw[..total],
            count,
            stride,
            marker: PhantomData,
        })
    }

    /// Number of records in the array.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Total bytes the array occupies inside the datagram.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.count * self.stride
    }

    /// Returns a view of record `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<T> {
        if index >= self.count {
            return None;
        }
        let start: usize = index * self.stride;
        Some(T::wrap(&self.raw[start..start + self.stride]))
    }

    pub fn iter(&self) -> PackedArrayIter<'a, T> {
        PackedArrayIter {
            array: PackedArray {
                raw: self.raw,
                count: self.count,
                stride: self.stride,
                marker: PhantomData,
            },
            next: 0,
        }
    }
}

/// Iterator over the records of a [`PackedArray`].
pub struct PackedArrayIter<'a, T> {
    array: PackedArray<'a, T>,
    next: usize,
}

impl<'a, T: PackedView<'a>> Iterator for PackedArrayIter<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item: Option<T> = self.array.get(self.next);
        if item.is_some() {
            self.next += 1;
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left: usize = self.array.count - self.next.min(self.array.count);
        (left, Some(left))
    }
}

/// Bounds-checked cursor used by the per-type layout routines.
///
/// Every sub-record is claimed through the cursor with the size the
/// datagram itself declares for it, so a lying size field fails here
/// instead of placing a view past the payload.
pub(crate) struct Walk<'a> {
    body: &'a [u8],
    index: usize,
}

impl<'a> Walk<'a> {
    pub fn new(body: &'a [u8]) -> Self {
        Self { body, index: 0 }
    }

    /// Bytes not yet claimed by a sub-record.
    pub fn remaining(&self) -> usize {
        self.body.len() - self.index
    }

    /// Claims the next `bytes` bytes.
    pub fn take(&mut self, bytes: usize, what: &'static str) -> Result<&'a [u8], ReaderError> {
        if bytes > self.remaining() {
            log::debug!(
                "{} wants {} bytes with {} left in datagram",
                what,
                bytes,
                self.remaining()
            );
            return Err(ReaderError::BadData(what));
        }
        let start: usize = self.index;
        self.index += bytes;
        Ok(&self.body[start..start + bytes])
    }

    /// Claims a self-sized sub-record and wraps it as a view.
    ///
    /// `declared` is the record's own size field; it must cover at least
    /// the view's fixed prefix and still fit in the datagram.
    pub fn view<T: PackedView<'a>>(&mut self, declared: usize, what: &'static str) -> Result<T, ReaderError> {
        if declared < T::SIZE {
            log::debug!("{} declares {} bytes, record needs {}", what, declared, T::SIZE);
            return Err(ReaderError::BadData(what));
        }
        Ok(T::wrap(self.take(declared, what)?))
    }

    /// Claims a sub-record whose size field lives inside the record.
    ///
    /// The record's fixed prefix is peeked first to read the declared
    /// size through `size_of`, then the full declared extent is claimed.
    pub fn sized_view<T, F>(&mut self, size_of: F, what: &'static str) -> Result<T, ReaderError>
    where
        T: PackedView<'a>,
        F: Fn(&T) -> usize,
    {
        if T::SIZE > self.remaining() {
            log::debug!("{} prefix of {} bytes missing", what, T::SIZE);
            return Err(ReaderError::BadData(what));
        }
        let declared: usize = size_of(&T::wrap(&self.body[self.index..]));
        self.view(declared, what)
    }

    /// Claims a counted array with a datagram-declared stride.
    ///
    /// A zero count claims nothing and returns `None`: the caller's view
    /// reports the array as absent.
    pub fn array<T: PackedView<'a>>(
        &mut self,
        count: usize,
        stride: usize,
        what: &'static str,
    ) -> Result<Option<PackedArray<'a, T>>, ReaderError> {
        if count == 0 {
            return Ok(None);
        }
        let total: usize = match count.checked_mul(stride) {
            Some(total) => total,
            None => return Err(ReaderError::BadData(what)),
        };
        let raw: &'a [u8] = self.take(total, what)?;
        PackedArray::new(raw, count, stride).map(Some)
    }

    /// Everything after the sub-records claimed so far.
    pub fn rest(self) -> &'a [u8] {
        &self.body[self.index..]
    }
}

/// A trailing run of 8-bit signed samples.
#[derive(Debug, Copy, Clone)]
pub struct I8Samples<'a> {
    raw: &'a [u8],
}

impl<'a> I8Samples<'a> {
    pub(crate) fn new(raw: &'a [u8]) -> Self {
        Self { raw }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<i8> {
        self.raw.get(index).map(|b| *b as i8)
    }

    pub fn iter(&self) -> impl Iterator<Item = i8> + 'a {
        self.raw.iter().map(|b| *b as i8)
    }

    /// The sample bytes as stored.
    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.raw
    }
}

/// A trailing run of 16-bit signed little-endian samples.
#[derive(Debug, Copy, Clone)]
pub struct I16Samples<'a> {
    raw: &'a [u8],
}

impl<'a> I16Samples<'a> {
    /// Wraps a byte region; a trailing odd byte is ignored.
    pub(crate) fn new(raw: &'a [u8]) -> Self {
        let even: usize = raw.len() - raw.len() % 2;
        Self { raw: &raw[..even] }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len() / 2
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<i16> {
        if index >= self.len() {
            return None;
        }
        Some(self.raw.get_i16(index * 2))
    }

    pub fn iter(&self) -> impl Iterator<Item = i16> + 'a {
        let raw: &'a [u8] = self.raw;
        (0..raw.len() / 2).map(move |i| raw.get_i16(i * 2))
    }

    /// The sample bytes as stored.
    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.raw
    }
}
