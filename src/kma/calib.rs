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

//! The `#FCF` backscatter calibration file datagram: a whole calibration
//! file carried inline, with its name in a fixed 64-byte region.

use super::dgm::Partition;
use crate::bytes::{FieldSlice, PackedView, Walk};
use crate::error::ReaderError;
use std::borrow::Cow;

/// Common part of an `#FCF` datagram.
#[derive(Debug, Copy, Clone)]
pub struct FcfCommon<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for FcfCommon<'a> {
    const SIZE: usize = 72;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl<'a> FcfCommon<'a> {
    /// Size of this part as stored.
    pub fn num_bytes_cmn_part(&self) -> u16 {
        self.raw.get_u16(0)
    }

    /// Negative when the sounder could not apply the file.
    pub fn file_status(&self) -> i8 {
        self.raw.get_i8(2)
    }

    /// Length of the carried file in bytes.
    pub fn num_bytes_file(&self) -> u32 {
        self.raw.get_u32(4)
    }

    /// The file name: the bytes before the first NUL of the fixed
    /// 64-byte name region.
    pub fn file_name_bytes(&self) -> &'a [u8] {
        let region: &[u8] = &self.raw[8..8 + 64];
        match region.iter().position(|b| *b == 0) {
            Some(nul) => &region[..nul],
            None => region,
        }
    }

    /// The file name, lossily decoded.
    pub fn file_name(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.file_name_bytes())
    }
}

/// An `#FCF` calibration file datagram.
#[derive(Debug, Copy, Clone)]
pub struct Fcf<'a> {
    pub partition: Partition<'a>,
    pub common: FcfCommon<'a>,
    file: &'a [u8],
}

impl<'a> Fcf<'a> {
    /// The raw bytes of the carried calibration file.
    pub fn file_bytes(&self) -> &'a [u8] {
        self.file
    }
}

pub(crate) fn layout_fcf(body: &[u8]) -> Result<Fcf<'_>, ReaderError> {
    let mut walk = Walk::new(body);

    let partition: Partition = walk.view(Partition::SIZE, "FCF partition")?;
    partition.require_unsplit()?;

    let common: FcfCommon =
        walk.sized_view(|c: &FcfCommon| c.num_bytes_cmn_part() as usize, "FCF common part")?;
    let file: &[u8] = walk.take(common.num_bytes_file() as usize, "FCF file bytes")?;

    Ok(Fcf { partition, common, file })
}
