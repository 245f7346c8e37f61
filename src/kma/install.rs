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

//! Installation, runtime-parameter, and BIST datagrams (`#IIP`, `#IOP`,
//! `#IBE`, `#IBR`, `#IBS`): a small common struct followed by a text
//! blob that runs to the end of the datagram.
//!
//! The text is not NUL-terminated on disk. Its start is found by
//! skipping the common part's own declared size, so a newer sounder that
//! grows the common part still parses.

use crate::bytes::{FieldSlice, PackedView, Walk};
use crate::error::ReaderError;
use std::borrow::Cow;

/// Common part of the `#IIP`/`#IOP` parameter datagrams.
#[derive(Debug, Copy, Clone)]
pub struct ParamCommon<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for ParamCommon<'a> {
    const SIZE: usize = 6;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl ParamCommon<'_> {
    /// Size of this part as stored.
    pub fn num_bytes_cmn_part(&self) -> u16 {
        self.raw.get_u16(0)
    }

    pub fn info(&self) -> u16 {
        self.raw.get_u16(2)
    }

    pub fn status(&self) -> u16 {
        self.raw.get_u16(4)
    }
}

/// An `#IIP` or `#IOP` datagram: common part plus parameter text.
#[derive(Debug, Copy, Clone)]
pub struct ParamText<'a> {
    pub common: ParamCommon<'a>,
    txt: &'a [u8],
}

impl<'a> ParamText<'a> {
    /// The parameter text as stored; empty when the datagram carries
    /// none, never absent.
    pub fn text_bytes(&self) -> &'a [u8] {
        self.txt
    }

    /// The parameter text, lossily decoded.
    pub fn text(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.txt)
    }
}

/// Common part of the BIST datagrams.
#[derive(Debug, Copy, Clone)]
pub struct BistCommon<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for BistCommon<'a> {
    const SIZE: usize = 6;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl BistCommon<'_> {
    /// Size of this part as stored.
    pub fn num_bytes_cmn_part(&self) -> u16 {
        self.raw.get_u16(0)
    }

    pub fn bist_info(&self) -> u8 {
        self.raw.get_u8(2)
    }

    pub fn bist_style(&self) -> u8 {
        self.raw.get_u8(3)
    }

    /// Which test this report belongs to.
    pub fn bist_number(&self) -> u8 {
        self.raw.get_u8(4)
    }

    /// Negative on failure, as reported by the test.
    pub fn bist_status(&self) -> i8 {
        self.raw.get_i8(5)
    }
}

/// An `#IBE`, `#IBR`, or `#IBS` datagram: common part plus report text.
#[derive(Debug, Copy, Clone)]
pub struct Bist<'a> {
    pub common: BistCommon<'a>,
    txt: &'a [u8],
}

impl<'a> Bist<'a> {
    /// The report text as stored; empty when the test emitted none.
    pub fn text_bytes(&self) -> &'a [u8] {
        self.txt
    }

    /// The report text, lossily decoded.
    pub fn text(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.txt)
    }
}

pub(crate) fn layout_param_text(body: &[u8]) -> Result<ParamText<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let common: ParamCommon =
        walk.sized_view(|c: &ParamCommon| c.num_bytes_cmn_part() as usize, "parameter common part")?;

    Ok(ParamText {
        common,
        txt: walk.rest(),
    })
}

pub(crate) fn layout_bist(body: &[u8]) -> Result<Bist<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let common: BistCommon =
        walk.sized_view(|c: &BistCommon| c.num_bytes_cmn_part() as usize, "BIST common part")?;

    Ok(Bist {
        common,
        txt: walk.rest(),
    })
}
