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

//! The current-datagram view for the EMX reader.

use super::bathy::{EmxRawRangeAngle, EmxSidescan, EmxWaterColumn, EmxXyzDepth};
use super::header::EmxHeader;
use super::nav::{
    EmxAttitude, EmxClock, EmxHeading, EmxHeight, EmxPosition, EmxRuntime, EmxSoundSpeedProfile,
    EmxSurfaceSoundSpeed, EmxText,
};

/// One parsed EMX datagram.
///
/// Borrowed from the reader that produced it; valid until the next
/// `read()` or `close()` on that reader.
#[derive(Debug)]
pub struct EmxDgm<'a> {
    /// The fixed header, copied out of the frame.
    pub header: EmxHeader,
    /// The typed body laid out over the reader's buffer.
    pub body: EmxBody<'a>,
}

/// The per-kind body of an EMX datagram.
#[derive(Debug)]
pub enum EmxBody<'a> {
    /// `'I'` installation parameters.
    Install(EmxText<'a>),
    /// `'R'` runtime parameters.
    Runtime(EmxRuntime<'a>),
    /// `'P'` position.
    Position(EmxPosition<'a>),
    /// `'A'` attitude samples.
    Attitude(EmxAttitude<'a>),
    /// `'C'` external clock.
    Clock(EmxClock<'a>),
    /// `'h'` height.
    Height(EmxHeight<'a>),
    /// `'H'` heading samples.
    Heading(EmxHeading<'a>),
    /// `'G'` surface sound speed samples.
    SurfaceSoundSpeed(EmxSurfaceSoundSpeed<'a>),
    /// `'U'` sound speed profile.
    SoundSpeedProfile(EmxSoundSpeedProfile<'a>),
    /// `'X'` depth per beam.
    XyzDepth(EmxXyzDepth<'a>),
    /// `'N'` raw range and beam angle.
    RawRangeAngle(EmxRawRangeAngle<'a>),
    /// `'Y'` sidescan samples.
    Sidescan(EmxSidescan<'a>),
    /// `'k'` water column samples.
    WaterColumn(EmxWaterColumn<'a>),
    /// A type byte outside the catalogue; the raw body, header-framed
    /// but not interpreted.
    Unknown(&'a [u8]),
}
