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

//! One-beam-at-a-time walking of the `#MWC` packed beam region.
//!
//! Each beam is a header of `bytes_per_beam_entry` bytes, then
//! `num_sample_data` 8-bit amplitudes, then phase samples whose width is
//! selected by the receiver info's phase flag. The walker advances one
//! beam and hands the rest of the region back; it does not know how many
//! beams the region holds, so the caller supplies the iteration bound.

use crate::bytes::{FieldSlice, I8Samples, I16Samples, PackedView};
use crate::error::ReaderError;

/// Phase flag value for 8-bit phase samples.
pub const PHASE_LOW_RESOLUTION: u8 = 1;
/// Phase flag value for 16-bit phase samples.
pub const PHASE_HIGH_RESOLUTION: u8 = 2;

/// The fixed header leading one water-column beam.
#[derive(Debug, Copy, Clone)]
pub struct MwcBeamInfo<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for MwcBeamInfo<'a> {
    const SIZE: usize = 16;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl MwcBeamInfo<'_> {
    pub fn beam_point_angle_re_vertical_deg(&self) -> f32 {
        self.raw.get_f32(0)
    }

    pub fn start_range_sample_num(&self) -> u16 {
        self.raw.get_u16(4)
    }

    pub fn detected_range_in_samples(&self) -> u16 {
        self.raw.get_u16(6)
    }

    pub fn beam_tx_sector_num(&self) -> u16 {
        self.raw.get_u16(8)
    }

    /// Amplitude (and phase) samples stored for this beam.
    pub fn num_sample_data(&self) -> u16 {
        self.raw.get_u16(10)
    }

    pub fn detected_range_high_res(&self) -> f32 {
        self.raw.get_f32(12)
    }
}

/// One walked water-column beam.
///
/// Sample views are absent when the beam stores zero samples; the
/// header is valid either way.
#[derive(Debug)]
pub struct MwcBeam<'a> {
    pub header: MwcBeamInfo<'a>,
    /// 8-bit amplitudes, 0.5 dB steps.
    pub amplitudes: Option<I8Samples<'a>>,
    /// 8-bit phase samples, present when the phase flag is 1.
    pub phase_low: Option<I8Samples<'a>>,
    /// 16-bit phase samples, present when the phase flag is 2.
    pub phase_high: Option<I16Samples<'a>>,
}

/// Walks one beam off the front of `raw`.
///
/// Returns the beam view and the region advanced past it. A phase flag
/// outside the known values is read as no-phase, matching the sounder's
/// own decoder.
pub fn walk_beam<'a>(
    raw: &'a [u8],
    phase_flag: u8,
    bytes_per_header: usize,
) -> Result<(MwcBeam<'a>, &'a [u8]), ReaderError> {
    if bytes_per_header == 0 {
        log::debug!("beam entry size of zero cannot advance");
        return Err(ReaderError::BadData("beam entry size is zero"));
    }
    if bytes_per_header < MwcBeamInfo::SIZE {
        log::debug!(
            "beam entry size {} below header record of {}",
            bytes_per_header,
            MwcBeamInfo::SIZE
        );
        return Err(ReaderError::BadData("beam entry smaller than its header"));
    }
    if raw.len() < bytes_per_header {
        log::debug!("beam region ends inside a beam header");
        return Err(ReaderError::BadData("beam region ends inside a beam header"));
    }
    let header: MwcBeamInfo = MwcBeamInfo::wrap(&raw[..bytes_per_header]);
    let num_samples: usize = header.num_sample_data() as usize;

    if num_samples == 0 {
        return Ok((
            MwcBeam {
                header,
                amplitudes: None,
                phase_low: None,
                phase_high: None,
            },
            &raw[bytes_per_header..],
        ));
    }

    let phase_bytes: usize = match phase_flag {
        PHASE_LOW_RESOLUTION => num_samples,
        PHASE_HIGH_RESOLUTION => num_samples * 2,
        _ => 0,
    };
    let end: usize = bytes_per_header + num_samples + phase_bytes;
    if end > raw.len() {
        log::debug!(
            "beam wants {} sample bytes with {} left in region",
            num_samples + phase_bytes,
            raw.len() - bytes_per_header
        );
        return Err(ReaderError::BadData("beam region ends inside beam samples"));
    }

    let amplitudes: &[u8] = &raw[bytes_per_header..bytes_per_header + num_samples];
    let phase: &[u8] = &raw[bytes_per_header + num_samples..end];

    Ok((
        MwcBeam {
            header,
            amplitudes: Some(I8Samples::new(amplitudes)),
            phase_low: (phase_flag == PHASE_LOW_RESOLUTION).then(|| I8Samples::new(phase)),
            phase_high: (phase_flag == PHASE_HIGH_RESOLUTION).then(|| I16Samples::new(phase)),
        },
        &raw[end..],
    ))
}

/// Iterator over the beams of one `#MWC` datagram.
///
/// Yields exactly the receiver info's beam count, or stops after the
/// first malformed beam.
pub struct MwcBeamIter<'a> {
    raw: &'a [u8],
    beams_left: u16,
    phase_flag: u8,
    bytes_per_header: usize,
    poisoned: bool,
}

impl<'a> MwcBeamIter<'a> {
    pub(crate) fn new(raw: &'a [u8], num_beams: u16, phase_flag: u8, bytes_per_header: usize) -> Self {
        Self {
            raw,
            beams_left: num_beams,
            phase_flag,
            bytes_per_header,
            poisoned: false,
        }
    }
}

impl<'a> Iterator for MwcBeamIter<'a> {
    type Item = Result<MwcBeam<'a>, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.poisoned || self.beams_left == 0 {
            return None;
        }
        match walk_beam(self.raw, self.phase_flag, self.bytes_per_header) {
            Ok((beam, rest)) => {
                self.raw = rest;
                self.beams_left -= 1;
                Some(Ok(beam))
            }
            Err(e) => {
                self.poisoned = true;
                Some(Err(e))
            }
        }
    }
}
