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

//! The EMX parameter and navigation-sensor datagrams: installation and
//! runtime parameters, position, attitude, clock, height, heading,
//! surface sound speed, and the sound speed profile.
//!
//! Most scaled fields keep the stored integer units in their names
//! (`_01deg` is hundredths of a degree, `_dm` decimetres, `_cm`
//! centimetres); convenience accessors decode the common ones.

use crate::bytes::{FieldSlice, PackedArray, PackedView, Walk};
use crate::error::ReaderError;
use std::borrow::Cow;

/// An `'I'` installation parameters record: comma-separated parameter
/// text filling the record body.
#[derive(Debug, Copy, Clone)]
pub struct EmxText<'a> {
    raw: &'a [u8],
}

impl<'a> EmxText<'a> {
    /// The parameter text as stored; empty when the record carries none.
    pub fn text_bytes(&self) -> &'a [u8] {
        self.raw
    }

    /// The parameter text, lossily decoded, trailing NUL padding
    /// stripped.
    pub fn text(&self) -> Cow<'a, str> {
        let end: usize = self
            .raw
            .iter()
            .rposition(|b| *b != 0)
            .map_or(0, |last| last + 1);
        String::from_utf8_lossy(&self.raw[..end])
    }
}

pub(crate) fn layout_text(body: &[u8]) -> Result<EmxText<'_>, ReaderError> {
    Ok(EmxText { raw: body })
}

/// An `'R'` runtime parameters record.
#[derive(Debug, Copy, Clone)]
pub struct EmxRuntime<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxRuntime<'a> {
    const SIZE: usize = 32;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxRuntime<'_> {
    pub fn operator_station_status(&self) -> u8 {
        self.raw.get_u8(0)
    }

    pub fn processing_unit_status(&self) -> u8 {
        self.raw.get_u8(1)
    }

    pub fn bsp_status(&self) -> u8 {
        self.raw.get_u8(2)
    }

    pub fn sonar_head_status(&self) -> u8 {
        self.raw.get_u8(3)
    }

    pub fn mode(&self) -> u8 {
        self.raw.get_u8(4)
    }

    pub fn filter_id(&self) -> u8 {
        self.raw.get_u8(5)
    }

    pub fn min_depth_m(&self) -> u16 {
        self.raw.get_u16(6)
    }

    pub fn max_depth_m(&self) -> u16 {
        self.raw.get_u16(8)
    }

    /// Absorption coefficient in hundredths of dB per km.
    pub fn absorption_coeff_001db_per_km(&self) -> u16 {
        self.raw.get_u16(10)
    }

    pub fn tx_pulse_length_us(&self) -> u16 {
        self.raw.get_u16(12)
    }

    pub fn tx_beamwidth_01deg(&self) -> u16 {
        self.raw.get_u16(14)
    }

    pub fn tx_power_re_max_db(&self) -> i8 {
        self.raw.get_i8(16)
    }

    pub fn rx_beamwidth_01deg(&self) -> u8 {
        self.raw.get_u8(17)
    }

    pub fn rx_bandwidth_50hz(&self) -> u8 {
        self.raw.get_u8(18)
    }

    pub fn rx_fixed_gain_db(&self) -> u8 {
        self.raw.get_u8(19)
    }

    pub fn tvg_law_crossover_deg(&self) -> u8 {
        self.raw.get_u8(20)
    }

    pub fn source_of_sound_speed(&self) -> u8 {
        self.raw.get_u8(21)
    }

    pub fn max_port_swath_width_m(&self) -> u16 {
        self.raw.get_u16(22)
    }

    pub fn beam_spacing(&self) -> u8 {
        self.raw.get_u8(24)
    }

    pub fn max_port_coverage_deg(&self) -> u8 {
        self.raw.get_u8(25)
    }

    pub fn yaw_pitch_stab_mode(&self) -> u8 {
        self.raw.get_u8(26)
    }

    pub fn max_starb_coverage_deg(&self) -> u8 {
        self.raw.get_u8(27)
    }

    pub fn max_starb_swath_width_m(&self) -> u16 {
        self.raw.get_u16(28)
    }
}

pub(crate) fn layout_runtime(body: &[u8]) -> Result<EmxRuntime<'_>, ReaderError> {
    Walk::new(body).view(EmxRuntime::SIZE, "runtime parameters record")
}

/// A `'P'` position record.
#[derive(Debug, Copy, Clone)]
pub struct EmxPositionFix<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxPositionFix<'a> {
    const SIZE: usize = 18;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxPositionFix<'_> {
    /// Latitude in 1e-7 degree steps, positive north.
    pub fn latitude_1e7(&self) -> i32 {
        self.raw.get_i32(0)
    }

    /// Longitude in 1e-7 degree steps, positive east.
    pub fn longitude_1e7(&self) -> i32 {
        self.raw.get_i32(4)
    }

    pub fn latitude_deg(&self) -> f64 {
        f64::from(self.latitude_1e7()) / 1e7
    }

    pub fn longitude_deg(&self) -> f64 {
        f64::from(self.longitude_1e7()) / 1e7
    }

    pub fn fix_quality_cm(&self) -> u16 {
        self.raw.get_u16(8)
    }

    pub fn speed_cm_per_sec(&self) -> u16 {
        self.raw.get_u16(10)
    }

    pub fn course_01deg(&self) -> u16 {
        self.raw.get_u16(12)
    }

    pub fn heading_01deg(&self) -> u16 {
        self.raw.get_u16(14)
    }

    /// Which positioning system produced the fix.
    pub fn pos_system_descriptor(&self) -> u8 {
        self.raw.get_u8(16)
    }

    /// Length of the trailing input sentence.
    pub fn num_input_bytes(&self) -> u8 {
        self.raw.get_u8(17)
    }
}

/// A `'P'` position record: decoded fix plus the input sentence that
/// produced it.
#[derive(Debug, Copy, Clone)]
pub struct EmxPosition<'a> {
    pub fix: EmxPositionFix<'a>,
    input: &'a [u8],
}

impl<'a> EmxPosition<'a> {
    /// The position sentence as received from the sensor.
    pub fn input_bytes(&self) -> &'a [u8] {
        self.input
    }
}

pub(crate) fn layout_position(body: &[u8]) -> Result<EmxPosition<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let fix: EmxPositionFix = walk.view(EmxPositionFix::SIZE, "position record")?;
    let input: &[u8] = walk.take(fix.num_input_bytes() as usize, "position input sentence")?;

    Ok(EmxPosition { fix, input })
}

/// One attitude sample of an `'A'` record.
#[derive(Debug, Copy, Clone)]
pub struct EmxAttitudeSample<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxAttitudeSample<'a> {
    const SIZE: usize = 12;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxAttitudeSample<'_> {
    /// Milliseconds since the record's header time.
    pub fn time_ms(&self) -> u16 {
        self.raw.get_u16(0)
    }

    pub fn sensor_status(&self) -> u16 {
        self.raw.get_u16(2)
    }

    pub fn roll_01deg(&self) -> i16 {
        self.raw.get_i16(4)
    }

    pub fn pitch_01deg(&self) -> i16 {
        self.raw.get_i16(6)
    }

    pub fn heave_cm(&self) -> i16 {
        self.raw.get_i16(8)
    }

    pub fn heading_01deg(&self) -> u16 {
        self.raw.get_u16(10)
    }
}

/// An `'A'` attitude record.
#[derive(Debug)]
pub struct EmxAttitude<'a> {
    num_entries: u16,
    /// Absent when the record holds zero samples.
    pub samples: Option<PackedArray<'a, EmxAttitudeSample<'a>>>,
}

impl EmxAttitude<'_> {
    pub fn num_entries(&self) -> u16 {
        self.num_entries
    }
}

pub(crate) fn layout_attitude(body: &[u8]) -> Result<EmxAttitude<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let count: u16 = walk.take(2, "attitude sample count")?.get_u16(0);
    let samples: Option<PackedArray<EmxAttitudeSample>> =
        walk.array(count as usize, EmxAttitudeSample::SIZE, "attitude samples")?;

    Ok(EmxAttitude {
        num_entries: count,
        samples,
    })
}

/// A `'C'` external clock record.
#[derive(Debug, Copy, Clone)]
pub struct EmxClock<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxClock<'a> {
    const SIZE: usize = 9;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxClock<'_> {
    /// External clock date as decimal YYYYMMDD.
    pub fn date(&self) -> u32 {
        self.raw.get_u32(0)
    }

    /// External clock milliseconds since midnight.
    pub fn time_ms(&self) -> u32 {
        self.raw.get_u32(4)
    }

    /// Nonzero when the 1 PPS line disciplined this timestamp.
    pub fn pps_used(&self) -> u8 {
        self.raw.get_u8(8)
    }
}

pub(crate) fn layout_clock(body: &[u8]) -> Result<EmxClock<'_>, ReaderError> {
    Walk::new(body).view(EmxClock::SIZE, "clock record")
}

/// An `'h'` height record.
#[derive(Debug, Copy, Clone)]
pub struct EmxHeight<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxHeight<'a> {
    const SIZE: usize = 5;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxHeight<'_> {
    pub fn height_cm(&self) -> i32 {
        self.raw.get_i32(0)
    }

    pub fn height_type(&self) -> u8 {
        self.raw.get_u8(4)
    }
}

pub(crate) fn layout_height(body: &[u8]) -> Result<EmxHeight<'_>, ReaderError> {
    Walk::new(body).view(EmxHeight::SIZE, "height record")
}

/// One heading sample of an `'H'` record.
#[derive(Debug, Copy, Clone)]
pub struct EmxHeadingSample<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxHeadingSample<'a> {
    const SIZE: usize = 4;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxHeadingSample<'_> {
    /// Milliseconds since the record's header time.
    pub fn time_ms(&self) -> u16 {
        self.raw.get_u16(0)
    }

    pub fn heading_01deg(&self) -> u16 {
        self.raw.get_u16(2)
    }
}

/// An `'H'` heading record.
#[derive(Debug)]
pub struct EmxHeading<'a> {
    num_entries: u16,
    /// Absent when the record holds zero samples.
    pub samples: Option<PackedArray<'a, EmxHeadingSample<'a>>>,
}

impl EmxHeading<'_> {
    pub fn num_entries(&self) -> u16 {
        self.num_entries
    }
}

pub(crate) fn layout_heading(body: &[u8]) -> Result<EmxHeading<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let count: u16 = walk.take(2, "heading sample count")?.get_u16(0);
    let samples: Option<PackedArray<EmxHeadingSample>> =
        walk.array(count as usize, EmxHeadingSample::SIZE, "heading samples")?;

    Ok(EmxHeading {
        num_entries: count,
        samples,
    })
}

/// One surface sound speed sample of a `'G'` record.
#[derive(Debug, Copy, Clone)]
pub struct EmxSurfaceSoundSpeedSample<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxSurfaceSoundSpeedSample<'a> {
    const SIZE: usize = 4;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxSurfaceSoundSpeedSample<'_> {
    /// Seconds since the record's header time.
    pub fn time_sec(&self) -> u16 {
        self.raw.get_u16(0)
    }

    /// Sound speed in decimetres per second.
    pub fn sound_speed_dm_per_sec(&self) -> u16 {
        self.raw.get_u16(2)
    }
}

/// A `'G'` surface sound speed record.
#[derive(Debug)]
pub struct EmxSurfaceSoundSpeed<'a> {
    num_entries: u16,
    /// Absent when the record holds zero samples.
    pub samples: Option<PackedArray<'a, EmxSurfaceSoundSpeedSample<'a>>>,
}

impl EmxSurfaceSoundSpeed<'_> {
    pub fn num_entries(&self) -> u16 {
        self.num_entries
    }
}

pub(crate) fn layout_surface_sound_speed(body: &[u8]) -> Result<EmxSurfaceSoundSpeed<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let count: u16 = walk.take(2, "surface sound speed sample count")?.get_u16(0);
    let samples: Option<PackedArray<EmxSurfaceSoundSpeedSample>> = walk.array(
        count as usize,
        EmxSurfaceSoundSpeedSample::SIZE,
        "surface sound speed samples",
    )?;

    Ok(EmxSurfaceSoundSpeed {
        num_entries: count,
        samples,
    })
}

/// Info part of a `'U'` sound speed profile record.
#[derive(Debug, Copy, Clone)]
pub struct EmxProfileInfo<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxProfileInfo<'a> {
    const SIZE: usize = 12;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxProfileInfo<'_> {
    /// Date the profile was taken, decimal YYYYMMDD.
    pub fn date(&self) -> u32 {
        self.raw.get_u32(0)
    }

    /// Milliseconds since midnight the profile was taken.
    pub fn time_ms(&self) -> u32 {
        self.raw.get_u32(4)
    }

    pub fn num_samples(&self) -> u16 {
        self.raw.get_u16(8)
    }

    pub fn depth_resolution_cm(&self) -> u16 {
        self.raw.get_u16(10)
    }
}

/// One depth point of a `'U'` sound speed profile.
#[derive(Debug, Copy, Clone)]
pub struct EmxProfileSample<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxProfileSample<'a> {
    const SIZE: usize = 8;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxProfileSample<'_> {
    pub fn depth_cm(&self) -> u32 {
        self.raw.get_u32(0)
    }

    /// Sound speed in decimetres per second.
    pub fn sound_speed_dm_per_sec(&self) -> u32 {
        self.raw.get_u32(4)
    }
}

/// A `'U'` sound speed profile record.
#[derive(Debug)]
pub struct EmxSoundSpeedProfile<'a> {
    pub info: EmxProfileInfo<'a>,
    /// Absent when the profile holds zero points.
    pub samples: Option<PackedArray<'a, EmxProfileSample<'a>>>,
}

pub(crate) fn layout_sound_speed_profile(body: &[u8]) -> Result<EmxSoundSpeedProfile<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let info: EmxProfileInfo = walk.view(EmxProfileInfo::SIZE, "sound speed profile info")?;
    let samples: Option<PackedArray<EmxProfileSample>> = walk.array(
        info.num_samples() as usize,
        EmxProfileSample::SIZE,
        "sound speed profile samples",
    )?;

    Ok(EmxSoundSpeedProfile { info, samples })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_text_strips_nul_padding() {
        let body: &[u8] = b"WLZ=4.2,SMH=110,\0";
        let text: EmxText = layout_text(body).unwrap();

        assert_eq!(text.text_bytes(), body);
        assert_eq!(text.text(), "WLZ=4.2,SMH=110,");
    }

    #[test]
    fn empty_install_text_is_empty() {
        let text: EmxText = layout_text(b"").unwrap();
        assert!(text.text_bytes().is_empty());
        assert_eq!(text.text(), "");
    }

    #[test]
    fn runtime_fields() {
        let mut body: Vec<u8> = vec![0u8; EmxRuntime::SIZE];
        body[4] = 3; // mode
        body[6..8].copy_from_slice(&5u16.to_le_bytes()); // min depth
        body[8..10].copy_from_slice(&800u16.to_le_bytes()); // max depth
        body[16] = 0xfb; // tx power -5 dB

        let runtime: EmxRuntime = layout_runtime(&body).unwrap();
        assert_eq!(runtime.mode(), 3);
        assert_eq!(runtime.min_depth_m(), 5);
        assert_eq!(runtime.max_depth_m(), 800);
        assert_eq!(runtime.tx_power_re_max_db(), -5);
    }

    #[test]
    fn position_with_input_sentence() {
        let sentence: &[u8] = b"$INGGA,stub";
        let mut body: Vec<u8> = vec![0u8; EmxPositionFix::SIZE];
        body[0..4].copy_from_slice(&631_500_000i32.to_le_bytes());
        body[4..8].copy_from_slice(&(-75_000_000i32).to_le_bytes());
        body[17] = sentence.len() as u8;
        body.extend_from_slice(sentence);

        let position: EmxPosition = layout_position(&body).unwrap();
        assert_eq!(position.fix.latitude_deg(), 63.15);
        assert_eq!(position.fix.longitude_deg(), -7.5);
        assert_eq!(position.input_bytes(), sentence);
    }

    #[test]
    fn position_lying_input_length_is_bad_data() {
        let mut body: Vec<u8> = vec![0u8; EmxPositionFix::SIZE];
        body[17] = 200;
        body.extend_from_slice(b"short");

        assert!(matches!(layout_position(&body), Err(ReaderError::BadData(_))));
    }

    #[test]
    fn attitude_samples() {
        let mut body: Vec<u8> = vec![];
        body.extend_from_slice(&2u16.to_le_bytes());
        for i in 0..2i16 {
            let mut sample: Vec<u8> = vec![0u8; EmxAttitudeSample::SIZE];
            sample[0..2].copy_from_slice(&(i as u16 * 10).to_le_bytes());
            sample[4..6].copy_from_slice(&(150 * (i + 1)).to_le_bytes()); // roll
            body.extend_from_slice(&sample);
        }

        let attitude: EmxAttitude = layout_attitude(&body).unwrap();
        assert_eq!(attitude.num_entries(), 2);
        let samples = attitude.samples.unwrap();
        assert_eq!(samples.get(1).unwrap().roll_01deg(), 300);
        assert_eq!(samples.get(1).unwrap().time_ms(), 10);
    }

    #[test]
    fn attitude_zero_samples_is_absent() {
        let body: Vec<u8> = 0u16.to_le_bytes().to_vec();
        let attitude: EmxAttitude = layout_attitude(&body).unwrap();

        assert_eq!(attitude.num_entries(), 0);
        assert!(attitude.samples.is_none());
    }

    #[test]
    fn clock_and_height() {
        let mut body: Vec<u8> = vec![];
        body.extend_from_slice(&20260704u32.to_le_bytes());
        body.extend_from_slice(&1000u32.to_le_bytes());
        body.push(1);
        let clock: EmxClock = layout_clock(&body).unwrap();
        assert_eq!(clock.date(), 20260704);
        assert_eq!(clock.pps_used(), 1);

        let mut body: Vec<u8> = vec![];
        body.extend_from_slice(&(-250i32).to_le_bytes());
        body.push(2);
        let height: EmxHeight = layout_height(&body).unwrap();
        assert_eq!(height.height_cm(), -250);
        assert_eq!(height.height_type(), 2);
    }

    #[test]
    fn profile_points() {
        let mut body: Vec<u8> = vec![0u8; EmxProfileInfo::SIZE];
        body[0..4].copy_from_slice(&20260101u32.to_le_bytes());
        body[8..10].copy_from_slice(&2u16.to_le_bytes());
        for i in 0..2u32 {
            body.extend_from_slice(&(i * 500).to_le_bytes());
            body.extend_from_slice(&(14_800 + i).to_le_bytes());
        }

        let profile: EmxSoundSpeedProfile = layout_sound_speed_profile(&body).unwrap();
        let samples = profile.samples.unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples.get(1).unwrap().depth_cm(), 500);
        assert_eq!(samples.get(1).unwrap().sound_speed_dm_per_sec(), 14_801);
    }

    #[test]
    fn profile_truncated_samples_is_bad_data() {
        let mut body: Vec<u8> = vec![0u8; EmxProfileInfo::SIZE];
        body[8..10].copy_from_slice(&4u16.to_le_bytes());
        body.extend_from_slice(&[0u8; 8]); // one point, four declared

        assert!(matches!(
            layout_sound_speed_profile(&body),
            Err(ReaderError::BadData(_))
        ));
    }
}
