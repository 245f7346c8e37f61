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

//! The sensor datagrams: external-sensor values forwarded by the
//! sounder (`#SPO`, `#SKM`, `#SVP`, `#SVT`, `#SCL`, `#SDE`, `#SHI`,
//! `#CPO`) and the compatibility heave datagram `#CHE`.
//!
//! The `S`-group datagrams share a shape: the sensor common part, a
//! decoded data struct (version-selected where the layout changed), and
//! the raw bytes as received from the sensor, kept verbatim to the end
//! of the datagram.

use super::dgm::{MCommon, SCommon};
use crate::bytes::{FieldSlice, PackedArray, PackedView, Walk};
use crate::error::ReaderError;

// ---------- Position (SPO / CPO) ---------- //

/// Decoded position data, shared by `#SPO` and `#CPO`.
#[derive(Debug, Copy, Clone)]
pub struct PositionData<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for PositionData<'a> {
    const SIZE: usize = 40;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl PositionData<'_> {
    pub fn time_from_sensor_sec(&self) -> u32 {
        self.raw.get_u32(0)
    }

    pub fn time_from_sensor_nanosec(&self) -> u32 {
        self.raw.get_u32(4)
    }

    pub fn pos_fix_quality_m(&self) -> f32 {
        self.raw.get_f32(8)
    }

    /// Motion-corrected latitude, decimal degrees.
    pub fn corrected_lat_deg(&self) -> f64 {
        self.raw.get_f64(12)
    }

    /// Motion-corrected longitude, decimal degrees.
    pub fn corrected_long_deg(&self) -> f64 {
        self.raw.get_f64(20)
    }

    pub fn speed_over_ground_m_per_sec(&self) -> f32 {
        self.raw.get_f32(28)
    }

    pub fn course_over_ground_deg(&self) -> f32 {
        self.raw.get_f32(32)
    }

    pub fn ellipsoid_height_re_ref_point_m(&self) -> f32 {
        self.raw.get_f32(36)
    }
}

/// An `#SPO` sensor position datagram.
#[derive(Debug, Copy, Clone)]
pub struct Spo<'a> {
    pub common: SCommon<'a>,
    pub data: PositionData<'a>,
    raw_sensor_data: &'a [u8],
}

impl<'a> Spo<'a> {
    /// The position sentence as received from the sensor, unterminated.
    pub fn raw_sensor_data(&self) -> &'a [u8] {
        self.raw_sensor_data
    }
}

/// A `#CPO` compatibility position datagram.
#[derive(Debug, Copy, Clone)]
pub struct Cpo<'a> {
    pub common: SCommon<'a>,
    pub data: PositionData<'a>,
    raw_sensor_data: &'a [u8],
}

impl<'a> Cpo<'a> {
    pub fn raw_sensor_data(&self) -> &'a [u8] {
        self.raw_sensor_data
    }
}

// ---------- Clock (SCL) ---------- //

/// Decoded clock data of an `#SCL` datagram.
#[derive(Debug, Copy, Clone)]
pub struct SclData<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for SclData<'a> {
    const SIZE: usize = 8;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl SclData<'_> {
    /// Offset of the sensor clock from the sounder clock, seconds.
    pub fn offset_sec(&self) -> f32 {
        self.raw.get_f32(0)
    }

    pub fn clock_dev_pu_nanosec(&self) -> i32 {
        self.raw.get_i32(4)
    }
}

/// An `#SCL` sensor clock datagram.
#[derive(Debug, Copy, Clone)]
pub struct Scl<'a> {
    pub common: SCommon<'a>,
    pub data: SclData<'a>,
    raw_sensor_data: &'a [u8],
}

impl<'a> Scl<'a> {
    pub fn raw_sensor_data(&self) -> &'a [u8] {
        self.raw_sensor_data
    }
}

// ---------- Depth (SDE) ---------- //

/// Decoded depth data, layout revision 0.
#[derive(Debug, Copy, Clone)]
pub struct SdeDataV0<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for SdeDataV0<'a> {
    const SIZE: usize = 28;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl SdeDataV0<'_> {
    pub fn depth_used_m(&self) -> f32 {
        self.raw.get_f32(0)
    }

    pub fn offset_m(&self) -> f32 {
        self.raw.get_f32(4)
    }

    pub fn scale(&self) -> f32 {
        self.raw.get_f32(8)
    }

    pub fn latitude_deg(&self) -> f64 {
        self.raw.get_f64(12)
    }

    pub fn longitude_deg(&self) -> f64 {
        self.raw.get_f64(20)
    }
}

/// Decoded depth data, layout revision 1: the raw sensor depth was
/// inserted after the used depth.
#[derive(Debug, Copy, Clone)]
pub struct SdeDataV1<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for SdeDataV1<'a> {
    const SIZE: usize = 32;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl SdeDataV1<'_> {
    pub fn depth_used_m(&self) -> f32 {
        self.raw.get_f32(0)
    }

    pub fn depth_raw_m(&self) -> f32 {
        self.raw.get_f32(4)
    }

    pub fn offset_m(&self) -> f32 {
        self.raw.get_f32(8)
    }

    pub fn scale(&self) -> f32 {
        self.raw.get_f32(12)
    }

    pub fn latitude_deg(&self) -> f64 {
        self.raw.get_f64(16)
    }

    pub fn longitude_deg(&self) -> f64 {
        self.raw.get_f64(24)
    }
}

/// The `#SDE` data struct, selected by `dgm_version`.
#[derive(Debug, Copy, Clone)]
pub enum SdeData<'a> {
    V0(SdeDataV0<'a>),
    V1(SdeDataV1<'a>),
}

impl SdeData<'_> {
    /// The depth applied by the sounder, whichever revision carries it.
    pub fn depth_used_m(&self) -> f32 {
        match self {
            SdeData::V0(data) => data.depth_used_m(),
            SdeData::V1(data) => data.depth_used_m(),
        }
    }
}

/// An `#SDE` sensor depth datagram.
#[derive(Debug, Copy, Clone)]
pub struct Sde<'a> {
    pub common: SCommon<'a>,
    pub data: SdeData<'a>,
    raw_sensor_data: &'a [u8],
}

impl<'a> Sde<'a> {
    pub fn raw_sensor_data(&self) -> &'a [u8] {
        self.raw_sensor_data
    }
}

// ---------- Height (SHI) ---------- //

/// Decoded height data of an `#SHI` datagram.
#[derive(Debug, Copy, Clone)]
pub struct ShiData<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for ShiData<'a> {
    const SIZE: usize = 6;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl ShiData<'_> {
    pub fn sensor_type(&self) -> u16 {
        self.raw.get_u16(0)
    }

    pub fn height_used_m(&self) -> f32 {
        self.raw.get_f32(2)
    }
}

/// An `#SHI` sensor height datagram.
#[derive(Debug, Copy, Clone)]
pub struct Shi<'a> {
    pub common: SCommon<'a>,
    pub data: ShiData<'a>,
    raw_sensor_data: &'a [u8],
}

impl<'a> Shi<'a> {
    pub fn raw_sensor_data(&self) -> &'a [u8] {
        self.raw_sensor_data
    }
}

// ---------- Attitude (SKM) ---------- //

/// Info part of an `#SKM` attitude datagram.
#[derive(Debug, Copy, Clone)]
pub struct SkmInfo<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for SkmInfo<'a> {
    const SIZE: usize = 12;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl SkmInfo<'_> {
    /// Size of this part as stored.
    pub fn num_bytes_info_part(&self) -> u16 {
        self.raw.get_u16(0)
    }

    pub fn sensor_system(&self) -> u8 {
        self.raw.get_u8(2)
    }

    pub fn sensor_status(&self) -> u8 {
        self.raw.get_u8(3)
    }

    pub fn sensor_input_format(&self) -> u16 {
        self.raw.get_u16(4)
    }

    pub fn num_samples_array(&self) -> u16 {
        self.raw.get_u16(6)
    }

    pub fn num_bytes_per_sample(&self) -> u16 {
        self.raw.get_u16(8)
    }

    pub fn sensor_data_contents(&self) -> u16 {
        self.raw.get_u16(10)
    }
}

/// One binary attitude sample.
#[derive(Debug, Copy, Clone)]
pub struct SkmSample<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for SkmSample<'a> {
    const SIZE: usize = 48;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl SkmSample<'_> {
    pub fn time_sec(&self) -> u32 {
        self.raw.get_u32(0)
    }

    pub fn time_nanosec(&self) -> u32 {
        self.raw.get_u32(4)
    }

    pub fn km_status(&self) -> u32 {
        self.raw.get_u32(8)
    }

    pub fn latitude_deg(&self) -> f64 {
        self.raw.get_f64(12)
    }

    pub fn longitude_deg(&self) -> f64 {
        self.raw.get_f64(20)
    }

    pub fn ellipsoid_height_m(&self) -> f32 {
        self.raw.get_f32(28)
    }

    pub fn roll_deg(&self) -> f32 {
        self.raw.get_f32(32)
    }

    pub fn pitch_deg(&self) -> f32 {
        self.raw.get_f32(36)
    }

    pub fn heading_deg(&self) -> f32 {
        self.raw.get_f32(40)
    }

    pub fn heave_m(&self) -> f32 {
        self.raw.get_f32(44)
    }
}

/// An `#SKM` attitude datagram.
#[derive(Debug)]
pub struct Skm<'a> {
    pub info: SkmInfo<'a>,
    /// Absent when the datagram carries zero samples.
    pub samples: Option<PackedArray<'a, SkmSample<'a>>>,
}

// ---------- Sound Velocity (SVP / SVT) ---------- //

/// Info part of an `#SVP` profile datagram.
#[derive(Debug, Copy, Clone)]
pub struct SvpInfo<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for SvpInfo<'a> {
    const SIZE: usize = 28;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl SvpInfo<'_> {
    /// Size of this part as stored.
    pub fn num_bytes_cmn_part(&self) -> u16 {
        self.raw.get_u16(0)
    }

    pub fn num_samples(&self) -> u16 {
        self.raw.get_u16(2)
    }

    pub fn num_bytes_per_sample(&self) -> u16 {
        self.raw.get_u16(4)
    }

    pub fn sensor_format(&self) -> u16 {
        self.raw.get_u16(6)
    }

    /// UTC time the profile was taken, seconds since the Unix epoch.
    pub fn time_sec(&self) -> u32 {
        self.raw.get_u32(8)
    }

    pub fn latitude_deg(&self) -> f64 {
        self.raw.get_f64(12)
    }

    pub fn longitude_deg(&self) -> f64 {
        self.raw.get_f64(20)
    }
}

/// One depth point of a sound velocity profile.
#[derive(Debug, Copy, Clone)]
pub struct SvpSample<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for SvpSample<'a> {
    const SIZE: usize = 20;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl SvpSample<'_> {
    pub fn depth_m(&self) -> f32 {
        self.raw.get_f32(0)
    }

    pub fn sound_velocity_m_per_sec(&self) -> f32 {
        self.raw.get_f32(4)
    }

    pub fn temp_c(&self) -> f32 {
        self.raw.get_f32(12)
    }

    pub fn salinity(&self) -> f32 {
        self.raw.get_f32(16)
    }
}

/// An `#SVP` sound velocity profile datagram.
#[derive(Debug)]
pub struct Svp<'a> {
    pub info: SvpInfo<'a>,
    /// Absent when the profile holds zero points.
    pub samples: Option<PackedArray<'a, SvpSample<'a>>>,
}

/// Info part of an `#SVT` transducer sound velocity datagram.
#[derive(Debug, Copy, Clone)]
pub struct SvtInfo<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for SvtInfo<'a> {
    const SIZE: usize = 20;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl SvtInfo<'_> {
    /// Size of this part as stored.
    pub fn num_bytes_info_part(&self) -> u16 {
        self.raw.get_u16(0)
    }

    pub fn sensor_status(&self) -> u16 {
        self.raw.get_u16(2)
    }

    pub fn sensor_input_format(&self) -> u16 {
        self.raw.get_u16(4)
    }

    pub fn num_samples_array(&self) -> u16 {
        self.raw.get_u16(6)
    }

    pub fn num_bytes_per_sample(&self) -> u16 {
        self.raw.get_u16(8)
    }

    pub fn sensor_data_contents(&self) -> u16 {
        self.raw.get_u16(10)
    }

    pub fn filter_time_sec(&self) -> f32 {
        self.raw.get_f32(12)
    }

    pub fn sound_velocity_offset_m_per_sec(&self) -> f32 {
        self.raw.get_f32(16)
    }
}

/// One transducer sound velocity sample.
#[derive(Debug, Copy, Clone)]
pub struct SvtSample<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for SvtSample<'a> {
    const SIZE: usize = 20;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl SvtSample<'_> {
    pub fn time_sec(&self) -> u32 {
        self.raw.get_u32(0)
    }

    pub fn time_nanosec(&self) -> u32 {
        self.raw.get_u32(4)
    }

    pub fn sound_velocity_m_per_sec(&self) -> f32 {
        self.raw.get_f32(8)
    }

    pub fn temp_c(&self) -> f32 {
        self.raw.get_f32(12)
    }

    pub fn pressure_pa(&self) -> f32 {
        self.raw.get_f32(16)
    }
}

/// An `#SVT` transducer sound velocity datagram.
#[derive(Debug)]
pub struct Svt<'a> {
    pub info: SvtInfo<'a>,
    /// Absent when the datagram carries zero samples.
    pub samples: Option<PackedArray<'a, SvtSample<'a>>>,
}

// ---------- Heave (CHE) ---------- //

/// Decoded heave of a `#CHE` datagram.
#[derive(Debug, Copy, Clone)]
pub struct CheData<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for CheData<'a> {
    const SIZE: usize = 4;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl CheData<'_> {
    pub fn heave_m(&self) -> f32 {
        self.raw.get_f32(0)
    }
}

/// A `#CHE` compatibility heave datagram.
#[derive(Debug, Copy, Clone)]
pub struct Che<'a> {
    pub common: MCommon<'a>,
    pub data: CheData<'a>,
}

// ---------- Layout Routines ---------- //

fn s_common<'a>(walk: &mut Walk<'a>, what: &'static str) -> Result<SCommon<'a>, ReaderError> {
    walk.sized_view(|c: &SCommon| c.num_bytes_cmn_part() as usize, what)
}

pub(crate) fn layout_spo(body: &[u8]) -> Result<Spo<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let common: SCommon = s_common(&mut walk, "SPO common part")?;
    let data: PositionData = walk.view(PositionData::SIZE, "SPO position data")?;

    Ok(Spo {
        common,
        data,
        raw_sensor_data: walk.rest(),
    })
}

pub(crate) fn layout_cpo(body: &[u8]) -> Result<Cpo<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let common: SCommon = s_common(&mut walk, "CPO common part")?;
    let data: PositionData = walk.view(PositionData::SIZE, "CPO position data")?;

    Ok(Cpo {
        common,
        data,
        raw_sensor_data: walk.rest(),
    })
}

pub(crate) fn layout_scl(body: &[u8]) -> Result<Scl<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let common: SCommon = s_common(&mut walk, "SCL common part")?;
    let data: SclData = walk.view(SclData::SIZE, "SCL clock data")?;

    Ok(Scl {
        common,
        data,
        raw_sensor_data: walk.rest(),
    })
}

pub(crate) fn layout_sde(body: &[u8], dgm_version: u8) -> Result<Sde<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let common: SCommon = s_common(&mut walk, "SDE common part")?;
    let data: SdeData = if dgm_version == 0 {
        SdeData::V0(walk.view(SdeDataV0::SIZE, "SDE depth data")?)
    } else {
        SdeData::V1(walk.view(SdeDataV1::SIZE, "SDE depth data")?)
    };

    Ok(Sde {
        common,
        data,
        raw_sensor_data: walk.rest(),
    })
}

pub(crate) fn layout_shi(body: &[u8]) -> Result<Shi<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let common: SCommon = s_common(&mut walk, "SHI common part")?;
    let data: ShiData = walk.view(ShiData::SIZE, "SHI height data")?;

    Ok(Shi {
        common,
        data,
        raw_sensor_data: walk.rest(),
    })
}

pub(crate) fn layout_skm(body: &[u8]) -> Result<Skm<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let info: SkmInfo = walk.sized_view(|i: &SkmInfo| i.num_bytes_info_part() as usize, "SKM info part")?;
    let samples: Option<PackedArray<SkmSample>> = walk.array(
        info.num_samples_array() as usize,
        info.num_bytes_per_sample() as usize,
        "SKM samples",
    )?;

    Ok(Skm { info, samples })
}

pub(crate) fn layout_svp(body: &[u8]) -> Result<Svp<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let info: SvpInfo = walk.sized_view(|i: &SvpInfo| i.num_bytes_cmn_part() as usize, "SVP info part")?;
    let samples: Option<PackedArray<SvpSample>> = walk.array(
        info.num_samples() as usize,
        info.num_bytes_per_sample() as usize,
        "SVP samples",
    )?;

    Ok(Svp { info, samples })
}

pub(crate) fn layout_svt(body: &[u8]) -> Result<Svt<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let info: SvtInfo = walk.sized_view(|i: &SvtInfo| i.num_bytes_info_part() as usize, "SVT info part")?;
    let samples: Option<PackedArray<SvtSample>> = walk.array(
        info.num_samples_array() as usize,
        info.num_bytes_per_sample() as usize,
        "SVT samples",
    )?;

    Ok(Svt { info, samples })
}

pub(crate) fn layout_che(body: &[u8]) -> Result<Che<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let common: MCommon = walk.sized_view(|c: &MCommon| c.num_bytes_cmn_part() as usize, "CHE common part")?;
    let data: CheData = walk.view(CheData::SIZE, "CHE heave data")?;

    Ok(Che { common, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s_common_bytes() -> Vec<u8> {
        let mut raw: Vec<u8> = vec![0u8; SCommon::SIZE];
        raw[0..2].copy_from_slice(&(SCommon::SIZE as u16).to_le_bytes());
        raw[2..4].copy_from_slice(&1u16.to_le_bytes());
        raw
    }

    #[test]
    fn spo_layout_keeps_raw_sentence() {
        let mut body: Vec<u8> = s_common_bytes();
        let mut data: Vec<u8> = vec![0u8; PositionData::SIZE];
        data[12..20].copy_from_slice(&63.25f64.to_le_bytes());
        data[20..28].copy_from_slice(&7.5f64.to_le_bytes());
        body.extend_from_slice(&data);
        body.extend_from_slice(b"$GPGGA,120000,6315.00,N");

        let spo: Spo = layout_spo(&body).unwrap();
        assert_eq!(spo.data.corrected_lat_deg(), 63.25);
        assert_eq!(spo.data.corrected_long_deg(), 7.5);
        assert_eq!(spo.raw_sensor_data(), b"$GPGGA,120000,6315.00,N");
    }

    #[test]
    fn spo_truncated_data_is_bad_data() {
        let mut body: Vec<u8> = s_common_bytes();
        body.extend_from_slice(&[0u8; PositionData::SIZE - 1]);

        assert!(matches!(layout_spo(&body), Err(ReaderError::BadData(_))));
    }

    #[test]
    fn sde_version_selects_data_struct() {
        let mut v0_body: Vec<u8> = s_common_bytes();
        let mut v0_data: Vec<u8> = vec![0u8; SdeDataV0::SIZE];
        v0_data[0..4].copy_from_slice(&55.0f32.to_le_bytes());
        v0_body.extend_from_slice(&v0_data);

        let sde: Sde = layout_sde(&v0_body, 0).unwrap();
        assert!(matches!(sde.data, SdeData::V0(_)));
        assert_eq!(sde.data.depth_used_m(), 55.0);

        let mut v1_body: Vec<u8> = s_common_bytes();
        let mut v1_data: Vec<u8> = vec![0u8; SdeDataV1::SIZE];
        v1_data[0..4].copy_from_slice(&55.0f32.to_le_bytes());
        v1_data[4..8].copy_from_slice(&54.5f32.to_le_bytes());
        v1_body.extend_from_slice(&v1_data);

        let sde: Sde = layout_sde(&v1_body, 1).unwrap();
        match sde.data {
            SdeData::V1(data) => assert_eq!(data.depth_raw_m(), 54.5),
            SdeData::V0(_) => panic!("version 1 must select the v1 struct"),
        }
    }

    #[test]
    fn skm_samples_with_datagram_stride() {
        let mut body: Vec<u8> = vec![0u8; SkmInfo::SIZE];
        body[0..2].copy_from_slice(&(SkmInfo::SIZE as u16).to_le_bytes());
        body[6..8].copy_from_slice(&2u16.to_le_bytes()); // two samples
        let stride: u16 = SkmSample::SIZE as u16 + 8; // grown sample record
        body[8..10].copy_from_slice(&stride.to_le_bytes());

        for i in 0..2u32 {
            let mut sample: Vec<u8> = vec![0u8; stride as usize];
            sample[0..4].copy_from_slice(&(1_700_000_000 + i).to_le_bytes());
            sample[32..36].copy_from_slice(&1.5f32.to_le_bytes()); // roll
            body.extend_from_slice(&sample);
        }

        let skm: Skm = layout_skm(&body).unwrap();
        let samples = skm.samples.unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples.get(1).unwrap().time_sec(), 1_700_000_001);
        assert_eq!(samples.get(0).unwrap().roll_deg(), 1.5);
    }

    #[test]
    fn skm_zero_samples_is_absent_array() {
        let mut body: Vec<u8> = vec![0u8; SkmInfo::SIZE];
        body[0..2].copy_from_slice(&(SkmInfo::SIZE as u16).to_le_bytes());
        body[8..10].copy_from_slice(&(SkmSample::SIZE as u16).to_le_bytes());

        let skm: Skm = layout_skm(&body).unwrap();
        assert!(skm.samples.is_none());
    }

    #[test]
    fn svp_profile_points() {
        let mut body: Vec<u8> = vec![0u8; SvpInfo::SIZE];
        body[0..2].copy_from_slice(&(SvpInfo::SIZE as u16).to_le_bytes());
        body[2..4].copy_from_slice(&3u16.to_le_bytes());
        body[4..6].copy_from_slice(&(SvpSample::SIZE as u16).to_le_bytes());

        for i in 0..3u16 {
            let mut sample: Vec<u8> = vec![0u8; SvpSample::SIZE];
            sample[0..4].copy_from_slice(&(f32::from(i) * 10.0).to_le_bytes());
            sample[4..8].copy_from_slice(&(1480.0 + f32::from(i)).to_le_bytes());
            body.extend_from_slice(&sample);
        }

        let svp: Svp = layout_svp(&body).unwrap();
        let samples = svp.samples.unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples.get(2).unwrap().depth_m(), 20.0);
        assert_eq!(samples.get(2).unwrap().sound_velocity_m_per_sec(), 1482.0);
    }

    #[test]
    fn svt_zero_samples_uses_own_count() {
        // Zero samples with a stride still declared: nothing is claimed.
        let mut body: Vec<u8> = vec![0u8; SvtInfo::SIZE];
        body[0..2].copy_from_slice(&(SvtInfo::SIZE as u16).to_le_bytes());
        body[8..10].copy_from_slice(&(SvtSample::SIZE as u16).to_le_bytes());

        let svt: Svt = layout_svt(&body).unwrap();
        assert!(svt.samples.is_none());
    }

    #[test]
    fn svt_sample_fields() {
        let mut body: Vec<u8> = vec![0u8; SvtInfo::SIZE];
        body[0..2].copy_from_slice(&(SvtInfo::SIZE as u16).to_le_bytes());
        body[6..8].copy_from_slice(&1u16.to_le_bytes());
        body[8..10].copy_from_slice(&(SvtSample::SIZE as u16).to_le_bytes());

        let mut sample: Vec<u8> = vec![0u8; SvtSample::SIZE];
        sample[8..12].copy_from_slice(&1490.25f32.to_le_bytes());
        body.extend_from_slice(&sample);

        let svt: Svt = layout_svt(&body).unwrap();
        let samples = svt.samples.unwrap();
        assert_eq!(samples.get(0).unwrap().sound_velocity_m_per_sec(), 1490.25);
    }

    #[test]
    fn che_heave() {
        let mut body: Vec<u8> = vec![0u8; MCommon::SIZE];
        body[0..2].copy_from_slice(&(MCommon::SIZE as u16).to_le_bytes());
        body.extend_from_slice(&(-0.75f32).to_le_bytes());

        let che: Che = layout_che(&body).unwrap();
        assert_eq!(che.data.heave_m(), -0.75);
    }
}
