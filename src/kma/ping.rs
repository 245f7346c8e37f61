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

//! The multibeam ping datagrams: `#MRZ` (soundings) and `#MWC`
//! (water column).
//!
//! Both start with a partition and the multibeam common part, then walk
//! self-sized info records and counted arrays whose strides come from
//! the datagram itself. The MWC beam region stays opaque at layout time;
//! it is walked one beam at a time by [`super::beams`].

use super::beams::MwcBeamIter;
use super::dgm::{MCommon, Partition};
use crate::bytes::{FieldSlice, I16Samples, PackedArray, PackedView, Walk};
use crate::error::ReaderError;

// ---------- MRZ ---------- //

/// Ping-level information of an `#MRZ` datagram.
#[derive(Debug, Copy, Clone)]
pub struct MrzPingInfo<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for MrzPingInfo<'a> {
    const SIZE: usize = 76;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl MrzPingInfo<'_> {
    /// Size of this part as stored.
    pub fn num_bytes_info_data(&self) -> u16 {
        self.raw.get_u16(0)
    }

    pub fn ping_rate_hz(&self) -> f32 {
        self.raw.get_f32(4)
    }

    pub fn beam_spacing(&self) -> u8 {
        self.raw.get_u8(8)
    }

    pub fn depth_mode(&self) -> u8 {
        self.raw.get_u8(9)
    }

    pub fn sub_depth_mode(&self) -> u8 {
        self.raw.get_u8(10)
    }

    pub fn distance_btw_swath(&self) -> u8 {
        self.raw.get_u8(11)
    }

    pub fn detection_mode(&self) -> u8 {
        self.raw.get_u8(12)
    }

    pub fn pulse_form(&self) -> u8 {
        self.raw.get_u8(13)
    }

    pub fn frequency_mode_hz(&self) -> f32 {
        self.raw.get_f32(16)
    }

    pub fn freq_range_low_lim_hz(&self) -> f32 {
        self.raw.get_f32(20)
    }

    pub fn freq_range_high_lim_hz(&self) -> f32 {
        self.raw.get_f32(24)
    }

    pub fn max_total_tx_pulse_length_sec(&self) -> f32 {
        self.raw.get_f32(28)
    }

    pub fn max_eff_tx_pulse_length_sec(&self) -> f32 {
        self.raw.get_f32(32)
    }

    pub fn max_eff_tx_bandwidth_hz(&self) -> f32 {
        self.raw.get_f32(36)
    }

    pub fn abs_coeff_db_per_km(&self) -> f32 {
        self.raw.get_f32(40)
    }

    pub fn port_sector_edge_deg(&self) -> f32 {
        self.raw.get_f32(44)
    }

    pub fn starb_sector_edge_deg(&self) -> f32 {
        self.raw.get_f32(48)
    }

    /// Reference-point latitude at transmit, decimal degrees.
    pub fn latitude_deg(&self) -> f64 {
        self.raw.get_f64(52)
    }

    /// Reference-point longitude at transmit, decimal degrees.
    pub fn longitude_deg(&self) -> f64 {
        self.raw.get_f64(60)
    }

    pub fn ellipsoid_height_re_ref_point_m(&self) -> f32 {
        self.raw.get_f32(68)
    }

    pub fn num_tx_sectors(&self) -> u8 {
        self.raw.get_u8(72)
    }

    pub fn num_bytes_per_tx_sector(&self) -> u8 {
        self.raw.get_u8(73)
    }
}

/// One transmit sector, layout revision 0.
#[derive(Debug, Copy, Clone)]
pub struct MrzTxSectorV0<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for MrzTxSectorV0<'a> {
    const SIZE: usize = 36;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl MrzTxSectorV0<'_> {
    pub fn tx_sector_numb(&self) -> u8 {
        self.raw.get_u8(0)
    }

    pub fn tx_arr_number(&self) -> u8 {
        self.raw.get_u8(1)
    }

    pub fn tx_sub_array(&self) -> u8 {
        self.raw.get_u8(2)
    }

    pub fn sector_transmit_delay_sec(&self) -> f32 {
        self.raw.get_f32(4)
    }

    pub fn tilt_angle_re_tx_deg(&self) -> f32 {
        self.raw.get_f32(8)
    }

    pub fn tx_nominal_source_level_db(&self) -> f32 {
        self.raw.get_f32(12)
    }

    pub fn tx_focus_range_m(&self) -> f32 {
        self.raw.get_f32(16)
    }

    pub fn centre_freq_hz(&self) -> f32 {
        self.raw.get_f32(20)
    }

    pub fn signal_bandwidth_hz(&self) -> f32 {
        self.raw.get_f32(24)
    }

    pub fn total_signal_length_sec(&self) -> f32 {
        self.raw.get_f32(28)
    }

    pub fn pulse_shading(&self) -> u8 {
        self.raw.get_u8(32)
    }

    pub fn signal_wave_form(&self) -> u8 {
        self.raw.get_u8(33)
    }
}

/// One transmit sector, layout revision 1: revision 0 plus tracking and
/// level fields appended.
#[derive(Debug, Copy, Clone)]
pub struct MrzTxSectorV1<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for MrzTxSectorV1<'a> {
    const SIZE: usize = 48;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl<'a> MrzTxSectorV1<'a> {
    /// The revision-0 fields, which lead the record unchanged.
    pub fn base(&self) -> MrzTxSectorV0<'a> {
        MrzTxSectorV0::wrap(self.raw)
    }

    pub fn high_voltage_level_db(&self) -> f32 {
        self.raw.get_f32(36)
    }

    pub fn sector_tracking_corr_db(&self) -> f32 {
        self.raw.get_f32(40)
    }

    pub fn effective_signal_length_sec(&self) -> f32 {
        self.raw.get_f32(44)
    }
}

/// The transmit-sector array of an `#MRZ`, selected by `dgm_version`.
#[derive(Debug, Copy, Clone)]
pub enum MrzTxSectors<'a> {
    V0(PackedArray<'a, MrzTxSectorV0<'a>>),
    V1(PackedArray<'a, MrzTxSectorV1<'a>>),
}

impl MrzTxSectors<'_> {
    pub fn len(&self) -> usize {
        match self {
            MrzTxSectors::V0(sectors) => sectors.len(),
            MrzTxSectors::V1(sectors) => sectors.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Receiver-level information of an `#MRZ` datagram.
#[derive(Debug, Copy, Clone)]
pub struct MrzRxInfo<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for MrzRxInfo<'a> {
    const SIZE: usize = 32;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl MrzRxInfo<'_> {
    /// Size of this part as stored.
    pub fn num_bytes_rx_info(&self) -> u16 {
        self.raw.get_u16(0)
    }

    pub fn num_soundings_max_main(&self) -> u16 {
        self.raw.get_u16(2)
    }

    pub fn num_soundings_valid_main(&self) -> u16 {
        self.raw.get_u16(4)
    }

    pub fn num_bytes_per_sounding(&self) -> u16 {
        self.raw.get_u16(6)
    }

    pub fn wc_sample_rate(&self) -> f32 {
        self.raw.get_f32(8)
    }

    pub fn seabed_image_sample_rate(&self) -> f32 {
        self.raw.get_f32(12)
    }

    /// Normal incidence backscatter, dB.
    pub fn bs_normal_db(&self) -> f32 {
        self.raw.get_f32(16)
    }

    /// Oblique backscatter, dB.
    pub fn bs_oblique_db(&self) -> f32 {
        self.raw.get_f32(20)
    }

    pub fn extra_detection_alarm_flag(&self) -> u16 {
        self.raw.get_u16(24)
    }

    pub fn num_extra_detections(&self) -> u16 {
        self.raw.get_u16(26)
    }

    pub fn num_extra_detection_classes(&self) -> u16 {
        self.raw.get_u16(28)
    }

    pub fn num_bytes_per_class(&self) -> u16 {
        self.raw.get_u16(30)
    }
}

/// One extra-detection class descriptor.
#[derive(Debug, Copy, Clone)]
pub struct MrzExtraDetClass<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for MrzExtraDetClass<'a> {
    const SIZE: usize = 4;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl MrzExtraDetClass<'_> {
    pub fn num_extra_det_in_class(&self) -> u16 {
        self.raw.get_u16(0)
    }

    pub fn alarm_flag(&self) -> u8 {
        self.raw.get_u8(3)
    }
}

/// One sounding: a per-beam detection.
#[derive(Debug, Copy, Clone)]
pub struct MrzSounding<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for MrzSounding<'a> {
    const SIZE: usize = 80;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl MrzSounding<'_> {
    pub fn sounding_index(&self) -> u16 {
        self.raw.get_u16(0)
    }

    pub fn tx_sector_numb(&self) -> u8 {
        self.raw.get_u8(2)
    }

    pub fn detection_type(&self) -> u8 {
        self.raw.get_u8(3)
    }

    pub fn detection_method(&self) -> u8 {
        self.raw.get_u8(4)
    }

    pub fn rejection_info_1(&self) -> u8 {
        self.raw.get_u8(5)
    }

    pub fn rejection_info_2(&self) -> u8 {
        self.raw.get_u8(6)
    }

    pub fn post_processing_info(&self) -> u8 {
        self.raw.get_u8(7)
    }

    pub fn detection_class(&self) -> u8 {
        self.raw.get_u8(8)
    }

    pub fn detection_confidence_level(&self) -> u8 {
        self.raw.get_u8(9)
    }

    pub fn range_factor(&self) -> f32 {
        self.raw.get_f32(12)
    }

    pub fn quality_factor(&self) -> f32 {
        self.raw.get_f32(16)
    }

    pub fn detection_uncertainty_ver_m(&self) -> f32 {
        self.raw.get_f32(20)
    }

    pub fn detection_uncertainty_hor_m(&self) -> f32 {
        self.raw.get_f32(24)
    }

    pub fn detection_window_length_sec(&self) -> f32 {
        self.raw.get_f32(28)
    }

    pub fn echo_length_sec(&self) -> f32 {
        self.raw.get_f32(32)
    }

    pub fn wc_beam_numb(&self) -> u16 {
        self.raw.get_u16(36)
    }

    pub fn wc_range_samples(&self) -> u16 {
        self.raw.get_u16(38)
    }

    pub fn wc_nom_beam_angle_across_deg(&self) -> f32 {
        self.raw.get_f32(40)
    }

    pub fn mean_abs_coeff_db_per_km(&self) -> f32 {
        self.raw.get_f32(44)
    }

    /// Beam-intensity reflectivity, dB.
    pub fn reflectivity_1_db(&self) -> f32 {
        self.raw.get_f32(48)
    }

    /// Footprint-corrected reflectivity, dB.
    pub fn reflectivity_2_db(&self) -> f32 {
        self.raw.get_f32(52)
    }

    /// Depth below the vessel reference point, metres.
    pub fn z_re_ref_point_m(&self) -> f32 {
        self.raw.get_f32(56)
    }

    /// Across-track distance, metres.
    pub fn y_re_ref_point_m(&self) -> f32 {
        self.raw.get_f32(60)
    }

    /// Along-track distance, metres.
    pub fn x_re_ref_point_m(&self) -> f32 {
        self.raw.get_f32(64)
    }

    pub fn beam_inc_angle_adj_deg(&self) -> f32 {
        self.raw.get_f32(68)
    }

    pub fn si_start_range_samples(&self) -> u16 {
        self.raw.get_u16(72)
    }

    pub fn si_centre_sample(&self) -> u16 {
        self.raw.get_u16(74)
    }

    /// Seabed-image samples this sounding contributes to the trailing
    /// amplitude array.
    pub fn si_num_samples(&self) -> u16 {
        self.raw.get_u16(76)
    }
}

/// An `#MRZ` datagram laid out over the reader's buffer.
#[derive(Debug)]
pub struct Mrz<'a> {
    pub partition: Partition<'a>,
    pub common: MCommon<'a>,
    pub ping_info: MrzPingInfo<'a>,
    /// Absent when the ping declares zero transmit sectors.
    pub tx_sectors: Option<MrzTxSectors<'a>>,
    pub rx_info: MrzRxInfo<'a>,
    /// Absent when the ping declares zero extra-detection classes.
    pub extra_det_classes: Option<PackedArray<'a, MrzExtraDetClass<'a>>>,
    /// Absent when the ping holds no soundings at all.
    pub soundings: Option<PackedArray<'a, MrzSounding<'a>>>,
    seabed_image: &'a [u8],
}

impl<'a> Mrz<'a> {
    /// The trailing seabed-image amplitude samples, 16-bit.
    pub fn seabed_image(&self) -> I16Samples<'a> {
        I16Samples::new(self.seabed_image)
    }
}

pub(crate) fn layout_mrz(body: &[u8], dgm_version: u8) -> Result<Mrz<'_>, ReaderError> {
    let mut walk = Walk::new(body);

    let partition: Partition = walk.view(Partition::SIZE, "MRZ partition")?;
    partition.require_unsplit()?;

    let common: MCommon = walk.sized_view(|c: &MCommon| c.num_bytes_cmn_part() as usize, "MRZ common part")?;
    let ping_info: MrzPingInfo =
        walk.sized_view(|p: &MrzPingInfo| p.num_bytes_info_data() as usize, "MRZ ping info")?;

    let sector_count: usize = ping_info.num_tx_sectors() as usize;
    let sector_stride: usize = ping_info.num_bytes_per_tx_sector() as usize;
    let tx_sectors: Option<MrzTxSectors> = if dgm_version == 0 {
        walk.array(sector_count, sector_stride, "MRZ tx sectors")?
            .map(MrzTxSectors::V0)
    } else {
        walk.array(sector_count, sector_stride, "MRZ tx sectors")?
            .map(MrzTxSectors::V1)
    };

    let rx_info: MrzRxInfo = walk.sized_view(|r: &MrzRxInfo| r.num_bytes_rx_info() as usize, "MRZ rx info")?;

    let extra_det_classes: Option<PackedArray<MrzExtraDetClass>> = walk.array(
        rx_info.num_extra_detection_classes() as usize,
        rx_info.num_bytes_per_class() as usize,
        "MRZ extra detection classes",
    )?;

    let sounding_count: usize =
        rx_info.num_soundings_max_main() as usize + rx_info.num_extra_detections() as usize;
    let soundings: Option<PackedArray<MrzSounding>> = walk.array(
        sounding_count,
        rx_info.num_bytes_per_sounding() as usize,
        "MRZ soundings",
    )?;

    Ok(Mrz {
        partition,
        common,
        ping_info,
        tx_sectors,
        rx_info,
        extra_det_classes,
        soundings,
        seabed_image: walk.rest(),
    })
}

// ---------- MWC ---------- //

/// Transmit-level information of an `#MWC` datagram.
#[derive(Debug, Copy, Clone)]
pub struct MwcTxInfo<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for MwcTxInfo<'a> {
    const SIZE: usize = 12;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl MwcTxInfo<'_> {
    /// Size of this part as stored.
    pub fn num_bytes_tx_info(&self) -> u16 {
        self.raw.get_u16(0)
    }

    pub fn num_tx_sectors(&self) -> u16 {
        self.raw.get_u16(2)
    }

    pub fn num_bytes_per_tx_sector(&self) -> u16 {
        self.raw.get_u16(4)
    }

    pub fn heave_m(&self) -> f32 {
        self.raw.get_f32(8)
    }
}

/// One `#MWC` transmit sector.
#[derive(Debug, Copy, Clone)]
pub struct MwcTxSector<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for MwcTxSector<'a> {
    const SIZE: usize = 16;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl MwcTxSector<'_> {
    pub fn tilt_angle_re_tx_deg(&self) -> f32 {
        self.raw.get_f32(0)
    }

    pub fn centre_freq_hz(&self) -> f32 {
        self.raw.get_f32(4)
    }

    pub fn tx_beam_width_along_deg(&self) -> f32 {
        self.raw.get_f32(8)
    }

    pub fn tx_sector_num(&self) -> u16 {
        self.raw.get_u16(12)
    }
}

/// Receiver-level information of an `#MWC` datagram.
#[derive(Debug, Copy, Clone)]
pub struct MwcRxInfo<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for MwcRxInfo<'a> {
    const SIZE: usize = 16;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl MwcRxInfo<'_> {
    /// Size of this part as stored.
    pub fn num_bytes_rx_info(&self) -> u16 {
        self.raw.get_u16(0)
    }

    /// Beams in the packed beam region that follows.
    pub fn num_beams(&self) -> u16 {
        self.raw.get_u16(2)
    }

    /// Stored size of one beam header inside the beam region.
    pub fn num_bytes_per_beam_entry(&self) -> u8 {
        self.raw.get_u8(4)
    }

    /// Whether beams carry no phase (0), 8-bit phase (1), or 16-bit
    /// phase (2) after their amplitude samples.
    pub fn phase_flag(&self) -> u8 {
        self.raw.get_u8(5)
    }

    pub fn tvg_function_applied(&self) -> u8 {
        self.raw.get_u8(6)
    }

    pub fn tvg_offset_db(&self) -> i8 {
        self.raw.get_i8(7)
    }

    pub fn sample_freq_hz(&self) -> f32 {
        self.raw.get_f32(8)
    }

    pub fn sound_velocity_m_per_sec(&self) -> f32 {
        self.raw.get_f32(12)
    }
}

/// An `#MWC` datagram laid out over the reader's buffer.
///
/// The beam region is kept opaque here; iterate it with [`Mwc::beams`]
/// or walk it by hand with [`super::beams::walk_beam`].
#[derive(Debug)]
pub struct Mwc<'a> {
    pub partition: Partition<'a>,
    pub common: MCommon<'a>,
    pub tx_info: MwcTxInfo<'a>,
    /// Absent when the ping declares zero transmit sectors.
    pub tx_sectors: Option<PackedArray<'a, MwcTxSector<'a>>>,
    pub rx_info: MwcRxInfo<'a>,
    beam_data: &'a [u8],
}

impl<'a> Mwc<'a> {
    /// The packed beam region, as stored.
    pub fn beam_data(&self) -> &'a [u8] {
        self.beam_data
    }

    /// Iterates the beam region, one beam view at a time.
    pub fn beams(&self) -> MwcBeamIter<'a> {
        MwcBeamIter::new(
            self.beam_data,
            self.rx_info.num_beams(),
            self.rx_info.phase_flag(),
            self.rx_info.num_bytes_per_beam_entry() as usize,
        )
    }
}

pub(crate) fn layout_mwc(body: &[u8]) -> Result<Mwc<'_>, ReaderError> {
    let mut walk = Walk::new(body);

    let partition: Partition = walk.view(Partition::SIZE, "MWC partition")?;
    partition.require_unsplit()?;

    let common: MCommon = walk.sized_view(|c: &MCommon| c.num_bytes_cmn_part() as usize, "MWC common part")?;
    let tx_info: MwcTxInfo =
        walk.sized_view(|t: &MwcTxInfo| t.num_bytes_tx_info() as usize, "MWC tx info")?;

    let tx_sectors: Option<PackedArray<MwcTxSector>> = walk.array(
        tx_info.num_tx_sectors() as usize,
        tx_info.num_bytes_per_tx_sector() as usize,
        "MWC tx sectors",
    )?;

    let rx_info: MwcRxInfo = walk.sized_view(|r: &MwcRxInfo| r.num_bytes_rx_info() as usize, "MWC rx info")?;

    Ok(Mwc {
        partition,
        common,
        tx_info,
        tx_sectors,
        rx_info,
        beam_data: walk.rest(),
    })
}
