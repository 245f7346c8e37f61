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

//! The EMX bathymetric datagrams: per-beam depths (`'X'`), raw ranges
//! and beam angles (`'N'`), sidescan samples (`'Y'`), and water column
//! samples (`'k'`).
//!
//! Sidescan and water column store a per-beam variable number of
//! amplitude samples whose width (8 or 16 bit) is selected by a
//! discriminator in the info section.

use crate::bytes::{FieldSlice, I8Samples, I16Samples, PackedArray, PackedView, Walk};
use crate::error::ReaderError;

// ---------- Depth (XYZ) ---------- //

/// Info part of an `'X'` depth record.
#[derive(Debug, Copy, Clone)]
pub struct EmxXyzInfo<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxXyzInfo<'a> {
    const SIZE: usize = 20;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxXyzInfo<'_> {
    pub fn heading_01deg(&self) -> u16 {
        self.raw.get_u16(0)
    }

    pub fn sound_speed_dm_per_sec(&self) -> u16 {
        self.raw.get_u16(2)
    }

    /// Transmit transducer depth below the waterline, metres.
    pub fn tx_depth_m(&self) -> f32 {
        self.raw.get_f32(4)
    }

    pub fn num_beams(&self) -> u16 {
        self.raw.get_u16(8)
    }

    pub fn num_valid_detections(&self) -> u16 {
        self.raw.get_u16(10)
    }

    pub fn sampling_freq_hz(&self) -> f32 {
        self.raw.get_f32(12)
    }

    pub fn scanning_info(&self) -> u8 {
        self.raw.get_u8(16)
    }
}

/// One depth beam of an `'X'` record.
#[derive(Debug, Copy, Clone)]
pub struct EmxXyzBeam<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxXyzBeam<'a> {
    const SIZE: usize = 20;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxXyzBeam<'_> {
    /// Depth below the transmit transducer, metres.
    pub fn z_m(&self) -> f32 {
        self.raw.get_f32(0)
    }

    /// Across-track distance, metres, positive starboard.
    pub fn y_m(&self) -> f32 {
        self.raw.get_f32(4)
    }

    /// Along-track distance, metres, positive forward.
    pub fn x_m(&self) -> f32 {
        self.raw.get_f32(8)
    }

    pub fn detect_window_len_samples(&self) -> u16 {
        self.raw.get_u16(12)
    }

    pub fn quality_factor(&self) -> u8 {
        self.raw.get_u8(14)
    }

    pub fn beam_inc_angle_adj(&self) -> i8 {
        self.raw.get_i8(15)
    }

    pub fn detection_info(&self) -> u8 {
        self.raw.get_u8(16)
    }

    pub fn realtime_cleaning_info(&self) -> i8 {
        self.raw.get_i8(17)
    }

    /// Reflectivity in tenths of dB.
    pub fn reflectivity_01db(&self) -> i16 {
        self.raw.get_i16(18)
    }
}

/// An `'X'` depth record.
#[derive(Debug)]
pub struct EmxXyzDepth<'a> {
    pub info: EmxXyzInfo<'a>,
    /// Absent when the record declares zero beams.
    pub beams: Option<PackedArray<'a, EmxXyzBeam<'a>>>,
}

pub(crate) fn layout_xyz_depth(body: &[u8]) -> Result<EmxXyzDepth<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let info: EmxXyzInfo = walk.view(EmxXyzInfo::SIZE, "depth record info")?;
    let beams: Option<PackedArray<EmxXyzBeam>> =
        walk.array(info.num_beams() as usize, EmxXyzBeam::SIZE, "depth beams")?;

    Ok(EmxXyzDepth { info, beams })
}

// ---------- Raw Range and Angle ---------- //

/// Info part of an `'N'` raw range record.
#[derive(Debug, Copy, Clone)]
pub struct EmxRawRangeInfo<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxRawRangeInfo<'a> {
    const SIZE: usize = 16;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxRawRangeInfo<'_> {
    pub fn sound_speed_dm_per_sec(&self) -> u16 {
        self.raw.get_u16(0)
    }

    pub fn num_tx_sectors(&self) -> u16 {
        self.raw.get_u16(2)
    }

    pub fn num_rx_beams(&self) -> u16 {
        self.raw.get_u16(4)
    }

    pub fn num_valid_detections(&self) -> u16 {
        self.raw.get_u16(6)
    }

    pub fn sampling_freq_hz(&self) -> f32 {
        self.raw.get_f32(8)
    }
}

/// One transmit sector of an `'N'` record.
#[derive(Debug, Copy, Clone)]
pub struct EmxRawRangeTxSector<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxRawRangeTxSector<'a> {
    const SIZE: usize = 24;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxRawRangeTxSector<'_> {
    pub fn tilt_angle_01deg(&self) -> i16 {
        self.raw.get_i16(0)
    }

    pub fn focus_range_01m(&self) -> u16 {
        self.raw.get_u16(2)
    }

    pub fn signal_length_sec(&self) -> f32 {
        self.raw.get_f32(4)
    }

    pub fn sector_tx_delay_sec(&self) -> f32 {
        self.raw.get_f32(8)
    }

    pub fn centre_freq_hz(&self) -> f32 {
        self.raw.get_f32(12)
    }

    pub fn mean_absorption_001db(&self) -> u16 {
        self.raw.get_u16(16)
    }

    pub fn signal_waveform_id(&self) -> u8 {
        self.raw.get_u8(18)
    }

    pub fn tx_sector_number(&self) -> u8 {
        self.raw.get_u8(19)
    }

    pub fn signal_bandwidth_hz(&self) -> f32 {
        self.raw.get_f32(20)
    }
}

/// One receive beam of an `'N'` record.
#[derive(Debug, Copy, Clone)]
pub struct EmxRawRangeBeam<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxRawRangeBeam<'a> {
    const SIZE: usize = 16;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxRawRangeBeam<'_> {
    /// Beam pointing angle in thousandths of a degree.
    pub fn pointing_angle_001deg(&self) -> i16 {
        self.raw.get_i16(0)
    }

    pub fn tx_sector_number(&self) -> u8 {
        self.raw.get_u8(2)
    }

    pub fn detection_info(&self) -> u8 {
        self.raw.get_u8(3)
    }

    pub fn detection_window_len_samples(&self) -> u16 {
        self.raw.get_u16(4)
    }

    pub fn quality_factor(&self) -> u8 {
        self.raw.get_u8(6)
    }

    pub fn two_way_travel_time_sec(&self) -> f32 {
        self.raw.get_f32(8)
    }

    /// Reflectivity in tenths of dB.
    pub fn reflectivity_01db(&self) -> i16 {
        self.raw.get_i16(12)
    }

    pub fn realtime_cleaning_info(&self) -> i8 {
        self.raw.get_i8(14)
    }
}

/// An `'N'` raw range and beam angle record.
#[derive(Debug)]
pub struct EmxRawRangeAngle<'a> {
    pub info: EmxRawRangeInfo<'a>,
    /// Absent when the record declares zero transmit sectors.
    pub tx_sectors: Option<PackedArray<'a, EmxRawRangeTxSector<'a>>>,
    /// Absent when the record declares zero receive beams.
    pub beams: Option<PackedArray<'a, EmxRawRangeBeam<'a>>>,
}

pub(crate) fn layout_raw_range(body: &[u8]) -> Result<EmxRawRangeAngle<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let info: EmxRawRangeInfo = walk.view(EmxRawRangeInfo::SIZE, "raw range info")?;
    let tx_sectors: Option<PackedArray<EmxRawRangeTxSector>> = walk.array(
        info.num_tx_sectors() as usize,
        EmxRawRangeTxSector::SIZE,
        "raw range tx sectors",
    )?;
    let beams: Option<PackedArray<EmxRawRangeBeam>> = walk.array(
        info.num_rx_beams() as usize,
        EmxRawRangeBeam::SIZE,
        "raw range rx beams",
    )?;

    Ok(EmxRawRangeAngle {
        info,
        tx_sectors,
        beams,
    })
}

// ---------- Variable-Width Samples ---------- //

/// Amplitude samples whose stored width the info section selects.
#[derive(Debug, Copy, Clone)]
pub enum EmxSamples<'a> {
    /// One byte per sample.
    Eight(I8Samples<'a>),
    /// Two bytes per sample.
    Sixteen(I16Samples<'a>),
}

impl EmxSamples<'_> {
    pub fn len(&self) -> usize {
        match self {
            EmxSamples::Eight(samples) => samples.len(),
            EmxSamples::Sixteen(samples) => samples.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample `index` widened to 16 bits, whatever the stored width.
    pub fn get(&self, index: usize) -> Option<i16> {
        match self {
            EmxSamples::Eight(samples) => samples.get(index).map(i16::from),
            EmxSamples::Sixteen(samples) => samples.get(index),
        }
    }
}

fn wrap_samples(raw: &[u8], width: usize) -> EmxSamples<'_> {
    if width == 2 {
        EmxSamples::Sixteen(I16Samples::new(raw))
    } else {
        EmxSamples::Eight(I8Samples::new(raw))
    }
}

fn check_sample_width(width: u8, what: &'static str) -> Result<usize, ReaderError> {
    match width {
        1 | 2 => Ok(width as usize),
        _ => {
            log::debug!("{} sample width {} is not 1 or 2", what, width);
            Err(ReaderError::BadData(what))
        }
    }
}

// ---------- Sidescan ---------- //

/// Info part of a `'Y'` sidescan record.
#[derive(Debug, Copy, Clone)]
pub struct EmxSidescanInfo<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxSidescanInfo<'a> {
    const SIZE: usize = 18;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxSidescanInfo<'_> {
    pub fn sampling_freq_hz(&self) -> f32 {
        self.raw.get_f32(0)
    }

    pub fn range_to_normal_incidence_m(&self) -> u16 {
        self.raw.get_u16(4)
    }

    /// Normal incidence backscatter in hundredths of dB.
    pub fn normal_incidence_bs_001db(&self) -> i16 {
        self.raw.get_i16(6)
    }

    /// Oblique backscatter in hundredths of dB.
    pub fn oblique_bs_001db(&self) -> i16 {
        self.raw.get_i16(8)
    }

    pub fn tx_beamwidth_01deg(&self) -> u16 {
        self.raw.get_u16(10)
    }

    pub fn tvg_law_crossover_01deg(&self) -> u16 {
        self.raw.get_u16(12)
    }

    pub fn num_beams(&self) -> u16 {
        self.raw.get_u16(14)
    }

    /// Bytes per amplitude sample: 1 or 2.
    pub fn sample_width(&self) -> u8 {
        self.raw.get_u8(16)
    }
}

/// Per-beam bookkeeping of a `'Y'` sidescan record.
#[derive(Debug, Copy, Clone)]
pub struct EmxSidescanBeamInfo<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxSidescanBeamInfo<'a> {
    const SIZE: usize = 6;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxSidescanBeamInfo<'_> {
    pub fn sorting_direction(&self) -> i8 {
        self.raw.get_i8(0)
    }

    pub fn detection_info(&self) -> u8 {
        self.raw.get_u8(1)
    }

    /// Amplitude samples this beam contributes.
    pub fn num_samples(&self) -> u16 {
        self.raw.get_u16(2)
    }

    /// Index of the detection inside this beam's samples. Real EM1002
    /// logs carry values past `num_samples`; they are passed through
    /// unchecked.
    pub fn detect_sample(&self) -> u16 {
        self.raw.get_u16(4)
    }
}

/// A `'Y'` sidescan record: beam bookkeeping records, then every beam's
/// amplitude samples concatenated.
#[derive(Debug)]
pub struct EmxSidescan<'a> {
    pub info: EmxSidescanInfo<'a>,
    /// Absent when the record declares zero beams.
    pub beam_infos: Option<PackedArray<'a, EmxSidescanBeamInfo<'a>>>,
    samples: &'a [u8],
}

impl<'a> EmxSidescan<'a> {
    /// The concatenated sample bytes, as stored.
    pub fn sample_bytes(&self) -> &'a [u8] {
        self.samples
    }

    /// Iterates beams, pairing each bookkeeping record with its slice
    /// of the sample region.
    pub fn beams(&self) -> EmxSidescanBeamIter<'a> {
        EmxSidescanBeamIter {
            infos: self.beam_infos,
            samples: self.samples,
            width: self.info.sample_width() as usize,
            next: 0,
            offset: 0,
        }
    }
}

/// Iterator over the beams of a `'Y'` sidescan record.
pub struct EmxSidescanBeamIter<'a> {
    infos: Option<PackedArray<'a, EmxSidescanBeamInfo<'a>>>,
    samples: &'a [u8],
    width: usize,
    next: usize,
    offset: usize,
}

impl<'a> Iterator for EmxSidescanBeamIter<'a> {
    type Item = (EmxSidescanBeamInfo<'a>, EmxSamples<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let info: EmxSidescanBeamInfo = self.infos.as_ref()?.get(self.next)?;
        self.next += 1;

        let bytes: usize = info.num_samples() as usize * self.width;
        let raw: &'a [u8] = &self.samples[self.offset..self.offset + bytes];
        self.offset += bytes;
        Some((info, wrap_samples(raw, self.width)))
    }
}

pub(crate) fn layout_sidescan(body: &[u8]) -> Result<EmxSidescan<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let info: EmxSidescanInfo = walk.view(EmxSidescanInfo::SIZE, "sidescan info")?;
    let width: usize = check_sample_width(info.sample_width(), "sidescan sample width")?;

    let beam_infos: Option<PackedArray<EmxSidescanBeamInfo>> = walk.array(
        info.num_beams() as usize,
        EmxSidescanBeamInfo::SIZE,
        "sidescan beam records",
    )?;
    let samples: &[u8] = walk.rest();

    // The sample region must cover every declared sample; one trailing
    // pad byte keeping the record even is tolerated.
    let declared: usize = beam_infos
        .as_ref()
        .map_or(0, |infos| infos.iter().map(|b| b.num_samples() as usize).sum());
    let wanted: usize = match declared.checked_mul(width) {
        Some(wanted) => wanted,
        None => return Err(ReaderError::BadData("sidescan sample extent overflows")),
    };
    if wanted > samples.len() {
        log::debug!(
            "sidescan beams declare {} sample bytes with {} stored",
            wanted,
            samples.len()
        );
        return Err(ReaderError::BadData("sidescan samples overrun record"));
    }

    Ok(EmxSidescan {
        info,
        beam_infos,
        samples,
    })
}

// ---------- Water Column ---------- //

/// Info part of a `'k'` water column record.
#[derive(Debug, Copy, Clone)]
pub struct EmxWcInfo<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxWcInfo<'a> {
    const SIZE: usize = 24;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxWcInfo<'_> {
    /// Transmit-level split of this ping over records, as logged.
    pub fn num_datagrams(&self) -> u16 {
        self.raw.get_u16(0)
    }

    pub fn datagram_number(&self) -> u16 {
        self.raw.get_u16(2)
    }

    pub fn num_tx_sectors(&self) -> u16 {
        self.raw.get_u16(4)
    }

    /// Beams in the whole ping, across records.
    pub fn total_num_beams(&self) -> u16 {
        self.raw.get_u16(6)
    }

    /// Beams stored in this record's beam region.
    pub fn num_beams_in_datagram(&self) -> u16 {
        self.raw.get_u16(8)
    }

    pub fn sound_speed_dm_per_sec(&self) -> u16 {
        self.raw.get_u16(10)
    }

    /// Sampling frequency in hundredths of Hz.
    pub fn sampling_freq_001hz(&self) -> u32 {
        self.raw.get_u32(12)
    }

    pub fn tx_time_heave_cm(&self) -> i16 {
        self.raw.get_i16(16)
    }

    pub fn tvg_function(&self) -> u8 {
        self.raw.get_u8(18)
    }

    pub fn tvg_offset_db(&self) -> i8 {
        self.raw.get_i8(19)
    }

    pub fn scanning_info(&self) -> u8 {
        self.raw.get_u8(20)
    }

    /// Bytes per amplitude sample: 1 or 2.
    pub fn sample_width(&self) -> u8 {
        self.raw.get_u8(21)
    }
}

/// One transmit sector of a `'k'` record.
#[derive(Debug, Copy, Clone)]
pub struct EmxWcTxSector<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxWcTxSector<'a> {
    const SIZE: usize = 6;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxWcTxSector<'_> {
    pub fn tilt_angle_01deg(&self) -> i16 {
        self.raw.get_i16(0)
    }

    /// Centre frequency in tens of Hz.
    pub fn centre_freq_10hz(&self) -> u16 {
        self.raw.get_u16(2)
    }

    pub fn tx_sector_number(&self) -> u8 {
        self.raw.get_u8(4)
    }
}

/// The fixed header leading one water column beam.
#[derive(Debug, Copy, Clone)]
pub struct EmxWcBeamInfo<'a> {
    raw: &'a [u8],
}

impl<'a> PackedView<'a> for EmxWcBeamInfo<'a> {
    const SIZE: usize = 10;

    fn wrap(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl EmxWcBeamInfo<'_> {
    pub fn pointing_angle_01deg(&self) -> i16 {
        self.raw.get_i16(0)
    }

    pub fn start_range_samples(&self) -> u16 {
        self.raw.get_u16(2)
    }

    /// Amplitude samples stored for this beam.
    pub fn num_samples(&self) -> u16 {
        self.raw.get_u16(4)
    }

    pub fn detected_range_samples(&self) -> u16 {
        self.raw.get_u16(6)
    }

    pub fn tx_sector_number(&self) -> u8 {
        self.raw.get_u8(8)
    }

    pub fn beam_number(&self) -> u8 {
        self.raw.get_u8(9)
    }
}

/// One walked water column beam.
#[derive(Debug)]
pub struct EmxWcBeam<'a> {
    pub header: EmxWcBeamInfo<'a>,
    /// Absent when the beam stores zero samples.
    pub amplitudes: Option<EmxSamples<'a>>,
}

/// Walks one beam off the front of a `'k'` beam region.
pub fn walk_wc_beam(raw: &[u8], sample_width: u8) -> Result<(EmxWcBeam<'_>, &[u8]), ReaderError> {
    let width: usize = check_sample_width(sample_width, "water column sample width")?;
    if raw.len() < EmxWcBeamInfo::SIZE {
        log::debug!("beam region ends inside a beam header");
        return Err(ReaderError::BadData("beam region ends inside a beam header"));
    }
    let header: EmxWcBeamInfo = EmxWcBeamInfo::wrap(&raw[..EmxWcBeamInfo::SIZE]);
    let num_samples: usize = header.num_samples() as usize;

    if num_samples == 0 {
        return Ok((
            EmxWcBeam {
                header,
                amplitudes: None,
            },
            &raw[EmxWcBeamInfo::SIZE..],
        ));
    }

    let end: usize = EmxWcBeamInfo::SIZE + num_samples * width;
    if end > raw.len() {
        log::debug!(
            "beam wants {} sample bytes with {} left in region",
            num_samples * width,
            raw.len() - EmxWcBeamInfo::SIZE
        );
        return Err(ReaderError::BadData("beam region ends inside beam samples"));
    }

    Ok((
        EmxWcBeam {
            header,
            amplitudes: Some(wrap_samples(&raw[EmxWcBeamInfo::SIZE..end], width)),
        },
        &raw[end..],
    ))
}

/// A `'k'` water column record. The beam region stays opaque at layout
/// time; iterate it with [`EmxWaterColumn::beams`].
#[derive(Debug)]
pub struct EmxWaterColumn<'a> {
    pub info: EmxWcInfo<'a>,
    /// Absent when the record declares zero transmit sectors.
    pub tx_sectors: Option<PackedArray<'a, EmxWcTxSector<'a>>>,
    beam_data: &'a [u8],
}

impl<'a> EmxWaterColumn<'a> {
    /// The packed beam region, as stored.
    pub fn beam_data(&self) -> &'a [u8] {
        self.beam_data
    }

    /// Iterates this record's beams.
    pub fn beams(&self) -> EmxWcBeamIter<'a> {
        EmxWcBeamIter {
            raw: self.beam_data,
            beams_left: self.info.num_beams_in_datagram(),
            sample_width: self.info.sample_width(),
            poisoned: false,
        }
    }
}

/// Iterator over the beams of one `'k'` record.
pub struct EmxWcBeamIter<'a> {
    raw: &'a [u8],
    beams_left: u16,
    sample_width: u8,
    poisoned: bool,
}

impl<'a> Iterator for EmxWcBeamIter<'a> {
    type Item = Result<EmxWcBeam<'a>, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.poisoned || self.beams_left == 0 {
            return None;
        }
        match walk_wc_beam(self.raw, self.sample_width) {
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

pub(crate) fn layout_water_column(body: &[u8]) -> Result<EmxWaterColumn<'_>, ReaderError> {
    let mut walk = Walk::new(body);
    let info: EmxWcInfo = walk.view(EmxWcInfo::SIZE, "water column info")?;
    check_sample_width(info.sample_width(), "water column sample width")?;

    let tx_sectors: Option<PackedArray<EmxWcTxSector>> = walk.array(
        info.num_tx_sectors() as usize,
        EmxWcTxSector::SIZE,
        "water column tx sectors",
    )?;

    Ok(EmxWaterColumn {
        info,
        tx_sectors,
        beam_data: walk.rest(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[test]
    fn xyz_depth_beams() {
        let mut body: Vec<u8> = vec![0u8; EmxXyzInfo::SIZE];
        body[8..10].copy_from_slice(&2u16.to_le_bytes());
        for i in 0..2u32 {
            let mut beam: Vec<u8> = vec![0u8; EmxXyzBeam::SIZE];
            beam[0..4].copy_from_slice(&(50.0 + i as f32).to_le_bytes());
            beam[18..20].copy_from_slice(&(-120i16).to_le_bytes());
            body.extend_from_slice(&beam);
        }

        let depth: EmxXyzDepth = layout_xyz_depth(&body).unwrap();
        let beams = depth.beams.unwrap();
        assert_eq!(beams.len(), 2);
        assert_eq!(beams.get(1).unwrap().z_m(), 51.0);
        assert_eq!(beams.get(0).unwrap().reflectivity_01db(), -120);
    }

    #[test]
    fn raw_range_sectors_and_beams() {
        let mut body: Vec<u8> = vec![0u8; EmxRawRangeInfo::SIZE];
        body[2..4].copy_from_slice(&1u16.to_le_bytes());
        body[4..6].copy_from_slice(&2u16.to_le_bytes());

        let mut sector: Vec<u8> = vec![0u8; EmxRawRangeTxSector::SIZE];
        sector[12..16].copy_from_slice(&95_000.0f32.to_le_bytes());
        body.extend_from_slice(&sector);

        for i in 0..2u16 {
            let mut beam: Vec<u8> = vec![0u8; EmxRawRangeBeam::SIZE];
            beam[8..12].copy_from_slice(&(0.1 * f32::from(i + 1)).to_le_bytes());
            body.extend_from_slice(&beam);
        }

        let rra: EmxRawRangeAngle = layout_raw_range(&body).unwrap();
        assert_eq!(rra.tx_sectors.as_ref().unwrap().len(), 1);
        assert_eq!(
            rra.tx_sectors.as_ref().unwrap().get(0).unwrap().centre_freq_hz(),
            95_000.0
        );
        let beams = rra.beams.unwrap();
        assert_eq!(beams.get(1).unwrap().two_way_travel_time_sec(), 0.2);
    }

    pub(crate) fn sidescan_body(width: u8, samples_per_beam: &[u16]) -> Vec<u8> {
        let mut body: Vec<u8> = vec![0u8; EmxSidescanInfo::SIZE];
        body[14..16].copy_from_slice(&(samples_per_beam.len() as u16).to_le_bytes());
        body[16] = width;

        for (i, count) in samples_per_beam.iter().enumerate() {
            let mut info: Vec<u8> = vec![0u8; EmxSidescanBeamInfo::SIZE];
            info[0] = if i % 2 == 0 { 1 } else { 0xff };
            info[2..4].copy_from_slice(&count.to_le_bytes());
            // detect_sample past num_samples: seen in real EM1002 logs.
            info[4..6].copy_from_slice(&(count + 5).to_le_bytes());
            body.extend_from_slice(&info);
        }
        for count in samples_per_beam {
            for s in 0..*count {
                match width {
                    1 => body.push(s as u8),
                    _ => body.extend_from_slice(&(s as i16).to_le_bytes()),
                }
            }
        }
        body
    }

    #[test]
    fn sidescan_eight_bit_beams() {
        let body: Vec<u8> = sidescan_body(1, &[3, 0, 2]);
        let ss: EmxSidescan = layout_sidescan(&body).unwrap();

        assert_eq!(ss.info.num_beams(), 3);
        let beams: Vec<_> = ss.beams().collect();
        assert_eq!(beams.len(), 3);
        assert_eq!(beams[0].1.len(), 3);
        assert_eq!(beams[1].1.len(), 0);
        assert_eq!(beams[2].1.len(), 2);
        assert_eq!(beams[2].1.get(1), Some(1));
    }

    #[test]
    fn sidescan_sixteen_bit_beams() {
        let body: Vec<u8> = sidescan_body(2, &[2, 4]);
        let ss: EmxSidescan = layout_sidescan(&body).unwrap();

        let beams: Vec<_> = ss.beams().collect();
        assert!(matches!(beams[0].1, EmxSamples::Sixteen(_)));
        assert_eq!(beams[1].1.get(3), Some(3));
    }

    #[test]
    fn sidescan_detect_sample_past_count_is_kept() {
        let body: Vec<u8> = sidescan_body(1, &[4]);
        let ss: EmxSidescan = layout_sidescan(&body).unwrap();

        let (info, samples) = ss.beams().next().unwrap();
        assert_eq!(info.num_samples(), 4);
        assert_eq!(info.detect_sample(), 9); // past the sample count
        assert_eq!(samples.len(), 4);
    }

    #[test]
    fn sidescan_missing_samples_is_bad_data() {
        let mut body: Vec<u8> = sidescan_body(2, &[4]);
        body.truncate(body.len() - 3);

        assert!(matches!(layout_sidescan(&body), Err(ReaderError::BadData(_))));
    }

    #[test]
    fn sidescan_bad_width_is_bad_data() {
        let body: Vec<u8> = sidescan_body(3, &[]);
        assert!(matches!(layout_sidescan(&body), Err(ReaderError::BadData(_))));
    }

    pub(crate) fn water_column_body(width: u8, samples_per_beam: &[u16]) -> Vec<u8> {
        let mut body: Vec<u8> = vec![0u8; EmxWcInfo::SIZE];
        body[0..2].copy_from_slice(&1u16.to_le_bytes());
        body[2..4].copy_from_slice(&1u16.to_le_bytes());
        body[4..6].copy_from_slice(&1u16.to_le_bytes()); // one tx sector
        body[6..8].copy_from_slice(&(samples_per_beam.len() as u16).to_le_bytes());
        body[8..10].copy_from_slice(&(samples_per_beam.len() as u16).to_le_bytes());
        body[21] = width;

        let mut sector: Vec<u8> = vec![0u8; EmxWcTxSector::SIZE];
        sector[0..2].copy_from_slice(&(-300i16).to_le_bytes());
        body.extend_from_slice(&sector);

        for (i, count) in samples_per_beam.iter().enumerate() {
            let mut beam: Vec<u8> = vec![0u8; EmxWcBeamInfo::SIZE];
            beam[4..6].copy_from_slice(&count.to_le_bytes());
            beam[9] = i as u8;
            body.extend_from_slice(&beam);
            for s in 0..*count {
                match width {
                    1 => body.push(s as u8),
                    _ => body.extend_from_slice(&(s as i16).to_le_bytes()),
                }
            }
        }
        body
    }

    #[test]
    fn water_column_walk() {
        let body: Vec<u8> = water_column_body(1, &[5, 0, 2]);
        let wc: EmxWaterColumn = layout_water_column(&body).unwrap();

        assert_eq!(wc.tx_sectors.as_ref().unwrap().get(0).unwrap().tilt_angle_01deg(), -300);

        let beams: Vec<EmxWcBeam> = wc.beams().collect::<Result<_, _>>().unwrap();
        assert_eq!(beams.len(), 3);
        assert_eq!(beams[0].amplitudes.as_ref().unwrap().len(), 5);
        assert!(beams[1].amplitudes.is_none());
        assert_eq!(beams[1].header.num_samples(), 0);
        assert_eq!(beams[2].header.beam_number(), 2);
    }

    #[test]
    fn water_column_truncated_beam_fails() {
        let mut body: Vec<u8> = water_column_body(2, &[4]);
        body.truncate(body.len() - 2);
        let wc: EmxWaterColumn = layout_water_column(&body).unwrap();

        let mut iter = wc.beams();
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
    }
}
