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

//! Pull-style reader for KMA format log files.
//!
//! A KMA file is a sequence of framed datagrams, each a 4-byte length,
//! a 20-byte header (the length field is the header's first field), the
//! body, and a repeated trailing length. [`KmaReader::read`] frames and
//! lays out the next datagram; the returned [`KmaDgm`] borrows the
//! reader's buffer and lives until the next read.
//!
//! ```no_run
//! use echolog::kma::{KmaBody, KmaReader};
//!
//! # fn main() -> Result<(), echolog::ReaderError> {
//! let mut reader = KmaReader::open("survey.kma")?;
//! while let Some(dgm) = reader.read()? {
//!     if let KmaBody::Mrz(mrz) = &dgm.body {
//!         let soundings = mrz.soundings.map_or(0, |s| s.len());
//!         println!("ping {}: {} soundings", mrz.common.ping_cnt(), soundings);
//!     }
//! }
//! reader.close()
//! # }
//! ```

pub mod beams;
pub mod calib;
pub mod dgm;
pub mod header;
pub mod install;
pub mod ping;
pub mod sensor;

pub use dgm::{KmaBody, KmaDgm};
pub use header::{DgmHeader, DgmType};

use crate::buffer::ReadBuffer;
use crate::error::{ErrorCode, ReaderError};
use crate::frame::{self, Filled};
use log::debug;
use std::fs::File;
use std::path::Path;

/// A reader over one open KMA log file.
pub struct KmaReader {
    file: File,
    buffer: ReadBuffer,
    last_error: ErrorCode,
    ignore_watercolumn: bool,
    ignore_soundings: bool,
}

impl KmaReader {
    /// Opens a log file for sequential reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReaderError> {
        crate::init_logger();
        let file: File = File::open(path.as_ref()).map_err(ReaderError::OpenFailed)?;

        Ok(Self {
            file,
            buffer: ReadBuffer::new(),
            last_error: ErrorCode::None,
            ignore_watercolumn: false,
            ignore_soundings: false,
        })
    }

    /// Frames and lays out the next datagram in file order.
    ///
    /// `Ok(None)` is a clean end-of-file at a frame boundary and does
    /// not touch [`last_error`](Self::last_error). Datagrams elided by
    /// the skip toggles are seeked past, not returned. After an error,
    /// further reads are not defined to resynchronize; close the reader.
    pub fn read(&mut self) -> Result<Option<KmaDgm<'_>>, ReaderError> {
        let (header, payload_len) = match self.next_frame()? {
            Some(frame) => frame,
            None => return Ok(None),
        };
        // The payload ends with the repeated length field, which is not
        // part of any datagram body.
        let body: &[u8] = &self.buffer.slice(payload_len)[..payload_len - 4];

        match dispatch(&header, body) {
            Ok(body) => Ok(Some(KmaDgm { header, body })),
            Err(e) => {
                self.last_error = e.code();
                Err(e)
            }
        }
    }

    /// Drops the file and buffer. The reader cannot be reopened.
    pub fn close(self) -> Result<(), ReaderError> {
        // Dropping the descriptor is the only portable close; it cannot
        // report failure, so this never returns CloseFailed today.
        drop(self.file);
        Ok(())
    }

    /// The code of the most recent failure on this reader.
    ///
    /// Never cleared by a successful read; see [`ErrorCode`].
    pub fn last_error(&self) -> ErrorCode {
        self.last_error
    }

    /// Skips `#MWC` water-column datagrams by seeking past their
    /// payloads. Water column dominates a log file's volume, so a
    /// bathymetry-only consumer saves most of the file's I/O.
    pub fn set_ignore_watercolumn(&mut self, ignore: bool) {
        self.ignore_watercolumn = ignore;
    }

    /// Skips `#MRZ` sounding datagrams by seeking past their payloads.
    pub fn set_ignore_soundings(&mut self, ignore: bool) {
        self.ignore_soundings = ignore;
    }

    fn next_frame(&mut self) -> Result<Option<(DgmHeader, usize)>, ReaderError> {
        match self.frame_once() {
            Ok(frame) => Ok(frame),
            Err(e) => {
                self.last_error = e.code();
                Err(e)
            }
        }
    }

    /// Frames datagrams until one is kept: read a header, validate,
    /// then either seek past a skipped class and continue or fill the
    /// buffer with the payload and stop.
    fn frame_once(&mut self) -> Result<Option<(DgmHeader, usize)>, ReaderError> {
        loop {
            let mut raw = [0u8; DgmHeader::SIZE];
            if frame::read_frame_start(&mut self.file, &mut raw)? == Filled::Eof {
                return Ok(None);
            }
            let header: DgmHeader = DgmHeader::decode(&raw);
            header.validate()?;

            let payload_len: usize = header.num_bytes_dgm as usize - DgmHeader::SIZE;
            if self.skips(header.kind()) {
                debug!(
                    "skipping {} datagram of {} bytes",
                    String::from_utf8_lossy(&header.type_tag()),
                    header.num_bytes_dgm
                );
                frame::skip_forward(&mut self.file, payload_len as u64)?;
                continue;
            }

            self.buffer.ensure_capacity(payload_len)?;
            frame::read_payload(&mut self.file, self.buffer.slice_mut(payload_len))?;
            return Ok(Some((header, payload_len)));
        }
    }

    fn skips(&self, kind: Option<DgmType>) -> bool {
        match kind {
            Some(DgmType::Mwc) => self.ignore_watercolumn,
            Some(DgmType::Mrz) => self.ignore_soundings,
            _ => false,
        }
    }
}

/// Checks whether `path` plausibly is a KMA log file.
///
/// Reads and validates exactly one header, which is cheap but loose: a
/// file corrupted after its first datagram still identifies as KMA.
/// `Ok(false)` covers files that are well-formed something-else; `Err`
/// is reserved for open and read faults.
pub fn identify(path: impl AsRef<Path>) -> Result<bool, ReaderError> {
    crate::init_logger();
    let mut file: File = File::open(path.as_ref()).map_err(ReaderError::OpenFailed)?;

    let mut raw = [0u8; DgmHeader::SIZE];
    match frame::read_frame_start(&mut file, &mut raw) {
        Ok(Filled::Full) => Ok(DgmHeader::decode(&raw).validate().is_ok()),
        // Shorter than one header: cannot be ours.
        Ok(Filled::Eof) => Ok(false),
        Err(ReaderError::BadData(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

fn dispatch<'a>(header: &DgmHeader, body: &'a [u8]) -> Result<KmaBody<'a>, ReaderError> {
    let kind: DgmType = match header.kind() {
        Some(kind) => kind,
        None => {
            debug!(
                "unknown datagram type {:?}, returning raw body",
                String::from_utf8_lossy(&header.type_tag())
            );
            return Ok(KmaBody::Unknown(body));
        }
    };

    Ok(match kind {
        DgmType::Iip => KmaBody::Iip(install::layout_param_text(body)?),
        DgmType::Iop => KmaBody::Iop(install::layout_param_text(body)?),
        DgmType::Ibe => KmaBody::Ibe(install::layout_bist(body)?),
        DgmType::Ibr => KmaBody::Ibr(install::layout_bist(body)?),
        DgmType::Ibs => KmaBody::Ibs(install::layout_bist(body)?),
        DgmType::Mrz => KmaBody::Mrz(ping::layout_mrz(body, header.dgm_version)?),
        DgmType::Mwc => KmaBody::Mwc(ping::layout_mwc(body)?),
        DgmType::Spo => KmaBody::Spo(sensor::layout_spo(body)?),
        DgmType::Skm => KmaBody::Skm(sensor::layout_skm(body)?),
        DgmType::Svp => KmaBody::Svp(sensor::layout_svp(body)?),
        DgmType::Svt => KmaBody::Svt(sensor::layout_svt(body)?),
        DgmType::Scl => KmaBody::Scl(sensor::layout_scl(body)?),
        DgmType::Sde => KmaBody::Sde(sensor::layout_sde(body, header.dgm_version)?),
        DgmType::Shi => KmaBody::Shi(sensor::layout_shi(body)?),
        DgmType::Cpo => KmaBody::Cpo(sensor::layout_cpo(body)?),
        DgmType::Che => KmaBody::Che(sensor::layout_che(body)?),
        DgmType::Fcf => KmaBody::Fcf(calib::layout_fcf(body)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    /// Frames `body` as one KMA datagram: header, body, trailing length.
    fn kma_frame(tag: &[u8; 4], dgm_version: u8, body: &[u8]) -> Vec<u8> {
        let num_bytes: u32 = (DgmHeader::SIZE + body.len() + 4) as u32;
        let mut frame: Vec<u8> = vec![];
        frame.extend_from_slice(&num_bytes.to_le_bytes());
        frame.extend_from_slice(tag);
        frame.push(dgm_version);
        frame.push(0); // system id
        frame.extend_from_slice(&710u16.to_le_bytes());
        frame.extend_from_slice(&1_700_000_000u32.to_le_bytes());
        frame.extend_from_slice(&0u32.to_le_bytes());
        frame.extend_from_slice(body);
        frame.extend_from_slice(&num_bytes.to_le_bytes());
        frame
    }

    fn iip_body(txt: &[u8]) -> Vec<u8> {
        let mut body: Vec<u8> = vec![];
        body.extend_from_slice(&6u16.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(txt);
        body
    }

    fn write_log(name: &str, contents: &[u8]) -> PathBuf {
        let mut path: PathBuf = std::env::temp_dir();
        path.push(format!("echolog-kma-{}-{}.kma", std::process::id(), name));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn reads_datagrams_in_file_order() {
        let mut log: Vec<u8> = vec![];
        log.extend_from_slice(&kma_frame(b"#IIP", 1, &iip_body(b"a,b,c;")));
        log.extend_from_slice(&kma_frame(b"#IOP", 1, &iip_body(b"runtime")));
        let path = write_log("order", &log);

        let mut reader = KmaReader::open(&path).unwrap();
        {
            let first = reader.read().unwrap().unwrap();
            assert_eq!(first.header.kind(), Some(DgmType::Iip));
            match &first.body {
                KmaBody::Iip(iip) => assert_eq!(iip.text_bytes(), b"a,b,c;"),
                body => panic!("expected IIP, got {:?}", body),
            }
        }
        {
            let second = reader.read().unwrap().unwrap();
            assert_eq!(second.header.kind(), Some(DgmType::Iop));
        }
        assert!(reader.read().unwrap().is_none());
        assert_eq!(reader.last_error(), ErrorCode::None);

        reader.close().unwrap();
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn bad_second_header_sets_bad_data() {
        let mut log: Vec<u8> = vec![];
        log.extend_from_slice(&kma_frame(b"#IIP", 1, &iip_body(b"")));
        // A header declaring 8 bytes, below the 24-byte minimum.
        let mut bad: Vec<u8> = kma_frame(b"#IIP", 1, &[]);
        bad[0..4].copy_from_slice(&8u32.to_le_bytes());
        log.extend_from_slice(&bad);
        let path = write_log("badlen", &log);

        let mut reader = KmaReader::open(&path).unwrap();
        assert!(reader.read().unwrap().is_some());
        assert!(matches!(reader.read(), Err(ReaderError::BadData(_))));
        assert_eq!(reader.last_error(), ErrorCode::BadData);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn truncated_payload_sets_bad_data() {
        let mut log: Vec<u8> = kma_frame(b"#IIP", 1, &iip_body(b"text"));
        log.truncate(log.len() - 6);
        let path = write_log("truncated", &log);

        let mut reader = KmaReader::open(&path).unwrap();
        assert!(matches!(reader.read(), Err(ReaderError::BadData(_))));
        assert_eq!(reader.last_error(), ErrorCode::BadData);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unknown_type_is_returned_raw() {
        let log: Vec<u8> = kma_frame(b"#QQQ", 0, &[1, 2, 3, 4]);
        let path = write_log("unknown", &log);

        let mut reader = KmaReader::open(&path).unwrap();
        {
            let dgm = reader.read().unwrap().unwrap();
            assert_eq!(dgm.header.kind(), None);
            match &dgm.body {
                KmaBody::Unknown(raw) => assert_eq!(*raw, &[1, 2, 3, 4][..]),
                body => panic!("expected Unknown, got {:?}", body),
            }
        }
        // Not an error; the stream continues to clean EOF.
        assert!(reader.read().unwrap().is_none());
        assert_eq!(reader.last_error(), ErrorCode::None);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn skip_via_seek_does_not_allocate() {
        // 1000 water-column frames with bodies the reader never loads.
        let frame: Vec<u8> = {
            let body = super::ping::tests::mwc_body(0, &[64, 64, 64]);
            kma_frame(b"#MWC", 0, &body)
        };
        let mut log: Vec<u8> = vec![];
        for _ in 0..1000 {
            log.extend_from_slice(&frame);
        }
        let path = write_log("skipwc", &log);

        let mut reader = KmaReader::open(&path).unwrap();
        reader.set_ignore_watercolumn(true);
        assert!(reader.read().unwrap().is_none());
        assert_eq!(reader.last_error(), ErrorCode::None);
        assert_eq!(reader.buffer.capacity(), 0);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn toggles_elide_without_reordering() {
        let mut log: Vec<u8> = vec![];
        log.extend_from_slice(&kma_frame(b"#IIP", 1, &iip_body(b"i")));
        log.extend_from_slice(&kma_frame(b"#MRZ", 0, &super::ping::tests::mrz_body(0, 1, 2, 0)));
        log.extend_from_slice(&kma_frame(b"#MWC", 0, &super::ping::tests::mwc_body(0, &[4])));
        log.extend_from_slice(&kma_frame(b"#IOP", 1, &iip_body(b"o")));
        let path = write_log("toggles", &log);

        let mut reader = KmaReader::open(&path).unwrap();
        reader.set_ignore_watercolumn(true);
        reader.set_ignore_soundings(true);

        let mut kinds: Vec<Option<DgmType>> = vec![];
        while let Some(dgm) = reader.read().unwrap() {
            kinds.push(dgm.header.kind());
        }
        assert_eq!(kinds, vec![Some(DgmType::Iip), Some(DgmType::Iop)]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn identify_checks_one_header() {
        let path = write_log("identify-yes", &kma_frame(b"#SPO", 0, &[0u8; 48]));
        assert!(identify(&path).unwrap());
        std::fs::remove_file(&path).unwrap();

        // Length says 28 but the type word has no '#'.
        let mut bogus: Vec<u8> = kma_frame(b"#IIP", 1, &iip_body(b""));
        bogus[4] = 0x7b;
        let path = write_log("identify-no", &bogus);
        assert!(!identify(&path).unwrap());
        std::fs::remove_file(&path).unwrap();

        let path = write_log("identify-short", &[0x24, 0x00]);
        assert!(!identify(&path).unwrap());
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            identify("/nonexistent/echolog.kma"),
            Err(ReaderError::OpenFailed(_))
        ));
    }
}
