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

//! # echolog
//! Reader library for the two binary log formats written by Kongsberg
//! multibeam echosounders: the current KMA format and the legacy EMX
//! format.
//!
//! A log file is a sequence of variable-length, type-tagged records
//! (datagrams). The readers in this crate pull one datagram at a time
//! from an open file and hand back a typed view of its headers, counted
//! arrays, and trailing payloads. Views borrow the reader's internal
//! buffer, so a view is only usable until the next read on the same
//! reader.
//!
//! ### Getting Started
//! The recommended way to get started is to enable all features.
//! Do this by enabling the `full` feature flag:
//! ```toml
//! echolog = { version = "0.1.0", features = ["full"] }
//! ```
//!
//! ### Feature Flags
//! The crate provides a set of feature flags to reduce the amount of
//! compiled code. Below is a list of the available feature flags.
//!
//! - **`full`**: Enables all format readers.
//! - **`kma`**: Includes the KMA format reader.
//! - **`emx`**: Includes the EMX format reader.
//! - **`serde`**: Serialization derives on headers and error codes.

#![allow(clippy::module_inception)]
#![deny(unused_extern_crates)]

pub mod globals;

use cfg_if::cfg_if;
use log::LevelFilter;

mod buffer;
mod frame;

pub mod bytes;
pub mod error;

pub use error::{ErrorCode, ReaderError};

cfg_if! {
    if #[cfg(feature = "kma")] {
        pub mod kma;
    }
}

cfg_if! {
    if #[cfg(feature = "emx")] {
        pub mod emx;
    }
}

/// Installs a fallback `pretty_env_logger` so frame-level diagnostics
/// have somewhere to go. A logger the embedding process already set
/// wins; `try_init` refuses to replace it and the error is dropped.
pub(crate) fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

/// Sets the process-wide verbosity of the reader's diagnostic output.
///
/// All structural anomalies found while reading are reported through the
/// [`log`] facade; this is a convenience wrapper over
/// [`log::set_max_level`]. Diagnostic output is advisory and never
/// changes what a reader returns. Configure once, before opening readers.
///
/// [`log`]: https://docs.rs/log/latest/log/
pub fn set_debug_level(level: LevelFilter) {
    init_logger();
    log::set_max_level(level);
}
