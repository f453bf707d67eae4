//! Core library for reading Steam's local configuration and reporting, per
//! installed app, the compatibility tool and launch options in effect.
//!
//! This crate is CLI-agnostic. It exposes:
//! - `vdf`: the text key-value format (`.vdf` / `.acf`) to `Record` converters.
//! - `steam`: install paths, active user, and the per-app mappings.
//! - `report`: joining the mappings per app and rendering them.
//! - `core_log::CoreLog`: thin logging trait the host (CLI/tests) can implement.
//!
//! Import the `prelude` if you want the most common types in scope.

pub mod core_log;
pub mod error;

pub mod report;
pub mod steam;
pub mod vdf;

/// Convenient re-exports for downstream users (CLI/tests).
pub use core_log::CoreLog;
pub use error::CoreError;

pub mod prelude {
    pub use crate::core_log::{CoreLog, MemoryLog, NoopLog};
    pub use crate::error::CoreError;

    // Format
    pub use crate::vdf::record::{Record, Value};
    pub use crate::vdf::{Converter, load_record};

    // Install discovery + loaders
    pub use crate::steam::config::{AppManifest, ConfigSnapshot, load_app_manifest};
    pub use crate::steam::paths::{SteamPaths, active_user, installed_app_ids};

    // Report
    pub use crate::report::format::format_name;
    pub use crate::report::{AppFilter, Report, ReportOptions};
}
