//! High-level operations.
//!
//! This module contains the implementation of compose commands. Each
//! operation takes an already-loaded [`crate::core::Catalog`] and returns a
//! report; rendering lives next to the report type.

pub mod check;
pub mod imports;
pub mod inspect;

pub use check::{check_catalog, CheckReport};
pub use imports::{format_groups, format_groups_json, import_groups, ImportGroupReport, SiteReport};
pub use inspect::{
    format_reports, format_reports_json, inspect_catalog, select_parts, ExportReport,
    ImportReport, InspectOptions, PartReport, SharingReport,
};
