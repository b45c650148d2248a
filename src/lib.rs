//! composition - descriptors for composable parts
//!
//! This crate provides the immutable metadata model consumed by a
//! dependency-injection resolution engine: part definitions, import
//! definitions with wrapper classification, and the catalog that holds
//! them, plus discovery from declarative catalog files.

pub mod core;
pub mod discovery;
pub mod ops;
pub mod util;

/// Test utilities and fixtures for unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    catalog::Catalog, error::DescriptorError, import::ImportDefinition, part::PartDefinition,
    type_ref::TypeRef, wrapper::WrapperShapes,
};

pub use util::context::GlobalContext;
