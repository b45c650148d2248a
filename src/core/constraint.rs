//! Extra satisfiability constraints carried by imports.
//!
//! Constraints are opaque to the descriptors: they are stored, reported, and
//! handed to whoever matches imports against exports. They never take part
//! in import equality.

use std::fmt;
use std::sync::Arc;

use crate::core::contract::{ExportDefinition, MetadataValue};
use crate::core::TypeRef;

/// A predicate an export must satisfy to fulfil an import.
pub trait ImportSatisfiabilityConstraint: fmt::Debug + Send + Sync {
    /// Check an export against this constraint.
    fn is_satisfied_by(&self, export: &ExportDefinition) -> bool;

    /// Short human-readable description.
    fn describe(&self) -> String;
}

/// Shared handle to a constraint.
pub type ConstraintRef = Arc<dyn ImportSatisfiabilityConstraint>;

/// Requires an export metadata entry with an exact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataValueConstraint {
    key: String,
    value: MetadataValue,
}

impl MetadataValueConstraint {
    pub fn new(key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        MetadataValueConstraint {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &MetadataValue {
        &self.value
    }
}

impl ImportSatisfiabilityConstraint for MetadataValueConstraint {
    fn is_satisfied_by(&self, export: &ExportDefinition) -> bool {
        export.metadata_value(&self.key) == Some(&self.value)
    }

    fn describe(&self) -> String {
        format!("metadata `{}` == {}", self.key, self.value)
    }
}

/// Requires the export's contract to carry an exact type identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportTypeIdentityConstraint {
    type_identity: TypeRef,
}

impl ExportTypeIdentityConstraint {
    pub fn new(type_identity: TypeRef) -> Self {
        ExportTypeIdentityConstraint { type_identity }
    }

    pub fn type_identity(&self) -> TypeRef {
        self.type_identity
    }
}

impl ImportSatisfiabilityConstraint for ExportTypeIdentityConstraint {
    fn is_satisfied_by(&self, export: &ExportDefinition) -> bool {
        export.contract().type_identity() == self.type_identity
    }

    fn describe(&self) -> String {
        format!("export type is {}", self.type_identity)
    }
}
