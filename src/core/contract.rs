//! Contracts and export definitions.
//!
//! A Contract is the matching key between imports and exports: a type
//! identity, an optional contract name, and the metadata shape an importer
//! expects. Exports are opaque to this crate beyond the contract they offer
//! and the metadata they carry.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::core::TypeRef;

/// The matching key linking imports to exports.
///
/// Two contracts are equal iff type identity, name, and metadata shape all
/// match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Contract {
    type_identity: TypeRef,
    name: Option<String>,
    metadata_constraints: BTreeMap<String, TypeRef>,
}

impl Contract {
    /// Create an unnamed contract for a type.
    pub fn new(type_identity: TypeRef) -> Self {
        Contract {
            type_identity,
            name: None,
            metadata_constraints: BTreeMap::new(),
        }
    }

    /// Set the contract name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Require a metadata key of the given type.
    pub fn with_metadata_constraint(mut self, key: impl Into<String>, ty: TypeRef) -> Self {
        self.metadata_constraints.insert(key.into(), ty);
        self
    }

    pub fn type_identity(&self) -> TypeRef {
        self.type_identity
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Metadata keys and types an importer requires of matching exports.
    pub fn metadata_constraints(&self) -> &BTreeMap<String, TypeRef> {
        &self.metadata_constraints
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_identity)?;
        if let Some(ref name) = self.name {
            write!(f, " (\"{}\")", name)?;
        }
        Ok(())
    }
}

/// A metadata value attached to an export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Integer(i64),
    String(String),
    Type(TypeRef),
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Bool(b) => write!(f, "{}", b),
            MetadataValue::Integer(i) => write!(f, "{}", i),
            MetadataValue::String(s) => write!(f, "\"{}\"", s),
            MetadataValue::Type(t) => write!(f, "{}", t),
        }
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Bool(b)
    }
}

impl From<i64> for MetadataValue {
    fn from(i: i64) -> Self {
        MetadataValue::Integer(i)
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::String(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::String(s)
    }
}

impl From<TypeRef> for MetadataValue {
    fn from(t: TypeRef) -> Self {
        MetadataValue::Type(t)
    }
}

/// A capability offered by a part, at type level or on a member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExportDefinition {
    contract: Contract,
    metadata: BTreeMap<String, MetadataValue>,
}

impl ExportDefinition {
    /// Create an export with no metadata.
    pub fn new(contract: Contract) -> Self {
        ExportDefinition {
            contract,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn metadata(&self) -> &BTreeMap<String, MetadataValue> {
        &self.metadata
    }

    /// Look up a single metadata value.
    pub fn metadata_value(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }
}

impl fmt::Display for ExportDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.contract)
    }
}
