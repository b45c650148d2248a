//! Part declarations as they appear in `*.parts.toml` catalog files.
//!
//! Declarations are plain data: strings for type identities and members,
//! with defaults filled in by serde. Turning them into descriptors is the
//! job of [`crate::discovery::discover`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{Cardinality, CreationPolicy, MemberKind, MetadataValue};

/// Contents of one catalog file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogManifest {
    /// Declared parts, in file order
    #[serde(default, rename = "part")]
    pub parts: Vec<PartDeclaration>,
}

impl CatalogManifest {
    /// Append the parts of another manifest.
    pub fn merge(&mut self, other: CatalogManifest) {
        self.parts.extend(other.parts);
    }
}

/// A declared part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartDeclaration {
    /// Qualified part type, e.g. `app::logging::Logger`
    #[serde(rename = "type")]
    pub part_type: String,

    /// Share instances in the root scope
    #[serde(default)]
    pub shared: Option<bool>,

    /// Share instances within the named scope (implies `shared`)
    #[serde(default)]
    pub sharing_boundary: Option<String>,

    /// Method called once all imports are satisfied
    #[serde(default)]
    pub on_activation: Option<String>,

    #[serde(default)]
    pub exports: Vec<ExportDeclaration>,

    #[serde(default)]
    pub imports: Vec<ImportDeclaration>,
}

impl PartDeclaration {
    /// Effective sharing boundary.
    ///
    /// `sharing-boundary` wins; `shared = true` alone means the root scope
    /// (empty boundary); neither means non-shared.
    pub fn effective_sharing_boundary(&self) -> anyhow::Result<Option<String>> {
        match (self.shared, &self.sharing_boundary) {
            (Some(false), Some(boundary)) => anyhow::bail!(
                "part `{}` declares `shared = false` with `sharing-boundary = \"{}\"`",
                self.part_type,
                boundary
            ),
            (_, Some(boundary)) => Ok(Some(boundary.clone())),
            (Some(true), None) => Ok(Some(String::new())),
            _ => Ok(None),
        }
    }
}

/// A declared export. Without `member`, the export is offered by the type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ExportDeclaration {
    /// Exported contract type
    pub contract: String,

    /// Contract name
    #[serde(default)]
    pub name: Option<String>,

    /// Exporting member
    #[serde(default)]
    pub member: Option<String>,

    /// Kind of the exporting member (default: property)
    #[serde(default)]
    pub kind: Option<MemberKind>,

    #[serde(default)]
    pub metadata: BTreeMap<String, MetadataLiteral>,
}

/// A declared import on a member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ImportDeclaration {
    /// Importing member
    pub member: String,

    #[serde(default)]
    pub kind: MemberKind,

    /// Requested contract type, including any wrapper
    pub contract: String,

    /// Contract name
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub cardinality: Cardinality,

    /// Policy-driven form: sharing required of the export
    #[serde(default)]
    pub creation_policy: Option<CreationPolicy>,

    /// Metadata-driven form: scopes opened by a factory import
    #[serde(default)]
    pub factory_sharing_boundaries: Option<Vec<String>>,

    /// Metadata keys and types exports must carry
    #[serde(default)]
    pub metadata_shape: BTreeMap<String, String>,

    /// Exact metadata values exports must carry
    #[serde(default)]
    pub required_metadata: BTreeMap<String, MetadataLiteral>,

    /// Exact type identity the export must have
    #[serde(default)]
    pub export_type: Option<String>,
}

/// A metadata value literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataLiteral {
    Bool(bool),
    Integer(i64),
    String(String),
}

impl From<MetadataLiteral> for MetadataValue {
    fn from(literal: MetadataLiteral) -> Self {
        match literal {
            MetadataLiteral::Bool(b) => MetadataValue::Bool(b),
            MetadataLiteral::Integer(i) => MetadataValue::Integer(i),
            MetadataLiteral::String(s) => MetadataValue::String(s),
        }
    }
}
