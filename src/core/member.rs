//! Member locators.
//!
//! A MemberRef points at a field, property, method, or constructor parameter
//! of a part type. It keys member-level exports and imports, and names the
//! activation-completed callback.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{DescriptorError, Result};
use crate::core::TypeRef;

/// Kind of member a locator points at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum MemberKind {
    Field,
    #[default]
    Property,
    Method,
    /// Importing-constructor parameter
    Parameter,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Field => write!(f, "field"),
            MemberKind::Property => write!(f, "property"),
            MemberKind::Method => write!(f, "method"),
            MemberKind::Parameter => write!(f, "parameter"),
        }
    }
}

/// Locator for a member of a part type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberRef {
    declaring_type: TypeRef,
    name: String,
    kind: MemberKind,
}

impl MemberRef {
    /// Create a member locator.
    pub fn new(declaring_type: TypeRef, name: impl Into<String>, kind: MemberKind) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DescriptorError::invalid("member", "member name is empty"));
        }
        Ok(MemberRef {
            declaring_type,
            name,
            kind,
        })
    }

    pub fn field(declaring_type: TypeRef, name: impl Into<String>) -> Result<Self> {
        Self::new(declaring_type, name, MemberKind::Field)
    }

    pub fn property(declaring_type: TypeRef, name: impl Into<String>) -> Result<Self> {
        Self::new(declaring_type, name, MemberKind::Property)
    }

    pub fn method(declaring_type: TypeRef, name: impl Into<String>) -> Result<Self> {
        Self::new(declaring_type, name, MemberKind::Method)
    }

    pub fn declaring_type(&self) -> TypeRef {
        self.declaring_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn is_method(&self) -> bool {
        self.kind == MemberKind::Method
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.name)?;
        if self.kind == MemberKind::Method {
            write!(f, "()")?;
        }
        Ok(())
    }
}
