//! Import wrapper classification.
//!
//! An import may ask for the exported value directly, for a deferred value
//! (`Lazy<T>` / `Lazy<T, M>`), or for a repeatable factory
//! (`ExportFactory<T>` / `ExportFactory<T, M>`, in two historical forms).
//! The wrapper is recognized from the generic definition of the contract's
//! type identity and its argument count.
//!
//! Each generic definition is registered with exactly one [`WrapperShape`],
//! so a type can never classify as both lazy and factory.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::type_ref::validate_path;
use crate::core::TypeRef;

/// Generic definition of the deferred-value wrapper.
pub const LAZY_TYPE: &str = "composition::Lazy";

/// Generic definition of the first-generation factory wrapper.
pub const EXPORT_FACTORY_V1_TYPE: &str = "composition::v1::ExportFactory";

/// Generic definition of the second-generation factory wrapper.
pub const EXPORT_FACTORY_V2_TYPE: &str = "composition::ExportFactory";

static STANDARD_SHAPES: LazyLock<WrapperShapes> = LazyLock::new(|| {
    let mut shapes = WrapperShapes::empty();
    shapes.insert(LAZY_TYPE, WrapperShape::Lazy);
    shapes.insert(
        EXPORT_FACTORY_V1_TYPE,
        WrapperShape::Factory(FactoryGeneration::V1),
    );
    shapes.insert(
        EXPORT_FACTORY_V2_TYPE,
        WrapperShape::Factory(FactoryGeneration::V2),
    );
    shapes
});

/// Coarse wrapper classification seen by the resolution engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WrapperKind {
    Direct,
    Lazy,
    Factory,
}

impl fmt::Display for WrapperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WrapperKind::Direct => write!(f, "direct"),
            WrapperKind::Lazy => write!(f, "lazy"),
            WrapperKind::Factory => write!(f, "factory"),
        }
    }
}

/// Which historical factory form a factory wrapper uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FactoryGeneration {
    V1,
    V2,
}

/// Shape a generic definition is registered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperShape {
    Lazy,
    Factory(FactoryGeneration),
}

/// Fully tagged wrapper classification of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportWrapper {
    Direct,
    Lazy {
        value: TypeRef,
    },
    LazyWithMetadata {
        value: TypeRef,
        metadata: TypeRef,
    },
    Factory {
        value: TypeRef,
        generation: FactoryGeneration,
    },
    FactoryWithMetadata {
        value: TypeRef,
        metadata: TypeRef,
        generation: FactoryGeneration,
    },
}

impl ImportWrapper {
    pub fn kind(&self) -> WrapperKind {
        match self {
            ImportWrapper::Direct => WrapperKind::Direct,
            ImportWrapper::Lazy { .. } | ImportWrapper::LazyWithMetadata { .. } => {
                WrapperKind::Lazy
            }
            ImportWrapper::Factory { .. } | ImportWrapper::FactoryWithMetadata { .. } => {
                WrapperKind::Factory
            }
        }
    }

    /// Metadata view type, present only for the two-argument wrapper forms.
    pub fn metadata_type(&self) -> Option<TypeRef> {
        match self {
            ImportWrapper::LazyWithMetadata { metadata, .. }
            | ImportWrapper::FactoryWithMetadata { metadata, .. } => Some(*metadata),
            _ => None,
        }
    }

    /// Type produced by the wrapper, absent for direct imports.
    pub fn value_type(&self) -> Option<TypeRef> {
        match self {
            ImportWrapper::Direct => None,
            ImportWrapper::Lazy { value }
            | ImportWrapper::LazyWithMetadata { value, .. }
            | ImportWrapper::Factory { value, .. }
            | ImportWrapper::FactoryWithMetadata { value, .. } => Some(*value),
        }
    }

    pub fn factory_generation(&self) -> Option<FactoryGeneration> {
        match self {
            ImportWrapper::Factory { generation, .. }
            | ImportWrapper::FactoryWithMetadata { generation, .. } => Some(*generation),
            _ => None,
        }
    }
}

/// Registry of generic definitions recognized as wrappers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperShapes {
    shapes: BTreeMap<String, WrapperShape>,
}

impl WrapperShapes {
    /// A registry that recognizes nothing; every import classifies as direct.
    pub fn empty() -> Self {
        WrapperShapes {
            shapes: BTreeMap::new(),
        }
    }

    /// The built-in lazy and factory wrappers.
    pub fn standard() -> &'static WrapperShapes {
        &STANDARD_SHAPES
    }

    fn insert(&mut self, generic_definition: &str, shape: WrapperShape) -> Option<WrapperShape> {
        self.shapes.insert(generic_definition.to_string(), shape)
    }

    /// Register a generic definition, replacing any previous shape for it.
    ///
    /// Returns the shape previously registered under the same definition.
    pub fn register(
        &mut self,
        generic_definition: &str,
        shape: WrapperShape,
    ) -> Result<Option<WrapperShape>> {
        validate_path(generic_definition)?;
        let previous = self.insert(generic_definition, shape);
        if let Some(prev) = previous {
            if prev != shape {
                tracing::debug!(
                    "wrapper `{}` re-registered from {:?} to {:?}",
                    generic_definition,
                    prev,
                    shape
                );
            }
        }
        Ok(previous)
    }

    /// Shape registered for a generic definition.
    pub fn shape_of(&self, generic_definition: &str) -> Option<WrapperShape> {
        self.shapes.get(generic_definition).copied()
    }

    /// Iterate registered definitions in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, WrapperShape)> {
        self.shapes.iter().map(|(name, shape)| (name.as_str(), *shape))
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Classify a type identity.
    ///
    /// Total: shapes that are not registered, and registered shapes with an
    /// argument count other than one or two, are direct requests.
    pub fn classify(&self, ty: TypeRef) -> ImportWrapper {
        let shape = self.shape_of(ty.generic_definition());
        match (shape, ty.type_args()) {
            (Some(WrapperShape::Lazy), [value]) => ImportWrapper::Lazy { value: *value },
            (Some(WrapperShape::Lazy), [value, metadata]) => ImportWrapper::LazyWithMetadata {
                value: *value,
                metadata: *metadata,
            },
            (Some(WrapperShape::Factory(generation)), [value]) => ImportWrapper::Factory {
                value: *value,
                generation,
            },
            (Some(WrapperShape::Factory(generation)), [value, metadata]) => {
                ImportWrapper::FactoryWithMetadata {
                    value: *value,
                    metadata: *metadata,
                    generation,
                }
            }
            _ => ImportWrapper::Direct,
        }
    }
}

impl Default for WrapperShapes {
    fn default() -> Self {
        WrapperShapes::standard().clone()
    }
}
