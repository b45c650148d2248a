//! Core descriptor types.
//!
//! This module contains the immutable metadata model of a composition:
//! - Interned type identities and member locators
//! - Contracts, exports, and import satisfiability constraints
//! - Import definitions and their wrapper classification
//! - Part definitions and the catalog that holds them

pub mod catalog;
pub mod constraint;
pub mod contract;
pub mod error;
pub mod import;
pub mod member;
pub mod part;
pub mod type_ref;
pub mod wrapper;

pub use catalog::{Catalog, ImportGroup, ImportSite};
pub use constraint::{
    ConstraintRef, ExportTypeIdentityConstraint, ImportSatisfiabilityConstraint,
    MetadataValueConstraint,
};
pub use contract::{Contract, ExportDefinition, MetadataValue};
pub use error::DescriptorError;
pub use import::{Cardinality, CreationPolicy, ImportDefinition, ImportDefinitionBuilder};
pub use member::{MemberKind, MemberRef};
pub use part::{MemberExports, MemberImports, PartDefinition, PartDefinitionBuilder};
pub use type_ref::TypeRef;
pub use wrapper::{FactoryGeneration, ImportWrapper, WrapperKind, WrapperShape, WrapperShapes};
