//! Import definitions.
//!
//! An ImportDefinition describes one dependency a part requires: the contract
//! it asks for, how many matching exports it accepts, extra constraints, and
//! the wrapper shape (direct, lazy, or factory) the value is requested in.
//!
//! The wrapper is classified once, when the definition is built, and stored.
//!
//! # Equality
//!
//! Two imports are equal iff their contracts and cardinalities are equal.
//! Extra constraints, the required creation policy, and factory sharing
//! boundaries are deliberately ignored, and the hash is the contract's hash.
//! Resolution relies on this granularity to fold structurally identical
//! requests together; tightening it changes resolution behavior.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::core::constraint::ConstraintRef;
use crate::core::error::{DescriptorError, Result};
use crate::core::wrapper::{ImportWrapper, WrapperKind, WrapperShapes};
use crate::core::{Contract, TypeRef};

/// How many matching exports an import accepts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    #[default]
    ExactlyOne,
    ZeroOrOne,
    ZeroOrMore,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::ExactlyOne => write!(f, "exactly-one"),
            Cardinality::ZeroOrOne => write!(f, "zero-or-one"),
            Cardinality::ZeroOrMore => write!(f, "zero-or-more"),
        }
    }
}

/// Sharing an import requires of the export that satisfies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CreationPolicy {
    #[default]
    Any,
    Shared,
    NonShared,
}

impl fmt::Display for CreationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreationPolicy::Any => write!(f, "any"),
            CreationPolicy::Shared => write!(f, "shared"),
            CreationPolicy::NonShared => write!(f, "non-shared"),
        }
    }
}

/// A dependency requirement declared by a part.
#[derive(Debug, Clone)]
pub struct ImportDefinition {
    contract: Contract,
    cardinality: Cardinality,
    extra_constraints: Vec<ConstraintRef>,
    required_creation_policy: CreationPolicy,
    factory_sharing_boundaries: BTreeSet<String>,
    wrapper: ImportWrapper,
}

impl ImportDefinition {
    /// Create an import from metadata-driven declarations.
    ///
    /// The required creation policy is `Any`.
    pub fn new(
        contract: Contract,
        cardinality: Cardinality,
        extra_constraints: Vec<ConstraintRef>,
        factory_sharing_boundaries: BTreeSet<String>,
    ) -> Self {
        let wrapper = WrapperShapes::standard().classify(contract.type_identity());
        ImportDefinition {
            contract,
            cardinality,
            extra_constraints,
            required_creation_policy: CreationPolicy::Any,
            factory_sharing_boundaries,
            wrapper,
        }
    }

    /// Create an import from policy-driven declarations.
    ///
    /// Builds through [`ImportDefinition::new`] with no factory sharing
    /// boundaries, then replaces the default policy with the given one.
    pub fn with_creation_policy(
        contract: Contract,
        cardinality: Cardinality,
        extra_constraints: Vec<ConstraintRef>,
        required_creation_policy: CreationPolicy,
    ) -> Self {
        let mut import = Self::new(contract, cardinality, extra_constraints, BTreeSet::new());
        import.required_creation_policy = required_creation_policy;
        import
    }

    /// Start building an import from optional parts.
    pub fn builder<'a>() -> ImportDefinitionBuilder<'a> {
        ImportDefinitionBuilder::default()
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn extra_constraints(&self) -> &[ConstraintRef] {
        &self.extra_constraints
    }

    pub fn required_creation_policy(&self) -> CreationPolicy {
        self.required_creation_policy
    }

    /// Sharing boundaries created when a factory wrapper is invoked.
    pub fn factory_sharing_boundaries(&self) -> &BTreeSet<String> {
        &self.factory_sharing_boundaries
    }

    /// Type identity of the contract, including any wrapper.
    pub fn type_identity(&self) -> TypeRef {
        self.contract.type_identity()
    }

    /// Tagged wrapper classification.
    pub fn wrapper(&self) -> ImportWrapper {
        self.wrapper
    }

    pub fn wrapper_kind(&self) -> WrapperKind {
        self.wrapper.kind()
    }

    /// Metadata view type of a two-argument lazy or factory wrapper.
    pub fn metadata_type(&self) -> Option<TypeRef> {
        self.wrapper.metadata_type()
    }

    pub fn is_lazy(&self) -> bool {
        self.wrapper_kind() == WrapperKind::Lazy
    }

    /// The lazy wrapper type, if this import is lazy.
    pub fn lazy_type(&self) -> Option<TypeRef> {
        self.is_lazy().then(|| self.type_identity())
    }

    pub fn is_export_factory(&self) -> bool {
        self.wrapper_kind() == WrapperKind::Factory
    }

    /// The factory wrapper type, if this import is a factory.
    pub fn export_factory_type(&self) -> Option<TypeRef> {
        self.is_export_factory().then(|| self.type_identity())
    }
}

impl PartialEq for ImportDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.contract == other.contract && self.cardinality == other.cardinality
    }
}

impl Eq for ImportDefinition {}

impl Hash for ImportDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.contract.hash(state);
    }
}

impl fmt::Display for ImportDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}, {}]",
            self.contract,
            self.wrapper_kind(),
            self.cardinality
        )
    }
}

/// Builder for imports whose inputs may be absent.
///
/// `build` fails with `InvalidArgument` naming the first missing input.
/// Supplying a creation policy selects the policy-driven constructor;
/// supplying factory sharing boundaries selects the metadata-driven one.
#[derive(Debug, Default)]
pub struct ImportDefinitionBuilder<'a> {
    contract: Option<Contract>,
    cardinality: Cardinality,
    extra_constraints: Option<Vec<ConstraintRef>>,
    creation_policy: Option<CreationPolicy>,
    factory_sharing_boundaries: Option<BTreeSet<String>>,
    shapes: Option<&'a WrapperShapes>,
}

impl<'a> ImportDefinitionBuilder<'a> {
    pub fn contract(mut self, contract: Contract) -> Self {
        self.contract = Some(contract);
        self
    }

    pub fn cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn extra_constraints(mut self, constraints: Vec<ConstraintRef>) -> Self {
        self.extra_constraints = Some(constraints);
        self
    }

    pub fn creation_policy(mut self, policy: CreationPolicy) -> Self {
        self.creation_policy = Some(policy);
        self
    }

    pub fn factory_sharing_boundaries<I, S>(mut self, boundaries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.factory_sharing_boundaries = Some(boundaries.into_iter().map(Into::into).collect());
        self
    }

    /// Classify the wrapper with a custom shape registry.
    pub fn classify_with(mut self, shapes: &'a WrapperShapes) -> Self {
        self.shapes = Some(shapes);
        self
    }

    pub fn build(self) -> Result<ImportDefinition> {
        let contract = self.contract.ok_or_else(|| DescriptorError::missing("contract"))?;
        let extra_constraints = self
            .extra_constraints
            .ok_or_else(|| DescriptorError::missing("extra_constraints"))?;

        let mut import = match (self.creation_policy, self.factory_sharing_boundaries) {
            (Some(_), Some(_)) => {
                return Err(DescriptorError::invalid(
                    "required_creation_policy",
                    "a creation policy cannot be combined with factory sharing boundaries",
                ))
            }
            (Some(policy), None) => ImportDefinition::with_creation_policy(
                contract,
                self.cardinality,
                extra_constraints,
                policy,
            ),
            (None, Some(boundaries)) => {
                ImportDefinition::new(contract, self.cardinality, extra_constraints, boundaries)
            }
            (None, None) => return Err(DescriptorError::missing("factory_sharing_boundaries")),
        };

        if let Some(shapes) = self.shapes {
            import.wrapper = shapes.classify(import.type_identity());
        }

        Ok(import)
    }
}
