//! Part definitions.
//!
//! A PartDefinition describes one composable unit: its type, the exports it
//! offers on the type itself and on members, the imports its members
//! require, whether instances are shared, and an optional callback run once
//! all imports are satisfied.
//!
//! Parts are immutable and Arc-wrapped internally, so they are cheap to
//! clone and safe to read from any number of threads.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::core::error::{DescriptorError, Result};
use crate::core::{ExportDefinition, ImportDefinition, MemberRef, TypeRef};

/// Exports offered on members, keyed by the member.
pub type MemberExports = BTreeMap<MemberRef, ExportDefinition>;

/// Imports required by members, keyed by the importing member.
pub type MemberImports = BTreeMap<MemberRef, ImportDefinition>;

/// A composable unit.
#[derive(Clone)]
pub struct PartDefinition {
    inner: Arc<PartDefinitionInner>,
}

struct PartDefinitionInner {
    part_type: TypeRef,
    exports_on_type: Vec<ExportDefinition>,
    exports_on_members: MemberExports,
    imports: MemberImports,
    sharing_boundary: Option<String>,
    on_activation_completed: Option<MemberRef>,
}

impl PartDefinition {
    /// Create a part definition.
    ///
    /// `sharing_boundary` of `None` makes the part non-shared; `Some("")`
    /// shares it in the root scope. The activation callback, if present,
    /// must be a method.
    pub fn new(
        part_type: TypeRef,
        exports_on_type: Vec<ExportDefinition>,
        exports_on_members: MemberExports,
        imports: MemberImports,
        sharing_boundary: Option<String>,
        on_activation_completed: Option<MemberRef>,
    ) -> Result<Self> {
        if let Some(ref callback) = on_activation_completed {
            if !callback.is_method() {
                return Err(DescriptorError::invalid(
                    "on_activation_completed",
                    format!("`{}` is a {}, not a method", callback, callback.kind()),
                ));
            }
        }

        Ok(PartDefinition {
            inner: Arc::new(PartDefinitionInner {
                part_type,
                exports_on_type,
                exports_on_members,
                imports,
                sharing_boundary,
                on_activation_completed,
            }),
        })
    }

    /// Start building a part from optional parts.
    pub fn builder() -> PartDefinitionBuilder {
        PartDefinitionBuilder::default()
    }

    pub fn part_type(&self) -> TypeRef {
        self.inner.part_type
    }

    /// Display and lookup key: the unqualified type name.
    ///
    /// Not unique across namespaces; see [`PartDefinition::qualified_id`].
    pub fn id(&self) -> &'static str {
        self.inner.part_type.name()
    }

    /// Fully qualified type name, unique per type.
    pub fn qualified_id(&self) -> &'static str {
        self.inner.part_type.full_name()
    }

    pub fn sharing_boundary(&self) -> Option<&str> {
        self.inner.sharing_boundary.as_deref()
    }

    pub fn is_shared(&self) -> bool {
        self.inner.sharing_boundary.is_some()
    }

    /// Method invoked once all imports are satisfied.
    pub fn on_activation_completed(&self) -> Option<&MemberRef> {
        self.inner.on_activation_completed.as_ref()
    }

    pub fn exports_on_type(&self) -> &[ExportDefinition] {
        &self.inner.exports_on_type
    }

    pub fn exports_on_members(&self) -> &MemberExports {
        &self.inner.exports_on_members
    }

    pub fn imports(&self) -> &MemberImports {
        &self.inner.imports
    }

    /// All exports: type-level first (with no member), then member-level.
    ///
    /// The iterator is `Clone`, and calling this again yields the same
    /// sequence.
    pub fn all_exports(
        &self,
    ) -> impl Iterator<Item = (Option<&MemberRef>, &ExportDefinition)> + Clone + '_ {
        let on_type = self
            .inner
            .exports_on_type
            .iter()
            .map(|export| (None::<&MemberRef>, export));
        let on_members = self
            .inner
            .exports_on_members
            .iter()
            .map(|(member, export)| (Some(member), export));
        on_type.chain(on_members)
    }

    /// Total number of exports.
    pub fn export_count(&self) -> usize {
        self.inner.exports_on_type.len() + self.inner.exports_on_members.len()
    }
}

impl fmt::Debug for PartDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartDefinition")
            .field("type", &self.inner.part_type)
            .field("exports", &self.export_count())
            .field("imports", &self.inner.imports.len())
            .field("sharing_boundary", &self.inner.sharing_boundary)
            .finish()
    }
}

impl fmt::Display for PartDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.part_type)
    }
}

/// Builder for parts whose inputs may be absent.
///
/// The type, both export collections, and the import collection are
/// required; `build` fails with `InvalidArgument` naming the first one
/// missing.
#[derive(Debug, Default)]
pub struct PartDefinitionBuilder {
    part_type: Option<TypeRef>,
    exports_on_type: Option<Vec<ExportDefinition>>,
    exports_on_members: Option<MemberExports>,
    imports: Option<MemberImports>,
    sharing_boundary: Option<String>,
    on_activation_completed: Option<MemberRef>,
}

impl PartDefinitionBuilder {
    pub fn part_type(mut self, part_type: TypeRef) -> Self {
        self.part_type = Some(part_type);
        self
    }

    pub fn exports_on_type(mut self, exports: Vec<ExportDefinition>) -> Self {
        self.exports_on_type = Some(exports);
        self
    }

    pub fn exports_on_members(mut self, exports: MemberExports) -> Self {
        self.exports_on_members = Some(exports);
        self
    }

    pub fn imports(mut self, imports: MemberImports) -> Self {
        self.imports = Some(imports);
        self
    }

    pub fn sharing_boundary(mut self, boundary: impl Into<String>) -> Self {
        self.sharing_boundary = Some(boundary.into());
        self
    }

    pub fn on_activation_completed(mut self, callback: MemberRef) -> Self {
        self.on_activation_completed = Some(callback);
        self
    }

    pub fn build(self) -> Result<PartDefinition> {
        let part_type = self
            .part_type
            .ok_or_else(|| DescriptorError::missing("part_type"))?;
        let exports_on_type = self
            .exports_on_type
            .ok_or_else(|| DescriptorError::missing("exports_on_type"))?;
        let exports_on_members = self
            .exports_on_members
            .ok_or_else(|| DescriptorError::missing("exports_on_members"))?;
        let imports = self
            .imports
            .ok_or_else(|| DescriptorError::missing("imports"))?;

        PartDefinition::new(
            part_type,
            exports_on_type,
            exports_on_members,
            imports,
            self.sharing_boundary,
            self.on_activation_completed,
        )
    }
}
