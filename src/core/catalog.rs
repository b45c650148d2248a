//! Catalog - the set of part definitions produced by one discovery pass.
//!
//! The catalog is what a resolution engine consumes. It offers lookup by the
//! bare part id and by the qualified id, and groups imports that compare
//! equal so equivalent requests can be folded together.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::core::error::{DescriptorError, Result};
use crate::core::{ImportDefinition, MemberRef, PartDefinition};

/// An ordered collection of parts with unique qualified ids.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    parts: Vec<PartDefinition>,
    qualified_ids: HashSet<&'static str>,
}

/// One import together with where it is declared.
#[derive(Debug, Clone, Copy)]
pub struct ImportSite<'a> {
    pub part: &'a PartDefinition,
    pub member: &'a MemberRef,
    pub import: &'a ImportDefinition,
}

/// Imports that compare equal, in first-seen order.
#[derive(Debug, Clone)]
pub struct ImportGroup<'a> {
    sites: Vec<ImportSite<'a>>,
}

impl<'a> ImportGroup<'a> {
    fn new(first: ImportSite<'a>) -> Self {
        ImportGroup { sites: vec![first] }
    }

    /// The first import of the group; all others compare equal to it.
    pub fn representative(&self) -> &'a ImportDefinition {
        self.sites[0].import
    }

    pub fn sites(&self) -> &[ImportSite<'a>] {
        &self.sites
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Build a catalog, rejecting duplicate qualified ids.
    pub fn from_parts(parts: impl IntoIterator<Item = PartDefinition>) -> Result<Self> {
        let mut catalog = Catalog::new();
        for part in parts {
            catalog.add(part)?;
        }
        Ok(catalog)
    }

    /// Add a part. Fails if a part with the same qualified id is present.
    pub fn add(&mut self, part: PartDefinition) -> Result<()> {
        if !self.qualified_ids.insert(part.qualified_id()) {
            return Err(DescriptorError::invalid(
                "part",
                format!("part `{}` is declared more than once", part.qualified_id()),
            ));
        }
        self.parts.push(part);
        Ok(())
    }

    pub fn parts(&self) -> &[PartDefinition] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Parts whose bare id matches. May yield several parts from different
    /// namespaces.
    pub fn find_by_id(&self, id: &str) -> Vec<&PartDefinition> {
        self.parts.iter().filter(|p| p.id() == id).collect()
    }

    pub fn find_by_qualified_id(&self, qualified_id: &str) -> Option<&PartDefinition> {
        self.parts.iter().find(|p| p.qualified_id() == qualified_id)
    }

    /// Bare ids shared by more than one part, with the parts sharing them.
    pub fn ambiguous_ids(&self) -> BTreeMap<&'static str, Vec<&PartDefinition>> {
        let mut by_id: BTreeMap<&'static str, Vec<&PartDefinition>> = BTreeMap::new();
        for part in &self.parts {
            by_id.entry(part.id()).or_default().push(part);
        }
        by_id.retain(|_, parts| parts.len() > 1);
        by_id
    }

    /// Every import in the catalog, in part then member order.
    pub fn imports(&self) -> impl Iterator<Item = ImportSite<'_>> {
        self.parts.iter().flat_map(|part| {
            part.imports()
                .iter()
                .map(move |(member, import)| ImportSite {
                    part,
                    member,
                    import,
                })
        })
    }

    /// Group imports by import equality (contract and cardinality).
    pub fn equivalent_imports(&self) -> Vec<ImportGroup<'_>> {
        let mut index: HashMap<&ImportDefinition, usize> = HashMap::new();
        let mut groups: Vec<ImportGroup<'_>> = Vec::new();

        for site in self.imports() {
            match index.get(site.import) {
                Some(&i) => groups[i].sites.push(site),
                None => {
                    index.insert(site.import, groups.len());
                    groups.push(ImportGroup::new(site));
                }
            }
        }

        groups
    }
}
