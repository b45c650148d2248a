//! Import listing and equivalence grouping for `compose imports`.

use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;

use crate::core::{Cardinality, Catalog, ImportGroup, ImportSite, WrapperKind};

/// Where an import is declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteReport {
    pub part: String,
    pub member: String,
}

/// A group of imports that compare equal.
#[derive(Debug, Clone, Serialize)]
pub struct ImportGroupReport {
    /// Display form of the first import in the group
    pub import: String,
    pub contract: String,
    pub cardinality: Cardinality,
    pub wrapper: WrapperKind,
    pub sites: Vec<SiteReport>,
    /// Sites disagree on requirements that import equality ignores
    pub differing_requirements: bool,
}

impl SiteReport {
    fn from_site(site: &ImportSite<'_>) -> Self {
        SiteReport {
            part: site.part.qualified_id().to_string(),
            member: site.member.name().to_string(),
        }
    }
}

impl ImportGroupReport {
    pub fn from_group(group: &ImportGroup<'_>) -> Self {
        let first = group.representative();
        let differing_requirements = group.sites().iter().skip(1).any(|site| {
            let other = site.import;
            other.required_creation_policy() != first.required_creation_policy()
                || other.factory_sharing_boundaries() != first.factory_sharing_boundaries()
                || other.extra_constraints().len() != first.extra_constraints().len()
                || other.wrapper() != first.wrapper()
        });

        ImportGroupReport {
            import: first.to_string(),
            contract: first.contract().to_string(),
            cardinality: first.cardinality(),
            wrapper: first.wrapper_kind(),
            sites: group.sites().iter().map(SiteReport::from_site).collect(),
            differing_requirements,
        }
    }
}

/// Group the imports of a catalog.
///
/// With `equivalent_only`, only groups of two or more imports are kept.
pub fn import_groups(catalog: &Catalog, equivalent_only: bool) -> Vec<ImportGroupReport> {
    let groups = catalog.equivalent_imports();
    tracing::debug!(
        "{} import(s) fold into {} group(s)",
        catalog.imports().count(),
        groups.len()
    );

    groups
        .iter()
        .filter(|g| !equivalent_only || g.len() > 1)
        .map(ImportGroupReport::from_group)
        .collect()
}

/// Format import groups for display (human-readable).
pub fn format_groups(groups: &[ImportGroupReport]) -> String {
    let mut output = String::new();

    if groups.is_empty() {
        writeln!(output, "No imports to report.").unwrap();
        return output;
    }

    for group in groups {
        let sites = if group.sites.len() == 1 {
            "1 site".to_string()
        } else {
            format!("{} sites", group.sites.len())
        };
        writeln!(output, "{} ({})", group.import, sites).unwrap();
        for site in &group.sites {
            writeln!(output, "  {}.{}", site.part, site.member).unwrap();
        }
        if group.differing_requirements {
            writeln!(
                output,
                "  note: sites differ in requirements ignored by import equality"
            )
            .unwrap();
        }
    }

    output
}

/// Format import groups as JSON.
pub fn format_groups_json(groups: &[ImportGroupReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(groups)?)
}
