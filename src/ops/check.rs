//! Catalog lint checks for `compose check`.
//!
//! Checks are static: they look at descriptors only and never match imports
//! against exports.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::core::{
    Catalog, ImportDefinition, ImportSite, PartDefinition, WrapperKind, WrapperShapes,
};
use crate::util::diagnostic::{suggestions, Diagnostic, Severity};

/// Result of checking a catalog.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub diagnostics: Vec<Diagnostic>,
    /// Number of parts checked
    pub parts: usize,
    /// Number of imports checked
    pub imports: usize,
}

impl CheckReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    /// Whether the check should fail.
    pub fn failed(&self, deny_warnings: bool) -> bool {
        self.has_errors() || (deny_warnings && self.count(Severity::Warning) > 0)
    }

    /// Diagnostics to print. Notes are only shown in verbose mode.
    pub fn visible(&self, verbose: bool) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| verbose || d.severity != Severity::Note)
    }

    /// Point every diagnostic at the checked catalog.
    pub fn located_at(mut self, path: &Path) -> Self {
        self.diagnostics = self
            .diagnostics
            .into_iter()
            .map(|d| d.with_location(path))
            .collect();
        self
    }

    /// One-line summary.
    pub fn summary(&self) -> String {
        format!(
            "checked {} part(s), {} import(s): {} error(s), {} warning(s)",
            self.parts,
            self.imports,
            self.count(Severity::Error),
            self.count(Severity::Warning)
        )
    }
}

/// Run every check over a catalog. Diagnostics are ordered by severity.
pub fn check_catalog(catalog: &Catalog, shapes: &WrapperShapes) -> CheckReport {
    let mut diagnostics = Vec::new();

    check_ambiguous_ids(catalog, &mut diagnostics);

    let wrapper_names: BTreeSet<&str> = shapes
        .iter()
        .map(|(definition, _)| short_name(definition))
        .collect();

    for site in catalog.imports() {
        check_wrapper_shape(&site, shapes, &wrapper_names, &mut diagnostics);
        check_boundaries(&site, &mut diagnostics);
    }

    for part in catalog.parts() {
        check_duplicate_imports(part, &mut diagnostics);
    }

    diagnostics.sort_by_key(|d| d.severity);

    CheckReport {
        diagnostics,
        parts: catalog.len(),
        imports: catalog.imports().count(),
    }
}

fn short_name(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

fn site_name(site: &ImportSite<'_>) -> String {
    format!("{}.{}", site.part.qualified_id(), site.member.name())
}

fn check_ambiguous_ids(catalog: &Catalog, diagnostics: &mut Vec<Diagnostic>) {
    for (id, parts) in catalog.ambiguous_ids() {
        let mut diag = Diagnostic::warning(format!(
            "part id `{}` is shared by {} parts",
            id,
            parts.len()
        ));
        for part in parts {
            diag = diag.with_context(part.qualified_id());
        }
        diagnostics.push(diag.with_suggestion(suggestions::AMBIGUOUS_ID));
    }
}

/// Wrapper-looking contracts that will be requested directly.
fn check_wrapper_shape(
    site: &ImportSite<'_>,
    shapes: &WrapperShapes,
    wrapper_names: &BTreeSet<&str>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let ty = site.import.type_identity();
    if site.import.wrapper_kind() != WrapperKind::Direct {
        return;
    }

    let definition = ty.generic_definition();
    if shapes.shape_of(definition).is_some() {
        diagnostics.push(
            Diagnostic::error(format!(
                "`{}` takes one or two type arguments, found {}",
                definition,
                ty.arity()
            ))
            .with_context(format!("import `{}`", site_name(site)))
            .with_context(format!("contract `{}`", ty))
            .with_suggestion("Use `Wrapper<T>` or `Wrapper<T, Metadata>`"),
        );
    } else if ty.is_generic() && wrapper_names.contains(ty.name()) {
        diagnostics.push(
            Diagnostic::warning(format!(
                "`{}` looks like a wrapper but is not registered; it will be imported directly",
                definition
            ))
            .with_context(format!("import `{}`", site_name(site)))
            .with_suggestion(
                "Use the built-in wrapper path or add it under `[wrappers]` in .compose/config.toml",
            ),
        );
    }
}

/// Factory sharing boundaries only take effect on factory imports.
fn check_boundaries(site: &ImportSite<'_>, diagnostics: &mut Vec<Diagnostic>) {
    let import = site.import;
    if import.factory_sharing_boundaries().is_empty() || import.is_export_factory() {
        return;
    }

    let boundaries: Vec<_> = import
        .factory_sharing_boundaries()
        .iter()
        .map(String::as_str)
        .collect();
    diagnostics.push(
        Diagnostic::warning(format!(
            "import `{}` declares factory sharing boundaries but is not a factory",
            site_name(site)
        ))
        .with_context(format!("boundaries: {}", boundaries.join(", ")))
        .with_suggestion("Remove `factory-sharing-boundaries` or import an `ExportFactory`"),
    );
}

/// Equal imports declared twice by the same part.
fn check_duplicate_imports(part: &PartDefinition, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen: HashMap<&ImportDefinition, Vec<&str>> = HashMap::new();
    for (member, import) in part.imports() {
        seen.entry(import).or_default().push(member.name());
    }

    let mut duplicates: Vec<_> = seen
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .collect();
    duplicates.sort_by(|a, b| a.1.cmp(&b.1));

    for (import, members) in duplicates {
        diagnostics.push(
            Diagnostic::note(format!(
                "part `{}` imports `{}` on {} members",
                part.qualified_id(),
                import,
                members.len()
            ))
            .with_context(format!("members: {}", members.join(", "))),
        );
    }
}
