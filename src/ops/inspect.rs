//! Part inspection.
//!
//! Builds serializable views of parts for `compose inspect`, rendered either
//! as text or as JSON.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::core::{
    Cardinality, Catalog, CreationPolicy, ExportDefinition, FactoryGeneration, ImportDefinition,
    MemberKind, MemberRef, MetadataValue, PartDefinition, WrapperKind,
};
use crate::util::diagnostic::suggestions;

/// Options for inspecting a catalog.
#[derive(Debug, Clone, Default)]
pub struct InspectOptions {
    /// Only report parts whose bare or qualified id matches
    pub part: Option<String>,
}

/// How a part is shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", content = "boundary", rename_all = "kebab-case")]
pub enum SharingReport {
    NonShared,
    Root,
    Boundary(String),
}

/// View of one part.
#[derive(Debug, Clone, Serialize)]
pub struct PartReport {
    pub id: String,
    pub qualified_id: String,
    pub sharing: SharingReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_activation: Option<String>,
    pub exports: Vec<ExportReport>,
    pub imports: Vec<ImportReport>,
}

/// View of one export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    /// Exporting member; absent for type-level exports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_kind: Option<MemberKind>,
    pub contract: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, MetadataValue>,
}

/// View of one import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub member: String,
    pub member_kind: MemberKind,
    pub contract: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub cardinality: Cardinality,
    pub wrapper: WrapperKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factory_generation: Option<FactoryGeneration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_type: Option<String>,
    pub creation_policy: CreationPolicy,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub factory_sharing_boundaries: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,
}

impl PartReport {
    pub fn from_part(part: &PartDefinition) -> Self {
        let sharing = match part.sharing_boundary() {
            None => SharingReport::NonShared,
            Some("") => SharingReport::Root,
            Some(boundary) => SharingReport::Boundary(boundary.to_string()),
        };

        PartReport {
            id: part.id().to_string(),
            qualified_id: part.qualified_id().to_string(),
            sharing,
            on_activation: part.on_activation_completed().map(|m| m.to_string()),
            exports: part
                .all_exports()
                .map(|(member, export)| ExportReport::from_export(member, export))
                .collect(),
            imports: part
                .imports()
                .iter()
                .map(|(member, import)| ImportReport::from_import(member, import))
                .collect(),
        }
    }
}

impl ExportReport {
    pub fn from_export(member: Option<&MemberRef>, export: &ExportDefinition) -> Self {
        let contract = export.contract();
        ExportReport {
            member: member.map(|m| m.name().to_string()),
            member_kind: member.map(|m| m.kind()),
            contract: contract.type_identity().to_string(),
            name: contract.name().map(str::to_string),
            metadata: export.metadata().clone(),
        }
    }
}

impl ImportReport {
    pub fn from_import(member: &MemberRef, import: &ImportDefinition) -> Self {
        let contract = import.contract();
        let wrapper = import.wrapper();
        ImportReport {
            member: member.name().to_string(),
            member_kind: member.kind(),
            contract: contract.type_identity().to_string(),
            name: contract.name().map(str::to_string),
            cardinality: import.cardinality(),
            wrapper: wrapper.kind(),
            factory_generation: wrapper.factory_generation(),
            value_type: wrapper.value_type().map(|t| t.to_string()),
            metadata_type: wrapper.metadata_type().map(|t| t.to_string()),
            creation_policy: import.required_creation_policy(),
            factory_sharing_boundaries: import
                .factory_sharing_boundaries()
                .iter()
                .cloned()
                .collect(),
            constraints: import
                .extra_constraints()
                .iter()
                .map(|c| c.describe())
                .collect(),
        }
    }
}

/// Select parts by bare or qualified id.
///
/// A qualified id selects at most one part; a bare id may select several.
pub fn select_parts<'a>(catalog: &'a Catalog, id: &str) -> Result<Vec<&'a PartDefinition>> {
    if let Some(part) = catalog.find_by_qualified_id(id) {
        return Ok(vec![part]);
    }

    let parts = catalog.find_by_id(id);
    if parts.is_empty() {
        bail!("no part matches `{}`\n{}", id, suggestions::PART_NOT_FOUND);
    }
    if parts.len() > 1 {
        tracing::warn!(
            "`{}` matches {} parts; {}",
            id,
            parts.len(),
            suggestions::AMBIGUOUS_ID
        );
    }
    Ok(parts)
}

/// Build reports for the parts of a catalog.
pub fn inspect_catalog(catalog: &Catalog, opts: &InspectOptions) -> Result<Vec<PartReport>> {
    let parts = match opts.part {
        Some(ref id) => select_parts(catalog, id)?,
        None => catalog.parts().iter().collect(),
    };

    Ok(parts.into_iter().map(PartReport::from_part).collect())
}

/// Format reports for display (human-readable).
pub fn format_reports(reports: &[PartReport]) -> String {
    let mut output = String::new();

    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            writeln!(output).unwrap();
        }
        format_part(&mut output, report);
    }

    output
}

fn format_part(output: &mut String, report: &PartReport) {
    writeln!(output, "{} ({})", report.qualified_id, report.id).unwrap();

    let sharing = match report.sharing {
        SharingReport::NonShared => "non-shared".to_string(),
        SharingReport::Root => "shared".to_string(),
        SharingReport::Boundary(ref b) => format!("shared within `{}`", b),
    };
    writeln!(output, "  sharing: {}", sharing).unwrap();

    if let Some(ref callback) = report.on_activation {
        writeln!(output, "  on activation: {}", callback).unwrap();
    }

    if !report.exports.is_empty() {
        writeln!(output, "  exports:").unwrap();
        for export in &report.exports {
            let mut line = match export.member {
                Some(ref member) => format!("{}: {}", member, export.contract),
                None => export.contract.clone(),
            };
            if let Some(ref name) = export.name {
                write!(line, " (\"{}\")", name).unwrap();
            }
            if !export.metadata.is_empty() {
                let entries: Vec<_> = export
                    .metadata
                    .iter()
                    .map(|(k, v)| format!("{} = {}", k, v))
                    .collect();
                write!(line, " {{ {} }}", entries.join(", ")).unwrap();
            }
            writeln!(output, "    {}", line).unwrap();
        }
    }

    if !report.imports.is_empty() {
        writeln!(output, "  imports:").unwrap();
        for import in &report.imports {
            writeln!(
                output,
                "    {}: {} [{}, {}]",
                import.member, import.contract, import.wrapper, import.cardinality
            )
            .unwrap();
            if let Some(ref value) = import.value_type {
                writeln!(output, "      value: {}", value).unwrap();
            }
            if let Some(ref metadata) = import.metadata_type {
                writeln!(output, "      metadata view: {}", metadata).unwrap();
            }
            if import.creation_policy != CreationPolicy::Any {
                writeln!(output, "      requires: {}", import.creation_policy).unwrap();
            }
            if !import.factory_sharing_boundaries.is_empty() {
                writeln!(
                    output,
                    "      opens: {}",
                    import.factory_sharing_boundaries.join(", ")
                )
                .unwrap();
            }
            for constraint in &import.constraints {
                writeln!(output, "      where {}", constraint).unwrap();
            }
        }
    }
}

/// Format reports as JSON.
pub fn format_reports_json(reports: &[PartReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures::{catalog_from, AMBIGUOUS_CATALOG, LOGGING_CATALOG};

    #[test]
    fn test_inspect_all_parts() {
        let catalog = catalog_from(LOGGING_CATALOG);
        let reports = inspect_catalog(&catalog, &InspectOptions::default()).unwrap();

        assert_eq!(reports.len(), 3);
        let logger = &reports[0];
        assert_eq!(logger.id, "Logger");
        assert_eq!(logger.qualified_id, "app::logging::Logger");
        assert_eq!(logger.sharing, SharingReport::Root);
        assert_eq!(
            logger.on_activation.as_deref(),
            Some("app::logging::Logger.on_ready()")
        );

        // Type-level exports come first
        assert_eq!(logger.exports[0].member, None);
        assert_eq!(logger.exports[1].member.as_deref(), Some("formatter"));

        let sinks = logger.imports.iter().find(|i| i.member == "sinks").unwrap();
        assert_eq!(sinks.wrapper, WrapperKind::Lazy);
        assert_eq!(sinks.value_type.as_deref(), Some("app::logging::Sink"));
        assert_eq!(sinks.metadata_type.as_deref(), Some("app::logging::SinkMeta"));
        assert_eq!(sinks.constraints.len(), 1);
    }

    #[test]
    fn test_inspect_by_qualified_and_bare_id() {
        let catalog = catalog_from(AMBIGUOUS_CATALOG);

        let opts = InspectOptions {
            part: Some("app::trace::Logger".to_string()),
        };
        let reports = inspect_catalog(&catalog, &opts).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].sharing, SharingReport::Root);

        let opts = InspectOptions {
            part: Some("Logger".to_string()),
        };
        assert_eq!(inspect_catalog(&catalog, &opts).unwrap().len(), 2);
    }

    #[test]
    fn test_selected_parts_outlive_the_id() {
        let catalog = catalog_from(AMBIGUOUS_CATALOG);

        let parts = {
            let id = String::from("Logger");
            select_parts(&catalog, &id).unwrap()
        };
        let ids: Vec<_> = parts.iter().map(|p| p.qualified_id()).collect();
        assert_eq!(ids, vec!["app::audit::Logger", "app::trace::Logger"]);
    }

    #[test]
    fn test_inspect_unknown_part() {
        let catalog = catalog_from(LOGGING_CATALOG);
        let opts = InspectOptions {
            part: Some("Missing".to_string()),
        };

        let err = inspect_catalog(&catalog, &opts).unwrap_err();
        assert!(err.to_string().contains("no part matches `Missing`"));
    }

    #[test]
    fn test_format_text() {
        let catalog = catalog_from(LOGGING_CATALOG);
        let reports = inspect_catalog(&catalog, &InspectOptions::default()).unwrap();
        let text = format_reports(&reports);

        assert!(text.contains("app::logging::Logger (Logger)"));
        assert!(text.contains("  sharing: shared\n"));
        assert!(text.contains(
            "formatter: app::logging::Formatter (\"default\") { Channel = \"audit\", Level = 3 }"
        ));
        assert!(text.contains(
            "sessions: composition::ExportFactory<app::web::Session> [factory, exactly-one]"
        ));
        assert!(text.contains("opens: request"));
        assert!(text.contains("requires: shared"));
    }

    #[test]
    fn test_format_json() {
        let catalog = catalog_from(LOGGING_CATALOG);
        let opts = InspectOptions {
            part: Some("RequestHandler".to_string()),
        };
        let reports = inspect_catalog(&catalog, &opts).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&format_reports_json(&reports).unwrap()).unwrap();

        let part = &json[0];
        assert_eq!(part["qualified_id"], "app::web::RequestHandler");
        assert_eq!(part["sharing"]["scope"], "non-shared");

        let sessions = &part["imports"][1];
        assert_eq!(sessions["member"], "sessions");
        assert_eq!(sessions["wrapper"], "factory");
        assert_eq!(sessions["factory_generation"], "v2");
        assert_eq!(sessions["factory_sharing_boundaries"][0], "request");
    }
}
