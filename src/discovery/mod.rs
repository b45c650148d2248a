//! Discovery - turning part declarations into descriptors.
//!
//! Discovery is a pure function from declarations to a [`Catalog`]. All I/O
//! (finding and reading catalog files) lives in [`loader`] and happens
//! before discovery runs. Wrapper classification happens here, once per
//! import, using the configured [`WrapperShapes`].

pub mod declaration;
pub mod loader;

pub use declaration::{
    CatalogManifest, ExportDeclaration, ImportDeclaration, MetadataLiteral, PartDeclaration,
};
pub use loader::{find_catalog_files, load_catalog, load_catalog_file, CATALOG_SUFFIX};

use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::core::{
    Catalog, ConstraintRef, Contract, ExportDefinition, ExportTypeIdentityConstraint,
    ImportDefinition, MemberExports, MemberImports, MemberKind, MemberRef,
    MetadataValueConstraint, PartDefinition, TypeRef, WrapperShapes,
};

/// Build a catalog from declarations.
pub fn discover(manifest: &CatalogManifest, shapes: &WrapperShapes) -> Result<Catalog> {
    let mut catalog = Catalog::new();

    for decl in &manifest.parts {
        let part = discover_part(decl, shapes)
            .with_context(|| format!("failed to build part `{}`", decl.part_type))?;

        tracing::debug!(
            "discovered part `{}` ({} exports, {} imports)",
            part.qualified_id(),
            part.export_count(),
            part.imports().len()
        );

        catalog.add(part)?;
    }

    for (id, parts) in catalog.ambiguous_ids() {
        let qualified: Vec<&str> = parts.iter().map(|p| p.qualified_id()).collect();
        tracing::warn!(
            "part id `{}` is shared by {} - refer to these parts by qualified id",
            id,
            qualified.join(", ")
        );
    }

    Ok(catalog)
}

/// Build one part from its declaration.
pub fn discover_part(decl: &PartDeclaration, shapes: &WrapperShapes) -> Result<PartDefinition> {
    let part_type = TypeRef::parse(&decl.part_type)?;

    let mut exports_on_type = Vec::new();
    let mut exports_on_members = MemberExports::new();
    for export_decl in &decl.exports {
        let (member, export) = discover_export(part_type, export_decl)
            .with_context(|| format!("invalid export of `{}`", export_decl.contract))?;
        match member {
            None => exports_on_type.push(export),
            Some(member) => {
                if exports_on_members.contains_key(&member) {
                    bail!("member `{}` is exported more than once", member);
                }
                exports_on_members.insert(member, export);
            }
        }
    }

    let mut imports = MemberImports::new();
    for import_decl in &decl.imports {
        let (member, import) = discover_import(part_type, import_decl, shapes)
            .with_context(|| format!("invalid import on member `{}`", import_decl.member))?;
        if imports.contains_key(&member) {
            bail!("member `{}` declares more than one import", member);
        }
        tracing::trace!("import `{}` classified as {}", member, import.wrapper_kind());
        imports.insert(member, import);
    }

    let on_activation_completed = decl
        .on_activation
        .as_ref()
        .map(|name| MemberRef::method(part_type, name.as_str()))
        .transpose()?;

    let mut builder = PartDefinition::builder()
        .part_type(part_type)
        .exports_on_type(exports_on_type)
        .exports_on_members(exports_on_members)
        .imports(imports);
    if let Some(boundary) = decl.effective_sharing_boundary()? {
        builder = builder.sharing_boundary(boundary);
    }
    if let Some(callback) = on_activation_completed {
        builder = builder.on_activation_completed(callback);
    }

    Ok(builder.build()?)
}

fn discover_export(
    part_type: TypeRef,
    decl: &ExportDeclaration,
) -> Result<(Option<MemberRef>, ExportDefinition)> {
    let mut contract = Contract::new(TypeRef::parse(&decl.contract)?);
    if let Some(ref name) = decl.name {
        contract = contract.with_name(name.as_str());
    }

    let mut export = ExportDefinition::new(contract);
    for (key, value) in &decl.metadata {
        export = export.with_metadata(key.as_str(), value.clone());
    }

    let member = match (&decl.member, decl.kind) {
        (Some(name), kind) => Some(MemberRef::new(
            part_type,
            name.as_str(),
            kind.unwrap_or(MemberKind::Property),
        )?),
        (None, Some(kind)) => bail!("`kind = \"{}\"` requires `member`", kind),
        (None, None) => None,
    };

    Ok((member, export))
}

fn discover_import(
    part_type: TypeRef,
    decl: &ImportDeclaration,
    shapes: &WrapperShapes,
) -> Result<(MemberRef, ImportDefinition)> {
    let member = MemberRef::new(part_type, decl.member.as_str(), decl.kind)?;

    let mut contract = Contract::new(TypeRef::parse(&decl.contract)?);
    if let Some(ref name) = decl.name {
        contract = contract.with_name(name.as_str());
    }
    for (key, ty) in &decl.metadata_shape {
        contract = contract.with_metadata_constraint(key.as_str(), TypeRef::parse(ty)?);
    }

    let mut constraints: Vec<ConstraintRef> = Vec::new();
    for (key, value) in &decl.required_metadata {
        constraints.push(Arc::new(MetadataValueConstraint::new(
            key.as_str(),
            value.clone(),
        )));
    }
    if let Some(ref export_type) = decl.export_type {
        constraints.push(Arc::new(ExportTypeIdentityConstraint::new(
            TypeRef::parse(export_type)?,
        )));
    }

    let mut builder = ImportDefinition::builder()
        .contract(contract)
        .cardinality(decl.cardinality)
        .extra_constraints(constraints)
        .classify_with(shapes);
    if let Some(policy) = decl.creation_policy {
        builder = builder.creation_policy(policy);
    }
    // Supplying both forms is rejected by the builder
    match decl.factory_sharing_boundaries {
        Some(ref boundaries) => {
            builder = builder.factory_sharing_boundaries(boundaries.iter().cloned());
        }
        None if decl.creation_policy.is_none() => {
            builder = builder.factory_sharing_boundaries(Vec::<String>::new());
        }
        None => {}
    }

    Ok((member, builder.build()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Cardinality, CreationPolicy, MetadataValue, WrapperKind, WrapperShape};
    use crate::test_support::fixtures::{ty, AMBIGUOUS_CATALOG, LOGGING_CATALOG};

    fn manifest(src: &str) -> CatalogManifest {
        toml::from_str(src).unwrap()
    }

    fn logging_catalog() -> Catalog {
        discover(&manifest(LOGGING_CATALOG), WrapperShapes::standard()).unwrap()
    }

    #[test]
    fn test_discover_logging_catalog() {
        let catalog = logging_catalog();
        assert_eq!(catalog.len(), 3);

        let logger = catalog
            .find_by_qualified_id("app::logging::Logger")
            .unwrap();
        assert!(logger.is_shared());
        assert_eq!(logger.sharing_boundary(), Some(""));
        assert_eq!(logger.exports_on_type().len(), 1);
        assert_eq!(logger.exports_on_members().len(), 1);
        assert_eq!(logger.imports().len(), 2);
        assert_eq!(
            logger.on_activation_completed().map(|m| m.name()),
            Some("on_ready")
        );

        let (member, export) = logger.all_exports().nth(1).unwrap();
        assert_eq!(member.unwrap().name(), "formatter");
        assert_eq!(export.contract().name(), Some("default"));
        assert_eq!(
            export.metadata_value("Level"),
            Some(&MetadataValue::Integer(3))
        );

        let sink = catalog.find_by_qualified_id("app::logging::ConsoleSink").unwrap();
        assert!(!sink.is_shared());
    }

    #[test]
    fn test_discover_import_forms() {
        let catalog = logging_catalog();
        let logger = catalog
            .find_by_qualified_id("app::logging::Logger")
            .unwrap();

        let sinks = logger
            .imports()
            .iter()
            .find(|(m, _)| m.name() == "sinks")
            .map(|(_, i)| i)
            .unwrap();
        assert_eq!(sinks.wrapper_kind(), WrapperKind::Lazy);
        assert_eq!(sinks.metadata_type(), Some(ty("app::logging::SinkMeta")));
        assert_eq!(sinks.cardinality(), Cardinality::ZeroOrMore);
        assert_eq!(sinks.extra_constraints().len(), 1);
        assert_eq!(sinks.required_creation_policy(), CreationPolicy::Any);

        let clock = logger
            .imports()
            .iter()
            .find(|(m, _)| m.name() == "clock")
            .unwrap();
        assert_eq!(clock.0.kind(), MemberKind::Field);
        assert_eq!(clock.1.required_creation_policy(), CreationPolicy::Shared);
        assert!(clock.1.factory_sharing_boundaries().is_empty());

        let handler = catalog
            .find_by_qualified_id("app::web::RequestHandler")
            .unwrap();
        let sessions = handler
            .imports()
            .values()
            .find(|i| i.is_export_factory())
            .unwrap();
        assert!(sessions.factory_sharing_boundaries().contains("request"));
    }

    #[test]
    fn test_discover_uses_configured_shapes() {
        let src = r#"
            [[part]]
            type = "app::Api"

            [[part.imports]]
            member = "store"
            contract = "app::Deferred<app::Store>"
        "#;

        let standard = discover(&manifest(src), WrapperShapes::standard()).unwrap();
        let import = standard.imports().next().unwrap().import;
        assert_eq!(import.wrapper_kind(), WrapperKind::Direct);

        let mut shapes = WrapperShapes::default();
        shapes.register("app::Deferred", WrapperShape::Lazy).unwrap();
        let custom = discover(&manifest(src), &shapes).unwrap();
        let import = custom.imports().next().unwrap().import;
        assert_eq!(import.wrapper_kind(), WrapperKind::Lazy);
    }

    #[test]
    fn test_discover_ambiguous_ids_still_succeeds() {
        let catalog = discover(&manifest(AMBIGUOUS_CATALOG), WrapperShapes::standard()).unwrap();
        assert_eq!(catalog.ambiguous_ids().len(), 1);
        assert!(catalog
            .find_by_qualified_id("app::trace::Logger")
            .unwrap()
            .is_shared());
    }

    #[test]
    fn test_policy_with_boundaries_rejected() {
        let src = r#"
            [[part]]
            type = "app::Api"

            [[part.imports]]
            member = "sessions"
            contract = "composition::ExportFactory<app::Session>"
            creation-policy = "non-shared"
            factory-sharing-boundaries = ["session"]
        "#;

        let err = discover(&manifest(src), WrapperShapes::standard()).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("failed to build part `app::Api`"));
        assert!(message.contains("invalid import on member `sessions`"));
        assert!(message.contains("required_creation_policy"));
    }

    #[test]
    fn test_duplicate_import_member_rejected() {
        let src = r#"
            [[part]]
            type = "app::Api"

            [[part.imports]]
            member = "store"
            contract = "app::Store"

            [[part.imports]]
            member = "store"
            contract = "app::Cache"
        "#;

        let err = discover(&manifest(src), WrapperShapes::standard()).unwrap_err();
        assert!(format!("{:#}", err).contains("more than one import"));
    }

    #[test]
    fn test_bad_type_name_reports_part() {
        let src = r#"
            [[part]]
            type = "app::Api"

            [[part.exports]]
            contract = "app::Api<"
        "#;

        let err = discover(&manifest(src), WrapperShapes::standard()).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("app::Api"));
        assert!(message.contains("type_identity"));
    }

    #[test]
    fn test_duplicate_part_rejected() {
        let src = r#"
            [[part]]
            type = "app::Api"

            [[part]]
            type = "app::Api"
        "#;

        let err = discover(&manifest(src), WrapperShapes::standard()).unwrap_err();
        assert!(format!("{:#}", err).contains("declared more than once"));
    }

    #[test]
    fn test_kind_without_member_rejected() {
        let src = r#"
            [[part]]
            type = "app::Api"

            [[part.exports]]
            contract = "app::Api"
            kind = "method"
        "#;

        let err = discover(&manifest(src), WrapperShapes::standard()).unwrap_err();
        assert!(format!("{:#}", err).contains("requires `member`"));
    }
}
