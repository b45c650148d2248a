//! Test fixtures for common test scenarios.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::{
    Cardinality, Catalog, Contract, ExportDefinition, ImportDefinition, MemberExports,
    MemberImports, MemberRef, PartDefinition, TypeRef, WrapperShapes,
};
use crate::discovery::{discover, CatalogManifest};

/// A catalog declaring a logging stack that exercises every import shape.
pub const LOGGING_CATALOG: &str = r#"
[[part]]
type = "app::logging::Logger"
sharing-boundary = ""
on-activation = "on_ready"

[[part.exports]]
contract = "app::logging::ILogger"

[[part.exports]]
member = "formatter"
contract = "app::logging::Formatter"
name = "default"
metadata = { Level = 3, Channel = "audit" }

[[part.imports]]
member = "sinks"
contract = "composition::Lazy<app::logging::Sink, app::logging::SinkMeta>"
cardinality = "zero-or-more"
required-metadata = { Channel = "audit" }

[[part.imports]]
member = "clock"
kind = "field"
contract = "app::Clock"
creation-policy = "shared"

[[part]]
type = "app::logging::ConsoleSink"

[[part.exports]]
contract = "app::logging::Sink"
metadata = { Channel = "audit" }

[[part]]
type = "app::web::RequestHandler"

[[part.imports]]
member = "sessions"
contract = "composition::ExportFactory<app::web::Session>"
factory-sharing-boundaries = ["request"]

[[part.imports]]
member = "clock"
contract = "app::Clock"
"#;

/// A catalog with two parts sharing the bare id `Logger`.
pub const AMBIGUOUS_CATALOG: &str = r#"
[[part]]
type = "app::audit::Logger"

[[part]]
type = "app::trace::Logger"
shared = true
"#;

/// Parse a type identity, panicking on malformed input.
pub fn ty(text: &str) -> TypeRef {
    TypeRef::parse(text).unwrap()
}

/// A metadata-driven import with no constraints or boundaries.
pub fn import_of(contract_type: &str, cardinality: Cardinality) -> ImportDefinition {
    ImportDefinition::new(
        Contract::new(ty(contract_type)),
        cardinality,
        Vec::new(),
        BTreeSet::new(),
    )
}

/// A non-shared part exporting its own type, with property imports.
pub fn sample_part(part_type: &str, imports: &[(&str, ImportDefinition)]) -> PartDefinition {
    let part_type = ty(part_type);

    let mut member_imports = MemberImports::new();
    for (member, import) in imports {
        member_imports.insert(
            MemberRef::property(part_type, *member).unwrap(),
            import.clone(),
        );
    }

    PartDefinition::new(
        part_type,
        vec![ExportDefinition::new(Contract::new(part_type))],
        MemberExports::new(),
        member_imports,
        None,
        None,
    )
    .unwrap()
}

/// Discover a catalog from TOML source with the built-in wrapper shapes.
pub fn catalog_from(src: &str) -> Catalog {
    let manifest: CatalogManifest = toml::from_str(src).unwrap();
    discover(&manifest, WrapperShapes::standard()).unwrap()
}

/// A set of catalog files to materialize on disk.
#[derive(Debug, Clone, Default)]
pub struct CatalogFixture {
    /// Files (path relative to root -> content).
    pub files: Vec<(PathBuf, String)>,
}

impl CatalogFixture {
    pub fn new() -> Self {
        CatalogFixture { files: Vec::new() }
    }

    /// The logging catalog as a single file.
    pub fn logging() -> Self {
        CatalogFixture::new().with_file("logging.parts.toml", LOGGING_CATALOG)
    }

    /// Add a file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    /// Write all files below `root`.
    pub fn write_to(&self, root: &Path) {
        for (path, content) in &self.files {
            let full = root.join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(full, content).unwrap();
        }
    }

    /// Write all files into a fresh temporary directory.
    pub fn write_to_temp(&self) -> TempDir {
        let tmp = TempDir::new().unwrap();
        self.write_to(tmp.path());
        tmp
    }
}
