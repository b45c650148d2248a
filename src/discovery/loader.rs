//! Finding and reading catalog files.
//!
//! A catalog path may be a single `*.parts.toml` file or a directory, in
//! which case every catalog file below it is loaded in path order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::core::{Catalog, WrapperShapes};
use crate::discovery::{discover, CatalogManifest};
use crate::util::diagnostic::suggestions;

/// File name suffix that marks a catalog file.
pub const CATALOG_SUFFIX: &str = ".parts.toml";

/// Directories never searched for catalog files.
const SKIPPED_DIRS: &[&str] = &["target", "node_modules"];

/// A catalog file that is not valid TOML or does not match the schema.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("failed to parse catalog `{path}`: {message}")]
#[diagnostic(
    code(composition::catalog::parse),
    help("Catalog files declare parts with `[[part]]`, `[[part.exports]]`, and `[[part.imports]]` tables")
)]
pub struct CatalogParseError {
    pub path: String,
    pub message: String,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: Option<SourceSpan>,
}

/// Parse catalog contents. `origin` is used for error reporting only.
pub fn parse_catalog(contents: &str, origin: &Path) -> Result<CatalogManifest, CatalogParseError> {
    toml::from_str(contents).map_err(|e| {
        let path = origin.display().to_string();
        CatalogParseError {
            message: e.message().to_string(),
            span: e.span().map(SourceSpan::from),
            src: NamedSource::new(path.clone(), contents.to_string()),
            path,
        }
    })
}

/// Read and parse one catalog file.
pub fn load_catalog_file(path: &Path) -> Result<CatalogManifest> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog: {}", path.display()))?;

    let manifest = parse_catalog(&contents, path)?;
    tracing::debug!(
        "loaded {} part declaration(s) from {}",
        manifest.parts.len(),
        path.display()
    );
    Ok(manifest)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&&*name)
}

/// Find catalog files below a directory, sorted by path.
pub fn find_catalog_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
    {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if entry.file_type().is_file()
            && entry.file_name().to_string_lossy().ends_with(CATALOG_SUFFIX)
        {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Load a catalog from a file or directory and run discovery over it.
pub fn load_catalog(path: &Path, shapes: &WrapperShapes) -> Result<Catalog> {
    let files = if path.is_dir() {
        let files = find_catalog_files(path)?;
        if files.is_empty() {
            anyhow::bail!(
                "no `*{}` files found in {}\n{}",
                CATALOG_SUFFIX,
                path.display(),
                suggestions::NO_CATALOG
            );
        }
        files
    } else {
        vec![path.to_path_buf()]
    };

    let mut manifest = CatalogManifest::default();
    for file in &files {
        manifest.merge(load_catalog_file(file)?);
    }

    discover(&manifest, shapes)
        .with_context(|| format!("failed to build catalog from {}", path.display()))
}
