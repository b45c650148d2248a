//! Command implementations

pub mod check;
pub mod imports;
pub mod inspect;

use std::path::Path;

use anyhow::Result;

use composition::core::Catalog;
use composition::discovery::load_catalog;
use composition::util::GlobalContext;

/// Load the catalog at `path` with the configured wrapper shapes.
pub fn load(ctx: &GlobalContext, path: Option<&Path>) -> Result<Catalog> {
    let shapes = ctx.wrapper_shapes()?;
    let catalog = load_catalog(&ctx.catalog_path(path), &shapes)?;
    tracing::debug!("loaded {} part(s)", catalog.len());
    Ok(catalog)
}
