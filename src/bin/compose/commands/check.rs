//! `compose check` command

use anyhow::Result;

use crate::cli::CheckArgs;
use composition::discovery::load_catalog;
use composition::ops::check_catalog;
use composition::util::diagnostic::emit;
use composition::util::GlobalContext;

pub fn execute(args: CheckArgs, ctx: &GlobalContext) -> Result<()> {
    let shapes = ctx.wrapper_shapes()?;
    let path = ctx.catalog_path(args.path.as_deref());
    let catalog = load_catalog(&path, &shapes)?;
    tracing::debug!("loaded {} part(s)", catalog.len());

    let report = check_catalog(&catalog, &shapes).located_at(&path);
    for diagnostic in report.visible(ctx.is_verbose()) {
        emit(diagnostic, ctx.color());
    }

    println!("{}", report.summary());

    if report.failed(args.deny_warnings) {
        std::process::exit(1);
    }

    Ok(())
}
