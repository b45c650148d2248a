//! `compose inspect` command

use anyhow::Result;

use crate::cli::InspectArgs;
use composition::ops::{format_reports, format_reports_json, inspect_catalog, InspectOptions};
use composition::util::{GlobalContext, OutputFormat};

pub fn execute(args: InspectArgs, ctx: &GlobalContext) -> Result<()> {
    let catalog = super::load(ctx, args.path.as_deref())?;

    let opts = InspectOptions { part: args.part };
    let reports = inspect_catalog(&catalog, &opts)?;

    match ctx.output_format(args.json) {
        OutputFormat::Json => println!("{}", format_reports_json(&reports)?),
        OutputFormat::Text => print!("{}", format_reports(&reports)),
    }

    Ok(())
}
