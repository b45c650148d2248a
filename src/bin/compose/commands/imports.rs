//! `compose imports` command

use anyhow::Result;

use crate::cli::ImportsArgs;
use composition::ops::{format_groups, format_groups_json, import_groups};
use composition::util::{GlobalContext, OutputFormat};

pub fn execute(args: ImportsArgs, ctx: &GlobalContext) -> Result<()> {
    let catalog = super::load(ctx, args.path.as_deref())?;

    let groups = import_groups(&catalog, args.equivalent);

    match ctx.output_format(args.json) {
        OutputFormat::Json => println!("{}", format_groups_json(&groups)?),
        OutputFormat::Text => print!("{}", format_groups(&groups)),
    }

    Ok(())
}
