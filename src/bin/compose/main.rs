//! compose CLI - inspect and check composable part catalogs

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use composition::discovery::loader::CatalogParseError;
use composition::util::diagnostic::render_miette;
use composition::util::GlobalContext;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        report_error(&e, color);
        std::process::exit(1);
    }
}

fn report_error(err: &anyhow::Error, color: bool) {
    // Parse errors carry a source span worth showing
    if let Some(parse_err) = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<CatalogParseError>())
    {
        eprint!("{}", render_miette(parse_err, color));
    } else {
        eprintln!("error: {:#}", err);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("composition=debug")
    } else {
        EnvFilter::new("composition=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(cli.verbose);
    ctx.set_color(color);

    // Execute command
    match cli.command {
        Commands::Inspect(args) => commands::inspect::execute(args, &ctx),
        Commands::Imports(args) => commands::imports::execute(args, &ctx),
        Commands::Check(args) => commands::check::execute(args, &ctx),
    }
}
