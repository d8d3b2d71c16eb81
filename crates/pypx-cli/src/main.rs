use std::io;
use std::process;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use pypx_core::{CommandContext, PypxConfig, SystemEffects};

mod cli;
mod dispatch;
mod output;
mod style;

use cli::PypxCli;
use output::OutputOptions;

const INTERRUPTED_EXIT_CODE: i32 = 130;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = PypxCli::parse();
    init_tracing(cli.trace, cli.verbose, cli.quiet);

    pypx_core::install_interrupt_handler(|| {
        eprintln!("operation cancelled");
        process::exit(INTERRUPTED_EXIT_CODE);
    })
    .map_err(|err| eyre!("{err:#}"))?;

    let config = PypxConfig::from_env().map_err(|err| eyre!("{err:#}"))?;
    pypx_core::ensure_roots_exist(&config).map_err(|err| eyre!("{err:#}"))?;
    tracing::debug!(home = %config.home.display(), "pypx home");

    let ctx = CommandContext::new(config, SystemEffects::shared());
    let (info, outcome) = dispatch::dispatch_command(&ctx, &cli.command)?;
    let opts = OutputOptions {
        quiet: cli.quiet,
        json: cli.json,
        no_color: cli.no_color,
    };
    let code = output::emit_output(&opts, info, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        process::exit(code);
    }
}

fn init_tracing(trace: bool, verbose: u8, quiet: bool) {
    let level = if trace {
        "trace"
    } else if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = format!("pypx={level},pypx_core={level},pypx_cli={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(false)
        .without_time()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
