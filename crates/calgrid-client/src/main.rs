//! calgrid CLI entry point.

use std::io::Write;
use std::process::ExitCode;

use calgrid_core::{TracingConfig, init_tracing};
use calgrid_providers::MappingContext;
use clap::Parser;
use tracing::debug;

use calgrid_client::cli::{Cli, Command, ConfigAction};
use calgrid_client::commands::{self, layout::LayoutOptions, layout::LayoutRequest};
use calgrid_client::config::ClientConfig;
use calgrid_client::error::ClientResult;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> ClientResult<()> {
    let (config, source) = match cli.config {
        Some(ref path) => (ClientConfig::load_from(path)?, path.clone()),
        None => (ClientConfig::load()?, ClientConfig::default_path()),
    };

    let format = cli.log_format.unwrap_or_default();
    init_tracing(TracingConfig::cli(cli.debug || config.debug).with_format(format))?;
    debug!(config = %source.display(), "loaded configuration");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Normalize {
            provider,
            account,
            calendar,
            strict,
            file,
        } => {
            let input = commands::read_input(&file)?;
            let ctx = MappingContext::new(account, calendar);
            commands::normalize::run(provider, &ctx, strict, &input, &mut out)?;
        }
        Command::Denormalize { file } => {
            let input = commands::read_input(&file)?;
            commands::denormalize::run(&input, &mut out)?;
        }
        Command::Rrule { file } => {
            let input = commands::read_input(&file)?;
            commands::rrule::run(&input, &mut out)?;
        }
        Command::Layout { view } => {
            let (request, args) = LayoutRequest::from_view(&view);
            let options = LayoutOptions::resolve(&config.calendar, args.tz, args.lanes);
            let input = commands::read_input(&args.file)?;
            commands::layout::run(request, options, &input, &mut out)?;
        }
        Command::Snap {
            offset,
            height,
            date,
        } => commands::snap::run(offset, height, date, &mut out)?,
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config, &source, &mut out)?,
            ConfigAction::Path => commands::config::path(&source, &mut out)?,
        },
    }

    out.flush()?;
    Ok(())
}
