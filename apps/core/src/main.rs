// Survey Analysis Entry Point
// Free-text analytics and SD factor extraction, one JSON document per run

mod capabilities;
mod commands;
mod config;
mod error;
mod factor;
mod fs_manager;
mod logging;
mod nlp;
mod payload;

#[cfg(test)]
mod tests;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use commands::Rendered;
use config::AppConfig;
use dotenv::dotenv;
use nlp::AnalysisEngines;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "survey-analysis")]
#[command(version)]
#[command(about = "Analyze questionnaire free-text answers and SD ratings")]
struct Cli {
    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Skip the morphological tokenizer and the sentiment model
    #[arg(long, global = true)]
    baseline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Keywords, co-occurrences and sentiment of free-text answers
    Text(InputArgs),
    /// Latent factors of 8-scale SD ratings
    Factor(InputArgs),
    /// Report which enhanced components are available
    Capabilities,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// JSON document
    data: Option<String>,

    /// Read the JSON document from a file (`-` for stdin)
    #[arg(short, long, conflicts_with = "data")]
    input: Option<PathBuf>,
}

impl InputArgs {
    fn read(&self) -> anyhow::Result<String> {
        commands::read_input(self.data.as_deref(), self.input.as_deref())
    }
}

fn engines_for(config: &AppConfig, baseline: bool) -> AnalysisEngines {
    if baseline {
        info!("Baseline mode requested, enhanced components not loaded");
        AnalysisEngines::baseline()
    } else {
        AnalysisEngines::resolve(&config.engines)
    }
}

/// Run one parsed command against a loaded configuration.
fn execute(cli: Cli, config: &AppConfig) -> Rendered {
    let pretty = cli.pretty;
    match cli.command {
        Command::Text(args) => {
            let outcome = args.read().and_then(|raw| {
                let engines = engines_for(config, cli.baseline);
                commands::run_text(&raw, &engines, &config.text)
            });
            commands::render(outcome, pretty)
        }
        Command::Factor(args) => {
            let outcome = args
                .read()
                .and_then(|raw| commands::run_factor(&raw, &config.factor));
            commands::render(outcome, pretty)
        }
        Command::Capabilities => {
            let engines = engines_for(config, cli.baseline);
            let report = commands::run_capabilities(&engines, &config.factor);
            commands::render(Ok(report), pretty)
        }
    }
}

fn emit(rendered: Rendered) -> ExitCode {
    let mut stdout = std::io::stdout().lock();
    if writeln!(stdout, "{}", rendered.body).is_err() {
        return ExitCode::FAILURE;
    }
    ExitCode::from(rendered.status)
}

fn main() -> ExitCode {
    dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => return emit(commands::render_error(e.to_string().trim(), false)),
        },
    };

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => return emit(commands::render_error(&e.to_string(), cli.pretty)),
    };

    logging::init(&config.logging);
    info!("survey-analysis v{} starting", env!("CARGO_PKG_VERSION"));

    emit(execute(cli, &config))
}
