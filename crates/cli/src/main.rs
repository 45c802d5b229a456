//! solverbench CLI
//!
//! Command-line interface for scoring solver benchmark traces and ranking
//! solver configurations.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use solverbench_cli::commands::{
    analyze, config, inspect, show, validate, CommandContext, InputArgs,
};
use solverbench_cli::output::OutputFormat;
use solverbench_common::{init_tracing, AnalysisConfig};

/// Output format for CLI commands
#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum CliOutputFormat {
    /// JSON output
    Json,
    /// Table output (default)
    #[default]
    Table,
    /// Plain text output
    Plain,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Table => OutputFormat::Table,
            CliOutputFormat::Plain => OutputFormat::Plain,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "solverbench")]
#[command(author, version, about = "Solver benchmark scoring CLI")]
#[command(long_about = "Scores constraint-solver benchmark traces.\n\n\
    Reads the solution traces of several solver configurations, scores every run against \
    the best and worst values seen on its instance, and ranks the configurations.")]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(short = 'o', long, global = true, value_enum, default_value = "table")]
    format: CliOutputFormat,

    /// Configuration file (layered over solverbench.toml and config/<env>.toml)
    #[arg(short, long, global = true, env = "SOLVERBENCH_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score every trace and write the report files
    #[command(alias = "a")]
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Directory the report files are written to
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Decimal places in written scores
        #[arg(long)]
        precision: Option<usize>,

        /// Print the ranking without writing any files
        #[arg(long)]
        no_export: bool,
    },

    /// Print per-instance scores
    #[command(alias = "s")]
    Show {
        #[command(flatten)]
        input: InputArgs,

        /// Only print this problem
        #[arg(short, long)]
        problem: Option<String>,
    },

    /// Print the parsed trace of one run
    #[command(alias = "i")]
    Inspect {
        #[command(flatten)]
        input: InputArgs,

        /// Configuration that produced the run
        #[arg(long)]
        configuration: String,

        /// Problem name
        #[arg(long)]
        problem: String,

        /// Instance name
        #[arg(long)]
        instance: String,
    },

    /// Check every trace without scoring
    #[command(alias = "v")]
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show or check the effective configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Validate the configuration and the files it points at
    Check,
}

fn generate_completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

async fn execute(cli: Cli) -> Result<()> {
    let mut config = AnalysisConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Analyze {
            input,
            out_dir,
            precision,
            ..
        } => {
            if let Some(dir) = out_dir {
                config.output.dir = dir.clone();
            }
            if let Some(precision) = precision {
                config.output.precision = *precision;
            }
            input.apply(&mut config)?;
        }
        Commands::Show { input, .. }
        | Commands::Inspect { input, .. }
        | Commands::Validate { input } => input.apply(&mut config)?,
        Commands::Config { .. } | Commands::Completions { .. } => {}
    }

    let log_level = if cli.verbose {
        "debug"
    } else {
        config.telemetry.log_level.as_str()
    };
    init_tracing(
        &config.telemetry.service_name,
        config.telemetry.json_logging,
        log_level,
    )?;

    let ctx = CommandContext::new(config, cli.format.into());

    match cli.command {
        Commands::Analyze { no_export, .. } => analyze::run(&ctx, !no_export).await,
        Commands::Show { problem, .. } => show::run(&ctx, problem).await,
        Commands::Inspect {
            configuration,
            problem,
            instance,
            ..
        } => inspect::run(&ctx, configuration, problem, instance).await,
        Commands::Validate { .. } => validate::run(&ctx).await,
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) | None => config::show(&ctx),
            Some(ConfigCommands::Check) => config::check(&ctx),
        },
        Commands::Completions { .. } => {
            // Already handled in main
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup colored output
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Handle completions command early (doesn't need config)
    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return;
    }

    let verbose = cli.verbose;
    if let Err(e) = execute(cli).await {
        use colored::Colorize;
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        if verbose {
            eprintln!("\n{}", "Backtrace:".dimmed());
            eprintln!("{:?}", e);
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "solverbench",
            "analyze",
            "results",
            "--directions",
            "directions.toml",
            "--time-limit",
            "300",
            "--out-dir",
            "report",
            "-o",
            "json",
        ])
        .unwrap();

        assert!(matches!(cli.format, CliOutputFormat::Json));
        match cli.command {
            Commands::Analyze { input, out_dir, .. } => {
                assert_eq!(input.results_dir, Some(PathBuf::from("results")));
                assert_eq!(input.time_limit, Some(300.0));
                assert_eq!(out_dir, Some(PathBuf::from("report")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_inspect() {
        let cli = Cli::try_parse_from([
            "solverbench",
            "inspect",
            "--configuration",
            "a",
            "--problem",
            "jobshop",
            "--instance",
            "ft06",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Inspect { .. }));
    }

    #[test]
    fn test_inspect_requires_run() {
        assert!(Cli::try_parse_from(["solverbench", "inspect", "--problem", "jobshop"]).is_err());
    }
}
