//! cdx-combine: merge CycloneDX SBOMs into one
//!
//! Combines the SBOMs of an application's parts into a single CycloneDX 1.5
//! document under a new root component.

#![allow(clippy::struct_excessive_bools)]

use anyhow::{Context, Result};
use cdx_combine::{
    cli,
    config::{
        discover_config_file, generate_example_config, generate_json_schema, load_config_file,
        AppConfig, BehaviorConfig, InputConfig, MergeConfig, OutputConfig,
    },
    pipeline::exit_codes,
};
use clap::{error::ErrorKind, ArgAction, CommandFactory, Parser};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cdx-combine")]
#[command(version, disable_version_flag = true)]
#[command(
    about = "Combines multiple CycloneDX SBOM files into one. It will keep the component names.",
    long_about = None
)]
#[command(after_help = "EXIT CODES:
    0  Merged SBOM written (diagnostics are logged, not fatal)
    1  Invalid invocation, e.g. no input files or a missing --name
    3  Error occurred while writing the output

EXAMPLES:
    # Merge two service SBOMs
    cdx-combine -n \"My Suite\" -v 1.0 frontend.cdx.json backend.cdx.json

    # Merge everything under sboms/ and print to stdout
    cdx-combine -n suite -v 2.3 -o - 'sboms/*.json'")]
struct Cli {
    /// Input SBOM files or glob patterns
    files: Vec<String>,

    /// Name of the combined application
    #[arg(
        short,
        long,
        required_unless_present_any = [
            "completions",
            "print_config",
            "print_config_schema",
            "print_example_config"
        ]
    )]
    name: Option<String>,

    /// Version of the combined application
    #[arg(
        short = 'v',
        long = "version",
        required_unless_present_any = [
            "completions",
            "print_config",
            "print_config_schema",
            "print_example_config"
        ]
    )]
    app_version: Option<String>,

    /// Output file ("-" for stdout) [default: cyclonedx.json]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, env = "CDX_COMBINE_CONFIG")]
    config: Option<PathBuf>,

    /// Prefix for derived component references (e.g. "cdxc:")
    #[arg(long)]
    ref_prefix: Option<String>,

    /// Delimiter of composite bom-refs; only the last segment is kept
    #[arg(long)]
    ref_delimiter: Option<char>,

    /// Skip inputs whose specVersion is not a supported CycloneDX version
    #[arg(long)]
    strict_input: bool,

    /// Record the generation time in metadata.timestamp
    #[arg(long)]
    timestamp: bool,

    /// Skip schema validation of the merged SBOM
    #[arg(long)]
    no_validate: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,

    /// Print the JSON Schema of the config file format and exit
    #[arg(long)]
    print_config_schema: bool,

    /// Print a commented example .cdx-combine.yaml and exit
    #[arg(long)]
    print_example_config: bool,

    /// Print version
    #[arg(short = 'V', long = "tool-version", action = ArgAction::Version)]
    tool_version: Option<bool>,
}

impl Cli {
    /// Settings given on the command line, to be layered over the config file
    fn overrides(&self) -> AppConfig {
        AppConfig {
            input: InputConfig {
                strict: self.strict_input,
            },
            merge: MergeConfig {
                ref_prefix: self.ref_prefix.clone(),
                ref_delimiter: self
                    .ref_delimiter
                    .unwrap_or(cdx_combine::config::DEFAULT_REF_DELIMITER),
            },
            output: OutputConfig {
                file: self.output.clone(),
                include_timestamp: self.timestamp,
                validate: !self.no_validate,
            },
            behavior: BehaviorConfig {
                verbose: self.verbose,
                quiet: self.quiet,
            },
        }
    }
}

fn main() -> Result<()> {
    // Invalid invocations exit with the usage code rather than clap's default
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(exit_codes::USAGE);
            }
        },
    };

    if let Some(shell) = cli.completions {
        generate(shell, &mut Cli::command(), "cdx-combine", &mut io::stdout());
        return Ok(());
    }
    if cli.print_config_schema {
        println!("{}", generate_json_schema()?);
        return Ok(());
    }
    if cli.print_example_config {
        print!("{}", generate_example_config());
        return Ok(());
    }

    // The config file can change the log level, so it is loaded before
    // logging is set up and its problems are reported afterwards.
    let config_path = discover_config_file(cli.config.as_deref());
    let file_config = config_path.as_deref().map(load_config_file);
    let mut app_config = match &file_config {
        Some(Ok(config)) => config.clone(),
        _ => AppConfig::default(),
    };
    app_config.merge(&cli.overrides());

    init_logging(&app_config.behavior);

    if let Some(explicit) = cli.config.as_deref() {
        if !explicit.exists() {
            tracing::warn!("Config file {} does not exist", explicit.display());
        }
    }
    match (&config_path, &file_config) {
        (Some(path), Some(Ok(_))) => tracing::debug!("Loaded configuration from {}", path.display()),
        (Some(path), Some(Err(e))) => {
            tracing::warn!("Failed to load config from {}: {}", path.display(), e);
        }
        _ => {}
    }

    if cli.print_config {
        let yaml = serde_yaml::to_string(&app_config).context("Failed to serialize config")?;
        print!("{yaml}");
        return Ok(());
    }

    let mut builder = cli::CombineConfigBuilder::new()
        .inputs(cli.files)
        .app_config(app_config);
    if let Some(name) = cli.name {
        builder = builder.name(name);
    }
    if let Some(version) = cli.app_version {
        builder = builder.version(version);
    }
    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            std::process::exit(exit_codes::USAGE);
        }
    };

    match cli::run_combine(config) {
        Ok(exit_codes::SUCCESS) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("{e:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

/// `RUST_LOG` wins; otherwise `--quiet` selects warn, `--verbose` debug and
/// the default is info. Logs go to stderr so `-o -` output stays clean.
fn init_logging(behavior: &BehaviorConfig) {
    let log_level = if behavior.quiet {
        "warn"
    } else if behavior.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}
