//! compliance-engine: questionnaire-based compliance scoring
//!
//! Scores answers to a regulation questionnaire against per-industry rule sets.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use compliance_engine::{
    cli::{self, exit_codes, AssessConfig},
    config::{
        self, discover_config_file, user_config_dir, CliOverrides, EngineConfig, OutputFormat,
        Validatable, CONFIG_FILE_NAMES,
    },
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with built-in rule information
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nBuilt-in regulation profiles:",
        "\n  DPDP, NPC, OAIC, PDPPL (alias: ndp_qatar, qatar)",
        "\n\nOutput Formats:",
        "\n  summary, json",
        "\n\nScore corrections:",
        "\n  all-full-points, full-compliance-phrases, precision-floor"
    )
}

#[derive(Parser)]
#[command(name = "compliance-engine")]
#[command(version, long_version = build_long_version())]
#[command(about = "Questionnaire-based compliance scoring", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  Score below --min-score / rule set has errors
    3  Error occurred

EXAMPLES:
    # Score a response file
    compliance-engine assess -r DPDP -i E-commerce --responses answers.json -d questionnaires

    # CI gate on the overall score
    compliance-engine assess -r PDPPL -i Oil_and_Gas --responses answers.json --min-score 70

    # Export JSON for processing
    compliance-engine assess -r NPC -i general --responses answers.json -o json > score.json

    # Check a rule-set document
    compliance-engine validate questionnaires/DPDP/E-commerce.json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Arguments for the `assess` subcommand
#[derive(Parser)]
struct AssessArgs {
    /// Regulation code (e.g. DPDP, NPC, PDPPL, OAIC)
    #[arg(short, long)]
    regulation: String,

    /// Industry, as named by the rule-set document
    #[arg(short, long, default_value = "general")]
    industry: String,

    /// JSON file mapping `s{section}_q{question}` keys to answers
    #[arg(long)]
    responses: PathBuf,

    /// Directory holding `<REGULATION>/<industry>.json` rule sets
    #[arg(short = 'd', long, env = "COMPLIANCE_QUESTIONNAIRE_DIR")]
    questionnaire_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long)]
    output: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Fail if the overall score is below threshold (0-100)
    #[arg(long)]
    min_score: Option<f64>,

    /// Group recommendations by priority
    #[arg(long)]
    priorities: bool,

    /// Disable score corrections and answer-table patches
    #[arg(long)]
    no_corrections: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a response file against a regulation's questionnaire
    Assess(AssessArgs),

    /// List the industries available for a regulation
    Industries {
        /// Regulation code
        #[arg(short, long)]
        regulation: String,

        /// Directory holding rule sets
        #[arg(short = 'd', long, env = "COMPLIANCE_QUESTIONNAIRE_DIR")]
        questionnaire_dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long)]
        output: Option<OutputFormat>,
    },

    /// Check the structure of a rule-set document
    Validate {
        /// Path to the rule-set JSON document
        file: PathBuf,

        /// Output format
        #[arg(short, long)]
        output: Option<OutputFormat>,

        /// Output file path (stdout if not specified)
        #[arg(short = 'O', long)]
        output_file: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .compliance-engine.yaml in the current directory
    Init,
    /// Generate JSON Schema for the config file format
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Load the config file, apply CLI overrides and validate the result.
fn load_config(path: Option<&std::path::Path>, overrides: &CliOverrides) -> Result<EngineConfig> {
    let (config, loaded_from) = EngineConfig::from_file_with_overrides(path, overrides);
    if let Some(path) = loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }
    let errors = config.validate();
    if !errors.is_empty() {
        for error in &errors {
            tracing::error!("{error}");
        }
        anyhow::bail!("invalid configuration ({} errors)", errors.len());
    }
    Ok(config)
}

fn exit_with(code: i32) -> Result<()> {
    if code != exit_codes::SUCCESS {
        std::process::exit(code);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
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

    if let Err(err) = run(cli) {
        tracing::error!("{err:#}");
        std::process::exit(exit_codes::ERROR);
    }
}

/// Dispatch to command handlers
fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Assess(args) => {
            let overrides = CliOverrides {
                questionnaire_dir: args.questionnaire_dir,
                format: args.output,
                output_file: args.output_file,
                no_color: cli.no_color,
                no_corrections: args.no_corrections,
            };
            let config = load_config(cli.config.as_deref(), &overrides)?;
            let assess = AssessConfig {
                regulation: args.regulation,
                industry: args.industry,
                responses: args.responses,
                min_score: args.min_score,
                priorities: args.priorities,
            };
            exit_with(cli::run_assess(&assess, &config)?)
        }

        Commands::Industries {
            regulation,
            questionnaire_dir,
            output,
        } => {
            let overrides = CliOverrides {
                questionnaire_dir,
                format: output,
                no_color: cli.no_color,
                ..CliOverrides::default()
            };
            let config = load_config(cli.config.as_deref(), &overrides)?;
            cli::run_industries(&regulation, &config)
        }

        Commands::Validate {
            file,
            output,
            output_file,
        } => {
            let overrides = CliOverrides {
                format: output,
                output_file,
                no_color: cli.no_color,
                ..CliOverrides::default()
            };
            let config = load_config(cli.config.as_deref(), &overrides)?;
            exit_with(cli::run_validate(&file, &config)?)
        }

        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "compliance-engine",
                &mut io::stdout(),
            );
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) = config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    user_config_dir().map(|p| p.display().to_string()),
                    ::dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".compliance-engine.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                let content = config::generate_example_config();
                std::fs::write(&target, content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
            ConfigAction::Schema { output } => {
                let schema = config::generate_json_schema()?;
                match output {
                    Some(path) => {
                        std::fs::write(&path, &schema)?;
                        eprintln!("Schema written to {}", path.display());
                    }
                    None => {
                        println!("{schema}");
                    }
                }
                Ok(())
            }
        },
    }
}
