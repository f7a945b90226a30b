//! `context-policy`: inspect and check context policies.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use amqp_context_policy::config::{load_policy_file, ConfigError};
use amqp_context_policy::observability::logging::{init_logging, DEFAULT_LOG_LEVEL};
use amqp_context_policy::properties::{HostIdentity, RESERVED_CLIENT_PROPERTIES};
use amqp_context_policy::ContextPolicyBuilder;

#[derive(Parser)]
#[command(name = "context-policy")]
#[command(about = "Inspect and validate AMQP context policies", long_about = None)]
struct Cli {
    /// Log level. RUST_LOG takes precedence; falls back to the policy file.
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default policy
    Defaults,
    /// List reserved and defaulted client property keys
    Keys,
    /// Validate a policy file and print the resulting policy
    Check {
        /// Path to the TOML policy file
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Policy check failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Defaults => {
            setup_logging(cli.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL));
            let policy = ContextPolicyBuilder::new().build()?;
            println!("{}", serde_json::to_string_pretty(&policy.summary())?);
        }
        Commands::Keys => {
            let host = HostIdentity::current();
            println!("reserved (set by the connection layer):");
            for key in RESERVED_CLIENT_PROPERTIES {
                println!("  {}", key);
            }
            println!("defaulted (overridable):");
            for (key, value) in host.client_properties() {
                println!("  {:<12} {}", key, value);
            }
        }
        Commands::Check { path } => {
            let file = match load_policy_file(&path) {
                Ok(file) => file,
                Err(ConfigError::Validation(errors)) => {
                    for e in &errors {
                        eprintln!("  - {}", e);
                    }
                    return Err(ConfigError::Validation(errors).into());
                }
                Err(e) => return Err(e.into()),
            };

            let level = cli
                .log_level
                .unwrap_or_else(|| file.observability.log_level.clone());
            setup_logging(&level);
            tracing::info!(path = %path.display(), "Checking policy file");

            let mut builder = ContextPolicyBuilder::new();
            file.apply(&mut builder)?;
            let policy = builder.build()?;
            println!("{}", serde_json::to_string_pretty(&policy.summary())?);
        }
    }
    Ok(())
}

fn setup_logging(level: &str) {
    if let Err(e) = init_logging(level) {
        eprintln!("Warning: logging not initialised: {}", e);
    }
}
