//! router-smoke - Smoke tests for an LLM routing service
//!
//! Sends one chat completion per fixture through the router's task,
//! agentic and manual routing modes and prints what came back.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use router_smoke::suite::{Reporter, Runner, Suite};
use router_smoke::Config;

#[derive(Parser)]
#[command(name = "router-smoke")]
#[command(about = "Smoke tests for an LLM routing service")]
#[command(version)]
struct Cli {
    /// Path to an optional configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run routing suites against the router (default)
    Run {
        /// Suite to run; repeat to run several. Runs all when omitted
        #[arg(short, long, value_enum)]
        suite: Vec<Suite>,

        /// Override the router endpoint URL
        #[arg(short, long)]
        url: Option<String>,

        /// Override the pause between probes, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Show the fixture tasks and models
    Fixtures,

    /// Validate configuration
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, key_source) = Config::load(cli.config.as_deref())?;

    // Report goes to stdout; diagnostics go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("router_smoke={}", config.logging.level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command.unwrap_or(Commands::Run {
        suite: Vec::new(),
        url: None,
        delay_ms: None,
    }) {
        Commands::Run {
            suite,
            url,
            delay_ms,
        } => {
            if let Some(url) = url {
                tracing::info!(url = %url, "Override router URL");
                config.router.url = url;
                config.validate()?;
            }

            let suites = if suite.is_empty() {
                Suite::ALL.to_vec()
            } else {
                suite
            };

            let mut runner = Runner::new(&config, std::io::stdout())?;
            if let Some(ms) = delay_ms {
                runner = runner.with_delay(Duration::from_millis(ms));
            }

            // Probe failures are reported, never turned into an exit code.
            runner.run(&suites).await?;
            Ok(())
        }

        Commands::Fixtures => {
            let mut reporter = Reporter::new(std::io::stdout());
            reporter.fixtures(&config.fixtures)?;
            Ok(())
        }

        Commands::Check => {
            tracing::info!(config = ?cli.config, "Checking configuration");
            println!("Configuration OK");
            println!("  router url:      {}", config.router.url);
            println!("  api key source:  {}", key_source);
            match config.router.timeout_secs {
                Some(secs) => println!("  timeout:         {}s", secs),
                None => println!("  timeout:         none"),
            }
            println!("  delay:           {}ms", config.run.delay_ms);
            println!("  max_tokens:      {}", config.run.max_tokens);
            println!(
                "  fixtures:        {} tasks, {} models",
                config.fixtures.tasks.len(),
                config.fixtures.models.len()
            );
            Ok(())
        }
    }
}
