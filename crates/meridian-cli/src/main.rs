// crates/meridian-cli/src/main.rs
//
// CLI entrypoint for the Meridian edge network client.
//
// Provides subcommands for creating a node identity, applying it to a
// pool, checking application status, and controlling the local edge
// daemon. All network effects go through the control daemon's HTTP API
// and the edge daemon's JSON-RPC endpoint; this binary is a thin client.

mod commands;
mod config;
mod output;
mod prompt;

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use meridian_client::edge::DEFAULT_EDGE_URL;
use meridian_client::{
    ControlClient, ControlEndpoints, CredentialCache, EdgeClient, HttpTransport, PollConfig,
};
use meridian_core::Error;

use commands::node::NodeCmd;
use commands::pool::PoolCmd;
use config::EnvFile;
use prompt::PromptCredentialSource;

/// Meridian CLI — operator tools for the Meridian edge network.
#[derive(Parser, Debug)]
#[command(
    name = "meridian",
    version,
    about = "Meridian CLI. Create an edge node, apply it to a pool, and control the local daemons."
)]
struct Cli {
    /// Path to the environment file.
    #[arg(long, global = true, default_value = "env.toml")]
    env: String,

    /// HTTP request timeout in seconds.
    #[arg(long, global = true, default_value_t = 10)]
    timeout: u64,

    /// Log level: trace, debug, info, warn, error.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Control daemon base URL (overrides the environment file).
    #[arg(long, global = true)]
    control_url: Option<String>,

    /// Network gateway base URL (overrides the environment file).
    #[arg(long, global = true)]
    gateway_url: Option<String>,

    /// Edge daemon JSON-RPC URL (overrides the environment file).
    #[arg(long, global = true)]
    edge_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Deploy a new node contract and set its data.
    Create,

    /// Send your node's data to a pool as an application.
    Apply,

    /// Check the status of a submitted pool application.
    Check,

    /// Control the local edge daemon: start, stop, status.
    #[command(subcommand)]
    Node(NodeCmd),

    /// Pool-owner operations: list pools and manage applications.
    #[command(subcommand)]
    Pool(PoolCmd),

    /// Show the locally saved node profile.
    Profile,

    /// Show the control daemon's settings.
    Settings,

    /// Print client version information.
    Version,
}

/// Everything a command needs: resolved endpoints, clients, and the
/// loaded environment file.
pub struct AppContext {
    pub env_path: String,
    pub env: EnvFile,
    pub transport: HttpTransport,
    pub control: ControlClient<HttpTransport>,
    pub edge: EdgeClient<HttpTransport>,
    pub poll: PollConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let env = EnvFile::load(&cli.env)?;

    // Endpoint precedence: flag > environment file > built-in default.
    let endpoints = ControlEndpoints {
        control_url: resolve(&cli.control_url, &env, "controlUrl", "http://localhost:3000"),
        gateway_url: resolve(&cli.gateway_url, &env, "gatewayUrl", "http://localhost:3001"),
    };
    let edge_url = resolve(&cli.edge_url, &env, "edgeUrl", DEFAULT_EDGE_URL);

    let transport = HttpTransport::new(Duration::from_secs(cli.timeout));
    let credentials = CredentialCache::new(Box::new(PromptCredentialSource));

    let mut ctx = AppContext {
        env_path: cli.env.clone(),
        env,
        transport: transport.clone(),
        control: ControlClient::new(transport.clone(), credentials, endpoints),
        edge: EdgeClient::new(transport, edge_url),
        poll: PollConfig::default(),
    };

    match cli.command {
        Commands::Create => commands::create::run(&mut ctx).await,
        Commands::Apply => commands::apply::run(&mut ctx).await,
        Commands::Check => commands::check::run(&ctx).await,
        Commands::Node(cmd) => commands::node::run(&ctx, &cmd).await,
        Commands::Pool(cmd) => commands::pool::run(&ctx, &cmd).await,
        Commands::Profile => commands::profile::run(&ctx),
        Commands::Settings => commands::settings::run(&ctx).await,
        Commands::Version => commands::version::run(),
    }
}

/// Resolve one endpoint URL from flag, environment file, or default.
fn resolve(flag: &Option<String>, env: &EnvFile, key: &str, default: &str) -> String {
    flag.clone()
        .or_else(|| env.get("environment", key).map(str::to_string))
        .unwrap_or_else(|| default.to_string())
}
