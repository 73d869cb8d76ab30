use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use genie_client::ApiClient;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod ai_cmd;
mod auth;
mod config;
mod state;
mod tasks_cmd;

use ai_cmd::AiCommand;
use auth::FileSessionStore;
use tasks_cmd::TasksCommand;

#[derive(Parser, Debug)]
#[command(
    name = "genie",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GENIE_BUILD_SHA"), ")"),
    about = "TaskGenie command-line client"
)]
struct Cli {
    /// Override api.base_url from config.toml
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Prompted on stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,

        /// Prompted on stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Task statistics
    Dashboard,

    /// Create, list, edit and delete tasks
    Tasks {
        #[command(subcommand)]
        command: TasksCommand,
    },

    /// AI-assisted descriptions and natural-language task entry
    Ai {
        #[command(subcommand)]
        command: AiCommand,
    },

    /// Manage ~/.taskgenie/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("GENIE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut cfg = config::load_config()?;
    if let Some(server) = cli.server {
        cfg.api.base_url = server;
    }
    debug!(base_url = %cfg.api.base_url, "config loaded");
    let store = Arc::new(FileSessionStore::default_location()?);
    let client = ApiClient::new(cfg.client_config(), store).context("build HTTP client")?;

    match cli.command {
        Command::Register {
            name,
            email,
            password,
        } => auth::register(&client, &name, &email, password).await?,
        Command::Login { email, password } => auth::login(&client, &email, password).await?,
        Command::Logout => auth::logout(&client)?,
        Command::Whoami => auth::whoami(&client)?,
        Command::Dashboard => tasks_cmd::dashboard(&client, &cfg).await?,
        Command::Tasks { command } => tasks_cmd::run(&client, &cfg, command).await?,
        Command::Ai { command } => ai_cmd::run(&client, &cfg, command).await?,
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}
