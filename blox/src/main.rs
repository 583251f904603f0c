//! # blox CLI
//!
//! Command-line lookups over the Roblox web API.
//!
//! Reads `ROBLOSECURITY` (and optionally `ROBLOX_DOMAIN`) from the environment
//! or a `.env` file. Without a cookie only public lookups work.
//!
//! ```bash
//! cargo run -p blox -- user 1
//! cargo run -p blox -- lookup Roblox builderman
//! ```

mod commands;

use blox_core::{Client, ClientConfig};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "blox")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Session cookie (overrides ROBLOSECURITY)
    #[arg(long, env = "ROBLOSECURITY", hide_env_values = true)]
    cookie: Option<String>,

    /// Base domain
    #[arg(long, env = "ROBLOX_DOMAIN", default_value = "roblox.com")]
    domain: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a user's profile
    User {
        /// User id
        id: i64,
    },

    /// Resolve usernames to users
    Lookup {
        /// Usernames to resolve
        #[arg(required = true)]
        names: Vec<String>,

        /// Include banned users
        #[arg(long)]
        include_banned: bool,
    },

    /// List a user's group memberships
    Groups {
        /// User id
        user_id: i64,
    },

    /// Show a group and its roles
    Group {
        /// Group id
        id: i64,
    },

    /// Show the authenticated user
    Me,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::WARN.into()
            }),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = ClientConfig::new()
        .with_domain(cli.domain)
        .with_timeout(std::time::Duration::from_secs(cli.timeout));
    if let Some(cookie) = cli.cookie.filter(|c| !c.is_empty()) {
        config = config.with_cookie(cookie);
    }
    let client = Client::connect(config).await?;

    match cli.command {
        Commands::User { id } => commands::show_user(&client, id).await,
        Commands::Lookup {
            names,
            include_banned,
        } => commands::lookup(&client, &names, !include_banned).await,
        Commands::Groups { user_id } => commands::list_groups(&client, user_id).await,
        Commands::Group { id } => commands::show_group(&client, id).await,
        Commands::Me => commands::show_me(&client).await,
    }
}
