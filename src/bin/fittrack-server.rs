// ABOUTME: FitTrack server binary entry point
// ABOUTME: Parses CLI overrides, loads environment config, initializes logging and runs the HTTP server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! # FitTrack Server
//!
//! ```bash
//! # Run with environment configuration
//! cargo run --bin fittrack-server
//!
//! # Override port and database
//! cargo run --bin fittrack-server -- --port 8080 --database-url sqlite:./data/dev.db
//!
//! # Grant the admin capability to an existing account and exit
//! cargo run --bin fittrack-server -- --make-admin someone@example.com
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use fittrack_server::config::ServerConfig;
use fittrack_server::database::Database;
use fittrack_server::logging::init_logging;
use fittrack_server::resources::ServerResources;
use fittrack_server::server;

#[derive(Parser)]
#[command(
    name = "fittrack-server",
    version,
    about = "FitTrack REST API server",
    long_about = "Serves the FitTrack user, workout, nutrition and goal API"
)]
struct Args {
    /// HTTP port override
    #[arg(long)]
    port: Option<u16>,

    /// Bind host override
    #[arg(long)]
    host: Option<String>,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Grant the admin capability to this email, then exit
    #[arg(long, value_name = "EMAIL")]
    make_admin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env().context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    init_logging(&config.logging).context("Failed to initialize logging")?;

    if let Some(email) = args.make_admin {
        return make_admin(&config.database_url, &email).await;
    }

    info!(
        environment = %config.environment,
        port = config.http_port,
        "Starting FitTrack server"
    );

    let resources = ServerResources::initialize(config).await;
    server::run(resources.into()).await?;
    Ok(())
}

async fn make_admin(database_url: &str, email: &str) -> Result<()> {
    let database = Database::new(database_url)
        .await
        .with_context(|| format!("Failed to connect to {database_url}"))?;

    let Some(user) = database.get_user_by_email(email).await? else {
        bail!("No user registered with email {email}");
    };

    database.set_user_admin(user.id, true).await?;
    info!(user_id = %user.id, "Admin capability granted");
    database.close().await;
    Ok(())
}
