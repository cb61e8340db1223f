#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use clap::Parser;
use pathway_postgres::model::NewStaffAccount;
use pathway_postgres::query::StaffAccountRepository;
use pathway_postgres::types::StaffRole;
use pathway_server::handler::routes;
use pathway_server::service::{PasswordHasher, ServiceState};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Cli, Command, CreateStaffArgs};

/// Tracing target for application startup.
const TRACING_TARGET_STARTUP: &str = "pathway_cli::startup";

/// Tracing target for application shutdown.
const TRACING_TARGET_SHUTDOWN: &str = "pathway_cli::shutdown";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting pathway"
    );

    let service_config = cli.service.into_service_config()?;

    match cli.command {
        Some(Command::CreateStaff(args)) => {
            // Provisioning only needs the store, not the session keys.
            let pg_client = service_config
                .connect_postgres()
                .context("failed to create database client")?;
            pathway_postgres::run_pending_migrations(&pg_client)
                .await
                .context("failed to apply database migrations")?;

            create_staff(&pg_client, args).await
        }
        None => {
            let state = ServiceState::from_config(&service_config)
                .await
                .context("failed to create service state")?;
            pathway_postgres::run_pending_migrations(state.pg_client())
                .await
                .context("failed to apply database migrations")?;

            let router = routes(state.clone())
                .with_state(state)
                .layer(tower_http::trace::TraceLayer::new_for_http());
            server::serve(router, cli.server)
                .await
                .context("server terminated with an error")?;
            Ok(())
        }
    }
}

/// Provisions a staff account from the command line.
async fn create_staff(
    pg_client: &pathway_postgres::PgClient,
    args: CreateStaffArgs,
) -> anyhow::Result<()> {
    let role = if args.admin {
        StaffRole::Admin
    } else {
        StaffRole::Staff
    };

    let password_hash = PasswordHasher::new()
        .hash_secret(&args.password)
        .context("failed to hash the account password")?;

    let mut conn = pg_client
        .get_connection()
        .await
        .context("failed to acquire a database connection")?;

    let account = conn
        .create_account(NewStaffAccount {
            username: args.username,
            password_hash,
            full_name: args.full_name,
            role,
            department: args.department,
            can_add_patients: args.can_add_patients,
        })
        .await
        .context("failed to create the staff account")?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        account_id = %account.id,
        username = %account.username,
        role = %account.role,
        can_add_patients = account.can_add_patients,
        "staff account created"
    );
    println!("created staff account {} ({})", account.username, account.id);

    Ok(())
}

/// Initializes the tracing subscriber with an environment filter.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
