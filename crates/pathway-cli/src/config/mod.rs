//! CLI configuration: argument parsing for server and service options.

mod server;
mod service;

use clap::{Args, Parser, Subcommand};
pub use server::ServerConfig;
pub use service::ServiceArgs;

/// Command-line interface of the Pathway server.
#[derive(Debug, Parser)]
#[command(name = "pathway", version, about, long_about = None)]
pub struct Cli {
    /// HTTP server options.
    #[command(flatten)]
    pub server: ServerConfig,

    /// Service options (database, keys, token lifetimes).
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Optional management subcommand; the server runs when absent.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Management subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Provisions a staff account.
    ///
    /// Staff accounts have no signup endpoint; this is the only way to
    /// create them.
    CreateStaff(CreateStaffArgs),
}

/// Arguments for the `create-staff` subcommand.
#[derive(Debug, Args)]
pub struct CreateStaffArgs {
    /// Login username of the new account.
    #[arg(long)]
    pub username: String,

    /// Password of the new account.
    #[arg(long, env = "PATHWAY_STAFF_PASSWORD")]
    pub password: String,

    /// Human-readable name of the account holder.
    #[arg(long)]
    pub full_name: String,

    /// Department the account belongs to.
    #[arg(long)]
    pub department: Option<String>,

    /// Grant the administrator role.
    #[arg(long)]
    pub admin: bool,

    /// Allow this account to register patient visits.
    #[arg(long)]
    pub can_add_patients: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_create_staff_subcommand() {
        let cli = Cli::parse_from([
            "pathway",
            "create-staff",
            "--username",
            "head-nurse",
            "--password",
            "s3cret",
            "--full-name",
            "Head Nurse",
            "--admin",
        ]);

        match cli.command {
            Some(Command::CreateStaff(args)) => {
                assert_eq!(args.username, "head-nurse");
                assert!(args.admin);
                assert!(!args.can_add_patients);
            }
            other => panic!("expected create-staff subcommand, got {other:?}"),
        }
    }

    #[test]
    fn defaults_to_running_the_server() {
        let cli = Cli::parse_from(["pathway"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.server.port, 3000);
    }
}
