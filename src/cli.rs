use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "factory-seed")]
#[command(author = "FactoryOS Team")]
#[command(version)]
#[command(about = "Seed a FactoryOS instance with demo data", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Defaults to `seed`
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Populate the API with users, machines, plans, production and downtime
    Seed(SeedArgs),

    /// Print the dashboard, report and feature-flag summary only
    Verify,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Connection
// ============================================================================

#[derive(Args, Debug, Default, Clone)]
pub struct ConnectionArgs {
    /// Config file [default: ~/.config/factoryos/seed.toml]
    #[arg(short, long, global = true, env = "FACTORYOS_CONFIG")]
    pub config: Option<String>,

    /// API gateway base URL [default: http://localhost:4000]
    #[arg(long, global = true, env = "FACTORYOS_URL")]
    pub url: Option<String>,

    /// Web UI URL shown after seeding [default: http://localhost:8081]
    #[arg(long, global = true, env = "FACTORYOS_UI_URL")]
    pub ui_url: Option<String>,

    /// Admin username [default: admin]
    #[arg(short, long, global = true, env = "FACTORYOS_USER")]
    pub user: Option<String>,

    /// Admin password [default: admin123]
    #[arg(long, global = true, env = "FACTORYOS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Per-request timeout in seconds (transport default when unset)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

// ============================================================================
// Seed
// ============================================================================

#[derive(Args, Debug, Default, Clone)]
pub struct SeedArgs {
    /// Show what would be sent without contacting the API
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["factory-seed"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_global_connection_flags() {
        let cli = Cli::try_parse_from([
            "factory-seed",
            "seed",
            "--dry-run",
            "--url",
            "http://factory.local:4000",
            "-u",
            "ops",
        ])
        .unwrap();
        assert_eq!(cli.connection.url.as_deref(), Some("http://factory.local:4000"));
        assert_eq!(cli.connection.user.as_deref(), Some("ops"));
        match cli.command {
            Some(Command::Seed(args)) => assert!(args.dry_run),
            _ => panic!("Expected seed command"),
        }
    }
}
