use clap::{Args, Parser, Subcommand};
use rankdash_core::PlanType;
use std::path::PathBuf;

/// Top-level CLI parser for the `rankdash` binary.
#[derive(Debug, Parser)]
#[command(name = "rankdash", version, about = "RankDash - SEO ranking dashboard")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags overriding `RANKDASH_*` environment configuration.
#[derive(Clone, Debug, Default, Args)]
pub struct GlobalArgs {
    /// SQLite database file (created and migrated on open)
    #[arg(long, global = true, conflicts_with = "demo")]
    pub db: Option<PathBuf>,

    /// Serve canned demo data instead of a database
    #[arg(long, global = true)]
    pub demo: bool,

    /// Session user id
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Invoke a procedure such as `project.getAll` and print the envelope.
    Call {
        procedure: String,
        /// JSON input payload
        #[arg(long)]
        input: Option<String>,
    },
    /// Render stats cards and the project list.
    Dashboard,
    /// Create a project; bare domains get an `https://` prefix.
    CreateProject {
        #[arg(long)]
        name: String,
        #[arg(long)]
        domain: String,
        /// JSON object with project settings
        #[arg(long)]
        settings: Option<String>,
    },
    /// Create a user row and print its id.
    UserAdd {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// STARTER, PROFESSIONAL or ENTERPRISE
        #[arg(long, value_parser = parse_plan)]
        plan: Option<PlanType>,
    },
    /// Ingest tracking data.
    Track {
        #[command(subcommand)]
        action: TrackCommands,
    },
}

#[derive(Clone, Debug, Subcommand)]
pub enum TrackCommands {
    /// Add a keyword to a project.
    Keyword {
        #[arg(long)]
        project: String,
        #[arg(long)]
        term: String,
    },
    /// Record a ranking observation for a keyword.
    Ranking {
        #[arg(long)]
        keyword: String,
        #[arg(long)]
        position: i64,
        /// Epoch milliseconds; defaults to now
        #[arg(long)]
        date: Option<i64>,
    },
    /// Record a backlink pointing at a project.
    Backlink {
        #[arg(long)]
        project: String,
        #[arg(long)]
        source: String,
        #[arg(long)]
        target: String,
        /// Epoch milliseconds; defaults to now
        #[arg(long)]
        discovered: Option<i64>,
    },
    /// Record a site audit.
    Audit {
        #[arg(long)]
        project: String,
        /// 0..=100; omit for a pending audit
        #[arg(long)]
        score: Option<u32>,
    },
}

fn parse_plan(value: &str) -> Result<PlanType, String> {
    PlanType::parse(&value.to_ascii_uppercase())
        .ok_or_else(|| format!("unknown plan `{value}`, expected STARTER|PROFESSIONAL|ENTERPRISE"))
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use rankdash_core::PlanType;

    use super::{Cli, Commands, TrackCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["rankdash", "dashboard", "--demo", "--log-level", "warn"])
            .unwrap();
        assert!(cli.global.demo);
        assert_eq!(cli.global.log_level.as_deref(), Some("warn"));
        assert!(matches!(cli.command, Commands::Dashboard));
    }

    #[test]
    fn db_and_demo_conflict() {
        assert!(Cli::try_parse_from(["rankdash", "--db", "a.db", "--demo", "dashboard"]).is_err());
    }

    #[test]
    fn plan_flag_is_case_insensitive() {
        let cli = Cli::try_parse_from(["rankdash", "user-add", "--plan", "enterprise"]).unwrap();
        match cli.command {
            Commands::UserAdd { plan, .. } => assert_eq!(plan, Some(PlanType::Enterprise)),
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["rankdash", "user-add", "--plan", "gold"]).is_err());
    }

    #[test]
    fn track_ranking_parses_position_and_date() {
        let cli = Cli::try_parse_from([
            "rankdash",
            "track",
            "ranking",
            "--keyword",
            "k",
            "--position",
            "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Track {
                action: TrackCommands::Ranking { position, date, .. },
            } => {
                assert_eq!(position, 3);
                assert_eq!(date, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
