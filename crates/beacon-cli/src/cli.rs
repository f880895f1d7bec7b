use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Beacon: query and publish presence from the command line.
#[derive(Parser, Debug)]
#[command(name = "beacon", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Id of the current user, used to label status updates.
    #[arg(long, global = true)]
    pub user_id: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show one person's presence.
    Get { person_id: String },

    /// Show the presence of several people.
    List {
        #[arg(required = true)]
        person_ids: Vec<String>,
    },

    /// Subscribe to presence changes.
    Subscribe {
        #[arg(required = true)]
        person_ids: Vec<String>,
    },

    /// Drop a presence subscription.
    Unsubscribe { person_id: String },

    /// Publish your own status.
    SetStatus {
        status: String,

        /// Seconds until the status reverts.
        #[arg(long)]
        ttl: Option<u64>,
    },

    /// Keep subscriptions alive and print presence changes until Ctrl-C.
    Watch {
        #[arg(required = true)]
        person_ids: Vec<String>,
    },
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "beacon",
            "get",
            "person-1",
            "--log-level",
            "debug",
            "--config",
            "/tmp/beacon.toml",
        ])
        .unwrap();

        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/beacon.toml")));
        assert_eq!(
            args.command,
            Command::Get {
                person_id: "person-1".into()
            }
        );
    }

    #[test]
    fn set_status_with_ttl() {
        let args =
            Args::try_parse_from(["beacon", "--user-id", "me", "set-status", "dnd", "--ttl", "300"])
                .unwrap();

        assert_eq!(args.user_id.as_deref(), Some("me"));
        assert_eq!(
            args.command,
            Command::SetStatus {
                status: "dnd".into(),
                ttl: Some(300)
            }
        );
    }

    #[test]
    fn list_needs_at_least_one_id() {
        assert!(Args::try_parse_from(["beacon", "list"]).is_err());
        let args = Args::try_parse_from(["beacon", "list", "a", "b"]).unwrap();
        assert_eq!(
            args.command,
            Command::List {
                person_ids: vec!["a".into(), "b".into()]
            }
        );
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Args::try_parse_from(["beacon"]).is_err());
    }
}
