//! Command line surface. A thin [`clap`] derive struct; all defaulting and env fallback
//! lives here so `main` only has to turn a [`Cli`] into a [`crate::config::Config`].

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "gcp-project-reaper", about = "Destroy every user-created resource in a GCP project")]
pub struct Cli {
    /// GCP project id to operate against.
    #[arg(short = 'p', long)]
    pub project: String,

    /// Report what would be destroyed without deleting anything.
    #[arg(short = 'd', long = "dryrun")]
    pub dry_run: bool,

    /// Seconds to wait for a single resource's deletion operation before giving up.
    #[arg(short = 't', long, default_value_t = 400)]
    pub timeout: u64,

    /// Seconds between operation status polls.
    #[arg(long = "polltime", default_value_t = 10)]
    pub poll_time: u64,

    /// Path to a JSON document of per-kind identifiers to never delete.
    #[arg(long = "ec", alias = "exclusions-config", env = "EXCLUSIONS_CONFIG")]
    pub exclusions_config: Option<PathBuf>,

    /// Bearer token used to authenticate against the GCP REST APIs.
    #[arg(long = "gcp-access-token", env = "GCP_ACCESS_TOKEN")]
    pub gcp_access_token: String,

    /// Restrict zone-scoped kinds to these zones. Repeatable. Discovered from the project
    /// when omitted.
    #[arg(long = "zone")]
    pub zones: Vec<String>,

    /// Restrict region-scoped kinds to these regions. Repeatable. Discovered from the
    /// project when omitted.
    #[arg(long = "region")]
    pub regions: Vec<String>,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cli = Cli::parse_from([
            "gcp-project-reaper",
            "--project",
            "demo",
            "--gcp-access-token",
            "token",
        ]);
        assert_eq!(cli.timeout, 400);
        assert_eq!(cli.poll_time, 10);
        assert!(!cli.dry_run);
        assert!(cli.zones.is_empty());
        assert!(cli.regions.is_empty());
    }

    #[test]
    fn repeatable_zone_and_region_flags_accumulate() {
        let cli = Cli::parse_from([
            "gcp-project-reaper",
            "--project",
            "demo",
            "--gcp-access-token",
            "token",
            "--zone",
            "us-central1-a",
            "--zone",
            "us-central1-b",
            "--region",
            "us-central1",
        ]);
        assert_eq!(cli.zones, vec!["us-central1-a", "us-central1-b"]);
        assert_eq!(cli.regions, vec!["us-central1"]);
    }
}
