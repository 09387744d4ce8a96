use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::constants::font::DEFAULT_FAMILY;
use crate::constants::sampling::{DEFAULT_INTERVAL_MS, MIN_INTERVAL_MS};

#[derive(Parser, Debug, Clone)]
#[command(name = "net-floater")]
#[command(about = "Floating desktop widget showing live network throughput")]
pub struct Cli {
    /// Preferences file (defaults to <config_dir>/net-floater/config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Traffic sampling interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_INTERVAL_MS)]
    pub sample_interval_ms: u64,

    /// Font the speed labels are drawn with
    #[arg(long, default_value = DEFAULT_FAMILY)]
    pub font: String,

    /// Count loopback traffic as well
    #[arg(long)]
    pub include_loopback: bool,

    /// Ignore the saved window position and start at the right edge
    #[arg(long)]
    pub reset_position: bool,
}

impl Cli {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        debug!("Validating command line");
        if self.sample_interval_ms < MIN_INTERVAL_MS {
            bail!(
                "--sample-interval-ms must be at least {MIN_INTERVAL_MS} (got {})",
                self.sample_interval_ms
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["net-floater"]).unwrap();
        assert_eq!(cli.sample_interval(), Duration::from_secs(1));
        assert_eq!(cli.font, DEFAULT_FAMILY);
        assert!(cli.config.is_none());
        assert!(!cli.include_loopback);
        assert!(!cli.reset_position);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_interval_too_short() {
        let cli = Cli::try_parse_from(["net-floater", "--sample-interval-ms", "50"]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "net-floater",
            "--config",
            "/tmp/floater.json",
            "--font",
            "Noto Sans",
            "--include-loopback",
            "--reset-position",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/floater.json")));
        assert_eq!(cli.font, "Noto Sans");
        assert!(cli.include_loopback);
        assert!(cli.reset_position);
    }
}
