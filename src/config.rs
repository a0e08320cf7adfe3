//! Command line and environment configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::model::DEFAULT_SEARCH_DELAY;

#[derive(Parser, Debug, Clone)]
#[command(name = "potsfyi-client", version, about = "Terminal client for a potsfyi music server")]
pub struct Config {
    /// Base URL of the potsfyi server
    #[arg(long, env = "POTSFYI_SERVER", default_value = "http://127.0.0.1:5000")]
    pub server: String,

    /// Directory holding the local store (the saved playlist)
    #[arg(long, env = "POTSFYI_DATA_DIR", default_value = ".cache")]
    pub data_dir: PathBuf,

    #[arg(long, env = "POTSFYI_LOG_DIR", default_value = ".logs")]
    pub log_dir: PathBuf,

    /// Quiet time after the last keystroke before a search is sent
    #[arg(long, env = "POTSFYI_SEARCH_DELAY_MS", default_value_t = DEFAULT_SEARCH_DELAY.as_millis() as u64)]
    pub search_delay_ms: u64,

    #[arg(long, env = "POTSFYI_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Keep the playlist in memory only
    #[arg(long)]
    pub ephemeral: bool,
}

impl Config {
    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["potsfyi-client"]).unwrap();
        assert_eq!(config.search_delay(), Duration::from_millis(200));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(!config.ephemeral);
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::try_parse_from([
            "potsfyi-client",
            "--server",
            "http://music.local:8080",
            "--search-delay-ms",
            "350",
            "--ephemeral",
        ])
        .unwrap();
        assert_eq!(config.server, "http://music.local:8080");
        assert_eq!(config.search_delay(), Duration::from_millis(350));
        assert!(config.ephemeral);
    }
}
