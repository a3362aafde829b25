use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::feed::{DEFAULT_AUTOSCROLL_THRESHOLD, DEFAULT_FEED_CAPACITY};
use crate::utils::{default_local_networks, IpRange};

// Runtime settings, optionally loaded from a JSON file. Anything not set
// falls back to the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    // IPv4 CIDR strings, e.g. "10.0.0.0/8". Used to classify traffic
    // direction; empty means the RFC1918 + loopback + link-local defaults.
    pub local_networks: Vec<String>,
    pub feed_capacity: usize,
    pub autoscroll_threshold: usize,
    pub log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            local_networks: Vec::new(),
            feed_capacity: DEFAULT_FEED_CAPACITY,
            autoscroll_threshold: DEFAULT_AUTOSCROLL_THRESHOLD,
            log_file: "netfeed.log".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn local_ranges(&self) -> Vec<IpRange> {
        if self.local_networks.is_empty() {
            return default_local_networks();
        }
        let mut ranges = Vec::new();
        for entry in &self.local_networks {
            match parse_cidr(entry) {
                Some(range) => ranges.push(range),
                None => log::warn!("ignoring invalid local network {:?}", entry),
            }
        }
        if ranges.is_empty() {
            default_local_networks()
        } else {
            ranges
        }
    }
}

fn parse_cidr(entry: &str) -> Option<IpRange> {
    let (addr, prefix) = entry.split_once('/')?;
    let addr: Ipv4Addr = addr.trim().parse().ok()?;
    let prefix: u8 = prefix.trim().parse().ok()?;
    if prefix > 32 {
        return None;
    }
    Some(IpRange::new(addr.octets(), prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let config: Config = serde_json::from_str(r#"{"feed_capacity": 500}"#).unwrap();
        assert_eq!(config.feed_capacity, 500);
        assert_eq!(config.autoscroll_threshold, DEFAULT_AUTOSCROLL_THRESHOLD);
        assert_eq!(config.log_file, "netfeed.log");
    }

    #[test]
    fn cidr_entries_become_ranges() {
        let config = Config {
            local_networks: vec!["10.1.0.0/16".to_string(), "bogus".to_string()],
            ..Config::default()
        };
        let ranges = config.local_ranges();
        assert_eq!(ranges.len(), 1);
        assert!(ranges[0].contains(&"10.1.2.3".parse().unwrap()));
        assert!(!ranges[0].contains(&"10.2.0.1".parse().unwrap()));
    }
}
