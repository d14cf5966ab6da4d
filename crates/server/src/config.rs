use std::env;
use std::net::SocketAddr;

use anyhow::Context;
use settle_feed::{Coordinate, seed};

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub viewer_location: Coordinate,
}

impl Config {
    /// Reads `SETTLE_ADDR`, `SETTLE_VIEWER_LAT` and `SETTLE_VIEWER_LON`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let addr: SocketAddr = lookup("SETTLE_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse()
            .context("SETTLE_ADDR must be a socket address")?;

        let home = seed::demo_location();
        let latitude = match lookup("SETTLE_VIEWER_LAT") {
            Some(v) => v.parse::<f64>().context("SETTLE_VIEWER_LAT must be a number")?,
            None => home.latitude,
        };
        let longitude = match lookup("SETTLE_VIEWER_LON") {
            Some(v) => v.parse::<f64>().context("SETTLE_VIEWER_LON must be a number")?,
            None => home.longitude,
        };

        Ok(Self {
            addr,
            viewer_location: Coordinate::new(latitude, longitude),
        })
    }
}
