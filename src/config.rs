use std::time::Duration;

use anyhow::bail;
use clap::{ArgAction, Parser};

use crate::index::MIN_CELL_DEGREES;
use crate::places::google_places_api::NEARBY_SEARCH_URL;

#[derive(Parser, Clone, Debug)]
#[command(name = "chai-locator-backend", about = "Finds chai spots near a point")]
pub struct Config {
    #[clap(env, long, default_value = "development")]
    pub environment: String,

    #[clap(env, long, default_value = "0.0.0.0")]
    pub host: String,

    #[clap(env, long, default_value_t = 5000)]
    pub port: u16,

    /// Comma-separated CORS origins, `*` for any.
    #[clap(env, long, default_value = "*")]
    pub origin_urls: String,

    /// PostgreSQL url. Spots are kept in memory when unset.
    #[clap(env, long)]
    pub database_url: Option<String>,

    #[clap(env, long, default_value_t = num_cpus::get() as u32)]
    pub database_pool_size: u32,

    #[clap(env, long, hide_env_values = true)]
    pub google_maps_api_key: String,

    #[clap(env, long, default_value = NEARBY_SEARCH_URL)]
    pub places_base_url: String,

    #[clap(env, long, default_value_t = 10)]
    pub places_timeout_secs: u64,

    /// Grid cell size of the in-memory spatial index, in degrees.
    #[clap(env, long, default_value_t = 0.01)]
    pub index_cell_degrees: f64,

    /// Lead nearby listings with spots from the registry.
    #[clap(env, long, default_value_t = true, action = ArgAction::Set)]
    pub nearby_include_stored: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.index_cell_degrees.is_finite() && self.index_cell_degrees >= MIN_CELL_DEGREES) {
            bail!(
                "INDEX_CELL_DEGREES must be at least {}, got {}",
                MIN_CELL_DEGREES,
                self.index_cell_degrees
            );
        }
        if self.places_timeout_secs == 0 {
            bail!("PLACES_TIMEOUT_SECS must be at least 1");
        }
        if self.database_pool_size == 0 {
            bail!("DATABASE_POOL_SIZE must be at least 1");
        }
        if self.google_maps_api_key.trim().is_empty() {
            bail!("GOOGLE_MAPS_API_KEY must not be empty");
        }
        Ok(())
    }

    pub fn places_timeout(&self) -> Duration {
        Duration::from_secs(self.places_timeout_secs)
    }
}
