use contracts::shared::currency::{display_currencies, BASE_CURRENCY, DEFAULT_FIAT_CURRENCIES};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

static APP_CONFIG: OnceCell<Config> = OnceCell::new();

/// Environment variable that overrides `fx_rates.api_key`
pub const FX_RATES_API_KEY_ENV: &str = "FX_RATES_API_KEY";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub fx_rates: FxRatesConfig,
    #[serde(default)]
    pub magic_eden: MagicEdenConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MarketConfig {
    /// Collection symbols tracked on the marketplace
    pub collections: Vec<String>,
    pub refresh_interval_minutes: u64,
    /// Multiplier applied to displayed prices (marketplace taker fee)
    pub taker_fee: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            collections: vec![
                "tomorrowland_winter".to_string(),
                "tomorrowland_love_unity".to_string(),
                "the_reflection_of_love".to_string(),
            ],
            refresh_interval_minutes: 10,
            taker_fee: 1.025,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FxRatesConfig {
    pub base_url: String,
    pub base_currency: String,
    pub currencies: Vec<String>,
    pub api_key: String,
}

impl Default for FxRatesConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.fxratesapi.com".to_string(),
            base_currency: BASE_CURRENCY.to_string(),
            currencies: DEFAULT_FIAT_CURRENCIES.iter().map(|c| c.to_string()).collect(),
            api_key: String::new(),
        }
    }
}

impl FxRatesConfig {
    /// Base currency followed by the fiat currencies, as shown in the UI
    pub fn display_currencies(&self) -> Vec<String> {
        display_currencies(&self.base_currency, &self.currencies)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MagicEdenConfig {
    pub base_url: String,
}

impl Default for MagicEdenConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-mainnet.magiceden.dev".to_string(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/floorwatch.db"

[server]
port = 8080

[market]
collections = ["tomorrowland_winter", "tomorrowland_love_unity", "the_reflection_of_love"]
refresh_interval_minutes = 10
taker_fee = 1.025

[fx_rates]
base_url = "https://api.fxratesapi.com"
base_currency = "SOL"
currencies = ["USD", "EUR", "GBP", "SEK"]

[magic_eden]
base_url = "https://api-mainnet.magiceden.dev"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// `FX_RATES_API_KEY` from the environment always wins over the file.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = read_config_file()?;
    if let Ok(key) = std::env::var(FX_RATES_API_KEY_ENV) {
        if !key.trim().is_empty() {
            config.fx_rates.api_key = key;
        }
    }
    if config.fx_rates.api_key.is_empty() {
        tracing::warn!(
            "{} is not set, exchange rate requests will be rejected",
            FX_RATES_API_KEY_ENV
        );
    }
    Ok(config)
}

fn read_config_file() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Store the loaded configuration for the rest of the process
pub fn initialize(config: Config) -> anyhow::Result<()> {
    APP_CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("configuration already initialized"))
}

pub fn get_config() -> &'static Config {
    APP_CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(db_path));
        }
    }

    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.database.path, "target/db/floorwatch.db");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.market.collections.len(), 3);
        assert_eq!(config.market.refresh_interval_minutes, 10);
        assert!((config.market.taker_fee - 1.025).abs() < f64::EPSILON);
        assert!(config.fx_rates.api_key.is_empty());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str(
            r#"
            [database]
            path = "/var/lib/floorwatch.db"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.fx_rates.base_currency, "SOL");
        assert_eq!(
            config.fx_rates.display_currencies(),
            vec!["SOL", "USD", "EUR", "GBP", "SEK"]
        );
        assert_eq!(
            get_database_path(&config).unwrap(),
            PathBuf::from("/var/lib/floorwatch.db")
        );
    }

    #[test]
    fn test_partial_sections_fill_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [database]
            path = "floorwatch.db"

            [market]
            collections = ["tomorrowland_winter"]

            [fx_rates]
            currencies = ["USD"]
            "#,
        )
        .unwrap();
        assert_eq!(config.market.collections, vec!["tomorrowland_winter"]);
        assert_eq!(config.market.refresh_interval_minutes, 10);
        assert!((config.market.taker_fee - 1.025).abs() < f64::EPSILON);
        assert_eq!(config.fx_rates.base_url, "https://api.fxratesapi.com");
        assert_eq!(config.fx_rates.display_currencies(), vec!["SOL", "USD"]);
    }
}
