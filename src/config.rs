use std::path::{ Path, PathBuf };
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

// Buff163 marketplace constants
pub const DEFAULT_BUFF_BASE_URL: &str = "https://buff.163.com";
pub const MARKET_GOODS_PATH: &str = "/api/market/goods";
pub const DEFAULT_GAME: &str = "csgo";
pub const DEFAULT_LOCALE: &str = "zh-CN";
pub const DEFAULT_USER_AGENT: &str = "BuffPriceBot/0.3 (+chat plugin)";
pub const SESSION_COOKIE_NAME: &str = "session";
pub const SESSION_COOKIE_ENV: &str = "BUFF_SESSION_COOKIE";

// Reply shaping
pub const MAX_RESULTS: usize = 5;

// Chat commands
pub const PRICE_COMMAND: &str = "查价格";
pub const PRICE_COMMAND_ALIAS: &str = "price";
pub const HELP_COMMAND: &str = "help";
pub const HELP_COMMAND_ALIAS: &str = "帮助";

// Chat gateway defaults
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 6700;
pub const DEFAULT_MAX_CONNECTIONS: usize = 100;
pub const DEFAULT_IDLE_TIMEOUT_SECONDS: u64 = 300;

// Gateway banner sent when a client connects
pub const SERVER_BANNER: &str = "% Buff163 Price Bot - type /help for commands";

#[derive(Parser, Debug)]
#[command(author, version, about = "Buff163 price lookup chat bot")]
pub struct Cli {
    /// Settings file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listen address for the chat gateway
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Listen port for the chat gateway
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Maximum concurrent chat connections
    #[arg(long)]
    pub max_connections: Option<usize>,

    /// Idle connection timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Emit journald structured log records instead of terminal lines
    #[arg(long)]
    pub journald: bool,

    /// Look up one item, print the replies and exit
    #[arg(short, long, value_name = "ITEM NAME")]
    pub query: Option<String>,
}

/// Settings file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: String,
        #[source] source: std::io::Error,
    },
    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: String,
        #[source] source: toml::de::Error,
    },
}

/// Marketplace options (`[buff]` table)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuffSettings {
    pub session_cookie: Option<String>,
    pub base_url: String,
    pub game: String,
    pub locale: String,
    pub user_agent: String,
    /// Unset means requests may wait indefinitely
    pub request_timeout_secs: Option<u64>,
}

impl Default for BuffSettings {
    fn default() -> Self {
        Self {
            session_cookie: None,
            base_url: DEFAULT_BUFF_BASE_URL.to_string(),
            game: DEFAULT_GAME.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl BuffSettings {
    /// The configured cookie, treating blank values as absent
    pub fn session_cookie(&self) -> Option<&str> {
        self.session_cookie
            .as_deref()
            .map(str::trim)
            .filter(|cookie| !cookie.is_empty())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Chat gateway options (`[server]` table)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_connections: usize,
    /// Idle timeout in seconds
    pub timeout: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            timeout: DEFAULT_IDLE_TIMEOUT_SECONDS,
        }
    }
}

impl ServerSettings {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Process-wide settings, read once at startup
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub buff: BuffSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Load settings from a TOML file, `.env` and the process environment
    ///
    /// With no explicit path, `config.toml` is used if it exists and defaults
    /// otherwise. An explicit path that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        // A missing .env file is fine
        let _ = dotenv::dotenv();
        settings.apply_env(|key| std::env::var(key).ok());

        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) where F: Fn(&str) -> Option<String> {
        if let Some(cookie) = lookup(SESSION_COOKIE_ENV) {
            if !cookie.trim().is_empty() {
                self.buff.session_cookie = Some(cookie);
            }
        }
    }

    /// Command line flags win over the settings file
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(max_connections) = cli.max_connections {
            self.server.max_connections = max_connections;
        }
        if let Some(timeout) = cli.timeout {
            self.server.timeout = timeout;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.buff.base_url, DEFAULT_BUFF_BASE_URL);
        assert_eq!(settings.buff.game, "csgo");
        assert_eq!(settings.buff.locale, "zh-CN");
        assert!(settings.buff.session_cookie().is_none());
        assert!(settings.buff.request_timeout().is_none());
        assert_eq!(settings.server.listen_addr(), "127.0.0.1:6700");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml_str(
            r#"
[buff]
session_cookie = "abc123"
request_timeout_secs = 20

[server]
port = 7000
"#
        ).unwrap();

        assert_eq!(settings.buff.session_cookie(), Some("abc123"));
        assert_eq!(settings.buff.request_timeout(), Some(Duration::from_secs(20)));
        assert_eq!(settings.buff.game, DEFAULT_GAME);
        assert_eq!(settings.server.port, 7000);
        assert_eq!(settings.server.host, DEFAULT_HOST);
    }

    #[test]
    fn test_blank_cookie_is_absent() {
        let settings = Settings::from_toml_str("[buff]\nsession_cookie = \"   \"\n").unwrap();
        assert!(settings.buff.session_cookie().is_none());
    }

    #[test]
    fn test_env_overrides_cookie() {
        let mut settings = Settings::from_toml_str("[buff]\nsession_cookie = \"file\"\n").unwrap();
        settings.apply_env(|key| {
            (key == SESSION_COOKIE_ENV).then(|| "from-env".to_string())
        });
        assert_eq!(settings.buff.session_cookie(), Some("from-env"));

        // Empty environment values do not clear the file value
        settings.apply_env(|_| Some(String::new()));
        assert_eq!(settings.buff.session_cookie(), Some("from-env"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[buff]\nlocale = \"en\"").unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.buff.locale, "en");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(Settings::load(Some(&missing)), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[buff\nlocale = ").unwrap();
        assert!(matches!(Settings::from_file(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_cli_overrides_server() {
        let cli = Cli::parse_from(["buff-price-bot", "--port", "9000", "-H", "0.0.0.0"]);
        let mut settings = Settings::default();
        settings.apply_cli(&cli);
        assert_eq!(settings.server.listen_addr(), "0.0.0.0:9000");
        assert_eq!(settings.server.max_connections, DEFAULT_MAX_CONNECTIONS);
    }
}
