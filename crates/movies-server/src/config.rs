use std::path::PathBuf;

use crate::error::Result;
pub use clap::Parser;
use url::Url;

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about = "REST service for movie catalogue")]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 3000,
        env = "MOVIES_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "MOVIES_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "MOVIES_BASE_URL",
        default_value = "http://localhost:3000",
        help = "Base URL of server, as visible to clients"
    )]
    pub base_url: Url,

    #[arg(
        long,
        env = "MOVIES_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db, default is sqlite://[data-dir]/movies.db, where data-dir is set by --data-dir"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        env = "MOVIES_DATA_DIR",
        help = "Data directory (database etc.), default is system default like ~/.local/share/movies",
        default_value_t = default_data_dir()
    )]
    data_dir: String,

    #[arg(
        long,
        env = "MOVIES_IN_MEMORY",
        help = "Keep movies only in memory, nothing is persisted"
    )]
    pub in_memory: bool,

    #[arg(long, env = "MOVIES_CORS", help = "Enable permissive CORS")]
    pub cors: bool,
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("movies"))
        .unwrap_or_else(|| PathBuf::from("movies"))
        .to_string_lossy()
        .to_string()
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| format!("sqlite://{}/movies.db", self.data_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config =
            ServerConfig::try_parse_from(["movies-server", "--data-dir", "/tmp/movies-data"])
                .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.listen_address, "127.0.0.1");
        assert!(!config.in_memory);
        assert_eq!(config.database_url(), "sqlite:///tmp/movies-data/movies.db");
    }

    #[test]
    fn test_explicit_database() {
        let config = ServerConfig::try_parse_from([
            "movies-server",
            "--database-url",
            "sqlite://other.db",
            "--port",
            "8080",
            "--in-memory",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.in_memory);
        assert_eq!(config.database_url(), "sqlite://other.db");
    }
}
