use std::{net::SocketAddr, path::PathBuf};

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment};
use serde::Deserialize;

pub mod domain;
pub mod infrastructure;

#[derive(Clone, Debug, Deserialize)]
pub struct ClienteleConfig {
    pub database: Database,
    pub server: Server,
    pub logger: Logger,
}

impl ClienteleConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::layered(
            Environment::with_prefix("CLIENTELE").separator("_"),
            std::env::var("MONGO_URI").ok(),
        )
    }

    /// 設定ファイル、環境変数、`MONGO_URI` の順に重ねる
    fn layered(environment: Environment, mongo_uri: Option<String>) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(config::File::with_name("clientele.toml").required(false))
            .add_source(environment)
            .set_override_option("database.url", mongo_uri)?
            .build()?
            .try_deserialize::<ClienteleConfig>()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "clientele")?
            .set_default("database.collection", "customers")?
            .set_default("server.address", "0.0.0.0:8080")?
            .set_default("logger.level", "INFO")
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Database {
    pub url: String,
    pub name: String,
    pub collection: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Server {
    pub address: SocketAddr,
    pub tls: Option<Tls>,
}

/// PEMファイルのパス
#[derive(Clone, Debug, Deserialize)]
pub struct Tls {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Logger {
    pub level: Level,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub enum Level {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl From<&Level> for tracing::Level {
    fn from(value: &Level) -> Self {
        match value {
            Level::TRACE => tracing::Level::TRACE,
            Level::DEBUG => tracing::Level::DEBUG,
            Level::INFO => tracing::Level::INFO,
            Level::WARN => tracing::Level::WARN,
            Level::ERROR => tracing::Level::ERROR,
        }
    }
}
