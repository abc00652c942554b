pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{
    AppConfig, CorsConfig, DatabaseConfig, DbDriver, GeneralConfig, LoggingConfig, StorageBackend,
    StorageConfig,
};
pub use envconfig::EnvConfig;
