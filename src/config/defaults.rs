pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_DB_USER: &str = "todouser";
pub const DEFAULT_DB_PASSWORD: &str = "todopassword";
pub const DEFAULT_DB_NAME: &str = "todoapp";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_MIN_IDLE: u32 = 2;

pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
