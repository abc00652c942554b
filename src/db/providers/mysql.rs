use super::registry::{DbProvider, DbProviderId};

pub struct MysqlDbProvider;

impl DbProvider for MysqlDbProvider {
    fn id(&self) -> DbProviderId {
        DbProviderId::Mysql
    }

    fn supports_url(&self, url: &str) -> bool {
        url.trim().to_ascii_lowercase().starts_with("mysql://")
    }
}
