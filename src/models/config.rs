use serde::Deserialize;

/// Configuration options of the storefront service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Interface the HTTP server binds to.
    pub address: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Directory uploaded files are written to and served from.
    pub media_root: String,
    /// Largest accepted upload, in bytes.
    pub max_upload_size: usize,
}

#[cfg(feature = "server")]
impl ServerConfig {
    /// Loads `config/default.yaml`, then `config/<APP_ENV>.yaml`, then
    /// `APP__*` environment variables, later sources overriding earlier ones.
    pub fn load() -> Result<Self, config::ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());

        config::Config::builder()
            .set_default("address", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("database_url", "app.db")?
            .set_default("media_root", "media")?
            .set_default("max_upload_size", 5 * 1024 * 1024)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }
}
