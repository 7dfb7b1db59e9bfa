use std::{env, path::PathBuf};

use crate::{gateway::HttpStorefrontApi, local_store::LocalStore};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres URL. Without one the server keeps data in memory.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string());
        Ok(Self {
            port,
            database_url,
            host,
            static_dir: PathBuf::from(static_dir),
        })
    }
}

/// Settings for the client-side order gateway.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub local_store_path: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let api_base_url = env::var("STOREFRONT_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:3000/api".to_string());
        let local_store_path = env::var("STOREFRONT_LOCAL_STORE")
            .unwrap_or_else(|_| ".storefront/local_storage.json".to_string());
        Self {
            api_base_url,
            local_store_path: PathBuf::from(local_store_path),
        }
    }

    pub fn api(&self) -> HttpStorefrontApi {
        HttpStorefrontApi::new(self.api_base_url.clone())
    }

    pub fn local_store(&self) -> LocalStore {
        LocalStore::new(self.local_store_path.clone())
    }
}
