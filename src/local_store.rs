use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Serialize, de::DeserializeOwned};
use tokio::{fs, sync::Mutex};

use crate::error::StoreError;

pub const ORDERS_KEY: &str = "orders";
pub const CART_KEY: &str = "cart";
pub const USER_EMAIL_KEY: &str = "userEmail";

/// A durable key-value store of JSON-encoded strings kept in one file.
///
/// Clones share the same lock, so read-modify-write cycles from one process
/// never interleave.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

type Entries = BTreeMap<String, String>;

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    pub async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(key))
    }

    pub async fn set_item(&self, key: &str, value: String) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value);
        self.write_entries(&entries).await
    }

    pub async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }

    pub async fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get_item(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, raw).await
    }

    /// Applies `f` to the decoded value under `key` (default when absent)
    /// while holding the lock. The value is written back only when `f`
    /// reports a change.
    pub async fn update_json<T, F>(&self, key: &str, f: F) -> Result<bool, StoreError>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T) -> bool,
    {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        let mut value: T = match entries.get(key) {
            Some(raw) => serde_json::from_str(raw)?,
            None => T::default(),
        };
        if !f(&mut value) {
            return Ok(false);
        }
        entries.insert(key.to_string(), serde_json::to_string(&value)?);
        self.write_entries(&entries).await?;
        Ok(true)
    }

    async fn read_entries(&self) -> Result<Entries, StoreError> {
        match fs::read_to_string(self.path.as_path()).await {
            Ok(raw) if raw.trim().is_empty() => Ok(Entries::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_entries(&self, entries: &Entries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?).await?;
        fs::rename(&tmp, self.path.as_path()).await?;
        Ok(())
    }
}
