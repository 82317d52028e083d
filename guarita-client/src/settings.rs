//! Persisted operator settings
//!
//! Simple string key/value store backed by a JSON file, the device
//! storage analog. Keys keep the spellings the mobile app persisted, so
//! a settings file survives the migration.

use crate::config::Environment;
use shared::models::PrinterSettings;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Well-known settings keys
pub mod keys {
    pub const PRINTER_IP: &str = "printer_ip";
    pub const PRINTER_MODEL: &str = "printer_model";
    pub const LABEL_SIZE: &str = "label_size";
    pub const BILHETERIA_TOKEN: &str = "bilheteria_token";
    pub const PORTARIA_TOKEN: &str = "portaria_token";
    pub const API_ENV: &str = "api_env";
}

/// File-backed settings store
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a settings store at `base_path/filename`
    pub fn new(base_path: impl Into<PathBuf>, filename: &str) -> Self {
        let path = base_path.into().join(filename);
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_map(&self) -> BTreeMap<String, String> {
        if !self.path.exists() {
            return BTreeMap::new();
        }
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    fn save_map(&self, map: &BTreeMap<String, String>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, json)
    }

    /// Read a single value
    pub fn get(&self, key: &str) -> Option<String> {
        self.load_map().get(key).cloned()
    }

    /// Write a single value
    pub fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        let mut map = self.load_map();
        map.insert(key.to_string(), value.to_string());
        self.save_map(&map)
    }

    /// Remove a value
    pub fn delete(&self, key: &str) -> std::io::Result<()> {
        let mut map = self.load_map();
        if map.remove(key).is_some() {
            self.save_map(&map)?;
        }
        Ok(())
    }

    // ========== Typed accessors ==========

    /// Printer configuration, with model and label defaults for missing
    /// or unparseable values.
    pub fn printer_settings(&self) -> PrinterSettings {
        let map = self.load_map();
        let model = map
            .get(keys::PRINTER_MODEL)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        let label_size = map
            .get(keys::LABEL_SIZE)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        PrinterSettings {
            ip_address: map.get(keys::PRINTER_IP).cloned().unwrap_or_default(),
            model,
            label_size,
        }
    }

    /// Persist printer configuration
    pub fn set_printer_settings(&self, settings: &PrinterSettings) -> std::io::Result<()> {
        let mut map = self.load_map();
        map.insert(keys::PRINTER_IP.into(), settings.ip_address.clone());
        map.insert(keys::PRINTER_MODEL.into(), settings.model.as_str().into());
        map.insert(keys::LABEL_SIZE.into(), settings.label_size.as_str().into());
        self.save_map(&map)
    }

    pub fn bilheteria_token(&self) -> Option<String> {
        self.get(keys::BILHETERIA_TOKEN)
    }

    pub fn portaria_token(&self) -> Option<String> {
        self.get(keys::PORTARIA_TOKEN)
    }

    pub fn environment(&self) -> Environment {
        Environment::from_stored(self.get(keys::API_ENV).as_deref())
    }

    pub fn set_environment(&self, env: Environment) -> std::io::Result<()> {
        self.set(keys::API_ENV, env.as_str())
    }
}
