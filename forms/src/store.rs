//! Persistence seam for saved form configs.
//!
//! The engine never reads or writes storage itself. Hosts that keep forms
//! around implement [`FormStore`]; two reference adapters ship here, an
//! in-memory map and a directory of pretty-printed JSON files.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::schema::FormConfig;

/// Saves and loads form configs by id.
pub trait FormStore {
    /// Insert or overwrite `config` under its id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backing storage fails.
    fn save(&mut self, config: &FormConfig) -> Result<(), StoreError>;

    /// Fetch a config by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    fn load(&self, id: &str) -> Result<FormConfig, StoreError>;

    /// All stored configs, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backing storage fails.
    fn list(&self) -> Result<Vec<FormConfig>, StoreError>;
}

/// Volatile store backed by a map.
#[derive(Debug, Clone, Default)]
pub struct MemoryFormStore {
    forms: HashMap<String, FormConfig>,
}

impl MemoryFormStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl FormStore for MemoryFormStore {
    fn save(&mut self, config: &FormConfig) -> Result<(), StoreError> {
        self.forms.insert(config.id.clone(), config.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> Result<FormConfig, StoreError> {
        self.forms.get(id).cloned().ok_or_else(|| StoreError::NotFound(id.to_owned()))
    }

    fn list(&self) -> Result<Vec<FormConfig>, StoreError> {
        let mut forms: Vec<FormConfig> = self.forms.values().cloned().collect();
        forms.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(forms)
    }
}

/// One `<id>.json` file per form inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "form store opened");
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl FormStore for JsonFileStore {
    fn save(&mut self, config: &FormConfig) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(config)?;
        fs::write(self.path_for(&config.id), json)?;
        tracing::debug!(form_id = %config.id, "form saved");
        Ok(())
    }

    fn load(&self, id: &str) -> Result<FormConfig, StoreError> {
        let text = match fs::read_to_string(self.path_for(id)) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StoreError::NotFound(id.to_owned())),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    fn list(&self) -> Result<Vec<FormConfig>, StoreError> {
        let mut forms = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|e| e != "json") {
                continue;
            }
            let text = fs::read_to_string(&path)?;
            forms.push(serde_json::from_str::<FormConfig>(&text)?);
        }
        forms.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(forms)
    }
}
