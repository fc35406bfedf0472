use crate::{
    errors::{ConfigError, ConfigResult},
    utils::{configuration_error, validate_file_path, write_json_atomic},
    ScriptIdentity,
};
use log::debug;
use serde::de::DeserializeOwned;
use serde_derive::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Named set of values, saved by user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset<P> {
    pub name: String,
    #[serde(flatten)]
    pub payload: P,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PresetFile<P> {
    script_name: String,
    version: String,
    #[serde(default = "Vec::new")]
    presets: Vec<Preset<P>>,
}

/// List of presets, persisted in a JSON file:
///
/// ```json
/// {
///     "script_name": "Path Translator",
///     "version": "2.0.0",
///     "presets": [
///         {"name": "Server", "pattern_input": "...", ...}
///     ]
/// }
/// ```
///
/// Payload fields are stored next to the preset name. Nothing is written
/// until [PresetStore::save] is called.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetStore<P> {
    path: PathBuf,
    script_name: String,
    version: String,
    presets: Vec<Preset<P>>,
}
impl<P: serde::Serialize + DeserializeOwned + Clone> PresetStore<P> {
    /// Load presets or start with the empty list.
    pub fn open(
        path: impl AsRef<Path>,
        identity: &ScriptIdentity,
    ) -> ConfigResult<Self> {
        let path = validate_file_path(path)?;
        let mut store = Self {
            path,
            script_name: identity.name().to_string(),
            version: identity.version().to_string(),
            presets: Vec::new(),
        };
        store.reload()?;
        Ok(store)
    }

    /// Presets at `<script_dir>/config/presets.json`.
    pub fn for_script(identity: &ScriptIdentity) -> ConfigResult<Self> {
        Self::open(identity.config_dir().join("presets.json"), identity)
    }

    /// Load the file again, dropping unsaved changes.
    pub fn reload(&mut self) -> ConfigResult<()> {
        self.presets = match self.path.exists() {
            false => Vec::new(),
            true => {
                debug!("load presets: {}", self.path.display());
                let text = fs::read_to_string(&self.path)
                    .map_err(|e| ConfigError::io(&self.path, e))?;
                let file: PresetFile<P> = serde_json::from_str(&text)
                    .map_err(|e| ConfigError::parse(&self.path, e))?;
                file.presets
            }
        };
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn presets(&self) -> &[Preset<P>] {
        &self.presets
    }

    pub fn names(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Preset<P>> {
        self.presets.iter().find(|p| p.name == name)
    }

    pub fn is_duplicate(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Append new preset.
    ///
    /// Returns [ConfigError::DuplicatePreset] if the name is taken.
    pub fn add(&mut self, name: impl Into<String>, payload: P) -> ConfigResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(configuration_error("Preset name is empty"));
        }
        if self.is_duplicate(&name) {
            return Err(ConfigError::DuplicatePreset(name));
        }
        self.presets.push(Preset { name, payload });
        Ok(())
    }

    /// Replace payload of existing preset.
    pub fn overwrite(&mut self, name: &str, payload: P) -> ConfigResult<()> {
        let preset = self
            .presets
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?;
        preset.payload = payload;
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> ConfigResult<Preset<P>> {
        let index = self
            .presets
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?;
        Ok(self.presets.remove(index))
    }

    /// Sort alphabetically by name.
    pub fn sort(&mut self) {
        self.presets.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Write presets, creating the directory if needed.
    pub fn save(&self) -> ConfigResult<()> {
        let file = PresetFile {
            script_name: self.script_name.clone(),
            version: self.version.clone(),
            presets: self.presets.clone(),
        };
        write_json_atomic(&self.path, &file)
    }
}
