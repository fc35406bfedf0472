use crate::{
    errors::{ConfigError, ConfigResult},
    utils::{
        configuration_error, read_json_object, read_json_object_or_empty,
        validate_file_path, write_json_atomic,
    },
    ConfigValue, ConfigValues,
};
use log::{debug, info};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Reserved key, holding name of the script that wrote the file.
pub const DEFAULT_OWNER_KEY: &str = "script_name";

/// Identity of the running script.
///
/// Made explicitly by the script at startup and passed where needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptIdentity {
    name: String,
    version: String,
    script_dir: PathBuf,
}
impl ScriptIdentity {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        script_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            script_dir: script_dir.into(),
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn version(&self) -> &str {
        &self.version
    }
    pub fn script_dir(&self) -> &Path {
        &self.script_dir
    }

    /// `<script_dir>/config`
    pub fn config_dir(&self) -> PathBuf {
        self.script_dir.join("config")
    }

    /// `<script_dir>/config/config.json`
    pub fn config_path(&self) -> PathBuf {
        self.config_dir().join("config.json")
    }

    /// Options for the conventional config file, owned by this script.
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions::new(self.config_path()).owner(self.name.clone())
    }
}

/// Where and on whose behalf [ConfigStore] persists values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    path: PathBuf,
    owner_name: Option<String>,
    owner_key: String,
}
impl StoreOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            owner_name: None,
            owner_key: DEFAULT_OWNER_KEY.to_string(),
        }
    }

    /// Name, written under the owner key as the first entry.
    pub fn owner(mut self, name: impl Into<String>) -> Self {
        self.owner_name = Some(name.into());
        self
    }

    pub fn owner_key(mut self, key: impl Into<String>) -> Self {
        self.owner_key = key.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Settings, persisted in a JSON file between script runs.
///
/// The features are:
/// - On the first run file (and its directory) is created from defaults.
/// - Later runs merge the file on top of defaults: saved values win, and
/// keys added to defaults in newer script versions just appear, so old
/// files never need migration.
/// - [ConfigStore::save] takes only changed values and never drops keys
/// that are already in the file.
///
/// # Usage
///
/// ```no_run
/// use script_config::{config_values, ConfigStore, ScriptIdentity};
/// let identity = ScriptIdentity::new(
///     "Add Dated Folders",
///     "1.0.0",
///     "/opt/Autodesk/shared/python/add_dated_folders",
/// );
/// let mut settings = ConfigStore::new(
///     config_values! {
///         "date_format" => "YY-MM-DD",
///         "time_format" => "24 Hour",
///     },
///     identity.store_options(),
/// )?;
/// let format: String = settings.get_typed("date_format")?;
/// settings.save(config_values! {"date_format" => "YYYY-MM-DD"})?;
/// # Ok::<(), script_config::errors::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigStore {
    path: PathBuf,
    owner_name: Option<String>,
    owner_key: String,
    defaults: ConfigValues,
    values: ConfigValues,
}
impl ConfigStore {
    /// Load settings, creating the file from defaults if it is missing.
    ///
    /// Returns [ConfigError::Configuration] if defaults are empty or
    /// path can not name a file.
    pub fn new(
        defaults: ConfigValues,
        options: StoreOptions,
    ) -> ConfigResult<Self> {
        if defaults.is_empty() {
            return Err(configuration_error(
                "Config defaults must not be empty",
            ));
        }
        let path = validate_file_path(&options.path)?;
        let mut store = Self {
            path,
            owner_name: options.owner_name,
            owner_key: options.owner_key,
            defaults,
            values: ConfigValues::new(),
        };
        if store.path.exists() {
            debug!("load config: {}", store.path.display());
            let on_disk = read_json_object(&store.path)?;
            store.values = store.merge_defaults(on_disk);
        } else {
            info!(
                "config not found, create from defaults: {}",
                store.path.display()
            );
            let values = store.with_owner(store.defaults.clone());
            write_json_atomic(&store.path, &values)?;
            store.values = values;
        }
        Ok(store)
    }

    /// Same as [ConfigStore::new], defaults are taken from a struct.
    ///
    /// The struct has to serialize into JSON object.
    pub fn from_serializable<T: Serialize>(
        defaults: &T,
        options: StoreOptions,
    ) -> ConfigResult<Self> {
        Self::new(to_config_values(defaults)?, options)
    }

    /// Read raw JSON object without defaults or owner handling.
    pub fn read(path: impl AsRef<Path>) -> ConfigResult<ConfigValues> {
        let path = validate_file_path(path)?;
        read_json_object(path)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Get value converted to the requested type.
    ///
    /// Returns [ConfigError::MissingKey] or [ConfigError::Type].
    pub fn get_typed<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<T> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))?
            .to_typed(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn values(&self) -> &ConfigValues {
        &self.values
    }

    pub fn defaults(&self) -> &ConfigValues {
        &self.defaults
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn owner_name(&self) -> Option<&str> {
        self.owner_name.as_deref()
    }

    /// All settings as a typed struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> ConfigResult<T> {
        let object = Value::from(ConfigValue::Map(self.values.clone()));
        serde_json::from_value(object).map_err(|e| ConfigError::Shape {
            expected: std::any::type_name::<T>().to_string(),
            source: e,
        })
    }

    /// Merge changed values into the file and into this store.
    pub fn save(&mut self, partial: ConfigValues) -> ConfigResult<()> {
        let path = self.path.clone();
        self.save_to(partial, path)
    }

    /// Same as [ConfigStore::save], but to another file.
    ///
    /// Layers, from bottom to top: values in the file at `path`, values
    /// of this store, `partial`. The owner key is written first.
    pub fn save_to(
        &mut self,
        partial: ConfigValues,
        path: impl AsRef<Path>,
    ) -> ConfigResult<()> {
        let path = validate_file_path(path)?;
        let mut merged = read_json_object_or_empty(&path)?;
        for (key, value) in self.values.iter() {
            merged.insert(key.clone(), value.clone());
        }
        for (key, value) in partial {
            merged.insert(key, value);
        }
        let merged = self.with_owner(merged);
        write_json_atomic(&path, &merged)?;
        debug!("saved config: {}", path.display());
        self.values = merged;
        Ok(())
    }

    /// Save struct fields as changed values.
    pub fn save_serializable<T: Serialize>(
        &mut self,
        partial: &T,
    ) -> ConfigResult<()> {
        self.save(to_config_values(partial)?)
    }

    /// Drop in-memory state and load the file again.
    ///
    /// If the file was removed, defaults are used, but nothing is written.
    pub fn reload(&mut self) -> ConfigResult<()> {
        self.values = match self.path.exists() {
            true => self.merge_defaults(read_json_object(&self.path)?),
            false => self.with_owner(self.defaults.clone()),
        };
        Ok(())
    }

    fn merge_defaults(&self, on_disk: ConfigValues) -> ConfigValues {
        let mut values = self.defaults.clone();
        for (key, value) in on_disk {
            values.insert(key, value);
        }
        self.with_owner(values)
    }

    /// Put owner key to the first position.
    fn with_owner(&self, values: ConfigValues) -> ConfigValues {
        let mut values = values;
        let owner = match self.owner_name.as_ref() {
            Some(name) => {
                values.shift_remove(&self.owner_key);
                ConfigValue::from(name.as_str())
            }
            None => match values.shift_remove(&self.owner_key) {
                Some(value) => value,
                None => return values,
            },
        };
        let mut ordered = ConfigValues::with_capacity(values.len() + 1);
        ordered.insert(self.owner_key.clone(), owner);
        ordered.extend(values);
        ordered
    }
}

/// Serialize struct into [ConfigValues].
///
/// Returns [ConfigError::Configuration] if it is not a JSON object.
pub fn to_config_values<T: Serialize>(value: &T) -> ConfigResult<ConfigValues> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(crate::config_value::values_from_object(map)),
        other => Err(configuration_error(format!(
            "Config values must serialize to JSON object, got: {}",
            other
        ))),
    }
}
