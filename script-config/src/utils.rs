use std::{
    fs,
    io::Write,
    path::{Component, Path, PathBuf},
};

use log::{debug, error};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};

use crate::{
    config_value::values_from_object,
    errors::{ConfigError, ConfigResult},
    ConfigValues,
};

const INDENT: &[u8] = b"    ";

/// Initialize `env_logger` once per process.
///
/// Filter is taken from `RUST_LOG`. Later calls are no-op.
pub fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .try_init();
}

/// Log the diagnostic and build [ConfigError::Configuration].
pub(crate) fn configuration_error(message: impl Into<String>) -> ConfigError {
    let message = message.into();
    error!("{}", message);
    ConfigError::Configuration(message)
}

/// Check that path can name a config file.
///
/// Returns [ConfigError::Configuration] for empty path, path, ending with
/// `..` or root, and for path of existing directory.
pub fn validate_file_path(path: impl AsRef<Path>) -> ConfigResult<PathBuf> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(configuration_error("Config path is empty"));
    }
    match path.components().last() {
        Some(Component::Normal(_)) => (),
        _ => {
            return Err(configuration_error(format!(
                "Config path does not name a file: {}",
                path.display()
            )))
        }
    }
    if path.is_dir() {
        return Err(configuration_error(format!(
            "Config path is a directory: {}",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// Read JSON object from file.
pub fn read_json_object(path: impl AsRef<Path>) -> ConfigResult<ConfigValues> {
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| ConfigError::parse(path, e))?;
    match value {
        Value::Object(map) => Ok(values_from_object(map)),
        _ => Err(ConfigError::NotAnObject(path.to_path_buf())),
    }
}

/// Same as [read_json_object], but missing file gives empty map.
pub fn read_json_object_or_empty(
    path: impl AsRef<Path>,
) -> ConfigResult<ConfigValues> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(ConfigValues::new());
    }
    read_json_object(path)
}

/// Serialize value as JSON indented with 4 spaces.
pub fn to_indented_json(value: &impl Serialize) -> ConfigResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Write value as indented JSON.
///
/// Parent directories are created if missing. Data goes to a sibling
/// temporary file first, which is then renamed over the target.
pub fn write_json_atomic(
    path: impl AsRef<Path>,
    value: &impl Serialize,
) -> ConfigResult<()> {
    let path = path.as_ref();
    let bytes = to_indented_json(value)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("create config directory: {}", parent.display());
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::io(parent, e))?;
        }
    }
    let tmp_path = tmp_path_for(path);
    let result = fs::File::create(&tmp_path)
        .and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&tmp_path, path));
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(ConfigError::io(path, e));
    }
    debug!("written config: {}", path.display());
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
