//! Settings persistence for host-application plugin scripts.
//!
//! Scripts are small callbacks, invoked by the host from its menus. Every
//! run starts from scratch, so anything the user chose last time (paths,
//! toggles, formats) has to live in a file. This crate keeps it in
//! `<script_dir>/config/config.json` and hides the JSON I/O, first-run
//! bootstrap and merging of old files with new defaults.
//!
//! The common entry point should look like this:
//!
//! ```no_run
//! use script_config::{
//!     config_values, init_logger, ConfigStore, ScriptIdentity,
//! };
//!
//! init_logger();
//! let identity = ScriptIdentity::new(
//!     "Create Shot Folders",
//!     "4.0.0",
//!     "/opt/Autodesk/shared/python/create_shot_folders",
//! );
//! let mut settings = ConfigStore::new(
//!     config_values! {
//!         "camera_path" => "/opt/Autodesk",
//!         "scene_scale" => 100,
//!         "st_map_setup" => false,
//!     },
//!     identity.store_options(),
//! )?;
//! let scale: i64 = settings.get_typed("scene_scale")?;
//! settings.save(config_values! {"scene_scale" => scale * 2})?;
//! # Ok::<(), script_config::errors::ConfigError>(())
//! ```
//!
//! Settings may also be described by a struct:
//!
//! ```no_run
//! use script_config::{ConfigStore, StoreOptions};
//! use serde_derive::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Settings {
//!     date_format: String,
//!     time_format: String,
//! }
//!
//! let defaults = Settings {
//!     date_format: "YY-MM-DD".to_string(),
//!     time_format: "24 Hour".to_string(),
//! };
//! let store = ConfigStore::from_serializable(
//!     &defaults,
//!     StoreOptions::new("config/config.json").owner("Add Dated Folders"),
//! )?;
//! let settings: Settings = store.deserialize()?;
//! # Ok::<(), script_config::errors::ConfigError>(())
//! ```
//!
//! Besides the store there are [PresetStore] for user-named presets and
//! [ScriptMenu] which describes what a script puts into host menus.
//!
//! # Better to know about
//!
//! - Everything is synchronous and runs on the caller thread.
//! - There is no file locking: two scripts, saving into the same file
//!   at the same moment, can overwrite each other. Every save re-reads the
//!   file, so keys, written by others earlier, survive.
//! - Corrupt JSON is never replaced by defaults silently: loading fails
//!   with [errors::ConfigError::Parse].

pub mod errors;

pub mod config_value;
pub use config_value::*;

pub mod config_store;
pub use config_store::*;

pub mod presets;
pub use presets::*;

pub mod host;
pub use host::*;

pub mod menu;
pub use menu::*;

pub mod utils;
pub use utils::init_logger;
