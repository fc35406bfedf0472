use crate::{step, TestStep};
use log::{debug, info};
use script_config::errors::ConfigError;
use script_config::{
    config_values, ConfigStore, ConfigValue, Host, HostVersion, MenuAction,
    MenuGroup, MessageKind, PresetStore, ScriptIdentity, ScriptMenu,
    StoreOptions, DEFAULT_OWNER_KEY,
};
use serde_derive::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::iter;
use std::rc::Rc;

/// Creates all integration test steps to be executed. The order matters!
pub fn create_test_steps() -> impl Iterator<Item = TestStep> {
    let store_steps = vec![
        first_run(),
        defaults_fill_gaps(),
        save_merges(),
        save_is_idempotent(),
        validation(),
        corrupt_file(),
        typed_settings(),
    ]
    .into_iter();
    let script_steps = vec![presets(), menu_with_settings()].into_iter();
    iter::empty().chain(store_steps).chain(script_steps)
}

fn first_run() -> TestStep {
    step("First run", |ctx| {
        let identity = ScriptIdentity::new(
            "Axis To Point Locators",
            "3.0.0",
            ctx.root.join("axis_to_point_locators"),
        );
        assert!(!identity.config_dir().exists());
        let store = ConfigStore::new(
            config_values! {
                "camera_path" => "/opt/Autodesk",
                "scene_scale" => 100,
            },
            identity.store_options(),
        )?;
        assert_eq!(store.get("scene_scale"), Some(&ConfigValue::Integer(100)));

        let on_disk = ConfigStore::read(identity.config_path())?;
        debug!("on disk: {:?}", on_disk);
        assert_eq!(
            on_disk,
            config_values! {
                "script_name" => "Axis To Point Locators",
                "camera_path" => "/opt/Autodesk",
                "scene_scale" => 100,
            }
        );
        let keys: Vec<&String> = on_disk.keys().collect();
        assert_eq!(keys[0], DEFAULT_OWNER_KEY);
        Ok(())
    })
}

fn defaults_fill_gaps() -> TestStep {
    step("Defaults fill missing keys", |ctx| {
        let path = ctx.root.join("scale/config.json");
        fs::create_dir_all(path.parent().ok_or("no parent")?)?;
        fs::write(&path, r#"{"scene_scale": 50}"#)?;
        let store = ConfigStore::new(
            config_values! {"scene_scale" => 100, "st_map_setup" => false},
            StoreOptions::new(&path).owner("Axis To Point Locators"),
        )?;
        assert_eq!(store.get_typed::<i64>("scene_scale")?, 50);
        assert!(!store.get_typed::<bool>("st_map_setup")?);
        assert_eq!(store.owner_name(), Some("Axis To Point Locators"));
        Ok(())
    })
}

fn save_merges() -> TestStep {
    step("Save merges into file", |ctx| {
        let path = ctx.root.join("merge/config.json");
        let mut store = ConfigStore::new(
            config_values! {"a" => 1, "b" => 2, "c" => 3},
            StoreOptions::new(&path).owner("Merge"),
        )?;
        store.save(config_values! {"b" => "new_b"})?;
        let on_disk = ConfigStore::read(&path)?;
        assert_eq!(on_disk["a"], ConfigValue::Integer(1));
        assert_eq!(on_disk["b"], ConfigValue::from("new_b"));
        assert_eq!(on_disk["c"], ConfigValue::Integer(3));

        info!("other writer adds a key, it has to survive next save");
        let mut other = ConfigStore::new(
            config_values! {"d" => true},
            StoreOptions::new(&path).owner("Merge"),
        )?;
        other.save(config_values! {"d" => false})?;
        store.save(config_values! {"a" => 10})?;
        let on_disk = ConfigStore::read(&path)?;
        assert_eq!(on_disk["d"], ConfigValue::Bool(false));
        assert_eq!(on_disk["a"], ConfigValue::Integer(10));
        let keys: Vec<&str> = on_disk.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec![DEFAULT_OWNER_KEY, "a", "b", "c", "d"]);
        Ok(())
    })
}

fn save_is_idempotent() -> TestStep {
    step("Save is idempotent", |ctx| {
        let path = ctx.root.join("idempotent/config.json");
        let mut store = ConfigStore::new(
            config_values! {"date_format" => "YY-MM-DD"},
            StoreOptions::new(&path).owner("Dated Folders"),
        )?;
        store.save(config_values! {"date_format" => "YYYY-MM-DD"})?;
        let once = fs::read_to_string(&path)?;
        store.save(config_values! {"date_format" => "YYYY-MM-DD"})?;
        let twice = fs::read_to_string(&path)?;
        assert_eq!(once, twice);
        Ok(())
    })
}

fn validation() -> TestStep {
    step("Validation", |ctx| {
        let path = ctx.root.join("validation/config.json");
        let result =
            ConfigStore::new(config_values! {}, StoreOptions::new(&path));
        assert!(matches!(result, Err(ConfigError::Configuration(_))));
        assert!(!path.exists());

        let result = ConfigStore::new(
            config_values! {"a" => 1},
            StoreOptions::new(ctx.root),
        );
        assert!(matches!(result, Err(ConfigError::Configuration(_))));
        assert!(matches!(
            ConfigStore::read(""),
            Err(ConfigError::Configuration(_))
        ));
        Ok(())
    })
}

fn corrupt_file() -> TestStep {
    step("Corrupt file", |ctx| {
        let path = ctx.root.join("corrupt.json");
        fs::write(&path, "{\"scene_scale\": 5")?;
        let result = ConfigStore::new(
            config_values! {"scene_scale" => 100},
            StoreOptions::new(&path),
        );
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
        Ok(())
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FolderSettings {
    date_format: String,
    time_format: String,
}

fn typed_settings() -> TestStep {
    step("Typed settings", |ctx| {
        let options =
            StoreOptions::new(ctx.root.join("typed/config.json")).owner("Typed");
        let defaults = FolderSettings {
            date_format: "YY-MM-DD".to_string(),
            time_format: "24 Hour".to_string(),
        };
        let mut store =
            ConfigStore::from_serializable(&defaults, options.clone())?;
        store.save_serializable(&FolderSettings {
            time_format: "12 Hour".to_string(),
            ..defaults.clone()
        })?;
        let reopened = ConfigStore::from_serializable(&defaults, options)?;
        let settings: FolderSettings = reopened.deserialize()?;
        assert_eq!(settings.time_format, "12 Hour");
        assert_eq!(settings.date_format, "YY-MM-DD");
        Ok(())
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Translation {
    pattern_input: String,
    pattern_output: String,
}

fn presets() -> TestStep {
    step("Presets", |ctx| {
        let identity = ScriptIdentity::new(
            "Path Translator",
            "2.0.0",
            ctx.root.join("path_translator"),
        );
        let mut presets: PresetStore<Translation> =
            PresetStore::for_script(&identity)?;
        presets.add(
            "Studio",
            Translation {
                pattern_input: "/Volumes/studio".to_string(),
                pattern_output: "/mnt/studio".to_string(),
            },
        )?;
        presets.add(
            "Archive",
            Translation {
                pattern_input: "/Volumes/archive".to_string(),
                pattern_output: "/mnt/archive".to_string(),
            },
        )?;
        presets.sort();
        presets.save()?;

        let reopened: PresetStore<Translation> =
            PresetStore::for_script(&identity)?;
        assert_eq!(reopened.names(), vec!["Archive", "Studio"]);
        assert_eq!(
            reopened
                .get("Studio")
                .ok_or("no preset")?
                .payload
                .pattern_output,
            "/mnt/studio"
        );
        Ok(())
    })
}

fn menu_with_settings() -> TestStep {
    step("Menu action saves settings", |ctx| {
        let identity = ScriptIdentity::new(
            "Add Dated Folders",
            "1.0.0",
            ctx.root.join("add_dated_folders"),
        );
        let store = Rc::new(RefCell::new(ConfigStore::new(
            config_values! {"last_folder" => ConfigValue::Null},
            identity.store_options(),
        )?));
        let action_store = store.clone();
        let mut menu: ScriptMenu<String> = ScriptMenu::new();
        menu.register(
            MenuGroup::new("Add Dated Folders")
                .hierarchy(["Logik"])
                .with_action(
                    MenuAction::new("Add Dated Folder", move |selection: &[String]| {
                        let folder = selection.first().cloned();
                        action_store
                            .borrow_mut()
                            .save(config_values! {"last_folder" => folder})?;
                        Ok(())
                    })
                    .visible_when(|selection: &[String]| selection.len() == 1)
                    .minimum_version(HostVersion::new(2025, 0, 0)),
                )?,
        )?;

        let selection = vec!["Shots".to_string()];
        let entries = menu.visible_actions(&selection, ctx.host.version());
        assert_eq!(entries.len(), 1);
        assert!(menu
            .visible_actions(&[], ctx.host.version())
            .is_empty());
        menu.invoke(
            "Add Dated Folders",
            "Add Dated Folder",
            &selection,
            ctx.host,
        )?;
        assert_eq!(
            store.borrow().get_typed::<String>("last_folder")?,
            "Shots"
        );
        let on_disk = ConfigStore::read(identity.config_path())?;
        assert_eq!(on_disk["last_folder"], ConfigValue::from("Shots"));
        assert!(ctx
            .host
            .messages()
            .iter()
            .all(|m| m.kind != MessageKind::Error));
        Ok(())
    })
}
