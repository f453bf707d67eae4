//! Pull the three per-app mappings (and manifests) out of Steam's files.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{io, sync::Arc};

use crate::{
    CoreLog,
    error::CoreError,
    steam::paths::{SteamPaths, active_user, installed_app_ids},
    vdf::{Converter, load_record, record::Record},
};

pub const COMPAT_TOOL_MAPPING: [&str; 5] = [
    "InstallConfigStore",
    "Software",
    "Valve",
    "Steam",
    "CompatToolMapping",
];
pub const LOCAL_APPS: [&str; 5] = ["UserLocalConfigStore", "Software", "Valve", "Steam", "Apps"];
pub const PLATFORM_OVERRIDES: [&str; 1] = ["platform_overrides"];

/// App ID Steam uses for the global default tool in `CompatToolMapping`.
pub const DEFAULT_TOOL_APP_ID: &str = "0";

/// `CompatToolMapping` split into the global default and per-app overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatTools {
    pub default: Option<String>,
    pub per_app: IndexMap<String, String>,
}

/// Only `name` is used; `config` is always empty in practice and `Priority`
/// just ranks per-app picks above the default.
pub fn compat_tool_mapping(config: &Record) -> Result<CompatTools, CoreError> {
    let mapping = config.lookup(&COMPAT_TOOL_MAPPING)?;
    let mut out = CompatTools::default();
    for (app_id, entry) in mapping.iter() {
        let key = || format!("{}/{app_id}", COMPAT_TOOL_MAPPING.join("/"));
        let entry = entry.as_record().ok_or_else(|| CoreError::NotARecord {
            path: Default::default(),
            key: key(),
        })?;
        let name = entry.get_str("name").ok_or_else(|| CoreError::MissingKey {
            path: Default::default(),
            key: format!("{}/name", key()),
        })?;
        if app_id == DEFAULT_TOOL_APP_ID {
            out.default = Some(name.to_string());
        } else {
            out.per_app.insert(app_id.to_string(), name.to_string());
        }
    }
    Ok(out)
}

/// App ID -> `LaunchOptions`, for apps that have the key at all.
pub fn launch_option_mapping(localconfig: &Record) -> Result<IndexMap<String, String>, CoreError> {
    let apps = localconfig.lookup(&LOCAL_APPS)?;
    Ok(apps
        .iter()
        .filter_map(|(app_id, info)| {
            let opts = info.as_record()?.get_str("LaunchOptions")?;
            Some((app_id.to_string(), opts.to_string()))
        })
        .collect())
}

/// One `platform_overrides` entry of `compat.vdf`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest: Option<String>,
}

pub fn platform_override_mapping(
    compat: &Record,
) -> Result<IndexMap<String, PlatformOverride>, CoreError> {
    let overrides = compat.lookup(&PLATFORM_OVERRIDES)?;
    Ok(overrides
        .iter()
        .map(|(app_id, v)| {
            let entry = v.as_record();
            let field = |k: &str| entry.and_then(|r| r.get_str(k)).map(str::to_string);
            (
                app_id.to_string(),
                PlatformOverride {
                    src: field("src"),
                    dest: field("dest"),
                },
            )
        })
        .collect())
}

/// What the report needs from `appmanifest_<id>.acf`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppManifest {
    pub name: String,
    pub platform_override_source: Option<String>,
}

impl AppManifest {
    pub fn from_record(rec: &Record) -> Result<Self, CoreError> {
        let state = rec.lookup(&["AppState"])?;
        let name = state.get_str("name").ok_or_else(|| CoreError::MissingKey {
            path: Default::default(),
            key: "AppState/name".into(),
        })?;
        let platform_override_source = state
            .get_record("UserConfig")
            .and_then(|u| u.get_str("platform_override_source"))
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Ok(Self {
            name: name.to_string(),
            platform_override_source,
        })
    }

    /// Non-empty override source means the app runs through Steam Play.
    pub fn uses_platform_override(&self) -> bool {
        self.platform_override_source.is_some()
    }
}

pub fn load_app_manifest(
    paths: &SteamPaths,
    app_id: &str,
    converter: Converter,
    logger: &Arc<dyn CoreLog>,
) -> Result<AppManifest, CoreError> {
    let file = paths.app_manifest(app_id);
    let rec = load_record(&file, converter, logger)?;
    AppManifest::from_record(&rec).map_err(|e| e.with_path(&file))
}

/// Everything loaded for one run, apart from manifests (those are read lazily,
/// only for apps that end up displayed or title-filtered).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub user: String,
    pub compat_tools: CompatTools,
    pub launch_options: IndexMap<String, String>,
    pub platform_overrides: IndexMap<String, PlatformOverride>,
    pub installed: Vec<String>,
}

impl ConfigSnapshot {
    /// Load all three mappings plus the installed app list. `user` forces a
    /// user directory instead of picking the newest one.
    pub fn load(
        paths: &SteamPaths,
        user: Option<&str>,
        converter: Converter,
        logger: &Arc<dyn CoreLog>,
    ) -> Result<Self, CoreError> {
        let config_file = paths.config_vdf();
        let compat_tools = compat_tool_mapping(&load_record(&config_file, converter, logger)?)
            .map_err(|e| e.with_path(&config_file))?;

        let user = match user {
            Some(u) => {
                let dir = paths.userdata_dir().join(u);
                if !dir.is_dir() {
                    return Err(CoreError::io(
                        dir,
                        io::Error::new(io::ErrorKind::NotFound, "user directory not found"),
                    ));
                }
                u.to_string()
            }
            None => active_user(&paths.userdata_dir(), logger)?,
        };

        let local_file = paths.localconfig_vdf(&user);
        let launch_options = launch_option_mapping(&load_record(&local_file, converter, logger)?)
            .map_err(|e| e.with_path(&local_file))?;

        let compat_file = paths.compat_vdf(&user);
        let platform_overrides =
            platform_override_mapping(&load_record(&compat_file, converter, logger)?)
                .map_err(|e| e.with_path(&compat_file))?;

        let installed = installed_app_ids(&paths.steamapps_dir())?;

        logger.info(&format!(
            "Loaded {} tool overrides, {} launch options, {} platform overrides; {} installed apps (user {user})",
            compat_tools.per_app.len(),
            launch_options.len(),
            platform_overrides.len(),
            installed.len()
        ));

        Ok(Self {
            user,
            compat_tools,
            launch_options,
            platform_overrides,
            installed,
        })
    }
}

/// Fixture helper shared by the unit tests of this crate.
#[cfg(test)]
pub(crate) fn write_fixture(root: &std::path::Path, files: &[(&str, &str)]) {
    for (rel, body) in files {
        let p = root.join(rel);
        if let Some(parent) = p.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(p, body).unwrap();
    }
}
