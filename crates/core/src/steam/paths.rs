use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::SystemTime,
};

use crate::{CoreLog, error::CoreError};

static APP_MANIFEST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^appmanifest_(\d+)\.acf$").expect("valid regex"));

/// Where a Steam install keeps the files we read. Everything hangs off `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SteamPaths {
    pub root: PathBuf,
}

impl SteamPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<home>/.steam/root`, the symlink the Linux client maintains.
    pub fn from_home(home: &Path) -> Self {
        Self::new(home.join(".steam").join("root"))
    }

    /// Resolve the current user's home and use `from_home`.
    pub fn discover() -> Result<Self, CoreError> {
        use directories::BaseDirs;
        let base = BaseDirs::new().ok_or(CoreError::NoHome)?;
        Ok(Self::from_home(base.home_dir()))
    }

    pub fn config_vdf(&self) -> PathBuf {
        self.root.join("config").join("config.vdf")
    }

    pub fn steamapps_dir(&self) -> PathBuf {
        self.root.join("steamapps")
    }

    pub fn app_manifest(&self, app_id: &str) -> PathBuf {
        self.steamapps_dir()
            .join(format!("appmanifest_{app_id}.acf"))
    }

    pub fn userdata_dir(&self) -> PathBuf {
        self.root.join("userdata")
    }

    pub fn user_config_dir(&self, user_id: &str) -> PathBuf {
        self.userdata_dir().join(user_id).join("config")
    }

    pub fn localconfig_vdf(&self, user_id: &str) -> PathBuf {
        self.user_config_dir(user_id).join("localconfig.vdf")
    }

    pub fn compat_vdf(&self, user_id: &str) -> PathBuf {
        self.user_config_dir(user_id).join("compat.vdf")
    }
}

/// IDs of every `appmanifest_<id>.acf` in `steamapps`, in numeric order.
pub fn installed_app_ids(steamapps: &Path) -> Result<Vec<String>, CoreError> {
    let entries = fs::read_dir(steamapps).map_err(|e| CoreError::io(steamapps, e))?;
    let mut ids = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CoreError::io(steamapps, e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(c) = APP_MANIFEST.captures(name).and_then(|c| c.get(1)) {
            ids.push(c.as_str().to_string());
        }
    }
    sort_numeric(&mut ids);
    Ok(ids)
}

/// Order digit strings by value without parsing (IDs can outgrow u64 in theory).
pub(crate) fn sort_numeric(ids: &mut [String]) {
    ids.sort_unstable_by(|a, b| {
        let (a, b) = (a.trim_start_matches('0'), b.trim_start_matches('0'));
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    });
}

/// Pick the most recently modified directory under `userdata` and return its
/// name. Plain files are ignored; equal times fall back to the greater name.
pub fn active_user(userdata: &Path, logger: &Arc<dyn CoreLog>) -> Result<String, CoreError> {
    let entries = fs::read_dir(userdata).map_err(|e| CoreError::io(userdata, e))?;

    let mut best: Option<(SystemTime, String)> = None;
    for entry in entries {
        let entry = entry.map_err(|e| CoreError::io(userdata, e))?;
        let path = entry.path();
        let meta = fs::metadata(&path).map_err(|e| CoreError::io(&path, e))?;
        if !meta.is_dir() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            logger.warn(&format!("skipping non UTF-8 user dir {}", path.display()));
            continue;
        };
        let mtime = meta.modified().map_err(|e| CoreError::io(&path, e))?;
        let newer = match &best {
            None => true,
            Some((t, n)) => (mtime, &name) > (*t, n),
        };
        if newer {
            best = Some((mtime, name));
        }
    }

    let (mtime, user) = best.ok_or_else(|| CoreError::NoUser {
        dir: userdata.to_path_buf(),
    })?;
    let when: DateTime<Local> = mtime.into();
    logger.debug(&format!(
        "[active_user] {user} (modified {})",
        when.format("%Y-%m-%d %H:%M:%S")
    ));
    Ok(user)
}
