//! Join the loaded mappings per installed app and render the result.

pub mod format;

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::{
    error::CoreError,
    steam::config::{AppManifest, ConfigSnapshot},
};
use format::format_name;

/// Restricts which installed apps are considered at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "values", rename_all = "lowercase")]
pub enum AppFilter {
    #[default]
    None,
    /// Exact app IDs.
    Ids(Vec<String>),
    /// Case-insensitive substrings of the app's title.
    Titles(Vec<String>),
}

impl AppFilter {
    /// Positional CLI args: nothing means no filter.
    pub fn from_args(args: Vec<String>, as_titles: bool) -> Self {
        if args.is_empty() {
            AppFilter::None
        } else if as_titles {
            AppFilter::Titles(args)
        } else {
            AppFilter::Ids(args)
        }
    }

    fn allows_id(&self, app_id: &str) -> bool {
        match self {
            AppFilter::Ids(ids) => ids.iter().any(|id| id == app_id),
            _ => true,
        }
    }

    fn allows_title(&self, title: &str) -> bool {
        match self {
            AppFilter::Titles(needles) => {
                let title = title.to_lowercase();
                needles.iter().any(|n| title.contains(&n.to_lowercase()))
            }
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Include apps without a tool override or launch options.
    pub all_apps: bool,
    /// Print "Default" for Steam Play apps without an override.
    pub show_default_tool: bool,
    /// Print "N/A" for native apps without an override.
    pub show_no_tool: bool,
    /// Print the launch options line even when empty.
    pub show_empty_launch_options: bool,
    pub filter: AppFilter,
}

/// One installed app with everything known about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppEntry {
    pub app_id: String,
    pub name: String,
    pub compat_tool: Option<String>,
    pub launch_options: Option<String>,
    pub platform_override: bool,
}

/// An app as it will be printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppReport {
    #[serde(flatten)]
    pub entry: AppEntry,
    /// Already formatted; `None` means no tool line.
    pub tool_label: Option<String>,
    pub show_launch_options: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub default_tool: String,
    pub apps: Vec<AppReport>,
}

/// Label for the tool line, or `None` to leave the line out.
pub fn resolve_tool_label(
    compat_tool: Option<&str>,
    platform_override: bool,
    opts: &ReportOptions,
) -> Option<String> {
    match compat_tool {
        Some(name) => Some(format_name(name)),
        None if platform_override => opts.show_default_tool.then(|| "Default".to_string()),
        None => opts.show_no_tool.then(|| "N/A".to_string()),
    }
}

impl Report {
    /// Walk installed apps in order. `manifest` is only called for apps that
    /// pass the ID filter and the display rule.
    pub fn build<F>(
        snap: &ConfigSnapshot,
        opts: &ReportOptions,
        mut manifest: F,
    ) -> Result<Self, CoreError>
    where
        F: FnMut(&str) -> Result<AppManifest, CoreError>,
    {
        let default_tool = snap
            .compat_tools
            .default
            .as_deref()
            .map(format_name)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "N/A".to_string());

        let mut apps = Vec::new();
        for app_id in &snap.installed {
            if !opts.filter.allows_id(app_id) {
                continue;
            }
            let compat_tool = snap
                .compat_tools
                .per_app
                .get(app_id)
                .filter(|t| !t.is_empty())
                .cloned();
            let launch_options = snap
                .launch_options
                .get(app_id)
                .filter(|o| !o.is_empty())
                .cloned();
            if compat_tool.is_none() && launch_options.is_none() && !opts.all_apps {
                continue;
            }

            let m = manifest(app_id)?;
            if !opts.filter.allows_title(&m.name) {
                continue;
            }
            let platform_override =
                snap.platform_overrides.contains_key(app_id) || m.uses_platform_override();

            let tool_label = resolve_tool_label(compat_tool.as_deref(), platform_override, opts);
            let show_launch_options = launch_options.is_some() || opts.show_empty_launch_options;
            apps.push(AppReport {
                entry: AppEntry {
                    app_id: app_id.clone(),
                    name: m.name,
                    compat_tool,
                    launch_options,
                    platform_override,
                },
                tool_label,
                show_launch_options,
            });
        }

        Ok(Self { default_tool, apps })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Default compatibility tool: {}", self.default_tool)?;
        for app in &self.apps {
            writeln!(f)?;
            writeln!(f, "{} ({})", app.entry.name, app.entry.app_id)?;
            if let Some(label) = &app.tool_label {
                writeln!(f, "\tCompatibility Tool: {label}")?;
            }
            if app.show_launch_options {
                writeln!(
                    f,
                    "\tLaunch Options: {}",
                    app.entry.launch_options.as_deref().unwrap_or("")
                )?;
            }
        }
        Ok(())
    }
}
