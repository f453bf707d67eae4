//! Show the compatibility tool and launch options Steam applies to installed apps.
//!
//! Examples:
//!   steam-appcfg
//!   steam-appcfg --all-apps --default-compat --no-compat
//!   steam-appcfg 620 730
//!   steam-appcfg --titles portal "half-life"
//!   steam-appcfg --root /mnt/games/steam --user 12345678 --json
//!
//! Notes:
//! - Without --root, the Steam root is `~/.steam/root`.
//! - Without --user, the most recently modified `userdata` directory is used.
//! - --config points at a JSON file with defaults; flags given on the command line win.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::Parser;
use serde::Deserialize;

use steam_appcfg_core::prelude::*;

// ───────────────────────────── CLI Args ─────────────────────────────

fn parse_converter_arg(s: &str) -> Result<Converter, String> {
    s.parse::<Converter>().map_err(str::to_string)
}

#[derive(Parser, Debug)]
#[command(
    name = "steam-appcfg",
    version,
    about = "Shows compatibility tools and launch options currently in use by Steam apps"
)]
struct Args {
    /// Show all apps (including those without launch options or compatibility tool overrides)
    #[arg(short, long)]
    all_apps: bool,

    /// Explicitly show which apps use the default compatibility tool
    #[arg(short, long)]
    default_compat: bool,

    /// Explicitly show which apps don't use a compatibility tool
    #[arg(short, long)]
    no_compat: bool,

    /// Explicitly print no launch options where none are in use
    #[arg(short, long)]
    empty_launch_options: bool,

    /// Treat APPS as case-insensitive title substrings instead of app IDs
    #[arg(short, long)]
    titles: bool,

    /// Only report these app IDs (or titles, with --titles)
    apps: Vec<String>,

    /// Steam root directory (defaults to ~/.steam/root)
    #[arg(long, value_name = "PATH")]
    root: Option<PathBuf>,

    /// Read this userdata directory instead of the most recently modified one
    #[arg(long, value_name = "ID")]
    user: Option<String>,

    /// Text converter: descent | regex
    #[arg(long, value_parser = parse_converter_arg)]
    converter: Option<Converter>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Optional JSON file with defaults (see `ConfigFile`)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ───────────────────────────── Logger ─────────────────────────────

// stdout carries the report, so everything goes to stderr.
#[derive(Clone)]
struct StderrLogger {
    verbose: bool,
}

impl CoreLog for StderrLogger {
    fn info(&self, msg: &str) {
        if self.verbose {
            eprintln!("INFO:  {msg}");
        }
    }
    fn warn(&self, msg: &str) {
        eprintln!("WARN:  {msg}");
    }
    fn error(&self, msg: &str) {
        eprintln!("ERROR: {msg}");
    }
    fn debug(&self, msg: &str) {
        if self.verbose {
            eprintln!("DEBUG: {msg}");
        }
    }
}

// ───────────────────────────── Config file ─────────────────────────────

/// e.g. `{ "root": "/mnt/steam", "converter": "regex", "all_apps": true }`
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    root: Option<PathBuf>,
    user: Option<String>,
    converter: Option<Converter>,
    all_apps: bool,
    default_compat: bool,
    no_compat: bool,
    empty_launch_options: bool,
}

fn load_config_file(path: &Path) -> Result<ConfigFile, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("parse {}: {e}", path.display()))
}

// ───────────────────────────── main ─────────────────────────────

fn main() -> Result<(), String> {
    let args = Args::parse();

    let core_log: Arc<dyn CoreLog> = Arc::new(StderrLogger {
        verbose: args.verbose,
    });

    let file_cfg = match args.config.as_ref() {
        Some(p) => {
            core_log.info(&format!("Config file: {}", p.display()));
            load_config_file(p)?
        }
        None => ConfigFile::default(),
    };

    let paths = match args.root.clone().or(file_cfg.root.clone()) {
        Some(root) => SteamPaths::new(root),
        None => SteamPaths::discover().map_err(|e| e.to_string())?,
    };
    if !paths.root.is_dir() {
        return Err(format!(
            "Steam root not found or not a directory: {}",
            paths.root.display()
        ));
    }
    core_log.info(&format!("Steam root: {}", paths.root.display()));

    let converter = args.converter.or(file_cfg.converter).unwrap_or_default();
    let user = args.user.as_deref().or(file_cfg.user.as_deref());
    let snap =
        ConfigSnapshot::load(&paths, user, converter, &core_log).map_err(|e| e.to_string())?;

    let opts = ReportOptions {
        all_apps: args.all_apps || file_cfg.all_apps,
        show_default_tool: args.default_compat || file_cfg.default_compat,
        show_no_tool: args.no_compat || file_cfg.no_compat,
        show_empty_launch_options: args.empty_launch_options || file_cfg.empty_launch_options,
        filter: AppFilter::from_args(args.apps, args.titles),
    };

    let report = Report::build(&snap, &opts, |app_id| {
        load_app_manifest(&paths, app_id, converter, &core_log)
    })
    .map_err(|e| e.to_string())?;
    core_log.debug(&format!("{} apps in report", report.apps.len()));

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("serialize report: {e}"))?;
        println!("{json}");
    } else {
        print!("{report}");
    }
    Ok(())
}
