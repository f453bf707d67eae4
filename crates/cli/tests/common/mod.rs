use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

pub const USER: &str = "42";
pub const STALE_USER: &str = "11111";

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub root: PathBuf,
}

impl TestEnv {
    /// `<home>/.steam/root` populated with a small but realistic install.
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let root = home.join(".steam").join("root");
        make_fixture_root(&root);
        Self {
            _tmp: tmp,
            home,
            root,
        }
    }

    /// Runs against the fixture through `$HOME`, without `--root`.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("steam-appcfg");
        cmd.env("HOME", &self.home);
        cmd
    }

    pub fn write(&self, rel: &str, body: &str) {
        write_file(&self.root.join(rel), body);
    }

    pub fn run_ok(&self, args: &[&str]) -> String {
        let out = self
            .cmd()
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        String::from_utf8(out).expect("utf8 stdout")
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self.run_ok(&[&["--json"][..], args].concat());
        serde_json::from_str(&out).expect("valid json output")
    }
}

fn write_file(p: &Path, body: &str) {
    if let Some(parent) = p.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(p, body).expect("write fixture file");
}

fn set_mtime(dir: &Path, secs: u64) {
    File::open(dir)
        .expect("open dir")
        .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
        .expect("set mtime");
}

fn manifest(app_id: &str, name: &str, override_src: &str) -> String {
    format!(
        "\"AppState\"\n{{\n\t\"appid\"\t\t\"{app_id}\"\n\t\"name\"\t\t\"{name}\"\n\t\"StateFlags\"\t\t\"4\"\n\t\"UserConfig\"\n\t{{\n\t\t\"platform_override_source\"\t\t\"{override_src}\"\n\t}}\n}}\n"
    )
}

const CONFIG_VDF: &str = r#""InstallConfigStore"
{
	"Software"
	{
		"Valve"
		{
			"Steam"
			{
				"CompatToolMapping"
				{
					"0"
					{
						"name"		"proton_7"
						"config"		""
						"Priority"		"75"
					}
					"620"
					{
						"name"		"proton_experimental"
						"config"		""
						"Priority"		"250"
					}
					"1091500"
					{
						"name"		"GE-Proton8-25"
						"config"		""
						"Priority"		"250"
					}
				}
			}
		}
	}
}
"#;

const LOCALCONFIG_VDF: &str = r#""UserLocalConfigStore"
{
	"Software"
	{
		"Valve"
		{
			"Steam"
			{
				"apps"
				{
					"730"
					{
						"LastPlayed"		"1690000000"
						"LaunchOptions"		"-novid %command%"
					}
					"220"
					{
						"LastPlayed"		"1680000000"
					}
					"1091500"
					{
						"LaunchOptions"		"gamemoderun %command%"
					}
				}
			}
		}
	}
}
"#;

const COMPAT_VDF: &str = r#""platform_overrides"
{
	"220"
	{
		"dest"		"linux"
		"src"		"windows"
	}
}
"#;

fn make_fixture_root(root: &Path) {
    write_file(&root.join("config/config.vdf"), CONFIG_VDF);
    write_file(
        &root.join(format!("userdata/{USER}/config/localconfig.vdf")),
        LOCALCONFIG_VDF,
    );
    write_file(
        &root.join(format!("userdata/{USER}/config/compat.vdf")),
        COMPAT_VDF,
    );
    fs::create_dir_all(root.join(format!("userdata/{STALE_USER}"))).expect("create stale user");

    for (id, name, src) in [
        ("70", "Half-Life", ""),
        ("220", "Half-Life 2", ""),
        ("620", "Portal 2", "windows"),
        ("730", "Counter-Strike 2", ""),
        ("1091500", "Cyberpunk 2077", "windows"),
    ] {
        write_file(
            &root.join(format!("steamapps/appmanifest_{id}.acf")),
            &manifest(id, name, src),
        );
    }
    write_file(&root.join("steamapps/libraryfolders.vdf"), "\"libraryfolders\"\n{\n}\n");

    set_mtime(&root.join(format!("userdata/{STALE_USER}")), 1_000);
    set_mtime(&root.join(format!("userdata/{USER}")), 2_000);
}
