mod common;

use common::{STALE_USER, TestEnv, USER};
use predicates::str::contains;

const DEFAULT_REPORT: &str = "Default compatibility tool: Proton 7.0

Portal 2 (620)
\tCompatibility Tool: Proton Experimental

Counter-Strike 2 (730)
\tLaunch Options: -novid %command%

Cyberpunk 2077 (1091500)
\tCompatibility Tool: GE-Proton8-25
\tLaunch Options: gamemoderun %command%
";

#[test]
fn default_report_lists_only_configured_apps() {
    let env = TestEnv::new();
    assert_eq!(env.run_ok(&[]), DEFAULT_REPORT);
}

#[test]
fn explicit_root_matches_home_discovery() {
    let env = TestEnv::new();
    let root = env.root.to_str().expect("root path utf8");
    let mut cmd = env.cmd();
    cmd.env("HOME", env.root.join("nowhere"))
        .args(["--root", root])
        .assert()
        .success()
        .stdout(DEFAULT_REPORT);
}

#[test]
fn all_apps_with_explicit_labels() {
    let env = TestEnv::new();
    let out = env.run_ok(&["-a", "-d", "-n", "-e"]);
    assert!(out.contains("Half-Life (70)\n\tCompatibility Tool: N/A\n\tLaunch Options: \n"));
    assert!(out.contains("Half-Life 2 (220)\n\tCompatibility Tool: Default\n\tLaunch Options: \n"));
    assert!(out.contains(
        "Portal 2 (620)\n\tCompatibility Tool: Proton Experimental\n\tLaunch Options: \n"
    ));
}

#[test]
fn all_apps_without_label_flags_prints_bare_titles() {
    let env = TestEnv::new();
    let out = env.run_ok(&["--all-apps"]);
    assert!(out.contains("\nHalf-Life (70)\n\nHalf-Life 2 (220)\n\nPortal 2 (620)\n"));
}

#[test]
fn positional_ids_and_titles_filter() {
    let env = TestEnv::new();
    let out = env.run_ok(&["730"]);
    assert!(out.contains("Counter-Strike 2 (730)"));
    assert!(!out.contains("Portal 2"));

    let out = env.run_ok(&["-a", "--titles", "HALF-LIFE"]);
    assert!(out.contains("Half-Life (70)"));
    assert!(out.contains("Half-Life 2 (220)"));
    assert!(!out.contains("Portal 2"));
}

#[test]
fn regex_converter_gives_the_same_report() {
    let env = TestEnv::new();
    assert_eq!(env.run_ok(&["--converter", "regex"]), DEFAULT_REPORT);
}

#[test]
fn json_output() {
    let env = TestEnv::new();
    let v = env.run_json(&["-a"]);
    assert_eq!(v["default_tool"], "Proton 7.0");
    let apps = v["apps"].as_array().expect("apps array");
    assert_eq!(apps.len(), 5);
    assert_eq!(apps[1]["app_id"], "220");
    assert_eq!(apps[1]["platform_override"], true);
    assert_eq!(apps[4]["compat_tool"], "GE-Proton8-25");
    assert_eq!(apps[4]["launch_options"], "gamemoderun %command%");
}

#[test]
fn config_file_supplies_defaults() {
    let env = TestEnv::new();
    let cfg = env.root.join("appcfg.json");
    std::fs::write(
        &cfg,
        serde_json::json!({ "all_apps": true, "no_compat": true, "converter": "regex" }).to_string(),
    )
    .expect("write config");
    let out = env.run_ok(&["--config", cfg.to_str().expect("utf8")]);
    assert!(out.contains("Half-Life (70)\n\tCompatibility Tool: N/A\n"));

    std::fs::write(&cfg, r#"{ "bogus": 1 }"#).expect("write config");
    env.cmd()
        .args(["--config", cfg.to_str().expect("utf8")])
        .assert()
        .failure()
        .stderr(contains("unknown field"));
}

#[test]
fn forced_user_must_exist() {
    let env = TestEnv::new();
    env.cmd()
        .args(["--user", "999"])
        .assert()
        .failure()
        .stderr(contains("user directory not found"));

    // the stale user has no config files
    env.cmd()
        .args(["--user", STALE_USER])
        .assert()
        .failure()
        .stderr(contains("localconfig.vdf"));
}

#[test]
fn empty_userdata_fails_with_no_user() {
    let env = TestEnv::new();
    std::fs::remove_dir_all(env.root.join("userdata")).expect("remove userdata");
    std::fs::create_dir(env.root.join("userdata")).expect("recreate userdata");
    env.cmd()
        .assert()
        .failure()
        .stderr(contains("no user found"));
}

#[test]
fn malformed_config_is_fatal() {
    let env = TestEnv::new();
    env.write("config/config.vdf", "\"InstallConfigStore\"\n{\n\t\"Software\"\n");
    env.cmd()
        .assert()
        .failure()
        .stderr(contains("config.vdf"))
        .stderr(contains("line 4, column 1"));
}

#[test]
fn capitalised_apps_key_also_works() {
    let env = TestEnv::new();
    let path = format!("userdata/{USER}/config/localconfig.vdf");
    let body = std::fs::read_to_string(env.root.join(&path)).expect("read localconfig");
    env.write(&path, &body.replace("\"apps\"", "\"Apps\""));
    assert_eq!(env.run_ok(&[]), DEFAULT_REPORT);
}

#[test]
fn missing_steam_root_is_reported() {
    let env = TestEnv::new();
    env.cmd()
        .env("HOME", env.home.join("elsewhere"))
        .assert()
        .failure()
        .stderr(contains("Steam root not found"));
}
