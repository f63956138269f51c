// tests/config_resolution.rs

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;
use watchrun::cli::CliArgs;
use watchrun::config::{
    load_from_path, load_optional, parse_duration, split_patterns, WatchConfig,
    DEFAULT_CONFIG_FILE,
};
use watchrun::errors::WatchrunError;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn defaults_match_the_classic_tool() -> TestResult {
    let cfg = WatchConfig::resolve(None, &CliArgs::default())?;

    assert_eq!(cfg.interval, Duration::from_millis(300));
    assert_eq!(cfg.monitor, vec!["."]);
    assert_eq!(cfg.ignore, vec!["~*", ".*", "*~", "*.exe"]);
    assert!(cfg.recurse);
    assert!(!cfg.verbose);
    assert_eq!(cfg, WatchConfig::default());

    Ok(())
}

#[test]
fn pattern_lists_split_on_semicolon_and_colon() {
    assert_eq!(split_patterns("src;*.toml:docs"), vec!["src", "*.toml", "docs"]);
    assert_eq!(split_patterns(" a ;; b ;"), vec!["a", "b"]);
    assert!(split_patterns("").is_empty());
}

#[test]
fn cli_flags_override_file_values() -> TestResult {
    let file = write_config(
        r#"
[watch]
interval = "2s"
monitor = ["src"]
ignore = ["target"]
recurse = false
"#,
    );
    let raw = load_from_path(file.path())?;

    let cli = CliArgs {
        interval: Some("50ms".into()),
        monitor: Some("lib;bin".into()),
        ..CliArgs::default()
    };
    let cfg = WatchConfig::resolve(Some(&raw), &cli)?;

    assert_eq!(cfg.interval, Duration::from_millis(50));
    assert_eq!(cfg.monitor, vec!["lib", "bin"]);
    // Not given on the CLI: taken from the file.
    assert_eq!(cfg.ignore, vec!["target"]);
    assert!(!cfg.recurse);

    Ok(())
}

#[test]
fn explicit_recurse_flag_wins_over_file() -> TestResult {
    let file = write_config("[watch]\nrecurse = false\n");
    let raw = load_from_path(file.path())?;

    let cli = CliArgs {
        recurse: Some(true),
        ..CliArgs::default()
    };
    assert!(WatchConfig::resolve(Some(&raw), &cli)?.recurse);

    Ok(())
}

#[test]
fn verbose_from_file_or_cli() -> TestResult {
    let file = write_config("[watch]\nverbose = true\n");
    let raw = load_from_path(file.path())?;

    assert!(WatchConfig::resolve(Some(&raw), &CliArgs::default())?.verbose);

    let cli = CliArgs {
        verbose: true,
        ..CliArgs::default()
    };
    assert!(WatchConfig::resolve(None, &cli)?.verbose);

    Ok(())
}

#[test]
fn unknown_keys_are_rejected() {
    let file = write_config("[watch]\nintervall = \"1s\"\n");

    match load_from_path(file.path()) {
        Err(WatchrunError::TomlError(_)) => {}
        other => panic!("expected TomlError, got {other:?}"),
    }
}

#[test]
fn zero_interval_is_a_config_error() {
    let cli = CliArgs {
        interval: Some("0ms".into()),
        ..CliArgs::default()
    };

    match WatchConfig::resolve(None, &cli) {
        Err(WatchrunError::ConfigError(msg)) => assert!(msg.contains("interval")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn empty_monitor_list_is_a_config_error() {
    let cli = CliArgs {
        monitor: Some(";;".into()),
        ..CliArgs::default()
    };

    match WatchConfig::resolve(None, &cli) {
        Err(WatchrunError::ConfigError(msg)) => assert!(msg.contains("monitor")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn bad_interval_is_a_config_error() {
    let cli = CliArgs {
        interval: Some("fast".into()),
        ..CliArgs::default()
    };
    assert!(matches!(
        WatchConfig::resolve(None, &cli),
        Err(WatchrunError::ConfigError(_))
    ));
}

#[test]
fn durations_parse_with_units() {
    assert_eq!(parse_duration("300ms"), Ok(Duration::from_millis(300)));
    assert_eq!(parse_duration(" 3s "), Ok(Duration::from_secs(3)));
    assert_eq!(parse_duration("1m"), Ok(Duration::from_secs(60)));
    assert_eq!(parse_duration("2h"), Ok(Duration::from_secs(7200)));
    assert!(parse_duration("").is_err());
    assert!(parse_duration("10").is_err());
    assert!(parse_duration("10d").is_err());
}

#[test]
fn oversized_durations_are_rejected() {
    assert_eq!(
        parse_duration("307445734561825861m"),
        Err("duration '307445734561825861m' is too large".to_string())
    );
    assert!(parse_duration("5124095576030432h").is_err());
    assert_eq!(
        parse_duration("18446744073709551615s"),
        Ok(Duration::from_secs(u64::MAX))
    );

    let cli = CliArgs {
        interval: Some("307445734561825861m".into()),
        ..CliArgs::default()
    };
    match WatchConfig::resolve(None, &cli) {
        Err(WatchrunError::ConfigError(msg)) => assert!(msg.contains("too large")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn explicit_missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    match load_optional(Some(missing.to_str().unwrap()), dir.path()) {
        Err(WatchrunError::ConfigError(msg)) => assert!(msg.contains("nope.toml")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn default_config_file_is_picked_up_when_present() -> TestResult {
    let dir = tempfile::tempdir()?;
    assert!(load_optional(None, dir.path())?.is_none());

    std::fs::write(
        dir.path().join(DEFAULT_CONFIG_FILE),
        "[watch]\nmonitor = [\"src\"]\n",
    )?;
    let raw = load_optional(None, dir.path())?.expect("config file should be found");
    assert_eq!(raw.watch.monitor, Some(vec!["src".to_string()]));

    Ok(())
}
