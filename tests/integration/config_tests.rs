use clap::Parser;
use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use romdupe::cli::Cli;
use romdupe::config::{Config, ConfigError};
use romdupe::error::ExitCode;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_defaults() {
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config = Config::from_figment(&figment).unwrap();

    assert!(config.permanent);
    assert_eq!(
        config.image_extensions,
        vec![".png", ".jpg", ".jpeg", ".gif", ".bmp"]
    );
    assert!(config.classifier().unwrap().is_multi_part("Saga (Disc 2).rom"));
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
multi_part_patterns = ['\(cd\s*\d+\)']
image_extensions = ["webp", ".png"]
skip_hidden = true
"#,
    )
    .unwrap();

    let _guard = crate::ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let config = Config::load_from_path(&config_path).unwrap();

    assert_eq!(config.image_extensions, vec![".webp", ".png"]);
    assert!(config.skip_hidden);
    assert!(config.permanent);

    let classifier = config.classifier().unwrap();
    assert!(classifier.is_multi_part("Saga (CD 2).iso"));
    assert!(!classifier.is_multi_part("Saga (Disc 2).iso"));
}

#[test]
fn test_config_env_overrides_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "permanent = true\n").unwrap();

    let _guard = crate::ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var("ROMDUPE_PERMANENT", "false");
    let result = Config::load(Some(&config_path));
    std::env::remove_var("ROMDUPE_PERMANENT");

    assert!(!result.unwrap().permanent);
}

#[test]
fn test_config_invalid_pattern_fails_fast() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "multi_part_patterns = ['(unclosed']\n").unwrap();

    let _guard = crate::ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let err = Config::load_from_path(&config_path).unwrap_err();

    assert!(matches!(err, ConfigError::InvalidPattern(_)));
    assert!(err.to_string().contains("(unclosed"));
}

#[test]
fn test_config_malformed_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "permanent = maybe\n").unwrap();

    let _guard = crate::ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    assert!(matches!(
        Config::load_from_path(&config_path),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_config_string_merge() {
    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::string("image_extensions = []"));
    let config = Config::from_figment(&figment).unwrap();
    assert!(config.image_extensions.is_empty());
}

#[test]
fn test_config_init_command() {
    let temp_dir = tempdir().unwrap();
    let target = temp_dir.path().join("romdupe").join("config.toml");
    let target_arg = target.to_string_lossy().into_owned();

    let _guard = crate::ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let cli = Cli::try_parse_from(["romdupe", "-q", "config", "init", target_arg.as_str()]).unwrap();
    assert_eq!(romdupe::run_app(cli).unwrap(), ExitCode::Success);
    assert!(target.exists());
    assert_eq!(Config::load_from_path(&target).unwrap(), Config::default());

    let cli = Cli::try_parse_from(["romdupe", "-q", "config", "init", target_arg.as_str()]).unwrap();
    assert!(romdupe::run_app(cli).is_err());

    let cli = Cli::try_parse_from(["romdupe", "-q", "config", "init", target_arg.as_str(), "--force"])
        .unwrap();
    assert_eq!(romdupe::run_app(cli).unwrap(), ExitCode::Success);
}

#[test]
fn test_config_show_with_missing_file_fails() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("absent.toml");
    let missing_arg = missing.to_string_lossy().into_owned();

    let _guard = crate::ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let cli = Cli::try_parse_from(["romdupe", "--config", missing_arg.as_str(), "config", "show"])
        .unwrap();
    let err = romdupe::run_app(cli).unwrap_err();
    assert!(format!("{:#}", err).contains("config file not found"));
}
