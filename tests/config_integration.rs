//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use earthsim::config::AppConfig;
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("ESIM_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.window.title, "Test From Env");
    std::env::remove_var("ESIM_WINDOW__TITLE");
}

#[test]
#[serial]
fn test_env_override_nested_number() {
    std::env::set_var("ESIM_VIEW__DEPTH_STEP", "25");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.view.depth_step, 25.0);
    std::env::remove_var("ESIM_VIEW__DEPTH_STEP");
}

#[test]
#[serial]
fn test_default_file_matches_defaults() {
    std::env::remove_var("ESIM_WINDOW__TITLE");

    let cwd = std::env::current_dir().unwrap();
    assert!(cwd.join("config/default.toml").exists());

    // Skip the comparison if a local user.toml changes things
    if cwd.join("config/user.toml").exists() {
        return;
    }

    let config = AppConfig::load().unwrap();
    let defaults = AppConfig::default();
    assert_eq!(config.window.title, defaults.window.title);
    assert_eq!(config.view.center, defaults.view.center);
    assert_eq!(config.slider.major_tick_unit, defaults.slider.major_tick_unit);
    assert_eq!(config.scene.path, defaults.scene.path);
}
