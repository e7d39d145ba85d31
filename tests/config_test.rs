use clinic_booking_sdk::config::{ClinicConfig, DEFAULT_API_URL};
use clinic_booking_sdk::Error;
use std::time::Duration;

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = ClinicConfig::new("https://clinic.example.com")
        .with_timeout(15)
        .with_preferences_path(dir.path().join("prefs.toml"));
    config.save(&path).unwrap();

    let loaded = ClinicConfig::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.request_timeout(), Some(Duration::from_secs(15)));
    assert_eq!(loaded.preferences_file(), dir.path().join("prefs.toml"));
}

#[test]
fn test_missing_keys_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "request_timeout_secs = 3\n").unwrap();

    let loaded = ClinicConfig::load_from(&path).unwrap();
    assert_eq!(loaded.api_url, DEFAULT_API_URL);
    assert_eq!(loaded.request_timeout_secs, Some(3));
}

#[test]
fn test_invalid_url_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "api_url = \"localhost:3000\"\n").unwrap();

    assert!(matches!(
        ClinicConfig::load_from(&path),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_layered_load_reads_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("clinic.toml"),
        "api_url = \"https://staging.clinic.test\"\nrequest_timeout_secs = 9\n",
    )
    .unwrap();

    std::env::set_var("CLINIC_CONFIG_DIR", dir.path());
    let loaded = ClinicConfig::load();
    std::env::remove_var("CLINIC_CONFIG_DIR");

    let loaded = loaded.unwrap();
    if std::env::var("CLINIC_API_URL").is_err() {
        assert_eq!(loaded.api_url, "https://staging.clinic.test");
    }
    assert_eq!(loaded.request_timeout_secs, Some(9));
}
