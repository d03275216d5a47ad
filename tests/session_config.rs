//! Remember-me persistence and configuration loading.

use admin_panel::config::{Config, ConfigError};
use admin_panel::session::{RememberMe, SessionStore};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

// =============================================================================
// Remember-me
// =============================================================================

mod remember_me {
    use super::*;

    #[test]
    fn test_missing_file_is_not_remembered() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert_eq!(store.load(), RememberMe::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let remember = RememberMe {
            enabled: true,
            email: Some("admin@example.com".into()),
        };

        store.save(&remember).unwrap();
        assert_eq!(store.load(), remember);

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("admin_remember_me"));
    }

    #[test]
    fn test_disabling_forgets_email() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store
            .save(&RememberMe {
                enabled: true,
                email: Some("admin@example.com".into()),
            })
            .unwrap();

        store
            .save(&RememberMe {
                enabled: false,
                email: Some("admin@example.com".into()),
            })
            .unwrap();

        let loaded = store.load();
        assert!(!loaded.enabled);
        assert_eq!(loaded.email, None);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        assert_eq!(SessionStore::new(&path).load(), RememberMe::default());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nope").join("session.json"));
        assert!(store.save(&RememberMe::default()).is_err());
    }
}

// =============================================================================
// Configuration
// =============================================================================

mod config_file {
    use super::*;

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("admin-panel.toml");
        fs::write(
            &path,
            r#"
api_base_url = "https://cinema.example.com"
page_size = 25
search_debounce_ms = 150
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.api_base_url, "https://cinema.example.com");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.search_debounce(), Duration::from_millis(150));
        assert_eq!(config.counter_tick_ms, Config::default().counter_tick_ms);
    }

    #[test]
    fn test_invalid_value_in_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("admin-panel.toml");
        fs::write(&path, "page_size = 0\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_wrong_type_is_load_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("admin-panel.toml");
        fs::write(&path, "page_size = \"many\"\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.page_size, 10);
    }
}
