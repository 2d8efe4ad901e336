#[cfg(test)]
mod test {
    use std::io::Write;

    use serial_test::serial;

    use crate::config::proc_loader::{file_to_config, parse_config};
    use crate::config::settings::{LogFormat, StorageConfig};
    use crate::manager::TokenManager;
    use crate::observability::metrics::get_metrics;
    use crate::utils::constants::{DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_ISSUER_BASE_URL};

    #[test]
    fn parses_file_storage_config() {
        let cfg = parse_config(
            r#"
app_id: appid
app_secret: secret
issuer:
  base_url: http://127.0.0.1:8080/cgi-bin/
  timeout_ms: 1500
storage:
  type: file
  path: /var/lib/token-manager/access_token
logging:
  level: debug
  format: json
metrics:
  is_enabled: true
"#
            .to_owned(),
        )
        .unwrap();

        assert_eq!(cfg.app_id, "appid");
        assert_eq!(cfg.issuer.base_url, "http://127.0.0.1:8080/cgi-bin/");
        assert_eq!(cfg.issuer.timeout_ms, 1500);
        assert_eq!(
            cfg.storage,
            StorageConfig::File { path: "/var/lib/token-manager/access_token".to_owned() }
        );
        assert_eq!(cfg.logging.as_ref().unwrap().format, LogFormat::Json);
        assert!(cfg.metrics.is_enabled);
    }

    #[test]
    fn applies_defaults() {
        let cfg = parse_config("app_id: appid\napp_secret: secret\nstorage:\n  type: memory\n".to_owned())
            .unwrap();

        assert_eq!(cfg.issuer.base_url, DEFAULT_ISSUER_BASE_URL);
        assert_eq!(cfg.issuer.timeout_ms, DEFAULT_HTTP_TIMEOUT_MS);
        assert_eq!(cfg.storage, StorageConfig::Memory { token: None });
        let logging = cfg.logging.unwrap();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, LogFormat::Compact);
        assert!(!cfg.metrics.is_enabled);
    }

    #[test]
    fn aggregates_validation_errors() {
        let err = parse_config(
            r#"
app_id: ""
app_secret: secret
issuer:
  base_url: ftp://example.com/
  timeout_ms: 0
storage:
  type: file
  path: ""
"#
            .to_owned(),
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("total errors: 4"), "{}", message);
        assert!(message.contains("app_id"));
        assert!(message.contains("unsupported scheme"));
        assert!(message.contains("timeout_ms"));
        assert!(message.contains("storage.path"));
    }

    #[test]
    fn rejects_unknown_storage_type() {
        assert!(parse_config("app_id: a\napp_secret: b\nstorage:\n  type: redis\n".to_owned()).is_err());
    }

    #[tokio::test]
    #[serial]
    async fn expands_environment_variables() {
        std::env::set_var("TOKEN_MANAGER_TEST_APP_SECRET", "from-env");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "app_id: appid\napp_secret: ${{TOKEN_MANAGER_TEST_APP_SECRET}}\nstorage:\n  type: file\n  path: ${{TOKEN_MANAGER_TEST_UNSET_PATH:/tmp/access_token}}\n"
        )
        .unwrap();

        let cfg = file_to_config(file.path()).await.unwrap();
        std::env::remove_var("TOKEN_MANAGER_TEST_APP_SECRET");

        assert_eq!(cfg.app_secret, "from-env");
        assert_eq!(cfg.storage, StorageConfig::File { path: "/tmp/access_token".to_owned() });
    }

    #[tokio::test]
    #[serial]
    async fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(file_to_config(&dir.path().join("absent.yaml")).await.is_err());
    }

    #[tokio::test]
    async fn manager_from_config_serves_seeded_token() {
        let cfg = parse_config(
            "app_id: appid\napp_secret: secret\nissuer:\n  base_url: http://127.0.0.1:1/\nstorage:\n  type: memory\n  token: seeded\n"
                .to_owned(),
        )
        .unwrap();
        let manager = TokenManager::from_config(&cfg).unwrap();

        assert_eq!(manager.storage().kind(), "key_value");
        assert_eq!(manager.token().await.unwrap(), "seeded");

        let rendered = get_metrics().await.render().unwrap();
        assert!(rendered.contains("tokenmanager_cache_hits_total"));
    }
}
