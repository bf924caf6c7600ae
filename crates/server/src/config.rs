use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            database_url: "sqlite://./data/users.db".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new("server.toml"), |name| std::env::var(name).ok())
}

fn load_settings_from(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.server_bind = v.clone();
            }
            if let Some(v) = file_cfg.get("database_url") {
                settings.database_url = v.clone();
            }
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = env("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    settings.database_url = normalize_database_url(&settings.database_url);
    settings
}

pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    #[test]
    fn normalizes_plain_file_path_to_sqlite_url() {
        assert_eq!(
            normalize_database_url("./data/test.db"),
            "sqlite://./data/test.db"
        );
    }

    #[test]
    fn keeps_memory_and_full_urls() {
        assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_database_url("sqlite:///var/lib/users.db"),
            "sqlite:///var/lib/users.db"
        );
        assert_eq!(normalize_database_url("  "), Settings::default().database_url);
    }

    #[test]
    fn env_overrides_file_and_app_prefix_wins() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let temp_root = env::temp_dir().join(format!("user_admin_server_cfg_{suffix}"));
        fs::create_dir_all(&temp_root).expect("temp root");
        let config_path = temp_root.join("server.toml");
        fs::write(
            &config_path,
            "bind_addr = \"0.0.0.0:9000\"\ndatabase_url = \"./from-file.db\"\n",
        )
        .expect("write config");

        let from_file = load_settings_from(&config_path, |_| None);
        assert_eq!(from_file.server_bind, "0.0.0.0:9000");
        assert_eq!(from_file.database_url, "sqlite://./from-file.db");

        let overridden = load_settings_from(&config_path, |name| match name {
            "SERVER_BIND" => Some("127.0.0.1:1".to_string()),
            "APP__BIND_ADDR" => Some("127.0.0.1:2".to_string()),
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            _ => None,
        });
        assert_eq!(overridden.server_bind, "127.0.0.1:2");
        assert_eq!(overridden.database_url, "sqlite::memory:");

        fs::remove_dir_all(temp_root).expect("cleanup");
    }

    #[test]
    fn missing_file_keeps_defaults() {
        let settings = load_settings_from(Path::new("does/not/exist.toml"), |_| None);
        assert_eq!(settings.server_bind, "127.0.0.1:5000");
        assert_eq!(settings.database_url, "sqlite://./data/users.db");
    }
}
