use anyhow::Context;

const CONFIG_FILE: &str = "./app-config.toml";

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bind_address: String,
    pub bind_port: u16,
    pub database: crm_db::Config,
    pub login: LoginConfig,
    pub tracing: TracingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_owned(),
            bind_port: 8081,
            database: crm_db::Config::default(),
            login: LoginConfig::default(),
            tracing: TracingConfig::default(),
        }
    }
}

#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct LoginConfig {
    pub user_name: Option<String>,
    pub password: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "kebab-case", default)]
pub struct TracingConfig {
    /// Used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: "info,tower_http=debug".to_owned(),
        }
    }
}

/// Reads `./app-config.toml` when present, then lets the environment (and a
/// `.env` file) override the database URL and the login pair.
pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();
    let config = match std::fs::read_to_string(CONFIG_FILE) {
        Ok(configuration) => toml::from_str::<Config>(&configuration)
            .with_context(|| format!("unable to parse configuration file {CONFIG_FILE}"))?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("unable to read configuration file {CONFIG_FILE}"))
        }
    };
    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

fn apply_env_overrides(mut config: Config, var: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(db_url) = var("CRM_DATABASE_URL").or_else(|| var("SQL_URL")) {
        config.database.db_url = db_url;
    }
    if let Some(user_name) = var("CRM_LOGIN_USER_NAME") {
        config.login.user_name = Some(user_name);
    }
    if let Some(password) = var("CRM_LOGIN_PASSWORD") {
        config.login.password = Some(password);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashMap, time::Duration};

    #[test]
    fn it_parses_a_partial_file_over_the_defaults() {
        let config = toml::from_str::<Config>(
            r#"
            bind-port = 9000

            [database]
            db-url = "postgres://crm@localhost/crm"
            max-open = 20
            max-idle = 4
            timeout-for-get = "10s"

            [login]
            user-name = "admin"
            "#,
        )
        .expect("should parse");
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.database.db_url, "postgres://crm@localhost/crm");
        assert_eq!(config.database.max_open, 20);
        assert_eq!(config.database.timeout_for_get, Duration::from_secs(10));
        assert_eq!(config.login.user_name.as_deref(), Some("admin"));
        assert_eq!(config.login.password, None);
    }

    #[test]
    fn environment_overrides_the_file() {
        let env = HashMap::from([
            ("SQL_URL", "postgres://legacy/crm"),
            ("CRM_LOGIN_USER_NAME", "maria"),
            ("CRM_LOGIN_PASSWORD", "hunter2"),
        ]);
        let config = apply_env_overrides(Config::default(), |key| {
            env.get(key).map(|v| (*v).to_owned())
        });
        assert_eq!(config.database.db_url, "postgres://legacy/crm");
        assert_eq!(config.login.user_name.as_deref(), Some("maria"));
        assert_eq!(config.login.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn the_prefixed_database_url_wins_over_the_legacy_one() {
        let env = HashMap::from([
            ("SQL_URL", "postgres://legacy/crm"),
            ("CRM_DATABASE_URL", "postgres://current/crm"),
        ]);
        let config = apply_env_overrides(Config::default(), |key| {
            env.get(key).map(|v| (*v).to_owned())
        });
        assert_eq!(config.database.db_url, "postgres://current/crm");
        assert_eq!(config.login.user_name, None);
    }
}
