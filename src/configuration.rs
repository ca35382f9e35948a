use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub search: SearchSettings,
    pub report: ReportSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
}

/// Google Custom Search credentials. Both values are required for the search
/// stage; leaving either unset disables scanning instead of crashing at boot.
#[derive(serde::Deserialize, Clone)]
pub struct SearchSettings {
    pub api_key: Option<String>,
    pub engine_id: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_queries_per_run: usize,
    /// Google `dateRestrict` value, e.g. "m1" for the last month.
    pub date_restrict: Option<String>,
}

#[derive(serde::Deserialize, Clone)]
pub struct ReportSettings {
    /// Also used as the SMTP envelope sender, so the summary cannot be sent
    /// without it.
    pub sender: Option<String>,
    #[serde(default)]
    pub recipients: Vec<String>,
    pub smtp_host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub smtp_port: u16,
}

impl DatabaseSettings {
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(&self.password)
            .port(self.port)
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.database_name)
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    let settings = config::Config::builder()
        .add_source(config::File::from(base_path.join("configuration.yaml")))
        // APP_SEARCH__API_KEY=... overrides search.api_key and so on.
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
