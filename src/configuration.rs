use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use secrecy::SecretString;
use serde::Deserialize;
use std::env;
use std::time::Duration;
use tracing::info;

const BASE_CONFIG: &str = include_str!("../configuration/base.yaml");
const LOCAL_CONFIG: &str = include_str!("../configuration/local.yaml");
const PRODUCTION_CONFIG: &str = include_str!("../configuration/production.yaml");

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub github: GitHubSettings,
    pub cors: CorsSettings,
    pub keep_alive: KeepAliveSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct GitHubSettings {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub token: SecretString,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl GitHubSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

/// Periodic self-ping used to keep hosted instances from idling out.
#[derive(Debug, Deserialize, Clone)]
pub struct KeepAliveSettings {
    pub enabled: bool,
    pub url: String,
    pub interval_seconds: u64,
}

impl KeepAliveSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(SecretString::from(s))
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    dotenvy::dotenv().ok();

    let environment = get_environment()?;
    info!(environment = environment.as_str(), "Loading configuration");
    build_configuration(environment)
}

fn get_environment() -> Result<Environment, config::ConfigError> {
    let env_var = env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_string());

    env_var
        .try_into()
        .map_err(|_| config::ConfigError::NotFound("Failed to parse APP_ENVIRONMENT".to_string()))
}

fn build_configuration(environment: Environment) -> Result<Settings, config::ConfigError> {
    let environment_config = match environment {
        Environment::Local => LOCAL_CONFIG,
        Environment::Production => PRODUCTION_CONFIG,
    };

    let builder = Config::builder()
        .add_source(File::from_str(BASE_CONFIG, FileFormat::Yaml))
        .add_source(File::from_str(environment_config, FileFormat::Yaml))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins"),
        );

    with_legacy_overrides(builder)?
        .build()?
        .try_deserialize::<Settings>()
}

/// Plain `GITHUB_TOKEN`, `BACKEND_HOST` and `BACKEND_PORT` are still honoured
/// and take precedence over everything else.
fn with_legacy_overrides(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    builder
        .set_override_option("github.token", env::var("GITHUB_TOKEN").ok())?
        .set_override_option("application.host", env::var("BACKEND_HOST").ok())?
        .set_override_option("application.port", env::var("BACKEND_PORT").ok())
}

#[derive(Debug, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}
