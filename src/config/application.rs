//! Environment schema for the application.
//!
//! Raw settings are read once at startup from the process environment layered
//! over an optional `.env` file, then validated as a whole. Validation never
//! stops at the first bad field: every violation is collected so the operator
//! sees the full list when startup aborts.

use crate::config::{LogLevel, ReleaseStage};
use std::{collections::HashMap, env, fmt, path::Path, path::PathBuf, str::FromStr};

/// Default location of the dotenv file, relative to the working directory.
pub const ENV_FILE: &str = ".env";

/// Name of a validation rule a field can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    IsInt,
    IsPort,
    IsEnum,
    IsNotEmpty,
    IsBoolean,
    IsString,
    IsIn,
}

impl Constraint {
    /// Token reported to operators, e.g. `isInt`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Constraint::IsInt => "isInt",
            Constraint::IsPort => "isPort",
            Constraint::IsEnum => "isEnum",
            Constraint::IsNotEmpty => "isNotEmpty",
            Constraint::IsBoolean => "isBoolean",
            Constraint::IsString => "isString",
            Constraint::IsIn => "isIn",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Environment variable name.
    pub property: &'static str,
    /// The raw value, if one was supplied.
    pub value: Option<String>,
    /// Every constraint the value violated.
    pub constraints: Vec<Constraint>,
}

impl ValidationError {
    pub fn has_constraint(&self, constraint: Constraint) -> bool {
        self.constraints.contains(&constraint)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let constraints = self
            .constraints
            .iter()
            .map(Constraint::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        match &self.value {
            Some(value) => write!(f, "{} = {:?} violates [{}]", self.property, value, constraints),
            None => write!(f, "{} is missing and violates [{}]", self.property, constraints),
        }
    }
}

/// Errors raised while loading the application configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config validation error:\n{}", format_violations(.0))]
    Validation(Vec<ValidationError>),

    #[error("Failed to read env file {path}: {source}")]
    EnvFile {
        path: String,
        #[source]
        source: dotenvy::Error,
    },
}

impl ConfigError {
    /// Field-level violations, empty for I/O failures.
    pub fn violations(&self) -> &[ValidationError] {
        match self {
            ConfigError::Validation(errors) => errors,
            ConfigError::EnvFile { .. } => &[],
        }
    }
}

fn format_violations(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validated, typed application configuration.
///
/// Built once at startup and shared read-only for the process lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationConfig {
    pub build_number: Option<String>,
    pub build_version: Option<String>,
    pub app_port: u16,
    pub log_level: LogLevel,
    pub log_path: Option<PathBuf>,
    pub auth0_enabled: bool,
    pub auth0_domain: String,
    pub auth0_audience: String,
    pub bugsnag_api_key: String,
    pub bugsnag_release_stage: ReleaseStage,
    /// Notify API override for on-premise Bugsnag installations
    pub bugsnag_endpoint: Option<String>,
    pub base_url: String,
}

impl ApplicationConfig {
    /// Load from `.env` in the working directory overlaid with the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(Path::new(ENV_FILE), env::vars())
    }

    /// Load from an env file overlaid with explicit variables.
    ///
    /// A missing env file is not an error; variables always win over file values.
    pub fn from_sources<I>(env_file: &Path, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut raw = read_env_file(env_file)?;
        raw.extend(vars);
        Self::validate(&raw)
    }

    /// Validate a raw key/value mapping into a typed configuration.
    pub fn validate(raw: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut schema = Schema::new(raw);

        let build_number = schema.optional_string("BUILD_NUMBER");
        let build_version = schema.optional_string("BUILD_VERSION");
        let app_port = schema.port("APP_PORT");
        let log_level = schema.closed_set::<LogLevel>("LOG_LEVEL", Constraint::IsEnum);
        let log_path = schema.optional_string("LOG_PATH").map(PathBuf::from);
        let auth0_enabled = schema.boolean("AUTH0_ENABLED");
        let auth0_domain = schema.required_string("AUTH0_DOMAIN");
        let auth0_audience = schema.required_string("AUTH0_AUDIENCE");
        let bugsnag_api_key = schema.required_string("BUGSNAG_API_KEY");
        let bugsnag_release_stage =
            schema.closed_set::<ReleaseStage>("BUGSNAG_RELEASE_STAGE", Constraint::IsIn);
        let bugsnag_endpoint = schema.optional_string("BUGSNAG_NOTIFY_ENDPOINT");
        let base_url = schema.required_string("BASE_URL");

        match (
            app_port,
            log_level,
            auth0_enabled,
            auth0_domain,
            auth0_audience,
            bugsnag_api_key,
            bugsnag_release_stage,
            base_url,
        ) {
            (
                Some(app_port),
                Some(log_level),
                Some(auth0_enabled),
                Some(auth0_domain),
                Some(auth0_audience),
                Some(bugsnag_api_key),
                Some(bugsnag_release_stage),
                Some(base_url),
            ) if schema.errors.is_empty() => Ok(Self {
                build_number,
                build_version,
                app_port,
                log_level,
                log_path,
                auth0_enabled,
                auth0_domain,
                auth0_audience,
                bugsnag_api_key,
                bugsnag_release_stage,
                bugsnag_endpoint,
                base_url,
            }),
            _ => Err(ConfigError::Validation(schema.errors)),
        }
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let to_error = |source: dotenvy::Error| ConfigError::EnvFile {
        path: path.display().to_string(),
        source,
    };

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => return Err(to_error(e)),
    };

    iter.map(|item| item.map_err(to_error)).collect()
}

/// Numeric coercion accepting integral decimal and exponent forms (`3000.0`, `3e3`).
fn parse_integer(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && n.fract() == 0.0 && n.abs() <= i64::MAX as f64)
            .map(|n| n as i64)
    })
}

/// Collects violations while coercing raw strings field by field.
struct Schema<'a> {
    raw: &'a HashMap<String, String>,
    errors: Vec<ValidationError>,
}

impl<'a> Schema<'a> {
    fn new(raw: &'a HashMap<String, String>) -> Self {
        Self {
            raw,
            errors: Vec::new(),
        }
    }

    fn value(&self, key: &str) -> Option<&'a str> {
        self.raw.get(key).map(String::as_str)
    }

    fn reject(&mut self, property: &'static str, value: Option<&str>, constraints: Vec<Constraint>) {
        self.errors.push(ValidationError {
            property,
            value: value.map(str::to_string),
            constraints,
        });
    }

    /// Absent and empty values both leave the field unset.
    fn optional_string(&mut self, key: &'static str) -> Option<String> {
        self.value(key)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn required_string(&mut self, key: &'static str) -> Option<String> {
        match self.value(key) {
            None => {
                self.reject(key, None, vec![Constraint::IsString, Constraint::IsNotEmpty]);
                None
            }
            Some("") => {
                self.reject(key, Some(""), vec![Constraint::IsNotEmpty]);
                None
            }
            Some(v) => Some(v.to_string()),
        }
    }

    fn port(&mut self, key: &'static str) -> Option<u16> {
        let raw = self.value(key);
        let Some(number) = raw.and_then(|v| parse_integer(v.trim())) else {
            self.reject(key, raw, vec![Constraint::IsInt]);
            return None;
        };
        match u16::try_from(number) {
            Ok(port) => Some(port),
            Err(_) => {
                self.reject(key, raw, vec![Constraint::IsPort]);
                None
            }
        }
    }

    fn boolean(&mut self, key: &'static str) -> Option<bool> {
        let raw = self.value(key);
        match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => {
                self.reject(key, raw, vec![Constraint::IsBoolean]);
                None
            }
        }
    }

    fn closed_set<T: FromStr>(&mut self, key: &'static str, membership: Constraint) -> Option<T> {
        match self.value(key) {
            None => {
                self.reject(key, None, vec![Constraint::IsNotEmpty, membership]);
                None
            }
            Some("") => {
                self.reject(key, Some(""), vec![Constraint::IsNotEmpty, membership]);
                None
            }
            Some(v) => match v.parse() {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    self.reject(key, Some(v), vec![membership]);
                    None
                }
            },
        }
    }
}
