//! Build metadata exposed at `/info`.

use crate::config::ApplicationConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildInfo {
    pub service: String,
    pub build_number: Option<String>,
    pub build_version: Option<String>,
}

impl BuildInfo {
    pub fn from_config(app_name: &str, config: &ApplicationConfig) -> Self {
        Self {
            service: app_name.to_string(),
            build_number: config.build_number.clone(),
            build_version: config.build_version.clone(),
        }
    }
}
