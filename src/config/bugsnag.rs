//! Crash reporting configuration.

use crate::config::ApplicationConfig;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const DEFAULT_NOTIFY_ENDPOINT: &str = "https://notify.bugsnag.com";

/// Deployment stage reported with every crash event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseStage {
    DevExternalEcs,
    StagingExternalEcs,
    ProductionExternalEcs,
    Local,
    Test,
}

impl ReleaseStage {
    pub const ALL: [ReleaseStage; 5] = [
        ReleaseStage::DevExternalEcs,
        ReleaseStage::StagingExternalEcs,
        ReleaseStage::ProductionExternalEcs,
        ReleaseStage::Local,
        ReleaseStage::Test,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseStage::DevExternalEcs => "dev-external-ecs",
            ReleaseStage::StagingExternalEcs => "staging-external-ecs",
            ReleaseStage::ProductionExternalEcs => "production-external-ecs",
            ReleaseStage::Local => "local",
            ReleaseStage::Test => "test",
        }
    }
}

impl fmt::Display for ReleaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReleaseStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| format!("unknown release stage: {s}"))
    }
}

/// Configuration for the Bugsnag client
#[derive(Clone, Debug)]
pub struct BugsnagConfig {
    pub api_key: String,
    pub release_stage: ReleaseStage,
    /// Stages in which events are actually sent
    pub enabled_release_stages: Vec<ReleaseStage>,
    pub app_version: String,
    /// Report unhandled request errors without explicit `notify` calls
    pub auto_detect_errors: bool,
    pub endpoint: String,
}

impl BugsnagConfig {
    pub fn from_config(config: &ApplicationConfig) -> Self {
        Self {
            api_key: config.bugsnag_api_key.clone(),
            release_stage: config.bugsnag_release_stage,
            enabled_release_stages: vec![
                ReleaseStage::StagingExternalEcs,
                ReleaseStage::ProductionExternalEcs,
            ],
            app_version: config
                .build_version
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            auto_detect_errors: true,
            endpoint: config
                .bugsnag_endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_NOTIFY_ENDPOINT.to_string()),
        }
    }

    /// Whether events are delivered for the configured release stage
    pub fn is_enabled(&self) -> bool {
        self.enabled_release_stages.contains(&self.release_stage)
    }
}
