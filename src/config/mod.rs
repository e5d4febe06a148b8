// ABOUTME: Configuration for a verification run, loaded from YAML.
// ABOUTME: Handles defaults, validation, and command-line overrides.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::logging::{LogConfig, LogFormat};
use crate::poll::{DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT};
use crate::types::ResourceName;
use crate::verify::{
    DEFAULT_CLEANUP_TIMEOUT, DEFAULT_NAMESPACE, DeploymentDescriptor, VerifyOptions,
    default_deployments,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default)]
    pub deployment_prefix: String,

    #[serde(default = "default_deployments")]
    pub deployments: Vec<DeploymentDescriptor>,

    /// Deadline for the whole run, both phases included.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Bound on each delete during cleanup, outside the run deadline.
    #[serde(default = "default_cleanup_timeout", with = "humantime_serde")]
    pub cleanup_timeout: Duration,

    #[serde(default)]
    pub log: LogConfig,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

fn default_cleanup_timeout() -> Duration {
    DEFAULT_CLEANUP_TIMEOUT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            deployment_prefix: String::new(),
            deployments: default_deployments(),
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
            cleanup_timeout: default_cleanup_timeout(),
            log: LogConfig::default(),
        }
    }
}

/// Values given on the command line, which win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub namespace: Option<String>,
    pub deployment_prefix: Option<String>,
    pub timeout: Option<Duration>,
    pub poll_interval: Option<Duration>,
    pub debug: bool,
    pub log_format: Option<LogFormat>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load `path` if given, otherwise start from defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(namespace) = overrides.namespace {
            self.namespace = namespace;
        }
        if let Some(prefix) = overrides.deployment_prefix {
            self.deployment_prefix = prefix;
        }
        if let Some(timeout) = overrides.timeout {
            self.timeout = timeout;
        }
        if let Some(interval) = overrides.poll_interval {
            self.poll_interval = interval;
        }
        if overrides.debug {
            self.log.level = "debug".to_string();
        }
        if let Some(format) = overrides.log_format {
            self.log.format = format;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        ResourceName::new(&self.namespace)
            .map_err(|e| Error::InvalidConfig(format!("namespace: {e}")))?;

        if self.deployments.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one deployment must be listed".to_string(),
            ));
        }
        for deployment in &self.deployments {
            if deployment.name.is_empty() {
                return Err(Error::InvalidConfig(
                    "deployment name cannot be empty".to_string(),
                ));
            }
            let name = format!("{}{}", self.deployment_prefix, deployment.name);
            ResourceName::new(&name)
                .map_err(|e| Error::InvalidConfig(format!("deployment: {e}")))?;
        }

        for (field, value) in [
            ("timeout", self.timeout),
            ("poll_interval", self.poll_interval),
            ("cleanup_timeout", self.cleanup_timeout),
        ] {
            if value.is_zero() {
                return Err(Error::InvalidDuration(format!("{field} must be greater than zero")));
            }
        }

        if !crate::logging::is_valid_level(&self.log.level) {
            return Err(Error::InvalidConfig(format!(
                "log level {:?} is not a valid filter",
                self.log.level
            )));
        }

        Ok(())
    }

    pub fn to_verify_options(&self) -> VerifyOptions {
        VerifyOptions::new(self.namespace.clone())
            .deployment_prefix(self.deployment_prefix.clone())
            .deployments(self.deployments.clone())
            .poll_interval(self.poll_interval)
            .cleanup_timeout(self.cleanup_timeout)
    }
}
