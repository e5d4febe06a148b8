// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Flags override values from the optional config file.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use cert_manager_verifier::config::Overrides;
use cert_manager_verifier::logging::LogFormat;
use cert_manager_verifier::output::OutputMode;

#[derive(Parser)]
#[command(name = "cert-manager-verifier")]
#[command(about = "Verify that cert-manager is installed and can issue certificates")]
#[command(version)]
pub struct Cli {
    /// Namespace cert-manager is installed in [default: cert-manager]
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Prefix prepended to every deployment name
    #[arg(long)]
    pub deployment_prefix: Option<String>,

    /// Overall deadline, e.g. 2m or 90s [default: 2m]
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Delay between polls, e.g. 100ms [default: 100ms]
    #[arg(long, value_parser = parse_duration)]
    pub poll_interval: Option<Duration>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to a kubeconfig file instead of the inferred one
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Log line format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Result output mode
    #[arg(short, long, value_enum, default_value_t = OutputMode::Normal)]
    pub output: OutputMode,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            namespace: self.namespace.clone(),
            deployment_prefix: self.deployment_prefix.clone(),
            timeout: self.timeout,
            poll_interval: self.poll_interval,
            debug: self.debug,
            log_format: self.log_format,
        }
    }
}

fn parse_duration(value: &str) -> Result<Duration, String> {
    humantime_serde::re::humantime::parse_duration(value).map_err(|e| e.to_string())
}
