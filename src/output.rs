// ABOUTME: Rendering of verification results for the terminal.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::fmt::Write as _;
use std::time::Instant;

use crate::diagnostics::Warning;
use crate::verify::{CertificateStatus, DeploymentResult, DeploymentStatus, VerifyResult};

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputMode {
    /// Per-deployment and certificate lines plus a summary
    #[default]
    Normal,
    /// Only the final summary line, for CI
    Quiet,
    /// A single JSON report for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing the run.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    fn elapsed_secs(&self) -> Option<f64> {
        self.start_time.map(|t| t.elapsed().as_secs_f64())
    }

    /// Print the report for a finished run to stdout.
    pub fn report(&self, result: &VerifyResult) {
        print!("{}", self.render(result));
    }

    /// Print an error that stopped the run before verification.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => {
                let event = ErrorEvent {
                    success: false,
                    error: message,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }

    pub fn render(&self, result: &VerifyResult) -> String {
        match self.mode {
            OutputMode::Normal => self.render_normal(result),
            OutputMode::Quiet => format!("{}\n", self.summary(result)),
            OutputMode::Json => {
                let report = JsonReport::new(result, self.elapsed_secs());
                serde_json::to_string(&report)
                    .map(|json| format!("{json}\n"))
                    .unwrap_or_default()
            }
        }
    }

    fn render_normal(&self, result: &VerifyResult) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Deployments:");
        for deployment in result.deployment_results() {
            let _ = writeln!(out, "  {}", deployment_line(deployment));
        }

        let _ = writeln!(out, "Certificate:");
        let line = match &result.certificate {
            CertificateStatus::Ready => "✓ test certificate issued".to_string(),
            CertificateStatus::Skipped => "- skipped, deployments not ready".to_string(),
            CertificateStatus::TimedOut(e) | CertificateStatus::Failed(e) => format!("✗ {e}"),
        };
        let _ = writeln!(out, "  {line}");

        if !result.warnings.is_empty() {
            let _ = writeln!(out, "Warnings:");
            for warning in &result.warnings {
                let _ = writeln!(out, "  ! {}", warning.message);
            }
        }

        let _ = writeln!(out, "{}", self.summary(result));
        out
    }

    fn summary(&self, result: &VerifyResult) -> String {
        let verdict = if result.success() {
            "cert-manager is ready"
        } else {
            "cert-manager verification failed"
        };
        match (self.mode, self.elapsed_secs()) {
            (OutputMode::Normal, Some(elapsed)) => format!("{verdict} ({elapsed:.1}s)"),
            _ => verdict.to_string(),
        }
    }
}

fn deployment_line(result: &DeploymentResult) -> String {
    let name = result.name();
    match &result.status {
        DeploymentStatus::Ready => match &result.detected_version {
            Some(version) => format!("✓ {name} ({version})"),
            None => format!("✓ {name}"),
        },
        DeploymentStatus::NotFound if !result.deployment.required => {
            format!("- {name} not found (optional)")
        }
        DeploymentStatus::NotFound => format!("✗ {name} not found"),
        _ => {
            let reason = result.error().map(|e| e.to_string()).unwrap_or_default();
            format!("✗ {name}\n    Reason: {reason}")
        }
    }
}

fn status_name(status: &DeploymentStatus) -> &'static str {
    match status {
        DeploymentStatus::Ready => "ready",
        DeploymentStatus::NotFound => "not_found",
        DeploymentStatus::NotReady { .. } => "not_ready",
        DeploymentStatus::TimedOut => "timed_out",
        DeploymentStatus::Failed(_) => "failed",
    }
}

fn certificate_status_name(status: &CertificateStatus) -> &'static str {
    match status {
        CertificateStatus::Skipped => "skipped",
        CertificateStatus::Ready => "ready",
        CertificateStatus::TimedOut(_) => "timed_out",
        CertificateStatus::Failed(_) => "failed",
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    success: bool,
    deployments_success: bool,
    certificate_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    detected_version: Option<&'a str>,
    deployments: Vec<JsonDeployment<'a>>,
    certificate: JsonCertificate,
    warnings: &'a [Warning],
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct JsonDeployment<'a> {
    name: &'a str,
    required: bool,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct JsonCertificate {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct ErrorEvent<'a> {
    success: bool,
    error: &'a str,
}

impl<'a> JsonReport<'a> {
    fn new(result: &'a VerifyResult, duration_secs: Option<f64>) -> Self {
        Self {
            success: result.success(),
            deployments_success: result.deployments_success(),
            certificate_success: result.certificate_success(),
            detected_version: result.detected_version(),
            deployments: result
                .deployment_results()
                .iter()
                .map(|d| JsonDeployment {
                    name: d.name(),
                    required: d.deployment.required,
                    status: status_name(&d.status),
                    error: d.error().map(|e| e.to_string()),
                })
                .collect(),
            certificate: JsonCertificate {
                status: certificate_status_name(&result.certificate),
                error: result.certificate_error().map(|e| e.to_string()),
            },
            warnings: &result.warnings,
            duration_secs,
        }
    }
}
