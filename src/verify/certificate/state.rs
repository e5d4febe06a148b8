// ABOUTME: Trust chain lifecycle markers for the type state pattern.
// ABOUTME: Zero-sized types enforce create-before-wait at compile time.

/// Lifecycle phase name, used in log fields.
pub trait Phase {
    const NAME: &'static str;
}

/// Manifests rendered, nothing created yet.
/// Available actions: `create()`, `cleanup()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Unknown;

/// Every resource confirmed created or already present.
/// Available actions: `wait_ready()`, `cleanup()`
#[derive(Debug, Clone, Copy, Default)]
pub struct WaitingReady;

/// The certificate reported Ready=True.
/// Available actions: `cleanup()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Ready;

impl Phase for Unknown {
    const NAME: &'static str = "unknown";
}

impl Phase for WaitingReady {
    const NAME: &'static str = "waiting-ready";
}

impl Phase for Ready {
    const NAME: &'static str = "ready";
}
