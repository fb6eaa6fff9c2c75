//! Session boundary for device automation.
//!
//! This module defines the [`MobileSession`] trait, the narrow interface the
//! gesture layer needs from a live device-automation session. Session
//! bootstrapping (provider selection, capability negotiation, app install)
//! lives outside this crate; consumers hand the core an already-established
//! session as an `Arc<dyn MobileSession>`.
//!
//! The platform kind is resolved once, when the session is created. Gesture
//! commands are Android-specific, so the [`GestureExecutor`](crate::gestures::GestureExecutor)
//! rejects non-Android sessions at construction rather than per call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur on the automation session boundary.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A platform command failed with the given message.
    #[error("command failed: {0}")]
    CommandFailed(String),

    /// The session is not connected to a device.
    #[error("not connected to automation session")]
    NotConnected,

    /// The connection to the automation server was lost.
    #[error("connection lost: {0}")]
    ConnectionLost(String),

    /// A command exceeded its transport-level timeout.
    #[error("operation timed out")]
    Timeout,

    /// An I/O error occurred on the transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The command result could not be decoded.
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

/// The platform a session was negotiated for.
///
/// Determined at session-creation time from the capabilities and never
/// re-checked per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// Android device or emulator driven by UiAutomator2.
    Android,
    /// iOS device or simulator driven by XCUITest.
    Ios,
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformKind::Android => write!(f, "android"),
            PlatformKind::Ios => write!(f, "ios"),
        }
    }
}

/// Trait for an established device-automation session.
///
/// Implementors wrap a concrete transport (typically an HTTP client speaking
/// the automation server's wire protocol). The gesture layer only needs the
/// generic "execute named platform command with a parameter map" primitive
/// plus a viewport query; everything else about the session stays with its
/// owner.
#[async_trait]
pub trait MobileSession: Send + Sync {
    /// The platform this session was created for.
    fn platform(&self) -> PlatformKind;

    /// Execute a named platform command (e.g. `"mobile: scrollGesture"`)
    /// with a JSON parameter map.
    ///
    /// Returns the raw command result. Scroll and fling commands return a
    /// boolean; most other gestures return null.
    async fn execute_mobile(&self, command: &str, args: Value) -> Result<Value, SessionError>;

    /// The size of the current window in pixels, as `(width, height)`.
    async fn window_size(&self) -> Result<(i32, i32), SessionError>;
}
