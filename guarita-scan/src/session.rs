//! Scan session state machine
//!
//! Owns camera activation state, the duplicate-scan debounce window and
//! the processing flag. States: `Idle -> Scanning -> Processing -> (Idle
//! | Scanning)`. The processing flag is checked and set synchronously in
//! [`ScanSession::accept`], before the pipeline's first await, so at
//! most one cycle is ever in flight.

use crate::event::ScanEvent;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Duplicate scans of the same code inside this window are dropped.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(3000);

/// Camera permission seam. The UI layer implements this against the
/// platform; tests grant or deny at will.
#[async_trait::async_trait]
pub trait CameraAccess: Send + Sync {
    async fn has_permission(&self) -> bool;
    /// Prompt the operator; returns whether permission was granted.
    async fn request_permission(&self) -> bool;
}

/// Session errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Camera permission denied; the pipeline never starts
    #[error("Camera permission denied")]
    PermissionDenied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Scanning,
    Processing,
}

/// Why a scan event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Empty code
    Empty,
    /// Same code seen inside the debounce window
    Duplicate,
    /// A cycle is already in flight
    Busy,
    /// Session is not scanning
    NotScanning,
}

/// Decision for one scan event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDecision {
    Accepted,
    Ignored(IgnoreReason),
}

/// Scan session controller.
#[derive(Debug, Default)]
pub struct ScanSession {
    state: SessionState,
    camera_open: bool,
    last_code: Option<String>,
    last_at: Option<Instant>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Open the camera and start scanning.
    ///
    /// Requests permission when not already granted; a denial leaves the
    /// session idle.
    pub async fn open(&mut self, camera: &dyn CameraAccess) -> Result<(), SessionError> {
        if !camera.has_permission().await && !camera.request_permission().await {
            info!("camera permission denied");
            return Err(SessionError::PermissionDenied);
        }
        self.camera_open = true;
        if self.state == SessionState::Idle {
            self.state = SessionState::Scanning;
        }
        Ok(())
    }

    /// Close the camera. Stops new events from being accepted; an
    /// in-flight cycle still runs to completion.
    pub fn close(&mut self) {
        self.camera_open = false;
        if self.state == SessionState::Scanning {
            self.state = SessionState::Idle;
        }
    }

    /// Decide whether a scan event enters the pipeline.
    ///
    /// On `Accepted` the session is already in `Processing` and the
    /// debounce state is recorded.
    pub fn accept(&mut self, event: &ScanEvent) -> ScanDecision {
        if event.code.is_empty() {
            return ScanDecision::Ignored(IgnoreReason::Empty);
        }
        match self.state {
            SessionState::Processing => return ScanDecision::Ignored(IgnoreReason::Busy),
            SessionState::Idle => return ScanDecision::Ignored(IgnoreReason::NotScanning),
            SessionState::Scanning => {}
        }
        if let (Some(last), Some(at)) = (self.last_code.as_deref(), self.last_at)
            && last == event.code
            && event.at.duration_since(at) < DEBOUNCE_WINDOW
        {
            debug!(code_len = event.code.len(), "ignoring duplicate scan");
            return ScanDecision::Ignored(IgnoreReason::Duplicate);
        }

        self.last_code = Some(event.code.clone());
        self.last_at = Some(event.at);
        self.state = SessionState::Processing;
        ScanDecision::Accepted
    }

    /// Mark the current cycle finished, success or failure, and
    /// re-enable scanning (or go idle when the camera was closed).
    pub fn finish_cycle(&mut self) {
        if self.state == SessionState::Processing {
            self.state = if self.camera_open {
                SessionState::Scanning
            } else {
                SessionState::Idle
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ScanKind;

    struct Granted;
    struct Denied;

    #[async_trait::async_trait]
    impl CameraAccess for Granted {
        async fn has_permission(&self) -> bool {
            true
        }
        async fn request_permission(&self) -> bool {
            true
        }
    }

    #[async_trait::async_trait]
    impl CameraAccess for Denied {
        async fn has_permission(&self) -> bool {
            false
        }
        async fn request_permission(&self) -> bool {
            false
        }
    }

    fn event(code: &str) -> ScanEvent {
        ScanEvent::new(code, ScanKind::Qr)
    }

    #[tokio::test]
    async fn test_permission_denied_keeps_session_idle() {
        let mut session = ScanSession::new();
        assert_eq!(session.open(&Denied).await, Err(SessionError::PermissionDenied));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(
            session.accept(&event("abc")),
            ScanDecision::Ignored(IgnoreReason::NotScanning)
        );
    }

    #[tokio::test]
    async fn test_duplicate_within_window_is_dropped() {
        let mut session = ScanSession::new();
        session.open(&Granted).await.unwrap();

        assert_eq!(session.accept(&event("abc123")), ScanDecision::Accepted);
        session.finish_cycle();

        // second scan of the same code, still inside 3000ms
        assert_eq!(
            session.accept(&event("abc123")),
            ScanDecision::Ignored(IgnoreReason::Duplicate)
        );

        // a different code passes immediately
        assert_eq!(session.accept(&event("other")), ScanDecision::Accepted);
    }

    #[tokio::test]
    async fn test_same_code_after_window_is_accepted() {
        let mut session = ScanSession::new();
        session.open(&Granted).await.unwrap();

        let mut first = event("abc123");
        first.at = Instant::now() - DEBOUNCE_WINDOW - Duration::from_millis(10);
        assert_eq!(session.accept(&first), ScanDecision::Accepted);
        session.finish_cycle();

        assert_eq!(session.accept(&event("abc123")), ScanDecision::Accepted);
    }

    #[tokio::test]
    async fn test_busy_session_ignores_all_codes() {
        let mut session = ScanSession::new();
        session.open(&Granted).await.unwrap();

        assert_eq!(session.accept(&event("one")), ScanDecision::Accepted);
        assert_eq!(session.state(), SessionState::Processing);
        // any code, duplicate or not, is ignored while processing
        assert_eq!(
            session.accept(&event("two")),
            ScanDecision::Ignored(IgnoreReason::Busy)
        );
    }

    #[tokio::test]
    async fn test_empty_code_ignored() {
        let mut session = ScanSession::new();
        session.open(&Granted).await.unwrap();
        assert_eq!(
            session.accept(&event("")),
            ScanDecision::Ignored(IgnoreReason::Empty)
        );
    }

    #[tokio::test]
    async fn test_close_during_processing_finishes_to_idle() {
        let mut session = ScanSession::new();
        session.open(&Granted).await.unwrap();
        session.accept(&event("abc"));

        session.close();
        // in-flight cycle is not interrupted
        assert_eq!(session.state(), SessionState::Processing);
        session.finish_cycle();
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_finish_returns_to_scanning_while_open() {
        let mut session = ScanSession::new();
        session.open(&Granted).await.unwrap();
        session.accept(&event("abc"));
        session.finish_cycle();
        assert_eq!(session.state(), SessionState::Scanning);
    }
}
