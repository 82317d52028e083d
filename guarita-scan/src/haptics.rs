//! Haptic feedback seam
//!
//! Fires once per accepted scan. Best-effort: a device that cannot
//! vibrate must not abort the pipeline, so failures are logged and
//! swallowed by the caller.

use std::time::Duration;

/// Haptic feedback provider
pub trait Haptics: Send + Sync {
    fn vibrate(&self, duration: Duration) -> std::io::Result<()>;
}

/// No-op provider for headless use and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn vibrate(&self, _duration: Duration) -> std::io::Result<()> {
        Ok(())
    }
}
