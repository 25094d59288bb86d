//! Progression configuration with documented defaults

/// Configuration for the progression engine
///
/// These switches mirror what a server operator can toggle without
/// touching the rank graph itself.
#[derive(Debug, Clone)]
pub struct ProgressionConfig {
    /// Announce committed rankups through the notification sink
    ///
    /// When false, the player who ranked up is still notified by the
    /// orchestrator; only the server-wide broadcast is suppressed.
    pub broadcast_rankup: bool,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            broadcast_rankup: true,
        }
    }
}
