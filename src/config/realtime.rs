//! Real-time layer configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the broadcast hub and WebSocket sessions.
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    /// Bound of each session's outbound queue. A session whose queue
    /// overflows is disconnected and must resync on reconnect.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Seconds a session may go without any inbound frame (including
    /// pings) before it is force-closed.
    #[serde(default = "default_heartbeat_timeout")]
    pub heartbeat_timeout_secs: u64,
}

impl RealtimeConfig {
    /// Heartbeat window as a `Duration`.
    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_secs(self.heartbeat_timeout_secs)
    }

    /// Validate realtime configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.queue_capacity == 0 {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        if self.heartbeat_timeout_secs == 0 {
            return Err(ValidationError::InvalidHeartbeatTimeout);
        }
        Ok(())
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            heartbeat_timeout_secs: default_heartbeat_timeout(),
        }
    }
}

fn default_queue_capacity() -> usize {
    128
}

fn default_heartbeat_timeout() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtime_defaults() {
        let config = RealtimeConfig::default();
        assert_eq!(config.queue_capacity, 128);
        assert_eq!(config.heartbeat_timeout(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_queue_capacity_rejected() {
        let config = RealtimeConfig {
            queue_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_heartbeat_rejected() {
        let config = RealtimeConfig {
            heartbeat_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
