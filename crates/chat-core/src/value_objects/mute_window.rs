//! Bounds on a timed mute

use chrono::{DateTime, Duration, Utc};

use crate::error::DomainError;

/// Allowed distance between "now" and a requested `muted_until`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuteWindow {
    pub min: Duration,
    pub max: Duration,
}

impl Default for MuteWindow {
    fn default() -> Self {
        Self {
            min: Duration::hours(1),
            max: Duration::days(30),
        }
    }
}

impl MuteWindow {
    /// Build a window from bounds expressed in seconds
    pub fn from_secs(min_secs: i64, max_secs: i64) -> Self {
        Self {
            min: Duration::seconds(min_secs),
            max: Duration::seconds(max_secs),
        }
    }

    /// Check a requested mute end against the window
    ///
    /// `None` is an indefinite mute and always passes.
    pub fn validate(
        &self,
        until: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let Some(until) = until else {
            return Ok(());
        };

        if until <= now || until < now + self.min {
            return Err(DomainError::MuteUntilTooSoon {
                min_minutes: self.min.num_minutes(),
            });
        }
        if until > now + self.max {
            return Err(DomainError::MuteUntilTooFar {
                max_days: self.max.num_days(),
            });
        }
        Ok(())
    }
}
