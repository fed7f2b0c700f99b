//! Participant entity - membership of a user in a chat with that user's own flags

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Maximum number of chats a single user may have pinned at once
pub const MAX_PINNED_CHATS: usize = 10;

/// Per-user chat flags
///
/// Every participant owns an independent copy; changing one user's state
/// never touches another participant's view of the same chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParticipantState {
    pub archived: bool,
    pub muted: bool,
    /// `None` while muted means an indefinite mute
    pub muted_until: Option<DateTime<Utc>>,
    pub pinned: bool,
}

impl ParticipantState {
    /// Whether the chat is muted for this user at `now`
    #[inline]
    #[must_use]
    pub fn is_effectively_muted(&self, now: DateTime<Utc>) -> bool {
        is_effectively_muted(self, now)
    }

    /// The state as a reader at `now` should observe it
    ///
    /// An elapsed mute is reported as unmuted. The stored row is left alone;
    /// only an explicit unmute clears it.
    #[must_use]
    pub fn effective(&self, now: DateTime<Utc>) -> Self {
        if self.muted && !self.is_effectively_muted(now) {
            Self {
                muted: false,
                muted_until: None,
                ..*self
            }
        } else {
            *self
        }
    }
}

/// `muted && (muted_until is None || muted_until > now)`
#[must_use]
pub fn is_effectively_muted(state: &ParticipantState, now: DateTime<Utc>) -> bool {
    state.muted && state.muted_until.map_or(true, |until| until > now)
}

/// One of the independent per-user flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateFlag {
    Archived,
    Muted,
    Pinned,
}

/// Participant entity (chat <-> user edge)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub chat_id: Snowflake,
    pub user_id: Snowflake,
    pub joined_at: DateTime<Utc>,
    pub state: ParticipantState,
}

impl Participant {
    /// Create a new participant with all flags cleared
    pub fn new(chat_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            chat_id,
            user_id,
            joined_at: Utc::now(),
            state: ParticipantState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_participant_has_clear_flags() {
        let p = Participant::new(Snowflake::new(1), Snowflake::new(2));
        assert_eq!(p.state, ParticipantState::default());
        assert!(!p.state.is_effectively_muted(Utc::now()));
    }

    #[test]
    fn test_indefinite_mute() {
        let state = ParticipantState {
            muted: true,
            ..Default::default()
        };
        let far_future = Utc::now() + Duration::days(3650);
        assert!(is_effectively_muted(&state, far_future));
    }

    #[test]
    fn test_timed_mute_expires() {
        let now = Utc::now();
        let state = ParticipantState {
            muted: true,
            muted_until: Some(now + Duration::hours(8)),
            ..Default::default()
        };
        assert!(state.is_effectively_muted(now));
        assert!(state.is_effectively_muted(now + Duration::hours(7)));
        assert!(!state.is_effectively_muted(now + Duration::hours(8)));
        assert!(!state.is_effectively_muted(now + Duration::hours(9)));
    }

    #[test]
    fn test_until_without_muted_flag_is_not_muted() {
        let now = Utc::now();
        let state = ParticipantState {
            muted: false,
            muted_until: Some(now + Duration::hours(2)),
            ..Default::default()
        };
        assert!(!state.is_effectively_muted(now));
    }

    #[test]
    fn test_effective_view_clears_elapsed_mute_only() {
        let now = Utc::now();
        let state = ParticipantState {
            archived: true,
            muted: true,
            muted_until: Some(now - Duration::minutes(1)),
            pinned: true,
        };
        let view = state.effective(now);
        assert!(!view.muted);
        assert_eq!(view.muted_until, None);
        assert!(view.archived);
        assert!(view.pinned);
        // stored value untouched
        assert!(state.muted);
    }
}
