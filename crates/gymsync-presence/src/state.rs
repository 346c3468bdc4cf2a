//! Client-side anchor state for the displayed activity timer.

/// What the reconciler remembers between polls.
///
/// `local_start_epoch` approximates when the current activity began. It is
/// derived once per activity (`now - elapsed`) and then held, so the
/// displayed timer runs smoothly instead of being rebuilt from every poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPresenceState {
    pub last_activity_label: Option<String>,
    pub local_start_epoch: Option<i64>,
    pub is_presence_shown: bool,
}

impl ClientPresenceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the anchor for `activity`, re-deriving it only when the label
    /// changed or no anchor exists yet.
    pub fn anchor(&mut self, activity: &str, elapsed_seconds: i64, now_epoch: i64) -> i64 {
        match self.local_start_epoch {
            Some(start) if self.last_activity_label.as_deref() == Some(activity) => start,
            _ => {
                let start = now_epoch - elapsed_seconds;
                self.local_start_epoch = Some(start);
                self.last_activity_label = Some(activity.to_string());
                start
            }
        }
    }

    /// Forget the anchor. Returns whether a presence was shown before.
    pub fn reset(&mut self) -> bool {
        let was_shown = self.is_presence_shown;
        *self = Self::default();
        was_shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_anchors_at_now_minus_elapsed() {
        let mut state = ClientPresenceState::new();
        assert_eq!(state.anchor("running", 30, 1_000), 970);
        assert_eq!(state.last_activity_label.as_deref(), Some("running"));
        assert_eq!(state.local_start_epoch, Some(970));
    }

    #[test]
    fn anchor_is_stable_for_same_label() {
        let mut state = ClientPresenceState::new();
        let first = state.anchor("running", 30, 1_000);
        let second = state.anchor("running", 31, 1_001);
        // A server-side jump in elapsed does not move the anchor either.
        let third = state.anchor("running", 500, 1_002);
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn label_change_recomputes_anchor() {
        let mut state = ClientPresenceState::new();
        state.anchor("running", 30, 1_000);
        let start = state.anchor("cycling", 5, 1_010);
        assert_eq!(start, 1_005);
        assert_eq!(state.last_activity_label.as_deref(), Some("cycling"));
    }

    #[test]
    fn missing_anchor_is_recomputed_even_with_same_label() {
        let mut state = ClientPresenceState {
            last_activity_label: Some("gym".into()),
            local_start_epoch: None,
            is_presence_shown: false,
        };
        assert_eq!(state.anchor("gym", 10, 100), 90);
    }

    #[test]
    fn reset_reports_previous_visibility() {
        let mut state = ClientPresenceState::new();
        state.anchor("gym", 10, 100);
        state.is_presence_shown = true;

        assert!(state.reset());
        assert_eq!(state, ClientPresenceState::default());
        assert!(!state.reset());
    }
}
