//! Transient status messages.
//!
//! The taskpane has two message areas, one under the form and one above the
//! list. Posting to an area replaces whatever it showed. Messages disappear
//! on their own: successes after a short delay, errors after a longer one.

use chrono::{DateTime, Duration, Utc};

use crate::config::MessageConfig;

/// Which message area a status belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusChannel {
    Form,
    List,
}

/// Severity of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Info,
    Error,
}

/// A message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub channel: StatusChannel,
    pub kind: StatusKind,
    pub text: String,
    pub shown_at: DateTime<Utc>,
    pub visible_for: Duration,
}

impl StatusMessage {
    /// Check if the message should no longer be shown
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.shown_at) >= self.visible_for
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

/// Saturates instead of wrapping for values past `i64::MAX` or chrono's range
fn millis(ms: u64) -> Duration {
    i64::try_from(ms)
        .ok()
        .and_then(Duration::try_milliseconds)
        .unwrap_or(Duration::MAX)
}

/// The two message areas and their auto-dismiss timings
#[derive(Debug, Clone)]
pub struct StatusBoard {
    messages: Vec<StatusMessage>,
    success_for: Duration,
    error_for: Duration,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new(&MessageConfig::default())
    }
}

impl StatusBoard {
    pub fn new(config: &MessageConfig) -> Self {
        Self {
            messages: Vec::new(),
            success_for: millis(config.success_ms),
            error_for: millis(config.error_ms),
        }
    }

    /// Show a message, replacing the one already in that area
    pub fn post(&mut self, channel: StatusChannel, kind: StatusKind, text: impl Into<String>) {
        self.post_at(channel, kind, text, Utc::now());
    }

    pub(crate) fn post_at(
        &mut self,
        channel: StatusChannel,
        kind: StatusKind,
        text: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        let visible_for = match kind {
            StatusKind::Success => self.success_for,
            StatusKind::Info | StatusKind::Error => self.error_for,
        };

        self.messages.retain(|m| m.channel != channel);
        self.messages.push(StatusMessage {
            channel,
            kind,
            text: text.into(),
            shown_at: now,
            visible_for,
        });
    }

    /// Message currently shown in an area, if any
    pub fn current(&self, channel: StatusChannel) -> Option<&StatusMessage> {
        self.messages.iter().find(|m| m.channel == channel)
    }

    /// Hide an area
    pub fn dismiss(&mut self, channel: StatusChannel) {
        self.messages.retain(|m| m.channel != channel);
    }

    /// Drop every message whose time is up
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.messages.len();
        self.messages.retain(|m| !m.is_expired(now));
        before - self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_replaces_same_channel() {
        let mut board = StatusBoard::default();
        board.post(StatusChannel::List, StatusKind::Error, "first");
        board.post(StatusChannel::List, StatusKind::Success, "second");
        board.post(StatusChannel::Form, StatusKind::Success, "form");

        assert_eq!(board.current(StatusChannel::List).unwrap().text, "second");
        assert_eq!(board.current(StatusChannel::Form).unwrap().text, "form");
    }

    #[test]
    fn test_errors_stay_longer() {
        let mut board = StatusBoard::default();
        let now = Utc::now();
        board.post_at(StatusChannel::Form, StatusKind::Success, "saved", now);
        board.post_at(StatusChannel::List, StatusKind::Error, "failed", now);

        assert_eq!(board.prune(now + Duration::milliseconds(2999)), 0);
        assert_eq!(board.prune(now + Duration::milliseconds(3000)), 1);
        assert!(board.current(StatusChannel::List).is_some());

        assert_eq!(board.prune(now + Duration::milliseconds(5000)), 1);
        assert!(board.is_empty());
    }

    #[test]
    fn test_huge_timeout_never_expires() {
        let config = MessageConfig {
            success_ms: u64::MAX,
            error_ms: 5000,
        };
        let mut board = StatusBoard::new(&config);
        let now = Utc::now();
        board.post_at(StatusChannel::Form, StatusKind::Success, "saved", now);

        let message = board.current(StatusChannel::Form).unwrap();
        assert!(message.visible_for > Duration::zero());
        assert_eq!(board.prune(now + Duration::days(365)), 0);
    }

    #[test]
    fn test_dismiss() {
        let mut board = StatusBoard::default();
        board.post(StatusChannel::Form, StatusKind::Info, "note");
        board.dismiss(StatusChannel::Form);
        assert!(board.current(StatusChannel::Form).is_none());
    }
}
