use crate::core::models::ids::ComponentId;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeLevel::Info => write!(f, "info"),
            NoticeLevel::Success => write!(f, "success"),
            NoticeLevel::Error => write!(f, "error"),
        }
    }
}

/// A transient message for the user, optionally pointing at a rejected pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub invalid_link: Option<(ComponentId, ComponentId)>,
    pub posted_at: Instant,
}

impl Notice {
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.posted_at) >= ttl
    }
}

/// Pull-based message queue; callers decide when "now" is.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    ttl: Duration,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            notices: Vec::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn post(&mut self, level: NoticeLevel, message: impl Into<String>, now: Instant) {
        self.notices.push(Notice {
            level,
            message: message.into(),
            invalid_link: None,
            posted_at: now,
        });
    }

    /// Posts an error that also marks the pair `(a, b)` as an invalid connection attempt.
    pub fn post_invalid_link(
        &mut self,
        a: ComponentId,
        b: ComponentId,
        message: impl Into<String>,
        now: Instant,
    ) {
        self.notices.push(Notice {
            level: NoticeLevel::Error,
            message: message.into(),
            invalid_link: Some((a, b)),
            posted_at: now,
        });
    }

    /// Notices still visible at `now`, oldest first.
    pub fn active(&self, now: Instant) -> Vec<&Notice> {
        self.notices
            .iter()
            .filter(|notice| !notice.is_expired(now, self.ttl))
            .collect()
    }

    /// Drops expired notices and returns how many were removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.notices.len();
        let ttl = self.ttl;
        self.notices.retain(|notice| !notice.is_expired(now, ttl));
        before - self.notices.len()
    }

    pub fn clear(&mut self) {
        self.notices.clear();
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
