//! Transient UI notices.
//!
//! DESIGN
//! ======
//! Errors from background calls become short-lived notices rather than
//! inline page state. Authentication failures are never shown here: the
//! session is already cleared and the route guard's redirect to the login
//! page is the user-visible effect.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use evalboard::ApiError;

/// Notices kept at once; the oldest is dropped first.
const MAX_NOTICES: usize = 3;

const INFO_LIFETIME_MS: u32 = 4_000;
const ERROR_LIFETIME_MS: u32 = 8_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

impl NoticeLevel {
    /// How long a notice stays up before it dismisses itself.
    pub fn lifetime_ms(self) -> u32 {
        match self {
            Self::Info => INFO_LIFETIME_MS,
            Self::Error => ERROR_LIFETIME_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub notices: Vec<Notice>,
    next_notice_id: u64,
}

impl UiState {
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        self.next_notice_id += 1;
        let id = self.next_notice_id;
        self.notices.push(Notice { id, level, message: message.into() });
        if self.notices.len() > MAX_NOTICES {
            let excess = self.notices.len() - MAX_NOTICES;
            self.notices.drain(..excess);
        }
        id
    }

    pub fn push_info(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Info, message)
    }

    /// Surface a failed call. Returns `None` for authentication failures.
    pub fn report(&mut self, error: &ApiError) -> Option<u64> {
        if error.is_authentication() {
            return None;
        }
        Some(self.push(NoticeLevel::Error, error.user_message()))
    }

    pub fn dismiss(&mut self, id: u64) {
        self.notices.retain(|notice| notice.id != id);
    }
}
