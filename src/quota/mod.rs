use thiserror::Error;

use crate::session::SessionState;

pub const DEFAULT_PAGEVIEW_LIMIT: u32 = 3;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Maximum pageview limit reached")]
pub struct QuotaExceeded;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Rejected,
}

impl Decision {
    pub fn into_result(self) -> Result<(), QuotaExceeded> {
        match self {
            Decision::Allowed => Ok(()),
            Decision::Rejected => Err(QuotaExceeded),
        }
    }
}

/// Per-session cap on article-detail views.
///
/// Callers must hold the session's lock across the whole [`consume`] call.
///
/// [`consume`]: PageviewQuota::consume
#[derive(Debug, Clone, Copy)]
pub struct PageviewQuota {
    limit: u32,
}

impl Default for PageviewQuota {
    fn default() -> Self {
        Self::new(DEFAULT_PAGEVIEW_LIMIT)
    }
}

impl PageviewQuota {
    pub fn new(limit: u32) -> Self {
        Self { limit }
    }

    /// Counts one detail view against `session`.
    ///
    /// An unset counter is a first view: it is seeded to `limit - 1` and the
    /// view is always allowed, whatever the limit. After that the stored value
    /// drops by one on every call, and the view is allowed only if the value
    /// read was still positive.
    pub fn consume(&self, session: &mut SessionState) -> Decision {
        let (next, decision) = match session.pageviews_remaining {
            None => (i64::from(self.limit) - 1, Decision::Allowed),
            Some(remaining) if remaining > 0 => (remaining - 1, Decision::Allowed),
            Some(remaining) => (remaining.saturating_sub(1), Decision::Rejected),
        };

        session.pageviews_remaining = Some(next);
        decision
    }
}
