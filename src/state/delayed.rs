//! Delayed, name-based ban confirmation.
//!
//! A ban request arrives keyed by display name because no identity is known
//! yet. Each request is a small state machine:
//!
//! ```text
//! ┌─────────────────────────┐  identity update with   ┌────────────────────┐
//! │ Pending(name, submitted)├────matching name───────►│ Resolved(identity) │
//! └───────────┬─────────────┘                         └────────────────────┘
//!             │ expiry window elapses
//!             ▼
//!       ┌──────────┐
//!       │ Expired  │
//!       └──────────┘
//! ```
//!
//! Resolution is a broadcast: every pending entry sharing the name resolves
//! against the same identity, since the system cannot tell which request the
//! update was meant for. Expired entries are dropped and reported, never
//! retried.

use chrono::{DateTime, Duration, Utc};
use warden_console::PlayerId;

use super::marks::MarkType;

/// A name-keyed pending action awaiting identity resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayedBan {
    pub name: String,
    pub submitted_at: DateTime<Utc>,
    /// The mark to apply once an identity is confirmed.
    pub mark: MarkType,
}

/// Terminal transition of one pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BanResolution {
    /// An identity-bearing update matched the pending name exactly.
    Confirmed { ban: DelayedBan, identity: PlayerId },
    /// The expiry window elapsed with no matching update.
    Expired(DelayedBan),
}

/// Queue of pending requests plus the expiry policy.
#[derive(Debug)]
pub struct DelayedBanQueue {
    pending: Vec<DelayedBan>,
    expiry: Duration,
}

impl DelayedBanQueue {
    /// `expiry` bounds how long a request may stay pending.
    pub fn new(expiry: Duration) -> Self {
        Self {
            pending: Vec::new(),
            expiry,
        }
    }

    /// Enqueue a request. Duplicate names are allowed; they will all resolve
    /// together.
    pub fn submit(&mut self, name: impl Into<String>, mark: MarkType, now: DateTime<Utc>) {
        self.pending.push(DelayedBan {
            name: name.into(),
            submitted_at: now,
            mark,
        });
    }

    /// Broadcast-resolve every pending entry whose name matches exactly.
    pub fn resolve(&mut self, name: &str, identity: PlayerId) -> Vec<BanResolution> {
        let mut resolved = Vec::new();
        self.pending.retain(|ban| {
            if ban.name == name {
                resolved.push(BanResolution::Confirmed {
                    ban: ban.clone(),
                    identity,
                });
                false
            } else {
                true
            }
        });
        resolved
    }

    /// Expire entries whose window has elapsed as of `now`.
    pub fn expire(&mut self, now: DateTime<Utc>) -> Vec<BanResolution> {
        let cutoff = now - self.expiry;
        let mut expired = Vec::new();
        self.pending.retain(|ban| {
            if ban.submitted_at <= cutoff {
                expired.push(BanResolution::Expired(ban.clone()));
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> DelayedBanQueue {
        DelayedBanQueue::new(Duration::seconds(30))
    }

    #[test]
    fn resolves_on_exact_name_match() {
        let mut q = queue();
        let now = Utc::now();
        let id = PlayerId::from_account_id(42);

        q.submit("Foo", MarkType::Cheater, now);
        let resolutions = q.resolve("Foo", id);

        assert_eq!(resolutions.len(), 1);
        assert!(matches!(
            &resolutions[0],
            BanResolution::Confirmed { identity, ban } if *identity == id && ban.mark == MarkType::Cheater
        ));
        assert!(q.is_empty());
    }

    #[test]
    fn resolution_requires_exact_name() {
        let mut q = queue();
        q.submit("Foo", MarkType::Cheater, Utc::now());

        assert!(q.resolve("foo", PlayerId::from_account_id(1)).is_empty());
        assert!(q.resolve("Foo ", PlayerId::from_account_id(1)).is_empty());
        assert_eq!(q.pending_count(), 1);
    }

    #[test]
    fn shared_names_resolve_together() {
        let mut q = queue();
        let now = Utc::now();
        let id = PlayerId::from_account_id(7);

        q.submit("Foo", MarkType::Cheater, now);
        q.submit("Foo", MarkType::Suspicious, now);
        q.submit("Bar", MarkType::Cheater, now);

        let resolutions = q.resolve("Foo", id);
        assert_eq!(resolutions.len(), 2);
        assert_eq!(q.pending_count(), 1);
    }

    #[test]
    fn expires_after_window_and_never_retries() {
        let mut q = queue();
        let submitted = Utc::now();
        q.submit("Foo", MarkType::Cheater, submitted);

        // Inside the window: nothing expires.
        assert!(q.expire(submitted + Duration::seconds(29)).is_empty());
        assert_eq!(q.pending_count(), 1);

        let expired = q.expire(submitted + Duration::seconds(31));
        assert_eq!(expired.len(), 1);
        assert!(matches!(&expired[0], BanResolution::Expired(ban) if ban.name == "Foo"));
        assert!(q.is_empty());

        // An identity update arriving late finds nothing to resolve.
        assert!(q.resolve("Foo", PlayerId::from_account_id(1)).is_empty());
    }

    #[test]
    fn expired_entry_yields_no_confirmation() {
        let mut q = queue();
        let submitted = Utc::now();
        q.submit("Foo", MarkType::Cheater, submitted);

        let expired = q.expire(submitted + Duration::seconds(60));
        assert_eq!(expired.len(), 1);
        assert!(expired
            .iter()
            .all(|r| matches!(r, BanResolution::Expired(_))));
    }
}
