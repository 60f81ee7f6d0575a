//! Per-address cooldown windows for one network.
//!
//! An entry is installed before the transfer is attempted, so it doubles as the
//! in-flight lock for its address: a second request sees the address as locked
//! until the first one either completes (entry stays) or is rolled back.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct CooldownBook {
    /// address -> instant before which new requests are rejected.
    entries: HashMap<String, DateTime<Utc>>,
}

impl CooldownBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock `address` for `window` starting at `now`.
    ///
    /// Returns the installed deadline, or the remaining wait if the address is
    /// still cooling down. An expired entry is replaced.
    pub fn reserve(
        &mut self,
        address: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<DateTime<Utc>, Duration> {
        if let Some(next_allowed) = self.entries.get(address) {
            if *next_allowed > now {
                return Err(*next_allowed - now);
            }
            self.entries.remove(address);
        }

        let next_allowed = now
            .checked_add_signed(window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries.insert(address.to_string(), next_allowed);
        Ok(next_allowed)
    }

    /// Remove the entry installed by `reserve` returning `deadline`.
    ///
    /// An entry that was since replaced by another reservation is left alone.
    pub fn release(&mut self, address: &str, deadline: DateTime<Utc>) -> bool {
        if self.entries.get(address) == Some(&deadline) {
            self.entries.remove(address);
            true
        } else {
            false
        }
    }

    pub fn next_allowed(&self, address: &str) -> Option<DateTime<Utc>> {
        self.entries.get(address).copied()
    }

    /// Entries still blocking at `now`.
    pub fn active(&self, now: DateTime<Utc>) -> usize {
        self.entries.values().filter(|t| **t > now).count()
    }

    /// Drop entries that no longer block anything.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, t| *t > now);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Human wait time: whole minutes below two hours, whole hours from there on.
pub fn format_wait(remaining: Duration) -> String {
    let minutes = remaining.num_minutes().max(0);
    if minutes < 120 {
        format!("{} minutes", minutes)
    } else {
        format!("{} hours", minutes / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_reserve_then_blocked() {
        let mut book = CooldownBook::new();
        let window = Duration::seconds(3600);

        let deadline = book.reserve("cosmos1a", t0(), window).unwrap();
        assert_eq!(deadline, t0() + window);

        let remaining = book
            .reserve("cosmos1a", t0() + Duration::seconds(1800), window)
            .unwrap_err();
        assert_eq!(remaining, Duration::seconds(1800));
        // Rejection leaves the original entry untouched.
        assert_eq!(book.next_allowed("cosmos1a"), Some(deadline));
    }

    #[test]
    fn test_expired_entry_is_replaced() {
        let mut book = CooldownBook::new();
        let window = Duration::seconds(3600);
        book.reserve("cosmos1a", t0(), window).unwrap();

        let later = t0() + Duration::seconds(3601);
        let deadline = book.reserve("cosmos1a", later, window).unwrap();
        assert_eq!(deadline, later + window);
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_boundary_is_allowed() {
        let mut book = CooldownBook::new();
        let window = Duration::seconds(60);
        book.reserve("cosmos1a", t0(), window).unwrap();
        assert!(book.reserve("cosmos1a", t0() + window, window).is_ok());
    }

    #[test]
    fn test_release_only_own_entry() {
        let mut book = CooldownBook::new();
        let window = Duration::seconds(10);
        let first = book.reserve("cosmos1a", t0(), window).unwrap();
        let second = book
            .reserve("cosmos1a", t0() + Duration::seconds(20), window)
            .unwrap();

        assert!(!book.release("cosmos1a", first));
        assert_eq!(book.next_allowed("cosmos1a"), Some(second));
        assert!(book.release("cosmos1a", second));
        assert!(book.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let mut book = CooldownBook::new();
        book.reserve("cosmos1a", t0(), Duration::seconds(10)).unwrap();
        book.reserve("cosmos1b", t0(), Duration::seconds(100)).unwrap();

        let now = t0() + Duration::seconds(50);
        assert_eq!(book.active(now), 1);
        assert_eq!(book.purge_expired(now), 1);
        assert!(book.next_allowed("cosmos1b").is_some());
    }

    #[test]
    fn test_format_wait() {
        assert_eq!(format_wait(Duration::seconds(1800)), "30 minutes");
        assert_eq!(format_wait(Duration::seconds(59)), "0 minutes");
        assert_eq!(format_wait(Duration::seconds(119 * 60 + 59)), "119 minutes");
        assert_eq!(format_wait(Duration::minutes(120)), "2 hours");
        assert_eq!(format_wait(Duration::seconds(86_399)), "23 hours");
    }
}
