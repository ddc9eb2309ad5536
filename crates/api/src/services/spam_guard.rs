//! Per-sender spam guard for inbound webhook messages.
//!
//! Keeps a sliding window of message timestamps per (tenant, sender) pair
//! and rejects messages over the tenant's configured limit. State is
//! in-memory; a restart clears it, which is acceptable for a guard whose
//! windows are measured in seconds.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use uuid::Uuid;

/// Default window applied when a tenant sets a limit but no window.
pub const DEFAULT_WINDOW_SECS: u64 = 60;

/// Every this many checks, stale sender entries are swept from the map.
const SWEEP_EVERY: u64 = 1024;

/// Timestamps for one sender, plus the window they were recorded under.
///
/// The window is kept per entry so the sweep can judge staleness against
/// the tenant's own configuration instead of a global constant.
struct SenderWindow {
    timestamps: VecDeque<Instant>,
    window: Duration,
}

#[derive(Default)]
pub struct SpamGuard {
    windows: Mutex<HashMap<(Uuid, String), SenderWindow>>,
    checks: AtomicU64,
}

impl SpamGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one message from `sender` and report whether it is allowed.
    ///
    /// `limit` is the maximum number of messages permitted within `window`.
    /// A limit of zero disables the guard. Every `SWEEP_EVERY` checks the
    /// whole map is swept for senders that went quiet, so the map stays
    /// proportional to recently active senders rather than every sender
    /// ever seen.
    pub fn check(&self, tenant_id: Uuid, sender: &str, limit: u32, window: Duration) -> bool {
        if limit == 0 {
            return true;
        }

        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap();

        if self.checks.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            evict(&mut windows, now);
        }

        let entry = windows
            .entry((tenant_id, sender.to_string()))
            .or_insert_with(|| SenderWindow {
                timestamps: VecDeque::new(),
                window,
            });
        entry.window = window;

        while let Some(front) = entry.timestamps.front() {
            if now.duration_since(*front) > window {
                entry.timestamps.pop_front();
            } else {
                break;
            }
        }

        if entry.timestamps.len() >= limit as usize {
            return false;
        }

        entry.timestamps.push_back(now);
        true
    }

    /// Drop senders whose newest timestamp has aged out of their window.
    pub fn evict_stale(&self) {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap();
        evict(&mut windows, now);
    }
}

fn evict(windows: &mut HashMap<(Uuid, String), SenderWindow>, now: Instant) {
    windows.retain(|_, entry| {
        entry
            .timestamps
            .back()
            .map(|t| now.duration_since(*t) <= entry.window)
            .unwrap_or(false)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_disables_guard() {
        let guard = SpamGuard::new();
        let tenant = Uuid::new_v4();
        for _ in 0..100 {
            assert!(guard.check(tenant, "905551112233", 0, Duration::from_secs(60)));
        }
    }

    #[test]
    fn test_limit_enforced_within_window() {
        let guard = SpamGuard::new();
        let tenant = Uuid::new_v4();

        assert!(guard.check(tenant, "905551112233", 3, Duration::from_secs(60)));
        assert!(guard.check(tenant, "905551112233", 3, Duration::from_secs(60)));
        assert!(guard.check(tenant, "905551112233", 3, Duration::from_secs(60)));
        assert!(!guard.check(tenant, "905551112233", 3, Duration::from_secs(60)));
    }

    #[test]
    fn test_senders_are_independent() {
        let guard = SpamGuard::new();
        let tenant = Uuid::new_v4();

        assert!(guard.check(tenant, "a", 1, Duration::from_secs(60)));
        assert!(!guard.check(tenant, "a", 1, Duration::from_secs(60)));
        assert!(guard.check(tenant, "b", 1, Duration::from_secs(60)));
    }

    #[test]
    fn test_tenants_are_independent() {
        let guard = SpamGuard::new();
        let tenant_a = Uuid::new_v4();
        let tenant_b = Uuid::new_v4();

        assert!(guard.check(tenant_a, "a", 1, Duration::from_secs(60)));
        assert!(!guard.check(tenant_a, "a", 1, Duration::from_secs(60)));
        assert!(guard.check(tenant_b, "a", 1, Duration::from_secs(60)));
    }

    #[test]
    fn test_window_expiry_readmits_sender() {
        let guard = SpamGuard::new();
        let tenant = Uuid::new_v4();

        assert!(guard.check(tenant, "a", 1, Duration::from_millis(10)));
        assert!(!guard.check(tenant, "a", 1, Duration::from_millis(10)));

        std::thread::sleep(Duration::from_millis(20));
        assert!(guard.check(tenant, "a", 1, Duration::from_millis(10)));
    }

    #[test]
    fn test_evict_stale_removes_quiet_senders() {
        let guard = SpamGuard::new();
        let tenant = Uuid::new_v4();

        guard.check(tenant, "a", 5, Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(20));
        guard.evict_stale();

        assert!(guard.windows.lock().unwrap().is_empty());
    }

    #[test]
    fn test_evict_stale_keeps_active_senders() {
        let guard = SpamGuard::new();
        let tenant = Uuid::new_v4();

        guard.check(tenant, "quiet", 5, Duration::from_millis(10));
        guard.check(tenant, "active", 5, Duration::from_secs(60));
        std::thread::sleep(Duration::from_millis(20));
        guard.evict_stale();

        let windows = guard.windows.lock().unwrap();
        assert_eq!(windows.len(), 1);
        assert!(windows.contains_key(&(tenant, "active".to_string())));
    }

    #[test]
    fn test_checks_sweep_quiet_senders_eventually() {
        let guard = SpamGuard::new();
        let tenant = Uuid::new_v4();

        guard.check(tenant, "quiet", 5, Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(20));

        // Traffic from other senders triggers the periodic sweep; no one
        // ever has to mention the quiet sender again for it to be dropped.
        for i in 0..SWEEP_EVERY {
            guard.check(tenant, &format!("sender-{i}"), 5, Duration::from_secs(60));
        }

        assert!(!guard
            .windows
            .lock()
            .unwrap()
            .contains_key(&(tenant, "quiet".to_string())));
    }
}
