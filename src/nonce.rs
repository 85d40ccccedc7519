use std::sync::atomic::{AtomicU64, Ordering};

use log::warn;

use crate::{consts::NONCE_STALENESS_MS, helpers::now_timestamp_ms};

/// Per-session nonce source.
///
/// Seeded with the wall clock in milliseconds and bumped by one per request. Each exchange
/// session owns its own manager, so two accounts in one process never share a counter.
#[derive(Debug)]
pub struct NonceManager {
    counter: AtomicU64,
}

impl NonceManager {
    pub fn new() -> Self {
        Self::starting_at(now_timestamp_ms())
    }

    pub fn starting_at(start: u64) -> Self {
        Self {
            counter: AtomicU64::new(start),
        }
    }

    /// Returns the next nonce, unique and strictly increasing for this manager.
    ///
    /// When the returned value has fallen more than five minutes behind the wall clock, the
    /// counter is moved up to the current time for the calls that follow. The stale value is
    /// still returned for this call.
    pub fn next_nonce(&self) -> u64 {
        let nonce = self.counter.fetch_add(1, Ordering::SeqCst).wrapping_add(1);
        let now_ms = now_timestamp_ms();
        if nonce.saturating_add(NONCE_STALENESS_MS) < now_ms {
            warn!("nonce {nonce} is more than {NONCE_STALENESS_MS}ms behind {now_ms}, resetting");
            // fetch_max so a racing reset can never move the counter backwards
            self.counter.fetch_max(now_ms, Ordering::SeqCst);
        }
        nonce
    }

    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

impl Default for NonceManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashSet, sync::Arc, thread};

    #[test]
    fn sequential_nonces_strictly_increase() {
        let nonces = NonceManager::new();
        let mut last = nonces.next_nonce();
        for _ in 0..10_000 {
            let next = nonces.next_nonce();
            assert!(next > last);
            last = next;
        }
    }

    #[test]
    fn seeded_from_wall_clock() {
        let before = now_timestamp_ms();
        let nonces = NonceManager::new();
        let after = now_timestamp_ms();
        assert!(nonces.current() >= before && nonces.current() <= after);
        assert_eq!(nonces.next_nonce(), nonces.current());
    }

    #[test]
    fn concurrent_nonces_are_unique() {
        let nonces = Arc::new(NonceManager::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let nonces = nonces.clone();
                thread::spawn(move || (0..1_000).map(|_| nonces.next_nonce()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for nonce in handle.join().unwrap() {
                assert!(seen.insert(nonce), "duplicate nonce {nonce}");
            }
        }
        assert_eq!(seen.len(), 8_000);
    }

    #[test]
    fn stale_nonce_returned_once_then_jumps_forward() {
        let start = now_timestamp_ms() - 2 * NONCE_STALENESS_MS;
        let nonces = NonceManager::starting_at(start);

        let stale = nonces.next_nonce();
        assert_eq!(stale, start + 1);

        let fresh = nonces.next_nonce();
        assert!(fresh >= stale + 2 * NONCE_STALENESS_MS);
        assert!(fresh > stale);
    }

    #[test]
    fn nonce_ahead_of_clock_is_not_reset() {
        let start = now_timestamp_ms() + 60_000;
        let nonces = NonceManager::starting_at(start);
        assert_eq!(nonces.next_nonce(), start + 1);
        assert_eq!(nonces.next_nonce(), start + 2);
    }

    #[test]
    fn sessions_do_not_share_counters() {
        let start = now_timestamp_ms();
        let a = NonceManager::starting_at(start);
        let b = NonceManager::starting_at(start);
        a.next_nonce();
        a.next_nonce();
        assert_eq!(a.current(), start + 2);
        assert_eq!(b.current(), start);
    }
}
