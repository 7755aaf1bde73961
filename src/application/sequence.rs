//! Monotonic fetch tokens used to discard stale feed responses.

use std::sync::atomic::{AtomicU64, Ordering};

/// Issues a strictly increasing token per fetch. A response is applied
/// only when its token is still the newest one issued, so a slow older
/// fetch can never overwrite the result of a newer one.
#[derive(Debug, Default)]
pub struct FetchSequence {
    counter: AtomicU64,
}

impl FetchSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.counter.load(Ordering::SeqCst) == token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_increase_monotonically() {
        let seq = FetchSequence::new();
        let first = seq.begin();
        let second = seq.begin();
        let third = seq.begin();
        assert!(first < second && second < third);
    }

    #[test]
    fn only_the_newest_token_is_current() {
        let seq = FetchSequence::new();
        let stale = seq.begin();
        let fresh = seq.begin();
        assert!(!seq.is_current(stale));
        assert!(seq.is_current(fresh));
    }
}
