use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Progress callback receiving (fraction complete, human-readable message).
/// Reports are best-effort and rate-limited by the caller; they carry no
/// result data and a dropped report never affects the computation.
pub type ProgressFn<'a> = dyn Fn(f64, &str) + Sync + 'a;

/// Cooperative cancellation flag, checked between lineup evaluations.
/// Cloning shares the flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; any in-progress run returns `Cancelled` at the
    /// next lineup boundary
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
