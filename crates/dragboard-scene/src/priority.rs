use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

static EPOCH: OnceLock<Instant> = OnceLock::new();
static LAST: AtomicU64 = AtomicU64::new(0);

/// Draw and hit-test ordering key: microseconds since process start.
///
/// Larger is "more recently touched": painted later, hit-tested first.
/// Stamps from [`Priority::now`] are strictly increasing across the whole
/// process, so two shapes created in the same clock tick still compare.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Priority(u64);

impl Priority {
    pub fn now() -> Self {
        let epoch = *EPOCH.get_or_init(Instant::now);
        let micros = u64::try_from(epoch.elapsed().as_micros()).unwrap_or(u64::MAX);

        let mut prev = LAST.load(Ordering::Relaxed);
        loop {
            let next = micros.max(prev.saturating_add(1));
            match LAST.compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Relaxed) {
                Ok(_) => return Priority(next),
                Err(actual) => prev = actual,
            }
        }
    }

    #[inline]
    pub const fn as_micros(self) -> u64 {
        self.0
    }
}
