//! Current target and last-seen candidate.

use parking_lot::Mutex;

use coderelay_protocols::Candidate;

/// Outcome of [`TargetRegistry::consider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consideration {
    /// Same as the last candidate seen; nothing changed.
    Noop,
    /// The candidate is now the target.
    Promoted,
}

#[derive(Debug, Default)]
struct RegistryInner {
    last_candidate: Option<Candidate>,
    target: Option<Candidate>,
    promotions: u64,
}

/// Holds at most one target.
///
/// Deduplication compares against the last candidate seen, not the target,
/// so a candidate only promotes when the source actually changed. Reads and
/// promotions share one lock, so readers never see a half-applied update.
#[derive(Debug, Default)]
pub struct TargetRegistry {
    inner: Mutex<RegistryInner>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn consider(&self, candidate: &Candidate) -> Consideration {
        let mut inner = self.inner.lock();
        if inner.last_candidate.as_ref() == Some(candidate) {
            return Consideration::Noop;
        }
        inner.last_candidate = Some(candidate.clone());
        inner.target = Some(candidate.clone());
        inner.promotions += 1;
        Consideration::Promoted
    }

    /// The target being submitted, if any.
    pub fn current(&self) -> Option<Candidate> {
        self.inner.lock().target.clone()
    }

    pub fn last_candidate(&self) -> Option<Candidate> {
        self.inner.lock().last_candidate.clone()
    }

    pub fn promotions(&self) -> u64 {
        self.inner.lock().promotions
    }

    /// Forget target, last candidate and the promotion count.
    pub fn clear(&self) {
        *self.inner.lock() = RegistryInner::default();
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
