//! Backlog quota configuration.

/// Quotas bounding the parked-message store under adversarial peers.
///
/// The defaults are the protocol's reference values; shrinking them is
/// mainly useful in tests and memory-constrained deployments.
#[derive(Debug, Clone)]
pub struct BacklogConfig {
    /// Cap on parked messages from a single validator.
    pub max_per_validator: usize,
    /// Soft cap on parked messages across all validators; crossing it
    /// triggers a pruning pass.
    pub max_total: usize,
    /// How far below `max_total` a pruning pass drives the global count
    /// before stopping.
    pub prune_batch: usize,
}

impl Default for BacklogConfig {
    fn default() -> Self {
        Self {
            max_per_validator: 1000,
            max_total: 10_000,
            prune_batch: 100,
        }
    }
}
