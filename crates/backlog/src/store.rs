//! The parked-message store and its replay.

use crate::admission::{check_message, Admission};
use crate::config::BacklogConfig;
use crate::priority::message_priority;
use istanbul_core::{ConsensusEvent, EventBus, RoundState};
use istanbul_messages::{ConsensusMessage, MessageKind};
use istanbul_types::{Address, ValidatorSet, View};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BinaryHeap, HashMap};
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};

/// A parked message with its scheduling key.
#[derive(Debug)]
struct ParkedMessage {
    priority: i64,
    /// Monotonic arrival tick; FIFO tiebreak between equal priorities.
    tick: u64,
    msg: ConsensusMessage,
}

/// Wrapper ordering [`ParkedMessage`] so a `BinaryHeap` pops the highest
/// priority first, FIFO on ties.
#[derive(Debug)]
struct ParkedMessageOrd(ParkedMessage);

impl PartialEq for ParkedMessageOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.priority == other.0.priority && self.0.tick == other.0.tick
    }
}

impl Eq for ParkedMessageOrd {}

impl PartialOrd for ParkedMessageOrd {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParkedMessageOrd {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .priority
            .cmp(&other.0.priority)
            .then_with(|| other.0.tick.cmp(&self.0.tick))
    }
}

/// Queues and counters, guarded together by one mutex.
#[derive(Default)]
struct BacklogInner {
    /// Parked messages partitioned by their view's sequence. The map's key
    /// order doubles as the ascending sequence walk used by replay and
    /// pruning.
    by_seq: BTreeMap<u64, BinaryHeap<ParkedMessageOrd>>,
    /// Parked-message count per sender.
    per_validator: HashMap<Address, usize>,
    /// Parked-message count across all senders.
    total: usize,
    /// Next arrival tick.
    next_tick: u64,
}

impl BacklogInner {
    /// Pop every entry parked for `seq`, decrementing both counters, and
    /// hand entries whose sender is still in the validator set to the
    /// callback in priority order. Deletes the queue.
    fn drain_sequence(
        &mut self,
        seq: u64,
        mut deliver: Option<(&ValidatorSet, &mut dyn FnMut(ConsensusMessage, Address))>,
    ) -> usize {
        let Some(mut queue) = self.by_seq.remove(&seq) else {
            return 0;
        };
        let drained = queue.len();
        while let Some(ParkedMessageOrd(parked)) = queue.pop() {
            let from = parked.msg.address;
            if let Some(count) = self.per_validator.get_mut(&from) {
                *count -= 1;
                if *count == 0 {
                    self.per_validator.remove(&from);
                }
            }
            self.total -= 1;
            if let Some((validators, deliver)) = deliver.as_mut() {
                if validators.get_by_address(&from).is_some() {
                    deliver(parked.msg, from);
                } else {
                    trace!(%from, seq, "sender left the validator set, dropping parked message");
                }
            }
        }
        drained
    }
}

/// Counts reported by [`MessageBacklog::stats`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BacklogStats {
    /// Parked messages across all sequences.
    pub total: usize,
    /// Distinct sequences with a non-empty queue.
    pub sequences: usize,
    /// Distinct senders with at least one parked message.
    pub senders: usize,
}

/// The parked-message store.
///
/// Thread-safe: the network layer stores concurrently with the consensus
/// loop replaying. One mutex covers the queues and both counters; no I/O
/// happens under it, and the bus post never blocks, so holding the lock
/// across a full store or replay is cheap.
pub struct MessageBacklog {
    rounds: Arc<dyn RoundState>,
    bus: EventBus,
    config: BacklogConfig,
    inner: Mutex<BacklogInner>,
}

impl MessageBacklog {
    /// Create a backlog with the default quotas.
    pub fn new(rounds: Arc<dyn RoundState>, bus: EventBus) -> Self {
        Self::with_config(rounds, bus, BacklogConfig::default())
    }

    /// Create a backlog with explicit quotas.
    pub fn with_config(rounds: Arc<dyn RoundState>, bus: EventBus, config: BacklogConfig) -> Self {
        Self {
            rounds,
            bus,
            config,
            inner: Mutex::new(BacklogInner::default()),
        }
    }

    /// Check a (kind, view) pair against the current round.
    pub fn check_message(&self, kind: MessageKind, view: Option<View>) -> Admission {
        check_message(kind, view, &self.rounds.snapshot())
    }

    /// Run admission for an inbound message and route it: admitted
    /// messages go to the event loop, future ones are parked, the rest
    /// are dropped.
    #[instrument(skip(self, msg), fields(from = %msg.address, kind = msg.kind.type_name()))]
    pub fn accept(&self, msg: ConsensusMessage) -> Admission {
        let view = msg.view().ok();
        let outcome = check_message(msg.kind, view, &self.rounds.snapshot());
        match outcome {
            Admission::Admit => {
                let src = msg.address;
                self.bus.post(ConsensusEvent::Message { src, msg });
            }
            Admission::Future => self.store_backlog(msg),
            outcome => {
                trace!(outcome = outcome.type_name(), "dropping message");
            }
        }
        outcome
    }

    /// Park a future-view message.
    ///
    /// Duplicate receipts are parked again and occupy quota slots.
    #[instrument(skip(self, msg), fields(from = %msg.address, kind = msg.kind.type_name()))]
    pub fn store_backlog(&self, msg: ConsensusMessage) {
        if msg.address == self.rounds.own_address() {
            warn!("backlog message from self");
            return;
        }

        // A parked message that cannot name its view is past the bounds of
        // trust; it must not poison the store.
        let view = match msg.view() {
            Ok(view) => view,
            Err(err) => {
                trace!(%err, "dropping backlog message with undecodable payload");
                return;
            }
        };

        let current_sequence = self.rounds.current_view().sequence;
        let mut inner = self.inner.lock();

        let parked_from_sender = inner.per_validator.get(&msg.address).copied().unwrap_or(0);
        if parked_from_sender >= self.config.max_per_validator {
            trace!(seq = view.sequence, "dropping: per-validator backlog cap reached");
            return;
        }
        *inner.per_validator.entry(msg.address).or_insert(0) += 1;
        inner.total += 1;

        let priority = message_priority(msg.kind, &view);
        let tick = inner.next_tick;
        inner.next_tick += 1;
        trace!(
            seq = view.sequence,
            round = view.round,
            priority,
            "parking future message"
        );
        inner
            .by_seq
            .entry(view.sequence)
            .or_default()
            .push(ParkedMessageOrd(ParkedMessage { priority, tick, msg }));

        if inner.total > self.config.max_total {
            self.prune(&mut inner, current_sequence);
        }
    }

    /// Drain whole future-most queues until the global count is back under
    /// the cap with `prune_batch` headroom. The lowest remaining sequence
    /// is never touched: it will be acted on soonest, and the per-validator
    /// caps bound it on their own.
    fn prune(&self, inner: &mut BacklogInner, current_sequence: u64) {
        let floor = self.config.max_total.saturating_sub(self.config.prune_batch);
        let sequences: Vec<u64> = inner.by_seq.keys().copied().collect();
        for &seq in sequences.iter().skip(1).rev() {
            if seq <= current_sequence || inner.total < floor {
                break;
            }
            let dropped = inner.drain_sequence(seq, None);
            debug!(seq, dropped, total = inner.total, "pruned backlog sequence");
        }
    }

    /// Replay the store after a state-machine transition.
    ///
    /// Walks parked sequences in ascending order: sequences behind the
    /// current view are pruned, the current sequence is drained through
    /// the admission predicate with survivors posted to the event loop,
    /// and later sequences keep waiting.
    #[instrument(skip(self))]
    pub fn process_backlog(&self) {
        let snapshot = self.rounds.snapshot();
        let validators = self.rounds.validators();
        let mut inner = self.inner.lock();

        let sequences: Vec<u64> = inner.by_seq.keys().copied().collect();
        for seq in sequences {
            if seq < snapshot.view.sequence {
                let dropped = inner.drain_sequence(seq, None);
                trace!(seq, dropped, "pruned stale backlog sequence");
            } else if seq == snapshot.view.sequence {
                let bus = &self.bus;
                let at = &snapshot;
                let mut replay = |msg: ConsensusMessage, src: Address| {
                    let view = match msg.view() {
                        Ok(view) => view,
                        Err(err) => {
                            debug!(%err, "dropping parked message with undecodable payload");
                            return;
                        }
                    };
                    match check_message(msg.kind, Some(view), at) {
                        Admission::Admit => {
                            trace!(
                                round = view.round,
                                kind = msg.kind.type_name(),
                                "posting backlog event"
                            );
                            bus.post(ConsensusEvent::Backlog { src, msg });
                        }
                        // Replay only delivers what is processable right
                        // now. A message that became future again is
                        // dropped; the peer re-sends.
                        Admission::Future => {
                            warn!(
                                round = view.round,
                                kind = msg.kind.type_name(),
                                "parked message still in the future, dropping"
                            );
                        }
                        outcome => {
                            trace!(outcome = outcome.type_name(), "skipping parked message");
                        }
                    }
                };
                inner.drain_sequence(seq, Some((&validators, &mut replay)));
            } else {
                // Future sequences keep waiting.
                break;
            }
        }
    }

    /// Counts of parked messages, sequences and senders.
    pub fn stats(&self) -> BacklogStats {
        let inner = self.inner.lock();
        BacklogStats {
            total: inner.total,
            sequences: inner.by_seq.len(),
            senders: inner.per_validator.len(),
        }
    }

    /// Whether nothing is parked.
    pub fn is_empty(&self) -> bool {
        self.stats().total == 0
    }
}
