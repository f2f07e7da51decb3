//! Scheduling priority for parked messages.

use istanbul_messages::MessageKind;
use istanbul_types::View;

/// Scheduling priority of a parked message within its sequence's queue.
///
/// Queues pop in descending priority value. `RoundChange` returns `0` and
/// outranks everything; other kinds return `-(round * 10 + weight)`, so
/// within a round the pop order is `Preprepare`, `Commit`, `Prepare` — the
/// order the state machine consumes them in.
///
/// The factor of 10 requires kind weights in `[0, 9]`. The arithmetic
/// saturates so an adversarial round cannot wrap the priority.
pub fn message_priority(kind: MessageKind, view: &View) -> i64 {
    let weight: u64 = match kind {
        // Round changes always jump the queue.
        MessageKind::RoundChange => return 0,
        MessageKind::Preprepare => 1,
        MessageKind::Commit => 2,
        MessageKind::Prepare => 3,
    };

    let magnitude = view.round.saturating_mul(10).saturating_add(weight);
    i64::try_from(magnitude).map_or(i64::MIN, |m| -m)
}
