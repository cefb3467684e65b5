//! Reconciliation of the coin audit log.
//!
//! Replays every entry from a zero balance and checks, per entry:
//!
//! ```text
//! sequence == start + position
//! balance_after == max(0, previous + requested)
//! balance_after == previous + applied
//! ```
//!
//! where `start` is 0, or the sequence of a leading checkpoint left by
//! compaction. Finally the last `balance_after` must equal the live balance. A
//! restored save that was edited by hand is the usual source of anomalies.

use krishi_types::{LedgerEntry, LedgerReason};

use crate::LedgerAnomaly;

/// The result of reconciling a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditResult {
    /// The log replays to the live balance.
    Balanced,
    /// The log and the balance disagree.
    Anomaly(LedgerAnomaly),
}

impl AuditResult {
    /// Whether reconciliation succeeded.
    pub const fn is_balanced(&self) -> bool {
        matches!(self, Self::Balanced)
    }
}

/// Replay `entries` and compare the outcome with `balance`.
pub fn verify_entries(balance: u64, entries: &[LedgerEntry]) -> AuditResult {
    let mut running: i128 = 0;
    let start = entries
        .first()
        .filter(|first| first.reason == LedgerReason::Checkpoint)
        .map_or(0, |first| first.sequence);

    for (position, entry) in entries.iter().enumerate() {
        let expected_sequence = u64::try_from(position)
            .unwrap_or(u64::MAX)
            .saturating_add(start);
        if entry.sequence != expected_sequence {
            return anomaly(
                Some(entry.sequence),
                format!(
                    "sequence gap: entry at position {position} has sequence {}",
                    entry.sequence
                ),
            );
        }

        let clamped = running.saturating_add(i128::from(entry.requested)).max(0);
        let after = i128::from(entry.balance_after);
        if after != clamped {
            return anomaly(
                Some(entry.sequence),
                format!(
                    "entry {} records balance {} but clamped replay gives {clamped}",
                    entry.sequence, entry.balance_after
                ),
            );
        }

        if running.saturating_add(i128::from(entry.applied)) != after {
            return anomaly(
                Some(entry.sequence),
                format!(
                    "entry {} applied delta {} does not match its balance change",
                    entry.sequence, entry.applied
                ),
            );
        }

        running = after;
    }

    if running != i128::from(balance) {
        return anomaly(
            None,
            format!("live balance {balance} does not match replayed balance {running}"),
        );
    }

    AuditResult::Balanced
}

fn anomaly(sequence: Option<u64>, message: String) -> AuditResult {
    AuditResult::Anomaly(LedgerAnomaly { sequence, message })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn entry(sequence: u64, requested: i64, applied: i64, balance_after: u64) -> LedgerEntry {
        LedgerEntry {
            sequence,
            reason: LedgerReason::Harvest,
            requested,
            applied,
            balance_after,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn empty_log_with_zero_balance_is_balanced() {
        assert_eq!(verify_entries(0, &[]), AuditResult::Balanced);
    }

    #[test]
    fn empty_log_with_balance_is_anomaly() {
        assert!(!verify_entries(10, &[]).is_balanced());
    }

    #[test]
    fn clamped_entries_replay_cleanly() {
        let entries = vec![entry(0, 30, 30, 30), entry(1, -100, -30, 0), entry(2, 20, 20, 20)];
        assert_eq!(verify_entries(20, &entries), AuditResult::Balanced);
    }

    #[test]
    fn tampered_balance_is_detected() {
        let entries = vec![entry(0, 1250, 1250, 1250)];
        let result = verify_entries(9999, &entries);
        assert!(matches!(
            result,
            AuditResult::Anomaly(LedgerAnomaly { sequence: None, .. })
        ));
    }

    #[test]
    fn inconsistent_applied_delta_is_detected() {
        let entries = vec![entry(0, 100, 100, 100), entry(1, -150, -150, 0)];
        assert!(matches!(
            verify_entries(0, &entries),
            AuditResult::Anomaly(LedgerAnomaly {
                sequence: Some(1),
                ..
            })
        ));
    }

    #[test]
    fn sequence_gap_is_detected() {
        let entries = vec![entry(0, 10, 10, 10), entry(2, 10, 10, 20)];
        assert!(!verify_entries(20, &entries).is_balanced());
    }

    #[test]
    fn checkpoint_sets_the_starting_sequence() {
        let mut checkpoint = entry(41, 300, 300, 300);
        checkpoint.reason = LedgerReason::Checkpoint;
        let entries = vec![checkpoint, entry(42, 20, 20, 320)];
        assert_eq!(verify_entries(320, &entries), AuditResult::Balanced);
    }

    #[test]
    fn late_start_without_checkpoint_is_anomaly() {
        let entries = vec![entry(41, 300, 300, 300)];
        assert!(!verify_entries(300, &entries).is_balanced());
    }
}
