//! The coin ledger: a clamped balance with an append-only audit log.
//!
//! # Design
//!
//! - **Single funnel**: credit, debit, and strict debit all go through
//!   [`Ledger::apply_delta`] (or its strict check first).
//! - **Clamped**: the balance never goes below zero; the clamped difference
//!   shows up as `requested != applied` on the entry.
//! - **Append-only**: entries are never modified. [`Ledger::compact`] may
//!   drop the oldest ones, leaving a [`LedgerReason::Checkpoint`] entry that
//!   carries their net balance forward under the last dropped sequence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use krishi_types::{LedgerEntry, LedgerReason};

use crate::LedgerError;
use crate::audit::{AuditResult, verify_entries};

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// The farm's coin balance and its audit trail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Current balance. Never negative.
    balance: u64,
    /// All entries, in insertion order.
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// Create an empty ledger with a zero balance.
    pub const fn new() -> Self {
        Self {
            balance: 0,
            entries: Vec::new(),
        }
    }

    /// Create a ledger whose first entry credits the opening balance.
    pub fn with_opening_balance(amount: u64, at: DateTime<Utc>) -> Self {
        let mut ledger = Self::new();
        ledger.credit(LedgerReason::OpeningBalance, amount, at);
        ledger
    }

    /// Current coin balance.
    pub const fn balance(&self) -> u64 {
        self.balance
    }

    /// Return the number of entries in the ledger.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether the ledger has no entries.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return all entries, in insertion order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Return the most recent entry.
    pub fn last_entry(&self) -> Option<&LedgerEntry> {
        self.entries.last()
    }

    /// Apply a signed delta, clamping the balance at zero.
    ///
    /// Always succeeds and always appends an entry, even when the clamp
    /// absorbs the whole delta.
    pub fn apply_delta(&mut self, reason: LedgerReason, requested: i64, at: DateTime<Utc>) -> LedgerEntry {
        let before = self.balance;
        let after = if requested >= 0 {
            before.saturating_add(requested.unsigned_abs())
        } else {
            before.saturating_sub(requested.unsigned_abs())
        };
        let applied = signed_difference(before, after);

        let sequence = self
            .entries
            .last()
            .map_or(0, |last| last.sequence.saturating_add(1));
        let entry = LedgerEntry {
            sequence,
            reason,
            requested,
            applied,
            balance_after: after,
            recorded_at: at,
        };

        self.balance = after;
        self.entries.push(entry.clone());

        debug!(
            ?reason,
            requested,
            applied,
            balance = after,
            "ledger entry recorded"
        );

        entry
    }

    /// Add coins.
    pub fn credit(&mut self, reason: LedgerReason, amount: u64, at: DateTime<Utc>) -> LedgerEntry {
        self.apply_delta(reason, i64::try_from(amount).unwrap_or(i64::MAX), at)
    }

    /// Remove coins, clamping at zero.
    pub fn debit(&mut self, reason: LedgerReason, amount: u64, at: DateTime<Utc>) -> LedgerEntry {
        let requested = i64::try_from(amount).map_or(i64::MIN, i64::saturating_neg);
        self.apply_delta(reason, requested, at)
    }

    /// Remove coins only if the balance covers the full amount.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] when `amount` exceeds the
    /// balance. The ledger is unchanged in that case.
    pub fn try_debit(
        &mut self,
        reason: LedgerReason,
        amount: u64,
        at: DateTime<Utc>,
    ) -> Result<LedgerEntry, LedgerError> {
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        Ok(self.debit(reason, amount, at))
    }

    /// Reconcile the audit log against the balance.
    pub fn verify(&self) -> AuditResult {
        verify_entries(self.balance, &self.entries)
    }

    /// Fold the oldest entries into one checkpoint so that at most `retain`
    /// entries remain, the checkpoint included.
    ///
    /// Returns how many entries were dropped. The balance and the sequence
    /// numbers of kept entries do not change.
    pub fn compact(&mut self, retain: usize) -> usize {
        let retain = retain.max(2);
        if self.entries.len() <= retain {
            return 0;
        }
        let folded = self.entries.len().saturating_sub(retain).saturating_add(1);
        let Some(last_folded) = self.entries.drain(..folded).next_back() else {
            return 0;
        };

        let carried = last_folded.balance_after;
        let amount = i64::try_from(carried).unwrap_or(i64::MAX);
        let checkpoint = LedgerEntry {
            sequence: last_folded.sequence,
            reason: LedgerReason::Checkpoint,
            requested: amount,
            applied: amount,
            balance_after: carried,
            recorded_at: last_folded.recorded_at,
        };
        self.entries.insert(0, checkpoint);

        debug!(folded, carried, "ledger compacted");
        folded
    }
}

/// `after - before` as a signed value, saturating at the `i64` range.
fn signed_difference(before: u64, after: u64) -> i64 {
    if after >= before {
        i64::try_from(after.saturating_sub(before)).unwrap_or(i64::MAX)
    } else {
        i64::try_from(before.saturating_sub(after)).map_or(i64::MIN, i64::saturating_neg)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn new_ledger_is_empty() {
        let ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.len(), 0);
        assert_eq!(ledger.balance(), 0);
    }

    #[test]
    fn opening_balance_is_recorded() {
        let ledger = Ledger::with_opening_balance(1250, Utc::now());
        assert_eq!(ledger.balance(), 1250);
        assert_eq!(ledger.len(), 1);
        let entry = ledger.last_entry().unwrap();
        assert_eq!(entry.reason, LedgerReason::OpeningBalance);
        assert_eq!(entry.applied, 1250);
    }

    #[test]
    fn credit_adds_to_balance() {
        let mut ledger = Ledger::with_opening_balance(100, Utc::now());
        let entry = ledger.credit(LedgerReason::Harvest, 120, Utc::now());
        assert_eq!(ledger.balance(), 220);
        assert_eq!(entry.requested, 120);
        assert_eq!(entry.applied, 120);
        assert_eq!(entry.balance_after, 220);
        assert_eq!(entry.sequence, 1);
    }

    #[test]
    fn debit_clamps_at_zero() {
        let mut ledger = Ledger::with_opening_balance(30, Utc::now());
        let entry = ledger.debit(LedgerReason::Purchase, 100, Utc::now());
        assert_eq!(ledger.balance(), 0);
        assert_eq!(entry.requested, -100);
        assert_eq!(entry.applied, -30);
    }

    #[test]
    fn negative_delta_on_empty_ledger_records_zero_applied() {
        let mut ledger = Ledger::new();
        let entry = ledger.apply_delta(LedgerReason::Purchase, -10, Utc::now());
        assert_eq!(ledger.balance(), 0);
        assert_eq!(entry.applied, 0);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn try_debit_rejects_overdraw_without_change() {
        let mut ledger = Ledger::with_opening_balance(50, Utc::now());
        let result = ledger.try_debit(LedgerReason::Purchase, 51, Utc::now());
        assert_eq!(
            result,
            Err(LedgerError::InsufficientFunds {
                requested: 51,
                available: 50,
            })
        );
        assert_eq!(ledger.balance(), 50);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn try_debit_exact_balance_succeeds() {
        let mut ledger = Ledger::with_opening_balance(50, Utc::now());
        let entry = ledger.try_debit(LedgerReason::Purchase, 50, Utc::now()).unwrap();
        assert_eq!(entry.applied, -50);
        assert_eq!(ledger.balance(), 0);
    }

    #[test]
    fn compact_keeps_balance_and_audit() {
        let mut ledger = Ledger::with_opening_balance(100, Utc::now());
        for _ in 0..9 {
            ledger.credit(LedgerReason::Watering, 20, Utc::now());
        }
        ledger.debit(LedgerReason::Purchase, 500, Utc::now());
        assert_eq!(ledger.len(), 11);

        assert_eq!(ledger.compact(4), 8);
        assert_eq!(ledger.len(), 4);
        assert_eq!(ledger.balance(), 0);
        let first = &ledger.entries()[0];
        assert_eq!(first.reason, LedgerReason::Checkpoint);
        assert_eq!(first.sequence, 7);
        assert_eq!(first.balance_after, 240);
        assert!(ledger.verify().is_balanced());

        let next = ledger.credit(LedgerReason::Harvest, 50, Utc::now());
        assert_eq!(next.sequence, 11);
        assert!(ledger.verify().is_balanced());
    }

    #[test]
    fn compact_below_limit_is_noop() {
        let mut ledger = Ledger::with_opening_balance(100, Utc::now());
        ledger.credit(LedgerReason::Watering, 20, Utc::now());
        assert_eq!(ledger.compact(10), 0);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.entries()[0].reason, LedgerReason::OpeningBalance);
    }

    #[test]
    fn ledger_serializes_with_entries() {
        let mut ledger = Ledger::with_opening_balance(1250, Utc::now());
        ledger.credit(LedgerReason::Watering, 20, Utc::now());
        let json = serde_json::to_string(&ledger).unwrap();
        let back: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
        assert!(back.verify().is_balanced());
    }
}
