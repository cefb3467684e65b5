//! Coin ledger for the Krishi farm simulation.
//!
//! The farm economy is a single non-negative coin balance. Every mutation is
//! a signed delta funnelled through one apply step that clamps the result at
//! zero and appends an audited [`LedgerEntry`] recording the reason, the
//! requested delta, and the delta that was actually applied.
//!
//! # Modules
//!
//! - [`ledger`] -- The [`Ledger`] struct: balance plus append-only audit log.
//! - [`audit`] -- Reconciliation of the audit log against the balance.
//!
//! # Clamping
//!
//! ```text
//! balance' = max(0, balance + delta)
//! ```
//!
//! Rewards always credit. Purchases use [`Ledger::try_debit`], which refuses
//! to overdraw instead of clamping.
//!
//! # Usage
//!
//! ```
//! use chrono::Utc;
//! use krishi_ledger::Ledger;
//! use krishi_types::LedgerReason;
//!
//! let mut ledger = Ledger::with_opening_balance(1250, Utc::now());
//! ledger.credit(LedgerReason::Planting, 50, Utc::now());
//! assert_eq!(ledger.balance(), 1300);
//! assert!(ledger.try_debit(LedgerReason::Purchase, 5000, Utc::now()).is_err());
//! assert!(ledger.verify().is_balanced());
//! ```
//!
//! [`LedgerEntry`]: krishi_types::LedgerEntry

pub mod audit;
pub mod ledger;

// Re-export primary types at crate root.
pub use audit::AuditResult;
pub use ledger::Ledger;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when moving coins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// A strict debit asked for more than the current balance.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Coins requested.
        requested: u64,
        /// Coins available.
        available: u64,
    },
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// A mismatch between the audit log and the balance found by
/// [`Ledger::verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAnomaly {
    /// Sequence number of the first offending entry, if the problem is
    /// localized to one entry.
    pub sequence: Option<u64>,
    /// Human-readable description of the anomaly.
    pub message: String,
}

impl core::fmt::Display for LedgerAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}
