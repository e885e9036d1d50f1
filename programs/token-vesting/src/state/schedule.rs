use anchor_lang::prelude::*;

/// Stable identifier of a schedule, derived from `(holder, index)`.
pub type ScheduleId = [u8; 32];

/// A single commitment of `amount_total` units to one beneficiary, released
/// linearly over `duration` seconds in steps of `slice_seconds`.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VestingSchedule {
    pub id: [u8; 32],
    pub beneficiary: Pubkey,
    /// Unix seconds at which proration begins.
    pub start: i64,
    /// `start + cliff_duration`, fixed at creation.
    pub cliff_time: i64,
    /// Total vesting seconds (> 0).
    pub duration: u64,
    /// Release granularity in seconds (> 0).
    pub slice_seconds: u64,
    pub revocable: bool,
    /// Committed amount. Reduced to `released` once, on revocation.
    pub amount_total: u64,
    /// Cumulative paid-out amount. Never decreases.
    pub released: u64,
    pub revoked: bool,
    pub initialized: bool,
}

impl VestingSchedule {
    /// Instant at which the whole amount is vested.
    pub fn end_time(&self) -> Option<i64> {
        i64::try_from(self.duration)
            .ok()
            .and_then(|d| self.start.checked_add(d))
    }

    /// Entitlement still owed by the pool: `amount_total - released`.
    pub fn outstanding(&self) -> Option<u64> {
        self.amount_total.checked_sub(self.released)
    }

    /// Stored and not revoked.
    pub fn is_active(&self) -> bool {
        self.initialized && !self.revoked
    }
}

/// Creation input (beneficiary + timing + amount).
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleParams {
    pub beneficiary: Pubkey,
    pub start: i64,
    pub cliff_duration: u64,
    pub duration: u64,
    pub slice_seconds: u64,
    pub revocable: bool,
    pub amount: u64,
}

/// Per-holder running schedule count (`count_for`).
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub struct HolderIndex {
    pub holder: Pubkey,
    pub count: u64,
}

/// What `release_all` does when one schedule's transfer fails mid-batch.
///
/// The on-chain host is all-or-nothing: a failing token program CPI aborts
/// the whole instruction, so every release in the batch reverts with it and
/// the program never observes the failure. Per-schedule handling only exists
/// on hosts whose transfers report failure back to the ledger.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Stop at the failed schedule and return the transfer error. On a
    /// non-transactional host earlier releases in the batch stay committed.
    #[default]
    Abort,
    /// Roll back only the failed schedule and keep going. Rejected by
    /// `initialize_ledger`.
    SkipFailed,
}

impl BatchPolicy {
    /// Whether the policy means the same thing on a host that reverts the
    /// whole transaction when a transfer fails.
    pub fn fits_atomic_host(self) -> bool {
        matches!(self, BatchPolicy::Abort)
    }
}
