use std::result::Result;

use anchor_lang::prelude::*;

use crate::constants::{MAX_HOLDERS, MAX_SCHEDULES};
use crate::error::VestingError;
use crate::host::{Host, LedgerEvent};
use crate::state::{BatchPolicy, HolderIndex, ScheduleId, ScheduleParams, VestingSchedule};
use crate::utils::{derive_id, releasable_amount};

/// Pool ledger PDA: every schedule of one mint plus the committed total.
///
/// Invariants kept by every operation:
/// - `committed_total == Σ outstanding()` over non-revoked schedules
/// - `committed_total <= vault balance`
/// - `released <= amount_total` for every schedule, and `released` never decreases
#[account]
#[derive(InitSpace)]
pub struct ScheduleLedger {
    /// Pool owner (creates, revokes, withdraws).
    pub owner: Pubkey,
    /// Token mint held by the vault.
    pub mint: Pubkey,
    /// Vault token account PDA.
    pub vault: Pubkey,
    /// Not-yet-released entitlement across active schedules.
    pub committed_total: u64,
    /// Mid-batch transfer failure handling for `release_all`.
    pub batch_policy: BatchPolicy,
    pub bump: u8,
    pub vault_bump: u8,
    /// All schedules, in global creation order.
    #[max_len(MAX_SCHEDULES)]
    pub schedules: Vec<VestingSchedule>,
    /// Running schedule count per holder.
    #[max_len(MAX_HOLDERS)]
    pub holders: Vec<HolderIndex>,
}

impl ScheduleLedger {
    pub fn new(
        owner: Pubkey,
        mint: Pubkey,
        vault: Pubkey,
        batch_policy: BatchPolicy,
        bump: u8,
        vault_bump: u8,
    ) -> Self {
        Self {
            owner,
            mint,
            vault,
            committed_total: 0,
            batch_policy,
            bump,
            vault_bump,
            schedules: Vec::new(),
            holders: Vec::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Identifier & index
    // ---------------------------------------------------------------------

    /// Number of schedules ever created for `holder`.
    pub fn count_for(&self, holder: &Pubkey) -> u64 {
        self.holders
            .iter()
            .find(|h| h.holder == *holder)
            .map_or(0, |h| h.count)
    }

    /// Identifier the next schedule created for `holder` will get.
    pub fn next_id(&self, holder: &Pubkey) -> ScheduleId {
        derive_id(holder, self.count_for(holder))
    }

    pub fn total_count(&self) -> u64 {
        self.schedules.len() as u64
    }

    pub fn id_at(&self, index: u64) -> Result<ScheduleId, VestingError> {
        self.schedule_at(index).map(|s| s.id)
    }

    fn position(&self, id: &ScheduleId) -> Result<usize, VestingError> {
        self.schedules
            .iter()
            .position(|s| s.initialized && s.id == *id)
            .ok_or(VestingError::ScheduleNotFound)
    }

    // ---------------------------------------------------------------------
    // Read API
    // ---------------------------------------------------------------------

    pub fn get_schedule(&self, id: &ScheduleId) -> Result<&VestingSchedule, VestingError> {
        self.position(id).map(|pos| &self.schedules[pos])
    }

    /// Lookup that never fails: unknown ids yield an uninitialized record.
    pub fn schedule_or_default(&self, id: &ScheduleId) -> VestingSchedule {
        self.get_schedule(id).copied().unwrap_or_default()
    }

    pub fn schedule_count(&self) -> u64 {
        self.total_count()
    }

    pub fn schedule_at(&self, index: u64) -> Result<&VestingSchedule, VestingError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.schedules.get(i))
            .ok_or(VestingError::ScheduleNotFound)
    }

    pub fn schedule_count_for_holder(&self, holder: &Pubkey) -> u64 {
        self.count_for(holder)
    }

    pub fn schedule_at_holder(
        &self,
        holder: &Pubkey,
        index: u64,
    ) -> Result<&VestingSchedule, VestingError> {
        if index >= self.count_for(holder) {
            return Err(VestingError::ScheduleNotFound);
        }
        self.get_schedule(&derive_id(holder, index))
    }

    pub fn last_schedule_for_holder(
        &self,
        holder: &Pubkey,
    ) -> Result<&VestingSchedule, VestingError> {
        let count = self.count_for(holder);
        if count == 0 {
            return Err(VestingError::ScheduleNotFound);
        }
        self.schedule_at_holder(holder, count - 1)
    }

    pub fn total_committed(&self) -> u64 {
        self.committed_total
    }

    /// `custodial_balance - committed_total`. A pool holding less than it has
    /// committed is a broken ledger, not an empty one.
    pub fn free_balance(&self, custodial_balance: u64) -> Result<u64, VestingError> {
        custodial_balance
            .checked_sub(self.committed_total)
            .ok_or_else(|| {
                msg!(
                    "solvency violated: balance {} < committed {}",
                    custodial_balance,
                    self.committed_total
                );
                VestingError::InvariantViolation
            })
    }

    /// Releasable amount of one schedule at `now`. Revoked schedules yield 0.
    pub fn compute_releasable(&self, id: &ScheduleId, now: i64) -> Result<u64, VestingError> {
        releasable_amount(self.get_schedule(id)?, now)
    }

    /// Sum over the holder's non-revoked schedules; 0 when there are none.
    pub fn compute_releasable_for_holder(
        &self,
        holder: &Pubkey,
        now: i64,
    ) -> Result<u64, VestingError> {
        let mut total: u64 = 0;
        for index in 0..self.count_for(holder) {
            let schedule = self.get_schedule(&derive_id(holder, index))?;
            if !schedule.is_active() {
                continue;
            }
            total = total
                .checked_add(releasable_amount(schedule, now)?)
                .ok_or(VestingError::MathOverflow)?;
        }
        Ok(total)
    }

    // ---------------------------------------------------------------------
    // Write API
    // ---------------------------------------------------------------------

    /// Commits `params.amount` of the free balance to a new schedule.
    /// All checks run before the first write, so a rejected call leaves the
    /// ledger untouched.
    pub fn create_schedule(
        &mut self,
        host: &mut Host<'_>,
        caller: &Pubkey,
        params: &ScheduleParams,
    ) -> Result<ScheduleId, VestingError> {
        host.require_owner(caller)?;

        if params.amount == 0
            || params.duration == 0
            || params.slice_seconds == 0
            || params.beneficiary == Pubkey::default()
        {
            return Err(VestingError::InvalidParameters);
        }
        let cliff_time = i64::try_from(params.cliff_duration)
            .ok()
            .and_then(|c| params.start.checked_add(c))
            .ok_or(VestingError::InvalidParameters)?;
        i64::try_from(params.duration)
            .ok()
            .and_then(|d| params.start.checked_add(d))
            .ok_or(VestingError::InvalidParameters)?;

        let holder_slot = self
            .holders
            .iter()
            .position(|h| h.holder == params.beneficiary);
        require_capacity(self.schedules.len() < MAX_SCHEDULES)?;
        if holder_slot.is_none() {
            require_capacity(self.holders.len() < MAX_HOLDERS)?;
        }

        let free = self.free_balance(host.custodial_balance())?;
        if free < params.amount {
            return Err(VestingError::InsufficientFreeBalance);
        }
        let committed_total = self
            .committed_total
            .checked_add(params.amount)
            .ok_or(VestingError::MathOverflow)?;

        let index = holder_slot.map_or(0, |slot| self.holders[slot].count);
        let next_count = index.checked_add(1).ok_or(VestingError::MathOverflow)?;
        let id = derive_id(&params.beneficiary, index);

        self.schedules.push(VestingSchedule {
            id,
            beneficiary: params.beneficiary,
            start: params.start,
            cliff_time,
            duration: params.duration,
            slice_seconds: params.slice_seconds,
            revocable: params.revocable,
            amount_total: params.amount,
            released: 0,
            revoked: false,
            initialized: true,
        });
        match holder_slot {
            Some(slot) => self.holders[slot].count = next_count,
            None => self.holders.push(HolderIndex {
                holder: params.beneficiary,
                count: next_count,
            }),
        }
        self.committed_total = committed_total;

        host.record(LedgerEvent::ScheduleCreated {
            id,
            beneficiary: params.beneficiary,
            amount: params.amount,
        });
        Ok(id)
    }

    /// Pays out whatever `id` has vested. Returns 0 (no side effects) when
    /// nothing is releasable yet.
    pub fn release(
        &mut self,
        host: &mut Host<'_>,
        id: &ScheduleId,
        caller: &Pubkey,
    ) -> Result<u64, VestingError> {
        let now = host.now();
        let pos = self.position(id)?;
        host.authorize(caller, &self.schedules[pos].beneficiary)?;
        if self.schedules[pos].revoked {
            return Err(VestingError::AlreadyRevoked);
        }
        self.release_at(host, pos, now)
    }

    /// Releases every non-revoked schedule of `holder` at one sampled instant.
    pub fn release_all(
        &mut self,
        host: &mut Host<'_>,
        holder: &Pubkey,
        caller: &Pubkey,
    ) -> Result<u64, VestingError> {
        let now = host.now();
        host.authorize(caller, holder)?;

        let mut total: u64 = 0;
        let mut skipped = false;
        for index in 0..self.count_for(holder) {
            let pos = self.position(&derive_id(holder, index))?;
            if !self.schedules[pos].is_active() {
                continue;
            }
            match self.release_at(host, pos, now) {
                Ok(amount) => {
                    total = total.checked_add(amount).ok_or(VestingError::MathOverflow)?;
                }
                Err(VestingError::TransferFailed)
                    if self.batch_policy == BatchPolicy::SkipFailed =>
                {
                    msg!("release_all: skipping schedule #{} after failed transfer", index);
                    skipped = true;
                }
                Err(err) => {
                    if total > 0 {
                        msg!("release_all: aborted after releasing {}", total);
                    }
                    return Err(err);
                }
            }
        }

        match (total, skipped) {
            (0, true) => Err(VestingError::TransferFailed),
            (0, false) => Err(VestingError::NoReleasableAmount),
            _ => Ok(total),
        }
    }

    /// Flushes the vested amount to the beneficiary, then returns the never
    /// to vest remainder to the free balance and marks the schedule revoked.
    pub fn revoke(
        &mut self,
        host: &mut Host<'_>,
        id: &ScheduleId,
        caller: &Pubkey,
    ) -> Result<u64, VestingError> {
        let now = host.now();
        let pos = self.position(id)?;
        host.require_owner(caller)?;
        if !self.schedules[pos].revocable {
            return Err(VestingError::NotRevocable);
        }
        if self.schedules[pos].revoked {
            return Err(VestingError::AlreadyRevoked);
        }

        self.release_at(host, pos, now)?;

        let schedule = &self.schedules[pos];
        let revoked_amount = schedule
            .outstanding()
            .ok_or(VestingError::InvariantViolation)?;
        let committed_total = self
            .committed_total
            .checked_sub(revoked_amount)
            .ok_or(VestingError::InvariantViolation)?;

        let beneficiary = schedule.beneficiary;
        let schedule = &mut self.schedules[pos];
        schedule.amount_total = schedule.released;
        schedule.revoked = true;
        self.committed_total = committed_total;

        host.record(LedgerEvent::Revoked {
            id: *id,
            revoked_amount,
            beneficiary,
        });
        Ok(revoked_amount)
    }

    /// Moves `amount` of the free balance out of the pool.
    pub fn withdraw(
        &mut self,
        host: &mut Host<'_>,
        caller: &Pubkey,
        amount: u64,
        destination: &Pubkey,
    ) -> Result<(), VestingError> {
        host.require_owner(caller)?;
        if amount == 0 {
            return Err(VestingError::InvalidParameters);
        }
        if amount > self.free_balance(host.custodial_balance())? {
            return Err(VestingError::InsufficientFreeBalance);
        }
        host.transfer(destination, amount).map_err(|err| {
            msg!("withdraw transfer failed: {}", err);
            VestingError::TransferFailed
        })?;

        host.record(LedgerEvent::Withdrawn {
            destination: *destination,
            amount,
        });
        Ok(())
    }

    pub fn set_owner(
        &mut self,
        host: &mut Host<'_>,
        caller: &Pubkey,
        new_owner: Pubkey,
    ) -> Result<(), VestingError> {
        host.require_owner(caller)?;
        if new_owner == Pubkey::default() {
            return Err(VestingError::InvalidParameters);
        }
        let previous_owner = self.owner;
        self.owner = new_owner;
        host.record(LedgerEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        Ok(())
    }

    /// Reserve, transfer, and roll the reservation back if the transfer fails.
    fn release_at(
        &mut self,
        host: &mut Host<'_>,
        pos: usize,
        now: i64,
    ) -> Result<u64, VestingError> {
        let schedule = self.schedules[pos];
        let amount = releasable_amount(&schedule, now)?;
        if amount == 0 {
            return Ok(0);
        }

        let released = schedule
            .released
            .checked_add(amount)
            .filter(|r| *r <= schedule.amount_total)
            .ok_or(VestingError::InvariantViolation)?;
        let committed_total = self
            .committed_total
            .checked_sub(amount)
            .ok_or(VestingError::InvariantViolation)?;

        let committed_before = self.committed_total;
        self.schedules[pos].released = released;
        self.committed_total = committed_total;

        if let Err(err) = host.transfer(&schedule.beneficiary, amount) {
            self.schedules[pos].released = schedule.released;
            self.committed_total = committed_before;
            msg!("release of {} failed, reservation rolled back: {}", amount, err);
            return Err(VestingError::TransferFailed);
        }

        host.record(LedgerEvent::Released {
            id: schedule.id,
            amount,
            beneficiary: schedule.beneficiary,
        });
        Ok(amount)
    }
}

fn require_capacity(ok: bool) -> Result<(), VestingError> {
    if ok {
        Ok(())
    } else {
        Err(VestingError::LedgerFull)
    }
}
