//! Capabilities the ledger consumes from its host.
//!
//! Every mutating ledger operation receives a [`Host`] bundling the clock, the
//! access-control check and the asset-transfer capability, and appends the
//! notifications it produces to [`Host::events`]. On chain the host is built
//! from the `Clock` sysvar, the ledger owner and the vault token account (see
//! `crate::vault`); tests build it from in-memory fakes.

use anchor_lang::prelude::Pubkey;

use crate::error::VestingError;
use crate::state::ScheduleId;

pub trait TimeSource {
    /// Current unix time in seconds.
    fn now(&self) -> i64;
}

pub trait AccessControl {
    fn is_owner(&self, caller: &Pubkey) -> bool;
}

/// Custody of the pooled balance.
pub trait AssetTransfer {
    /// Custodial balance of the pool.
    fn balance(&self) -> u64;

    /// Move `amount` out of the pool to `to`.
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<(), VestingError>;
}

/// A clock pinned to one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock {
    now: i64,
}

impl FixedClock {
    pub fn at(now: i64) -> Self {
        Self { now }
    }
}

impl TimeSource for FixedClock {
    fn now(&self) -> i64 {
        self.now
    }
}

/// Access control with a single owner key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SingleOwner {
    owner: Pubkey,
}

impl SingleOwner {
    pub fn new(owner: Pubkey) -> Self {
        Self { owner }
    }
}

impl AccessControl for SingleOwner {
    fn is_owner(&self, caller: &Pubkey) -> bool {
        *caller == self.owner
    }
}

/// Resolved role of a caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Authority {
    Owner,
    Beneficiary,
}

/// Notification recorded by a ledger operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerEvent {
    ScheduleCreated {
        id: ScheduleId,
        beneficiary: Pubkey,
        amount: u64,
    },
    Released {
        id: ScheduleId,
        amount: u64,
        beneficiary: Pubkey,
    },
    Revoked {
        id: ScheduleId,
        revoked_amount: u64,
        beneficiary: Pubkey,
    },
    Withdrawn {
        destination: Pubkey,
        amount: u64,
    },
    OwnershipTransferred {
        previous_owner: Pubkey,
        new_owner: Pubkey,
    },
}

pub struct Host<'h> {
    clock: &'h dyn TimeSource,
    access: &'h dyn AccessControl,
    assets: &'h mut dyn AssetTransfer,
    events: Vec<LedgerEvent>,
}

impl<'h> Host<'h> {
    pub fn new(
        clock: &'h dyn TimeSource,
        access: &'h dyn AccessControl,
        assets: &'h mut dyn AssetTransfer,
    ) -> Self {
        Self {
            clock,
            access,
            assets,
            events: Vec::new(),
        }
    }

    /// Samples the clock. Ledger operations call this once, up front.
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    pub fn custodial_balance(&self) -> u64 {
        self.assets.balance()
    }

    pub fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<(), VestingError> {
        self.assets.transfer(to, amount)
    }

    pub fn require_owner(&self, caller: &Pubkey) -> Result<Authority, VestingError> {
        if self.access.is_owner(caller) {
            Ok(Authority::Owner)
        } else {
            Err(VestingError::Unauthorized)
        }
    }

    /// Owner first, then beneficiary identity.
    pub fn authorize(
        &self,
        caller: &Pubkey,
        beneficiary: &Pubkey,
    ) -> Result<Authority, VestingError> {
        if self.access.is_owner(caller) {
            Ok(Authority::Owner)
        } else if caller == beneficiary {
            Ok(Authority::Beneficiary)
        } else {
            Err(VestingError::Unauthorized)
        }
    }

    pub fn record(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    pub fn into_events(self) -> Vec<LedgerEvent> {
        self.events
    }
}

/// In-memory pool used by the ledger tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryVault {
    pub balance: u64,
    pub transfers: Vec<(Pubkey, u64)>,
    /// Zero-based transfer call numbers that fail.
    pub failing_calls: Vec<usize>,
    calls: usize,
}

#[cfg(test)]
impl MemoryVault {
    pub fn funded(balance: u64) -> Self {
        Self {
            balance,
            ..Self::default()
        }
    }

    pub fn paid_to(&self, to: &Pubkey) -> u64 {
        self.transfers
            .iter()
            .filter(|(dest, _)| dest == to)
            .map(|(_, amount)| amount)
            .sum()
    }
}

#[cfg(test)]
impl AssetTransfer for MemoryVault {
    fn balance(&self) -> u64 {
        self.balance
    }

    fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<(), VestingError> {
        let call = self.calls;
        self.calls += 1;
        if self.failing_calls.contains(&call) {
            return Err(VestingError::TransferFailed);
        }
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(VestingError::InsufficientVaultBalance)?;
        self.transfers.push((*to, amount));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    #[test]
    fn owner_wins_over_beneficiary() {
        let clock = FixedClock::at(0);
        let access = SingleOwner::new(key(1));
        let mut vault = MemoryVault::default();
        let host = Host::new(&clock, &access, &mut vault);

        assert_eq!(host.authorize(&key(1), &key(1)).unwrap(), Authority::Owner);
        assert_eq!(host.authorize(&key(2), &key(2)).unwrap(), Authority::Beneficiary);
        assert!(matches!(
            host.authorize(&key(3), &key(2)),
            Err(VestingError::Unauthorized)
        ));
        assert!(matches!(
            host.require_owner(&key(2)),
            Err(VestingError::Unauthorized)
        ));
    }

    #[test]
    fn memory_vault_reports_shortfall() {
        let mut vault = MemoryVault::funded(10);
        assert!(vault.transfer(&key(2), 4).is_ok());
        assert!(matches!(
            vault.transfer(&key(2), 7),
            Err(VestingError::InsufficientVaultBalance)
        ));
        assert_eq!(vault.balance(), 6);
        assert_eq!(vault.paid_to(&key(2)), 4);
    }
}
