//! On-chain implementations of the ledger capabilities.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::error::VestingError;
use crate::host::{AssetTransfer, TimeSource};

/// `Clock` sysvar, read once per instruction.
pub struct SysvarClock {
    unix_timestamp: i64,
}

impl SysvarClock {
    pub fn get() -> Result<Self> {
        Ok(Self {
            unix_timestamp: Clock::get()?.unix_timestamp,
        })
    }
}

impl TimeSource for SysvarClock {
    fn now(&self) -> i64 {
        self.unix_timestamp
    }
}

/// Vault balance for operations that never move funds.
pub struct VaultBalance {
    balance: u64,
}

impl VaultBalance {
    pub fn new(vault: &Account<'_, TokenAccount>) -> Self {
        Self {
            balance: vault.amount,
        }
    }
}

impl AssetTransfer for VaultBalance {
    fn balance(&self) -> u64 {
        self.balance
    }

    fn transfer(&mut self, _to: &Pubkey, _amount: u64) -> std::result::Result<(), VestingError> {
        msg!("transfer requested from a read-only vault");
        Err(VestingError::TransferFailed)
    }
}

/// Token account that may receive funds, bound to its owner.
pub struct Destination<'info> {
    account: AccountInfo<'info>,
    owner: Pubkey,
}

impl<'info> Destination<'info> {
    pub fn new(account: &Account<'info, TokenAccount>) -> Self {
        Self {
            account: account.to_account_info(),
            owner: account.owner,
        }
    }
}

/// Vault token account driven by SPL token CPIs signed by the ledger PDA.
pub struct VaultTransfer<'a, 'info> {
    token_program: AccountInfo<'info>,
    vault: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    signer_seeds: &'a [&'a [&'a [u8]]],
    destination: Option<Destination<'info>>,
    balance: u64,
}

impl<'a, 'info> VaultTransfer<'a, 'info> {
    pub fn new(
        token_program: &Program<'info, Token>,
        vault: &Account<'info, TokenAccount>,
        authority: AccountInfo<'info>,
        signer_seeds: &'a [&'a [&'a [u8]]],
    ) -> Self {
        Self {
            token_program: token_program.to_account_info(),
            vault: vault.to_account_info(),
            authority,
            signer_seeds,
            destination: None,
            balance: vault.amount,
        }
    }

    pub fn with_destination(mut self, destination: Destination<'info>) -> Self {
        self.destination = Some(destination);
        self
    }
}

impl AssetTransfer for VaultTransfer<'_, '_> {
    fn balance(&self) -> u64 {
        self.balance
    }

    fn transfer(&mut self, to: &Pubkey, amount: u64) -> std::result::Result<(), VestingError> {
        let destination = self
            .destination
            .as_ref()
            .filter(|d| d.owner == *to)
            .ok_or(VestingError::InvalidTokenAccount)?;
        if amount > self.balance {
            return Err(VestingError::InsufficientVaultBalance);
        }

        token::transfer(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                Transfer {
                    from: self.vault.clone(),
                    to: destination.account.clone(),
                    authority: self.authority.clone(),
                },
                self.signer_seeds,
            ),
            amount,
        )
        // Only errors raised before the token program runs surface here. A
        // failure inside the CPI aborts the instruction.
        .map_err(|err| {
            msg!("vault transfer of {} failed: {}", amount, err);
            VestingError::TransferFailed
        })?;

        self.balance -= amount;
        Ok(())
    }
}
