use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::constants::LEDGER_SEED;
use crate::error::VestingError;
use crate::host::{Host, SingleOwner};
use crate::instructions::emit_ledger_events;
use crate::state::ScheduleLedger;
use crate::vault::{SysvarClock, VaultBalance};

pub fn transfer_ownership(ctx: Context<TransferOwnership>, new_owner: Pubkey) -> Result<()> {
    let ledger_key = ctx.accounts.ledger.key();
    let ledger = &mut ctx.accounts.ledger;

    // The ledger and vault PDAs cannot sign, so they can never own the pool.
    require!(new_owner != ledger_key, VestingError::InvalidParameters);
    require!(new_owner != ledger.vault, VestingError::InvalidParameters);
    require!(new_owner != crate::ID, VestingError::InvalidParameters);

    let clock = SysvarClock::get()?;
    let access = SingleOwner::new(ledger.owner);
    let mut vault = VaultBalance::new(&ctx.accounts.vault);
    let mut host = Host::new(&clock, &access, &mut vault);

    ledger.set_owner(&mut host, &ctx.accounts.owner.key(), new_owner)?;
    emit_ledger_events(host.into_events());
    Ok(())
}

#[derive(Accounts)]
pub struct TransferOwnership<'info> {
    #[account(mut, seeds = [LEDGER_SEED, ledger.mint.as_ref()], bump = ledger.bump)]
    pub ledger: Account<'info, ScheduleLedger>,

    #[account(address = ledger.vault @ VestingError::InvalidTokenAccount)]
    pub vault: Account<'info, TokenAccount>,

    pub owner: Signer<'info>,
}

#[event]
pub struct OwnershipTransferred {
    pub previous_owner: Pubkey,
    pub new_owner: Pubkey,
}
