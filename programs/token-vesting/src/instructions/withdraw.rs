use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::LEDGER_SEED;
use crate::error::VestingError;
use crate::host::{Host, SingleOwner};
use crate::instructions::emit_ledger_events;
use crate::state::ScheduleLedger;
use crate::vault::{Destination, SysvarClock, VaultTransfer};

/// Owner-only withdrawal of uncommitted funds.
pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    let ledger_ai = ctx.accounts.ledger.to_account_info();
    let ledger = &mut ctx.accounts.ledger;

    require_keys_eq!(
        ctx.accounts.destination.mint,
        ledger.mint,
        VestingError::InvalidTokenMint
    );
    let destination_owner = ctx.accounts.destination.owner;

    let mint = ledger.mint;
    let bump = [ledger.bump];
    let signer_seeds: &[&[&[u8]]] = &[&[LEDGER_SEED, mint.as_ref(), &bump]];

    let clock = SysvarClock::get()?;
    let access = SingleOwner::new(ledger.owner);
    let mut vault = VaultTransfer::new(
        &ctx.accounts.token_program,
        &ctx.accounts.vault,
        ledger_ai,
        signer_seeds,
    )
    .with_destination(Destination::new(&ctx.accounts.destination));
    let mut host = Host::new(&clock, &access, &mut vault);

    ledger.withdraw(&mut host, &ctx.accounts.owner.key(), amount, &destination_owner)?;
    emit_ledger_events(host.into_events());
    Ok(())
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut, seeds = [LEDGER_SEED, ledger.mint.as_ref()], bump = ledger.bump)]
    pub ledger: Account<'info, ScheduleLedger>,

    #[account(mut, address = ledger.vault @ VestingError::InvalidTokenAccount)]
    pub vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub destination: Account<'info, TokenAccount>,

    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct TokensWithdrawn {
    pub destination: Pubkey,
    pub amount: u64,
}
