use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::LEDGER_SEED;
use crate::error::VestingError;
use crate::host::{Host, SingleOwner};
use crate::instructions::emit_ledger_events;
use crate::state::ScheduleLedger;
use crate::vault::{Destination, SysvarClock, VaultTransfer};

/// Releases every active schedule of `holder` in creation order.
pub fn release_all(ctx: Context<ReleaseAll>, holder: Pubkey) -> Result<()> {
    let ledger_ai = ctx.accounts.ledger.to_account_info();
    let ledger = &mut ctx.accounts.ledger;

    require_keys_eq!(
        ctx.accounts.holder_token_account.owner,
        holder,
        VestingError::InvalidTokenAccount
    );
    require_keys_eq!(
        ctx.accounts.holder_token_account.mint,
        ledger.mint,
        VestingError::InvalidTokenMint
    );

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
    .with_destination(Destination::new(&ctx.accounts.holder_token_account));
    let mut host = Host::new(&clock, &access, &mut vault);

    let total = ledger.release_all(&mut host, &holder, &ctx.accounts.caller.key())?;
    let events = host.into_events();
    let released_count = events.len();
    emit_ledger_events(events);

    emit!(BatchReleased {
        holder,
        total,
        released_count: released_count as u32,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct ReleaseAll<'info> {
    #[account(mut, seeds = [LEDGER_SEED, ledger.mint.as_ref()], bump = ledger.bump)]
    pub ledger: Account<'info, ScheduleLedger>,

    #[account(mut, address = ledger.vault @ VestingError::InvalidTokenAccount)]
    pub vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub holder_token_account: Account<'info, TokenAccount>,

    pub caller: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct BatchReleased {
    pub holder: Pubkey,
    pub total: u64,
    pub released_count: u32,
}
