use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::LEDGER_SEED;
use crate::error::VestingError;
use crate::host::{Host, SingleOwner};
use crate::instructions::emit_ledger_events;
use crate::state::ScheduleLedger;
use crate::vault::{Destination, SysvarClock, VaultTransfer};

/// Owner-only. Flushes the vested amount to the beneficiary, then frees the
/// unvested remainder.
pub fn revoke(ctx: Context<Revoke>, id: [u8; 32]) -> Result<()> {
    let ledger_ai = ctx.accounts.ledger.to_account_info();
    let ledger = &mut ctx.accounts.ledger;

    let beneficiary = ledger.get_schedule(&id)?.beneficiary;
    require_keys_eq!(
        ctx.accounts.beneficiary_token_account.owner,
        beneficiary,
        VestingError::InvalidTokenAccount
    );
    require_keys_eq!(
        ctx.accounts.beneficiary_token_account.mint,
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
    .with_destination(Destination::new(&ctx.accounts.beneficiary_token_account));
    let mut host = Host::new(&clock, &access, &mut vault);

    let revoked_amount = ledger.revoke(&mut host, &id, &ctx.accounts.owner.key())?;
    emit_ledger_events(host.into_events());

    msg!(
        "revoked {}, committed total now {}",
        revoked_amount,
        ledger.committed_total
    );
    Ok(())
}

#[derive(Accounts)]
pub struct Revoke<'info> {
    #[account(mut, seeds = [LEDGER_SEED, ledger.mint.as_ref()], bump = ledger.bump)]
    pub ledger: Account<'info, ScheduleLedger>,

    #[account(mut, address = ledger.vault @ VestingError::InvalidTokenAccount)]
    pub vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub beneficiary_token_account: Account<'info, TokenAccount>,

    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct ScheduleRevoked {
    pub id: [u8; 32],
    pub revoked_amount: u64,
    pub beneficiary: Pubkey,
}
