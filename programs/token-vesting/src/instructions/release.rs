use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::LEDGER_SEED;
use crate::error::VestingError;
use crate::host::{Host, SingleOwner};
use crate::instructions::emit_ledger_events;
use crate::state::ScheduleLedger;
use crate::vault::{Destination, SysvarClock, VaultTransfer};

/// Pays out the vested part of one schedule. Signed by the beneficiary or
/// the pool owner; a zero release is a successful no-op.
pub fn release(ctx: Context<Release>, id: [u8; 32]) -> Result<()> {
    // Capture the PDA AccountInfo before taking the mutable borrow.
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

    let amount = ledger.release(&mut host, &id, &ctx.accounts.caller.key())?;
    emit_ledger_events(host.into_events());

    if amount == 0 {
        msg!("nothing releasable yet");
    }
    Ok(())
}

#[derive(Accounts)]
pub struct Release<'info> {
    #[account(mut, seeds = [LEDGER_SEED, ledger.mint.as_ref()], bump = ledger.bump)]
    pub ledger: Account<'info, ScheduleLedger>,

    #[account(mut, address = ledger.vault @ VestingError::InvalidTokenAccount)]
    pub vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub beneficiary_token_account: Account<'info, TokenAccount>,

    pub caller: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct TokensReleased {
    pub id: [u8; 32],
    pub amount: u64,
    pub beneficiary: Pubkey,
}
