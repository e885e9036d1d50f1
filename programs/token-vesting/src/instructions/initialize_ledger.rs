use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{LEDGER_SEED, VAULT_SEED};
use crate::error::VestingError;
use crate::state::{BatchPolicy, ScheduleLedger};

pub fn initialize_ledger(ctx: Context<InitializeLedger>, batch_policy: BatchPolicy) -> Result<()> {
    // A failed CPI reverts the whole transaction, so skipping is never observable here.
    require!(batch_policy.fits_atomic_host(), VestingError::InvalidParameters);

    let owner = ctx.accounts.owner.key();
    let mint = ctx.accounts.mint.key();
    let vault = ctx.accounts.vault.key();

    ctx.accounts.ledger.set_inner(ScheduleLedger::new(
        owner,
        mint,
        vault,
        batch_policy,
        ctx.bumps.ledger,
        ctx.bumps.vault,
    ));

    emit!(LedgerInitialized {
        owner,
        mint,
        vault,
        batch_policy,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct InitializeLedger<'info> {
    #[account(
        init,
        payer = owner,
        space = 8 + ScheduleLedger::INIT_SPACE,
        seeds = [LEDGER_SEED, mint.key().as_ref()],
        bump
    )]
    pub ledger: Account<'info, ScheduleLedger>,

    #[account(
        init,
        payer = owner,
        token::mint = mint,
        token::authority = ledger,
        seeds = [VAULT_SEED, ledger.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, TokenAccount>,

    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[event]
pub struct LedgerInitialized {
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub vault: Pubkey,
    pub batch_policy: BatchPolicy,
}
