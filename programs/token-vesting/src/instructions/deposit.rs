use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::LEDGER_SEED;
use crate::error::VestingError;
use crate::state::ScheduleLedger;

/// Funds the vault from the owner's token account. Deposits only grow the
/// free balance; schedules are committed separately.
pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    require!(amount > 0, VestingError::InvalidParameters);

    let ledger = &ctx.accounts.ledger;
    require_keys_eq!(ctx.accounts.owner.key(), ledger.owner, VestingError::Unauthorized);
    require_keys_eq!(
        ctx.accounts.owner_token_account.mint,
        ledger.mint,
        VestingError::InvalidTokenMint
    );
    require_keys_eq!(
        ctx.accounts.owner_token_account.owner,
        ctx.accounts.owner.key(),
        VestingError::InvalidTokenAccount
    );

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.owner_token_account.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
                authority: ctx.accounts.owner.to_account_info(),
            },
        ),
        amount,
    )?;

    ctx.accounts.vault.reload()?;
    let vault_balance = ctx.accounts.vault.amount;
    let free_balance = ctx.accounts.ledger.free_balance(vault_balance)?;

    emit!(TokensDeposited {
        owner: ctx.accounts.owner.key(),
        amount,
        vault_balance,
        free_balance,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(seeds = [LEDGER_SEED, ledger.mint.as_ref()], bump = ledger.bump)]
    pub ledger: Account<'info, ScheduleLedger>,

    #[account(mut, address = ledger.vault @ VestingError::InvalidTokenAccount)]
    pub vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub owner_token_account: Account<'info, TokenAccount>,

    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct TokensDeposited {
    pub owner: Pubkey,
    pub amount: u64,
    pub vault_balance: u64,
    pub free_balance: u64,
}
