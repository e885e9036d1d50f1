//! Pooled token vesting.
//!
//! One ledger PDA per mint holds every vesting schedule of the pool together
//! with the committed total; the vault PDA holds the tokens. Schedules vest
//! linearly in fixed time slices after an optional cliff and may be revoked by
//! the owner when created revocable.

use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod host;
pub mod instructions;
pub mod state;
pub mod utils;
pub mod vault;

pub use constants::*;
pub use instructions::*;
pub use state::*;

declare_id!("HEfEMLv5dMtGXvRQHo1hGPJPMMVvXs9DwPZQxZta7Jc6");

#[program]
pub mod token_vesting {
    use super::*;

    pub fn initialize_ledger(
        ctx: Context<InitializeLedger>,
        batch_policy: BatchPolicy,
    ) -> Result<()> {
        instructions::initialize_ledger::initialize_ledger(ctx, batch_policy)
    }

    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::deposit(ctx, amount)
    }

    pub fn create_schedule(ctx: Context<CreateSchedule>, params: ScheduleParams) -> Result<()> {
        instructions::create_schedule::create_schedule(ctx, params)
    }

    pub fn release(ctx: Context<Release>, id: [u8; 32]) -> Result<()> {
        instructions::release::release(ctx, id)
    }

    pub fn release_all(ctx: Context<ReleaseAll>, holder: Pubkey) -> Result<()> {
        instructions::release_all::release_all(ctx, holder)
    }

    pub fn revoke(ctx: Context<Revoke>, id: [u8; 32]) -> Result<()> {
        instructions::revoke::revoke(ctx, id)
    }

    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw::withdraw(ctx, amount)
    }

    pub fn transfer_ownership(ctx: Context<TransferOwnership>, new_owner: Pubkey) -> Result<()> {
        instructions::transfer_ownership::transfer_ownership(ctx, new_owner)
    }

    pub fn emit_vesting_quote(ctx: Context<EmitVestingQuote>, id: [u8; 32]) -> Result<()> {
        instructions::emit_vesting_quote::emit_vesting_quote(ctx, id)
    }

    pub fn emit_holder_quote(ctx: Context<EmitVestingQuote>, holder: Pubkey) -> Result<()> {
        instructions::emit_vesting_quote::emit_holder_quote(ctx, holder)
    }
}
