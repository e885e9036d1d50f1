use anchor_lang::prelude::*;

use crate::constants::LEDGER_SEED;
use crate::state::ScheduleLedger;
use crate::utils::vested_amount;

/// Read-only: logs what `id` could release right now.
pub fn emit_vesting_quote(ctx: Context<EmitVestingQuote>, id: [u8; 32]) -> Result<()> {
    let ledger = &ctx.accounts.ledger;
    let now = Clock::get()?.unix_timestamp;

    let schedule = ledger.get_schedule(&id)?;
    let releasable = ledger.compute_releasable(&id, now)?;

    emit!(VestingQuote {
        id,
        beneficiary: schedule.beneficiary,
        now,
        vested_amount: vested_amount(schedule, now)?,
        released_amount: schedule.released,
        releasable,
        revoked: schedule.revoked,
    });
    Ok(())
}

/// Read-only: logs the holder's aggregate releasable amount.
pub fn emit_holder_quote(ctx: Context<EmitVestingQuote>, holder: Pubkey) -> Result<()> {
    let ledger = &ctx.accounts.ledger;
    let now = Clock::get()?.unix_timestamp;

    emit!(HolderQuote {
        holder,
        now,
        schedule_count: ledger.schedule_count_for_holder(&holder),
        releasable: ledger.compute_releasable_for_holder(&holder, now)?,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct EmitVestingQuote<'info> {
    #[account(seeds = [LEDGER_SEED, ledger.mint.as_ref()], bump = ledger.bump)]
    pub ledger: Account<'info, ScheduleLedger>,
}

#[event]
pub struct VestingQuote {
    pub id: [u8; 32],
    pub beneficiary: Pubkey,
    pub now: i64,
    pub vested_amount: u64,
    pub released_amount: u64,
    pub releasable: u64,
    pub revoked: bool,
}

#[event]
pub struct HolderQuote {
    pub holder: Pubkey,
    pub now: i64,
    pub schedule_count: u64,
    pub releasable: u64,
}
