use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::constants::LEDGER_SEED;
use crate::error::VestingError;
use crate::host::{Host, SingleOwner};
use crate::instructions::emit_ledger_events;
use crate::state::{ScheduleLedger, ScheduleParams};
use crate::vault::{SysvarClock, VaultBalance};

pub fn create_schedule(ctx: Context<CreateSchedule>, params: ScheduleParams) -> Result<()> {
    let ledger = &mut ctx.accounts.ledger;

    let clock = SysvarClock::get()?;
    let access = SingleOwner::new(ledger.owner);
    let mut vault = VaultBalance::new(&ctx.accounts.vault);
    let mut host = Host::new(&clock, &access, &mut vault);

    ledger.create_schedule(&mut host, &ctx.accounts.owner.key(), &params)?;
    emit_ledger_events(host.into_events());

    msg!(
        "schedule created for {} (holder count {}, committed {})",
        params.beneficiary,
        ledger.count_for(&params.beneficiary),
        ledger.committed_total
    );
    Ok(())
}

#[derive(Accounts)]
pub struct CreateSchedule<'info> {
    #[account(mut, seeds = [LEDGER_SEED, ledger.mint.as_ref()], bump = ledger.bump)]
    pub ledger: Account<'info, ScheduleLedger>,

    #[account(address = ledger.vault @ VestingError::InvalidTokenAccount)]
    pub vault: Account<'info, TokenAccount>,

    pub owner: Signer<'info>,
}

#[event]
pub struct ScheduleCreated {
    pub id: [u8; 32],
    pub beneficiary: Pubkey,
    pub amount: u64,
}
