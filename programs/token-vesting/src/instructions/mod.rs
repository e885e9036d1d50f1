pub mod create_schedule;
pub mod deposit;
pub mod emit_vesting_quote;
pub mod initialize_ledger;
pub mod release;
pub mod release_all;
pub mod revoke;
pub mod transfer_ownership;
pub mod withdraw;

pub use create_schedule::*;
pub use deposit::*;
pub use emit_vesting_quote::*;
pub use initialize_ledger::*;
pub use release::*;
pub use release_all::*;
pub use revoke::*;
pub use transfer_ownership::*;
pub use withdraw::*;

use anchor_lang::prelude::*;

use crate::host::LedgerEvent;

/// Publishes the notifications a ledger operation recorded as Anchor events.
pub(crate) fn emit_ledger_events(events: Vec<LedgerEvent>) {
    for event in events {
        match event {
            LedgerEvent::ScheduleCreated {
                id,
                beneficiary,
                amount,
            } => emit!(ScheduleCreated {
                id,
                beneficiary,
                amount,
            }),
            LedgerEvent::Released {
                id,
                amount,
                beneficiary,
            } => emit!(TokensReleased {
                id,
                amount,
                beneficiary,
            }),
            LedgerEvent::Revoked {
                id,
                revoked_amount,
                beneficiary,
            } => emit!(ScheduleRevoked {
                id,
                revoked_amount,
                beneficiary,
            }),
            LedgerEvent::Withdrawn {
                destination,
                amount,
            } => emit!(TokensWithdrawn {
                destination,
                amount,
            }),
            LedgerEvent::OwnershipTransferred {
                previous_owner,
                new_owner,
            } => emit!(OwnershipTransferred {
                previous_owner,
                new_owner,
            }),
        }
    }
}
