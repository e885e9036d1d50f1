//! Program-wide constants.

/// Seed of the ledger PDA (`[LEDGER_SEED, mint]`). The ledger PDA is also the
/// vault's token authority.
pub const LEDGER_SEED: &[u8] = b"ledger";

/// Seed of the vault token account PDA (`[VAULT_SEED, ledger]`).
pub const VAULT_SEED: &[u8] = b"vault";

/// Max schedules stored in one ledger account.
pub const MAX_SCHEDULES: usize = 48;

/// Max distinct holders tracked by one ledger account.
pub const MAX_HOLDERS: usize = 48;

/// Domain tag mixed into every schedule identifier hash.
pub const SCHEDULE_ID_DOMAIN: &[u8] = b"token-vesting/schedule-id/v1";
