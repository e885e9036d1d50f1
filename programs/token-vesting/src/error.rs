use anchor_lang::prelude::*;

/// Error codes for the vesting ledger program.
#[error_code]
pub enum VestingError {
    #[msg("Schedule not found")]
    ScheduleNotFound,

    #[msg("Schedule is already revoked")]
    AlreadyRevoked,

    #[msg("Schedule is not revocable")]
    NotRevocable,

    #[msg("Invalid schedule parameters")]
    InvalidParameters,

    #[msg("Insufficient free balance in the pool")]
    InsufficientFreeBalance,

    #[msg("Unauthorized: caller is neither owner nor beneficiary")]
    Unauthorized,

    #[msg("No releasable amount")]
    NoReleasableAmount,

    #[msg("Asset transfer failed")]
    TransferFailed,

    #[msg("Ledger invariant violated")]
    InvariantViolation,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Ledger is full")]
    LedgerFull,

    #[msg("Invalid token mint")]
    InvalidTokenMint,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Insufficient vault balance")]
    InsufficientVaultBalance,
}
