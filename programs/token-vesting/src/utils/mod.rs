pub mod schedule_id;
pub mod vesting_math;

pub use schedule_id::derive_id;
pub use vesting_math::{releasable_amount, vested_amount};
