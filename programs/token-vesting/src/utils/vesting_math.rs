//! Linear, slice-granular vesting math.
//! - nothing is releasable before `cliff_time` or after revocation
//! - at or after `start + duration` the whole remaining amount is releasable
//! - otherwise `vested = floor(amount_total * whole_slices * slice_seconds / duration)`
//!
//! All products are taken in u128 before the single final division, so the
//! rounding remainder of a slice is recovered by later slices and in full by
//! the end-of-schedule branch.

use crate::error::VestingError;
use crate::state::VestingSchedule;

/// Amount vested at `now`, ignoring the cliff and revocation.
pub fn vested_amount(schedule: &VestingSchedule, now: i64) -> Result<u64, VestingError> {
    let end = schedule.end_time().ok_or(VestingError::MathOverflow)?;
    if now >= end {
        return Ok(schedule.amount_total);
    }
    if now <= schedule.start {
        return Ok(0);
    }
    if schedule.duration == 0 || schedule.slice_seconds == 0 {
        return Err(VestingError::InvariantViolation);
    }

    let elapsed = now
        .checked_sub(schedule.start)
        .and_then(|e| u64::try_from(e).ok())
        .ok_or(VestingError::MathOverflow)?;
    let vested_seconds = (elapsed / schedule.slice_seconds)
        .checked_mul(schedule.slice_seconds)
        .ok_or(VestingError::MathOverflow)?;

    let v = (schedule.amount_total as u128)
        .checked_mul(vested_seconds as u128)
        .ok_or(VestingError::MathOverflow)?
        / schedule.duration as u128;
    u64::try_from(v).map_err(|_| VestingError::MathOverflow)
}

/// Amount the beneficiary may claim at `now`.
///
/// A vested amount below `released` means the ledger was mutated against a
/// later clock than `now`; that is reported as `InvariantViolation`, never
/// clamped to zero.
pub fn releasable_amount(schedule: &VestingSchedule, now: i64) -> Result<u64, VestingError> {
    if schedule.revoked || now < schedule.cliff_time {
        return Ok(0);
    }
    let end = schedule.end_time().ok_or(VestingError::MathOverflow)?;
    if now >= end {
        return schedule
            .outstanding()
            .ok_or(VestingError::InvariantViolation);
    }
    vested_amount(schedule, now)?
        .checked_sub(schedule.released)
        .ok_or(VestingError::InvariantViolation)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400;
    const START: i64 = 1_700_000_000;

    fn schedule(
        amount_total: u64,
        cliff: i64,
        duration: u64,
        slice_seconds: u64,
    ) -> VestingSchedule {
        VestingSchedule {
            start: START,
            cliff_time: START + cliff,
            duration,
            slice_seconds,
            amount_total,
            revocable: true,
            initialized: true,
            ..VestingSchedule::default()
        }
    }

    #[test]
    fn fractional_slices_are_recovered_later() {
        // 3.5 day slices over 365 days
        let s = schedule(1_000, 0, 31_536_000, 302_400);
        assert_eq!(releasable_amount(&s, START + 302_400).unwrap(), 9);
        assert_eq!(releasable_amount(&s, START + 604_800).unwrap(), 19);
    }

    #[test]
    fn monthly_slices_land_on_boundaries() {
        let s = schedule(1_200, 0, 31_104_000, 2_592_000);
        assert_eq!(releasable_amount(&s, START).unwrap(), 0);
        assert_eq!(releasable_amount(&s, START + 30 * DAY - 1).unwrap(), 0);
        assert_eq!(releasable_amount(&s, START + 30 * DAY + 1).unwrap(), 100);
        assert_eq!(releasable_amount(&s, START + 60 * DAY).unwrap(), 200);
        assert_eq!(releasable_amount(&s, START + 61 * DAY).unwrap(), 200);
        assert_eq!(releasable_amount(&s, START + 360 * DAY).unwrap(), 1_200);
    }

    #[test]
    fn five_year_schedule_in_half_week_slices() {
        let s = schedule(100_000, 0, 5 * 365 * 86_400, 302_400);
        assert_eq!(releasable_amount(&s, START + 302_400).unwrap(), 191);
        assert_eq!(releasable_amount(&s, START + 604_800).unwrap(), 383);
        assert_eq!(releasable_amount(&s, START + 35 * DAY).unwrap(), 1_917);
        assert_eq!(releasable_amount(&s, START + 912 * DAY + DAY / 2).unwrap(), 49_863);
        assert_eq!(releasable_amount(&s, START + 1_825 * DAY).unwrap(), 100_000);
    }

    #[test]
    fn cliff_gates_everything_before_it() {
        let s = schedule(1_000, 10 * DAY, 100 * DAY as u64, DAY as u64);
        assert_eq!(releasable_amount(&s, START + 10 * DAY - 1).unwrap(), 0);
        // at the cliff the slices elapsed since start become claimable at once
        assert_eq!(releasable_amount(&s, START + 10 * DAY).unwrap(), 100);
    }

    #[test]
    fn slice_longer_than_duration_still_fully_vests() {
        let s = schedule(500, 0, 1_000, 5_000);
        assert_eq!(releasable_amount(&s, START + 999).unwrap(), 0);
        assert_eq!(releasable_amount(&s, START + 1_000).unwrap(), 500);
    }

    #[test]
    fn released_amount_is_subtracted() {
        let mut s = schedule(1_200, 0, 31_104_000, 2_592_000);
        s.released = 100;
        assert_eq!(releasable_amount(&s, START + 65 * DAY).unwrap(), 100);
        assert_eq!(releasable_amount(&s, START + 400 * DAY).unwrap(), 1_100);
    }

    #[test]
    fn revoked_schedule_releases_nothing() {
        let mut s = schedule(1_000, 0, 1_000, 1);
        s.revoked = true;
        assert_eq!(releasable_amount(&s, START + 5_000).unwrap(), 0);
    }

    #[test]
    fn clock_behind_released_is_an_invariant_violation() {
        let mut s = schedule(1_200, 0, 31_104_000, 2_592_000);
        s.released = 300;
        assert!(matches!(
            releasable_amount(&s, START + 31 * DAY),
            Err(VestingError::InvariantViolation)
        ));
    }

    #[test]
    fn large_amounts_do_not_overflow() {
        let s = schedule(u64::MAX, 0, 2, 1);
        assert_eq!(vested_amount(&s, START + 1).unwrap(), u64::MAX / 2);
        assert_eq!(releasable_amount(&s, START + 2).unwrap(), u64::MAX);
    }
}
