//! Property-based tests for the ledger invariants.
//!
//! Random interleavings of creation, release, batch release, revocation,
//! withdrawal and clock advances must keep the pool solvent, the committed
//! total equal to the outstanding entitlement, and every `released` counter
//! monotonic and bounded by its schedule's amount.

use anchor_lang::prelude::Pubkey;
use proptest::prelude::*;

use crate::error::VestingError;
use crate::host::{FixedClock, Host, MemoryVault, SingleOwner};
use crate::state::{BatchPolicy, ScheduleLedger, ScheduleParams};

const START: i64 = 1_700_000_000;
const FUNDING: u64 = 1_000_000;

#[derive(Clone, Debug)]
enum Op {
    Create {
        holder: u8,
        amount: u64,
        cliff: u64,
        duration: u64,
        slice: u64,
        revocable: bool,
    },
    Advance(i64),
    Release { pick: usize, by_owner: bool },
    ReleaseAll { holder: u8 },
    Revoke { pick: usize },
    Withdraw(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..3, 1u64..200_000, 0u64..20_000, 1u64..100_000, 1u64..40_000, any::<bool>()).prop_map(
            |(holder, amount, cliff, duration, slice, revocable)| Op::Create {
                holder,
                amount,
                cliff,
                duration,
                slice,
                revocable,
            }
        ),
        (0i64..30_000).prop_map(Op::Advance),
        (any::<usize>(), any::<bool>()).prop_map(|(pick, by_owner)| Op::Release { pick, by_owner }),
        (0u8..3).prop_map(|holder| Op::ReleaseAll { holder }),
        any::<usize>().prop_map(|pick| Op::Revoke { pick }),
        (1u64..100_000).prop_map(Op::Withdraw),
    ]
}

fn holder(n: u8) -> Pubkey {
    Pubkey::new_from_array([n + 10; 32])
}

struct Model {
    ledger: ScheduleLedger,
    vault: MemoryVault,
    owner: Pubkey,
    now: i64,
}

impl Model {
    fn new(policy: BatchPolicy, failing_calls: Vec<usize>) -> Self {
        let owner = Pubkey::new_from_array([1; 32]);
        let mut vault = MemoryVault::funded(FUNDING);
        vault.failing_calls = failing_calls;
        Self {
            ledger: ScheduleLedger::new(
                owner,
                Pubkey::new_from_array([2; 32]),
                Pubkey::new_from_array([3; 32]),
                policy,
                255,
                254,
            ),
            vault,
            owner,
            now: START,
        }
    }

    fn apply(&mut self, op: &Op) -> Result<(), VestingError> {
        if let Op::Advance(secs) = op {
            self.now += secs;
            return Ok(());
        }
        let owner = self.owner;
        let count = self.ledger.schedules.len();
        let picked = |pick: usize| (count > 0).then(|| self.ledger.schedules[pick % count]);
        let clock = FixedClock::at(self.now);
        let access = SingleOwner::new(owner);
        let mut host = Host::new(&clock, &access, &mut self.vault);

        match op {
            Op::Create {
                holder: h,
                amount,
                cliff,
                duration,
                slice,
                revocable,
            } => {
                let params = ScheduleParams {
                    beneficiary: holder(*h),
                    start: self.now,
                    cliff_duration: *cliff,
                    duration: *duration,
                    slice_seconds: *slice,
                    revocable: *revocable,
                    amount: *amount,
                };
                self.ledger.create_schedule(&mut host, &owner, &params).map(drop)
            }
            Op::Release { pick, by_owner } => match picked(*pick) {
                Some(s) => {
                    let caller = if *by_owner { owner } else { s.beneficiary };
                    self.ledger.release(&mut host, &s.id, &caller).map(drop)
                }
                None => Ok(()),
            },
            Op::ReleaseAll { holder: h } => {
                let h = holder(*h);
                self.ledger.release_all(&mut host, &h, &h).map(drop)
            }
            Op::Revoke { pick } => match picked(*pick) {
                Some(s) => self.ledger.revoke(&mut host, &s.id, &owner).map(drop),
                None => Ok(()),
            },
            Op::Withdraw(amount) => {
                let treasury = Pubkey::new_from_array([4; 32]);
                self.ledger.withdraw(&mut host, &owner, *amount, &treasury)
            }
            Op::Advance(_) => Ok(()),
        }
    }

    fn paid_out(&self) -> u64 {
        self.vault.transfers.iter().map(|(_, amount)| amount).sum()
    }
}

fn check_invariants(model: &Model, previous_released: &[u64]) -> Result<(), TestCaseError> {
    let mut outstanding: u64 = 0;
    for (i, s) in model.ledger.schedules.iter().enumerate() {
        prop_assert!(s.released <= s.amount_total);
        if let Some(prev) = previous_released.get(i) {
            prop_assert!(s.released >= *prev, "released decreased");
        }
        if s.revoked {
            prop_assert_eq!(s.released, s.amount_total);
        } else {
            outstanding += s.amount_total - s.released;
        }
    }
    prop_assert_eq!(outstanding, model.ledger.committed_total);
    prop_assert!(model.vault.balance >= model.ledger.committed_total);
    prop_assert_eq!(model.vault.balance + model.paid_out(), FUNDING);
    Ok(())
}

fn run_ops(mut model: Model, ops: &[Op]) -> Result<(), TestCaseError> {
    for op in ops {
        let before: Vec<u64> = model.ledger.schedules.iter().map(|s| s.released).collect();
        let result = model.apply(op);
        prop_assert!(
            !matches!(result, Err(VestingError::InvariantViolation)),
            "invariant violation on {:?}",
            op
        );
        check_invariants(&model, &before)?;
    }
    Ok(())
}

proptest! {
    /// Property: ledger invariants hold under arbitrary interleavings.
    #[test]
    fn prop_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..60)) {
        run_ops(Model::new(BatchPolicy::Abort, Vec::new()), &ops)?;
    }

    /// Property: failed transfers never leak into ledger state, under either
    /// batch policy.
    #[test]
    fn prop_invariants_hold_with_failing_transfers(
        ops in prop::collection::vec(op_strategy(), 1..60),
        failing in prop::collection::vec(0usize..40, 0..10),
        skip in any::<bool>(),
    ) {
        let policy = if skip { BatchPolicy::SkipFailed } else { BatchPolicy::Abort };
        run_ops(Model::new(policy, failing), &ops)?;
    }

    /// Property: the holder aggregate equals the sum of per-schedule amounts.
    #[test]
    fn prop_holder_sum_matches_individual_sum(
        ops in prop::collection::vec(op_strategy(), 1..40),
        probe in 0i64..200_000,
    ) {
        let mut model = Model::new(BatchPolicy::Abort, Vec::new());
        for op in &ops {
            let _ = model.apply(op);
        }
        let at = model.now + probe;
        for h in 0..3u8 {
            let h = holder(h);
            let individual: u64 = model
                .ledger
                .schedules
                .iter()
                .filter(|s| s.beneficiary == h)
                .map(|s| model.ledger.compute_releasable(&s.id, at).unwrap())
                .sum();
            prop_assert_eq!(
                model.ledger.compute_releasable_for_holder(&h, at).unwrap(),
                individual
            );
        }
    }
}
