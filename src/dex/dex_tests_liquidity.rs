use quickcheck::{quickcheck, TestResult};
use rstest::rstest;

use crate::dex::host::DirectPayer;
use crate::dex::test_utils::Sandbox;
use crate::dex::{
    AccountId, ErrorKind, FeeVesting, LinearVesting, Liquidity, PositionChange, Result, Tick,
    VestingRecord,
};
use crate::fp::U256;

const RANGE: (i32, i32) = (-600, 600);

fn tick(value: i32) -> Tick {
    Tick::new(value).unwrap()
}

/// Pool at tick 0 in 0.3% tier
fn sandbox() -> Sandbox {
    let mut sandbox = Sandbox::new(30);
    sandbox.unlock_at_tick(0).unwrap();
    sandbox
}

/// Swaps back and forth without leaving `RANGE`
fn churn(sandbox: &mut Sandbox, rounds: usize) {
    let trader = sandbox.new_funded_account();
    for _ in 0..rounds {
        let there = sandbox.swap(&trader, 100_000_000, true, None).unwrap();
        sandbox
            .swap(&trader, there.delta1.abs(), false, None)
            .unwrap();
    }
}

fn mint_with_hints(
    sandbox: &mut Sandbox,
    account: &AccountId,
    (lower, upper): (i32, i32),
    hints: [Tick; 2],
) -> Result<PositionChange> {
    let recipient = *account;
    sandbox.call(account, |pool, env| {
        pool.mint(
            env,
            &recipient,
            (tick(lower), tick(upper)),
            hints,
            1_000,
            &mut DirectPayer::new(recipient),
            &[],
        )
    })
}

#[test]
fn fees_are_shared_by_liquidity() {
    let mut sandbox = sandbox();
    let (small, big) = (sandbox.new_funded_account(), sandbox.new_funded_account());
    sandbox.mint(&small, RANGE, 1_000_000_000_000).unwrap();
    sandbox.mint(&big, RANGE, 3_000_000_000_000).unwrap();
    churn(&mut sandbox, 5);

    let small_fees = sandbox.poke_and_collect(&small, RANGE).unwrap();
    let big_fees = sandbox.poke_and_collect(&big, RANGE).unwrap();
    assert!(!small_fees.is_zero());
    let tripled = small_fees * U256::from(3u32);
    assert!(tripled <= big_fees && big_fees <= tripled + U256::from(2u32));
}

#[test]
fn out_of_range_and_late_positions_earn_nothing() {
    let mut sandbox = sandbox();
    let (active, idle, late) = (
        sandbox.new_funded_account(),
        sandbox.new_funded_account(),
        sandbox.new_funded_account(),
    );
    sandbox.mint(&active, RANGE, 1_000_000_000_000).unwrap();
    sandbox.mint(&idle, (1_200, 1_800), 1_000_000_000_000).unwrap();
    churn(&mut sandbox, 3);
    sandbox.mint(&late, RANGE, 1_000_000_000_000).unwrap();

    assert_eq!(
        sandbox.poke_and_collect(&idle, (1_200, 1_800)).unwrap(),
        U256::zero()
    );
    assert_eq!(sandbox.poke_and_collect(&late, RANGE).unwrap(), U256::zero());
    assert!(!sandbox.poke_and_collect(&active, RANGE).unwrap().is_zero());
}

#[test]
fn adding_liquidity_settles_earned_fees() {
    let mut sandbox = sandbox();
    let lp = sandbox.new_funded_account();
    sandbox.mint(&lp, RANGE, 1_000_000_000_000).unwrap();
    churn(&mut sandbox, 3);
    sandbox.mint(&lp, RANGE, 1_000_000_000_000).unwrap();

    let position = sandbox.pool().position(&lp, (tick(-600), tick(600)));
    assert_eq!(position.liquidity, 2_000_000_000_000);
    assert!(!position.rtoken_owed.is_zero());
    assert_eq!(position.fee_growth_inside_last, sandbox.pool().fee_growth_global());

    let owed = position.rtoken_owed;
    assert_eq!(
        sandbox.call(&lp, |pool, env| pool.collect_rtokens(env, (tick(-600), tick(600)))),
        Ok(owed)
    );
}

#[test]
fn burnt_position_keeps_fees_until_collected() {
    let mut sandbox = sandbox();
    let lp = sandbox.new_funded_account();
    sandbox.mint(&lp, RANGE, 1_000_000_000_000).unwrap();
    churn(&mut sandbox, 3);
    sandbox.burn(&lp, RANGE, 1_000_000_000_000).unwrap();

    let owed = sandbox.pool().position(&lp, (tick(-600), tick(600))).rtoken_owed;
    assert!(!owed.is_zero());
    let collected = sandbox
        .call(&lp, |pool, env| pool.collect_rtokens(env, (tick(-600), tick(600))))
        .unwrap();
    assert_eq!(collected, owed);
    // empty record is dropped once swept
    assert!(sandbox.pool().state().positions.iter().all(|(key, _)| key.owner != lp));
}

#[rstest]
#[case::far_hint([Tick::MIN, Tick::MIN], ErrorKind::InvalidTickHint)]
#[case::uninitialized_hint([tick(-30), tick(-30)], ErrorKind::InvalidTickHint)]
#[case::hint_above([tick(1_200), tick(1_200)], ErrorKind::InvalidTickHint)]
fn stale_hints_are_rejected(#[case] hints: [Tick; 2], #[case] expected: ErrorKind) {
    let mut sandbox = sandbox();
    let lp = sandbox.new_funded_account();
    // more initialized ticks below than insertion may walk past
    for step in 0..12 {
        sandbox.mint(&lp, (-1_200 + 60 * step, 1_200), 1_000).unwrap();
    }
    let result = mint_with_hints(&mut sandbox, &lp, (-60, 60), hints);
    assert_eq!(result.unwrap_err().kind(), expected);
}

#[test]
fn close_hints_are_accepted() {
    let mut sandbox = sandbox();
    let lp = sandbox.new_funded_account();
    for step in 0..12 {
        sandbox.mint(&lp, (-1_200 + 60 * step, 1_200), 1_000).unwrap();
    }
    // within travel distance of the actual predecessor
    let hints = [tick(-1_200 + 60 * 5), tick(-540)];
    mint_with_hints(&mut sandbox, &lp, (-60, 60), hints).unwrap();
    assert!(sandbox.pool().tick(tick(-60)).is_some());
    assert!(sandbox.pool().tick(tick(60)).is_some());
}

#[test]
fn vesting_locks_fresh_fees_of_position_manager() {
    let mut sandbox = sandbox();
    let owner = sandbox.owner;
    sandbox
        .host
        .configure(|config| config.set_vesting_period(&owner, 1_000))
        .unwrap();
    let strategy = LinearVesting {
        period: sandbox.host.factory.config().vesting_period(),
    };
    let manager = sandbox.new_funded_account();
    let liquidity: Liquidity = 1_000_000_000_000;

    let mut record = VestingRecord::new(sandbox.host.now);
    sandbox.mint(&manager, RANGE, liquidity).unwrap();
    record.update(&strategy, 0, liquidity, sandbox.host.now, true, U256::zero());

    churn(&mut sandbox, 5);
    sandbox.host.advance_time(250);
    let fees = sandbox.poke_and_collect(&manager, RANGE).unwrap();
    let outcome = record.update(&strategy, liquidity, 0, sandbox.host.now, true, fees);
    assert_eq!(outcome.claimable, fees * U256::from(2_500u32) / U256::from(10_000u32));
    assert_eq!(record.fees_locked, fees - outcome.claimable);
    assert_eq!(strategy.vesting_period(), 1_000);

    // half of liquidity leaves, half of locked fees is forfeited and burnt logically
    sandbox.burn(&manager, RANGE, liquidity / 2).unwrap();
    let locked = record.fees_locked;
    let outcome = record.update(&strategy, liquidity, liquidity / 2, sandbox.host.now, false, U256::zero());
    assert_eq!(outcome.burnable, locked / U256::from(2u32));

    let supply = sandbox.pool().rtoken_supply();
    let burnable = outcome.burnable;
    sandbox
        .call(&manager, |pool, env| pool.burn_rtokens(env, burnable, true))
        .unwrap();
    assert_eq!(sandbox.pool().rtoken_supply(), supply - burnable);
    assert_eq!(sandbox.pool().rtoken_balance(&manager), fees - burnable);
}

quickcheck! {
    fn mint_then_burn_never_pays_out_more(lower_step: i8, width: u8, liquidity: u64) -> TestResult {
        if width == 0 || liquidity == 0 {
            return TestResult::discard();
        }
        let lower = i32::from(lower_step) * 60;
        let upper = lower + i32::from(width) * 60;
        let mut sandbox = sandbox();
        let lp = sandbox.new_funded_account();
        let before = sandbox.balances(&lp);

        let minted = sandbox.mint(&lp, (lower, upper), Liquidity::from(liquidity)).unwrap();
        let burnt = sandbox.burn(&lp, (lower, upper), Liquidity::from(liquidity)).unwrap();
        let after = sandbox.balances(&lp);

        TestResult::from_bool(
            burnt.qty0 <= minted.qty0
                && burnt.qty1 <= minted.qty1
                && minted.qty0 - burnt.qty0 <= 1
                && minted.qty1 - burnt.qty1 <= 1
                && after.0 <= before.0
                && after.1 <= before.1
                && sandbox.pool().initialized_ticks().count() == 2,
        )
    }
}
