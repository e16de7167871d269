use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;

use crate::dex::test_utils::Sandbox;
use crate::dex::{AccountId, Amount, AmountDelta, Liquidity, SwapResult, Tick};
use crate::fp::U256;

struct SwapContext {
    state: Sandbox,
    providers: Vec<(AccountId, (i32, i32), Liquidity)>,
    trader: AccountId,
}

impl SwapContext {
    /// Pool in 0.3% tier at tick 0 with a deep wide position and a few narrow ones
    fn new() -> Self {
        let mut state = Sandbox::new(30);
        state.unlock_at_tick(0).unwrap();
        let trader = state.new_funded_account();
        let mut context = Self {
            state,
            providers: Vec::new(),
            trader,
        };
        context.provide((-60_000, 60_000), 1_000_000_000_000_000);
        context.provide((-600, 600), 300_000_000_000_000);
        context.provide((-1_200, -600), 200_000_000_000_000);
        context.provide((0, 1_800), 500_000_000_000_000);
        context
    }

    fn provide(&mut self, range: (i32, i32), liquidity: Liquidity) {
        let provider = self.state.new_funded_account();
        self.state.mint(&provider, range, liquidity).unwrap();
        self.providers.push((provider, range, liquidity));
    }

    fn swap(&mut self, qty: AmountDelta, is_token0: bool) -> SwapResult {
        let trader = self.trader;
        self.state.swap(&trader, qty, is_token0, None).unwrap()
    }

    fn total_balances(&self) -> (Amount, Amount) {
        let reserves = self.state.reserves();
        let trader = self.state.balances(&self.trader);
        self.providers
            .iter()
            .map(|(provider, _, _)| self.state.balances(provider))
            .fold(
                (reserves.0 + trader.0, reserves.1 + trader.1),
                |acc, balance| (acc.0 + balance.0, acc.1 + balance.1),
            )
    }

    /// Checks relations which must hold between any two operations
    fn check_invariants(&self) {
        let pool = self.state.pool();
        let (sqrt_price, current, nearest, locked) = pool.pool_state();
        assert!(!locked);
        assert!(current.sqrt_price() <= sqrt_price);
        assert!(sqrt_price <= current.shifted(1).unwrap().sqrt_price());

        assert!(nearest <= current);
        assert!(pool.tick_link(nearest).is_some());
        assert!(pool.tick_link(nearest).unwrap().next > current);

        let active: Liquidity = pool
            .state()
            .positions
            .iter()
            .filter(|(key, _)| key.tick_lower <= current && current < key.tick_upper)
            .map(|(_, position)| position.liquidity)
            .sum();
        let liquidity = pool.liquidity_state();
        assert_eq!(liquidity.base_l, active);
        assert!(liquidity.reinvest_l >= liquidity.reinvest_l_last);
    }
}

#[rstest]
#[case(1_000, true)]
#[case(1_000, false)]
#[case(-1_000, true)]
#[case(-1_000, false)]
#[case(10_000_000_000_000, true)]
#[case(10_000_000_000_000, false)]
#[case(-10_000_000_000_000, true)]
#[case(-10_000_000_000_000, false)]
fn single_swap_settles_specified_amount(#[case] qty: AmountDelta, #[case] is_token0: bool) {
    let mut context = SwapContext::new();
    let totals = context.total_balances();
    let result = context.swap(qty, is_token0);

    let (specified, other) = if is_token0 {
        (result.delta0, result.delta1)
    } else {
        (result.delta1, result.delta0)
    };
    assert_eq!(specified, qty);
    // the other side is always paid in the opposite direction
    assert!(other.signum() == -qty.signum());
    assert_eq!(context.total_balances(), totals);
    context.check_invariants();
}

#[test]
fn large_swaps_cross_ranges_both_ways() {
    let mut context = SwapContext::new();
    let start = context.state.pool().pool_state().1;

    context.swap(200_000_000_000_000, true);
    let low = context.state.pool().pool_state().1;
    assert!(low < Tick::new(-600).unwrap());
    context.check_invariants();

    context.swap(400_000_000_000_000, false);
    let high = context.state.pool().pool_state().1;
    assert!(high > Tick::new(600).unwrap());
    context.check_invariants();

    assert!(low < start && start < high);
}

#[test]
fn exact_output_swap_stops_at_limit() {
    let mut context = SwapContext::new();
    let trader = context.trader;
    let limit = Tick::new(-60).unwrap().sqrt_price();
    let result = context
        .state
        .swap(&trader, -1_000_000_000_000_000, false, Some(limit))
        .unwrap();

    assert!(result.delta1 > -1_000_000_000_000_000);
    assert!(result.delta0 > 0);
    assert_eq!(context.state.pool().pool_state().0, limit);
    context.check_invariants();
}

#[test]
fn random_swaps_keep_pool_consistent() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut context = SwapContext::new();
    let totals = context.total_balances();

    for _ in 0..200 {
        let magnitude = 10i128.pow(rng.gen_range(3..14));
        let qty = rng.gen_range(1..10) * magnitude;
        let qty = if rng.gen_bool(0.5) { qty } else { -qty };
        context.swap(qty, rng.gen_bool(0.5));
        context.check_invariants();
        assert_eq!(context.total_balances(), totals);
    }
}

#[test]
fn random_swaps_with_liquidity_changes() {
    let mut rng = StdRng::seed_from_u64(0xF00D);
    let mut context = SwapContext::new();
    let tick_distance = context.state.tick_distance();

    for round in 0..100 {
        if round % 10 == 0 {
            let lower = rng.gen_range(-30..30) * tick_distance;
            let width = rng.gen_range(1..20) * tick_distance;
            context.provide((lower, lower + width), rng.gen_range(1..1_000) * 1_000_000_000_000);
        }
        if round % 25 == 24 {
            let (provider, range, liquidity) = context.providers.remove(1);
            context.state.burn(&provider, range, liquidity).unwrap();
            context.state.poke_and_collect(&provider, range).unwrap_err();
        }
        let qty = rng.gen_range(1..1_000) * 100_000_000_000;
        context.swap(qty, rng.gen_bool(0.5));
        context.check_invariants();
    }

    let pool = context.state.pool();
    assert!(pool.liquidity_state().reinvest_l > crate::dex::MIN_LIQUIDITY);
    assert!(pool.rtoken_supply() > U256::from(crate::dex::MIN_LIQUIDITY));
}

#[test]
fn swap_moves_price_in_expected_direction() {
    let mut context = SwapContext::new();
    let price = |context: &SwapContext| context.state.pool().pool_state().0;

    let before = price(&context);
    context.swap(1_000_000_000, true);
    assert!(price(&context) < before);

    let before = price(&context);
    context.swap(-1_000_000_000, true);
    assert!(price(&context) > before);

    let before = price(&context);
    context.swap(1_000_000_000, false);
    assert!(price(&context) > before);

    let before = price(&context);
    context.swap(-1_000_000_000, false);
    assert!(price(&context) < before);
}
