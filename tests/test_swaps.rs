mod pool_builder;

use elastic_pool::dex::host::{Event, FlashRepayer};
use elastic_pool::{ErrorKind, Tick, U256};

use pool_builder::{PoolSetup, ALICE, BOB, CAROL, OWNER};

fn setup_with_liquidity() -> PoolSetup {
    let mut setup = PoolSetup::unlocked(30, 0);
    setup.mint(ALICE, (-6_000, 6_000), 10_000_000_000_000).unwrap();
    setup.mint(BOB, (-600, 600), 5_000_000_000_000).unwrap();
    setup
}

#[test]
fn test_swaps() {
    let mut setup = setup_with_liquidity();
    let reserves = setup.balances(&setup.pool_address);

    let sold = setup.swap(CAROL, 50_000_000_000, true).unwrap();
    assert_eq!(sold.delta0, 50_000_000_000);
    assert!(sold.delta1 < 0);
    let bought = setup.swap(CAROL, -20_000_000_000, true).unwrap();
    assert_eq!(bought.delta0, -20_000_000_000);
    assert!(bought.delta1 > 0);

    let expected0 = reserves.0 + 30_000_000_000;
    let expected1 = (reserves.1 + bought.delta1.unsigned_abs()) - sold.delta1.unsigned_abs();
    assert_eq!(setup.balances(&setup.pool_address), (expected0, expected1));

    let pool = setup.host.pool(&setup.pool_id).unwrap();
    let (_, current, _, _) = pool.pool_state();
    assert!(current < Tick::ZERO);
    assert!(matches!(
        setup.host.logger.latest_logs(),
        [Event::Swap { sender, recipient, .. }] if *sender == CAROL && *recipient == CAROL
    ));
}

#[test]
fn test_swap_through_range_bounds() {
    let mut setup = setup_with_liquidity();
    setup.swap(CAROL, 1_000_000_000_000, false).unwrap();

    let pool = setup.host.pool(&setup.pool_id).unwrap();
    let (_, current, nearest, _) = pool.pool_state();
    assert!(current > Tick::new(600).unwrap());
    assert_eq!(nearest, Tick::new(600).unwrap());
    assert_eq!(pool.liquidity_state().base_l, 10_000_000_000_000);
    assert!(setup
        .host
        .logger
        .latest_logs()
        .iter()
        .any(|event| matches!(event, Event::Message(msg) if msg.starts_with("Crossed tick 600"))));
}

#[test]
fn test_swap_errors_leave_no_trace() {
    let mut setup = setup_with_liquidity();
    let pool = setup.host.pool(&setup.pool_id).unwrap().clone();
    let logs = setup.host.logger.logs().len();

    let error = setup.swap(CAROL, 0, true).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ZeroQuantity);
    // input is collected after output is sent, from an account holding nothing
    let penniless = elastic_pool::AccountId::derived(b'U', 99);
    let error = setup.swap(penniless, 1_000_000, true).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InsufficientBalance);

    assert_eq!(*setup.host.pool(&setup.pool_id).unwrap(), pool);
    assert_eq!(setup.host.logger.logs().len(), logs);
}

#[test]
fn test_protocol_fee_and_flash() {
    let mut setup = setup_with_liquidity();
    let treasury = elastic_pool::AccountId::derived(b'F', 1);
    setup
        .host
        .update_fee_configuration(&OWNER, Some(treasury), 2_000)
        .unwrap();

    for _ in 0..3 {
        let there = setup.swap(CAROL, 10_000_000_000, true).unwrap();
        setup.swap(CAROL, there.delta1.abs(), false).unwrap();
    }
    setup.collect(BOB, (-600, 600)).unwrap();
    let pool = setup.host.pool(&setup.pool_id).unwrap();
    assert!(pool.rtoken_balance(&treasury) > U256::zero());

    let pool_id = setup.pool_id;
    let mut repayer = FlashRepayer {
        payer: CAROL,
        loan: (1_000_000, 0),
        tip: (0, 0),
    };
    let paid = setup
        .host
        .call_pool(CAROL, &pool_id, |pool, env| {
            pool.flash(env, &CAROL, 1_000_000, 0, &mut repayer, &[])
        })
        .unwrap();
    assert_eq!(paid, (3_000, 0));
    assert_eq!(setup.balances(&treasury), (3_000, 0));
}

#[test]
fn test_time_weighted_tick() {
    let mut setup = setup_with_liquidity();
    setup.host.advance_time(100);
    setup.swap(CAROL, 2_000_000_000_000, true).unwrap();
    let tick = setup.host.pool(&setup.pool_id).unwrap().pool_state().1;
    setup.host.advance_time(50);

    let cumulatives = setup.host.observe(&setup.pool_id, &[0, 50, 150]).unwrap();
    // price sat at tick 0 for the first 100 seconds
    assert_eq!(cumulatives[1], 0);
    assert_eq!(cumulatives[2], 0);
    assert_eq!(cumulatives[0], i64::from(tick.index()) * 50);

    let error = setup.host.observe(&setup.pool_id, &[151]).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidParams);
}
