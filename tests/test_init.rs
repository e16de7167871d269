mod pool_builder;

use assert_matches::assert_matches;

use elastic_pool::dex::host::{Event, Host};
use elastic_pool::{ErrorKind, PoolId, Tick};

use pool_builder::{PoolSetup, OWNER, START_TIME, TOKEN_A, TOKEN_B};

#[test]
fn create_pool_registers_in_canonical_order() {
    let setup = PoolSetup::new(30);
    assert_eq!(*setup.pool_id.token0(), TOKEN_A);
    assert_eq!(*setup.pool_id.token1(), TOKEN_B);
    assert_eq!(setup.pool_id.fee(), 30);

    let pool = setup.host.pool(&setup.pool_id).unwrap();
    assert_eq!(pool.config().tick_distance, 60);
    assert_eq!(pool.address(), &setup.pool_address);
    assert_matches!(
        setup.host.logger.logs(),
        [Event::CreatePool { pool_id, tick_distance: 60, .. }] if *pool_id == setup.pool_id
    );
}

#[test]
fn create_pool_failures() {
    let mut host = Host::new(OWNER);
    host.create_pool((TOKEN_A, TOKEN_B), 30).unwrap();

    let error = host.create_pool((TOKEN_B, TOKEN_A), 30).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::PoolExists);
    let error = host.create_pool((TOKEN_A, TOKEN_A), 30).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::IdenticalTokens);
    let error = host.create_pool((TOKEN_A, TOKEN_B), 7).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UnknownFeeTier);
    // other tiers of the same pair are separate pools
    host.create_pool((TOKEN_A, TOKEN_B), 100).unwrap();
    assert_eq!(host.factory.pools().count(), 2);
    assert_eq!(host.logger.logs().len(), 2);
}

#[test]
fn enabled_fee_tier_allows_new_pools() {
    let mut host = Host::new(OWNER);
    host.configure(|config| config.enable_fee_tier(&OWNER, 8, 16))
        .unwrap();
    let error = host
        .configure(|config| config.enable_fee_tier(&OWNER, 8, 16))
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::FeeTierExists);

    let (pool_id, _) = host.create_pool((TOKEN_A, TOKEN_B), 8).unwrap();
    assert_eq!(host.pool(&pool_id).unwrap().config().tick_distance, 16);
    let (found, _) = PoolId::try_from_pair((TOKEN_B, TOKEN_A), 8).unwrap();
    assert_eq!(found, pool_id);
    assert!(host.factory.find_pool((TOKEN_B, TOKEN_A), 8).is_ok());
}

#[test]
fn only_owner_configures_fees() {
    let mut host = Host::new(OWNER);
    let stranger = pool_builder::ALICE;
    let error = host
        .update_fee_configuration(&stranger, Some(stranger), 1_000)
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::PermissionDenied);
    let error = host
        .update_fee_configuration(&OWNER, Some(stranger), 2_001)
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::IllegalFee);
    assert!(host.logger.logs().is_empty());

    host.update_fee_configuration(&OWNER, Some(stranger), 2_000)
        .unwrap();
    assert_eq!(
        host.factory.config().fee_configuration(),
        (Some(stranger), 2_000)
    );
    assert_matches!(
        host.logger.latest_logs(),
        [Event::FeeConfiguration { government_fee: 2_000, .. }]
    );
}

#[test]
fn unlock_initializes_pool() {
    let setup = PoolSetup::unlocked(30, -23_028);
    let pool = setup.host.pool(&setup.pool_id).unwrap();
    let (sqrt_price, tick, _, locked) = pool.pool_state();
    assert_eq!(tick, Tick::new(-23_028).unwrap());
    assert_eq!(sqrt_price, tick.sqrt_price());
    assert!(!locked);
    assert_eq!(pool.seconds_per_liquidity_data(), (0, START_TIME));
    assert_eq!(setup.host.observe(&setup.pool_id, &[0]).unwrap(), [0]);
    assert_matches!(setup.host.logger.latest_logs(), [Event::Initialize { .. }]);
}

#[test]
fn unlock_fails_for_unknown_pool() {
    let mut setup = PoolSetup::new(30);
    let (other, _) = PoolId::try_from_pair((TOKEN_A, TOKEN_B), 100).unwrap();
    let error = setup
        .host
        .call_pool(OWNER, &other, |pool, env| {
            pool.unlock_pool(env, Tick::ZERO.sqrt_price())
        })
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::PoolNotFound);
}
