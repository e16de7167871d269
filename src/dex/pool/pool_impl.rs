use std::cmp::Ordering;

use num_traits::WrappingAdd;

use super::{Env, LockState, Pool, PoolData, PoolState, PositionChange, SwapResult};
use crate::dex::{
    liquidity_math, reinvestment, swap_math,
    tick_ledger::{fee_growth_inside_of, range_position, Flip},
    AccountId, Amount, AmountDelta, BasisPoints, ErrorKind, FeeGrowth, FlashCallback, Liquidity,
    MintCallback, PositionKey, Result, SecondsPerLiquidity, SqrtPriceX96, SwapCallback, Tick,
    TokenId, BASIS_POINT_DIVISOR, MAX_SQRT_PRICE, MAX_TICK_DISTANCE, MIN_LIQUIDITY,
    MIN_SQRT_PRICE,
};
use crate::fp::{self, mul_div_floor, U256};
use crate::{ensure_here, error_here};

/// Signed token quantities of a position update, positive ones are owed to the pool
struct Tweak {
    qty0: AmountDelta,
    qty1: AmountDelta,
    fee_growth_inside: FeeGrowth,
}

/// Fee settlement state, loaded when a swap crosses its first initialized tick
struct SwapCache {
    total_supply: U256,
    reinvest_l_last: Liquidity,
    fee_growth_global: FeeGrowth,
    seconds_per_liquidity_global: SecondsPerLiquidity,
    fee_to: Option<AccountId>,
    government_fee: BasisPoints,
    government_qty: U256,
    lp_qty: U256,
}

fn flash_fee(qty: Amount, swap_fee: BasisPoints) -> Result<Amount, fp::Error> {
    fp::to_u128(mul_div_floor(
        U256::from(qty),
        U256::from(swap_fee),
        U256::from(BASIS_POINT_DIVISOR),
    )?)
}

impl Pool {
    /// Sets the initial price and makes the pool usable.
    ///
    /// The pool must already hold token quantities backing `MIN_LIQUIDITY` at that price.
    /// They become permanent reinvestment liquidity, with its claim tokens held by the pool.
    pub fn unlock_pool(&mut self, env: &mut Env<'_>, initial_sqrt_price: SqrtPriceX96) -> Result<()> {
        ensure_here!(
            self.lock == LockState::Uninitialized,
            ErrorKind::AlreadyInitialized
        );
        let tick = Tick::from_sqrt_price(initial_sqrt_price)?;
        let (qty0, qty1) = liquidity_math::unlock_qtys(initial_sqrt_price)?;
        let address = self.config.address;
        let id = self.config.id;
        ensure_here!(
            env.ledger.balance_of(id.token0(), &address) >= qty0,
            ErrorKind::InsufficientBalance
        );
        ensure_here!(
            env.ledger.balance_of(id.token1(), &address) >= qty1,
            ErrorKind::InsufficientBalance
        );

        let mut state = PoolState::new(PoolData::new(initial_sqrt_price, tick, env.now));
        state
            .claim_token
            .mint(&address, U256::from(MIN_LIQUIDITY))?;
        env.oracle.initialize(&address, env.now)?;

        self.state = state;
        self.lock = LockState::Unlocked;
        env.logger
            .log_initialize_event(&address, &initial_sqrt_price, tick);
        Ok(())
    }

    /// Adds `qty` liquidity to the position of `recipient` over `ticks` range.
    ///
    /// `ticks_previous` are hints for inserting lower and upper ticks, see [`TickLedger::insert`].
    /// Owed token quantities are collected through `callback`.
    ///
    /// [`TickLedger::insert`]: crate::dex::TickLedger::insert
    #[allow(clippy::too_many_arguments)]
    pub fn mint(
        &mut self,
        env: &mut Env<'_>,
        recipient: &AccountId,
        ticks: (Tick, Tick),
        ticks_previous: [Tick; 2],
        qty: Liquidity,
        callback: &mut dyn MintCallback,
        data: &[u8],
    ) -> Result<PositionChange> {
        self.with_lock(|pool| {
            ensure_here!(qty != 0, ErrorKind::ZeroQuantity);
            ensure_here!(
                env.config.is_whitelisted(&env.caller),
                ErrorKind::NotWhitelisted
            );
            let delta = i128::try_from(qty).map_err(|_| error_here!(ErrorKind::Overflow))?;
            let key = pool.position_key(recipient, ticks)?;
            let tweak = pool.tweak_position(env, &key, ticks_previous, delta)?;
            let (qty0, qty1) = (tweak.qty0.unsigned_abs(), tweak.qty1.unsigned_abs());

            let address = pool.config.address;
            let id = pool.config.id;
            let before0 = env.ledger.balance_of(id.token0(), &address);
            let before1 = env.ledger.balance_of(id.token1(), &address);
            callback.mint_callback(pool, env, qty0, qty1, data)?;
            pool.ensure_received(env, id.token0(), before0, qty0)?;
            pool.ensure_received(env, id.token1(), before1, qty1)?;

            env.logger.log_mint_event(
                &address,
                &env.caller,
                recipient,
                ticks,
                qty,
                (qty0, qty1),
            );
            Ok(PositionChange {
                qty0,
                qty1,
                fee_growth_inside_last: tweak.fee_growth_inside,
            })
        })
    }

    /// Removes `qty` liquidity from caller's position and pays the released tokens to the caller.
    ///
    /// Earned claim tokens stay with the position until [`Pool::collect_rtokens`].
    pub fn burn(
        &mut self,
        env: &mut Env<'_>,
        ticks: (Tick, Tick),
        qty: Liquidity,
    ) -> Result<PositionChange> {
        self.with_lock(|pool| {
            ensure_here!(qty != 0, ErrorKind::ZeroQuantity);
            let delta = i128::try_from(qty).map_err(|_| error_here!(ErrorKind::Overflow))?;
            let owner = env.caller;
            let key = pool.position_key(&owner, ticks)?;
            // hints are not used when liquidity goes down
            let tweak = pool.tweak_position(env, &key, [Tick::MIN; 2], -delta)?;
            let (qty0, qty1) = (tweak.qty0.unsigned_abs(), tweak.qty1.unsigned_abs());

            let id = pool.config.id;
            pool.pay(env, id.token0(), &owner, qty0)?;
            pool.pay(env, id.token1(), &owner, qty1)?;
            env.logger
                .log_burn_event(&pool.config.address, &owner, ticks, qty, (qty0, qty1));
            Ok(PositionChange {
                qty0,
                qty1,
                fee_growth_inside_last: tweak.fee_growth_inside,
            })
        })
    }

    /// Burns caller's claim tokens.
    ///
    /// A real burn settles pending fees, then takes `qty / total_supply` of reinvestment
    /// liquidity out of the pool and pays it to the caller in both tokens at current price.
    /// A logical burn only destroys the claim tokens, leaving their value to other holders.
    pub fn burn_rtokens(
        &mut self,
        env: &mut Env<'_>,
        qty: U256,
        is_logical_burn: bool,
    ) -> Result<(Amount, Amount)> {
        self.with_lock(|pool| {
            ensure_here!(!qty.is_zero(), ErrorKind::ZeroQuantity);
            let address = pool.config.address;
            let owner = env.caller;
            if is_logical_burn {
                pool.state.claim_token.burn(&owner, qty)?;
                env.logger
                    .log_burn_rtokens_event(&address, &owner, &qty, (0, 0));
                return Ok((0, 0));
            }

            pool.state.sync_fee_growth(env.config, &address, false)?;
            let PoolData {
                sqrt_price,
                reinvest_l,
                ..
            } = pool.state.data;
            let delta_l = reinvestment::liquidity_of_claim(
                qty,
                reinvest_l,
                pool.state.claim_token.total_supply(),
            )?;
            pool.state.claim_token.burn(&owner, qty)?;
            let reinvest_l = reinvest_l
                .checked_sub(delta_l)
                .ok_or_else(|| error_here!(ErrorKind::InternalLogicError))?;
            pool.state.data.reinvest_l = reinvest_l;
            pool.state.data.reinvest_l_last = reinvest_l;

            let (qty0, qty1) = liquidity_math::qtys_from_burn_rtokens(sqrt_price, delta_l)?;
            let id = pool.config.id;
            pool.pay(env, id.token0(), &owner, qty0)?;
            pool.pay(env, id.token1(), &owner, qty1)?;
            env.logger
                .log_burn_rtokens_event(&address, &owner, &qty, (qty0, qty1));
            Ok((qty0, qty1))
        })
    }

    /// Sends claim tokens accrued by caller's position to the caller
    pub fn collect_rtokens(&mut self, env: &mut Env<'_>, ticks: (Tick, Tick)) -> Result<U256> {
        self.with_lock(|pool| {
            let owner = env.caller;
            let key = PositionKey::new(owner, ticks.0, ticks.1)?;
            let owed = pool.state.positions.sweep(&key)?;
            let address = pool.config.address;
            pool.state.claim_token.transfer(&address, &owner, owed)?;
            env.logger
                .log_collect_rtokens_event(&address, &owner, ticks, &owed);
            Ok(owed)
        })
    }

    pub fn transfer_rtokens(&mut self, env: &mut Env<'_>, to: &AccountId, qty: U256) -> Result<()> {
        self.ensure_initialized()?;
        self.state.claim_token.transfer(&env.caller, to, qty)?;
        env.logger.log(format_args!(
            "Transferred {qty} reinvestment tokens from {} to {to}",
            env.caller
        ));
        Ok(())
    }

    /// Settles fees of caller's position without changing its liquidity.
    ///
    /// Returns the updated fee growth inside the position range.
    pub fn tweak_position_zero_liquidity(
        &mut self,
        env: &mut Env<'_>,
        ticks: (Tick, Tick),
    ) -> Result<FeeGrowth> {
        self.with_lock(|pool| {
            ensure_here!(
                env.config.is_whitelisted(&env.caller),
                ErrorKind::NotWhitelisted
            );
            let key = pool.position_key(&env.caller, ticks)?;
            let liquidity = pool
                .state
                .positions
                .get(&key)
                .map_or(0, |position| position.liquidity);
            ensure_here!(liquidity > 0, ErrorKind::ZeroQuantity);
            let tweak = pool.tweak_position(env, &key, [Tick::MIN; 2], 0)?;
            Ok(tweak.fee_growth_inside)
        })
    }

    /// Swaps `swap_qty` of the token selected by `is_token0`.
    ///
    /// Positive `swap_qty` is exact input, negative is exact output. The swap stops when
    /// the quantity is used up or price reaches `limit_sqrt_price`, whichever comes first.
    /// Output is sent to `recipient` before `callback` is asked for the input.
    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        &mut self,
        env: &mut Env<'_>,
        recipient: &AccountId,
        swap_qty: AmountDelta,
        is_token0: bool,
        limit_sqrt_price: SqrtPriceX96,
        callback: &mut dyn SwapCallback,
        data: &[u8],
    ) -> Result<SwapResult> {
        self.with_lock(|pool| {
            let (delta0, delta1) =
                pool.swap_within_range(env, swap_qty, is_token0, limit_sqrt_price)?;
            let will_up_tick = (swap_qty > 0) != is_token0;

            let address = pool.config.address;
            let id = pool.config.id;
            let (token_out, delta_out, token_in, delta_in) = if will_up_tick {
                (id.token0(), delta0, id.token1(), delta1)
            } else {
                (id.token1(), delta1, id.token0(), delta0)
            };
            if delta_out < 0 {
                pool.pay(env, token_out, recipient, delta_out.unsigned_abs())?;
            }
            let before = env.ledger.balance_of(token_in, &address);
            callback.swap_callback(pool, env, delta0, delta1, data)?;
            // input of a non-empty swap is never negative
            let owed = Amount::try_from(delta_in).unwrap_or_default();
            pool.ensure_received(env, token_in, before, owed)?;

            let PoolData {
                sqrt_price,
                current_tick,
                base_l,
                reinvest_l,
                ..
            } = pool.state.data;
            env.logger.log_swap_event(
                &address,
                &env.caller,
                recipient,
                (delta0, delta1),
                &sqrt_price,
                base_l.saturating_add(reinvest_l),
                current_tick,
            );
            Ok(SwapResult { delta0, delta1 })
        })
    }

    /// Lends `qty0` and `qty1` to `recipient` for the duration of `callback`.
    ///
    /// The loan must come back with a fee of `qty * swap_fee / BASIS_POINT_DIVISOR`, charged
    /// only while a fee recipient is configured. Everything paid back above the loan goes to
    /// the fee recipient, or stays in the pool if there is none.
    /// Returns amounts paid above the loan.
    #[allow(clippy::too_many_arguments)]
    pub fn flash(
        &mut self,
        env: &mut Env<'_>,
        recipient: &AccountId,
        qty0: Amount,
        qty1: Amount,
        callback: &mut dyn FlashCallback,
        data: &[u8],
    ) -> Result<(Amount, Amount)> {
        self.with_lock(|pool| {
            let address = pool.config.address;
            let id = pool.config.id;
            let (fee_to, _) = env.config.fee_configuration();
            let (fee0, fee1) = match fee_to {
                Some(_) => {
                    let swap_fee = pool.config.swap_fee();
                    (flash_fee(qty0, swap_fee)?, flash_fee(qty1, swap_fee)?)
                }
                None => (0, 0),
            };

            let before0 = env.ledger.balance_of(id.token0(), &address);
            let before1 = env.ledger.balance_of(id.token1(), &address);
            pool.pay(env, id.token0(), recipient, qty0)?;
            pool.pay(env, id.token1(), recipient, qty1)?;
            callback.flash_callback(pool, env, fee0, fee1, data)?;
            pool.ensure_received(env, id.token0(), before0, fee0)?;
            pool.ensure_received(env, id.token1(), before1, fee1)?;

            let paid0 = env.ledger.balance_of(id.token0(), &address) - before0;
            let paid1 = env.ledger.balance_of(id.token1(), &address) - before1;
            if let Some(fee_to) = fee_to {
                pool.pay(env, id.token0(), &fee_to, paid0)?;
                pool.pay(env, id.token1(), &fee_to, paid1)?;
            }
            env.logger.log_flash_event(
                &address,
                &env.caller,
                recipient,
                (qty0, qty1),
                (paid0, paid1),
            );
            Ok((paid0, paid1))
        })
    }

    fn position_key(&self, owner: &AccountId, (lower, upper): (Tick, Tick)) -> Result<PositionKey> {
        let key = PositionKey::new(*owner, lower, upper)?;
        let tick_distance = self.config.tick_distance;
        ensure_here!(
            lower.is_aligned(tick_distance) && upper.is_aligned(tick_distance),
            ErrorKind::TickNotInDistance
        );
        Ok(key)
    }

    /// Applies `liquidity_delta` to a position, its bounding ticks and, if the range is
    /// active, to base liquidity.
    ///
    /// Fees are settled first, so the position is credited with claim tokens earned
    /// by its previous liquidity.
    fn tweak_position(
        &mut self,
        env: &mut Env<'_>,
        key: &PositionKey,
        ticks_previous: [Tick; 2],
        liquidity_delta: i128,
    ) -> Result<Tweak> {
        let address = self.config.address;
        let PoolData {
            sqrt_price,
            current_tick,
            base_l,
            ..
        } = self.state.data;
        let position = range_position(key.range(), current_tick);
        if liquidity_delta != 0 && position == Ordering::Equal {
            env.oracle
                .write(&address, env.now, current_tick, base_l)?;
        }

        let fee_growth_global = self.state.sync_fee_growth(env.config, &address, true)?;
        let seconds_per_liquidity_global = self
            .state
            .data
            .sync_seconds_per_liquidity(env.now, base_l);

        let lower_outside = self.update_tick(
            env,
            key.tick_lower,
            ticks_previous[0],
            liquidity_delta,
            (fee_growth_global, seconds_per_liquidity_global),
            true,
        )?;
        let upper_outside = self.update_tick(
            env,
            key.tick_upper,
            ticks_previous[1],
            liquidity_delta,
            (fee_growth_global, seconds_per_liquidity_global),
            false,
        )?;
        let fee_growth_inside =
            fee_growth_inside_of(position, lower_outside, upper_outside, fee_growth_global);
        self.state
            .positions
            .update(key, liquidity_delta, fee_growth_inside)?;

        let is_add = liquidity_delta > 0;
        let liquidity = liquidity_delta.unsigned_abs();
        let sqrt_lower = key.tick_lower.sqrt_price();
        let sqrt_upper = key.tick_upper.sqrt_price();
        let (qty0, qty1) = match position {
            Ordering::Less => (
                liquidity_math::qty0_signed(sqrt_lower, sqrt_upper, liquidity, is_add)?,
                0,
            ),
            Ordering::Greater => (
                0,
                liquidity_math::qty1_signed(sqrt_lower, sqrt_upper, liquidity, is_add)?,
            ),
            Ordering::Equal => {
                let qty0 = liquidity_math::qty0_signed(sqrt_price, sqrt_upper, liquidity, is_add)?;
                let qty1 = liquidity_math::qty1_signed(sqrt_lower, sqrt_price, liquidity, is_add)?;
                self.state.data.base_l = liquidity_math::add_delta(base_l, liquidity_delta)?;
                (qty0, qty1)
            }
        };
        Ok(Tweak {
            qty0,
            qty1,
            fee_growth_inside,
        })
    }

    /// Updates a single position bound, keeping the nearest initialized tick current.
    ///
    /// Returns fee growth outside of the tick.
    fn update_tick(
        &mut self,
        env: &mut Env<'_>,
        tick: Tick,
        hint: Tick,
        liquidity_delta: i128,
        (fee_growth_global, seconds_per_liquidity_global): (FeeGrowth, SecondsPerLiquidity),
        is_lower: bool,
    ) -> Result<FeeGrowth> {
        let PoolData {
            current_tick,
            nearest_current_tick,
            ..
        } = self.state.data;
        let update = self.state.ticks.update_tick(
            tick,
            current_tick,
            hint,
            liquidity_delta,
            fee_growth_global,
            seconds_per_liquidity_global,
            is_lower,
            self.config.max_tick_liquidity,
        )?;
        match update.flip {
            Flip::Initialized if nearest_current_tick < tick && tick <= current_tick => {
                self.state.data.nearest_current_tick = tick;
            }
            Flip::Cleared { previous } if tick == nearest_current_tick => {
                self.state.data.nearest_current_tick = previous;
            }
            _ => {}
        }
        if liquidity_delta != 0 {
            let state = self.state.ticks.state(tick).copied().unwrap_or_default();
            env.logger.log_tick_update_event(
                &self.config.address,
                tick,
                state.liquidity_gross,
                state.liquidity_net,
            );
        }
        Ok(update.fee_growth_outside)
    }

    /// Moves the price, settling fees at every crossed tick.
    ///
    /// Updates pool state and returns `(delta0, delta1)`; no tokens are moved.
    fn swap_within_range(
        &mut self,
        env: &mut Env<'_>,
        swap_qty: AmountDelta,
        is_token0: bool,
        limit_sqrt_price: SqrtPriceX96,
    ) -> Result<(AmountDelta, AmountDelta)> {
        ensure_here!(swap_qty != 0, ErrorKind::ZeroQuantity);
        let is_exact_input = swap_qty > 0;
        // exact input of token0 or exact output of token1 pushes the price down
        let will_up_tick = is_exact_input != is_token0;
        let initial = self.state.data;
        if will_up_tick {
            ensure_here!(
                limit_sqrt_price > initial.sqrt_price && limit_sqrt_price < MAX_SQRT_PRICE,
                ErrorKind::InvalidPriceLimit
            );
        } else {
            ensure_here!(
                limit_sqrt_price < initial.sqrt_price && limit_sqrt_price > MIN_SQRT_PRICE,
                ErrorKind::InvalidPriceLimit
            );
        }

        let address = self.config.address;
        let swap_fee = self.config.swap_fee();
        let mut sqrt_price = initial.sqrt_price;
        let mut current_tick = initial.current_tick;
        let mut base_l = initial.base_l;
        let mut reinvest_l = initial.reinvest_l;
        let mut next_tick = if will_up_tick {
            self.state.ticks.next(initial.nearest_current_tick)?
        } else {
            initial.nearest_current_tick
        };
        let mut specified = swap_qty;
        let mut returned: AmountDelta = 0;
        let mut cache: Option<SwapCache> = None;

        while specified != 0 && sqrt_price != limit_sqrt_price {
            // keep every step short enough for the fee formulas to hold
            let temp_next_tick = if will_up_tick {
                next_tick.min(current_tick.shifted(MAX_TICK_DISTANCE).unwrap_or(Tick::MAX))
            } else {
                next_tick.max(current_tick.shifted(-MAX_TICK_DISTANCE).unwrap_or(Tick::MIN))
            };
            let start_sqrt_price = sqrt_price;
            let next_sqrt_price = temp_next_tick.sqrt_price();
            let target_sqrt_price = if will_up_tick == (next_sqrt_price > limit_sqrt_price) {
                limit_sqrt_price
            } else {
                next_sqrt_price
            };

            let liquidity = base_l
                .checked_add(reinvest_l)
                .ok_or_else(|| error_here!(ErrorKind::Overflow))?;
            let step = swap_math::compute_swap_step(
                liquidity,
                sqrt_price,
                target_sqrt_price,
                swap_fee,
                specified,
                is_exact_input,
                is_token0,
            )?;
            sqrt_price = step.next_sqrt_price;
            // same sign and not greater in magnitude
            specified -= step.used;
            returned = returned
                .checked_add(step.returned)
                .ok_or_else(|| error_here!(ErrorKind::Overflow))?;
            reinvest_l = reinvest_l
                .checked_add(step.delta_l)
                .ok_or_else(|| error_here!(ErrorKind::Overflow))?;

            if sqrt_price != next_sqrt_price {
                if sqrt_price != start_sqrt_price {
                    current_tick = Tick::from_sqrt_price(sqrt_price)?;
                }
                break;
            }
            current_tick = if will_up_tick {
                temp_next_tick
            } else {
                temp_next_tick.shifted(-1)?
            };
            if temp_next_tick != next_tick {
                continue;
            }

            let state = &mut self.state;
            let now = env.now;
            let config = env.config;
            let cache = cache.get_or_insert_with(|| {
                let (fee_to, government_fee) = config.fee_configuration();
                SwapCache {
                    total_supply: state.claim_token.total_supply(),
                    reinvest_l_last: state.data.reinvest_l_last,
                    fee_growth_global: state.data.fee_growth_global,
                    seconds_per_liquidity_global: state
                        .data
                        .sync_seconds_per_liquidity(now, base_l),
                    fee_to,
                    government_fee,
                    government_qty: U256::zero(),
                    lp_qty: U256::zero(),
                }
            });

            let rmint_qty = reinvestment::calc_rmint_qty(
                reinvest_l,
                cache.reinvest_l_last,
                base_l,
                cache.total_supply,
            )?;
            if !rmint_qty.is_zero() {
                let (government_qty, lp_qty) =
                    reinvestment::split_government_fee(rmint_qty, cache.government_fee);
                let overflow = || error_here!(ErrorKind::Overflow);
                cache.total_supply = cache.total_supply.checked_add(rmint_qty).ok_or_else(overflow)?;
                cache.government_qty = cache
                    .government_qty
                    .checked_add(government_qty)
                    .ok_or_else(overflow)?;
                cache.lp_qty = cache.lp_qty.checked_add(lp_qty).ok_or_else(overflow)?;
                let increment = reinvestment::fee_growth_increment(lp_qty, base_l)?;
                cache.fee_growth_global =
                    WrappingAdd::wrapping_add(&cache.fee_growth_global, &increment);
            }
            cache.reinvest_l_last = reinvest_l;

            let (liquidity_net, following_tick) = self.state.ticks.cross_tick(
                next_tick,
                cache.fee_growth_global,
                cache.seconds_per_liquidity_global,
                will_up_tick,
            )?;
            env.logger.log(format_args!(
                "Crossed tick {next_tick}, liquidity net {liquidity_net}"
            ));
            base_l = liquidity_math::add_delta(base_l, liquidity_net)?;
            next_tick = following_tick;
        }

        let mut updated = self.state.data;
        if let Some(cache) = cache {
            if let Some(fee_to) = cache.fee_to {
                self.state.claim_token.mint(&fee_to, cache.government_qty)?;
            }
            self.state.claim_token.mint(&address, cache.lp_qty)?;
            updated.reinvest_l_last = cache.reinvest_l_last;
            updated.fee_growth_global = cache.fee_growth_global;
        }
        if current_tick != initial.current_tick {
            env.oracle
                .write(&address, env.now, initial.current_tick, initial.base_l)?;
        }
        updated.nearest_current_tick = if next_tick > current_tick {
            self.state.ticks.previous(next_tick)?
        } else {
            next_tick
        };
        updated.sqrt_price = sqrt_price;
        updated.current_tick = current_tick;
        updated.base_l = base_l;
        updated.reinvest_l = reinvest_l;
        self.state.data = updated;

        let consumed = swap_qty - specified;
        Ok(if is_token0 {
            (consumed, returned)
        } else {
            (returned, consumed)
        })
    }

    /// Sends `qty` of pool's `token` to `to`
    fn pay(&self, env: &mut Env<'_>, token: &TokenId, to: &AccountId, qty: Amount) -> Result<()> {
        if qty > 0 {
            env.ledger.transfer(token, &self.config.address, to, qty)?;
        }
        Ok(())
    }

    /// Checks that pool's `token` balance grew by at least `owed` since `before`
    fn ensure_received(
        &self,
        env: &Env<'_>,
        token: &TokenId,
        before: Amount,
        owed: Amount,
    ) -> Result<()> {
        let expected = before
            .checked_add(owed)
            .ok_or_else(|| error_here!(ErrorKind::Overflow))?;
        ensure_here!(
            env.ledger.balance_of(token, &self.config.address) >= expected,
            ErrorKind::InsufficientRepayment
        );
        Ok(())
    }
}
