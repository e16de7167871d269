//! Registry of initialized ticks.
//!
//! Tick records live in an arena keyed by tick index. Initialized ticks are also linked
//! in ascending order through plain `Tick` keys, so a swap finds the next initialized tick
//! in either direction without scanning. `Tick::MIN` and `Tick::MAX` are permanent
//! sentinels of the list and are never unlinked.
use std::cmp::Ordering;
use std::collections::BTreeMap;

use num_traits::WrappingSub;

use super::{
    liquidity_math, ErrorKind, FeeGrowth, Liquidity, SecondsPerLiquidity, Tick, MAX_TICK_TRAVEL,
};

/// Liquidity and accumulators of a single initialized tick
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickState {
    /// Total liquidity of positions bounded by this tick
    pub liquidity_gross: Liquidity,
    /// Liquidity added to the pool when price crosses the tick upwards
    pub liquidity_net: i128,
    /// Fee growth on the side of the tick away from the current price
    pub fee_growth_outside: FeeGrowth,
    pub seconds_per_liquidity_outside: SecondsPerLiquidity,
}

/// Neighbours of an initialized tick
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickLink {
    pub previous: Tick,
    pub next: Tick,
}

/// How tick's initialized status changed after an update
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flip {
    Unchanged,
    Initialized,
    /// Tick was removed, `previous` is the nearest initialized tick below it
    Cleared { previous: Tick },
}

/// Result of [`TickLedger::update_tick`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickUpdate {
    /// Tick's fee growth outside after the update, also if the tick was cleared
    pub fee_growth_outside: FeeGrowth,
    pub seconds_per_liquidity_outside: SecondsPerLiquidity,
    pub flip: Flip,
}

impl TickUpdate {
    pub fn flipped(&self) -> bool {
        self.flip != Flip::Unchanged
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickLedger {
    ticks: BTreeMap<Tick, TickState>,
    links: BTreeMap<Tick, TickLink>,
}

impl Default for TickLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl TickLedger {
    /// Ledger containing only the two sentinels
    pub fn new() -> Self {
        let sentinel = TickLink {
            previous: Tick::MIN,
            next: Tick::MAX,
        };
        Self {
            ticks: BTreeMap::new(),
            links: BTreeMap::from([(Tick::MIN, sentinel), (Tick::MAX, sentinel)]),
        }
    }

    pub fn state(&self, tick: Tick) -> Option<&TickState> {
        self.ticks.get(&tick)
    }

    pub fn link(&self, tick: Tick) -> Option<&TickLink> {
        self.links.get(&tick)
    }

    pub fn is_initialized(&self, tick: Tick) -> bool {
        self.links.contains_key(&tick)
    }

    pub fn next(&self, tick: Tick) -> Result<Tick, ErrorKind> {
        self.link(tick)
            .map(|link| link.next)
            .ok_or(ErrorKind::TickNotInitialized)
    }

    pub fn previous(&self, tick: Tick) -> Result<Tick, ErrorKind> {
        self.link(tick)
            .map(|link| link.previous)
            .ok_or(ErrorKind::TickNotInitialized)
    }

    /// Initialized ticks in ascending order, sentinels included
    pub fn iter_initialized(&self) -> impl Iterator<Item = Tick> + '_ {
        std::iter::successors(Some(Tick::MIN), move |tick| {
            if *tick == Tick::MAX {
                None
            } else {
                self.next(*tick).ok()
            }
        })
    }

    /// Links `tick` into the list.
    ///
    /// `hint` must be initialized and not above `tick`. Starting from it, up to
    /// `MAX_TICK_TRAVEL` initialized ticks may be skipped to find the actual predecessor,
    /// which tolerates hints made stale by concurrent insertions.
    pub fn insert(&mut self, tick: Tick, hint: Tick) -> Result<(), ErrorKind> {
        let mut previous = hint;
        let mut next = self.next(previous).map_err(|_| ErrorKind::InvalidTickHint)?;
        let mut travelled = 0;
        while next <= tick && travelled < MAX_TICK_TRAVEL {
            previous = next;
            next = self.next(previous)?;
            travelled += 1;
        }
        if !(previous < tick && tick < next) {
            return Err(ErrorKind::InvalidTickHint);
        }
        self.links.insert(tick, TickLink { previous, next });
        self.link_mut(previous)?.next = tick;
        self.link_mut(next)?.previous = tick;
        Ok(())
    }

    /// Unlinks `tick`, returning the nearest initialized tick below it.
    ///
    /// Sentinels stay in place: removing `MIN` returns `MIN`, removing `MAX` returns its predecessor.
    pub fn remove(&mut self, tick: Tick) -> Result<Tick, ErrorKind> {
        let TickLink { previous, next } = *self.link(tick).ok_or(ErrorKind::TickNotInitialized)?;
        if tick == Tick::MIN {
            return Ok(tick);
        }
        if tick == Tick::MAX {
            return Ok(previous);
        }
        self.link_mut(previous)?.next = next;
        self.link_mut(next)?.previous = previous;
        self.links.remove(&tick);
        Ok(previous)
    }

    /// Drops tick's liquidity and accumulators
    pub fn clear(&mut self, tick: Tick) {
        self.ticks.remove(&tick);
    }

    /// Adds `liquidity_delta` of a position bounded by `tick`.
    ///
    /// - `current` - pool's current tick, decides which side fee growth of a new tick belongs to
    /// - `hint` - initialized tick not above `tick`, used if the tick becomes initialized
    /// - `is_lower` - whether `tick` is the lower bound of the position
    ///
    /// Zero delta is allowed only for an initialized tick and changes nothing.
    #[allow(clippy::too_many_arguments)]
    pub fn update_tick(
        &mut self,
        tick: Tick,
        current: Tick,
        hint: Tick,
        liquidity_delta: i128,
        fee_growth_global: FeeGrowth,
        seconds_per_liquidity_global: SecondsPerLiquidity,
        is_lower: bool,
        max_tick_liquidity: Liquidity,
    ) -> Result<TickUpdate, ErrorKind> {
        let before = self.ticks.get(&tick).copied().unwrap_or_default();
        if before.liquidity_gross == 0 && liquidity_delta == 0 {
            return Err(ErrorKind::ZeroLiquidityTick);
        }
        if liquidity_delta == 0 {
            return Ok(TickUpdate {
                fee_growth_outside: before.fee_growth_outside,
                seconds_per_liquidity_outside: before.seconds_per_liquidity_outside,
                flip: Flip::Unchanged,
            });
        }

        let gross_after = liquidity_math::add_delta(before.liquidity_gross, liquidity_delta)?;
        if gross_after > max_tick_liquidity {
            return Err(ErrorKind::MaxTickLiquidityExceeded);
        }
        // crossing upwards activates positions starting here and deactivates ones ending here
        let net_after = if is_lower {
            before.liquidity_net.checked_add(liquidity_delta)
        } else {
            before.liquidity_net.checked_sub(liquidity_delta)
        }
        .ok_or(ErrorKind::Overflow)?;

        let mut after = TickState {
            liquidity_gross: gross_after,
            liquidity_net: net_after,
            ..before
        };
        // by convention, all growth before initialization happened below the tick
        if before.liquidity_gross == 0 && tick <= current {
            after.fee_growth_outside = fee_growth_global;
            after.seconds_per_liquidity_outside = seconds_per_liquidity_global;
        }
        let update = TickUpdate {
            fee_growth_outside: after.fee_growth_outside,
            seconds_per_liquidity_outside: after.seconds_per_liquidity_outside,
            flip: Flip::Unchanged,
        };

        let is_sentinel = tick == Tick::MIN || tick == Tick::MAX;
        match (before.liquidity_gross > 0, gross_after > 0) {
            (false, true) => {
                self.ticks.insert(tick, after);
                if is_sentinel {
                    return Ok(update);
                }
                self.insert(tick, hint)?;
                Ok(TickUpdate {
                    flip: Flip::Initialized,
                    ..update
                })
            }
            (true, false) => {
                self.clear(tick);
                if is_sentinel {
                    return Ok(update);
                }
                let previous = self.remove(tick)?;
                Ok(TickUpdate {
                    flip: Flip::Cleared { previous },
                    ..update
                })
            }
            _ => {
                self.ticks.insert(tick, after);
                Ok(update)
            }
        }
    }

    /// Moves price across initialized `tick`.
    ///
    /// Flips tick's outside accumulators to the other side and returns
    /// liquidity delta to apply to the pool together with the next tick to cross.
    pub fn cross_tick(
        &mut self,
        tick: Tick,
        fee_growth_global: FeeGrowth,
        seconds_per_liquidity_global: SecondsPerLiquidity,
        will_up_tick: bool,
    ) -> Result<(i128, Tick), ErrorKind> {
        let link = *self.link(tick).ok_or(ErrorKind::TickNotInitialized)?;
        let state = self
            .ticks
            .get_mut(&tick)
            .ok_or(ErrorKind::TickNotInitialized)?;
        state.fee_growth_outside =
            WrappingSub::wrapping_sub(&fee_growth_global, &state.fee_growth_outside);
        state.seconds_per_liquidity_outside =
            seconds_per_liquidity_global.wrapping_sub(state.seconds_per_liquidity_outside);
        if will_up_tick {
            Ok((state.liquidity_net, link.next))
        } else {
            let net = state
                .liquidity_net
                .checked_neg()
                .ok_or(ErrorKind::Overflow)?;
            Ok((net, link.previous))
        }
    }

    fn outside_pair<T: Default>(
        &self,
        (lower, upper): (Tick, Tick),
        get: impl Fn(&TickState) -> T,
    ) -> (T, T) {
        // not initialized ticks have nothing outside
        let outside = |tick| self.ticks.get(&tick).map(&get).unwrap_or_default();
        (outside(lower), outside(upper))
    }

    /// Fee growth accumulated within `lower..upper` range
    pub fn fee_growth_inside(
        &self,
        range: (Tick, Tick),
        current: Tick,
        fee_growth_global: FeeGrowth,
    ) -> FeeGrowth {
        let (lower_outside, upper_outside) =
            self.outside_pair(range, |state| state.fee_growth_outside);
        fee_growth_inside_of(
            range_position(range, current),
            lower_outside,
            upper_outside,
            fee_growth_global,
        )
    }

    /// Seconds per liquidity accumulated within `lower..upper` range, same scheme as fees
    pub fn seconds_per_liquidity_inside(
        &self,
        range: (Tick, Tick),
        current: Tick,
        seconds_per_liquidity_global: SecondsPerLiquidity,
    ) -> SecondsPerLiquidity {
        let (lower_outside, upper_outside) =
            self.outside_pair(range, |state| state.seconds_per_liquidity_outside);
        match range_position(range, current) {
            Ordering::Equal => seconds_per_liquidity_global
                .wrapping_sub(lower_outside)
                .wrapping_sub(upper_outside),
            Ordering::Less => lower_outside.wrapping_sub(upper_outside),
            Ordering::Greater => upper_outside.wrapping_sub(lower_outside),
        }
    }

    fn link_mut(&mut self, tick: Tick) -> Result<&mut TickLink, ErrorKind> {
        self.links
            .get_mut(&tick)
            .ok_or(ErrorKind::InternalLogicError)
    }
}

/// Fee growth inside a range given outside values of its bounds,
/// `position` being the result of [`range_position`]
pub fn fee_growth_inside_of(
    position: Ordering,
    lower_outside: FeeGrowth,
    upper_outside: FeeGrowth,
    fee_growth_global: FeeGrowth,
) -> FeeGrowth {
    match position {
        Ordering::Equal => {
            // global:        ////////.////////.////////
            // lower_outside: ////////.        .
            // upper_outside:         .        .////////
            // inside = global - lower_outside - upper_outside
            WrappingSub::wrapping_sub(
                &WrappingSub::wrapping_sub(&fee_growth_global, &lower_outside),
                &upper_outside,
            )
        }
        Ordering::Less => {
            // global:        ////////.////////.////////
            // lower_outside:         .////////.////////
            // upper_outside:         .        .////////
            // inside = lower_outside - upper_outside
            WrappingSub::wrapping_sub(&lower_outside, &upper_outside)
        }
        Ordering::Greater => {
            // global:        ////////.////////.////////
            // lower_outside: ////////.        .
            // upper_outside: ////////.////////.
            // inside = upper_outside - lower_outside
            WrappingSub::wrapping_sub(&upper_outside, &lower_outside)
        }
    }
}

/// Where `current` tick lies relative to `lower..upper` range:
/// `Less` if below, `Equal` if within, `Greater` if at or above upper
pub fn range_position((lower, upper): (Tick, Tick), current: Tick) -> Ordering {
    if current < lower {
        Ordering::Less
    } else if current >= upper {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}
