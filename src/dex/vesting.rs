//! Anti-snipe vesting of position fees.
//!
//! Liquidity added right before a large swap and removed right after would collect fees
//! without bearing any price risk. Position managers counter that by locking freshly
//! earned fees and releasing them over a vesting period. Fees still locked when liquidity
//! is removed are forfeited proportionally, and the manager burns them logically,
//! which hands their value to the remaining claim token holders.
use super::{BasisPoints, Liquidity, Timestamp, BASIS_POINT_DIVISOR};
use crate::fp::U256;

/// Vesting state of a single position
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct VestingRecord {
    pub last_action_time: Timestamp,
    /// Liquidity-weighted time the position has been providing since
    pub lock_time: Timestamp,
    /// Time at which all currently locked fees are released
    pub unlock_time: Timestamp,
    pub fees_locked: U256,
}

/// Result of [`VestingRecord::update`]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct VestingOutcome {
    /// Fees the owner may collect now
    pub claimable: U256,
    /// Locked fees forfeited by removed liquidity
    pub burnable: U256,
}

/// Strategy deciding which fraction of fees a position may claim.
pub trait FeeVesting {
    /// Returns claimable fractions in basis points of `(locked fees, fees since last action)`
    fn claimable_fractions(&self, record: &VestingRecord, now: Timestamp) -> (BasisPoints, BasisPoints);

    /// Period over which fees get released, zero if they are released immediately
    fn vesting_period(&self) -> Timestamp;
}

/// All fees are claimable right away
#[derive(Copy, Clone, Debug, Default)]
pub struct ImmediateRelease;

impl FeeVesting for ImmediateRelease {
    fn claimable_fractions(&self, _: &VestingRecord, _: Timestamp) -> (BasisPoints, BasisPoints) {
        (BASIS_POINT_DIVISOR, BASIS_POINT_DIVISOR)
    }

    fn vesting_period(&self) -> Timestamp {
        0
    }
}

/// Fees get released linearly over `period` seconds
#[derive(Copy, Clone, Debug)]
pub struct LinearVesting {
    pub period: Timestamp,
}

fn elapsed_fraction(elapsed: Timestamp, period: Timestamp) -> BasisPoints {
    if period == 0 {
        return BASIS_POINT_DIVISOR;
    }
    let fraction = u64::from(elapsed) * u64::from(BASIS_POINT_DIVISOR) / u64::from(period);
    // bounded by divisor after `min`
    #[allow(clippy::cast_possible_truncation)]
    let fraction = fraction.min(u64::from(BASIS_POINT_DIVISOR)) as BasisPoints;
    fraction
}

impl FeeVesting for LinearVesting {
    fn claimable_fractions(&self, record: &VestingRecord, now: Timestamp) -> (BasisPoints, BasisPoints) {
        // locked fees vest from the last action, as earlier part was already released then
        let vested = if record.unlock_time <= record.last_action_time {
            BASIS_POINT_DIVISOR
        } else {
            elapsed_fraction(
                now.saturating_sub(record.last_action_time),
                record.unlock_time - record.last_action_time,
            )
        };
        // new fees are measured against the whole lifetime of the position
        let since_last_action = elapsed_fraction(now.saturating_sub(record.lock_time), self.period);
        (vested, since_last_action)
    }

    fn vesting_period(&self) -> Timestamp {
        self.period
    }
}

/// Splits locked and new fees by their claimable fractions.
///
/// Returns `(fees_locked, fees_claimable)`
pub fn calc_fee_proportions(
    locked: U256,
    new: U256,
    locked_claimable: BasisPoints,
    new_claimable: BasisPoints,
) -> (U256, U256) {
    let divisor = U256::from(BASIS_POINT_DIVISOR);
    let claimable = (U256::from(locked_claimable) * locked + U256::from(new_claimable) * new) / divisor;
    (locked + new - claimable, claimable)
}

impl VestingRecord {
    pub fn new(now: Timestamp) -> Self {
        Self {
            last_action_time: now,
            lock_time: now,
            unlock_time: now,
            fees_locked: U256::zero(),
        }
    }

    /// Accounts fees earned since last action and a liquidity change of the position.
    ///
    /// - `current_liquidity` - position liquidity before the change
    /// - `liquidity_delta` - magnitude of the change, `is_add` tells its direction
    /// - `fees_since_last_action` - claim tokens earned since the previous update
    pub fn update(
        &mut self,
        strategy: &dyn FeeVesting,
        current_liquidity: Liquidity,
        liquidity_delta: Liquidity,
        now: Timestamp,
        is_add: bool,
        fees_since_last_action: U256,
    ) -> VestingOutcome {
        let period = strategy.vesting_period();
        if period == 0 {
            return VestingOutcome {
                claimable: fees_since_last_action,
                burnable: U256::zero(),
            };
        }
        let (vested, since_last_action) = strategy.claimable_fractions(self, now);
        let locked_before = self.fees_locked;
        let (fees_locked, claimable) =
            calc_fee_proportions(locked_before, fees_since_last_action, vested, since_last_action);

        // unlock time of the remaining locked fees is the weighted average of both portions
        self.unlock_time = if fees_locked.is_zero() {
            now
        } else {
            let divisor = U256::from(BASIS_POINT_DIVISOR);
            let old_portion = U256::from(self.unlock_time)
                * locked_before
                * (divisor - U256::from(vested));
            let new_portion = U256::from(now.saturating_add(period))
                * fees_since_last_action
                * (divisor - U256::from(since_last_action));
            let average = (old_portion + new_portion) / (fees_locked * divisor);
            // weighted average of two timestamps
            #[allow(clippy::cast_possible_truncation)]
            let average = average.low_u64().min(u64::from(Timestamp::MAX)) as Timestamp;
            average
        };

        let mut outcome = VestingOutcome {
            claimable,
            burnable: U256::zero(),
        };
        let mut fees_locked = fees_locked;
        if is_add {
            let updated_liquidity = U256::from(current_liquidity) + U256::from(liquidity_delta);
            let weighted = U256::from(self.lock_time) * U256::from(current_liquidity)
                + U256::from(now) * U256::from(liquidity_delta);
            if !updated_liquidity.is_zero() {
                let (quotient, remainder) = weighted.div_mod(updated_liquidity);
                let average = quotient + U256::from(u8::from(!remainder.is_zero()));
                #[allow(clippy::cast_possible_truncation)]
                let average = average.low_u64().min(u64::from(now)) as Timestamp;
                self.lock_time = average;
            }
        } else if !fees_locked.is_zero() && current_liquidity > 0 {
            let burnable = fees_locked * U256::from(liquidity_delta.min(current_liquidity))
                / U256::from(current_liquidity);
            fees_locked -= burnable;
            outcome.burnable = burnable;
        }
        self.fees_locked = fees_locked;
        self.last_action_time = now;
        outcome
    }
}
