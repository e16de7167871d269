use std::collections::BTreeMap;

use crate::dex::{AccountId, ErrorKind, Liquidity, Oracle, Tick, Timestamp};

/// Cumulative tick at a point in time
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    pub timestamp: Timestamp,
    /// Sum of `tick * seconds` since initialization
    pub tick_cumulative: i64,
    /// Liquidity active during the interval ending at this sample
    pub liquidity: Liquidity,
}

/// Append-only observation history of every pool
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObservationLog {
    observations: BTreeMap<AccountId, Vec<Observation>>,
}

impl ObservationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observations(&self, pool: &AccountId) -> &[Observation] {
        self.observations
            .get(pool)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn accumulate(last: &Observation, tick: Tick, until: Timestamp) -> i64 {
        let elapsed = i64::from(until.saturating_sub(last.timestamp));
        last.tick_cumulative
            .wrapping_add(i64::from(tick.index()).wrapping_mul(elapsed))
    }
}

impl Oracle for ObservationLog {
    fn initialize(&mut self, pool: &AccountId, now: Timestamp) -> Result<(), ErrorKind> {
        if self.observations.contains_key(pool) {
            return Err(ErrorKind::AlreadyInitialized);
        }
        self.observations.insert(
            *pool,
            vec![Observation {
                timestamp: now,
                tick_cumulative: 0,
                liquidity: 0,
            }],
        );
        Ok(())
    }

    fn write(
        &mut self,
        pool: &AccountId,
        now: Timestamp,
        tick: Tick,
        liquidity: Liquidity,
    ) -> Result<(), ErrorKind> {
        let samples = self
            .observations
            .get_mut(pool)
            .ok_or(ErrorKind::NotInitialized)?;
        let last = *samples.last().ok_or(ErrorKind::NotInitialized)?;
        // one sample per timestamp
        if now <= last.timestamp {
            return Ok(());
        }
        samples.push(Observation {
            timestamp: now,
            tick_cumulative: Self::accumulate(&last, tick, now),
            liquidity,
        });
        Ok(())
    }

    fn observe(
        &self,
        pool: &AccountId,
        now: Timestamp,
        seconds_agos: &[Timestamp],
        tick: Tick,
    ) -> Result<Vec<i64>, ErrorKind> {
        let samples = self.observations(pool);
        let (first, last) = match (samples.first(), samples.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ErrorKind::NotInitialized),
        };
        seconds_agos
            .iter()
            .map(|seconds_ago| {
                let target = now
                    .checked_sub(*seconds_ago)
                    .ok_or(ErrorKind::InvalidParams)?;
                if target >= last.timestamp {
                    return Ok(Self::accumulate(last, tick, target));
                }
                if target < first.timestamp {
                    return Err(ErrorKind::InvalidParams);
                }
                // first sample after target, there is at least one before it
                let after_index = samples.partition_point(|sample| sample.timestamp <= target);
                let (before, after) = (&samples[after_index - 1], &samples[after_index]);
                if before.timestamp == target {
                    return Ok(before.tick_cumulative);
                }
                // tick was constant between two samples, so the cumulative grows linearly
                let span = i64::from(after.timestamp - before.timestamp);
                let offset = i64::from(target - before.timestamp);
                let growth = after.tick_cumulative.wrapping_sub(before.tick_cumulative);
                Ok(before.tick_cumulative + growth / span * offset)
            })
            .collect()
    }
}
