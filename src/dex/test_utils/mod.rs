//! # Utilities for `dex` module testing
//!
//! * fresh account and token ids
//! * misbehaving callbacks: underpaying and re-entrant ones
//! * [`Sandbox`]: a host with a single pool and shortcuts for common calls
use std::sync::atomic::{AtomicU64, Ordering};

use crate::dex::{AccountId, TokenId};

mod callbacks;
mod sandbox;

pub use callbacks::{Reentrant, Underpayer};
pub use sandbox::Sandbox;

static ACCOUNT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);
static TOKEN_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique account id
pub fn new_account_id() -> AccountId {
    AccountId::derived(b'A', ACCOUNT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Unique token id, greater than any previously created one
pub fn new_token_id() -> TokenId {
    TokenId::derived(b'T', TOKEN_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Checks that any of elements in iterable collection matches specified pattern
///
/// # Parameters:
/// * `$iterable` - expression which resolves into any iterable collection
/// * `$pats` - matching patterns which should follow rules for `std::matches` macro
///
/// Intended usage:
/// ```ignore
/// assert_any_matches!(
///     sandbox.latest_logs(),
///     Event::Swap { .. }
/// );
/// ```
#[macro_export]
macro_rules! assert_any_matches {
    ($iterable:expr, $($pats:tt)+) => {
        let result = 'outer: loop {
            for item in $iterable {
                if matches!(item, $($pats)+) {
                    break 'outer true;
                }
            }

            break 'outer false;
        };
        if !result {
            panic!("assertion failed: no elements in `{}` matched pattern `{}`",
                stringify!($iterable), stringify!($($pats)+))
        }
    };
}
