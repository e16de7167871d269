use std::panic::Location;

use strum_macros::{EnumIter, FromRepr, IntoStaticStr};

use crate::fp;

/// Every way a pool operation can be rejected.
///
/// Discriminants are stable and may be exposed to hosts as numeric error codes,
/// see [`describe_error_code`].
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error, IntoStaticStr, FromRepr, EnumIter,
)]
#[repr(u8)]
pub enum ErrorKind {
    // Preconditions
    #[error("Lower tick must be below upper tick")]
    InvalidTickRange,
    #[error("Tick is out of bounds")]
    TickOutOfBounds,
    #[error("Tick is not a multiple of tick distance")]
    TickNotInDistance,
    #[error("Quantity must be non-zero")]
    ZeroQuantity,
    #[error("Pool is locked")]
    Locked,
    #[error("Pool is not initialized")]
    NotInitialized,
    #[error("Pool is already initialized")]
    AlreadyInitialized,
    #[error("Price limit is on the wrong side of the current price or out of bounds")]
    InvalidPriceLimit,
    #[error("Square root price is out of bounds")]
    PriceOutOfBounds,
    #[error("Previous tick hint is not initialized or is not below the tick")]
    InvalidTickHint,
    #[error("Tick is not initialized")]
    TickNotInitialized,
    #[error("Tick liquidity exceeds the maximum")]
    MaxTickLiquidityExceeded,
    #[error("Updating uninitialized tick with zero liquidity")]
    ZeroLiquidityTick,
    #[error("Liquidity would become negative")]
    LiquidityUnderflow,
    #[error("Caller lacks permission")]
    PermissionDenied,
    #[error("Caller is not a whitelisted position manager")]
    NotWhitelisted,
    #[error("Fee value is not allowed")]
    IllegalFee,
    #[error("Fee tier is not enabled")]
    UnknownFeeTier,
    #[error("Fee tier is already enabled")]
    FeeTierExists,
    #[error("Pool already exists")]
    PoolExists,
    #[error("Pool not found")]
    PoolNotFound,
    #[error("Pool tokens must differ")]
    IdenticalTokens,
    #[error("Not enough reinvestment tokens")]
    InsufficientClaimBalance,
    #[error("Not enough tokens on account")]
    InsufficientBalance,
    #[error("Invalid parameters")]
    InvalidParams,
    // Arithmetic
    #[error("Arithmetic overflow")]
    Overflow,
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Denominator too small relative to product")]
    DenominatorTooSmall,
    // Settlement
    #[error("Callback did not deliver the owed token amount")]
    InsufficientRepayment,
    #[error("Internal logic error")]
    InternalLogicError,
}

impl From<fp::Error> for ErrorKind {
    fn from(value: fp::Error) -> Self {
        match value {
            fp::Error::Overflow => ErrorKind::Overflow,
            fp::Error::DivisionByZero => ErrorKind::DivisionByZero,
            fp::Error::DenominatorTooSmall => ErrorKind::DenominatorTooSmall,
        }
    }
}

/// Error kind together with the place it was raised at
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} ({file}:{line})")]
pub struct Error {
    kind: ErrorKind,
    file: &'static str,
    line: u32,
}

impl Error {
    pub const fn new(kind: ErrorKind, file: &'static str, line: u32) -> Self {
        Self { kind, file, line }
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub const fn code(&self) -> u8 {
        self.kind as u8
    }

    pub const fn location(&self) -> (&'static str, u32) {
        (self.file, self.line)
    }
}

impl PartialEq<ErrorKind> for Error {
    fn eq(&self, other: &ErrorKind) -> bool {
        self.kind == *other
    }
}

impl From<ErrorKind> for Error {
    #[track_caller]
    fn from(kind: ErrorKind) -> Self {
        let location = Location::caller();
        Self::new(kind, location.file(), location.line())
    }
}

impl From<fp::Error> for Error {
    #[track_caller]
    fn from(value: fp::Error) -> Self {
        Error::from(ErrorKind::from(value))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Human-readable name of a numeric error code, as returned by [`Error::code`]
pub fn describe_error_code(code: u8) -> &'static str {
    ErrorKind::from_repr(code).map_or("Unknown error", Into::into)
}

/// Builds [`Error`] from anything convertible into [`ErrorKind`], capturing current location
#[macro_export]
macro_rules! error_here {
    ($kind:expr) => {
        $crate::dex::Error::new($crate::dex::ErrorKind::from($kind), file!(), line!())
    };
}

/// Returns early with [`Error`] built by `error_here!` if condition doesn't hold
#[macro_export]
macro_rules! ensure_here {
    ($cond:expr, $kind:expr) => {
        if !$cond {
            return Err($crate::error_here!($kind));
        }
    };
}
