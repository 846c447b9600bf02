use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// A floor identifier: a finite signed level, or the special infinity
/// floor that sits above every finite one.
///
/// The derived order puts every finite floor below `Infinity`, and finite
/// floors in numeric order, so sorted containers walk the board bottom-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FloorNumber {
    Finite(i32),
    Infinity,
}

impl FloorNumber {
    #[inline]
    pub fn is_infinite(self) -> bool {
        matches!(self, FloorNumber::Infinity)
    }

    /// The finite level, or `None` for the infinity floor.
    #[inline]
    pub fn as_finite(self) -> Option<i32> {
        match self {
            FloorNumber::Finite(n) => Some(n),
            FloorNumber::Infinity => None,
        }
    }
}

impl Add<i32> for FloorNumber {
    type Output = FloorNumber;

    fn add(self, rhs: i32) -> FloorNumber {
        match self {
            FloorNumber::Finite(n) => FloorNumber::Finite(n + rhs),
            FloorNumber::Infinity => FloorNumber::Infinity,
        }
    }
}

impl Sub<i32> for FloorNumber {
    type Output = FloorNumber;

    fn sub(self, rhs: i32) -> FloorNumber {
        match self {
            FloorNumber::Finite(n) => FloorNumber::Finite(n - rhs),
            FloorNumber::Infinity => FloorNumber::Infinity,
        }
    }
}

/// Error produced when text is neither a decimal integer nor `inf`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseFloorError(String);

impl fmt::Display for ParseFloorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid floor number {:?}, expected an integer or 'inf'",
            self.0
        )
    }
}

impl std::error::Error for ParseFloorError {}

impl FromStr for FloorNumber {
    type Err = ParseFloorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "inf" {
            return Ok(FloorNumber::Infinity);
        }
        s.parse::<i32>()
            .map(FloorNumber::Finite)
            .map_err(|_| ParseFloorError(s.to_string()))
    }
}

impl fmt::Display for FloorNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloorNumber::Finite(n) => write!(f, "{n}"),
            FloorNumber::Infinity => write!(f, "inf"),
        }
    }
}
