use std::{
    iter::Sum,
    ops::{Add, Div},
    str::FromStr,
};

/// a cumulative count of kernel clock ticks.
///
/// `/proc/stat` reports time in units of USER_HZ, usually 1/100th of a second.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct UserHz(u64);

// === impl UserHz ===

impl UserHz {
    pub const ZERO: Self = Self(0);

    pub const fn new(ticks: u64) -> Self {
        Self(ticks)
    }

    pub const fn get(self) -> u64 {
        let Self(ticks) = self;
        ticks
    }

    /// returns the ticks elapsed since `earlier`.
    ///
    /// counters that moved backwards (iowait may) yield zero.
    pub const fn since(self, earlier: Self) -> Self {
        let (Self(now), Self(then)) = (self, earlier);
        Self(now.saturating_sub(then))
    }
}

impl FromStr for UserHz {
    type Err = <u64 as FromStr>::Err;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl Add for UserHz {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        let (Self(lhs), Self(rhs)) = (self, rhs);
        Self(lhs.saturating_add(rhs))
    }
}

impl Sum for UserHz {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Div for UserHz {
    type Output = f64;
    fn div(self, rhs: Self) -> Self::Output {
        #[allow(clippy::cast_precision_loss, reason = "tick deltas are far below 2^52")]
        let to_float = |Self(hz)| -> f64 { hz as f64 };
        let (lhs, rhs) = (to_float(self), to_float(rhs));

        lhs / rhs
    }
}
