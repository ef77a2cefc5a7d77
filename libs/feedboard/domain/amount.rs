use serde::{Deserialize, Serialize};
use std::fmt;

/// Bitcoin amount stored as an integer count of satoshis.
///
/// Sums stay exact no matter how many records are added or evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Btc(u64);

impl Btc {
    /// Satoshis per displayed coin
    pub const SATS_PER_BTC: u64 = 100_000_000;

    pub const ZERO: Btc = Btc(0);

    pub fn from_sats(sats: u64) -> Self {
        Btc(sats)
    }

    pub fn sats(&self) -> u64 {
        self.0
    }

    /// Display value, `sats / 1e8`
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / Self::SATS_PER_BTC as f64
    }

    pub fn checked_add(self, rhs: Btc) -> Option<Btc> {
        self.0.checked_add(rhs.0).map(Btc)
    }
}

impl fmt::Display for Btc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::SATS_PER_BTC;
        let frac = self.0 % Self::SATS_PER_BTC;
        write!(f, "{whole}.{frac:08}")
    }
}

impl std::ops::Add for Btc {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Btc(self.0.saturating_add(rhs.0))
    }
}

impl std::iter::Sum for Btc {
    fn sum<I: Iterator<Item = Btc>>(iter: I) -> Self {
        iter.fold(Btc::ZERO, |acc, amount| acc + amount)
    }
}

impl<'a> std::iter::Sum<&'a Btc> for Btc {
    fn sum<I: Iterator<Item = &'a Btc>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_f64_scales_by_1e8() {
        assert_eq!(Btc::from_sats(150_000_000).as_f64(), 1.5);
        assert_eq!(Btc::from_sats(1).as_f64(), 0.00000001);
        assert_eq!(Btc::ZERO.as_f64(), 0.0);
    }

    #[test]
    fn display_keeps_all_eight_places() {
        assert_eq!(Btc::from_sats(150_000_000).to_string(), "1.50000000");
        assert_eq!(Btc::from_sats(1).to_string(), "0.00000001");
        assert_eq!(Btc::from_sats(2_100_000_000_000_000).to_string(), "21000000.00000000");
    }

    #[test]
    fn checked_add_detects_overflow() {
        assert_eq!(Btc::from_sats(u64::MAX).checked_add(Btc::from_sats(1)), None);
        assert_eq!(
            Btc::from_sats(2).checked_add(Btc::from_sats(3)),
            Some(Btc::from_sats(5))
        );
    }

    #[test]
    fn sum_of_references() {
        let amounts = [Btc::from_sats(10), Btc::from_sats(20), Btc::from_sats(30)];
        let total: Btc = amounts.iter().sum();
        assert_eq!(total, Btc::from_sats(60));
    }

    #[test]
    fn serializes_as_plain_satoshis() {
        let json = serde_json::to_string(&Btc::from_sats(42)).unwrap();
        assert_eq!(json, "42");
    }
}
