use std::{
    fmt::{Debug, Display},
    iter::Sum,
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const DECIMALS: u8 = 2;

/// Currency amount as a fixed-point value with two decimal places,
/// stored as the raw i64 (cents) on the wire.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal(i64);

impl Decimal {
    pub fn int(value: i64) -> Decimal {
        Decimal(value * 10i64.pow(DECIMALS as u32))
    }

    pub fn zero() -> Decimal {
        Decimal(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn inner(&self) -> i64 {
        self.0
    }
}

impl Debug for Decimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = self.0 as f64 / 10i64.pow(DECIMALS as u32) as f64;
        write!(f, "{:.2}", value)
    }
}

impl From<f64> for Decimal {
    fn from(value: f64) -> Self {
        Decimal((value * 10f64.powi(DECIMALS as i32)).round() as i64)
    }
}

impl TryFrom<&str> for Decimal {
    type Error = ParseDecimalError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let val = value.parse::<f64>().map_err(|_| ParseDecimalError)?;
        Ok(Decimal::from(val))
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::try_from(s)
    }
}

impl std::ops::Add for Decimal {
    type Output = Decimal;

    fn add(self, other: Decimal) -> Decimal {
        Decimal(self.0 + other.0)
    }
}

impl std::ops::Sub for Decimal {
    type Output = Decimal;

    fn sub(self, other: Decimal) -> Decimal {
        Decimal(self.0 - other.0)
    }
}

impl std::ops::AddAssign for Decimal {
    fn add_assign(&mut self, other: Decimal) {
        self.0 += other.0;
    }
}

impl Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Decimal {
        iter.fold(Decimal::zero(), |acc, x| acc + x)
    }
}

#[derive(Debug)]
pub struct ParseDecimalError;

impl std::fmt::Display for ParseDecimalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse decimal value")
    }
}

impl std::error::Error for ParseDecimalError {}

impl Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        Ok(Decimal(value))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!("50.00", format!("{}", Decimal::int(50)));
        assert_eq!("0.00", format!("{}", Decimal::zero()));
        assert_eq!("19.99", format!("{}", Decimal::from(19.99)));
        assert_eq!("0.10", format!("{}", Decimal::from(0.1)));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Decimal::try_from("50").unwrap(), Decimal::int(50));
        assert_eq!(Decimal::try_from("19.99").unwrap(), Decimal::from(19.99));
        assert!(Decimal::try_from("fifty").is_err());
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let total: Decimal = [Decimal::from(10.50), Decimal::from(0.25), Decimal::int(5)]
            .into_iter()
            .sum();
        assert_eq!("15.75", format!("{}", total));
        assert_eq!(Decimal::int(5) - Decimal::int(5), Decimal::zero());
        assert!(Decimal::from(0.01).is_positive());
        assert!(!Decimal::zero().is_positive());
    }
}
