use derive_more::{Display, IsVariant};
use num_traits::ToPrimitive;

/// Numeric value produced by a literal or by arithmetic on literals.
///
/// Binary operations promote both sides to the wider of the two kinds,
/// in the order `Double`, `Single`, `Int64`, `Int32`.
#[derive(Copy, Clone, Debug, Display, PartialEq, IsVariant)]
pub enum Number {
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
}

impl Number {
    fn rank(&self) -> u8 {
        match self {
            Number::Int32(_) => 0,
            Number::Int64(_) => 1,
            Number::Single(_) => 2,
            Number::Double(_) => 3,
        }
    }

    pub fn is_floating_point(&self) -> bool {
        self.is_single() || self.is_double()
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::Int32(value) => Some(value.into()),
            Number::Int64(value) => Some(value),
            Number::Single(value) => value.to_i64(),
            Number::Double(value) => value.to_i64(),
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        self.as_i64()?.to_i32()
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int32(value) => value.into(),
            Number::Int64(value) => value as f64,
            Number::Single(value) => value.into(),
            Number::Double(value) => value,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.as_f64() == 0.0
    }

    /// Applies an operation after promoting both operands to a common kind.
    ///
    /// Integer operations return `None` when they have no result, such as division by zero.
    pub fn combine(
        self,
        other: Number,
        integer: impl Fn(i64, i64) -> Option<i64>,
        floating: impl Fn(f64, f64) -> Option<f64>,
    ) -> Option<Number> {
        match self.rank().max(other.rank()) {
            3 => floating(self.as_f64(), other.as_f64()).map(Number::Double),
            2 => floating(self.as_f64(), other.as_f64()).map(|value| Number::Single(value as f32)),
            1 => integer(self.as_i64()?, other.as_i64()?).map(Number::Int64),
            _ => integer(self.as_i64()?, other.as_i64()?).map(|value| Number::Int32(value as i32)),
        }
    }

    pub fn negate(self) -> Number {
        match self {
            Number::Int32(value) => Number::Int32(value.wrapping_neg()),
            Number::Int64(value) => Number::Int64(value.wrapping_neg()),
            Number::Single(value) => Number::Single(-value),
            Number::Double(value) => Number::Double(-value),
        }
    }

    /// Shifts by `amount` bits, keeping this number's kind.
    pub fn shift(self, amount: i64, left: bool) -> Option<Number> {
        let amount = u32::try_from(amount).ok()?;

        match self {
            Number::Int32(value) if left => Some(Number::Int32(value.checked_shl(amount)?)),
            Number::Int32(value) => Some(Number::Int32(value.checked_shr(amount)?)),
            Number::Int64(value) if left => Some(Number::Int64(value.checked_shl(amount)?)),
            Number::Int64(value) => Some(Number::Int64(value.checked_shr(amount)?)),
            Number::Single(_) | Number::Double(_) => None,
        }
    }

    pub fn compare(&self, other: &Number) -> Option<std::cmp::Ordering> {
        if self.is_floating_point() || other.is_floating_point() {
            self.as_f64().partial_cmp(&other.as_f64())
        } else {
            Some(self.as_i64()?.cmp(&other.as_i64()?))
        }
    }

    /// Converts the text of a numeric literal, such as `0x1F`, `10UL`, `5ui64` or `1.5e2f`.
    pub fn parse_literal(text: &str) -> Option<Number> {
        let lowered = text.to_ascii_lowercase();

        let (mut digits, is_hex) = match lowered.strip_prefix("0x") {
            Some(rest) => (rest, true),
            None => (lowered.as_str(), false),
        };

        if digits.is_empty() {
            return None;
        }

        let mut is_forced_64 = false;
        if digits.len() > 3 {
            if let Some(rest) = digits.strip_suffix("i64") {
                is_forced_64 = true;
                digits = rest;
            }
        }

        let mut is_floating_point = false;

        loop {
            match digits.chars().last() {
                Some('u') | Some('l') => (),
                Some('f') if !is_hex => is_floating_point = true,
                _ => break,
            }
            digits = &digits[..digits.len() - 1];
        }

        let is_single = is_floating_point;
        let mut exponent = 0;

        if !is_hex {
            if let Some(index) = digits.find('e') {
                exponent = digits[index + 1..].parse::<i32>().ok()?;
                is_floating_point = true;
                digits = &digits[..index];
            }

            if digits.contains('.') {
                is_floating_point = true;
            }
        }

        if digits.is_empty() {
            return None;
        }

        if is_floating_point {
            let value = digits.parse::<f64>().ok()? * 10f64.powi(exponent);

            return Some(if is_single {
                Number::Single(value as f32)
            } else {
                Number::Double(value)
            });
        }

        let radix = if is_hex {
            16
        } else if digits.len() > 1 && digits.starts_with('0') {
            8
        } else {
            10
        };

        let value = u64::from_str_radix(digits, radix).ok()?;

        if !is_forced_64 {
            if let Some(small) = value.to_i32() {
                return Some(Number::Int32(small));
            }
        }

        // Values beyond the signed 64-bit range keep their bit pattern
        Some(Number::Int64(value as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integers() {
        assert_eq!(Number::parse_literal("1"), Some(Number::Int32(1)));
        assert_eq!(Number::parse_literal("0xf"), Some(Number::Int32(15)));
        assert_eq!(Number::parse_literal("0xFFL"), Some(Number::Int32(255)));
        assert_eq!(Number::parse_literal("10UL"), Some(Number::Int32(10)));
        assert_eq!(Number::parse_literal("010"), Some(Number::Int32(8)));
        assert_eq!(Number::parse_literal("0"), Some(Number::Int32(0)));
        assert_eq!(Number::parse_literal("5ui64"), Some(Number::Int64(5)));
        assert_eq!(Number::parse_literal("0xFFFFFFFF"), Some(Number::Int64(0xFFFF_FFFF)));
        assert_eq!(Number::parse_literal("0x"), None);
        assert_eq!(Number::parse_literal("09"), None);
    }

    #[test]
    fn parses_floating_point() {
        assert_eq!(Number::parse_literal("0.1F"), Some(Number::Single(0.1)));
        assert_eq!(Number::parse_literal("1.5"), Some(Number::Double(1.5)));
        assert_eq!(Number::parse_literal("1e2"), Some(Number::Double(100.0)));
        assert_eq!(Number::parse_literal("0x5e5"), Some(Number::Int32(0x5e5)));
    }

    #[test]
    fn promotes() {
        let add = |a: Number, b: Number| {
            a.combine(b, |x, y| Some(x.wrapping_add(y)), |x, y| Some(x + y))
        };

        assert_eq!(add(Number::Int32(1), Number::Int32(2)), Some(Number::Int32(3)));
        assert_eq!(add(Number::Int64(1), Number::Int64(2)), Some(Number::Int64(3)));
        assert_eq!(add(Number::Int32(1), Number::Int64(2)), Some(Number::Int64(3)));
        assert_eq!(add(Number::Double(1.0), Number::Double(2.0)), Some(Number::Double(3.0)));
        assert_eq!(add(Number::Single(1.0), Number::Int64(2)), Some(Number::Single(3.0)));
        assert_eq!(add(Number::Single(1.0), Number::Double(2.0)), Some(Number::Double(3.0)));
    }

    #[test]
    fn shifts_keep_kind() {
        assert_eq!(Number::Int32(2).shift(1, true), Some(Number::Int32(4)));
        assert_eq!(Number::Int64(4).shift(1, false), Some(Number::Int64(2)));
        assert_eq!(Number::Double(4.0).shift(1, false), None);
    }
}
