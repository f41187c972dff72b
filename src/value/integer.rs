//! Bounded integer arithmetic. `Int` wraps `i128` as the working precision:
//! wide enough that the configured `max_int_size` range (1..=64 bits) never
//! approaches `i128`'s own range, which keeps "full precision, then
//! bounds-check" practical without a bignum dependency.

use crate::error::Error;
use crate::options::Config;
use crate::parser::SourceLocation;
use std::fmt::{self, Debug, Display, Formatter};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Int(i128);

impl Debug for Int {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Debug::fmt(&self.0, f)
	}
}

impl Display for Int {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.0, f)
	}
}

impl Int {
	pub const ZERO: Self = Self(0);
	pub const ONE: Self = Self(1);

	pub fn inner(self) -> i128 {
		self.0
	}

	/// Constructs an `Int`, checking `value` against `config`'s bit width.
	/// This is the single choke point every arithmetic result and every
	/// literal passes through, so an out-of-range value can never exist in
	/// the first place, including out-of-range intermediate results.
	pub fn new(value: i128, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		if value < config.int_min() || value > config.int_max() {
			return Err(Error::NumberTooHigh {
				where_: where_.clone(),
				detail: format!(
					"{value} is outside the representable range for {}-bit integers",
					config.max_int_size
				),
			});
		}
		Ok(Self(value))
	}

	fn binary_op(
		self,
		rhs: Self,
		config: &Config,
		where_: &SourceLocation,
		op: &str,
		func: impl FnOnce(i128, i128) -> Option<i128>,
	) -> Result<Self, Error> {
		let value = func(self.0, rhs.0).ok_or_else(|| Error::NumberTooHigh {
			where_: where_.clone(),
			detail: format!("overflow computing {self} {op} {rhs}"),
		})?;
		Self::new(value, config, where_)
	}

	pub fn negate(self, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		self.binary_op(Self::ZERO, config, where_, "negate", |a, _| a.checked_neg())
	}

	pub fn add(self, rhs: Self, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		self.binary_op(rhs, config, where_, "+", i128::checked_add)
	}

	pub fn subtract(self, rhs: Self, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		self.binary_op(rhs, config, where_, "-", i128::checked_sub)
	}

	pub fn multiply(self, rhs: Self, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		self.binary_op(rhs, config, where_, "*", i128::checked_mul)
	}

	pub fn floor_divide(
		self,
		rhs: Self,
		config: &Config,
		where_: &SourceLocation,
	) -> Result<Self, Error> {
		if rhs.0 == 0 {
			return Err(Error::TypeError {
				where_: where_.clone(),
				detail: "integer division or modulo by zero".into(),
			});
		}
		self.binary_op(rhs, config, where_, "//", |a, b| {
			// Python's `//` floors toward negative infinity, unlike Rust's `/`.
			let q = a.checked_div(b)?;
			let r = a % b;
			Some(if (r != 0) && ((r < 0) != (b < 0)) { q - 1 } else { q })
		})
	}

	pub fn remainder(self, rhs: Self, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		if rhs.0 == 0 {
			return Err(Error::TypeError {
				where_: where_.clone(),
				detail: "integer division or modulo by zero".into(),
			});
		}
		self.binary_op(rhs, config, where_, "%", |a, b| {
			let r = a.rem_euclid(b.abs());
			Some(if b < 0 && r != 0 { r + b } else { r })
		})
	}

	/// `self ** exponent`. Computed at full `i128` precision; `checked_pow`
	/// short-circuits on overflow without materializing a huge intermediate.
	pub fn power(self, exponent: Self, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		if exponent.0 < 0 {
			return Err(Error::TypeError {
				where_: where_.clone(),
				detail: "negative exponent for integer power (use floats instead)".into(),
			});
		}
		let exp = u32::try_from(exponent.0).map_err(|_| Error::NumberTooHigh {
			where_: where_.clone(),
			detail: format!("exponent {exponent} too large"),
		})?;
		self.binary_op(exponent, config, where_, "**", |a, _| a.checked_pow(exp))
	}

	pub fn shift_left(self, rhs: Self, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		if rhs.0 < 0 || rhs.0 > 1024 {
			return Err(Error::NumberTooHigh {
				where_: where_.clone(),
				detail: format!("shift amount {rhs} out of range"),
			});
		}
		self.binary_op(rhs, config, where_, "<<", |a, b| a.checked_shl(b as u32))
	}

	pub fn shift_right(self, rhs: Self, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		if rhs.0 < 0 || rhs.0 > 1024 {
			return Err(Error::NumberTooHigh {
				where_: where_.clone(),
				detail: format!("shift amount {rhs} out of range"),
			});
		}
		self.binary_op(rhs, config, where_, ">>", |a, b| a.checked_shr(b as u32))
	}

	pub fn bit_and(self, rhs: Self, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		self.binary_op(rhs, config, where_, "&", |a, b| Some(a & b))
	}

	pub fn bit_or(self, rhs: Self, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		self.binary_op(rhs, config, where_, "|", |a, b| Some(a | b))
	}

	pub fn bit_xor(self, rhs: Self, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		self.binary_op(rhs, config, where_, "^", |a, b| Some(a ^ b))
	}

	pub fn bit_invert(self, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		Self::new(!self.0, config, where_)
	}

	pub fn to_f64(self) -> f64 {
		self.0 as f64
	}
}

impl From<bool> for Int {
	fn from(b: bool) -> Self {
		Self(b as i128)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn loc() -> SourceLocation {
		SourceLocation::default()
	}

	#[test]
	fn overflow_on_add() {
		let config = Config::builder().max_int_size(32).build();
		let max_int = Int::new(2147483647, &config, &loc()).unwrap();
		let one = Int::new(1, &config, &loc()).unwrap();
		assert!(max_int.add(one, &config, &loc()).is_err());
	}

	#[test]
	fn floor_division_matches_python_semantics() {
		let config = Config::builder().max_int_size(64).build();
		let a = Int::new(-7, &config, &loc()).unwrap();
		let b = Int::new(2, &config, &loc()).unwrap();
		assert_eq!(a.floor_divide(b, &config, &loc()).unwrap().inner(), -4);
	}

	#[test]
	fn remainder_matches_python_semantics() {
		let config = Config::builder().max_int_size(64).build();
		let a = Int::new(-7, &config, &loc()).unwrap();
		let b = Int::new(2, &config, &loc()).unwrap();
		assert_eq!(a.remainder(b, &config, &loc()).unwrap().inner(), 1);
	}
}
