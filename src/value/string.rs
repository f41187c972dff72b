//! `SafeStr`: an immutable, length-checked string. Every constructor that
//! can grow a string (concatenation, repetition) is checked against
//! `Config::max_const_len` the same way the safe containers are.

use crate::error::Error;
use crate::options::Config;
use crate::parser::SourceLocation;
use std::fmt::{self, Debug, Display, Formatter};

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SafeStr(std::rc::Rc<str>);

impl Debug for SafeStr {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Debug::fmt(&*self.0, f)
	}
}

impl Display for SafeStr {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Display::fmt(&*self.0, f)
	}
}

impl SafeStr {
	pub fn new(source: impl AsRef<str>, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		let source = source.as_ref();
		if source.chars().count() > config.max_const_len {
			return Err(Error::IterableTooLong {
				where_: where_.clone(),
				detail: format!("string of length {} exceeds the limit of {}", source.chars().count(), config.max_const_len),
			});
		}
		Ok(Self(std::rc::Rc::from(source)))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.chars().count()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn concat(&self, other: &Self, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		let mut joined = String::with_capacity(self.0.len() + other.0.len());
		joined.push_str(&self.0);
		joined.push_str(&other.0);
		Self::new(joined, config, where_)
	}

	pub fn repeat(&self, count: i128, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		if count <= 0 {
			return Self::new("", config, where_);
		}
		let count = usize::try_from(count).map_err(|_| Error::IterableTooLong {
			where_: where_.clone(),
			detail: "repetition count too large".into(),
		})?;
		let len = self.len();
		if len.checked_mul(count).filter(|&n| n <= config.max_const_len).is_none() {
			return Err(Error::IterableTooLong {
				where_: where_.clone(),
				detail: format!("string of length {} exceeds the limit of {}", len.saturating_mul(count), config.max_const_len),
			});
		}
		Self::new(self.0.repeat(count), config, where_)
	}

	/// Single-character indexing with Python-style negative indices.
	pub fn char_at(&self, index: i128, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		let len = self.len() as i128;
		let idx = if index < 0 { index + len } else { index };
		if idx < 0 || idx >= len {
			return Err(Error::TypeError { where_: where_.clone(), detail: "string index out of range".into() });
		}
		let ch = self.0.chars().nth(idx as usize).expect("bounds already checked");
		Self::new(ch.to_string(), config, where_)
	}

	pub fn chars_as_values(&self, config: &Config, where_: &SourceLocation) -> Result<Vec<Self>, Error> {
		self.0.chars().map(|c| Self::new(c.to_string(), config, where_)).collect()
	}
}

impl Default for SafeStr {
	fn default() -> Self {
		Self(std::rc::Rc::from(""))
	}
}
