//! Config: the immutable bundle of limits recognised by the core.

use std::fmt;

bitflags! {
	/// Syntactic forms the evaluator refuses outright. Attribute assignment
	/// has no such flag: there are no object attributes in this language at
	/// all, so it is always rejected, unconditionally, rather than being a
	/// policy choice a host can toggle.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
	pub struct DisabledFeatures: u8 {
		/// `[*a, *b]` / `{*a, *b}` / `{**a, **b}` starred-unpacking in literals.
		const STARRED_LITERAL = 0b001;
	}
}

/// Limits enforced throughout an execution. Read-only once handed to an
/// [`crate::Interpreter`] — it does not change mid-execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Bit width `b`; any `Int` outside `[-2^(b-1), 2^(b-1)-1]` raises
	/// `NumberTooHigh`.
	pub max_int_size: u32,
	/// Any container/string whose post-operation length would exceed this
	/// raises `IterableTooLong`.
	pub max_const_len: usize,
	/// Total loop iterations across the whole execution.
	pub max_loops: u64,
	/// Total statement executions across the whole execution.
	pub max_statements: u64,
	/// Syntactic forms disabled by policy.
	pub disabled_features: DisabledFeatures,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			max_int_size: 64,
			max_const_len: 10_000,
			max_loops: 1_000_000,
			max_statements: 1_000_000,
			disabled_features: DisabledFeatures::empty(),
		}
	}
}

impl Config {
	pub fn builder() -> ConfigBuilder {
		ConfigBuilder::default()
	}

	/// `2^(bits-1)`, the magnitude one past the positive bound.
	pub(crate) fn int_ceiling(&self) -> i128 {
		1i128 << (self.max_int_size - 1)
	}

	pub(crate) fn int_min(&self) -> i128 {
		-self.int_ceiling()
	}

	pub(crate) fn int_max(&self) -> i128 {
		self.int_ceiling() - 1
	}
}

/// Builder for [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
	config: ConfigOverrides,
}

#[derive(Debug, Clone, Default)]
struct ConfigOverrides {
	max_int_size: Option<u32>,
	max_const_len: Option<usize>,
	max_loops: Option<u64>,
	max_statements: Option<u64>,
	disabled_features: Option<DisabledFeatures>,
}

impl ConfigBuilder {
	pub fn max_int_size(mut self, bits: u32) -> Self {
		self.config.max_int_size = Some(bits);
		self
	}

	pub fn max_const_len(mut self, len: usize) -> Self {
		self.config.max_const_len = Some(len);
		self
	}

	pub fn max_loops(mut self, loops: u64) -> Self {
		self.config.max_loops = Some(loops);
		self
	}

	pub fn max_statements(mut self, statements: u64) -> Self {
		self.config.max_statements = Some(statements);
		self
	}

	pub fn disabled_features(mut self, features: DisabledFeatures) -> Self {
		self.config.disabled_features = Some(features);
		self
	}

	pub fn build(self) -> Config {
		let default = Config::default();
		Config {
			max_int_size: self.config.max_int_size.unwrap_or(default.max_int_size),
			max_const_len: self.config.max_const_len.unwrap_or(default.max_const_len),
			max_loops: self.config.max_loops.unwrap_or(default.max_loops),
			max_statements: self.config.max_statements.unwrap_or(default.max_statements),
			disabled_features: self.config.disabled_features.unwrap_or(default.disabled_features),
		}
	}
}

impl fmt::Display for Config {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Config(max_int_size={}, max_const_len={}, max_loops={}, max_statements={})",
			self.max_int_size, self.max_const_len, self.max_loops, self.max_statements
		)
	}
}
