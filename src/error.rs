use crate::parser::SourceLocation;
use std::fmt::{self, Display, Formatter};

/// The closed set of envelope errors a host can rely on, plus a generic
/// runtime type error and a parse error.
#[derive(Error, Debug)]
pub enum Error {
	/// An integer result (or operand) fell outside `[-2^(b-1), 2^(b-1)-1]`.
	#[error("{where_} number too high: {detail}")]
	NumberTooHigh { where_: SourceLocation, detail: String },

	/// A container grew, or would have grown, past `max_const_len`.
	#[error("{where_} iterable too long: {detail}")]
	IterableTooLong { where_: SourceLocation, detail: String },

	/// A statement or loop-iteration counter was exhausted.
	#[error("{where_} too many statements executed")]
	TooManyStatements { where_: SourceLocation },

	/// A syntactic or semantic form disabled by policy was used.
	#[error("{where_} feature not available: {detail}")]
	FeatureNotAvailable { where_: SourceLocation, detail: String },

	/// Informational: a runtime type mismatch (indexing an int, calling a
	/// non-callable, etc). Not one of the four contractually stable kinds.
	#[error("{where_} type error: {detail}")]
	TypeError { where_: SourceLocation, detail: String },

	/// A name wasn't found in locals, outer scopes, or builtins.
	#[error("{where_} name {name:?} is not defined")]
	NameError { where_: SourceLocation, name: String },

	/// Source text failed to parse.
	#[error("{0}")]
	Parse(#[from] crate::parser::ParseError),
}

impl Error {
	pub fn where_(&self) -> Option<&SourceLocation> {
		match self {
			Self::NumberTooHigh { where_, .. }
			| Self::IterableTooLong { where_, .. }
			| Self::TooManyStatements { where_ }
			| Self::FeatureNotAvailable { where_, .. }
			| Self::TypeError { where_, .. }
			| Self::NameError { where_, .. } => Some(where_),
			Self::Parse(_) => None,
		}
	}

	/// A coarse classification used by tests and host-facing diagnostics.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::NumberTooHigh { .. } => ErrorKind::NumberTooHigh,
			Self::IterableTooLong { .. } => ErrorKind::IterableTooLong,
			Self::TooManyStatements { .. } => ErrorKind::TooManyStatements,
			Self::FeatureNotAvailable { .. } => ErrorKind::FeatureNotAvailable,
			Self::TypeError { .. } => ErrorKind::TypeError,
			Self::NameError { .. } => ErrorKind::NameError,
			Self::Parse(_) => ErrorKind::Parse,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	NumberTooHigh,
	IterableTooLong,
	TooManyStatements,
	FeatureNotAvailable,
	TypeError,
	NameError,
	Parse,
}

impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::NumberTooHigh => "NumberTooHigh",
			Self::IterableTooLong => "IterableTooLong",
			Self::TooManyStatements => "TooManyStatements",
			Self::FeatureNotAvailable => "FeatureNotAvailable",
			Self::TypeError => "TypeError",
			Self::NameError => "NameError",
			Self::Parse => "ParseError",
		};
		f.write_str(name)
	}
}

pub type Result<T> = std::result::Result<T, Error>;
