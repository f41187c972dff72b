use crate::parser::SourceLocation;
use std::fmt::{self, Display, Formatter};

#[derive(Debug)]
pub struct ParseError {
	pub whence: SourceLocation,
	pub kind: ParseErrorKind,
}

impl Display for ParseError {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.whence, self.kind)
	}
}

impl std::error::Error for ParseError {}

#[derive(Error, Debug)]
pub enum ParseErrorKind {
	#[error("there was nothing to parse")]
	EmptySource,

	#[error("character doesn't start a token: {0:?}")]
	UnknownTokenStart(char),

	#[error("integer literal overflowed")]
	IntegerLiteralOverflow,

	#[error("missing ending {0:?} quote")]
	MissingEndingQuote(char),

	#[error("inconsistent indentation")]
	BadIndentation,

	#[error("expected {expected}, found {found}")]
	UnexpectedToken { expected: &'static str, found: String },

	#[error("can only assign to names, tuples of names, or subscription targets")]
	InvalidAssignmentTarget,

	#[error("'{0}' outside loop")]
	LoopControlOutsideLoop(&'static str),
}

impl ParseErrorKind {
	pub fn error(self, whence: SourceLocation) -> ParseError {
		ParseError { whence, kind: self }
	}
}
