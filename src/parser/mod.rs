mod error;
mod lexer;
mod parser;
mod source_location;

pub use error::{ParseError, ParseErrorKind};
pub use parser::Parser;
pub use source_location::SourceLocation;

use crate::ast::Module;

/// Parses a whole script into a [`Module`]. `filename` is attached to every
/// [`SourceLocation`] produced, for hosts that read scripts from disk
/// (`src/main.rs`); scripts evaluated directly from a string pass `None`.
pub fn parse(source: &str, filename: Option<&std::path::Path>) -> Result<Module, ParseError> {
	let tokens = lexer::tokenize(source, filename)?;
	parser::Parser::new(tokens).parse_module()
}
