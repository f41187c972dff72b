//! Native (Rust-implemented) builtin functions, as opposed to [`Function`](
//! crate::value::Function)s defined by `def` in user scripts. Plain `fn`
//! pointers are enough since builtins are stateless; everything they need
//! (the length/width limits, a location for error attribution) is passed in
//! at call time.

use crate::error::Error;
use crate::options::Config;
use crate::parser::SourceLocation;
use crate::value::Value;

pub struct NativeFunction {
	pub name: &'static str,
	pub func: fn(&[Value], &Config, &SourceLocation) -> Result<Value, Error>,
}

impl std::fmt::Debug for NativeFunction {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "<built-in function {}>", self.name)
	}
}
