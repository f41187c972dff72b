#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate thiserror;

mod ast;
mod builtins;
mod container;
mod env;
mod error;
mod eval;
mod governor;
mod options;
mod parser;
mod value;

pub use env::Frame;
pub use error::{Error, ErrorKind, Result};
pub use eval::Evaluator;
pub use options::{Config, ConfigBuilder, DisabledFeatures};
pub use parser::{parse, ParseError, ParseErrorKind, SourceLocation};
pub use value::Value;

use ast::StmtKind;
use governor::Governor;
use std::collections::HashMap;

/// A self-contained sandbox: a name environment, a builtin table, and the
/// resource limits everything inside it is checked against. Bindings made by
/// one `execute`/`eval` call are visible to the next — state persists for
/// the lifetime of the `Interpreter`, the same way a long-lived embedding
/// host expects a script's top-level `def`s and assignments to stick around.
pub struct Interpreter {
	config: Config,
	builtins: HashMap<String, Value>,
	governor: Governor,
	root: Frame,
}

impl Interpreter {
	pub fn new(config: Config) -> Self {
		let governor = Governor::new(&config);
		Self { config, builtins: builtins::default_builtins(), governor, root: Frame::root() }
	}

	/// Registers or overrides a name in the builtin tier, below every
	/// script-level scope. Hosts use this to expose callables (dice rollers,
	/// character-sheet lookups, ...) without touching the language core.
	pub fn set_builtin(&mut self, name: impl Into<String>, value: Value) {
		self.builtins.insert(name.into(), value);
	}

	/// A snapshot of the top-level local bindings made so far.
	pub fn names(&self) -> HashMap<String, Value> {
		self.root.names()
	}

	/// Evaluates a single expression and returns its value. `source` must
	/// parse to exactly one expression statement — anything with multiple
	/// statements, or a statement that isn't a bare expression, is rejected
	/// rather than silently running only part of it.
	pub fn eval(&self, source: &str) -> Result<Value> {
		self.governor.reset();
		let module = parser::parse(source, None)?;
		let [stmt] = module.body.as_slice() else {
			return Err(Error::TypeError {
				where_: SourceLocation::default(),
				detail: "eval() expects source that is a single expression".into(),
			});
		};
		let StmtKind::Expr(expr) = &stmt.kind else {
			return Err(Error::TypeError {
				where_: stmt.loc.clone(),
				detail: "eval() expects source that is a single expression".into(),
			});
		};
		self.governor.tick_statement(&stmt.loc)?;
		let evaluator = Evaluator::new(&self.config, &self.governor, &self.builtins);
		evaluator.eval_expr(expr, &self.root)
	}

	/// Runs a whole script: any number of statements, including `def`,
	/// control flow, and loops. Returns the value of the last top-level bare
	/// expression statement, or `None` if the script didn't end in one (or
	/// returned early via a top-level `return`).
	pub fn execute(&self, source: &str) -> Result<Value> {
		self.governor.reset();
		let module = parser::parse(source, None)?;
		let evaluator = Evaluator::new(&self.config, &self.governor, &self.builtins);
		evaluator.exec_module(&module, &self.root)
	}
}

impl Default for Interpreter {
	fn default() -> Self {
		Self::new(Config::default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn execute_persists_bindings_across_calls() {
		let interp = Interpreter::default();
		interp.execute("x = 41").unwrap();
		let v = interp.execute("x + 1").unwrap();
		match v {
			Value::Int(i) => assert_eq!(i.inner(), 42),
			_ => panic!("expected int"),
		}
	}

	#[test]
	fn eval_rejects_multi_statement_source() {
		let interp = Interpreter::default();
		assert!(interp.eval("x = 1\nx").is_err());
		assert!(interp.eval("1 + 1").is_ok());
	}

	#[test]
	fn host_supplied_builtin_is_reachable_from_scripts() {
		let mut interp = Interpreter::default();
		interp.set_builtin("PI", Value::Float(3.5));
		let v = interp.execute("PI").unwrap();
		match v {
			Value::Float(x) => assert_eq!(x, 3.5),
			_ => panic!("expected float"),
		}
	}

	#[test]
	fn governor_counters_reset_between_unrelated_executions() {
		let config = Config::builder().max_statements(3).build();
		let interp = Interpreter::new(config);
		for _ in 0..10 {
			interp.execute("x = 1\ny = 2").unwrap();
		}
	}

	#[test]
	fn default_builtins_are_callable() {
		let interp = Interpreter::default();
		let v = interp.execute("len([1, 2, 3])").unwrap();
		match v {
			Value::Int(i) => assert_eq!(i.inner(), 3),
			_ => panic!("expected int"),
		}
	}
}
