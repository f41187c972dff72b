//! Resource governor: counts statement executions and loop iterations
//! across a whole run, independent of container-size limits, so a runaway
//! script without large containers (`while True: pass`) still terminates.

use crate::error::Error;
use crate::options::Config;
use crate::parser::SourceLocation;
use std::cell::Cell;

pub struct Governor {
	max_loops: u64,
	max_statements: u64,
	loops: Cell<u64>,
	statements: Cell<u64>,
}

impl Governor {
	pub fn new(config: &Config) -> Self {
		Self { max_loops: config.max_loops, max_statements: config.max_statements, loops: Cell::new(0), statements: Cell::new(0) }
	}

	pub fn tick_statement(&self, where_: &SourceLocation) -> Result<(), Error> {
		let n = self.statements.get() + 1;
		self.statements.set(n);
		if n > self.max_statements {
			return Err(Error::TooManyStatements { where_: where_.clone() });
		}
		Ok(())
	}

	pub fn tick_loop(&self, where_: &SourceLocation) -> Result<(), Error> {
		let n = self.loops.get() + 1;
		self.loops.set(n);
		if n > self.max_loops {
			return Err(Error::TooManyStatements { where_: where_.clone() });
		}
		Ok(())
	}

	/// Zeroes both counters, so a long-lived host can reuse one `Governor`
	/// across many unrelated top-level executions without earlier scripts'
	/// statement/loop counts bleeding into the next one's budget.
	pub fn reset(&self) {
		self.loops.set(0);
		self.statements.set(0);
	}

	pub fn statements_executed(&self) -> u64 {
		self.statements.get()
	}

	pub fn loop_iterations(&self) -> u64 {
		self.loops.get()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn statement_counter_trips_at_the_limit() {
		let config = Config::builder().max_statements(3).build();
		let gov = Governor::new(&config);
		let loc = SourceLocation::default();
		assert!(gov.tick_statement(&loc).is_ok());
		assert!(gov.tick_statement(&loc).is_ok());
		assert!(gov.tick_statement(&loc).is_ok());
		assert!(gov.tick_statement(&loc).is_err());
	}

	#[test]
	fn loop_counter_is_independent_of_statement_counter() {
		let config = Config::builder().max_loops(2).max_statements(1_000).build();
		let gov = Governor::new(&config);
		let loc = SourceLocation::default();
		assert!(gov.tick_loop(&loc).is_ok());
		assert!(gov.tick_loop(&loc).is_ok());
		assert!(gov.tick_loop(&loc).is_err());
	}

	#[test]
	fn reset_zeroes_both_counters() {
		let config = Config::builder().max_loops(2).max_statements(2).build();
		let gov = Governor::new(&config);
		let loc = SourceLocation::default();
		assert!(gov.tick_loop(&loc).is_ok());
		assert!(gov.tick_statement(&loc).is_ok());
		gov.reset();
		assert_eq!(gov.loop_iterations(), 0);
		assert_eq!(gov.statements_executed(), 0);
		assert!(gov.tick_loop(&loc).is_ok());
		assert!(gov.tick_statement(&loc).is_ok());
	}
}
