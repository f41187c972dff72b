//! Lexical scoping: a chain of `Frame`s holding local variables. Name
//! resolution is three-tier — current frame locals, then each enclosing
//! frame's locals, then (handled one level up, by the evaluator) the
//! interpreter's builtin table. `Frame` itself only ever searches the first
//! two tiers; that's what lets the evaluator tell "resolved locally" apart
//! from "fell through to a builtin" without a separate flag.

use crate::container::{Mutable, RefCount};
use crate::value::Value;
use std::collections::HashMap;

#[derive(Clone)]
pub struct Frame(RefCount<Mutable<FrameInner>>);

struct FrameInner {
	locals: HashMap<String, Value>,
	outer: Option<Frame>,
}

impl Frame {
	pub fn root() -> Self {
		Self(RefCount::from(Mutable::new(FrameInner { locals: HashMap::new(), outer: None })))
	}

	/// A fresh frame for a function call or comprehension body, chained to
	/// `self` for enclosing-scope reads.
	pub fn child(&self) -> Self {
		Self(RefCount::from(Mutable::new(FrameInner { locals: HashMap::new(), outer: Some(self.clone()) })))
	}

	/// Searches this frame's locals, then each outer frame's locals.
	/// Returns `None` if `name` isn't bound in the local chain at all —
	/// the caller falls through to the builtin table in that case.
	pub fn get(&self, name: &str) -> Option<Value> {
		let inner = self.0.read();
		if let Some(v) = inner.locals.get(name) {
			return Some(v.clone());
		}
		inner.outer.as_ref().and_then(|outer| outer.get(name))
	}

	/// `true` if `name` is bound somewhere in this frame's local chain
	/// (not counting builtins). Used to decide whether a subscript/attribute
	/// write through a bare name should mutate through or be a builtin-
	/// isolated no-op.
	pub fn is_bound(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Binds `name` in the *current* frame, shadowing any outer binding.
	/// There's no `nonlocal`/`global` in this language, so assignment
	/// always targets the innermost frame.
	pub fn set_local(&self, name: impl Into<String>, value: Value) {
		self.0.write().locals.insert(name.into(), value);
	}

	pub fn names(&self) -> HashMap<String, Value> {
		self.0.read().locals.clone()
	}
}
