//! User-defined functions. A `Function` is the `def` statement's runtime
//! representation: a parameter list (with optional default expressions)
//! plus the body it closes over in its defining scope.

use crate::ast::{Param, Stmt};
use crate::env::Frame;

pub struct Function {
	pub name: String,
	pub params: Vec<Param>,
	pub body: Vec<Stmt>,
	/// The frame active where `def` ran; named lookups inside the function
	/// body fall through to it when a name isn't a parameter or local.
	pub closure: Frame,
}

impl Function {
	pub fn new(name: String, params: Vec<Param>, body: Vec<Stmt>, closure: Frame) -> Self {
		Self { name, params, body, closure }
	}
}
