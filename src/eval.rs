//! The tree-walking evaluator: statement execution, expression evaluation,
//! and the control-flow signals (`break`/`continue`/`return`) that thread
//! through nested blocks without unwinding via panics.

use crate::ast::*;
use crate::container::RefCount;
use crate::env::Frame;
use crate::error::Error;
use crate::governor::Governor;
use crate::options::{Config, DisabledFeatures};
use crate::parser::SourceLocation;
use crate::value::list::compare_for_sort;
use crate::value::{Function, Int, NamedType, SafeDict, SafeList, SafeSet, SafeStr, Value};
use std::collections::HashMap;

/// What happened while running a statement or block: either it ran off the
/// end normally, or it's unwinding toward the nearest loop/function boundary.
enum Flow {
	Normal,
	Break,
	Continue,
	Return(Value),
}

pub struct Evaluator<'a> {
	config: &'a Config,
	governor: &'a Governor,
	builtins: &'a HashMap<String, Value>,
}

impl<'a> Evaluator<'a> {
	pub fn new(config: &'a Config, governor: &'a Governor, builtins: &'a HashMap<String, Value>) -> Self {
		Self { config, governor, builtins }
	}

	/// Runs every statement in `module`. The result is the value of the last
	/// top-level bare-expression statement (so a script ending in `x + 1`
	/// reports that value), or `None` if the script didn't end that way or
	/// hit a top-level `return` first.
	pub fn exec_module(&self, module: &Module, frame: &Frame) -> Result<Value, Error> {
		let mut result = Value::None;
		for stmt in &module.body {
			self.governor.tick_statement(&stmt.loc)?;
			if let StmtKind::Expr(e) = &stmt.kind {
				result = self.eval_expr(e, frame)?;
				continue;
			}
			match self.exec_stmt(stmt, frame)? {
				Flow::Normal => {}
				Flow::Return(v) => return Ok(v),
				Flow::Break | Flow::Continue => {
					return Err(Error::TypeError {
						where_: stmt.loc.clone(),
						detail: "'break'/'continue' outside loop".into(),
					});
				}
			}
		}
		Ok(result)
	}

	fn exec_block(&self, body: &[Stmt], frame: &Frame) -> Result<Flow, Error> {
		for stmt in body {
			self.governor.tick_statement(&stmt.loc)?;
			match self.exec_stmt(stmt, frame)? {
				Flow::Normal => {}
				other => return Ok(other),
			}
		}
		Ok(Flow::Normal)
	}

	fn exec_stmt(&self, stmt: &Stmt, frame: &Frame) -> Result<Flow, Error> {
		match &stmt.kind {
			StmtKind::Expr(e) => {
				self.eval_expr(e, frame)?;
				Ok(Flow::Normal)
			}
			StmtKind::Pass => Ok(Flow::Normal),
			StmtKind::Break => Ok(Flow::Break),
			StmtKind::Continue => Ok(Flow::Continue),
			StmtKind::Return(e) => {
				let v = match e {
					Some(e) => self.eval_expr(e, frame)?,
					None => Value::None,
				};
				Ok(Flow::Return(v))
			}
			StmtKind::Assign { targets, value } => {
				let v = self.eval_expr(value, frame)?;
				for target in targets {
					self.assign_target(target, v.clone(), frame, &stmt.loc)?;
				}
				Ok(Flow::Normal)
			}
			StmtKind::AugAssign { target, op, value } => {
				let rhs = self.eval_expr(value, frame)?;
				let current = self.read_target(target, frame, &stmt.loc)?;
				let result = self.apply_binop(*op, &current, &rhs, &stmt.loc)?;
				self.assign_target(target, result, frame, &stmt.loc)?;
				Ok(Flow::Normal)
			}
			StmtKind::If { test, body, orelse } => {
				if self.eval_expr(test, frame)?.is_truthy() {
					self.exec_block(body, frame)
				} else {
					self.exec_block(orelse, frame)
				}
			}
			StmtKind::While { test, body } => {
				loop {
					if !self.eval_expr(test, frame)?.is_truthy() {
						break;
					}
					self.governor.tick_loop(&stmt.loc)?;
					match self.exec_block(body, frame)? {
						Flow::Break => break,
						Flow::Continue | Flow::Normal => {}
						Flow::Return(v) => return Ok(Flow::Return(v)),
					}
				}
				Ok(Flow::Normal)
			}
			StmtKind::For { target, iter, body } => {
				let iterable = self.eval_expr(iter, frame)?;
				let items = self.iter_values(&iterable, &stmt.loc)?;
				for item in items {
					self.governor.tick_loop(&stmt.loc)?;
					self.assign_target(target, item, frame, &stmt.loc)?;
					match self.exec_block(body, frame)? {
						Flow::Break => break,
						Flow::Continue | Flow::Normal => {}
						Flow::Return(v) => return Ok(Flow::Return(v)),
					}
				}
				Ok(Flow::Normal)
			}
			StmtKind::FunctionDef { name, params, body } => {
				let func = Function::new(name.clone(), params.clone(), body.clone(), frame.clone());
				frame.set_local(name.clone(), Value::Function(RefCount::from(func)));
				Ok(Flow::Normal)
			}
		}
	}

	pub fn eval_expr(&self, expr: &Expr, frame: &Frame) -> Result<Value, Error> {
		match &expr.kind {
			ExprKind::IntLit(n) => Ok(Value::Int(Int::new(*n, self.config, &expr.loc)?)),
			ExprKind::FloatLit(x) => Ok(Value::Float(*x)),
			ExprKind::StrLit(s) => Ok(Value::Str(SafeStr::new(s, self.config, &expr.loc)?)),
			ExprKind::BoolLit(b) => Ok(Value::Bool(*b)),
			ExprKind::NoneLit => Ok(Value::None),
			ExprKind::Name(name) => self.lookup_name(name, frame, &expr.loc),
			ExprKind::ListLit(items) => {
				let values = self.eval_seq_items(items, frame)?;
				Ok(Value::List(SafeList::new(values, self.config, &expr.loc)?))
			}
			ExprKind::SetLit(items) => {
				let values = self.eval_seq_items(items, frame)?;
				Ok(Value::Set(SafeSet::new(values, self.config, &expr.loc)?))
			}
			ExprKind::DictLit(items) => {
				let mut pairs = Vec::with_capacity(items.len());
				for item in items {
					match item {
						DictItem::KeyValue(k, v) => {
							pairs.push((self.eval_expr(k, frame)?, self.eval_expr(v, frame)?));
						}
						DictItem::Starred(e) => {
							self.check_starred_allowed(&e.loc)?;
							match self.eval_expr(e, frame)? {
								Value::Dict(d) => {
									for (k, v) in d.read().iter() {
										pairs.push((k.clone(), v.clone()));
									}
								}
								other => {
									return Err(Error::TypeError {
										where_: e.loc.clone(),
										detail: format!("argument after ** must be a dict, not {}", other.type_name()),
									});
								}
							}
						}
					}
				}
				Ok(Value::Dict(SafeDict::new(pairs, self.config, &expr.loc)?))
			}
			ExprKind::ListComp { elt, generators } => {
				let comp_frame = frame.child();
				let mut values = Vec::new();
				self.comp_rec(generators, 0, &comp_frame, &expr.loc, &mut |f| {
					values.push(self.eval_expr(elt, f)?);
					self.check_growing_len(values.len(), &expr.loc)
				})?;
				Ok(Value::List(SafeList::new(values, self.config, &expr.loc)?))
			}
			ExprKind::GeneratorExp { elt, generators } => {
				// No lazy generator type exists; a generator expression is
				// evaluated as eagerly as a list comprehension.
				let comp_frame = frame.child();
				let mut values = Vec::new();
				self.comp_rec(generators, 0, &comp_frame, &expr.loc, &mut |f| {
					values.push(self.eval_expr(elt, f)?);
					self.check_growing_len(values.len(), &expr.loc)
				})?;
				Ok(Value::List(SafeList::new(values, self.config, &expr.loc)?))
			}
			ExprKind::SetComp { elt, generators } => {
				let comp_frame = frame.child();
				let mut values = Vec::new();
				self.comp_rec(generators, 0, &comp_frame, &expr.loc, &mut |f| {
					values.push(self.eval_expr(elt, f)?);
					self.check_growing_len(values.len(), &expr.loc)
				})?;
				Ok(Value::Set(SafeSet::new(values, self.config, &expr.loc)?))
			}
			ExprKind::DictComp { key, value, generators } => {
				let comp_frame = frame.child();
				let mut pairs = Vec::new();
				self.comp_rec(generators, 0, &comp_frame, &expr.loc, &mut |f| {
					let k = self.eval_expr(key, f)?;
					let v = self.eval_expr(value, f)?;
					pairs.push((k, v));
					self.check_growing_len(pairs.len(), &expr.loc)
				})?;
				Ok(Value::Dict(SafeDict::new(pairs, self.config, &expr.loc)?))
			}
			ExprKind::UnaryOp { op, operand } => self.eval_unaryop(*op, operand, frame, &expr.loc),
			ExprKind::BinOp { op, lhs, rhs } => {
				let a = self.eval_expr(lhs, frame)?;
				let b = self.eval_expr(rhs, frame)?;
				self.apply_binop(*op, &a, &b, &expr.loc)
			}
			ExprKind::BoolOp { op, values } => {
				let mut result = Value::None;
				for v in values {
					result = self.eval_expr(v, frame)?;
					let truthy = result.is_truthy();
					match (op, truthy) {
						(BoolOp::And, false) | (BoolOp::Or, true) => return Ok(result),
						_ => {}
					}
				}
				Ok(result)
			}
			ExprKind::Compare { left, ops, comparators } => {
				let mut left_val = self.eval_expr(left, frame)?;
				for (op, comparator) in ops.iter().zip(comparators.iter()) {
					let right_val = self.eval_expr(comparator, frame)?;
					if !self.apply_compare(*op, &left_val, &right_val, &comparator.loc)? {
						return Ok(Value::Bool(false));
					}
					left_val = right_val;
				}
				Ok(Value::Bool(true))
			}
			ExprKind::IfExp { test, body, orelse } => {
				if self.eval_expr(test, frame)?.is_truthy() {
					self.eval_expr(body, frame)
				} else {
					self.eval_expr(orelse, frame)
				}
			}
			ExprKind::Call { func, args } => {
				let callee = self.eval_expr(func, frame)?;
				let mut arg_vals = Vec::with_capacity(args.len());
				for a in args {
					arg_vals.push(self.eval_expr(a, frame)?);
				}
				self.call_value(&callee, &arg_vals, &expr.loc)
			}
			ExprKind::MethodCall { receiver, method, args } => {
				let recv = self.eval_expr(receiver, frame)?;
				let mut arg_vals = Vec::with_capacity(args.len());
				for a in args {
					arg_vals.push(self.eval_expr(a, frame)?);
				}
				self.call_method(&recv, method, &arg_vals, &expr.loc)
			}
			ExprKind::Subscript { value, index } => {
				let base = self.eval_expr(value, frame)?;
				let idx = self.eval_expr(index, frame)?;
				self.subscript_get(&base, &idx, &expr.loc)
			}
			ExprKind::Tuple(items) => {
				let mut values = Vec::with_capacity(items.len());
				for e in items {
					values.push(self.eval_expr(e, frame)?);
				}
				Ok(Value::List(SafeList::new(values, self.config, &expr.loc)?))
			}
		}
	}

	fn eval_unaryop(&self, op: UnaryOp, operand: &Expr, frame: &Frame, loc: &SourceLocation) -> Result<Value, Error> {
		let v = self.eval_expr(operand, frame)?;
		let bad = |opname: &str| Error::TypeError {
			where_: loc.clone(),
			detail: format!("bad operand type for unary {opname}: '{}'", v.type_name()),
		};
		match op {
			UnaryOp::Not => Ok(Value::Bool(!v.is_truthy())),
			UnaryOp::Pos => match v {
				Value::Int(_) | Value::Float(_) | Value::Bool(_) => Ok(v),
				_ => Err(bad("+")),
			},
			UnaryOp::Neg => match v {
				Value::Int(i) => Ok(Value::Int(i.negate(self.config, loc)?)),
				Value::Float(x) => Ok(Value::Float(-x)),
				Value::Bool(b) => Ok(Value::Int(Int::from(b).negate(self.config, loc)?)),
				_ => Err(bad("-")),
			},
			UnaryOp::Invert => match v {
				Value::Int(i) => Ok(Value::Int(i.bit_invert(self.config, loc)?)),
				Value::Bool(b) => Ok(Value::Int(Int::from(b).bit_invert(self.config, loc)?)),
				_ => Err(bad("~")),
			},
		}
	}

	fn eval_seq_items(&self, items: &[(Expr, bool)], frame: &Frame) -> Result<Vec<Value>, Error> {
		let mut out = Vec::with_capacity(items.len());
		for (e, starred) in items {
			if *starred {
				self.check_starred_allowed(&e.loc)?;
				let v = self.eval_expr(e, frame)?;
				out.extend(self.iter_values(&v, &e.loc)?);
			} else {
				out.push(self.eval_expr(e, frame)?);
			}
		}
		Ok(out)
	}

	/// Checked after every element a comprehension produces, so a `for`
	/// nested over two `max_const_len`-sized iterables can't build (and
	/// hold in memory) a collection far larger than the limit before the
	/// single length check the final `SafeList`/`SafeSet`/`SafeDict::new`
	/// call would otherwise perform only once, at the very end.
	fn check_growing_len(&self, len: usize, loc: &SourceLocation) -> Result<(), Error> {
		if len > self.config.max_const_len {
			return Err(Error::IterableTooLong {
				where_: loc.clone(),
				detail: format!("comprehension of length {len} exceeds the limit of {}", self.config.max_const_len),
			});
		}
		Ok(())
	}

	fn check_starred_allowed(&self, loc: &SourceLocation) -> Result<(), Error> {
		if self.config.disabled_features.contains(DisabledFeatures::STARRED_LITERAL) {
			return Err(Error::FeatureNotAvailable {
				where_: loc.clone(),
				detail: "starred unpacking in literals is disabled".into(),
			});
		}
		Ok(())
	}

	fn comp_rec(
		&self,
		gens: &[Comprehension],
		idx: usize,
		frame: &Frame,
		loc: &SourceLocation,
		leaf: &mut dyn FnMut(&Frame) -> Result<(), Error>,
	) -> Result<(), Error> {
		if idx == gens.len() {
			return leaf(frame);
		}
		let gen = &gens[idx];
		let iterable = self.eval_expr(&gen.iter, frame)?;
		let items = self.iter_values(&iterable, loc)?;
		for item in items {
			self.governor.tick_loop(loc)?;
			self.assign_target(&gen.target, item, frame, loc)?;
			let mut keep = true;
			for cond in &gen.ifs {
				if !self.eval_expr(cond, frame)?.is_truthy() {
					keep = false;
					break;
				}
			}
			if keep {
				self.comp_rec(gens, idx + 1, frame, loc, leaf)?;
			}
		}
		Ok(())
	}

	fn lookup_name(&self, name: &str, frame: &Frame, loc: &SourceLocation) -> Result<Value, Error> {
		if let Some(v) = frame.get(name) {
			return Ok(v);
		}
		if let Some(v) = self.builtins.get(name) {
			return Ok(v.clone());
		}
		Err(Error::NameError { where_: loc.clone(), name: name.to_string() })
	}

	fn assign_target(&self, target: &AssignTarget, value: Value, frame: &Frame, loc: &SourceLocation) -> Result<(), Error> {
		match target {
			AssignTarget::Name(name) => {
				frame.set_local(name.clone(), value);
				Ok(())
			}
			AssignTarget::Tuple(targets) => {
				let items = self.iter_values(&value, loc)?;
				if items.len() != targets.len() {
					return Err(Error::TypeError {
						where_: loc.clone(),
						detail: format!("cannot unpack {} values into {} targets", items.len(), targets.len()),
					});
				}
				for (t, v) in targets.iter().zip(items) {
					self.assign_target(t, v, frame, loc)?;
				}
				Ok(())
			}
			AssignTarget::Subscript { value: base_expr, index: index_expr, loc: sub_loc } => {
				// Builtin isolation: a subscript write through a bare name that
				// only resolves via the builtin table (never bound locally) is
				// a silent no-op rather than an error or a mutation that would
				// leak back into the shared builtin table.
				if let ExprKind::Name(name) = &base_expr.kind {
					if !frame.is_bound(name) {
						return Ok(());
					}
				}
				let base = self.eval_expr(base_expr, frame)?;
				let idx = self.eval_expr(index_expr, frame)?;
				match base {
					Value::List(l) => {
						let i = require_int(&idx, sub_loc)?;
						l.set(i.inner(), value, sub_loc)
					}
					Value::Dict(d) => d.set(idx, value, self.config, sub_loc),
					_ => Err(Error::TypeError {
						where_: sub_loc.clone(),
						detail: format!("'{}' object does not support item assignment", base.type_name()),
					}),
				}
			}
			AssignTarget::Attribute { loc: attr_loc, .. } => Err(Error::FeatureNotAvailable {
				where_: attr_loc.clone(),
				detail: "attribute assignment is not supported".into(),
			}),
		}
	}

	fn read_target(&self, target: &AssignTarget, frame: &Frame, loc: &SourceLocation) -> Result<Value, Error> {
		match target {
			AssignTarget::Name(name) => self.lookup_name(name, frame, loc),
			AssignTarget::Subscript { value, index, loc: sub_loc } => {
				let base = self.eval_expr(value, frame)?;
				let idx = self.eval_expr(index, frame)?;
				self.subscript_get(&base, &idx, sub_loc)
			}
			AssignTarget::Tuple(_) => Err(Error::TypeError {
				where_: loc.clone(),
				detail: "cannot use a tuple target in an augmented assignment".into(),
			}),
			AssignTarget::Attribute { loc: attr_loc, .. } => Err(Error::FeatureNotAvailable {
				where_: attr_loc.clone(),
				detail: "attribute access is not supported".into(),
			}),
		}
	}

	fn subscript_get(&self, base: &Value, idx: &Value, loc: &SourceLocation) -> Result<Value, Error> {
		match base {
			Value::List(l) => {
				let i = require_int(idx, loc)?;
				l.get(i.inner(), loc)
			}
			Value::Dict(d) => d
				.get(idx)
				.ok_or_else(|| Error::TypeError { where_: loc.clone(), detail: format!("key {idx:?} not found") }),
			Value::Str(s) => {
				let i = require_int(idx, loc)?;
				Ok(Value::Str(s.char_at(i.inner(), self.config, loc)?))
			}
			_ => Err(Error::TypeError {
				where_: loc.clone(),
				detail: format!("'{}' object is not subscriptable", base.type_name()),
			}),
		}
	}

	fn iter_values(&self, value: &Value, loc: &SourceLocation) -> Result<Vec<Value>, Error> {
		match value {
			Value::List(l) => Ok(l.read().clone()),
			Value::Set(s) => Ok(s.read().iter().cloned().collect()),
			Value::Dict(d) => Ok(d.read().keys().cloned().collect()),
			Value::Str(s) => Ok(s.chars_as_values(self.config, loc)?.into_iter().map(Value::Str).collect()),
			_ => Err(Error::TypeError {
				where_: loc.clone(),
				detail: format!("'{}' object is not iterable", value.type_name()),
			}),
		}
	}

	fn apply_binop(&self, op: BinOp, lhs: &Value, rhs: &Value, loc: &SourceLocation) -> Result<Value, Error> {
		match op {
			BinOp::Add => self.op_add(lhs, rhs, loc),
			BinOp::Sub => self.op_arith(lhs, rhs, loc, "-", Int::subtract, |a, b| a - b),
			BinOp::Mul => self.op_mul(lhs, rhs, loc),
			BinOp::Div => self.op_truediv(lhs, rhs, loc),
			BinOp::FloorDiv => self.op_floordiv(lhs, rhs, loc),
			BinOp::Mod => self.op_mod(lhs, rhs, loc),
			BinOp::Pow => self.op_pow(lhs, rhs, loc),
			BinOp::LShift => self.op_int_only(lhs, rhs, loc, "<<", Int::shift_left),
			BinOp::RShift => self.op_int_only(lhs, rhs, loc, ">>", Int::shift_right),
			BinOp::BitAnd => self.op_int_only(lhs, rhs, loc, "&", Int::bit_and),
			BinOp::BitOr => self.op_int_only(lhs, rhs, loc, "|", Int::bit_or),
			BinOp::BitXor => self.op_int_only(lhs, rhs, loc, "^", Int::bit_xor),
		}
	}

	fn type_err(&self, sym: &str, lhs: &Value, rhs: &Value, loc: &SourceLocation) -> Error {
		Error::TypeError {
			where_: loc.clone(),
			detail: format!("unsupported operand type(s) for {sym}: '{}' and '{}'", lhs.type_name(), rhs.type_name()),
		}
	}

	fn op_int_only(
		&self,
		lhs: &Value,
		rhs: &Value,
		loc: &SourceLocation,
		sym: &str,
		f: fn(Int, Int, &Config, &SourceLocation) -> Result<Int, Error>,
	) -> Result<Value, Error> {
		match (as_int_strict(lhs), as_int_strict(rhs)) {
			(Some(a), Some(b)) => Ok(Value::Int(f(a, b, self.config, loc)?)),
			_ => Err(self.type_err(sym, lhs, rhs, loc)),
		}
	}

	fn op_arith(
		&self,
		lhs: &Value,
		rhs: &Value,
		loc: &SourceLocation,
		sym: &str,
		int_f: fn(Int, Int, &Config, &SourceLocation) -> Result<Int, Error>,
		float_f: fn(f64, f64) -> f64,
	) -> Result<Value, Error> {
		if let (Some(a), Some(b)) = (as_int_strict(lhs), as_int_strict(rhs)) {
			return Ok(Value::Int(int_f(a, b, self.config, loc)?));
		}
		match (as_f64(lhs), as_f64(rhs)) {
			(Some(a), Some(b)) => Ok(Value::Float(float_f(a, b))),
			_ => Err(self.type_err(sym, lhs, rhs, loc)),
		}
	}

	fn op_add(&self, lhs: &Value, rhs: &Value, loc: &SourceLocation) -> Result<Value, Error> {
		match (lhs, rhs) {
			(Value::Str(a), Value::Str(b)) => Ok(Value::Str(a.concat(b, self.config, loc)?)),
			(Value::List(a), Value::List(b)) => Ok(Value::List(a.concat(b, self.config, loc)?)),
			_ => self.op_arith(lhs, rhs, loc, "+", Int::add, |a, b| a + b),
		}
	}

	fn op_mul(&self, lhs: &Value, rhs: &Value, loc: &SourceLocation) -> Result<Value, Error> {
		if let (Value::Str(s), n) | (n, Value::Str(s)) = (lhs, rhs) {
			if let Some(count) = as_int_strict(n) {
				return Ok(Value::Str(s.repeat(count.inner(), self.config, loc)?));
			}
		}
		if let (Value::List(l), n) | (n, Value::List(l)) = (lhs, rhs) {
			if let Some(count) = as_int_strict(n) {
				return Ok(Value::List(l.repeat(count.inner(), self.config, loc)?));
			}
		}
		self.op_arith(lhs, rhs, loc, "*", Int::multiply, |a, b| a * b)
	}

	fn op_truediv(&self, lhs: &Value, rhs: &Value, loc: &SourceLocation) -> Result<Value, Error> {
		let (a, b) = match (as_f64(lhs), as_f64(rhs)) {
			(Some(a), Some(b)) => (a, b),
			_ => return Err(self.type_err("/", lhs, rhs, loc)),
		};
		if b == 0.0 {
			return Err(Error::TypeError { where_: loc.clone(), detail: "division by zero".into() });
		}
		Ok(Value::Float(a / b))
	}

	fn op_floordiv(&self, lhs: &Value, rhs: &Value, loc: &SourceLocation) -> Result<Value, Error> {
		if let (Some(a), Some(b)) = (as_int_strict(lhs), as_int_strict(rhs)) {
			return Ok(Value::Int(a.floor_divide(b, self.config, loc)?));
		}
		match (as_f64(lhs), as_f64(rhs)) {
			(Some(a), Some(b)) => {
				if b == 0.0 {
					return Err(Error::TypeError { where_: loc.clone(), detail: "float floor division by zero".into() });
				}
				Ok(Value::Float((a / b).floor()))
			}
			_ => Err(self.type_err("//", lhs, rhs, loc)),
		}
	}

	fn op_mod(&self, lhs: &Value, rhs: &Value, loc: &SourceLocation) -> Result<Value, Error> {
		if let (Some(a), Some(b)) = (as_int_strict(lhs), as_int_strict(rhs)) {
			return Ok(Value::Int(a.remainder(b, self.config, loc)?));
		}
		match (as_f64(lhs), as_f64(rhs)) {
			(Some(a), Some(b)) => {
				if b == 0.0 {
					return Err(Error::TypeError { where_: loc.clone(), detail: "float modulo by zero".into() });
				}
				Ok(Value::Float(a - b * (a / b).floor()))
			}
			_ => Err(self.type_err("%", lhs, rhs, loc)),
		}
	}

	fn op_pow(&self, lhs: &Value, rhs: &Value, loc: &SourceLocation) -> Result<Value, Error> {
		if let (Some(a), Some(b)) = (as_int_strict(lhs), as_int_strict(rhs)) {
			if b.inner() >= 0 {
				return Ok(Value::Int(a.power(b, self.config, loc)?));
			}
		}
		match (as_f64(lhs), as_f64(rhs)) {
			(Some(a), Some(b)) => Ok(Value::Float(a.powf(b))),
			_ => Err(self.type_err("**", lhs, rhs, loc)),
		}
	}

	fn apply_compare(&self, op: CompareOp, lhs: &Value, rhs: &Value, loc: &SourceLocation) -> Result<bool, Error> {
		match op {
			CompareOp::Eq => Ok(lhs.value_eq(rhs)),
			CompareOp::NotEq => Ok(!lhs.value_eq(rhs)),
			CompareOp::Lt => Ok(compare_for_sort(lhs, rhs, loc)? == std::cmp::Ordering::Less),
			CompareOp::LtE => Ok(compare_for_sort(lhs, rhs, loc)? != std::cmp::Ordering::Greater),
			CompareOp::Gt => Ok(compare_for_sort(lhs, rhs, loc)? == std::cmp::Ordering::Greater),
			CompareOp::GtE => Ok(compare_for_sort(lhs, rhs, loc)? != std::cmp::Ordering::Less),
			CompareOp::In => self.contains(rhs, lhs, loc),
			CompareOp::NotIn => self.contains(rhs, lhs, loc).map(|b| !b),
		}
	}

	fn contains(&self, container: &Value, item: &Value, loc: &SourceLocation) -> Result<bool, Error> {
		match container {
			Value::List(l) => Ok(l.read().iter().any(|v| v.value_eq(item))),
			Value::Set(s) => Ok(s.contains(item)),
			Value::Dict(d) => Ok(d.contains_key(item)),
			Value::Str(s) => match item {
				Value::Str(needle) => Ok(s.as_str().contains(needle.as_str())),
				_ => Err(Error::TypeError {
					where_: loc.clone(),
					detail: "'in <string>' requires string as left operand".into(),
				}),
			},
			_ => Err(Error::TypeError {
				where_: loc.clone(),
				detail: format!("argument of type '{}' is not iterable", container.type_name()),
			}),
		}
	}

	fn call_value(&self, callee: &Value, args: &[Value], loc: &SourceLocation) -> Result<Value, Error> {
		match callee {
			Value::Function(f) => self.call_function(f, args, loc),
			Value::Native(nf) => (nf.func)(args, self.config, loc),
			_ => Err(Error::TypeError {
				where_: loc.clone(),
				detail: format!("'{}' object is not callable", callee.type_name()),
			}),
		}
	}

	fn call_function(&self, f: &RefCount<Function>, args: &[Value], loc: &SourceLocation) -> Result<Value, Error> {
		if args.len() > f.params.len() {
			return Err(Error::TypeError {
				where_: loc.clone(),
				detail: format!("{}() takes at most {} argument(s) but {} were given", f.name, f.params.len(), args.len()),
			});
		}
		let call_frame = f.closure.child();
		for (i, param) in f.params.iter().enumerate() {
			let value = if let Some(v) = args.get(i) {
				v.clone()
			} else if let Some(default) = &param.default {
				// Evaluated in the closure scope at call time, not once at
				// `def` time — a deliberate simplification since defaults
				// here are rarely anything but literals.
				self.eval_expr(default, &f.closure)?
			} else {
				return Err(Error::TypeError {
					where_: loc.clone(),
					detail: format!("{}() missing required argument: '{}'", f.name, param.name),
				});
			};
			call_frame.set_local(param.name.clone(), value);
		}
		match self.exec_block(&f.body, &call_frame)? {
			Flow::Return(v) => Ok(v),
			Flow::Normal => Ok(Value::None),
			Flow::Break | Flow::Continue => {
				Err(Error::TypeError { where_: loc.clone(), detail: "'break'/'continue' outside loop".into() })
			}
		}
	}

	fn call_method(&self, recv: &Value, method: &str, args: &[Value], loc: &SourceLocation) -> Result<Value, Error> {
		match recv {
			Value::List(l) => self.list_method(l, method, args, loc),
			Value::Set(s) => self.set_method(s, method, args, loc),
			Value::Dict(d) => self.dict_method(d, method, args, loc),
			Value::Str(s) => self.str_method(s, method, args, loc),
			_ => Err(Error::TypeError {
				where_: loc.clone(),
				detail: format!("'{}' object has no method '{}'", recv.type_name(), method),
			}),
		}
	}

	fn list_method(&self, l: &SafeList, method: &str, args: &[Value], loc: &SourceLocation) -> Result<Value, Error> {
		match (method, args) {
			("append", [v]) => {
				l.append(v.clone(), self.config, loc)?;
				Ok(Value::None)
			}
			("extend", [v]) => {
				let items = self.iter_values(v, loc)?;
				l.extend(items, self.config, loc)?;
				Ok(Value::None)
			}
			("insert", [i, v]) => {
				let idx = require_int(i, loc)?;
				l.insert(idx.inner(), v.clone(), self.config, loc)?;
				Ok(Value::None)
			}
			("pop", []) => l.pop(None, loc),
			("pop", [i]) => {
				let idx = require_int(i, loc)?;
				l.pop(Some(idx.inner()), loc)
			}
			("remove", [v]) => {
				l.remove(v, loc)?;
				Ok(Value::None)
			}
			("clear", []) => {
				l.clear();
				Ok(Value::None)
			}
			("reverse", []) => {
				l.reverse();
				Ok(Value::None)
			}
			("sort", []) => {
				l.sort(loc)?;
				Ok(Value::None)
			}
			("index", [v]) => match l.read().iter().position(|x| x.value_eq(v)) {
				Some(p) => Ok(Value::Int(Int::new(p as i128, self.config, loc)?)),
				None => Err(Error::TypeError { where_: loc.clone(), detail: "value not found in list".into() }),
			},
			("count", [v]) => {
				let n = l.read().iter().filter(|x| x.value_eq(v)).count();
				Ok(Value::Int(Int::new(n as i128, self.config, loc)?))
			}
			_ => Err(method_err("list", method, loc)),
		}
	}

	fn set_method(&self, s: &SafeSet, method: &str, args: &[Value], loc: &SourceLocation) -> Result<Value, Error> {
		match (method, args) {
			("add", [v]) => {
				s.add(v.clone(), self.config, loc)?;
				Ok(Value::None)
			}
			("update", [v]) => {
				let items = self.iter_values(v, loc)?;
				s.update(items, self.config, loc)?;
				Ok(Value::None)
			}
			("discard", [v]) => {
				s.discard(v);
				Ok(Value::None)
			}
			("remove", [v]) => {
				s.remove(v, loc)?;
				Ok(Value::None)
			}
			("clear", []) => {
				s.clear();
				Ok(Value::None)
			}
			("union", [Value::Set(o)]) => Ok(Value::Set(s.union(o, self.config, loc)?)),
			("intersection", [Value::Set(o)]) => Ok(Value::Set(s.intersection(o, self.config, loc)?)),
			("intersection_update", [Value::Set(o)]) => {
				s.intersection_update(o);
				Ok(Value::None)
			}
			_ => Err(method_err("set", method, loc)),
		}
	}

	fn dict_method(&self, d: &SafeDict, method: &str, args: &[Value], loc: &SourceLocation) -> Result<Value, Error> {
		match (method, args) {
			("get", [k]) => Ok(d.get(k).unwrap_or(Value::None)),
			("get", [k, default]) => Ok(d.get(k).unwrap_or_else(|| default.clone())),
			("keys", []) => Ok(Value::List(SafeList::new(d.read().keys().cloned().collect(), self.config, loc)?)),
			("values", []) => {
				let items: Vec<Value> = d.read().iter().map(|(_, v)| v.clone()).collect();
				Ok(Value::List(SafeList::new(items, self.config, loc)?))
			}
			("items", []) => {
				let mut pairs = Vec::new();
				for (k, v) in d.read().iter() {
					pairs.push(Value::List(SafeList::new(vec![k.clone(), v.clone()], self.config, loc)?));
				}
				Ok(Value::List(SafeList::new(pairs, self.config, loc)?))
			}
			("update", [Value::Dict(o)]) => {
				d.update(o, self.config, loc)?;
				Ok(Value::None)
			}
			("pop", [k]) => {
				let v = d
					.get(k)
					.ok_or_else(|| Error::TypeError { where_: loc.clone(), detail: format!("key {k:?} not found") })?;
				d.delete(k, loc)?;
				Ok(v)
			}
			("clear", []) => {
				d.clear();
				Ok(Value::None)
			}
			_ => Err(method_err("dict", method, loc)),
		}
	}

	fn str_method(&self, s: &SafeStr, method: &str, args: &[Value], loc: &SourceLocation) -> Result<Value, Error> {
		match (method, args) {
			("upper", []) => Ok(Value::Str(SafeStr::new(s.as_str().to_uppercase(), self.config, loc)?)),
			("lower", []) => Ok(Value::Str(SafeStr::new(s.as_str().to_lowercase(), self.config, loc)?)),
			("strip", []) => Ok(Value::Str(SafeStr::new(s.as_str().trim(), self.config, loc)?)),
			("startswith", [Value::Str(p)]) => Ok(Value::Bool(s.as_str().starts_with(p.as_str()))),
			("endswith", [Value::Str(p)]) => Ok(Value::Bool(s.as_str().ends_with(p.as_str()))),
			("replace", [Value::Str(from), Value::Str(to)]) => {
				Ok(Value::Str(SafeStr::new(s.as_str().replace(from.as_str(), to.as_str()), self.config, loc)?))
			}
			("split", []) => {
				let parts: Result<Vec<Value>, Error> = s
					.as_str()
					.split_whitespace()
					.map(|p| SafeStr::new(p, self.config, loc).map(Value::Str))
					.collect();
				Ok(Value::List(SafeList::new(parts?, self.config, loc)?))
			}
			("split", [Value::Str(sep)]) => {
				let parts: Result<Vec<Value>, Error> =
					s.as_str().split(sep.as_str()).map(|p| SafeStr::new(p, self.config, loc).map(Value::Str)).collect();
				Ok(Value::List(SafeList::new(parts?, self.config, loc)?))
			}
			("join", [Value::List(items)]) => {
				let mut parts = Vec::with_capacity(items.len());
				for item in items.read().iter() {
					match item {
						Value::Str(p) => parts.push(p.as_str().to_string()),
						other => {
							return Err(Error::TypeError {
								where_: loc.clone(),
								detail: format!("sequence item: expected str instance, {} found", other.type_name()),
							});
						}
					}
				}
				Ok(Value::Str(SafeStr::new(parts.join(s.as_str()), self.config, loc)?))
			}
			_ => Err(method_err("str", method, loc)),
		}
	}
}

fn method_err(type_name: &str, method: &str, loc: &SourceLocation) -> Error {
	Error::TypeError {
		where_: loc.clone(),
		detail: format!("'{type_name}' object has no method '{method}' matching the given arguments"),
	}
}

fn require_int(v: &Value, loc: &SourceLocation) -> Result<Int, Error> {
	as_int_strict(v).ok_or_else(|| Error::TypeError {
		where_: loc.clone(),
		detail: format!("indices must be integers, not '{}'", v.type_name()),
	})
}

fn as_int_strict(v: &Value) -> Option<Int> {
	match v {
		Value::Int(i) => Some(*i),
		Value::Bool(b) => Some(Int::from(*b)),
		_ => None,
	}
}

fn as_f64(v: &Value) -> Option<f64> {
	match v {
		Value::Int(i) => Some(i.to_f64()),
		Value::Float(x) => Some(*x),
		Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parser::parse;

	fn run(source: &str, config: &Config) -> Result<Value, Error> {
		let module = parse(source, None)?;
		let governor = Governor::new(config);
		let builtins = HashMap::new();
		let evaluator = Evaluator::new(config, &governor, &builtins);
		let frame = Frame::root();
		evaluator.exec_module(&module, &frame)
	}

	#[test]
	fn arithmetic_and_name_binding() {
		let config = Config::default();
		let v = run("x = 2\ny = 3\nx * y + 1", &config).unwrap();
		match v { Value::Int(i) => assert_eq!(i.inner(), 7), _ => panic!("expected int") }
	}

	#[test]
	fn while_loop_accumulates() {
		let config = Config::default();
		let v = run("total = 0\ni = 0\nwhile i < 5:\n    total = total + i\n    i = i + 1\ntotal", &config).unwrap();
		match v { Value::Int(i) => assert_eq!(i.inner(), 10), _ => panic!("expected int") }
	}

	#[test]
	fn list_methods_and_container_closure_symmetry() {
		let config = Config::default();
		let v = run("a = [1, 2]\nb = [3]\nc = a + b\nc.append(4)\nc", &config).unwrap();
		match v {
			Value::List(l) => assert_eq!(l.len(), 4),
			_ => panic!("expected list"),
		}
	}

	#[test]
	fn builtin_isolation_silently_drops_subscript_write() {
		let config = Config::default();
		let mut builtins = HashMap::new();
		let loc = SourceLocation::default();
		let base = SafeList::new(vec![Value::Int(Int::ZERO)], &config, &loc).unwrap();
		builtins.insert("shared".to_string(), Value::List(base.clone()));
		let governor = Governor::new(&config);
		let evaluator = Evaluator::new(&config, &governor, &builtins);
		let frame = Frame::root();
		let module = parse("shared[0] = 99", None).unwrap();
		evaluator.exec_module(&module, &frame).unwrap();
		assert!(base.get(0, &loc).unwrap().value_eq(&Value::Int(Int::ZERO)));
	}

	#[test]
	fn chained_comparison_short_circuits_and_evaluates_middle_once() {
		let config = Config::default();
		let v = run("1 < 2 < 3", &config).unwrap();
		assert!(v.is_truthy());
		let v = run("1 < 2 < 0", &config).unwrap();
		assert!(!v.is_truthy());
	}

	#[test]
	fn function_call_and_closures() {
		let config = Config::default();
		let v = run("def add(a, b=10):\n    return a + b\nadd(5)", &config).unwrap();
		match v { Value::Int(i) => assert_eq!(i.inner(), 15), _ => panic!("expected int") }
	}

	#[test]
	fn statement_governor_stops_runaway_loop() {
		let config = Config::builder().max_loops(10).build();
		let err = run("while True:\n    pass", &config).unwrap_err();
		assert_eq!(err.kind(), crate::error::ErrorKind::TooManyStatements);
	}
}
