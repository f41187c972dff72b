//! `SafeList`: a length-checked, reference-counted mutable list. Every
//! operation that can grow the list (append, extend, insert, concat,
//! repeat) is checked against `Config::max_const_len` before it happens.

use crate::container::{Mutable, RefCount};
use crate::error::Error;
use crate::options::Config;
use crate::parser::SourceLocation;
use crate::value::Value;
use std::cell::{Ref, RefMut};
use std::fmt::{self, Debug, Formatter};

#[derive(Clone)]
pub struct SafeList(RefCount<Mutable<Vec<Value>>>);

impl Debug for SafeList {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.0.read().iter()).finish()
	}
}

fn check_len(len: usize, config: &Config, where_: &SourceLocation) -> Result<(), Error> {
	if len > config.max_const_len {
		return Err(Error::IterableTooLong {
			where_: where_.clone(),
			detail: format!("list of length {len} exceeds the limit of {}", config.max_const_len),
		});
	}
	Ok(())
}

fn normalize_index(idx: i128, len: usize, where_: &SourceLocation) -> Result<usize, Error> {
	let idx = if idx < 0 { idx + len as i128 } else { idx };
	if idx < 0 || idx as usize >= len {
		return Err(Error::TypeError { where_: where_.clone(), detail: "list index out of range".into() });
	}
	Ok(idx as usize)
}

impl SafeList {
	pub fn new(items: Vec<Value>, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		check_len(items.len(), config, where_)?;
		Ok(Self(RefCount::from(Mutable::new(items))))
	}

	pub fn read(&self) -> Ref<'_, Vec<Value>> {
		self.0.read()
	}

	fn write(&self) -> RefMut<'_, Vec<Value>> {
		self.0.write()
	}

	pub fn len(&self) -> usize {
		self.read().len()
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		RefCount::ptr_eq(&self.0, &other.0)
	}

	pub fn append(&self, value: Value, config: &Config, where_: &SourceLocation) -> Result<(), Error> {
		check_len(self.len() + 1, config, where_)?;
		self.write().push(value);
		Ok(())
	}

	pub fn extend(&self, values: impl IntoIterator<Item = Value>, config: &Config, where_: &SourceLocation) -> Result<(), Error> {
		let mut extra: Vec<Value> = values.into_iter().collect();
		check_len(self.len() + extra.len(), config, where_)?;
		self.write().append(&mut extra);
		Ok(())
	}

	pub fn insert(&self, index: i128, value: Value, config: &Config, where_: &SourceLocation) -> Result<(), Error> {
		check_len(self.len() + 1, config, where_)?;
		let len = self.len();
		let idx = (index.max(0) as usize).min(len);
		self.write().insert(idx, value);
		Ok(())
	}

	pub fn get(&self, index: i128, where_: &SourceLocation) -> Result<Value, Error> {
		let idx = normalize_index(index, self.len(), where_)?;
		Ok(self.read()[idx].clone())
	}

	pub fn set(&self, index: i128, value: Value, where_: &SourceLocation) -> Result<(), Error> {
		let idx = normalize_index(index, self.len(), where_)?;
		self.write()[idx] = value;
		Ok(())
	}

	pub fn delete(&self, index: i128, where_: &SourceLocation) -> Result<(), Error> {
		let idx = normalize_index(index, self.len(), where_)?;
		self.write().remove(idx);
		Ok(())
	}

	pub fn pop(&self, index: Option<i128>, where_: &SourceLocation) -> Result<Value, Error> {
		let idx = normalize_index(index.unwrap_or(-1), self.len(), where_)?;
		Ok(self.write().remove(idx))
	}

	pub fn remove(&self, value: &Value, where_: &SourceLocation) -> Result<(), Error> {
		let mut inner = self.write();
		let pos = inner.iter().position(|v| v.value_eq(value));
		match pos {
			Some(pos) => {
				inner.remove(pos);
				Ok(())
			}
			None => Err(Error::TypeError { where_: where_.clone(), detail: "value not found in list".into() }),
		}
	}

	pub fn clear(&self) {
		self.write().clear();
	}

	pub fn reverse(&self) {
		self.write().reverse();
	}

	pub fn sort(&self, where_: &SourceLocation) -> Result<(), Error> {
		let mut inner = self.write();
		let mut err = None;
		inner.sort_by(|a, b| match compare_for_sort(a, b, where_) {
			Ok(ord) => ord,
			Err(e) => {
				err.get_or_insert(e);
				std::cmp::Ordering::Equal
			}
		});
		match err {
			Some(e) => Err(e),
			None => Ok(()),
		}
	}

	pub fn concat(&self, other: &Self, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		let mut items = self.read().clone();
		items.extend(other.read().iter().cloned());
		Self::new(items, config, where_)
	}

	pub fn repeat(&self, count: i128, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		if count <= 0 {
			return Self::new(Vec::new(), config, where_);
		}
		let count = usize::try_from(count).map_err(|_| Error::IterableTooLong {
			where_: where_.clone(),
			detail: "repetition count too large".into(),
		})?;
		let src = self.read();
		let total = src.len().checked_mul(count).filter(|&n| n <= config.max_const_len).ok_or_else(|| {
			Error::IterableTooLong {
				where_: where_.clone(),
				detail: format!("list of length {} exceeds the limit of {}", src.len().saturating_mul(count), config.max_const_len),
			}
		})?;
		let mut items = Vec::with_capacity(total);
		for _ in 0..count {
			items.extend(src.iter().cloned());
		}
		drop(src);
		Self::new(items, config, where_)
	}
}

pub(crate) fn compare_for_sort(a: &Value, b: &Value, where_: &SourceLocation) -> Result<std::cmp::Ordering, Error> {
	use crate::value::NamedType;
	let nan_err = || Error::TypeError { where_: where_.clone(), detail: "NaN is not orderable".into() };
	match (a, b) {
		(Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
		(Value::Float(x), Value::Float(y)) => x.partial_cmp(y).ok_or_else(nan_err),
		(Value::Int(x), Value::Float(y)) => x.to_f64().partial_cmp(y).ok_or_else(nan_err),
		(Value::Float(x), Value::Int(y)) => x.partial_cmp(&y.to_f64()).ok_or_else(nan_err),
		(Value::Str(x), Value::Str(y)) => Ok(x.as_str().cmp(y.as_str())),
		(Value::Bool(x), Value::Bool(y)) => Ok(x.cmp(y)),
		_ => Err(Error::TypeError {
			where_: where_.clone(),
			detail: format!("cannot compare {} and {}", a.type_name(), b.type_name()),
		}),
	}
}
