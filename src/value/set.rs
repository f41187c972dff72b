//! `SafeSet`: a length-checked, reference-counted mutable set, backed by
//! `IndexSet` for deterministic iteration order. Bitwise set operators
//! (`|`, `&`, `^`) are intentionally not wired into the evaluator's binary
//! dispatch — only the method forms (`union`, `update`, ...) are supported,
//! matching the set of operations the language actually exercises.

use crate::container::{Mutable, RefCount};
use crate::error::Error;
use crate::options::Config;
use crate::parser::SourceLocation;
use crate::value::{HashKey, Value};
use indexmap::IndexSet;
use std::cell::Ref;
use std::fmt::{self, Debug, Formatter};

#[derive(Clone)]
pub struct SafeSet(RefCount<Mutable<IndexSet<HashKey>>>);

impl Debug for SafeSet {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.0.read().iter().map(|k| &k.0)).finish()
	}
}

fn check_len(len: usize, config: &Config, where_: &SourceLocation) -> Result<(), Error> {
	if len > config.max_const_len {
		return Err(Error::IterableTooLong {
			where_: where_.clone(),
			detail: format!("set of length {len} exceeds the limit of {}", config.max_const_len),
		});
	}
	Ok(())
}

/// A `Ref` over the underlying set, exposed as an iterator of `Value` so
/// callers don't need to know about `HashKey`.
pub struct SetRef<'a>(Ref<'a, IndexSet<HashKey>>);

impl<'a> SetRef<'a> {
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Value> {
		self.0.iter().map(|k| &k.0)
	}
}

impl SafeSet {
	pub fn new(items: Vec<Value>, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		let mut set = IndexSet::new();
		for item in items {
			item.check_hashable(where_)?;
			set.insert(HashKey(item));
		}
		check_len(set.len(), config, where_)?;
		Ok(Self(RefCount::from(Mutable::new(set))))
	}

	pub fn read(&self) -> SetRef<'_> {
		SetRef(self.0.read())
	}

	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		RefCount::ptr_eq(&self.0, &other.0)
	}

	pub fn add(&self, value: Value, config: &Config, where_: &SourceLocation) -> Result<(), Error> {
		value.check_hashable(where_)?;
		let key = HashKey(value);
		let mut inner = self.0.write();
		if inner.contains(&key) {
			return Ok(());
		}
		check_len(inner.len() + 1, config, where_)?;
		inner.insert(key);
		Ok(())
	}

	pub fn update(&self, values: impl IntoIterator<Item = Value>, config: &Config, where_: &SourceLocation) -> Result<(), Error> {
		for value in values {
			self.add(value, config, where_)?;
		}
		Ok(())
	}

	pub fn discard(&self, value: &Value) {
		self.0.write().shift_remove(&HashKey(value.clone()));
	}

	pub fn remove(&self, value: &Value, where_: &SourceLocation) -> Result<(), Error> {
		if self.0.write().shift_remove(&HashKey(value.clone())) {
			Ok(())
		} else {
			Err(Error::TypeError { where_: where_.clone(), detail: "value not found in set".into() })
		}
	}

	pub fn contains(&self, value: &Value) -> bool {
		self.0.read().contains(&HashKey(value.clone()))
	}

	pub fn clear(&self) {
		self.0.write().clear();
	}

	pub fn union(&self, other: &Self, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		let mut items: Vec<Value> = self.read().iter().cloned().collect();
		items.extend(other.read().iter().cloned());
		Self::new(items, config, where_)
	}

	pub fn intersection(&self, other: &Self, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		let a = self.0.read();
		let items: Vec<Value> = a.iter().filter(|k| other.contains(&k.0)).map(|k| k.0.clone()).collect();
		drop(a);
		Self::new(items, config, where_)
	}

	pub fn intersection_update(&self, other: &Self) {
		let keep: IndexSet<HashKey> = self.0.read().iter().filter(|k| other.contains(&k.0)).cloned().collect();
		*self.0.write() = keep;
	}
}
