//! `SafeDict`: a length-checked, reference-counted mutable dict, backed by
//! `IndexMap` for deterministic iteration order.

use crate::container::{Mutable, RefCount};
use crate::error::Error;
use crate::options::Config;
use crate::parser::SourceLocation;
use crate::value::{HashKey, Value};
use indexmap::IndexMap;
use std::cell::Ref;
use std::fmt::{self, Debug, Formatter};

#[derive(Clone)]
pub struct SafeDict(RefCount<Mutable<IndexMap<HashKey, Value>>>);

impl Debug for SafeDict {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.0.read().iter().map(|(k, v)| (&k.0, v))).finish()
	}
}

fn check_len(len: usize, config: &Config, where_: &SourceLocation) -> Result<(), Error> {
	if len > config.max_const_len {
		return Err(Error::IterableTooLong {
			where_: where_.clone(),
			detail: format!("dict of length {len} exceeds the limit of {}", config.max_const_len),
		});
	}
	Ok(())
}

pub struct DictRef<'a>(Ref<'a, IndexMap<HashKey, Value>>);

impl<'a> DictRef<'a> {
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
		self.0.iter().map(|(k, v)| (&k.0, v))
	}

	pub fn keys(&self) -> impl Iterator<Item = &Value> {
		self.0.keys().map(|k| &k.0)
	}
}

impl SafeDict {
	pub fn new(items: Vec<(Value, Value)>, config: &Config, where_: &SourceLocation) -> Result<Self, Error> {
		let mut map = IndexMap::new();
		for (k, v) in items {
			k.check_hashable(where_)?;
			map.insert(HashKey(k), v);
		}
		check_len(map.len(), config, where_)?;
		Ok(Self(RefCount::from(Mutable::new(map))))
	}

	pub fn read(&self) -> DictRef<'_> {
		DictRef(self.0.read())
	}

	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		RefCount::ptr_eq(&self.0, &other.0)
	}

	pub fn get(&self, key: &Value) -> Option<Value> {
		self.0.read().get(&HashKey(key.clone())).cloned()
	}

	pub fn set(&self, key: Value, value: Value, config: &Config, where_: &SourceLocation) -> Result<(), Error> {
		key.check_hashable(where_)?;
		let hk = HashKey(key);
		let mut inner = self.0.write();
		if !inner.contains_key(&hk) {
			check_len(inner.len() + 1, config, where_)?;
		}
		inner.insert(hk, value);
		Ok(())
	}

	pub fn delete(&self, key: &Value, where_: &SourceLocation) -> Result<(), Error> {
		if self.0.write().shift_remove(&HashKey(key.clone())).is_some() {
			Ok(())
		} else {
			Err(Error::TypeError { where_: where_.clone(), detail: format!("key {key:?} not found") })
		}
	}

	pub fn update(&self, other: &Self, config: &Config, where_: &SourceLocation) -> Result<(), Error> {
		for (k, v) in other.read().iter() {
			self.set(k.clone(), v.clone(), config, where_)?;
		}
		Ok(())
	}

	pub fn clear(&self) {
		self.0.write().clear();
	}

	pub fn contains_key(&self, key: &Value) -> bool {
		self.0.read().contains_key(&HashKey(key.clone()))
	}
}
