//! Default builtin functions bound into every fresh [`crate::Interpreter`].
//! Each one is a plain `fn`, wrapped as a [`NativeFunction`] so it behaves
//! like any other callable [`Value`] from inside a script.

use crate::error::Error;
use crate::options::Config;
use crate::parser::SourceLocation;
use crate::value::{Int, NamedType, SafeDict, SafeList, SafeSet, SafeStr, Value};
use std::collections::HashMap;

/// The table installed by [`crate::Interpreter::new`] before any
/// host-supplied builtins are added via `set_builtin`.
pub fn default_builtins() -> HashMap<String, Value> {
	let mut table = HashMap::new();
	for (name, func) in ENTRIES {
		let native = crate::value::NativeFunction { name: *name, func: *func };
		table.insert((*name).to_string(), Value::Native(crate::container::RefCount::from(native)));
	}
	table
}

type Builtin = fn(&[Value], &Config, &SourceLocation) -> Result<Value, Error>;

const ENTRIES: &[(&str, Builtin)] = &[
	("len", len),
	("list", list),
	("set", set),
	("dict", dict),
	("str", str_),
	("int", int_),
	("float", float_),
	("bool", bool_),
	("range", range),
	("typeof", typeof_),
];

fn arity_err(name: &str, loc: &SourceLocation) -> Error {
	Error::TypeError { where_: loc.clone(), detail: format!("{name}() called with the wrong number of arguments") }
}

fn len(args: &[Value], config: &Config, loc: &SourceLocation) -> Result<Value, Error> {
	let [v] = args else { return Err(arity_err("len", loc)) };
	let n = match v {
		Value::List(l) => l.len(),
		Value::Set(s) => s.len(),
		Value::Dict(d) => d.len(),
		Value::Str(s) => s.len(),
		_ => {
			return Err(Error::TypeError {
				where_: loc.clone(),
				detail: format!("object of type '{}' has no len()", v.type_name()),
			});
		}
	};
	Ok(Value::Int(Int::new(n as i128, config, loc)?))
}

fn iterable_to_values(v: &Value, config: &Config, loc: &SourceLocation) -> Result<Vec<Value>, Error> {
	match v {
		Value::List(l) => Ok(l.read().clone()),
		Value::Set(s) => Ok(s.read().iter().cloned().collect()),
		Value::Dict(d) => Ok(d.read().keys().cloned().collect()),
		Value::Str(s) => Ok(s.chars_as_values(config, loc)?.into_iter().map(Value::Str).collect()),
		_ => Err(Error::TypeError {
			where_: loc.clone(),
			detail: format!("'{}' object is not iterable", v.type_name()),
		}),
	}
}

fn list(args: &[Value], config: &Config, loc: &SourceLocation) -> Result<Value, Error> {
	let items = match args {
		[] => Vec::new(),
		[v] => iterable_to_values(v, config, loc)?,
		_ => return Err(arity_err("list", loc)),
	};
	Ok(Value::List(SafeList::new(items, config, loc)?))
}

fn set(args: &[Value], config: &Config, loc: &SourceLocation) -> Result<Value, Error> {
	let items = match args {
		[] => Vec::new(),
		[v] => iterable_to_values(v, config, loc)?,
		_ => return Err(arity_err("set", loc)),
	};
	Ok(Value::Set(SafeSet::new(items, config, loc)?))
}

fn dict(args: &[Value], config: &Config, loc: &SourceLocation) -> Result<Value, Error> {
	match args {
		[] => Ok(Value::Dict(SafeDict::new(Vec::new(), config, loc)?)),
		[Value::Dict(d)] => Ok(Value::Dict(SafeDict::new(d.read().iter().map(|(k, v)| (k.clone(), v.clone())).collect(), config, loc)?)),
		[Value::List(l)] => {
			let mut pairs = Vec::with_capacity(l.len());
			for item in l.read().iter() {
				match item {
					Value::List(pair) if pair.len() == 2 => {
						let k = pair.get(0, loc)?;
						let v = pair.get(1, loc)?;
						pairs.push((k, v));
					}
					_ => {
						return Err(Error::TypeError {
							where_: loc.clone(),
							detail: "dict() expects an iterable of [key, value] pairs".into(),
						});
					}
				}
			}
			Ok(Value::Dict(SafeDict::new(pairs, config, loc)?))
		}
		[_] => Err(Error::TypeError { where_: loc.clone(), detail: "dict() argument must be a dict or a list of pairs".into() }),
		_ => Err(arity_err("dict", loc)),
	}
}

fn str_(args: &[Value], config: &Config, loc: &SourceLocation) -> Result<Value, Error> {
	let [v] = args else { return Err(arity_err("str", loc)) };
	let rendered = match v {
		Value::Str(s) => s.as_str().to_string(),
		Value::None => "None".to_string(),
		Value::Bool(b) => if *b { "True" } else { "False" }.to_string(),
		other => format!("{other:?}"),
	};
	Ok(Value::Str(SafeStr::new(rendered, config, loc)?))
}

fn int_(args: &[Value], config: &Config, loc: &SourceLocation) -> Result<Value, Error> {
	let [v] = args else { return Err(arity_err("int", loc)) };
	let n = match v {
		Value::Int(i) => i.inner(),
		Value::Bool(b) => *b as i128,
		Value::Float(x) => *x as i128,
		Value::Str(s) => s.as_str().trim().parse::<i128>().map_err(|_| Error::TypeError {
			where_: loc.clone(),
			detail: format!("invalid literal for int(): {:?}", s.as_str()),
		})?,
		_ => return Err(Error::TypeError { where_: loc.clone(), detail: format!("int() argument cannot be a '{}'", v.type_name()) }),
	};
	Ok(Value::Int(Int::new(n, config, loc)?))
}

fn float_(args: &[Value], _config: &Config, loc: &SourceLocation) -> Result<Value, Error> {
	let [v] = args else { return Err(arity_err("float", loc)) };
	let x = match v {
		Value::Int(i) => i.to_f64(),
		Value::Bool(b) => if *b { 1.0 } else { 0.0 },
		Value::Float(x) => *x,
		Value::Str(s) => s.as_str().trim().parse::<f64>().map_err(|_| Error::TypeError {
			where_: loc.clone(),
			detail: format!("could not convert string to float: {:?}", s.as_str()),
		})?,
		_ => return Err(Error::TypeError { where_: loc.clone(), detail: format!("float() argument cannot be a '{}'", v.type_name()) }),
	};
	Ok(Value::Float(x))
}

fn bool_(args: &[Value], _config: &Config, loc: &SourceLocation) -> Result<Value, Error> {
	let [v] = args else { return Err(arity_err("bool", loc)) };
	Ok(Value::Bool(v.is_truthy()))
}

/// `range(stop)` or `range(start, stop)`, eagerly materialised into a list
/// (there's no lazy range type) and subject to the same length limit as any
/// other list.
fn range(args: &[Value], config: &Config, loc: &SourceLocation) -> Result<Value, Error> {
	let (start, stop) = match args {
		[Value::Int(stop)] => (0, stop.inner()),
		[Value::Int(start), Value::Int(stop)] => (start.inner(), stop.inner()),
		_ => return Err(arity_err("range", loc)),
	};
	if stop < start {
		return Ok(Value::List(SafeList::new(Vec::new(), config, loc)?));
	}
	let count = (stop - start) as usize;
	if count > config.max_const_len {
		return Err(Error::IterableTooLong {
			where_: loc.clone(),
			detail: format!("range of length {count} exceeds the limit of {}", config.max_const_len),
		});
	}
	let items: Result<Vec<Value>, Error> =
		(start..stop).map(|n| Int::new(n, config, loc).map(Value::Int)).collect();
	Ok(Value::List(SafeList::new(items?, config, loc)?))
}

fn typeof_(args: &[Value], config: &Config, loc: &SourceLocation) -> Result<Value, Error> {
	let [v] = args else { return Err(arity_err("typeof", loc)) };
	Ok(Value::Str(SafeStr::new(v.type_name(), config, loc)?))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn loc() -> SourceLocation {
		SourceLocation::default()
	}

	#[test]
	fn range_is_exclusive_and_bounded() {
		let config = Config::default();
		let v = range(&[Value::Int(Int::new(5, &config, &loc()).unwrap())], &config, &loc()).unwrap();
		match v {
			Value::List(l) => assert_eq!(l.len(), 5),
			_ => panic!("expected list"),
		}
	}

	#[test]
	fn range_rejects_runs_past_the_container_limit() {
		let config = Config::builder().max_const_len(3).build();
		let err = range(&[Value::Int(Int::new(10, &config, &loc()).unwrap())], &config, &loc()).unwrap_err();
		assert_eq!(err.kind(), crate::error::ErrorKind::IterableTooLong);
	}

	#[test]
	fn typeof_reports_the_safe_container_names() {
		let config = Config::default();
		let l = Value::List(SafeList::new(Vec::new(), &config, &loc()).unwrap());
		let v = typeof_(&[l], &config, &loc()).unwrap();
		match v {
			Value::Str(s) => assert_eq!(s.as_str(), "list"),
			_ => panic!("expected str"),
		}
	}

	#[test]
	fn default_builtins_are_callable_native_functions() {
		let table = default_builtins();
		match table.get("len").unwrap() {
			Value::Native(_) => {}
			_ => panic!("expected native function"),
		}
	}
}
