//! End-to-end scenarios run through the public `Interpreter` surface,
//! exercising the safety envelope as a whole rather than any one module.

use draconic::{Config, DisabledFeatures, Error, ErrorKind, Interpreter, Value};

fn int(v: &Value) -> i128 {
	match v {
		Value::Int(i) => i.inner(),
		other => panic!("expected int, got {other:?}"),
	}
}

#[test]
fn integer_bounds_reject_overflow_in_both_directions() {
	let config = Config::builder().max_int_size(8).build();
	let interp = Interpreter::new(config);
	assert_eq!(int(&interp.execute("100 + 27").unwrap()), 127);
	let err = interp.execute("100 + 28").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::NumberTooHigh);
	let err = interp.execute("-100 - 29").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::NumberTooHigh);
}

#[test]
fn integer_bounds_reject_already_out_of_range_literals() {
	let config = Config::builder().max_int_size(8).build();
	let interp = Interpreter::new(config);
	let err = interp.execute("1000").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::NumberTooHigh);
}

#[test]
fn repetition_is_bounded_before_allocating_not_after() {
	// A huge but perfectly valid 64-bit Int; must raise IterableTooLong
	// rather than attempting to materialize an exabyte-scale buffer.
	let interp = Interpreter::default();
	let err = interp.execute("[1] * 9223372036854775807").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::IterableTooLong);
	let err = interp.execute("\"x\" * 9223372036854775807").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::IterableTooLong);
}

#[test]
fn list_set_dict_growth_is_bounded() {
	let config = Config::builder().max_const_len(3).build();
	let interp = Interpreter::new(config);
	assert!(interp.execute("[1, 2, 3]").is_ok());
	let err = interp.execute("[1, 2, 3, 4]").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::IterableTooLong);
	let err = interp.execute("{1, 2, 3, 4}").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::IterableTooLong);
	let err = interp.execute("a = [1, 2, 3]\na.append(4)").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::IterableTooLong);
}

#[test]
fn container_closure_symmetry_for_add_and_set_methods() {
	let interp = Interpreter::default();
	let v = interp.execute("a = [1, 2]\nb = [3, 4]\nc = a + b\nc").unwrap();
	match v {
		Value::List(l) => assert_eq!(l.len(), 4),
		_ => panic!("expected list"),
	}
	let v = interp.execute("a = {1, 2}\nb = {2, 3}\na.union(b)").unwrap();
	match v {
		Value::Set(s) => assert_eq!(s.len(), 3),
		_ => panic!("expected set"),
	}
}

#[test]
fn bitwise_set_operators_are_not_special_cased_and_raise_type_errors() {
	let interp = Interpreter::default();
	let err = interp.execute("{1, 2} | {2, 3}").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::TypeError);
	let err = interp.execute("{1, 2} & {2, 3}").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::TypeError);
}

#[test]
fn builtin_isolation_is_a_silent_no_op_not_an_error() {
	let mut interp = Interpreter::default();
	interp.set_builtin("rl", Value::List(match interp.execute("[1, 2, 3]").unwrap() {
		Value::List(l) => l,
		_ => unreachable!(),
	}));
	let v = interp.execute("rl[1] = 99\nrl").unwrap();
	match v {
		Value::List(l) => assert_eq!(int(&l.get(1, &Default::default()).unwrap()), 2),
		_ => panic!("expected list"),
	}
}

#[test]
fn governor_dominance_stops_a_runaway_loop_before_its_container_bound_fires() {
	// A loop that would build a 10_000-element list every iteration, bounded
	// tightly by statement count rather than by list length.
	let config = Config::builder().max_statements(50).max_loops(1_000_000).max_const_len(20_000).build();
	let interp = Interpreter::new(config);
	let err = interp.execute("while True:\n    a = [0] * 10000").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::TooManyStatements);
}

#[test]
fn disabled_starred_literal_feature_raises_feature_not_available() {
	let config = Config::builder().disabled_features(DisabledFeatures::STARRED_LITERAL).build();
	let interp = Interpreter::new(config);
	let err = interp.execute("a = [1, 2]\n[*a, 3]").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::FeatureNotAvailable);

	let config = Config::default();
	let interp = Interpreter::new(config);
	let v = interp.execute("a = [1, 2]\n[*a, 3]").unwrap();
	match v {
		Value::List(l) => assert_eq!(l.len(), 3),
		_ => panic!("expected list"),
	}
}

#[test]
fn attribute_assignment_is_always_disabled() {
	let interp = Interpreter::default();
	let err = interp.execute("a = [1]\na.x = 2").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::FeatureNotAvailable);
}

#[test]
fn type_constructor_builtins_produce_safe_containers() {
	let interp = Interpreter::default();
	let v = interp.execute("list(range(5))").unwrap();
	match v {
		Value::List(l) => assert_eq!(l.len(), 5),
		_ => panic!("expected list"),
	}
	let v = interp.execute("dict((i, i * i) for i in range(5))").unwrap();
	match v {
		Value::Dict(d) => assert_eq!(d.len(), 5),
		_ => panic!("expected dict"),
	}
	let v = interp.execute("set(range(5))").unwrap();
	match v {
		Value::Set(s) => assert_eq!(s.len(), 5),
		_ => panic!("expected set"),
	}
	let v = interp.execute("str(42)").unwrap();
	match v {
		Value::Str(s) => assert_eq!(s.as_str(), "42"),
		_ => panic!("expected str"),
	}
}

#[test]
fn comprehensions_drive_both_the_loop_and_container_counters() {
	let config = Config::builder().max_const_len(2000).build();
	let interp = Interpreter::new(config);
	let v = interp.execute("{i: i for i in range(1000, 2000)}").unwrap();
	match v {
		Value::Dict(d) => assert_eq!(d.len(), 1000),
		_ => panic!("expected dict"),
	}

	let config = Config::builder().max_loops(500).build();
	let interp = Interpreter::new(config);
	let err = interp.execute("[i for i in range(1000)]").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::TooManyStatements);
}

#[test]
fn comprehension_length_is_checked_continuously_not_only_at_the_end() {
	// Nested over two 50-element ranges, a flat comprehension would build
	// 2500 elements; the length bound (100) must stop it well before that,
	// not only once the whole 2500-element result is already in hand.
	let config = Config::builder().max_const_len(100).max_loops(10_000).build();
	let interp = Interpreter::new(config);
	let err = interp.execute("[x for x in range(50) for y in range(50)]").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::IterableTooLong);
}

#[test]
fn range_builtin_respects_the_container_length_limit() {
	let config = Config::builder().max_const_len(10).build();
	let interp = Interpreter::new(config);
	let err = interp.execute("range(1000)").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::IterableTooLong);
}

#[test]
fn host_supplied_builtins_and_persisted_bindings_round_trip() {
	let mut interp = Interpreter::default();
	interp.set_builtin("GREETING", Value::Int(match interp.execute("7").unwrap() {
		Value::Int(i) => i,
		_ => unreachable!(),
	}));
	interp.execute("x = GREETING + 1").unwrap();
	let names = interp.names();
	assert_eq!(int(names.get("x").unwrap()), 8);
}

#[test]
fn only_none_bool_int_and_str_are_hashable() {
	let interp = Interpreter::default();
	assert!(interp.execute("{1, 2, 3}").is_ok());
	assert!(interp.execute("{1.5}").is_err());
	assert!(interp.execute("{1: 2}[1]").is_ok());
	assert_eq!(interp.execute("{1.5: 2}").unwrap_err().kind(), ErrorKind::TypeError);
	assert_eq!(interp.execute("{{1, 2}}").unwrap_err().kind(), ErrorKind::TypeError);
	assert_eq!(interp.execute("def f():\n    pass\n{f}").unwrap_err().kind(), ErrorKind::TypeError);
}

#[test]
fn parse_errors_surface_as_the_parse_error_kind() {
	let interp = Interpreter::default();
	let err = interp.execute("x = = 1").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Parse);
	assert!(matches!(err, Error::Parse(_)));
}
