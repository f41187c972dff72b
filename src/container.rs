//! Thin wrappers around `Rc`/`RefCell`, kept as named types so the rest of
//! the crate reads in terms of "shared value" and "mutable cell" rather than
//! a specific smart-pointer choice. The evaluator is single-threaded, so
//! there's no `Arc`/`Mutex` variant to switch to.

use std::cell::{Ref, RefCell, RefMut};
use std::ops::Deref;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct RefCount<T: ?Sized>(Rc<T>);

impl<T: ?Sized> Clone for RefCount<T> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}

impl<T> From<T> for RefCount<T> {
	#[inline]
	fn from(inp: T) -> Self {
		Self(Rc::new(inp))
	}
}

impl<T: ?Sized> From<Box<T>> for RefCount<T> {
	#[inline]
	fn from(inp: Box<T>) -> Self {
		Self(Rc::from(inp))
	}
}

impl<T: ?Sized> Deref for RefCount<T> {
	type Target = T;

	#[inline]
	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl<T: ?Sized> RefCount<T> {
	pub fn ptr_eq(lhs: &Self, rhs: &Self) -> bool {
		Rc::ptr_eq(&lhs.0, &rhs.0)
	}

	pub fn as_ptr(this: &Self) -> *const T {
		Rc::as_ptr(&this.0)
	}
}

#[derive(Debug, Default)]
pub struct Mutable<T>(RefCell<T>);

impl<T> From<T> for Mutable<T> {
	#[inline]
	fn from(inp: T) -> Self {
		Self(RefCell::new(inp))
	}
}

impl<T> Mutable<T> {
	pub fn new(inp: T) -> Self {
		Self(RefCell::new(inp))
	}

	#[inline]
	pub fn read(&self) -> Ref<'_, T> {
		self.0.borrow()
	}

	#[inline]
	pub fn write(&self) -> RefMut<'_, T> {
		self.0.borrow_mut()
	}
}
