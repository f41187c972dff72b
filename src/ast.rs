//! The syntax tree the evaluator walks: every node carries a `kind` and a
//! source location, following the same shape as `Stmt`/`Expr` nodes in
//! other small tree-walking interpreters (a tagged kind plus location,
//! rather than one flat struct per node).

use crate::parser::SourceLocation;

pub type Name = String;

#[derive(Debug, Clone)]
pub struct Module {
	pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Stmt {
	pub kind: StmtKind,
	pub loc: SourceLocation,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
	Expr(Expr),
	Assign { targets: Vec<AssignTarget>, value: Expr },
	AugAssign { target: AssignTarget, op: BinOp, value: Expr },
	If { test: Expr, body: Vec<Stmt>, orelse: Vec<Stmt> },
	While { test: Expr, body: Vec<Stmt> },
	For { target: AssignTarget, iter: Expr, body: Vec<Stmt> },
	FunctionDef { name: Name, params: Vec<Param>, body: Vec<Stmt> },
	Return(Option<Expr>),
	Break,
	Continue,
	Pass,
}

#[derive(Debug, Clone)]
pub struct Param {
	pub name: Name,
	pub default: Option<Expr>,
}

#[derive(Debug, Clone)]
pub enum AssignTarget {
	Name(Name),
	Tuple(Vec<AssignTarget>),
	Subscript { value: Box<Expr>, index: Box<Expr>, loc: SourceLocation },
	/// Attribute-target assignment (`x.attr = v`). Always rejected at
	/// evaluation time with `FeatureNotAvailable` — attribute access isn't
	/// part of the supported surface.
	Attribute { value: Box<Expr>, attr: Name, loc: SourceLocation },
}

#[derive(Debug, Clone)]
pub struct Expr {
	pub kind: ExprKind,
	pub loc: SourceLocation,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
	IntLit(i128),
	FloatLit(f64),
	StrLit(String),
	BoolLit(bool),
	NoneLit,
	Name(Name),
	/// `[a, b, *c]`. The `bool` on each element marks a starred entry.
	ListLit(Vec<(Expr, bool)>),
	SetLit(Vec<(Expr, bool)>),
	DictLit(Vec<DictItem>),
	ListComp { elt: Box<Expr>, generators: Vec<Comprehension> },
	SetComp { elt: Box<Expr>, generators: Vec<Comprehension> },
	DictComp { key: Box<Expr>, value: Box<Expr>, generators: Vec<Comprehension> },
	GeneratorExp { elt: Box<Expr>, generators: Vec<Comprehension> },
	UnaryOp { op: UnaryOp, operand: Box<Expr> },
	BinOp { op: BinOp, lhs: Box<Expr>, rhs: Box<Expr> },
	BoolOp { op: BoolOp, values: Vec<Expr> },
	Compare { left: Box<Expr>, ops: Vec<CompareOp>, comparators: Vec<Expr> },
	IfExp { test: Box<Expr>, body: Box<Expr>, orelse: Box<Expr> },
	Call { func: Box<Expr>, args: Vec<Expr> },
	/// `receiver.method(args...)`. Modeled as its own node, rather than a
	/// general attribute expression applied to `Call`, because the only
	/// attribute reads the language supports are safe-container method
	/// dispatch — there is no free-standing attribute-read expression.
	MethodCall { receiver: Box<Expr>, method: Name, args: Vec<Expr> },
	Subscript { value: Box<Expr>, index: Box<Expr> },
	Tuple(Vec<Expr>),
}

#[derive(Debug, Clone)]
pub enum DictItem {
	KeyValue(Expr, Expr),
	/// `**other`.
	Starred(Expr),
}

#[derive(Debug, Clone)]
pub struct Comprehension {
	pub target: AssignTarget,
	pub iter: Expr,
	pub ifs: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
	Neg,
	Pos,
	Not,
	Invert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
	Add,
	Sub,
	Mul,
	Div,
	FloorDiv,
	Mod,
	Pow,
	LShift,
	RShift,
	BitAnd,
	BitOr,
	BitXor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
	And,
	Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
	Eq,
	NotEq,
	Lt,
	LtE,
	Gt,
	GtE,
	In,
	NotIn,
}
