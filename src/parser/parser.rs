//! Recursive-descent parser over the token stream from `lexer.rs`,
//! producing the tree in `crate::ast`.

use crate::ast::*;
use crate::parser::lexer::{Tok, Token};
use crate::parser::{ParseError, ParseErrorKind, SourceLocation};

pub struct Parser {
	tokens: Vec<Token>,
	pos: usize,
}

type PResult<T> = Result<T, ParseError>;

impl Parser {
	pub fn new(tokens: Vec<Token>) -> Self {
		Self { tokens, pos: 0 }
	}

	fn current(&self) -> &Token {
		&self.tokens[self.pos]
	}

	fn loc(&self) -> SourceLocation {
		self.current().loc.clone()
	}

	fn check(&self, want: &Tok) -> bool {
		std::mem::discriminant(&self.current().tok) == std::mem::discriminant(want)
	}

	fn advance(&mut self) -> Token {
		let tok = self.tokens[self.pos].clone();
		if self.pos + 1 < self.tokens.len() {
			self.pos += 1;
		}
		tok
	}

	fn eat(&mut self, want: &Tok) -> bool {
		if self.check(want) {
			self.advance();
			true
		} else {
			false
		}
	}

	fn expect(&mut self, want: &Tok, expected: &'static str) -> PResult<Token> {
		if self.check(want) {
			Ok(self.advance())
		} else {
			Err(self.unexpected(expected))
		}
	}

	fn unexpected(&self, expected: &'static str) -> ParseError {
		let found = format!("{:?}", self.current().tok);
		ParseErrorKind::UnexpectedToken { expected, found }.error(self.loc())
	}

	fn expect_name(&mut self) -> PResult<Name> {
		match self.current().tok.clone() {
			Tok::Name(s) => {
				self.advance();
				Ok(s)
			}
			_ => Err(self.unexpected("a name")),
		}
	}

	pub fn parse_module(mut self) -> PResult<Module> {
		let mut body = Vec::new();
		while !self.check(&Tok::EndMarker) {
			body.push(self.parse_statement()?);
		}
		Ok(Module { body })
	}

	// ---------- statements ----------

	fn parse_statement(&mut self) -> PResult<Stmt> {
		match &self.current().tok {
			Tok::If => self.parse_if(),
			Tok::While => self.parse_while(),
			Tok::For => self.parse_for(),
			Tok::Def => self.parse_funcdef(),
			_ => self.parse_simple_stmt(),
		}
	}

	fn parse_block(&mut self) -> PResult<Vec<Stmt>> {
		self.expect(&Tok::Colon, "':'")?;
		if self.eat(&Tok::Newline) {
			self.expect(&Tok::Indent, "an indented block")?;
			let mut stmts = Vec::new();
			while !self.check(&Tok::Dedent) && !self.check(&Tok::EndMarker) {
				stmts.push(self.parse_statement()?);
			}
			self.expect(&Tok::Dedent, "dedent")?;
			Ok(stmts)
		} else {
			Ok(vec![self.parse_simple_stmt()?])
		}
	}

	fn parse_if(&mut self) -> PResult<Stmt> {
		let loc = self.loc();
		self.advance();
		let test = self.parse_test()?;
		let body = self.parse_block()?;
		let orelse = if self.check(&Tok::Elif) {
			vec![self.parse_if_as_elif()?]
		} else if self.eat(&Tok::Else) {
			self.parse_block()?
		} else {
			Vec::new()
		};
		Ok(Stmt { kind: StmtKind::If { test, body, orelse }, loc })
	}

	fn parse_if_as_elif(&mut self) -> PResult<Stmt> {
		let loc = self.loc();
		self.advance(); // 'elif'
		let test = self.parse_test()?;
		let body = self.parse_block()?;
		let orelse = if self.check(&Tok::Elif) {
			vec![self.parse_if_as_elif()?]
		} else if self.eat(&Tok::Else) {
			self.parse_block()?
		} else {
			Vec::new()
		};
		Ok(Stmt { kind: StmtKind::If { test, body, orelse }, loc })
	}

	fn parse_while(&mut self) -> PResult<Stmt> {
		let loc = self.loc();
		self.advance();
		let test = self.parse_test()?;
		let body = self.parse_block()?;
		Ok(Stmt { kind: StmtKind::While { test, body }, loc })
	}

	fn parse_for(&mut self) -> PResult<Stmt> {
		let loc = self.loc();
		self.advance();
		let target = self.parse_target()?;
		self.expect(&Tok::In, "'in'")?;
		let iter = self.parse_testlist()?;
		let body = self.parse_block()?;
		Ok(Stmt { kind: StmtKind::For { target, iter, body }, loc })
	}

	fn parse_funcdef(&mut self) -> PResult<Stmt> {
		let loc = self.loc();
		self.advance();
		let name = self.expect_name()?;
		self.expect(&Tok::LParen, "'('")?;
		let mut params = Vec::new();
		while !self.check(&Tok::RParen) {
			let pname = self.expect_name()?;
			let default = if self.eat(&Tok::Eq) { Some(self.parse_test()?) } else { None };
			params.push(Param { name: pname, default });
			if !self.eat(&Tok::Comma) {
				break;
			}
		}
		self.expect(&Tok::RParen, "')'")?;
		let body = self.parse_block()?;
		Ok(Stmt { kind: StmtKind::FunctionDef { name, params, body }, loc })
	}

	fn parse_simple_stmt(&mut self) -> PResult<Stmt> {
		let loc = self.loc();
		let stmt = match &self.current().tok {
			Tok::Pass => {
				self.advance();
				StmtKind::Pass
			}
			Tok::Break => {
				self.advance();
				StmtKind::Break
			}
			Tok::Continue => {
				self.advance();
				StmtKind::Continue
			}
			Tok::Return => {
				self.advance();
				if self.check(&Tok::Newline) {
					StmtKind::Return(None)
				} else {
					StmtKind::Return(Some(self.parse_testlist()?))
				}
			}
			_ => return self.parse_assignment_or_expr_stmt(),
		};
		self.expect(&Tok::Newline, "newline")?;
		Ok(Stmt { kind: stmt, loc })
	}

	fn aug_op(&self) -> Option<BinOp> {
		Some(match &self.current().tok {
			Tok::PlusEq => BinOp::Add,
			Tok::MinusEq => BinOp::Sub,
			Tok::StarEq => BinOp::Mul,
			Tok::SlashEq => BinOp::Div,
			Tok::DoubleSlashEq => BinOp::FloorDiv,
			Tok::PercentEq => BinOp::Mod,
			Tok::DoubleStarEq => BinOp::Pow,
			Tok::LShiftEq => BinOp::LShift,
			Tok::RShiftEq => BinOp::RShift,
			Tok::AmpEq => BinOp::BitAnd,
			Tok::PipeEq => BinOp::BitOr,
			Tok::CaretEq => BinOp::BitXor,
			_ => return None,
		})
	}

	fn parse_assignment_or_expr_stmt(&mut self) -> PResult<Stmt> {
		let loc = self.loc();
		let first = self.parse_testlist()?;

		if self.check(&Tok::Eq) {
			let mut targets = vec![self.expr_to_target(first)?];
			let value = loop {
				self.advance(); // '='
				let next = self.parse_testlist()?;
				if self.check(&Tok::Eq) {
					targets.push(self.expr_to_target(next)?);
				} else {
					break next;
				}
			};
			self.expect(&Tok::Newline, "newline")?;
			return Ok(Stmt { kind: StmtKind::Assign { targets, value }, loc });
		}

		if let Some(op) = self.aug_op() {
			self.advance();
			let value = self.parse_testlist()?;
			self.expect(&Tok::Newline, "newline")?;
			let target = self.expr_to_target(first)?;
			return Ok(Stmt { kind: StmtKind::AugAssign { target, op, value }, loc });
		}

		self.expect(&Tok::Newline, "newline")?;
		Ok(Stmt { kind: StmtKind::Expr(first), loc })
	}

	// ---------- assignment targets ----------

	fn target_to_expr(&self, target: AssignTarget, loc: SourceLocation) -> Expr {
		let kind = match target {
			AssignTarget::Name(n) => ExprKind::Name(n),
			AssignTarget::Tuple(items) => {
				ExprKind::Tuple(items.into_iter().map(|t| self.target_to_expr(t, loc.clone())).collect())
			}
			AssignTarget::Subscript { value, index, .. } => ExprKind::Subscript { value, index },
			AssignTarget::Attribute { value, attr, .. } => ExprKind::Attribute { value, attr },
		};
		Expr { kind, loc }
	}

	fn expr_to_target(&self, expr: Expr) -> PResult<AssignTarget> {
		let loc = expr.loc.clone();
		match expr.kind {
			ExprKind::Name(n) => Ok(AssignTarget::Name(n)),
			ExprKind::Tuple(items) => {
				Ok(AssignTarget::Tuple(items.into_iter().map(|e| self.expr_to_target(e)).collect::<PResult<_>>()?))
			}
			ExprKind::Subscript { value, index } => Ok(AssignTarget::Subscript { value, index, loc }),
			ExprKind::Attribute { value, attr } => Ok(AssignTarget::Attribute { value, attr, loc }),
			_ => Err(ParseErrorKind::InvalidAssignmentTarget.error(loc)),
		}
	}

	fn parse_target(&mut self) -> PResult<AssignTarget> {
		if self.eat(&Tok::LParen) {
			let mut items = Vec::new();
			while !self.check(&Tok::RParen) {
				items.push(self.parse_target()?);
				if !self.eat(&Tok::Comma) {
					break;
				}
			}
			self.expect(&Tok::RParen, "')'")?;
			return Ok(if items.len() == 1 { items.into_iter().next().unwrap() } else { AssignTarget::Tuple(items) });
		}

		let loc = self.loc();
		let name = self.expect_name()?;
		let mut target = AssignTarget::Name(name);
		loop {
			match &self.current().tok {
				Tok::LBracket => {
					self.advance();
					let index = self.parse_test()?;
					self.expect(&Tok::RBracket, "']'")?;
					let value = Box::new(self.target_to_expr(target, loc.clone()));
					target = AssignTarget::Subscript { value, index: Box::new(index), loc: loc.clone() };
				}
				Tok::Dot => {
					self.advance();
					let attr = self.expect_name()?;
					let value = Box::new(self.target_to_expr(target, loc.clone()));
					target = AssignTarget::Attribute { value, attr, loc: loc.clone() };
				}
				_ => break,
			}
		}
		Ok(target)
	}

	fn parse_target_commalist(&mut self) -> PResult<Vec<AssignTarget>> {
		let mut items = vec![self.parse_target()?];
		while self.eat(&Tok::Comma) {
			if self.check(&Tok::In) {
				break;
			}
			items.push(self.parse_target()?);
		}
		Ok(items)
	}

	// ---------- expressions ----------

	fn parse_testlist(&mut self) -> PResult<Expr> {
		let loc = self.loc();
		let first = self.parse_test()?;
		if self.check(&Tok::Comma) {
			let mut items = vec![first];
			while self.eat(&Tok::Comma) {
				if self.is_stmt_terminator() {
					break;
				}
				items.push(self.parse_test()?);
			}
			Ok(Expr { kind: ExprKind::Tuple(items), loc })
		} else {
			Ok(first)
		}
	}

	fn is_stmt_terminator(&self) -> bool {
		matches!(
			self.current().tok,
			Tok::Newline | Tok::EndMarker | Tok::RParen | Tok::RBracket | Tok::RBrace | Tok::Eq | Tok::Colon
		)
	}

	fn parse_test(&mut self) -> PResult<Expr> {
		let loc = self.loc();
		let body = self.parse_or_test()?;
		if self.eat(&Tok::If) {
			let test = self.parse_or_test()?;
			self.expect(&Tok::Else, "'else'")?;
			let orelse = self.parse_test()?;
			Ok(Expr {
				kind: ExprKind::IfExp { test: Box::new(test), body: Box::new(body), orelse: Box::new(orelse) },
				loc,
			})
		} else {
			Ok(body)
		}
	}

	fn parse_or_test(&mut self) -> PResult<Expr> {
		let loc = self.loc();
		let mut values = vec![self.parse_and_test()?];
		while self.eat(&Tok::Or) {
			values.push(self.parse_and_test()?);
		}
		Ok(if values.len() == 1 {
			values.pop().unwrap()
		} else {
			Expr { kind: ExprKind::BoolOp { op: BoolOp::Or, values }, loc }
		})
	}

	fn parse_and_test(&mut self) -> PResult<Expr> {
		let loc = self.loc();
		let mut values = vec![self.parse_not_test()?];
		while self.eat(&Tok::And) {
			values.push(self.parse_not_test()?);
		}
		Ok(if values.len() == 1 {
			values.pop().unwrap()
		} else {
			Expr { kind: ExprKind::BoolOp { op: BoolOp::And, values }, loc }
		})
	}

	fn parse_not_test(&mut self) -> PResult<Expr> {
		let loc = self.loc();
		if self.eat(&Tok::Not) {
			let operand = self.parse_not_test()?;
			Ok(Expr { kind: ExprKind::UnaryOp { op: UnaryOp::Not, operand: Box::new(operand) }, loc })
		} else {
			self.parse_comparison()
		}
	}

	fn parse_comparison(&mut self) -> PResult<Expr> {
		let loc = self.loc();
		let left = self.parse_bitor()?;
		let mut ops = Vec::new();
		let mut comparators = Vec::new();
		loop {
			let op = match &self.current().tok {
				Tok::Lt => CompareOp::Lt,
				Tok::LtE => CompareOp::LtE,
				Tok::Gt => CompareOp::Gt,
				Tok::GtE => CompareOp::GtE,
				Tok::EqEq => CompareOp::Eq,
				Tok::NotEq => CompareOp::NotEq,
				Tok::In => CompareOp::In,
				Tok::Not if self.peek_is_not_in() => CompareOp::NotIn,
				_ => break,
			};
			if op == CompareOp::NotIn {
				self.advance();
				self.advance();
			} else {
				self.advance();
			}
			ops.push(op);
			comparators.push(self.parse_bitor()?);
		}
		if ops.is_empty() {
			Ok(left)
		} else {
			Ok(Expr { kind: ExprKind::Compare { left: Box::new(left), ops, comparators }, loc })
		}
	}

	fn peek_is_not_in(&self) -> bool {
		matches!(self.current().tok, Tok::Not) && matches!(self.tokens.get(self.pos + 1).map(|t| &t.tok), Some(Tok::In))
	}

	fn parse_bitor(&mut self) -> PResult<Expr> {
		let mut left = self.parse_bitxor()?;
		while self.check(&Tok::Pipe) {
			let loc = self.loc();
			self.advance();
			let rhs = self.parse_bitxor()?;
			left = Expr { kind: ExprKind::BinOp { op: BinOp::BitOr, lhs: Box::new(left), rhs: Box::new(rhs) }, loc };
		}
		Ok(left)
	}

	fn parse_bitxor(&mut self) -> PResult<Expr> {
		let mut left = self.parse_bitand()?;
		while self.check(&Tok::Caret) {
			let loc = self.loc();
			self.advance();
			let rhs = self.parse_bitand()?;
			left = Expr { kind: ExprKind::BinOp { op: BinOp::BitXor, lhs: Box::new(left), rhs: Box::new(rhs) }, loc };
		}
		Ok(left)
	}

	fn parse_bitand(&mut self) -> PResult<Expr> {
		let mut left = self.parse_shift()?;
		while self.check(&Tok::Amp) {
			let loc = self.loc();
			self.advance();
			let rhs = self.parse_shift()?;
			left = Expr { kind: ExprKind::BinOp { op: BinOp::BitAnd, lhs: Box::new(left), rhs: Box::new(rhs) }, loc };
		}
		Ok(left)
	}

	fn parse_shift(&mut self) -> PResult<Expr> {
		let mut left = self.parse_arith()?;
		loop {
			let op = match &self.current().tok {
				Tok::LShift => BinOp::LShift,
				Tok::RShift => BinOp::RShift,
				_ => break,
			};
			let loc = self.loc();
			self.advance();
			let rhs = self.parse_arith()?;
			left = Expr { kind: ExprKind::BinOp { op, lhs: Box::new(left), rhs: Box::new(rhs) }, loc };
		}
		Ok(left)
	}

	fn parse_arith(&mut self) -> PResult<Expr> {
		let mut left = self.parse_term()?;
		loop {
			let op = match &self.current().tok {
				Tok::Plus => BinOp::Add,
				Tok::Minus => BinOp::Sub,
				_ => break,
			};
			let loc = self.loc();
			self.advance();
			let rhs = self.parse_term()?;
			left = Expr { kind: ExprKind::BinOp { op, lhs: Box::new(left), rhs: Box::new(rhs) }, loc };
		}
		Ok(left)
	}

	fn parse_term(&mut self) -> PResult<Expr> {
		let mut left = self.parse_factor()?;
		loop {
			let op = match &self.current().tok {
				Tok::Star => BinOp::Mul,
				Tok::Slash => BinOp::Div,
				Tok::DoubleSlash => BinOp::FloorDiv,
				Tok::Percent => BinOp::Mod,
				_ => break,
			};
			let loc = self.loc();
			self.advance();
			let rhs = self.parse_factor()?;
			left = Expr { kind: ExprKind::BinOp { op, lhs: Box::new(left), rhs: Box::new(rhs) }, loc };
		}
		Ok(left)
	}

	fn parse_factor(&mut self) -> PResult<Expr> {
		let loc = self.loc();
		let op = match &self.current().tok {
			Tok::Plus => Some(UnaryOp::Pos),
			Tok::Minus => Some(UnaryOp::Neg),
			Tok::Tilde => Some(UnaryOp::Invert),
			_ => None,
		};
		if let Some(op) = op {
			self.advance();
			let operand = self.parse_factor()?;
			Ok(Expr { kind: ExprKind::UnaryOp { op, operand: Box::new(operand) }, loc })
		} else {
			self.parse_power()
		}
	}

	fn parse_power(&mut self) -> PResult<Expr> {
		let loc = self.loc();
		let base = self.parse_atom_trailer()?;
		if self.eat(&Tok::DoubleStar) {
			let exponent = self.parse_factor()?;
			Ok(Expr { kind: ExprKind::BinOp { op: BinOp::Pow, lhs: Box::new(base), rhs: Box::new(exponent) }, loc })
		} else {
			Ok(base)
		}
	}

	fn parse_atom_trailer(&mut self) -> PResult<Expr> {
		let loc = self.loc();
		let mut atom = self.parse_atom()?;
		loop {
			match &self.current().tok {
				Tok::LParen => {
					self.advance();
					let args = self.parse_arglist()?;
					self.expect(&Tok::RParen, "')'")?;
					atom = Expr { kind: ExprKind::Call { func: Box::new(atom), args }, loc: loc.clone() };
				}
				Tok::LBracket => {
					self.advance();
					let index = self.parse_testlist()?;
					self.expect(&Tok::RBracket, "']'")?;
					atom = Expr { kind: ExprKind::Subscript { value: Box::new(atom), index: Box::new(index) }, loc: loc.clone() };
				}
				Tok::Dot => {
					self.advance();
					let attr = self.expect_name()?;
					if self.check(&Tok::LParen) {
						self.advance();
						let args = self.parse_arglist()?;
						self.expect(&Tok::RParen, "')'")?;
						atom = Expr { kind: ExprKind::MethodCall { receiver: Box::new(atom), method: attr, args }, loc: loc.clone() };
					} else {
						atom = Expr { kind: ExprKind::Attribute { value: Box::new(atom), attr }, loc: loc.clone() };
					}
				}
				_ => break,
			}
		}
		Ok(atom)
	}

	fn parse_arglist(&mut self) -> PResult<Vec<Expr>> {
		let mut args = Vec::new();
		while !self.check(&Tok::RParen) {
			args.push(self.parse_test()?);
			if !self.eat(&Tok::Comma) {
				break;
			}
		}
		Ok(args)
	}

	fn parse_comp_clauses(&mut self) -> PResult<Vec<Comprehension>> {
		let mut out = Vec::new();
		while self.check(&Tok::For) {
			self.advance();
			let targets = self.parse_target_commalist()?;
			let target = if targets.len() == 1 { targets.into_iter().next().unwrap() } else { AssignTarget::Tuple(targets) };
			self.expect(&Tok::In, "'in'")?;
			let iter = self.parse_or_test()?;
			let mut ifs = Vec::new();
			while self.eat(&Tok::If) {
				ifs.push(self.parse_or_test()?);
			}
			out.push(Comprehension { target, iter, ifs });
		}
		Ok(out)
	}

	fn parse_atom(&mut self) -> PResult<Expr> {
		let loc = self.loc();
		let kind = match self.current().tok.clone() {
			Tok::Int(n) => {
				self.advance();
				ExprKind::IntLit(n)
			}
			Tok::Float(n) => {
				self.advance();
				ExprKind::FloatLit(n)
			}
			Tok::Str(s) => {
				self.advance();
				ExprKind::StrLit(s)
			}
			Tok::True => {
				self.advance();
				ExprKind::BoolLit(true)
			}
			Tok::False => {
				self.advance();
				ExprKind::BoolLit(false)
			}
			Tok::None => {
				self.advance();
				ExprKind::NoneLit
			}
			Tok::Name(n) => {
				self.advance();
				ExprKind::Name(n)
			}
			Tok::LParen => return self.parse_paren_atom(loc),
			Tok::LBracket => return self.parse_bracket_atom(loc),
			Tok::LBrace => return self.parse_brace_atom(loc),
			_ => return Err(self.unexpected("an expression")),
		};
		Ok(Expr { kind, loc })
	}

	fn parse_paren_atom(&mut self, loc: SourceLocation) -> PResult<Expr> {
		self.advance(); // '('
		if self.eat(&Tok::RParen) {
			return Ok(Expr { kind: ExprKind::Tuple(Vec::new()), loc });
		}
		let first = self.parse_test()?;
		if self.check(&Tok::For) {
			let generators = self.parse_comp_clauses()?;
			self.expect(&Tok::RParen, "')'")?;
			return Ok(Expr { kind: ExprKind::GeneratorExp { elt: Box::new(first), generators }, loc });
		}
		if self.check(&Tok::Comma) {
			let mut items = vec![first];
			while self.eat(&Tok::Comma) {
				if self.check(&Tok::RParen) {
					break;
				}
				items.push(self.parse_test()?);
			}
			self.expect(&Tok::RParen, "')'")?;
			return Ok(Expr { kind: ExprKind::Tuple(items), loc });
		}
		self.expect(&Tok::RParen, "')'")?;
		Ok(first)
	}

	fn parse_bracket_atom(&mut self, loc: SourceLocation) -> PResult<Expr> {
		self.advance(); // '['
		if self.eat(&Tok::RBracket) {
			return Ok(Expr { kind: ExprKind::ListLit(Vec::new()), loc });
		}
		let starred = self.eat(&Tok::Star);
		let first = self.parse_test()?;
		if self.check(&Tok::For) && !starred {
			let generators = self.parse_comp_clauses()?;
			self.expect(&Tok::RBracket, "']'")?;
			return Ok(Expr { kind: ExprKind::ListComp { elt: Box::new(first), generators }, loc });
		}
		let mut elems = vec![(first, starred)];
		while self.eat(&Tok::Comma) {
			if self.check(&Tok::RBracket) {
				break;
			}
			let starred = self.eat(&Tok::Star);
			elems.push((self.parse_test()?, starred));
		}
		self.expect(&Tok::RBracket, "']'")?;
		Ok(Expr { kind: ExprKind::ListLit(elems), loc })
	}

	fn parse_brace_atom(&mut self, loc: SourceLocation) -> PResult<Expr> {
		self.advance(); // '{'
		if self.eat(&Tok::RBrace) {
			return Ok(Expr { kind: ExprKind::DictLit(Vec::new()), loc });
		}
		if self.eat(&Tok::DoubleStar) {
			let first = self.parse_or_test()?;
			let mut items = vec![DictItem::Starred(first)];
			while self.eat(&Tok::Comma) {
				if self.check(&Tok::RBrace) {
					break;
				}
				if self.eat(&Tok::DoubleStar) {
					items.push(DictItem::Starred(self.parse_or_test()?));
				} else {
					let k = self.parse_test()?;
					self.expect(&Tok::Colon, "':'")?;
					let v = self.parse_test()?;
					items.push(DictItem::KeyValue(k, v));
				}
			}
			self.expect(&Tok::RBrace, "'}'")?;
			return Ok(Expr { kind: ExprKind::DictLit(items), loc });
		}

		let starred = self.eat(&Tok::Star);
		let first = self.parse_test()?;

		if self.check(&Tok::Colon) && !starred {
			self.advance();
			let value = self.parse_test()?;
			if self.check(&Tok::For) {
				let generators = self.parse_comp_clauses()?;
				self.expect(&Tok::RBrace, "'}'")?;
				return Ok(Expr {
					kind: ExprKind::DictComp { key: Box::new(first), value: Box::new(value), generators },
					loc,
				});
			}
			let mut items = vec![DictItem::KeyValue(first, value)];
			while self.eat(&Tok::Comma) {
				if self.check(&Tok::RBrace) {
					break;
				}
				if self.eat(&Tok::DoubleStar) {
					items.push(DictItem::Starred(self.parse_or_test()?));
					continue;
				}
				let k = self.parse_test()?;
				self.expect(&Tok::Colon, "':'")?;
				let v = self.parse_test()?;
				items.push(DictItem::KeyValue(k, v));
			}
			self.expect(&Tok::RBrace, "'}'")?;
			return Ok(Expr { kind: ExprKind::DictLit(items), loc });
		}

		if self.check(&Tok::For) && !starred {
			let generators = self.parse_comp_clauses()?;
			self.expect(&Tok::RBrace, "'}'")?;
			return Ok(Expr { kind: ExprKind::SetComp { elt: Box::new(first), generators }, loc });
		}

		let mut elems = vec![(first, starred)];
		while self.eat(&Tok::Comma) {
			if self.check(&Tok::RBrace) {
				break;
			}
			let starred = self.eat(&Tok::Star);
			elems.push((self.parse_test()?, starred));
		}
		self.expect(&Tok::RBrace, "'}'")?;
		Ok(Expr { kind: ExprKind::SetLit(elems), loc })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parser::lexer::tokenize;

	fn parse_src(src: &str) -> Module {
		let tokens = tokenize(src, None).expect("tokenize");
		Parser::new(tokens).parse_module().expect("parse")
	}

	#[test]
	fn parses_simple_assignment() {
		let module = parse_src("x = 1 + 2\n");
		assert_eq!(module.body.len(), 1);
	}

	#[test]
	fn parses_if_while_for_blocks() {
		let module = parse_src("if x:\n    y = 1\nelse:\n    y = 2\nwhile y:\n    y = y - 1\nfor i in y:\n    pass\n");
		assert_eq!(module.body.len(), 3);
	}

	#[test]
	fn parses_list_set_dict_literals_and_comprehensions() {
		let module = parse_src(
			"a = [1, 2, 3]\nb = {1, 2}\nc = {1: 1, 2: 2}\nd = [x for x in a if x]\ne = {x: x for x in a}\n",
		);
		assert_eq!(module.body.len(), 5);
	}

	#[test]
	fn parses_function_def_with_default() {
		let module = parse_src("def f(a, b=1):\n    return a + b\n");
		assert_eq!(module.body.len(), 1);
	}
}
