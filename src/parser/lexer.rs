//! Tokenizer: scans source characters into a token stream, including
//! Python-style `INDENT`/`DEDENT` tracking, for the recursive-descent
//! parser in `parser.rs` to consume.

use crate::container::RefCount;
use crate::parser::{ParseError, ParseErrorKind, SourceLocation};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum Tok {
	Name(String),
	Int(i128),
	Float(f64),
	Str(String),
	Newline,
	Indent,
	Dedent,
	EndMarker,

	If,
	Elif,
	Else,
	While,
	For,
	In,
	NotIn,
	Def,
	Return,
	Break,
	Continue,
	Pass,
	And,
	Or,
	Not,
	True,
	False,
	None,

	Plus,
	Minus,
	Star,
	DoubleStar,
	Slash,
	DoubleSlash,
	Percent,
	LShift,
	RShift,
	Amp,
	Pipe,
	Caret,
	Tilde,

	Lt,
	LtE,
	Gt,
	GtE,
	EqEq,
	NotEq,
	Eq,

	PlusEq,
	MinusEq,
	StarEq,
	SlashEq,
	DoubleSlashEq,
	PercentEq,
	DoubleStarEq,
	AmpEq,
	PipeEq,
	CaretEq,
	LShiftEq,
	RShiftEq,

	LParen,
	RParen,
	LBracket,
	RBracket,
	LBrace,
	RBrace,
	Comma,
	Colon,
	Dot,
}

#[derive(Debug, Clone)]
pub struct Token {
	pub tok: Tok,
	pub loc: SourceLocation,
}

struct Lexer<'a> {
	chars: std::iter::Peekable<std::str::Chars<'a>>,
	filename: Option<RefCount<Path>>,
	line: usize,
	paren_depth: i32,
	indents: Vec<usize>,
	at_line_start: bool,
	tokens: Vec<Token>,
}

pub fn tokenize(source: &str, filename: Option<&Path>) -> Result<Vec<Token>, ParseError> {
	let filename = filename.map(|p| RefCount::<Path>::from(p.to_path_buf().into_boxed_path()));
	let mut lexer = Lexer {
		chars: source.chars().peekable(),
		filename,
		line: 1,
		paren_depth: 0,
		indents: vec![0],
		at_line_start: true,
		tokens: Vec::new(),
	};
	lexer.run()?;
	Ok(lexer.tokens)
}

impl<'a> Lexer<'a> {
	fn loc(&self) -> SourceLocation {
		SourceLocation::new(self.filename.clone(), self.line)
	}

	fn error(&self, kind: ParseErrorKind) -> ParseError {
		kind.error(self.loc())
	}

	fn push(&mut self, tok: Tok) {
		let loc = self.loc();
		self.tokens.push(Token { tok, loc });
	}

	fn run(&mut self) -> Result<(), ParseError> {
		while let Some(&c) = self.chars.peek() {
			if self.at_line_start && self.paren_depth == 0 {
				self.handle_indentation()?;
				if self.chars.peek().is_none() {
					break;
				}
			}

			let c = *self.chars.peek().unwrap();
			match c {
				' ' | '\t' => {
					self.chars.next();
				}
				'#' => {
					while let Some(&c) = self.chars.peek() {
						if c == '\n' {
							break;
						}
						self.chars.next();
					}
				}
				'\n' => {
					self.chars.next();
					if self.paren_depth == 0 {
						if !matches!(self.tokens.last().map(|t| &t.tok), Some(Tok::Newline) | None) {
							self.push(Tok::Newline);
						}
						self.at_line_start = true;
					}
					self.line += 1;
				}
				'\\' if self.peek_is_line_continuation() => {
					self.chars.next();
					self.chars.next();
					self.line += 1;
				}
				'0'..='9' => self.lex_number()?,
				'\'' | '"' => self.lex_string(c)?,
				c if c.is_alphabetic() || c == '_' => self.lex_name(),
				_ => self.lex_operator()?,
			}
		}

		if self.paren_depth == 0 && !matches!(self.tokens.last().map(|t| &t.tok), Some(Tok::Newline) | None)
		{
			self.push(Tok::Newline);
		}
		while self.indents.len() > 1 {
			self.indents.pop();
			self.push(Tok::Dedent);
		}
		self.push(Tok::EndMarker);
		Ok(())
	}

	fn peek_is_line_continuation(&mut self) -> bool {
		let mut clone = self.chars.clone();
		clone.next() == Some('\\') && clone.next() == Some('\n')
	}

	fn handle_indentation(&mut self) -> Result<(), ParseError> {
		loop {
			let mut col = 0usize;
			let mut lookahead = self.chars.clone();
			loop {
				match lookahead.peek() {
					Some(' ') => {
						col += 1;
						lookahead.next();
					}
					Some('\t') => {
						col += 8 - (col % 8);
						lookahead.next();
					}
					_ => break,
				}
			}
			match lookahead.peek() {
				None => {
					self.chars = lookahead;
					self.at_line_start = false;
					return Ok(());
				}
				Some('\n') | Some('#') => {
					// Blank or comment-only line: consume the indentation but don't
					// change the indent stack or emit INDENT/DEDENT/NEWLINE for it.
					self.chars = lookahead;
					self.at_line_start = false;
					return Ok(());
				}
				Some(_) => {
					self.chars = lookahead;
					self.at_line_start = false;
					let current = *self.indents.last().unwrap();
					if col > current {
						self.indents.push(col);
						self.push(Tok::Indent);
					} else if col < current {
						while *self.indents.last().unwrap() > col {
							self.indents.pop();
							self.push(Tok::Dedent);
						}
						if *self.indents.last().unwrap() != col {
							return Err(self.error(ParseErrorKind::BadIndentation));
						}
					}
					return Ok(());
				}
			}
		}
	}

	fn lex_number(&mut self) -> Result<(), ParseError> {
		let mut text = String::new();
		let mut is_float = false;
		while let Some(&c) = self.chars.peek() {
			if c.is_ascii_digit() {
				text.push(c);
				self.chars.next();
			} else if c == '.' && !is_float {
				is_float = true;
				text.push(c);
				self.chars.next();
			} else if (c == 'e' || c == 'E') && !text.is_empty() {
				is_float = true;
				text.push(c);
				self.chars.next();
				if let Some(&sign) = self.chars.peek() {
					if sign == '+' || sign == '-' {
						text.push(sign);
						self.chars.next();
					}
				}
			} else {
				break;
			}
		}
		if is_float {
			let value = text.parse::<f64>().map_err(|_| self.error(ParseErrorKind::IntegerLiteralOverflow))?;
			self.push(Tok::Float(value));
		} else {
			let value = text.parse::<i128>().map_err(|_| self.error(ParseErrorKind::IntegerLiteralOverflow))?;
			self.push(Tok::Int(value));
		}
		Ok(())
	}

	fn lex_string(&mut self, quote: char) -> Result<(), ParseError> {
		self.chars.next();
		let mut out = String::new();
		loop {
			match self.chars.next() {
				None => return Err(self.error(ParseErrorKind::MissingEndingQuote(quote))),
				Some(c) if c == quote => break,
				Some('\\') => match self.chars.next() {
					Some('n') => out.push('\n'),
					Some('t') => out.push('\t'),
					Some('r') => out.push('\r'),
					Some('\\') => out.push('\\'),
					Some('\'') => out.push('\''),
					Some('"') => out.push('"'),
					Some('0') => out.push('\0'),
					Some(other) => out.push(other),
					None => return Err(self.error(ParseErrorKind::MissingEndingQuote(quote))),
				},
				Some('\n') => return Err(self.error(ParseErrorKind::MissingEndingQuote(quote))),
				Some(c) => out.push(c),
			}
		}
		self.push(Tok::Str(out));
		Ok(())
	}

	fn lex_name(&mut self) {
		let mut text = String::new();
		while let Some(&c) = self.chars.peek() {
			if c.is_alphanumeric() || c == '_' {
				text.push(c);
				self.chars.next();
			} else {
				break;
			}
		}
		let tok = match text.as_str() {
			"if" => Tok::If,
			"elif" => Tok::Elif,
			"else" => Tok::Else,
			"while" => Tok::While,
			"for" => Tok::For,
			"in" => Tok::In,
			"def" => Tok::Def,
			"return" => Tok::Return,
			"break" => Tok::Break,
			"continue" => Tok::Continue,
			"pass" => Tok::Pass,
			"and" => Tok::And,
			"or" => Tok::Or,
			"not" => Tok::Not,
			"True" => Tok::True,
			"False" => Tok::False,
			"None" => Tok::None,
			_ => Tok::Name(text),
		};
		self.push(tok);
	}

	fn lex_operator(&mut self) -> Result<(), ParseError> {
		macro_rules! two {
			($second:expr, $two_tok:expr, $one_tok:expr) => {{
				self.chars.next();
				if self.chars.peek() == Some(&$second) {
					self.chars.next();
					$two_tok
				} else {
					$one_tok
				}
			}};
		}

		let c = *self.chars.peek().unwrap();
		let tok = match c {
			'(' => {
				self.chars.next();
				self.paren_depth += 1;
				Tok::LParen
			}
			')' => {
				self.chars.next();
				self.paren_depth -= 1;
				Tok::RParen
			}
			'[' => {
				self.chars.next();
				self.paren_depth += 1;
				Tok::LBracket
			}
			']' => {
				self.chars.next();
				self.paren_depth -= 1;
				Tok::RBracket
			}
			'{' => {
				self.chars.next();
				self.paren_depth += 1;
				Tok::LBrace
			}
			'}' => {
				self.chars.next();
				self.paren_depth -= 1;
				Tok::RBrace
			}
			',' => {
				self.chars.next();
				Tok::Comma
			}
			':' => {
				self.chars.next();
				Tok::Colon
			}
			'.' => {
				self.chars.next();
				Tok::Dot
			}
			'~' => {
				self.chars.next();
				Tok::Tilde
			}
			'+' => two!('=', Tok::PlusEq, Tok::Plus),
			'-' => two!('=', Tok::MinusEq, Tok::Minus),
			'%' => two!('=', Tok::PercentEq, Tok::Percent),
			'^' => two!('=', Tok::CaretEq, Tok::Caret),
			'&' => two!('=', Tok::AmpEq, Tok::Amp),
			'|' => two!('=', Tok::PipeEq, Tok::Pipe),
			'=' => two!('=', Tok::EqEq, Tok::Eq),
			'*' => {
				self.chars.next();
				if self.chars.peek() == Some(&'*') {
					self.chars.next();
					if self.chars.peek() == Some(&'=') {
						self.chars.next();
						Tok::DoubleStarEq
					} else {
						Tok::DoubleStar
					}
				} else if self.chars.peek() == Some(&'=') {
					self.chars.next();
					Tok::StarEq
				} else {
					Tok::Star
				}
			}
			'/' => {
				self.chars.next();
				if self.chars.peek() == Some(&'/') {
					self.chars.next();
					if self.chars.peek() == Some(&'=') {
						self.chars.next();
						Tok::DoubleSlashEq
					} else {
						Tok::DoubleSlash
					}
				} else if self.chars.peek() == Some(&'=') {
					self.chars.next();
					Tok::SlashEq
				} else {
					Tok::Slash
				}
			}
			'<' => {
				self.chars.next();
				if self.chars.peek() == Some(&'<') {
					self.chars.next();
					if self.chars.peek() == Some(&'=') {
						self.chars.next();
						Tok::LShiftEq
					} else {
						Tok::LShift
					}
				} else if self.chars.peek() == Some(&'=') {
					self.chars.next();
					Tok::LtE
				} else {
					Tok::Lt
				}
			}
			'>' => {
				self.chars.next();
				if self.chars.peek() == Some(&'>') {
					self.chars.next();
					if self.chars.peek() == Some(&'=') {
						self.chars.next();
						Tok::RShiftEq
					} else {
						Tok::RShift
					}
				} else if self.chars.peek() == Some(&'=') {
					self.chars.next();
					Tok::GtE
				} else {
					Tok::Gt
				}
			}
			'!' => {
				self.chars.next();
				if self.chars.peek() == Some(&'=') {
					self.chars.next();
					Tok::NotEq
				} else {
					return Err(self.error(ParseErrorKind::UnknownTokenStart('!')));
				}
			}
			other => return Err(self.error(ParseErrorKind::UnknownTokenStart(other))),
		};
		self.push(tok);
		Ok(())
	}
}
