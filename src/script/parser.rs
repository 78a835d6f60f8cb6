//! A small Pratt parser for the embedded expression language.

use crate::error::ScriptError;
use crate::script::ast::{BinOp, Expr, Stmt, UnaryOp};
use crate::script::lexer::{Token, tokenize};

/// Parses a source string that must contain exactly one expression.
pub fn parse_expression(source: &str) -> Result<Expr, ScriptError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(tokens);
    parser.skip_separators();
    let expr = parser.parse_expr(0)?;
    parser.skip_separators();
    if let Some(token) = parser.peek() {
        return Err(ScriptError::Parse(format!(
            "unexpected trailing input near {:?}",
            token
        )));
    }
    Ok(expr)
}

/// Parses a source string into a statement list (assignments, function
/// definitions, and bare expressions, separated by newlines or `;`).
pub fn parse_program(source: &str) -> Result<Vec<Stmt>, ScriptError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(tokens);
    let mut statements = Vec::new();
    loop {
        parser.skip_separators();
        if parser.peek().is_none() {
            break;
        }
        statements.push(parser.parse_stmt()?);
    }
    Ok(statements)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Bracket nesting depth; newlines are transparent inside brackets.
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        let mut i = self.pos;
        while self.depth > 0 && matches!(self.tokens.get(i), Some(Token::Newline)) {
            i += 1;
        }
        self.tokens.get(i)
    }

    fn advance(&mut self) -> Option<Token> {
        while self.depth > 0 && matches!(self.tokens.get(self.pos), Some(Token::Newline)) {
            self.pos += 1;
        }
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn skip_separators(&mut self) {
        while matches!(
            self.tokens.get(self.pos),
            Some(Token::Newline) | Some(Token::Semi)
        ) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: &Token, context: &str) -> Result<(), ScriptError> {
        match self.advance() {
            Some(ref token) if token == expected => Ok(()),
            other => Err(ScriptError::Parse(format!(
                "expected {:?} {}, found {:?}",
                expected, context, other
            ))),
        }
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ScriptError> {
        if matches!(self.peek(), Some(Token::Fn)) {
            return self.parse_fn_def();
        }
        // Lookahead for `ident = expr`, taking care not to match `==`.
        if let (Some(Token::Ident(name)), Some(Token::Assign)) =
            (self.tokens.get(self.pos), self.tokens.get(self.pos + 1))
        {
            let name = name.clone();
            self.pos += 2;
            let expr = self.parse_expr(0)?;
            self.end_of_stmt()?;
            return Ok(Stmt::Assign { name, expr });
        }
        let expr = self.parse_expr(0)?;
        self.end_of_stmt()?;
        Ok(Stmt::Expr(expr))
    }

    fn parse_fn_def(&mut self) -> Result<Stmt, ScriptError> {
        self.advance(); // `fn`
        let name = match self.advance() {
            Some(Token::Ident(name)) => name,
            other => {
                return Err(ScriptError::Parse(format!(
                    "expected function name after 'fn', found {:?}",
                    other
                )));
            }
        };
        self.expect(&Token::LParen, "after function name")?;
        self.depth += 1;
        let mut params = Vec::new();
        if !matches!(self.peek(), Some(Token::RParen)) {
            loop {
                match self.advance() {
                    Some(Token::Ident(param)) => params.push(param),
                    other => {
                        return Err(ScriptError::Parse(format!(
                            "expected parameter name, found {:?}",
                            other
                        )));
                    }
                }
                match self.peek() {
                    Some(Token::Comma) => {
                        self.advance();
                    }
                    _ => break,
                }
            }
        }
        self.expect(&Token::RParen, "to close the parameter list")?;
        self.depth -= 1;
        self.expect(&Token::Assign, "before the function body")?;
        let body = self.parse_expr(0)?;
        self.end_of_stmt()?;
        Ok(Stmt::FnDef { name, params, body })
    }

    fn end_of_stmt(&mut self) -> Result<(), ScriptError> {
        match self.tokens.get(self.pos) {
            None | Some(Token::Newline) | Some(Token::Semi) => Ok(()),
            Some(token) => Err(ScriptError::Parse(format!(
                "unexpected token {:?} after statement",
                token
            ))),
        }
    }

    fn parse_expr(&mut self, min_bp: u8) -> Result<Expr, ScriptError> {
        let mut lhs = self.parse_prefix()?;
        loop {
            let (op, left_bp, right_bp) = match self.peek() {
                Some(Token::Or) => (BinOp::Or, 1, 2),
                Some(Token::And) => (BinOp::And, 3, 4),
                Some(Token::EqEq) => (BinOp::Eq, 5, 6),
                Some(Token::NotEq) => (BinOp::Ne, 5, 6),
                Some(Token::Lt) => (BinOp::Lt, 5, 6),
                Some(Token::LtEq) => (BinOp::Le, 5, 6),
                Some(Token::Gt) => (BinOp::Gt, 5, 6),
                Some(Token::GtEq) => (BinOp::Ge, 5, 6),
                Some(Token::Plus) => (BinOp::Add, 7, 8),
                Some(Token::Minus) => (BinOp::Sub, 7, 8),
                Some(Token::Star) => (BinOp::Mul, 9, 10),
                Some(Token::Slash) => (BinOp::Div, 9, 10),
                Some(Token::Percent) => (BinOp::Mod, 9, 10),
                // Right-associative, binds tighter than unary minus.
                Some(Token::StarStar) => (BinOp::Pow, 13, 13),
                Some(Token::LParen) if min_bp < 15 => {
                    self.advance();
                    self.depth += 1;
                    let args = self.parse_call_args()?;
                    self.depth -= 1;
                    lhs = Expr::Call {
                        callee: Box::new(lhs),
                        args,
                    };
                    continue;
                }
                Some(Token::LBracket) if min_bp < 15 => {
                    self.advance();
                    self.depth += 1;
                    let index = self.parse_expr(0)?;
                    self.expect(&Token::RBracket, "to close the index")?;
                    self.depth -= 1;
                    lhs = Expr::Index(Box::new(lhs), Box::new(index));
                    continue;
                }
                _ => break,
            };
            if left_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expr(right_bp)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>, ScriptError> {
        let mut args = Vec::new();
        if !matches!(self.peek(), Some(Token::RParen)) {
            loop {
                args.push(self.parse_expr(0)?);
                match self.peek() {
                    Some(Token::Comma) => {
                        self.advance();
                    }
                    _ => break,
                }
            }
        }
        self.expect(&Token::RParen, "to close the argument list")?;
        Ok(args)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ScriptError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Str(s)) => Ok(Expr::Str(s)),
            Some(Token::True) => Ok(Expr::Bool(true)),
            Some(Token::False) => Ok(Expr::Bool(false)),
            Some(Token::Null) => Ok(Expr::Null),
            Some(Token::Ident(name)) => Ok(Expr::Ident(name)),
            Some(Token::Minus) => {
                let operand = self.parse_expr(11)?;
                Ok(Expr::Unary(UnaryOp::Neg, Box::new(operand)))
            }
            Some(Token::Not) => {
                let operand = self.parse_expr(11)?;
                Ok(Expr::Unary(UnaryOp::Not, Box::new(operand)))
            }
            Some(Token::LParen) => {
                self.depth += 1;
                let inner = self.parse_expr(0)?;
                self.expect(&Token::RParen, "to close the group")?;
                self.depth -= 1;
                Ok(inner)
            }
            Some(Token::LBracket) => {
                self.depth += 1;
                let mut items = Vec::new();
                if !matches!(self.peek(), Some(Token::RBracket)) {
                    loop {
                        items.push(self.parse_expr(0)?);
                        match self.peek() {
                            Some(Token::Comma) => {
                                self.advance();
                            }
                            _ => break,
                        }
                    }
                }
                self.expect(&Token::RBracket, "to close the list")?;
                self.depth -= 1;
                Ok(Expr::List(items))
            }
            Some(Token::LBrace) => {
                self.depth += 1;
                let mut entries = Vec::new();
                if !matches!(self.peek(), Some(Token::RBrace)) {
                    loop {
                        let key = match self.advance() {
                            Some(Token::Str(s)) => s,
                            Some(Token::Ident(s)) => s,
                            other => {
                                return Err(ScriptError::Parse(format!(
                                    "expected string key in map literal, found {:?}",
                                    other
                                )));
                            }
                        };
                        self.expect(&Token::Colon, "after map key")?;
                        let value = self.parse_expr(0)?;
                        entries.push((key, value));
                        match self.peek() {
                            Some(Token::Comma) => {
                                self.advance();
                            }
                            _ => break,
                        }
                    }
                }
                self.expect(&Token::RBrace, "to close the map")?;
                self.depth -= 1;
                Ok(Expr::Map(entries))
            }
            other => Err(ScriptError::Parse(format!(
                "expected an expression, found {:?}",
                other
            ))),
        }
    }
}
