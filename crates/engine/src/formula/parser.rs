// Expression parser - converts built expression strings into an AST
// Supports: decimal numbers, + - * / ^, parentheses, unary +/-, and
// function calls (SUM(1, 2)). Bare identifiers parse as variables.
//
// Precedence (low to high): + -  |  * /  |  unary + -  |  ^
// ^ is right-associative, so 2^3^2 == 2^(3^2) and -2^2 == -(2^2).

use crate::error::EngineError;

/// Deepest nesting of parentheses, signs and exponents accepted
pub const MAX_DEPTH: usize = 256;

/// Longest expression accepted, in tokens
pub const MAX_TOKENS: usize = 4096;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    /// Identifier left unresolved by the expression builder
    Variable(String),
    Function {
        name: String,
        args: Vec<Expr>,
    },
    Neg(Box<Expr>),
    BinaryOp {
        op: Op,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Parse an arithmetic expression into an AST.
pub fn parse(input: &str) -> Result<Expr, EngineError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(syntax("Empty expression"));
    }
    if tokens.len() > MAX_TOKENS {
        return Err(syntax(format!("Expression longer than {} tokens", MAX_TOKENS)));
    }

    let (expr, pos) = parse_add_sub(&tokens, 0, 0)?;
    if pos < tokens.len() {
        return Err(syntax(format!("Unexpected {} at token {}", tokens[pos].describe(), pos)));
    }
    Ok(expr)
}

fn syntax(msg: impl Into<String>) -> EngineError {
    EngineError::Syntax(msg.into())
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::Ident(name) => format!("identifier '{}'", name),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::Caret => "'^'".into(),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
            Token::Comma => "','".into(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, EngineError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => { chars.next(); }
            '+' => { tokens.push(Token::Plus); chars.next(); }
            '-' => { tokens.push(Token::Minus); chars.next(); }
            '*' => { tokens.push(Token::Star); chars.next(); }
            '/' => { tokens.push(Token::Slash); chars.next(); }
            '^' => { tokens.push(Token::Caret); chars.next(); }
            '(' => { tokens.push(Token::LParen); chars.next(); }
            ')' => { tokens.push(Token::RParen); chars.next(); }
            ',' => { tokens.push(Token::Comma); chars.next(); }
            '0'..='9' | '.' => {
                let mut num_str = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        num_str.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                // Exponent suffix, e.g. 1e6 or 2.5E-3 (what f64 Display emits)
                if matches!(chars.peek(), Some('e') | Some('E')) {
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    if matches!(lookahead.peek(), Some('+') | Some('-')) {
                        lookahead.next();
                    }
                    if lookahead.peek().is_some_and(|d| d.is_ascii_digit()) {
                        num_str.push('e');
                        chars.next();
                        if let Some(&sign) = chars.peek().filter(|s| **s == '+' || **s == '-') {
                            num_str.push(sign);
                            chars.next();
                        }
                        while let Some(&d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                            num_str.push(d);
                            chars.next();
                        }
                    }
                }
                let num: f64 = num_str
                    .parse()
                    .map_err(|_| syntax(format!("Invalid number: {}", num_str)))?;
                tokens.push(Token::Number(num));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_alphanumeric() || ch == '_' {
                        ident.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            _ => return Err(syntax(format!("Unexpected character: {}", c))),
        }
    }

    Ok(tokens)
}

fn parse_add_sub(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), EngineError> {
    let (mut left, mut pos) = parse_mul_div(tokens, pos, depth)?;

    while pos < tokens.len() {
        let op = match &tokens[pos] {
            Token::Plus => Op::Add,
            Token::Minus => Op::Sub,
            _ => break,
        };
        let (right, new_pos) = parse_mul_div(tokens, pos + 1, depth)?;
        left = Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
        pos = new_pos;
    }

    Ok((left, pos))
}

fn parse_mul_div(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), EngineError> {
    let (mut left, mut pos) = parse_unary(tokens, pos, depth)?;

    while pos < tokens.len() {
        let op = match &tokens[pos] {
            Token::Star => Op::Mul,
            Token::Slash => Op::Div,
            _ => break,
        };
        let (right, new_pos) = parse_unary(tokens, pos + 1, depth)?;
        left = Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
        pos = new_pos;
    }

    Ok((left, pos))
}

// Unary sign binds looser than ^ (-2^2 == -4) but tighter than * /
// Every recursive descent passes through here, so this is where depth is capped
fn parse_unary(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), EngineError> {
    if depth > MAX_DEPTH {
        return Err(syntax("Expression nested too deeply"));
    }
    match tokens.get(pos) {
        Some(Token::Plus) => parse_unary(tokens, pos + 1, depth + 1),
        Some(Token::Minus) => {
            let (expr, pos) = parse_unary(tokens, pos + 1, depth + 1)?;
            Ok((Expr::Neg(Box::new(expr)), pos))
        }
        _ => parse_power(tokens, pos, depth),
    }
}

// Exponentiation (^) - right-associative; the exponent may carry a sign (2^-1)
fn parse_power(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), EngineError> {
    let (base, pos) = parse_primary(tokens, pos, depth)?;

    if let Some(Token::Caret) = tokens.get(pos) {
        let (exponent, new_pos) = parse_unary(tokens, pos + 1, depth + 1)?;
        return Ok((
            Expr::BinaryOp {
                op: Op::Pow,
                left: Box::new(base),
                right: Box::new(exponent),
            },
            new_pos,
        ));
    }

    Ok((base, pos))
}

fn parse_primary(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), EngineError> {
    let Some(token) = tokens.get(pos) else {
        return Err(syntax("Unexpected end of expression"));
    };

    match token {
        Token::Number(n) => Ok((Expr::Number(*n), pos + 1)),
        Token::Ident(name) => {
            if let Some(Token::LParen) = tokens.get(pos + 1) {
                let (args, new_pos) = parse_function_args(tokens, pos + 2, depth + 1)?;
                return Ok((
                    Expr::Function {
                        name: name.to_uppercase(),
                        args,
                    },
                    new_pos,
                ));
            }
            Ok((Expr::Variable(name.clone()), pos + 1))
        }
        Token::LParen => {
            let (expr, pos) = parse_add_sub(tokens, pos + 1, depth + 1)?;
            match tokens.get(pos) {
                Some(Token::RParen) => Ok((expr, pos + 1)),
                Some(other) => Err(syntax(format!("Expected ')' but found {}", other.describe()))),
                None => Err(syntax("Missing closing parenthesis")),
            }
        }
        other => Err(syntax(format!("Unexpected {} at token {}", other.describe(), pos))),
    }
}

fn parse_function_args(tokens: &[Token], pos: usize, depth: usize) -> Result<(Vec<Expr>, usize), EngineError> {
    let mut args = Vec::new();
    let mut pos = pos;

    // SUM()
    if let Some(Token::RParen) = tokens.get(pos) {
        return Ok((args, pos + 1));
    }

    loop {
        let (arg, new_pos) = parse_add_sub(tokens, pos, depth)?;
        args.push(arg);
        pos = new_pos;

        match tokens.get(pos) {
            Some(Token::RParen) => return Ok((args, pos + 1)),
            Some(Token::Comma) => pos += 1,
            Some(other) => {
                return Err(syntax(format!("Expected ',' or ')' but found {}", other.describe())))
            }
            None => return Err(syntax("Missing closing parenthesis in function call")),
        }
    }
}
