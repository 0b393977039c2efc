//! Lexer (tokenizer) for the Pascal-like source language
//!
//! The lexer is pull-based: the parser calls [`Lexer::read`] whenever it needs
//! the next [`Token`]. Exactly one character of lookahead is kept, taken from
//! the underlying `char` iterator, so the lexer never buffers the source or
//! pushes characters back.
//!
//! # Literals
//!
//! - Decimal numbers: `123`
//! - Octal numbers: `&17` (at least one octal digit required)
//! - Hexadecimal numbers: `$1F` (at least one hex digit required, any case)
//! - Strings: `'text'`, no escape sequences

use std::fmt;
use std::str::Chars;
use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// End of input
    Eoi,

    // Literals and identifiers
    Ident(String),
    Number(i32),
    Str(String),

    // Arithmetic
    Plus,
    Minus,
    Mult,
    /// Either the `div` keyword or the `/` symbol
    Div,
    Mod,

    // Relational
    Eq,
    Neq,
    Lt,
    Leq,
    Gt,
    Geq,

    // Logical
    Or,
    And,
    /// Never produced by [`Lexer::read`]; reserved for synthesized conditions
    Not,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    DotDot,
    Comma,
    Colon,
    Semicolon,
    Assign,

    // Declaration keywords
    Var,
    Const,
    Program,
    Function,
    Procedure,
    Forward,

    // Type keywords
    Integer,
    Array,
    Of,

    // Statement keywords
    Begin,
    End,
    If,
    Then,
    Else,
    While,
    Do,
    For,
    To,
    Downto,
    Exit,

    // Built-in procedures
    Inc,
    Dec,
    Readln,
    Write,
    Writeln,
}

/// Keyword table, sorted alphabetically for [`lookup_keyword`].
pub static KEYWORDS: &[(&str, TokenKind)] = &[
    ("and", TokenKind::And),
    ("array", TokenKind::Array),
    ("begin", TokenKind::Begin),
    ("const", TokenKind::Const),
    ("dec", TokenKind::Dec),
    ("div", TokenKind::Div),
    ("do", TokenKind::Do),
    ("downto", TokenKind::Downto),
    ("else", TokenKind::Else),
    ("end", TokenKind::End),
    ("exit", TokenKind::Exit),
    ("for", TokenKind::For),
    ("forward", TokenKind::Forward),
    ("function", TokenKind::Function),
    ("if", TokenKind::If),
    ("inc", TokenKind::Inc),
    ("integer", TokenKind::Integer),
    ("mod", TokenKind::Mod),
    ("of", TokenKind::Of),
    ("or", TokenKind::Or),
    ("procedure", TokenKind::Procedure),
    ("program", TokenKind::Program),
    ("readln", TokenKind::Readln),
    ("then", TokenKind::Then),
    ("to", TokenKind::To),
    ("var", TokenKind::Var),
    ("while", TokenKind::While),
    ("write", TokenKind::Write),
    ("writeln", TokenKind::Writeln),
];

/// Resolves a keyword by binary search over [`KEYWORDS`].
pub fn lookup_keyword(word: &str) -> Option<TokenKind> {
    KEYWORDS
        .binary_search_by(|(kw, _)| (*kw).cmp(word))
        .ok()
        .map(|idx| KEYWORDS[idx].1.clone())
}

impl TokenKind {
    /// Human-readable name of the kind, ignoring any payload.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Eoi => "end of input",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Number(_) => "number",
            TokenKind::Str(_) => "string",
            TokenKind::Plus => "symbol plus",
            TokenKind::Minus => "symbol minus",
            TokenKind::Mult => "symbol multiply",
            TokenKind::Div => "keyword div",
            TokenKind::Mod => "keyword mod",
            TokenKind::Eq => "symbol equal",
            TokenKind::Neq => "symbol not-equal",
            TokenKind::Lt => "symbol less-than",
            TokenKind::Leq => "symbol less-or-equal",
            TokenKind::Gt => "symbol greater-than",
            TokenKind::Geq => "symbol greater-or-equal",
            TokenKind::Or => "keyword or",
            TokenKind::And => "keyword and",
            TokenKind::Not => "symbol not",
            TokenKind::LParen => "symbol left-paren",
            TokenKind::RParen => "symbol right-paren",
            TokenKind::LBracket => "symbol left-bracket",
            TokenKind::RBracket => "symbol right-bracket",
            TokenKind::Dot => "symbol dot",
            TokenKind::DotDot => "symbol double-dot",
            TokenKind::Comma => "symbol comma",
            TokenKind::Colon => "symbol colon",
            TokenKind::Semicolon => "symbol semicolon",
            TokenKind::Assign => "symbol assign",
            TokenKind::Var => "keyword var",
            TokenKind::Const => "keyword const",
            TokenKind::Program => "keyword program",
            TokenKind::Function => "keyword function",
            TokenKind::Procedure => "keyword procedure",
            TokenKind::Forward => "keyword forward",
            TokenKind::Integer => "keyword integer",
            TokenKind::Array => "keyword array",
            TokenKind::Of => "keyword of",
            TokenKind::Begin => "keyword begin",
            TokenKind::End => "keyword end",
            TokenKind::If => "keyword if",
            TokenKind::Then => "keyword then",
            TokenKind::Else => "keyword else",
            TokenKind::While => "keyword while",
            TokenKind::Do => "keyword do",
            TokenKind::For => "keyword for",
            TokenKind::To => "keyword to",
            TokenKind::Downto => "keyword downto",
            TokenKind::Exit => "keyword exit",
            TokenKind::Inc => "keyword inc",
            TokenKind::Dec => "keyword dec",
            TokenKind::Readln => "keyword readln",
            TokenKind::Write => "keyword write",
            TokenKind::Writeln => "keyword writeln",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "identifier '{}'", name),
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::Str(s) => write!(f, "string '{}'", s),
            other => f.write_str(other.name()),
        }
    }
}

/// A token together with the location of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at line {}, column {}: {message}", location.line, location.column)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

/// Pull-based lexer over any `char` iterator.
pub struct Lexer<I: Iterator<Item = char>> {
    chars: I,
    next: Option<char>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<Chars<'a>> {
    /// Create a new lexer for the given source string.
    pub fn new(input: &'a str) -> Self {
        Self::from_chars(input.chars())
    }
}

impl<I: Iterator<Item = char>> Lexer<I> {
    pub fn from_chars(mut chars: I) -> Self {
        let next = chars.next();
        Self {
            chars,
            next,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the remaining input, including the final end-of-input token.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.read()?;
            let done = token.kind == TokenKind::Eoi;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Read the next token from the input.
    pub fn read(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let loc = self.current_location();
        let Some(ch) = self.advance() else {
            return Ok(Token::new(TokenKind::Eoi, loc));
        };

        let kind = match ch {
            'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(ch),
            '0'..='9' => self.decimal_literal(ch, loc)?,
            '&' => self.radix_literal(8, "octal", loc)?,
            '$' => self.radix_literal(16, "hexadecimal", loc)?,
            '\'' => self.string_literal(loc)?,

            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Mult,
            '/' => TokenKind::Div,
            '=' => TokenKind::Eq,
            '<' => match self.peek() {
                Some('>') => {
                    self.advance();
                    TokenKind::Neq
                }
                Some('=') => {
                    self.advance();
                    TokenKind::Leq
                }
                _ => TokenKind::Lt,
            },
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Geq
                } else {
                    TokenKind::Gt
                }
            }
            '.' => {
                if self.peek() == Some('.') {
                    self.advance();
                    TokenKind::DotDot
                } else {
                    TokenKind::Dot
                }
            }
            ':' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Assign
                } else {
                    TokenKind::Colon
                }
            }
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,

            _ => {
                return Err(LexError {
                    message: format!("Unknown character '{}' encountered", ch),
                    location: loc,
                });
            }
        };

        Ok(Token::new(kind, loc))
    }

    fn identifier_or_keyword(&mut self, first_char: char) -> TokenKind {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        lookup_keyword(&ident).unwrap_or(TokenKind::Ident(ident))
    }

    fn decimal_literal(
        &mut self,
        first_digit: char,
        loc: SourceLocation,
    ) -> Result<TokenKind, LexError> {
        let mut value = 0;
        self.accumulate_digit(&mut value, first_digit, 10, loc)?;

        while let Some(ch) = self.peek().filter(|c| c.is_ascii_digit()) {
            self.advance();
            self.accumulate_digit(&mut value, ch, 10, loc)?;
        }

        Ok(TokenKind::Number(value))
    }

    /// Octal (`&`) and hexadecimal (`$`) literals; the prefix is already consumed.
    fn radix_literal(
        &mut self,
        radix: u32,
        what: &str,
        loc: SourceLocation,
    ) -> Result<TokenKind, LexError> {
        let mut value = 0;
        let mut digits = 0;

        while let Some(ch) = self.peek().filter(|c| c.is_digit(radix)) {
            self.advance();
            self.accumulate_digit(&mut value, ch, radix, loc)?;
            digits += 1;
        }

        if digits == 0 {
            let found = match self.peek() {
                Some(ch) => format!("'{}'", ch),
                None => "end of input".to_string(),
            };
            return Err(LexError {
                message: format!("Invalid {} digit: {}", what, found),
                location: self.current_location(),
            });
        }

        Ok(TokenKind::Number(value))
    }

    fn accumulate_digit(
        &self,
        value: &mut i32,
        ch: char,
        radix: u32,
        loc: SourceLocation,
    ) -> Result<(), LexError> {
        let digit = ch.to_digit(radix).unwrap_or_default() as i32;
        *value = value
            .checked_mul(radix as i32)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| LexError {
                message: "Integer literal too large".to_string(),
                location: loc,
            })?;
        Ok(())
    }

    /// The opening quote is already consumed.
    fn string_literal(
        &mut self,
        loc: SourceLocation,
    ) -> Result<TokenKind, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.advance() {
            if ch == '\'' {
                return Ok(TokenKind::Str(string));
            }
            string.push(ch);
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            location: loc,
        })
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.next
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.next?;
        self.next = self.chars.next();

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keyword_table_is_sorted() {
        for pair in KEYWORDS.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} >= {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn test_simple_program_tokens() {
        let tokens = kinds("program p; begin x := 1 end.");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Program,
                TokenKind::Ident("p".to_string()),
                TokenKind::Semicolon,
                TokenKind::Begin,
                TokenKind::Ident("x".to_string()),
                TokenKind::Assign,
                TokenKind::Number(1),
                TokenKind::End,
                TokenKind::Dot,
                TokenKind::Eoi,
            ]
        );
    }

    #[test]
    fn test_two_character_operators() {
        let tokens = kinds("<> <= >= .. := < > . :");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Neq,
                TokenKind::Leq,
                TokenKind::Geq,
                TokenKind::DotDot,
                TokenKind::Assign,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Dot,
                TokenKind::Colon,
                TokenKind::Eoi,
            ]
        );
    }

    #[test]
    fn test_slash_and_div_keyword_agree() {
        assert_eq!(kinds("a / b")[1], TokenKind::Div);
        assert_eq!(kinds("a div b")[1], TokenKind::Div);
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(kinds("123")[0], TokenKind::Number(123));
        assert_eq!(kinds("&17")[0], TokenKind::Number(15));
        assert_eq!(kinds("$1F")[0], TokenKind::Number(31));
        assert_eq!(kinds("$ff")[0], TokenKind::Number(255));
    }

    #[test]
    fn test_range_after_number() {
        let tokens = kinds("1..10");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Number(1),
                TokenKind::DotDot,
                TokenKind::Number(10),
                TokenKind::Eoi,
            ]
        );
    }

    #[test]
    fn test_invalid_radix_literals() {
        assert!(Lexer::new("&8").tokenize().is_err());
        assert!(Lexer::new("$").tokenize().is_err());
        assert!(Lexer::new("$g").tokenize().is_err());
    }

    #[test]
    fn test_integer_literal_overflow() {
        assert_eq!(kinds("2147483647")[0], TokenKind::Number(i32::MAX));
        let err = Lexer::new("2147483648").tokenize().unwrap_err();
        assert!(err.message.contains("too large"));
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(
            kinds("'hello world'")[0],
            TokenKind::Str("hello world".to_string())
        );
        assert_eq!(kinds("''")[0], TokenKind::Str(String::new()));
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("'abc").tokenize().unwrap_err();
        assert!(err.message.contains("Unterminated"));
        assert_eq!(err.location, SourceLocation::new(1, 1));
    }

    #[test]
    fn test_unknown_character() {
        let err = Lexer::new("x := #").tokenize().unwrap_err();
        assert!(err.message.contains("'#'"));
        assert_eq!(err.location, SourceLocation::new(1, 6));
    }

    #[test]
    fn test_locations_track_lines() {
        let tokens = Lexer::new("begin\n  end").tokenize().unwrap();
        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(2, 3));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(kinds("Begin")[0], TokenKind::Ident("Begin".to_string()));
    }
}
