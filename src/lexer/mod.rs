mod token;

pub use token::*;

use std::{error::Error, fmt::Display, iter::Peekable, str::Chars};

use once_cell::sync::Lazy;

/// Fixed, longest-match-first table of multi-character operators and
/// punctuation. Entries are tried in order, so a prefix of a longer
/// operator (`+` vs `++`, `-` vs `->`, `<` vs `<=`) must come *after* the
/// longer form, never before it.
static OPERATORS: Lazy<Vec<(&'static str, TokenKind)>> = Lazy::new(|| {
    vec![
        ("->", TokenKind::Arrow),
        ("++", TokenKind::Increment),
        ("--", TokenKind::Decrement),
        ("<=", TokenKind::Le),
        (">=", TokenKind::Ge),
        ("==", TokenKind::EqEq),
        ("!=", TokenKind::Neq),
        ("(", TokenKind::LParen),
        (")", TokenKind::RParen),
        ("{", TokenKind::LBrace),
        ("}", TokenKind::RBrace),
        ("[", TokenKind::LBracket),
        ("]", TokenKind::RBracket),
        (",", TokenKind::Comma),
        (":", TokenKind::Colon),
        (";", TokenKind::Semicolon),
        (".", TokenKind::Dot),
        ("+", TokenKind::Plus),
        ("-", TokenKind::Minus),
        ("*", TokenKind::Star),
        ("/", TokenKind::Slash),
        ("%", TokenKind::Percent),
        ("=", TokenKind::Equal),
        ("<", TokenKind::Lt),
        (">", TokenKind::Gt),
    ]
});

/// Multi-line comment delimiters: `//` opens, `.//` closes. Kept distinct
/// from the single-line `#`-to-end-of-line comment so the two can never be
/// confused by a shared prefix.
const MULTILINE_OPEN: &str = "//";
const MULTILINE_CLOSE: &str = ".//";
const LINE_COMMENT: char = '#';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.message, self.position)
    }
}

impl Error for LexError {}

pub type LexResult<T> = Result<T, LexError>;

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    iterator: Peekable<Chars<'a>>,
    offset: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            iterator: source.chars().peekable(),
            offset: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.iterator.peek().copied()
    }

    fn peek_at(&self, extra_offset: usize) -> Option<char> {
        self.source[self.offset..].chars().nth(extra_offset)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    fn advance(&mut self) -> Option<char> {
        let next = self.iterator.next()?;
        self.offset += next.len_utf8();
        match next {
            '\n' => {
                self.line += 1;
                self.col = 1;
            }
            _ => self.col += 1,
        }
        Some(next)
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// Tokenize the entire input, consuming `self`.
    pub fn lex(mut self) -> LexResult<Vec<Token>> {
        let mut tokens = vec![];
        loop {
            self.skip_trivia()?;
            let position = self.position();
            let Some(next) = self.peek() else {
                tokens.push(Token::new(TokenKind::Eof, "", position));
                break;
            };

            let token = match next {
                c if c.is_ascii_digit() => self.lex_number()?,
                c if is_ident_start(c) => self.lex_identifier(),
                '"' => self.lex_string()?,
                '\'' => self.lex_char()?,
                _ => self.lex_operator()?,
            };
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Discards whitespace, single-line comments and multi-line comments.
    /// Runs in a loop since a comment can be immediately followed by more
    /// whitespace or another comment.
    fn skip_trivia(&mut self) -> LexResult<()> {
        loop {
            while let Some(c) = self.peek() {
                if c.is_whitespace() {
                    self.advance();
                } else {
                    break;
                }
            }

            if self.peek() == Some(LINE_COMMENT) {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
                continue;
            }

            if self.rest().starts_with(MULTILINE_OPEN) {
                let start = self.position();
                self.advance();
                self.advance();
                loop {
                    if self.rest().starts_with(MULTILINE_CLOSE) {
                        self.advance();
                        self.advance();
                        self.advance();
                        break;
                    }
                    if self.advance().is_none() {
                        return Err(LexError {
                            message: "unterminated multi-line comment".into(),
                            position: start,
                        });
                    }
                }
                continue;
            }

            break;
        }
        Ok(())
    }

    fn lex_identifier(&mut self) -> Token {
        let position = self.position();
        let mut lexeme = String::new();
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                lexeme.push(c);
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Id(lexeme.clone()), lexeme, position)
    }

    fn lex_number(&mut self) -> LexResult<Token> {
        let position = self.position();
        let mut lexeme = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                lexeme.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            lexeme.push('.');
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    lexeme.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        }
        Ok(Token::new(TokenKind::Number(lexeme.clone()), lexeme, position))
    }

    fn lex_string(&mut self) -> LexResult<Token> {
        let position = self.position();
        let mut raw = String::new();
        raw.push(self.advance().expect("caller checked for opening quote"));
        loop {
            match self.advance() {
                Some('"') => {
                    raw.push('"');
                    break;
                }
                Some('\\') => {
                    raw.push('\\');
                    match self.advance() {
                        Some(escaped) => raw.push(escaped),
                        None => {
                            return Err(LexError {
                                message: "unterminated string literal".into(),
                                position,
                            })
                        }
                    }
                }
                Some(c) => raw.push(c),
                None => {
                    return Err(LexError {
                        message: "unterminated string literal".into(),
                        position,
                    })
                }
            }
        }
        Ok(Token::new(TokenKind::String(raw.clone()), raw, position))
    }

    fn lex_char(&mut self) -> LexResult<Token> {
        let position = self.position();
        let mut raw = String::new();
        raw.push(self.advance().expect("caller checked for opening quote"));
        match self.advance() {
            Some('\\') => {
                raw.push('\\');
                match self.advance() {
                    Some(escaped) => raw.push(escaped),
                    None => {
                        return Err(LexError {
                            message: "unterminated char literal".into(),
                            position,
                        })
                    }
                }
            }
            Some(c) => raw.push(c),
            None => {
                return Err(LexError {
                    message: "unterminated char literal".into(),
                    position,
                })
            }
        }
        match self.advance() {
            Some('\'') => raw.push('\''),
            _ => {
                return Err(LexError {
                    message: "char literal must contain exactly one code unit".into(),
                    position,
                })
            }
        }
        Ok(Token::new(TokenKind::Char(raw.clone()), raw, position))
    }

    fn lex_operator(&mut self) -> LexResult<Token> {
        let position = self.position();
        let rest = self.rest();
        for (lexeme, kind) in OPERATORS.iter() {
            if rest.starts_with(lexeme) {
                for _ in 0..lexeme.chars().count() {
                    self.advance();
                }
                return Ok(Token::new(kind.clone(), *lexeme, position));
            }
        }
        let bad = self.peek().unwrap_or('\0');
        Err(LexError {
            message: format!("unexpected character '{bad}'"),
            position,
        })
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .lex()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_identifier() {
        assert_eq!(
            kinds("letter"),
            vec![TokenKind::Id("letter".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn lexes_integer_and_float() {
        assert_eq!(
            kinds("42 3.14"),
            vec![
                TokenKind::Number("42".into()),
                TokenKind::Number("3.14".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn longest_match_wins_for_operators() {
        assert_eq!(
            kinds("++ -- -> <= >= == !="),
            vec![
                TokenKind::Increment,
                TokenKind::Decrement,
                TokenKind::Arrow,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::EqEq,
                TokenKind::Neq,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn plus_is_not_swallowed_by_increment() {
        assert_eq!(kinds("+"), vec![TokenKind::Plus, TokenKind::Eof]);
    }

    #[test]
    fn skips_line_comment() {
        assert_eq!(
            kinds("1 # trailing comment\n2"),
            vec![
                TokenKind::Number("1".into()),
                TokenKind::Number("2".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn skips_multiline_comment() {
        assert_eq!(
            kinds("1 // this\nis ignored .// 2"),
            vec![
                TokenKind::Number("1".into()),
                TokenKind::Number("2".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lexes_string_with_escape() {
        assert_eq!(
            kinds(r#""a\"b""#),
            vec![TokenKind::String(r#""a\"b""#.into()), TokenKind::Eof]
        );
    }

    #[test]
    fn lexes_char_literal() {
        assert_eq!(
            kinds("'x'"),
            vec![TokenKind::Char("'x'".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn tracks_line_and_column() {
        let tokens = Lexer::new("a\nbb").lex().unwrap();
        assert_eq!(tokens[0].position, Position::new(1, 1));
        assert_eq!(tokens[1].position, Position::new(2, 1));
    }

    #[test]
    fn unknown_character_is_fatal() {
        let err = Lexer::new("@").lex().unwrap_err();
        assert_eq!(err.position, Position::new(1, 1));
    }
}
