use std::fmt;

use crate::errors::{Location, ParseError, Result};
use crate::keywords::{Keyword, keyword_from_str};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub value: String,
    /// Quote character if this word was quoted.
    pub quote: Option<char>,
    /// The keyword this word represents.
    ///
    /// Always None for quoted words.
    pub keyword: Option<Keyword>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(Word),
    SingleQuotedString(String),
    Number(String),
    /// '('
    LeftParen,
    /// ')'
    RightParen,
    /// ','
    Comma,
    /// '.'
    Period,
    /// '+'
    Plus,
    /// '-'
    Minus,
    /// '*'
    Mul,
    /// ';'
    SemiColon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(w) => match w.quote {
                Some(q) => write!(f, "{q}{}{q}", w.value),
                None => write!(f, "{}", w.value),
            },
            Self::SingleQuotedString(s) => write!(f, "'{s}'"),
            Self::Number(n) => write!(f, "{n}"),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::Comma => write!(f, ","),
            Self::Period => write!(f, "."),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::SemiColon => write!(f, ";"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenWithLocation {
    pub token: Token,
    pub location: Location,
}

impl TokenWithLocation {
    /// Return the keyword for this token if it's an unquoted keyword.
    pub fn keyword(&self) -> Option<Keyword> {
        match &self.token {
            Token::Word(w) => w.keyword,
            _ => None,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.keyword() == Some(keyword)
    }
}

/// Converts a SQL string into tokens.
///
/// Whitespace and comments are dropped, every remaining token records where it
/// started.
#[derive(Debug)]
pub struct Tokenizer<'a> {
    sql: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: u32,
    col: u32,
}

impl<'a> Tokenizer<'a> {
    pub fn new(sql: &'a str) -> Self {
        Tokenizer {
            sql,
            chars: sql.chars().peekable(),
            line: 1,
            col: 1,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<TokenWithLocation>> {
        let mut toks = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;
            let location = self.location();
            let token = match self.next_token()? {
                Some(token) => token,
                None => break,
            };
            toks.push(TokenWithLocation { token, location });
        }

        tracing::trace!(sql = %self.sql, num_tokens = toks.len(), "tokenized");

        Ok(toks)
    }

    fn location(&self) -> Location {
        Location::new(self.line, self.col)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('-') => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    if lookahead.peek() != Some(&'-') {
                        return Ok(());
                    }
                    // Line comment.
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('/') => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    if lookahead.peek() != Some(&'*') {
                        return Ok(());
                    }
                    let start = self.location();
                    self.bump();
                    self.bump();
                    let mut prev = None;
                    loop {
                        match self.bump() {
                            Some('/') if prev == Some('*') => break,
                            Some(c) => prev = Some(c),
                            None => {
                                return Err(ParseError::new("Unterminated block comment", start));
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        let start = self.location();
        let c = match self.chars.peek() {
            Some(c) => *c,
            None => return Ok(None),
        };

        let tok = match c {
            '(' => self.single(Token::LeftParen),
            ')' => self.single(Token::RightParen),
            ',' => self.single(Token::Comma),
            '.' => self.single(Token::Period),
            '+' => self.single(Token::Plus),
            '-' => self.single(Token::Minus),
            '*' => self.single(Token::Mul),
            ';' => self.single(Token::SemiColon),
            '\'' => {
                self.bump();
                Token::SingleQuotedString(self.quoted('\'', start)?)
            }
            '"' => {
                self.bump();
                let value = self.quoted('"', start)?;
                Token::Word(Word {
                    value,
                    quote: Some('"'),
                    keyword: None,
                })
            }
            c if c.is_ascii_digit() => {
                let mut s = String::new();
                let mut seen_period = false;
                while let Some(&c) = self.chars.peek() {
                    if c.is_ascii_digit() {
                        s.push(c);
                    } else if c == '.' && !seen_period {
                        seen_period = true;
                        s.push(c);
                    } else {
                        break;
                    }
                    self.bump();
                }
                Token::Number(s)
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut s = String::new();
                while let Some(&c) = self.chars.peek() {
                    if c.is_alphanumeric() || c == '_' || c == '$' {
                        s.push(c);
                        self.bump();
                    } else {
                        break;
                    }
                }
                let keyword = keyword_from_str(&s);
                Token::Word(Word {
                    value: s,
                    quote: None,
                    keyword,
                })
            }
            other => {
                return Err(ParseError::new(
                    format!("Unexpected character '{other}'"),
                    start,
                ));
            }
        };

        Ok(Some(tok))
    }

    fn single(&mut self, tok: Token) -> Token {
        self.bump();
        tok
    }

    /// Read until the closing quote, handling doubled quotes as an escaped
    /// quote.
    fn quoted(&mut self, quote: char, start: Location) -> Result<String> {
        let mut s = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => {
                    if self.chars.peek() == Some(&quote) {
                        self.bump();
                        s.push(quote);
                    } else {
                        return Ok(s);
                    }
                }
                Some(c) => s.push(c),
                None => {
                    return Err(ParseError::new(
                        format!("Unterminated quoted string, expected closing {quote}"),
                        start,
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(sql: &str) -> Vec<Token> {
        Tokenizer::new(sql)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn escaped_quotes() {
        assert_eq!(
            vec![Token::SingleQuotedString("it's".to_string())],
            tokens("'it''s'")
        );
    }

    #[test]
    fn comments_dropped() {
        let toks = tokens("a -- trailing\n/* block */ b");
        assert_eq!(2, toks.len());
    }

    #[test]
    fn minus_is_not_comment() {
        assert_eq!(
            vec![Token::Minus, Token::Number("1".to_string())],
            tokens("-1")
        );
    }

    #[test]
    fn locations_track_lines() {
        let toks = Tokenizer::new("a\n  b").tokenize().unwrap();
        assert_eq!(Location::new(1, 1), toks[0].location);
        assert_eq!(Location::new(2, 3), toks[1].location);
    }

    #[test]
    fn unterminated_string() {
        let err = Tokenizer::new("x, 'abc").tokenize().unwrap_err();
        assert_eq!(Location::new(1, 4), err.location);
    }

    #[test]
    fn quoted_word_is_never_keyword() {
        let toks = tokens("\"null\" null");
        match (&toks[0], &toks[1]) {
            (Token::Word(quoted), Token::Word(bare)) => {
                assert_eq!(None, quoted.keyword);
                assert_eq!(Some(Keyword::NULL), bare.keyword);
            }
            other => panic!("unexpected tokens: {other:?}"),
        }
    }
}
