use crate::ast::{AstParseable, Expr};
use crate::errors::{Location, ParseError, Result};
use crate::keywords::Keyword;
use crate::tokens::{Token, TokenWithLocation, Tokenizer};

#[derive(Debug)]
pub struct Parser {
    toks: Vec<TokenWithLocation>,
    /// Index of token we should process next.
    idx: usize,
    /// Location used for errors at end of input.
    end: Location,
}

impl Parser {
    pub fn with_tokens(toks: Vec<TokenWithLocation>) -> Self {
        let end = toks
            .last()
            .map(|t| Location::new(t.location.line, t.location.col + 1))
            .unwrap_or_default();
        Parser { toks, idx: 0, end }
    }

    pub fn with_sql_string(sql: &str) -> Result<Self> {
        let toks = Tokenizer::new(sql).tokenize()?;
        let mut parser = Self::with_tokens(toks);

        // Point end of input errors just past the final character.
        let line = sql.matches('\n').count() as u32 + 1;
        let last_line = sql.rsplit('\n').next().unwrap_or_default();
        parser.end = Location::new(line, last_line.chars().count() as u32 + 1);

        Ok(parser)
    }

    /// Parse an expression, erroring if there's trailing input.
    ///
    /// A single trailing semicolon is allowed.
    pub fn parse_complete_expr(&mut self) -> Result<Expr> {
        self.parse_complete()
    }

    /// Parse a node of any type, erroring if there's trailing input.
    pub fn parse_complete<T: AstParseable>(&mut self) -> Result<T> {
        let node = T::parse(self)?;
        self.consume_token(&Token::SemiColon);
        if let Some(tok) = self.peek() {
            return Err(ParseError::new(
                format!("Unexpected trailing token '{}'", tok.token),
                tok.location,
            ));
        }
        Ok(node)
    }

    /// Location of the next token to be processed.
    pub fn location(&self) -> Location {
        match self.toks.get(self.idx) {
            Some(tok) => tok.location,
            None => self.end,
        }
    }

    /// Create an error located at the next token.
    pub fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.location())
    }

    /// Get the next token.
    pub fn next(&mut self) -> Option<&TokenWithLocation> {
        let tok = self.toks.get(self.idx);
        if tok.is_some() {
            self.idx += 1;
        }
        tok
    }

    /// Get the next token without altering the current index.
    pub fn peek(&self) -> Option<&TokenWithLocation> {
        self.peek_nth(0)
    }

    /// Get the nth next token without altering the current index.
    pub fn peek_nth(&self, n: usize) -> Option<&TokenWithLocation> {
        self.toks.get(self.idx + n)
    }

    /// Consume the current token if it matches expected, otherwise return
    /// false.
    pub fn consume_token(&mut self, expected: &Token) -> bool {
        match self.peek() {
            Some(tok) if &tok.token == expected => {
                self.idx += 1;
                true
            }
            _ => false,
        }
    }

    pub fn expect_token(&mut self, expected: &Token) -> Result<()> {
        if self.consume_token(expected) {
            return Ok(());
        }
        Err(self.unexpected(&format!("'{expected}'")))
    }

    /// Parse a single keyword.
    pub fn parse_keyword(&mut self, keyword: Keyword) -> bool {
        let idx = self.idx;
        if let Some(tok) = self.next() {
            if tok.is_keyword(keyword) {
                return true;
            }
        }

        // Keyword doesn't match. Reset index and return.
        self.idx = idx;
        false
    }

    /// Parse an exact sequence of keywords.
    ///
    /// If the sequence doesn't match, idx is not changed, and false is
    /// returned.
    pub fn parse_keyword_sequence(&mut self, keywords: &[Keyword]) -> bool {
        let idx = self.idx;
        for keyword in keywords {
            if let Some(tok) = self.next() {
                if tok.is_keyword(*keyword) {
                    continue;
                }
            }

            // Keyword doesn't match. Reset index and return.
            self.idx = idx;
            return false;
        }
        true
    }

    /// Parse any of the provided keywords, returning which keyword was parsed.
    pub fn parse_one_of_keywords(&mut self, keywords: &[Keyword]) -> Option<Keyword> {
        let idx = self.idx;
        let kw = self.next().and_then(|tok| tok.keyword());
        match kw {
            Some(kw) if keywords.contains(&kw) => Some(kw),
            _ => {
                self.idx = idx;
                None
            }
        }
    }

    pub fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        if self.parse_keyword(keyword) {
            return Ok(());
        }
        Err(self.unexpected(keyword.as_str()))
    }

    pub fn expect_one_of_keywords(&mut self, keywords: &[Keyword]) -> Result<Keyword> {
        if let Some(kw) = self.parse_one_of_keywords(keywords) {
            return Ok(kw);
        }
        let expected: Vec<_> = keywords.iter().map(|k| k.as_str()).collect();
        Err(self.unexpected(&format!("one of {}", expected.join(", "))))
    }

    /// Error for when the next token isn't what we expected.
    pub fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(tok) => ParseError::new(
                format!("Expected {expected}, found '{}'", tok.token),
                tok.location,
            ),
            None => ParseError::new(
                format!("Expected {expected}, found end of expression"),
                self.end,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_sequence_resets_on_mismatch() {
        let mut parser = Parser::with_sql_string("WITH CONDITIONAL WRAPPER").unwrap();
        assert!(!parser.parse_keyword_sequence(&[Keyword::WITH, Keyword::ARRAY]));
        assert!(parser.parse_keyword_sequence(&[Keyword::WITH, Keyword::CONDITIONAL]));
        assert!(parser.parse_keyword(Keyword::WRAPPER));
        assert!(parser.peek().is_none());
    }

    #[test]
    fn one_of_keywords() {
        let mut parser = Parser::with_sql_string("error").unwrap();
        assert_eq!(None, parser.parse_one_of_keywords(&[Keyword::NULL]));
        assert_eq!(
            Some(Keyword::ERROR),
            parser.parse_one_of_keywords(&[Keyword::NULL, Keyword::ERROR])
        );
    }

    #[test]
    fn unexpected_at_end_reports_end_location() {
        let mut parser = Parser::with_sql_string("abc\n  de").unwrap();
        parser.next();
        parser.next();
        let err = parser.unexpected("'('");
        assert_eq!(Location::new(2, 5), err.location);
    }

    #[test]
    fn trailing_tokens_error() {
        let mut parser = Parser::with_sql_string("a b").unwrap();
        let err = parser.parse_complete_expr().unwrap_err();
        assert_eq!(Location::new(1, 3), err.location);
    }
}
