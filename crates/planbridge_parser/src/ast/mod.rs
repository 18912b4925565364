pub mod datatype;
pub use datatype::*;
pub mod expr;
pub use expr::*;

use std::fmt;

use crate::errors::Result;
use crate::parser::Parser;
use crate::tokens::Token;

pub trait AstParseable: Sized {
    /// Parse an instance of Self from the provided parser.
    ///
    /// It's assumed that the parser is in the correct state for parsing Self,
    /// and if it isn't, an error should be returned.
    fn parse(parser: &mut Parser) -> Result<Self>;
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;

    /// Parse an AST node directly from a string.
    pub(crate) fn parse_ast<A: AstParseable>(s: &str) -> Result<A> {
        let mut parser = Parser::with_sql_string(s)?;
        A::parse(&mut parser)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ident {
    pub value: String,
    pub quoted: bool,
}

impl Ident {
    pub fn from_string(s: impl Into<String>) -> Self {
        Ident {
            value: s.into(),
            quoted: false,
        }
    }

    /// Normalized form of the identifier.
    ///
    /// Unquoted identifiers are case insensitive and get lowercased, quoted
    /// identifiers are kept verbatim.
    pub fn as_normalized_string(&self) -> String {
        if self.quoted {
            self.value.clone()
        } else {
            self.value.to_lowercase()
        }
    }
}

impl AstParseable for Ident {
    fn parse(parser: &mut Parser) -> Result<Self> {
        let ident = match parser.peek() {
            Some(tok) => match &tok.token {
                Token::Word(w) => Ident {
                    value: w.value.clone(),
                    quoted: w.quote.is_some(),
                },
                _ => return Err(parser.unexpected("an identifier")),
            },
            None => return Err(parser.unexpected("an identifier")),
        };
        parser.next();
        Ok(ident)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "\"{}\"", self.value.replace('"', "\"\""))
        } else {
            write!(f, "{}", self.value)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectReference(pub Vec<Ident>);

impl ObjectReference {
    /// Create an object from an iterator of strings.
    ///
    /// Useful in tests, probably unlikely that it should be used anywhere else.
    pub fn from_strings<S>(strings: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        ObjectReference(strings.into_iter().map(Ident::from_string).collect())
    }

    /// The last component of the reference.
    pub fn base(&self) -> Option<&Ident> {
        self.0.last()
    }
}

impl AstParseable for ObjectReference {
    fn parse(parser: &mut Parser) -> Result<Self> {
        let mut idents = vec![Ident::parse(parser)?];

        // Compound identifiers, `a.b.c`.
        while parser.consume_token(&Token::Period) {
            idents.push(Ident::parse(parser)?);
        }

        Ok(ObjectReference(idents))
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strings: Vec<_> = self.0.iter().map(|ident| ident.to_string()).collect();
        write!(f, "{}", strings.join("."))
    }
}
