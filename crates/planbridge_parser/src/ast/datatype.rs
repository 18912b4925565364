use std::fmt;

use super::AstParseable;
use crate::errors::Result;
use crate::keywords::Keyword;
use crate::parser::Parser;
use crate::tokens::Token;

/// A SQL data type as written in source text, e.g. in a RETURNING clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// VARCHAR, VARCHAR(n)
    Varchar(Option<u64>),
    /// CHAR, CHAR(n)
    Char(Option<u64>),
    /// TEXT
    Text,
    /// BOOLEAN
    Boolean,
    /// SMALLINT
    SmallInt,
    /// INT, INTEGER
    Integer,
    /// BIGINT
    BigInt,
    /// REAL, FLOAT
    Real,
    /// DOUBLE, DOUBLE PRECISION
    Double,
    /// DECIMAL, DECIMAL(p), DECIMAL(p, s)
    Decimal(Option<u8>, Option<i8>),
}

impl AstParseable for DataType {
    fn parse(parser: &mut Parser) -> Result<Self> {
        let kw = parser.expect_one_of_keywords(&[
            Keyword::VARCHAR,
            Keyword::CHAR,
            Keyword::TEXT,
            Keyword::BOOLEAN,
            Keyword::SMALLINT,
            Keyword::INT,
            Keyword::INTEGER,
            Keyword::BIGINT,
            Keyword::REAL,
            Keyword::FLOAT,
            Keyword::DOUBLE,
            Keyword::DECIMAL,
        ])?;

        Ok(match kw {
            Keyword::VARCHAR => DataType::Varchar(parse_optional_length(parser)?),
            Keyword::CHAR => DataType::Char(parse_optional_length(parser)?),
            Keyword::TEXT => DataType::Text,
            Keyword::BOOLEAN => DataType::Boolean,
            Keyword::SMALLINT => DataType::SmallInt,
            Keyword::INT | Keyword::INTEGER => DataType::Integer,
            Keyword::BIGINT => DataType::BigInt,
            Keyword::REAL | Keyword::FLOAT => DataType::Real,
            Keyword::DOUBLE => {
                let _ = parser.parse_keyword(Keyword::PRECISION);
                DataType::Double
            }
            Keyword::DECIMAL => {
                if parser.consume_token(&Token::LeftParen) {
                    let prec: u8 = parse_number(parser)?;
                    let scale = if parser.consume_token(&Token::Comma) {
                        Some(parse_number::<i8>(parser)?)
                    } else {
                        None
                    };
                    parser.expect_token(&Token::RightParen)?;
                    DataType::Decimal(Some(prec), scale)
                } else {
                    DataType::Decimal(None, None)
                }
            }
            other => return Err(parser.error(format!("Unexpected data type keyword {other:?}"))),
        })
    }
}

fn parse_optional_length(parser: &mut Parser) -> Result<Option<u64>> {
    if !parser.consume_token(&Token::LeftParen) {
        return Ok(None);
    }
    let len = parse_number(parser)?;
    parser.expect_token(&Token::RightParen)?;
    Ok(Some(len))
}

fn parse_number<T: std::str::FromStr>(parser: &mut Parser) -> Result<T> {
    let location = parser.location();
    let parsed = match parser.next().map(|t| &t.token) {
        Some(Token::Number(s)) => s.parse::<T>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| crate::errors::ParseError::new("Expected an integer", location))
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Varchar(None) => write!(f, "VARCHAR"),
            Self::Varchar(Some(n)) => write!(f, "VARCHAR({n})"),
            Self::Char(None) => write!(f, "CHAR"),
            Self::Char(Some(n)) => write!(f, "CHAR({n})"),
            Self::Text => write!(f, "TEXT"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::SmallInt => write!(f, "SMALLINT"),
            Self::Integer => write!(f, "INTEGER"),
            Self::BigInt => write!(f, "BIGINT"),
            Self::Real => write!(f, "REAL"),
            Self::Double => write!(f, "DOUBLE"),
            Self::Decimal(None, _) => write!(f, "DECIMAL"),
            Self::Decimal(Some(p), None) => write!(f, "DECIMAL({p})"),
            Self::Decimal(Some(p), Some(s)) => write!(f, "DECIMAL({p}, {s})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::parse_ast;
    use super::*;

    #[test]
    fn varchar_lengths() {
        assert_eq!(DataType::Varchar(None), parse_ast("varchar").unwrap());
        assert_eq!(
            DataType::Varchar(Some(100)),
            parse_ast("VARCHAR(100)").unwrap()
        );
    }

    #[test]
    fn aliases() {
        assert_eq!(DataType::Integer, parse_ast("int").unwrap());
        assert_eq!(DataType::Double, parse_ast("double precision").unwrap());
        assert_eq!(DataType::Real, parse_ast("float").unwrap());
    }

    #[test]
    fn decimal() {
        assert_eq!(
            DataType::Decimal(Some(10), Some(2)),
            parse_ast("DECIMAL(10, 2)").unwrap()
        );
        assert_eq!("DECIMAL(10, 2)", DataType::Decimal(Some(10), Some(2)).to_string());
    }

    #[test]
    fn bad_length() {
        let err = parse_ast::<DataType>("VARCHAR(abc)").unwrap_err();
        assert_eq!("Expected an integer", err.message);
    }
}
