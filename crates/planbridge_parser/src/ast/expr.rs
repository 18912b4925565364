use super::{AstParseable, DataType, Ident, ObjectReference};
use crate::errors::{Location, Result};
use crate::keywords::Keyword;
use crate::parser::Parser;
use crate::tokens::Token;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    /// Unparsed number literal, sign included.
    Number(String),
    /// String literal.
    SingleQuotedString(String),
    /// Boolean literal.
    Boolean(bool),
    /// Null literal
    Null,
}

/// Set quantifier for an aggregate-style function call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionQualifier {
    /// `f(DISTINCT a)`
    Distinct,
    /// `f(ALL a)`
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Function {
    pub reference: ObjectReference,
    pub qualifier: Option<FunctionQualifier>,
    pub args: Vec<Expr>,
    pub location: Location,
}

/// `WITHOUT ARRAY WRAPPER`, `WITH CONDITIONAL ARRAY WRAPPER`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonQueryWrapper {
    WithoutArray,
    WithConditionalArray,
    WithUnconditionalArray,
}

/// What JSON_QUERY produces for an empty result or an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonQueryBehavior {
    Null,
    Error,
    EmptyArray,
    EmptyObject,
}

/// The JSON_QUERY special form.
///
/// `JSON_QUERY(<expr>, <path> [RETURNING <type>] [<wrapper> WRAPPER]
///   [<behavior> ON EMPTY] [<behavior> ON ERROR])`
///
/// Clauses that aren't written are left as None, the binder decides what the
/// defaults are.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonQuery {
    pub expr: Box<Expr>,
    pub path: Box<Expr>,
    pub returning: Option<DataType>,
    pub wrapper: Option<JsonQueryWrapper>,
    pub on_empty: Option<JsonQueryBehavior>,
    pub on_error: Option<JsonQueryBehavior>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Column identifier.
    Ident(Ident),
    /// Compound identifier.
    ///
    /// `table.col`
    CompoundIdent(Vec<Ident>),
    /// An expression literal,
    Literal(Literal),
    /// Parenthesized expression.
    Nested(Box<Expr>),
    /// A function call.
    Function(Function),
    /// JSON_QUERY with its clause syntax.
    JsonQuery(JsonQuery),
}

impl AstParseable for Expr {
    fn parse(parser: &mut Parser) -> Result<Self> {
        let location = parser.location();
        let tok = match parser.peek() {
            Some(tok) => tok.clone(),
            None => return Err(parser.unexpected("an expression")),
        };

        let expr = match &tok.token {
            Token::Word(w) => match w.keyword {
                Some(Keyword::TRUE) => {
                    parser.next();
                    Expr::Literal(Literal::Boolean(true))
                }
                Some(Keyword::FALSE) => {
                    parser.next();
                    Expr::Literal(Literal::Boolean(false))
                }
                Some(Keyword::NULL) => {
                    parser.next();
                    Expr::Literal(Literal::Null)
                }
                _ => {
                    let is_json_query = w.quote.is_none()
                        && w.value.eq_ignore_ascii_case("json_query")
                        && matches!(parser.peek_nth(1).map(|t| &t.token), Some(Token::LeftParen));
                    if is_json_query {
                        parser.next();
                        Expr::JsonQuery(Self::parse_json_query(parser, location)?)
                    } else {
                        Self::parse_ident_or_function(parser, location)?
                    }
                }
            },
            Token::SingleQuotedString(s) => {
                parser.next();
                Expr::Literal(Literal::SingleQuotedString(s.clone()))
            }
            Token::Number(s) => {
                parser.next();
                Expr::Literal(Literal::Number(s.clone()))
            }
            Token::Minus | Token::Plus => {
                parser.next();
                let sign = if tok.token == Token::Minus { "-" } else { "" };
                match parser.next().map(|t| &t.token) {
                    Some(Token::Number(s)) => Expr::Literal(Literal::Number(format!("{sign}{s}"))),
                    _ => {
                        return Err(crate::errors::ParseError::new(
                            "Expected a number after sign",
                            location,
                        ));
                    }
                }
            }
            Token::LeftParen => {
                parser.next();
                let inner = Expr::parse(parser)?;
                parser.expect_token(&Token::RightParen)?;
                Expr::Nested(Box::new(inner))
            }
            _ => return Err(parser.unexpected("an expression")),
        };

        Ok(expr)
    }
}

impl Expr {
    fn parse_ident_or_function(parser: &mut Parser, location: Location) -> Result<Self> {
        let reference = ObjectReference::parse(parser)?;

        if parser.consume_token(&Token::LeftParen) {
            let qualifier = match parser.parse_one_of_keywords(&[Keyword::DISTINCT, Keyword::ALL]) {
                Some(Keyword::DISTINCT) => Some(FunctionQualifier::Distinct),
                Some(_) => Some(FunctionQualifier::All),
                None => None,
            };

            let mut args = Vec::new();
            if !parser.consume_token(&Token::RightParen) {
                loop {
                    args.push(Expr::parse(parser)?);
                    if parser.consume_token(&Token::Comma) {
                        continue;
                    }
                    parser.expect_token(&Token::RightParen)?;
                    break;
                }
            }

            return Ok(Expr::Function(Function {
                reference,
                qualifier,
                args,
                location,
            }));
        }

        let mut idents = reference.0;
        if idents.len() == 1 {
            Ok(Expr::Ident(idents.remove(0)))
        } else {
            Ok(Expr::CompoundIdent(idents))
        }
    }

    /// Parse everything after the JSON_QUERY name.
    fn parse_json_query(parser: &mut Parser, location: Location) -> Result<JsonQuery> {
        parser.expect_token(&Token::LeftParen)?;
        let expr = Expr::parse(parser)?;
        parser.expect_token(&Token::Comma)?;
        let path = Expr::parse(parser)?;

        let returning = if parser.parse_keyword(Keyword::RETURNING) {
            Some(DataType::parse(parser)?)
        } else {
            None
        };

        let wrapper = Self::parse_json_query_wrapper(parser)?;

        let mut on_empty = None;
        let mut on_error = None;
        while let Some(behavior) = Self::parse_json_query_behavior(parser)? {
            parser.expect_keyword(Keyword::ON)?;
            let clause_location = parser.location();
            match parser.expect_one_of_keywords(&[Keyword::EMPTY, Keyword::ERROR])? {
                Keyword::EMPTY if on_empty.is_none() && on_error.is_none() => {
                    on_empty = Some(behavior)
                }
                Keyword::ERROR if on_error.is_none() => on_error = Some(behavior),
                kw => {
                    return Err(crate::errors::ParseError::new(
                        format!("Unexpected ON {} clause", kw.as_str()),
                        clause_location,
                    ));
                }
            }
        }

        parser.expect_token(&Token::RightParen)?;

        Ok(JsonQuery {
            expr: Box::new(expr),
            path: Box::new(path),
            returning,
            wrapper,
            on_empty,
            on_error,
            location,
        })
    }

    fn parse_json_query_wrapper(parser: &mut Parser) -> Result<Option<JsonQueryWrapper>> {
        let wrapper = if parser.parse_keyword(Keyword::WITHOUT) {
            let _ = parser.parse_keyword(Keyword::ARRAY);
            JsonQueryWrapper::WithoutArray
        } else if parser.parse_keyword(Keyword::WITH) {
            let wrapper = match parser
                .parse_one_of_keywords(&[Keyword::CONDITIONAL, Keyword::UNCONDITIONAL])
            {
                Some(Keyword::CONDITIONAL) => JsonQueryWrapper::WithConditionalArray,
                _ => JsonQueryWrapper::WithUnconditionalArray,
            };
            let _ = parser.parse_keyword(Keyword::ARRAY);
            wrapper
        } else {
            return Ok(None);
        };
        parser.expect_keyword(Keyword::WRAPPER)?;
        Ok(Some(wrapper))
    }

    fn parse_json_query_behavior(parser: &mut Parser) -> Result<Option<JsonQueryBehavior>> {
        let behavior = match parser.parse_one_of_keywords(&[
            Keyword::NULL,
            Keyword::ERROR,
            Keyword::EMPTY,
        ]) {
            Some(Keyword::NULL) => JsonQueryBehavior::Null,
            Some(Keyword::ERROR) => JsonQueryBehavior::Error,
            Some(_) => match parser.expect_one_of_keywords(&[Keyword::ARRAY, Keyword::OBJECT])? {
                Keyword::ARRAY => JsonQueryBehavior::EmptyArray,
                _ => JsonQueryBehavior::EmptyObject,
            },
            None => return Ok(None),
        };
        Ok(Some(behavior))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::parse_ast;
    use super::*;

    fn json_query(s: &str) -> JsonQuery {
        match parse_ast::<Expr>(s).unwrap() {
            Expr::JsonQuery(q) => q,
            other => panic!("not json_query: {other:?}"),
        }
    }

    #[test]
    fn literals() {
        assert_eq!(Expr::Literal(Literal::Null), parse_ast("null").unwrap());
        assert_eq!(
            Expr::Literal(Literal::Number("-1.5".to_string())),
            parse_ast("-1.5").unwrap()
        );
    }

    #[test]
    fn compound_ident() {
        assert_eq!(
            Expr::CompoundIdent(vec![Ident::from_string("t"), Ident::from_string("c")]),
            parse_ast("t.c").unwrap()
        );
    }

    #[test]
    fn function_with_qualifier() {
        let expr: Expr = parse_ast("count(DISTINCT a, 'b')").unwrap();
        match expr {
            Expr::Function(f) => {
                assert_eq!(Some(FunctionQualifier::Distinct), f.qualifier);
                assert_eq!(2, f.args.len());
                assert_eq!(Location::new(1, 1), f.location);
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn json_query_minimal() {
        let q = json_query("JSON_QUERY(doc, '$.a')");
        assert_eq!(None, q.returning);
        assert_eq!(None, q.wrapper);
        assert_eq!(None, q.on_empty);
        assert_eq!(None, q.on_error);
    }

    #[test]
    fn json_query_all_clauses() {
        let q = json_query(
            "json_query(doc, '$.a' RETURNING VARCHAR(20) WITH CONDITIONAL ARRAY WRAPPER EMPTY OBJECT ON EMPTY ERROR ON ERROR)",
        );
        assert_eq!(Some(DataType::Varchar(Some(20))), q.returning);
        assert_eq!(Some(JsonQueryWrapper::WithConditionalArray), q.wrapper);
        assert_eq!(Some(JsonQueryBehavior::EmptyObject), q.on_empty);
        assert_eq!(Some(JsonQueryBehavior::Error), q.on_error);
    }

    #[test]
    fn json_query_short_wrappers() {
        assert_eq!(
            Some(JsonQueryWrapper::WithUnconditionalArray),
            json_query("JSON_QUERY(doc, '$' WITH WRAPPER)").wrapper
        );
        assert_eq!(
            Some(JsonQueryWrapper::WithoutArray),
            json_query("JSON_QUERY(doc, '$' WITHOUT WRAPPER)").wrapper
        );
    }

    #[test]
    fn json_query_only_on_error() {
        let q = json_query("JSON_QUERY(doc, '$' EMPTY ARRAY ON ERROR)");
        assert_eq!(None, q.on_empty);
        assert_eq!(Some(JsonQueryBehavior::EmptyArray), q.on_error);
    }

    #[test]
    fn json_query_clause_order_enforced() {
        let err =
            parse_ast::<Expr>("JSON_QUERY(doc, '$' NULL ON ERROR NULL ON EMPTY)").unwrap_err();
        assert_eq!("Unexpected ON EMPTY clause", err.message);
        assert_eq!(Location::new(1, 43), err.location);
    }

    #[test]
    fn quoted_json_query_is_plain_function() {
        let expr: Expr = parse_ast("\"JSON_QUERY\"(a, b)").unwrap();
        assert!(matches!(expr, Expr::Function(_)));
    }
}
