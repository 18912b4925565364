use std::hash::Hash;

/// Try to get a keyword from a string, ignoring string casing.
pub fn keyword_from_str(s: &str) -> Option<Keyword> {
    let s = unicase::Ascii::new(s);
    let idx = match KEYWORD_STRINGS.binary_search(&s) {
        Ok(idx) => idx,
        Err(_) => return None,
    };
    Some(ALL_KEYWORDS[idx])
}

/// Generate an enum of keywords.
///
/// Keywords must be provided in sorted order since lookups use a binary
/// search.
macro_rules! define_keywords {
    ($($ident:ident),*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($ident),*
        }

        pub const ALL_KEYWORDS: &[Keyword] = &[
            $(Keyword::$ident),*
        ];

        pub const KEYWORD_STRINGS: &[unicase::Ascii<&'static str>] = &[
            $(unicase::Ascii::new(stringify!($ident)),)*
        ];

        impl Keyword {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Keyword::$ident => stringify!($ident)),*
                }
            }
        }
    };
}

#[rustfmt::skip]
define_keywords!(
    ALL,
    ARRAY,
    BIGINT,
    BOOLEAN,
    CHAR,
    CONDITIONAL,
    DECIMAL,
    DISTINCT,
    DOUBLE,
    EMPTY,
    ERROR,
    FALSE,
    FLOAT,
    INT,
    INTEGER,
    NULL,
    OBJECT,
    ON,
    PRECISION,
    REAL,
    RETURNING,
    SMALLINT,
    TEXT,
    TRUE,
    UNCONDITIONAL,
    VARCHAR,
    WITH,
    WITHOUT,
    WRAPPER
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive() {
        // (input, expected)
        let tests = [
            ("wrapper", Some(Keyword::WRAPPER)),
            ("WrApPeR", Some(Keyword::WRAPPER)),
            ("WRAPPER", Some(Keyword::WRAPPER)),
            ("NOWRAPPER", None),
            ("conditional", Some(Keyword::CONDITIONAL)),
        ];

        for (input, expected) in tests {
            let got = keyword_from_str(input);
            assert_eq!(expected, got);
        }
    }

    #[test]
    fn keyword_strings_sorted() {
        for pair in KEYWORD_STRINGS.windows(2) {
            assert!(pair[0] < pair[1], "{} >= {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn every_keyword_resolves_to_itself() {
        for kw in ALL_KEYWORDS {
            assert_eq!(Some(*kw), keyword_from_str(kw.as_str()));
        }
    }
}
