use std::fmt;

/// Metadata associated with strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringTypeMeta {
    /// Maximum length in characters, None if unbounded.
    pub max_length: Option<u64>,
    /// Blank padded to `max_length` (CHAR) instead of varying (VARCHAR).
    pub fixed_length: bool,
}

impl StringTypeMeta {
    pub const UNBOUNDED: Self = StringTypeMeta {
        max_length: None,
        fixed_length: false,
    };

    pub const fn varchar(max_length: u64) -> Self {
        StringTypeMeta {
            max_length: Some(max_length),
            fixed_length: false,
        }
    }
}

/// Metadata associated with decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecimalTypeMeta {
    pub precision: u8,
    pub scale: i8,
}

impl DecimalTypeMeta {
    pub const DEFAULT_PRECISION: u8 = 18;
    pub const DEFAULT_SCALE: i8 = 3;

    pub const fn new(precision: u8, scale: i8) -> Self {
        DecimalTypeMeta { precision, scale }
    }
}

/// Data types known to the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Type of an untyped NULL literal.
    Null,
    Boolean,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal64(DecimalTypeMeta),
    Utf8(StringTypeMeta),
}

impl DataType {
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::Float32
                | DataType::Float64
                | DataType::Decimal64(_)
        )
    }

    pub const fn is_character(&self) -> bool {
        matches!(self, DataType::Utf8(_))
    }

    /// SQL spelling of the type, as accepted by the parser.
    ///
    /// Returns None for types that have no SQL spelling.
    pub fn sql_name(&self) -> Option<String> {
        Some(match self {
            Self::Null => return None,
            Self::Boolean => "BOOLEAN".to_string(),
            Self::Int16 => "SMALLINT".to_string(),
            Self::Int32 => "INTEGER".to_string(),
            Self::Int64 => "BIGINT".to_string(),
            Self::Float32 => "REAL".to_string(),
            Self::Float64 => "DOUBLE".to_string(),
            Self::Decimal64(meta) => format!("DECIMAL({}, {})", meta.precision, meta.scale),
            Self::Utf8(meta) => match (meta.fixed_length, meta.max_length) {
                (false, None) => "TEXT".to_string(),
                (false, Some(n)) => format!("VARCHAR({n})"),
                (true, None) => "CHAR".to_string(),
                (true, Some(n)) => format!("CHAR({n})"),
            },
        })
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Boolean => write!(f, "Boolean"),
            Self::Int16 => write!(f, "Int16"),
            Self::Int32 => write!(f, "Int32"),
            Self::Int64 => write!(f, "Int64"),
            Self::Float32 => write!(f, "Float32"),
            Self::Float64 => write!(f, "Float64"),
            Self::Decimal64(meta) => write!(f, "Decimal64({},{})", meta.precision, meta.scale),
            Self::Utf8(meta) => match (meta.fixed_length, meta.max_length) {
                (false, None) => write!(f, "Utf8"),
                (false, Some(n)) => write!(f, "Utf8({n})"),
                (true, None) => write!(f, "FixedUtf8"),
                (true, Some(n)) => write!(f, "FixedUtf8({n})"),
            },
        }
    }
}

/// A data type along with its nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SqlType {
    pub datatype: DataType,
    pub nullable: bool,
}

impl SqlType {
    pub const fn new(datatype: DataType, nullable: bool) -> Self {
        SqlType { datatype, nullable }
    }

    pub const fn nullable(datatype: DataType) -> Self {
        SqlType {
            datatype,
            nullable: true,
        }
    }

    pub const fn not_null(datatype: DataType) -> Self {
        SqlType {
            datatype,
            nullable: false,
        }
    }

    pub const fn with_nullable(self, nullable: bool) -> Self {
        SqlType {
            datatype: self.datatype,
            nullable,
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.datatype)?;
        if !self.nullable {
            write!(f, " NOT NULL")?;
        }
        Ok(())
    }
}

/// Broad categories of types that operand checkers match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    /// Matches every operand, including symbols and operands whose type isn't
    /// known yet.
    Any,
    Character,
    Numeric,
    Boolean,
}

impl TypeFamily {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::Character => "CHARACTER",
            Self::Numeric => "NUMERIC",
            Self::Boolean => "BOOLEAN",
        }
    }

    /// Check if a data type belongs to this family.
    ///
    /// A NULL type belongs to every family.
    pub const fn contains(&self, datatype: &DataType) -> bool {
        match (self, datatype) {
            (Self::Any, _) | (_, DataType::Null) => true,
            (Self::Character, dt) => dt.is_character(),
            (Self::Numeric, dt) => dt.is_numeric(),
            (Self::Boolean, dt) => matches!(dt, DataType::Boolean),
        }
    }
}

impl fmt::Display for TypeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_names() {
        assert_eq!(
            Some("VARCHAR(2000)".to_string()),
            DataType::Utf8(StringTypeMeta::varchar(2000)).sql_name()
        );
        assert_eq!(
            Some("TEXT".to_string()),
            DataType::Utf8(StringTypeMeta::UNBOUNDED).sql_name()
        );
        assert_eq!(None, DataType::Null.sql_name());
    }

    #[test]
    fn family_membership() {
        let varchar = DataType::Utf8(StringTypeMeta::varchar(10));
        assert!(TypeFamily::Character.contains(&varchar));
        assert!(!TypeFamily::Numeric.contains(&varchar));
        assert!(TypeFamily::Numeric.contains(&DataType::Decimal64(DecimalTypeMeta::new(10, 2))));
        assert!(TypeFamily::Boolean.contains(&DataType::Null));
        assert!(TypeFamily::Any.contains(&DataType::Boolean));
    }

    #[test]
    fn sql_type_display() {
        assert_eq!("Int64 NOT NULL", SqlType::not_null(DataType::Int64).to_string());
        assert_eq!(
            "Utf8(20)",
            SqlType::nullable(DataType::Utf8(StringTypeMeta::varchar(20))).to_string()
        );
    }
}
