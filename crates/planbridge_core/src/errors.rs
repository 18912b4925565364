use planbridge_parser::{Location, ParseError};

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// User input that doesn't fit what an operator or table accepts.
    #[error("{message} at {pos}")]
    Validation { message: String, pos: Location },

    #[error("Invalid number of operands for {function}: got {got}, expected {expected} at {pos}")]
    InvalidArity {
        function: String,
        got: usize,
        expected: String,
        pos: Location,
    },

    /// Broken invariant inside the planner. Never caused by user input alone.
    #[error("internal: {0}")]
    Internal(String),

    #[error("Table '{table}' does not support extending its columns")]
    UnsupportedExtension { table: String },

    #[error("Duplicate column '{column}' for table '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Config(String),

    #[error("Unknown function '{name}' at {pos}")]
    UnknownOperator { name: String, pos: Location },

    #[error("Missing table '{0}'")]
    TableNotFound(String),

    #[error("Missing column '{column}' at {pos}")]
    ColumnNotFound { column: String, pos: Location },
}

impl PlanError {
    /// If this error signals a defect rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, PlanError::Internal(_))
    }

    /// Source position of the error, if it can be attributed to one.
    pub fn location(&self) -> Option<Location> {
        match self {
            Self::Validation { pos, .. }
            | Self::InvalidArity { pos, .. }
            | Self::UnknownOperator { pos, .. }
            | Self::ColumnNotFound { pos, .. } => Some(*pos),
            Self::Parse(e) => Some(e.location),
            _ => None,
        }
    }
}

pub type Result<T, E = PlanError> = std::result::Result<T, E>;

macro_rules! internal {
    ($($arg:tt)*) => {
        crate::errors::PlanError::Internal(std::format!($($arg)*))
    };
}
pub(crate) use internal;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_macro_formats() {
        let err = internal!("bad operand {}", 3);
        assert!(err.is_internal());
        assert_eq!("internal: bad operand 3", err.to_string());
        assert_eq!(None, err.location());
    }

    #[test]
    fn validation_has_location() {
        let err = PlanError::Validation {
            message: "nope".to_string(),
            pos: Location::new(2, 7),
        };
        assert!(!err.is_internal());
        assert_eq!(Some(Location::new(2, 7)), err.location());
        assert_eq!("nope at line 2, column 7", err.to_string());
    }
}
