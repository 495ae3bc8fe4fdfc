use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiffError {
    #[error("End-of-line encountered in the middle of an expression.")]
    UnexpectedEndOfLine,
    #[error("Extra right parenthesis.")]
    ExtraRightParenthesis,
    #[error("Misplaced operator.")]
    MisplacedOperator(char),
    #[error("Unexpected character \"{0}\" encountered.")]
    UnexpectedCharacter(char),
    #[error("Missing right parenthesis.")]
    MissingRightParenthesis,
    #[error("Extra data after end of expression.")]
    ExtraData,
    #[error("Invalid number: {0}")]
    InvalidNumber(#[from] std::num::ParseFloatError),
    #[error("Number {0} is out of range.")]
    NumberOutOfRange(String),
    #[error("Expression nested more than {0} levels deep.")]
    NestedTooDeeply(usize),
    #[error("Stack underflow while executing: {0}")]
    StackUnderflow(String),
    #[error("Stack holds {0} values after execution, expected 1")]
    UnbalancedStack(usize),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Line editor error: {0}")]
    ReadlineError(#[from] rustyline::error::ReadlineError),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl DiffError {
    /// True for the failures caused by the text of an input line, as opposed
    /// to the environment the tool runs in.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            DiffError::UnexpectedEndOfLine
                | DiffError::ExtraRightParenthesis
                | DiffError::MisplacedOperator(_)
                | DiffError::UnexpectedCharacter(_)
                | DiffError::MissingRightParenthesis
                | DiffError::ExtraData
                | DiffError::InvalidNumber(_)
                | DiffError::NumberOutOfRange(_)
                | DiffError::NestedTooDeeply(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DiffError>;

impl From<DiffError> for String {
    fn from(e: DiffError) -> Self {
        e.to_string()
    }
}
