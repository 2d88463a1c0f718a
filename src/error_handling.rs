use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("unrecognized symbol")]
    unrecognized_symbol,

    #[error("more than one dot in decimal number")]
    more_than_one_dot,

    #[error("decimal dot not allowed in exponent")]
    dot_in_exponent,

    #[error("more than one 'e' or 'E' in decimal number")]
    more_than_one_exponent,

    #[error("error parsing number")]
    invalid_number,

    #[error("unmatched ')'")]
    unmatched_close_paren,

    #[error("unmatched '('")]
    unmatched_open_paren,

    #[error("expected delimiter at beginning of expression")]
    expected_delimiter,

    #[error("invalid token order")]
    invalid_token_order,

    #[error("invalid operator")]
    invalid_operator,

    #[error("invalid expression after minus factor")]
    invalid_after_minus,

    #[error("unknown variable")]
    unknown_variable,

    #[error("unknown function")]
    unknown_function,

    #[error("invalid number of arguments to function")]
    invalid_argument_count,

    #[error("expected variable name")]
    expected_variable_name,

    #[error("no expression has been set")]
    no_expression,
}

/// Byte range into the expression text, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self{start, end}
    }

    pub fn at(position: usize) -> Self {
        Self::new(position, position)
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{kind}")]
pub struct PositionedError {
    pub span: Span,
    pub kind: ErrorKind,
}

impl PositionedError {
    pub fn new(span: Span, kind: ErrorKind) -> Self {
        Self{span, kind}
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

pub type Result<T> = std::result::Result<T, PositionedError>;
