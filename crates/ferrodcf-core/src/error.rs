use thiserror::Error;

/// Validation and contract errors exposed by `ferrodcf-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid source '{value}', expected one of yahoo, file, local")]
    InvalidSource { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
    #[error("fiscal period must be a YYYY-MM-DD date: '{value}'")]
    InvalidPeriod { value: String },

    #[error("currency must be a 3-letter uppercase ISO code: '{value}'")]
    InvalidCurrency { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },

    #[error("line item '{item}' has more than one value for period {period}")]
    DuplicatePeriod { item: &'static str, period: String },
    #[error("line item '{item}' does not belong on a {statement} statement")]
    MisplacedLineItem {
        item: &'static str,
        statement: &'static str,
    },
    #[error("field '{field}' holds a {kind} statement")]
    MisplacedStatement {
        field: &'static str,
        kind: &'static str,
    },
    #[error("statement already contains a row for '{item}'")]
    DuplicateRow { item: &'static str },
    #[error("unknown line item '{value}'")]
    UnknownLineItem { value: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("trace_id must be 32 hex characters")]
    InvalidTraceId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("source_chain must contain at least one source")]
    EmptySourceChain,

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}
