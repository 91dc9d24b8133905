//! Data source trait and request/response types.
//!
//! The valuation engine never performs I/O. Statements reach it through a
//! [`DataSource`], which resolves a [`StatementsRequest`] into an in-memory
//! [`CompanyFinancials`] bundle before any computation starts.
//!
//! # Example
//!
//! ```rust,ignore
//! use ferrodcf_core::{DataSource, StatementsRequest, Symbol, YahooAdapter};
//!
//! async fn fetch(adapter: &YahooAdapter) -> Result<(), ferrodcf_core::SourceError> {
//!     let request = StatementsRequest::for_valuation(Symbol::parse("MRF.NS")?);
//!     let financials = adapter.financials(request).await?;
//!     println!("{} reports in {}", financials.symbol, financials.currency);
//!     Ok(())
//! }
//! ```

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{CompanyFinancials, ProviderId, StatementKind, Symbol, ValidationError};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    NotFound,
    Internal,
}

/// Structured source error surfaced in envelopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

impl From<ValidationError> for SourceError {
    fn from(error: ValidationError) -> Self {
        Self::internal(error.to_string())
    }
}

/// Request payload for statement endpoints.
///
/// The cash-flow statement is always part of the request: every provider
/// bundle carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementsRequest {
    pub symbol: Symbol,
    kinds: BTreeSet<StatementKind>,
}

impl StatementsRequest {
    pub fn new(symbol: Symbol, kinds: Vec<StatementKind>) -> Result<Self, SourceError> {
        if kinds.is_empty() {
            return Err(SourceError::invalid_request(
                "statements request must include at least one statement kind",
            ));
        }

        let mut kinds: BTreeSet<StatementKind> = kinds.into_iter().collect();
        kinds.insert(StatementKind::CashFlow);
        Ok(Self { symbol, kinds })
    }

    /// Everything the DCF pipeline can use: all three statements.
    pub fn for_valuation(symbol: Symbol) -> Self {
        Self {
            symbol,
            kinds: StatementKind::ALL.into_iter().collect(),
        }
    }

    pub fn wants(&self, kind: StatementKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = StatementKind> + '_ {
        self.kinds.iter().copied()
    }
}

/// Boxed future returned by [`DataSource`] methods.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Source adapter contract.
///
/// Implementations must be `Send + Sync`; one adapter may serve many
/// concurrent valuations.
pub trait DataSource: Send + Sync {
    /// Returns the unique provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches the requested statements plus the share count for a company.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the provider is unavailable, rate limited,
    /// has no data for the symbol, or returns a payload that fails domain
    /// validation.
    fn financials<'a>(&'a self, req: StatementsRequest) -> SourceFuture<'a, CompanyFinancials>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol() -> Symbol {
        Symbol::parse("TCS.NS").expect("valid symbol")
    }

    #[test]
    fn empty_kind_list_is_rejected() {
        let err = StatementsRequest::new(symbol(), Vec::new()).expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::InvalidRequest);
        assert!(!err.retryable());
    }

    #[test]
    fn cash_flow_is_always_requested() {
        let request =
            StatementsRequest::new(symbol(), vec![StatementKind::Income]).expect("valid request");
        assert!(request.wants(StatementKind::CashFlow));
        assert!(request.wants(StatementKind::Income));
        assert!(!request.wants(StatementKind::BalanceSheet));
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(SourceError::not_found("x").code(), "source.not_found");
        assert_eq!(SourceError::rate_limited("x").code(), "source.rate_limited");
        assert!(SourceError::rate_limited("x").retryable());
    }
}
