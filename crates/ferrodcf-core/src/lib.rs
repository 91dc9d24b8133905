//! # ferrodcf Core
//!
//! Core contracts and domain types for the ferrodcf valuation toolkit.
//!
//! ## Overview
//!
//! This crate provides the foundational components shared by the valuation
//! engine and the CLI:
//!
//! - **Canonical statement models**: line items, series and statements
//! - **Provider identifiers** for envelope metadata
//! - **Response envelope** with metadata and structured errors
//! - **Data source trait** for statement adapters
//! - **HTTP client abstraction** with an offline mock transport
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Statement adapters (Yahoo, JSON file) |
//! | [`data_source`] | Data source trait and request types |
//! | [`domain`] | Domain models (Symbol, FiscalPeriod, Statement, ...) |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ferrodcf_core::{DataSource, LineItem, StatementsRequest, Symbol, YahooAdapter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = YahooAdapter::default();
//!     let request = StatementsRequest::for_valuation(Symbol::parse("MRF.NS")?);
//!     let financials = adapter.financials(request).await?;
//!
//!     if let Some(ocf) = financials.latest(LineItem::OperatingCashFlow) {
//!         println!("latest operating cash flow: {ocf:.0} {}", financials.currency);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Adapters return [`SourceError`] with a stable code and retryable flag:
//!
//! ```rust
//! use ferrodcf_core::{SourceError, SourceErrorKind};
//!
//! fn describe(error: &SourceError) -> &'static str {
//!     match error.kind() {
//!         SourceErrorKind::RateLimited | SourceErrorKind::Unavailable => "try again later",
//!         SourceErrorKind::NotFound => "unknown company",
//!         _ => "request failed",
//!     }
//! }
//! ```

pub mod adapters;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod source;

pub use adapters::{FileSource, YahooAdapter};

pub use data_source::{DataSource, SourceError, SourceErrorKind, SourceFuture, StatementsRequest};

pub use domain::{
    validate_currency_code, CompanyFinancials, FinancialSeries, FiscalPeriod, LineItem,
    SeriesPoint, Statement, StatementKind, Symbol, UtcDateTime,
};

pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};

pub use error::ValidationError;

pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};

pub use source::ProviderId;
