//! # Domain Models
//!
//! Canonical statement types for ferrodcf.
//!
//! All models validate their invariants at construction time and serialize
//! with serde, including when deserialized from provider or file payloads.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker, exchange suffix allowed |
//! | [`FiscalPeriod`] | Period-end date, `YYYY-MM-DD` |
//! | [`LineItem`] | Statement row identifier |
//! | [`FinancialSeries`] | One line item over periods, most recent first |
//! | [`Statement`] | Income, balance sheet or cash flow rows |
//! | [`CompanyFinancials`] | Provider bundle for one company |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! ## Sign convention
//!
//! Capital expenditure is carried exactly as providers publish it: a
//! negative outflow. Free cash flow is therefore `ocf + capex`.
//!
//! ```rust,ignore
//! use ferrodcf_core::{FinancialSeries, FiscalPeriod, LineItem};
//!
//! let capex = FinancialSeries::from_pairs(
//!     LineItem::CapitalExpenditure,
//!     [(FiscalPeriod::parse("2024-03-31")?, -2_500.0)],
//! )?;
//! ```

mod models;
mod period;
mod symbol;
mod timestamp;

pub use models::{
    validate_currency_code, CompanyFinancials, FinancialSeries, LineItem, SeriesPoint, Statement,
    StatementKind,
};
pub use period::FiscalPeriod;
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
