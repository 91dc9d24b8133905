use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use time::{Date, Month, OffsetDateTime};

use crate::data_source::{DataSource, SourceError, SourceFuture, StatementsRequest};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, NoopHttpClient};
use crate::{
    CompanyFinancials, FinancialSeries, FiscalPeriod, LineItem, ProviderId, SeriesPoint,
    Statement, StatementKind, Symbol, UtcDateTime,
};

const DEFAULT_BASE_URL: &str =
    "https://query2.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries";

/// First fiscal period requested from the timeseries endpoint (2016-12-31).
const HISTORY_START_UNIX: i64 = 1_483_142_400;

/// Timeseries key carrying the share count; it is not a statement row.
const SHARES_TYPE: &str = "annualOrdinarySharesNumber";

/// Yahoo Finance statements adapter.
///
/// With an offline transport ([`NoopHttpClient`], the default) the adapter
/// serves deterministic symbol-seeded statements; with a real transport it
/// calls the fundamentals-timeseries endpoint.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    base_url: String,
    timeout_ms: u64,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            auth: HttpAuth::None,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: 10_000,
        }
    }
}

impl YahooAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>, auth: HttpAuth) -> Self {
        Self {
            http_client,
            auth,
            ..Self::default()
        }
    }

    /// Cookie override from `FERRODCF_YAHOO_COOKIE`, if set.
    pub fn auth_from_env() -> HttpAuth {
        std::env::var("FERRODCF_YAHOO_COOKIE")
            .ok()
            .filter(|cookie| !cookie.trim().is_empty())
            .map(HttpAuth::Cookie)
            .unwrap_or(HttpAuth::None)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn timeseries_url(&self, req: &StatementsRequest) -> String {
        let mut types: Vec<String> = LineItem::ALL
            .into_iter()
            .filter(|item| req.wants(item.statement()))
            .map(|item| format!("annual{}", timeseries_key(item)))
            .collect();
        types.push(String::from(SHARES_TYPE));

        let symbol = urlencoding::encode(req.symbol.as_str());
        format!(
            "{}/{symbol}?symbol={symbol}&type={}&period1={HISTORY_START_UNIX}&period2={}",
            self.base_url.trim_end_matches('/'),
            types.join(","),
            OffsetDateTime::now_utc().unix_timestamp(),
        )
    }

    async fn fetch_real_financials(
        &self,
        req: &StatementsRequest,
    ) -> Result<CompanyFinancials, SourceError> {
        let request = HttpRequest::get(self.timeseries_url(req))
            .with_header("referer", "https://finance.yahoo.com/")
            .with_auth(&self.auth)
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            tracing::warn!(symbol = %req.symbol, error = %error, "yahoo transport error");
            if error.retryable() {
                SourceError::unavailable(format!("yahoo transport error: {}", error.message()))
            } else {
                SourceError::internal(format!("yahoo transport error: {}", error.message()))
            }
        })?;

        match response.status {
            200..=299 => {}
            429 => {
                return Err(SourceError::rate_limited(
                    "yahoo rate limited the timeseries request",
                ))
            }
            404 => {
                return Err(SourceError::not_found(format!(
                    "yahoo has no timeseries for '{}'",
                    req.symbol
                )))
            }
            status => {
                tracing::warn!(symbol = %req.symbol, status, "yahoo upstream failure");
                return Err(SourceError::unavailable(format!(
                    "yahoo returned status {status}"
                )));
            }
        }

        parse_timeseries(&req.symbol, req, &response.body)
    }

    fn fake_financials(&self, req: &StatementsRequest) -> Result<CompanyFinancials, SourceError> {
        let seed = symbol_seed(&req.symbol);
        let currency = listing_currency(&req.symbol);
        let (fiscal_month, fiscal_day) = if is_indian_listing(&req.symbol) {
            (Month::March, 31)
        } else {
            (Month::December, 31)
        };

        let base_ocf = 1_000_000_000.0 + (seed % 5_000) as f64 * 1_000_000.0;
        let shares = 1_000_000_000.0 + (seed % 1_000) as f64 * 1_000_000.0;
        let mut rows: HashMap<LineItem, Vec<SeriesPoint>> = HashMap::new();
        for (age, year) in (2021..=2024).rev().enumerate() {
            let date = Date::from_calendar_date(year, fiscal_month, fiscal_day)
                .map_err(|error| SourceError::internal(error.to_string()))?;
            let period = FiscalPeriod::from_date(date);
            let ocf = base_ocf / 1.06_f64.powi(age as i32);
            let capex = -ocf * (0.30 + (seed % 10) as f64 / 100.0);
            let revenue = ocf * 5.0;
            let net_income = ocf * 0.6;

            let values = [
                (LineItem::TotalRevenue, revenue),
                (LineItem::GrossProfit, revenue * 0.42),
                (LineItem::OperatingIncome, revenue * 0.18),
                (LineItem::NetIncome, net_income),
                (LineItem::DilutedEps, net_income / shares),
                (LineItem::CashAndEquivalents, ocf * 0.4),
                (LineItem::TotalDebt, ocf * 0.25),
                (LineItem::TotalAssets, revenue * 1.5),
                (LineItem::TotalLiabilities, revenue * 0.7),
                (LineItem::StockholdersEquity, revenue * 0.8),
                (LineItem::OperatingCashFlow, ocf),
                (LineItem::CapitalExpenditure, capex),
                (LineItem::FreeCashFlow, ocf + capex),
            ];
            for (item, value) in values {
                rows.entry(item)
                    .or_default()
                    .push(SeriesPoint { period, value });
            }
        }

        assemble(&req.symbol, req, currency, rows, Some(shares))
    }
}

impl DataSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn financials<'a>(&'a self, req: StatementsRequest) -> SourceFuture<'a, CompanyFinancials> {
        Box::pin(async move {
            if self.http_client.is_mock() {
                self.fake_financials(&req)
            } else {
                self.fetch_real_financials(&req).await
            }
        })
    }
}

/// Yahoo timeseries key (without the `annual` prefix) for a line item.
fn timeseries_key(item: LineItem) -> &'static str {
    match item {
        LineItem::TotalRevenue => "TotalRevenue",
        LineItem::GrossProfit => "GrossProfit",
        LineItem::OperatingIncome => "OperatingIncome",
        LineItem::NetIncome => "NetIncome",
        LineItem::DilutedEps => "DilutedEPS",
        LineItem::CashAndEquivalents => "CashAndCashEquivalents",
        LineItem::TotalDebt => "TotalDebt",
        LineItem::TotalAssets => "TotalAssets",
        LineItem::TotalLiabilities => "TotalLiabilitiesNetMinorityInterest",
        LineItem::StockholdersEquity => "StockholdersEquity",
        LineItem::OperatingCashFlow => "OperatingCashFlow",
        LineItem::CapitalExpenditure => "CapitalExpenditure",
        LineItem::FreeCashFlow => "FreeCashFlow",
    }
}

fn line_item_for_type(type_name: &str) -> Option<LineItem> {
    let key = type_name.strip_prefix("annual")?;
    LineItem::ALL
        .into_iter()
        .find(|item| timeseries_key(*item) == key)
}

#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    timeseries: TimeseriesData,
}

#[derive(Debug, Deserialize)]
struct TimeseriesData {
    #[serde(default)]
    result: Vec<TimeseriesResult>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesResult {
    meta: TimeseriesMeta,
    #[serde(flatten)]
    values: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesMeta {
    #[serde(rename = "type", default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesPoint {
    #[serde(rename = "asOfDate")]
    as_of_date: String,
    #[serde(rename = "currencyCode", default)]
    currency_code: Option<String>,
    #[serde(rename = "reportedValue")]
    reported_value: Option<ReportedValue>,
}

#[derive(Debug, Deserialize)]
struct ReportedValue {
    raw: Option<f64>,
}

fn parse_timeseries(
    symbol: &Symbol,
    req: &StatementsRequest,
    body: &str,
) -> Result<CompanyFinancials, SourceError> {
    let response: TimeseriesResponse = serde_json::from_str(body).map_err(|error| {
        SourceError::internal(format!("failed to parse yahoo timeseries: {error}"))
    })?;

    if let Some(error) = response.timeseries.error.filter(|error| !error.is_null()) {
        return Err(SourceError::unavailable(format!(
            "yahoo timeseries error: {error}"
        )));
    }

    let mut rows: HashMap<LineItem, Vec<SeriesPoint>> = HashMap::new();
    let mut shares: Option<(FiscalPeriod, f64)> = None;
    let mut currency: Option<String> = None;

    for result in response.timeseries.result {
        let Some(type_name) = result.meta.types.first() else {
            continue;
        };
        let Some(raw_points) = result.values.get(type_name) else {
            continue;
        };
        let points: Vec<Option<TimeseriesPoint>> = serde_json::from_value(raw_points.clone())
            .map_err(|error| {
                SourceError::internal(format!("malformed yahoo series '{type_name}': {error}"))
            })?;

        for point in points.into_iter().flatten() {
            let Some(value) = point.reported_value.and_then(|reported| reported.raw) else {
                continue;
            };
            let period = FiscalPeriod::parse(&point.as_of_date)?;

            if type_name == SHARES_TYPE {
                if shares.map_or(true, |(latest, _)| period > latest) {
                    shares = Some((period, value));
                }
                continue;
            }

            let Some(item) = line_item_for_type(type_name) else {
                tracing::debug!(type_name, "ignoring unmapped yahoo series");
                continue;
            };
            if currency.is_none() && item.statement() == StatementKind::CashFlow {
                currency = point.currency_code.clone();
            }
            rows.entry(item)
                .or_default()
                .push(SeriesPoint { period, value });
        }
    }

    if rows.is_empty() {
        return Err(SourceError::not_found(format!(
            "yahoo returned no statement data for '{symbol}'"
        )));
    }

    let currency = currency.unwrap_or_else(|| String::from(listing_currency(symbol)));
    assemble(
        symbol,
        req,
        &currency,
        rows,
        shares.map(|(_, value)| value),
    )
}

fn assemble(
    symbol: &Symbol,
    req: &StatementsRequest,
    currency: &str,
    mut rows: HashMap<LineItem, Vec<SeriesPoint>>,
    shares: Option<f64>,
) -> Result<CompanyFinancials, SourceError> {
    let mut statement = |kind: StatementKind| -> Result<Statement, SourceError> {
        let series = LineItem::ALL
            .into_iter()
            .filter(|item| item.statement() == kind)
            .filter_map(|item| rows.remove(&item).map(|points| (item, points)))
            .map(|(item, points)| FinancialSeries::new(item, points))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Statement::new(kind, series)?)
    };

    let cash_flow = statement(StatementKind::CashFlow)?;
    let balance_sheet = if req.wants(StatementKind::BalanceSheet) {
        Some(statement(StatementKind::BalanceSheet)?)
    } else {
        None
    };
    let income = if req.wants(StatementKind::Income) {
        Some(statement(StatementKind::Income)?)
    } else {
        None
    };

    let mut financials =
        CompanyFinancials::new(symbol.clone(), currency, UtcDateTime::now(), cash_flow)?
            .with_shares_outstanding(shares)?;
    for extra in [balance_sheet, income].into_iter().flatten() {
        financials = financials.with_statement(extra);
    }
    Ok(financials)
}

fn is_indian_listing(symbol: &Symbol) -> bool {
    matches!(symbol.exchange_suffix(), Some("NS" | "BO"))
}

/// Currency assumed when a response carries no `currencyCode`.
fn listing_currency(symbol: &Symbol) -> &'static str {
    if is_indian_listing(symbol) {
        "INR"
    } else {
        "USD"
    }
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}
