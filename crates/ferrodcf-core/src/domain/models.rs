use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{FiscalPeriod, Symbol, UtcDateTime, ValidationError};

/// Financial statement families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Income,
    BalanceSheet,
    CashFlow,
}

impl StatementKind {
    pub const ALL: [Self; 3] = [Self::Income, Self::BalanceSheet, Self::CashFlow];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::BalanceSheet => "balance_sheet",
            Self::CashFlow => "cash_flow",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Income => "Income Statement",
            Self::BalanceSheet => "Balance Sheet",
            Self::CashFlow => "Cash Flow",
        }
    }
}

impl Display for StatementKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statement row identifiers understood by the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItem {
    TotalRevenue,
    GrossProfit,
    OperatingIncome,
    NetIncome,
    DilutedEps,
    CashAndEquivalents,
    TotalDebt,
    TotalAssets,
    TotalLiabilities,
    StockholdersEquity,
    OperatingCashFlow,
    /// Recorded as a negative outflow, as statement providers publish it.
    CapitalExpenditure,
    FreeCashFlow,
}

impl LineItem {
    pub const ALL: [Self; 13] = [
        Self::TotalRevenue,
        Self::GrossProfit,
        Self::OperatingIncome,
        Self::NetIncome,
        Self::DilutedEps,
        Self::CashAndEquivalents,
        Self::TotalDebt,
        Self::TotalAssets,
        Self::TotalLiabilities,
        Self::StockholdersEquity,
        Self::OperatingCashFlow,
        Self::CapitalExpenditure,
        Self::FreeCashFlow,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TotalRevenue => "total_revenue",
            Self::GrossProfit => "gross_profit",
            Self::OperatingIncome => "operating_income",
            Self::NetIncome => "net_income",
            Self::DilutedEps => "diluted_eps",
            Self::CashAndEquivalents => "cash_and_equivalents",
            Self::TotalDebt => "total_debt",
            Self::TotalAssets => "total_assets",
            Self::TotalLiabilities => "total_liabilities",
            Self::StockholdersEquity => "stockholders_equity",
            Self::OperatingCashFlow => "operating_cash_flow",
            Self::CapitalExpenditure => "capital_expenditure",
            Self::FreeCashFlow => "free_cash_flow",
        }
    }

    /// Row label as printed on published statements.
    pub const fn label(self) -> &'static str {
        match self {
            Self::TotalRevenue => "Total Revenue",
            Self::GrossProfit => "Gross Profit",
            Self::OperatingIncome => "Operating Income",
            Self::NetIncome => "Net Income",
            Self::DilutedEps => "Diluted EPS",
            Self::CashAndEquivalents => "Cash And Cash Equivalents",
            Self::TotalDebt => "Total Debt",
            Self::TotalAssets => "Total Assets",
            Self::TotalLiabilities => "Total Liabilities Net Minority Interest",
            Self::StockholdersEquity => "Stockholders Equity",
            Self::OperatingCashFlow => "Operating Cash Flow",
            Self::CapitalExpenditure => "Capital Expenditure",
            Self::FreeCashFlow => "Free Cash Flow",
        }
    }

    pub const fn statement(self) -> StatementKind {
        match self {
            Self::TotalRevenue
            | Self::GrossProfit
            | Self::OperatingIncome
            | Self::NetIncome
            | Self::DilutedEps => StatementKind::Income,
            Self::CashAndEquivalents
            | Self::TotalDebt
            | Self::TotalAssets
            | Self::TotalLiabilities
            | Self::StockholdersEquity => StatementKind::BalanceSheet,
            Self::OperatingCashFlow | Self::CapitalExpenditure | Self::FreeCashFlow => {
                StatementKind::CashFlow
            }
        }
    }
}

impl Display for LineItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineItem {
    type Err = ValidationError;

    /// Accepts either the snake_case identifier or the published row label.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|item| {
                item.as_str() == trimmed || item.label().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| ValidationError::UnknownLineItem {
                value: value.to_owned(),
            })
    }
}

/// One reported value of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub period: FiscalPeriod,
    pub value: f64,
}

/// Values of one line item across reporting periods, most recent first.
///
/// A period without a reported value is absent from the series; it is never
/// stored as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct FinancialSeries {
    item: LineItem,
    points: Vec<SeriesPoint>,
}

#[derive(Deserialize)]
struct RawSeries {
    item: LineItem,
    #[serde(default)]
    points: Vec<SeriesPoint>,
}

impl TryFrom<RawSeries> for FinancialSeries {
    type Error = ValidationError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        Self::new(raw.item, raw.points)
    }
}

impl FinancialSeries {
    /// Builds a series, sorting points most-recent-first.
    pub fn new(item: LineItem, mut points: Vec<SeriesPoint>) -> Result<Self, ValidationError> {
        let field = item.as_str();
        let mut seen = BTreeSet::new();
        for point in &points {
            if !point.value.is_finite() {
                return Err(ValidationError::NonFiniteValue { field });
            }
            if !seen.insert(point.period) {
                return Err(ValidationError::DuplicatePeriod {
                    item: field,
                    period: point.period.to_string(),
                });
            }
        }

        points.sort_by(|left, right| right.period.cmp(&left.period));
        Ok(Self { item, points })
    }

    /// Convenience constructor from `(period, value)` pairs.
    pub fn from_pairs<I>(item: LineItem, pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (FiscalPeriod, f64)>,
    {
        let points = pairs
            .into_iter()
            .map(|(period, value)| SeriesPoint { period, value })
            .collect();
        Self::new(item, points)
    }

    pub fn empty(item: LineItem) -> Self {
        Self {
            item,
            points: Vec::new(),
        }
    }

    pub const fn item(&self) -> LineItem {
        self.item
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, period: FiscalPeriod) -> Option<f64> {
        self.points
            .iter()
            .find(|point| point.period == period)
            .map(|point| point.value)
    }

    pub fn latest(&self) -> Option<SeriesPoint> {
        self.points.first().copied()
    }

    pub fn periods(&self) -> impl Iterator<Item = FiscalPeriod> + '_ {
        self.points.iter().map(|point| point.period)
    }
}

/// A single financial statement: one row per line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStatement")]
pub struct Statement {
    kind: StatementKind,
    rows: Vec<FinancialSeries>,
}

#[derive(Deserialize)]
struct RawStatement {
    kind: StatementKind,
    #[serde(default)]
    rows: Vec<FinancialSeries>,
}

impl TryFrom<RawStatement> for Statement {
    type Error = ValidationError;

    fn try_from(raw: RawStatement) -> Result<Self, Self::Error> {
        Self::new(raw.kind, raw.rows)
    }
}

impl Statement {
    pub fn new(kind: StatementKind, rows: Vec<FinancialSeries>) -> Result<Self, ValidationError> {
        let mut seen = BTreeSet::new();
        for row in &rows {
            if row.item().statement() != kind {
                return Err(ValidationError::MisplacedLineItem {
                    item: row.item().as_str(),
                    statement: kind.as_str(),
                });
            }
            if !seen.insert(row.item()) {
                return Err(ValidationError::DuplicateRow {
                    item: row.item().as_str(),
                });
            }
        }

        Ok(Self { kind, rows })
    }

    pub const fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn rows(&self) -> &[FinancialSeries] {
        &self.rows
    }

    /// Looks up a row by line item; absent rows are `None`, never zero.
    pub fn row(&self, item: LineItem) -> Option<&FinancialSeries> {
        self.rows.iter().find(|row| row.item() == item)
    }

    /// Union of all periods on the statement, most recent first.
    pub fn periods(&self) -> Vec<FiscalPeriod> {
        let periods: BTreeSet<FiscalPeriod> =
            self.rows.iter().flat_map(FinancialSeries::periods).collect();
        periods.into_iter().rev().collect()
    }
}

/// Everything a provider returns for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCompanyFinancials")]
pub struct CompanyFinancials {
    pub symbol: Symbol,
    pub currency: String,
    pub as_of: UtcDateTime,
    pub cash_flow: Statement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_sheet: Option<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income: Option<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares_outstanding: Option<f64>,
}

#[derive(Deserialize)]
struct RawCompanyFinancials {
    symbol: Symbol,
    currency: String,
    #[serde(default = "UtcDateTime::now")]
    as_of: UtcDateTime,
    cash_flow: Statement,
    #[serde(default)]
    balance_sheet: Option<Statement>,
    #[serde(default)]
    income: Option<Statement>,
    #[serde(default)]
    shares_outstanding: Option<f64>,
}

impl TryFrom<RawCompanyFinancials> for CompanyFinancials {
    type Error = ValidationError;

    fn try_from(raw: RawCompanyFinancials) -> Result<Self, Self::Error> {
        let mut financials = Self::new(raw.symbol, raw.currency, raw.as_of, raw.cash_flow)?
            .with_shares_outstanding(raw.shares_outstanding)?;
        for (field, expected, statement) in [
            ("balance_sheet", StatementKind::BalanceSheet, raw.balance_sheet),
            ("income", StatementKind::Income, raw.income),
        ] {
            let Some(statement) = statement else {
                continue;
            };
            if statement.kind() != expected {
                return Err(ValidationError::MisplacedStatement {
                    field,
                    kind: statement.kind().as_str(),
                });
            }
            financials = financials.with_statement(statement);
        }
        Ok(financials)
    }
}

impl CompanyFinancials {
    pub fn new(
        symbol: Symbol,
        currency: impl AsRef<str>,
        as_of: UtcDateTime,
        cash_flow: Statement,
    ) -> Result<Self, ValidationError> {
        if cash_flow.kind() != StatementKind::CashFlow {
            return Err(ValidationError::MisplacedStatement {
                field: "cash_flow",
                kind: cash_flow.kind().as_str(),
            });
        }

        Ok(Self {
            symbol,
            currency: validate_currency_code(currency.as_ref())?,
            as_of,
            cash_flow,
            balance_sheet: None,
            income: None,
            shares_outstanding: None,
        })
    }

    /// Attaches a balance sheet or income statement, replacing any previous one.
    pub fn with_statement(mut self, statement: Statement) -> Self {
        match statement.kind() {
            StatementKind::CashFlow => self.cash_flow = statement,
            StatementKind::BalanceSheet => self.balance_sheet = Some(statement),
            StatementKind::Income => self.income = Some(statement),
        }
        self
    }

    /// Shares are passed through unchecked apart from finiteness; whether a
    /// count is usable is decided by the valuation equity bridge.
    pub fn with_shares_outstanding(
        mut self,
        shares_outstanding: Option<f64>,
    ) -> Result<Self, ValidationError> {
        if let Some(shares) = shares_outstanding {
            if !shares.is_finite() {
                return Err(ValidationError::NonFiniteValue {
                    field: "shares_outstanding",
                });
            }
        }
        self.shares_outstanding = shares_outstanding;
        Ok(self)
    }

    pub fn statement(&self, kind: StatementKind) -> Option<&Statement> {
        match kind {
            StatementKind::CashFlow => Some(&self.cash_flow),
            StatementKind::BalanceSheet => self.balance_sheet.as_ref(),
            StatementKind::Income => self.income.as_ref(),
        }
    }

    pub fn series(&self, item: LineItem) -> Option<&FinancialSeries> {
        self.statement(item.statement())
            .and_then(|statement| statement.row(item))
    }

    /// Most recent reported value of a line item, if any.
    pub fn latest(&self, item: LineItem) -> Option<f64> {
        self.series(item)
            .and_then(FinancialSeries::latest)
            .map(|point| point.value)
    }
}

/// Validate and normalize currency to uppercase 3-letter code.
pub fn validate_currency_code(input: &str) -> Result<String, ValidationError> {
    let normalized = input.trim().to_ascii_uppercase();
    let is_valid = normalized.len() == 3 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());

    if !is_valid {
        return Err(ValidationError::InvalidCurrency {
            value: input.to_owned(),
        });
    }

    Ok(normalized)
}
