use std::io::{self, Write};

use ferrodcf_core::{CompanyFinancials, Envelope, Symbol};
use ferrodcf_engine::Valuation;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::presets::COMPANY_PRESETS;
use crate::units::DisplayUnit;

/// Typed payload kept next to the JSON data for table rendering.
#[derive(Debug, Clone)]
pub enum TableView {
    Valuation {
        symbol: Symbol,
        currency: String,
        valuation: Box<Valuation>,
    },
    Statements(Box<CompanyFinancials>),
    Companies,
}

#[derive(Debug)]
pub struct CommandOutput {
    pub envelope: Envelope<Value>,
    pub view: Option<TableView>,
}

pub fn render(
    output: &CommandOutput,
    format: OutputFormat,
    pretty: bool,
    unit: DisplayUnit,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_output(&mut out, output, format, pretty, unit)
}

pub fn write_output<W: Write>(
    out: &mut W,
    output: &CommandOutput,
    format: OutputFormat,
    pretty: bool,
    unit: DisplayUnit,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(&output.envelope)?
            } else {
                serde_json::to_string(&output.envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Ndjson => {
            let payload = serde_json::to_string(&output.envelope)?;
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => write_table(out, output, unit)?,
    }

    Ok(())
}

fn write_table<W: Write>(
    out: &mut W,
    output: &CommandOutput,
    unit: DisplayUnit,
) -> Result<(), CliError> {
    let envelope = &output.envelope;
    writeln!(out, "request_id  : {}", envelope.meta.request_id)?;
    writeln!(out, "generated_at: {}", envelope.meta.generated_at)?;
    writeln!(
        out,
        "sources     : {}",
        envelope
            .meta
            .source_chain
            .iter()
            .map(|source| source.as_str())
            .collect::<Vec<_>>()
            .join(",")
    )?;
    writeln!(out, "latency_ms  : {}", envelope.meta.latency_ms)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }
    writeln!(out)?;

    match &output.view {
        Some(TableView::Valuation {
            symbol,
            currency,
            valuation,
        }) => write_valuation(out, symbol, currency, valuation, unit)?,
        Some(TableView::Statements(financials)) => write_statements(out, financials, unit)?,
        Some(TableView::Companies) => write_companies(out)?,
        None => {
            let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
            for line in pretty_data.lines() {
                writeln!(out, "  {line}")?;
            }
        }
    }

    if !envelope.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            writeln!(out, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

fn write_valuation<W: Write>(
    out: &mut W,
    symbol: &Symbol,
    currency: &str,
    valuation: &Valuation,
    unit: DisplayUnit,
) -> io::Result<()> {
    let amount = |value: f64| unit.format_amount(value, currency);
    let assumptions = &valuation.assumptions;

    writeln!(out, "{symbol} discounted cash flow ({currency})")?;
    writeln!(
        out,
        "assumptions : growth {:.2}% | terminal growth {:.2}% | discount {:.2}% | {} years",
        assumptions.growth_rate() * 100.0,
        assumptions.terminal_growth_rate() * 100.0,
        assumptions.discount_rate() * 100.0,
        assumptions.forecast_years()
    )?;
    writeln!(
        out,
        "baseline FCF: {} ({}-year average)",
        amount(valuation.baseline.average),
        valuation.baseline.window
    )?;
    writeln!(out)?;

    let rows: Vec<(String, String, String)> = valuation
        .forecast
        .years
        .iter()
        .map(|year| {
            (
                year.year_index.to_string(),
                amount(year.future_fcf),
                amount(year.discounted_fcf),
            )
        })
        .collect();
    let future_width = column_width("Future FCF", rows.iter().map(|row| row.1.as_str()));
    let discounted_width = column_width("Discounted FCF", rows.iter().map(|row| row.2.as_str()));

    writeln!(
        out,
        "{:<4}  {:>future_width$}  {:>discounted_width$}",
        "Year", "Future FCF", "Discounted FCF"
    )?;
    for (year, future, discounted) in &rows {
        writeln!(
            out,
            "{year:<4}  {future:>future_width$}  {discounted:>discounted_width$}"
        )?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "terminal value            : {}",
        amount(valuation.forecast.terminal_value)
    )?;
    writeln!(
        out,
        "discounted terminal value : {}",
        amount(valuation.forecast.discounted_terminal_value)
    )?;
    writeln!(
        out,
        "enterprise value          : {}",
        amount(valuation.forecast.enterprise_value)
    )?;

    match &valuation.equity {
        Some(equity) => {
            writeln!(out, "equity value              : {}", amount(equity.equity_value))?;
            writeln!(
                out,
                "fair value per share      : {}",
                DisplayUnit::Raw.format_amount(equity.fair_value_per_share, currency)
            )?;
        }
        None => writeln!(out, "fair value per share      : n/a")?,
    }

    Ok(())
}

fn write_statements<W: Write>(
    out: &mut W,
    financials: &CompanyFinancials,
    unit: DisplayUnit,
) -> io::Result<()> {
    let statements = [
        financials.income.as_ref(),
        financials.balance_sheet.as_ref(),
        Some(&financials.cash_flow),
    ];

    writeln!(out, "{} statements ({})", financials.symbol, financials.currency)?;
    for statement in statements.into_iter().flatten() {
        let periods = statement.periods();
        let label_width = statement
            .rows()
            .iter()
            .map(|row| row.item().label().len())
            .max()
            .unwrap_or(0);

        let cells: Vec<Vec<String>> = statement
            .rows()
            .iter()
            .map(|row| {
                periods
                    .iter()
                    .map(|period| {
                        row.get(*period).map_or_else(
                            || String::from("-"),
                            |value| unit.format_amount(value, &financials.currency),
                        )
                    })
                    .collect()
            })
            .collect();
        let value_width = cells
            .iter()
            .flatten()
            .map(|cell| cell.chars().count())
            .max()
            .unwrap_or(0)
            .max(10);

        writeln!(out)?;
        writeln!(out, "{}", statement.kind().title())?;
        write!(out, "{:<label_width$}", "")?;
        for period in &periods {
            write!(out, "  {:>value_width$}", period.to_string())?;
        }
        writeln!(out)?;
        for (row, row_cells) in statement.rows().iter().zip(&cells) {
            write!(out, "{:<label_width$}", row.item().label())?;
            for cell in row_cells {
                write!(out, "  {cell:>value_width$}")?;
            }
            writeln!(out)?;
        }
    }

    if let Some(shares) = financials.shares_outstanding {
        writeln!(out)?;
        writeln!(out, "shares outstanding: {shares:.0}")?;
    }

    Ok(())
}

fn write_companies<W: Write>(out: &mut W) -> io::Result<()> {
    let name_width = COMPANY_PRESETS
        .iter()
        .map(|preset| preset.name.len())
        .max()
        .unwrap_or(0);
    writeln!(out, "{:<name_width$}  Symbol", "Company")?;
    for preset in COMPANY_PRESETS {
        writeln!(out, "{:<name_width$}  {}", preset.name, preset.symbol)?;
    }
    Ok(())
}

fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells
        .map(|cell| cell.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}
