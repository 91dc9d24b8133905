use std::time::Instant;

use ferrodcf_core::{
    CompanyFinancials, EnvelopeError, ProviderId, SourceError, StatementsRequest, Symbol,
    UtcDateTime,
};
use ferrodcf_engine::{value, EngineOptions, Valuation, ValuationInput};
use serde::Serialize;

use crate::cli::DcfArgs;
use crate::config::{resolve_assumptions, AssumptionFlags};
use crate::error::CliError;
use crate::output::TableView;
use crate::presets::resolve_company;

use super::{CommandResult, StatementSource};

#[derive(Debug, Serialize)]
struct DcfResponseData {
    symbol: Option<Symbol>,
    currency: Option<String>,
    as_of: Option<UtcDateTime>,
    valuation: Option<Valuation>,
}

impl DcfResponseData {
    fn empty(symbol: Option<Symbol>) -> Self {
        Self {
            symbol,
            currency: None,
            as_of: None,
            valuation: None,
        }
    }
}

pub async fn run(args: &DcfArgs, source: &StatementSource) -> Result<CommandResult, CliError> {
    let assumptions =
        resolve_assumptions(args.assumptions.as_deref(), AssumptionFlags::from(args)).await?;
    let options = EngineOptions::default().with_missing_balance(args.missing_balance.into());

    let started = Instant::now();
    let fetched = fetch(args, source).await?;
    let latency_ms = started.elapsed().as_millis() as u64;
    let source_chain = vec![source.id()];

    let financials = match fetched {
        Ok(financials) => financials,
        Err((symbol, error)) => {
            let data = serde_json::to_value(DcfResponseData::empty(symbol))?;
            return Ok(CommandResult::ok(data, source_chain)
                .with_error(EnvelopeError::from_source_error(&error, source.id()))
                .with_latency(latency_ms));
        }
    };

    let input = ValuationInput::from_financials(&financials);
    match value(&input, &assumptions, &options) {
        Ok(valuation) => {
            let warnings = valuation
                .warnings
                .iter()
                .map(|warning| format!("{}: {}", warning.code, warning.message))
                .collect();
            let data = serde_json::to_value(DcfResponseData {
                symbol: Some(financials.symbol.clone()),
                currency: Some(financials.currency.clone()),
                as_of: Some(financials.as_of),
                valuation: Some(valuation.clone()),
            })?;

            Ok(CommandResult::ok(data, source_chain)
                .with_warnings(warnings)
                .with_latency(latency_ms)
                .with_view(TableView::Valuation {
                    symbol: financials.symbol,
                    currency: financials.currency,
                    valuation: Box::new(valuation),
                }))
        }
        Err(error) => {
            tracing::warn!(symbol = %financials.symbol, code = error.code(), %error, "valuation failed");
            let data = serde_json::to_value(DcfResponseData::empty(Some(financials.symbol)))?;
            let envelope_error = EnvelopeError::new(error.code(), error.to_string())?
                .with_retryable(false)
                .with_source(ProviderId::Local);
            Ok(CommandResult::ok(data, source_chain)
                .with_error(envelope_error)
                .with_latency(latency_ms))
        }
    }
}

/// Resolves the company and loads its statements. Provider failures are
/// returned as data so they end up in the envelope.
async fn fetch(
    args: &DcfArgs,
    source: &StatementSource,
) -> Result<Result<CompanyFinancials, (Option<Symbol>, SourceError)>, CliError> {
    if let StatementSource::File(file) = source {
        return Ok(file.load().await.map_err(|error| (None, error)));
    }

    let symbol = match (&args.symbol, &args.company) {
        (Some(raw), _) => Symbol::parse(raw)?,
        (None, Some(name)) => resolve_company(name)?,
        (None, None) => {
            return Err(CliError::Command(String::from(
                "dcf needs a symbol, --company or --input",
            )))
        }
    };

    let request = StatementsRequest::for_valuation(symbol.clone());
    Ok(source
        .as_data_source()
        .financials(request)
        .await
        .map_err(|error| (Some(symbol), error)))
}
