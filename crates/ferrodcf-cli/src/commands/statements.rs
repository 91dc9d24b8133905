use std::time::Instant;

use ferrodcf_core::{CompanyFinancials, EnvelopeError, StatementKind, StatementsRequest, Symbol};
use serde::Serialize;

use crate::cli::StatementsArgs;
use crate::error::CliError;
use crate::output::TableView;

use super::{CommandResult, StatementSource};

#[derive(Debug, Serialize)]
struct StatementsResponseData {
    symbol: Symbol,
    financials: Option<CompanyFinancials>,
}

pub async fn run(
    args: &StatementsArgs,
    source: &StatementSource,
) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let kinds: Vec<StatementKind> = if args.kind.is_empty() {
        StatementKind::ALL.to_vec()
    } else {
        args.kind.iter().copied().map(StatementKind::from).collect()
    };
    let request = StatementsRequest::new(symbol.clone(), kinds)
        .map_err(|error| CliError::Command(error.to_string()))?;

    let started = Instant::now();
    let result = source.as_data_source().financials(request).await;
    let latency_ms = started.elapsed().as_millis() as u64;
    let source_chain = vec![source.id()];

    match result {
        Ok(financials) => {
            let data = serde_json::to_value(StatementsResponseData {
                symbol,
                financials: Some(financials.clone()),
            })?;
            Ok(CommandResult::ok(data, source_chain)
                .with_latency(latency_ms)
                .with_view(TableView::Statements(Box::new(financials))))
        }
        Err(error) => {
            let data = serde_json::to_value(StatementsResponseData {
                symbol,
                financials: None,
            })?;
            Ok(CommandResult::ok(data, source_chain)
                .with_error(EnvelopeError::from_source_error(&error, source.id()))
                .with_latency(latency_ms))
        }
    }
}
