use std::io::Write;
use std::sync::Arc;

use ferrodcf_core::{
    CompanyFinancials, DataSource, FileSource, LineItem, ProviderId, SourceErrorKind,
    StatementKind, StatementsRequest, Symbol, YahooAdapter,
};

struct ProviderCase {
    id: ProviderId,
    source: Arc<dyn DataSource>,
    // Keeps the backing document alive for file-backed cases.
    _document: Option<tempfile::NamedTempFile>,
}

fn symbol() -> Symbol {
    Symbol::parse("MRF.NS").expect("valid symbol")
}

async fn provider_cases() -> Vec<ProviderCase> {
    let yahoo = YahooAdapter::default();
    let snapshot = yahoo
        .financials(StatementsRequest::for_valuation(symbol()))
        .await
        .expect("mock yahoo statements");

    let mut document = tempfile::NamedTempFile::new().expect("temp file");
    document
        .write_all(
            serde_json::to_string(&snapshot)
                .expect("statements serialize")
                .as_bytes(),
        )
        .expect("write statements");
    let file_source = FileSource::new(document.path());

    vec![
        ProviderCase {
            id: ProviderId::Yahoo,
            source: Arc::new(yahoo),
            _document: None,
        },
        ProviderCase {
            id: ProviderId::File,
            source: Arc::new(file_source),
            _document: Some(document),
        },
    ]
}

#[tokio::test]
async fn every_provider_reports_its_identifier() {
    for case in provider_cases().await {
        assert_eq!(case.source.id(), case.id);
    }
}

#[tokio::test]
async fn valuation_request_returns_all_statements_for_all_providers() {
    for case in provider_cases().await {
        let financials = case
            .source
            .financials(StatementsRequest::for_valuation(symbol()))
            .await
            .unwrap_or_else(|error| panic!("provider '{}' failed: {error}", case.id));

        assert_eq!(financials.symbol, symbol(), "provider '{}': symbol", case.id);
        assert_eq!(financials.currency.len(), 3, "provider '{}': currency", case.id);
        for kind in StatementKind::ALL {
            assert!(
                financials.statement(kind).is_some(),
                "provider '{}': missing {kind}",
                case.id
            );
        }
    }
}

#[tokio::test]
async fn statement_rows_respect_placement_and_ordering() {
    for case in provider_cases().await {
        let financials = case
            .source
            .financials(StatementsRequest::for_valuation(symbol()))
            .await
            .unwrap_or_else(|error| panic!("provider '{}' failed: {error}", case.id));

        for kind in StatementKind::ALL {
            let Some(statement) = financials.statement(kind) else {
                continue;
            };
            for row in statement.rows() {
                assert_eq!(row.item().statement(), kind, "provider '{}'", case.id);
                let periods: Vec<_> = row.periods().collect();
                assert!(
                    periods.windows(2).all(|pair| pair[0] > pair[1]),
                    "provider '{}': {} not most-recent-first",
                    case.id,
                    row.item()
                );
            }
        }
    }
}

#[tokio::test]
async fn cash_flow_only_request_omits_other_statements() {
    for case in provider_cases().await {
        let request = StatementsRequest::new(symbol(), vec![StatementKind::CashFlow])
            .expect("valid request");
        let financials = case
            .source
            .financials(request)
            .await
            .unwrap_or_else(|error| panic!("provider '{}' failed: {error}", case.id));

        assert!(financials.balance_sheet.is_none(), "provider '{}'", case.id);
        assert!(financials.income.is_none(), "provider '{}'", case.id);
        assert!(
            financials.series(LineItem::OperatingCashFlow).is_some(),
            "provider '{}'",
            case.id
        );
    }
}

#[tokio::test]
async fn providers_agree_on_the_same_snapshot() {
    let mut snapshots: Vec<CompanyFinancials> = Vec::new();
    for case in provider_cases().await {
        snapshots.push(
            case.source
                .financials(StatementsRequest::for_valuation(symbol()))
                .await
                .unwrap_or_else(|error| panic!("provider '{}' failed: {error}", case.id)),
        );
    }

    let reference = &snapshots[0];
    for snapshot in snapshots.iter().skip(1) {
        assert_eq!(snapshot.currency, reference.currency);
        assert_eq!(snapshot.shares_outstanding, reference.shares_outstanding);
        for item in [LineItem::OperatingCashFlow, LineItem::CapitalExpenditure] {
            let expected = reference.series(item).expect("reference row");
            let actual = snapshot.series(item).expect("snapshot row");
            assert_eq!(actual.len(), expected.len());
            for (a, e) in actual.points().iter().zip(expected.points()) {
                assert_eq!(a.period, e.period);
                assert!((a.value - e.value).abs() <= e.value.abs() * 1e-12);
            }
        }
    }
}

#[tokio::test]
async fn unknown_company_is_not_found_for_file_provider() {
    let cases = provider_cases().await;
    let file = cases
        .iter()
        .find(|case| case.id == ProviderId::File)
        .expect("file case");

    let request =
        StatementsRequest::for_valuation(Symbol::parse("TCS.NS").expect("valid symbol"));
    let error = file
        .source
        .financials(request)
        .await
        .expect_err("must fail");
    assert_eq!(error.kind(), SourceErrorKind::NotFound);
}
