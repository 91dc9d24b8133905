use std::path::{Path, PathBuf};

use crate::data_source::{DataSource, SourceError, SourceFuture, StatementsRequest};
use crate::{CompanyFinancials, ProviderId, StatementKind};

/// Serves statements from a `CompanyFinancials` JSON document on disk.
///
/// The document is re-read on every call so edits are picked up between
/// runs of a long-lived process.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and validates the whole document.
    pub async fn load(&self) -> Result<CompanyFinancials, SourceError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|error| match error.kind() {
                std::io::ErrorKind::NotFound => SourceError::not_found(format!(
                    "statements file '{}' does not exist",
                    self.path.display()
                )),
                _ => SourceError::unavailable(format!(
                    "failed to read '{}': {error}",
                    self.path.display()
                )),
            })?;

        serde_json::from_str(&raw).map_err(|error| {
            SourceError::invalid_request(format!(
                "'{}' is not a valid statements document: {error}",
                self.path.display()
            ))
        })
    }
}

impl DataSource for FileSource {
    fn id(&self) -> ProviderId {
        ProviderId::File
    }

    fn financials<'a>(&'a self, req: StatementsRequest) -> SourceFuture<'a, CompanyFinancials> {
        Box::pin(async move {
            let mut financials = self.load().await?;
            if financials.symbol != req.symbol {
                return Err(SourceError::not_found(format!(
                    "'{}' holds statements for {}, not {}",
                    self.path.display(),
                    financials.symbol,
                    req.symbol
                )));
            }

            tracing::debug!(path = %self.path.display(), symbol = %req.symbol, "loaded statements file");
            if !req.wants(StatementKind::BalanceSheet) {
                financials.balance_sheet = None;
            }
            if !req.wants(StatementKind::Income) {
                financials.income = None;
            }
            Ok(financials)
        })
    }
}
