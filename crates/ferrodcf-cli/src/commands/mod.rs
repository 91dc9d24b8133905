mod companies;
mod dcf;
mod statements;

use std::sync::Arc;

use ferrodcf_core::{
    DataSource, Envelope, EnvelopeError, FileSource, HttpClient, NoopHttpClient, ProviderId,
    ReqwestHttpClient, YahooAdapter,
};
use serde_json::Value;

use crate::cli::{Cli, Command, SourceSelector};
use crate::error::CliError;
use crate::metadata::Metadata;
use crate::output::{CommandOutput, TableView};

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
    pub source_chain: Vec<ProviderId>,
    pub view: Option<TableView>,
}

impl CommandResult {
    pub fn ok(data: Value, source_chain: Vec<ProviderId>) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
            source_chain,
            view: None,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_error(mut self, error: EnvelopeError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_view(mut self, view: TableView) -> Self {
        self.view = Some(view);
        self
    }
}

/// Where a command reads statements from.
pub enum StatementSource {
    Yahoo(YahooAdapter),
    File(FileSource),
}

impl StatementSource {
    fn for_cli(cli: &Cli) -> Self {
        let http_client: Arc<dyn HttpClient> = match cli.source {
            SourceSelector::Yahoo => Arc::new(ReqwestHttpClient::new()),
            SourceSelector::Mock => Arc::new(NoopHttpClient),
        };
        Self::Yahoo(
            YahooAdapter::with_http_client(http_client, YahooAdapter::auth_from_env())
                .with_timeout_ms(cli.timeout_ms),
        )
    }

    pub fn id(&self) -> ProviderId {
        match self {
            Self::Yahoo(_) => ProviderId::Yahoo,
            Self::File(_) => ProviderId::File,
        }
    }

    pub fn as_data_source(&self) -> &dyn DataSource {
        match self {
            Self::Yahoo(adapter) => adapter,
            Self::File(source) => source,
        }
    }
}

pub async fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    let command_name = match &cli.command {
        Command::Dcf(_) => "dcf",
        Command::Statements(_) => "statements",
        Command::Companies => "companies",
    };
    tracing::info!(command = command_name, source = ?cli.source, "command started");

    let command_result = match &cli.command {
        Command::Dcf(args) => {
            let source = match &args.input {
                Some(path) => StatementSource::File(FileSource::new(path)),
                None => StatementSource::for_cli(cli),
            };
            dcf::run(args, &source).await?
        }
        Command::Statements(args) => {
            let source = match &args.input {
                Some(path) => StatementSource::File(FileSource::new(path)),
                None => StatementSource::for_cli(cli),
            };
            statements::run(args, &source).await?
        }
        Command::Companies => companies::run()?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
        latency_ms,
        source_chain,
        view,
    } = command_result;

    tracing::info!(
        command = command_name,
        latency_ms,
        warnings = warnings.len(),
        errors = errors.len(),
        "command finished"
    );

    let mut metadata = Metadata::new(source_chain, latency_ms)?;
    for warning in warnings {
        metadata.push_warning(warning);
    }
    let meta = metadata.into_envelope_meta()?;

    let envelope = Envelope::with_errors(meta, data, errors)?;
    Ok(CommandOutput { envelope, view })
}
