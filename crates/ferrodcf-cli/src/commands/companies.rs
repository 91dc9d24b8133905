use ferrodcf_core::ProviderId;
use serde::Serialize;

use crate::error::CliError;
use crate::output::TableView;
use crate::presets::{CompanyPreset, COMPANY_PRESETS};

use super::CommandResult;

#[derive(Debug, Serialize)]
struct CompaniesResponseData {
    companies: &'static [CompanyPreset],
}

pub fn run() -> Result<CommandResult, CliError> {
    let data = serde_json::to_value(CompaniesResponseData {
        companies: COMPANY_PRESETS,
    })?;
    Ok(CommandResult::ok(data, vec![ProviderId::Local]).with_view(TableView::Companies))
}
