//! Assumption resolution for `dcf`: defaults, then the assumptions
//! document, then individual flags.

use std::path::Path;

use ferrodcf_engine::Assumptions;
use serde::Deserialize;

use crate::cli::DcfArgs;
use crate::error::CliError;

/// Assumptions document. Rates are fractions, as the engine serializes them.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AssumptionsFile {
    growth_rate: Option<f64>,
    terminal_growth_rate: Option<f64>,
    discount_rate: Option<f64>,
    forecast_years: Option<u32>,
}

/// Flag overrides. Rates are percentages, as typed on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AssumptionFlags {
    pub growth_pct: Option<f64>,
    pub terminal_growth_pct: Option<f64>,
    pub discount_pct: Option<f64>,
    pub years: Option<u32>,
}

impl From<&DcfArgs> for AssumptionFlags {
    fn from(args: &DcfArgs) -> Self {
        Self {
            growth_pct: args.growth,
            terminal_growth_pct: args.terminal_growth,
            discount_pct: args.discount,
            years: args.years,
        }
    }
}

pub async fn resolve_assumptions(
    document: Option<&Path>,
    flags: AssumptionFlags,
) -> Result<Assumptions, CliError> {
    let file = match document {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path).await?;
            serde_json::from_str::<AssumptionsFile>(&raw)?
        }
        None => AssumptionsFile::default(),
    };
    merge(&Assumptions::default(), file, flags)
}

fn merge(
    defaults: &Assumptions,
    file: AssumptionsFile,
    flags: AssumptionFlags,
) -> Result<Assumptions, CliError> {
    let percent = |value: Option<f64>| value.map(|pct| pct / 100.0);

    let assumptions = Assumptions::new(
        percent(flags.growth_pct)
            .or(file.growth_rate)
            .unwrap_or(defaults.growth_rate()),
        percent(flags.terminal_growth_pct)
            .or(file.terminal_growth_rate)
            .unwrap_or(defaults.terminal_growth_rate()),
        percent(flags.discount_pct)
            .or(file.discount_rate)
            .unwrap_or(defaults.discount_rate()),
        flags
            .years
            .or(file.forecast_years)
            .unwrap_or(defaults.forecast_years()),
    )?;

    tracing::debug!(?assumptions, "resolved assumptions");
    Ok(assumptions)
}
