//! Company name presets accepted by `dcf --company`.

use ferrodcf_core::Symbol;
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompanyPreset {
    pub name: &'static str,
    pub symbol: &'static str,
}

pub const COMPANY_PRESETS: &[CompanyPreset] = &[
    CompanyPreset { name: "MRF Ltd", symbol: "MRF.NS" },
    CompanyPreset { name: "Reliance Industries", symbol: "RELIANCE.NS" },
    CompanyPreset { name: "Tata Consultancy Services", symbol: "TCS.NS" },
    CompanyPreset { name: "HDFC Bank", symbol: "HDFCBANK.NS" },
    CompanyPreset { name: "Infosys", symbol: "INFY.NS" },
    CompanyPreset { name: "ITC Ltd", symbol: "ITC.NS" },
    CompanyPreset { name: "Apple Inc.", symbol: "AAPL" },
    CompanyPreset { name: "Microsoft", symbol: "MSFT" },
    CompanyPreset { name: "Google (Alphabet)", symbol: "GOOGL" },
    CompanyPreset { name: "Amazon", symbol: "AMZN" },
    CompanyPreset { name: "Tesla", symbol: "TSLA" },
    CompanyPreset { name: "Meta Platforms", symbol: "META" },
];

/// Case-insensitive lookup by preset name.
pub fn resolve_company(name: &str) -> Result<Symbol, CliError> {
    let wanted = name.trim();
    let preset = COMPANY_PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| {
            CliError::Command(format!(
                "unknown company '{wanted}'; run 'ferrodcf companies' for the list"
            ))
        })?;

    Ok(Symbol::parse(preset.symbol)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_symbol_is_valid() {
        for preset in COMPANY_PRESETS {
            assert!(Symbol::parse(preset.symbol).is_ok(), "{}", preset.symbol);
        }
    }

    #[test]
    fn lookup_ignores_case_and_padding() {
        let symbol = resolve_company("  tata consultancy services ").expect("known preset");
        assert_eq!(symbol.as_str(), "TCS.NS");
    }

    #[test]
    fn unknown_company_is_a_command_error() {
        let error = resolve_company("Initech").expect_err("must fail");
        assert_eq!(error.exit_code(), 2);
    }
}
