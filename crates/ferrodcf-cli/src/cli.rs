//! CLI argument definitions for ferrodcf.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dcf` | Discounted cash flow valuation of one company |
//! | `statements` | Income, balance sheet and cash flow statements |
//! | `companies` | Built-in company name presets |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, ndjson, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--source` | `yahoo` | Statement provider (yahoo, mock) |
//! | `--timeout-ms` | `10000` | Request timeout in ms |
//! | `--unit` | `raw` | Amount scaling for table output |
//! | `--log-level` | `warn` | Log level, overridden by `FERRODCF_LOG`/`RUST_LOG` |
//! | `--log-format` | `pretty` | Log format on stderr (pretty, json) |
//!
//! # Examples
//!
//! ```bash
//! ferrodcf dcf MRF.NS --growth 12 --discount 11 --years 7
//! ferrodcf dcf --company "Tata Consultancy Services" --format table --unit crore
//! ferrodcf dcf --input statements.json --missing-balance skip-equity
//! ferrodcf statements AAPL --kind cash-flow --pretty
//! ```

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use ferrodcf_core::StatementKind;
use ferrodcf_engine::MissingBalancePolicy;

use crate::units::DisplayUnit;

/// Discounted cash flow valuation from published financial statements.
#[derive(Debug, Parser)]
#[command(
    name = "ferrodcf",
    author,
    version,
    about = "Discounted cash flow valuation CLI",
    long_about = "ferrodcf fetches a company's cash flow statement and balance sheet, \
projects free cash flow and discounts it to an enterprise value and a fair value per share.\n\
\n\
Use 'ferrodcf <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Statement provider.
    #[arg(long, global = true, value_enum, default_value_t = SourceSelector::Yahoo)]
    pub source: SourceSelector,

    /// Request timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Scale amounts in table output (JSON is always raw).
    #[arg(long, global = true, value_enum, default_value_t = DisplayUnit::Raw)]
    pub unit: DisplayUnit,

    /// Log level written to stderr.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Log line format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables.
    Table,
    /// Single JSON object output.
    Json,
    /// Newline-delimited JSON.
    Ndjson,
}

/// Statement provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelector {
    /// Yahoo Finance fundamentals timeseries over HTTPS.
    Yahoo,
    /// Deterministic offline statements, no network access.
    Mock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Value a company with a discounted cash flow model.
    ///
    /// Assumptions start from the defaults (10% growth, 4% terminal growth,
    /// 10% discount rate, 5 years), are overridden by `--assumptions` and
    /// then by the individual flags.
    ///
    /// # Examples
    ///
    ///   ferrodcf dcf MRF.NS
    ///   ferrodcf dcf --company "Apple Inc." --growth 8 --years 10
    ///   ferrodcf dcf --input mrf.json --assumptions bear.json
    Dcf(DcfArgs),

    /// Show a company's financial statements.
    ///
    /// # Examples
    ///
    ///   ferrodcf statements TCS.NS
    ///   ferrodcf statements AAPL --kind income --kind cash-flow --format table
    Statements(StatementsArgs),

    /// List the built-in company name presets accepted by `dcf --company`.
    Companies,
}

/// Arguments for the `dcf` command.
#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("company_source")
        .required(true)
        .args(["symbol", "company", "input"])
))]
pub struct DcfArgs {
    /// Market symbol, e.g. MRF.NS or AAPL.
    pub symbol: Option<String>,

    /// Company name from `ferrodcf companies`.
    #[arg(long)]
    pub company: Option<String>,

    /// Statements document (JSON) to value instead of fetching.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Assumptions document (JSON, rates as fractions).
    #[arg(long)]
    pub assumptions: Option<PathBuf>,

    /// Near-term FCF growth rate in percent [0, 20].
    #[arg(long)]
    pub growth: Option<f64>,

    /// Terminal growth rate in percent [0, 10].
    #[arg(long)]
    pub terminal_growth: Option<f64>,

    /// Discount rate (WACC) in percent [0, 20].
    #[arg(long)]
    pub discount: Option<f64>,

    /// Forecast horizon in years [3, 10].
    #[arg(long)]
    pub years: Option<u32>,

    /// How to treat a missing cash or debt figure.
    #[arg(long, value_enum, default_value_t = BalancePolicyArg::AssumeZero)]
    pub missing_balance: BalancePolicyArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BalancePolicyArg {
    /// Count missing cash or debt as zero.
    AssumeZero,
    /// Skip the per-share value and warn.
    SkipEquity,
}

impl From<BalancePolicyArg> for MissingBalancePolicy {
    fn from(value: BalancePolicyArg) -> Self {
        match value {
            BalancePolicyArg::AssumeZero => Self::AssumeZero,
            BalancePolicyArg::SkipEquity => Self::SkipEquity,
        }
    }
}

/// Arguments for the `statements` command.
#[derive(Debug, Args)]
pub struct StatementsArgs {
    /// Market symbol.
    pub symbol: String,

    /// Statements to include; repeat for several. Defaults to all.
    #[arg(long, value_enum)]
    pub kind: Vec<StatementKindArg>,

    /// Statements document (JSON) to read instead of fetching.
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatementKindArg {
    Income,
    Balance,
    CashFlow,
}

impl From<StatementKindArg> for StatementKind {
    fn from(value: StatementKindArg) -> Self {
        match value {
            StatementKindArg::Income => Self::Income,
            StatementKindArg::Balance => Self::BalanceSheet,
            StatementKindArg::CashFlow => Self::CashFlow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn dcf_requires_exactly_one_company_source() {
        assert!(Cli::try_parse_from(["ferrodcf", "dcf"]).is_err());
        assert!(
            Cli::try_parse_from(["ferrodcf", "dcf", "MRF.NS", "--company", "Infosys"]).is_err()
        );
        assert!(Cli::try_parse_from(["ferrodcf", "dcf", "--company", "Infosys"]).is_ok());
    }

    #[test]
    fn percent_flags_parse() {
        let cli = Cli::try_parse_from([
            "ferrodcf",
            "dcf",
            "AAPL",
            "--growth",
            "12.5",
            "--years",
            "7",
            "--missing-balance",
            "skip-equity",
        ])
        .expect("valid arguments");

        let Command::Dcf(args) = cli.command else {
            panic!("expected dcf command");
        };
        assert_eq!(args.growth, Some(12.5));
        assert_eq!(args.years, Some(7));
        assert_eq!(
            MissingBalancePolicy::from(args.missing_balance),
            MissingBalancePolicy::SkipEquity
        );
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "ferrodcf",
            "statements",
            "TCS.NS",
            "--kind",
            "cash-flow",
            "--unit",
            "crore",
            "--source",
            "mock",
        ])
        .expect("valid arguments");

        assert_eq!(cli.unit, DisplayUnit::Crore);
        assert_eq!(cli.source, SourceSelector::Mock);
    }
}
