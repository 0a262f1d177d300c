//! Command-line parsing for the piston Sobol analysis.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::domain::{BasisSpec, StrategySpec};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "psobol",
    version,
    about = "Sobol sensitivity of the piston model via least-squares polynomial chaos"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the surrogate, print moments and Sobol indices, and optionally plot/export.
    Analyze(AnalyzeArgs),
    /// Evaluate the piston cycle time at a single point.
    Eval(EvalArgs),
}

/// Options for a full analysis.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Design selection strategy.
    #[arg(long, value_enum, default_value_t = StrategySpec::Qr)]
    pub strategy: StrategySpec,

    /// Design points per basis term.
    #[arg(long, default_value_t = 1.0)]
    pub oversampling: f64,

    /// Seed for the random strategy.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Polynomial order for every parameter (defaults to the parameter file, or 3).
    #[arg(long)]
    pub order: Option<usize>,

    /// Multi-index set.
    #[arg(long, value_enum, default_value_t = BasisSpec::Total)]
    pub basis: BasisSpec,

    /// Exponent for the hyperbolic basis (0 < q <= 1).
    #[arg(long, default_value_t = 0.5)]
    pub q: f64,

    /// Also report Sobol indices of this interaction order (1 = first order only).
    #[arg(long, default_value_t = 1)]
    pub sobol_order: usize,

    /// Parameter JSON overriding the default piston bounds.
    #[arg(long, value_name = "JSON")]
    pub params: Option<PathBuf>,

    /// Compare surrogate and model on this many random points (0 disables).
    #[arg(long, default_value_t = 0)]
    pub validate: usize,

    /// Render an ASCII bar chart of the first-order indices (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the bar chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Bar chart width (columns).
    #[arg(long, default_value_t = 50)]
    pub width: usize,

    /// Export the fitted surrogate to JSON.
    #[arg(long = "export-json", value_name = "PATH")]
    pub export_json: Option<PathBuf>,

    /// Export the Sobol tables to CSV.
    #[arg(long = "export-csv", value_name = "PATH")]
    pub export_csv: Option<PathBuf>,
}

/// Inputs for a single model evaluation, in model order.
#[derive(Debug, Parser)]
pub struct EvalArgs {
    /// M S V0 k P0 Ta T0
    #[arg(
        required = true,
        num_args = 7,
        value_names = ["M", "S", "V0", "K", "P0", "TA", "T0"],
        allow_negative_numbers = true
    )]
    pub point: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_defaults() {
        let cli = Cli::parse_from(["psobol", "analyze"]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.strategy, StrategySpec::Qr);
        assert_eq!(args.oversampling, 1.0);
        assert_eq!(args.basis, BasisSpec::Total);
        assert_eq!(args.sobol_order, 1);
        assert!(args.plot && !args.no_plot);
    }

    #[test]
    fn eval_takes_seven_numbers() {
        let cli = Cli::parse_from([
            "psobol", "eval", "45", "0.0125", "0.006", "3000", "100000", "293", "350",
        ]);
        let Command::Eval(args) = cli.command else {
            panic!("expected eval");
        };
        assert_eq!(args.point.len(), 7);
        assert!(Cli::try_parse_from(["psobol", "eval", "1", "2"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::parse_from(["psobol", "-vv", "analyze"]);
        assert_eq!(cli.verbose, 2);
    }
}
