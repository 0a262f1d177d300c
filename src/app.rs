//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the tracing subscriber
//! - runs the analysis pipeline
//! - prints reports/plots and writes optional exports

use clap::Parser;

use crate::cli::{AnalyzeArgs, Command, EvalArgs};
use crate::domain::{AnalysisConfig, BasisKind, BasisSpec, SamplingStrategy};
use crate::error::AppError;

pub mod pipeline;

/// Number of interaction rows printed for `--sobol-order > 1`.
const TOP_INTERACTIONS: usize = 10;

/// Entry point for the `psobol` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `psobol` and `psobol --strategy random` behave like `psobol analyze ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    crate::logging::init_logging(cli.verbose);

    match cli.command {
        Command::Analyze(args) => handle_analyze(&args),
        Command::Eval(args) => handle_eval(&args),
    }
}

fn handle_analyze(args: &AnalyzeArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(args);
    let run = pipeline::run_analysis(&config)?;
    let names = run.surrogate.parameters().names();

    println!(
        "{}",
        crate::report::format_run_summary(&run.surrogate, &run.statistics, &config)
    );
    println!(
        "{}",
        crate::report::format_first_order(
            &names,
            &run.first_order,
            &run.total_order,
            run.reference.as_deref(),
        )
    );
    if let Some(table) = &run.higher_order {
        println!(
            "{}",
            crate::report::format_interactions(&names, table, TOP_INTERACTIONS)
        );
    }
    if let Some(v) = &run.validation {
        println!("{}", crate::report::format_validation(v));
    }

    if config.plot {
        let plot = crate::plot::render_sobol_bars(
            &names,
            &run.first_order.per_dimension_normalized(),
            config.plot_width,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_json {
        crate::io::write_surrogate_json(path, &run.surrogate)?;
        tracing::info!(path = %path.display(), "surrogate written");
    }
    if let Some(path) = &config.export_csv {
        let mut tables = vec![&run.first_order];
        if let Some(table) = &run.higher_order {
            tables.push(table);
        }
        crate::io::write_sobol_csv(path, &names, &tables)?;
        tracing::info!(path = %path.display(), "Sobol tables written");
    }

    Ok(())
}

fn handle_eval(args: &EvalArgs) -> Result<(), AppError> {
    let value = crate::models::piston(&args.point)?;
    println!("{value:.10}");
    Ok(())
}

pub fn analysis_config_from_args(args: &AnalyzeArgs) -> AnalysisConfig {
    let basis = match args.basis {
        BasisSpec::Total => BasisKind::TotalOrder,
        BasisSpec::Tensor => BasisKind::TensorGrid,
        BasisSpec::Hyperbolic => BasisKind::Hyperbolic { q: args.q },
    };

    AnalysisConfig {
        params_path: args.params.clone(),
        order: args.order,
        basis,
        strategy: SamplingStrategy::from_spec(args.strategy, args.seed),
        oversampling: args.oversampling,
        sobol_order: args.sobol_order,
        validate_points: args.validate,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        export_json: args.export_json.clone(),
        export_csv: args.export_csv.clone(),
        ..AnalysisConfig::default()
    }
}

/// Rewrite argv so `psobol` defaults to `psobol analyze`.
///
/// Rules:
/// - `psobol`                          -> `psobol analyze`
/// - `psobol --strategy random ...`    -> `psobol analyze --strategy random ...`
/// - `psobol -v eval ...`              -> unchanged (a subcommand is present)
/// - `psobol --help/--version/-h`      -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("analyze".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let has_subcommand = argv
        .iter()
        .skip(1)
        .any(|a| matches!(a.as_str(), "analyze" | "eval"));
    if has_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "analyze".to_string());
    }
    argv
}
