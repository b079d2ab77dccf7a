//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes tracing
//! - parses CLI arguments
//! - loads the snapshot history (CSV / remote API / synthetic sample)
//! - builds both return series
//! - prints reports/plots
//! - writes optional exports and charts

use clap::Parser;

use crate::cli::{ChartArgs, Command, PlotArgs};
use crate::domain::{RunConfig, SeriesKind, SolverParams};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `xirr` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    // We want a bare `xirr` (or `xirr --csv data.csv`) to behave like
    // `xirr chart ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the convenient default.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Chart(args) => handle_chart(args, OutputMode::Full),
        Command::Summary(args) => handle_chart(args, OutputMode::SummaryOnly),
        Command::Plot(args) => handle_plot(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    SummaryOnly,
}

fn handle_chart(args: ChartArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_chart(&config)?;

    println!(
        "{}",
        crate::report::format_summary(&run.stats, &run.annualized.points, &run.cumulative)
    );

    if mode == OutputMode::Full {
        println!(
            "{}",
            crate::report::format_series_table(&run.annualized.points, SeriesKind::Annualized)
        );
        println!(
            "{}",
            crate::report::format_series_table(&run.cumulative, SeriesKind::Cumulative)
        );

        if !run.annualized.failures.is_empty() {
            println!("{}", crate::report::format_failures(&run.annualized.failures));
        }

        if config.plot {
            println!(
                "{}",
                crate::plot::render_series_plot(
                    &run.annualized.points,
                    SeriesKind::Annualized,
                    config.plot_width,
                    config.plot_height,
                )
            );
            println!(
                "{}",
                crate::plot::render_series_plot(
                    &run.cumulative,
                    SeriesKind::Cumulative,
                    config.plot_width,
                    config.plot_height,
                )
            );
        }
    }

    // Optional exports.
    if let Some(path) = &config.export_csv {
        crate::io::export::write_series_csv(path, &run.annualized.points, &run.cumulative)?;
    }
    if let Some(path) = &config.export_series {
        crate::io::series::write_series_json(
            path,
            &run.annualized.points,
            &run.cumulative,
            &config.solver,
        )?;
    }
    if let Some(path) = &config.chart_annualized {
        crate::plot::render_series_png(path, &run.annualized.points, SeriesKind::Annualized, 1200, 700)?;
    }
    if let Some(path) = &config.chart_cumulative {
        crate::plot::render_series_png(path, &run.cumulative, SeriesKind::Cumulative, 1200, 700)?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::series::read_series_json(&args.series)?;
    let points = match args.kind {
        SeriesKind::Annualized => &file.annualized,
        SeriesKind::Cumulative => &file.cumulative,
    };

    println!(
        "{}",
        crate::plot::render_series_plot(points, args.kind, args.width, args.height)
    );
    Ok(())
}

pub fn run_config_from_args(args: &ChartArgs) -> RunConfig {
    RunConfig {
        csv_path: args.csv.clone(),
        remote: args.remote,
        account: args.account.clone(),
        from: args.from,
        to: args.to,
        sample_days: args.sample_days,
        sample_seed: args.seed,
        sample_start: args.sample_start,
        solver: SolverParams {
            initial_guess: args.guess,
            tolerance: args.tolerance,
            max_iterations: args.max_iterations,
            min_rate: args.min_rate,
            max_rate: args.max_rate,
            ..SolverParams::default()
        },
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_csv: args.export.clone(),
        export_series: args.export_series.clone(),
        chart_annualized: args.chart.clone(),
        chart_cumulative: args.chart_cumulative.clone(),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Rewrite argv so `xirr` defaults to `xirr chart`.
///
/// Rules:
/// - `xirr`                     -> `xirr chart`
/// - `xirr --csv data.csv ...`  -> `xirr chart --csv data.csv ...`
/// - `xirr --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("chart".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "chart" | "summary" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "chart flags".
    if arg1.starts_with('-') {
        argv.insert(1, "chart".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
