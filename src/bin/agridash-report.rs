//! AgriDash batch report generator
//!
//! Runs the same pipeline as the window, without the window: reads the
//! CSV, prints the dataset summary and renders every chart to a PNG.
//! Unlike the window, the first chart that cannot be built ends the run.

use agridash::charts::{chart_file_name, ChartFigure, StaticChartRenderer};
use agridash::data::{read_csv_path, Crop};
use agridash::report::{analyze, chart_slot_name, AnalysisOptions, AnalysisReport};
use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agridash-report")]
#[command(about = "Render district crop statistics charts to PNG files")]
#[command(version)]
struct Cli {
    /// District-year crop production CSV file
    csv: PathBuf,

    /// Directory the PNG charts are written to
    #[arg(long, default_value = "charts")]
    out_dir: PathBuf,

    /// Crop driving the state ranking, scatter pairs and correlation matrix
    #[arg(long, default_value = "RICE")]
    focus_crop: Crop,

    /// Also write the dataset summary as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Open the output directory when done
    #[arg(long)]
    show: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let df = read_csv_path(&cli.csv)?;
    info!(
        rows = df.height(),
        columns = df.width(),
        path = %cli.csv.display(),
        "table loaded"
    );
    println!("{}", df.head(Some(5)));

    let options = AnalysisOptions {
        focus_crop: cli.focus_crop,
        ..AnalysisOptions::default()
    };
    let AnalysisReport { summary, charts } = analyze(&df, &options)?;

    println!("{}", summary.render_table());

    // First failure ends the run
    let mut figures = Vec::with_capacity(charts.len());
    for (index, entry) in charts.into_iter().enumerate() {
        let figure = entry.with_context(|| {
            format!(
                "could not build chart {} ({})",
                index + 1,
                chart_slot_name(index)
            )
        })?;
        figures.push(figure);
    }

    for figure in &figures {
        if let ChartFigure::CorrelationMatrix(chart) = figure {
            let matrix = &chart.matrix;
            println!("{} (n = {})", chart.title, matrix.n);
            for (i, j) in matrix.upper_pairs() {
                let marker = if matrix.significant(i, j) { " *" } else { "" };
                println!(
                    "  {} / {}: r = {:.3}, p = {:.4}{}",
                    matrix.labels[i], matrix.labels[j], matrix.r[i][j], matrix.p[i][j], marker
                );
            }
        }
    }

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("could not create {}", cli.out_dir.display()))?;

    let written = figures
        .par_iter()
        .enumerate()
        .map(|(index, figure)| {
            let path = cli.out_dir.join(chart_file_name(index, figure));
            StaticChartRenderer::render_png(figure, &path)
                .with_context(|| format!("could not render {}", path.display()))?;
            Ok(path)
        })
        .collect::<Result<Vec<_>>>()?;

    for path in &written {
        info!(path = %path.display(), "chart written");
    }
    println!("Wrote {} charts to {}", written.len(), cli.out_dir.display());

    if let Some(json_path) = &cli.summary_json {
        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(json_path, json)
            .with_context(|| format!("could not write {}", json_path.display()))?;
        println!("Summary written to {}", json_path.display());
    }

    if cli.show {
        open::that(&cli.out_dir).context("could not open the output directory")?;
    }

    Ok(())
}
