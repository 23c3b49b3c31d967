//! report-paginate - lay out a report job onto pages from the command line

mod job;
mod render;

use anyhow::Context;
use clap::Parser;
use job::ReportJob;
use render::TextRenderer;
use report_layout::{
    export_file_name, export_pages, FixedMeasurements, PaginateOptions, ReportPipeline,
    SettingsManager,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "report-paginate", about = "Paginate report rows onto A4 pages")]
struct Args {
    /// Report job file (JSON)
    job: PathBuf,
    /// Start a new page whenever the row group changes
    #[arg(long)]
    grouped: bool,
    /// Directory holding report-settings.json
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Print page descriptors as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn run(args: Args) -> anyhow::Result<()> {
    let job = ReportJob::load(&args.job)
        .with_context(|| format!("failed to read job {}", args.job.display()))?;

    let settings = match &args.settings {
        Some(dir) => {
            let mut manager = SettingsManager::new(dir);
            manager.load_sync()?.clone()
        }
        None => Default::default(),
    };

    let fallback = settings.fallback_geometry();
    if let Err(e) = fallback.validate() {
        tracing::warn!("{}", e);
    }

    let options = PaginateOptions {
        grouped: args.grouped || job.grouped,
    };
    let rows = job.layout_rows();
    let mut provider = FixedMeasurements::new(job.measurements.clone());
    let output = ReportPipeline::new(options).run(&rows, &fallback, &mut provider);

    tracing::info!(
        report = %job.report_name,
        rows = rows.len(),
        pages = output.pages.len(),
        "report paginated"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output.pages)?);
    } else {
        for page in export_pages(&output.pages, &mut TextRenderer)? {
            print!("{page}");
        }
    }

    println!("{}", export_file_name(&job.report_name, job.date_from, job.date_to));
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
