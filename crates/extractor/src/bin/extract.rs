use anyhow::Context;
use clap::Parser;
use extractor::{
    ConvertOptions, Converter, EndMarkerPolicy, ParseOptions, RecordTemplate, TemplateValidator,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "extract")]
#[command(about = "Converts the SEC 13(f) securities list PDF into CSV", long_about = None)]
#[command(version)]
struct Cli {
    /// Securities list PDF
    input: PathBuf,

    /// CSV file to write
    output: PathBuf,

    /// Zero-based index of the first data page
    #[arg(long, env = "EXTRACT_START_PAGE")]
    start_page: Option<usize>,

    /// JSON file overriding the default record layout
    #[arg(long, env = "EXTRACT_TEMPLATE")]
    template: Option<PathBuf>,

    /// Skip data lines shorter than the CUSIP column instead of failing
    #[arg(long)]
    lenient: bool,

    /// Ignore every line after the first end marker
    #[arg(long)]
    stop_at_end_marker: bool,

    /// Keep the intermediate .data text file
    #[arg(long)]
    keep_data_file: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("extract={},extractor={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let template = load_template(&cli)?;

    let options = ConvertOptions {
        parse: ParseOptions {
            end_marker: if cli.stop_at_end_marker {
                EndMarkerPolicy::Stop
            } else {
                EndMarkerPolicy::Skip
            },
            lenient: cli.lenient,
        },
        keep_data_file: cli.keep_data_file,
    };

    tracing::info!(
        "Converting {} -> {}",
        cli.input.display(),
        cli.output.display()
    );

    let report = Converter::new(template, options)
        .convert(&cli.input, &cli.output)
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    tracing::info!(
        "✓ Wrote {} records to {}",
        report.parse.records_written,
        cli.output.display()
    );

    Ok(())
}

fn load_template(cli: &Cli) -> anyhow::Result<RecordTemplate> {
    let mut template = match &cli.template {
        Some(path) => RecordTemplate::from_json_file(path)
            .with_context(|| format!("Failed to load template {}", path.display()))?,
        None => RecordTemplate::sec_13f(),
    };

    if let Some(start_page) = cli.start_page {
        template = template.with_start_page(start_page);
    }

    let report = TemplateValidator::validate(&template).context("Invalid record template")?;
    report.log_warnings();

    Ok(template)
}
