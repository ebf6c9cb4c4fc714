use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use chatbot_scanner::config::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use chatbot_scanner::report::format_csv;
use chatbot_scanner::{
    load_urls, write_full_report, write_report, BatchRunner, ScanConfig, Signatures,
    DEFAULT_REPORT_PATH,
};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "chatbot-scanner")]
#[command(about = "Detect live-chat widgets across a list of websites", long_about = None)]
struct Args {
    /// CSV or Excel file with one URL per row in the first column (no header)
    #[arg(required = true)]
    input: PathBuf,

    /// Where to write the CSV report of URLs with a chatbot
    #[arg(short, long, default_value = DEFAULT_REPORT_PATH)]
    output: PathBuf,

    /// Also write every classification (including negatives) as JSON
    #[arg(long)]
    full_report: Option<PathBuf>,

    /// Maximum number of pages fetched at once
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Custom user agent
    #[arg(short, long)]
    user_agent: Option<String>,

    /// Proxy URL (e.g., http://proxy.example.com:8080)
    #[arg(short, long)]
    proxy: Option<String>,

    /// JSON file with custom "keywords" and "element_tags"
    #[arg(short, long)]
    signatures: Option<PathBuf>,

    /// Result listing format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (no result listing)
    #[arg(short, long)]
    quiet: bool,
}

/// How the URLs with a chatbot are listed on stdout
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    let log_level = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    log::info!("🚀 Chatbot Scanner v{}", env!("CARGO_PKG_VERSION"));

    let signatures = match &args.signatures {
        Some(path) => {
            log::info!("Using signatures from {}", path.display());
            Signatures::from_path(path)?
        }
        None => Signatures::default(),
    };

    let config = ScanConfig {
        concurrency: args.concurrency,
        timeout: Duration::from_secs(args.timeout),
        user_agent: args
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        proxy: args.proxy.clone(),
    };
    let runner = BatchRunner::from_config(&config, &signatures)?;

    // A bad upload degrades to an empty list and an empty report
    let urls = load_urls(&args.input);
    if urls.is_empty() {
        log::warn!("No URLs found in {}", args.input.display());
    }

    let results = runner.run(urls).await;
    let positives = results.positive_urls();

    write_report(&args.output, &positives)?;
    if let Some(path) = &args.full_report {
        write_full_report(path, &results)?;
    }

    if !args.quiet {
        print_results(&positives, args.format)?;
    }

    log::info!(
        "✅ Found {} of {} site(s) with a chatbot",
        positives.len(),
        results.len()
    );
    Ok(())
}

/// Print the URLs with a chatbot in the requested format
fn print_results(urls: &[&str], format: OutputFormat) -> Result<()> {
    println!("{}", render_results(urls, format)?.trim_end());
    Ok(())
}

fn render_results(urls: &[&str], format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(urls)?,
        OutputFormat::Csv => format_csv(urls)?,
        OutputFormat::Text => format_text(urls),
    })
}

fn format_text(urls: &[&str]) -> String {
    let mut output = format!("URLs with chatbots ({}):\n", urls.len());
    if urls.is_empty() {
        output.push_str("  (none)\n");
    }
    for url in urls {
        output.push_str(&format!("  - {}\n", url));
    }
    output
}
