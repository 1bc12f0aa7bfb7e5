use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use jobharvest_core::report::{
    ReportEntry, ReportFormat, generate_json_report, generate_text_report, save_report,
};
use jobharvest_core::{
    ExtractionError, ExtractionOrchestrator, ExtractionRequest, OrchestratorConfig,
    SyntheticFallbackGenerator,
};
use jobharvest_scanner::{CrawlConfig, RemoteRenderConfig};
use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use url::Url;

pub const API_KEY_ENV: &str = "JOBHARVEST_RENDER_API_KEY";

/// Load and parse URLs from a file, skipping blank lines and `#` comments
pub fn load_urls_from_file(path: &PathBuf) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read hosts file {}: {}", path.display(), e))?;

    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_url_line)
        .collect();

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Parse a single line as a URL, trying https:// if it has no scheme
pub fn parse_url_line(line: &str) -> Option<String> {
    if let Ok(url) = Url::parse(line)
        && url.has_host()
    {
        return Some(line.to_string());
    }

    let with_scheme = format!("https://{}", line);
    if Url::parse(&with_scheme).is_ok() && !line.contains(char::is_whitespace) {
        return Some(with_scheme);
    }

    warn!(line = %line, "Skipping invalid URL");
    None
}

/// The `--api-key` flag wins over the environment; blank keys count as absent
pub fn resolve_api_key(flag: Option<&str>, env: Option<String>) -> Option<String> {
    flag.map(str::to_string)
        .or(env)
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

/// Everything `extract` needs, gathered from flags and the environment
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub urls: Vec<String>,
    pub remote: Option<RemoteRenderConfig>,
    pub crawl: CrawlConfig,
    pub orchestrator: OrchestratorConfig,
    pub seed: Option<u64>,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
}

pub fn build_extract_options(args: &ArgMatches) -> anyhow::Result<ExtractOptions> {
    let urls = match (args.get_one::<PathBuf>("hosts-file"), args.get_one::<Url>("url")) {
        (Some(path), _) => load_urls_from_file(path).map_err(anyhow::Error::msg)?,
        (None, Some(url)) => vec![url.to_string()],
        (None, None) => bail!("Either --url or --hosts-file must be provided"),
    };

    let seconds = |name: &str| {
        args.get_one::<u64>(name)
            .copied()
            .map(Duration::from_secs)
            .with_context(|| format!("missing --{}", name))
    };

    let api_key = resolve_api_key(
        args.get_one::<String>("api-key").map(String::as_str),
        std::env::var(API_KEY_ENV).ok(),
    );
    let remote = api_key
        .map(|key| RemoteRenderConfig::new(key).with_autoparse(args.get_flag("autoparse")));

    let mut crawl = CrawlConfig::default().with_request_delay(seconds("delay")?);
    if let Some(dir) = args.get_one::<PathBuf>("capture-dir") {
        crawl = crawl.with_capture_dir(dir.clone());
    }

    let orchestrator = OrchestratorConfig {
        remote_timeout: seconds("remote-timeout")?,
        crawl_timeout: seconds("crawl-timeout")?,
        max_records: args.get_one::<NonZeroUsize>("max-records").copied(),
    };

    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);

    Ok(ExtractOptions {
        urls,
        remote,
        crawl,
        orchestrator,
        seed: args.get_one::<u64>("seed").copied(),
        format,
        output: args.get_one::<PathBuf>("output").cloned(),
    })
}

/// Run each URL through the cascade in turn. Stops at the first cancellation
/// and returns whatever finished before it.
pub async fn run_extraction(
    orchestrator: &ExtractionOrchestrator,
    urls: &[String],
    cancel: &CancellationToken,
    progress: &ProgressBar,
) -> (Vec<ReportEntry>, bool) {
    let mut entries = Vec::with_capacity(urls.len());

    for raw in urls {
        let request = match ExtractionRequest::parse(raw) {
            Ok(request) => request,
            Err(e) => {
                progress.println(format!("{} {}", "✗".red().bold(), e));
                continue;
            }
        };

        progress.set_message(format!("Extracting {}", request.url));
        match orchestrator.extract_with_cancel(&request, cancel).await {
            Ok(result) => {
                let mark = if result.is_synthetic() {
                    "⚠".yellow().bold()
                } else {
                    "✓".green().bold()
                };
                progress.println(format!(
                    "{} {} ({} listings via {})",
                    mark,
                    request.url,
                    result.jobs.len(),
                    result.tier
                ));
                entries.push(ReportEntry {
                    url: request.url.to_string(),
                    result,
                });
            }
            Err(ExtractionError::Cancelled) => return (entries, true),
            Err(e) => progress.println(format!("{} {}", "✗".red().bold(), e)),
        }
    }

    (entries, false)
}

pub fn render_report(entries: &[ReportEntry], format: ReportFormat) -> anyhow::Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(entries)),
        ReportFormat::Json => {
            generate_json_report(entries).context("Failed to serialize report")
        }
    }
}

fn spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub async fn handle_extract(args: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let options = build_extract_options(args)?;

    let mut orchestrator = ExtractionOrchestrator::from_config(
        options.remote.clone(),
        options.crawl.clone(),
        &options.orchestrator,
    )
    .context("Failed to set up extraction tiers")?;
    if let Some(seed) = options.seed {
        orchestrator = orchestrator.with_synthetic(SyntheticFallbackGenerator::seeded(seed));
    }

    if !quiet {
        println!("\n🔎 Extracting from {} page(s)", options.urls.len());
        let tiers: Vec<String> = orchestrator.tiers().iter().map(|t| t.to_string()).collect();
        println!("Tiers: {}\n", tiers.join(" → "));
    }

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let progress = spinner(quiet);
    let (entries, cancelled) = run_extraction(&orchestrator, &options.urls, &cancel, &progress).await;
    progress.finish_and_clear();

    if !entries.is_empty() {
        let report = render_report(&entries, options.format)?;
        match &options.output {
            Some(path) => {
                save_report(&report, path)
                    .with_context(|| format!("Failed to write report to {}", path.display()))?;
                if !quiet {
                    println!(
                        "{} Report saved to {}",
                        "✓".green().bold(),
                        path.display().to_string().bright_white()
                    );
                }
            }
            None => print!("{}", report),
        }
    }

    if cancelled {
        bail!(ExtractionError::Cancelled);
    }
    if entries.is_empty() {
        bail!("No page could be extracted");
    }
    Ok(())
}
