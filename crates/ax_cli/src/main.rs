use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use ax_core::{DateType, FilterSpec, KeywordWeights, QueryBuilder};
use ax_notify::{create_channels, ChannelSettings, Dispatcher};
use ax_scraper::{HttpListingSource, Pipeline, PipelineConfig};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

mod config;
mod duration;
mod logging;

use config::FileConfig;
use duration::HumanDuration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Daily arXiv digest filtered by weighted keywords", long_about = None)]
struct Cli {
    /// Config file with keywords, threshold and channel credentials
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch, score and deliver a digest
    Run(RunArgs),
    /// Print the search URL that a run would fetch
    Query(FilterArgs),
}

#[derive(Args, Debug, Clone)]
struct FilterArgs {
    /// Subject to search, e.g. "Physics" or "Computer Science (cs)". Repeatable.
    #[arg(long = "subject", default_value = "Physics")]
    subjects: Vec<String>,

    /// Physics archive, e.g. astro-ph
    #[arg(long)]
    subcategory: Option<String>,

    /// Day offset of the one-day search window
    #[arg(long, default_value_t = 2)]
    days: u32,

    /// submitted or announced
    #[arg(long, default_value = "submitted")]
    date_type: String,

    #[arg(long, default_value_t = false)]
    exclude_cross_listed: bool,

    #[arg(long, default_value_t = false)]
    hide_abstracts: bool,

    /// Results per page
    #[arg(long, default_value_t = 200)]
    size: u32,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    #[arg(long, default_value = ax_core::query::DEFAULT_SEARCH_URL)]
    search_url: String,
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Minimum score to keep an article
    #[arg(long)]
    threshold: Option<f64>,

    /// Keyword weight as KEYWORD=WEIGHT. Repeatable; replaces config keywords.
    #[arg(long = "keyword", value_parser = parse_keyword)]
    keywords: Vec<(String, f64)>,

    /// Slack incoming webhook URL
    #[arg(long)]
    slack_id: Option<String>,

    /// LINE Notify token
    #[arg(long)]
    line_token: Option<String>,

    /// Also print the digest to stdout
    #[arg(long, default_value_t = false)]
    stdout: bool,

    /// Print ranked results as JSON instead of delivering
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Repeat the run on this interval (e.g. 1d, 12h)
    #[arg(long)]
    interval: Option<HumanDuration>,
}

fn parse_keyword(s: &str) -> Result<(String, f64), String> {
    let (keyword, weight) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected KEYWORD=WEIGHT, got {:?}", s))?;
    let weight = weight
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid weight {:?}: {}", weight, e))?;
    if keyword.trim().is_empty() {
        return Err("keyword must not be empty".to_string());
    }
    Ok((keyword.trim().to_string(), weight))
}

fn build_spec(args: &FilterArgs, file: Option<&FileConfig>) -> ax_core::Result<FilterSpec> {
    let subcategory = args
        .subcategory
        .clone()
        .or_else(|| file.and_then(|f| f.subcategory.clone()))
        .unwrap_or_else(|| config::DEFAULT_SUBCATEGORY.to_string());

    Ok(FilterSpec::default()
        .with_subject_labels(&args.subjects)?
        .with_subcategory(subcategory)
        .with_cross_listed(!args.exclude_cross_listed)
        .with_date_type(args.date_type.parse::<DateType>()?)
        .with_days_ago(args.days)
        .with_abstracts(!args.hide_abstracts)
        .with_page_size(args.size))
}

fn build_pipeline_config(args: &RunArgs, file: Option<&FileConfig>) -> ax_core::Result<PipelineConfig> {
    let weights = if args.keywords.is_empty() {
        file.and_then(|f| f.keywords.clone()).unwrap_or_default()
    } else {
        args.keywords.iter().cloned().collect::<KeywordWeights>()
    };
    let threshold = args
        .threshold
        .or_else(|| file.and_then(|f| f.score_threshold))
        .unwrap_or(config::DEFAULT_THRESHOLD);

    Ok(PipelineConfig {
        spec: build_spec(&args.filter, file)?,
        weights,
        threshold,
    })
}

fn build_channel_settings(
    args: &RunArgs,
    file: Option<&FileConfig>,
    env: impl Fn(&str) -> Option<String>,
) -> ChannelSettings {
    let slack_webhook = config::first_of(
        args.slack_id.clone(),
        file.and_then(|f| f.slack_id.clone()),
        env(config::SLACK_ENV),
    );
    let line_token = config::first_of(
        args.line_token.clone(),
        file.and_then(|f| f.line_token.clone()),
        env(config::LINE_ENV),
    );
    // Without any remote channel the digest goes to stdout.
    let stdout = args.stdout || (slack_webhook.is_none() && line_token.is_none());

    ChannelSettings {
        slack_webhook,
        line_token,
        stdout,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn run_once(pipeline: &Pipeline, dispatcher: &Dispatcher, as_of: NaiveDate, json: bool) -> anyhow::Result<()> {
    let report = pipeline.run(as_of).await.context("run failed, no digest produced")?;
    info!(
        "✅ {} kept of {} extracted ({} malformed entries skipped)",
        report.results.len(),
        report.extracted,
        report.skipped
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report.results)?);
        return Ok(());
    }

    let delivery = dispatcher.deliver(&report.digest).await;
    info!("📬 Delivery: {}", delivery);
    if !delivery.all_succeeded() {
        bail!(
            "delivery failed for: {} (succeeded: {})",
            delivery.failed_channels().join(", "),
            delivery.succeeded_channels().join(", ")
        );
    }
    Ok(())
}

async fn handle_run(args: RunArgs, file: Option<FileConfig>) -> anyhow::Result<()> {
    let config = build_pipeline_config(&args, file.as_ref())?;
    let settings = build_channel_settings(&args, file.as_ref(), |key| std::env::var(key).ok());
    let dispatcher = Dispatcher::new(create_channels(&settings)?);

    let source = Arc::new(HttpListingSource::new()?);
    let pipeline = Pipeline::new(source, config)
        .with_query_builder(QueryBuilder::with_base_url(&args.filter.search_url)?);

    // Reject bad filters before sleeping or fetching anything.
    pipeline.query(args.filter.date.unwrap_or_else(today))?;

    let Some(HumanDuration(interval)) = args.interval else {
        let as_of = args.filter.date.unwrap_or_else(today);
        return run_once(&pipeline, &dispatcher, as_of, args.json).await;
    };

    info!("🔄 Running every {:?}", interval);
    loop {
        if let Err(e) = run_once(&pipeline, &dispatcher, today(), args.json).await {
            error!("{:#}", e);
        }
        tokio::time::sleep(interval).await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let file = config::load(&cli.config)?;

    match cli.command {
        Commands::Run(args) => handle_run(args, file).await,
        Commands::Query(args) => {
            let spec = build_spec(&args, file.as_ref())?;
            let query = QueryBuilder::with_base_url(&args.search_url)?
                .build(&spec, args.date.unwrap_or_else(today))?;
            println!("{}", query.url());
            Ok(())
        }
    }
}
