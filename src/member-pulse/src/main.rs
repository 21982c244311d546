//! Member Pulse: creator-platform member analytics.
//!
//! Loads a company's members, purchases, and engagement from a JSON dataset,
//! runs the dashboard aggregations, and prints a report section.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use pulse_core::config::{AppConfig, ExportFormat};
use pulse_core::range::DateRangePreset;
use pulse_core::source::{InMemorySource, MemberDataSource};
use pulse_reporting::{DashboardSettings, MemberDashboard, ReportSection, ReportTable};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "member-pulse")]
#[command(about = "Member growth, revenue, engagement and churn reports")]
#[command(version)]
struct Cli {
    /// JSON dataset with `members`, `purchases` and `engagement` arrays
    #[arg(long, env = "MEMBER_PULSE__DATA")]
    data: PathBuf,

    /// Company (tenant) to report on
    #[arg(long)]
    company: String,

    /// Date range preset: 7d, 30d, 90d, 1y or all; anything else means 30d
    /// (overrides config)
    #[arg(long)]
    range: Option<String>,

    /// Report section to print; the full snapshot as JSON when omitted
    #[arg(long)]
    section: Option<ReportSection>,

    /// Output format for a section: json or csv (overrides config)
    #[arg(long, env = "MEMBER_PULSE__EXPORT__FORMAT")]
    format: Option<ExportFormat>,

    /// Reference instant (RFC 3339); defaults to the current time
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    /// Number of top products to keep (overrides config)
    #[arg(long)]
    top: Option<usize>,

    /// Write the report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "member_pulse=info,pulse_reporting=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    apply_overrides(&cli, &mut config);

    let now = cli.now.unwrap_or_else(Utc::now);
    let range = config
        .analytics
        .default_range
        .resolve(now, config.analytics.all_history_years);

    info!(
        company_id = %cli.company,
        range = %config.analytics.default_range,
        start = %range.start_date,
        end = %range.end_date,
        "Configuration loaded"
    );

    let raw = tokio::fs::read_to_string(&cli.data)
        .await
        .with_context(|| format!("reading dataset {}", cli.data.display()))?;
    let source = Arc::new(InMemorySource::from_json(&raw)?);

    let report = match cli.section {
        Some(section) if section.is_raw() => {
            raw_table(source.as_ref(), &cli.company, section)?.render(config.export.format)?
        }
        Some(section) => {
            let dashboard = dashboard(source, &config);
            let snapshot = dashboard.snapshot(&cli.company, &range, now)?;
            snapshot
                .table(section)
                .context("section has no table")?
                .render(config.export.format)?
        }
        None => {
            let dashboard = dashboard(source, &config);
            let snapshot = dashboard.snapshot(&cli.company, &range, now)?;
            serde_json::to_string_pretty(&snapshot)?
        }
    };

    match cli.output {
        Some(path) => {
            tokio::fs::write(&path, report)
                .await
                .with_context(|| format!("writing report {}", path.display()))?;
            info!(path = %path.display(), "Report written");
        }
        None => println!("{report}"),
    }

    Ok(())
}

/// CLI flags win over config values.
fn apply_overrides(cli: &Cli, config: &mut AppConfig) {
    if let Some(range) = cli.range.as_deref() {
        config.analytics.default_range = DateRangePreset::parse_or_default(range);
    }
    if let Some(format) = cli.format {
        config.export.format = format;
    }
    if let Some(top) = cli.top {
        config.analytics.top_products_limit = top;
    }
}

fn dashboard(source: Arc<InMemorySource>, config: &AppConfig) -> MemberDashboard {
    MemberDashboard::new(source, DashboardSettings::from(&config.analytics))
}

fn raw_table(
    source: &dyn MemberDataSource,
    company_id: &str,
    section: ReportSection,
) -> anyhow::Result<ReportTable> {
    let table = match section {
        ReportSection::Members => ReportTable::from_records(&source.members(company_id)?),
        ReportSection::Purchases => ReportTable::from_records(&source.purchases(company_id)?),
        ReportSection::EngagementRecords => {
            ReportTable::from_records(&source.engagement(company_id)?)
        }
        other => anyhow::bail!("{} is not a raw row section", other.as_str()),
    };
    Ok(table)
}
