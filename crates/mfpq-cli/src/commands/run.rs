//! `mfpq run` — execute one report and print it.

use anyhow::Context;
use log::debug;
use mfpq_core::{
    DayBucket, EsClient, FilterParams, IndexConfig, Report, VersionCounts, dates, run_report,
};

/// Arguments for one report run.
pub struct RunArgs<'a> {
    pub report: &'a str,
    pub app_name: Option<&'a str>,
    pub app_version: Option<&'a str>,
    pub since: Option<&'a str>,
    pub until: Option<&'a str>,
    pub output: Option<&'a str>,
}

pub fn run(config: &IndexConfig, args: RunArgs) -> anyhow::Result<()> {
    let filters = build_filters(&args)?;
    debug!(
        "running '{}' against {}/{}",
        args.report,
        config.base_url(),
        config.index
    );

    let client = EsClient::new(config);
    let report = run_report(args.report, &client, &filters)
        .with_context(|| format!("report '{}' failed", args.report))?;

    match &report {
        Report::FirstSeen(buckets) => print_first_seen(buckets),
        Report::VersionCounts(counts) => print_version_counts(counts),
    }

    if let Some(path) = args.output {
        super::write_json(&report, path, "Report")?;
    }
    Ok(())
}

fn build_filters(args: &RunArgs) -> anyhow::Result<FilterParams> {
    let since_ms = args.since.map(super::parse_time_bound).transpose()?;
    let until_ms = args.until.map(super::parse_time_bound).transpose()?;
    Ok(FilterParams {
        app_name: args.app_name.map(str::to_string),
        app_version: args.app_version.map(str::to_string),
        since_ms,
        until_ms,
    })
}

fn print_first_seen(buckets: &[DayBucket]) {
    let mut rows: Vec<&DayBucket> = buckets.iter().collect();
    rows.sort_by_key(|b| b.date);

    println!("{}", "=".repeat(44));
    println!("{:<12} {:>14} {:>14}", "Date", "Day stamp", "New devices");
    println!("{}", "-".repeat(44));
    for bucket in &rows {
        println!(
            "{:<12} {:>14} {:>14}",
            dates::format_day(bucket.date),
            bucket.date,
            bucket.count
        );
    }
    println!("{}", "-".repeat(44));
    let total: u64 = rows.iter().map(|b| b.count).sum();
    println!("{total} distinct device(s) across {} day(s)", rows.len());
}

fn print_version_counts(counts: &VersionCounts) {
    println!("{}", "=".repeat(52));
    println!("{:<24} {:<14} {:>10}", "App", "Version", "Count");
    println!("{}", "-".repeat(52));
    for (app, versions) in counts {
        for (version, count) in versions {
            println!("{app:<24} {version:<14} {count:>10}");
        }
    }
    println!("{}", "-".repeat(52));
    let total: u64 = counts.values().flat_map(|v| v.values()).sum();
    println!("total {total} across {} app(s)", counts.len());
}
