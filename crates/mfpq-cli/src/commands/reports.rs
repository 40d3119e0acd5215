//! `mfpq reports` — list the report catalog.

use mfpq_core::ReportKind;

pub fn run() -> anyhow::Result<()> {
    println!("Available reports:\n");
    for kind in ReportKind::ALL {
        println!("  {:<24} {}", kind.name(), kind.description());
    }
    println!("\nRun one with: mfpq run <REPORT>");
    Ok(())
}
