// Report rendering for extraction results

use crate::orchestrator::ExtractionResult;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// One extraction, labelled with the URL it was run for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub url: String,
    #[serde(flatten)]
    pub result: ExtractionResult,
}

pub fn generate_text_report(entries: &[ReportEntry]) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push('\n');
    report.push_str("                          JOBHARVEST EXTRACTION REPORT\n");
    report.push_str(RULE);
    report.push_str("\n\n");
    report.push_str(&format!(
        "Generated:    {}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push_str(&format!("URLs:         {}\n", entries.len()));
    let total: usize = entries.iter().map(|e| e.result.jobs.len()).sum();
    report.push_str(&format!("Listings:     {}\n\n", total));

    for entry in entries {
        report.push_str(RULE);
        report.push('\n');
        report.push_str(&format!("## {}\n", entry.url));
        report.push_str(&format!(
            "  Tier: {}  |  Listings: {}  |  Trust: {}\n\n",
            entry.result.tier,
            entry.result.jobs.len(),
            trust_label(&entry.result)
        ));

        for (idx, job) in entry.result.jobs.iter().enumerate() {
            report.push_str(&format!("  {:>2}. {}\n", idx + 1, job.title));
            report.push_str(&format!("      {} · {}\n", job.company, job.location));
            report.push_str(&format!(
                "      {} · {}\n",
                job.salary_range, job.employment_type
            ));
            if !job.required_skills.is_empty() {
                report.push_str(&format!("      Skills: {}\n", job.required_skills.join(", ")));
            }
            report.push_str(&format!("      Link:   {}\n", job.external_link));
            report.push_str(&format!("      Source: {}\n\n", job.source));
        }
    }

    report
}

pub fn generate_json_report(entries: &[ReportEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(entries)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn trust_label(result: &ExtractionResult) -> &'static str {
    if result.is_synthetic() {
        "simulated (not real listings)"
    } else {
        "scraped"
    }
}
