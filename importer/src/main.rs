use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine::catalog::{save_catalog, CatalogPaths};
use engine::skills::extract_skills;
use engine::tokenizer::normalize;
use engine::JobPosting;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// One job entry as the listings provider delivers it. Unknown fields are
/// dropped here; nothing downstream ever sees the raw shape.
#[derive(Debug, Deserialize)]
struct ProviderJob {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    company: Option<ProviderCompany>,
    #[serde(default)]
    location: Option<ProviderLocation>,
    #[serde(default)]
    category: Option<ProviderCategory>,
    #[serde(default)]
    redirect_url: Option<String>,
    #[serde(default)]
    salary_min: Option<f64>,
    #[serde(default)]
    salary_max: Option<f64>,
    #[serde(default)]
    created: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderCompany {
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderLocation {
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderCategory {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    tag: Option<String>,
}

#[derive(Parser)]
#[command(name = "importer")]
#[command(about = "Normalize provider job batches into the match catalogue", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import provider batch JSON files (file or directory) into a catalogue
    Import {
        /// Input path (file or directory of *.json batches)
        #[arg(long)]
        input: String,
        /// Output catalogue directory
        #[arg(long)]
        output: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Import { input, output } => import_batches(&input, &output),
    }
}

fn import_batches(input: &str, output: &str) -> Result<()> {
    let input_path = Path::new(input);

    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json") {
                files.push(p.to_path_buf());
            }
        }
        files.sort();
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    }

    let mut postings: Vec<JobPosting> = Vec::new();
    for file in &files {
        let batch = read_batch(file)?;
        let stem = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("batch")
            .to_string();
        let before = postings.len();
        for (index, entry) in batch.into_iter().enumerate() {
            match serde_json::from_value::<ProviderJob>(entry) {
                Ok(raw) => postings.push(normalize_job(raw, &stem, index)),
                Err(err) => {
                    tracing::warn!(file = %file.display(), index, %err, "skipping malformed provider entry");
                }
            }
        }
        tracing::info!(file = %file.display(), imported = postings.len() - before, "batch ingested");
    }

    let paths = CatalogPaths::new(output);
    save_catalog(&paths, &postings)?;
    tracing::info!(postings = postings.len(), output, "catalogue written");
    Ok(())
}

/// A batch file is either an array of provider entries or a single entry.
fn read_batch(file: &Path) -> Result<Vec<serde_json::Value>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing {}", file.display()))?;
    Ok(match json {
        serde_json::Value::Array(arr) => arr,
        other => vec![other],
    })
}

/// Map one provider entry onto the catalogue posting shape: stable id,
/// remote detection, display salary, and skill tokens seeded from the
/// title and description.
fn normalize_job(raw: ProviderJob, file_stem: &str, index: usize) -> JobPosting {
    let title = raw.title.unwrap_or_else(|| "Unknown Position".to_string());
    let description = raw.description.unwrap_or_default();

    // redirect_url is the only stable identifier the provider carries; fall
    // back to a position-derived id that survives re-imports of the same file.
    let id = raw
        .redirect_url
        .clone()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| format!("{file_stem}#{index}"));

    let category_tag = raw
        .category
        .as_ref()
        .and_then(|c| c.tag.as_deref())
        .unwrap_or_default()
        .to_lowercase();
    let is_remote = category_tag.contains("remote") || title.to_lowercase().contains("remote");
    let category = raw
        .category
        .and_then(|c| c.label.or(c.tag))
        .filter(|c| !c.trim().is_empty());

    let skills = extract_skills(&normalize(&format!("{title} {description}")));

    JobPosting {
        id,
        title,
        description,
        category,
        skills,
        is_remote,
        company: raw.company.and_then(|c| c.display_name),
        location: raw.location.and_then(|l| l.display_name),
        url: raw.redirect_url,
        posted_date: raw.created,
        salary_range: format_salary(raw.salary_min, raw.salary_max),
    }
}

/// Readable salary range, e.g. "£40,000 - £60,000".
fn format_salary(min: Option<f64>, max: Option<f64>) -> Option<String> {
    match (min, max) {
        (Some(lo), Some(hi)) => Some(format!("£{} - £{}", thousands(lo), thousands(hi))),
        (Some(lo), None) => Some(format!("£{}+", thousands(lo))),
        (None, Some(hi)) => Some(format!("Up to £{}", thousands(hi))),
        (None, None) => None,
    }
}

fn thousands(n: f64) -> String {
    let whole = n.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if whole < 0 {
        format!("-{out}")
    } else {
        out
    }
}
