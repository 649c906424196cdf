use crate::model::JobPosting;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Catalogue directory layout: any number of `*.json` files, each holding an
/// array of postings. The importer writes `jobs.json`; hand-placed batch
/// files sit alongside it and are merged at load time.
pub struct CatalogPaths {
    pub root: PathBuf,
}

impl CatalogPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn jobs(&self) -> PathBuf {
        self.root.join("jobs.json")
    }
}

/// Load every posting from every JSON file in the catalogue directory,
/// in file-name order. A file that is not valid JSON is an error; a posting
/// entry that does not deserialize is skipped with a warning.
pub fn load_catalog(paths: &CatalogPaths) -> Result<Vec<JobPosting>> {
    let mut files: Vec<PathBuf> = fs::read_dir(&paths.root)
        .with_context(|| format!("reading catalogue dir {}", paths.root.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    files.sort();

    let mut postings = Vec::new();
    for path in files {
        let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
        let entries: Vec<serde_json::Value> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing {}", path.display()))?;
        for entry in entries {
            match serde_json::from_value::<JobPosting>(entry) {
                Ok(posting) => postings.push(posting),
                Err(err) => {
                    tracing::warn!(file = %path.display(), %err, "skipping malformed posting entry");
                }
            }
        }
    }
    tracing::info!(postings = postings.len(), root = %paths.root.display(), "catalogue loaded");
    Ok(postings)
}

/// Write the catalogue's `jobs.json`, creating the directory if needed.
pub fn save_catalog(paths: &CatalogPaths, postings: &[JobPosting]) -> Result<()> {
    fs::create_dir_all(&paths.root)
        .with_context(|| format!("creating catalogue dir {}", paths.root.display()))?;
    let file = File::create(paths.jobs())
        .with_context(|| format!("creating {}", paths.jobs().display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), postings)?;
    Ok(())
}
