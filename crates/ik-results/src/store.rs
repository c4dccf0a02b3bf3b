//! Run storage API.
//!
//! Each run lives in its own directory holding `manifest.json` and one JSON
//! row per query in `results.jsonl`.

use crate::types::{AngleRow, RunManifest};
use crate::{ResultsError, ResultsResult};
use std::fs;
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "manifest.json";
const ROWS_FILE: &str = "results.jsonl";

#[derive(Debug, Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Store next to a reaction file, under `.isskin/runs`.
    pub fn for_reaction(reaction_path: &Path) -> ResultsResult<Self> {
        let dir = reaction_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "reaction path has no parent directory".to_string(),
            })?;
        Self::new(dir.join(".isskin").join("runs"))
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join(MANIFEST_FILE).is_file()
    }

    pub fn save_run(&self, manifest: &RunManifest, rows: &[AngleRow]) -> ResultsResult<()> {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        let mut content = String::new();
        for row in rows {
            content.push_str(&serde_json::to_string(row)?);
            content.push('\n');
        }
        fs::write(run_dir.join(ROWS_FILE), content)?;

        // Manifest last: a run counts as stored only once it exists
        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(run_dir.join(MANIFEST_FILE), manifest_json)?;

        tracing::info!(run_id = %manifest.run_id, rows = rows.len(), "run saved");
        Ok(())
    }

    /// Contents of one file of a stored run.
    fn read_run_file(&self, run_id: &str, name: &str) -> ResultsResult<String> {
        let path = self.run_dir(run_id).join(name);
        if !path.is_file() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        Ok(fs::read_to_string(path)?)
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let content = self.read_run_file(run_id, MANIFEST_FILE)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_rows(&self, run_id: &str) -> ResultsResult<Vec<AngleRow>> {
        self.read_run_file(run_id, ROWS_FILE)?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(ResultsError::from))
            .collect()
    }

    /// Stored runs for one reaction, oldest first. Unreadable entries are skipped.
    pub fn list_runs(&self, reaction_name: &str) -> ResultsResult<Vec<RunManifest>> {
        if !self.root_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut runs = Vec::new();
        for entry in fs::read_dir(&self.root_dir)? {
            let run_id = entry?.file_name().to_string_lossy().into_owned();
            if let Ok(manifest) = self.load_manifest(&run_id)
                && manifest.reaction_name == reaction_name
            {
                runs.push(manifest);
            }
        }

        runs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}
