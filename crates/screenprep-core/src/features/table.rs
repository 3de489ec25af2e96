use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

use super::SampleId;

/// One feature vector per sample, all sharing the same ordered names.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    pub names: Vec<String>,
    pub rows: Vec<FeatureRow>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub sample: SampleId,
    pub values: Vec<f64>,
}

impl FeatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row. The first row fixes the feature names; later rows
    /// must carry the same names.
    pub fn push(&mut self, sample: SampleId, values: Vec<f64>, names: Vec<String>) -> Result<()> {
        if values.len() != names.len() {
            return Err(PrepError::parameter(format!(
                "sample {sample}: {} values for {} feature names",
                values.len(),
                names.len()
            )));
        }
        if self.rows.is_empty() && self.names.is_empty() {
            self.names = names;
        } else if self.names != names {
            return Err(PrepError::parameter(format!(
                "sample {sample}: feature names differ from the table's"
            )));
        }
        self.rows.push(FeatureRow { sample, values });
        Ok(())
    }

    /// Persist as JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| PrepError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|e| PrepError::io(path, e))
    }

    pub fn read_json(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| PrepError::io(path, e))?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

/// Companion list of source filenames next to a feature table:
/// `features.json` → `features.filenames.txt`.
pub fn filenames_path(table_path: &Path) -> PathBuf {
    table_path.with_extension("filenames.txt")
}

/// Write one filename per line.
pub fn write_filenames(path: &Path, filenames: &[PathBuf]) -> Result<()> {
    let file = File::create(path).map_err(|e| PrepError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for name in filenames {
        writeln!(writer, "{}", name.display()).map_err(|e| PrepError::io(path, e))?;
    }
    writer.flush().map_err(|e| PrepError::io(path, e))
}
