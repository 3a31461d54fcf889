//! Labeled pair tables.
//!
//! The input table is read whole into memory. Every column is kept verbatim so
//! that the train and test tables carry exactly the input schema; only the
//! uid, ground-truth and label columns are interpreted.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::config::DatasetConfig;
use crate::core::errors::{PatchsplitError, Result};

/// Default header written when the input carries none.
pub const DEFAULT_HEADERS: [&str; 3] = ["uid", "groundtruth_index", "expert_label"];

/// One labeled patch pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Record {
    /// Candidate patch identifier
    pub uid: String,
    /// Ground-truth patch identifier
    pub groundtruth_index: String,
    /// Expert label, when a label column is present
    pub label: Option<String>,
    /// Full row as read, in header order
    #[serde(skip)]
    pub fields: Vec<String>,
}

impl Record {
    /// Build a record in the default `uid, groundtruth_index, expert_label` schema.
    pub fn new(
        uid: impl Into<String>,
        groundtruth_index: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        let uid = uid.into();
        let groundtruth_index = groundtruth_index.into();
        let label = label.into();
        Self {
            fields: vec![uid.clone(), groundtruth_index.clone(), label.clone()],
            uid,
            groundtruth_index,
            label: Some(label),
        }
    }
}

/// An in-memory labeled pair table.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Header row, preserved for the output tables
    pub headers: Vec<String>,
    /// Data rows in input order
    pub records: Vec<Record>,
}

impl Dataset {
    /// Read a table from disk. Failure to open or parse aborts the run.
    pub fn read_csv(path: &Path, config: &DatasetConfig) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            PatchsplitError::io(format!("Failed to open input table: {}", path.display()), e)
        })?;
        let dataset = Self::from_reader(file, config)?;
        info!(
            "Read {} records from {}",
            dataset.records.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parse a table from any reader.
    pub fn from_reader<R: Read>(reader: R, config: &DatasetConfig) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(|e| PatchsplitError::csv("Failed to read header row", e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(String::is_empty) {
            warn!("Input table is empty; producing empty splits");
            return Ok(Self {
                headers: DEFAULT_HEADERS.iter().map(|h| h.to_string()).collect(),
                records: Vec::new(),
            });
        }

        let column = |name: &str| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                PatchsplitError::pipeline(
                    "read_input",
                    format!("missing required column '{}' (found: {})", name, headers.join(", ")),
                )
            })
        };
        let uid_idx = column(&config.uid_column)?;
        let gt_idx = column(&config.groundtruth_column)?;
        let label_idx = config
            .label_columns
            .iter()
            .find_map(|name| headers.iter().position(|h| h == name));
        if label_idx.is_none() {
            debug!("No label column among {:?}", config.label_columns);
        }

        let mut records = Vec::new();
        for (row, result) in csv_reader.records().enumerate() {
            let row_record = result.map_err(|e| {
                PatchsplitError::csv(format!("Malformed row {} in input table", row + 2), e)
            })?;
            let fields: Vec<String> = row_record.iter().map(str::to_string).collect();
            records.push(Record {
                uid: fields[uid_idx].trim().to_string(),
                groundtruth_index: fields[gt_idx].trim().to_string(),
                label: label_idx.map(|idx| fields[idx].clone()),
                fields,
            });
        }

        Ok(Self { headers, records })
    }

    /// Write `records` under `headers` to `path`.
    pub fn write_csv(path: &Path, headers: &[String], records: &[Record]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                PatchsplitError::io(
                    format!("Failed to create output directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        let file = File::create(path).map_err(|e| {
            PatchsplitError::io(format!("Failed to create output table: {}", path.display()), e)
        })?;
        Self::write_to(file, headers, records)?;
        info!("Wrote {} records to {}", records.len(), path.display());
        Ok(())
    }

    /// Write `records` under `headers` to any writer.
    pub fn write_to<W: Write>(writer: W, headers: &[String], records: &[Record]) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer
            .write_record(headers)
            .map_err(|e| PatchsplitError::csv("Failed to write header row", e))?;
        for record in records {
            csv_writer
                .write_record(&record.fields)
                .map_err(|e| PatchsplitError::csv("Failed to write row", e))?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
