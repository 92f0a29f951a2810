//! Graph input loading
//!
//! Reads adjacency records from JSON. Two layouts are accepted:
//! - JSON Lines: one `{"id": .., "neighbors": [..], "url": ..}` object per
//!   line, blank lines skipped
//! - a single top-level JSON array of the same objects
//!
//! The layout is detected from the first non-whitespace byte. Every record
//! is validated before anything reaches the rank engine; one bad record
//! fails the whole load.

use crate::error::{LinkRankError, LinkRankResult};
use linkrank_algorithms::{AdjacencyRecord, NodeId};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Human-readable node labels, used only for presentation
pub type Labels = HashMap<NodeId, String>;

/// Raw input record
#[derive(Debug, Deserialize)]
struct InputRecord {
    id: NodeId,
    neighbors: Vec<NodeId>,
    #[serde(default, alias = "label")]
    url: Option<String>,
}

/// Input layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLayout {
    JsonLines,
    JsonArray,
}

/// Fully validated loader output
#[derive(Debug, Default)]
pub struct LoadedGraph {
    /// Records in input order; duplicates by id are left for the graph store to collapse
    pub records: Vec<AdjacencyRecord>,
    /// First label seen per node
    pub labels: Labels,
}

impl LoadedGraph {
    fn push(&mut self, record: InputRecord) {
        if let Some(label) = record.url {
            self.labels.entry(record.id).or_insert(label);
        }
        self.records.push(AdjacencyRecord::new(record.id, record.neighbors));
    }
}

/// Loads link graphs from JSON sources
pub struct GraphLoader;

impl GraphLoader {
    /// Load from a file path
    pub fn from_path(path: impl AsRef<Path>) -> LinkRankResult<LoadedGraph> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Opening graph input");
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load from an in-memory string
    pub fn parse_str(input: &str) -> LinkRankResult<LoadedGraph> {
        Self::from_reader(input.as_bytes())
    }

    /// Load from any buffered reader
    pub fn from_reader<R: BufRead>(mut reader: R) -> LinkRankResult<LoadedGraph> {
        let (layout, skipped_lines) = match detect_layout(&mut reader)? {
            Some(found) => found,
            None => {
                info!("Graph input is empty");
                return Ok(LoadedGraph::default());
            }
        };

        let loaded = match layout {
            InputLayout::JsonLines => read_lines(reader, skipped_lines)?,
            InputLayout::JsonArray => read_array(reader)?,
        };

        info!(
            records = loaded.records.len(),
            labels = loaded.labels.len(),
            layout = ?layout,
            "Graph input loaded"
        );
        Ok(loaded)
    }
}

/// Skip leading whitespace and report the layout plus the number of
/// newlines consumed, or `None` for an empty input.
fn detect_layout<R: BufRead>(reader: &mut R) -> LinkRankResult<Option<(InputLayout, usize)>> {
    let mut skipped_lines = 0;
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(None);
        }
        match buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(pos) => {
                let layout = if buf[pos] == b'[' {
                    InputLayout::JsonArray
                } else {
                    InputLayout::JsonLines
                };
                skipped_lines += count_newlines(&buf[..pos]);
                reader.consume(pos);
                return Ok(Some((layout, skipped_lines)));
            }
            None => {
                let len = buf.len();
                skipped_lines += count_newlines(buf);
                reader.consume(len);
            }
        }
    }
}

fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}

fn read_lines<R: BufRead>(reader: R, skipped_lines: usize) -> LinkRankResult<LoadedGraph> {
    let mut loaded = LoadedGraph::default();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record: InputRecord =
            serde_json::from_str(trimmed).map_err(|e| LinkRankError::MalformedGraphInput {
                line: skipped_lines + i + 1,
                reason: e.to_string(),
            })?;
        loaded.push(record);
    }
    Ok(loaded)
}

fn read_array<R: BufRead>(reader: R) -> LinkRankResult<LoadedGraph> {
    let values: Vec<serde_json::Value> =
        serde_json::from_reader(reader).map_err(|e| LinkRankError::MalformedGraphInput {
            line: e.line(),
            reason: e.to_string(),
        })?;

    let mut loaded = LoadedGraph::default();
    for (i, value) in values.into_iter().enumerate() {
        let record: InputRecord =
            serde_json::from_value(value).map_err(|e| LinkRankError::MalformedGraphInput {
                line: i + 1,
                reason: e.to_string(),
            })?;
        loaded.push(record);
    }
    Ok(loaded)
}
