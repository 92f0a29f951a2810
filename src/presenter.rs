//! Result presentation
//!
//! Orders the final rank table and writes it in one of the supported
//! output formats.

use crate::error::{LinkRankError, LinkRankResult};
use crate::loader::Labels;
use comfy_table::{ContentArrangement, Table};
use linkrank_algorithms::{NodeId, RankTable};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `<label> : <rank>.` per line
    #[default]
    Text,
    Json,
    Csv,
    Table,
}

impl FromStr for OutputFormat {
    type Err = LinkRankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "table" => Ok(Self::Table),
            other => Err(LinkRankError::Config(format!("unknown output format: {other}"))),
        }
    }
}

/// One presented row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedNode {
    pub id: NodeId,
    pub label: String,
    pub rank: f64,
}

/// Sorts and renders final ranks
pub struct ResultPresenter<'a> {
    labels: &'a Labels,
    top: Option<usize>,
}

impl<'a> ResultPresenter<'a> {
    pub fn new(labels: &'a Labels) -> Self {
        Self { labels, top: None }
    }

    /// Keep only the `top` highest ranked nodes
    pub fn with_top(mut self, top: Option<usize>) -> Self {
        self.top = top;
        self
    }

    /// Rows ordered by descending rank, ties by ascending id
    pub fn rank_order(&self, table: &RankTable) -> Vec<RankedNode> {
        let mut rows: Vec<RankedNode> = table
            .iter()
            .map(|(id, rank)| RankedNode { id, label: self.label(id), rank })
            .collect();
        rows.sort_by(|a, b| b.rank.total_cmp(&a.rank).then(a.id.cmp(&b.id)));
        if let Some(top) = self.top {
            rows.truncate(top);
        }
        rows
    }

    /// Render `table` to `out`
    pub fn write<W: Write>(&self, table: &RankTable, format: OutputFormat, out: &mut W) -> LinkRankResult<()> {
        let rows = self.rank_order(table);
        match format {
            OutputFormat::Text => {
                for row in &rows {
                    writeln!(out, "{} : {}.", row.label, java_double(row.rank))?;
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, &rows)?;
                writeln!(out)?;
            }
            OutputFormat::Csv => {
                writeln!(out, "id,label,rank")?;
                for row in &rows {
                    writeln!(out, "{},{},{}", row.id, csv_field(&row.label), java_double(row.rank))?;
                }
            }
            OutputFormat::Table => {
                if rows.is_empty() {
                    writeln!(out, "(no results)")?;
                    return Ok(());
                }
                let mut rendered = Table::new();
                rendered.set_content_arrangement(ContentArrangement::Dynamic);
                rendered.set_header(vec!["id", "label", "rank"]);
                for row in &rows {
                    rendered.add_row(vec![row.id.to_string(), row.label.clone(), format!("{:.6}", row.rank)]);
                }
                writeln!(out, "{rendered}")?;
                writeln!(out, "{} row(s)", rows.len())?;
            }
        }
        Ok(())
    }

    fn label(&self, id: NodeId) -> String {
        self.labels.get(&id).cloned().unwrap_or_else(|| id.to_string())
    }
}

/// Shortest round-trip rendering laid out like Java's `Double.toString`:
/// plain decimal for magnitudes in [1e-3, 1e7), `d.dddE<exp>` otherwise.
fn java_double(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return format!("{value:?}");
    }
    let scientific = format!("{value:E}");
    match scientific.split_once('E') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => format!("{mantissa}.0E{exponent}"),
        _ => scientific,
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
