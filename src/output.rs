//! Rendering of command results as a table, JSON or YAML

use anyhow::Result;
use serde::Serialize;

use crate::constants::NO_RESULTS_HINT;
use crate::gitlab::{branches::Branch, files::TreeNode, groups::Group, projects::Project};

const MAX_COLUMNS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Json,
    Yaml,
}

impl OutputFormat {
    /// `json` and `yaml` select those formats, anything else is the table
    pub fn from_flag(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "yaml" => OutputFormat::Yaml,
            _ => OutputFormat::Simple,
        }
    }
}

/// A resource that knows its table columns
pub trait Tabular {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

pub fn render<T: Tabular + Serialize>(items: &[T], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(items)?),
        OutputFormat::Simple => Ok(render_table(items)),
    }
}

pub fn print<T: Tabular + Serialize>(items: &[T], format: OutputFormat) -> Result<()> {
    let rendered = render(items, format)?;
    println!("{}", rendered.trim_end());
    Ok(())
}

fn render_table<T: Tabular>(items: &[T]) -> String {
    if items.is_empty() {
        return NO_RESULTS_HINT.to_string();
    }

    let headers: Vec<&str> = T::headers().into_iter().take(MAX_COLUMNS).collect();
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| item.row().into_iter().take(headers.len()).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        padded.join("   ").trim_end().to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_line(headers.clone()));
    for row in &rows {
        lines.push(format_line(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

fn opt_or_dash(value: Option<String>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(|| "-".to_string())
}

impl Tabular for Project {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "PATH", "VISIBILITY", "DEFAULT BRANCH", "URL"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.path_with_namespace.clone(),
            opt_or_dash(self.visibility.map(|v| v.to_string())),
            opt_or_dash(self.default_branch.clone()),
            self.web_url.clone(),
        ]
    }
}

impl Tabular for Group {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "PATH", "VISIBILITY", "PARENT", "URL"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.full_path.clone(),
            opt_or_dash(self.visibility.map(|v| v.to_string())),
            opt_or_dash(self.parent_id.map(|id| id.to_string())),
            self.web_url.clone(),
        ]
    }
}

impl Tabular for Branch {
    fn headers() -> Vec<&'static str> {
        vec!["NAME", "PROTECTED", "MERGED", "DEFAULT", "COMMIT"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.protected.to_string(),
            self.merged.to_string(),
            self.default.to_string(),
            opt_or_dash(self.commit.as_ref().map(|c| c.short_id.clone())),
        ]
    }
}

impl Tabular for TreeNode {
    fn headers() -> Vec<&'static str> {
        vec!["PATH", "TYPE", "MODE", "ID"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.path.clone(),
            self.kind.clone(),
            self.mode.clone(),
            self.id.clone(),
        ]
    }
}
