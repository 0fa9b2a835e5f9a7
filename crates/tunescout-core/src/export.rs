use crate::{models::SearchResult, Error, Result};
use std::path::Path;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            "md" | "markdown" => Some(ExportFormat::Markdown),
            _ => None,
        }
    }
}

/// Writes search results out as a playlist-ish document
pub struct Exporter;

impl Exporter {
    /// Export with the format picked from the file extension
    pub fn export_to_file<P: AsRef<Path>>(results: &[SearchResult], path: P) -> Result<()> {
        let path = path.as_ref();

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ExportFormat::from_extension)
            .ok_or_else(|| {
                Error::ConfigError(
                    "Could not determine export format from extension. Use .json, .csv, or .md"
                        .to_string(),
                )
            })?;

        let content = Self::render(results, format)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn render(results: &[SearchResult], format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => Self::to_json(results),
            ExportFormat::Csv => Ok(Self::to_csv(results)),
            ExportFormat::Markdown => Ok(Self::to_markdown(results)),
        }
    }

    pub fn to_json(results: &[SearchResult]) -> Result<String> {
        Ok(serde_json::to_string_pretty(results)?)
    }

    pub fn to_csv(results: &[SearchResult]) -> String {
        let mut output = String::from("Source,Id,Title,Creator,Image,Play URL,License\n");

        for result in results {
            output.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                result.source.as_str(),
                Self::escape_csv(&result.id),
                Self::escape_csv(&result.title),
                Self::escape_csv(result.creator()),
                Self::escape_csv(result.image().unwrap_or("")),
                Self::escape_csv(result.playback_url().as_deref().unwrap_or("")),
                Self::escape_csv(result.license.as_deref().unwrap_or("")),
            ));
        }

        output
    }

    pub fn to_markdown(results: &[SearchResult]) -> String {
        let mut output = String::new();

        output.push_str("# Music Search Results\n\n");
        output.push_str(&format!("Total tracks: {}\n\n", results.len()));
        output.push_str("| # | Source | Title | By | Play |\n");
        output.push_str("|---|--------|-------|----|------|\n");

        for (i, result) in results.iter().enumerate() {
            let play = result
                .playback_url()
                .map(|url| format!("[▶]({})", url))
                .unwrap_or_default();
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                i + 1,
                result.source,
                Self::escape_markdown(&result.title),
                Self::escape_markdown(result.creator()),
                play,
            ));
        }

        let licensed: Vec<&SearchResult> =
            results.iter().filter(|r| r.license.is_some()).collect();
        if !licensed.is_empty() {
            output.push_str("\n## Licenses\n\n");
            for result in licensed {
                output.push_str(&format!(
                    "- {}: {}\n",
                    result.title,
                    result.license.as_deref().unwrap_or_default()
                ));
            }
        }

        output
    }

    /// Escape CSV special characters
    fn escape_csv(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }

    fn escape_markdown(s: &str) -> String {
        s.replace('|', "\\|")
    }
}
