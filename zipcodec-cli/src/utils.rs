//! Utility functions for the CLI.

use chrono::NaiveDateTime;
use glob::Pattern;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use zipcodec::{CompressionMethod, LegacyDecoder, TextDecoder, Utf8Decoder, ZipEntry};

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░ ");
    let pb = ProgressBar::new(len);
    pb.set_style(style);
    pb
}

/// Check if a name matches the filter patterns.
/// - If include patterns are specified, the name must match at least one
/// - If exclude patterns are specified, the name must not match any
pub fn matches_filters(name: &str, include: &[String], exclude: &[String]) -> bool {
    let matches = |patterns: &[String]| {
        patterns
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .any(|p| p.matches(name))
    };

    if matches(exclude) {
        return false;
    }
    include.is_empty() || matches(include)
}

/// Resolve the name codec for a `--encoding` label.
pub fn decoder_for(
    label: Option<&str>,
) -> Result<Arc<dyn TextDecoder>, Box<dyn std::error::Error>> {
    match label {
        None => Ok(Arc::new(Utf8Decoder)),
        Some(label) => LegacyDecoder::for_label(label)
            .map(|d| Arc::new(d) as Arc<dyn TextDecoder>)
            .ok_or_else(|| format!("unknown encoding: {label}").into()),
    }
}

/// Read a whole archive into memory.
pub fn read_archive(path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    std::fs::read(path).map_err(|e| format!("{}: {}", path.display(), e).into())
}

/// One listed entry, also the JSON shape of `list --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRow {
    pub name: String,
    pub size: u64,
    pub compressed_size: u64,
    pub method: String,
    pub crc: u32,
    pub modified: String,
    pub is_dir: bool,
    pub encrypted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl EntryRow {
    pub fn from_entry(entry: &ZipEntry<'_>) -> Self {
        let header = entry.header();
        let mode = entry.file_attr();
        Self {
            name: entry.name(),
            size: header.size,
            compressed_size: header.compressed_size,
            method: CompressionMethod::from_u16(header.method()).name(),
            crc: header.crc32,
            modified: format_time(&entry.time()),
            is_dir: entry.is_directory(),
            encrypted: header.is_encrypted(),
            mode: (mode != 0).then(|| format!("{mode:04o}")),
        }
    }

    /// Space saved by compression, in percent.
    pub fn ratio(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            (1.0 - self.compressed_size as f64 / self.size as f64) * 100.0
        }
    }
}

pub fn format_time(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Print entries in a formatted table.
pub fn print_entries(entries: &[EntryRow], verbose: bool) {
    if !verbose {
        for entry in entries {
            println!("{}", entry.name);
        }
        return;
    }

    println!(
        "{:>10} {:>10} {:>6} {:>8} {:>8}  {:19}  Name",
        "Size", "Compressed", "Ratio", "Method", "CRC-32", "Modified",
    );
    println!("{}", "-".repeat(88));

    let mut total_size = 0u64;
    let mut total_compressed = 0u64;

    for entry in entries {
        let ratio = if entry.size > 0 {
            format!("{:.1}%", entry.ratio())
        } else {
            "-".to_string()
        };
        let prefix = match (entry.is_dir, entry.encrypted) {
            (true, _) => "d ",
            (false, true) => "* ",
            (false, false) => "  ",
        };

        println!(
            "{:>10} {:>10} {:>6} {:>8} {:08x}  {:19}  {}{}",
            entry.size,
            entry.compressed_size,
            ratio,
            entry.method,
            entry.crc,
            entry.modified,
            prefix,
            entry.name
        );

        total_size += entry.size;
        total_compressed += entry.compressed_size;
    }

    println!("{}", "-".repeat(88));
    let total_ratio = if total_size > 0 {
        (1.0 - total_compressed as f64 / total_size as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "{:>10} {:>10} {:>5.1}%  {} entries",
        total_size,
        total_compressed,
        total_ratio,
        entries.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters() {
        let none: Vec<String> = Vec::new();
        let txt = vec!["*.txt".to_string()];
        let docs = vec!["docs/*".to_string()];

        assert!(matches_filters("a.txt", &none, &none));
        assert!(matches_filters("a.txt", &txt, &none));
        assert!(!matches_filters("a.bin", &txt, &none));
        assert!(!matches_filters("docs/a.txt", &txt, &docs));
        assert!(matches_filters("src/a.txt", &txt, &docs));
    }

    #[test]
    fn test_decoder_for() {
        assert!(decoder_for(None).unwrap().efs("x"));
        assert!(!decoder_for(Some("shift_jis")).unwrap().efs("x"));
        assert!(decoder_for(Some("klingon")).is_err());
    }

    #[test]
    fn test_ratio() {
        let row = EntryRow {
            name: "a".into(),
            size: 200,
            compressed_size: 50,
            method: "Deflate".into(),
            crc: 0,
            modified: String::new(),
            is_dir: false,
            encrypted: false,
            mode: None,
        };
        assert!((row.ratio() - 75.0).abs() < f64::EPSILON);
    }
}
