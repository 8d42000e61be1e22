//! List command implementation.

use crate::utils::{EntryRow, decoder_for, matches_filters, print_entries, read_archive};
use serde::{Deserialize, Serialize};
use std::path::Path;
use zipcodec::{ArchiveOptions, ZipArchive};

/// JSON output for archive listing.
#[derive(Debug, Serialize, Deserialize)]
struct ArchiveListJson {
    archive: String,
    entries: Vec<EntryRow>,
    #[serde(skip_serializing_if = "String::is_empty")]
    comment: String,
}

/// Options for listing archive contents.
pub struct ListOptions<'a> {
    pub verbose: bool,
    pub json: bool,
    pub include: &'a [String],
    pub exclude: &'a [String],
    pub encoding: Option<&'a str>,
}

pub fn cmd_list(archive: &Path, options: &ListOptions) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = read_archive(archive)?;
    let zip = ZipArchive::open_with(
        &bytes,
        ArchiveOptions {
            decoder: decoder_for(options.encoding)?,
        },
    )?;

    let rows: Vec<EntryRow> = zip
        .entries()?
        .iter()
        .map(EntryRow::from_entry)
        .filter(|row| matches_filters(&row.name, options.include, options.exclude))
        .collect();

    if options.json {
        let listing = ArchiveListJson {
            archive: archive.display().to_string(),
            entries: rows,
            comment: zip.comment(),
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("Archive: {}", archive.display());
    println!();
    print_entries(&rows, options.verbose);
    Ok(())
}
