//! Extract command implementation.

use crate::utils::{create_progress_bar, decoder_for, matches_filters, read_archive};
use std::path::Path;
use zipcodec::{ArchiveOptions, ExtractOutcome, SkipReason, ZipArchive, extract_to};

/// Options for extracting archive contents.
pub struct ExtractOptions<'a> {
    pub output: &'a Path,
    pub files: &'a [String],
    pub include: &'a [String],
    pub exclude: &'a [String],
    pub password: Option<&'a str>,
    pub overwrite: bool,
    pub encoding: Option<&'a str>,
    pub verbose: bool,
    pub progress: bool,
}

pub fn cmd_extract(
    archive: &Path,
    options: &ExtractOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = read_archive(archive)?;
    let zip = ZipArchive::open_with(
        &bytes,
        ArchiveOptions {
            decoder: decoder_for(options.encoding)?,
        },
    )?;

    let mut selected: Vec<_> = zip
        .entries()?
        .into_iter()
        .filter(|e| {
            let name = e.name();
            (options.files.is_empty() || options.files.iter().any(|f| *f == name))
                && matches_filters(&name, options.include, options.exclude)
        })
        .collect();

    let extract_options = zipcodec::ExtractOptions {
        password: options.password.map(|p| p.as_bytes().to_vec()),
        overwrite: options.overwrite,
        ..zipcodec::ExtractOptions::default()
    };

    std::fs::create_dir_all(options.output)?;
    let pb = create_progress_bar(selected.len() as u64, options.progress && !options.verbose);

    let mut written = 0usize;
    let mut skipped = 0usize;
    for entry in &mut selected {
        let name = entry.name();
        pb.set_message(name.clone());

        match extract_to(options.output, entry, &extract_options)? {
            ExtractOutcome::File(path) => {
                written += 1;
                if options.verbose {
                    println!("  {} ({} bytes)", path.display(), entry.header().size);
                }
            }
            ExtractOutcome::Directory(path) => {
                if options.verbose {
                    println!("  {}/", path.display());
                }
            }
            ExtractOutcome::Skipped(reason) => {
                skipped += 1;
                if options.verbose {
                    let why = match reason {
                        SkipReason::AlreadyExists => "already exists",
                        SkipReason::Directory => "directory",
                    };
                    println!("  skipped {} ({})", name, why);
                }
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!(
        "Extracted {} file(s) to {}{}",
        written,
        options.output.display(),
        if skipped > 0 {
            format!(", skipped {} existing", skipped)
        } else {
            String::new()
        }
    );
    Ok(())
}
