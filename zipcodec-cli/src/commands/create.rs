//! Create command implementation.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use zipcodec::{ArchiveInput, WriterOptions, ZipCompressionLevel, ZipWriter};

/// Options for creating an archive.
pub struct CreateOptions<'a> {
    pub level: ZipCompressionLevel,
    pub password: Option<&'a str>,
    pub legacy_check: bool,
    pub comment: Option<&'a str>,
    pub verbose: bool,
}

pub fn cmd_create(
    archive: &Path,
    files: &[std::path::PathBuf],
    options: &CreateOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    if files.is_empty() {
        return Err("no input files given".into());
    }

    let mut writer_options = WriterOptions::default()
        .with_level(options.level)
        .with_legacy_check(options.legacy_check);
    if let Some(password) = options.password {
        writer_options = writer_options.with_password(password.as_bytes());
    }
    if let Some(comment) = options.comment {
        writer_options = writer_options.with_comment(comment);
    }

    println!("Creating {}", archive.display());
    let out = BufWriter::new(File::create(archive)?);
    let mut zip = ZipWriter::with_options(out, writer_options);

    for path in files {
        add_path(&mut zip, path, path, options.verbose)?;
    }

    let count = zip.len();
    zip.into_inner()?;
    println!("Archive created successfully ({} entries)", count);
    Ok(())
}

/// Add `path` and, for directories, everything below it. Names are relative
/// to the parent of `base`, or to `base` itself when it has no final
/// component (`.`, `..`, `/`).
fn add_path<W: std::io::Write>(
    zip: &mut ZipWriter<W>,
    path: &Path,
    base: &Path,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let anchor = match base.file_name() {
        Some(_) => base.parent().unwrap_or(base),
        None => base,
    };
    let name = entry_name(path, anchor);

    if !name.is_empty() {
        let input = ArchiveInput::from_path(path, name.clone())?;
        let size = input.source.len_hint().unwrap_or(0);
        zip.add_entry(input)?;
        if verbose && !path.is_dir() {
            println!("  Added: {} ({} bytes)", name, size);
        }
    }

    if path.is_dir() {
        if verbose && !name.is_empty() {
            println!("  Added: {}/", name);
        }
        let mut children: Vec<_> = std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()?;
        children.sort();
        for child in &children {
            add_path(zip, child, base, verbose)?;
        }
    }
    Ok(())
}

fn entry_name(path: &Path, anchor: &Path) -> String {
    path.strip_prefix(anchor)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use zipcodec::ZipArchive;

    #[test]
    fn test_entry_name_relative_to_parent() {
        assert_eq!(entry_name(Path::new("data/a.txt"), Path::new("")), "data/a.txt");
        assert_eq!(entry_name(Path::new("./a.txt"), Path::new(".")), "a.txt");
        assert_eq!(entry_name(Path::new("."), Path::new(".")), "");
    }

    #[test]
    fn test_unnamed_root_adds_children_only() {
        let root = std::env::temp_dir().join(format!("zipcodec_create_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("sub")).unwrap();
        std::fs::write(root.join("a.txt"), b"alpha").unwrap();
        std::fs::write(root.join("sub/b.txt"), b"beta").unwrap();

        // No final component, like `.` on the command line.
        let base = root.join("sub").join("..");
        let mut zip = ZipWriter::new(Vec::new());
        add_path(&mut zip, &base, &base, false).unwrap();
        let bytes = zip.into_inner().unwrap();

        let archive = ZipArchive::open(&bytes).unwrap();
        let names: Vec<String> = archive.entries().unwrap().iter().map(|e| e.name()).collect();
        assert_eq!(names, ["a.txt", "sub/", "sub/b.txt"]);

        std::fs::remove_dir_all(&root).unwrap();
    }
}
