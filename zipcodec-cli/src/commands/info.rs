//! Info command implementation.

use crate::utils::read_archive;
use std::path::Path;
use zipcodec::ZipArchive;

pub fn cmd_info(archive: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = read_archive(archive)?;
    let zip = ZipArchive::open(&bytes)?;
    let end = zip.end_record();
    let entries = zip.entries()?;

    println!("Archive Information");
    println!("===================");
    println!("File: {}", archive.display());
    println!("Size: {} bytes", bytes.len());
    println!("Zip64: {}", if end.zip64 { "yes" } else { "no" });
    println!(
        "Central directory: {} bytes at offset {}",
        end.size, end.offset
    );
    let comment = zip.comment();
    if !comment.is_empty() {
        println!("Comment: {}", comment);
    }

    let total_size: u64 = entries.iter().map(|e| e.header().size).sum();
    let total_compressed: u64 = entries.iter().map(|e| e.header().compressed_size).sum();

    println!();
    println!("Contents:");
    println!(
        "  Files: {}",
        entries.iter().filter(|e| !e.is_directory()).count()
    );
    println!(
        "  Directories: {}",
        entries.iter().filter(|e| e.is_directory()).count()
    );
    println!(
        "  Encrypted: {}",
        entries.iter().filter(|e| e.header().is_encrypted()).count()
    );
    println!("  Total size: {} bytes", total_size);
    println!("  Compressed size: {} bytes", total_compressed);
    if total_size > 0 {
        println!(
            "  Compression ratio: {:.1}%",
            (1.0 - total_compressed as f64 / total_size as f64) * 100.0
        );
    }
    Ok(())
}
