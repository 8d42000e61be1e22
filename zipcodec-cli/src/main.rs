//! zipcodec CLI
//!
//! List, extract, create, test and inspect ZIP archives.

mod commands;
mod utils;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{
    CreateOptions, ExtractOptions, ListOptions, cmd_create, cmd_extract, cmd_info, cmd_list,
    cmd_test,
};
use std::path::PathBuf;
use zipcodec::ZipCompressionLevel;

#[derive(Parser)]
#[command(name = "zipcodec")]
#[command(author, version, about = "ZIP archive utility")]
#[command(long_about = "
zipcodec reads and writes ZIP archives, including Zip64 archives and
entries encrypted with the traditional PKWARE cipher.

Examples:
  zipcodec list archive.zip
  zipcodec list --json archive.zip
  zipcodec extract archive.zip -o out/
  zipcodec extract --password secret archive.zip
  zipcodec create archive.zip file1.txt docs/
  zipcodec test archive.zip
  zipcodec info archive.zip
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List contents of an archive
    #[command(alias = "l")]
    List {
        /// Archive file to list
        archive: PathBuf,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,

        /// Include only files matching pattern (glob syntax: *.txt, src/**/*)
        #[arg(short = 'I', long)]
        include: Vec<String>,

        /// Exclude files matching pattern (glob syntax)
        #[arg(short = 'X', long)]
        exclude: Vec<String>,

        /// Code page for names without the UTF-8 flag (e.g. shift_jis, ibm866)
        #[arg(short, long)]
        encoding: Option<String>,
    },

    /// Extract files from an archive
    #[command(alias = "x")]
    Extract {
        /// Archive file to extract
        archive: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Files to extract (all if empty)
        files: Vec<String>,

        /// Include only files matching pattern (glob syntax: *.txt, src/**/*)
        #[arg(short = 'I', long)]
        include: Vec<String>,

        /// Exclude files matching pattern (glob syntax)
        #[arg(short = 'X', long)]
        exclude: Vec<String>,

        /// Password for encrypted entries
        #[arg(short, long)]
        password: Option<String>,

        /// Overwrite existing files
        #[arg(short = 'f', long)]
        overwrite: bool,

        /// Code page for names without the UTF-8 flag
        #[arg(short, long)]
        encoding: Option<String>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Show progress bar
        #[arg(short = 'P', long, default_value = "true")]
        progress: bool,
    },

    /// Test archive integrity
    #[command(alias = "t")]
    Test {
        /// Archive file to test
        archive: PathBuf,

        /// Password for encrypted entries
        #[arg(short, long)]
        password: Option<String>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create a new archive
    #[command(alias = "c")]
    Create {
        /// Output archive file
        archive: PathBuf,

        /// Files and directories to add to the archive
        files: Vec<PathBuf>,

        /// Compression level
        #[arg(short = 'l', long, value_enum, default_value = "normal")]
        compression: CompressionLevel,

        /// Encrypt entries with this password
        #[arg(short, long)]
        password: Option<String>,

        /// Write the extra check byte expected by very old unzip tools
        #[arg(long, requires = "password")]
        legacy_check: bool,

        /// Archive comment
        #[arg(long)]
        comment: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show information about an archive
    #[command(alias = "i")]
    Info {
        /// Archive file to inspect
        archive: PathBuf,
    },
}

/// Compression level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
enum CompressionLevel {
    /// Store without compression
    Store,
    /// Fast compression
    Fast,
    /// Normal compression (default)
    #[default]
    Normal,
    /// Best compression
    Best,
}

impl From<CompressionLevel> for ZipCompressionLevel {
    fn from(level: CompressionLevel) -> Self {
        match level {
            CompressionLevel::Store => Self::Store,
            CompressionLevel::Fast => Self::Fast,
            CompressionLevel::Normal => Self::Normal,
            CompressionLevel::Best => Self::Best,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List {
            archive,
            verbose,
            json,
            include,
            exclude,
            encoding,
        } => cmd_list(
            &archive,
            &ListOptions {
                verbose,
                json,
                include: &include,
                exclude: &exclude,
                encoding: encoding.as_deref(),
            },
        ),
        Commands::Extract {
            archive,
            output,
            files,
            include,
            exclude,
            password,
            overwrite,
            encoding,
            verbose,
            progress,
        } => cmd_extract(
            &archive,
            &ExtractOptions {
                output: &output,
                files: &files,
                include: &include,
                exclude: &exclude,
                password: password.as_deref(),
                overwrite,
                encoding: encoding.as_deref(),
                verbose,
                progress,
            },
        ),
        Commands::Test {
            archive,
            password,
            verbose,
        } => cmd_test(&archive, password.as_deref(), verbose),
        Commands::Create {
            archive,
            files,
            compression,
            password,
            legacy_check,
            comment,
            verbose,
        } => cmd_create(
            &archive,
            &files,
            &CreateOptions {
                level: compression.into(),
                password: password.as_deref(),
                legacy_check,
                comment: comment.as_deref(),
                verbose,
            },
        ),
        Commands::Info { archive } => cmd_info(&archive),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
