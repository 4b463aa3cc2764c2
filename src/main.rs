//! Main entry point for the lazyunzip CLI application.
//!
//! This binary lists, tests and extracts ZIP entries from both the local
//! filesystem and remote HTTP URLs, reading only the parts of the archive it
//! needs.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use lazyunzip::cli::basename;
use lazyunzip::{Archive, Cli, Entry, HttpRangeReader, LocalFileReader, ReadAt};

/// Application entry point.
///
/// Parses command-line arguments and dispatches to the appropriate handler
/// based on whether the input is a local file or HTTP URL.
fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    if cli.is_http_url() {
        // Handle remote ZIP file via HTTP Range requests
        let reader = HttpRangeReader::new(cli.file.clone())?;
        let transferred_before = reader.transferred_bytes();

        process_zip(&reader, &cli)?;

        // Display network transfer statistics for HTTP sources
        if !cli.is_quiet() {
            let transferred = reader.transferred_bytes() - transferred_before;
            eprintln!("\nTotal bytes transferred: {}", format_size(transferred));
        }
    } else {
        let reader = LocalFileReader::new(Path::new(&cli.file))
            .with_context(|| format!("cannot open {}", cli.file))?;
        process_zip(&reader, &cli)?;
    }

    Ok(())
}

/// Process a ZIP archive based on CLI options.
///
/// - Comment mode (`-z`): print the archive comment
/// - List mode (`-l` or `-v`): display archive contents
/// - Test mode (`-t`): read every entry and check its CRC-32
/// - Extract mode: extract files matching the specified filters
fn process_zip<R: ReadAt + ?Sized>(reader: &R, cli: &Cli) -> Result<()> {
    let archive = Archive::open(reader)
        .with_context(|| format!("{}: cannot find a usable ZIP central directory", cli.file))?;
    log::info!("{}: {} entries", cli.file, archive.entry_count());

    if cli.comment {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(archive.comment())?;
        if !archive.comment().is_empty() {
            stdout.write_all(b"\n")?;
        }
        return Ok(());
    }

    if cli.list || cli.verbose {
        return list_files(&archive, cli.verbose);
    }

    if cli.test {
        return test_archive(&archive, cli);
    }

    // In pipe mode a marker separates entries when more than one is written.
    // Counting needs only the central directory, no content is read.
    let show_filename = cli.pipe && {
        let mut selected = 0usize;
        for entry in archive.entries() {
            let entry = entry?;
            if !entry.is_dir() && cli.selects(entry.file_name()) {
                selected += 1;
            }
        }
        selected > 1
    };

    for entry in archive.entries() {
        let entry = entry?;

        // Directories are created as needed while extracting files
        if entry.is_dir() || !cli.selects(entry.file_name()) {
            continue;
        }

        extract_file(&entry, cli, show_filename)
            .with_context(|| format!("failed to extract {}", entry.file_name()))?;
    }

    Ok(())
}

/// List files in the ZIP archive.
///
/// Supports two output formats:
/// - Simple format (`-l`): Just file names, one per line
/// - Verbose format (`-v`): Detailed table with size, compression ratio, and timestamps
fn list_files<R: ReadAt + ?Sized>(archive: &Archive<'_, R>, verbose: bool) -> Result<()> {
    if verbose {
        println!(
            "{:>10}  {:>10}  {:>5}  {:>10}  {:>5}  Name",
            "Length", "Size", "Cmpr", "Date", "Time"
        );
        println!("{}", "-".repeat(70));
    }

    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;
    let mut file_count = 0usize;

    for entry in archive.entries() {
        let entry = entry?;

        if !verbose {
            println!("{}", entry.file_name());
            continue;
        }

        let record = entry.record();
        let (year, month, day) = record.mod_date();
        let (hour, minute, _second) = record.mod_time();

        println!(
            "{:>10}  {:>10}  {}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
            entry.uncompressed_size(),
            entry.compressed_size(),
            ratio(entry.compressed_size(), entry.uncompressed_size()),
            year,
            month,
            day,
            hour,
            minute,
            entry.file_name()
        );

        if !entry.is_dir() {
            total_uncompressed += entry.uncompressed_size();
            total_compressed += entry.compressed_size();
            file_count += 1;
        }
    }

    if verbose {
        println!("{}", "-".repeat(70));
        println!(
            "{:>10}  {:>10}  {}  {:>21}  {} files",
            total_uncompressed,
            total_compressed,
            ratio(total_compressed, total_uncompressed),
            "",
            file_count
        );
    }

    Ok(())
}

/// Read every file entry with CRC-32 verification, like `unzip -t`.
fn test_archive<R: ReadAt + ?Sized>(archive: &Archive<'_, R>, cli: &Cli) -> Result<()> {
    let mut failures = 0usize;

    for entry in archive.entries() {
        let entry = entry?;
        if entry.is_dir() || !cli.selects(entry.file_name()) {
            continue;
        }

        match entry.read_content_checked() {
            Ok(_) => {
                if !cli.is_quiet() {
                    println!("    testing: {:<40}  OK", entry.file_name());
                }
            }
            Err(e) => {
                failures += 1;
                if !cli.is_very_quiet() {
                    println!("    testing: {:<40}  {}", entry.file_name(), e);
                }
            }
        }
    }

    if failures > 0 {
        bail!("{} error(s) detected in {}", failures, cli.file);
    }
    if !cli.is_very_quiet() {
        println!("No errors detected in compressed data of {}.", cli.file);
    }
    Ok(())
}

/// Extract a single file from the archive.
///
/// Handles various extraction options:
/// - Pipe mode (`-p`): Write to stdout instead of file
/// - Custom output directory (`-d`): Extract to specified directory
/// - Junk paths (`-j`): Ignore directory structure in archive
/// - Overwrite control (`-n`, `-o`): Handle existing files
fn extract_file<R: ReadAt + ?Sized>(
    entry: &Entry<'_, R>,
    cli: &Cli,
    show_filename: bool,
) -> Result<()> {
    if cli.pipe {
        let data = entry.read_content()?;
        let mut stdout = std::io::stdout().lock();
        if show_filename {
            stdout.write_all(format!("--- {} ---\n", entry.file_name()).as_bytes())?;
        }
        stdout.write_all(&data)?;
        return Ok(());
    }

    let Some(relative) = member_path(entry.file_name(), cli.junk_paths) else {
        log::warn!("skipping {}: unsafe path", entry.file_name());
        return Ok(());
    };
    let output_path = match cli.extract_dir {
        Some(ref dir) => PathBuf::from(dir).join(relative),
        None => relative,
    };

    if output_path.exists() {
        if cli.never_overwrite {
            if !cli.is_quiet() {
                eprintln!("Skipping: {} (file exists)", entry.file_name());
            }
            return Ok(());
        }

        if !cli.overwrite {
            if !cli.is_quiet() {
                eprintln!("Skipping: {} (use -o to overwrite)", entry.file_name());
            }
            return Ok(());
        }
    }

    if !cli.is_quiet() {
        println!("  extracting: {}", entry.file_name());
    }

    let data = entry.read_content()?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&output_path, data)?;

    Ok(())
}

/// Relative output path for an archive member.
///
/// Returns `None` for absolute names or names that climb out of the
/// extraction directory.
fn member_path(name: &str, junk_paths: bool) -> Option<PathBuf> {
    let name = if junk_paths { basename(name) } else { name };
    let path = Path::new(name);

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Compression ratio as percentage saved.
fn ratio(compressed: u64, uncompressed: u64) -> String {
    if uncompressed > 0 && compressed <= uncompressed {
        format!("{:>4}%", 100 - (compressed * 100 / uncompressed))
    } else {
        "   0%".to_string()
    }
}

/// Format a byte size into a human-readable string.
///
/// Automatically selects the appropriate unit (bytes, KB, MB, GB)
/// based on the size magnitude.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
