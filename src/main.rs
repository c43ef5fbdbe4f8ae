use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use humansize::{format_size, BINARY};
use logsweep::{sweep, ScanOptions, SweepConfig, SweepResult};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Strip debug logging calls (console.log by default) from a source tree",
    long_about = None
)]
struct Args {
    /// Directory to sweep (defaults to current directory)
    #[arg(default_value = ".")]
    root: String,

    /// Identifier whose calls are removed
    #[arg(long, short)]
    marker: Option<String>,

    /// Additional file extension to process (can be specified multiple times)
    #[arg(long = "ext", short = 'e', value_name = "EXT")]
    extensions: Vec<String>,

    /// Directory name to skip (can be specified multiple times)
    #[arg(long, short = 'x', value_name = "DIR")]
    exclude: Vec<String>,

    /// Don't skip the default directories (node_modules, dist, ...)
    #[arg(long)]
    no_default_excludes: bool,

    /// Report what would be removed without modifying any file
    #[arg(long)]
    dry_run: bool,

    /// List every removed call with its line number
    #[arg(long, short)]
    list: bool,

    /// Show detailed information while scanning
    #[arg(long, short)]
    verbose: bool,
}

fn print_report(result: &SweepResult, list: bool, dry_run: bool) {
    if result.files.is_empty() {
        println!("No matching calls found.");
    } else {
        for file in &result.files {
            let verb = if file.written { "removed" } else { "to remove" };
            println!(
                "{}: {}",
                file.path.display().to_string().bold(),
                format!("{} {}", file.removed, verb).green()
            );

            if list {
                for span in &file.matches {
                    println!("  {}:{}  {}", file.path.display(), span.line, span.text);
                }
                for span in &file.kept {
                    println!(
                        "  {}:{}  {} {}",
                        file.path.display(),
                        span.line,
                        span.text,
                        "(kept)".yellow()
                    );
                }
            }
        }
        println!();
    }

    println!("========================================");
    println!("Files scanned: {}", result.scanned);
    println!("Files modified: {}", result.files.len());
    println!(
        "Calls removed: {}",
        result.total_removed().to_string().bold()
    );
    println!(
        "Bytes trimmed: {}",
        format_size(result.bytes_trimmed(), BINARY).bold()
    );
    if result.failed > 0 {
        println!(
            "{}",
            format!("Files skipped due to errors: {}", result.failed).red()
        );
    }
    if dry_run {
        println!("Dry run: no files were modified.");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = SweepConfig::from_defaults(&args.root)?
        .with_extensions(&args.extensions)
        .with_excludes(&args.exclude, !args.no_default_excludes);
    if let Some(marker) = &args.marker {
        config = config.with_marker(marker);
    }

    let options = ScanOptions {
        dry_run: args.dry_run,
        verbose: args.verbose,
    };

    let result = sweep(&config, options)?;
    print_report(&result, args.list, args.dry_run);

    Ok(())
}
