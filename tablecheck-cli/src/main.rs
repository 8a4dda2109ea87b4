//! tablecheck CLI - unused-table detector for Access database exports.
//!
//! Features:
//! - Parallel ingestion of the four XML export files
//! - Dependency-graph usage propagation with cycle handling
//! - Plain, JSON, and self-contained HTML report output
//! - CI-friendly exit codes (0 = clean, 1 = unused tables, 2 = error)

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use tablecheck_core::{
    generate_html_report, init_structured_logging, load_all, load_config, print_json, print_plain,
    AnalysisConfig, Analyzer,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Unused-table detector for Access database exports")]
pub struct Cli {
    /// Tables export file
    #[arg(default_value = "Analysis_Tables.xml")]
    tables_file: String,

    /// Database objects export file
    #[arg(default_value = "Analysis_Objects.xml")]
    objects_file: String,

    /// Object-to-table dependency export file
    #[arg(default_value = "Analysis_TableDependencies.xml")]
    table_dependencies_file: String,

    /// Object-to-object dependency export file
    #[arg(default_value = "Analysis_ObjectDependencies.xml")]
    object_dependencies_file: String,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Generate the HTML usage report
    #[arg(long)]
    html: bool,

    /// Write the HTML report to a specified file instead of stdout
    #[arg(long)]
    html_file: Option<String>,

    /// Treat inactive dependency edges as active
    #[arg(long)]
    include_inactive: bool,

    /// Show the per-table reference breakdown
    #[arg(long, short)]
    verbose: bool,

    /// Suppress the console report (exit code only)
    #[arg(long, short)]
    quiet: bool,
}

/// Security: Validates output file paths to prevent path traversal attacks.
///
/// Rejects:
/// - Absolute paths (must be relative to current directory)
/// - Paths containing `..` (parent directory traversal)
/// - Paths with null bytes (injection attacks)
///
/// Returns the validated PathBuf or an error.
fn validate_output_path(path: &str) -> Result<PathBuf> {
    if path.contains('\0') {
        return Err(anyhow!("Output path contains null bytes"));
    }

    let p = PathBuf::from(path);

    if p.is_absolute() {
        return Err(anyhow!(
            "Output path must be relative, not absolute: {}",
            path
        ));
    }

    for component in p.components() {
        if matches!(component, std::path::Component::ParentDir) {
            return Err(anyhow!(
                "Path traversal (..) not allowed in output paths: {}",
                path
            ));
        }
    }

    let normalized = path.replace('\\', "/");
    if normalized.contains("/../") || normalized.starts_with("../") {
        return Err(anyhow!("Path traversal attempt detected: {}", path));
    }

    Ok(p)
}

fn run(cli: &Cli) -> Result<i32> {
    // 1. Load tablecheck.toml if present (safe - don't fail on config errors)
    let mut include_inactive = cli.include_inactive;
    let mut format_from_config: Option<String> = None;
    match load_config(Path::new(".")) {
        Ok(Some(cfg)) => {
            if let Some(flag) = cfg.include_inactive {
                include_inactive = include_inactive || flag;
            }
            format_from_config = cfg.output.and_then(|o| o.format);
        }
        Ok(None) => {} // No config file - that's fine
        Err(e) => {
            eprintln!("[WARN] config load failed: {}", e);
        }
    }

    let mut config = AnalysisConfig::new(
        &cli.tables_file,
        &cli.objects_file,
        &cli.table_dependencies_file,
        &cli.object_dependencies_file,
    );
    config.verbose = cli.verbose;
    config.console_output = !cli.quiet;
    config.include_inactive = include_inactive;

    // 2. Check inputs up front for a readable error instead of four partial ones
    for file in config.input_files() {
        if !file.exists() {
            return Err(anyhow!("Input file not found: {}", file.display()));
        }
    }

    // 3. Parse all four exports (rayon-parallel)
    let data = load_all(&config).context("Failed to load export files")?;

    // 4. Analyze
    let result = Analyzer::new()
        .include_inactive(config.include_inactive)
        .analyze(
            data.tables,
            data.objects,
            &data.table_dependencies,
            &data.object_dependencies,
        )
        .context("Analysis failed")?;

    let unused_count = result.statistics.unused_tables;

    // 5. HTML report (if requested)
    if cli.html || cli.html_file.is_some() {
        let html = generate_html_report(&result);
        if let Some(ref file) = cli.html_file {
            let safe_path = validate_output_path(file)
                .with_context(|| format!("Invalid output path: {}", file))?;
            fs::write(&safe_path, &html)
                .with_context(|| format!("Failed to write HTML report to {}", safe_path.display()))?;
            eprintln!("HTML report saved to: {}", safe_path.display());
        } else {
            println!("{}", html);
        }
        return Ok(if unused_count == 0 { 0 } else { 1 });
    }

    // 6. Console report
    if config.console_output {
        let json_format = cli.json || format_from_config.as_deref() == Some("json");
        if json_format {
            print_json(&result);
        } else {
            print_plain(&result, config.verbose);
        }
    }

    // 7. Exit code (CI-friendly)
    Ok(if unused_count == 0 { 0 } else { 1 })
}

/// Maps the run outcome to the process exit code: 0 = clean, 1 = unused
/// tables found, 2 = error, including a caught panic.
fn resolve_exit_code(outcome: std::thread::Result<Result<i32>>) -> i32 {
    match outcome {
        Ok(Ok(code)) => code,
        Ok(Err(e)) => {
            eprintln!("[ERROR] {:#}", e);
            2
        }
        Err(_) => 2,
    }
}

fn main() {
    // Global panic guard; the unwind is caught below and exits with code 2
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] tablecheck internal error: {}", info);
        eprintln!("[PANIC] The process will exit safely with code 2.");
    }));

    // Initialize structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging();

    let cli = Cli::parse();

    let outcome = std::panic::catch_unwind(|| run(&cli));
    std::process::exit(resolve_exit_code(outcome));
}
