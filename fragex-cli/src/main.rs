//! fragex CLI - fragment extraction for code-splitting compiler backends.
//!
//! Loads a serialized program bundle (entity model, instruction stream,
//! resolution map, per-split-point liveness snapshots), extracts one
//! fragment per split point, and reports what each fragment ships.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use fragex_core::{
    init_logging, load_bundle, load_config, print_json, print_plain, render_fragment,
    AnalysisLiveness, ExtractionReport, FragmentExtractor, TracingStatementLogger,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Fragment extractor for code-splitting compiler backends"
)]
struct Cli {
    /// Path to the serialized program bundle (JSON)
    bundle: PathBuf,

    /// Output the report in JSON format
    #[arg(long)]
    json: bool,

    /// Emit log events as JSON records
    #[arg(long)]
    log_json: bool,

    /// Write each rendered fragment to DIR/fragment_<n>.js
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Log every per-statement keep/drop decision (needs RUST_LOG=trace)
    #[arg(long)]
    trace_statements: bool,

    /// Append the fragment-loaded notification call to each fragment
    #[arg(long)]
    on_loaded_calls: bool,
}

fn main() -> Result<()> {
    // Global panic guard so an internal error still exits cleanly.
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] fragex internal error: {}", info);
        eprintln!("[PANIC] The process will exit with a failure code.");
    }));

    let cli = Cli::parse();
    init_logging(cli.log_json);

    // Pick up fragex.toml sitting next to the bundle, if any.
    let config_dir = cli.bundle.parent().unwrap_or_else(|| Path::new("."));
    let config = load_config(config_dir)
        .with_context(|| format!("Failed to read config near {}", cli.bundle.display()))?
        .unwrap_or_default();

    let bundle = load_bundle(&cli.bundle)
        .with_context(|| format!("Failed to load bundle {}", cli.bundle.display()))?;
    let snapshots: Vec<AnalysisLiveness> = bundle
        .snapshots
        .iter()
        .cloned()
        .map(AnalysisLiveness::new)
        .collect();

    let mut extractor = FragmentExtractor::new(
        &bundle.program,
        &bundle.stream,
        &bundle.map,
        bundle.well_known,
    );
    if cli.trace_statements || config.trace_statements.unwrap_or(false) {
        extractor.set_statement_logger(Box::new(TracingStatementLogger));
    }

    let mut fragments = extractor
        .extract_sequence(&snapshots)
        .context("Fragment extraction failed")?;

    if cli.on_loaded_calls {
        for (split_point, fragment) in fragments.iter_mut().enumerate() {
            fragment.extend(extractor.create_on_loaded_call(split_point as u32));
        }
    }

    if let Some(dir) = &cli.out_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        for (split_point, fragment) in fragments.iter().enumerate() {
            let path = dir.join(format!("fragment_{}.js", split_point));
            fs::write(&path, render_fragment(&bundle.program, fragment))
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }

    let report = ExtractionReport::new(&bundle.program, &fragments);
    let json_output = cli.json
        || config
            .output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            == Some("json");
    if json_output {
        print_json(&report);
    } else {
        print_plain(&report);
    }

    Ok(())
}
