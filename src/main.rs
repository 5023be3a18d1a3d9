use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;

use cipher_triage::cli::Args;
use cipher_triage::{
    AnalysisReport, MappedInput, RecoveryOutcome, StrategyTuning, TriageEngine,
};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = args.validate() {
        eprintln!("Invalid arguments: {}", e);
        std::process::exit(1);
    }

    if args.threads > 0 {
        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global();
    }

    if !args.json {
        println!("Cipher Triage v0.1.0");
        println!("{}", "=".repeat(60));
        println!("  Inputs:          {}", args.files.len());
        println!("  Recovery:        {}", args.recover);
        println!("  Priority:        {:?}", args.priority);
        println!("  Timeout base:    {} s", args.timeout_secs);
        println!("  Size ceiling:    {} MB", args.max_size_mb);
        println!();
    }

    if args.recover {
        fs::create_dir_all(&args.output)
            .with_context(|| format!("creating output directory {}", args.output.display()))?;
    }

    let engine = TriageEngine::with_timeout(args.base_timeout());
    let tuning = StrategyTuning::for_priority(args.priority.into());

    let failed: Vec<_> = args
        .files
        .par_iter()
        .filter_map(|path| match process_file(&engine, &args, tuning, path) {
            Ok(()) => None,
            Err(e) => {
                eprintln!("[WARN] {}: {:#}", path.display(), e);
                Some(path.clone())
            }
        })
        .collect();

    if !failed.is_empty() {
        anyhow::bail!("{} of {} inputs failed", failed.len(), args.files.len());
    }

    Ok(())
}

fn process_file(
    engine: &TriageEngine,
    args: &Args,
    tuning: StrategyTuning,
    path: &Path,
) -> Result<()> {
    let input = MappedInput::open_with_limit(path, args.max_size_bytes())
        .with_context(|| format!("opening {}", path.display()))?;

    let report = engine.analyze(input.bytes());

    let outcome = if args.recover {
        let strategy = report.strategy.with_tuning(tuning);
        Some(engine.recover(input.bytes(), &strategy))
    } else {
        None
    };

    if args.json {
        print_json(path, &report, outcome.as_ref());
    } else {
        print_text(path, &report, outcome.as_ref());
    }

    if let Some(outcome) = &outcome {
        if let Some(content) = &outcome.content {
            let target = recovered_path(&args.output, path);
            fs::write(&target, content.bytes())
                .with_context(|| format!("writing {}", target.display()))?;
        }
    }

    Ok(())
}

fn print_text(path: &Path, report: &AnalysisReport, outcome: Option<&RecoveryOutcome>) {
    let mut block = String::new();

    block.push_str(&format!("File: {}\n", path.display()));
    block.push_str(&format!("  Size:            {} bytes\n", report.file_size));
    block.push_str(&format!("  Entropy:         {:.3}\n", report.entropy));
    block.push_str(&format!("  Classification:  {}\n", report.encryption_type));
    block.push_str(&format!(
        "  Strategy:        {} (p={:.1})\n",
        report.strategy.kind.name(),
        report.strategy.success_probability
    ));
    block.push_str(&format!(
        "  Analysis time:   {:.3} s\n",
        report.analysis_time.as_secs_f64()
    ));

    if let Some(outcome) = outcome {
        block.push_str(&format!("  Outcome:         {}\n", outcome.success_level));
        block.push_str(&format!("  Confidence:      {:.2}\n", outcome.confidence));
        block.push_str(&format!("  Key found:       {}\n", outcome.key_found));
        if let Some(content) = &outcome.content {
            if content.is_simulated() {
                block.push_str("  Note:            content is a simulated placeholder\n");
            }
        }
        if let Some(id) = &outcome.cache_key {
            block.push_str(&format!("  Attempt id:      {}\n", id));
        }
        block.push_str(&format!("  Message:         {}\n", outcome.message));
    }

    println!("{}", block);
}

fn print_json(path: &Path, report: &AnalysisReport, outcome: Option<&RecoveryOutcome>) {
    let mut value = json!({
        "file": path.display().to_string(),
        "encryption_type": report.encryption_type.to_string(),
        "file_size": report.file_size,
        "entropy": report.entropy,
        "analysis_time_secs": report.analysis_time.as_secs_f64(),
        "strategy": report.strategy,
    });

    if let Some(outcome) = outcome {
        value["recovery"] = json!({
            "success_level": outcome.success_level.to_string(),
            "confidence": outcome.confidence,
            "key_found": outcome.key_found,
            "message": &outcome.message,
            "execution_time_secs": outcome.execution_time.as_secs_f64(),
            "simulated": outcome.content.as_ref().map(|c| c.is_simulated()),
            "cache_key": outcome.cache_key.as_ref().map(|id| id.to_string()),
            "details": &outcome.details,
        });
    }

    println!("{}", value);
}

fn recovered_path(output_dir: &Path, input: &Path) -> std::path::PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "recovered".to_string());

    let name = match input.extension() {
        Some(ext) => format!("{}_recovered.{}", stem, ext.to_string_lossy()),
        None => format!("{}_recovered", stem),
    };

    output_dir.join(name)
}
