//! CLI handler for corpus evaluation.

use anyhow::{bail, Result};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{error, info};

use crate::cli::EvaluateCliArgs;
use crate::config::Config;
use crate::corpus::{load_samples, read_manifest};
use crate::evaluation::{
    write_csv, EvaluationReport, Evaluator, RunLog, Transcription, TranscriptionSink,
};
use crate::global;
use crate::normalizer::Normalizer;
use crate::transcription::Transcriber;
use crate::wer::format_wer_percentage;

/// Forwards records to the run log and advances the progress bar.
struct ProgressSink {
    run_log: RunLog,
    progress: Option<ProgressBar>,
}

impl TranscriptionSink for ProgressSink {
    fn record(&mut self, transcription: &Transcription) -> Result<()> {
        self.run_log.record(transcription)?;
        if let Some(pb) = &self.progress {
            pb.set_message(format!(
                "last WER {}",
                format_wer_percentage(transcription.wer)
            ));
            pb.inc(1);
        }
        Ok(())
    }
}

pub async fn handle_evaluate_command(args: EvaluateCliArgs, config: Config) -> Result<()> {
    let mut settings = config.provider.clone();
    if let Some(provider) = args.provider {
        settings.name = Some(provider);
    }
    if let Some(model) = args.model {
        settings.model = Some(model);
    }
    if let Some(language) = args.language {
        settings.language = Some(language);
    }

    let normalizer_kind = args.normalizer.unwrap_or(config.evaluation.normalizer);
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| config.evaluation.output_dir.clone());
    let report_prefix = args
        .report_prefix
        .unwrap_or_else(|| config.evaluation.report_prefix.clone());
    let keep_run_log = args.keep_run_log || config.evaluation.keep_run_log;

    let mut entries = read_manifest(&args.manifest)?;
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }
    if entries.is_empty() {
        bail!("Manifest {} has no entries", args.manifest.display());
    }

    let transcriber = Transcriber::from_settings(&settings)?;
    let normalizer = Normalizer::create(normalizer_kind)?;
    let samples = load_samples(&entries)?;

    let run_log_path = global::runs_dir()?.join(format!(
        "{}.jsonl",
        Local::now().format("%Y%m%d-%H%M%S")
    ));
    let progress = if args.no_progress || args.json {
        None
    } else {
        Some(create_progress_bar(samples.len() as u64)?)
    };
    let mut sink = ProgressSink {
        run_log: RunLog::create(&run_log_path)?,
        progress,
    };

    let evaluator = Evaluator::new(transcriber.provider(), &normalizer, transcriber.language());
    let report = match evaluator.run(&samples, &mut sink).await {
        Ok(report) => report,
        Err(e) => {
            if let Some(pb) = &sink.progress {
                pb.abandon();
            }
            error!(
                "Evaluation aborted after {} samples, partial results in {:?}",
                sink.run_log.records(),
                run_log_path
            );
            return Err(e);
        }
    };
    if let Some(pb) = &sink.progress {
        pb.finish_and_clear();
    }

    let report_path = write_csv(&report, &output_dir, &report_prefix)?;

    if keep_run_log {
        info!("Run log kept at {:?}", sink.run_log.path());
    } else {
        sink.run_log.remove()?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, transcriber.provider().name(), normalizer_kind);
        println!("Report:     {}", report_path.display());
    }

    Ok(())
}

fn print_summary(report: &EvaluationReport, provider: &str, normalizer: impl std::fmt::Display) {
    let totals = report.total_measures();

    println!();
    println!("Evaluation Summary");
    println!("==================");
    println!();
    println!("Provider:   {}", provider);
    println!("Normalizer: {}", normalizer);
    println!("Samples:    {}", report.len());
    println!("Average:    {}", format_wer_percentage(report.average_wer));
    println!(
        "Errors:     {} substitutions, {} deletions, {} insertions over {} words",
        totals.substitutions, totals.deletions, totals.insertions, totals.reference_words
    );

    let worst: Vec<_> = report
        .transcriptions
        .iter()
        .take(5)
        .filter(|t| t.wer > 0.0)
        .collect();
    if !worst.is_empty() {
        println!();
        println!("Highest WER:");
        for t in worst {
            println!(
                "  #{:<5} {:>8}  {}",
                t.sample_index + 1,
                format_wer_percentage(t.wer),
                t.reference
            );
        }
    }
    println!();
}

fn create_progress_bar(len: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("━╸━"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
