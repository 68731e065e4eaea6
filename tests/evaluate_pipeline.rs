//! End-to-end evaluation over a manifest of WAV files with a stand-in provider.

use anyhow::{anyhow, Result};
use atc_eval::audio::{write_wav, AudioBuffer};
use atc_eval::corpus::{load_samples, read_manifest};
use atc_eval::evaluation::{write_csv, Evaluator, RunLog, Transcription, CSV_HEADER};
use atc_eval::normalizer::{Normalizer, NormalizerKind};
use atc_eval::transcription::TranscriptionProvider;
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use tempfile::tempdir;

/// Answers by clip length, standing in for a model.
struct LookupProvider {
    answers: HashMap<usize, String>,
}

impl TranscriptionProvider for LookupProvider {
    fn name(&self) -> &'static str {
        "lookup"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn transcribe<'a>(
        &'a self,
        audio: &'a AudioBuffer,
        _language: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            self.answers
                .get(&audio.len())
                .cloned()
                .ok_or_else(|| anyhow!("no answer for clip of {} samples", audio.len()))
        })
    }
}

fn write_corpus(dir: &Path, references: &[&str]) -> std::path::PathBuf {
    std::fs::create_dir_all(dir.join("clips")).unwrap();
    let mut manifest = String::new();
    for (i, reference) in references.iter().enumerate() {
        let clip = dir.join("clips").join(format!("{i}.wav"));
        write_wav(&clip, &AudioBuffer::new(vec![0.0; 1600 * (i + 1)], 16000)).unwrap();
        manifest.push_str(&format!(
            "{{\"audio\":\"clips/{i}.wav\",\"text\":\"{reference}\"}}\n"
        ));
    }
    let path = dir.join("test.jsonl");
    std::fs::write(&path, manifest).unwrap();
    path
}

#[tokio::test]
async fn test_pretrained_style_output_scores_zero_after_normalization() {
    let dir = tempdir().unwrap();
    let manifest = write_corpus(
        dir.path(),
        &[
            "cleared for takeoff runway two four left",
            "descend to flight level three five zero",
        ],
    );
    let provider = LookupProvider {
        answers: HashMap::from([
            (1600, "Cleared for take off, runway 24L.".to_string()),
            (3200, "Descend to FL350.".to_string()),
        ]),
    };

    let samples = load_samples(&read_manifest(&manifest).unwrap()).unwrap();
    let normalizer = Normalizer::create(NormalizerKind::Atc).unwrap();
    let log_path = dir.path().join("runs").join("run.jsonl");
    let mut run_log = RunLog::create(&log_path).unwrap();

    let report = Evaluator::new(&provider, &normalizer, "en")
        .run(&samples, &mut run_log)
        .await
        .unwrap();

    assert_eq!(report.average_wer, 0.0);
    assert_eq!(run_log.records(), 2);

    let logged: Vec<Transcription> = std::fs::read_to_string(&log_path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(logged[0].raw_hypothesis, "Cleared for take off, runway 24L.");
    assert_eq!(
        logged[0].normalized_hypothesis,
        "cleared for takeoff runway two four left"
    );

    let report_path = write_csv(&report, &dir.path().join("reports"), "whisper-medium.en").unwrap();
    assert!(report_path.ends_with("whisper-medium.en-0.00-WER-evaluation-data.csv"));
    let csv = std::fs::read_to_string(report_path).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows[0], CSV_HEADER);
    assert_eq!(rows.len(), 3);
    assert!(rows[1..].iter().all(|row| row.ends_with(",0.00")));
}

#[tokio::test]
async fn test_report_ranks_worst_sample_first() {
    let dir = tempdir().unwrap();
    let manifest = write_corpus(
        dir.path(),
        &["roger", "contact tower one one eight decimal one", "wilco"],
    );
    let provider = LookupProvider {
        answers: HashMap::from([
            (1600, "roger".to_string()),
            (3200, "contact tower 118.1".to_string()),
            (4800, "say again".to_string()),
        ]),
    };

    let samples = load_samples(&read_manifest(&manifest).unwrap()).unwrap();
    let normalizer = Normalizer::create(NormalizerKind::Trim).unwrap();
    let mut sink: Vec<Transcription> = Vec::new();

    let report = Evaluator::new(&provider, &normalizer, "en")
        .run(&samples, &mut sink)
        .await
        .unwrap();

    let order: Vec<usize> = report.transcriptions.iter().map(|t| t.sample_index).collect();
    assert_eq!(order, vec![2, 1, 0]);
    let expected_mean = (0.0 + 5.0 / 7.0 + 2.0) / 3.0;
    assert!((report.average_wer - expected_mean).abs() < 1e-12);
}

#[tokio::test]
async fn test_missing_clip_fails_before_transcription() {
    let dir = tempdir().unwrap();
    let manifest = write_corpus(dir.path(), &["roger"]);
    std::fs::remove_file(dir.path().join("clips").join("0.wav")).unwrap();

    let entries = read_manifest(&manifest).unwrap();
    let err = load_samples(&entries).unwrap_err();
    assert!(err.to_string().contains("not found"));
}
