//! Evaluation pipeline: transcribe every sample, normalize the hypothesis,
//! score it against the reference and aggregate the results.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::corpus::Sample;
use crate::normalizer::TranscriptionNormalizer;
use crate::transcription::TranscriptionProvider;
use crate::wer::{format_wer_percentage, measures, WordErrorMeasures};

mod report;
mod sink;

pub use report::{format_as_csv, report_file_name, write_csv, CSV_HEADER};
pub use sink::{RunLog, TranscriptionSink};

/// Result for one sample. Created once and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    /// 0-based position in the corpus.
    pub sample_index: usize,
    pub reference: String,
    pub raw_hypothesis: String,
    pub normalized_hypothesis: String,
    pub wer: f64,
    pub measures: WordErrorMeasures,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Sorted by descending WER; ties keep corpus order.
    pub transcriptions: Vec<Transcription>,
    pub average_wer: f64,
}

impl EvaluationReport {
    /// Aggregate per-sample results. Input order does not affect the mean.
    pub fn new(mut transcriptions: Vec<Transcription>) -> Self {
        let average_wer = if transcriptions.is_empty() {
            0.0
        } else {
            transcriptions.iter().map(|t| t.wer).sum::<f64>() / transcriptions.len() as f64
        };
        transcriptions.sort_by(|a, b| b.wer.total_cmp(&a.wer));

        Self {
            transcriptions,
            average_wer,
        }
    }

    pub fn len(&self) -> usize {
        self.transcriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcriptions.is_empty()
    }

    /// Error counts summed over all samples.
    pub fn total_measures(&self) -> WordErrorMeasures {
        self.transcriptions
            .iter()
            .fold(WordErrorMeasures::default(), |mut total, t| {
                total.hits += t.measures.hits;
                total.substitutions += t.measures.substitutions;
                total.deletions += t.measures.deletions;
                total.insertions += t.measures.insertions;
                total.reference_words += t.measures.reference_words;
                total
            })
    }
}

pub struct Evaluator<'a> {
    provider: &'a dyn TranscriptionProvider,
    normalizer: &'a dyn TranscriptionNormalizer,
    language: String,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        provider: &'a dyn TranscriptionProvider,
        normalizer: &'a dyn TranscriptionNormalizer,
        language: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            normalizer,
            language: language.into(),
        }
    }

    /// Process samples one at a time in corpus order, handing each result to
    /// `sink` before moving on. The first failure aborts the run.
    pub async fn run(
        &self,
        samples: &[Sample],
        sink: &mut dyn TranscriptionSink,
    ) -> Result<EvaluationReport> {
        if samples.is_empty() {
            bail!("Corpus is empty, nothing to evaluate");
        }

        info!(
            "Evaluating {} samples with {} and the {} normalizer",
            samples.len(),
            self.provider.name(),
            self.normalizer.name()
        );

        let mut transcriptions = Vec::with_capacity(samples.len());
        for (sample_index, sample) in samples.iter().enumerate() {
            let raw_hypothesis = self
                .provider
                .transcribe(&sample.audio, &self.language)
                .await
                .with_context(|| format!("Transcription failed for sample {}", sample_index + 1))?;

            let transcription = score(sample_index, sample, raw_hypothesis, self.normalizer);
            debug!(
                "Sample {}: WER {}",
                sample_index + 1,
                format_wer_percentage(transcription.wer)
            );

            sink.record(&transcription).with_context(|| {
                format!("Failed to record result for sample {}", sample_index + 1)
            })?;
            transcriptions.push(transcription);
        }

        let report = EvaluationReport::new(transcriptions);
        info!(
            "Average WER over {} samples: {}",
            report.len(),
            format_wer_percentage(report.average_wer)
        );
        Ok(report)
    }
}

/// Normalize a raw hypothesis and score it against the sample's reference.
pub fn score(
    sample_index: usize,
    sample: &Sample,
    raw_hypothesis: String,
    normalizer: &dyn TranscriptionNormalizer,
) -> Transcription {
    let normalized_hypothesis = normalizer.normalize(&raw_hypothesis);
    let measures = measures(&sample.reference_text, &normalized_hypothesis);

    Transcription {
        sample_index,
        reference: sample.reference_text.clone(),
        raw_hypothesis,
        normalized_hypothesis,
        wer: measures.wer(),
        measures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioBuffer;
    use crate::normalizer::{AtcNormalizer, TrimNormalizer};
    use anyhow::anyhow;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    /// Returns queued responses in order.
    struct ScriptedProvider {
        responses: Mutex<VecDeque<Result<String>>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    impl TranscriptionProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn transcribe<'a>(
            &'a self,
            _audio: &'a AudioBuffer,
            _language: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
            let next = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow!("no scripted response left")));
            Box::pin(async move { next })
        }
    }

    fn sample(text: &str) -> Sample {
        Sample {
            audio: AudioBuffer::new(vec![0.0; 160], 16000),
            reference_text: text.to_string(),
        }
    }

    fn transcription(index: usize, wer: f64) -> Transcription {
        Transcription {
            sample_index: index,
            reference: String::new(),
            raw_hypothesis: String::new(),
            normalized_hypothesis: String::new(),
            wer,
            measures: WordErrorMeasures::default(),
        }
    }

    #[tokio::test]
    async fn test_echoed_references_score_zero() {
        let references = [
            "cleared for takeoff runway two four left",
            "descend to flight level three five zero",
        ];
        let samples: Vec<Sample> = references.iter().map(|r| sample(r)).collect();
        let provider = ScriptedProvider::new(
            references.iter().map(|r| Ok(r.to_string())).collect(),
        );
        let normalizer = AtcNormalizer::new().unwrap();
        let mut sink: Vec<Transcription> = Vec::new();

        let report = Evaluator::new(&provider, &normalizer, "en")
            .run(&samples, &mut sink)
            .await
            .unwrap();

        assert_eq!(report.average_wer, 0.0);
        assert_eq!(report.len(), 2);
        assert!(report.transcriptions.iter().all(|t| t.wer == 0.0));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].sample_index, 0);
        assert_eq!(sink[1].sample_index, 1);
    }

    #[tokio::test]
    async fn test_raw_model_output_is_normalized_before_scoring() {
        let samples = vec![sample("climb flight level three five zero")];
        let provider = ScriptedProvider::new(vec![Ok("Climb FL350.".to_string())]);
        let normalizer = AtcNormalizer::new().unwrap();
        let mut sink: Vec<Transcription> = Vec::new();

        let report = Evaluator::new(&provider, &normalizer, "en")
            .run(&samples, &mut sink)
            .await
            .unwrap();

        let row = &report.transcriptions[0];
        assert_eq!(row.raw_hypothesis, "Climb FL350.");
        assert_eq!(row.normalized_hypothesis, "climb flight level three five zero");
        assert_eq!(row.wer, 0.0);
    }

    #[tokio::test]
    async fn test_rows_sorted_by_descending_wer() {
        let samples = vec![sample("roger"), sample("cleared to land"), sample("wilco")];
        let provider = ScriptedProvider::new(vec![
            Ok("roger".to_string()),
            Ok("cleared land".to_string()),
            Ok("say again".to_string()),
        ]);
        let normalizer = TrimNormalizer::new();
        let mut sink: Vec<Transcription> = Vec::new();

        let report = Evaluator::new(&provider, &normalizer, "en")
            .run(&samples, &mut sink)
            .await
            .unwrap();

        let order: Vec<usize> = report.transcriptions.iter().map(|t| t.sample_index).collect();
        assert_eq!(order, vec![2, 1, 0]);
        // Sink saw corpus order.
        let seen: Vec<usize> = sink.iter().map(|t| t.sample_index).collect();
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_provider_failure_aborts_with_sample_context() {
        let samples = vec![sample("roger"), sample("wilco"), sample("standby")];
        let provider = ScriptedProvider::new(vec![
            Ok("roger".to_string()),
            Err(anyhow!("connection reset")),
        ]);
        let normalizer = TrimNormalizer::new();
        let mut sink: Vec<Transcription> = Vec::new();

        let err = Evaluator::new(&provider, &normalizer, "en")
            .run(&samples, &mut sink)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("sample 2"));
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_corpus_is_rejected() {
        let provider = ScriptedProvider::new(vec![]);
        let normalizer = TrimNormalizer::new();
        let mut sink: Vec<Transcription> = Vec::new();

        let result = Evaluator::new(&provider, &normalizer, "en")
            .run(&[], &mut sink)
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_average_is_order_independent() {
        let forward = EvaluationReport::new(vec![
            transcription(0, 0.25),
            transcription(1, 1.5),
            transcription(2, 0.0),
        ]);
        let reversed = EvaluationReport::new(vec![
            transcription(2, 0.0),
            transcription(1, 1.5),
            transcription(0, 0.25),
        ]);
        assert!((forward.average_wer - reversed.average_wer).abs() < 1e-12);
        assert!((forward.average_wer - 1.75 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_equal_wer_keeps_corpus_order() {
        let report = EvaluationReport::new(vec![
            transcription(0, 0.5),
            transcription(1, 0.5),
            transcription(2, 1.0),
        ]);
        let order: Vec<usize> = report.transcriptions.iter().map(|t| t.sample_index).collect();
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn test_total_measures_sum_rows() {
        let sample = sample("cleared to land");
        let normalizer = TrimNormalizer::new();
        let report = EvaluationReport::new(vec![
            score(0, &sample, "cleared land".to_string(), &normalizer),
            score(1, &sample, "cleared to land now".to_string(), &normalizer),
        ]);
        let total = report.total_measures();
        assert_eq!(total.deletions, 1);
        assert_eq!(total.insertions, 1);
        assert_eq!(total.reference_words, 6);
    }
}
