//! CSV report output.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use super::EvaluationReport;

pub const CSV_HEADER: &str = "sample,reference,hypothesis,wer";

/// `<prefix>-<average WER percent>-WER-evaluation-data.csv`
pub fn report_file_name(prefix: &str, average_wer: f64) -> String {
    format!(
        "{}-{:.2}-WER-evaluation-data.csv",
        prefix,
        average_wer * 100.0
    )
}

/// Render rows in report order. `sample` is 1-based and `wer` is a
/// percentage with two decimals.
pub fn format_as_csv(report: &EvaluationReport) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');
    for t in &report.transcriptions {
        csv.push_str(&format!(
            "{},{},{},{:.2}\n",
            t.sample_index + 1,
            csv_field(&t.reference),
            csv_field(&t.normalized_hypothesis),
            t.wer * 100.0
        ));
    }
    csv
}

pub fn write_csv(report: &EvaluationReport, output_dir: &Path, prefix: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir).context("Failed to create report directory")?;
    let path = output_dir.join(report_file_name(prefix, report.average_wer));

    std::fs::write(&path, format_as_csv(report))
        .with_context(|| format!("Failed to write report {}", path.display()))?;

    info!("Report saved to {:?}", path);
    Ok(path)
}

fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::Transcription;
    use crate::wer::measures;
    use tempfile::tempdir;

    fn report() -> EvaluationReport {
        let row = |index: usize, reference: &str, hypothesis: &str| {
            let m = measures(reference, hypothesis);
            Transcription {
                sample_index: index,
                reference: reference.to_string(),
                raw_hypothesis: hypothesis.to_string(),
                normalized_hypothesis: hypothesis.to_string(),
                wer: m.wer(),
                measures: m,
            }
        };
        EvaluationReport::new(vec![
            row(0, "cleared to land", "cleared to land"),
            row(1, "climb, maintain", "climb and maintain"),
        ])
    }

    #[test]
    fn test_file_name_embeds_average_percent() {
        assert_eq!(
            report_file_name("whisper-medium.en", 0.123456),
            "whisper-medium.en-12.35-WER-evaluation-data.csv"
        );
        assert_eq!(
            report_file_name("tuned", 0.0),
            "tuned-0.00-WER-evaluation-data.csv"
        );
    }

    #[test]
    fn test_csv_rows_follow_report_order() {
        let csv = format_as_csv(&report());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "2,\"climb, maintain\",climb and maintain,100.00");
        assert_eq!(lines[2], "1,cleared to land,cleared to land,0.00");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_field_escapes_quotes() {
        assert_eq!(csv_field("say \"again\""), "\"say \"\"again\"\"\"");
        assert_eq!(csv_field("roger"), "roger");
    }

    #[test]
    fn test_write_csv_creates_named_file() {
        let dir = tempdir().unwrap();
        let path = write_csv(&report(), &dir.path().join("reports"), "model").unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "model-50.00-WER-evaluation-data.csv"
        );
        assert!(std::fs::read_to_string(path)
            .unwrap()
            .starts_with(CSV_HEADER));
    }
}
