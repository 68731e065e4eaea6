//! JSON Lines corpus manifests.
//!
//! One object per line: `{"audio": "clips/0001.wav", "text": "roger"}`.
//! Relative audio paths are resolved against the manifest's directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::CorpusError;
use crate::audio::{read_wav, AudioBuffer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub audio: PathBuf,
    pub text: String,
}

/// A labeled utterance ready for evaluation.
#[derive(Debug, Clone)]
pub struct Sample {
    pub audio: AudioBuffer,
    pub reference_text: String,
}

fn base_dir(manifest: &Path) -> Result<PathBuf, CorpusError> {
    let parent = manifest.parent().unwrap_or_else(|| Path::new(""));
    if parent.is_absolute() {
        return Ok(parent.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|source| CorpusError::Io {
        path: manifest.to_path_buf(),
        source,
    })?;
    Ok(cwd.join(parent))
}

/// Parse a manifest, resolving every audio path to an absolute one.
pub fn read_manifest(path: &Path) -> Result<Vec<ManifestEntry>, CorpusError> {
    let content = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base = base_dir(path)?;

    let mut entries = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut entry: ManifestEntry =
            serde_json::from_str(line).map_err(|source| CorpusError::Malformed {
                path: path.to_path_buf(),
                line: index + 1,
                source,
            })?;
        if entry.audio.is_relative() {
            entry.audio = base.join(&entry.audio);
        }
        entries.push(entry);
    }

    debug!("Read {} entries from {:?}", entries.len(), path);
    Ok(entries)
}

pub fn write_manifest(path: &Path, entries: &[ManifestEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create manifest directory")?;
    }

    let mut file = std::io::BufWriter::new(
        std::fs::File::create(path)
            .with_context(|| format!("Failed to create manifest {}", path.display()))?,
    );
    for entry in entries {
        serde_json::to_writer(&mut file, entry)?;
        file.write_all(b"\n")?;
    }
    file.flush().context("Failed to write manifest")?;

    info!("Wrote {} entries to {:?}", entries.len(), path);
    Ok(())
}

/// Decode the audio for each entry, in order. Stops at the first missing or
/// unreadable file.
pub fn load_samples(entries: &[ManifestEntry]) -> Result<Vec<Sample>> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            if !entry.audio.exists() {
                return Err(CorpusError::MissingAudio {
                    entry: index + 1,
                    audio: entry.audio.clone(),
                }
                .into());
            }
            let audio = read_wav(&entry.audio)?;
            Ok(Sample {
                audio,
                reference_text: entry.text.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::write_wav;
    use tempfile::tempdir;

    #[test]
    fn test_read_manifest_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join("test.jsonl");
        std::fs::write(
            &manifest,
            "{\"audio\":\"clips/1.wav\",\"text\":\"roger\"}\n\n{\"audio\":\"/abs/2.wav\",\"text\":\"wilco\"}\n",
        )
        .unwrap();

        let entries = read_manifest(&manifest).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].audio, dir.path().join("clips/1.wav"));
        assert_eq!(entries[1].audio, PathBuf::from("/abs/2.wav"));
        assert_eq!(entries[1].text, "wilco");
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join("bad.jsonl");
        std::fs::write(
            &manifest,
            "{\"audio\":\"a.wav\",\"text\":\"ok\"}\n{\"audio\":\"b.wav\"}\n",
        )
        .unwrap();

        match read_manifest(&manifest) {
            Err(CorpusError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed error, got {:?}", other),
        }
    }

    #[test]
    fn test_write_then_read_manifest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("train.jsonl");
        let entries = vec![ManifestEntry {
            audio: dir.path().join("a.wav"),
            text: "cleared to land".to_string(),
        }];

        write_manifest(&path, &entries).unwrap();
        assert_eq!(read_manifest(&path).unwrap(), entries);
    }

    #[test]
    fn test_load_samples_decodes_audio() {
        let dir = tempdir().unwrap();
        let wav = dir.path().join("a.wav");
        write_wav(&wav, &AudioBuffer::new(vec![0.0; 1600], 16000)).unwrap();

        let samples = load_samples(&[ManifestEntry {
            audio: wav,
            text: "roger".to_string(),
        }])
        .unwrap();

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].audio.len(), 1600);
        assert_eq!(samples[0].reference_text, "roger");
    }

    #[test]
    fn test_load_samples_fails_on_missing_audio() {
        let err = load_samples(&[ManifestEntry {
            audio: PathBuf::from("/nonexistent/a.wav"),
            text: "roger".to_string(),
        }])
        .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
