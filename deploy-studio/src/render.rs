//! Terminal rendering and WAV output.

use std::fmt::Write as _;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::{Result, StudioError};
use crate::orchestrator::{ResearchResult, SpeechAudio};
use crate::project::{GeneratedProject, SUGGESTIONS};

const RULE: &str = "────────────────────────────────────────────────────────";

/// Project header, every file with its language, then the run instructions.
pub fn render_project(project: &GeneratedProject) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", project.project_name);
    let _ = writeln!(out, "{}", project.description);
    let _ = writeln!(out);
    let _ = writeln!(out, "Files:");
    for file in &project.files {
        let _ = writeln!(out, "  {} ({})", file.filename, file.language);
    }
    for file in &project.files {
        let _ = writeln!(out, "\n{RULE}\n{}\n{RULE}", file.filename);
        let _ = writeln!(out, "{}", file.content.trim_end());
    }
    let _ = writeln!(out, "\n{RULE}\nHow to run\n{RULE}");
    let _ = writeln!(out, "{}", project.setup_instructions.trim_end());
    out
}

/// Answer followed by numbered sources.
pub fn render_research(result: &ResearchResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", result.text.trim_end());
    if !result.sources.is_empty() {
        let _ = writeln!(out, "\nSources:");
        for (i, source) in result.sources.iter().enumerate() {
            let _ = writeln!(out, "  [{}] {} - {}", i + 1, source.title, source.uri);
        }
    }
    out
}

pub fn render_suggestions() -> String {
    let mut out = String::from("Try one of these:\n");
    for suggestion in SUGGESTIONS {
        let _ = writeln!(out, "  - {suggestion}");
    }
    out
}

/// Write speech as a mono 16-bit WAV file.
pub fn write_wav(path: &Path, audio: &SpeechAudio) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).map_err(wav_error)?;
    for sample in audio.pcm.chunks_exact(2) {
        writer.write_sample(i16::from_le_bytes([sample[0], sample[1]])).map_err(wav_error)?;
    }
    writer.finalize().map_err(wav_error)
}

fn wav_error(error: hound::Error) -> StudioError {
    match error {
        hound::Error::IoError(e) => StudioError::Io(e),
        other => StudioError::Io(std::io::Error::other(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::Source;
    use crate::project::ProjectFile;

    fn project() -> GeneratedProject {
        GeneratedProject {
            project_name: "todo-app".into(),
            description: "A Flask to-do list".into(),
            files: vec![
                ProjectFile {
                    filename: "app.py".into(),
                    content: "print('hi')\n".into(),
                    language: "python".into(),
                },
                ProjectFile {
                    filename: "requirements.txt".into(),
                    content: "flask\n".into(),
                    language: "text".into(),
                },
            ],
            setup_instructions: "pip install -r requirements.txt".into(),
        }
    }

    #[test]
    fn test_render_project_lists_files_in_order() {
        let out = render_project(&project());
        let app = out.find("  app.py (python)").unwrap();
        let reqs = out.find("  requirements.txt (text)").unwrap();
        assert!(app < reqs);
        assert!(out.contains("print('hi')"));
        assert!(out.trim_end().ends_with("pip install -r requirements.txt"));
    }

    #[test]
    fn test_render_research_numbers_sources() {
        let out = render_research(&ResearchResult {
            text: "Use gunicorn.".into(),
            sources: vec![Source { title: "Docs".into(), uri: "https://docs.example".into() }],
        });
        assert!(out.contains("[1] Docs - https://docs.example"));

        let bare = render_research(&ResearchResult { text: "ok".into(), sources: vec![] });
        assert!(!bare.contains("Sources"));
    }

    #[test]
    fn test_suggestions_rendered() {
        assert_eq!(render_suggestions().lines().count(), SUGGESTIONS.len() + 1);
    }

    #[test]
    fn test_write_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speech.wav");
        let audio = SpeechAudio { pcm: vec![0x00, 0x00, 0xff, 0x7f, 0x00, 0x80], sample_rate: 24_000 };
        write_wav(&path, &audio).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 24_000);
        assert_eq!(reader.spec().channels, 1);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0, i16::MAX, i16::MIN]);
    }
}
