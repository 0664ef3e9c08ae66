//! Tests for the acquisition pipeline

use super::*;
use crate::config::PipelineConfig;
use crate::core::admission::RequestKey;
use crate::core::providers::{
    MediaMeta, MediaProvider, ProbeQuality, ProviderError, TranscodeError, Transcoder,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const KB: usize = 1024;
const MB: usize = 1024 * 1024;

/// What one `fetch` call should do, in call order. The last entry repeats.
#[derive(Clone)]
enum FetchStep {
    Fail(&'static str),
    Write { name: &'static str, bytes: usize },
    WriteThenFail { name: &'static str, bytes: usize },
    WriteNothing,
    Hang,
}

struct ScriptedProvider {
    steps: Vec<FetchStep>,
    calls: AtomicUsize,
    selectors: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(steps: Vec<FetchStep>) -> Arc<Self> {
        Arc::new(Self {
            steps,
            calls: AtomicUsize::new(0),
            selectors: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaProvider for ScriptedProvider {
    async fn extract_metadata(
        &self,
        key: &RequestKey,
        _probe: ProbeQuality,
    ) -> Result<MediaMeta, ProviderError> {
        Ok(MediaMeta {
            title: "scripted".into(),
            uploader: None,
            duration_secs: Some(30),
            size_approx_bytes: None,
            canonical_url: key.to_string(),
            provider: "scripted".into(),
            media_id: "m1".into(),
        })
    }

    async fn fetch(
        &self,
        _key: &RequestKey,
        candidate: &FormatCandidate,
        _size_limit_bytes: u64,
        dest: &Path,
    ) -> Result<(), ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.selectors.lock().push(candidate.selector.clone());

        let step = self
            .steps
            .get(call)
            .or_else(|| self.steps.last())
            .cloned()
            .unwrap_or(FetchStep::WriteNothing);
        match step {
            FetchStep::Fail(msg) => Err(ProviderError::Unavailable(msg.to_string())),
            FetchStep::Write { name, bytes } => {
                std::fs::write(dest.join(name), vec![0u8; bytes])?;
                Ok(())
            }
            FetchStep::WriteThenFail { name, bytes } => {
                std::fs::write(dest.join(name), vec![0u8; bytes])?;
                Err(ProviderError::Unavailable("died mid-download".to_string()))
            }
            FetchStep::WriteNothing => Ok(()),
            FetchStep::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }
}

struct RenamingTranscoder {
    calls: AtomicUsize,
}

impl RenamingTranscoder {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcoder for RenamingTranscoder {
    async fn to_standard_container(&self, input: &Path) -> Result<PathBuf, TranscodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let out = input.with_extension("mp4");
        std::fs::copy(input, &out).map_err(|e| TranscodeError(e.to_string()))?;
        Ok(out)
    }
}

struct FailingTranscoder;

#[async_trait]
impl Transcoder for FailingTranscoder {
    async fn to_standard_container(&self, _input: &Path) -> Result<PathBuf, TranscodeError> {
        Err(TranscodeError("encoder exploded".to_string()))
    }
}

fn budgets(max_mb: u64, timeout_secs: u64) -> PipelineConfig {
    PipelineConfig {
        max_artifact_mb: max_mb,
        acquire_timeout_secs: timeout_secs,
        prefer_height: 1080,
    }
}

fn pipeline(
    provider: Arc<ScriptedProvider>,
    transcoder: Arc<dyn Transcoder>,
    config: PipelineConfig,
) -> AcquisitionPipeline {
    AcquisitionPipeline::new(config, provider, transcoder)
}

fn key() -> RequestKey {
    RequestKey::new("https://example.com/v/1")
}

// ==================== Ladder walking ====================

#[tokio::test]
async fn test_later_candidate_succeeds_after_failures() {
    let provider = ScriptedProvider::new(vec![
        FetchStep::Fail("format not available"),
        FetchStep::Fail("fragment 403"),
        FetchStep::Write { name: "clip.mp4", bytes: 4 * KB },
    ]);
    let pipe = pipeline(provider.clone(), RenamingTranscoder::new(), budgets(48, 180));

    let artifact = pipe.acquire(&key(), MediaKind::Video).await.unwrap();
    assert_eq!(provider.calls(), 3);
    assert_eq!(artifact.size_bytes(), 4 * KB as u64);
    assert_eq!(artifact.extension(), Some("mp4"));

    // Candidates were tried in ladder order, none repeated.
    let expected: Vec<String> = format_ladder(MediaKind::Video, PlatformHint::Generic, 1080)
        .into_iter()
        .take(3)
        .map(|c| c.selector)
        .collect();
    assert_eq!(*provider.selectors.lock(), expected);
}

#[tokio::test]
async fn test_exhausted_ladder_reports_last_error() {
    let provider = ScriptedProvider::new(vec![
        FetchStep::Fail("first error"),
        FetchStep::Fail("second error"),
        FetchStep::Fail("third error"),
        FetchStep::Fail("fourth error"),
        FetchStep::Fail("final candidate error"),
    ]);
    let pipe = pipeline(provider.clone(), RenamingTranscoder::new(), budgets(48, 180));

    let err = pipe.acquire(&key(), MediaKind::Video).await.unwrap_err();
    // Generic video ladder has 5 candidates; the error is the 5th's, not an
    // earlier one and not a generic message.
    assert_eq!(provider.calls(), 5);
    match err {
        AcquireError::ProviderUnavailable(msg) => assert_eq!(msg, "final candidate error"),
        other => panic!("expected ProviderUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_artifact_moves_to_next_candidate() {
    let provider = ScriptedProvider::new(vec![
        FetchStep::Write { name: "clip.mp4", bytes: 0 },
        FetchStep::Write { name: "clip.mp4", bytes: 2 * KB },
    ]);
    let pipe = pipeline(provider.clone(), RenamingTranscoder::new(), budgets(48, 180));

    let artifact = pipe.acquire(&key(), MediaKind::Video).await.unwrap();
    assert_eq!(provider.calls(), 2);
    assert_eq!(artifact.size_bytes(), 2 * KB as u64);
}

#[tokio::test]
async fn test_no_output_moves_to_next_candidate() {
    let provider = ScriptedProvider::new(vec![
        FetchStep::WriteNothing,
        FetchStep::Write { name: "clip.mp4", bytes: KB },
    ]);
    let pipe = pipeline(provider.clone(), RenamingTranscoder::new(), budgets(48, 180));

    let artifact = pipe.acquire(&key(), MediaKind::Video).await.unwrap();
    assert_eq!(provider.calls(), 2);
    assert_eq!(artifact.size_bytes(), KB as u64);
}

#[tokio::test]
async fn test_partial_output_cleared_between_candidates() {
    let provider = ScriptedProvider::new(vec![
        FetchStep::WriteThenFail { name: "partial.mp4", bytes: 9 * KB },
        FetchStep::Write { name: "clip.mp4", bytes: KB },
    ]);
    let pipe = pipeline(provider.clone(), RenamingTranscoder::new(), budgets(48, 180));

    let artifact = pipe.acquire(&key(), MediaKind::Video).await.unwrap();
    // The stale 9 KB partial must not be picked up as "newest file".
    assert_eq!(artifact.size_bytes(), KB as u64);
    assert_eq!(artifact.file_name(), Some("clip.mp4"));
}

// ==================== Size budget ====================

#[tokio::test]
async fn test_oversized_artifact_continues_ladder() {
    let provider = ScriptedProvider::new(vec![
        FetchStep::Write { name: "big.mp4", bytes: 2 * MB },
        FetchStep::Write { name: "small.mp4", bytes: 200 * KB },
    ]);
    let pipe = pipeline(provider.clone(), RenamingTranscoder::new(), budgets(1, 180));

    let artifact = pipe.acquire(&key(), MediaKind::Video).await.unwrap();
    assert_eq!(provider.calls(), 2);
    assert_eq!(artifact.size_bytes(), 200 * KB as u64);
}

#[tokio::test]
async fn test_all_candidates_oversized_is_terminal_size_error() {
    let provider = ScriptedProvider::new(vec![FetchStep::Write {
        name: "big.mp4",
        bytes: 2 * MB,
    }]);
    let pipe = pipeline(provider.clone(), RenamingTranscoder::new(), budgets(1, 180));

    let err = pipe.acquire(&key(), MediaKind::Video).await.unwrap_err();
    match err {
        AcquireError::SizeExceeded { size, limit } => {
            assert_eq!(size, 2 * MB as u64);
            assert_eq!(limit, MB as u64);
        }
        other => panic!("expected SizeExceeded, got {other:?}"),
    }
}

// ==================== Transcoding ====================

#[tokio::test]
async fn test_video_converted_to_standard_container() {
    let provider = ScriptedProvider::new(vec![FetchStep::Write {
        name: "clip.webm",
        bytes: 4 * KB,
    }]);
    let transcoder = RenamingTranscoder::new();
    let pipe = pipeline(provider, transcoder.clone(), budgets(48, 180));

    let artifact = pipe.acquire(&key(), MediaKind::Video).await.unwrap();
    assert_eq!(transcoder.calls(), 1);
    assert_eq!(artifact.extension(), Some("mp4"));
}

#[tokio::test]
async fn test_mp4_not_retranscoded() {
    let provider = ScriptedProvider::new(vec![FetchStep::Write {
        name: "clip.mp4",
        bytes: 4 * KB,
    }]);
    let transcoder = RenamingTranscoder::new();
    let pipe = pipeline(provider, transcoder.clone(), budgets(48, 180));

    pipe.acquire(&key(), MediaKind::Video).await.unwrap();
    assert_eq!(transcoder.calls(), 0);
}

#[tokio::test]
async fn test_transcode_failure_degrades_to_original() {
    let provider = ScriptedProvider::new(vec![FetchStep::Write {
        name: "clip.webm",
        bytes: 4 * KB,
    }]);
    let pipe = pipeline(provider, Arc::new(FailingTranscoder), budgets(48, 180));

    let artifact = pipe.acquire(&key(), MediaKind::Video).await.unwrap();
    // Conversion failed but the acquisition still succeeds with the
    // original container.
    assert_eq!(artifact.extension(), Some("webm"));
    assert_eq!(artifact.size_bytes(), 4 * KB as u64);
}

#[tokio::test]
async fn test_audio_kind_skips_transcoder() {
    let provider = ScriptedProvider::new(vec![FetchStep::Write {
        name: "track.mp3",
        bytes: 4 * KB,
    }]);
    let transcoder = RenamingTranscoder::new();
    let pipe = pipeline(provider, transcoder.clone(), budgets(48, 180));

    let artifact = pipe.acquire(&key(), MediaKind::Audio).await.unwrap();
    assert_eq!(transcoder.calls(), 0);
    assert_eq!(artifact.extension(), Some("mp3"));
}

// ==================== Budgets and cleanup ====================

#[tokio::test(start_paused = true)]
async fn test_outer_timeout_bounds_whole_call() {
    let provider = ScriptedProvider::new(vec![FetchStep::Hang]);
    let pipe = pipeline(provider, RenamingTranscoder::new(), budgets(48, 30));

    let err = pipe.acquire(&key(), MediaKind::Video).await.unwrap_err();
    match err {
        AcquireError::Timeout(budget) => assert_eq!(budget, Duration::from_secs(30)),
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_artifact_survives_scratch_teardown_and_cleans_itself() {
    let provider = ScriptedProvider::new(vec![FetchStep::Write {
        name: "clip.mp4",
        bytes: KB,
    }]);
    let pipe = pipeline(provider, RenamingTranscoder::new(), budgets(48, 180));

    let artifact = pipe.acquire(&key(), MediaKind::Video).await.unwrap();
    // The scratch workspace is gone by now; the promoted copy must not be.
    assert!(artifact.path().is_file());

    let path = artifact.path().to_path_buf();
    let dir = artifact.dir().to_path_buf();
    drop(artifact);
    assert!(!path.exists());
    assert!(!dir.exists());
}

#[tokio::test]
async fn test_document_kind_uses_single_candidate() {
    let provider = ScriptedProvider::new(vec![FetchStep::Fail("unavailable")]);
    let pipe = pipeline(provider.clone(), RenamingTranscoder::new(), budgets(48, 180));

    let err = pipe.acquire(&key(), MediaKind::Document).await.unwrap_err();
    assert_eq!(provider.calls(), 1);
    assert!(matches!(err, AcquireError::ProviderUnavailable(_)));
}
