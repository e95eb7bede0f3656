use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use encore_cli::app::{MediaInteractor, ThumbnailFormats, ThumbnailInteractor};
use encore_cli::domain::model::*;
use encore_cli::ports::*;
use encore_cli::DomainError;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Test doubles standing in for ffprobe, ffmpeg and ImageMagick
mod fakes {
    use super::*;

    pub struct FakeProbe {
        pub duration: Option<f64>,
    }

    #[async_trait]
    impl ProbePort for FakeProbe {
        async fn probe_duration(&self, file_path: &Path) -> Result<f64, DomainError> {
            self.duration.ok_or_else(|| DomainError::ProbeFailed {
                path: file_path.to_path_buf(),
                message: "no Duration line".to_string(),
            })
        }
    }

    /// Writes a frame whose byte length is `size_of(offset)`
    pub struct FakeExtractor {
        pub size_of: fn(f64) -> usize,
        pub fail_at: Option<usize>,
        pub calls: AtomicUsize,
    }

    impl FakeExtractor {
        pub fn new(size_of: fn(f64) -> usize) -> Self {
            Self {
                size_of,
                fail_at: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl FrameExtractPort for FakeExtractor {
        async fn extract_frame(
            &self,
            _source: &Path,
            sample: &Sample,
            destination: &Path,
        ) -> Result<(), DomainError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_at == Some(call) {
                return Err(DomainError::ExtractionFailed {
                    offset: sample.offset,
                    message: "decoder error".to_string(),
                });
            }
            std::fs::write(destination, vec![0u8; (self.size_of)(sample.offset)])?;
            Ok(())
        }
    }

    pub enum ConvertBehavior {
        Copy,
        Fail,
        DropFirst,
    }

    /// Copies each frame to its sibling with the new extension
    pub struct FakeConverter {
        pub behavior: ConvertBehavior,
    }

    #[async_trait]
    impl ConvertPort for FakeConverter {
        async fn convert_batch(
            &self,
            frames: &[PathBuf],
            format: &str,
        ) -> Result<Vec<PathBuf>, DomainError> {
            if let ConvertBehavior::Fail = self.behavior {
                return Err(DomainError::ConversionFailed("mogrify: no decode delegate".to_string()));
            }
            let mut converted = Vec::new();
            for (idx, frame) in frames.iter().enumerate() {
                let target = frame.with_extension(format);
                let skip = matches!(self.behavior, ConvertBehavior::DropFirst) && idx == 0;
                if !skip {
                    std::fs::copy(frame, &target)?;
                }
                converted.push(target);
            }
            Ok(converted)
        }
    }

    #[derive(Default)]
    pub struct RecordingExec {
        pub calls: Mutex<Vec<String>>,
    }

    impl RecordingExec {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl MediaExecPort for RecordingExec {
        async fn trim(&self, request: &TrimRequest) -> Result<(), DomainError> {
            self.record(format!("trim {}", request.output.display()));
            Ok(())
        }

        async fn extract_audio(&self, request: &AudioRequest) -> Result<(), DomainError> {
            self.record(format!("audio {}k", request.bitrate_kbps));
            Ok(())
        }

        async fn mute(&self, _request: &MuteRequest, filter: &str) -> Result<(), DomainError> {
            self.record(format!("mute {}", filter));
            Ok(())
        }

        async fn resize(
            &self,
            entry: &ConcatEntry,
            resolution: Resolution,
            framerate: u32,
        ) -> Result<(), DomainError> {
            self.record(format!(
                "resize {} {} {}",
                entry.source.display(),
                resolution.width(),
                framerate
            ));
            Ok(())
        }

        async fn concat(&self, list_file: &Path, output: &Path) -> Result<(), DomainError> {
            self.record(format!("concat {} {}", list_file.display(), output.display()));
            Ok(())
        }
    }
}

use fakes::*;

fn scenario_size(offset: f64) -> usize {
    match offset.round() as u64 {
        12 => 300,
        36 => 900,
        60 => 500,
        84 => 700,
        _ => 100,
    }
}

fn varied_size(offset: f64) -> usize {
    // Deterministic but unordered sizes
    ((offset * 37.0) as usize % 997) + 10
}

fn flat_size(_offset: f64) -> usize {
    256
}

struct Fixture {
    _root: TempDir,
    video: PathBuf,
    output_dir: PathBuf,
}

fn fixture() -> Fixture {
    let root = TempDir::new().unwrap();
    let video = root.path().join("set.mp4");
    std::fs::write(&video, b"not really a video").unwrap();
    let output_dir = root.path().join("thumbnails");
    Fixture {
        _root: root,
        video,
        output_dir,
    }
}

fn interactor(
    duration: Option<f64>,
    extractor: Arc<FakeExtractor>,
    behavior: ConvertBehavior,
) -> ThumbnailInteractor {
    ThumbnailInteractor::new(
        Arc::new(FakeProbe { duration }),
        extractor,
        Arc::new(FakeConverter { behavior }),
        ThumbnailFormats::default(),
    )
}

fn files_under(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(dir)
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_keeps_largest_frames_of_four() {
    let fx = fixture();
    let extractor = Arc::new(FakeExtractor::new(scenario_size));
    let interactor = interactor(Some(120.0), extractor.clone(), ConvertBehavior::Copy);

    let request = ThumbnailRequest::new(&fx.video, &fx.output_dir, 4, 2).unwrap();
    let report = interactor.generate(&request).await.unwrap();

    let offsets: Vec<f64> = report.samples.iter().map(|s| s.offset).collect();
    assert_eq!(offsets, vec![12.0, 36.0, 60.0, 84.0]);
    assert_eq!(extractor.calls.load(Ordering::SeqCst), 4);

    assert_eq!(report.selections.len(), 2);
    assert_eq!(report.selections[0].offset, 36.0);
    assert_eq!(report.selections[0].size, 900);
    assert_eq!(report.selections[1].offset, 84.0);
    assert_eq!(report.selections[1].size, 700);

    assert_eq!(
        files_under(&fx.output_dir),
        vec!["thumbnail-001-36.00.jpg", "thumbnail-002-84.00.jpg"]
    );
}

#[tokio::test]
async fn test_keep_at_least_samples_returns_every_frame() {
    let fx = fixture();
    let interactor = interactor(
        Some(600.0),
        Arc::new(FakeExtractor::new(varied_size)),
        ConvertBehavior::Copy,
    );

    let request = ThumbnailRequest::new(&fx.video, &fx.output_dir, 6, 10).unwrap();
    let report = interactor.generate(&request).await.unwrap();

    assert_eq!(report.selections.len(), request.expected_selections());
    let mut paths = report.paths();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), 6);
    assert!(paths.iter().all(|p| p.is_file()));
}

#[tokio::test]
async fn test_selections_never_invert_sizes() {
    let fx = fixture();
    let interactor = interactor(
        Some(3600.0),
        Arc::new(FakeExtractor::new(varied_size)),
        ConvertBehavior::Copy,
    );

    let request = ThumbnailRequest::new(&fx.video, &fx.output_dir, 40, 15).unwrap();
    let report = interactor.generate(&request).await.unwrap();

    assert_eq!(report.selections.len(), 15);
    for pair in report.selections.windows(2) {
        assert!(pair[0].size >= pair[1].size);
    }
    for (idx, selection) in report.selections.iter().enumerate() {
        assert_eq!(selection.rank, idx + 1);
        let on_disk = std::fs::metadata(&selection.path).unwrap().len();
        assert_eq!(on_disk, selection.size);
    }
}

#[tokio::test]
async fn test_equal_sizes_keep_time_order() {
    let fx = fixture();
    let interactor = interactor(
        Some(100.0),
        Arc::new(FakeExtractor::new(flat_size)),
        ConvertBehavior::Copy,
    );

    let request = ThumbnailRequest::new(&fx.video, &fx.output_dir, 5, 3).unwrap();
    let report = interactor.generate(&request).await.unwrap();

    let offsets: Vec<f64> = report.selections.iter().map(|s| s.offset).collect();
    let expected: Vec<f64> = report.samples.iter().take(3).map(|s| s.offset).collect();
    assert_eq!(offsets, expected);
}

#[tokio::test]
async fn test_no_intermediates_left_behind() {
    let fx = fixture();
    let interactor = interactor(
        Some(900.0),
        Arc::new(FakeExtractor::new(varied_size)),
        ConvertBehavior::Copy,
    );

    let request = ThumbnailRequest::new(&fx.video, &fx.output_dir, 12, 4).unwrap();
    let report = interactor.generate(&request).await.unwrap();

    let mut expected: Vec<String> = report
        .selections
        .iter()
        .map(|s| s.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    expected.sort();
    assert_eq!(files_under(&fx.output_dir), expected);
}

#[tokio::test]
async fn test_probe_failure_extracts_nothing() {
    let fx = fixture();
    let extractor = Arc::new(FakeExtractor::new(varied_size));
    let interactor = interactor(None, extractor.clone(), ConvertBehavior::Copy);

    let request = ThumbnailRequest::new(&fx.video, &fx.output_dir, 8, 2).unwrap();
    let err = interactor.generate(&request).await.unwrap_err();

    assert!(matches!(err, DomainError::ProbeFailed { .. }));
    assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
    assert!(!fx.output_dir.exists());
}

#[tokio::test]
async fn test_zero_duration_is_a_probe_failure() {
    let fx = fixture();
    let interactor = interactor(
        Some(0.0),
        Arc::new(FakeExtractor::new(varied_size)),
        ConvertBehavior::Copy,
    );

    let request = ThumbnailRequest::new(&fx.video, &fx.output_dir, 8, 2).unwrap();
    let err = interactor.generate(&request).await.unwrap_err();
    assert!(matches!(err, DomainError::ProbeFailed { .. }));
}

#[tokio::test]
async fn test_missing_source_is_rejected() {
    let fx = fixture();
    let extractor = Arc::new(FakeExtractor::new(varied_size));
    let interactor = interactor(Some(60.0), extractor.clone(), ConvertBehavior::Copy);

    let missing = fx.video.with_file_name("missing.mp4");
    let request = ThumbnailRequest::new(&missing, &fx.output_dir, 4, 2).unwrap();
    let err = interactor.generate(&request).await.unwrap_err();

    assert!(matches!(err, DomainError::InputNotFound(_)));
    assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_extraction_failure_cleans_scratch() {
    let fx = fixture();
    let mut extractor = FakeExtractor::new(varied_size);
    extractor.fail_at = Some(3);
    let extractor = Arc::new(extractor);
    let interactor = interactor(Some(300.0), extractor.clone(), ConvertBehavior::Copy);

    let request = ThumbnailRequest::new(&fx.video, &fx.output_dir, 10, 3).unwrap();
    let err = interactor.generate(&request).await.unwrap_err();

    match err {
        DomainError::ExtractionFailed { offset, .. } => {
            assert_eq!(offset, request_offset(300.0, 10, 3));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(extractor.calls.load(Ordering::SeqCst), 4);
    assert!(files_under(&fx.output_dir).is_empty());
}

fn request_offset(duration: f64, count: usize, index: usize) -> f64 {
    encore_cli::domain::rules::SampleSchedule::offsets(duration, count)[index].offset
}

#[tokio::test]
async fn test_conversion_failure_cleans_scratch() {
    let fx = fixture();
    let interactor = interactor(
        Some(300.0),
        Arc::new(FakeExtractor::new(varied_size)),
        ConvertBehavior::Fail,
    );

    let request = ThumbnailRequest::new(&fx.video, &fx.output_dir, 5, 2).unwrap();
    let err = interactor.generate(&request).await.unwrap_err();

    assert!(matches!(err, DomainError::ConversionFailed(_)));
    assert!(files_under(&fx.output_dir).is_empty());
}

#[tokio::test]
async fn test_missing_converted_frame_is_count_mismatch() {
    let fx = fixture();
    let interactor = interactor(
        Some(300.0),
        Arc::new(FakeExtractor::new(varied_size)),
        ConvertBehavior::DropFirst,
    );

    let request = ThumbnailRequest::new(&fx.video, &fx.output_dir, 5, 2).unwrap();
    let err = interactor.generate(&request).await.unwrap_err();

    match err {
        DomainError::CandidateCountMismatch { expected, found } => {
            assert_eq!(expected, 5);
            assert_eq!(found, 4);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(files_under(&fx.output_dir).is_empty());
}

#[tokio::test]
async fn test_copy_failure_removes_earlier_copies() {
    let fx = fixture();
    // A directory squatting on the rank-2 name makes the second copy fail
    let blocker = fx.output_dir.join("thumbnail-002-84.00.jpg");
    std::fs::create_dir_all(&blocker).unwrap();
    let interactor = interactor(
        Some(120.0),
        Arc::new(FakeExtractor::new(scenario_size)),
        ConvertBehavior::Copy,
    );

    let request = ThumbnailRequest::new(&fx.video, &fx.output_dir, 4, 2).unwrap();
    let err = interactor.generate(&request).await.unwrap_err();

    assert!(matches!(err, DomainError::Io(_)));
    assert!(!fx.output_dir.join("thumbnail-001-36.00.jpg").exists());
    assert_eq!(files_under(&fx.output_dir), vec!["thumbnail-002-84.00.jpg"]);
    assert!(blocker.is_dir());
}

#[tokio::test]
async fn test_rank_order_is_repeatable() {
    let fx = fixture();
    let second_dir = fx.output_dir.with_file_name("thumbnails-again");
    let interactor = interactor(
        Some(1800.0),
        Arc::new(FakeExtractor::new(varied_size)),
        ConvertBehavior::Copy,
    );

    let first = ThumbnailRequest::new(&fx.video, &fx.output_dir, 20, 7).unwrap();
    let second = ThumbnailRequest::new(&fx.video, &second_dir, 20, 7).unwrap();
    let a = interactor.generate(&first).await.unwrap();
    let b = interactor.generate(&second).await.unwrap();

    assert_eq!(files_under(&fx.output_dir), files_under(&second_dir));
    let offsets = |r: &ThumbnailReport| r.selections.iter().map(|s| s.offset).collect::<Vec<_>>();
    assert_eq!(offsets(&a), offsets(&b));
}

#[tokio::test]
async fn test_promote_copies_top_selections_next_to_video() {
    let fx = fixture();
    let interactor = interactor(
        Some(120.0),
        Arc::new(FakeExtractor::new(scenario_size)),
        ConvertBehavior::Copy,
    );

    let request = ThumbnailRequest::new(&fx.video, &fx.output_dir, 4, 4).unwrap();
    let report = interactor.generate(&request).await.unwrap();
    let promoted = interactor.promote(&report, 3).await.unwrap();

    let video_dir = fx.video.parent().unwrap();
    assert_eq!(
        promoted,
        vec![
            video_dir.join("thumbnail-001-36.00.jpg"),
            video_dir.join("thumbnail-002-84.00.jpg"),
            video_dir.join("thumbnail-003-60.00.jpg"),
        ]
    );
    assert!(promoted.iter().all(|p| p.is_file()));
    assert_eq!(files_under(&fx.output_dir).len(), 4);
}

#[tokio::test]
async fn test_trim_without_bounds_copies_input() {
    let root = TempDir::new().unwrap();
    let input = root.path().join("in.mp4");
    std::fs::write(&input, b"frames").unwrap();
    let output = root.path().join("out").join("copy.mp4");

    let exec = Arc::new(RecordingExec::default());
    let media = MediaInteractor::new(exec.clone());
    let request = TrimRequest::new(&input, &output, None, None).unwrap();
    media.trim(&request).await.unwrap();

    assert_eq!(std::fs::read(&output).unwrap(), b"frames");
    assert!(exec.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_trim_with_bounds_runs_tool() {
    let root = TempDir::new().unwrap();
    let input = root.path().join("in.mp4");
    std::fs::write(&input, b"frames").unwrap();
    let output = root.path().join("cut.mp4");

    let exec = Arc::new(RecordingExec::default());
    let media = MediaInteractor::new(exec.clone());
    let request = TrimRequest::new(
        &input,
        &output,
        Some(TimeSpec::from_seconds(5.0)),
        Some(TimeSpec::from_seconds(9.0)),
    )
    .unwrap();
    media.trim(&request).await.unwrap();

    assert_eq!(
        *exec.calls.lock().unwrap(),
        vec![format!("trim {}", output.display())]
    );
}

#[tokio::test]
async fn test_audio_parses_bitrate() {
    let root = TempDir::new().unwrap();
    let input = root.path().join("in.mp4");
    std::fs::write(&input, b"frames").unwrap();

    let exec = Arc::new(RecordingExec::default());
    let media = MediaInteractor::new(exec.clone());
    let request = media
        .extract_audio(&input, &root.path().join("in.mp3"), "256k", 48000)
        .await
        .unwrap();

    assert_eq!(request.bitrate_kbps, 256);
    assert_eq!(*exec.calls.lock().unwrap(), vec!["audio 256k".to_string()]);
}

#[tokio::test]
async fn test_mute_passes_filter_to_tool() {
    let root = TempDir::new().unwrap();
    let input = root.path().join("in.mp4");
    std::fs::write(&input, b"frames").unwrap();

    let exec = Arc::new(RecordingExec::default());
    let media = MediaInteractor::new(exec.clone());
    let request = MuteRequest {
        input,
        output: root.path().join("muted.mp4"),
        ranges: vec!["65-80".parse().unwrap(), "10-12.5".parse().unwrap()],
    };
    let filter = media.mute(&request).await.unwrap();

    assert_eq!(
        filter,
        "volume=enable='between(t,10,12.5)':volume=0, volume=enable='between(t,65,80)':volume=0"
    );
    assert_eq!(*exec.calls.lock().unwrap(), vec![format!("mute {}", filter)]);
}

#[tokio::test]
async fn test_concat_writes_converted_list_then_joins() {
    let root = TempDir::new().unwrap();
    for name in ["a.mp4", "b.mp4"] {
        std::fs::write(root.path().join(name), b"clip").unwrap();
    }
    let list = root.path().join("clips.txt");
    std::fs::write(&list, "file 'a.mp4'\n\nfile 'b.mp4'\n").unwrap();

    let exec = Arc::new(RecordingExec::default());
    let media = MediaInteractor::new(exec.clone());
    let plan = media
        .plan_concat(&list, Resolution::P1080, 60, None)
        .await
        .unwrap();
    media.concat(&plan).await.unwrap();

    let converted = std::fs::read_to_string(&plan.converted_list).unwrap();
    assert_eq!(converted, plan.converted_list_contents());
    assert_eq!(converted.lines().count(), 2);

    let calls = exec.calls.lock().unwrap();
    assert_eq!(calls.len(), 3);
    assert!(calls[0].starts_with("resize"));
    assert!(calls[0].ends_with("1920 60"));
    assert_eq!(
        calls[2],
        format!(
            "concat {} {}",
            plan.converted_list.display(),
            root.path().join("concatenated.mp4").display()
        )
    );
}

#[tokio::test]
async fn test_concat_missing_clip_runs_nothing() {
    let root = TempDir::new().unwrap();
    let list = root.path().join("clips.txt");
    std::fs::write(&list, "file 'gone.mp4'\n").unwrap();

    let exec = Arc::new(RecordingExec::default());
    let media = MediaInteractor::new(exec.clone());
    let plan = media
        .plan_concat(&list, Resolution::K4, 30, None)
        .await
        .unwrap();
    let err = media.concat(&plan).await.unwrap_err();

    assert!(matches!(err, DomainError::InputNotFound(_)));
    assert!(exec.calls.lock().unwrap().is_empty());
}
