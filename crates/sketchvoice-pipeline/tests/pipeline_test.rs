mod helpers;

use std::sync::Arc;

use helpers::{recognizer, RecordingSynthesizer, TestWorkspace, FAKE_MP3, SAMPLE_PNG};
use sketchvoice_core::{AudioDestination, AudioFormat, ErrorMetadata};
use sketchvoice_pipeline::{AudioLocation, PipelineError, PipelineStage};
use sketchvoice_services::{UnwiredRecognizer, UnwiredSynthesizer};
use sketchvoice_storage::Storage;

const BUCKET: &str = "project-sketch-to-voice";

#[tokio::test]
async fn test_run_writes_every_artifact() {
    let ws = TestWorkspace::new().await;
    let synthesizer = Arc::new(RecordingSynthesizer::default());
    let runner = ws.runner(ws.config(), recognizer(&["A sketch."]), synthesizer.clone());

    let report = runner.run().await.unwrap();

    assert!(report.container_created);
    assert_eq!(
        ws.storage.list_containers().await.unwrap(),
        vec![BUCKET.to_string()]
    );
    assert_eq!(
        ws.storage.download(BUCKET, "sketch/sample.png").await.unwrap(),
        SAMPLE_PNG
    );
    assert_eq!(
        ws.storage.download(BUCKET, "text/sample.png.txt").await.unwrap(),
        b"A sketch.\n"
    );

    let requests = synthesizer.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text, "A sketch.\n");
    assert_eq!(requests[0].voice.voice_id, "Aditi");
    assert_eq!(requests[0].voice.language_code, "en-AU");
    assert_eq!(requests[0].voice.output_format, AudioFormat::Mp3);

    let audio_path = ws.audio_dir().join("sample.png.mp3");
    assert_eq!(
        report.audio,
        AudioLocation::File {
            path: audio_path.clone()
        }
    );
    assert_eq!(tokio::fs::read(audio_path).await.unwrap(), FAKE_MP3);
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let ws = TestWorkspace::new().await;
    let runner = ws.runner(
        ws.config(),
        recognizer(&["Hello", "World"]),
        Arc::new(RecordingSynthesizer::default()),
    );

    let first = runner.run().await.unwrap();
    let second = runner.run().await.unwrap();

    assert!(first.container_created);
    assert!(!second.container_created);
    assert_ne!(first.run_id, second.run_id);
    assert_eq!(ws.storage.list_containers().await.unwrap().len(), 1);
    assert_eq!(
        ws.storage.download(BUCKET, "text/sample.png.txt").await.unwrap(),
        b"Hello\nWorld\n"
    );
}

#[tokio::test]
async fn test_audio_can_go_to_the_bucket() {
    let ws = TestWorkspace::new().await;
    let config = sketchvoice_core::PipelineConfig {
        audio_destination: AudioDestination::Bucket,
        ..ws.config()
    };
    let runner = ws.runner(
        config,
        recognizer(&["A sketch."]),
        Arc::new(RecordingSynthesizer::default()),
    );

    let report = runner.run().await.unwrap();

    assert_eq!(
        report.audio,
        AudioLocation::Object {
            container: BUCKET.to_string(),
            key: "audio/sample.png.mp3".to_string(),
        }
    );
    assert_eq!(
        ws.storage.download(BUCKET, "audio/sample.png.mp3").await.unwrap(),
        FAKE_MP3
    );
    assert!(!ws.audio_dir().exists());
}

#[tokio::test]
async fn test_missing_source_leaves_storage_untouched() {
    let ws = TestWorkspace::new().await;
    let config = sketchvoice_core::PipelineConfig {
        source_file: ws.dir.path().join("absent.png"),
        ..ws.config()
    };
    let runner = ws.runner(config, recognizer(&["unused"]), Arc::new(UnwiredSynthesizer));

    let err = runner.run().await.unwrap_err();

    assert!(matches!(err, PipelineError::SourceNotFound { .. }));
    assert_eq!(err.error_code(), "SOURCE_NOT_FOUND");
    assert!(ws.storage.list_containers().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_disabled_recognition_stops_after_upload() {
    let ws = TestWorkspace::new().await;
    let runner = ws.runner(
        ws.config(),
        Arc::new(UnwiredRecognizer),
        Arc::new(RecordingSynthesizer::default()),
    );

    let err = runner.run().await.unwrap_err();

    assert_eq!(err.stage(), Some(PipelineStage::RecognizeText));
    assert_eq!(err.error_code(), "NOT_IMPLEMENTED");
    assert!(ws.storage.exists(BUCKET, "sketch/sample.png").await.unwrap());
    assert!(!ws.storage.exists(BUCKET, "text/sample.png.txt").await.unwrap());
}

#[tokio::test]
async fn test_report_serializes_to_json() {
    let ws = TestWorkspace::new().await;
    let runner = ws.runner(
        ws.config(),
        recognizer(&["A sketch."]),
        Arc::new(RecordingSynthesizer::default()),
    );

    let report = runner.run().await.unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["container"], BUCKET);
    assert_eq!(json["sketch_key"], "sketch/sample.png");
    assert_eq!(json["text_key"], "text/sample.png.txt");
    assert_eq!(json["audio"]["kind"], "file");
    assert_eq!(json["audio_bytes"], FAKE_MP3.len());
}

#[tokio::test]
async fn test_source_name_with_embedded_dots() {
    let ws = TestWorkspace::new().await;
    let source = ws.dir.path().join("my..sketch.png");
    tokio::fs::write(&source, SAMPLE_PNG).await.unwrap();
    let config = sketchvoice_core::PipelineConfig {
        source_file: source,
        ..ws.config()
    };
    config.validate().unwrap();
    let runner = ws.runner(
        config,
        recognizer(&["A sketch."]),
        Arc::new(RecordingSynthesizer::default()),
    );

    let report = runner.run().await.unwrap();

    assert_eq!(report.sketch_key, "sketch/my..sketch.png");
    assert_eq!(
        ws.storage
            .download(BUCKET, "sketch/my..sketch.png")
            .await
            .unwrap(),
        SAMPLE_PNG
    );
    assert!(ws.audio_dir().join("my..sketch.png.mp3").exists());
}
