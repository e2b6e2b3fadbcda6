mod common;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use common::{fast_settings, init_logging, Recorder};
use enrich_client::{
    result_filename, DownloadError, FailureKind, JobOrchestrator, ProgressObserver,
};
use enrich_core::{ColumnMapping, JobState, ProgressEvent, TargetField};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_upload(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "job-1",
            "filename": "clients.csv",
            "columns": ["Raison sociale", "Pays", "Secteur d'activité", "Notes"],
            "detected_company_col": "Raison sociale",
            "detected_context_cols": ["Pays", "Secteur d'activité"],
            "row_count": 2
        })))
        .mount(server)
        .await;
}

fn write_source(temp: &TempDir) -> PathBuf {
    let file = temp.path().join("clients.csv");
    fs::write(
        &file,
        "Raison sociale,Pays,Secteur d'activité,Notes\nAcme,FR,Retail,\nGlobex,DE,Energy,vip\n",
    )
    .unwrap();
    file
}

#[tokio::test]
async fn upload_map_track_and_download() {
    init_logging();
    let server = MockServer::start().await;
    mount_upload(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/enrich"))
        .and(body_json(json!({
            "job_id": "job-1",
            "column_mappings": [
                {"source_column": "Raison sociale", "target_column": "company name"},
                {"source_column": "Pays", "target_column": "country"},
                {"source_column": "Notes", "target_column": "description"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Enrichment started"})))
        .expect(1)
        .mount(&server)
        .await;
    // No push channel on the mock server, so tracking falls back to polling.
    Mock::given(method("GET"))
        .and(path("/api/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed", "progress": 2, "total": 2, "percentage": 100
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/download/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("name,country\nAcme,FR\n", "text/csv"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let source = write_source(&temp);
    let mut orchestrator = JobOrchestrator::new(fast_settings(server.uri())).unwrap();

    let candidates = orchestrator.upload(&source).await.expect("upload ok");
    let defaults: Vec<TargetField> = candidates.iter().map(|c| c.default_target).collect();
    assert_eq!(
        defaults,
        vec![
            TargetField::CompanyName,
            TargetField::Country,
            TargetField::Sector,
            TargetField::Ignore,
        ]
    );

    let choices = vec![
        ColumnMapping::new("Raison sociale", TargetField::CompanyName),
        ColumnMapping::new("Pays", TargetField::Country),
        ColumnMapping::new("Secteur d'activité", TargetField::Ignore),
        ColumnMapping::new("Notes", TargetField::Description),
    ];
    let submission = orchestrator.submit(&choices).await.expect("submit ok");
    assert!(submission.dropped_duplicates.is_empty());
    assert_eq!(
        orchestrator.session().job().map(|job| job.state),
        Some(JobState::Submitted)
    );

    let recorder = Arc::new(Recorder::default());
    let observers: Vec<Arc<dyn ProgressObserver>> = vec![recorder.clone()];
    let outcome = orchestrator
        .track(&observers, CancellationToken::new())
        .await
        .expect("track ok");
    assert_eq!(
        outcome,
        ProgressEvent::Completed {
            download_ref: "/api/download/job-1".to_string(),
        }
    );
    assert_eq!(recorder.take(), vec![outcome]);
    assert_eq!(
        orchestrator.session().job().map(|job| job.state),
        Some(JobState::Completed)
    );

    let out_dir = temp.path().join("out");
    let saved = orchestrator.download_result(&out_dir).await.expect("download ok");
    assert_eq!(saved.path, out_dir.join(result_filename("clients.csv", "job-1")));
    assert_eq!(saved.bytes, 21);
    assert_eq!(fs::read_to_string(&saved.path).unwrap(), "name,country\nAcme,FR\n");
}

#[tokio::test]
async fn submission_without_company_name_is_not_sent() {
    let server = MockServer::start().await;
    mount_upload(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/enrich"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let mut orchestrator = JobOrchestrator::new(fast_settings(server.uri())).unwrap();
    orchestrator.upload(&write_source(&temp)).await.unwrap();

    let err = orchestrator
        .submit(&[
            ColumnMapping::new("Raison sociale", TargetField::Ignore),
            ColumnMapping::new("Pays", TargetField::Country),
        ])
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Validation);
    assert_eq!(
        orchestrator.session().job().map(|job| job.state),
        Some(JobState::Uploaded)
    );
}

#[tokio::test]
async fn track_and_download_require_the_right_job_state() {
    let server = MockServer::start().await;
    mount_upload(&server).await;

    let temp = TempDir::new().unwrap();
    let mut orchestrator = JobOrchestrator::new(fast_settings(server.uri())).unwrap();

    let err = orchestrator
        .track(&[], CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Validation);

    orchestrator.upload(&write_source(&temp)).await.unwrap();
    let err = orchestrator
        .track(&[], CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Validation);

    let err = orchestrator.download_result(temp.path()).await.unwrap_err();
    assert!(matches!(err, DownloadError::NotCompleted));
}

#[tokio::test]
async fn deleting_the_current_job_resets_the_session() {
    let server = MockServer::start().await;
    mount_upload(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/jobs/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Job deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let mut orchestrator = JobOrchestrator::new(fast_settings(server.uri())).unwrap();
    orchestrator.upload(&write_source(&temp)).await.unwrap();
    assert!(orchestrator.session().job().is_some());

    orchestrator.delete_job("job-1").await.expect("delete ok");
    assert!(orchestrator.session().job().is_none());
    assert!(orchestrator.candidates().is_empty());
}
