//! out upload tests against an in-memory repository

mod helper;

use std::fs;

use tempfile::TempDir;

use artifactory_resource::error::ResourceError;
use artifactory_resource::out::out;
use artifactory_resource::resource::{OutRequest, Version, read_request};

use helper::FakeRepository;

fn build_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("dist")).unwrap();
    fs::write(dir.path().join("dist/app-1.2.0.zip"), b"app").unwrap();
    fs::write(dir.path().join("dist/app-1.2.0.pom"), b"pom").unwrap();
    dir
}

fn request(json: &str) -> OutRequest {
    read_request(json.as_bytes()).unwrap()
}

#[tokio::test]
async fn out_uploads_matching_files_flat_under_target() {
    let dir = build_dir();
    let repository = FakeRepository::new();
    let request = request(
        r#"{
            "source": {"url": "https://art.example.com"},
            "params": {"target": "libs/app", "source": "dist/*.zip"}
        }"#,
    );

    let response = out(&repository, &dir.path().display().to_string(), &request)
        .await
        .unwrap();

    assert_eq!(repository.uploaded(), vec!["libs/app/app-1.2.0.zip"]);
    assert_eq!(response.version, Version::new("libs/app/app-1.2.0.zip"));
    assert_eq!(response.metadata[0].name, "total_uploaded");
    assert_eq!(response.metadata[0].value, "1");
    assert_eq!(response.metadata[1].name, "upload_time");
}

#[tokio::test]
async fn out_uploads_whole_directory_when_source_is_empty() {
    let dir = build_dir();
    let repository = FakeRepository::new();
    let request = request(
        r#"{"source": {"url": "https://art.example.com"}, "params": {"target": "libs/app/"}}"#,
    );

    let response = out(&repository, &dir.path().display().to_string(), &request)
        .await
        .unwrap();

    assert_eq!(
        repository.uploaded(),
        vec!["libs/app/app-1.2.0.pom", "libs/app/app-1.2.0.zip"]
    );
    assert_eq!(response.metadata[0].value, "2");
}

#[tokio::test]
async fn out_fails_on_partial_upload_failure() {
    let dir = build_dir();
    let repository = FakeRepository::new().failing_upload("app-1.2.0.pom");
    let request = request(
        r#"{"source": {"url": "https://art.example.com"}, "params": {"target": "libs/app", "source": "dist/"}}"#,
    );

    let result = out(&repository, &dir.path().display().to_string(), &request).await;

    assert!(matches!(
        result,
        Err(ResourceError::UploadFailed {
            uploaded: 1,
            failed: 1
        })
    ));
}

#[tokio::test]
async fn out_requires_target() {
    let dir = build_dir();
    let repository = FakeRepository::new();
    let request = request(r#"{"source": {"url": "https://art.example.com"}, "params": {}}"#);

    let result = out(&repository, &dir.path().display().to_string(), &request).await;

    let err = result.unwrap_err();
    assert!(matches!(err, ResourceError::Config(_)));
    assert!(err.to_string().contains("You must set a target"));
    assert!(repository.uploaded().is_empty());
}
