//! Recording real exchanges against a local server

mod common;

use std::sync::Arc;

use tempfile::TempDir;

use canned::document::Document;
use canned::{CannedError, Client, Recorder, Result, TomlCodec, YamlCodec};
use common::{expected_records, init_tracing, TestServer, LARGE_BODY_SIZE};

async fn another(client: &Client, server: &TestServer) -> Result<()> {
    client.get(&server.url_for("/500")).await?;
    client.put(&server.url_for("/202")).await?;
    Ok(())
}

async fn run(client: Client, server: &TestServer) -> Result<()> {
    client.get(&server.url_for("/404")).await?;
    client.get(&server.url_for("/status/wrong")).await?;
    another(&client, server).await
}

#[tokio::test]
async fn test_recorder_yaml() {
    init_tracing();
    let server = TestServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let out_file = temp_dir.path().join("response_record");

    let recorder = Recorder::new();
    recorder
        .record(&out_file, |client| run(client, &server))
        .await
        .unwrap();

    let text = std::fs::read_to_string(&out_file).unwrap();
    let data: Document = serde_yaml::from_str(&text).unwrap();

    assert_eq!(
        data,
        Document::from_records(&expected_records(&server.host(), server.port()))
    );
}

#[tokio::test]
async fn test_recorder_yaml_shape() {
    let server = TestServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let out_file = temp_dir.path().join("response.yaml");

    Recorder::new()
        .record(&out_file, |client| run(client, &server))
        .await
        .unwrap();

    // check the wrapping shape without going through the crate's own types
    let value: serde_yaml::Value =
        serde_yaml::from_str(&std::fs::read_to_string(&out_file).unwrap()).unwrap();
    let responses = value["responses"].as_sequence().unwrap();
    assert_eq!(responses.len(), 4);

    let first = &responses[0]["response"];
    assert_eq!(first["method"].as_str(), Some("GET"));
    assert_eq!(first["url"].as_str(), Some(server.url_for("/404").as_str()));
    assert_eq!(first["body"].as_str(), Some("404 Not Found"));
    assert_eq!(first["status"].as_u64(), Some(404));
    assert_eq!(first["content_type"].as_str(), Some("text/plain"));
    assert_eq!(first["auto_calculate_content_length"].as_bool(), Some(false));

    let last = &responses[3]["response"];
    assert_eq!(last["method"].as_str(), Some("PUT"));
    assert_eq!(last["status"].as_u64(), Some(202));
}

#[tokio::test]
async fn test_recorder_toml() {
    init_tracing();
    let server = TestServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let toml_file = temp_dir.path().join("response.toml");
    let yaml_file = temp_dir.path().join("response.yaml");

    let custom_recorder = Recorder::with_codec(Arc::new(TomlCodec));
    custom_recorder
        .record(&toml_file, |client| run(client, &server))
        .await
        .unwrap();

    Recorder::with_codec(Arc::new(YamlCodec))
        .record(&yaml_file, |client| run(client, &server))
        .await
        .unwrap();

    let toml_data: Document = toml::from_str(&std::fs::read_to_string(&toml_file).unwrap()).unwrap();
    let yaml_data: Document =
        serde_yaml::from_str(&std::fs::read_to_string(&yaml_file).unwrap()).unwrap();

    assert_eq!(
        toml_data,
        Document::from_records(&expected_records(&server.host(), server.port()))
    );
    assert_eq!(toml_data, yaml_data);

    let value: toml::Value = toml::from_str(&std::fs::read_to_string(&toml_file).unwrap()).unwrap();
    assert_eq!(
        value["responses"][1]["response"]["status"].as_integer(),
        Some(400)
    );
}

#[tokio::test]
async fn test_recorder_failure_writes_no_file() {
    let server = TestServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let out_file = temp_dir.path().join("response.yaml");

    let url = server.url_for("/404");
    let recorder = Recorder::new();
    let result: Result<()> = recorder
        .record(&out_file, |client| async move {
            client.get(&url).await?;
            Err(CannedError::Http("work gave up".to_string()))
        })
        .await;

    assert!(result.is_err());
    assert!(!out_file.exists());
}

#[tokio::test]
async fn test_recorder_default_path_from_config() {
    let server = TestServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    let config = canned::config::Config {
        format: canned::Format::Toml,
        record_path: temp_dir.path().join("configured.toml"),
        ..Default::default()
    };
    config.validate().unwrap();

    let url = server.url_for("/500");
    let recorder = Recorder::from_config(&config);
    let status = recorder
        .record_default(|client| async move {
            let response = client.get(&url).await?;
            Ok(response.status)
        })
        .await
        .unwrap();

    assert_eq!(status, 500);
    let records =
        canned::replay::load_records(&config.record_path, config.format.codec().as_ref()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].body.as_deref(), Some("500 Internal Server Error"));
    assert!(!records[0].auto_calculate_content_length);
}

#[tokio::test]
async fn test_recorder_body_limit_from_config() {
    let server = TestServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    let mut config = canned::config::Config {
        record_path: temp_dir.path().join("large.yaml"),
        ..Default::default()
    };
    config.limits.max_body_size = 64;
    config.validate().unwrap();

    let url = server.url_for("/large");
    let recorder = Recorder::from_config(&config);
    let result = recorder
        .record_default(|client| async move {
            client.get(&url).await?;
            Ok(())
        })
        .await;

    assert!(matches!(
        result,
        Err(CannedError::DataTooLarge {
            size: LARGE_BODY_SIZE,
            limit: 64
        })
    ));
    assert!(!config.record_path.exists());
    assert!(recorder.registered().is_empty());
}
