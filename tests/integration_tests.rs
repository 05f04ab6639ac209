use anyhow::Result;
use httpmock::prelude::*;
use json_to_xml::{Dispatcher, FileSinkFactory, PipelineError, ReqwestClient, RunConfig};
use std::time::Duration;
use tempfile::TempDir;

const EXPECTED_XML: &str = r#" <record>
  <Id>0</Id>
  <name>
   <first>firstname</first>
   <last>lastname</last>
  </name>
  <City></City>
  <State></State>
 </record>"#;

fn dispatcher(config: RunConfig) -> Result<Dispatcher<ReqwestClient, FileSinkFactory>> {
    let client = ReqwestClient::new(config.timeout)?;
    Ok(Dispatcher::new(config, client, FileSinkFactory))
}

#[tokio::test]
async fn test_end_to_end_with_real_http() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_dir = temp_dir.path().join("out");

    let server = MockServer::start();
    let valid = server.mock(|when, then| {
        when.method(GET).path("/valid");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(r#"{"first_name": "firstname", "last_name":"lastname"}"#);
    });
    let full = server.mock(|when, then| {
        when.method(GET).path("/full");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(r#"{"Id": 42, "first_name": "Ada", "last_name": "Lovelace", "City": "London", "State": "LDN"}"#);
    });

    let config = RunConfig::new(vec![server.url("/valid"), server.url("/full")], &output_dir);
    let summary = dispatcher(config)?.run().await?;

    valid.assert();
    full.assert();
    assert_eq!(summary.urls_processed, 2);
    assert_eq!(summary.succeeded, 2);

    assert_eq!(std::fs::read_to_string(output_dir.join("0.xml"))?, EXPECTED_XML);
    let second = std::fs::read_to_string(output_dir.join("1.xml"))?;
    assert!(second.contains("  <Id>42</Id>\n"));
    assert!(second.contains("   <last>Lovelace</last>\n"));
    Ok(())
}

#[tokio::test]
async fn test_per_url_failures_are_isolated() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_dir = temp_dir.path().to_path_buf();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ok");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(r#"{"Id": 1}"#);
    });
    let html = server.mock(|when, then| {
        when.method(GET).path("/html");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(r#"{"Id": 2}"#);
    });
    server.mock(|when, then| {
        when.method(GET).path("/unknown");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(r#"{"foo":"bar"}"#);
    });
    server.mock(|when, then| {
        when.method(GET).path("/malformed");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(r#"{"foo":"bar""#);
    });

    let urls = vec![
        server.url("/ok"),
        server.url("/html"),
        server.url("/unknown"),
        server.url("/malformed"),
        "not a url".to_string(),
    ];
    let summary = dispatcher(RunConfig::new(urls, &output_dir))?.run().await?;

    html.assert();
    assert_eq!(summary.urls_processed, 5);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 4);

    let errors: Vec<String> = summary
        .outcomes
        .iter()
        .map(|o| o.error.clone().unwrap_or_default())
        .collect();
    assert!(errors[0].is_empty());
    assert!(errors[1].contains("Invalid Content-Type header"));
    assert!(errors[1].contains("text/html"));
    assert!(errors[2].contains("not a record"));
    assert!(errors[3].starts_with("parse failed"));
    assert!(errors[4].contains("invalid url"));

    assert!(std::fs::read_to_string(output_dir.join("0.xml"))?.contains("<Id>1</Id>"));
    for i in 1..5 {
        let bytes = std::fs::read(output_dir.join(format!("{}.xml", i)))?;
        assert!(bytes.is_empty(), "{}.xml should be empty", i);
    }
    Ok(())
}

#[tokio::test]
async fn test_slow_server_hits_timeout() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/slow");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(r#"{"Id": 1}"#)
            .delay(Duration::from_secs(3));
    });
    server.mock(|when, then| {
        when.method(GET).path("/fast");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(r#"{"Id": 2}"#);
    });

    let config = RunConfig::new(vec![server.url("/slow"), server.url("/fast")], temp_dir.path())
        .with_timeout(Duration::from_secs(1));
    let summary = dispatcher(config)?.run().await?;

    assert_eq!(summary.succeeded, 1);
    assert!(summary.outcomes[0].error.as_deref().unwrap_or_default().starts_with("get failed"));
    assert!(std::fs::read_to_string(temp_dir.path().join("1.xml"))?.contains("<Id>2</Id>"));
    Ok(())
}

#[tokio::test]
async fn test_non_success_status_with_json_body_is_converted() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/gone");
        then.status(404)
            .header("Content-Type", "application/json")
            .body(r#"{"Id": 404, "State": "missing"}"#);
    });

    let summary = dispatcher(RunConfig::new(vec![server.url("/gone")], temp_dir.path()))?
        .run()
        .await?;

    assert_eq!(summary.succeeded, 1);
    let xml = std::fs::read_to_string(temp_dir.path().join("0.xml"))?;
    assert!(xml.contains("<State>missing</State>"));
    Ok(())
}

#[tokio::test]
async fn test_unwritable_output_dir_is_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let blocker = temp_dir.path().join("plain-file");
    std::fs::write(&blocker, b"")?;

    let server = MockServer::start();
    let never = server.mock(|when, then| {
        when.method(GET).path("/never");
        then.status(200).header("Content-Type", "application/json").body("{}");
    });

    let config = RunConfig::new(vec![server.url("/never")], blocker.join("out"));
    let err = dispatcher(config)?.run().await.unwrap_err();

    assert!(matches!(err, PipelineError::OutputDir { .. }));
    assert_eq!(err.severity().exit_code(), 3);
    never.assert_hits(0);
    Ok(())
}
