use assert_cmd::prelude::*;
use mockito::Matcher;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

const NOT_WEB_APP: &str = r#"{"success":false,"errors":["Application is not a Web / Thick-Client"]}"#;

fn mock_token(server: &mut mockito::Server) -> mockito::Mock {
    server
        .mock("POST", "/oauth/token")
        .match_body(Matcher::UrlEncoded(
            "grant_type".into(),
            "client_credentials".into(),
        ))
        .with_status(200)
        .with_body(r#"{"access_token":"test-token","token_type":"bearer","expires_in":21599}"#)
        .create()
}

fn report_command(api_host: &str, dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fod-dynconf"));
    cmd.arg("test-key")
        .arg("test-secret")
        .arg("--api-host")
        .arg(api_host)
        .arg("--output")
        .arg(dir.join("report").join("dynamic.xlsx"))
        .arg("--log-file")
        .arg(dir.join("log").join("failures.log"))
        .env_remove("FOD_API_HOST")
        .env_remove("FOD_DYNCONF_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn missing_secret_shows_usage() -> Result<(), Box<dyn std::error::Error>> {
    Command::new(assert_cmd::cargo::cargo_bin!("fod-dynconf"))
        .arg("only-a-key")
        .assert()
        .failure()
        .stderr(predicate::str::contains("API_SECRET"));

    Ok(())
}

#[test]
fn report_writes_configured_release_only() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let api_host = server.url();
    let _token = mock_token(&mut server);

    let _releases = server
        .mock("GET", "/api/v3/releases/")
        .match_header("authorization", "Bearer test-token")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_body(
            r#"{
                "items": [
                    { "releaseId": 101, "releaseName": "1.0", "applicationId": 1, "applicationName": "Web Portal" },
                    { "releaseId": 202, "releaseName": "2.0", "applicationId": 2, "applicationName": "Batch Jobs" }
                ],
                "totalCount": 2
            }"#,
        )
        .create();

    let _configured = server
        .mock("GET", "/api/v3/releases/101/dynamic-scans/scan-setup")
        .with_status(200)
        .with_body(
            r#"{
                "dynamicSiteURL": "https://portal.example.com",
                "dynamicScanEnvironmentFacingType": "External",
                "dynamicScanAuthenticationType": "NoAuthentication",
                "primaryUserName": null,
                "secondaryUserName": null,
                "otherUserName": null,
                "timeZone": "UTC",
                "entitlementFrequencyType": "Subscription"
            }"#,
        )
        .create();

    let _not_web = server
        .mock("GET", "/api/v3/releases/202/dynamic-scans/scan-setup")
        .with_status(422)
        .with_body(NOT_WEB_APP)
        .create();

    let temp = tempdir()?;

    let assert = report_command(&api_host, temp.path()).assert().success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("Web Portal Added successfully"));
    assert!(!stdout.contains("Batch Jobs Added successfully"));
    assert!(stdout.contains("Rows written: 1"));
    // stdout is a pipe here, so progress is printed as plain percentages
    assert!(stdout.lines().any(|line| line == "0%"));
    assert!(stdout.lines().any(|line| line == "50%"));

    let report = fs::read(temp.path().join("report").join("dynamic.xlsx"))?;
    assert_eq!(&report[..2], b"PK");

    let log = fs::read_to_string(temp.path().join("log").join("failures.log"))?;
    assert!(log.is_empty());

    Ok(())
}

#[test]
fn report_follows_offset_pagination() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let api_host = server.url();
    let _token = mock_token(&mut server);

    let first = server
        .mock("GET", "/api/v3/releases/")
        .with_status(200)
        .with_body(
            r#"{"items":[{"releaseId":0,"releaseName":"","applicationId":1,"applicationName":"No Release"}],"totalCount":120}"#,
        )
        .expect(1)
        .create();

    let second = server
        .mock("GET", "/api/v3/releases")
        .match_query(Matcher::UrlEncoded("offset".into(), "50".into()))
        .with_status(200)
        .with_body(r#"{"items":[],"totalCount":120}"#)
        .expect(1)
        .create();

    let third = server
        .mock("GET", "/api/v3/releases")
        .match_query(Matcher::UrlEncoded("offset".into(), "100".into()))
        .with_status(200)
        .with_body(r#"{"items":[],"totalCount":120}"#)
        .expect(1)
        .create();

    let temp = tempdir()?;

    report_command(&api_host, temp.path()).assert().success();

    first.assert();
    second.assert();
    third.assert();

    Ok(())
}

#[test]
fn rejected_credentials_stop_the_run() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let api_host = server.url();

    let _token = server
        .mock("POST", "/oauth/token")
        .with_status(401)
        .with_body(r#"{"error":"invalid_client","error_description":"Bad credentials"}"#)
        .create();

    let releases = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create();

    let temp = tempdir()?;

    report_command(&api_host, temp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid_client"))
        .stderr(predicate::str::contains("Authentication failed"));

    releases.assert();
    assert!(!temp.path().join("report").join("dynamic.xlsx").exists());

    Ok(())
}

#[test]
fn malformed_release_page_aborts() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let api_host = server.url();
    let _token = mock_token(&mut server);

    let _releases = server
        .mock("GET", "/api/v3/releases/")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create();

    let temp = tempdir()?;

    report_command(&api_host, temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid API response"));

    assert!(!temp.path().join("report").join("dynamic.xlsx").exists());

    Ok(())
}

#[test]
fn settings_file_supplies_paths() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let api_host = server.url();
    let _token = mock_token(&mut server);

    let _releases = server
        .mock("GET", "/api/v3/releases/")
        .with_status(200)
        .with_body(r#"{"items":[],"totalCount":0}"#)
        .create();

    let temp = tempdir()?;
    let output = temp.path().join("from-config.xlsx");
    let config_path = temp.path().join("settings.yaml");
    fs::write(
        &config_path,
        format!(
            "api_host: {}\noutput: {}\nlog_file: {}\n",
            api_host,
            output.display(),
            temp.path().join("from-config.log").display()
        ),
    )?;

    Command::new(assert_cmd::cargo::cargo_bin!("fod-dynconf"))
        .arg("test-key")
        .arg("test-secret")
        .arg("--config")
        .arg(&config_path)
        .env_remove("FOD_API_HOST")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rows written: 0"));

    assert!(output.exists());
    assert!(temp.path().join("from-config.log").exists());

    Ok(())
}

#[test]
fn missing_settings_file_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;

    Command::new(assert_cmd::cargo::cargo_bin!("fod-dynconf"))
        .arg("test-key")
        .arg("test-secret")
        .arg("--config")
        .arg(temp.path().join("absent.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));

    Ok(())
}
