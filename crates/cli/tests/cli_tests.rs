//! End-to-end command tests against a snapshot directory.

use carebook_cli::{Cli, Command, Config, OutputFormat, run};
use carebook_store::{CUSTOM_FIELDS_FILE, PATIENTS_FILE, SnapshotStore};
use clap::Parser;
use serde_json::json;
use tempfile::TempDir;

fn snapshot() -> TempDir {
    let dir = TempDir::new().unwrap();
    let patients = json!({
        "count": 3,
        "next": null,
        "previous": null,
        "results": [
            {
                "id": 3, "first_name": "Maria", "middle_name": null, "last_name": "Garcia",
                "date_of_birth": "1992-11-02", "status": "ONBOARDING",
                "custom_field_values": [
                    {"field_name": "Referral", "field_type": "TEXT", "text_value": "Clinic A"}
                ],
                "created_at": "2024-03-03T09:00:00Z"
            },
            {
                "id": 2, "first_name": "Sam", "middle_name": null, "last_name": "Austin",
                "date_of_birth": "1975-06-20", "status": "CHURNED",
                "created_at": "2024-02-02T09:00:00Z"
            },
            {
                "id": 1, "first_name": "Jane", "middle_name": null, "last_name": "Doe",
                "date_of_birth": "1985-03-14", "status": "ACTIVE",
                "addresses": [
                    {"street": "1 Main St", "city": "Austin", "state": "TX",
                     "zip_code": "73301", "is_primary": true}
                ],
                "created_at": "2024-01-01T09:00:00Z"
            }
        ]
    });
    let fields = json!([
        {"id": 1, "name": "Referral", "field_type": "TEXT", "is_required": false},
        {"id": 2, "name": "Insurance ID", "field_type": "TEXT", "is_required": true}
    ]);
    std::fs::write(dir.path().join(PATIENTS_FILE), patients.to_string()).unwrap();
    std::fs::write(dir.path().join(CUSTOM_FIELDS_FILE), fields.to_string()).unwrap();
    dir
}

async fn run_args(dir: &TempDir, args: &[&str]) -> anyhow::Result<carebook_cli::Output> {
    let data_dir = dir.path().to_string_lossy().to_string();
    let mut argv = vec!["carebook", "--data-dir", data_dir.as_str()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv)?;

    let store = SnapshotStore::open(&cli.config.data_dir).await?;
    run(&cli.config, &cli.command, &store).await
}

// ============================================================================
// Search
// ============================================================================

/// The search box matches names and cities alike, newest first.
#[tokio::test]
async fn test_search_name_and_city() {
    let dir = snapshot();
    let output = run_args(&dir, &["search", "austin"]).await.unwrap();

    assert!(output.success);
    let sam = output.text.find("Sam Austin").unwrap();
    let jane = output.text.find("Jane Doe").unwrap();
    assert!(sam < jane);
    assert!(output.text.contains("2 of 3 patients"));
}

/// A blank query lists everything.
#[tokio::test]
async fn test_search_blank() {
    let dir = snapshot();
    let output = run_args(&dir, &["search", "  "]).await.unwrap();
    assert!(output.text.contains("3 of 3 patients"));
}

/// JSON output is the list of matching patients.
#[tokio::test]
async fn test_search_json() {
    let dir = snapshot();
    let output = run_args(&dir, &["--format", "json", "search", "clinic a"])
        .await
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&output.text).unwrap();
    let ids: Vec<u64> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![3]);
}

// ============================================================================
// Dashboard
// ============================================================================

/// The dashboard counts every patient and searches only the recent ones.
#[tokio::test]
async fn test_dashboard_recent() {
    let dir = snapshot();
    let output = run_args(&dir, &["--recent", "2", "dashboard", "--query", "jane"])
        .await
        .unwrap();

    assert!(output.text.contains("Total patients   3"));
    assert!(output.text.contains("Recent patients matching search"));
    assert!(output.text.contains("No patients found"));
    assert!(output.text.contains("0 of 2 patients"));
}

/// Dashboard JSON carries the stats block.
#[tokio::test]
async fn test_dashboard_json() {
    let dir = snapshot();
    let output = run_args(&dir, &["--format", "json", "dashboard"]).await.unwrap();

    let value: serde_json::Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(value["stats"]["total_patients"], 3);
    assert_eq!(value["stats"]["churned_patients"], 1);
    assert_eq!(value["recent"].as_array().unwrap().len(), 3);
}

// ============================================================================
// Records
// ============================================================================

/// Custom fields list by name with their values findable by field.
#[tokio::test]
async fn test_fields_and_values() {
    let dir = snapshot();

    let output = run_args(&dir, &["fields"]).await.unwrap();
    let insurance = output.text.find("Insurance ID").unwrap();
    let referral = output.text.find("Referral").unwrap();
    assert!(insurance < referral);

    let output = run_args(&dir, &["values", "1"]).await.unwrap();
    assert!(output.text.contains("Clinic A"));
    assert!(output.text.contains("1 values"));
}

/// A missing required custom field fails validation.
#[tokio::test]
async fn test_validate_required_field() {
    let dir = snapshot();
    let draft = dir.path().join("draft.json");
    std::fs::write(
        &draft,
        r#"{"first_name": "Ana", "last_name": "Lopez", "date_of_birth": "1990-05-01"}"#,
    )
    .unwrap();

    let output = run_args(&dir, &["validate", draft.to_str().unwrap()])
        .await
        .unwrap();
    assert!(!output.success);
    assert!(output.text.contains("Insurance ID is required"));
}

/// Configuration defaults apply when no options are given.
#[test]
fn test_parse_defaults() {
    let cli = Cli::try_parse_from(["carebook", "dashboard"]).unwrap();
    assert!(matches!(cli.command, Command::Dashboard(_)));
    assert_eq!(cli.config.format, OutputFormat::Text);
    assert_eq!(cli.config.recent, Config::default().recent);
}
