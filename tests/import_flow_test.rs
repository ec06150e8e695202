use anyhow::Result;
use family_loader::core::{ImportOutcome, ImportRun, MemberStore};
use family_loader::{FixedConfirm, ImportEngine, ImportPipeline, LocalStorage, Settings, SupabaseClient};
use httpmock::prelude::*;
use httpmock::Method::HEAD;
use serde_json::json;
use tempfile::TempDir;

const KEY: &str = "service-role-key";

fn write_members(dir: &TempDir, count: usize) -> Result<String> {
    let members: Vec<_> = (1..=count)
        .map(|i| {
            json!({
                "id": format!("m-{i:03}"),
                "name": format!("Anggota {i}"),
                "birthDate": "1980-01-01",
                "isDeceased": false,
                "children": [],
                "spouses": [{"id": "m-000", "status": "married"}],
                "nickname": "dropped"
            })
        })
        .collect();
    let path = dir.path().join("family.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&members)?)?;
    Ok(path.to_str().unwrap().to_string())
}

fn settings(server: &MockServer, input_file: String) -> Settings {
    Settings {
        supabase_url: server.base_url(),
        supabase_key: KEY.to_string(),
        input_file,
        ..Settings::default()
    }
}

#[tokio::test]
async fn test_partial_import_against_postgrest() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_members(&temp_dir, 25)?;
    let server = MockServer::start();

    let first = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/members")
            .query_param("on_conflict", "id")
            .header("apikey", KEY)
            .body_contains("\"m-001\"");
        then.status(201);
    });
    let second = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/members")
            .body_contains("\"m-011\"");
        then.status(409)
            .header("Content-Type", "application/json")
            .json_body(json!({"code": "23505", "message": "duplicate key value violates unique constraint"}));
    });
    let third = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/members")
            .body_contains("\"m-021\"");
        then.status(201);
    });

    let client = SupabaseClient::connect(&server.base_url(), KEY)?;
    let pipeline = ImportPipeline::new(LocalStorage::new("."), client, settings(&server, input));
    let engine = ImportEngine::new(pipeline, FixedConfirm(true));

    let ImportRun::Finished(summary) = engine.run().await? else {
        panic!("import was cancelled");
    };

    first.assert_hits(1);
    second.assert_hits(1);
    third.assert_hits(1);
    assert_eq!(summary.total, 25);
    assert_eq!(summary.success_count, 15);
    assert_eq!(summary.error_count, 10);
    assert_eq!(summary.outcome(), ImportOutcome::Partial);
    assert_eq!(
        summary.error_messages(),
        vec!["Batch 2: Backend rejected request (HTTP 409): duplicate key value violates unique constraint"]
    );
    Ok(())
}

#[tokio::test]
async fn test_rows_are_sent_in_destination_shape() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_members(&temp_dir, 1)?;
    let server = MockServer::start();

    let upsert = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/members").json_body(json!([{
            "id": "m-001",
            "name": "Anggota 1",
            "gender": "male",
            "birth_date": "1980-01-01",
            "death_date": null,
            "is_deceased": false,
            "place_of_birth": null,
            "occupation": null,
            "education": null,
            "address": null,
            "phone": null,
            "email": null,
            "biography": null,
            "photo": null,
            "children": [],
            "parents": [],
            "spouses": [{"id": "m-000", "status": "married"}],
            "tree_slug": "default"
        }]));
        then.status(201);
    });

    let client = SupabaseClient::connect(&server.base_url(), KEY)?;
    let pipeline = ImportPipeline::new(LocalStorage::new("."), client, settings(&server, input));
    let engine = ImportEngine::new(pipeline, FixedConfirm(true));

    let run = engine.run().await?;

    upsert.assert();
    assert!(matches!(run, ImportRun::Finished(ref s) if s.outcome() == ImportOutcome::Complete));
    Ok(())
}

#[tokio::test]
async fn test_cancelled_import_sends_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_members(&temp_dir, 5)?;
    let server = MockServer::start();
    let upsert = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/members");
        then.status(201);
    });

    let client = SupabaseClient::connect(&server.base_url(), KEY)?;
    let pipeline = ImportPipeline::new(LocalStorage::new("."), client, settings(&server, input));
    let engine = ImportEngine::new(pipeline, FixedConfirm(false));

    assert!(matches!(engine.run().await?, ImportRun::Cancelled));
    upsert.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_missing_file_sends_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let upsert = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/members");
        then.status(201);
    });
    let missing = temp_dir.path().join("absent.json").to_str().unwrap().to_string();

    let client = SupabaseClient::connect(&server.base_url(), KEY)?;
    let pipeline = ImportPipeline::new(LocalStorage::new("."), client, settings(&server, missing.clone()));
    let engine = ImportEngine::new(pipeline, FixedConfirm(true));

    let err = engine.run().await.unwrap_err();

    assert_eq!(err.to_string(), format!("File not found: {}", missing));
    upsert.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_backend_fails_every_batch() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_members(&temp_dir, 12)?;

    // Nothing listens on port 9 of localhost.
    let client = SupabaseClient::connect("http://127.0.0.1:9", KEY)?;
    let settings = Settings {
        supabase_url: "http://127.0.0.1:9".to_string(),
        supabase_key: KEY.to_string(),
        input_file: input,
        ..Settings::default()
    };
    let pipeline = ImportPipeline::new(LocalStorage::new("."), client, settings);
    let engine = ImportEngine::new(pipeline, FixedConfirm(true));

    let ImportRun::Finished(summary) = engine.run().await? else {
        panic!("import was cancelled");
    };

    assert_eq!(summary.outcome(), ImportOutcome::Failed);
    assert_eq!(summary.error_count, 12);
    assert!(summary.failed_batches().all(|b| match b {
        family_loader::core::BatchOutcome::Failed { cause, .. } => {
            matches!(cause, family_loader::LoaderError::ApiError(_))
        }
        _ => false,
    }));
    Ok(())
}

#[tokio::test]
async fn test_client_is_usable_as_trait_object() -> Result<()> {
    let server = MockServer::start();
    let count = server.mock(|when, then| {
        when.method(HEAD).path("/rest/v1/members");
        then.status(200).header("Content-Range", "*/7");
    });

    let client = SupabaseClient::connect(&server.base_url(), KEY)?;
    let store: &dyn MemberStore = &client;

    assert_eq!(store.count("members", Some("default")).await?, 7);
    count.assert();
    Ok(())
}
