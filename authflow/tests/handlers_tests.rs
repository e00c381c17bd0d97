// Tests for CLI handlers and their helpers

use authflow::handlers::*;
use authflow_core::{Graph, NodeKind, StudioSnapshot};
use authflow_scanner::{FsStore, StoreError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const AUTH_TS: &str = r#"
import { betterAuth } from "better-auth";
import { prismaAdapter } from "better-auth/adapters/prisma";

export const auth = betterAuth({
  database: prismaAdapter(prisma, { provider: "sqlite" }),
  emailAndPassword: { enabled: true, requireEmailVerification: true },
  socialProviders: {
    google: { clientId: process.env.GOOGLE_CLIENT_ID },
  },
});
"#;

fn project() -> (TempDir, FsStore) {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("src/lib")).unwrap();
    fs::write(temp_dir.path().join("src/lib/auth.ts"), AUTH_TS).unwrap();
    let store = FsStore::new(temp_dir.path());
    (temp_dir, store)
}

fn generate_options(base_url: Option<&str>, dry_run: bool) -> GenerateOptions {
    GenerateOptions {
        snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
        output_path: PathBuf::from("out/auth.ts"),
        env_path: PathBuf::from(DEFAULT_ENV_TEMPLATE_PATH),
        base_url: base_url.map(str::to_string),
        dry_run,
    }
}

// ============================================================================
// Helper Tests
// ============================================================================

#[test]
fn test_expand_path_plain() {
    assert_eq!(expand_path("src/lib/auth.ts"), PathBuf::from("src/lib/auth.ts"));
}

#[test]
fn test_expand_path_tilde() {
    let expanded = expand_path("~/project/auth.ts");
    assert!(expanded.ends_with("project/auth.ts"));
}

#[test]
fn test_base_url_expression_quotes_urls() {
    assert_eq!(
        base_url_expression("https://app.example.com").unwrap(),
        "\"https://app.example.com\""
    );
    assert_eq!(
        base_url_expression("http://localhost:3000/api/auth").unwrap(),
        "\"http://localhost:3000/api/auth\""
    );
}

#[test]
fn test_base_url_expression_keeps_env_reference() {
    assert_eq!(
        base_url_expression("process.env.APP_URL").unwrap(),
        "process.env.APP_URL"
    );
}

#[test]
fn test_base_url_expression_rejects_invalid() {
    assert!(base_url_expression("not a url").is_err());
    assert!(base_url_expression("ftp://files.example.com").is_err());
}

#[test]
fn test_hint_for_missing_file() {
    let err = anyhow::Error::new(StoreError::NotFound(PathBuf::from("auth.ts")))
        .context("Could not read auth config auth.ts");
    assert!(hint_for(&err).unwrap().contains("--deep"));
}

#[test]
fn test_hint_for_other_errors() {
    assert_eq!(hint_for(&anyhow::anyhow!("boom")), None);
}

// ============================================================================
// Init Tests
// ============================================================================

#[tokio::test]
async fn test_init_writes_root_only_snapshot() {
    let (temp_dir, store) = project();
    let path = Path::new(DEFAULT_SNAPSHOT_PATH);

    handle_init(&store, path, false).await.unwrap();

    let text = fs::read_to_string(temp_dir.path().join(path)).unwrap();
    let snapshot = StudioSnapshot::from_json(Some(&text), "auth.ts");
    assert_eq!(snapshot.graph(), Graph::with_root());
}

#[tokio::test]
async fn test_init_refuses_to_overwrite_without_force() {
    let (_temp_dir, store) = project();
    let path = Path::new(DEFAULT_SNAPSHOT_PATH);

    handle_init(&store, path, false).await.unwrap();
    let err = handle_init(&store, path, false).await.unwrap_err();
    assert!(err.to_string().contains("--force"));
    assert!(handle_init(&store, path, true).await.is_ok());
}

// ============================================================================
// Parse, Inspect and Generate Tests
// ============================================================================

#[tokio::test]
async fn test_inspect_extracts_config() {
    let (_temp_dir, store) = project();
    let config = handle_inspect(&store, Path::new("src/lib/auth.ts")).await.unwrap();
    assert_eq!(config.social_providers, vec!["google"]);
    assert!(config.email_and_password.unwrap().require_verification);
}

#[tokio::test]
async fn test_inspect_missing_file_has_hint() {
    let (_temp_dir, store) = project();
    let err = handle_inspect(&store, Path::new("auth.ts")).await.unwrap_err();
    assert!(err.to_string().contains("auth.ts"));
    assert!(hint_for(&err).is_some());
}

#[tokio::test]
async fn test_parse_writes_snapshot() {
    let (temp_dir, store) = project();
    let snapshot_path = Path::new(DEFAULT_SNAPSHOT_PATH);

    let snapshot = handle_parse(&store, Path::new("src/lib/auth.ts"), snapshot_path)
        .await
        .unwrap();
    assert!(snapshot.nodes.len() >= 8);
    assert_eq!(snapshot.auth_content, AUTH_TS);
    assert_eq!(snapshot.metadata.config_path, "src/lib/auth.ts");
    assert!(
        snapshot
            .nodes
            .iter()
            .any(|n| n.kind == NodeKind::OAuth("google".to_string()))
    );
    assert!(temp_dir.path().join(snapshot_path).exists());
}

#[tokio::test]
async fn test_generate_writes_config_and_env() {
    let (temp_dir, store) = project();
    handle_parse(&store, Path::new("src/lib/auth.ts"), Path::new(DEFAULT_SNAPSHOT_PATH))
        .await
        .unwrap();

    let generated = handle_generate(&store, &generate_options(None, false))
        .await
        .unwrap();

    let source = fs::read_to_string(temp_dir.path().join("out/auth.ts")).unwrap();
    assert_eq!(source, generated.source);
    assert!(source.contains("prismaAdapter(prisma, {"));
    assert!(source.contains("GOOGLE_CLIENT_ID"));

    let env = fs::read_to_string(temp_dir.path().join(DEFAULT_ENV_TEMPLATE_PATH)).unwrap();
    assert!(env.contains("DATABASE_URL=file:./dev.db"));
    assert!(env.contains("GOOGLE_CLIENT_SECRET="));
}

#[tokio::test]
async fn test_generate_round_trips_source() {
    let (_temp_dir, store) = project();
    handle_parse(&store, Path::new("src/lib/auth.ts"), Path::new(DEFAULT_SNAPSHOT_PATH))
        .await
        .unwrap();

    let generated = handle_generate(&store, &generate_options(None, true))
        .await
        .unwrap();
    assert_eq!(
        authflow_core::extract_config(&generated.source),
        authflow_core::extract_config(AUTH_TS)
    );
}

#[tokio::test]
async fn test_generate_dry_run_writes_nothing() {
    let (temp_dir, store) = project();
    handle_init(&store, Path::new(DEFAULT_SNAPSHOT_PATH), false)
        .await
        .unwrap();

    let generated = handle_generate(&store, &generate_options(None, true))
        .await
        .unwrap();
    assert!(generated.source.contains("secret: process.env.BETTER_AUTH_SECRET"));
    assert!(!temp_dir.path().join("out/auth.ts").exists());
    assert!(!temp_dir.path().join(DEFAULT_ENV_TEMPLATE_PATH).exists());
}

#[tokio::test]
async fn test_generate_base_url_override() {
    let (_temp_dir, store) = project();
    handle_init(&store, Path::new(DEFAULT_SNAPSHOT_PATH), false)
        .await
        .unwrap();

    let generated = handle_generate(&store, &generate_options(Some("https://app.example.com"), true))
        .await
        .unwrap();
    assert!(generated.source.contains("  baseURL: \"https://app.example.com\",\n"));
}

#[tokio::test]
async fn test_generate_without_snapshot_fails() {
    let (_temp_dir, store) = project();
    let err = handle_generate(&store, &generate_options(None, true))
        .await
        .unwrap_err();
    assert!(hint_for(&err).is_some());
}

// ============================================================================
// Export and Locate Tests
// ============================================================================

#[tokio::test]
async fn test_export_writes_reachable_graph() {
    let (temp_dir, store) = project();
    let snapshot = handle_parse(&store, Path::new("src/lib/auth.ts"), Path::new(DEFAULT_SNAPSHOT_PATH))
        .await
        .unwrap();

    let exported = handle_export(&store, Path::new(DEFAULT_SNAPSHOT_PATH), Path::new("graph.json"))
        .await
        .unwrap();
    assert_eq!(exported.nodes.len(), snapshot.nodes.len());

    let text = fs::read_to_string(temp_dir.path().join("graph.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(value["nodes"].is_array());
    assert!(value["edges"].is_array());
    assert!(value.get("metadata").is_none());
}

#[tokio::test]
async fn test_locate_finds_project_config() {
    let (temp_dir, _store) = project();
    let candidates = handle_locate(temp_dir.path(), false, true).await.unwrap();
    assert_eq!(candidates.len(), 1);
    assert!(candidates[0].has_better_auth);
}
