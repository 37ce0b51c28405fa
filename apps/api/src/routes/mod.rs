pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::builder::handlers as builder;
use crate::compile::handlers as compile;
use crate::patch::handlers as patch;
use crate::state::AppState;
use crate::tracker::handlers as tracker;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Patch pipeline
        .route("/api/v1/resume/generate", post(patch::handle_generate))
        .route("/api/v1/resume/regions", post(patch::handle_regions))
        .route("/api/v1/resume/apply", post(patch::handle_apply))
        // Rendering
        .route("/api/v1/resume/compile", post(compile::handle_compile))
        .route("/api/v1/resume/build", post(builder::handle_build))
        .route("/api/v1/resume/seed", get(builder::handle_seed))
        .route("/api/v1/resume/blank", get(builder::handle_blank))
        .route("/api/v1/resume/entries/:section", post(builder::handle_add_entry))
        .route(
            "/api/v1/resume/entries/:section/:id/remove",
            post(builder::handle_remove_entry),
        )
        // Job tracker
        .route(
            "/api/v1/jobs",
            get(tracker::handle_list_jobs).put(tracker::handle_replace_jobs),
        )
        .route("/api/v1/jobs/:id", delete(tracker::handle_delete_job))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::compile::backend::CompilerBackend;
    use crate::config::{Config, InputLimits};
    use crate::patch::generator::HeuristicPatchGenerator;
    use crate::tracker::store::JobStore;

    const DOCUMENT: &str = "\\begin{document}\n\
        %<BLOCK id=\"summary\">\nOld summary\n%</BLOCK>\n\
        %<BLOCK id=\"skills\">\nOld skills\n%</BLOCK>\n\
        \\end{document}";

    fn test_state(data_dir: PathBuf, compilers: Vec<Arc<dyn CompilerBackend>>) -> AppState {
        AppState {
            config: Config {
                port: 0,
                rust_log: "info".to_string(),
                anthropic_api_key: None,
                llm_model: "test".to_string(),
                limits: InputLimits::default(),
                primary_compile_timeout: Duration::from_secs(1),
                secondary_compile_timeout: Duration::from_secs(1),
                data_dir: data_dir.clone(),
            },
            patch_strategy: Arc::new(HeuristicPatchGenerator),
            compilers: compilers.into(),
            job_store: Arc::new(JobStore::new(&data_dir)),
        }
    }

    fn app(dir: &tempfile::TempDir) -> Router {
        build_router(test_state(dir.path().to_path_buf(), Vec::new()))
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_service() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(&dir)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["service"], "tailor-api");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_generate_returns_patch_for_every_region() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(&dir)
            .oneshot(json_request(
                Method::POST,
                "/api/v1/resume/generate",
                json!({ "guidanceText": "Rust services, Kubernetes, Rust tooling", "document": DOCUMENT }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let ids: Vec<&str> = body["blocks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["summary", "skills"]);
        assert!(body["notes"].as_array().is_some());
    }

    #[tokio::test]
    async fn test_generate_accepts_legacy_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(&dir)
            .oneshot(json_request(
                Method::POST,
                "/api/v1/resume/generate",
                json!({ "jobDescription": "Go developer", "latexSource": DOCUMENT }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_generate_without_regions_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(&dir)
            .oneshot(json_request(
                Method::POST,
                "/api/v1/resume/generate",
                json!({ "guidanceText": "anything", "document": "\\section{Plain}" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "NO_REGIONS");
    }

    #[tokio::test]
    async fn test_generate_oversized_guidance_is_413() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(&dir)
            .oneshot(json_request(
                Method::POST,
                "/api/v1/resume/generate",
                json!({ "guidanceText": "a".repeat(12_001), "document": DOCUMENT }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_apply_reports_missing_ids_and_invalid_patches() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(&dir)
            .oneshot(json_request(
                Method::POST,
                "/api/v1/resume/apply",
                json!({
                    "document": DOCUMENT,
                    "patch": { "blocks": [
                        { "id": "summary", "replaceWith": ["New summary"] },
                        { "id": "ghost", "replaceWith": ["x"] }
                    ] }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["appliedIds"], json!(["summary"]));
        assert_eq!(body["missingIds"], json!(["ghost"]));
        assert!(body["next"].as_str().unwrap().contains("New summary"));
        assert!(body["warnings"][0].as_str().unwrap().contains("could not find blocks: ghost"));

        let response = app(&dir)
            .oneshot(json_request(
                Method::POST,
                "/api/v1/resume/apply",
                json!({ "document": DOCUMENT, "patch": { "blocks": [{ "id": "summary", "replaceWith": [] }] } }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("blocks[0].replaceWith"));
    }

    #[tokio::test]
    async fn test_regions_lists_ids_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(&dir)
            .oneshot(json_request(
                Method::POST,
                "/api/v1/resume/regions",
                json!({ "document": DOCUMENT }),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["regions"][0]["id"], "summary");
        assert_eq!(body["regions"][1]["rawContent"], "Old skills");
        assert_eq!(body["warnings"], json!([]));

        let dangling = format!("{DOCUMENT}\n%<BLOCK id=\"extra\">\nno end");
        let response = app(&dir)
            .oneshot(json_request(
                Method::POST,
                "/api/v1/resume/regions",
                json!({ "document": dangling }),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["regions"].as_array().unwrap().len(), 2);
        assert_eq!(body["warnings"], json!(["Block 'extra' has no matching %</BLOCK>"]));

        let reopened = format!("{DOCUMENT}\n%<BLOCK id=\"summary\">\nno end");
        let response = app(&dir)
            .oneshot(json_request(
                Method::POST,
                "/api/v1/resume/regions",
                json!({ "document": reopened }),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["warnings"], json!(["Block 'summary' has no matching %</BLOCK>"]));
    }

    #[tokio::test]
    async fn test_apply_missing_fields_use_error_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(&dir)
            .oneshot(json_request(
                Method::POST,
                "/api/v1/resume/apply",
                json!({ "patch": { "blocks": [{ "id": "summary", "replaceWith": ["x"] }] } }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let response = app(&dir)
            .oneshot(json_request(
                Method::POST,
                "/api/v1/resume/apply",
                json!({ "document": DOCUMENT }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_build_returns_downloadable_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let seed = serde_json::to_value(crate::builder::models::ResumeData::seed()).unwrap();
        let response = app(&dir)
            .oneshot(json_request(Method::POST, "/api/v1/resume/build", seed))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_form_entries_add_and_remove() {
        let dir = tempfile::tempdir().unwrap();

        let response = app(&dir)
            .oneshot(Request::get("/api/v1/resume/blank").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let blank = body_json(response).await;
        assert_eq!(blank["experience"], json!([]));

        let response = app(&dir)
            .oneshot(json_request(Method::POST, "/api/v1/resume/entries/experience", blank))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let added = body_json(response).await;
        let id = added["id"].as_str().unwrap().to_string();
        assert_eq!(added["data"]["experience"][0]["id"], id.as_str());

        let uri = format!("/api/v1/resume/entries/experience/{id}/remove");
        let response = app(&dir)
            .oneshot(json_request(Method::POST, &uri, added["data"].clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let removed = body_json(response).await;
        assert_eq!(removed["experience"], json!([]));

        let response = app(&dir)
            .oneshot(json_request(Method::POST, &uri, removed))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_compile_blank_source_is_400_and_no_compilers_is_502() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(&dir)
            .oneshot(json_request(
                Method::POST,
                "/api/v1/resume/compile",
                json!({ "latexSource": "   " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app(&dir)
            .oneshot(json_request(
                Method::POST,
                "/api/v1/resume/compile",
                json!({ "latexSource": DOCUMENT }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("No PDF produced."));
    }

    #[tokio::test]
    async fn test_jobs_crud_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let response = app(&dir)
            .oneshot(Request::get("/api/v1/jobs").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let mut jobs = body_json(response).await;
        assert_eq!(jobs.as_array().unwrap().len(), 4);

        jobs[0]["order"] = json!(9);
        let response = app(&dir)
            .oneshot(json_request(Method::PUT, "/api/v1/jobs", jobs))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let saved = body_json(response).await;
        assert_eq!(saved[0]["order"], 0, "orders are normalized on save");

        let response = app(&dir)
            .oneshot(
                Request::delete("/api/v1/jobs/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app(&dir)
            .oneshot(
                Request::delete("/api/v1/jobs/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_jobs_duplicate_ids_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let record = json!({
            "id": "a", "company": "C", "title": "T", "status": "Applied",
            "priority": "Low", "updatedAt": "2026-01-01T00:00:00Z", "order": 0
        });
        let response = app(&dir)
            .oneshot(json_request(Method::PUT, "/api/v1/jobs", json!([record.clone(), record])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
