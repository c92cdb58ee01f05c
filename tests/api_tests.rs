//! Router-level tests: the full middleware stack and handlers over the stub
//! repository and mock storage/mail.

mod support;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use corporate_cms::models::{
    ApplicationReceipt, Page, PresignedUploadRequest, PresignedUploadResponse, Service,
};
use serde_json::{Value, json};
use support::{StubRepository, admin_id, app, app_with, editor_id, sample_blog, sample_career, sample_service};
use tower::util::ServiceExt;
use uuid::Uuid;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, user: Option<Uuid>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(user) = user {
        builder = builder.header("x-user-id", user.to_string());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn health_check_responds() {
    let app = app(StubRepository::default());
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn home_page_is_composed_from_defaults_and_backfill() {
    let repo = StubRepository {
        services: vec![sample_service("orthopedic-supply")],
        blogs: vec![sample_blog("launch")],
        ..Default::default()
    };
    let app = app(repo);

    let response = app.oneshot(get("/pages/home")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    // Defaults fill the hero; featured lists are back-filled from content.
    assert!(body["sections"]["hero"]["title"].is_string());
    let featured = body["sections"]["services"]["featuredServices"]
        .as_array()
        .unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0]["slug"], "orthopedic-supply");
    let posts = body["sections"]["blog"]["featuredBlogs"].as_array().unwrap();
    assert_eq!(posts[0]["slug"], "launch");
}

#[tokio::test]
async fn stored_home_sections_survive_composition() {
    let repo = StubRepository {
        home_page: Some(Page {
            id: Uuid::new_v4(),
            page_type: "home".to_string(),
            language: "en".to_string(),
            title: Some("Home".to_string()),
            slug: Some("home".to_string()),
            sections: json!({ "hero": { "title": "Custom hero" } }),
            seo: None,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }),
        ..Default::default()
    };
    let app = app(repo);

    let body = body_json(app.oneshot(get("/pages/home")).await.unwrap()).await;
    assert_eq!(body["sections"]["hero"]["title"], "Custom hero");
    // Untouched default sections are still present.
    assert!(body["sections"]["hero"]["primaryButton"]["text"].is_string());
}

#[tokio::test]
async fn unknown_page_type_is_rejected() {
    let app = app(StubRepository::default());
    let response = app.oneshot(get("/pages/checkout")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_page_is_404() {
    let app = app(StubRepository::default());
    let response = app.oneshot(get("/pages/about")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn page_upsert_merges_sections_and_places_uploads() {
    let repo = StubRepository {
        home_page: Some(Page {
            id: Uuid::new_v4(),
            page_type: "home".to_string(),
            language: "en".to_string(),
            title: Some("Home".to_string()),
            slug: Some("home".to_string()),
            sections: json!({
                "hero": { "title": "Old", "subtitle": "Keep me" }
            }),
            seo: None,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }),
        ..Default::default()
    };
    let app = app(repo);

    let response = app
        .oneshot(json_request(
            "PUT",
            "/admin/pages/home",
            Some(admin_id()),
            json!({
                "sections": { "hero": { "title": "New" } },
                "uploads": [{
                    "path": "hero.backgroundImage",
                    "key": "uploads/images/bg.jpg",
                    "alt": "Hero bg",
                    "size": 2048,
                    "mime_type": "image/jpeg"
                }]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["sections"]["hero"]["title"], "New");
    assert_eq!(body["sections"]["hero"]["subtitle"], "Keep me");
    let asset = &body["sections"]["hero"]["backgroundImage"];
    assert_eq!(
        asset["url"],
        "http://localhost:9000/mock-bucket/uploads/images/bg.jpg"
    );
    assert_eq!(asset["alt"], "Hero bg");
    assert_eq!(asset["mimeType"], "image/jpeg");
}

#[tokio::test]
async fn page_upsert_requires_admin_role() {
    let app = app(StubRepository::default());
    let response = app
        .oneshot(json_request(
            "PUT",
            "/admin/pages/home",
            Some(editor_id()),
            json!({ "sections": {} }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_routes_reject_anonymous_requests() {
    let app = app(StubRepository::default());
    let response = app
        .oneshot(json_request("PUT", "/admin/pages/home", None, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_service_list_hides_inactive_rows() {
    let mut hidden = sample_service("hidden");
    hidden.is_active = false;
    let repo = StubRepository {
        services: vec![sample_service("visible"), hidden],
        ..Default::default()
    };
    let app = app(repo);

    let body = body_json(app.oneshot(get("/services")).await.unwrap()).await;
    let slugs: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["visible"]);
    assert_eq!(body["meta"]["total"], 1);
}

#[tokio::test]
async fn create_service_derives_slug_and_resolves_image_key() {
    let app = app(StubRepository::default());
    let response = app
        .oneshot(json_request(
            "POST",
            "/admin/services",
            Some(admin_id()),
            json!({
                "title": "Surgical Imaging!",
                "featured_image_key": "uploads/images/imaging.jpg"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let service: Service = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(service.slug, "surgical-imaging");
    assert_eq!(
        service.featured_image.as_deref(),
        Some("http://localhost:9000/mock-bucket/uploads/images/imaging.jpg")
    );
}

#[tokio::test]
async fn service_update_deletes_replaced_image() {
    let service = sample_service("orthopedic-supply");
    let id = service.id;
    let (app, storage, _mailer) = app_with(StubRepository {
        services: vec![service],
        ..Default::default()
    });

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/admin/services/{id}"),
            Some(admin_id()),
            json!({ "featured_image_key": "uploads/images/new.jpg" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        storage.deleted_keys(),
        vec!["uploads/images/old-service.jpg".to_string()]
    );
}

#[tokio::test]
async fn blog_create_validation_failure_lists_fields() {
    let app = app(StubRepository::default());
    let response = app
        .oneshot(json_request(
            "POST",
            "/admin/blogs",
            Some(admin_id()),
            json!({ "title": "", "excerpt": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"excerpt"));
}

#[tokio::test]
async fn draft_blogs_are_invisible_publicly() {
    let mut draft = sample_blog("draft-post");
    draft.status = "draft".to_string();
    draft.published_at = None;
    let router = app(StubRepository {
        blogs: vec![sample_blog("published-post"), draft.clone()],
        ..Default::default()
    });

    let body = body_json(router.clone().oneshot(get("/blogs")).await.unwrap()).await;
    let slugs: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["published-post"]);

    let response = router.oneshot(get("/blogs/draft-post")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn career_lookup_works_by_id_and_slug() {
    let career = sample_career(true);
    let id = career.id;
    let slug = career.slug.clone();
    let (router, _, _) = app_with(StubRepository {
        careers: vec![career],
        ..Default::default()
    });

    let by_id = router
        .clone()
        .oneshot(get(&format!("/careers/{id}")))
        .await
        .unwrap();
    assert_eq!(by_id.status(), StatusCode::OK);

    let by_slug = router.oneshot(get(&format!("/careers/{slug}"))).await.unwrap();
    assert_eq!(by_slug.status(), StatusCode::OK);
}

#[tokio::test]
async fn application_receipt_resolves_resume_url() {
    let career = sample_career(true);
    let id = career.id;
    let app = app(StubRepository {
        careers: vec![career],
        ..Default::default()
    });

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/careers/{id}/apply"),
            None,
            json!({
                "full_name": "Jane Doe",
                "email": "Jane@Example.com",
                "resume_key": "uploads/files/resume.pdf"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let receipt: ApplicationReceipt = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(receipt.email, "jane@example.com");
    assert!(receipt.resume_url.ends_with("uploads/files/resume.pdf"));
    assert_eq!(receipt.job.title, "Senior Rust Engineer");
}

#[tokio::test]
async fn applications_to_closed_postings_are_rejected() {
    let career = sample_career(false);
    let id = career.id;
    let app = app(StubRepository {
        careers: vec![career],
        ..Default::default()
    });

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/careers/{id}/apply"),
            None,
            json!({
                "full_name": "Jane Doe",
                "email": "jane@example.com",
                "resume_key": "uploads/files/resume.pdf"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn contact_submission_sends_confirmation_email() {
    let (app, _storage, mailer) = app_with(StubRepository::default());

    let response = app
        .oneshot(json_request(
            "POST",
            "/contact",
            None,
            json!({
                "name": "Visitor",
                "email": "visitor@example.com",
                "subject": "Inquiry",
                "message": "Do you ship to Jeddah?"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // The confirmation is sent from a background task.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let sent = mailer.sent_mail();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["visitor@example.com".to_string()]);
    assert!(sent[0].html.contains("Do you ship to Jeddah?"));
}

#[tokio::test]
async fn flooded_contact_submissions_are_throttled() {
    let app = app(StubRepository {
        flooded: true,
        ..Default::default()
    });

    let response = app
        .oneshot(json_request(
            "POST",
            "/contact",
            None,
            json!({
                "name": "Visitor",
                "email": "visitor@example.com",
                "subject": "Inquiry",
                "message": "Hello again"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn presigned_upload_issues_key_and_urls() {
    let app = app(StubRepository::default());
    let payload = PresignedUploadRequest {
        filename: "resume.pdf".to_string(),
        file_type: "application/pdf".to_string(),
    };

    let response = app
        .oneshot(json_request(
            "POST",
            "/uploads/presigned",
            Some(editor_id()),
            serde_json::to_value(&payload).unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: PresignedUploadResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert!(body.resource_key.starts_with("uploads/files/"));
    assert!(body.resource_key.ends_with(".pdf"));
    assert!(body.upload_url.contains("signature=fake"));
    assert!(body.public_url.ends_with(&body.resource_key));
}

#[tokio::test]
async fn presigned_upload_rejects_unknown_mime_types() {
    let app = app(StubRepository::default());
    let response = app
        .oneshot(json_request(
            "POST",
            "/uploads/presigned",
            Some(editor_id()),
            json!({ "filename": "x.exe", "file_type": "application/x-msdownload" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn presigned_upload_sanitizes_traversal_extensions() {
    let app = app(StubRepository::default());
    let response = app
        .oneshot(json_request(
            "POST",
            "/uploads/presigned",
            Some(editor_id()),
            json!({ "filename": "../../etc/passwd", "file_type": "image/png" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: PresignedUploadResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert!(!body.resource_key.contains(".."));
    assert!(body.resource_key.starts_with("uploads/images/"));
}

#[tokio::test]
async fn uploads_require_authentication() {
    let app = app(StubRepository::default());
    let response = app
        .oneshot(json_request(
            "POST",
            "/uploads/presigned",
            None,
            json!({ "filename": "a.png", "file_type": "image/png" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_stats_reports_counts() {
    let app = app(StubRepository {
        services: vec![sample_service("one"), sample_service("two")],
        blogs: vec![sample_blog("post")],
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/stats")
                .header("x-user-id", admin_id().to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total_services"], 2);
    assert_eq!(body["total_blogs"], 1);
}
