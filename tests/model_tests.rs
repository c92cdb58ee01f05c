//! Serialization-shape checks for the API models.

use chrono::Utc;
use corporate_cms::models::{
    BlogPost, ImageAsset, ListMeta, Salary, Seo, Service, UpdateBlogRequest, UpdateCareerRequest,
};

#[test]
fn seo_round_trips_camel_case_keys() {
    let json = serde_json::json!({
        "metaTitle": "Home",
        "metaDescription": "Welcome",
        "metaKeywords": ["medical", "supplies"],
        "ogImage": "/og.jpg"
    });
    let seo: Seo = serde_json::from_value(json).unwrap();
    assert_eq!(seo.meta_title.as_deref(), Some("Home"));
    assert_eq!(seo.meta_keywords.as_ref().unwrap().len(), 2);

    let out = serde_json::to_value(&seo).unwrap();
    assert!(out.get("metaTitle").is_some());
    assert!(out.get("meta_title").is_none());
    // Unset fields are omitted, not nulled.
    assert!(out.get("canonicalUrl").is_none());
}

#[test]
fn image_asset_document_shape() {
    let asset = ImageAsset {
        url: "http://cdn/x.jpg".to_string(),
        alt: "X".to_string(),
        size: 100,
        mime_type: "image/jpeg".to_string(),
        uploaded_at: Some(Utc::now()),
    };
    let out = serde_json::to_value(&asset).unwrap();
    assert!(out.get("mimeType").is_some());
    assert!(out.get("uploadedAt").is_some());
}

#[test]
fn service_serializes_with_snake_case_api_fields() {
    let service = Service {
        title: "Imaging".to_string(),
        featured_image: Some("http://cdn/i.jpg".to_string()),
        ..Default::default()
    };
    let out = serde_json::to_value(&service).unwrap();
    assert!(out.get("featured_image").is_some());
    assert!(out.get("display_order").is_some());
}

#[test]
fn blog_post_salary_json_columns_deserialize() {
    // jsonb-backed fields accept full documents on input payloads.
    let salary: Salary = serde_json::from_value(serde_json::json!({
        "min": 10000,
        "max": 15000,
        "currency": "SAR",
        "period": "month"
    }))
    .unwrap();
    assert_eq!(salary.min, Some(10000));
    // Serde defaults cover the metadata flags.
    assert!(salary.is_visible);
    assert!(!salary.is_negotiable);

    let post: BlogPost = serde_json::from_value(serde_json::json!({
        "id": uuid::Uuid::new_v4(),
        "language": "en",
        "title": "T",
        "subtitle": null,
        "excerpt": null,
        "thumbnail": null,
        "featured_image": null,
        "content": { "blocks": [] },
        "status": "draft",
        "published_at": null,
        "tags": [],
        "reading_time": 5,
        "slug": "t",
        "seo": null,
        "is_active": true,
        "views": 0,
        "created_at": Utc::now(),
        "updated_at": Utc::now()
    }))
    .unwrap();
    assert!(post.content.is_some());
}

#[test]
fn partial_updates_skip_unset_fields() {
    let blog_patch = UpdateBlogRequest {
        status: Some("published".to_string()),
        ..Default::default()
    };
    let out = serde_json::to_string(&blog_patch).unwrap();
    assert!(out.contains("published"));
    assert!(!out.contains("excerpt"));
    assert!(!out.contains("tags"));

    let career_patch = UpdateCareerRequest {
        location: Some("Jeddah".to_string()),
        ..Default::default()
    };
    let out = serde_json::to_string(&career_patch).unwrap();
    assert!(out.contains("Jeddah"));
    assert!(!out.contains("department"));
}

#[test]
fn list_meta_clamps_to_sane_pages() {
    let empty = ListMeta::new(1, 10, 0);
    assert_eq!(empty.total_pages, 0);
    assert!(!empty.has_next);
    assert!(!empty.has_previous);

    let exact = ListMeta::new(3, 10, 30);
    assert_eq!(exact.total_pages, 3);
    assert!(!exact.has_next);
    assert!(exact.has_previous);
}
