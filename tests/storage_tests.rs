//! Storage-layer tests: the mock used by the handler tests, and offline
//! behavior of the S3 client (presigning is a local signature computation,
//! so no MinIO is needed here).

use corporate_cms::storage::{MockStorageService, S3StorageClient, StorageService, sanitize_key};
use uuid::Uuid;

mod mock_tests {
    use super::*;

    #[tokio::test]
    async fn presigned_url_embeds_sanitized_key() {
        let mock = MockStorageService::new();
        let url = mock
            .get_presigned_upload_url("uploads/images/test.png", "image/png")
            .await
            .unwrap();
        assert!(url.contains("signature=fake"));
        assert!(url.contains("uploads/images/test.png"));

        let traversal = mock
            .get_presigned_upload_url("../../etc/passwd", "text/plain")
            .await
            .unwrap();
        assert!(!traversal.contains(".."));
    }

    #[tokio::test]
    async fn failing_mock_errors_every_operation() {
        let mock = MockStorageService::new_failing();
        assert!(mock.get_presigned_upload_url("a.png", "image/png").await.is_err());
        assert!(mock.delete_object("a.png").await.is_err());
    }

    #[tokio::test]
    async fn deletions_are_recorded() {
        let mock = MockStorageService::new();
        mock.delete_object("uploads/images/a.png").await.unwrap();
        mock.delete_object("uploads/files/b.pdf").await.unwrap();
        assert_eq!(
            mock.deleted_keys(),
            vec![
                "uploads/images/a.png".to_string(),
                "uploads/files/b.pdf".to_string()
            ]
        );
    }

    #[test]
    fn url_key_round_trip() {
        let mock = MockStorageService::new();
        let key = "uploads/images/logo.png";
        let url = mock.object_url(key);
        assert_eq!(mock.key_for_url(&url).as_deref(), Some(key));
        assert_eq!(mock.key_for_url("https://elsewhere.example/x.png"), None);
    }
}

mod s3_tests {
    use super::*;

    #[tokio::test]
    async fn presigned_url_points_at_endpoint_and_key() {
        let client = S3StorageClient::new(
            "http://localhost:9000",
            "us-east-1",
            "testkey",
            "testsecret",
            "testbucket",
        )
        .await;

        let key = format!("uploads/files/report-{}.pdf", Uuid::new_v4());
        let url = client
            .get_presigned_upload_url(&key, "application/pdf")
            .await
            .unwrap();
        assert!(url.contains("localhost:9000"));
        assert!(url.contains(&key));
    }

    #[tokio::test]
    async fn object_urls_are_path_style() {
        let client = S3StorageClient::new(
            "http://localhost:9000",
            "us-east-1",
            "testkey",
            "testsecret",
            "testbucket",
        )
        .await;

        let url = client.object_url("uploads/images/x.png");
        assert_eq!(url, "http://localhost:9000/testbucket/uploads/images/x.png");
        assert_eq!(
            client.key_for_url(&url).as_deref(),
            Some("uploads/images/x.png")
        );
    }
}

#[test]
fn sanitize_strips_dot_segments() {
    assert_eq!(sanitize_key("a/b/c.png"), "a/b/c.png");
    assert_eq!(sanitize_key("../a/./b.png"), "a/b.png");
    assert_eq!(sanitize_key("//a//b"), "a/b");
}
