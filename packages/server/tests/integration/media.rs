use std::sync::Arc;

use crate::common::{RejectingStore, TestApp, png_bytes, routes};

mod upload {
    use super::*;

    #[tokio::test]
    async fn image_upload_produces_reference_derivatives() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");

        let res = app
            .upload_with_token("Stage Photo.png", png_bytes(2000, 1500), "image/png", &token)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let id = res.body["id"].as_str().unwrap();
        assert_eq!(res.body["filename"], "Stage-Photo.png");
        assert_eq!(res.body["width"], 2000);
        assert_eq!(res.body["height"], 1500);
        assert_eq!(res.body["failed_derivatives"], serde_json::json!([]));

        let derivatives = &res.body["derivatives"];
        assert_eq!(derivatives["thumbnail"]["width"], 400);
        assert_eq!(derivatives["thumbnail"]["height"], 300);
        assert_eq!(derivatives["card"]["width"], 768);
        assert_eq!(derivatives["card"]["height"], 1024);
        assert_eq!(derivatives["tablet"]["width"], 1024);
        assert_eq!(derivatives["tablet"]["height"], 768);
        assert_eq!(
            derivatives["tablet"]["filename"],
            "Stage-Photo-tablet.png"
        );
        assert_eq!(
            res.body["thumbnail_url"],
            format!("/media/{id}/Stage-Photo-thumbnail.png")
        );

        let stored = app.media_dir.path().join("media").join(id);
        assert!(stored.join("Stage-Photo.png").exists());
        assert!(stored.join("Stage-Photo-card.png").exists());
    }

    #[tokio::test]
    async fn derivative_that_cannot_be_stored_is_reported_failed() {
        let app = TestApp::spawn_with_assets(|inner| {
            Arc::new(RejectingStore {
                inner,
                suffix: "-card.png",
            })
        })
        .await;
        let token = app.token("editor");

        let res = app
            .upload_with_token("stage.png", png_bytes(2000, 1500), "image/png", &token)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["failed_derivatives"], serde_json::json!(["card"]));
        let mut names: Vec<_> = res.body["derivatives"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        names.sort();
        assert_eq!(names, ["tablet", "thumbnail"]);

        let id = res.body["id"].as_str().unwrap();
        let stored = app.media_dir.path().join("media").join(id);
        assert!(stored.join("stage.png").exists());
        assert!(!stored.join("stage-card.png").exists());
    }

    #[tokio::test]
    async fn non_image_upload_has_no_derivatives() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");

        let res = app
            .upload_with_token(
                "review.pdf",
                b"%PDF-1.7\n%fake".to_vec(),
                "application/pdf",
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["mime_type"], "application/pdf");
        assert_eq!(res.body["derivatives"], serde_json::json!({}));
        assert_eq!(res.body["failed_derivatives"], serde_json::json!([]));
        assert!(res.body["thumbnail_url"].is_null());
        assert!(res.body["width"].is_null());
    }

    #[tokio::test]
    async fn corrupt_image_is_stored_with_every_derivative_failed() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");

        let res = app
            .upload_with_token(
                "broken.png",
                b"\x89PNG\r\n\x1a\nnot really".to_vec(),
                "image/png",
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(
            res.body["failed_derivatives"],
            serde_json::json!(["thumbnail", "card", "tablet"])
        );
        assert_eq!(res.body["derivatives"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn upload_requires_authentication() {
        let app = TestApp::spawn().await;
        let part = reqwest::multipart::Part::bytes(png_bytes(10, 10)).file_name("x.png");
        let form = reqwest::multipart::Form::new().part("file", part);

        let res = app
            .client
            .post(app.url(routes::MEDIA))
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 401);
    }

    #[tokio::test]
    async fn upload_without_file_field_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let form = reqwest::multipart::Form::new().text("alt", "nothing here");

        let res = app
            .client
            .post(app.url(routes::MEDIA))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn hidden_filenames_are_rejected() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");

        let res = app
            .upload_with_token(".htaccess", b"deny".to_vec(), "text/plain", &token)
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod serving {
    use super::*;

    #[tokio::test]
    async fn derivatives_are_served_by_stable_name() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let id = app.create_image(&token, "cover.png").await;

        let res = app
            .client
            .get(app.url(&format!("/media/{id}/cover-thumbnail.png")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(res.headers()["content-type"], "image/png");
        assert_eq!(res.headers()["x-content-type-options"], "nosniff");
        assert!(
            res.headers()["content-disposition"]
                .to_str()
                .unwrap()
                .starts_with("inline;")
        );
        let etag = res.headers()["etag"].to_str().unwrap().to_string();
        assert!(etag.starts_with('"') && etag.ends_with('"'));

        let bytes = res.bytes().await.unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (400, 300));

        let res = app
            .client
            .get(app.url(&format!("/media/{id}/cover-thumbnail.png")))
            .header("If-None-Match", &etag)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 304);
    }

    #[tokio::test]
    async fn original_is_served_too() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let original = png_bytes(64, 48);
        let res = app
            .upload_with_token("small.png", original.clone(), "image/png", &token)
            .await;
        let id = res.body["id"].as_str().unwrap();

        let res = app
            .client
            .get(app.url(&format!("/media/{id}/small.png")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(res.bytes().await.unwrap().as_ref(), original.as_slice());
    }

    #[tokio::test]
    async fn non_image_originals_are_served_as_downloads() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let res = app
            .upload_with_token(
                "page.html",
                b"<script>alert(1)</script>".to_vec(),
                "text/html",
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        let id = res.body["id"].as_str().unwrap();

        let res = app
            .client
            .get(app.url(&format!("/media/{id}/page.html")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(res.headers()["x-content-type-options"], "nosniff");
        assert_eq!(
            res.headers()["content-disposition"],
            "attachment; filename=\"page.html\""
        );
    }

    #[tokio::test]
    async fn pdf_originals_render_inline() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let res = app
            .upload_with_token(
                "review.pdf",
                b"%PDF-1.7\n%fake".to_vec(),
                "application/pdf",
                &token,
            )
            .await;
        let id = res.body["id"].as_str().unwrap();

        let res = app
            .client
            .get(app.url(&format!("/media/{id}/review.pdf")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(res.headers()["content-type"], "application/pdf");
        assert_eq!(
            res.headers()["content-disposition"],
            "inline; filename=\"review.pdf\""
        );
    }

    #[tokio::test]
    async fn unknown_files_are_not_found() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let id = app.create_image(&token, "cover.png").await;

        let res = app.get_without_token(&format!("/media/{id}/cover-hero.png")).await;
        assert_eq!(res.status, 404);

        let res = app
            .get_without_token("/media/0190f1c2-7f7e-7cc1-9d6b-1e0c7d9a2b10/cover.png")
            .await;
        assert_eq!(res.status, 404);
    }
}

mod library {
    use super::*;

    #[tokio::test]
    async fn list_and_get_are_public() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let id = app.create_image(&token, "cover.png").await;

        let res = app.get_without_token(routes::MEDIA).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["data"][0]["id"], id.as_str());
        assert_eq!(
            res.body["data"][0]["derivatives"]
                .as_object()
                .unwrap()
                .len(),
            3
        );

        let res = app.get_without_token(&routes::media(&id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["url"], format!("/media/{id}/cover.png"));
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        app.create_image(&token, "cover.png").await;

        let res = app
            .get_without_token(&format!("{}?page=18446744073709551615", routes::MEDIA))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"], serde_json::json!([]));
        assert_eq!(res.body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn delete_removes_rows_and_files() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let id = app.create_image(&token, "cover.png").await;

        let res = app.delete_with_token(&routes::media(&id), &token).await;
        assert_eq!(res.status, 204, "{}", res.text);

        let res = app.get_without_token(&routes::media(&id)).await;
        assert_eq!(res.status, 404);
        assert!(!app.media_dir.path().join("media").join(&id).exists());
    }

    #[tokio::test]
    async fn referenced_media_cannot_be_deleted() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let id = app.create_image(&token, "cover.png").await;
        app.create_press(&token, "Piece", &id, "draft").await;

        let res = app.delete_with_token(&routes::media(&id), &token).await;
        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }
}
