use crate::common::{TestApp, routes};

fn titles(body: &serde_json::Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("list response should contain data")
        .iter()
        .map(|item| item["title"].as_str().unwrap().to_string())
        .collect()
}

mod visibility {
    use super::*;

    #[tokio::test]
    async fn anonymous_list_hides_drafts() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let thumb = app.create_image(&token, "cover.png").await;

        app.create_press(&token, "Published piece", &thumb, "published")
            .await;
        app.create_press(&token, "Draft piece", &thumb, "draft").await;

        let res = app.get_without_token(routes::PRESS).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(titles(&res.body), ["Published piece"]);
        assert_eq!(res.body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn authenticated_list_shows_everything() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let thumb = app.create_image(&token, "cover.png").await;

        app.create_press(&token, "Published piece", &thumb, "published")
            .await;
        app.create_press(&token, "Draft piece", &thumb, "draft").await;
        app.insert_legacy_press("Legacy piece", &thumb).await;

        let res = app.get_with_token(routes::PRESS, &token).await;
        assert_eq!(res.status, 200, "{}", res.text);
        let mut seen = titles(&res.body);
        seen.sort();
        assert_eq!(seen, ["Draft piece", "Legacy piece", "Published piece"]);
    }

    #[tokio::test]
    async fn items_without_status_stay_public() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let thumb = app.create_image(&token, "cover.png").await;
        let legacy = app.insert_legacy_press("Legacy piece", &thumb).await;

        let res = app.get_without_token(routes::PRESS).await;
        assert_eq!(titles(&res.body), ["Legacy piece"]);
        assert!(res.body["data"][0].get("status").is_none_or(|s| s.is_null()));

        let res = app.get_without_token(&routes::press(legacy)).await;
        assert_eq!(res.status, 200);
    }

    #[tokio::test]
    async fn hidden_item_is_not_found_for_anonymous() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let thumb = app.create_image(&token, "cover.png").await;
        let draft = app.create_press(&token, "Draft piece", &thumb, "draft").await;

        let res = app.get_without_token(&routes::press(draft)).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");

        let res = app.get_with_token(&routes::press(draft), &token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "draft");
    }

    #[tokio::test]
    async fn invalid_token_is_rejected_not_downgraded() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::PRESS, "not-a-jwt").await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn publishing_a_draft_makes_it_public() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let thumb = app.create_image(&token, "cover.png").await;
        let id = app.create_press(&token, "Soon", &thumb, "draft").await;

        let res = app
            .patch_with_token(
                &routes::press(id),
                &serde_json::json!({"status": "published"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app.get_without_token(&routes::press(id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "Soon");
    }
}

mod crud {
    use folio_common::PublicationStatus;

    use super::*;

    #[tokio::test]
    async fn create_defaults_to_draft_with_priority_one() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let thumb = app.create_image(&token, "cover.png").await;

        let res = app
            .post_with_token(
                routes::PRESS,
                &serde_json::json!({
                    "title": "  Portrait  ",
                    "publisher": "Die Zeit",
                    "thumbnail": thumb,
                    "press_type": "pdf",
                    "pdf_document": thumb,
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["title"], "Portrait");
        assert_eq!(res.body["status"], "draft");
        assert_eq!(res.body["priority"], 1);
        assert_eq!(res.body["press_type"], "pdf");
        assert_eq!(res.body["pdf_document"], thumb.as_str());
        assert!(res.body.get("video_url").is_none());
        assert_eq!(
            app.press_status(res.id()).await,
            Some(PublicationStatus::Draft)
        );
    }

    #[tokio::test]
    async fn create_requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::PRESS, &serde_json::json!({"title": "x"}))
            .await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn create_rejects_unknown_thumbnail_and_bad_video_url() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let thumb = app.create_image(&token, "cover.png").await;

        let res = app
            .post_with_token(
                routes::PRESS,
                &serde_json::json!({
                    "title": "Interview",
                    "publisher": "Arte",
                    "thumbnail": "0190f1c2-7f7e-7cc1-9d6b-1e0c7d9a2b10",
                    "press_type": "video",
                    "video_url": "https://vimeo.com/1",
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let res = app
            .post_with_token(
                routes::PRESS,
                &serde_json::json!({
                    "title": "Interview",
                    "publisher": "Arte",
                    "thumbnail": thumb,
                    "press_type": "video",
                    "video_url": "javascript:alert(1)",
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn list_orders_by_priority_then_date() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let thumb = app.create_image(&token, "cover.png").await;

        for (title, priority, date) in [
            ("Old", 1, "2020-01-01"),
            ("New", 1, "2024-01-01"),
            ("Pinned", 5, "2019-06-01"),
        ] {
            let res = app
                .post_with_token(
                    routes::PRESS,
                    &serde_json::json!({
                        "title": title,
                        "publisher": "NZZ",
                        "date": date,
                        "thumbnail": thumb,
                        "press_type": "video",
                        "video_url": "https://vimeo.com/2",
                        "priority": priority,
                        "status": "published",
                    }),
                    &token,
                )
                .await;
            assert_eq!(res.status, 201, "{}", res.text);
        }

        let res = app.get_without_token(routes::PRESS).await;
        assert_eq!(titles(&res.body), ["Pinned", "New", "Old"]);
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let thumb = app.create_image(&token, "cover.png").await;
        app.create_press(&token, "Only piece", &thumb, "published")
            .await;

        let res = app
            .get_without_token(&format!("{}?page=18446744073709551615", routes::PRESS))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert!(titles(&res.body).is_empty());
        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["pagination"]["page"], u64::MAX);
    }

    #[tokio::test]
    async fn list_uses_representative_thumbnail() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let thumb = app.create_image(&token, "cover.png").await;
        app.create_press(&token, "Piece", &thumb, "published").await;

        let res = app.get_without_token(routes::PRESS).await;
        assert_eq!(
            res.body["data"][0]["thumbnail_url"],
            format!("/media/{thumb}/cover-thumbnail.png")
        );
    }

    #[tokio::test]
    async fn update_switches_content_variant() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let thumb = app.create_image(&token, "cover.png").await;
        let id = app.create_press(&token, "Piece", &thumb, "published").await;

        let res = app
            .patch_with_token(
                &routes::press(id),
                &serde_json::json!({
                    "content": {"press_type": "pdf", "pdf_document": thumb},
                    "date": null,
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["press_type"], "pdf");
        assert!(res.body.get("video_url").is_none());
        assert!(res.body["date"].is_null());
        assert_eq!(res.body["title"], "Piece");
    }

    #[tokio::test]
    async fn delete_removes_item() {
        let app = TestApp::spawn().await;
        let token = app.token("editor");
        let thumb = app.create_image(&token, "cover.png").await;
        let id = app.create_press(&token, "Piece", &thumb, "published").await;

        let res = app.delete_with_token(&routes::press(id), &token).await;
        assert_eq!(res.status, 204);

        let res = app.get_with_token(&routes::press(id), &token).await;
        assert_eq!(res.status, 404);

        let res = app.delete_with_token(&routes::press(id), &token).await;
        assert_eq!(res.status, 404);
    }
}
