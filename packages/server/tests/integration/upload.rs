use serde_json::Value;

use crate::common::{PNG, TestApp, TestOptions, build_zip, routes};

mod json_upload {
    use super::*;

    #[tokio::test]
    async fn space_rockets_archive_creates_category_and_entry() {
        let app = TestApp::spawn().await;
        let zip = build_zip(&[("png/01-rocket-ship.png", PNG)]);

        let res = app.upload("12-space-rockets.zip", zip).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["base_name"], "space-rockets");
        assert_eq!(res.body["category"]["name"], "Space Rockets");
        assert_eq!(res.body["category"]["slug"], "space-rockets");
        assert_eq!(res.body["created"], 1);
        assert_eq!(res.body["failed"], 0);
        assert_eq!(res.body["entries"][0]["outcome"], "created");
        assert_eq!(res.body["entries"][0]["title"], "Rocket Ship");
        assert_eq!(res.body["entries"][0]["file_name"], "01-rocket-ship");

        assert!(app.upload_path("space-rockets/png/01-rocket-ship.png").is_file());
        assert!(!app.upload_path("space-rockets.zip").exists());
    }

    #[tokio::test]
    async fn one_entry_per_png_with_upload_directory_meta() {
        let app = TestApp::spawn().await;
        let zip = build_zip(&[
            ("png/01-rocket-ship.png", PNG),
            ("png/02-moon.png", PNG),
            ("png/03-satellite-dish.png", PNG),
            ("png/readme.txt", b"not an image"),
            ("svg/01-rocket-ship.svg", b"<svg/>"),
        ]);

        let res = app.upload("12-space-rockets.zip", zip).await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["created"], 3);

        let list = app.get(routes::ENTRIES).await;
        assert_eq!(list.status, 200);
        assert_eq!(list.body["total"], 3);

        let entries = list.body["entries"].as_array().unwrap();
        let titles: Vec<_> = entries.iter().map(|e| e["title"].as_str().unwrap()).collect();
        assert_eq!(titles, vec!["Rocket Ship", "Moon", "Satellite Dish"]);
        for entry in entries {
            assert_eq!(entry["status"], "publish");
            assert_eq!(entry["content"], "");
            assert_eq!(entry["meta"]["upload_directory"], "space-rockets");
        }
    }

    #[tokio::test]
    async fn file_field_name_is_accepted() {
        let app = TestApp::spawn().await;
        let zip = build_zip(&[("png/01-star.png", PNG)]);

        let res = app
            .upload_as(routes::UPLOADS, "file", "3-night-sky.zip", zip)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["category"]["name"], "Night Sky");
    }

    #[tokio::test]
    async fn archive_with_named_root_folder_is_flattened() {
        let app = TestApp::spawn().await;
        let zip = build_zip(&[
            ("space-rockets/png/01-rocket.png", PNG),
            ("space-rockets/png/02-moon.png", PNG),
        ]);

        let res = app.upload("12-space-rockets.zip", zip).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["created"], 2);
        assert!(app.upload_path("space-rockets/png/01-rocket.png").is_file());
    }

    #[tokio::test]
    async fn reupload_reuses_existing_category() {
        let app = TestApp::spawn().await;

        let first = app
            .upload("12-space-rockets.zip", build_zip(&[("png/01-rocket.png", PNG)]))
            .await;
        let second = app
            .upload("13-space-rockets.zip", build_zip(&[("png/02-moon.png", PNG)]))
            .await;

        assert_eq!(first.status, 201);
        assert_eq!(second.status, 201);
        assert_eq!(first.body["category"]["id"], second.body["category"]["id"]);

        let categories = app.get(routes::CATEGORIES).await;
        assert_eq!(categories.body["total"], 1);
    }

    #[tokio::test]
    async fn archive_without_png_folder_creates_no_entries() {
        let app = TestApp::spawn().await;
        let zip = build_zip(&[("icons/01-rocket.png", PNG)]);

        let res = app.upload("12-space-rockets.zip", zip).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["created"], 0);
        assert_eq!(res.body["entries"], Value::Array(vec![]));
        assert_eq!(res.body["category"]["name"], "Space Rockets");
    }
}

mod rejected_uploads {
    use super::*;

    #[tokio::test]
    async fn non_zip_extension_is_rejected_without_side_effects() {
        let app = TestApp::spawn().await;

        let res = app.upload("12-space-rockets.rar", b"whatever".to_vec()).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(
            res.body["message"],
            "Invalid file type. Please upload a ZIP file."
        );

        let categories = app.get(routes::CATEGORIES).await;
        assert_eq!(categories.body["total"], 0);
        assert_eq!(std::fs::read_dir(app.upload_root()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn uppercase_extension_is_rejected() {
        let app = TestApp::spawn().await;
        let res = app.upload("12-space-rockets.ZIP", build_zip(&[])).await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn missing_file_field_is_rejected() {
        let app = TestApp::spawn().await;
        let res = app
            .upload_as(routes::UPLOADS, "attachment", "12-space-rockets.zip", build_zip(&[]))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn corrupt_archive_is_an_internal_error() {
        let app = TestApp::spawn().await;

        let res = app
            .upload("12-space-rockets.zip", b"definitely not a zip".to_vec())
            .await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "INTERNAL_ERROR");
        // The category is created before the archive is touched.
        let categories = app.get(routes::CATEGORIES).await;
        assert_eq!(categories.body["total"], 1);
    }

    #[tokio::test]
    async fn oversized_body_is_refused() {
        let app = TestApp::spawn_with(TestOptions {
            max_upload_size: Some(1024),
            ..Default::default()
        })
        .await;
        let zip = build_zip(&[("png/01-big.png", &vec![0u8; 8 * 1024])]);

        let res = app.upload("12-space-rockets.zip", zip).await;

        assert!(res.status >= 400, "unexpected status {}", res.status);
        assert_eq!(
            app.get(routes::CATEGORIES).await.body["total"],
            0
        );
    }
}

mod synonyms {
    use mockito::Matcher;

    use super::*;

    #[tokio::test]
    async fn entries_are_tagged_with_title_and_synonyms() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/words")
            .match_query(Matcher::UrlEncoded("rel_trg".into(), "Rocket".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"word":"launch","score":1},{"word":"nasa","score":1}]"#)
            .create_async()
            .await;
        server
            .mock("GET", "/words")
            .match_query(Matcher::UrlEncoded("rel_trg".into(), "Ship".into()))
            .with_status(200)
            .with_body(r#"[{"word":"space craft","score":1}]"#)
            .create_async()
            .await;

        let app = TestApp::spawn_with(TestOptions {
            synonyms_url: Some(server.url()),
            ..Default::default()
        })
        .await;

        let res = app
            .upload(
                "12-space-rockets.zip",
                build_zip(&[("png/01-rocket-ship.png", PNG)]),
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["entries"][0]["tags_added"], 4);

        let id = res.body["entries"][0]["entry_id"].as_i64().unwrap();
        let entry = app.get(&routes::entry(id)).await;
        assert_eq!(
            entry.body["tags"],
            serde_json::json!(["rocket-ship", "launch", "nasa", "space-craft"])
        );
    }

    #[tokio::test]
    async fn empty_synonym_results_leave_entries_untagged() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/words")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .expect_at_least(1)
            .create_async()
            .await;

        let app = TestApp::spawn_with(TestOptions {
            synonyms_url: Some(server.url()),
            ..Default::default()
        })
        .await;

        let res = app
            .upload(
                "12-space-rockets.zip",
                build_zip(&[("png/01-rocket.png", PNG), ("png/02-moon.png", PNG)]),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["created"], 2);
        let list = app.get(routes::ENTRIES).await;
        for entry in list.body["entries"].as_array().unwrap() {
            assert_eq!(entry["tags"], serde_json::json!([]));
        }
    }

    #[tokio::test]
    async fn failing_synonym_service_does_not_fail_the_upload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/words")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let app = TestApp::spawn_with(TestOptions {
            synonyms_url: Some(server.url()),
            ..Default::default()
        })
        .await;

        let res = app
            .upload(
                "12-space-rockets.zip",
                build_zip(&[("png/01-rocket.png", PNG)]),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["created"], 1);
        assert_eq!(res.body["entries"][0]["tags_added"], 0);
    }
}
