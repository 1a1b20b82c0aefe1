use ::common::content::{ContentStore, EntryStatus, NewEntry};

use crate::common::{PNG, TestApp, build_zip, routes};

#[tokio::test]
async fn categories_start_empty() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::CATEGORIES).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["total"], 0);
    assert_eq!(res.body["categories"], serde_json::json!([]));
}

#[tokio::test]
async fn entries_can_be_filtered_by_category() {
    let app = TestApp::spawn().await;
    app.upload(
        "1-space-rockets.zip",
        build_zip(&[("png/01-rocket.png", PNG), ("png/02-moon.png", PNG)]),
    )
    .await;
    let animals = app
        .upload("2-farm-animals.zip", build_zip(&[("png/01-cow.png", PNG)]))
        .await;
    let animals_id = animals.body["category"]["id"].as_i64().unwrap();

    let all = app.get(routes::ENTRIES).await;
    assert_eq!(all.body["total"], 3);

    let filtered = app.get(&routes::entries_in(animals_id)).await;
    assert_eq!(filtered.status, 200);
    assert_eq!(filtered.body["total"], 1);
    assert_eq!(filtered.body["entries"][0]["title"], "Cow");
    assert_eq!(
        filtered.body["entries"][0]["meta"]["upload_directory"],
        "farm-animals"
    );
}

#[tokio::test]
async fn get_entry_returns_meta_and_tags() {
    let app = TestApp::spawn().await;
    let category = app.store.ensure_category("Space Rockets").await.unwrap();
    let id = app
        .store
        .create_entry(NewEntry {
            title: "Rocket Ship".into(),
            content: String::new(),
            status: EntryStatus::Publish,
            category_id: category.id,
            meta: vec![("file_name".into(), "01-rocket-ship".into())],
        })
        .await
        .unwrap();
    app.store
        .add_tags(id, &["rocket-ship".into(), "launch".into()])
        .await
        .unwrap();

    let res = app.get(&routes::entry(id)).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["title"], "Rocket Ship");
    assert_eq!(res.body["category_id"], category.id);
    assert_eq!(res.body["meta"]["file_name"], "01-rocket-ship");
    assert_eq!(res.body["tags"], serde_json::json!(["rocket-ship", "launch"]));
}

#[tokio::test]
async fn unknown_entry_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::entry(404)).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn openapi_document_lists_endpoints() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::OPENAPI).await;

    assert_eq!(res.status, 200);
    let paths: Vec<&String> = res.body["paths"].as_object().unwrap().keys().collect();
    assert!(paths.iter().any(|p| p.starts_with("/api/v1/uploads")));
    assert!(paths.iter().any(|p| p.starts_with("/api/v1/categories")));
    assert!(paths.iter().any(|p| p.as_str() == "/api/v1/entries/{id}"));
}
