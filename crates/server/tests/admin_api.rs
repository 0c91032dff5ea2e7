use std::sync::Arc;

use navsphere_engine::MemoryStore;
use navsphere_server::{AdminServer, RunningAdminServer};
use navsphere_types::NAVIGATION_CONTENT_PATH;
use reqwest::StatusCode;
use serde_json::{Value, json};

const TOKEN: &str = "gho_test_token";

fn seeded_store() -> Arc<MemoryStore> {
    let document = json!({
        "navigationItems": [{
            "id": "dev",
            "title": "Development",
            "icon": "code",
            "items": [{ "id": "gh", "title": "GitHub", "href": "https://github.com" }],
            "subCategories": [{
                "id": "editors",
                "title": "Editors",
                "items": [
                    { "id": "vim", "title": "Vim", "href": "https://www.vim.org" },
                    { "id": "emacs", "title": "Emacs", "href": "https://www.gnu.org/software/emacs", "enabled": false },
                    { "id": "helix", "title": "Helix", "href": "https://helix-editor.com" }
                ]
            }]
        }]
    });
    Arc::new(MemoryStore::new().with_document(NAVIGATION_CONTENT_PATH, document.to_string()))
}

struct TestServer {
    running: RunningAdminServer,
    client: reqwest::Client,
}

impl TestServer {
    async fn start(store: Arc<MemoryStore>) -> Self {
        let running = AdminServer::new("127.0.0.1:0".parse().unwrap(), store)
            .start()
            .await
            .unwrap();
        Self {
            running,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.running.bound_address(), path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap_or(Value::Null))
    }

    async fn send(&self, method: reqwest::Method, path: &str, body: Option<Value>, token: Option<&str>) -> (StatusCode, Value) {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap_or(Value::Null))
    }
}

fn stored_navigation(store: &MemoryStore) -> Value {
    serde_json::from_str(&store.document(NAVIGATION_CONTENT_PATH).unwrap()).unwrap()
}

#[tokio::test]
async fn health_and_reads_need_no_token() {
    let server = TestServer::start(seeded_store()).await;

    let (status, body) = server.get("/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));

    let (status, body) = server.get("/api/navigation").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = server.get("/api/navigation/dev").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], json!("Development"));

    let (status, _) = server.get("/api/navigation/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    server.running.stop().await.unwrap();
}

#[tokio::test]
async fn writes_without_token_are_unauthorized() {
    let store = seeded_store();
    let server = TestServer::start(store.clone()).await;

    let (status, body) = server
        .send(reqwest::Method::PUT, "/api/navigation/dev", Some(json!({ "title": "x" })), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("Unauthorized"));

    let (status, _) = server
        .send(reqwest::Method::DELETE, "/api/navigation/dev", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert!(store.commits().is_empty());
}

#[tokio::test]
async fn update_merges_sub_categories_by_identity() {
    let store = seeded_store();
    let server = TestServer::start(store.clone()).await;

    let patch = json!({
        "id": "renamed",
        "title": "Dev",
        "subCategories": [
            { "id": "editors", "items": [{ "id": "zed", "title": "Zed", "href": "https://zed.dev" }] },
            { "id": "shells", "title": "Shells", "items": [] }
        ]
    });
    let (status, merged) = server
        .send(reqwest::Method::PUT, "/api/navigation/dev", Some(patch), Some(TOKEN))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(merged["id"], json!("dev"));
    assert_eq!(merged["title"], json!("Dev"));
    assert_eq!(merged["icon"], json!("code"));
    assert_eq!(merged["items"][0]["id"], json!("gh"));

    let editor_ids: Vec<_> = merged["subCategories"][0]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(editor_ids, vec!["vim", "emacs", "helix", "zed"]);
    assert_eq!(merged["subCategories"][1]["id"], json!("shells"));

    assert_eq!(stored_navigation(&store)["navigationItems"][0], merged);
    assert_eq!(store.commits()[0].message, "Update navigation item");
}

#[tokio::test]
async fn update_of_unknown_item_is_not_found() {
    let store = seeded_store();
    let server = TestServer::start(store.clone()).await;

    let (status, _) = server
        .send(reqwest::Method::PUT, "/api/navigation/missing", Some(json!({})), Some(TOKEN))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(store.commits().is_empty());
}

#[tokio::test]
async fn create_and_delete_navigation_items() {
    let store = seeded_store();
    let server = TestServer::start(store.clone()).await;

    let (status, created) = server
        .send(
            reqwest::Method::POST,
            "/api/navigation",
            Some(json!({ "id": "news", "title": "News" })),
            Some(TOKEN),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["id"], json!("news"));

    let (status, _) = server
        .send(
            reqwest::Method::POST,
            "/api/navigation",
            Some(json!({ "id": "news", "title": "News again" })),
            Some(TOKEN),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = server
        .send(reqwest::Method::DELETE, "/api/navigation/dev", None, Some(TOKEN))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (_, list) = server.get("/api/navigation").await;
    let ids: Vec<_> = list.as_array().unwrap().iter().map(|item| item["id"].clone()).collect();
    assert_eq!(ids, vec![json!("news")]);
}

#[tokio::test]
async fn category_items_lifecycle() {
    let store = seeded_store();
    let server = TestServer::start(store.clone()).await;
    let base = "/api/navigation/dev/categories/editors";

    let (status, category) = server.get(base).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(category["title"], json!("Editors"));

    let (status, disabled) = server.get(&format!("{base}/items?filter=disabled")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(disabled, json!([{ "index": 1, "id": "emacs", "title": "Emacs", "href": "https://www.gnu.org/software/emacs", "enabled": false }]));

    let (_, searched) = server.get(&format!("{base}/items?q=HELIX")).await;
    assert_eq!(searched[0]["index"], json!(2));

    let (status, category) = server
        .send(
            reqwest::Method::POST,
            &format!("{base}/items"),
            Some(json!({ "id": "zed", "title": "Zed", "href": "https://zed.dev" })),
            Some(TOKEN),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(category["items"].as_array().unwrap().len(), 4);

    let (status, category) = server
        .send(
            reqwest::Method::POST,
            &format!("{base}/items/reorder"),
            Some(json!({ "from": 3, "to": 0 })),
            Some(TOKEN),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(category["items"][0]["id"], json!("zed"));

    let (status, category) = server
        .send(
            reqwest::Method::PUT,
            &format!("{base}/items/1"),
            Some(json!({ "id": "nvim", "title": "Neovim", "href": "https://neovim.io" })),
            Some(TOKEN),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(category["items"][1]["title"], json!("Neovim"));

    let (status, category) = server
        .send(reqwest::Method::DELETE, &format!("{base}/items/2"), None, Some(TOKEN))
        .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = category["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["zed", "nvim", "helix"]);

    let (status, body) = server
        .send(reqwest::Method::DELETE, &format!("{base}/items/9"), None, Some(TOKEN))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("out of range"));

    assert_eq!(store.commits().len(), 4);
}

#[tokio::test]
async fn site_config_defaults_and_validation() {
    let store = seeded_store();
    let server = TestServer::start(store.clone()).await;

    let (status, config) = server.get("/api/site").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(config["appearance"]["theme"], json!("system"));
    assert_eq!(config["navigation"]["linkTarget"], json!("_blank"));

    let invalid = json!({
        "basic": { "title": "N", "description": "A curated set of links", "keywords": "" },
        "appearance": { "logo": "logo.png", "favicon": "/favicon.ico", "theme": "dark" },
        "navigation": { "linkTarget": "_self" }
    });
    let (status, body) = server
        .send(reqwest::Method::PUT, "/api/site", Some(invalid), Some(TOKEN))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<_> = body["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|violation| violation["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["basic.title", "appearance.logo"]);

    let valid = json!({
        "basic": { "title": "NavSphere", "description": "A curated set of links", "keywords": "links" },
        "appearance": { "logo": "/logo.png", "favicon": "/favicon.ico", "theme": "dark" },
        "navigation": { "linkTarget": "_self" }
    });
    let (status, saved) = server
        .send(reqwest::Method::PUT, "/api/site", Some(valid.clone()), Some(TOKEN))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved, valid);

    let (_, reloaded) = server.get("/api/site").await;
    assert_eq!(reloaded, valid);
    assert_eq!(store.commits().len(), 1);
}

#[tokio::test]
async fn explicit_null_clears_an_optional_field() {
    let store = seeded_store();
    let server = TestServer::start(store.clone()).await;

    let (status, merged) = server
        .send(
            reqwest::Method::PUT,
            "/api/navigation/dev",
            Some(json!({ "icon": null, "title": null })),
            Some(TOKEN),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(merged.get("icon").is_none());
    assert_eq!(merged["title"], json!("Development"));
    assert!(stored_navigation(&store)["navigationItems"][0].get("icon").is_none());
}

#[tokio::test]
async fn item_filter_is_case_insensitive_and_optional() {
    let server = TestServer::start(seeded_store()).await;
    let base = "/api/navigation/dev/categories/editors/items";

    let (status, enabled) = server.get(&format!("{base}?filter=Enabled")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = enabled.as_array().unwrap().iter().map(|item| item["id"].clone()).collect();
    assert_eq!(ids, vec![json!("vim"), json!("helix")]);

    let (status, all) = server.get(&format!("{base}?filter=")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (status, body) = server.get(&format!("{base}?filter=archived")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid item filter"));
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let store = seeded_store();
    let server = TestServer::start(store.clone()).await;

    let site = json!({
        "basic": { "title": "NavSphere", "description": "A curated set of links", "keywords": "" },
        "appearance": { "logo": "/logo.png", "favicon": "/favicon.ico", "theme": "sepia" },
        "navigation": { "linkTarget": "_blank" }
    });
    let (status, body) = server
        .send(reqwest::Method::PUT, "/api/site", Some(site), Some(TOKEN))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("theme"));

    let response = server
        .client
        .put(server.url("/api/navigation/dev"))
        .bearer_auth(TOKEN)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{\"title\":")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    let (status, body) = server
        .send(
            reqwest::Method::DELETE,
            "/api/navigation/dev/categories/editors/items/first",
            None,
            Some(TOKEN),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    assert!(store.commits().is_empty());
}
