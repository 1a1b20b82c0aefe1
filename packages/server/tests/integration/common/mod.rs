use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ::common::config::{StorageConfig, SynonymConfig};
use ::common::synonym::source_from_config;
use ::common::uploader::Uploader;
use reqwest::Client;
use serde_json::Value;
use tempfile::TempDir;

use server::config::{AppConfig, CorsConfig, DatabaseConfig, ServerConfig};
use server::database::init_db;
use server::state::AppState;
use server::store::SqlContentStore;

pub mod routes {
    pub const ADMIN_ICONS: &str = "/admin/icons";
    pub const UPLOADS: &str = "/api/v1/uploads";
    pub const CATEGORIES: &str = "/api/v1/categories";
    pub const ENTRIES: &str = "/api/v1/entries";
    pub const OPENAPI: &str = "/api-docs/openapi.json";

    pub fn entry(id: i64) -> String {
        format!("/api/v1/entries/{id}")
    }

    pub fn entries_in(category_id: i64) -> String {
        format!("/api/v1/entries?category_id={category_id}")
    }
}

/// A running test server with its own in-memory database and upload folder.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<SqlContentStore>,
    upload_dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

/// Options for [`TestApp::spawn_with`].
#[derive(Default)]
pub struct TestOptions {
    /// Base URL of a mock synonym service. Enrichment is disabled when unset.
    pub synonyms_url: Option<String>,
    /// Request body limit; defaults to 16 MiB.
    pub max_upload_size: Option<usize>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(TestOptions::default()).await
    }

    pub async fn spawn_with(options: TestOptions) -> Self {
        let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
                max_upload_size: options.max_upload_size.unwrap_or(16 * 1024 * 1024),
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
            },
            storage: StorageConfig {
                upload_root: upload_dir.path().to_path_buf(),
            },
            synonyms: SynonymConfig {
                enabled: options.synonyms_url.is_some(),
                base_url: options.synonyms_url.unwrap_or_default(),
                timeout_secs: 5,
            },
        };

        let db = init_db(&app_config.database.url)
            .await
            .expect("Failed to initialize test database");
        let store = Arc::new(SqlContentStore::new(db));
        let synonyms =
            source_from_config(&app_config.synonyms).expect("Failed to build synonym source");
        let uploader = Uploader::new(
            store.clone(),
            synonyms,
            app_config.storage.upload_root.clone(),
        );

        let state = AppState {
            config: Arc::new(app_config),
            store: store.clone(),
            uploader: Arc::new(uploader),
        };

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            store,
            upload_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn upload_root(&self) -> &Path {
        self.upload_dir.path()
    }

    pub fn upload_path(&self, relative: &str) -> PathBuf {
        self.upload_dir.path().join(relative)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// POST a multipart form carrying `file_bytes` in `field`.
    pub async fn upload_as(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        file_bytes: Vec<u8>,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(file_name.to_string())
            .mime_str("application/zip")
            .expect("Failed to set MIME type");
        let form = reqwest::multipart::Form::new().part(field.to_string(), part);

        let res = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart request");

        TestResponse::from_response(res).await
    }

    pub async fn upload(&self, file_name: &str, file_bytes: Vec<u8>) -> TestResponse {
        self.upload_as(routes::UPLOADS, "zip_file", file_name, file_bytes)
            .await
    }

    pub async fn upload_admin(&self, file_name: &str, file_bytes: Vec<u8>) -> TestResponse {
        self.upload_as(routes::ADMIN_ICONS, "zip_file", file_name, file_bytes)
            .await
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}

/// Build an in-memory ZIP archive from `(path, content)` pairs.
pub fn build_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
    let cursor = std::io::Cursor::new(Vec::new());
    let mut writer = zip::ZipWriter::new(cursor);
    let options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in files {
        writer.start_file(*name, options).expect("zip start_file");
        writer.write_all(content).expect("zip write_all");
    }
    writer.finish().expect("zip finish").into_inner()
}

pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";
