use std::sync::Arc;

use common::content::ContentStore;
use common::uploader::Uploader;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ContentStore>,
    pub uploader: Arc<Uploader>,
}
