use crate::config::AppConfig;
use crate::tasks::store::TaskStore;
use crate::uploads::store::ImageStore;

pub struct AppState {
    pub config: AppConfig,
    pub tasks: TaskStore,
    pub images: ImageStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let images = ImageStore::new(config.uploads.dir.clone());
        Self {
            config,
            tasks: TaskStore::new(),
            images,
        }
    }
}
