use std::sync::Arc;

use crate::{error::Result, service::MovieService};
use movies_dal::MovieStore;
use url::Url;

#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(app_config: AppConfig, store: MovieStore) -> Self {
        AppState {
            state: Arc::new(AppStateInner {
                movies: MovieService::new(store),
                app_config,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.app_config
    }

    pub fn build_url(&self, relative_url: &str) -> Result<Url> {
        let base = &self.config().base_url;
        let url = base.join(relative_url)?;
        Ok(url)
    }

    pub fn movies(&self) -> &MovieService {
        &self.state.movies
    }
}

struct AppStateInner {
    movies: MovieService,
    app_config: AppConfig,
}

pub struct AppConfig {
    /// Public URL of the server, absolute links (like `Location` header) are built from it
    pub base_url: Url,
}
