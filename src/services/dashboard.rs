use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::dashboard::render::{self, EmptyState, TEMPLATE_MISSING_HTML};
use crate::dashboard::{Hierarchy, build_hierarchy};
use crate::store::SnapshotStore;

/// Turns the current snapshot set into dashboard HTML
pub struct DashboardService {
    store: SnapshotStore,
    template_path: PathBuf,
}

impl DashboardService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_paths(&config.storage.data_dir, &config.storage.template_path)
    }

    pub fn with_paths<P: AsRef<Path>, Q: AsRef<Path>>(data_dir: P, template_path: Q) -> Self {
        Self {
            store: SnapshotStore::new(data_dir),
            template_path: template_path.as_ref().to_path_buf(),
        }
    }

    /// Always produces a page; missing pieces become labelled states
    pub fn render_html(&self) -> String {
        info!("=== Rendering Dashboard ===");

        let template = match fs::read_to_string(&self.template_path) {
            Ok(template) => template,
            Err(e) => {
                warn!("Template {} unavailable: {}", self.template_path.display(), e);
                return TEMPLATE_MISSING_HTML.to_string();
            }
        };

        let content = match self.load_hierarchy() {
            Ok(hierarchy) => render::render_hierarchy(&hierarchy),
            Err(state) => state.markup().to_string(),
        };

        render::fill_template(&template, &content)
    }

    fn load_hierarchy(&self) -> Result<Hierarchy, EmptyState> {
        if !self.store.exists() {
            return Err(EmptyState::NoDataFolder);
        }

        let hierarchy = build_hierarchy(&self.store);
        if hierarchy.is_empty() {
            return Err(EmptyState::NoData);
        }
        Ok(hierarchy)
    }
}
