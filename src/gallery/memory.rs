use super::{GalleryStore, Site};
use crate::core::error::SitegenError;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use uuid::Uuid;

/// In-process store standing in for the database in tests.
#[derive(Default)]
pub struct MemoryGallery {
    sites: Mutex<Vec<Site>>,
}

impl MemoryGallery {
    pub fn all(&self) -> Vec<Site> {
        self.sites.lock().unwrap().clone()
    }

    pub fn accept(&self, id: Uuid) {
        if let Some(site) = self.sites.lock().unwrap().iter_mut().find(|s| s.id == id) {
            site.accepted = true;
        }
    }
}

#[async_trait]
impl GalleryStore for MemoryGallery {
    async fn list_accepted(&self) -> Result<Vec<Site>, SitegenError> {
        let mut sites: Vec<Site> = self
            .sites
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.accepted)
            .cloned()
            .collect();
        sites.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.name.cmp(&b.name)));
        Ok(sites)
    }

    async fn insert(&self, name: &str, code: &str) -> Result<Site, SitegenError> {
        let site = Site {
            id: Uuid::new_v4(),
            name: name.to_string(),
            code: code.to_string(),
            accepted: false,
            views: 0,
            created_at: Utc::now(),
        };
        self.sites.lock().unwrap().push(site.clone());
        Ok(site)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Site>, SitegenError> {
        Ok(self.sites.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn increment_views(&self, id: Uuid) -> Result<bool, SitegenError> {
        let mut sites = self.sites.lock().unwrap();
        match sites.iter_mut().find(|s| s.id == id) {
            Some(site) => {
                site.views += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
