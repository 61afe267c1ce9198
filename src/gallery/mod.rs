use crate::core::error::SitegenError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[cfg(test)]
pub mod memory;
pub mod sqlite;

/// A published website. `accepted` is flipped by moderation outside this
/// program; only accepted sites are listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub accepted: bool,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

/// Persistent collection of submitted sites.
#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// Accepted sites, most viewed first.
    async fn list_accepted(&self) -> Result<Vec<Site>, SitegenError>;

    /// Stores a new pending site.
    async fn insert(&self, name: &str, code: &str) -> Result<Site, SitegenError>;

    async fn get(&self, id: Uuid) -> Result<Option<Site>, SitegenError>;

    /// Bumps the view counter; `false` when no site has that id.
    async fn increment_views(&self, id: Uuid) -> Result<bool, SitegenError>;
}

/// Gallery operations used by the front-ends, with the accepted listing
/// served from a short-lived cache.
#[derive(Clone)]
pub struct Gallery {
    store: Arc<dyn GalleryStore>,
    listing: Cache<(), Arc<Vec<Site>>>,
}

impl Gallery {
    pub fn new(store: Arc<dyn GalleryStore>, listing_ttl: Duration) -> Self {
        Self {
            store,
            listing: Cache::builder()
                .max_capacity(1)
                .time_to_live(listing_ttl)
                .build(),
        }
    }

    pub async fn list_accepted(&self) -> Result<Arc<Vec<Site>>, SitegenError> {
        if let Some(sites) = self.listing.get(&()) {
            return Ok(sites);
        }

        let sites = Arc::new(self.store.list_accepted().await?);
        tracing::debug!(count = sites.len(), "loaded accepted sites");
        self.listing.insert((), sites.clone());
        Ok(sites)
    }

    /// Queues a site for review. Blank names are rejected before anything is
    /// written; duplicate names are fine.
    pub async fn submit(&self, name: &str, code: &str) -> Result<Site, SitegenError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SitegenError::Submission(
                "You need to add a name".to_string(),
            ));
        }

        let site = self.store.insert(name, code).await?;
        tracing::info!(id = %site.id, name = %site.name, "site submitted for review");
        Ok(site)
    }

    pub async fn record_view(&self, id: Uuid) -> Result<(), SitegenError> {
        if !self.store.increment_views(id).await? {
            tracing::warn!(%id, "view recorded for unknown site");
        }
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Site>, SitegenError> {
        self.store.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryGallery;
    use super::*;

    fn gallery() -> (Arc<MemoryGallery>, Gallery) {
        let store = Arc::new(MemoryGallery::default());
        let gallery = Gallery::new(store.clone(), Duration::from_secs(600));
        (store, gallery)
    }

    #[tokio::test]
    async fn blank_names_are_rejected_without_writing() {
        let (store, gallery) = gallery();

        for name in ["", "   "] {
            let err = gallery.submit(name, "<p>x</p>").await.unwrap_err();
            assert!(matches!(err, SitegenError::Submission(_)));
        }
        assert!(store.all().is_empty());
    }

    #[tokio::test]
    async fn submission_is_pending_with_zero_views() {
        let (store, gallery) = gallery();

        let site = gallery.submit("My Site", "<p>hello</p>").await.unwrap();

        assert_eq!(site.name, "My Site");
        assert_eq!(site.code, "<p>hello</p>");
        assert!(!site.accepted);
        assert_eq!(site.views, 0);
        assert_eq!(store.all(), vec![site]);
    }

    #[tokio::test]
    async fn duplicate_names_create_separate_records() {
        let (store, gallery) = gallery();
        let a = gallery.submit("Twin", "<p>a</p>").await.unwrap();
        let b = gallery.submit("Twin", "<p>b</p>").await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.all().len(), 2);
    }

    #[tokio::test]
    async fn two_views_add_two() {
        let (_store, gallery) = gallery();
        let site = gallery.submit("Counter", "<p>1</p>").await.unwrap();

        gallery.record_view(site.id).await.unwrap();
        gallery.record_view(site.id).await.unwrap();

        let stored = gallery.get(site.id).await.unwrap().unwrap();
        assert_eq!(stored.views, 2);
    }

    #[tokio::test]
    async fn unknown_view_is_ignored() {
        let (_store, gallery) = gallery();
        gallery.record_view(Uuid::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn listing_shows_only_accepted_and_is_cached() {
        let (store, gallery) = gallery();
        let pending = gallery.submit("Pending", "<p>p</p>").await.unwrap();
        let approved = gallery.submit("Approved", "<p>a</p>").await.unwrap();
        store.accept(approved.id);

        let listed = gallery.list_accepted().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Approved");

        store.accept(pending.id);
        assert_eq!(gallery.list_accepted().await.unwrap().len(), 1);

        let fresh = Gallery::new(store.clone(), Duration::from_secs(600));
        assert_eq!(fresh.list_accepted().await.unwrap().len(), 2);
    }
}
