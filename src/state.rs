use crate::bookmarks::repo::{BookmarkRepo, PgBookmarkRepo};
use crate::config::AppConfig;
use crate::db;
use crate::users::repo::{PgUserRepo, UserRepo};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub bookmarks: Arc<dyn BookmarkRepo>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let pool = db::connect(&config).await?;
        db::migrate(&pool).await;

        let users = Arc::new(PgUserRepo::new(pool.clone())) as Arc<dyn UserRepo>;
        let bookmarks = Arc::new(PgBookmarkRepo::new(pool)) as Arc<dyn BookmarkRepo>;

        Ok(Self::from_parts(config, users, bookmarks))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        bookmarks: Arc<dyn BookmarkRepo>,
    ) -> Self {
        Self {
            config,
            users,
            bookmarks,
        }
    }

    /// State backed by in-memory repositories.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::testing::{test_config, MemoryBookmarkRepo, MemoryUserRepo};

        Self::from_parts(
            Arc::new(test_config()),
            Arc::new(MemoryUserRepo::default()),
            Arc::new(MemoryBookmarkRepo::default()),
        )
    }
}
