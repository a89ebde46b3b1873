use std::io;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::article::error::ArticleError;
use crate::article::store::InMemoryArticleStore;
use crate::article::types::NewArticle;

const DEMO_SEED: &str = include_str!("../../data/seed.json");

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Error reading seed file")]
    Io(#[from] io::Error),

    #[error("Error parsing seed file")]
    Json(#[from] serde_json::Error),

    #[error("Error loading seed into the article store")]
    Article(#[from] ArticleError),
}

/// Initial catalog contents: users with the articles they wrote.
#[derive(Debug, Clone, Deserialize)]
pub struct Seed {
    pub users: Vec<SeedUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub username: String,
    #[serde(default)]
    pub articles: Vec<NewArticle>,
}

impl Seed {
    pub fn demo() -> Result<Self, SeedError> {
        Self::from_json(DEMO_SEED)
    }

    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn from_file(path: &Path) -> Result<Self, SeedError> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    /// Inserts every user and article; articles get ids in file order.
    pub async fn apply(self, store: &InMemoryArticleStore) -> Result<usize, SeedError> {
        let mut count = 0;

        for seed_user in self.users {
            let user = store.create_user(&seed_user.username).await?;
            for article in seed_user.articles {
                store.create_article(user.id, article).await?;
                count += 1;
            }
        }

        info!("Seeded {} articles", count);
        Ok(count)
    }
}
