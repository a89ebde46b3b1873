use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::article::error::ArticleError;
use crate::article::types::{Article, AuthoredArticle, NewArticle, User};

/// Read side of the catalog, as seen by the HTTP handlers.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// All articles, newest (highest id) first.
    async fn list(&self) -> Result<Vec<AuthoredArticle>, ArticleError>;

    async fn get(&self, id: u64) -> Result<AuthoredArticle, ArticleError>;
}

#[derive(Debug, Default)]
struct Catalog {
    users: BTreeMap<u64, User>,
    articles: BTreeMap<u64, Article>,
    next_user_id: u64,
    next_article_id: u64,
}

impl Catalog {
    fn authored(&self, article: &Article) -> Result<AuthoredArticle, ArticleError> {
        let author = self
            .users
            .get(&article.user_id)
            .ok_or(ArticleError::UnknownUser(article.user_id))?;

        Ok(AuthoredArticle {
            article: article.clone(),
            author: author.clone(),
        })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryArticleStore {
    catalog: RwLock<Catalog>,
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create_user(&self, username: &str) -> Result<User, ArticleError> {
        let mut catalog = self.catalog.write().await;

        if catalog.users.values().any(|user| user.username == username) {
            return Err(ArticleError::DuplicateUser(username.to_string()));
        }

        catalog.next_user_id += 1;
        let user = User {
            id: catalog.next_user_id,
            username: username.to_string(),
        };
        catalog.users.insert(user.id, user.clone());

        debug!("Created user {} ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn create_article(
        &self,
        user_id: u64,
        new: NewArticle,
    ) -> Result<Article, ArticleError> {
        let mut catalog = self.catalog.write().await;

        if !catalog.users.contains_key(&user_id) {
            return Err(ArticleError::UnknownUser(user_id));
        }

        catalog.next_article_id += 1;
        let article = Article {
            id: catalog.next_article_id,
            user_id,
            title: new.title,
            content: new.content,
            minutes_to_read: new.minutes_to_read,
        };
        catalog.articles.insert(article.id, article.clone());

        info!("Created article {} {:?}", article.id, article.title);
        Ok(article)
    }

    pub async fn len(&self) -> usize {
        self.catalog.read().await.articles.len()
    }
}

#[async_trait]
impl ArticleStore for InMemoryArticleStore {
    async fn list(&self) -> Result<Vec<AuthoredArticle>, ArticleError> {
        let catalog = self.catalog.read().await;

        catalog
            .articles
            .values()
            .rev()
            .map(|article| catalog.authored(article))
            .collect()
    }

    async fn get(&self, id: u64) -> Result<AuthoredArticle, ArticleError> {
        let catalog = self.catalog.read().await;
        let article = catalog.articles.get(&id).ok_or(ArticleError::NotFound(id))?;

        catalog.authored(article)
    }
}
