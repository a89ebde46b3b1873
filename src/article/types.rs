use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub content: String,
    pub minutes_to_read: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub minutes_to_read: u32,
}

/// An article joined with its author, as returned by store queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoredArticle {
    pub article: Article,
    pub author: User,
}

/// Listing entry: content is replaced by a short preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleSummary {
    pub id: u64,
    pub title: String,
    pub minutes_to_read: u32,
    pub author: String,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleDetail {
    pub id: u64,
    pub title: String,
    pub minutes_to_read: u32,
    pub author: String,
    pub content: String,
}

impl Article {
    /// The second line of the content, or an empty string for one-line content.
    pub fn preview(&self) -> &str {
        self.content.split('\n').nth(1).unwrap_or_default()
    }
}

impl From<&AuthoredArticle> for ArticleSummary {
    fn from(entry: &AuthoredArticle) -> Self {
        Self {
            id: entry.article.id,
            title: entry.article.title.clone(),
            minutes_to_read: entry.article.minutes_to_read,
            author: entry.author.username.clone(),
            preview: entry.article.preview().to_string(),
        }
    }
}

impl From<AuthoredArticle> for ArticleDetail {
    fn from(entry: AuthoredArticle) -> Self {
        Self {
            id: entry.article.id,
            title: entry.article.title,
            minutes_to_read: entry.article.minutes_to_read,
            author: entry.author.username,
            content: entry.article.content,
        }
    }
}
