pub mod error;
pub mod seed;
pub mod store;
pub mod types;

pub use error::ArticleError;
pub use seed::{Seed, SeedError};
pub use store::{ArticleStore, InMemoryArticleStore};
pub use types::{Article, ArticleDetail, ArticleSummary, AuthoredArticle, NewArticle, User};
