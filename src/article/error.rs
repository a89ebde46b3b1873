use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArticleError {
    #[error("Article not found")]
    NotFound(u64),

    #[error("No user with id {0}")]
    UnknownUser(u64),

    #[error("Username {0:?} is already taken")]
    DuplicateUser(String),
}
