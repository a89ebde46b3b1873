pub mod api;
pub mod article;
pub mod config;
pub mod error;
pub mod quota;
pub mod session;

pub use api::{router, AppState};
pub use config::Config;
pub use error::RestError;
pub use quota::{Decision, PageviewQuota, QuotaExceeded};
pub use session::{SessionState, SessionStore};
