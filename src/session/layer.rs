use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use http::{header, request::Parts, HeaderMap, HeaderValue};
use tracing::{debug, error};
use uuid::Uuid;

use crate::error::RestError;
use crate::session::{SessionHandle, SessionStore};

pub const SESSION_COOKIE: &str = "pageview_session";

/// The current client's session, resolved by [`session_layer`].
#[derive(Clone)]
pub struct ClientSession {
    pub id: Uuid,
    pub handle: SessionHandle,
}

impl<S> FromRequestParts<S> for ClientSession
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ClientSession>()
            .cloned()
            .ok_or(RestError::MissingSession)
    }
}

/// Middleware that attaches a [`ClientSession`] to every request.
///
/// A request without a usable cookie (absent, malformed or expired) gets a
/// fresh session, and the cookie is set on the way out.
pub async fn session_layer(
    State(store): State<SessionStore>,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = match session_id_from_headers(request.headers()) {
        Some(id) => store.get(&id).await.map(|handle| (id, handle)),
        None => None,
    };

    let (session, is_new) = match existing {
        Some((id, handle)) => (ClientSession { id, handle }, false),
        None => {
            let (id, handle) = store.create().await;
            (ClientSession { id, handle }, true)
        }
    };

    let id = session.id;
    request.extensions_mut().insert(session);

    let mut response = next.run(request).await;

    if is_new {
        match HeaderValue::from_str(&session_cookie(&id)) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => error!("Failed to encode session cookie for {}: {}", id, e),
        }
    }

    response
}

fn session_cookie(id: &Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| *name == SESSION_COOKIE)
        .find_map(|(_, value)| match Uuid::parse_str(value.trim()) {
            Ok(id) => Some(id),
            Err(_) => {
                debug!("Ignoring malformed session cookie");
                None
            }
        })
}
