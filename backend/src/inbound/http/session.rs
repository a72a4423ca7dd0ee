//! Request-scoped access to the authenticated principal.
//!
//! The session cookie only stores the user id. Handlers receive a
//! [`SessionContext`] and ask it for a verified principal; nothing outside
//! the request holds session state.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Extractor wrapping the actix session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the principal after signup or signin. Renews the session key
    /// to prevent fixation.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop all session state.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// Principal id if a valid one is present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| match UserId::new(&raw) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                None
            }
        }))
    }

    /// The principal, or `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("Unauthorized, please sign in"))
    }

    /// The principal, which must be `claimed`; `403 Forbidden` otherwise.
    pub fn require_principal(&self, claimed: &UserId) -> Result<UserId, Error> {
        let principal = self.require_user_id()?;
        if &principal == claimed {
            Ok(principal)
        } else {
            Err(Error::forbidden("Cannot access another user's history"))
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(Self::new) })
    }
}
