use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::cart::Cart;
use crate::error::CafeError;

/// Everything one logged-in customer accumulates between requests.
#[derive(Debug)]
pub struct Session {
    pub customer_id: i32,
    pub cart: Cart,
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// The session a request belongs to, inserted by [`session_middleware`].
#[derive(Clone, Debug)]
pub struct CurrentSession {
    pub token: Uuid,
    pub handle: SessionHandle,
}

/// In-process registry of open sessions. Carts are never written to the
/// store, so they vanish with the session or the process.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, customer_id: i32) -> Uuid {
        let token = Uuid::new_v4();
        let session = Session {
            customer_id,
            cart: Cart::new(),
        };
        self.sessions
            .write()
            .await
            .insert(token, Arc::new(Mutex::new(session)));
        token
    }

    pub async fn get(&self, token: &Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(token).cloned()
    }

    pub async fn close(&self, token: &Uuid) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

pub async fn session_middleware(
    State(store): State<SessionStore>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .and_then(|t| Uuid::parse_str(t.trim()).ok());

    let Some(token) = token else {
        return CafeError::NoSession.into_response();
    };

    match store.get(&token).await {
        Some(handle) => {
            req.extensions_mut()
                .insert(CurrentSession { token, handle });
            next.run(req).await
        }
        None => CafeError::NoSession.into_response(),
    }
}
