//! Shared session: transport, credentials and persistent headers

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use reqwest::header::ACCEPT;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;

use crate::error::ApiError;
use crate::transport::Auth;
use crate::transport::HttpRequest;
use crate::transport::HttpResponse;
use crate::transport::Transport;

/// A handle shared by every request context created from one client.
///
/// Cloning is cheap and clones share state. Persistent headers are merged
/// into every request; [`update_headers`](Session::update_headers) changes
/// them for all holders of the session, including requests created earlier.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    transport: Arc<dyn Transport>,
    auth: Auth,
    headers: Mutex<HeaderMap>,
}

impl Session {
    /// Creates a session that sends through `transport`.
    pub fn new<T: Transport + 'static>(transport: T, auth: Auth) -> Self {
        Self::from_shared(Arc::new(transport), auth)
    }

    /// Creates a session around an already shared transport.
    pub fn from_shared(transport: Arc<dyn Transport>, auth: Auth) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Self {
            inner: Arc::new(SessionInner {
                transport,
                auth,
                headers: Mutex::new(headers),
            }),
        }
    }

    /// Returns the credentials attached to every request.
    pub fn auth(&self) -> &Auth {
        &self.inner.auth
    }

    /// Returns a copy of the persistent headers.
    pub fn headers(&self) -> HeaderMap {
        self.lock_headers().clone()
    }

    /// Adds or overrides persistent headers.
    pub fn update_headers(&self, headers: HeaderMap) {
        let mut current = self.lock_headers();
        for (name, value) in headers {
            if let Some(name) = name {
                current.insert(name, value);
            }
        }
    }

    pub(crate) async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.inner.transport.send(request).await
    }

    fn lock_headers(&self) -> MutexGuard<'_, HeaderMap> {
        self.inner
            .headers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("auth", &self.inner.auth)
            .field("headers", &*self.lock_headers())
            .finish_non_exhaustive()
    }
}
