//! The root client: owns the transport, the registry and the in-flight table.

use crate::config::ClientConfig;
use crate::endpoints::Endpoints;
use crate::error::{Error, Result};
use crate::group::Group;
use crate::id::{GroupId, UserId};
use crate::payload::{AuthenticatedUserRecord, DataEnvelope, UserRecord, UsernameMatch};
use crate::registry::Registry;
use crate::singleflight::SingleFlight;
use crate::user::User;
use futures::future::try_join_all;
use roblox_http::{Request, Response, Roblox, Transport};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Entry point to the object graph.
///
/// Every entity a `Client` hands out lives in its [`Registry`], so two
/// operations that observe the same id return the same `Arc`.
pub struct Client {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    registry: Registry,
    user_fetches: SingleFlight<UserId, Option<Arc<User>>>,
}

impl Client {
    /// Create a client over any transport, with an empty registry.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            endpoints: Endpoints::default(),
            registry: Registry::new(),
            user_fetches: SingleFlight::new(),
        }
    }

    /// Build URLs against a different base domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.endpoints = Endpoints::new(domain);
        self
    }

    /// Build the HTTP transport, log in when a cookie is configured, and load
    /// the authenticated user.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let transport = Roblox::with_timeout(config.timeout)?.with_domain(config.domain.clone());
        if let Some(cookie) = &config.cookie {
            transport.login(cookie.clone()).await?;
        }

        let client = Self::new(Arc::new(transport)).with_domain(config.domain);
        if config.cookie.is_some() {
            client.get_current_user().await?;
        }
        Ok(client)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // =========================================================================
    // Transport helpers
    // =========================================================================

    pub(crate) async fn send(&self, request: Request) -> Result<Response> {
        Ok(self.transport.send(request).await?)
    }

    /// Send and decode, treating a non-success status as a failure.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: Request, context: &str) -> Result<T> {
        let response = self.send(request).await?;
        if !response.is_success() {
            warn!(status = response.status, context, "Request failed");
            return Err(Error::upstream(response.status, context));
        }
        decode(response)
    }

    /// Send and decode, treating a non-success status as absence.
    pub(crate) async fn fetch_optional<T: DeserializeOwned>(
        &self,
        request: Request,
        context: &str,
    ) -> Result<Option<T>> {
        let response = self.send(request).await?;
        if !response.is_success() {
            warn!(status = response.status, context, "Request failed, treating as not found");
            return Ok(None);
        }
        decode(response).map(Some)
    }

    // =========================================================================
    // Groups
    // =========================================================================

    /// The canonical group for `id`. No network access.
    pub fn get_or_create_group(&self, id: GroupId) -> Arc<Group> {
        self.registry.get_or_create_group(id)
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Look up a user by id.
    ///
    /// With `allow_cache`, an already registered user is returned without a
    /// request. Otherwise the user is fetched and its record overwrites the
    /// registered instance's fields. Concurrent fetches for the same id share
    /// one request. A non-success answer is `Ok(None)`.
    pub async fn get_user(&self, id: UserId, allow_cache: bool) -> Result<Option<Arc<User>>> {
        if allow_cache {
            if let Some(user) = self.registry.user(id) {
                return Ok(Some(user));
            }
        }
        self.user_fetches.run(id, || self.fetch_user(id)).await
    }

    async fn fetch_user(&self, id: UserId) -> Result<Option<Arc<User>>> {
        let record: Option<UserRecord> = self
            .fetch_optional(Request::get(self.endpoints.user(id)), "user")
            .await?;
        Ok(record.map(|record| self.registry.store_user_record(&record)))
    }

    /// Resolve many usernames at once.
    ///
    /// Every requested name appears in the result, mapped to `None` when the
    /// API does not know it. With `allow_cache`, registered users are matched
    /// by exact username first and only the rest go over the wire.
    pub async fn get_users_by_names<S: AsRef<str>>(
        &self,
        usernames: &[S],
        exclude_banned: bool,
        allow_cache: bool,
    ) -> Result<HashMap<String, Option<Arc<User>>>> {
        let mut found: HashMap<String, Option<Arc<User>>> = HashMap::with_capacity(usernames.len());
        let mut missing: Vec<String> = Vec::new();

        for name in usernames {
            let name: &str = name.as_ref();
            if found.contains_key(name) || missing.iter().any(|m| m == name) {
                continue;
            }
            let cached = if allow_cache {
                self.registry.find_user_by_name(name)
            } else {
                None
            };
            match cached {
                Some(user) => {
                    found.insert(name.to_string(), Some(user));
                }
                None => missing.push(name.to_string()),
            }
        }

        if missing.is_empty() {
            return Ok(found);
        }

        debug!(count = missing.len(), "Looking up usernames");
        let request = Request::post(self.endpoints.usernames()).with_json(json!({
            "usernames": missing,
            "excludeBannedUsers": exclude_banned,
        }));
        let matches: DataEnvelope<UsernameMatch> = self.fetch(request, "username lookup").await?;

        let lookups = matches.data.iter().map(|entry| async move {
            let user = self.get_user(entry.id, allow_cache).await?;
            Ok::<_, Error>((entry.requested_username.as_str(), user))
        });
        let resolved = try_join_all(lookups).await?;

        // Exact echoes claim their names first; the rest are matched
        // ignoring case against names still unclaimed.
        let mut unfilled: Vec<&String> = missing.iter().collect();
        let mut inexact = Vec::new();
        for (requested, user) in resolved {
            match unfilled.iter().position(|name| name.as_str() == requested) {
                Some(position) => {
                    found.insert(unfilled.swap_remove(position).clone(), user);
                }
                None => inexact.push((requested, user)),
            }
        }
        for (requested, user) in inexact {
            match unfilled.iter().position(|name| name.eq_ignore_ascii_case(requested)) {
                Some(position) => {
                    found.insert(unfilled.swap_remove(position).clone(), user);
                }
                None => debug!(requested, "Ignoring unrequested username in lookup answer"),
            }
        }
        for name in unfilled {
            found.insert(name.clone(), None);
        }
        Ok(found)
    }

    /// Look up a single user by username.
    pub async fn get_user_by_name(&self, username: &str, allow_cache: bool) -> Result<Option<Arc<User>>> {
        let mut found = self.get_users_by_names(&[username], true, allow_cache).await?;
        Ok(found.remove(username).flatten())
    }

    // =========================================================================
    // Current user
    // =========================================================================

    /// Fetch the authenticated user. Always hits the network.
    ///
    /// The returned instance is also registered under its id, so a later
    /// [`Client::get_user`] for the same id observes it.
    pub async fn get_current_user(&self) -> Result<Arc<User>> {
        let response = self.send(Request::get(self.endpoints.authenticated_user())).await?;
        if !response.is_success() {
            warn!(status = response.status, "Authenticated user request refused");
            return Err(Error::NotLoggedIn);
        }
        let record: AuthenticatedUserRecord = decode(response)?;
        let user = self.registry.set_current_user(&record);
        info!(user_id = %record.id, username = %record.name, "Loaded current user");
        Ok(user)
    }

    /// The last user [`Client::get_current_user`] loaded. No network access.
    pub fn current_user(&self) -> Option<Arc<User>> {
        self.registry.current_user()
    }

    pub(crate) fn require_current_user(&self) -> Result<Arc<User>> {
        self.current_user().ok_or(Error::NotLoggedIn)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("domain", &self.endpoints.domain())
            .field("users", &self.registry.user_count())
            .field("groups", &self.registry.group_count())
            .finish()
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    Ok(serde_json::from_value(response.body)?)
}
