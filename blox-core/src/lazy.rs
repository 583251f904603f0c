//! References that start as a payload stub and resolve to a registry entity.

use crate::error::Result;
use std::future::Future;
use std::sync::Arc;

/// A reference that is either still the raw stub from the originating
/// payload or the canonical entity it resolved to.
///
/// Resolution is one-way: once `Resolved`, a reference never returns to `Unresolved`.
#[derive(Debug)]
pub enum Lazy<S, T> {
    Unresolved(S),
    Resolved(Arc<T>),
}

impl<S: Clone, T> Clone for Lazy<S, T> {
    fn clone(&self) -> Self {
        match self {
            Lazy::Unresolved(stub) => Lazy::Unresolved(stub.clone()),
            Lazy::Resolved(entity) => Lazy::Resolved(Arc::clone(entity)),
        }
    }
}

impl<S, T> Lazy<S, T> {
    pub fn unresolved(stub: S) -> Self {
        Lazy::Unresolved(stub)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Lazy::Resolved(_))
    }

    pub fn stub(&self) -> Option<&S> {
        match self {
            Lazy::Unresolved(stub) => Some(stub),
            Lazy::Resolved(_) => None,
        }
    }

    pub fn resolved(&self) -> Option<&Arc<T>> {
        match self {
            Lazy::Unresolved(_) => None,
            Lazy::Resolved(entity) => Some(entity),
        }
    }

    /// Resolve the stub with `resolve`, or return the entity if already resolved.
    ///
    /// On error the stub is left in place.
    pub async fn resolve_with<F, Fut>(&mut self, resolve: F) -> Result<Arc<T>>
    where
        F: FnOnce(&S) -> Fut,
        Fut: Future<Output = Result<Arc<T>>>,
    {
        let entity = match self {
            Lazy::Resolved(entity) => return Ok(Arc::clone(entity)),
            Lazy::Unresolved(stub) => resolve(stub).await?,
        };
        *self = Lazy::Resolved(Arc::clone(&entity));
        Ok(entity)
    }
}
