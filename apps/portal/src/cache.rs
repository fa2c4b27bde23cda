//! Client-side query cache.
//!
//! Convention: mutate through a request, then invalidate the matching key.
//! Mutation results are never written into the cache; the next read refetches.

#![allow(dead_code)]

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::api_client::{AuthToken, PortalApi};
use crate::errors::PortalError;
use crate::models::{ContentUnit, UnitKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Units(UnitKind),
    Unit(UnitKind, String),
}

impl QueryKey {
    fn kind(&self) -> UnitKind {
        match self {
            QueryKey::Units(kind) | QueryKey::Unit(kind, _) => *kind,
        }
    }
}

#[derive(Debug, Clone)]
enum Cached {
    Units(Vec<ContentUnit>),
    Unit(ContentUnit),
}

#[derive(Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<QueryKey, Cached>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// All units of a kind, sorted by `order`.
    pub async fn units(
        &self,
        api: &dyn PortalApi,
        token: &AuthToken,
        kind: UnitKind,
    ) -> Result<Vec<ContentUnit>, PortalError> {
        let key = QueryKey::Units(kind);
        if let Some(Cached::Units(units)) = self.entries.read().await.get(&key) {
            return Ok(units.clone());
        }

        let mut units = api.list_units(token, kind).await?.data;
        units.sort_by_key(|u| u.order);
        self.entries
            .write()
            .await
            .insert(key, Cached::Units(units.clone()));
        Ok(units)
    }

    pub async fn unit(
        &self,
        api: &dyn PortalApi,
        token: &AuthToken,
        kind: UnitKind,
        id: &str,
    ) -> Result<ContentUnit, PortalError> {
        let key = QueryKey::Unit(kind, id.to_string());
        if let Some(Cached::Unit(unit)) = self.entries.read().await.get(&key) {
            return Ok(unit.clone());
        }

        let unit = api.get_unit(token, kind, id).await?.data;
        self.entries
            .write()
            .await
            .insert(key, Cached::Unit(unit.clone()));
        Ok(unit)
    }

    pub async fn contains(&self, key: &QueryKey) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn invalidate(&self, key: &QueryKey) {
        if self.entries.write().await.remove(key).is_some() {
            debug!("Invalidated query {key:?}");
        }
    }

    /// Drops the list and every single-unit entry of `kind`.
    pub async fn invalidate_kind(&self, kind: UnitKind) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| key.kind() != kind);
        debug!(
            "Invalidated {} cached {} queries",
            before - entries.len(),
            kind.label()
        );
    }
}
