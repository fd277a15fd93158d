use anyhow::Result;
use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use crate::db::fetch_history;
use crate::models::Draw;

/// Fournit l'historique des tirages, draws[0] = tirage le plus récent.
pub trait HistorySource {
    fn load(&self) -> Result<Vec<Draw>>;
}

pub struct SqliteHistory<'a> {
    conn: &'a Connection,
    limit: Option<u32>,
    max_num: u8,
}

impl<'a> SqliteHistory<'a> {
    pub fn new(conn: &'a Connection, max_num: u8) -> Self {
        Self { conn, limit: None, max_num }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl HistorySource for SqliteHistory<'_> {
    fn load(&self) -> Result<Vec<Draw>> {
        fetch_history(self.conn, self.limit, self.max_num)
    }
}

/// Cache à durée de vie : une entrée plus jeune que `ttl` est resservie telle quelle.
pub struct TtlCache<K, V> {
    entries: HashMap<K, (Instant, V)>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Si `refresh` échoue, l'entrée précédente reste en place et l'erreur remonte.
    pub fn get_or_refresh<F>(&mut self, key: K, ttl: Duration, refresh: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some((stored_at, value)) = self.entries.get(&key) {
            if stored_at.elapsed() < ttl {
                return Ok(value.clone());
            }
        }
        let value = refresh()?;
        self.entries.insert(key, (Instant::now(), value.clone()));
        Ok(value)
    }
}

impl<K: Eq + Hash, V: Clone> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct CachedHistory<S> {
    inner: S,
    ttl: Duration,
    cache: RefCell<TtlCache<(), Vec<Draw>>>,
}

impl<S: HistorySource> CachedHistory<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cache: RefCell::new(TtlCache::new()),
        }
    }
}

impl<S: HistorySource> HistorySource for CachedHistory<S> {
    fn load(&self) -> Result<Vec<Draw>> {
        self.cache
            .borrow_mut()
            .get_or_refresh((), self.ttl, || self.inner.load())
    }
}
