//! Process-lifetime memory store for site metrics and recent searches.
//!
//! # Responsibility
//! - Hold the bounded recent-search history, the popular-books list and the
//!   site metric counters.
//! - Expose them only through the bounded operations below.
//!
//! # Invariants
//! - `recent_searches` holds at most [`RECENT_SEARCH_CAPACITY`] entries,
//!   oldest first; appending beyond capacity evicts the oldest.
//! - Writers are serialized by a lock; readers see a consistent snapshot.
//! - Nothing here is persisted or part of a catalog unit of work.

use crate::model::fields::ValidationError;
use crate::model::FieldMap;
use crate::service::reply::{Status, StatusError};
use chrono::{SecondsFormat, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub const RECENT_SEARCH_CAPACITY: usize = 10;

pub type MemoryResult<T> = Result<T, MemoryError>;

#[derive(Debug)]
pub enum MemoryError {
    /// Requested section name is not one of the recognized keys.
    KeyNotFound(String),
    /// A recognized metric was given a non-counter value.
    InvalidMetric(ValidationError),
    /// The store lock was poisoned by a panicking writer.
    Unavailable,
}

impl Display for MemoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyNotFound(key) => write!(f, "key `{key}` not found in memory store"),
            Self::InvalidMetric(err) => write!(f, "invalid metric: {err}"),
            Self::Unavailable => write!(f, "memory store unavailable"),
        }
    }
}

impl Error for MemoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidMetric(err) => Some(err),
            _ => None,
        }
    }
}

impl StatusError for MemoryError {
    fn status(&self) -> Status {
        match self {
            Self::KeyNotFound(_) => Status::NotFound,
            Self::InvalidMetric(_) => Status::BadRequest,
            Self::Unavailable => Status::ServerError,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub query: String,
    /// ISO-8601 UTC time the query was recorded.
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularBook {
    pub id: i64,
    pub title: String,
    pub popularity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteMetrics {
    pub visitors: i64,
    pub page_views: i64,
    pub unique_users: i64,
}

/// Full copy of the store as of one read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub recent_searches: Vec<SearchEntry>,
    pub popular_books: Vec<PopularBook>,
    pub site_metrics: SiteMetrics,
}

/// One named section; serializes as `{"<key>": <value>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemorySection {
    RecentSearches(Vec<SearchEntry>),
    PopularBooks(Vec<PopularBook>),
    SiteMetrics(SiteMetrics),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecorded {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsUpdated {
    pub message: String,
    pub metrics: SiteMetrics,
}

struct MemoryState {
    recent_searches: VecDeque<SearchEntry>,
    popular_books: Vec<PopularBook>,
    site_metrics: SiteMetrics,
}

pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl MemoryStore {
    /// Builds the store with its startup values: empty search history, the
    /// popular-books list and the initial metric counters.
    pub fn seeded() -> Self {
        let popular_books = [
            (1, "Python для начинающих", 95),
            (2, "Чистый код", 92),
            (3, "Шаблоны проектирования", 88),
            (4, "Fluent Python", 85),
            (5, "Эффективный Python", 82),
        ]
        .into_iter()
        .map(|(id, title, popularity)| PopularBook {
            id,
            title: title.to_string(),
            popularity,
        })
        .collect();

        Self {
            state: RwLock::new(MemoryState {
                recent_searches: VecDeque::with_capacity(RECENT_SEARCH_CAPACITY + 1),
                popular_books,
                site_metrics: SiteMetrics {
                    visitors: 12345,
                    page_views: 54321,
                    unique_users: 7890,
                },
            }),
        }
    }

    pub fn get_all(&self) -> MemoryResult<MemorySnapshot> {
        let state = self.read()?;
        Ok(MemorySnapshot {
            recent_searches: state.recent_searches.iter().cloned().collect(),
            popular_books: state.popular_books.clone(),
            site_metrics: state.site_metrics,
        })
    }

    /// Returns one section by name: `recent_searches`, `popular_books` or
    /// `site_metrics`.
    pub fn get(&self, key: &str) -> MemoryResult<MemorySection> {
        let state = self.read()?;
        match key {
            "recent_searches" => Ok(MemorySection::RecentSearches(
                state.recent_searches.iter().cloned().collect(),
            )),
            "popular_books" => Ok(MemorySection::PopularBooks(state.popular_books.clone())),
            "site_metrics" => Ok(MemorySection::SiteMetrics(state.site_metrics)),
            other => Err(MemoryError::KeyNotFound(other.to_string())),
        }
    }

    /// Records a search query verbatim (the empty string included).
    pub fn add_search(&self, query: impl Into<String>) -> MemoryResult<SearchRecorded> {
        let entry = SearchEntry {
            query: query.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };

        let mut state = self.write()?;
        state.recent_searches.push_back(entry);
        while state.recent_searches.len() > RECENT_SEARCH_CAPACITY {
            state.recent_searches.pop_front();
        }
        debug!(
            "event=memory_add_search module=memory status=ok retained={}",
            state.recent_searches.len()
        );

        Ok(SearchRecorded {
            message: "search query recorded".to_string(),
        })
    }

    /// Overwrites the recognized counters present in `partial`; other keys
    /// are ignored. Either every recognized value is applied or none is.
    pub fn update_metrics(&self, partial: &FieldMap) -> MemoryResult<MetricsUpdated> {
        let visitors = counter(partial, "visitors")?;
        let page_views = counter(partial, "page_views")?;
        let unique_users = counter(partial, "unique_users")?;

        let mut state = self.write()?;
        let metrics = &mut state.site_metrics;
        if let Some(value) = visitors {
            metrics.visitors = value;
        }
        if let Some(value) = page_views {
            metrics.page_views = value;
        }
        if let Some(value) = unique_users {
            metrics.unique_users = value;
        }

        Ok(MetricsUpdated {
            message: "metrics updated".to_string(),
            metrics: *metrics,
        })
    }

    fn read(&self) -> MemoryResult<RwLockReadGuard<'_, MemoryState>> {
        self.state.read().map_err(|_| MemoryError::Unavailable)
    }

    fn write(&self) -> MemoryResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state.write().map_err(|_| MemoryError::Unavailable)
    }
}

fn counter(partial: &FieldMap, key: &str) -> MemoryResult<Option<i64>> {
    match partial.get(key) {
        None => Ok(None),
        Some(value) => value.as_i64().map(Some).ok_or_else(|| {
            MemoryError::InvalidMetric(ValidationError::new(
                key,
                format!("must be an integer, got {}", describe(value)),
            ))
        }),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(text) => format!("\"{text}\""),
        other => other.to_string(),
    }
}
