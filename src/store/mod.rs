//! The marker store: the one piece of durable state the application owns.
//!
//! The whole collection lives in memory as an ordered `Vec<Marker>` and is
//! serialized wholesale to a single row in SQLite on every mutation. There is
//! no per-marker row: the collection is small, single-writer, and the
//! last-write-wins semantics of rewriting one value are acceptable. Hydration
//! happens once, in [`MarkerStore::migrate`].

mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::models::{CreateMarkerInput, Marker};

/// Fixed key under which the serialized collection is stored.
const STORAGE_KEY: &str = "marks";

struct Inner {
    conn: Connection,
    markers: Vec<Marker>,
}

pub struct MarkerStore {
    inner: Arc<Mutex<Inner>>,
}

impl MarkerStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Store path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                conn,
                markers: Vec::new(),
            })),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "pinpoint")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("pinpoint.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                conn,
                markers: Vec::new(),
            })),
        })
    }

    /// Run schema migrations and hydrate the collection from storage.
    pub fn migrate(&self) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        schema::run_migrations(&inner.conn)?;

        let serialized: Option<String> = inner
            .conn
            .query_row(
                "SELECT value FROM storage WHERE key = ?",
                [STORAGE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        inner.markers = match serialized {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };

        tracing::debug!("Hydrated {} markers from storage", inner.markers.len());
        Ok(())
    }

    /// Create a marker with a fresh id and persist the collection.
    ///
    /// Always succeeds given a working storage layer; the store does not
    /// validate name or coordinate ranges.
    pub fn create(&self, input: CreateMarkerInput) -> Result<Marker> {
        let mut inner = self.inner.lock().expect("store lock poisoned");

        let marker = Marker {
            id: Uuid::new_v4(),
            name: input.name,
            latitude: input.latitude,
            longitude: input.longitude,
        };

        inner.markers.push(marker.clone());
        persist(&inner)?;

        Ok(marker)
    }

    /// Remove a marker by id and persist the collection.
    ///
    /// Returns `false` (not an error) when no marker has the given id.
    pub fn remove(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.lock().expect("store lock poisoned");

        let before = inner.markers.len();
        inner.markers.retain(|marker| marker.id != id);
        let removed = inner.markers.len() < before;

        if removed {
            persist(&inner)?;
        }

        Ok(removed)
    }

    /// Look up a marker by id. Linear scan; the collection stays small.
    pub fn get(&self, id: Uuid) -> Option<Marker> {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner.markers.iter().find(|marker| marker.id == id).cloned()
    }

    /// All markers in insertion order.
    pub fn list(&self) -> Vec<Marker> {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner.markers.clone()
    }
}

/// Serialize the whole collection under the fixed key.
fn persist(inner: &Inner) -> Result<()> {
    let json = serde_json::to_string(&inner.markers)?;
    inner.conn.execute(
        "INSERT INTO storage (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (STORAGE_KEY, &json),
    )?;
    Ok(())
}

impl Clone for MarkerStore {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
