//! Per-model vector index storage.
//!
//! An [`IndexStore`] owns exactly one on-disk sqlite-vec index for one
//! (provider, model) pair. Vectors of different widths never share a store —
//! each config gets its own database file, and the file records its vector
//! width in `index_meta` so reopening with an incompatible model fails
//! instead of corrupting.

pub mod catalog;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once, PoisonError};

use rusqlite::{params, Connection};
use serde::Serialize;
use sqlite_vec::sqlite3_vec_init;

use crate::error::{RagError, Result};
use crate::registry::EmbeddingConfig;

static SQLITE_VEC_INIT: Once = Once::new();

/// Register the sqlite-vec extension globally. Safe to call multiple times.
pub fn load_sqlite_vec() {
    SQLITE_VEC_INIT.call_once(|| unsafe {
        rusqlite::ffi::sqlite3_auto_extension(Some(std::mem::transmute(
            sqlite3_vec_init as *const (),
        )));
    });
}

/// Convert an f32 embedding slice to raw bytes for sqlite-vec.
pub fn embedding_to_bytes(embedding: &[f32]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            embedding.as_ptr() as *const u8,
            embedding.len() * std::mem::size_of::<f32>(),
        )
    }
}

/// One retrieved context chunk. Transient — produced by a query, not
/// persisted beyond the store that yielded it.
#[derive(Debug, Clone, Serialize)]
pub struct ContextChunk {
    pub id: String,
    pub content: String,
    /// Cosine similarity against the query vector, assuming unit-norm
    /// embeddings (all catalog providers return them).
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// One physical index for exactly one embedding config.
pub struct IndexStore {
    path: PathBuf,
    model: String,
    dimensions: usize,
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for IndexStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexStore")
            .field("path", &self.path)
            .field("model", &self.model)
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

impl IndexStore {
    /// Open (or create) the index file for `config` at `path`.
    ///
    /// A fresh index records `dimensions` in its metadata; an existing one is
    /// checked against it and rejected with [`RagError::DimensionalityMismatch`]
    /// if the stored width disagrees.
    pub fn open(path: &Path, config: &EmbeddingConfig, dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(RagError::InvalidArgument(
                "embedding dimensionality must be positive".into(),
            ));
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        load_sqlite_vec();

        let conn = Connection::open(path)?;
        // WAL mode for better concurrent read performance
        conn.pragma_update(None, "journal_mode", "WAL")?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS index_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;

        match read_meta(&conn, "dimensions")? {
            Some(stored) => {
                let stored: usize = stored.parse().unwrap_or(0);
                if stored != dimensions {
                    return Err(RagError::DimensionalityMismatch {
                        path: path.to_path_buf(),
                        stored,
                        expected: dimensions,
                        model: config.model.clone(),
                    });
                }
            }
            None => {
                write_meta(&conn, "dimensions", &dimensions.to_string())?;
                write_meta(&conn, "provider", config.provider.as_str())?;
                write_meta(&conn, "model", &config.model)?;
            }
        }

        init_schema(&conn, dimensions)?;

        tracing::info!(path = %path.display(), model = %config.model, dimensions, "index opened");

        Ok(Self {
            path: path.to_path_buf(),
            model: config.model.clone(),
            dimensions,
            conn: Mutex::new(conn),
        })
    }

    /// The physical location of this index.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Vector width this index stores.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Append one chunk with its embedding. No uniqueness constraint on the
    /// payload. Returns the generated chunk id.
    pub fn insert(
        &self,
        embedding: &[f32],
        content: &str,
        source: Option<&str>,
    ) -> Result<String> {
        self.check_width(embedding)?;

        let id = uuid::Uuid::now_v7().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        let mut conn = self.lock_conn();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO chunks (id, content, source, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![id, content, source, now],
        )?;
        tx.execute(
            "INSERT INTO chunks_vec (id, embedding) VALUES (?1, ?2)",
            params![id, embedding_to_bytes(embedding)],
        )?;
        tx.commit()?;

        Ok(id)
    }

    /// Nearest-neighbor query: up to `k` chunks by descending similarity.
    /// Empty index yields an empty vec, not an error.
    pub fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<ContextChunk>> {
        if k == 0 {
            return Err(RagError::InvalidArgument(
                "k must be a positive integer".into(),
            ));
        }
        self.check_width(embedding)?;

        let conn = self.lock_conn();

        // KNN pass over the vec0 table first, payload hydration second.
        let mut stmt = conn.prepare(
            "SELECT id, distance FROM chunks_vec \
             WHERE embedding MATCH ?1 ORDER BY distance LIMIT ?2",
        )?;
        let nearest: Vec<(String, f64)> = stmt
            .query_map(params![embedding_to_bytes(embedding), k as i64], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut payload_stmt =
            conn.prepare("SELECT content, source FROM chunks WHERE id = ?1")?;

        let mut results = Vec::with_capacity(nearest.len());
        for (id, distance) in nearest {
            let (content, source): (String, Option<String>) =
                payload_stmt.query_row(params![id], |row| Ok((row.get(0)?, row.get(1)?)))?;
            results.push(ContextChunk {
                id,
                content,
                score: distance_to_similarity(distance),
                source,
            });
        }

        Ok(results)
    }

    /// Number of stored chunks.
    pub fn len(&self) -> Result<usize> {
        let conn = self.lock_conn();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn check_width(&self, embedding: &[f32]) -> Result<()> {
        if embedding.len() != self.dimensions {
            return Err(RagError::DimensionalityMismatch {
                path: self.path.clone(),
                stored: self.dimensions,
                expected: embedding.len(),
                model: self.model.clone(),
            });
        }
        Ok(())
    }

    fn lock_conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// L2 distance → cosine similarity for unit-norm vectors, clamped to [-1, 1].
fn distance_to_similarity(distance: f64) -> f64 {
    (1.0 - distance * distance / 2.0).clamp(-1.0, 1.0)
}

/// Chunk payload table plus the vec0 virtual table sized for this index.
/// Idempotent (IF NOT EXISTS).
fn init_schema(conn: &Connection, dimensions: usize) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS chunks (
            id TEXT PRIMARY KEY,
            content TEXT NOT NULL,
            source TEXT,
            created_at TEXT NOT NULL
        );",
    )?;
    conn.execute_batch(&format!(
        "CREATE VIRTUAL TABLE IF NOT EXISTS chunks_vec USING vec0(
            id TEXT PRIMARY KEY,
            embedding FLOAT[{dimensions}]
        );"
    ))?;
    Ok(())
}

fn read_meta(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    match conn.query_row(
        "SELECT value FROM index_meta WHERE key = ?1",
        params![key],
        |row| row.get::<_, String>(0),
    ) {
        Ok(val) => Ok(Some(val)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

fn write_meta(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO index_meta (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}
