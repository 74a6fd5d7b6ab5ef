use crate::error::{CatalogError, Result};
use crate::storage::{ensure_title, CatalogStore};
use crate::types::{CatalogSnapshot, MovieRecord, MovieSummary};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CREATE_MOVIES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS movies (
        id     INTEGER PRIMARY KEY AUTOINCREMENT,
        title  TEXT UNIQUE NOT NULL,
        year   INTEGER NOT NULL,
        rating REAL NOT NULL,
        poster TEXT NOT NULL
    );
"#;

/// SQLite-backed catalog. Each operation opens its own connection and
/// drops it before returning.
#[derive(Debug, Clone)]
pub struct SqliteCatalogStore {
    db_path: PathBuf,
}

impl SqliteCatalogStore {
    /// Point at a database file without touching the filesystem.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Create the parent directory if needed and initialize the schema.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let store = Self::new(db_path);
        if let Some(parent) = store.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        store.initialize()?;
        info!("Opened movie catalog at {}", store.db_path.display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.db_path)?)
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn initialize(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(CREATE_MOVIES_TABLE)?;
        Ok(())
    }

    fn list_all(&self) -> Result<CatalogSnapshot> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT title, year, rating FROM movies ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(MovieSummary {
                title: row.get(0)?,
                year: row.get(1)?,
                rating: row.get(2)?,
            })
        })?;
        let snapshot = rows.collect::<rusqlite::Result<CatalogSnapshot>>()?;
        debug!("Loaded {} movies", snapshot.len());
        Ok(snapshot)
    }

    fn list_all_full(&self) -> Result<Vec<MovieRecord>> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT title, year, rating, poster FROM movies ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(MovieRecord {
                title: row.get(0)?,
                year: row.get(1)?,
                rating: row.get(2)?,
                poster_url: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn insert(&self, movie: &MovieRecord) -> Result<()> {
        ensure_title(movie)?;
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO movies (title, year, rating, poster) VALUES (?1, ?2, ?3, ?4)",
            params![movie.title, movie.year, movie.rating, movie.poster_url],
        )
        .map_err(|e| CatalogError::from_insert(&movie.title, e))?;
        debug!("Inserted movie: {}", movie.title);
        Ok(())
    }

    fn delete_by_title(&self, title: &str) -> Result<bool> {
        let conn = self.connect()?;
        let affected = conn.execute("DELETE FROM movies WHERE title = ?1", params![title])?;
        debug!("Delete '{}' affected {} rows", title, affected);
        Ok(affected > 0)
    }

    fn update_rating(&self, title: &str, rating: f64) -> Result<bool> {
        let conn = self.connect()?;
        let affected = conn.execute(
            "UPDATE movies SET rating = ?1 WHERE title = ?2",
            params![rating, title],
        )?;
        debug!("Update rating of '{}' affected {} rows", title, affected);
        Ok(affected > 0)
    }
}
