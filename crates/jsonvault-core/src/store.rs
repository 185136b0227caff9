//! SQLite-backed versioned document store.
//!
//! Each path owns a bounded, time-deduplicated history of JSON documents.
//! A path is also a prefix: `/a` addresses itself and every path below
//! `/a/`, for both reads and deletes.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::VaultResult;
use crate::version::Version;

const DEFAULT_MAX_VERSIONS: i64 = 10;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS paths (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    path TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS versions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    path_id INTEGER NOT NULL REFERENCES paths(id),
    text TEXT NOT NULL,
    added INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_versions_path_added
    ON versions(path_id, added DESC);

PRAGMA busy_timeout=10000;
PRAGMA user_version=1;
"#;

/// Versioned store for JSON documents addressed by hierarchical paths.
///
/// The connection is held behind a mutex so the engine only ever sees one
/// caller at a time; multi-statement operations additionally run inside a
/// single transaction. Callers that need reader/writer semantics across
/// store calls put the whole `Store` behind their own lock.
pub struct Store {
    conn: Mutex<Connection>,
    /// Maximum retained versions per path. Applies to future `add` calls.
    pub max_versions: i64,
    /// A write within this interval of the path's previous write replaces
    /// it instead of accumulating history. Applies to future `add` calls.
    pub replace_interval: Duration,
}

impl Store {
    /// Open or create a store at the given database file path.
    pub fn open(path: impl AsRef<Path>) -> VaultResult<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> VaultResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> VaultResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            max_versions: DEFAULT_MAX_VERSIONS,
            replace_interval: Duration::hours(24),
        })
    }

    /// Store a new version of the document at `path`.
    ///
    /// Runs as one transaction: create the path record if absent, drop the
    /// previous version if it falls within the replace interval, insert the
    /// new version, then evict the oldest versions beyond `max_versions`.
    /// Either all steps apply or none do.
    ///
    /// `content` is trusted to be valid, whitespace-normalized JSON;
    /// validation is the caller's responsibility.
    pub fn add(&self, path: &str, content: &str) -> VaultResult<()> {
        let added = Utc::now();
        let cutoff = added - self.replace_interval;

        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT OR IGNORE INTO paths(path) VALUES (?1)",
            params![path],
        )?;

        // Collapse writes inside the replace interval into the newest one.
        tx.execute(
            r#"DELETE FROM versions
               WHERE path_id = (SELECT id FROM paths WHERE path = ?1)
                 AND added > ?2 AND added <= ?3"#,
            params![path, cutoff.timestamp_millis(), added.timestamp_millis()],
        )?;

        tx.execute(
            r#"INSERT INTO versions(path_id, text, added)
               SELECT id, ?2, ?3 FROM paths WHERE path = ?1"#,
            params![path, content, added.timestamp_millis()],
        )?;

        // Evict everything older than the newest max_versions entries.
        tx.execute(
            r#"DELETE FROM versions
               WHERE path_id = (SELECT id FROM paths WHERE path = ?1)
                 AND id IN (SELECT id FROM versions
                            WHERE path_id = (SELECT id FROM paths WHERE path = ?1)
                            ORDER BY id DESC LIMIT -1 OFFSET ?2)"#,
            params![path, self.max_versions],
        )?;

        tx.commit()?;
        debug!(path, "version added");
        Ok(())
    }

    /// Delete `path` and every hierarchical descendant, with all their
    /// versions, atomically. Deleting a nonexistent path is a no-op.
    pub fn delete(&self, path: &str) -> VaultResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        // substr instead of LIKE so % and _ in stored paths stay literal.
        tx.execute(
            r#"DELETE FROM versions
               WHERE path_id IN (SELECT id FROM paths
                                 WHERE path = ?1
                                    OR substr(path, 1, length(?1) + 1) = ?1 || '/')"#,
            params![path],
        )?;
        tx.execute(
            r#"DELETE FROM paths
               WHERE path = ?1 OR substr(path, 1, length(?1) + 1) = ?1 || '/'"#,
            params![path],
        )?;

        tx.commit()?;
        debug!(path, "path deleted");
        Ok(())
    }

    /// Every stored path, lexicographically ascending.
    pub fn get_paths(&self) -> VaultResult<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT path FROM paths ORDER BY path ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut paths = Vec::new();
        for row in rows {
            paths.push(row?);
        }
        Ok(paths)
    }

    /// Versions for `path` and its hierarchical descendants, ordered by path
    /// ascending then time descending, each path contributing at most
    /// `num_latest` versions. A negative `num_latest` caps at `max_versions`.
    pub fn get_content(&self, path: &str, num_latest: i64) -> VaultResult<Vec<Version>> {
        let cap = if num_latest < 0 {
            self.max_versions
        } else {
            num_latest
        };

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"SELECT id, path, text, added FROM (
                   SELECT v.id AS id, p.path AS path, v.text AS text, v.added AS added,
                          row_number() OVER (PARTITION BY p.path
                                             ORDER BY v.added DESC, v.id DESC) AS rn
                   FROM versions v JOIN paths p ON p.id = v.path_id
                   WHERE p.path = ?1
                      OR substr(p.path, 1, length(?1) + 1) = ?1 || '/')
               WHERE rn <= ?2
               ORDER BY path ASC, added DESC, id DESC"#,
        )?;

        let rows = stmt.query_map(params![path, cap], |row| {
            let added_ms: i64 = row.get(3)?;
            Ok(Version {
                id: row.get(0)?,
                path: row.get(1)?,
                text: row.get(2)?,
                added: DateTime::<Utc>::from_timestamp_millis(added_ms).unwrap_or_default(),
            })
        })?;

        let mut versions = Vec::new();
        for row in rows {
            versions.push(row?);
        }
        Ok(versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(versions: &[Version]) -> Vec<&str> {
        versions.iter().map(|v| v.text.as_str()).collect()
    }

    fn add_all(store: &Store, path: &str, contents: &[&str]) {
        for content in contents {
            store.add(path, content).unwrap();
        }
    }

    #[test]
    fn empty_store_has_no_paths() {
        let store = Store::in_memory().unwrap();
        assert!(store.get_paths().unwrap().is_empty());
        assert!(store.get_content("/abc", 1).unwrap().is_empty());
    }

    #[test]
    fn path_creation_is_idempotent() {
        let store = Store::in_memory().unwrap();
        store.add("/abc", "content").unwrap();
        store.add("/abc", "updated").unwrap();
        assert_eq!(store.get_paths().unwrap(), vec!["/abc"]);
    }

    #[test]
    fn paths_are_sorted() {
        let store = Store::in_memory().unwrap();
        store.add("/second", "2").unwrap();
        store.add("/abc", "1").unwrap();
        assert_eq!(store.get_paths().unwrap(), vec!["/abc", "/second"]);
    }

    #[test]
    fn latest_content_wins() {
        let store = Store::in_memory().unwrap();
        for content in ["content", "updated", "third time"] {
            store.add("/a", content).unwrap();
            let latest = store.get_content("/a", 1).unwrap();
            assert_eq!(texts(&latest), vec![content]);
        }
    }

    #[test]
    fn versions_under_limit_all_retained() {
        let mut store = Store::in_memory().unwrap();
        store.max_versions = 5;
        store.replace_interval = Duration::zero();
        add_all(&store, "/a", &["1", "2", "3", "final"]);

        assert_eq!(texts(&store.get_content("/a", 1).unwrap()), vec!["final"]);
        assert_eq!(store.get_content("/a", -1).unwrap().len(), 4);
    }

    #[test]
    fn versions_over_limit_evicted() {
        let mut store = Store::in_memory().unwrap();
        store.max_versions = 5;
        store.replace_interval = Duration::zero();
        add_all(&store, "/a", &["1", "2", "3", "4", "5", "6", "7"]);

        assert_eq!(texts(&store.get_content("/a", 1).unwrap()), vec!["7"]);
        let all = store.get_content("/a", -1).unwrap();
        assert_eq!(all.len(), 5);
        // Oldest were evicted, newest first.
        assert_eq!(texts(&all), vec!["7", "6", "5", "4", "3"]);
    }

    #[test]
    fn default_retention_bound_is_ten() {
        let mut store = Store::in_memory().unwrap();
        store.replace_interval = Duration::zero();
        let contents: Vec<String> = (1..=11).map(|i| i.to_string()).collect();
        for content in &contents {
            store.add("/a", content).unwrap();
        }

        assert_eq!(texts(&store.get_content("/a", 1).unwrap()), vec!["11"]);
        assert_eq!(store.get_content("/a", -1).unwrap().len(), 10);
    }

    #[test]
    fn rapid_writes_collapse_into_latest() {
        // Default replace interval is 24h, so successive test writes land
        // inside the window and must supersede each other.
        let store = Store::in_memory().unwrap();
        add_all(&store, "/a", &["1", "2", "3"]);

        assert_eq!(texts(&store.get_content("/a", 1).unwrap()), vec!["3"]);
        assert_eq!(store.get_content("/a", -1).unwrap().len(), 1);
    }

    #[test]
    fn delete_single_path() {
        let store = Store::in_memory().unwrap();
        store.add("/abc", "content").unwrap();
        store.delete("/abc").unwrap();
        assert!(store.get_paths().unwrap().is_empty());
    }

    #[test]
    fn delete_keeps_siblings() {
        let store = Store::in_memory().unwrap();
        store.add("/abc", "content").unwrap();
        store.add("/second", "other").unwrap();
        store.add("/third", "val").unwrap();
        store.delete("/second").unwrap();
        assert_eq!(store.get_paths().unwrap(), vec!["/abc", "/third"]);
    }

    #[test]
    fn delete_removes_subtree() {
        let store = Store::in_memory().unwrap();
        store.add("/abc", "content").unwrap();
        store.add("/abc/sub", "other").unwrap();
        store.add("/third", "val").unwrap();
        store.delete("/abc").unwrap();
        assert_eq!(store.get_paths().unwrap(), vec!["/third"]);
    }

    #[test]
    fn delete_subtree_keeps_sibling_branches() {
        let store = Store::in_memory().unwrap();
        store.add("/abc/sip", "content").unwrap();
        store.add("/abc/sub", "other").unwrap();
        store.add("/abc/sub/third", "val").unwrap();
        store.delete("/abc/sub").unwrap();
        assert_eq!(store.get_paths().unwrap(), vec!["/abc/sip"]);
    }

    #[test]
    fn delete_is_separator_aware() {
        // /ab is not a descendant of /a.
        let store = Store::in_memory().unwrap();
        store.add("/a", "1").unwrap();
        store.add("/ab", "2").unwrap();
        store.delete("/a").unwrap();
        assert_eq!(store.get_paths().unwrap(), vec!["/ab"]);
    }

    #[test]
    fn wildcard_characters_in_paths_are_literal() {
        let store = Store::in_memory().unwrap();
        store.add("/a%", "1").unwrap();
        store.add("/a%/x", "2").unwrap();
        store.add("/ab/x", "3").unwrap();
        store.add("/a_", "4").unwrap();

        // % addresses only its own subtree, not arbitrary siblings.
        assert_eq!(texts(&store.get_content("/a%", 1).unwrap()), vec!["1", "2"]);
        assert_eq!(texts(&store.get_content("/a_", 1).unwrap()), vec!["4"]);

        store.delete("/a%").unwrap();
        assert_eq!(store.get_paths().unwrap(), vec!["/a_", "/ab/x"]);
    }

    #[test]
    fn delete_nonexistent_is_noop() {
        let store = Store::in_memory().unwrap();
        store.add("/abc", "content").unwrap();
        store.delete("/missing").unwrap();
        assert_eq!(store.get_paths().unwrap(), vec!["/abc"]);
    }

    #[test]
    fn get_recursively_returns_one_per_path() {
        let store = Store::in_memory().unwrap();
        store.add("/a/first", "content").unwrap();
        store.add("/a/second", "updated").unwrap();

        let latest = store.get_content("/a", 1).unwrap();
        assert_eq!(texts(&latest), vec!["content", "updated"]);
        assert_eq!(texts(&store.get_content("/a/first", 1).unwrap()), vec!["content"]);
    }

    #[test]
    fn recursive_get_windows_per_path() {
        let mut store = Store::in_memory().unwrap();
        store.replace_interval = Duration::zero();
        add_all(&store, "/a/first", &["content", "second"]);
        store.add("/a/second", "updated").unwrap();
        store.add("/a/first", "third").unwrap();

        assert_eq!(texts(&store.get_content("/a", 1).unwrap()), vec!["third", "updated"]);
        assert_eq!(store.get_content("/a", -1).unwrap().len(), 4);
        assert_eq!(store.get_content("/a/first", -1).unwrap().len(), 3);
        assert_eq!(store.get_content("/a/second", -1).unwrap().len(), 1);
    }

    #[test]
    fn intermediate_caps_are_honored() {
        let mut store = Store::in_memory().unwrap();
        store.replace_interval = Duration::zero();
        add_all(&store, "/a", &["1", "2", "3", "4"]);

        assert_eq!(store.get_content("/a", 2).unwrap().len(), 2);
        assert!(store.get_content("/a", 0).unwrap().is_empty());
    }

    #[test]
    fn versions_carry_path_and_timestamp() {
        let store = Store::in_memory().unwrap();
        let before = Utc::now() - Duration::seconds(1);
        store.add("/a", "content").unwrap();

        let versions = store.get_content("/a", 1).unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].path, "/a");
        assert_eq!(versions[0].text, "content");
        assert!(versions[0].added >= before);
    }

    #[test]
    fn open_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("vault.sqlite3");

        {
            let store = Store::open(&db_path).unwrap();
            store.add("/a", "content").unwrap();
        }
        assert!(db_path.exists());

        // Reopen and confirm the data survived.
        let store = Store::open(&db_path).unwrap();
        assert_eq!(store.get_paths().unwrap(), vec!["/a"]);
    }

    #[test]
    fn open_fails_without_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("missing").join("vault.sqlite3");
        assert!(Store::open(&db_path).is_err());
    }
}
