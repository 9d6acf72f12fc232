//! Collection store contract and SQLite implementation.
//!
//! # Responsibility
//! - Manage named collections: create, list, delete with protection.
//! - Provide per-collection coin CRUD over one table per collection.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - "Owned" and "Wishlist" (case-insensitive) can never be deleted.
//! - Creating an existing collection is a no-op; the physical table and the
//!   registry row are both present before `create_collection` returns.
//! - Deleting a collection removes its records and its registry row together.
//! - A coin's identity is scoped to the collection it lives in; the store
//!   assumes nothing about cross-collection uniqueness.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::coin::{Coin, CoinId};
use log::warn;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const COIN_SELECT_COLUMNS: &str = "id, name, date, thickness, diameter, \
     grade, composition, denomination, edge, weight, obverse_png, inverse_png";

const PROTECTED_COLLECTIONS: &[&str] = &["Owned", "Wishlist"];

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for collection lifecycle and coin persistence operations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Attempt to delete one of the protected default collections.
    ProtectedCollection(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted data cannot be converted to a valid coin record.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ProtectedCollection(name) => {
                write!(f, "collection `{name}` is protected and cannot be deleted")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "coin store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "coin store requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted coin data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::ProtectedCollection(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Returns whether `name` matches a protected default collection.
pub fn is_protected_collection(name: &str) -> bool {
    PROTECTED_COLLECTIONS
        .iter()
        .any(|protected| protected.eq_ignore_ascii_case(name))
}

/// Store interface for collection lifecycle and coin CRUD.
pub trait CoinStore {
    /// Ensures the collection exists. Idempotent.
    fn create_collection(&self, name: &str) -> StoreResult<()>;

    /// Returns every known collection name, protected ones included, in
    /// creation order.
    fn collection_names(&self) -> StoreResult<Vec<String>>;

    /// Deletes the collection's records and registry entry together.
    ///
    /// Fails with [`StoreError::ProtectedCollection`] and no side effects for
    /// the protected default collections.
    fn delete_collection(&self, name: &str) -> StoreResult<()>;

    /// Inserts a coin with its existing identity and the given image bytes.
    fn insert_coin(
        &self,
        collection: &str,
        coin: &Coin,
        obverse: Option<&[u8]>,
        reverse: Option<&[u8]>,
    ) -> StoreResult<CoinId>;

    /// Updates the coin's scalar attributes by identity.
    ///
    /// Returns the affected-row count; 0 means the identity was absent.
    fn update_coin(&self, collection: &str, coin: &Coin) -> StoreResult<usize>;

    /// Deletes a coin by identity.
    ///
    /// Returns the affected-row count; 0 means the identity was absent.
    fn delete_coin(&self, collection: &str, id: CoinId) -> StoreResult<usize>;

    /// Gets one coin by identity, or `None` when absent.
    fn get_coin(&self, collection: &str, id: CoinId) -> StoreResult<Option<Coin>>;

    /// Returns all coins in the collection in natural (insertion) order.
    fn list_coins(&self, collection: &str) -> StoreResult<Vec<Coin>>;

    /// Moves a coin between collections: insert into `target`, then delete
    /// from `source`, carrying identity and image bytes.
    ///
    /// This default runs the two writes separately. A failed insert leaves
    /// the source untouched; a failed delete after a successful insert leaves
    /// the coin in both collections and the error is returned to the caller,
    /// never masked. Backends with transaction support should override this
    /// to make both writes atomic.
    fn relocate_coin(&self, source: &str, target: &str, coin: &Coin) -> StoreResult<()> {
        self.insert_coin(
            target,
            coin,
            coin.obverse_png.as_deref(),
            coin.reverse_png.as_deref(),
        )?;
        self.delete_coin(source, coin.id)?;
        Ok(())
    }
}

/// SQLite-backed coin store. One table per collection plus the `lists`
/// registry created by migrations.
pub struct SqliteCoinStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCoinStore<'conn> {
    /// Validates that `conn` is migrated, then bootstraps the protected
    /// default collections.
    ///
    /// Bootstrap is self-healing: whichever half of a default collection is
    /// missing (table or registry row) is recreated.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let actual_version =
            conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        if !table_exists(conn, "lists")? {
            return Err(StoreError::MissingRequiredTable("lists"));
        }

        let store = Self { conn };
        for name in PROTECTED_COLLECTIONS {
            store.create_collection(name)?;
        }
        Ok(store)
    }
}

impl CoinStore for SqliteCoinStore<'_> {
    fn create_collection(&self, name: &str) -> StoreResult<()> {
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id           TEXT    PRIMARY KEY,
                name         TEXT    NOT NULL,
                date         INTEGER,
                thickness    REAL,
                diameter     REAL,
                grade        TEXT,
                composition  TEXT,
                denomination TEXT,
                edge         TEXT,
                weight       REAL,
                obverse_png  BLOB,
                inverse_png  BLOB
            );",
            quote_ident(name)
        ))?;
        self.conn
            .execute("INSERT OR IGNORE INTO lists (name) VALUES (?1);", [name])?;
        Ok(())
    }

    fn collection_names(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM lists ORDER BY rowid;")?;
        let mut rows = stmt.query([])?;
        let mut names = Vec::new();

        while let Some(row) = rows.next()? {
            names.push(row.get("name")?);
        }

        Ok(names)
    }

    fn delete_collection(&self, name: &str) -> StoreResult<()> {
        if is_protected_collection(name) {
            warn!("event=collection_delete module=repo status=denied reason=protected name={name}");
            return Err(StoreError::ProtectedCollection(name.to_string()));
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(&format!("DROP TABLE IF EXISTS {};", quote_ident(name)))?;
        tx.execute("DELETE FROM lists WHERE name = ?1;", [name])?;
        tx.commit()?;

        Ok(())
    }

    fn insert_coin(
        &self,
        collection: &str,
        coin: &Coin,
        obverse: Option<&[u8]>,
        reverse: Option<&[u8]>,
    ) -> StoreResult<CoinId> {
        insert_coin_into(self.conn, collection, coin, obverse, reverse)?;
        Ok(coin.id)
    }

    fn update_coin(&self, collection: &str, coin: &Coin) -> StoreResult<usize> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE {} SET
                    name = ?1, date = ?2, thickness = ?3, diameter = ?4,
                    grade = ?5, composition = ?6, denomination = ?7,
                    edge = ?8, weight = ?9
                 WHERE id = ?10;",
                quote_ident(collection)
            ),
            params![
                coin.name.as_str(),
                coin.date,
                coin.thickness,
                coin.diameter,
                coin.grade.as_str(),
                coin.composition.as_str(),
                coin.denomination.as_str(),
                coin.edge.as_str(),
                coin.weight,
                coin.id.to_string(),
            ],
        )?;

        Ok(changed)
    }

    fn delete_coin(&self, collection: &str, id: CoinId) -> StoreResult<usize> {
        delete_coin_from(self.conn, collection, id)
    }

    fn get_coin(&self, collection: &str, id: CoinId) -> StoreResult<Option<Coin>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COIN_SELECT_COLUMNS} FROM {} WHERE id = ?1;",
            quote_ident(collection)
        ))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_coin_row(row)?));
        }

        Ok(None)
    }

    fn list_coins(&self, collection: &str) -> StoreResult<Vec<Coin>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COIN_SELECT_COLUMNS} FROM {};",
            quote_ident(collection)
        ))?;

        let mut rows = stmt.query([])?;
        let mut coins = Vec::new();

        while let Some(row) = rows.next()? {
            coins.push(parse_coin_row(row)?);
        }

        Ok(coins)
    }

    /// Transactional override of the two-step move: both writes commit
    /// together or neither does.
    fn relocate_coin(&self, source: &str, target: &str, coin: &Coin) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        insert_coin_into(
            &tx,
            target,
            coin,
            coin.obverse_png.as_deref(),
            coin.reverse_png.as_deref(),
        )?;
        delete_coin_from(&tx, source, coin.id)?;
        tx.commit()?;

        Ok(())
    }
}

fn insert_coin_into(
    conn: &Connection,
    collection: &str,
    coin: &Coin,
    obverse: Option<&[u8]>,
    reverse: Option<&[u8]>,
) -> StoreResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO {} (
                id, name, date, thickness, diameter,
                grade, composition, denomination, edge, weight,
                obverse_png, inverse_png
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            quote_ident(collection)
        ),
        params![
            coin.id.to_string(),
            coin.name.as_str(),
            coin.date,
            coin.thickness,
            coin.diameter,
            coin.grade.as_str(),
            coin.composition.as_str(),
            coin.denomination.as_str(),
            coin.edge.as_str(),
            coin.weight,
            obverse,
            reverse,
        ],
    )?;

    Ok(())
}

fn delete_coin_from(conn: &Connection, collection: &str, id: CoinId) -> StoreResult<usize> {
    let changed = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1;", quote_ident(collection)),
        [id.to_string()],
    )?;

    Ok(changed)
}

fn parse_coin_row(row: &Row<'_>) -> StoreResult<Coin> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid value `{id_text}` in id")))?;

    let mut coin = Coin::with_id(id);
    coin.name = row.get("name")?;
    coin.date = row.get("date")?;
    coin.thickness = row.get("thickness")?;
    coin.diameter = row.get("diameter")?;
    coin.grade = row.get("grade")?;
    coin.composition = row.get("composition")?;
    coin.denomination = row.get("denomination")?;
    coin.edge = row.get("edge")?;
    coin.weight = row.get("weight")?;
    coin.obverse_png = row.get("obverse_png")?;
    coin.reverse_png = row.get("inverse_png")?;

    Ok(coin)
}

/// Quotes a collection name for use as a SQL identifier. Names are
/// user-chosen and never assumed pre-sanitized.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn table_exists(conn: &Connection, table_name: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table_name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
