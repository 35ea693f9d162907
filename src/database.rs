use chrono::{DateTime, NaiveTime, Utc};
use regex::RegexBuilder;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::{GoalError, GoalResult};
use crate::store::ItemStore;

const ITEM_COLUMNS: &str = "id, title, completed, completed_at, parent_id, sort_order, notes,
     preferred_time, estimated_minutes, recurrence, expanded, created_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Recurrence::None),
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            "yearly" => Ok(Recurrence::Yearly),
            other => Err(format!("unknown recurrence '{}'", other)),
        }
    }
}

impl ToSql for Recurrence {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Recurrence {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// A node of the goal hierarchy.
///
/// `order` ranks the item among the items sharing its `parent_id`; the root
/// group is the set of items without a parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub parent_id: Option<i64>,
    pub order: i64,
    pub notes: Option<String>,
    pub preferred_time: Option<NaiveTime>,
    pub estimated_minutes: Option<i64>,
    pub recurrence: Recurrence,
    pub expanded: bool,
    pub created_at: DateTime<Utc>,
}

impl Item {
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Item {
            id: row.get(0)?,
            title: row.get(1)?,
            completed: row.get(2)?,
            completed_at: row.get(3)?,
            parent_id: row.get(4)?,
            order: row.get(5)?,
            notes: row.get(6)?,
            preferred_time: row.get(7)?,
            estimated_minutes: row.get(8)?,
            recurrence: row.get(9)?,
            expanded: row.get(10)?,
            created_at: row.get(11)?,
        })
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
        self.completed_at = if completed { Some(Utc::now()) } else { None };
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub title: String,
    pub parent_id: Option<i64>,
    pub notes: Option<String>,
    pub preferred_time: Option<NaiveTime>,
    pub estimated_minutes: Option<i64>,
    pub recurrence: Recurrence,
}

impl NewItem {
    pub fn titled(title: impl Into<String>, parent_id: Option<i64>) -> Self {
        NewItem {
            title: title.into(),
            parent_id,
            ..Default::default()
        }
    }
}

/// Field edits; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ItemEdit {
    pub title: Option<String>,
    pub notes: Option<Option<String>>,
    pub preferred_time: Option<Option<NaiveTime>>,
    pub estimated_minutes: Option<Option<i64>>,
    pub recurrence: Option<Recurrence>,
}

impl ItemEdit {
    pub fn apply(self, item: &mut Item) {
        if let Some(title) = self.title {
            item.title = title;
        }
        if let Some(notes) = self.notes {
            item.notes = notes;
        }
        if let Some(time) = self.preferred_time {
            item.preferred_time = time;
        }
        if let Some(minutes) = self.estimated_minutes {
            item.estimated_minutes = minutes;
        }
        if let Some(recurrence) = self.recurrence {
            item.recurrence = recurrence;
        }
    }
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn new(db_path: &str) -> GoalResult<Self> {
        let conn = Connection::open(db_path)?;
        let db = Database {
            conn: Mutex::new(conn),
        };
        db.configure()?;
        db.create_tables()?;
        Ok(db)
    }

    // Writers are serialized through this lock; a poisoned lock still guards
    // a consistent database because every batch runs in a transaction.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn configure(&self) -> GoalResult<()> {
        let conn = self.conn();
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        // Wait for another process's batch instead of failing with SQLITE_BUSY
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(())
    }

    fn create_tables(&self) -> GoalResult<()> {
        self.conn().execute_batch(
            "CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                completed_at TEXT,
                parent_id INTEGER REFERENCES items (id) ON DELETE CASCADE,
                sort_order INTEGER NOT NULL,
                notes TEXT,
                preferred_time TEXT,
                estimated_minutes INTEGER,
                recurrence TEXT NOT NULL DEFAULT 'none',
                expanded INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_items_parent_order ON items (parent_id, sort_order);",
        )?;
        Ok(())
    }

    /// Search items by regex pattern (case-insensitive) in title or notes.
    pub fn search(&self, pattern: &str) -> GoalResult<Vec<Item>> {
        if pattern.trim().is_empty() {
            return Ok(Vec::new());
        }

        // An invalid regex is treated as a literal string
        let regex = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => regex,
            Err(_) => RegexBuilder::new(&regex::escape(pattern))
                .case_insensitive(true)
                .build()?,
        };

        Ok(self
            .get_all()?
            .into_iter()
            .filter(|item| {
                regex.is_match(&item.title)
                    || item.notes.as_deref().is_some_and(|n| regex.is_match(n))
            })
            .collect())
    }

    /// Force a full checkpoint and truncate the WAL file (for app shutdown)
    pub fn checkpoint_and_close(&self) -> GoalResult<()> {
        let conn = self.conn();
        let mut stmt = conn.prepare("PRAGMA wal_checkpoint(TRUNCATE)")?;
        let _rows: Vec<rusqlite::Result<()>> = stmt.query_map([], |_| Ok(()))?.collect();
        Ok(())
    }
}

fn query_items<P: rusqlite::Params>(conn: &Connection, filter: &str, params: P) -> GoalResult<Vec<Item>> {
    let sql = format!("SELECT {} FROM items {}", ITEM_COLUMNS, filter);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, Item::from_row)?;

    let mut items = Vec::new();
    for item in rows {
        items.push(item?);
    }
    Ok(items)
}

fn fetch(conn: &Connection, id: i64) -> GoalResult<Option<Item>> {
    Ok(query_items(conn, "WHERE id = ?1", [id])?.into_iter().next())
}

fn insert_row(conn: &Connection, item: &Item) -> GoalResult<i64> {
    conn.execute(
        "INSERT INTO items (title, completed, completed_at, parent_id, sort_order, notes,
                            preferred_time, estimated_minutes, recurrence, expanded, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            item.title,
            item.completed,
            item.completed_at,
            item.parent_id,
            item.order,
            item.notes,
            item.preferred_time,
            item.estimated_minutes,
            item.recurrence,
            item.expanded,
            item.created_at
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Parent must exist and must not be the item itself or one of its descendants.
fn check_parent(conn: &Connection, item_id: i64, parent_id: Option<i64>) -> GoalResult<()> {
    let Some(parent_id) = parent_id else {
        return Ok(());
    };
    if parent_id == item_id {
        return Err(GoalError::InconsistentState(format!(
            "item {} cannot be its own parent",
            item_id
        )));
    }

    let mut current = Some(parent_id);
    let mut steps = 0;
    while let Some(id) = current {
        let ancestor = fetch(conn, id)?.ok_or(GoalError::NotFound(id))?;
        current = ancestor.parent_id;
        if current == Some(item_id) {
            return Err(GoalError::InconsistentState(format!(
                "moving item {} under {} would create a cycle",
                item_id, parent_id
            )));
        }
        steps += 1;
        if steps > 10_000 {
            return Err(GoalError::InconsistentState(format!(
                "ancestor chain of {} does not terminate",
                parent_id
            )));
        }
    }
    Ok(())
}

fn update_row(conn: &Connection, item: &Item) -> GoalResult<()> {
    check_parent(conn, item.id, item.parent_id)?;
    let changed = conn.execute(
        "UPDATE items SET title = ?1, completed = ?2, completed_at = ?3, parent_id = ?4,
                          sort_order = ?5, notes = ?6, preferred_time = ?7,
                          estimated_minutes = ?8, recurrence = ?9, expanded = ?10
         WHERE id = ?11",
        params![
            item.title,
            item.completed,
            item.completed_at,
            item.parent_id,
            item.order,
            item.notes,
            item.preferred_time,
            item.estimated_minutes,
            item.recurrence,
            item.expanded,
            item.id
        ],
    )?;
    if changed == 0 {
        return Err(GoalError::NotFound(item.id));
    }
    Ok(())
}

fn add_row(conn: &Connection, new_item: NewItem) -> GoalResult<Item> {
    check_parent(conn, 0, new_item.parent_id)?;

    // Orders may carry gaps, so append after the largest one rather than the count
    let order: i64 = conn.query_row(
        "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM items WHERE parent_id IS ?1",
        [new_item.parent_id],
        |row| row.get(0),
    )?;
    let item = Item {
        id: 0,
        title: new_item.title,
        completed: false,
        completed_at: None,
        parent_id: new_item.parent_id,
        order,
        notes: new_item.notes,
        preferred_time: new_item.preferred_time,
        estimated_minutes: new_item.estimated_minutes,
        recurrence: new_item.recurrence,
        expanded: true,
        created_at: Utc::now(),
    };
    let id = insert_row(conn, &item)?;
    Ok(Item { id, ..item })
}

fn delete_rows(conn: &Connection, id: i64) -> GoalResult<()> {
    let Some(target) = fetch(conn, id)? else {
        return Ok(());
    };

    // Breadth-first collection; deleting in reverse removes leaves first
    let mut doomed = vec![id];
    let mut next = 0;
    while next < doomed.len() {
        let parent = doomed[next];
        let mut stmt = conn.prepare("SELECT id FROM items WHERE parent_id = ?1")?;
        let children = stmt.query_map([parent], |row| row.get::<_, i64>(0))?;
        for child in children {
            doomed.push(child?);
        }
        next += 1;
    }
    for doomed_id in doomed.iter().rev() {
        conn.execute("DELETE FROM items WHERE id = ?1", [doomed_id])?;
    }

    conn.execute(
        "UPDATE items SET sort_order = sort_order - 1
         WHERE parent_id IS ?1 AND sort_order > ?2",
        params![target.parent_id, target.order],
    )?;
    Ok(())
}

/// Store operations on a connection the caller has already locked.
///
/// Writes do not open their own transaction; inside `Database::write` they
/// join the enclosing one.
struct LockedStore<'c> {
    conn: &'c Connection,
}

impl ItemStore for LockedStore<'_> {
    fn get(&self, id: i64) -> GoalResult<Option<Item>> {
        fetch(self.conn, id)
    }

    fn get_children(&self, parent_id: i64) -> GoalResult<Vec<Item>> {
        query_items(self.conn, "WHERE parent_id = ?1 ORDER BY sort_order, id", [parent_id])
    }

    fn get_roots(&self) -> GoalResult<Vec<Item>> {
        query_items(self.conn, "WHERE parent_id IS NULL ORDER BY sort_order, id", [])
    }

    fn get_all(&self) -> GoalResult<Vec<Item>> {
        query_items(self.conn, "ORDER BY parent_id, sort_order, id", [])
    }

    fn insert(&self, item: &Item) -> GoalResult<Item> {
        check_parent(self.conn, 0, item.parent_id)?;
        let id = insert_row(self.conn, item)?;
        fetch(self.conn, id)?.ok_or(GoalError::NotFound(id))
    }

    fn add(&self, new_item: NewItem) -> GoalResult<Item> {
        add_row(self.conn, new_item)
    }

    fn update(&self, item: &Item) -> GoalResult<()> {
        update_row(self.conn, item)
    }

    fn update_many(&self, items: &[Item]) -> GoalResult<()> {
        for item in items {
            update_row(self.conn, item)?;
        }
        Ok(())
    }

    fn delete_subtree(&self, id: i64) -> GoalResult<()> {
        delete_rows(self.conn, id)
    }

    fn plan_and_apply(&self, work: &mut dyn FnMut(&dyn ItemStore) -> GoalResult<Vec<Item>>) -> GoalResult<Vec<Item>> {
        let changed = work(self)?;
        self.update_many(&changed)?;
        Ok(changed)
    }
}

impl Database {
    fn read<T>(&self, f: impl FnOnce(&LockedStore<'_>) -> GoalResult<T>) -> GoalResult<T> {
        let conn = self.conn();
        f(&LockedStore { conn: &conn })
    }

    // IMMEDIATE takes the SQLite write lock up front, so another process
    // cannot slip a write between this batch's reads and its writes.
    fn write<T>(&self, f: impl FnOnce(&LockedStore<'_>) -> GoalResult<T>) -> GoalResult<T> {
        let mut conn = self.conn();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&LockedStore { conn: &tx })?;
        tx.commit()?;
        Ok(value)
    }
}

impl ItemStore for Database {
    fn get(&self, id: i64) -> GoalResult<Option<Item>> {
        self.read(|store| store.get(id))
    }

    fn get_children(&self, parent_id: i64) -> GoalResult<Vec<Item>> {
        self.read(|store| store.get_children(parent_id))
    }

    fn get_roots(&self) -> GoalResult<Vec<Item>> {
        self.read(|store| store.get_roots())
    }

    fn get_all(&self) -> GoalResult<Vec<Item>> {
        self.read(|store| store.get_all())
    }

    fn insert(&self, item: &Item) -> GoalResult<Item> {
        self.write(|store| store.insert(item))
    }

    fn add(&self, new_item: NewItem) -> GoalResult<Item> {
        self.write(|store| store.add(new_item))
    }

    fn update(&self, item: &Item) -> GoalResult<()> {
        self.write(|store| store.update(item))
    }

    fn update_many(&self, items: &[Item]) -> GoalResult<()> {
        self.write(|store| store.update_many(items))
    }

    fn delete_subtree(&self, id: i64) -> GoalResult<()> {
        self.write(|store| store.delete_subtree(id))
    }

    fn plan_and_apply(&self, work: &mut dyn FnMut(&dyn ItemStore) -> GoalResult<Vec<Item>>) -> GoalResult<Vec<Item>> {
        self.write(|store| store.plan_and_apply(work))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn orders(items: &[Item]) -> Vec<(String, i64)> {
        items.iter().map(|i| (i.title.clone(), i.order)).collect()
    }

    fn pairs(expected: &[(&str, i64)]) -> Vec<(String, i64)> {
        expected.iter().map(|(t, o)| (t.to_string(), *o)).collect()
    }

    #[test]
    fn add_appends_at_end_of_scope() {
        let db = Database::new(":memory:").unwrap();
        let a = db.add(NewItem::titled("A", None)).unwrap();
        let b = db.add(NewItem::titled("B", None)).unwrap();
        let a1 = db.add(NewItem::titled("A1", Some(a.id))).unwrap();

        assert_eq!(a.order, 0);
        assert_eq!(b.order, 1);
        assert_eq!(a1.order, 0);
        assert_eq!(orders(&db.get_roots().unwrap()), pairs(&[("A", 0), ("B", 1)]));
        assert_eq!(db.get_children(a.id).unwrap().len(), 1);
    }

    #[test]
    fn add_after_gap_uses_next_free_order() {
        let db = Database::new(":memory:").unwrap();
        db.add(NewItem::titled("A", None)).unwrap();
        let mut b = db.add(NewItem::titled("B", None)).unwrap();
        b.order = 5;
        db.update(&b).unwrap();

        let c = db.add(NewItem::titled("C", None)).unwrap();
        assert_eq!(c.order, 6);
        assert_eq!(orders(&db.get_roots().unwrap()), pairs(&[("A", 0), ("B", 5), ("C", 6)]));
    }

    #[test]
    fn insert_keeps_given_fields() {
        let db = Database::new(":memory:").unwrap();
        let template = db.add(NewItem::titled("template", None)).unwrap();
        let mut copy = template.clone();
        copy.title = "copy".into();
        copy.order = 1;
        copy.recurrence = Recurrence::Weekly;

        let stored = db.insert(&copy).unwrap();
        assert_ne!(stored.id, template.id);
        assert_eq!(stored.title, "copy");
        assert_eq!(stored.recurrence, Recurrence::Weekly);
        assert_eq!(orders(&db.get_roots().unwrap()), pairs(&[("template", 0), ("copy", 1)]));
    }

    #[test]
    fn add_under_missing_parent_fails() {
        let db = Database::new(":memory:").unwrap();
        let err = db.add(NewItem::titled("orphan", Some(42))).unwrap_err();
        assert!(matches!(err, GoalError::NotFound(42)));
        assert!(db.get_all().unwrap().is_empty());
    }

    #[test]
    fn update_unknown_item_is_not_found() {
        let db = Database::new(":memory:").unwrap();
        let mut ghost = db.add(NewItem::titled("ghost", None)).unwrap();
        ghost.id = 999;
        assert!(matches!(db.update(&ghost), Err(GoalError::NotFound(999))));
    }

    #[test]
    fn update_rejects_cycles() {
        let db = Database::new(":memory:").unwrap();
        let a = db.add(NewItem::titled("A", None)).unwrap();
        let b = db.add(NewItem::titled("B", Some(a.id))).unwrap();
        let c = db.add(NewItem::titled("C", Some(b.id))).unwrap();

        let mut moved = db.get(a.id).unwrap().unwrap();
        moved.parent_id = Some(c.id);
        assert!(matches!(db.update(&moved), Err(GoalError::InconsistentState(_))));

        moved.parent_id = Some(a.id);
        assert!(matches!(db.update(&moved), Err(GoalError::InconsistentState(_))));
        assert_eq!(db.get(a.id).unwrap().unwrap().parent_id, None);
    }

    #[test]
    fn update_many_rolls_back_on_failure() {
        let db = Database::new(":memory:").unwrap();
        let a = db.add(NewItem::titled("A", None)).unwrap();
        let b = db.add(NewItem::titled("B", None)).unwrap();

        let mut renamed = a.clone();
        renamed.title = "renamed".into();
        let mut missing = b.clone();
        missing.id = 12345;

        assert!(db.update_many(&[renamed, missing]).is_err());
        assert_eq!(db.get(a.id).unwrap().unwrap().title, "A");
    }

    #[test]
    fn delete_subtree_removes_descendants_and_closes_gap() {
        let db = Database::new(":memory:").unwrap();
        let a = db.add(NewItem::titled("A", None)).unwrap();
        let b = db.add(NewItem::titled("B", None)).unwrap();
        let c = db.add(NewItem::titled("C", None)).unwrap();
        let b1 = db.add(NewItem::titled("B1", Some(b.id))).unwrap();
        let b1a = db.add(NewItem::titled("B1a", Some(b1.id))).unwrap();
        let b1b = db.add(NewItem::titled("B1b", Some(b1.id))).unwrap();

        db.delete_subtree(b.id).unwrap();

        for id in [b.id, b1.id, b1a.id, b1b.id] {
            assert!(db.get(id).unwrap().is_none());
        }
        assert_eq!(orders(&db.get_roots().unwrap()), pairs(&[("A", 0), ("C", 1)]));
        assert_eq!(db.get(a.id).unwrap().unwrap().order, 0);
        assert_eq!(db.get(c.id).unwrap().unwrap().order, 1);
    }

    #[test]
    fn delete_unknown_id_is_a_noop() {
        let db = Database::new(":memory:").unwrap();
        db.add(NewItem::titled("A", None)).unwrap();
        db.delete_subtree(77).unwrap();
        assert_eq!(db.get_all().unwrap().len(), 1);
    }

    #[test]
    fn ancestors_walk_from_root() {
        let db = Database::new(":memory:").unwrap();
        let a = db.add(NewItem::titled("A", None)).unwrap();
        let b = db.add(NewItem::titled("B", Some(a.id))).unwrap();
        let c = db.add(NewItem::titled("C", Some(b.id))).unwrap();

        let path: Vec<i64> = db.ancestors(c.id).unwrap().iter().map(|i| i.id).collect();
        assert_eq!(path, vec![a.id, b.id]);
        assert!(db.ancestors(a.id).unwrap().is_empty());
    }

    #[test]
    fn search_matches_title_and_notes() {
        let db = Database::new(":memory:").unwrap();
        db.add(NewItem::titled("Buy groceries", None)).unwrap();
        db.add(NewItem {
            title: "Errands".into(),
            notes: Some("pick up GROCERIES list".into()),
            ..Default::default()
        })
        .unwrap();
        db.add(NewItem::titled("Run", None)).unwrap();

        assert_eq!(db.search("groceries").unwrap().len(), 2);
        assert_eq!(db.search("(unclosed").unwrap().len(), 0);
        db.add(NewItem::titled("fix (unclosed bracket", None)).unwrap();
        assert_eq!(db.search("(unclosed").unwrap().len(), 1);
        assert!(db.search("  ").unwrap().is_empty());
    }

    #[test]
    fn fields_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("goals.db");
        let path = path.to_string_lossy().to_string();

        let id = {
            let db = Database::new(&path).unwrap();
            let mut item = db
                .add(NewItem {
                    title: "Stretch".into(),
                    preferred_time: NaiveTime::from_hms_opt(7, 30, 0),
                    estimated_minutes: Some(15),
                    recurrence: Recurrence::Daily,
                    ..Default::default()
                })
                .unwrap();
            item.set_completed(true);
            db.update(&item).unwrap();
            db.checkpoint_and_close().unwrap();
            item.id
        };

        let db = Database::new(&path).unwrap();
        let item = db.get(id).unwrap().unwrap();
        assert_eq!(item.recurrence, Recurrence::Daily);
        assert_eq!(item.preferred_time, NaiveTime::from_hms_opt(7, 30, 0));
        assert_eq!(item.estimated_minutes, Some(15));
        assert!(item.completed);
        assert!(item.completed_at.is_some());
    }

    #[test]
    fn recurrence_parses_case_insensitively() {
        assert_eq!("Weekly".parse::<Recurrence>().unwrap(), Recurrence::Weekly);
        assert!("hourly".parse::<Recurrence>().is_err());
    }
}
