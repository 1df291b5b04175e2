use std::collections::BTreeMap;

use tokio::sync::RwLock;
use tracing::debug;

/// Auto-incremented primary key. The first row of a table gets id 1.
pub type RecordId = i64;

struct TableState<T> {
    next_id: RecordId,
    rows: BTreeMap<RecordId, T>,
}

/// In-memory table keyed by an auto-incremented id.
///
/// Every operation takes the table lock once, so a single call is atomic with
/// respect to other calls on the same table. Rows are returned as clones.
pub struct MemoryTable<T> {
    name: &'static str,
    state: RwLock<TableState<T>>,
}

impl<T: Clone> MemoryTable<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: RwLock::new(TableState {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    /// Allocate the next id and store the row built from it.
    pub async fn insert_with<F>(&self, build: F) -> T
    where
        F: FnOnce(RecordId) -> T,
    {
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;

        let row = build(id);
        state.rows.insert(id, row.clone());
        debug!("Inserted row {} into {}", id, self.name);

        row
    }

    pub async fn get(&self, id: RecordId) -> Option<T> {
        self.state.read().await.rows.get(&id).cloned()
    }

    /// All rows in id order.
    pub async fn all(&self) -> Vec<T> {
        self.state.read().await.rows.values().cloned().collect()
    }

    pub async fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.state
            .read()
            .await
            .rows
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    /// Apply `change` to the row in place. Returns the updated row, or `None`
    /// when no row has that id.
    pub async fn update<F>(&self, id: RecordId, change: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut state = self.state.write().await;
        let row = state.rows.get_mut(&id)?;
        change(row);
        debug!("Updated row {} in {}", id, self.name);

        Some(row.clone())
    }

    pub async fn remove(&self, id: RecordId) -> Option<T> {
        let removed = self.state.write().await.rows.remove(&id);
        if removed.is_some() {
            debug!("Removed row {} from {}", id, self.name);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
