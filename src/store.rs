use crate::database::{Item, NewItem};
use crate::error::GoalResult;

/// Repository over the item hierarchy.
///
/// Every write method is atomic: either all rows change or none do, and a
/// reader never sees a sibling group with duplicated or gapped orders.
pub trait ItemStore {
    fn get(&self, id: i64) -> GoalResult<Option<Item>>;

    /// Direct children of `parent_id`, sorted by order.
    fn get_children(&self, parent_id: i64) -> GoalResult<Vec<Item>>;

    /// Top-level items, sorted by order.
    fn get_roots(&self) -> GoalResult<Vec<Item>>;

    fn get_all(&self) -> GoalResult<Vec<Item>>;

    /// Inserts a fully specified item (id assigned by the store).
    fn insert(&self, item: &Item) -> GoalResult<Item>;

    /// Appends a new item at the end of its parent's sibling list.
    fn add(&self, new_item: NewItem) -> GoalResult<Item>;

    /// Fails with `NotFound` when the id is unknown.
    fn update(&self, item: &Item) -> GoalResult<()>;

    /// All-or-nothing batch update.
    fn update_many(&self, items: &[Item]) -> GoalResult<()>;

    /// Deletes `id` and all of its descendants. Unknown ids are a no-op.
    fn delete_subtree(&self, id: i64) -> GoalResult<()>;

    /// Runs `work` against a consistent view of the store and writes the items
    /// it returns in the same batch. No other writer, in this process or
    /// another, can change the store between the reads and the write.
    fn plan_and_apply(&self, work: &mut dyn FnMut(&dyn ItemStore) -> GoalResult<Vec<Item>>) -> GoalResult<Vec<Item>>;

    /// Siblings of a parent scope; `None` means the root group.
    fn get_siblings(&self, parent_id: Option<i64>) -> GoalResult<Vec<Item>> {
        match parent_id {
            Some(id) => self.get_children(id),
            None => self.get_roots(),
        }
    }

    /// Path from the root down to the item's parent (the item itself excluded).
    fn ancestors(&self, id: i64) -> GoalResult<Vec<Item>> {
        let mut path = Vec::new();
        let mut current = self.get(id)?.and_then(|item| item.parent_id);
        while let Some(parent_id) = current {
            match self.get(parent_id)? {
                Some(parent) => {
                    if path.iter().any(|p: &Item| p.id == parent.id) {
                        break;
                    }
                    current = parent.parent_id;
                    path.push(parent);
                }
                None => break,
            }
        }
        path.reverse();
        Ok(path)
    }
}
