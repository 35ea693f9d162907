use crate::breadcrumb::BreadcrumbTrail;
use crate::database::{Item, ItemEdit, NewItem};
use crate::error::{GoalError, GoalResult};
use crate::reorder::{MoveDirection, ReorderEngine};
use crate::store::ItemStore;
use crate::tree::{build_view, ViewRow};
use chrono::Local;
use serde::Serialize;
use std::collections::HashMap;

/// What a presentation layer renders: the trail and the current scope's view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub scope: Option<i64>,
    pub trail: Vec<Item>,
    pub rows: Vec<ViewRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

type Subscriber = Box<dyn FnMut(&Snapshot)>;

/// One user session over a store: owns the breadcrumb trail and the
/// subscribers, and runs every mutation as a single store batch.
pub struct GoalSession<S: ItemStore> {
    store: S,
    trail: BreadcrumbTrail,
    subscribers: Vec<(SubscriptionHandle, Subscriber)>,
    next_handle: u64,
}

impl<S: ItemStore> GoalSession<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            trail: BreadcrumbTrail::new(),
            subscribers: Vec::new(),
            next_handle: 0,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn trail(&self) -> &BreadcrumbTrail {
        &self.trail
    }

    pub fn scope(&self) -> Option<i64> {
        self.trail.current_parent_id()
    }

    pub fn view(&self) -> GoalResult<Vec<ViewRow>> {
        let all = self.store.get_all()?;
        Ok(build_view(&all, self.scope(), Local::now().date_naive()))
    }

    pub fn snapshot(&self) -> GoalResult<Snapshot> {
        Ok(Snapshot {
            scope: self.scope(),
            trail: self.trail.items().to_vec(),
            rows: self.view()?,
        })
    }

    /// Registers a callback invoked with a fresh snapshot after every change.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionHandle
    where
        F: FnMut(&Snapshot) + 'static,
    {
        let handle = SubscriptionHandle(self.next_handle);
        self.next_handle += 1;
        self.subscribers.push((handle, Box::new(callback)));
        handle
    }

    /// Drops the callback; returns false if the handle was already released.
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(h, _)| *h != handle);
        self.subscribers.len() != before
    }

    fn notify(&mut self) -> GoalResult<()> {
        if self.subscribers.is_empty() {
            return Ok(());
        }
        let snapshot = self.snapshot()?;
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&snapshot);
        }
        Ok(())
    }

    fn after_mutation(&mut self) -> GoalResult<()> {
        let mut fresh = HashMap::new();
        for entry in self.trail.items() {
            if let Some(item) = self.store.get(entry.id)? {
                fresh.insert(item.id, item);
            }
        }
        self.trail.reconcile(|id| fresh.remove(&id));
        self.notify()
    }

    fn require(&self, id: i64) -> GoalResult<Item> {
        self.store.get(id)?.ok_or(GoalError::NotFound(id))
    }

    // Navigation

    /// Drills into `id`, making its children the current view.
    pub fn enter(&mut self, id: i64) -> GoalResult<()> {
        let item = self.require(id)?;
        let parent = match item.parent_id {
            Some(parent_id) => Some(self.store.get(parent_id)?.ok_or_else(|| {
                GoalError::InconsistentState(format!("parent {} of item {} is missing", parent_id, id))
            })?),
            None => None,
        };
        self.trail.push(&item, parent.as_ref());
        tracing::debug!(item = id, depth = self.trail.len(), "entered scope");
        self.notify()
    }

    pub fn go_back(&mut self) -> GoalResult<Option<Item>> {
        let popped = self.trail.pop();
        if popped.is_some() {
            self.notify()?;
        }
        Ok(popped)
    }

    pub fn go_to_root(&mut self) -> GoalResult<()> {
        self.trail.clear();
        self.notify()
    }

    pub fn go_to_breadcrumb(&mut self, index: usize) -> GoalResult<()> {
        let items = self.trail.items();
        let item = items
            .get(index)
            .cloned()
            .ok_or_else(|| GoalError::NoDestination(format!("no breadcrumb at position {}", index)))?;
        let parent = index.checked_sub(1).and_then(|i| items.get(i)).cloned();
        self.trail.push(&item, parent.as_ref());
        self.notify()
    }

    /// Rebuilds the trail as the full ancestor path ending at `scope`.
    pub fn focus_on(&mut self, scope: Option<i64>) -> GoalResult<()> {
        match scope {
            Some(id) => {
                let item = self.require(id)?;
                let mut path = self.store.ancestors(id)?;
                path.push(item);
                self.trail.replace(path);
            }
            None => self.trail.clear(),
        }
        self.notify()
    }

    // Mutations

    /// Appends a titled item to the end of the current scope.
    pub fn add_item(&mut self, title: &str) -> GoalResult<Item> {
        self.add(NewItem::titled(title.trim(), self.scope()))
    }

    pub fn add(&mut self, new_item: NewItem) -> GoalResult<Item> {
        if new_item.title.trim().is_empty() {
            return Err(GoalError::NoDestination("title cannot be empty".to_string()));
        }
        let item = self.store.add(new_item)?;
        tracing::info!(item = item.id, parent = ?item.parent_id, order = item.order, "item created");
        self.after_mutation()?;
        Ok(item)
    }

    pub fn reorder(&mut self, id: i64, direction: MoveDirection) -> GoalResult<Vec<Item>> {
        let rows = self.view()?;
        let result = ReorderEngine::new(&self.store).apply(&rows, self.scope(), id, direction);
        match result {
            Ok(changed) => {
                self.after_mutation()?;
                Ok(changed)
            }
            Err(e) => {
                if e.is_declined() {
                    tracing::warn!(item = id, %direction, error = %e, "reorder declined");
                }
                Err(e)
            }
        }
    }

    pub fn toggle_complete(&mut self, id: i64) -> GoalResult<Item> {
        let mut item = self.require(id)?;
        item.set_completed(!item.is_completed());
        self.store.update(&item)?;
        self.after_mutation()?;
        Ok(item)
    }

    pub fn toggle_expanded(&mut self, id: i64) -> GoalResult<Item> {
        let mut item = self.require(id)?;
        item.expanded = !item.expanded;
        self.store.update(&item)?;
        self.after_mutation()?;
        Ok(item)
    }

    pub fn edit(&mut self, id: i64, edit: ItemEdit) -> GoalResult<Item> {
        let mut item = self.require(id)?;
        edit.apply(&mut item);
        if item.title.trim().is_empty() {
            return Err(GoalError::NoDestination("title cannot be empty".to_string()));
        }
        self.store.update(&item)?;
        self.after_mutation()?;
        Ok(item)
    }

    /// Deletes the item with its whole subtree; unknown ids are ignored.
    pub fn delete(&mut self, id: i64) -> GoalResult<()> {
        self.store.delete_subtree(id)?;
        tracing::info!(item = id, "subtree deleted");
        self.after_mutation()
    }
}
