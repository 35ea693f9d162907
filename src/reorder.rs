use crate::database::Item;
use crate::error::{GoalError, GoalResult};
use crate::store::ItemStore;
use crate::tree::ViewRow;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoveDirection {
    SiblingUp,
    SiblingDown,
    PromoteToParentLevel,
    DemoteUnderPrecedingSibling,
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoveDirection::SiblingUp => "up",
            MoveDirection::SiblingDown => "down",
            MoveDirection::PromoteToParentLevel => "promote",
            MoveDirection::DemoteUnderPrecedingSibling => "demote",
        };
        f.write_str(name)
    }
}

/// The visible sibling list holding a target item.
#[derive(Debug, Clone)]
pub struct SiblingContext {
    pub parent_id: Option<i64>,
    pub siblings: Vec<Item>,
    pub index: usize,
}

impl SiblingContext {
    pub fn target(&self) -> &Item {
        &self.siblings[self.index]
    }
}

/// Finds the target among the visible rows of `scope`, then among each row's
/// children. Items outside the visible view are not considered.
pub fn locate(rows: &[ViewRow], scope: Option<i64>, target_id: i64) -> GoalResult<SiblingContext> {
    if let Some(index) = rows.iter().position(|row| row.item.id == target_id) {
        return Ok(SiblingContext {
            parent_id: scope,
            siblings: rows.iter().map(|row| row.item.clone()).collect(),
            index,
        });
    }

    for row in rows {
        if let Some(index) = row.children.iter().position(|c| c.id == target_id) {
            return Ok(SiblingContext {
                parent_id: Some(row.item.id),
                siblings: row.children.clone(),
                index,
            });
        }
    }

    Err(GoalError::NotFound(target_id))
}

/// Computes and commits hierarchy moves.
///
/// Planning reads the store and produces the full set of changed items;
/// applying writes that set as one batch, so a failed move changes nothing.
pub struct ReorderEngine<'a, S: ItemStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ItemStore + ?Sized> ReorderEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Plans and writes the move in one store batch, so the orders it reads
    /// cannot go stale before the write.
    pub fn apply(
        &self,
        rows: &[ViewRow],
        scope: Option<i64>,
        target_id: i64,
        direction: MoveDirection,
    ) -> GoalResult<Vec<Item>> {
        let changed = self.store.plan_and_apply(&mut |store: &dyn ItemStore| {
            ReorderEngine::new(store).plan(rows, scope, target_id, direction)
        })?;
        tracing::info!(item = target_id, %direction, rows = changed.len(), "reorder committed");
        Ok(changed)
    }

    pub fn plan(
        &self,
        rows: &[ViewRow],
        scope: Option<i64>,
        target_id: i64,
        direction: MoveDirection,
    ) -> GoalResult<Vec<Item>> {
        let ctx = locate(rows, scope, target_id)?;
        match direction {
            MoveDirection::SiblingUp => self.swap_with(&ctx, -1),
            MoveDirection::SiblingDown => self.swap_with(&ctx, 1),
            MoveDirection::DemoteUnderPrecedingSibling => self.demote(&ctx),
            MoveDirection::PromoteToParentLevel => self.promote(&ctx),
        }
    }

    fn stored(&self, id: i64) -> GoalResult<Item> {
        self.store.get(id)?.ok_or(GoalError::NotFound(id))
    }

    /// Reads `id` and checks it still sits in the list it was displayed in.
    fn stored_in(&self, ctx: &SiblingContext, id: i64) -> GoalResult<Item> {
        let item = self.stored(id)?;
        if item.parent_id != ctx.parent_id {
            return Err(GoalError::InconsistentState(format!(
                "item {} is displayed under {:?} but stored under {:?}",
                item.id, ctx.parent_id, item.parent_id
            )));
        }
        Ok(item)
    }

    fn swap_with(&self, ctx: &SiblingContext, step: isize) -> GoalResult<Vec<Item>> {
        let neighbor_index = ctx
            .index
            .checked_add_signed(step)
            .filter(|&i| i < ctx.siblings.len())
            .ok_or_else(|| {
                GoalError::NoDestination(format!(
                    "item {} is already {} in its list",
                    ctx.target().id,
                    if step < 0 { "first" } else { "last" }
                ))
            })?;

        let mut target = self.stored_in(ctx, ctx.target().id)?;
        let mut neighbor = self.stored_in(ctx, ctx.siblings[neighbor_index].id)?;
        std::mem::swap(&mut target.order, &mut neighbor.order);
        Ok(vec![target, neighbor])
    }

    fn demote(&self, ctx: &SiblingContext) -> GoalResult<Vec<Item>> {
        if ctx.index == 0 {
            return Err(GoalError::NoDestination(format!(
                "item {} has no preceding sibling",
                ctx.target().id
            )));
        }
        let new_parent = self.stored_in(ctx, ctx.siblings[ctx.index - 1].id)?;
        let mut target = self.stored_in(ctx, ctx.target().id)?;

        let old_order = target.order;
        let new_order = self
            .store
            .get_children(new_parent.id)?
            .iter()
            .map(|child| child.order + 1)
            .max()
            .unwrap_or(0);

        let mut changed = Vec::new();
        for mut sibling in self.store.get_siblings(ctx.parent_id)? {
            if sibling.id != target.id && sibling.order > old_order {
                sibling.order -= 1;
                changed.push(sibling);
            }
        }
        target.parent_id = Some(new_parent.id);
        target.order = new_order;
        changed.insert(0, target);
        Ok(changed)
    }

    fn promote(&self, ctx: &SiblingContext) -> GoalResult<Vec<Item>> {
        let Some(old_parent_id) = ctx.parent_id else {
            return Err(GoalError::NoDestination(format!(
                "item {} is already top-level",
                ctx.target().id
            )));
        };
        let old_parent = self.store.get(old_parent_id)?.ok_or_else(|| {
            GoalError::InconsistentState(format!("parent {} of item {} is missing", old_parent_id, ctx.target().id))
        })?;
        if let Some(grandparent_id) = old_parent.parent_id {
            if self.store.get(grandparent_id)?.is_none() {
                return Err(GoalError::InconsistentState(format!(
                    "grandparent {} of item {} is missing",
                    grandparent_id,
                    ctx.target().id
                )));
            }
        }

        let mut target = self.stored_in(ctx, ctx.target().id)?;
        let old_order = target.order;
        let mut changed = Vec::new();

        for mut item in self.store.get_siblings(old_parent.parent_id)? {
            if item.order > old_parent.order {
                item.order += 1;
                changed.push(item);
            }
        }
        for mut child in self.store.get_children(old_parent.id)? {
            if child.id != target.id && child.order > old_order {
                child.order -= 1;
                changed.push(child);
            }
        }

        target.parent_id = old_parent.parent_id;
        target.order = old_parent.order + 1;
        changed.insert(0, target);
        Ok(changed)
    }
}
