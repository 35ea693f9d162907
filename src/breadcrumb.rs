use crate::database::Item;

/// Drill-down path of scopes the user has entered, in click order.
///
/// The last entry is the current parent scope. Re-entering a scope that is
/// already on the trail truncates back to it instead of duplicating it.
#[derive(Debug, Clone, Default)]
pub struct BreadcrumbTrail {
    trail: Vec<Item>,
}

impl BreadcrumbTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters `item`, reached from `parent`.
    ///
    /// Checks run in this order: no parent resets the trail; `item` already on
    /// the trail truncates to it; `parent` on the trail truncates to it and
    /// appends `item`; otherwise both are appended.
    pub fn push(&mut self, item: &Item, parent: Option<&Item>) {
        let Some(parent) = parent else {
            self.trail = vec![item.clone()];
            return;
        };

        if let Some(pos) = self.position(item.id) {
            self.trail.truncate(pos + 1);
            self.trail[pos] = item.clone();
        } else if let Some(pos) = self.position(parent.id) {
            self.trail.truncate(pos + 1);
            self.trail.push(item.clone());
        } else {
            self.trail.push(parent.clone());
            self.trail.push(item.clone());
        }
    }

    pub fn pop(&mut self) -> Option<Item> {
        self.trail.pop()
    }

    pub fn clear(&mut self) {
        self.trail.clear();
    }

    pub fn top(&self) -> Option<&Item> {
        self.trail.last()
    }

    pub fn current_parent_id(&self) -> Option<i64> {
        self.top().map(|item| item.id)
    }

    pub fn items(&self) -> &[Item] {
        &self.trail
    }

    pub fn len(&self) -> usize {
        self.trail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trail.is_empty()
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.trail.iter().position(|entry| entry.id == id)
    }

    /// Replaces the whole trail, e.g. with an item's ancestor path.
    pub fn replace(&mut self, path: Vec<Item>) {
        self.trail = path;
    }

    /// Refreshes entries from `lookup`, cutting the trail at the first entry
    /// that no longer resolves or no longer descends from its predecessor.
    pub fn reconcile<F>(&mut self, mut lookup: F)
    where
        F: FnMut(i64) -> Option<Item>,
    {
        let mut kept: Vec<Item> = Vec::with_capacity(self.trail.len());
        for entry in &self.trail {
            let Some(fresh) = lookup(entry.id) else {
                break;
            };
            if let Some(prev) = kept.last() {
                if fresh.parent_id != Some(prev.id) {
                    break;
                }
            }
            kept.push(fresh);
        }
        self.trail = kept;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Recurrence;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn item(id: i64, title: &str, parent_id: Option<i64>) -> Item {
        Item {
            id,
            title: title.to_string(),
            completed: false,
            completed_at: None,
            parent_id,
            order: 0,
            notes: None,
            preferred_time: None,
            estimated_minutes: None,
            recurrence: Recurrence::None,
            expanded: true,
            created_at: Utc::now(),
        }
    }

    fn titles(trail: &BreadcrumbTrail) -> Vec<&str> {
        trail.items().iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn reclicking_root_breadcrumb_truncates() {
        let groceries = item(1, "Groceries", None);
        let produce = item(2, "Produce", Some(1));
        let mut trail = BreadcrumbTrail::new();

        trail.push(&groceries, None);
        trail.push(&produce, Some(&groceries));
        assert_eq!(titles(&trail), vec!["Groceries", "Produce"]);

        trail.push(&groceries, None);
        assert_eq!(titles(&trail), vec!["Groceries"]);
    }

    #[test]
    fn item_on_trail_wins_over_parent() {
        let a = item(1, "A", None);
        let b = item(2, "B", Some(1));
        let c = item(3, "C", Some(2));
        let mut trail = BreadcrumbTrail::new();
        trail.push(&a, None);
        trail.push(&b, Some(&a));
        trail.push(&c, Some(&b));

        trail.push(&b, Some(&a));
        assert_eq!(titles(&trail), vec!["A", "B"]);
    }

    #[test]
    fn parent_on_trail_truncates_then_appends() {
        let a = item(1, "A", None);
        let b = item(2, "B", Some(1));
        let c = item(3, "C", Some(2));
        let d = item(4, "D", Some(1));
        let mut trail = BreadcrumbTrail::new();
        trail.push(&a, None);
        trail.push(&b, Some(&a));
        trail.push(&c, Some(&b));

        trail.push(&d, Some(&a));
        assert_eq!(titles(&trail), vec!["A", "D"]);
    }

    #[test]
    fn unseen_parent_is_appended_with_item() {
        let a = item(1, "A", None);
        let b = item(2, "B", Some(1));
        let c = item(3, "C", Some(2));
        let mut trail = BreadcrumbTrail::new();
        trail.push(&a, None);

        trail.push(&c, Some(&b));
        assert_eq!(titles(&trail), vec!["A", "B", "C"]);
        assert_eq!(trail.current_parent_id(), Some(3));
    }

    #[test]
    fn pop_and_clear() {
        let a = item(1, "A", None);
        let mut trail = BreadcrumbTrail::new();
        assert!(trail.pop().is_none());
        assert!(trail.top().is_none());

        trail.push(&a, None);
        assert_eq!(trail.pop().map(|i| i.id), Some(1));
        assert!(trail.is_empty());

        trail.push(&a, None);
        trail.clear();
        assert_eq!(trail.len(), 0);
    }

    #[test]
    fn reconcile_drops_deleted_and_refreshes_titles() {
        let a = item(1, "A", None);
        let b = item(2, "B", Some(1));
        let c = item(3, "C", Some(2));
        let mut trail = BreadcrumbTrail::new();
        trail.push(&a, None);
        trail.push(&b, Some(&a));
        trail.push(&c, Some(&b));

        trail.reconcile(|id| match id {
            1 => Some(item(1, "A renamed", None)),
            3 => Some(c.clone()),
            _ => None,
        });
        assert_eq!(titles(&trail), vec!["A renamed"]);
    }
}
