use crate::database::Item;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

/// One top-level entry of the current scope together with its direct children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRow {
    pub item: Item,
    pub children: Vec<Item>,
}

impl ViewRow {
    /// (completed children, total children)
    pub fn progress(&self) -> (usize, usize) {
        let done = self.children.iter().filter(|c| c.is_completed()).count();
        (done, self.children.len())
    }
}

/// Items completed on an earlier day drop out of the view; they stay in the store.
pub fn is_visible_on(item: &Item, today: NaiveDate) -> bool {
    match item.completed_at {
        Some(completed_at) => completed_at.with_timezone(&Local).date_naive() == today,
        None => true,
    }
}

/// Builds the two-level view of `current_parent`'s children.
///
/// Rows and their children are sorted by order. Grandchildren are never
/// expanded here; reaching them takes a navigation push.
pub fn build_view(all_items: &[Item], current_parent: Option<i64>, today: NaiveDate) -> Vec<ViewRow> {
    let mut children_map: HashMap<Option<i64>, Vec<&Item>> = HashMap::new();
    for item in all_items.iter().filter(|item| is_visible_on(item, today)) {
        children_map.entry(item.parent_id).or_default().push(item);
    }
    for siblings in children_map.values_mut() {
        siblings.sort_by_key(|item| (item.order, item.id));
    }

    children_map
        .get(&current_parent)
        .map(|top| {
            top.iter()
                .map(|item| ViewRow {
                    item: (*item).clone(),
                    children: children_map
                        .get(&Some(item.id))
                        .map(|children| children.iter().map(|c| (*c).clone()).collect())
                        .unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct RenderedLine {
    pub item_id: i64,
    pub depth: usize,
    pub prefix: String,
    pub display_text: String,
    pub has_children: bool,
    pub completed: bool,
}

/// Flattens view rows into selectable display lines.
pub struct TreeManager {
    pub rows: Vec<ViewRow>,
    pub rendered_lines: Vec<RenderedLine>,
    pub id_to_line: HashMap<i64, usize>,
}

impl TreeManager {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            rendered_lines: Vec::new(),
            id_to_line: HashMap::new(),
        }
    }

    pub fn rebuild(&mut self, rows: Vec<ViewRow>) {
        self.rows = rows;
        self.rendered_lines = self.render_rows();
        self.id_to_line = self
            .rendered_lines
            .iter()
            .enumerate()
            .map(|(idx, line)| (line.item_id, idx))
            .collect();
    }

    fn render_rows(&self) -> Vec<RenderedLine> {
        let mut lines = Vec::new();

        for row in &self.rows {
            let has_children = !row.children.is_empty();
            let expansion_indicator = if has_children {
                if row.item.expanded { "▼ " } else { "▶ " }
            } else {
                ""
            };
            let progress = if has_children {
                let (done, total) = row.progress();
                format!(" ({}/{})", done, total)
            } else {
                String::new()
            };

            lines.push(RenderedLine {
                item_id: row.item.id,
                depth: 0,
                prefix: String::new(),
                display_text: format!(
                    "{} {}{}{}",
                    status_icon(&row.item),
                    expansion_indicator,
                    row.item.title,
                    progress
                ),
                has_children,
                completed: row.item.is_completed(),
            });

            if has_children && row.item.expanded {
                for (i, child) in row.children.iter().enumerate() {
                    let is_last = i == row.children.len() - 1;
                    lines.push(RenderedLine {
                        item_id: child.id,
                        depth: 1,
                        prefix: if is_last { "└── " } else { "├── " }.to_string(),
                        display_text: format!("{} {}", status_icon(child), child.title),
                        has_children: false,
                        completed: child.is_completed(),
                    });
                }
            }
        }

        lines
    }

    pub fn get_rendered_lines(&self) -> &Vec<RenderedLine> {
        &self.rendered_lines
    }

    pub fn get_line_index_for_item(&self, item_id: i64) -> Option<usize> {
        self.id_to_line.get(&item_id).copied()
    }

    pub fn get_item_by_id(&self, id: i64) -> Option<&Item> {
        self.rows.iter().find_map(|row| {
            if row.item.id == id {
                Some(&row.item)
            } else {
                row.children.iter().find(|c| c.id == id)
            }
        })
    }
}

fn status_icon(item: &Item) -> &'static str {
    if item.is_completed() { "[✓]" } else { "[ ]" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Recurrence;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn item(id: i64, parent_id: Option<i64>, order: i64) -> Item {
        Item {
            id,
            title: format!("item-{}", id),
            completed: false,
            completed_at: None,
            parent_id,
            order,
            notes: None,
            preferred_time: None,
            estimated_minutes: None,
            recurrence: Recurrence::None,
            expanded: true,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn ids(items: &[Item]) -> Vec<i64> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn rows_follow_scope_and_order() {
        let items = vec![
            item(1, None, 1),
            item(2, None, 0),
            item(3, Some(1), 1),
            item(4, Some(1), 0),
            item(5, Some(4), 0),
        ];
        let today = Local::now().date_naive();

        let root = build_view(&items, None, today);
        assert_eq!(root.iter().map(|r| r.item.id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(ids(&root[1].children), vec![4, 3]);
        assert!(root[0].children.is_empty());

        let scoped = build_view(&items, Some(1), today);
        assert_eq!(scoped.iter().map(|r| r.item.id).collect::<Vec<_>>(), vec![4, 3]);
        assert_eq!(ids(&scoped[0].children), vec![5]);

        assert!(build_view(&items, Some(99), today).is_empty());
    }

    #[test]
    fn items_completed_before_today_are_hidden() {
        let today = Local::now().date_naive();
        let mut old = item(1, None, 0);
        old.completed = true;
        old.completed_at = Some(Utc::now() - Duration::days(2));
        let mut fresh = item(2, None, 1);
        fresh.set_completed(true);
        let mut old_child = item(3, Some(2), 0);
        old_child.completed = true;
        old_child.completed_at = Some(Utc::now() - Duration::days(3));

        let view = build_view(&[old, fresh, old_child], None, today);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].item.id, 2);
        assert!(view[0].children.is_empty());
    }

    #[test]
    fn rendered_lines_respect_expansion() {
        let mut parent = item(1, None, 0);
        let mut done = item(2, Some(1), 0);
        done.set_completed(true);
        let rows = vec![ViewRow {
            item: parent.clone(),
            children: vec![done, item(3, Some(1), 1)],
        }];

        let mut manager = TreeManager::new();
        manager.rebuild(rows);
        let lines = manager.get_rendered_lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].display_text, "[ ] ▼ item-1 (1/2)");
        assert_eq!(lines[1].prefix, "├── ");
        assert_eq!(lines[2].prefix, "└── ");
        assert_eq!(manager.get_line_index_for_item(3), Some(2));
        assert_eq!(manager.get_item_by_id(2).map(|i| i.id), Some(2));

        parent.expanded = false;
        manager.rebuild(vec![ViewRow {
            item: parent,
            children: vec![item(3, Some(1), 0)],
        }]);
        assert_eq!(manager.get_rendered_lines().len(), 1);
        assert_eq!(manager.get_line_index_for_item(3), None);
    }
}
