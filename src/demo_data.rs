use crate::database::{Database, ItemEdit, NewItem, Recurrence};
use crate::session::GoalSession;
use chrono::NaiveTime;

pub struct DemoDataGenerator {
    session: GoalSession<Database>,
}

impl DemoDataGenerator {
    pub fn new(db: Database) -> Self {
        Self {
            session: GoalSession::new(db),
        }
    }

    pub fn populate_demo_data(mut self) -> anyhow::Result<()> {
        println!("Creating demo goals...");

        self.create_tree(
            "Run a half marathon",
            &[
                ("Build base mileage", vec!["Three easy runs a week", "Long run on Sundays"]),
                ("Buy proper shoes", vec![]),
                ("Register for the race", vec!["Pick a spring race", "Book travel"]),
            ],
        )?;
        self.create_tree(
            "Learn Rust",
            &[
                ("Read the book", vec!["Ownership chapter", "Traits chapter"]),
                ("Write a CLI tool", vec!["Argument parsing with clap", "Store data in SQLite"]),
            ],
        )?;
        self.create_tree(
            "Groceries",
            &[("Produce", vec!["Apples", "Spinach"]), ("Dairy", vec!["Milk"])],
        )?;

        let stretch = self.session.add(NewItem {
            title: "Morning stretch".to_string(),
            preferred_time: NaiveTime::from_hms_opt(7, 0, 0),
            estimated_minutes: Some(10),
            recurrence: Recurrence::Daily,
            ..Default::default()
        })?;
        self.session.edit(
            stretch.id,
            ItemEdit {
                notes: Some(Some("Hamstrings, hips, shoulders".to_string())),
                ..Default::default()
            },
        )?;
        self.session.toggle_complete(stretch.id)?;

        self.session.store().checkpoint_and_close()?;
        println!("Demo data written. Open it with: goaldb --db demo_goals.db");
        Ok(())
    }

    fn create_tree(&mut self, title: &str, branches: &[(&str, Vec<&str>)]) -> anyhow::Result<()> {
        let root = self.session.add(NewItem::titled(title, None))?;
        for (branch, leaves) in branches {
            let branch = self.session.add(NewItem::titled(*branch, Some(root.id)))?;
            for leaf in leaves {
                self.session.add(NewItem::titled(*leaf, Some(branch.id)))?;
            }
        }
        Ok(())
    }
}
