use crate::database::{Database, NewItem};
use crate::reorder::MoveDirection;
use crate::session::GoalSession;
use crate::store::ItemStore;
use crate::tree::TreeManager;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "goaldb", about = "Hierarchical goals and todos in a SQLite file", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Database file (defaults to ~/.local/share/goaldb/goals.db)
    #[arg(long, global = true, env = "GOALDB_PATH")]
    pub db: Option<PathBuf>,

    /// Write a demo database (demo_goals.db) in the current directory and exit
    #[arg(long)]
    pub demo: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a goal at the end of a scope
    Add {
        title: String,
        /// Parent goal id (top level when omitted)
        #[arg(long)]
        parent: Option<i64>,
    },
    /// Show a scope with its direct children
    List {
        #[arg(long)]
        parent: Option<i64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search titles and notes by regex
    Find {
        pattern: String,
        #[arg(long)]
        json: bool,
    },
    /// Mark a goal completed
    Done { id: i64 },
    /// Move a goal among its siblings or across levels
    Mv { id: i64, direction: MoveArg },
    /// Delete a goal and everything under it
    Rm { id: i64 },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MoveArg {
    Up,
    Down,
    Promote,
    Demote,
}

impl From<MoveArg> for MoveDirection {
    fn from(arg: MoveArg) -> Self {
        match arg {
            MoveArg::Up => MoveDirection::SiblingUp,
            MoveArg::Down => MoveDirection::SiblingDown,
            MoveArg::Promote => MoveDirection::PromoteToParentLevel,
            MoveArg::Demote => MoveDirection::DemoteUnderPrecedingSibling,
        }
    }
}

pub fn dispatch(command: Commands, database: Database) -> anyhow::Result<()> {
    let mut session = GoalSession::new(database);

    match command {
        Commands::Add { title, parent } => {
            let item = session.add(NewItem::titled(title, parent))?;
            println!("Added {} at position {}", item.id, item.order);
        }
        Commands::List { parent, json } => {
            session.focus_on(parent)?;
            let snapshot = session.snapshot()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                let trail: Vec<&str> = snapshot.trail.iter().map(|i| i.title.as_str()).collect();
                println!("Root{}", trail.iter().map(|t| format!(" › {}", t)).collect::<String>());
                let mut tree = TreeManager::new();
                tree.rebuild(snapshot.rows);
                for line in tree.get_rendered_lines() {
                    println!("{:>5} {}{}", line.item_id, line.prefix, line.display_text);
                }
            }
        }
        Commands::Find { pattern, json } => {
            let matches = session.store().search(&pattern)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else {
                for item in &matches {
                    let status = if item.is_completed() { "[✓]" } else { "[ ]" };
                    println!("{:>5} {} {}", item.id, status, item.title);
                }
            }
        }
        Commands::Done { id } => {
            let item = session
                .store()
                .get(id)?
                .ok_or_else(|| anyhow::anyhow!("item {} not found", id))?;
            if item.is_completed() {
                println!("{} is already completed", id);
            } else {
                session.toggle_complete(id)?;
                println!("Completed {}", id);
            }
        }
        Commands::Mv { id, direction } => {
            let item = session
                .store()
                .get(id)?
                .ok_or_else(|| anyhow::anyhow!("item {} not found", id))?;
            session.focus_on(item.parent_id)?;
            let changed = session.reorder(id, direction.into())?;
            println!("Moved {} ({} rows updated)", id, changed.len());
        }
        Commands::Rm { id } => {
            session.delete(id)?;
            println!("Deleted {}", id);
        }
    }

    session.store().checkpoint_and_close()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_move_arguments() {
        let cli = Cli::try_parse_from(["goaldb", "--db", "x.db", "mv", "4", "demote"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        match cli.command {
            Some(Commands::Mv { id, direction }) => {
                assert_eq!(id, 4);
                assert_eq!(
                    MoveDirection::from(direction),
                    MoveDirection::DemoteUnderPrecedingSibling
                );
            }
            _ => panic!("expected mv"),
        }
    }

    #[test]
    fn mv_reorders_within_the_items_own_scope() {
        let database = Database::new(":memory:").unwrap();
        let a = database.add(NewItem::titled("A", None)).unwrap();
        let a1 = database.add(NewItem::titled("A1", Some(a.id))).unwrap();
        let a2 = database.add(NewItem::titled("A2", Some(a.id))).unwrap();

        let mut session = GoalSession::new(database);
        session.focus_on(Some(a.id)).unwrap();
        session.reorder(a2.id, MoveArg::Up.into()).unwrap();

        let children = session.store().get_children(a.id).unwrap();
        assert_eq!(children.iter().map(|c| c.id).collect::<Vec<_>>(), vec![a2.id, a1.id]);
    }
}
