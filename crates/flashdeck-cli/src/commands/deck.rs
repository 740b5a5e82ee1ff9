use chrono::Utc;
use clap::Subcommand;
use flashdeck_core::storage::Database;

#[derive(Subcommand)]
pub enum DeckAction {
    /// Create a new deck
    Create {
        /// Deck name
        name: String,
    },
    /// List decks with card and due counts
    List,
}

pub fn run(action: DeckAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        DeckAction::Create { name } => {
            let id = db.create_deck(&name)?;
            println!("{}", serde_json::json!({ "id": id, "name": name.trim() }));
        }
        DeckAction::List => {
            let decks = db.list_decks(Utc::now())?;
            println!("{}", serde_json::to_string_pretty(&decks)?);
        }
    }
    Ok(())
}
