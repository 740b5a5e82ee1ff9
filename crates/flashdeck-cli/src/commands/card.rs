use clap::Subcommand;
use flashdeck_core::storage::Database;

#[derive(Subcommand)]
pub enum CardAction {
    /// Append a card to a deck
    Add {
        /// Deck ID
        #[arg(long)]
        deck: i64,
        /// Question side
        question: String,
        /// Answer side
        answer: String,
    },
    /// List the cards of a deck in review order
    List {
        /// Deck ID
        #[arg(long)]
        deck: i64,
    },
}

pub fn run(action: CardAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        CardAction::Add {
            deck,
            question,
            answer,
        } => {
            let id = db.add_card(deck, &question, &answer)?;
            let card = db.card(id)?;
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        CardAction::List { deck } => {
            let cards = db.cards_in_deck(deck)?;
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
    }
    Ok(())
}
