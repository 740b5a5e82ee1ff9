use chrono::Utc;
use clap::Subcommand;
use flashdeck_core::storage::Database;
use flashdeck_core::{previous_reviews, upcoming_reviews};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Cards due per day over the next 30 days
    Upcoming {
        /// Restrict to one deck
        #[arg(long)]
        deck: Option<i64>,
    },
    /// Cards reviewed per day over the last 30 days
    Previous {
        /// Restrict to one deck
        #[arg(long)]
        deck: Option<i64>,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let now = Utc::now();

    let days = match action {
        StatsAction::Upcoming { deck } => {
            let cards = match deck {
                Some(id) => db.cards_in_deck(id)?,
                None => db.all_cards()?,
            };
            upcoming_reviews(&cards, now)
        }
        StatsAction::Previous { deck } => {
            let cards = match deck {
                Some(id) => db.cards_in_deck(id)?,
                None => db.all_cards()?,
            };
            previous_reviews(&cards, now)
        }
    };
    println!("{}", serde_json::to_string_pretty(&days.to_vec())?);
    Ok(())
}
