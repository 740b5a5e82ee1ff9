//! Line-driven study session.
//!
//! Each input line is one key press: an empty line is Enter, `s` (or a
//! single space) is Space, `1`-`4` pick a rating and submit it, `f` toggles
//! flip mode and `q` quits.

use std::io::{BufRead, Write};

use chrono::Utc;
use clap::Args;
use flashdeck_core::review::Key;
use flashdeck_core::storage::Database;
use flashdeck_core::{
    Config, CoreError, KeyPress, KeyRegistry, Phase, Rating, ReviewSession, ReviewStore,
    StudySelector, StudyView, Visible,
};

use super::preview::label;

/// Upper bound on waiting for a face swap before rendering.
const MAX_SETTLE: std::time::Duration = std::time::Duration::from_secs(2);

#[derive(Args)]
pub struct StudyArgs {
    /// Deck to study; repeat for several. Defaults to every deck
    #[arg(long)]
    pub deck: Vec<i64>,
    /// Include cards that are not due yet
    #[arg(long)]
    pub all: bool,
    /// Present cards as a flipping card
    #[arg(long, conflicts_with = "no_flip")]
    pub flip: bool,
    /// Show question and answer stacked
    #[arg(long)]
    pub no_flip: bool,
}

impl StudyArgs {
    /// Flip mode forced on the command line, if any.
    pub fn flip_mode(&self) -> Option<bool> {
        match (self.flip, self.no_flip) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Key(KeyPress),
    Rate(Rating),
    ToggleFlip,
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    match line.trim_end_matches(['\r', '\n']) {
        "" => Input::Key(KeyPress::new(Key::Enter)),
        " " | "s" | "space" => Input::Key(KeyPress::new(Key::Space)),
        "f" => Input::ToggleFlip,
        "q" | "quit" => Input::Quit,
        other => other.parse().map_or(Input::Unknown, Input::Rate),
    }
}

pub fn run(args: StudyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut settings = config.study_settings();
    if let Some(flip_mode) = args.flip_mode() {
        settings.flip_mode = flip_mode;
    }
    let selector =
        StudySelector::decks(args.deck).with_all(args.all || config.study.default_study_all);

    let mut db = Database::open()?;
    let session = ReviewSession::start(&db, &settings, &selector)?;
    tracing::debug!(event = ?session.started(Utc::now()), "study started");

    let registry = KeyRegistry::new();
    let mut view = StudyView::open(session, &registry);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    study_loop(&mut view, &mut db, stdin.lock(), &mut stdout.lock())
}

/// Drive `view` from `input` until the session finishes, the user quits or
/// input ends.
fn study_loop<S, R, W>(
    view: &mut StudyView,
    store: &mut S,
    input: R,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: ReviewStore + ?Sized,
    R: BufRead,
    W: Write,
{
    render(view, out)?;
    if view.session().is_finished() {
        return Ok(());
    }

    for line in input.lines() {
        let result = match parse_input(&line?) {
            Input::Key(press) => view.handle_key(press, Utc::now(), store),
            Input::Rate(rating) if view.session().phase() == Phase::Answer => {
                view.set_rating_context(Some(rating));
                view.handle_key(KeyPress::new(Key::Enter), Utc::now(), store)
            }
            Input::Rate(_) => Ok(Vec::new()),
            Input::ToggleFlip => {
                let flip_mode = !view.session().state().flip_mode;
                view.set_flip_mode(flip_mode);
                Ok(Vec::new())
            }
            Input::Quit => break,
            Input::Unknown => {
                writeln!(out, "keys: s reveal, enter/1-4 rate, f flip, q quit")?;
                continue;
            }
        };

        match result {
            Ok(events) => {
                for event in &events {
                    tracing::debug!(?event, "session event");
                }
            }
            Err(CoreError::Persist(e)) => writeln!(out, "rating not saved ({e}), try again")?,
            Err(e) => return Err(e.into()),
        }

        settle(view);
        render(view, out)?;
        if view.session().is_finished() {
            break;
        }
    }

    view.close();
    Ok(())
}

/// Wait out a pending face swap so the next render shows the settled card.
fn settle(view: &mut StudyView) {
    let Some(swap) = view.session().state().face_swap else {
        return;
    };
    if let Ok(wait) = (swap.due - Utc::now()).to_std() {
        std::thread::sleep(wait.min(MAX_SETTLE));
    }
    view.tick(Utc::now());
}

fn render<W: Write>(view: &StudyView, out: &mut W) -> std::io::Result<()> {
    let session = view.session();
    let state = session.state();
    if state.finished {
        return if state.nothing_to_study {
            writeln!(out, "Nothing to study.")
        } else {
            writeln!(out, "Session finished: {} reviewed.", state.reviewed)
        };
    }

    let (Some(deck), Some(card)) = (session.current_deck(), session.current_card()) else {
        return Ok(());
    };
    writeln!(out)?;
    writeln!(out, "[{}] {} left", deck.name, session.remaining())?;
    match session.visible() {
        Visible::Question => writeln!(out, "Q: {}", card.question)?,
        Visible::Answer if state.flip_mode => writeln!(out, "A: {}", card.answer)?,
        Visible::Answer => {
            writeln!(out, "Q: {}", card.question)?;
            writeln!(out, "A: {}", card.answer)?;
        }
        Visible::Blank => writeln!(out, "...")?,
    }

    if state.revealed {
        let buttons: Vec<String> = Rating::ALL
            .iter()
            .map(|r| format!("{} {}", r.level(), label(*r, card.bucket)))
            .collect();
        writeln!(out, "{}", buttons.join("  "))
    } else {
        writeln!(out, "(s to reveal)")
    }
}
