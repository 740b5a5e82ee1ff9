use chrono::Utc;
use clap::Args;
use flashdeck_core::review::{format_interval, interval};
use flashdeck_core::Rating;

#[derive(Args)]
pub struct PreviewArgs {
    /// Current bucket of the card
    #[arg(long)]
    pub bucket: u32,
}

pub fn run(args: PreviewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let rows: Vec<serde_json::Value> = flashdeck_core::preview(args.bucket, now)
        .iter()
        .map(|(rating, next)| {
            serde_json::json!({
                "rating": rating,
                "label": label(*rating, args.bucket),
                "new_bucket": next.new_bucket,
                "next_review": next.next_review,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

/// Button text, e.g. `"Good (8h)"`.
pub fn label(rating: Rating, bucket: u32) -> String {
    format!("{} ({})", rating.label(), format_interval(interval(bucket, rating)))
}
