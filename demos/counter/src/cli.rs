//! Command line front end: mount a counter, click it and render the result.

use anyhow::Result;
use clap::Parser;

use crate::{mount_counter, TestId};

/// Renders the counter widget to HTML after clicking its increment button.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "counter", author, version, about, long_about = None)]
pub struct Args {
    /// Value the counter starts at.
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub initial: i64,
    /// How many times to click the increment button before rendering.
    #[arg(short, long, default_value_t = 0)]
    pub clicks: u32,
}

/// Mounts a counter starting at `args.initial`, clicks it `args.clicks` times
/// and returns the rendered HTML.
pub fn run(args: &Args) -> Result<String> {
    let app = mount_counter(args.initial);
    let button = app.query_one(TestId::IncrementButton)?;
    for _ in 0..args.clicks {
        button.click();
    }

    let shown = app.query_one(TestId::CounterDisplay)?;
    tracing::info!(
        initial = args.initial,
        clicks = args.clicks,
        display = %shown.text_content(),
        "rendered counter"
    );
    Ok(app.html())
}
