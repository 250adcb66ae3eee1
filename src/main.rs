mod app;
mod args;
mod config;
mod entry;
mod error;
mod logger;
mod reporter;
mod shutdown;
mod simulate;
mod sinks;
mod stats;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
