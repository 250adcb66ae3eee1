mod runner;

pub(crate) use runner::{RunOutcome, run_local};
