//! # placenav
//!
//! Entry point for the place-cell navigation experiment driver.
//!
//! The binary wires the navigation environment, the place-cell actor-critic
//! agent, and the reporting layer together: parse hyperparameters from the
//! command line, train for the requested number of episodes per goal, and
//! optionally write a JSON snapshot of the run plus SVG figures.

mod app;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = app::Args::parse();
    app::run(args)
}
