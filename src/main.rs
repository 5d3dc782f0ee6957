mod app;
mod error;
mod render;
mod term;

use std::fs::File;
use std::process::exit;

use clap::Parser;
use log::info;
use simplelog::{Config, WriteLogger};
use timed_snake::Args;

use crate::error::AppError;

pub type TermInt = u16;
pub type Coords = (u16, u16);

fn main() {
    if let Err(err) = run() {
        eprintln!("timed-snake: {}", err);
        exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();

    // The terminal belongs to the game, so logs go to a file
    WriteLogger::init(args.log_level, Config::default(), File::create(&args.log_file)?)?;

    let settings = args.settings()?;
    info!("starting with {:?}", settings);

    let mut app = app::App::new(settings, args.seed)?;
    app.run()
}
