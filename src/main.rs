use std::process;

use clap::Parser;
use log::error;
use stderrlog::ColorChoice;

use ssm_render::cli::{self, Options};

fn main() {
    let opts = Options::parse();

    if let Err(err) = stderrlog::new()
        .module(module_path!())
        .quiet(opts.quiet)
        .verbosity(usize::from(opts.verbosity))
        .color(ColorChoice::Never)
        .init()
    {
        eprintln!("failed to initialize logging: {}", err);
        process::exit(1);
    }

    let exit = match cli::cli(&opts) {
        Ok(_) => 0,
        Err(err) => {
            error!("{:#}", err);
            1
        }
    };
    process::exit(exit);
}
