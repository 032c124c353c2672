use anyhow::Result;
use clap::{crate_version, App, Arg};
use std::path::Path;
use walnutgen::build::build_site;
use walnutgen::config::Config;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("walnutgen")
        .version(crate_version!())
        .about("Builds a static site from headers, footers and pages")
        .arg(
            Arg::with_name("project")
                .help("The project directory (or any of its subdirectories)")
                .default_value("."),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("DIR")
                .help("Overrides the project's `output_dir`")
                .takes_value(true),
        )
        .get_matches();

    // An output directory given on the command line is relative to where
    // we're run from, not to the site root.
    let output = match matches.value_of("output") {
        Some(dir) => Some(std::env::current_dir()?.join(dir)),
        None => None,
    };
    let config = Config::from_directory(
        Path::new(matches.value_of("project").unwrap_or(".")),
        output.as_deref(),
    )?;
    build_site(&config)?;
    Ok(())
}
