//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use std::process::exit;

use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use bitpress::tools::cli::{init_options, Mode};
use bitpress::{compress_file, decompress_file};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() {
    // Available log levels are Error, Warn, Info, Debug, Trace. The -v option narrows this down.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Unable to start the logger: {}", e);
    }

    let options = init_options();

    //----- Figure how what we need to do and go do it
    let result = match options.mode {
        Mode::Compress => compress_file(options.codec, &options.source, &options.dest),
        Mode::Decompress => decompress_file(options.codec, &options.source, &options.dest),
    };

    match result {
        Ok(()) => info!("Done."),
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            exit(e.exit_code());
        }
    }
}
