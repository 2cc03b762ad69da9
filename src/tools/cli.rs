use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use clap::Parser;
use log::{info, LevelFilter};

use crate::compression::codec::Codec;

/// Compress or decompress
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Compress,
    Decompress,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Everything the binary needs to run one job.
#[derive(Debug)]
pub struct Options {
    pub mode: Mode,
    pub codec: Codec,
    /// File to read
    pub source: PathBuf,
    /// File to create
    pub dest: PathBuf,
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Lossless file compression with run length, Huffman and LZW coding",
    long_about = None)]
pub struct Args {
    /// Perform compression on the input file (the default)
    #[clap(short = 'c', long = "compress", conflicts_with = "decompress")]
    compress: bool,

    /// Perform decompression on the input file
    #[clap(short = 'd', long = "decompress")]
    decompress: bool,

    /// Compression method: rle, huffman, lzw or bitlzw
    #[clap(short = 'm', long = "method", default_value = "huffman")]
    method: Codec,

    /// File to read
    #[clap()]
    source: PathBuf,

    /// File to write
    #[clap()]
    dest: PathBuf,

    /// Sets verbosity. -v0 is silent, -v5 is chatty
    #[clap(short = 'v', default_value_t = 3)]
    v: u8,
}

impl Args {
    /// Log level for the -v setting.
    pub fn level_filter(&self) -> LevelFilter {
        match self.v {
            0 => LevelFilter::Off,
            1 => LevelFilter::Error,
            2 => LevelFilter::Warn,
            3 => LevelFilter::Info,
            4 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

impl From<Args> for Options {
    fn from(args: Args) -> Self {
        Options {
            mode: if args.decompress {
                Mode::Decompress
            } else {
                Mode::Compress
            },
            codec: args.method,
            source: args.source,
            dest: args.dest,
        }
    }
}

/// Parse the command line, set the log level and report what we are about to do.
pub fn init_options() -> Options {
    let args = Args::parse();
    log::set_max_level(args.level_filter());

    let options = Options::from(args);
    info!("---- Initialization Start ----");
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", options.mode);
    info!("Method set to {}", options.codec);
    info!("Reading {}", options.source.display());
    info!("Writing {}", options.dest.display());
    info!("---- Initialization End ----");
    options
}
