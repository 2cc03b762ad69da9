//! The tools module holds the helpers shared by the codecs and the binary.
//!
//! The tools are:
//! - byte_io: Feed a byte source to a codec in chunks, and rewind it between passes.
//! - cli: Command line interface.
//!
pub mod byte_io;
pub mod cli;
