use std::io;

use super::{rle_table::RleTable, MAX_RUN};
use crate::code_table::CodeLength;
use crate::error::CodecError;

/// Receives each packed run as a (value, repeats) pair of codes.
pub type RunSink<'a> = Box<dyn FnMut(CodeLength, CodeLength) -> Result<(), CodecError> + 'a>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Compressing,
}

/// Second pass of the run-length coder. Splits the input into the same runs as the scanner and hands each run to
/// the sink, offset by the table minimums and sized to the table bit widths.
pub struct RleCompressor<'a> {
    state: State,
    table: RleTable,
    value: u8,
    repeats: u8,
    sink: Option<RunSink<'a>>,
}

impl<'a> RleCompressor<'a> {
    pub fn new(table: &RleTable) -> Self {
        RleCompressor {
            state: State::Idle,
            table: *table,
            value: 0,
            repeats: 0,
            sink: None,
        }
    }

    pub fn begin_compress<F>(&mut self, sink: F)
    where
        F: FnMut(CodeLength, CodeLength) -> Result<(), CodecError> + 'a,
    {
        assert_eq!(self.state, State::Idle, "begin_compress called while compressing");
        self.value = 0;
        self.repeats = 0;
        self.sink = Some(Box::new(sink));
        self.state = State::Compressing;
    }

    pub fn compress(&mut self, b: u8) -> Result<(), CodecError> {
        assert_eq!(self.state, State::Compressing, "compress called before begin_compress");

        if self.repeats == 0 {
            self.value = b;
            self.repeats = 1;
        } else if self.value == b && self.repeats < MAX_RUN {
            self.repeats += 1;
        } else {
            self.notify()?;
            self.value = b;
            self.repeats = 1;
        }
        Ok(())
    }

    /// Emit the last run and release the sink.
    pub fn end_compress(&mut self) -> Result<(), CodecError> {
        assert_eq!(self.state, State::Compressing, "end_compress called before begin_compress");
        self.state = State::Idle;

        let result = if self.repeats != 0 { self.notify() } else { Ok(()) };
        self.repeats = 0;
        self.sink = None;
        result
    }

    fn notify(&mut self) -> Result<(), CodecError> {
        let table = &self.table;
        // The table came from a scan of the same input, so anything outside it means the input changed under us
        if !(table.min_value()..=table.max_value()).contains(&self.value)
            || !(table.min_repeats()..=table.max_repeats()).contains(&self.repeats)
        {
            return Err(CodecError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                "source changed between scan and compress passes",
            )));
        }
        let value = CodeLength::new(
            (self.value - table.min_value()) as u32,
            table.value_bit_width(),
        );
        let repeats = CodeLength::new(
            (self.repeats - table.min_repeats()) as u32,
            table.repeat_bit_width(),
        );
        match self.sink.as_mut() {
            Some(sink) => sink(value, repeats),
            None => unreachable!("compressing without a sink"),
        }
    }
}
