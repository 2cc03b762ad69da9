use log::trace;

use super::huffman_code_from_weights::code_table_from_weights;
use crate::code_table::{CodeLength, CodeTable, BYTE_VALUES};
use crate::error::CodecError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Scanning,
}

/// First pass of the Huffman coder: a byte histogram that turns into a code table.
#[derive(Debug)]
pub struct HuffmanScanner {
    state: State,
    freqs: Vec<u64>,
    /// Count of distinct byte values seen
    used: usize,
}

impl HuffmanScanner {
    pub fn new() -> Self {
        HuffmanScanner {
            state: State::Idle,
            freqs: vec![0; BYTE_VALUES],
            used: 0,
        }
    }

    pub fn begin_scan(&mut self) {
        assert_eq!(self.state, State::Idle, "begin_scan called while scanning");
        if self.used != 0 {
            self.freqs.iter_mut().for_each(|f| *f = 0);
            self.used = 0;
        }
        self.state = State::Scanning;
    }

    pub fn scan(&mut self, b: u8) {
        assert_eq!(self.state, State::Scanning, "scan called before begin_scan");
        let f = &mut self.freqs[b as usize];
        if *f == 0 {
            self.used += 1;
        }
        *f += 1;
    }

    /// Finish the pass. Returns the code table and the number of code bits the whole input will take.
    pub fn end_scan(&mut self) -> Result<(CodeTable, u64), CodecError> {
        assert_eq!(self.state, State::Scanning, "end_scan called before begin_scan");
        self.state = State::Idle;

        if self.used == 0 {
            return Ok((CodeTable::new(), 0));
        }

        let table = code_table_from_weights(&self.freqs)?;
        let total_bits = self
            .freqs
            .iter()
            .enumerate()
            .filter(|(_, &f)| f != 0)
            .map(|(b, &f)| f * table.get(b as u8).length as u64)
            .sum();
        trace!(
            "huffman scan: {} distinct bytes, {} code bits",
            self.used,
            total_bits
        );
        Ok((table, total_bits))
    }

    /// Count of distinct byte values seen by the last scan.
    pub fn distinct(&self) -> usize {
        self.used
    }
}

impl Default for HuffmanScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Second pass of the Huffman coder. It has no state beyond the table: each byte maps straight to its code.
#[derive(Debug)]
pub struct HuffmanCompressor<'t> {
    table: &'t CodeTable,
}

impl<'t> HuffmanCompressor<'t> {
    pub fn new(table: &'t CodeTable) -> Self {
        HuffmanCompressor { table }
    }

    /// Look up the code for `b`. A byte the scanner never saw means the input changed between the two passes.
    pub fn compress(&self, b: u8) -> Result<CodeLength, CodecError> {
        let cl = self.table.get(b);
        if !cl.is_used() {
            return Err(CodecError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("byte {} was not present during the scan pass", b),
            )));
        }
        Ok(cl)
    }
}
