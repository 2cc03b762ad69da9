use log::trace;

use super::{rle_table::RleTable, MAX_RUN};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Scanning,
}

/// First pass of the run-length coder. Feed it every input byte between `begin_scan` and `end_scan` to learn the
/// table and the size of the packed output.
#[derive(Debug)]
pub struct RleScanner {
    state: State,
    /// Count of closed runs
    runs: u64,
    value: u8,
    repeats: u8,
    min_value: u8,
    max_value: u8,
    min_repeats: u8,
    max_repeats: u8,
}

impl RleScanner {
    pub fn new() -> Self {
        RleScanner {
            state: State::Idle,
            runs: 0,
            value: 0,
            repeats: 0,
            min_value: u8::MAX,
            max_value: 0,
            min_repeats: u8::MAX,
            max_repeats: 0,
        }
    }

    pub fn begin_scan(&mut self) {
        assert_eq!(self.state, State::Idle, "begin_scan called while scanning");
        *self = RleScanner::new();
        self.state = State::Scanning;
    }

    pub fn scan(&mut self, b: u8) {
        assert_eq!(self.state, State::Scanning, "scan called before begin_scan");

        if self.repeats == 0 {
            self.value = b;
            self.repeats = 1;
        } else if self.value == b && self.repeats < MAX_RUN {
            self.repeats += 1;
        } else {
            // Value changed or the run is full
            self.close_run();
            self.value = b;
            self.repeats = 1;
        }
    }

    /// Finish the pass. Returns the table and the number of bits the packed pairs will take.
    pub fn end_scan(&mut self) -> (RleTable, u64) {
        assert_eq!(self.state, State::Scanning, "end_scan called before begin_scan");
        self.state = State::Idle;

        if self.repeats == 0 {
            return (RleTable::default(), 0);
        }
        self.close_run();
        self.repeats = 0;

        let table = RleTable::from_bounds(
            self.min_value,
            self.max_value,
            self.min_repeats,
            self.max_repeats,
        );
        let total_bits = self.runs * table.pair_bit_width() as u64;
        trace!(
            "rle scan: {} runs, values {}..={}, repeats {}..={}",
            self.runs,
            self.min_value,
            self.max_value,
            self.min_repeats,
            self.max_repeats
        );
        (table, total_bits)
    }

    /// Fold the current run into the bounds.
    fn close_run(&mut self) {
        self.runs += 1;
        self.min_value = self.min_value.min(self.value);
        self.max_value = self.max_value.max(self.value);
        self.min_repeats = self.min_repeats.min(self.repeats);
        self.max_repeats = self.max_repeats.max(self.repeats);
    }
}

impl Default for RleScanner {
    fn default() -> Self {
        Self::new()
    }
}
