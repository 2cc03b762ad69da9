//! The code table maps every byte value to the bit code used to represent it on the stream.
//!
//! The same table type is shared by the Huffman coder (one entry per used byte) and by anything else that needs a
//! byte -> (code, length) lookup. Entries with a length of zero are unused. Only the used entries are ever written to
//! a stream, using the compact min + delta layout in `table_io`.
//!
pub mod table_io;

/// Number of distinct byte values.
pub const BYTE_VALUES: usize = 256;

/// A code and the number of bits it occupies. A length of 0 marks an absent entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CodeLength {
    pub code: u32,
    pub length: u32,
}

impl CodeLength {
    pub fn new(code: u32, length: u32) -> Self {
        debug_assert!(
            length >= 32 || code >> length == 0,
            "code {:#b} does not fit in {} bits",
            code,
            length
        );
        CodeLength { code, length }
    }

    pub fn is_used(&self) -> bool {
        self.length != 0
    }
}

/// Byte -> CodeLength mapping with all 256 entries present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<CodeLength>,
}

impl CodeTable {
    /// Create a table with every entry unused.
    pub fn new() -> Self {
        Self {
            codes: vec![CodeLength::default(); BYTE_VALUES],
        }
    }

    pub fn set(&mut self, byte: u8, code_length: CodeLength) {
        self.codes[byte as usize] = code_length;
    }

    pub fn get(&self, byte: u8) -> CodeLength {
        self.codes[byte as usize]
    }

    /// Iterate over the used entries in ascending byte order.
    pub fn used(&self) -> impl Iterator<Item = (u8, CodeLength)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter(|(_, cl)| cl.is_used())
            .map(|(b, cl)| (b as u8, *cl))
    }

    /// Number of used entries.
    pub fn len(&self) -> usize {
        self.used().count()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(|cl| !cl.is_used())
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::new()
    }
}
