use rustc_hash::FxHashMap;

use super::SEED_CODES;
use crate::error::CodecError;

/// Receives each decoded sequence.
pub type SequenceSink<'a> = Box<dyn FnMut(&[u8]) -> Result<(), CodecError> + 'a>;

/// Two-way dictionary rebuilt on the decoding side. Codes are dense, so code -> sequence is a plain Vec.
#[derive(Debug, Default)]
struct Dictionary {
    sequences: Vec<Vec<u8>>,
    codes: FxHashMap<Vec<u8>, u32>,
}

impl Dictionary {
    fn init(&mut self) {
        self.clear();
        for code in 0..SEED_CODES {
            self.sequences.push(vec![code as u8]);
            self.codes.insert(vec![code as u8], code);
        }
    }

    fn clear(&mut self) {
        self.sequences.clear();
        self.codes.clear();
    }

    fn find_sequence(&self, code: u32) -> Option<&Vec<u8>> {
        self.sequences.get(code as usize)
    }

    /// Add `sequence` under the next code unless it is already present. Returns true if it was added.
    fn insert(&mut self, sequence: &[u8]) -> bool {
        if self.codes.contains_key(sequence) {
            return false;
        }
        let code = self.sequences.len() as u32;
        self.codes.insert(sequence.to_vec(), code);
        self.sequences.push(sequence.to_vec());
        true
    }

    fn len(&self) -> usize {
        self.sequences.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Decompressing,
}

/// LZW decoder. Feed codes between `begin` and `end`; decoded bytes arrive at the sink one sequence at a time.
pub struct LzwDecompressor<'a> {
    state: State,
    dictionary: Dictionary,
    /// Previously decoded sequence
    prev: Vec<u8>,
    out: Option<SequenceSink<'a>>,
}

impl<'a> LzwDecompressor<'a> {
    pub fn new() -> Self {
        LzwDecompressor {
            state: State::Idle,
            dictionary: Dictionary::default(),
            prev: Vec::new(),
            out: None,
        }
    }

    pub fn begin<F>(&mut self, out: F)
    where
        F: FnMut(&[u8]) -> Result<(), CodecError> + 'a,
    {
        assert_eq!(self.state, State::Idle, "begin called while decompressing");
        self.dictionary.init();
        self.prev.clear();
        self.out = Some(Box::new(out));
        self.state = State::Decompressing;
    }

    /// Decode one code. Returns Ok(false) when the code cannot have come from the compressor.
    pub fn put(&mut self, code: u32) -> Result<bool, CodecError> {
        assert_eq!(self.state, State::Decompressing, "put called before begin");

        match self.dictionary.find_sequence(code).cloned() {
            Some(sequence) => {
                self.emit(&sequence)?;
                if !self.prev.is_empty() {
                    self.prev.push(sequence[0]);
                    self.dictionary.insert(&self.prev);
                }
                self.prev = sequence;
            }
            None => {
                // Only the entry the compressor created while emitting this very code can be missing
                if self.prev.is_empty() || code as usize != self.dictionary.len() {
                    return Ok(false);
                }
                let first = self.prev[0];
                self.prev.push(first);
                let sequence = std::mem::take(&mut self.prev);
                self.emit(&sequence)?;
                self.dictionary.insert(&sequence);
                self.prev = sequence;
            }
        }
        Ok(true)
    }

    /// Release the dictionary and the sink.
    pub fn end(&mut self) {
        assert_eq!(self.state, State::Decompressing, "end called before begin");
        self.dictionary.clear();
        self.prev.clear();
        self.out = None;
        self.state = State::Idle;
    }

    /// Number of entries in the dictionary.
    pub fn dictionary_len(&self) -> usize {
        self.dictionary.len()
    }

    fn emit(&mut self, sequence: &[u8]) -> Result<(), CodecError> {
        match self.out.as_mut() {
            Some(out) => out(sequence),
            None => unreachable!("decompressing without a sink"),
        }
    }
}

impl Default for LzwDecompressor<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::LzwDecompressor;
    use crate::lzw_coding::lzw_compressor::LzwCompressor;

    fn decode(codes: &[u32]) -> Option<Vec<u8>> {
        let mut out = vec![];
        let mut ok = true;
        {
            let mut decompressor = LzwDecompressor::new();
            decompressor.begin(|s| {
                out.extend_from_slice(s);
                Ok(())
            });
            for &c in codes {
                if !decompressor.put(c).unwrap() {
                    ok = false;
                    break;
                }
            }
            decompressor.end();
        }
        ok.then(|| out)
    }

    fn encode(data: &[u8]) -> Vec<u32> {
        let mut out = vec![];
        {
            let mut compressor = LzwCompressor::new();
            compressor.begin(|c| {
                out.push(c);
                Ok(())
            });
            data.iter().for_each(|&b| compressor.put(b).unwrap());
            compressor.end().unwrap();
        }
        out
    }

    #[test]
    fn ababab_test() {
        assert_eq!(decode(&[65, 66, 256, 258]).unwrap(), b"ABABABA");
    }

    #[test]
    fn kwk_test() {
        // 257 is used before the decoder has built it
        assert_eq!(decode(&[97, 256, 257]).unwrap(), b"aaaaaa");
    }

    #[test]
    fn dictionary_lockstep_test() {
        let data = b"TOBEORNOTTOBEORTOBEORNOT#";
        let codes = encode(data);
        let mut decompressor = LzwDecompressor::new();
        decompressor.begin(|_| Ok(()));
        for &c in &codes {
            assert!(decompressor.put(c).unwrap());
        }
        // One entry per code except the first
        assert_eq!(decompressor.dictionary_len(), 256 + codes.len() - 1);
        decompressor.end();
    }

    #[test]
    fn round_trip_test() {
        let data: Vec<u8> = (0..5000_u32).map(|i| ((i * i) % 7 + (i / 100) % 3) as u8).collect();
        assert_eq!(decode(&encode(&data)).unwrap(), data);
    }

    #[test]
    fn bad_first_code_test() {
        // Nothing decoded yet, so 256 cannot be the KwK case
        assert!(decode(&[256]).is_none());
    }

    #[test]
    fn code_too_far_test() {
        assert!(decode(&[65, 300]).is_none());
        // 257 would be the KwK code here, 258 is one past it
        assert!(decode(&[65, 66, 258]).is_none());
    }

    #[test]
    fn empty_test() {
        assert_eq!(decode(&[]).unwrap(), Vec::<u8>::new());
    }
}
