use rustc_hash::FxHashMap;

use super::SEED_CODES;
use crate::error::CodecError;

/// Receives each emitted code.
pub type CodeSink<'a> = Box<dyn FnMut(u32) -> Result<(), CodecError> + 'a>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Compressing,
}

/// LZW encoder. Feed bytes between `begin` and `end`; codes arrive at the sink as soon as they are known.
pub struct LzwCompressor<'a> {
    state: State,
    codes: FxHashMap<Vec<u8>, u32>,
    /// Longest sequence seen so far that is still in the dictionary
    current: Vec<u8>,
    out: Option<CodeSink<'a>>,
}

impl<'a> LzwCompressor<'a> {
    pub fn new() -> Self {
        LzwCompressor {
            state: State::Idle,
            codes: FxHashMap::default(),
            current: Vec::new(),
            out: None,
        }
    }

    pub fn begin<F>(&mut self, out: F)
    where
        F: FnMut(u32) -> Result<(), CodecError> + 'a,
    {
        assert_eq!(self.state, State::Idle, "begin called while compressing");

        self.codes.clear();
        for code in 0..SEED_CODES {
            self.codes.insert(vec![code as u8], code);
        }
        self.current.clear();
        self.out = Some(Box::new(out));
        self.state = State::Compressing;
    }

    pub fn put(&mut self, b: u8) -> Result<(), CodecError> {
        assert_eq!(self.state, State::Compressing, "put called before begin");

        self.current.push(b);
        if self.codes.contains_key(&self.current) {
            // Keep growing the match
            return Ok(());
        }

        let next = u32::try_from(self.codes.len()).map_err(|_| CodecError::CodeSpaceExhausted)?;
        self.codes.insert(self.current.clone(), next);

        // The sequence without the new byte was known, emit it and restart from the new byte
        self.current.pop();
        let code = self.code_of_current();
        self.emit(code)?;
        self.current.clear();
        self.current.push(b);
        Ok(())
    }

    /// Emit whatever is pending and release the dictionary and the sink.
    pub fn end(&mut self) -> Result<(), CodecError> {
        assert_eq!(self.state, State::Compressing, "end called before begin");
        self.state = State::Idle;

        let result = if self.current.is_empty() {
            Ok(())
        } else {
            let code = self.code_of_current();
            self.emit(code)
        };

        self.codes.clear();
        self.current.clear();
        self.out = None;
        result
    }

    /// Number of entries in the dictionary.
    pub fn dictionary_len(&self) -> usize {
        self.codes.len()
    }

    /// Code of the current sequence. It is only ever extended after it was found, so it is always present.
    fn code_of_current(&self) -> u32 {
        match self.codes.get(&self.current) {
            Some(&code) => code,
            None => unreachable!("current LZW sequence missing from the dictionary"),
        }
    }

    fn emit(&mut self, code: u32) -> Result<(), CodecError> {
        match self.out.as_mut() {
            Some(out) => out(code),
            None => unreachable!("compressing without a sink"),
        }
    }
}

impl Default for LzwCompressor<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::LzwCompressor;

    fn codes(data: &[u8]) -> Vec<u32> {
        let mut out = vec![];
        {
            let mut compressor = LzwCompressor::new();
            compressor.begin(|c| {
                out.push(c);
                Ok(())
            });
            for &b in data {
                compressor.put(b).unwrap();
            }
            compressor.end().unwrap();
        }
        out
    }

    #[test]
    fn ababab_test() {
        // AB=256, BA=257, ABA=258
        assert_eq!(codes(b"ABABABA"), vec![65, 66, 256, 258]);
    }

    #[test]
    fn dictionary_growth_test() {
        let mut compressor = LzwCompressor::new();
        compressor.begin(|_| Ok(()));
        assert_eq!(compressor.dictionary_len(), 256);
        for &b in b"ABABABA" {
            compressor.put(b).unwrap();
        }
        assert_eq!(compressor.dictionary_len(), 259);
        compressor.end().unwrap();
    }

    #[test]
    fn literal_test() {
        assert_eq!(codes(b"xyz"), vec![120, 121, 122]);
        assert_eq!(codes(b"q"), vec![113]);
        assert!(codes(b"").is_empty());
    }

    #[test]
    fn repeated_byte_test() {
        // aa=256, aaa=257
        assert_eq!(codes(b"aaaaaa"), vec![97, 256, 257]);
    }

    #[test]
    fn restart_test() {
        let mut first = vec![];
        let mut second = vec![];
        {
            let mut compressor = LzwCompressor::new();
            compressor.begin(|c| {
                first.push(c);
                Ok(())
            });
            b"ABAB".iter().for_each(|&b| compressor.put(b).unwrap());
            compressor.end().unwrap();
            // A new run starts from a fresh dictionary
            compressor.begin(|c| {
                second.push(c);
                Ok(())
            });
            b"ABAB".iter().for_each(|&b| compressor.put(b).unwrap());
            compressor.end().unwrap();
        }
        assert_eq!(first, second);
    }

    #[test]
    #[should_panic]
    fn put_without_begin_test() {
        let mut compressor = LzwCompressor::new();
        let _ = compressor.put(1);
    }
}
