use super::BIT_LEFT;
use crate::code_table::CodeTable;
use crate::error::CodecError;

/// Outcome of feeding one bit to the reader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadResult {
    /// A complete code was read; the cursor is back at the root.
    Success(u8),
    /// The bits so far are a proper prefix of some code.
    ReadMoreBits,
    /// No code continues with this bit. The cursor is back at the root.
    NoData,
}

const ROOT: usize = 0;

#[derive(Clone, Copy, Debug, Default)]
struct TrieNode {
    left: Option<usize>,
    right: Option<usize>,
    /// Set on the node where a code ends
    symbol: Option<u8>,
}

/// Decode trie rebuilt from a code table. Holds a cursor that walks one edge per bit.
#[derive(Debug)]
pub struct HuffmanReader {
    nodes: Vec<TrieNode>,
    current: usize,
}

impl HuffmanReader {
    /// Replay every code of `table` from the root, adding nodes as needed. Fails if the codes are not prefix free.
    pub fn new(table: &CodeTable) -> Result<Self, CodecError> {
        let mut nodes = vec![TrieNode::default()];

        for (b, cl) in table.used() {
            let mut n = ROOT;
            for depth in 0..cl.length {
                if nodes[n].symbol.is_some() {
                    return Err(CodecError::corrupt(format!(
                        "code for byte {} runs through another code",
                        b
                    )));
                }
                let bit = (cl.code >> depth) & 1;
                let existing = if bit == BIT_LEFT {
                    nodes[n].left
                } else {
                    nodes[n].right
                };
                n = match existing {
                    Some(child) => child,
                    None => {
                        nodes.push(TrieNode::default());
                        let child = nodes.len() - 1;
                        if bit == BIT_LEFT {
                            nodes[n].left = Some(child);
                        } else {
                            nodes[n].right = Some(child);
                        }
                        child
                    }
                };
            }
            let end = &mut nodes[n];
            if end.symbol.is_some() || end.left.is_some() || end.right.is_some() {
                return Err(CodecError::corrupt(format!(
                    "code for byte {} collides with another code",
                    b
                )));
            }
            end.symbol = Some(b);
        }

        Ok(HuffmanReader {
            nodes,
            current: ROOT,
        })
    }

    /// Step the cursor along `bit` (0 or 1).
    pub fn read_bit(&mut self, bit: u32) -> ReadResult {
        let node = &self.nodes[self.current];
        let next = if bit == BIT_LEFT { node.left } else { node.right };

        match next {
            None => {
                self.current = ROOT;
                ReadResult::NoData
            }
            Some(child) => match self.nodes[child].symbol {
                Some(value) => {
                    self.current = ROOT;
                    ReadResult::Success(value)
                }
                None => {
                    self.current = child;
                    ReadResult::ReadMoreBits
                }
            },
        }
    }

    /// True when no code is partially read.
    pub fn is_at_root(&self) -> bool {
        self.current == ROOT
    }
}
