//! This helper function is part of the huffman encoding system.
//!
//! It builds a Huffman tree from the byte weights gathered by the scanner and walks the tree to produce the code
//! table. The tree lives in an arena (a Vec of nodes linked by index) that is dropped as soon as the codes are known.
//!
//! Tree shape: leaves start out sorted by weight (ties keep ascending byte order). The two lightest entries are
//! merged into a parent that takes the place of the heavier one, and the parent is then moved forward past every
//! entry that is not heavier than it. This repeats until one node is left.
//!

use super::{BIT_LEFT, BIT_RIGHT};
use crate::bitstream::MAX_FIELD_BITS;
use crate::code_table::{CodeLength, CodeTable, BYTE_VALUES};
use crate::error::CodecError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NodeData {
    /// Indices of the left and right children
    Kids(usize, usize),
    Leaf(u8),
}

#[derive(Clone, Copy, Debug)]
struct Node {
    weight: u64,
    node_data: NodeData,
}

/// Build the code table for a 256 entry weight histogram. Bytes with a weight of 0 get no code.
/// Returns an empty table when every weight is 0.
pub fn code_table_from_weights(weights: &[u64]) -> Result<CodeTable, CodecError> {
    debug_assert_eq!(weights.len(), BYTE_VALUES);

    // One leaf per used byte, in byte order so the stable sort below breaks ties by byte value.
    let mut tree: Vec<Node> = weights
        .iter()
        .enumerate()
        .filter(|(_, &w)| w != 0)
        .map(|(b, &w)| Node {
            weight: w,
            node_data: NodeData::Leaf(b as u8),
        })
        .collect();

    let mut codes = CodeTable::new();
    if tree.is_empty() {
        return Ok(codes);
    }

    let mut order: Vec<usize> = (0..tree.len()).collect();
    order.sort_by_key(|&idx| tree[idx].weight);

    // ...then pare it down to one single node with child nodes - keep it sorted.
    for i in 0..order.len() - 1 {
        let (left, right) = (order[i], order[i + 1]);
        tree.push(Node {
            weight: tree[left].weight + tree[right].weight,
            node_data: NodeData::Kids(left, right),
        });
        order[i + 1] = tree.len() - 1;

        let mut j = i + 1;
        while j + 1 < order.len() && tree[order[j]].weight >= tree[order[j + 1]].weight {
            order.swap(j, j + 1);
            j += 1;
        }
    }
    let root = order[order.len() - 1];

    // A single used byte leaves the root as a leaf. It still needs a real code.
    if let NodeData::Leaf(b) = tree[root].node_data {
        codes.set(b, CodeLength::new(BIT_RIGHT, 1));
        return Ok(codes);
    }

    // Walk the tree depth first, building each code from the bottom bit up.
    let mut stack = vec![(root, 0_u32, 0_u32)];
    while let Some((idx, depth, code)) = stack.pop() {
        match tree[idx].node_data {
            NodeData::Kids(left, right) => {
                if depth + 1 > MAX_FIELD_BITS {
                    return Err(CodecError::CodeTooLong(depth + 1));
                }
                stack.push((left, depth + 1, code | (BIT_LEFT << depth)));
                stack.push((right, depth + 1, code | (BIT_RIGHT << depth)));
            }
            NodeData::Leaf(b) => {
                debug_assert!(!codes.get(b).is_used());
                codes.set(b, CodeLength::new(code, depth));
            }
        }
    }
    Ok(codes)
}

#[cfg(test)]
mod test {
    use super::code_table_from_weights;
    use crate::code_table::CodeLength;
    use crate::error::CodecError;

    fn weights(pairs: &[(u8, u64)]) -> Vec<u64> {
        let mut w = vec![0_u64; 256];
        for &(b, f) in pairs {
            w[b as usize] = f;
        }
        w
    }

    #[test]
    fn empty_test() {
        let table = code_table_from_weights(&[0; 256]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn single_symbol_test() {
        let table = code_table_from_weights(&weights(&[(0x41, 10_000)])).unwrap();
        assert_eq!(table.get(0x41), CodeLength::new(0, 1));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn two_symbol_test() {
        // The lighter symbol goes left (bit 1), the heavier right (bit 0)
        let table = code_table_from_weights(&weights(&[(b'a', 5), (b'b', 2)])).unwrap();
        assert_eq!(table.get(b'b'), CodeLength::new(1, 1));
        assert_eq!(table.get(b'a'), CodeLength::new(0, 1));
    }

    #[test]
    fn classic_lengths_test() {
        // Weights 1,1,2,4 give the skewed tree with lengths 3,3,2,1. Merged parents move past equal weights, so
        // the lone leaf sits on the left at each level.
        let table =
            code_table_from_weights(&weights(&[(b'a', 1), (b'b', 1), (b'c', 2), (b'd', 4)]))
                .unwrap();
        assert_eq!(table.get(b'd'), CodeLength::new(0b1, 1));
        assert_eq!(table.get(b'c'), CodeLength::new(0b10, 2));
        assert_eq!(table.get(b'a'), CodeLength::new(0b100, 3));
        assert_eq!(table.get(b'b'), CodeLength::new(0b000, 3));
    }

    #[test]
    fn prefix_free_test() {
        let w: Vec<u64> = (0..256).map(|i| (i as u64 * 37) % 101 + 1).collect();
        let table = code_table_from_weights(&w).unwrap();
        let codes: Vec<CodeLength> = table.used().map(|(_, cl)| cl).collect();
        assert_eq!(codes.len(), 256);
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i == j || a.length > b.length {
                    continue;
                }
                // a must not be a prefix of b (codes grow from the low bit)
                let mask = (1_u64 << a.length) - 1;
                assert_ne!(a.code as u64, b.code as u64 & mask);
            }
        }
    }

    #[test]
    fn too_deep_test() {
        // Fibonacci weights make a tree one level deeper per symbol
        let mut w = vec![0_u64; 256];
        let (mut a, mut b) = (1_u64, 1_u64);
        for slot in w.iter_mut().take(40) {
            *slot = a;
            let next = a + b;
            a = b;
            b = next;
        }
        assert!(matches!(
            code_table_from_weights(&w),
            Err(CodecError::CodeTooLong(_))
        ));
    }
}
