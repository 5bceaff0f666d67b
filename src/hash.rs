//! Content addressing for cost trees and generated routines.
//!
//! A tree is hashed through its canonical constructor notation, so
//! comments, whitespace and long constructor names (`Sequence` vs `Seq`)
//! do not change its identity. Rendered routines are hashed byte for byte.

use crate::ir::Node;

const HASH_VERSION: u8 = 1;

/// A 256-bit BLAKE3 content hash.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    fn of(domain: &[u8], bytes: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[HASH_VERSION]);
        hasher.update(domain);
        hasher.update(bytes);
        ContentHash(*hasher.finalize().as_bytes())
    }

    /// Display as full hex.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Display as short base-32 (8 characters, 40 bits).
    pub fn to_short(&self) -> String {
        const ALPHABET: &[u8] = b"0123456789abcdefghjkmnpqrstuvwxyz";
        let val = u64::from_be_bytes([
            0, 0, 0, self.0[0], self.0[1], self.0[2], self.0[3], self.0[4],
        ]);
        let mut result = String::with_capacity(8);
        for i in (0..8).rev() {
            let idx = ((val >> (i * 5)) & 0x1F) as usize;
            result.push(ALPHABET[idx] as char);
        }
        result
    }
}

impl std::fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.to_short())
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.to_short())
    }
}

/// Hash a tree by its canonical notation.
pub fn hash_tree(node: &Node) -> ContentHash {
    ContentHash::of(b"tree:", node.to_string().as_bytes())
}

/// Hash rendered routine text.
pub fn hash_output(text: &str) -> ContentHash {
    ContentHash::of(b"output:", text.as_bytes())
}
