use std::fmt::Write as _;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Running SHA-256 over a sequence of serialized records. Each record is
/// terminated by a zero byte so boundaries affect the hash.
#[derive(Debug, Default)]
pub(crate) struct RunDigest {
    hasher: Sha256,
    records: u64,
}

impl RunDigest {
    pub(crate) fn push<T: Serialize>(&mut self, record: &T) -> serde_json::Result<()> {
        let bytes = serde_json::to_vec(record)?;
        self.hasher.update(&bytes);
        self.hasher.update([0u8]);
        self.records = self.records.saturating_add(1);
        Ok(())
    }

    pub(crate) fn records(&self) -> u64 {
        self.records
    }

    pub(crate) fn finish_hex(self) -> String {
        to_hex_lower(&self.hasher.finalize())
    }
}

fn to_hex_lower(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(&mut output, "{byte:02x}");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_digest_is_sha256_of_nothing() {
        assert_eq!(
            RunDigest::default().finish_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_is_order_sensitive() {
        let mut a = RunDigest::default();
        a.push(&1u32).expect("push");
        a.push(&2u32).expect("push");

        let mut b = RunDigest::default();
        b.push(&2u32).expect("push");
        b.push(&1u32).expect("push");

        assert_eq!(a.records(), 2);
        assert_ne!(a.finish_hex(), b.finish_hex());
    }

    #[test]
    fn record_boundaries_are_part_of_the_hash() {
        let mut joined = RunDigest::default();
        joined.push(&"ab").expect("push");

        let mut split = RunDigest::default();
        split.push(&"a").expect("push");
        split.push(&"b").expect("push");

        assert_ne!(joined.finish_hex(), split.finish_hex());
    }
}
