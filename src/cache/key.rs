use sha2::{Digest, Sha256};
use std::fmt;

/// Longest file name most filesystems accept, in bytes.
const MAX_FILE_NAME_BYTES: usize = 255;
/// Readable part kept in front of the digest when a name is shortened.
const SHORTENED_PREFIX_BYTES: usize = 120;

/// Identifies one cached history response.
///
/// Components are escaped before joining so that distinct
/// (owner, repo, branch, from, to) tuples never produce the same key, and so
/// the key stays usable as a single file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn commit_history(owner: &str, repo: &str, branch: &str, from_sha: &str, to_sha: &str) -> Self {
        let parts: Vec<String> = [owner, repo, branch, from_sha, to_sha]
            .iter()
            .map(|part| escape(part))
            .collect();
        CacheKey(format!("commit-history:{}", parts.join("-")))
    }

    /// File name for this key inside a cache directory.
    ///
    /// Names that would exceed the filesystem limit keep a readable prefix
    /// and end in a SHA-256 digest of the whole key.
    pub fn file_name(&self) -> String {
        let stem = self.0.replace(':', "_");
        let name = format!("{stem}.json");
        if name.len() <= MAX_FILE_NAME_BYTES {
            return name;
        }

        let mut cut = SHORTENED_PREFIX_BYTES;
        while !stem.is_char_boundary(cut) {
            cut -= 1;
        }
        let digest = Sha256::digest(self.0.as_bytes());
        format!("{}-{:x}.json", &stem[..cut], digest)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn escape(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    for c in part.chars() {
        match c {
            '%' => out.push_str("%25"),
            '-' => out.push_str("%2D"),
            '/' => out.push_str("%2F"),
            ':' => out.push_str("%3A"),
            '\\' => out.push_str("%5C"),
            _ => out.push(c),
        }
    }
    out
}
