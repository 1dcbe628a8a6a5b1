//! Segment-aligned suffix trie

use std::collections::BTreeMap;
use std::path::{Component, Path};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Node {
    children: BTreeMap<String, Node>,
    terminal: bool,
}

/// Set of ignorable path suffixes.
///
/// Suffixes are stored one path segment per level, last segment first, so a
/// lookup walks the queried path from its end and stops at the first
/// terminal. `b.txt` therefore matches `x/b.txt` but never `ab.txt`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SuffixTrie {
    root: Node,
    len: usize,
}

fn segments(path: &str) -> Vec<&str> {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect()
}

impl SuffixTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a line-oriented list: blank lines and `#` comments are skipped
    pub fn parse(text: &str) -> Self {
        let mut trie = Self::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            trie.insert(line);
        }
        trie
    }

    /// Record an ignorable suffix. Empty suffixes are ignored.
    pub fn insert(&mut self, suffix: &str) {
        let parts = segments(suffix);
        if parts.is_empty() {
            return;
        }

        let mut node = &mut self.root;
        for part in parts.iter().rev() {
            node = node.children.entry((*part).to_string()).or_default();
        }
        if !node.terminal {
            node.terminal = true;
            self.len += 1;
        }
    }

    /// True iff `path` ends with any stored suffix, segment by segment
    pub fn matches(&self, path: &Path) -> bool {
        let mut node = &self.root;
        for component in path.components().rev() {
            let segment = match component {
                Component::Normal(name) => name.to_string_lossy(),
                Component::CurDir => continue,
                _ => return false,
            };
            match node.children.get(&*segment) {
                Some(next) if next.terminal => return true,
                Some(next) => node = next,
                None => return false,
            }
        }
        false
    }

    /// Number of distinct stored suffixes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_trie_matches_nothing() {
        let trie = SuffixTrie::new();
        assert!(trie.is_empty());
        assert!(!trie.matches(Path::new("anything/at/all")));
        assert!(!trie.matches(Path::new("")));
    }

    #[test]
    fn test_single_segment_suffix() {
        let mut trie = SuffixTrie::new();
        trie.insert("node_modules");

        assert!(trie.matches(Path::new("node_modules")));
        assert!(trie.matches(Path::new("web/app/node_modules")));
        assert!(!trie.matches(Path::new("web/node_modules/react")));
        assert!(!trie.matches(Path::new("web/my_node_modules")));
    }

    #[test]
    fn test_partial_segment_does_not_match() {
        let mut trie = SuffixTrie::new();
        trie.insert("b.txt");

        assert!(trie.matches(Path::new("b.txt")));
        assert!(trie.matches(Path::new("x/b.txt")));
        assert!(!trie.matches(Path::new("ab.txt")));
        assert!(!trie.matches(Path::new("x/ab.txt")));
    }

    #[test]
    fn test_multi_segment_suffix() {
        let mut trie = SuffixTrie::new();
        trie.insert("/build/cache");

        assert!(trie.matches(Path::new("build/cache")));
        assert!(trie.matches(Path::new("proj/build/cache")));
        assert!(!trie.matches(Path::new("proj/cache")));
        assert!(!trie.matches(Path::new("proj/build")));
    }

    #[test]
    fn test_shorter_suffix_short_circuits() {
        let mut trie = SuffixTrie::new();
        trie.insert("cache");
        trie.insert("build/cache");

        assert_eq!(trie.len(), 2);
        assert!(trie.matches(Path::new("other/cache")));
        assert!(trie.matches(Path::new("build/cache")));
    }

    #[test]
    fn test_insertion_is_idempotent() {
        let mut once = SuffixTrie::new();
        once.insert(".DS_Store");

        let mut twice = SuffixTrie::new();
        twice.insert(".DS_Store");
        twice.insert(".DS_Store");
        twice.insert("/.DS_Store");

        assert_eq!(once, twice);
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn test_empty_suffix_is_ignored() {
        let mut trie = SuffixTrie::new();
        trie.insert("");
        trie.insert("/");
        trie.insert("./");
        assert!(trie.is_empty());
        assert!(!trie.matches(Path::new("a")));
    }

    #[test]
    fn test_every_inserted_suffix_matches_its_extensions() {
        let suffixes = ["target", "a/b", ".cache/pip", "Thumbs.db"];
        let prefixes = ["", "x", "x/y", "deep/er/still"];
        let mut trie = SuffixTrie::new();
        for suffix in suffixes {
            trie.insert(suffix);
        }

        for suffix in suffixes {
            for prefix in prefixes {
                let path: PathBuf = Path::new(prefix).join(suffix);
                assert!(trie.matches(&path), "{} should match", path.display());
            }
        }
        assert!(!trie.matches(Path::new("src/main.rs")));
        assert!(!trie.matches(Path::new("b")));
    }

    #[test]
    fn test_parse_skips_blank_and_comment_lines() {
        let trie = SuffixTrie::parse("# caches\n\nnode_modules\n  __pycache__  \n#target\n");
        assert_eq!(trie.len(), 2);
        assert!(trie.matches(Path::new("pkg/__pycache__")));
        assert!(!trie.matches(Path::new("target")));
    }

    #[test]
    fn test_backslash_separators_in_list() {
        let trie = SuffixTrie::parse("build\\out\n");
        assert!(trie.matches(Path::new("proj/build/out")));
    }
}
