//! Prefix trie for name autocomplete
//!
//! Words are lower-cased on insert and on lookup, so matching is
//! case-insensitive and reconstructed words come back lower-cased.
//! Inserting a word that is already present replaces its payload.

use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct TrieNode<P> {
    children: BTreeMap<char, usize>,
    is_end_of_word: bool,
    payload: Option<P>,
}

impl<P> TrieNode<P> {
    fn new() -> Self {
        Self {
            children: BTreeMap::new(),
            is_end_of_word: false,
            payload: None,
        }
    }
}

/// A single autocomplete hit
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMatch<'a, P> {
    pub word: String,
    pub payload: &'a P,
}

/// Character trie with a payload per stored word
#[derive(Debug, Clone)]
pub struct SearchIndex<P> {
    /// Node arena; slot 0 is the root
    nodes: Vec<TrieNode<P>>,
    words: usize,
}

impl<P> Default for SearchIndex<P> {
    fn default() -> Self {
        Self {
            nodes: vec![TrieNode::new()],
            words: 0,
        }
    }
}

impl<P> SearchIndex<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `word` with its payload
    pub fn insert(&mut self, word: &str, payload: P) {
        let mut current = 0;
        for ch in word.to_lowercase().chars() {
            current = match self.nodes[current].children.get(&ch) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::new());
                    self.nodes[current].children.insert(ch, child);
                    child
                }
            };
        }

        let node = &mut self.nodes[current];
        if !node.is_end_of_word {
            self.words += 1;
        }
        node.is_end_of_word = true;
        node.payload = Some(payload);
    }

    /// Returns every stored word starting with `prefix`, in lexicographic
    /// order of the lower-cased word
    pub fn prefix_search(&self, prefix: &str) -> Vec<SearchMatch<'_, P>> {
        let prefix = prefix.to_lowercase();

        let mut current = 0;
        for ch in prefix.chars() {
            match self.nodes[current].children.get(&ch) {
                Some(&child) => current = child,
                None => return Vec::new(),
            }
        }

        let mut matches = Vec::new();
        let mut stack = vec![(current, prefix)];

        while let Some((slot, word)) = stack.pop() {
            let node = &self.nodes[slot];
            if let (true, Some(payload)) = (node.is_end_of_word, node.payload.as_ref()) {
                matches.push(SearchMatch {
                    word: word.clone(),
                    payload,
                });
            }

            // Reverse so the smallest character is popped first
            for (ch, &child) in node.children.iter().rev() {
                let mut next = word.clone();
                next.push(*ch);
                stack.push((child, next));
            }
        }

        matches
    }

    /// Returns true if `word` was inserted (case-insensitive)
    pub fn contains(&self, word: &str) -> bool {
        let mut current = 0;
        for ch in word.to_lowercase().chars() {
            match self.nodes[current].children.get(&ch) {
                Some(&child) => current = child,
                None => return false,
            }
        }
        self.nodes[current].is_end_of_word
    }

    /// Returns the number of distinct stored words
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words<P>(matches: &[SearchMatch<'_, P>]) -> Vec<String> {
        matches.iter().map(|m| m.word.clone()).collect()
    }

    #[test]
    fn prefix_search_is_case_insensitive() {
        let mut index = SearchIndex::new();
        index.insert("Apollo", 1);
        index.insert("App", 2);
        index.insert("Apple", 3);
        index.insert("Gemini", 4);

        let matches = index.prefix_search("ap");
        assert_eq!(words(&matches), vec!["apollo", "app", "apple"]);

        let matches = index.prefix_search("AP");
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn payloads_travel_with_words() {
        let mut index = SearchIndex::new();
        index.insert("App", "p-2");
        index.insert("Apple", "p-3");

        let matches = index.prefix_search("app");
        assert_eq!(matches[0], SearchMatch { word: "app".to_string(), payload: &"p-2" });
        assert_eq!(matches[1], SearchMatch { word: "apple".to_string(), payload: &"p-3" });
    }

    #[test]
    fn missing_prefix_returns_empty() {
        let mut index = SearchIndex::new();
        index.insert("Apollo", ());
        assert!(index.prefix_search("b").is_empty());
        assert!(index.prefix_search("apollox").is_empty());
    }

    #[test]
    fn empty_prefix_returns_everything() {
        let mut index = SearchIndex::new();
        index.insert("b", 1);
        index.insert("a", 2);
        assert_eq!(words(&index.prefix_search("")), vec!["a", "b"]);
    }

    #[test]
    fn reinsert_replaces_payload() {
        let mut index = SearchIndex::new();
        index.insert("Apollo", 1);
        index.insert("APOLLO", 2);

        assert_eq!(index.len(), 1);
        let matches = index.prefix_search("apollo");
        assert_eq!(matches.len(), 1);
        assert_eq!(*matches[0].payload, 2);
    }

    #[test]
    fn contains_only_full_words() {
        let mut index = SearchIndex::new();
        index.insert("Apple", ());
        assert!(index.contains("apple"));
        assert!(!index.contains("app"));
        assert!(!index.is_empty());
    }

    #[test]
    fn unicode_words() {
        let mut index = SearchIndex::new();
        index.insert("Éclair", 1);
        index.insert("école", 2);

        assert_eq!(words(&index.prefix_search("É")), vec!["éclair", "école"]);
    }
}
