//! Height-balanced (AVL) binary search tree
//!
//! Nodes live in an arena and children are arena slots. After every insert
//! each node on the path back to the root has its height recomputed and is
//! rotated if its balance factor leaves `-1..=1`.

use std::cmp::Ordering;

#[derive(Debug, Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    height: u32,
    left: Option<usize>,
    right: Option<usize>,
}

/// Ordered map backed by an AVL tree
#[derive(Debug, Clone)]
pub struct OrderedIndex<K, V> {
    nodes: Vec<Node<K, V>>,
    root: Option<usize>,
}

impl<K, V> Default for OrderedIndex<K, V> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }
}

impl<K: Ord, V> OrderedIndex<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a key, overwriting the value if the key already exists
    pub fn insert(&mut self, key: K, value: V) {
        let root = self.root;
        self.root = Some(self.insert_at(root, key, value));
    }

    fn insert_at(&mut self, node: Option<usize>, key: K, value: V) -> usize {
        let Some(slot) = node else {
            self.nodes.push(Node {
                key,
                value,
                height: 1,
                left: None,
                right: None,
            });
            return self.nodes.len() - 1;
        };

        match key.cmp(&self.nodes[slot].key) {
            Ordering::Less => {
                let left = self.nodes[slot].left;
                let child = self.insert_at(left, key, value);
                self.nodes[slot].left = Some(child);
            }
            Ordering::Greater => {
                let right = self.nodes[slot].right;
                let child = self.insert_at(right, key, value);
                self.nodes[slot].right = Some(child);
            }
            Ordering::Equal => {
                self.nodes[slot].value = value;
                return slot;
            }
        }

        self.update_height(slot);
        self.rebalance(slot)
    }

    fn rebalance(&mut self, slot: usize) -> usize {
        let balance = self.balance_factor(slot);

        if balance > 1 {
            if let Some(left) = self.nodes[slot].left {
                if self.balance_factor(left) < 0 {
                    // Left-right
                    let rotated = self.rotate_left(left);
                    self.nodes[slot].left = Some(rotated);
                }
            }
            return self.rotate_right(slot);
        }

        if balance < -1 {
            if let Some(right) = self.nodes[slot].right {
                if self.balance_factor(right) > 0 {
                    // Right-left
                    let rotated = self.rotate_right(right);
                    self.nodes[slot].right = Some(rotated);
                }
            }
            return self.rotate_left(slot);
        }

        slot
    }

    fn rotate_right(&mut self, y: usize) -> usize {
        let Some(x) = self.nodes[y].left else {
            return y;
        };
        let t2 = self.nodes[x].right;
        self.nodes[x].right = Some(y);
        self.nodes[y].left = t2;
        self.update_height(y);
        self.update_height(x);
        x
    }

    fn rotate_left(&mut self, x: usize) -> usize {
        let Some(y) = self.nodes[x].right else {
            return x;
        };
        let t2 = self.nodes[y].left;
        self.nodes[y].left = Some(x);
        self.nodes[x].right = t2;
        self.update_height(x);
        self.update_height(y);
        y
    }

    /// Returns the value stored under `key`
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut current = self.root;
        while let Some(slot) = current {
            let node = &self.nodes[slot];
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(&node.value),
            };
        }
        None
    }

    /// Visits every entry in ascending key order
    pub fn inorder_traversal(&self, mut visit: impl FnMut(&K, &V)) {
        let mut stack = Vec::new();
        let mut current = self.root;

        while current.is_some() || !stack.is_empty() {
            while let Some(slot) = current {
                stack.push(slot);
                current = self.nodes[slot].left;
            }
            if let Some(slot) = stack.pop() {
                let node = &self.nodes[slot];
                visit(&node.key, &node.value);
                current = node.right;
            }
        }
    }

    /// Returns all entries in ascending key order
    pub fn entries(&self) -> Vec<(&K, &V)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.walk(self.root, &mut out);
        out
    }

    /// Returns entries with key `>= min`, in ascending order
    pub fn range_from(&self, min: &K) -> Vec<(&K, &V)> {
        let mut out = Vec::new();
        self.walk_from(self.root, min, &mut out);
        out
    }

    fn walk<'a>(&'a self, node: Option<usize>, out: &mut Vec<(&'a K, &'a V)>) {
        if let Some(slot) = node {
            let n = &self.nodes[slot];
            self.walk(n.left, out);
            out.push((&n.key, &n.value));
            self.walk(n.right, out);
        }
    }

    fn walk_from<'a>(&'a self, node: Option<usize>, min: &K, out: &mut Vec<(&'a K, &'a V)>) {
        let Some(slot) = node else {
            return;
        };
        let n = &self.nodes[slot];
        // Left subtree can only hold qualifying keys if this key does
        if n.key >= *min {
            self.walk_from(n.left, min, out);
            out.push((&n.key, &n.value));
        }
        self.walk_from(n.right, min, out);
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the tree height (0 when empty)
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    /// Returns true if every node's balance factor lies in `-1..=1` and
    /// every stored height matches its subtrees
    pub fn is_balanced(&self) -> bool {
        self.check(self.root).is_some()
    }

    fn check(&self, node: Option<usize>) -> Option<u32> {
        let Some(slot) = node else {
            return Some(0);
        };
        let n = &self.nodes[slot];
        let left = self.check(n.left)?;
        let right = self.check(n.right)?;
        let height = left.max(right) + 1;
        (left.abs_diff(right) <= 1 && height == n.height).then_some(height)
    }

    fn height_of(&self, node: Option<usize>) -> u32 {
        node.map_or(0, |slot| self.nodes[slot].height)
    }

    fn update_height(&mut self, slot: usize) {
        let left = self.height_of(self.nodes[slot].left);
        let right = self.height_of(self.nodes[slot].right);
        self.nodes[slot].height = left.max(right) + 1;
    }

    fn balance_factor(&self, slot: usize) -> i64 {
        i64::from(self.height_of(self.nodes[slot].left)) - i64::from(self.height_of(self.nodes[slot].right))
    }
}
