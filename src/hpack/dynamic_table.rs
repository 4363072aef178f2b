//! HPACK dynamic table (RFC 7541 §2.3.2, §4): a FIFO of header fields,
//! byte-accounted and evicted from the oldest entry first.

use std::collections::VecDeque;

/// Per RFC 7541 §4.1: every entry costs its name/value octet lengths plus
/// this fixed overhead, modeling the underlying linked-list/length-field
/// bookkeeping a real table would carry.
pub const ENTRY_OVERHEAD: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicEntry {
    pub name: String,
    pub value: String,
}

impl DynamicEntry {
    fn size(&self) -> usize {
        self.name.len() + self.value.len() + ENTRY_OVERHEAD
    }
}

/// FIFO table, newest entry first (index 1 is always the most recently
/// inserted, matching RFC 7541's addressing of indices beyond the static
/// table).
#[derive(Debug, Clone)]
pub struct DynamicTable {
    entries: VecDeque<DynamicEntry>,
    size: usize,
    max_size: usize,
}

impl DynamicTable {
    pub fn new(max_size: usize) -> Self {
        DynamicTable {
            entries: VecDeque::new(),
            size: 0,
            max_size,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current byte accounting (RFC 7541 §4.1).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Insert a new entry at the front, evicting old entries from the back
    /// until the table fits within `max_size`. An entry larger than
    /// `max_size` by itself results in an empty table (RFC 7541 §4.4).
    pub fn add(&mut self, name: String, value: String) {
        let entry = DynamicEntry { name, value };
        let entry_size = entry.size();
        self.evict_to_fit(entry_size);
        if entry_size > self.max_size {
            return;
        }
        self.size += entry_size;
        self.entries.push_front(entry);
    }

    /// Look up a 1-based dynamic-table index (1 = most recently added).
    pub fn get(&self, index: usize) -> Option<&DynamicEntry> {
        if index == 0 {
            return None;
        }
        self.entries.get(index - 1)
    }

    /// Lowest dynamic-table index with an exact `(name, value)` match.
    pub fn find_exact(&self, name: &str, value: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.name == name && e.value == value)
            .map(|i| i + 1)
    }

    /// Lowest dynamic-table index with a matching name.
    pub fn find_name(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name).map(|i| i + 1)
    }

    /// Apply a dynamic table size update (RFC 7541 §6.3). Shrinking evicts
    /// immediately; growing just raises the ceiling.
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        self.evict_to_fit(0);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.size = 0;
    }

    fn evict_to_fit(&mut self, incoming: usize) {
        while self.size + incoming > self.max_size {
            match self.entries.pop_back() {
                Some(evicted) => self.size -= evicted.size(),
                None => break,
            }
        }
    }
}
