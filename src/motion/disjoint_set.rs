use std::collections::{BTreeMap, BTreeSet};

/// Groups of items, where joining two items joins their whole groups. Items that have never been
/// joined to anything are kept as groups of one.
#[derive(Debug, Clone, Default)]
pub struct DisjointSet<T>
where
    T: Ord,
{
    //Maps an item to the index of "entries" holding its group
    map: BTreeMap<T, usize>,
    entries: Vec<BTreeSet<T>>,
}

impl<T> DisjointSet<T>
where
    T: Ord + Clone,
{
    /// Add an item in a group of its own. Does nothing if the item is already present.
    pub fn insert_single(&mut self, item: T) {
        if !self.map.contains_key(&item) {
            self.insert_known_new_entry([item]);
        }
    }

    /// Join the groups of `i1` and `i2`, adding either if not yet present.
    pub fn union(&mut self, i1: T, i2: T) {
        let (i1_idx, i2_idx) = (self.map.get(&i1).copied(), self.map.get(&i2).copied());

        //both already in the same group, so nothing to do.
        if i1_idx.is_some() && i1_idx == i2_idx {
            return;
        }

        match (i1_idx, i2_idx) {
            (None, None) => self.insert_known_new_entry([i1, i2]),
            (None, Some(idx)) | (Some(idx), None) => self.append_to_entry(idx, [i1, i2]),
            (Some(idx_1), Some(idx_2)) => self.merge_entries(idx_1, idx_2),
        }
    }

    #[cfg(test)]
    pub fn contains_pair(&self, i1: &T, i2: &T) -> bool {
        match (self.map.get(i1), self.map.get(i2)) {
            (Some(idx_1), Some(idx_2)) => idx_1 == idx_2,
            _ => false,
        }
    }

    /// Every group. Each group iterates in ascending order, but groups come in no particular order.
    pub fn sets(&self) -> impl Iterator<Item = &BTreeSet<T>> {
        self.entries.iter()
    }

    fn append_to_entry(&mut self, idx: usize, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.map.insert(item.clone(), idx);
            self.entries[idx].insert(item);
        }
    }

    fn insert_known_new_entry(&mut self, items: impl IntoIterator<Item = T>) {
        let entry = items.into_iter().collect::<BTreeSet<_>>();

        //the new entry goes at the back of the entry list
        let idx = self.entries.len();
        for item in entry.iter().cloned() {
            self.map.insert(item, idx);
        }

        self.entries.push(entry);
    }

    //merge two entries into whichever has the lower index. The higher is removed with swap_remove,
    //so the entry previously at the back may be renumbered.
    fn merge_entries(&mut self, idx_1: usize, idx_2: usize) {
        let (keep_idx, remove_idx) = if idx_1 < idx_2 {
            (idx_1, idx_2)
        } else {
            (idx_2, idx_1)
        };

        let removed = self.entries.swap_remove(remove_idx);
        for item in removed {
            self.map.insert(item.clone(), keep_idx);
            self.entries[keep_idx].insert(item);
        }

        //if an entry was moved into the removed slot, point its items at their new index.
        if let Some(moved) = self.entries.get(remove_idx) {
            for item in moved {
                self.map.insert(item.clone(), remove_idx);
            }
        }
    }
}
