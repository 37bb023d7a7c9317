use std::ops::{Index, IndexMut};

/// A key into a `SlotArena`.
///
/// The generation makes slots of removed values stale: a slot is only ever
/// valid for the value it was returned for, even after its index is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    index: u32,
    generation: u32,
}

impl Slot {
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

#[derive(Debug)]
enum Entry<V> {
    Occupied { generation: u32, value: V },
    Vacant { generation: u32, next_free: Option<u32> },
}

/// A collection that allows storing a heap of same-type structures
/// with a true O(1) access time.
///
/// Much like a `SlotMap` this collection returns a `Slot` on insertion,
/// which can be used to access the stored value.
///
/// Unlike a persistent map, values can be removed. Freed entries are
/// reused by later inserts, with their generation bumped so that the
/// slots handed out before stay invalid.
///
/// Iteration goes in index order, which is the insertion order as long
/// as nothing was removed.
#[derive(Debug)]
pub struct SlotArena<V> {
    entries: Vec<Entry<V>>,
    free_head: Option<u32>,
    len: usize,
}

impl<V> Default for SlotArena<V> {
    fn default() -> Self {
        Self {
            entries: Default::default(),
            free_head: None,
            len: 0,
        }
    }
}

impl<V> SlotArena<V> {
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, value: V) -> Slot {
        self.len += 1;

        match self.free_head {
            Some(index) => {
                let entry = &mut self.entries[index as usize];
                let (generation, next_free) = match entry {
                    Entry::Vacant {
                        generation,
                        next_free,
                    } => (generation.wrapping_add(1), *next_free),
                    Entry::Occupied { .. } => unreachable!("free list points to an occupied entry"),
                };

                *entry = Entry::Occupied { generation, value };
                self.free_head = next_free;
                Slot { index, generation }
            }
            None => {
                let index = self.entries.len() as u32;
                self.entries.push(Entry::Occupied {
                    generation: 0,
                    value,
                });
                Slot {
                    index,
                    generation: 0,
                }
            }
        }
    }

    pub fn remove(&mut self, slot: Slot) -> Option<V> {
        if !self.contains(slot) {
            return None;
        }

        let vacant = Entry::Vacant {
            generation: slot.generation,
            next_free: self.free_head,
        };

        match std::mem::replace(&mut self.entries[slot.index()], vacant) {
            Entry::Occupied { value, .. } => {
                self.free_head = Some(slot.index);
                self.len -= 1;
                Some(value)
            }
            Entry::Vacant { .. } => None,
        }
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.get(slot).is_some()
    }

    pub fn get(&self, slot: Slot) -> Option<&V> {
        match self.entries.get(slot.index()) {
            Some(Entry::Occupied { generation, value }) if *generation == slot.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut V> {
        match self.entries.get_mut(slot.index()) {
            Some(Entry::Occupied { generation, value }) if *generation == slot.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, &V)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match entry {
                Entry::Occupied { generation, value } => Some((
                    Slot {
                        index: index as u32,
                        generation: *generation,
                    },
                    value,
                )),
                Entry::Vacant { .. } => None,
            })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Slot, &mut V)> {
        self.entries
            .iter_mut()
            .enumerate()
            .filter_map(|(index, entry)| match entry {
                Entry::Occupied { generation, value } => Some((
                    Slot {
                        index: index as u32,
                        generation: *generation,
                    },
                    value,
                )),
                Entry::Vacant { .. } => None,
            })
    }

    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.iter().map(|(slot, _)| slot)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }
}

impl<V> Index<Slot> for SlotArena<V> {
    type Output = V;

    fn index(&self, slot: Slot) -> &Self::Output {
        self.get(slot).expect("stale or unknown slot")
    }
}

impl<V> IndexMut<Slot> for SlotArena<V> {
    fn index_mut(&mut self, slot: Slot) -> &mut Self::Output {
        self.get_mut(slot).expect("stale or unknown slot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut arena = SlotArena::default();
        let a = arena.insert("a");
        let b = arena.insert("b");

        assert_eq!(arena.len(), 2);
        assert_eq!(arena[a], "a");
        assert_eq!(arena.get(b), Some(&"b"));
    }

    #[test]
    fn test_removed_slot_stays_stale_after_reuse() {
        let mut arena = SlotArena::default();
        let a = arena.insert(1);
        assert_eq!(arena.remove(a), Some(1));
        assert_eq!(arena.remove(a), None);

        let b = arena.insert(2);
        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(!arena.contains(a));
        assert_eq!(arena[b], 2);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_iteration_skips_vacant_entries() {
        let mut arena = SlotArena::default();
        let slots: Vec<Slot> = (0..4).map(|i| arena.insert(i)).collect();
        arena.remove(slots[1]);
        arena.remove(slots[2]);

        let values: Vec<i32> = arena.values().copied().collect();
        assert_eq!(values, vec![0, 3]);

        for (_, value) in arena.iter_mut() {
            *value *= 10;
        }
        assert_eq!(arena[slots[3]], 30);
    }
}
