//! String-keyed open-addressing map backing variable and function storage.
//!
//! Capacity is always a power of two so the FNV-1a hash can be reduced with a
//! mask. Slots are probed linearly; an empty slot ends every probe sequence,
//! which holds because the table grows before load reaches 70%.

use tracing::trace;

const INITIAL_CAPACITY: usize = 16;
const MAX_LOAD_FACTOR: f64 = 0.7;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

pub fn fnv1a32(data: &[u8]) -> u32 {
    data.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

#[derive(Debug, Clone)]
struct Entry<V> {
    name: String,
    value: V,
}

#[derive(Debug, Clone)]
pub struct SymbolTable<V> {
    slots: Vec<Option<Entry<V>>>,
    len: usize,
}

impl<V> Default for SymbolTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> SymbolTable<V> {
    pub fn new() -> Self {
        Self{slots: Vec::new(), len: 0}
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot holding `name`, or the empty slot where it would be inserted.
    fn slot_index(slots: &[Option<Entry<V>>], name: &str) -> usize {
        let mask = slots.len() - 1;
        let mut index = fnv1a32(name.as_bytes()) as usize & mask;
        loop {
            match &slots[index] {
                Some(entry) if entry.name != name => index = (index + 1) & mask,
                _ => return index,
            }
        }
    }

    fn find(&self, name: &str) -> Option<&Entry<V>> {
        if self.slots.is_empty() {
            return None;
        }
        self.slots[Self::slot_index(&self.slots, name)].as_ref()
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.find(name).map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        if self.slots.is_empty() {
            return None;
        }
        let index = Self::slot_index(&self.slots, name);
        self.slots[index].as_mut().map(|entry| &mut entry.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Inserts `name` or overwrites its value.
    pub fn set(&mut self, name: &str, value: V) {
        if self.slots.is_empty() || self.len as f64 / self.slots.len() as f64 >= MAX_LOAD_FACTOR {
            self.grow();
        }

        let index = Self::slot_index(&self.slots, name);
        match &mut self.slots[index] {
            Some(entry) => entry.value = value,
            empty => {
                *empty = Some(Entry{name: name.to_string(), value});
                self.len += 1;
            },
        }
    }

    fn grow(&mut self) {
        let capacity = if self.slots.is_empty() { INITIAL_CAPACITY } else { self.slots.len() * 2 };
        trace!(from = self.slots.len(), to = capacity, len = self.len, "growing symbol table");

        let mut slots: Vec<Option<Entry<V>>> = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);

        for entry in std::mem::take(&mut self.slots).into_iter().flatten() {
            let index = Self::slot_index(&slots, &entry.name);
            slots[index] = Some(entry);
        }
        self.slots = slots;
    }

    /// Entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.slots
            .iter()
            .flatten()
            .map(|entry| (entry.name.as_str(), &entry.value))
    }
}
