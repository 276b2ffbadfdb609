//! Generation-checked handle tables for objects owned across the C boundary.
//!
//! A handle packs the owning table's kind tag (high 8 bits), a slot index
//! (next 24 bits) and the slot's generation (low 32 bits). Removing an
//! entry bumps the generation, so any copy of the old handle stops
//! resolving: lookups and removals through it return `None` instead of
//! touching whatever reuses the slot. The kind tag makes a grid handle
//! passed where a field is expected fail the same way.

/// Which table issued a handle. Zero is never a kind, so a zeroed `u64`
/// never resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum HandleKind {
    Grid = 1,
    Partitioner = 2,
    FunctionSpace = 3,
    Field = 4,
}

const SLOT_BITS: u32 = 24;
const MAX_SLOTS: u32 = 1 << SLOT_BITS;

fn pack(kind: HandleKind, slot: u32, generation: u32) -> u64 {
    (u64::from(kind as u8) << 56) | (u64::from(slot) << 32) | u64::from(generation)
}

fn unpack(handle: u64) -> (u8, u32, u32) {
    (
        (handle >> 56) as u8,
        ((handle >> 32) as u32) & (MAX_SLOTS - 1),
        handle as u32,
    )
}

struct Entry<T> {
    generation: u32,
    value: Option<T>,
}

/// Owned values of one [`HandleKind`], addressed by `u64` handles.
///
/// Freed slots are reused through a free list. A slot whose generation
/// wraps around is retired for good, so a handle issued 2^32 generations
/// ago can never alias a new value.
pub(crate) struct HandleTable<T> {
    kind: HandleKind,
    entries: Vec<Entry<T>>,
    free: Vec<u32>,
}

impl<T> HandleTable<T> {
    /// An empty table issuing `kind` handles, usable in a `static`.
    pub const fn new(kind: HandleKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Take ownership of `value` and return its handle, or `None` once
    /// every slot is live or retired.
    pub fn insert(&mut self, value: T) -> Option<u64> {
        match self.free.pop() {
            Some(slot) => {
                let entry = &mut self.entries[slot as usize];
                entry.value = Some(value);
                Some(pack(self.kind, slot, entry.generation))
            }
            None => {
                let slot = u32::try_from(self.entries.len())
                    .ok()
                    .filter(|&s| s < MAX_SLOTS)?;
                self.entries.push(Entry {
                    generation: 0,
                    value: Some(value),
                });
                Some(pack(self.kind, slot, 0))
            }
        }
    }

    fn locate(&self, handle: u64) -> Option<(usize, u32)> {
        let (kind, slot, generation) = unpack(handle);
        (kind == self.kind as u8).then_some((slot as usize, generation))
    }

    /// The value behind `handle`, if it is live.
    pub fn get(&self, handle: u64) -> Option<&T> {
        let (slot, generation) = self.locate(handle)?;
        self.entries
            .get(slot)
            .filter(|e| e.generation == generation)?
            .value
            .as_ref()
    }

    /// Mutable access to the value behind `handle`, if it is live.
    pub fn get_mut(&mut self, handle: u64) -> Option<&mut T> {
        let (slot, generation) = self.locate(handle)?;
        let entry = self.entries.get_mut(slot)?;
        if entry.generation != generation {
            return None;
        }
        entry.value.as_mut()
    }

    /// Take the value behind `handle` out of the table. Stale handles,
    /// handles of another kind, and repeated removals return `None`.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let (slot, generation) = self.locate(handle)?;
        let entry = self.entries.get_mut(slot)?;
        if entry.generation != generation {
            return None;
        }
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        if entry.generation != 0 {
            // Lossless: `slot` came from a handle this table issued.
            self.free.push(slot as u32);
        }
        Some(value)
    }
}
