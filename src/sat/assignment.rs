use std::collections::TryReserveError;

/// Truth values per atom. Slot 0 is unused so atoms index directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    slots: Vec<Option<bool>>,
}

impl Assignment {
    pub fn new(num_atoms: usize) -> Self {
        Self {
            slots: vec![None; num_atoms + 1],
        }
    }

    pub fn num_atoms(&self) -> usize {
        self.slots.len() - 1
    }

    pub fn get(&self, atom: u32) -> Option<bool> {
        self.slots.get(atom as usize).copied().flatten()
    }

    pub fn is_unassigned(&self, atom: u32) -> bool {
        self.get(atom).is_none()
    }

    pub fn is_blank(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Writes `value` into an empty slot. Returns false when the slot already
    /// holds a value; the caller decides whether that is a conflict.
    pub(crate) fn set(&mut self, atom: u32, value: bool) -> bool {
        let slot = &mut self.slots[atom as usize];
        if slot.is_some() {
            return false;
        }
        *slot = Some(value);
        true
    }

    pub(crate) fn clear(&mut self, atom: u32) {
        self.slots[atom as usize] = None;
    }

    pub fn first_unassigned(&self) -> Option<u32> {
        (1..self.slots.len())
            .find(|&i| self.slots[i].is_none())
            .map(|i| i as u32)
    }

    /// Copies every settled slot of `settled` into slots still empty here.
    pub fn reconcile_from(&mut self, settled: &Assignment) {
        for (mine, theirs) in self.slots.iter_mut().zip(settled.slots.iter()) {
            if mine.is_none() {
                *mine = *theirs;
            }
        }
    }

    pub fn as_slice(&self) -> &[Option<bool>] {
        &self.slots
    }

    pub(crate) fn try_clone(&self) -> Result<Self, TryReserveError> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(self.slots.len())?;
        slots.extend_from_slice(&self.slots);
        Ok(Self { slots })
    }
}
