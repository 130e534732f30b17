//! Live particle storage with O(1) unordered removal

use super::state::Element;

/// Contiguous array of live particles
///
/// Removal swaps the last particle into the freed slot, so the order of
/// survivors is not preserved.
#[derive(Debug, Clone, Default)]
pub struct ParticlePool {
    elements: Vec<Element>,
}

impl ParticlePool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.elements.capacity()
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn as_slice(&self) -> &[Element] {
        &self.elements
    }

    pub fn as_mut_slice(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Drop every disabled particle, returning how many were removed
    pub fn compact(&mut self) -> usize {
        let before = self.elements.len();
        let mut i = 0;
        while i < self.elements.len() {
            if self.elements[i].enabled {
                i += 1;
            } else {
                // Don't advance: the particle swapped in still needs checking
                self.elements.swap_remove(i);
            }
        }
        before - self.elements.len()
    }
}
