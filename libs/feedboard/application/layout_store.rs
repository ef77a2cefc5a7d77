//! Persisted workspace layout
//!
//! Every mutation serializes the full element list and writes it to the
//! backing slot before the in-memory copy changes, so a failed write leaves
//! both sides on the previous layout.

use crate::domain::{default_layout, LayoutElement};
use crate::infrastructure::storage::{KeyValueStore, Result};
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub struct LayoutStore<S: KeyValueStore> {
    elements: Vec<LayoutElement>,
    store: S,
    key: String,
}

impl<S: KeyValueStore> LayoutStore<S> {
    /// Load the layout held under `key`
    ///
    /// An absent slot is seeded with the default layout. A slot that does
    /// not decode is logged and overwritten with the default.
    pub fn load(store: S, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let stored = store.get(&key)?;

        let mut layout = Self {
            elements: default_layout(),
            store,
            key,
        };

        match stored {
            Some(bytes) => match serde_json::from_slice::<Vec<LayoutElement>>(&bytes) {
                Ok(elements) => {
                    debug!("[Layout] Loaded {} elements from {:?}", elements.len(), layout.key);
                    if has_duplicate_ids(&elements) {
                        warn!(
                            "[Layout] Slot {:?} repeats element ids; lookups use the first match",
                            layout.key
                        );
                    }
                    layout.elements = elements;
                }
                Err(e) => {
                    warn!(
                        "[Layout] Slot {:?} is unreadable ({}), restoring default",
                        layout.key, e
                    );
                    layout.commit(default_layout())?;
                }
            },
            None => {
                info!("[Layout] Slot {:?} is empty, seeding default layout", layout.key);
                layout.commit(default_layout())?;
            }
        }

        Ok(layout)
    }

    /// Elements in storage order
    pub fn elements(&self) -> &[LayoutElement] {
        &self.elements
    }

    pub fn get(&self, id: u32) -> Option<&LayoutElement> {
        self.elements.iter().find(|element| element.id == id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Stack `id` strictly above every other element
    ///
    /// When the top of the stack is already at `i64::MAX` the stack is first
    /// renumbered `1..=n`, keeping the relative order.
    pub fn bring_to_front(&mut self, id: u32) -> Result<bool> {
        let Some(index) = self.index_of(id) else {
            debug!("[Layout] No element {}", id);
            return Ok(false);
        };

        let mut next = self.elements.clone();
        if top_z(&next) == i64::MAX {
            debug!("[Layout] Stack order exhausted, renumbering");
            renumber_stack(&mut next);
        }
        next[index].z_index = top_z(&next) + 1;

        self.commit(next)?;
        Ok(true)
    }

    pub fn move_to(&mut self, id: u32, x: f64, y: f64) -> Result<bool> {
        self.update(id, |element| {
            element.x = x;
            element.y = y;
        })
    }

    /// Set the size as given; callers apply [`clamp_size`](crate::domain::clamp_size)
    pub fn resize(&mut self, id: u32, width: f64, height: f64) -> Result<bool> {
        self.update(id, |element| {
            element.width = width;
            element.height = height;
        })
    }

    /// Remove `id`; removing a missing element writes nothing
    pub fn remove(&mut self, id: u32) -> Result<bool> {
        if self.get(id).is_none() {
            debug!("[Layout] remove: no element {}", id);
            return Ok(false);
        }

        let next = self
            .elements
            .iter()
            .filter(|element| element.id != id)
            .copied()
            .collect();
        self.commit(next)?;
        Ok(true)
    }

    /// Replace everything with the default layout
    pub fn reset_all(&mut self) -> Result<()> {
        info!("[Layout] Resetting to default layout");
        self.commit(default_layout())
    }

    fn index_of(&self, id: u32) -> Option<usize> {
        self.elements.iter().position(|element| element.id == id)
    }

    fn update(&mut self, id: u32, apply: impl FnOnce(&mut LayoutElement)) -> Result<bool> {
        let Some(index) = self.index_of(id) else {
            debug!("[Layout] No element {}", id);
            return Ok(false);
        };

        let mut next = self.elements.clone();
        apply(&mut next[index]);
        self.commit(next)?;
        Ok(true)
    }

    fn commit(&mut self, next: Vec<LayoutElement>) -> Result<()> {
        let bytes = serde_json::to_vec(&next)?;
        self.store.set(&self.key, &bytes)?;
        self.elements = next;
        Ok(())
    }
}

fn top_z(elements: &[LayoutElement]) -> i64 {
    elements
        .iter()
        .map(|element| element.z_index)
        .max()
        .unwrap_or(0)
}

// Ties keep storage order
fn renumber_stack(elements: &mut [LayoutElement]) {
    let mut order: Vec<usize> = (0..elements.len()).collect();
    order.sort_by_key(|&i| elements[i].z_index);

    for (rank, i) in order.into_iter().enumerate() {
        elements[i].z_index = rank as i64 + 1;
    }
}

fn has_duplicate_ids(elements: &[LayoutElement]) -> bool {
    let mut seen = HashSet::with_capacity(elements.len());
    !elements.iter().all(|element| seen.insert(element.id))
}
