//! Document store: ordered elements plus the current selection.
//!
//! Elements live in a `Vec` whose order is the z-order -- later elements draw
//! on top. There is no explicit layer field; insertion order is the only
//! stacking rule, so duplicate and paste append and therefore land on top.
//!
//! The selection is a set of element ids kept alongside the store. Every
//! mutation that can remove elements prunes the selection so it never holds
//! a dangling id. Operations addressed at unknown ids are silent no-ops.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use crate::camera::Point;
use crate::consts::DUPLICATE_OFFSET;
use crate::element::{Element, ElementId};
use crate::geometry::{Bounds, MeasureCache, bounds};
use crate::hit;

/// Ordered element list with selection state.
#[derive(Debug, Default)]
pub struct ElementStore {
    elements: Vec<Element>,
    selection: HashSet<ElementId>,
}

impl ElementStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Elements ────────────────────────────────────────────────────────

    /// Append an element on top of the stack, returning its id.
    pub fn add(&mut self, element: Element) -> ElementId {
        let id = element.id;
        self.elements.push(element);
        id
    }

    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Apply a mutation to one element. Unknown id is a no-op.
    pub fn update(&mut self, id: ElementId, f: impl FnOnce(&mut Element)) {
        if let Some(e) = self.elements.iter_mut().find(|e| e.id == id) {
            f(e);
        }
    }

    /// Remove one element, pruning it from the selection.
    pub fn remove(&mut self, id: ElementId) {
        self.elements.retain(|e| e.id != id);
        self.selection.remove(&id);
    }

    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Deep copy of the element list, for history snapshots and persistence.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Element> {
        self.elements.clone()
    }

    /// Replace the whole element list, dropping selection entries whose
    /// element no longer exists. Used by undo/redo and load.
    pub fn restore(&mut self, elements: Vec<Element>) {
        self.elements = elements;
        let live: HashSet<ElementId> = self.elements.iter().map(|e| e.id).collect();
        self.selection.retain(|id| live.contains(id));
    }

    /// Topmost element under a world point.
    #[must_use]
    pub fn topmost_at(&self, p: Point, text: &MeasureCache) -> Option<&Element> {
        hit::topmost_at(&self.elements, p, text)
    }

    // ── Selection ───────────────────────────────────────────────────────

    #[must_use]
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection.contains(&id)
    }

    #[must_use]
    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    /// Selected elements in z-order.
    pub fn selected(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| self.selection.contains(&e.id))
    }

    /// The selected element, only when exactly one is selected.
    #[must_use]
    pub fn single_selected(&self) -> Option<&Element> {
        if self.selection.len() == 1 { self.selected().next() } else { None }
    }

    /// Make `id` the only selected element.
    pub fn select_only(&mut self, id: ElementId) {
        self.selection.clear();
        if self.get(id).is_some() {
            self.selection.insert(id);
        }
    }

    /// Add or remove `id` from the selection.
    pub fn toggle_selected(&mut self, id: ElementId) {
        if self.get(id).is_none() {
            return;
        }
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Select every element fully contained by the marquee box. With
    /// `additive` the contained set joins the existing selection, otherwise
    /// it replaces it. Partially overlapped elements stay unselected.
    pub fn select_contained(&mut self, marquee: &Bounds, text: &MeasureCache, additive: bool) {
        if !additive {
            self.selection.clear();
        }
        for e in &self.elements {
            if bounds(&e.shape, text).is_some_and(|b| marquee.contains_bounds(&b)) {
                self.selection.insert(e.id);
            }
        }
    }

    /// Combined bounding box of the current selection.
    #[must_use]
    pub fn selection_bounds(&self, text: &MeasureCache) -> Option<Bounds> {
        let mut acc: Option<Bounds> = None;
        for e in self.selected() {
            let Some(b) = bounds(&e.shape, text) else { continue };
            acc = Some(match acc {
                None => b,
                Some(a) => {
                    let x = a.x.min(b.x);
                    let y = a.y.min(b.y);
                    Bounds::new(x, y, a.right().max(b.right()) - x, a.bottom().max(b.bottom()) - y)
                }
            });
        }
        acc
    }

    // ── Bulk operations on the selection ────────────────────────────────

    /// Move every selected element by a world-space delta.
    pub fn translate_selected(&mut self, dx: f64, dy: f64) {
        for e in &mut self.elements {
            if self.selection.contains(&e.id) {
                e.shape.translate(dx, dy);
            }
        }
    }

    /// Delete every selected element. Returns how many were removed.
    pub fn remove_selected(&mut self) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| !self.selection.contains(&e.id));
        self.selection.clear();
        before - self.elements.len()
    }

    /// Clone the selection with fresh ids, offset diagonally, appended on
    /// top. The clones become the new selection.
    pub fn duplicate_selected(&mut self) -> Vec<ElementId> {
        let clones: Vec<Element> = self
            .selected()
            .map(|e| e.cloned_offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET))
            .collect();
        let ids: Vec<ElementId> = clones.iter().map(|e| e.id).collect();
        self.elements.extend(clones);
        self.selection = ids.iter().copied().collect();
        ids
    }

    /// Append clones of the given elements with fresh ids, offset so pasted
    /// content does not sit exactly over its source. The clones become the
    /// new selection.
    pub fn paste(&mut self, source: &[Element]) -> Vec<ElementId> {
        let clones: Vec<Element> = source
            .iter()
            .map(|e| e.cloned_offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET))
            .collect();
        let ids: Vec<ElementId> = clones.iter().map(|e| e.id).collect();
        self.elements.extend(clones);
        self.selection = ids.iter().copied().collect();
        ids
    }
}
