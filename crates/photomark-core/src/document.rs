//! Committed stroke list with snapshot undo/redo.

use crate::strokes::Stroke;
use serde::{Deserialize, Serialize};

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// The committed strokes of one annotated photo.
///
/// An ordered, append-only sequence: insertion order is z-order is
/// chronological order. Committed strokes are never edited in place; the
/// list changes only through [`push`](Self::push), [`undo`](Self::undo),
/// [`redo`](Self::redo) and [`clear`](Self::clear).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrokeList {
    strokes: Vec<Stroke>,
    /// Undo history stack (whole-list snapshots).
    #[serde(skip)]
    undo_stack: Vec<Vec<Stroke>>,
    /// Redo history stack.
    #[serde(skip)]
    redo_stack: Vec<Vec<Stroke>>,
}

impl StrokeList {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list from previously persisted strokes.
    pub fn from_strokes(strokes: Vec<Stroke>) -> Self {
        Self {
            strokes,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Push the current state onto the undo stack.
    fn push_undo(&mut self) {
        self.undo_stack.push(self.strokes.clone());

        // Any new committed change discards the redo branch.
        self.redo_stack.clear();

        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Append a finalized stroke.
    pub fn push(&mut self, stroke: Stroke) {
        self.push_undo();
        self.strokes.push(stroke);
    }

    /// Clear all strokes. The prior state remains undoable.
    pub fn clear(&mut self) {
        if self.strokes.is_empty() {
            return;
        }
        self.push_undo();
        self.strokes.clear();
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        if let Some(snapshot) = self.undo_stack.pop() {
            self.redo_stack.push(std::mem::replace(&mut self.strokes, snapshot));
            true
        } else {
            false
        }
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        if let Some(snapshot) = self.redo_stack.pop() {
            self.undo_stack.push(std::mem::replace(&mut self.strokes, snapshot));
            true
        } else {
            false
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// The committed strokes, in z-order (back to front).
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Get the number of committed strokes.
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Serialize the list to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a list from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strokes::{Line, StrokeStyle};
    use kurbo::Point;

    fn line(y: f64) -> Stroke {
        Stroke::Line(Line::new(
            Point::new(0.0, y),
            Point::new(10.0, y),
            StrokeStyle::default(),
        ))
    }

    #[test]
    fn test_push_appends_in_order() {
        let mut list = StrokeList::new();
        let first = line(0.0);
        let second = line(1.0);
        let first_id = first.id();
        let second_id = second.id();

        list.push(first);
        list.push(second);

        assert_eq!(list.len(), 2);
        assert_eq!(list.strokes()[0].id(), first_id);
        assert_eq!(list.strokes()[1].id(), second_id);
    }

    #[test]
    fn test_n_undos_empty_the_list() {
        let mut list = StrokeList::new();
        for i in 0..5 {
            list.push(line(i as f64));
        }

        for _ in 0..5 {
            assert!(list.undo());
        }
        assert!(list.is_empty());

        // Undo of an empty history is a no-op.
        assert!(!list.undo());
        assert!(list.is_empty());
    }

    #[test]
    fn test_redo_restores_exact_stroke() {
        let mut list = StrokeList::new();
        list.push(line(0.0));
        let popped = line(1.0);
        let popped_id = popped.id();
        list.push(popped);

        assert!(list.undo());
        assert_eq!(list.len(), 1);

        assert!(list.redo());
        assert_eq!(list.len(), 2);
        assert_eq!(list.strokes()[1].id(), popped_id);
    }

    #[test]
    fn test_new_stroke_discards_redo_branch() {
        let mut list = StrokeList::new();
        list.push(line(0.0));
        list.push(line(1.0));

        assert!(list.undo());
        assert!(list.can_redo());

        list.push(line(2.0));
        assert!(!list.can_redo());
        assert!(!list.redo());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_clear_is_undoable() {
        let mut list = StrokeList::new();
        list.push(line(0.0));
        list.push(line(1.0));

        list.clear();
        assert!(list.is_empty());

        assert!(list.undo());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_clear_discards_redo() {
        let mut list = StrokeList::new();
        list.push(line(0.0));
        list.push(line(1.0));
        assert!(list.undo());
        assert!(list.can_redo());

        list.clear();
        assert!(!list.can_redo());
    }

    #[test]
    fn test_clear_on_empty_list_is_noop() {
        let mut list = StrokeList::new();
        list.clear();
        assert!(!list.can_undo());
    }

    #[test]
    fn test_undo_history_is_capped() {
        let mut list = StrokeList::new();
        for i in 0..60 {
            list.push(line(i as f64));
        }

        let mut undos = 0;
        while list.undo() {
            undos += 1;
        }
        assert_eq!(undos, 50);
        // The oldest snapshots were dropped, so 10 strokes remain.
        assert_eq!(list.len(), 10);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut list = StrokeList::new();
        list.push(line(0.0));
        list.push(line(1.0));

        let json = list.to_json().unwrap();
        let back = StrokeList::from_json(&json).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back.strokes()[0].id(), list.strokes()[0].id());
        // History is runtime state and does not persist.
        assert!(!back.can_undo());
    }
}
