/// Ordered selection over scene feature indices with ring-buffer-of-two
/// semantics.
///
/// Transition rule per click on feature `f`:
/// - fewer picks than capacity: append `f` (re-clicking the same feature
///   appends a duplicate pick);
/// - at capacity: replace the whole selection with `[f]`.
///
/// Invariant: `picks().len() <= capacity <= 2`, checked by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    picks: Vec<usize>,
    capacity: usize,
}

/// What a click did to the selection; the controller maps this to
/// overlay and framing side effects.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// The feature was appended; the payload is the new length.
    Appended(usize),
    /// The selection was at capacity and restarted as `[f]`.
    Restarted,
}

/// Highlight role of a feature under the current selection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Highlight {
    /// First pick (red in the default theme).
    Primary,
    /// Second pick (blue in the default theme).
    Secondary,
    None,
}

impl Selection {
    /// `capacity` is clamped into `1..=2`.
    pub fn new(capacity: usize) -> Self {
        Self {
            picks: Vec::with_capacity(2),
            capacity: capacity.clamp(1, 2),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn picks(&self) -> &[usize] {
        &self.picks
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn clear(&mut self) {
        self.picks.clear();
    }

    pub fn click(&mut self, feature: usize) -> SelectionChange {
        if self.picks.len() < self.capacity {
            self.picks.push(feature);
            SelectionChange::Appended(self.picks.len())
        } else {
            self.picks.clear();
            self.picks.push(feature);
            SelectionChange::Restarted
        }
    }

    pub fn highlight(&self, feature: usize) -> Highlight {
        match self.picks.iter().position(|&p| p == feature) {
            Some(0) => Highlight::Primary,
            Some(_) => Highlight::Secondary,
            None => Highlight::None,
        }
    }
}
