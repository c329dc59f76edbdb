/// How a click changes the point selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Replace the selection with the clicked point
    #[default]
    Single,
    /// Toggle the clicked point's membership
    Additive,
    /// Fill the span from the last touched point to the clicked one
    Range,
}

/// Ordered point selection with a range anchor.
///
/// Order is the order points were selected in, which is what
/// "duplicate selection" follows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointSelection {
    indices: Vec<usize>,
    anchor: Option<usize>,
}

impl PointSelection {
    pub fn single(index: usize) -> Self {
        Self {
            indices: vec![index],
            anchor: Some(index),
        }
    }

    pub fn apply(&mut self, index: usize, mode: SelectionMode) {
        match (mode, self.anchor) {
            (SelectionMode::Single, _) | (SelectionMode::Range, None) => {
                *self = Self::single(index);
            }
            (SelectionMode::Additive, _) => {
                if let Some(pos) = self.indices.iter().position(|&i| i == index) {
                    self.indices.remove(pos);
                } else {
                    self.indices.push(index);
                }
                self.anchor = Some(index);
            }
            (SelectionMode::Range, Some(anchor)) => {
                let span: Box<dyn Iterator<Item = usize>> = if anchor <= index {
                    Box::new(anchor..=index)
                } else {
                    Box::new((index..=anchor).rev())
                };
                for i in span {
                    if !self.indices.contains(&i) {
                        self.indices.push(i);
                    }
                }
                self.anchor = Some(index);
            }
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// The point the next range selection extends from
    pub fn last_touched(&self) -> Option<usize> {
        self.anchor
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
        self.anchor = None;
    }
}
