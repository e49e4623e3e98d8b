//! Named board positions.

use serde::{Deserialize, Serialize};

/// A cell of the 3x3 grid, numbered 0-8 left to right, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// Row 0, column 0.
    TopLeft,
    /// Row 0, column 1.
    TopCenter,
    /// Row 0, column 2.
    TopRight,
    /// Row 1, column 0.
    MiddleLeft,
    /// Row 1, column 1.
    Center,
    /// Row 1, column 2.
    MiddleRight,
    /// Row 2, column 0.
    BottomLeft,
    /// Row 2, column 1.
    BottomCenter,
    /// Row 2, column 2.
    BottomRight,
}

const LABELS: [&str; 9] = [
    "Top-left",
    "Top-center",
    "Top-right",
    "Middle-left",
    "Center",
    "Middle-right",
    "Bottom-left",
    "Bottom-center",
    "Bottom-right",
];

impl Position {
    /// Every cell in index order.
    pub const ALL: [Position; 9] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::MiddleLeft,
        Self::Center,
        Self::MiddleRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    /// Corner cells, in index order.
    pub const CORNERS: [Position; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Human-readable name such as `Top-left`.
    pub fn label(&self) -> &'static str {
        LABELS[self.to_index()]
    }

    /// Board index, 0-8.
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// The cell at `index`, or `None` past the last cell.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Neighbor one row up, clamped at the edge.
    pub fn up(self) -> Self {
        let i = self.to_index();
        Self::ALL[if i >= 3 { i - 3 } else { i }]
    }

    /// Neighbor one row down, clamped at the edge.
    pub fn down(self) -> Self {
        let i = self.to_index();
        Self::ALL[if i < 6 { i + 3 } else { i }]
    }

    /// Neighbor one column left, clamped at the edge.
    pub fn left(self) -> Self {
        let i = self.to_index();
        Self::ALL[if i % 3 > 0 { i - 1 } else { i }]
    }

    /// Neighbor one column right, clamped at the edge.
    pub fn right(self) -> Self {
        let i = self.to_index();
        Self::ALL[if i % 3 < 2 { i + 1 } else { i }]
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
