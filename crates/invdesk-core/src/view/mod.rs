//! Display model: domain objects as list rows.

mod invoice;
mod list;

pub use list::{ListModel, Row, SortDirection};

use std::fmt;

/// Presentation tag of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowTag {
    /// Default tag for rows at even visible positions.
    Even,
    /// Default tag for rows at odd visible positions.
    Odd,
    /// Tag chosen by the object itself (e.g. its status).
    Named(&'static str),
}

impl RowTag {
    /// Alternating even/odd tag for a visible position.
    pub fn alternating(position: usize) -> Self {
        if position % 2 == 0 {
            RowTag::Even
        } else {
            RowTag::Odd
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RowTag::Even => "even",
            RowTag::Odd => "odd",
            RowTag::Named(name) => name,
        }
    }
}

impl fmt::Display for RowTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An object that can be shown as a row in a [`ListModel`].
pub trait Displayable {
    /// Column headings, in the order [`columns`](Self::columns) returns values.
    fn headings() -> &'static [&'static str];

    /// Stable identity of the object within a list.
    fn identity_key(&self) -> String;

    /// Short label for the row.
    fn label(&self) -> String;

    /// Column values matching [`headings`](Self::headings).
    fn columns(&self) -> Vec<String>;

    /// Presentation tag for the row at `position` among visible rows.
    fn display_tag(&self, position: usize) -> RowTag {
        RowTag::alternating(position)
    }
}
