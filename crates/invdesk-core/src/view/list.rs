//! Searchable, sortable list of displayable objects.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::trace;

use super::{Displayable, RowTag};

/// Sort direction of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// One object in the list with its cached column values.
#[derive(Debug, Clone)]
pub struct Row<T> {
    key: String,
    values: Vec<String>,
    item: T,
}

impl<T: Displayable> Row<T> {
    fn new(item: T) -> Self {
        Self {
            key: item.identity_key(),
            values: item.columns(),
            item,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn item(&self) -> &T {
        &self.item
    }

    pub fn label(&self) -> String {
        self.item.label()
    }
}

/// Ordered rows with a search filter, per-column sorting and a selection.
///
/// Searching never drops rows: visibility is computed from the full list
/// and the current query, so clearing the query brings every row back in
/// list order.
#[derive(Debug, Clone)]
pub struct ListModel<T> {
    rows: Vec<Row<T>>,
    query: String,
    search_columns: usize,
    directions: HashMap<usize, SortDirection>,
    sorted_by: Option<(usize, SortDirection)>,
    selected: Option<String>,
}

impl<T: Displayable> ListModel<T> {
    /// An empty list searching the first `search_columns` columns.
    pub fn new(search_columns: usize) -> Self {
        Self {
            rows: Vec::new(),
            query: String::new(),
            search_columns,
            directions: HashMap::new(),
            sorted_by: None,
            selected: None,
        }
    }

    /// Replace all rows. A repeated key replaces the earlier row in place.
    pub fn set_content<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.rows.clear();
        for item in items {
            let row = Row::new(item);
            match self.position_of(&row.key) {
                Some(index) => self.rows[index] = row,
                None => self.rows.push(row),
            }
        }

        let stale = self
            .selected
            .as_deref()
            .is_some_and(|key| self.position_of(key).is_none());
        if stale {
            self.selected = None;
        }
    }

    /// Update, insert or remove the row for `key`.
    ///
    /// An existing row is updated in place; a new object is appended and
    /// selected; `None` removes the row.
    pub fn update_object(&mut self, key: &str, item: Option<T>) {
        match (self.position_of(key), item) {
            (Some(index), Some(item)) => {
                self.rows[index] = Row::new(item);
            }
            (Some(index), None) => {
                self.rows.remove(index);
                if self.selected.as_deref() == Some(key) {
                    self.selected = None;
                }
            }
            (None, Some(item)) => {
                let row = Row::new(item);
                self.selected = Some(row.key.clone());
                self.rows.push(row);
            }
            (None, None) => {}
        }
    }

    /// Insert or update a row keyed by the object's identity.
    pub fn upsert(&mut self, item: T) {
        let key = item.identity_key();
        self.update_object(&key, Some(item));
    }

    /// Remove the row for `key`, returning its object.
    pub fn remove(&mut self, key: &str) -> Option<T> {
        let index = self.position_of(key)?;
        if self.selected.as_deref() == Some(key) {
            self.selected = None;
        }
        Some(self.rows.remove(index).item)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.position_of(key).map(|index| &self.rows[index].item)
    }

    /// Number of rows, hidden ones included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All objects in list order, hidden ones included.
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.rows.iter().map(|row| &row.item)
    }

    /// Show only rows whose searched columns contain `query`.
    pub fn search(&mut self, query: &str) {
        self.query = query.to_string();
        trace!("Search {:?}: {} of {} rows visible", query, self.visible_count(), self.len());
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Visible rows in order, with their position and tag.
    pub fn visible(&self) -> Vec<(usize, RowTag, &Row<T>)> {
        self.rows
            .iter()
            .filter(|row| self.matches(row))
            .enumerate()
            .map(|(position, row)| (position, row.item.display_tag(position), row))
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.rows.iter().filter(|row| self.matches(row)).count()
    }

    fn matches(&self, row: &Row<T>) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let n = self.search_columns.min(row.values.len());
        row.values[..n]
            .join(", ")
            .to_lowercase()
            .contains(&self.query.to_lowercase())
    }

    /// Sort by the column at `column`.
    ///
    /// The first activation of a column sorts ascending, each further
    /// activation of the same column flips the direction. Values are
    /// compared as numbers when every value in the column is one, otherwise
    /// as strings. Equal values keep their relative order.
    pub fn sort_by_column(&mut self, column: usize) -> SortDirection {
        let direction = self
            .directions
            .get(&column)
            .map(|d| d.toggled())
            .unwrap_or(SortDirection::Ascending);
        self.directions.insert(column, direction);
        self.sorted_by = Some((column, direction));

        let value = |row: &Row<T>| row.values.get(column).cloned().unwrap_or_default();
        let numeric: Option<Vec<Decimal>> = self
            .rows
            .iter()
            .map(|row| numeric_value(&value(row)))
            .collect();

        let mut keyed: Vec<(SortKey, Row<T>)> = match numeric {
            Some(numbers) => numbers
                .into_iter()
                .map(SortKey::Number)
                .zip(self.rows.drain(..))
                .collect(),
            None => self
                .rows
                .drain(..)
                .map(|row| (SortKey::Text(value(&row)), row))
                .collect(),
        };

        keyed.sort_by(|(a, _), (b, _)| match direction {
            SortDirection::Ascending => a.cmp(b),
            SortDirection::Descending => b.cmp(a),
        });
        self.rows = keyed.into_iter().map(|(_, row)| row).collect();

        direction
    }

    /// Column and direction of the last sort.
    pub fn sorted_by(&self) -> Option<(usize, SortDirection)> {
        self.sorted_by
    }

    /// Select the row for `key`. Returns false if there is no such row.
    pub fn select(&mut self, key: &str) -> bool {
        if self.position_of(key).is_some() {
            self.selected = Some(key.to_string());
            true
        } else {
            false
        }
    }

    /// Select the visible row at `position`.
    ///
    /// Positions past the end select the last visible row; with no visible
    /// rows the selection is cleared.
    pub fn select_position(&mut self, position: usize) -> Option<&T> {
        let key = {
            let visible = self.visible();
            visible
                .get(position)
                .or_else(|| visible.last())
                .map(|(_, _, row)| row.key.clone())
        };
        self.selected = key;
        self.selected()
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.as_deref().and_then(|key| self.get(key))
    }

    fn position_of(&self, key: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.key == key)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Number(Decimal),
    Text(String),
}

/// Column value as a number, accepting "1 234,5" style input.
fn numeric_value(value: &str) -> Option<Decimal> {
    let normalized = value.replace(' ', "").replace(',', ".");
    Decimal::from_str(&normalized).ok()
}
