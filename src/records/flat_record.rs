use super::Cell;
use indexmap::IndexMap;

/// One flattened dataset: column name to scalar value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRecord {
    columns: IndexMap<String, Cell>,
}

impl FlatRecord {
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.columns.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.columns.iter().map(|(column, cell)| (column.as_str(), cell))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Set a column, replacing an earlier value in place.
    pub(super) fn insert(&mut self, column: impl Into<String>, cell: Cell) {
        let _ = self.columns.insert(column.into(), cell);
    }

    /// Set a column only if it has no value yet.
    pub(super) fn insert_if_absent(&mut self, column: impl Into<String>, cell: Cell) {
        let _ = self.columns.entry(column.into()).or_insert(cell);
    }
}

impl<K: Into<String>> FromIterator<(K, Cell)> for FlatRecord {
    fn from_iter<I: IntoIterator<Item = (K, Cell)>>(iter: I) -> Self {
        let mut record = Self::default();
        for (column, cell) in iter {
            record.insert(column, cell);
        }
        record
    }
}
