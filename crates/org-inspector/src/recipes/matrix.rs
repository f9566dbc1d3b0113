use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// One row of a sparse matrix. A column missing from `data` means "not applicable".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixRow<H, V> {
    pub key: String,
    pub header: H,
    pub data: IndexMap<String, V>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Matrix<H, V> {
    pub column_headers: Vec<String>,
    /// Display label per column key, for columns keyed by an opaque id.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub column_labels: IndexMap<String, String>,
    pub rows: Vec<MatrixRow<H, V>>,
}

impl<H, V> Matrix<H, V> {
    pub fn row(&self, key: &str) -> Option<&MatrixRow<H, V>> {
        self.rows.iter().find(|row| row.key == key)
    }

    pub fn cell(&self, row: &str, column: &str) -> Option<&V> {
        self.row(row).and_then(|row| row.data.get(column))
    }

    /// The label of `column`, or the column key itself when it has none.
    pub fn column_label<'a>(&'a self, column: &'a str) -> &'a str {
        self.column_labels
            .get(column)
            .map(String::as_str)
            .unwrap_or(column)
    }
}

/// Accumulates `(row, column, value)` triples into a [`Matrix`].
#[derive(Debug, Clone)]
pub struct MatrixBuilder<H, V> {
    rows: IndexMap<String, (H, IndexMap<String, V>)>,
    columns: IndexSet<String>,
    canonical: Option<IndexSet<String>>,
    labels: IndexMap<String, String>,
}

impl<H, V> Default for MatrixBuilder<H, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, V> MatrixBuilder<H, V> {
    /// Columns come out in first-seen order.
    pub fn new() -> Self {
        Self {
            rows: IndexMap::new(),
            columns: IndexSet::new(),
            canonical: None,
            labels: IndexMap::new(),
        }
    }

    /// Columns come out in the given order, followed by any unlisted column in
    /// first-seen order. Listed columns are kept even when no cell uses them;
    /// repeated entries keep their first position.
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            canonical: Some(columns.into_iter().map(Into::into).collect()),
            ..Self::new()
        }
    }

    /// Like [`MatrixBuilder::with_columns`], with a display label per column
    /// key. The first label given for a key wins.
    pub fn with_labeled_columns<I, K, L>(columns: I) -> Self
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: Into<String>,
    {
        let mut canonical = IndexSet::new();
        let mut labels = IndexMap::new();
        for (key, label) in columns {
            let key = key.into();
            if canonical.insert(key.clone()) {
                labels.insert(key, label.into());
            }
        }
        Self {
            canonical: Some(canonical),
            labels,
            ..Self::new()
        }
    }

    fn row_data(&mut self, row: &str, header: impl FnOnce() -> H) -> &mut IndexMap<String, V> {
        &mut self
            .rows
            .entry(row.to_string())
            .or_insert_with(|| (header(), IndexMap::new()))
            .1
    }

    /// Stores `value`, replacing any previous value of the cell. `header` only
    /// runs when the row is new.
    pub fn set(&mut self, row: &str, header: impl FnOnce() -> H, column: &str, value: V) {
        self.columns.insert(column.to_string());
        self.row_data(row, header).insert(column.to_string(), value);
    }

    /// Folds `value` into an existing cell with `combine`, or stores it as is.
    pub fn merge(
        &mut self,
        row: &str,
        header: impl FnOnce() -> H,
        column: &str,
        value: V,
        combine: impl FnOnce(&mut V, V),
    ) {
        self.columns.insert(column.to_string());
        let data = self.row_data(row, header);
        match data.get_mut(column) {
            Some(existing) => combine(existing, value),
            None => {
                data.insert(column.to_string(), value);
            }
        }
    }

    pub fn build(self) -> Matrix<H, V> {
        let column_headers = match self.canonical {
            None => self.columns.into_iter().collect(),
            Some(mut ordered) => {
                ordered.extend(self.columns);
                ordered.into_iter().collect()
            }
        };
        let rows = self
            .rows
            .into_iter()
            .map(|(key, (header, data))| MatrixRow { key, header, data })
            .collect();
        Matrix {
            column_headers,
            column_labels: self.labels,
            rows,
        }
    }
}
