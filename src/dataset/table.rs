/// Ordered rows of one pipeline stage.
///
/// Stages take a `&Table<A>` and build a fresh `Table<B>`; a table is never
/// edited in place once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    rows: Vec<R>,
}

impl<R> Table<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    /// Builds a new table from the rows `f` keeps.
    pub fn filter_map<S, F>(&self, f: F) -> Table<S>
    where
        F: FnMut(&R) -> Option<S>,
    {
        self.rows.iter().filter_map(f).collect()
    }

    pub fn map<S, F>(&self, f: F) -> Table<S>
    where
        F: FnMut(&R) -> S,
    {
        self.rows.iter().map(f).collect()
    }
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R> FromIterator<R> for Table<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
