//! The typed movie row shared by the transformer, the loader and the store.

/// One transformed movie row, in the column order of the `movies` table.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub rank: i64,
    pub title: Option<String>,
    pub release_year: Option<i64>,
    pub runtime_minutes: Option<i64>,
    pub rated: Option<String>,
    pub rating: Option<f64>,
}

impl MovieRecord {
    /// Output column names. The loader binds values positionally in this order.
    pub const COLUMNS: [&'static str; 6] = [
        "rank",
        "title",
        "release_year",
        "runtime_minutes",
        "rated",
        "rating",
    ];

    pub fn headers() -> Vec<String> {
        Self::COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    /// Renders the record as display cells; missing values become empty strings.
    pub fn display_row(&self) -> Vec<String> {
        fn cell<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }
        vec![
            self.rank.to_string(),
            cell(&self.title),
            cell(&self.release_year),
            cell(&self.runtime_minutes),
            cell(&self.rated),
            cell(&self.rating),
        ]
    }
}
