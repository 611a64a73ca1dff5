use std::path::Path;

use anyhow::Result;
use log::info;

use crate::{
    io_utils::ReadOptions, loader, record::MovieRecord, schema, store::Store, table,
    transform,
};

/// Number of transformed rows echoed to the log before loading.
pub const SAMPLE_ROWS: usize = 5;

/// Read, transform and load one CSV file into the store.
pub struct Pipeline<'a> {
    store: &'a mut Store,
}

impl<'a> Pipeline<'a> {
    pub fn new(store: &'a mut Store) -> Self {
        Self { store }
    }

    /// Returns the number of rows submitted to the loader.
    pub fn run(&mut self, path: &Path, options: &ReadOptions) -> Result<usize> {
        info!("Reading CSV file: {}", path.display());
        let records = transform::transform_csv(path, options)?;

        info!("Data transformed. Sample:");
        log_sample(&records);

        schema::ensure_movies_table(self.store)?;
        loader::insert_movies(self.store, &records)
    }
}

fn log_sample(records: &[MovieRecord]) {
    let rows = records
        .iter()
        .take(SAMPLE_ROWS)
        .map(MovieRecord::display_row)
        .collect::<Vec<_>>();
    for line in table::render_table(&MovieRecord::headers(), &rows).lines() {
        info!("{line}");
    }
}
