//! The grid: persisted records plus presentation state, rendered on demand.

use log::{error, info, warn};
use serde::Serialize;

use crate::clock::Clock;
use crate::enrich::{EnrichedRecord, enrich};
use crate::generator::Generator;
use crate::record::UserRecord;
use crate::store::RecordStore;
use crate::table::{Column, ColumnOrder, SortState};
use crate::viewport::Viewport;

/// Records, sort and column order for one table
///
/// Records are only ever replaced wholesale. Derived fields are computed
/// again on every render and never kept.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    records: Vec<UserRecord>,
    sort: SortState,
    order: ColumnOrder,
}

/// One rendered window of the grid
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<'a> {
    /// Number of rows in the whole table
    pub total: usize,
    /// First rendered row (inclusive)
    pub start: usize,
    /// Last rendered row (exclusive)
    pub end: usize,
    pub row_height: u32,
    /// Pixel height of the full table
    pub total_height: u64,
    /// Pixel top of the first rendered row
    pub offset: u64,
    pub columns: &'a [Column],
    pub sort: SortState,
    pub rows: Vec<EnrichedRecord<'a>>,
}

impl Grid {
    pub fn new(records: Vec<UserRecord>) -> Self {
        Grid {
            records,
            ..Grid::default()
        }
    }

    /// Load records from `store`, or generate and store a fresh set
    ///
    /// An empty store and a store that fails to load are treated the same:
    /// the failure is logged and the grid starts from generated records.
    pub fn load_or_generate(
        store: &dyn RecordStore,
        generator: &Generator,
        clock: &dyn Clock,
    ) -> Self {
        match store.load() {
            Ok(Some(records)) => {
                info!("loaded {} records from {}", records.len(), store.describe());
                return Grid::new(records);
            }
            Ok(None) => info!("no records in {}, generating", store.describe()),
            Err(e) => warn!(
                "could not load records from {}: {}; generating",
                store.describe(),
                e
            ),
        }

        let records = generator.generate(clock.today());
        persist(store, &records);
        Grid::new(records)
    }

    /// Replace every record with a freshly generated set and store it.
    ///
    /// Returns the new record count.
    pub fn regenerate(
        &mut self,
        store: &dyn RecordStore,
        generator: &Generator,
        clock: &dyn Clock,
    ) -> usize {
        self.records = generator.generate(clock.today());
        persist(store, &self.records);
        info!("regenerated {} records", self.records.len());
        self.records.len()
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn columns(&self) -> &[Column] {
        self.order.columns()
    }

    pub fn toggle_sort(&mut self, column: Column) -> SortState {
        self.sort.toggle(column);
        self.sort
    }

    /// Move `from` to where `to` is. Returns whether anything moved.
    pub fn move_column(&mut self, from: Column, to: Column) -> bool {
        self.order.move_column(from, to)
    }

    /// Every row, enriched for the clock's day and in sorted order.
    pub fn rows_in_view_order(&self, clock: &dyn Clock) -> Vec<EnrichedRecord<'_>> {
        let mut rows = enrich(&self.records, clock.today());
        self.sort.apply(&mut rows);
        rows
    }

    /// Render the rows visible at `scroll_top`.
    pub fn render(&self, clock: &dyn Clock, viewport: &Viewport, scroll_top: u64) -> Page<'_> {
        let total = self.records.len();
        let range = viewport.visible_range(scroll_top, total);
        let rows = self
            .rows_in_view_order(clock)
            .into_iter()
            .skip(range.start)
            .take(range.len())
            .collect();

        Page {
            total,
            start: range.start,
            end: range.end,
            row_height: viewport.row_height,
            total_height: viewport.total_height(total),
            offset: viewport.offset_of(range.start),
            columns: self.order.columns(),
            sort: self.sort,
            rows,
        }
    }
}

/// Save failures are logged only; the in-memory grid stays authoritative.
fn persist(store: &dyn RecordStore, records: &[UserRecord]) {
    if let Err(e) = store.save(records) {
        error!(
            "failed to save {} records to {}: {}",
            records.len(),
            store.describe(),
            e
        );
    }
}
