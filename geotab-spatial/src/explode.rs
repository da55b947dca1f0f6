//! Geometry collection explode cursor.
//!
//! Each source row whose spatial column holds a multi-geometry or a
//! geometry collection is turned into one output row per atomic member.
//! Output rows carry the source columns unchanged, the member geometry in
//! place of the collection, and a trailing 1-based sequence id that restarts
//! for every source row.
//!
//! The cursor pulls one source row at a time and only when the pending
//! members of the previous row are drained.

use crate::columns::first_geometry_column;
use crate::tables::GeometryTables;
use geo_types::Geometry;
use geotab_core::{
    ColumnInfo, Connection, GeoTableError, Result, Rows, SpatialValue, TableLocation, Value,
};
use std::collections::VecDeque;

/// Lifecycle of an [`ExplodeCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Source not opened yet
    Created,
    /// Producing rows
    Open,
    /// Source drained
    Exhausted,
    /// Released by `close()`
    Closed,
}

/// Flatten a geometry into its atomic members, depth first, in member order.
///
/// Uses an explicit stack so arbitrarily nested collections cannot overflow
/// the call stack. Members inherit the SRID of the collection.
pub fn flatten(value: SpatialValue) -> Vec<SpatialValue> {
    let srid = value.srid;
    let mut out = Vec::new();
    let mut stack = vec![value.geometry];
    while let Some(geometry) = stack.pop() {
        match geometry {
            Geometry::GeometryCollection(gc) => stack.extend(gc.0.into_iter().rev()),
            Geometry::MultiPoint(mp) => stack.extend(mp.0.into_iter().rev().map(Geometry::Point)),
            Geometry::MultiLineString(ml) => {
                stack.extend(ml.0.into_iter().rev().map(Geometry::LineString))
            }
            Geometry::MultiPolygon(mp) => stack.extend(mp.0.into_iter().rev().map(Geometry::Polygon)),
            atomic => out.push(SpatialValue::new(atomic, srid)),
        }
    }
    out
}

/// Pull-based cursor over exploded rows.
pub struct ExplodeCursor<'c, C: Connection + ?Sized> {
    tables: GeometryTables<'c, C>,
    location: TableLocation,
    column: Option<String>,
    source: Option<Box<dyn Rows + 'c>>,
    columns: Vec<ColumnInfo>,
    spatial_index: usize,
    current: Vec<Value>,
    pending: VecDeque<Value>,
    next_id: i64,
    state: CursorState,
}

impl<'c, C: Connection + ?Sized> GeometryTables<'c, C> {
    /// Explode the geometry collections of `location`.
    ///
    /// Without `column` the first geometry-typed column is used. The source
    /// is opened immediately, so a missing column fails here, before any row.
    pub fn explode(
        &self,
        location: &TableLocation,
        column: Option<&str>,
    ) -> Result<ExplodeCursor<'c, C>> {
        let span = tracing::debug_span!("explode", table = %location, column = column.unwrap_or(""));
        let _g = span.enter();

        let mut cursor = ExplodeCursor {
            tables: GeometryTables::with_config(self.connection(), self.config().clone()),
            location: location.clone(),
            column: column.filter(|c| !c.is_empty()).map(str::to_string),
            source: None,
            columns: Vec::new(),
            spatial_index: 0,
            current: Vec::new(),
            pending: VecDeque::new(),
            next_id: 1,
            state: CursorState::Created,
        };
        cursor.open()?;
        Ok(cursor)
    }
}

impl<'c, C: Connection + ?Sized> ExplodeCursor<'c, C> {
    fn open(&mut self) -> Result<()> {
        let sql = format!("SELECT * FROM {}", self.tables.table_sql(&self.location));
        let source = self.tables.query(&sql, &[])?;

        let index = match &self.column {
            Some(name) => source.column_index(name).ok_or_else(|| {
                GeoTableError::not_found(format!(
                    "geometry column {} not found in table {}",
                    name, self.location
                ))
            })?,
            None => {
                first_geometry_column(source.columns())
                    .ok_or_else(|| {
                        GeoTableError::not_found(format!(
                            "table {} has no geometry column",
                            self.location
                        ))
                    })?
                    .1
                    - 1
            }
        };

        let mut columns = source.columns().to_vec();
        columns.push(ColumnInfo::new(
            self.tables.config().explode_id_column.clone(),
            "INTEGER",
        ));
        self.columns = columns;
        self.spatial_index = index;
        self.source = Some(source);
        self.current.clear();
        self.pending.clear();
        self.next_id = 1;
        self.state = CursorState::Open;
        Ok(())
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Source columns followed by the explode id column.
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Ordinal (0-based) of the exploded column in the output rows.
    pub fn spatial_index(&self) -> usize {
        self.spatial_index
    }

    /// Next output row. `Ok(None)` once the source is drained or the cursor
    /// is closed.
    pub fn next_row(&mut self) -> Result<Option<Vec<Value>>> {
        loop {
            match self.state {
                CursorState::Created => self.open()?,
                CursorState::Open => {}
                CursorState::Exhausted | CursorState::Closed => return Ok(None),
            }

            if let Some(member) = self.pending.pop_front() {
                let mut row = self.current.clone();
                row[self.spatial_index] = member;
                row.push(Value::Int(self.next_id));
                tracing::trace!(explode_id = self.next_id, "explode row");
                self.next_id += 1;
                return Ok(Some(row));
            }

            let next = match self.source.as_mut() {
                Some(source) => source.next_row()?,
                None => None,
            };
            let Some(mut row) = next else {
                self.source = None;
                self.state = CursorState::Exhausted;
                return Ok(None);
            };

            row.resize(self.columns.len() - 1, Value::Null);
            let cell = std::mem::take(&mut row[self.spatial_index]);
            match cell {
                Value::Geometry(value) => {
                    self.pending
                        .extend(flatten(value).into_iter().map(Value::Geometry));
                }
                other => self.pending.push_back(other),
            }
            self.current = row;
            self.next_id = 1;
        }
    }

    /// Restart from the first source row. The source is re-queried.
    pub fn reset(&mut self) -> Result<()> {
        let span = tracing::debug_span!("explode_reset", table = %self.location);
        let _g = span.enter();

        self.source = None;
        self.state = CursorState::Created;
        self.open()
    }

    /// Release the source. Further pulls return `Ok(None)`.
    pub fn close(&mut self) {
        self.source = None;
        self.pending.clear();
        self.current.clear();
        self.state = CursorState::Closed;
    }
}

impl<C: Connection + ?Sized> Rows for ExplodeCursor<'_, C> {
    fn columns(&self) -> &[ColumnInfo] {
        ExplodeCursor::columns(self)
    }

    fn next_row(&mut self) -> Result<Option<Vec<Value>>> {
        ExplodeCursor::next_row(self)
    }
}

impl<C: Connection + ?Sized> Iterator for ExplodeCursor<'_, C> {
    type Item = Result<Vec<Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        ExplodeCursor::next_row(self).transpose()
    }
}

impl<C: Connection + ?Sized> std::fmt::Debug for ExplodeCursor<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplodeCursor")
            .field("location", &self.location)
            .field("spatial_index", &self.spatial_index)
            .field("pending", &self.pending.len())
            .field("next_id", &self.next_id)
            .field("state", &self.state)
            .finish()
    }
}
