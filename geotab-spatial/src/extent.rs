//! Extent aggregation over tables, column expressions and sub-queries.
//!
//! Single-column extents are computed by the backend aggregate. Multi-column
//! and sub-query variants fetch one aggregate per expression and merge them
//! locally through an [`EnvelopeAccumulator`], which enforces one SRID.

use crate::columns::first_geometry_column;
use crate::envelope::{Envelope, EnvelopeAccumulator};
use crate::tables::GeometryTables;
use geotab_core::{Connection, Dialect, GeoTableError, Result, Rows, TableLocation, Value};

/// Backend aggregate of `expr`, named `alias`.
fn extent_aggregate(dialect: Dialect, expr: &str, alias: &str) -> String {
    match dialect {
        Dialect::H2 => format!("ST_Extent({}) AS {}", expr, alias),
        Dialect::PostGis => format!(
            "ST_SetSRID(ST_Extent({expr}), MAX(ST_SRID({expr}))) AS {alias}",
            expr = expr,
            alias = alias
        ),
    }
}

fn append_filter(sql: &mut String, filter: Option<&str>) {
    if let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) {
        sql.push(' ');
        sql.push_str(filter);
    }
}

/// Non-empty expressions with their index in the input.
fn usable_expressions<'a, S: AsRef<str>>(exprs: &'a [S]) -> Vec<(usize, &'a str)> {
    exprs
        .iter()
        .enumerate()
        .map(|(i, e)| (i, e.as_ref().trim()))
        .filter(|(_, e)| !e.is_empty())
        .collect()
}

/// Envelope of an aggregate cell, keeping the cell's SRID.
fn cell_envelope(value: &Value) -> Option<Envelope> {
    value.as_geometry().and_then(Envelope::of)
}

impl<C: Connection + ?Sized> GeometryTables<'_, C> {
    /// Extent of one geometry column, optionally filtered. `Ok(None)` when
    /// the column holds no geometry. The SRID is taken from the geometry
    /// columns view.
    pub fn envelope(
        &self,
        location: &TableLocation,
        column: &str,
        filter: Option<&str>,
    ) -> Result<Option<Envelope>> {
        let span = tracing::debug_span!("envelope", table = %location, column);
        let _g = span.enter();

        if column.is_empty() {
            return Err(GeoTableError::invalid_argument(format!(
                "The table {} does not contain a geometry column, the extent cannot be computed",
                location
            )));
        }
        let mut sql = format!(
            "SELECT {} FROM {}",
            extent_aggregate(self.dialect(), &self.quote(column), "ext"),
            self.table_sql(location)
        );
        append_filter(&mut sql, filter);
        match cell_envelope(&self.query_scalar(&sql, &[])?) {
            Some(env) => Ok(Some(env.with_srid(self.srid(location, Some(column))?))),
            None => Ok(None),
        }
    }

    /// Extent of the first geometry column of `location`.
    pub fn first_column_envelope(&self, location: &TableLocation) -> Result<Option<Envelope>> {
        let (column, _) = self.first_geometry_column(location)?;
        self.envelope(location, &column, None)
    }

    /// Merged extent of several column expressions of one table.
    ///
    /// Expressions may be column names or geometry functions such as
    /// `ST_Buffer(the_geom, 20)`. Empty entries are skipped.
    pub fn columns_envelope<S: AsRef<str>>(
        &self,
        location: &TableLocation,
        exprs: &[S],
        filter: Option<&str>,
    ) -> Result<Option<Envelope>> {
        let span = tracing::debug_span!("envelope", table = %location, exprs = exprs.len());
        let _g = span.enter();

        let usable = usable_expressions(exprs);
        if usable.is_empty() {
            return Err(GeoTableError::invalid_argument(format!(
                "no geometry expression given for table {}",
                location
            )));
        }
        let dialect = self.dialect();
        let outer: Vec<String> = usable
            .iter()
            .map(|(i, _)| {
                let alias = format!("geom_{}", i);
                extent_aggregate(dialect, &alias, &alias)
            })
            .collect();
        let inner: Vec<String> = usable
            .iter()
            .map(|(i, e)| format!("{} AS geom_{}", e, i))
            .collect();

        let mut sub_select = format!("SELECT {} FROM {}", inner.join(", "), self.table_sql(location));
        append_filter(&mut sub_select, filter);
        let sql = format!("SELECT {} FROM ({}) AS foo", outer.join(", "), sub_select);
        self.merge_aggregate_row(&sql)
    }

    /// Merged extent of expressions evaluated over a sub-query. The filter
    /// is appended after the derived table.
    pub fn query_envelope<S: AsRef<str>>(
        &self,
        sub_query: &str,
        exprs: &[S],
        filter: Option<&str>,
    ) -> Result<Option<Envelope>> {
        let span = tracing::debug_span!("envelope", sub_query, exprs = exprs.len());
        let _g = span.enter();

        if sub_query.trim().is_empty() {
            return Err(GeoTableError::invalid_argument("the sub-query cannot be empty"));
        }
        let usable = usable_expressions(exprs);
        if usable.is_empty() {
            return Err(GeoTableError::invalid_argument(
                "geometry expressions cannot be empty",
            ));
        }
        let dialect = self.dialect();
        let select: Vec<String> = usable
            .iter()
            .map(|(i, e)| extent_aggregate(dialect, e, &format!("geom_{}", i)))
            .collect();
        let mut sql = format!("SELECT {} FROM ({}) AS foo", select.join(", "), sub_query);
        append_filter(&mut sql, filter);
        self.merge_aggregate_row(&sql)
    }

    fn merge_aggregate_row(&self, sql: &str) -> Result<Option<Envelope>> {
        let mut rows = self.query(sql, &[])?;
        let mut acc = EnvelopeAccumulator::new();
        if let Some(row) = rows.next_row()? {
            for env in row.iter().filter_map(cell_envelope) {
                acc.merge(env)?;
            }
        }
        Ok(acc.finish())
    }

    /// Full scan of a row set. Uses the first geometry column when `column`
    /// is not given. Fails when no geometry at all was read.
    pub fn rows_envelope<R: Rows + ?Sized>(
        &self,
        rows: &mut R,
        column: Option<&str>,
    ) -> Result<Envelope> {
        let span = tracing::debug_span!("envelope", column = column.unwrap_or(""), rows = tracing::field::Empty);
        let _g = span.enter();

        let index = match column.filter(|c| !c.is_empty()) {
            Some(name) => rows.column_index(name).ok_or_else(|| {
                GeoTableError::not_found(format!("column {} not found in the row set", name))
            })?,
            None => {
                first_geometry_column(rows.columns())
                    .ok_or_else(|| {
                        GeoTableError::not_found("the row set doesn't contain any geometry column")
                    })?
                    .1
                    - 1
            }
        };

        let mut acc = EnvelopeAccumulator::new();
        let mut scanned = 0u64;
        while let Some(row) = rows.next_row()? {
            scanned += 1;
            if let Some(value) = row.get(index) {
                acc.add_value(value)?;
            }
        }
        span.record("rows", scanned);
        acc.finish()
            .ok_or_else(|| GeoTableError::computation_failed("the row set holds no geometry"))
    }

    /// Approximate extent from backend statistics, falling back to the
    /// aggregate extent. The SRID is taken from the geometry columns view.
    ///
    /// Non-null estimates are returned as-is.
    pub fn estimated_extent(
        &self,
        location: &TableLocation,
        column: Option<&str>,
    ) -> Result<Envelope> {
        let span = tracing::debug_span!(
            "estimated_extent",
            table = %location,
            column = tracing::field::Empty,
            strategy = tracing::field::Empty
        );
        let _g = span.enter();

        let column = match column.filter(|c| !c.is_empty()) {
            Some(c) => c.to_string(),
            None => self.first_geometry_column(location)?.0,
        };
        span.record("column", column.as_str());
        let srid = self.srid(location, Some(column.as_str()))?;

        let estimate_sql = match self.dialect() {
            Dialect::H2 => format!(
                "SELECT ESTIMATED_ENVELOPE('{}', '{}')",
                sql_literal(&location.to_string()),
                sql_literal(&column)
            ),
            Dialect::PostGis => {
                let schema = if location.schema.is_empty() {
                    self.config().default_schema(Dialect::PostGis)
                } else {
                    location.schema.as_str()
                };
                format!(
                    "SELECT ST_EstimatedExtent('{}', '{}', '{}')::geometry",
                    sql_literal(schema),
                    sql_literal(&location.table),
                    sql_literal(&column)
                )
            }
        };
        if let Some(env) = cell_envelope(&self.query_scalar(&estimate_sql, &[])?) {
            span.record("strategy", "statistics");
            return Ok(env.with_srid(srid));
        }
        tracing::debug!(table = %location, column = %column, "no statistics estimate, computing aggregate extent");

        if let Some(env) = self.envelope(location, &column, None)? {
            span.record("strategy", "aggregate");
            return Ok(env.with_srid(srid));
        }
        Err(GeoTableError::computation_failed(format!(
            "unable to compute the extent of {}.{}",
            location, column
        )))
    }
}

fn sql_literal(text: &str) -> String {
    text.replace('\'', "''")
}
