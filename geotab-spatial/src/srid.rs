//! SRID lookup, rewriting and authority resolution.

use crate::tables::GeometryTables;
use geotab_core::{Connection, GeoTableError, Result, TableLocation, Value};

impl<C: Connection + ?Sized> GeometryTables<'_, C> {
    /// Declared SRID of `column` (or of the first geometry column). 0 when
    /// the geometry columns view has no entry.
    pub fn srid(&self, location: &TableLocation, column: Option<&str>) -> Result<i32> {
        Ok(self
            .catalog_rows(location, column)?
            .first()
            .map(|row| row.srid())
            .unwrap_or(0))
    }

    /// Rewrite the SRID of a geometry column.
    ///
    /// Returns `Ok(false)` without issuing any statement when the column
    /// already declares `srid`.
    pub fn alter_srid(&self, location: &TableLocation, column: &str, srid: i32) -> Result<bool> {
        let span = tracing::debug_span!("alter_srid", table = %location, column, srid);
        let _g = span.enter();

        if srid < 0 {
            return Err(GeoTableError::invalid_argument(format!(
                "The SRID value must be greater or equal than 0, got {}",
                srid
            )));
        }
        if location.table.is_empty() {
            return Err(GeoTableError::invalid_argument("The table name cannot be empty"));
        }
        if column.is_empty() {
            return Err(GeoTableError::invalid_argument("The geometry column name cannot be empty"));
        }

        let row = self
            .catalog_rows(location, Some(column))?
            .into_iter()
            .next()
            .ok_or_else(|| {
                GeoTableError::not_found(format!(
                    "geometry column {} not found in table {}",
                    column, location
                ))
            })?;
        let (name, metadata) = row.into_entry();
        if metadata.srid() == srid {
            tracing::debug!(srid, "column already uses the requested SRID");
            return Ok(false);
        }

        let field = self.quote(&name);
        let sql = format!(
            "ALTER TABLE {} ALTER COLUMN {} TYPE {} USING ST_SetSRID({},{})",
            self.table_sql(location),
            field,
            metadata.with_srid(srid).sql_signature(),
            field,
            srid
        );
        self.execute(&sql, &[])?;
        Ok(true)
    }

    /// Authority name and code of `srid`, e.g. `("EPSG", 4326)`. SRID 0 and
    /// unknown SRIDs yield `None`.
    pub fn authority_and_srid(&self, srid: i32) -> Result<Option<(String, i32)>> {
        if srid == 0 {
            return Ok(None);
        }
        let sql = format!(
            "SELECT AUTH_NAME FROM {} WHERE SRID = ?",
            self.config().spatial_ref_sys_table
        );
        let mut rows = self.query(&sql, &[Value::from(srid)])?;
        Ok(rows.next_row()?.and_then(|row| {
            row.into_iter().next().and_then(|v| match v {
                Value::Text(authority) => Some((authority, srid)),
                _ => None,
            })
        }))
    }

    /// Authority of the SRID declared for a table column.
    pub fn column_authority_and_srid(
        &self,
        location: &TableLocation,
        column: Option<&str>,
    ) -> Result<Option<(String, i32)>> {
        let srid = self.srid(location, column)?;
        self.authority_and_srid(srid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotab_core::{ColumnInfo, Dialect, MemoryConnection, MemoryRows};

    #[test]
    fn test_alter_srid_rejects_bad_arguments() {
        let conn = MemoryConnection::new(Dialect::H2);
        let tables = GeometryTables::new(&conn);
        let roads = TableLocation::table("ROADS");
        for (location, column, srid) in [
            (&roads, "THE_GEOM", -1),
            (&TableLocation::default(), "THE_GEOM", 4326),
            (&roads, "", 4326),
        ] {
            let err = tables.alter_srid(location, column, srid).unwrap_err();
            assert!(matches!(err, GeoTableError::InvalidArgument(_)));
        }
        assert!(conn.statements().is_empty());
    }

    #[test]
    fn test_alter_srid_only_rewrites_the_named_column() {
        // Catalog rows come back unfiltered.
        let catalog = MemoryRows::new(vec![
            ColumnInfo::new("f_geometry_column", "name"),
            ColumnInfo::new("coord_dimension", "int4"),
            ColumnInfo::new("srid", "int4"),
            ColumnInfo::new("type", "varchar"),
        ])
        .with_row(vec![
            Value::from("geom"),
            Value::Int(3),
            Value::Int(4326),
            Value::from("POINT"),
        ]);
        let conn = MemoryConnection::new(Dialect::PostGis)
            .on_rows("geometry_columns", catalog)
            .on_rows("ALTER TABLE", MemoryRows::default());
        let tables = GeometryTables::new(&conn);
        let roads = TableLocation::table("roads");

        let err = tables.alter_srid(&roads, "missing", 2154).unwrap_err();
        assert!(err.is_not_found());
        assert!(!conn.sql_log().iter().any(|sql| sql.starts_with("ALTER")));

        assert!(tables.alter_srid(&roads, "GEOM", 2154).unwrap());
        assert_eq!(
            conn.sql_log().last().unwrap(),
            "ALTER TABLE roads ALTER COLUMN geom TYPE GEOMETRY(POINTZ,2154) USING ST_SetSRID(geom,2154)"
        );
    }

    #[test]
    fn test_authority_lookup() {
        let conn = MemoryConnection::new(Dialect::H2).on(
            "SPATIAL_REF_SYS",
            |_, params| {
                let mut rows = MemoryRows::new(vec![ColumnInfo::new("AUTH_NAME", "VARCHAR")]);
                if params == [Value::Int(4326)] {
                    rows.push(vec![Value::from("EPSG")]);
                }
                Ok(rows)
            },
        );
        let tables = GeometryTables::new(&conn);
        assert_eq!(
            tables.authority_and_srid(4326).unwrap(),
            Some(("EPSG".to_string(), 4326))
        );
        assert_eq!(tables.authority_and_srid(9999).unwrap(), None);
        assert_eq!(tables.authority_and_srid(0).unwrap(), None);
        assert_eq!(
            conn.sql_log()[0],
            "SELECT AUTH_NAME FROM PUBLIC.SPATIAL_REF_SYS WHERE SRID = ?"
        );
        assert_eq!(conn.statements().len(), 2);
    }
}
