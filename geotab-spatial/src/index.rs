//! Spatial index detection.

use crate::tables::GeometryTables;
use geotab_core::{Connection, Dialect, Result, TableLocation, Value};

const H2_INDEX_QUERY: &str = "SELECT I.INDEX_TYPE_NAME FROM INFORMATION_SCHEMA.INDEXES AS I, \
     (SELECT COLUMN_NAME, TABLE_NAME, TABLE_SCHEMA FROM INFORMATION_SCHEMA.INDEX_COLUMNS \
     WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? AND COLUMN_NAME = ?) AS C \
     WHERE I.TABLE_SCHEMA = C.TABLE_SCHEMA AND I.TABLE_NAME = C.TABLE_NAME";

const POSTGIS_INDEX_QUERY: &str = "SELECT cls.relname, am.amname FROM pg_class cls \
     JOIN pg_am am ON am.oid = cls.relam WHERE cls.oid IN \
     (SELECT attrelid FROM pg_catalog.pg_attribute WHERE attname = ? AND attrelid IN \
     (SELECT b.oid FROM pg_catalog.pg_indexes a, pg_catalog.pg_class b \
     WHERE a.schemaname = ? AND a.tablename = ? AND a.indexname = b.relname)) \
     AND am.amname = 'gist'";

impl<C: Connection + ?Sized> GeometryTables<'_, C> {
    /// True when `column` is covered by a spatial index.
    ///
    /// H2GIS reports the index type name (`SPATIAL INDEX`); PostGIS spatial
    /// indexes are `gist` indexes.
    pub fn is_spatially_indexed(&self, location: &TableLocation, column: &str) -> Result<bool> {
        let dialect = self.dialect();
        let schema = if location.schema.is_empty() {
            self.config().default_schema(dialect)
        } else {
            location.schema.as_str()
        };
        let field = dialect.fold_case(column);

        match dialect {
            Dialect::H2 => {
                let params = [
                    Value::from(schema),
                    Value::from(location.table.as_str()),
                    Value::from(field),
                ];
                let mut rows = self.query(H2_INDEX_QUERY, &params)?;
                let Some(row) = rows.next_row()? else {
                    return Ok(false);
                };
                Ok(row
                    .first()
                    .and_then(Value::as_str)
                    .is_some_and(|kind| kind.to_uppercase().contains("SPATIAL")))
            }
            Dialect::PostGis => {
                let params = [
                    Value::from(field),
                    Value::from(schema),
                    Value::from(location.table.as_str()),
                ];
                let mut rows = self.query(POSTGIS_INDEX_QUERY, &params)?;
                Ok(rows.next_row()?.is_some())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotab_core::{ColumnInfo, MemoryConnection, MemoryRows};

    #[test]
    fn test_h2_spatial_index() {
        let conn = MemoryConnection::new(Dialect::H2).on_rows(
            "INFORMATION_SCHEMA.INDEXES",
            MemoryRows::new(vec![ColumnInfo::new("INDEX_TYPE_NAME", "VARCHAR")])
                .with_row(vec![Value::from("SPATIAL INDEX")]),
        );
        let tables = GeometryTables::new(&conn);
        assert!(tables
            .is_spatially_indexed(&TableLocation::table("ROADS"), "the_geom")
            .unwrap());
        assert_eq!(
            conn.statements()[0].params,
            vec![Value::from("PUBLIC"), Value::from("ROADS"), Value::from("THE_GEOM")]
        );
    }

    #[test]
    fn test_h2_btree_index_is_not_spatial() {
        let conn = MemoryConnection::new(Dialect::H2).on_rows(
            "INFORMATION_SCHEMA.INDEXES",
            MemoryRows::new(vec![ColumnInfo::new("INDEX_TYPE_NAME", "VARCHAR")])
                .with_row(vec![Value::from("INDEX")]),
        );
        let tables = GeometryTables::new(&conn);
        assert!(!tables
            .is_spatially_indexed(&TableLocation::table("ROADS"), "THE_GEOM")
            .unwrap());
    }

    #[test]
    fn test_postgis_gist_index() {
        let conn = MemoryConnection::new(Dialect::PostGis)
            .on_rows("pg_am", MemoryRows::new(vec![ColumnInfo::new("relname", "name")]));
        let tables = GeometryTables::new(&conn);
        assert!(!tables
            .is_spatially_indexed(&TableLocation::table("roads"), "geom")
            .unwrap());
        assert_eq!(
            conn.statements()[0].params,
            vec![Value::from("geom"), Value::from("public"), Value::from("roads")]
        );
    }
}
