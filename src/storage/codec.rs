//! SQLite column conversions for model types
//!
//! IDs are stored as INTEGER, money as REAL in currency units, methods as
//! their snake_case name.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::models::{AllocationId, AllocationMethod, BudgetId, CountyId, Money};

macro_rules! sql_id {
    ($name:ident) => {
        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.get()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map(Self::new)
            }
        }
    };
}

sql_id!(CountyId);
sql_id!(BudgetId);
sql_id!(AllocationId);

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_f64()))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        f64::column_result(value).map(Money::from_f64_rounded)
    }
}

impl ToSql for AllocationMethod {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AllocationMethod {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_money_round_trips_through_real_column() {
        let conn = Connection::open_in_memory().unwrap();
        let stored: Money = conn
            .query_row("SELECT ?1", [Money::from_cents(33_333_333)], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, Money::from_cents(33_333_333));

        let from_integer: Money = conn.query_row("SELECT 250", [], |row| row.get(0)).unwrap();
        assert_eq!(from_integer, Money::from_units(250));
    }

    #[test]
    fn test_method_column() {
        let conn = Connection::open_in_memory().unwrap();
        let method: AllocationMethod = conn
            .query_row("SELECT ?1", [AllocationMethod::GdpPerCapita], |row| row.get(0))
            .unwrap();
        assert_eq!(method, AllocationMethod::GdpPerCapita);

        let bad = conn.query_row("SELECT 'lottery'", [], |row| row.get::<_, AllocationMethod>(0));
        assert!(bad.is_err());
    }

    #[test]
    fn test_id_column() {
        let conn = Connection::open_in_memory().unwrap();
        let id: CountyId = conn
            .query_row("SELECT ?1", [CountyId::new(9)], |row| row.get(0))
            .unwrap();
        assert_eq!(id, CountyId::new(9));
    }
}
