//! Generic CRUD execution over a `RowStore`.

use crate::error::AppError;
use crate::extractors::ParamMap;
use crate::service::{conv_table_names, validate_records, KvRecord};
use crate::sql::{mk_delete_string, mk_insert_string, mk_select_string, mk_update_string};
use crate::store::RowStore;

pub struct CrudService;

impl CrudService {
    /// Rows selected by `table_name`, `fields`, `id`/`ids`, `limit`, `offset`.
    pub async fn list(store: &dyn RowStore, params: &ParamMap) -> Result<Vec<KvRecord>, AppError> {
        let stmt = mk_select_string(params)?;
        store.query(&stmt.sql, &stmt.bind_values()).await
    }

    /// Rows matching exactly one `id`.
    pub async fn read(store: &dyn RowStore, params: &ParamMap) -> Result<Vec<KvRecord>, AppError> {
        if params.get("id").map_or(true, |id| id.is_empty()) {
            return Err(AppError::Validation("id is required".into()));
        }
        Self::list(store, params).await
    }

    /// Insert each record into `table`; returns the new row ids in record order.
    pub async fn create(
        store: &dyn RowStore,
        table: &str,
        records: &[KvRecord],
    ) -> Result<Vec<i64>, AppError> {
        validate_records(records)?;
        let mut ids = Vec::with_capacity(records.len());
        for rec in records {
            let q = mk_insert_string(table, &rec.keys, &rec.values)?;
            let outcome = store.execute(&q.sql, &q.params).await?;
            ids.push(outcome.last_insert_id);
        }
        tracing::debug!(table, count = ids.len(), "created records");
        Ok(ids)
    }

    /// Apply one record's assignments to the rows picked by `id`/`ids`.
    /// Zero records changes nothing; more than one is ambiguous.
    pub async fn update(
        store: &dyn RowStore,
        params: &ParamMap,
        records: &[KvRecord],
    ) -> Result<u64, AppError> {
        validate_records(records)?;
        let rec = match records {
            [] => return Ok(0),
            [rec] => rec,
            _ => {
                return Err(AppError::Validation(format!(
                    "update takes one record, got {}",
                    records.len()
                )))
            }
        };
        let q = mk_update_string(params, &rec.keys, &rec.values)?;
        let outcome = store.execute(&q.sql, &q.params).await?;
        Ok(outcome.rows_affected)
    }

    pub async fn delete(store: &dyn RowStore, params: &ParamMap) -> Result<u64, AppError> {
        let sql = mk_delete_string(params)?;
        let outcome = store.execute(&sql, &[]).await?;
        Ok(outcome.rows_affected)
    }

    pub async fn table_names(store: &dyn RowStore) -> Result<Vec<String>, AppError> {
        let records = store.query(store.table_names_query(), &[]).await?;
        conv_table_names(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::BindValue;
    use crate::test_support::{params, FakeStore};
    use serde_json::json;

    fn rec(keys: &[&str], values: Vec<serde_json::Value>) -> KvRecord {
        KvRecord::new(keys.iter().map(|s| s.to_string()).collect(), values)
    }

    #[tokio::test]
    async fn list_binds_ids() {
        let store = FakeStore::with_rows(vec![rec(&["a"], vec![json!(1)])]);
        let rows = CrudService::list(&store, &params("table_name=T&ids=4,5&limit=2&offset=0"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        let calls = store.calls();
        assert_eq!(calls[0].0, "SELECT * FROM T WHERE id in (?,?) LIMIT 2 OFFSET 0");
        assert_eq!(calls[0].1, vec![BindValue::I64(4), BindValue::I64(5)]);
    }

    #[tokio::test]
    async fn read_requires_an_id() {
        let store = FakeStore::default();
        let res = CrudService::read(&store, &params("table_name=T&limit=1")).await;
        assert!(matches!(res, Err(AppError::Validation(_))));
        assert!(store.calls().is_empty());

        CrudService::read(&store, &params("table_name=T&id=3&limit=1")).await.unwrap();
        assert_eq!(store.calls()[0].0, "SELECT * FROM T WHERE id = ? LIMIT 1 OFFSET 0");
    }

    #[tokio::test]
    async fn create_inserts_each_record() {
        let store = FakeStore::default();
        let records = vec![
            rec(&["k1", "k2"], vec![json!("v1"), json!("v2")]),
            rec(&["k3"], vec![json!("v3")]),
        ];
        let ids = CrudService::create(&store, "T", &records).await.unwrap();
        assert_eq!(ids, vec![1, 2]);
        let calls = store.calls();
        assert_eq!(calls[0].0, "INSERT INTO T (k1,k2) VALUES (?,?)");
        assert_eq!(calls[1].0, "INSERT INTO T (k3) VALUES (?)");
        assert_eq!(calls[1].1, vec![BindValue::String("v3".into())]);
    }

    #[tokio::test]
    async fn create_validates_before_executing() {
        let store = FakeStore::default();
        let records = vec![
            rec(&["k1"], vec![json!("v1")]),
            rec(&["", "k2"], vec![json!("x"), json!("y")]),
        ];
        assert!(CrudService::create(&store, "T", &records).await.is_err());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn update_sets_from_single_record() {
        let store = FakeStore::default();
        let n = CrudService::update(
            &store,
            &params("table_name=T&ids=1,2"),
            &[rec(&["name"], vec![json!("z")])],
        )
        .await
        .unwrap();
        assert_eq!(n, 1);
        assert_eq!(store.calls()[0].0, "UPDATE T SET name = ? WHERE id in (1,2)");
    }

    #[tokio::test]
    async fn update_with_no_records_is_a_no_op() {
        let store = FakeStore::default();
        let n = CrudService::update(&store, &params("table_name=T&id=1"), &[]).await.unwrap();
        assert_eq!(n, 0);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn update_rejects_several_records() {
        let store = FakeStore::default();
        let records = vec![rec(&["a"], vec![json!(1)]), rec(&["b"], vec![json!(2)])];
        let res = CrudService::update(&store, &params("table_name=T&id=1"), &records).await;
        assert!(matches!(res, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn delete_uses_literal_ids() {
        let store = FakeStore::default();
        CrudService::delete(&store, &params("table_name=T&id_field=pk&id=9")).await.unwrap();
        assert_eq!(store.calls()[0].0, "DELETE FROM T WHERE pk = 9");
        assert!(store.calls()[0].1.is_empty());
    }

    #[tokio::test]
    async fn table_names_reads_name_column() {
        let store = FakeStore::with_rows(vec![
            rec(&["name"], vec![json!("a")]),
            rec(&["name"], vec![json!("b")]),
        ]);
        assert_eq!(CrudService::table_names(&store).await.unwrap(), vec!["a", "b"]);
    }
}
