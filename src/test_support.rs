//! In-memory doubles shared by unit tests.

use crate::config::Config;
use crate::error::AppError;
use crate::extractors::ParamMap;
use crate::service::KvRecord;
use crate::sql::BindValue;
use crate::state::AppState;
use crate::store::{ExecOutcome, RowStore};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Records every statement; queries answer with canned rows, executes
/// report one affected row and sequential insert ids from 1.
#[derive(Default)]
pub struct FakeStore {
    rows: Vec<KvRecord>,
    calls: Mutex<Vec<(String, Vec<BindValue>)>>,
    next_id: Mutex<i64>,
}

impl FakeStore {
    pub fn with_rows(rows: Vec<KvRecord>) -> Self {
        FakeStore {
            rows,
            ..FakeStore::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<BindValue>)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, sql: &str, params: &[BindValue]) {
        self.calls.lock().unwrap().push((sql.to_string(), params.to_vec()));
    }
}

#[async_trait]
impl RowStore for FakeStore {
    async fn query(&self, sql: &str, params: &[BindValue]) -> Result<Vec<KvRecord>, AppError> {
        self.record(sql, params);
        Ok(self.rows.clone())
    }

    async fn execute(&self, sql: &str, params: &[BindValue]) -> Result<ExecOutcome, AppError> {
        self.record(sql, params);
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        Ok(ExecOutcome {
            rows_affected: 1,
            last_insert_id: *next,
        })
    }

    fn table_names_query(&self) -> &str {
        "SELECT name FROM tables"
    }
}

/// Unvalidated `k=v&k2=v2` into a parameter map.
pub fn params(s: &str) -> ParamMap {
    s.split('&')
        .filter(|kv| !kv.is_empty())
        .map(|kv| match kv.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (kv.to_string(), String::new()),
        })
        .collect()
}

pub fn test_config() -> Config {
    Config {
        max_recs: 7,
        ..Config::default()
    }
}

pub fn test_state() -> AppState {
    AppState::new(test_config(), Arc::new(FakeStore::default()))
}

pub fn test_state_with(store: Arc<FakeStore>) -> AppState {
    AppState::new(test_config(), store)
}
