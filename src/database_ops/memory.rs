//! In-process implementation of the catalog and account stores.
//!
//! Used by the test suites and by `STORE_BACKEND=memory` for local runs without
//! Postgres. Rows keep insertion order, which stands in for the unordered scan
//! order of the real tables. `set_failing(true)` makes every call error out so
//! callers can exercise their outage handling.

use crate::accounts::{NewEnquiry, UserRecord};
use crate::catalog::{CatalogTable, RawRow, RawValue};
use crate::store::{AccountStore, CatalogStore};
use anyhow::{bail, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<CatalogTable, Vec<RawRow>>>,
    users: RwLock<Vec<UserRecord>>,
    enquiries: RwLock<Vec<NewEnquiry>>,
    failing: AtomicBool,
    reads: AtomicUsize,
}

fn column<'a>(row: &'a RawRow, name: &str) -> Option<&'a RawValue> {
    row.iter().find(|(col, _)| col == name).map(|(_, value)| value)
}

fn select(row: &RawRow, columns: &[&str]) -> RawRow {
    columns
        .iter()
        .map(|&name| {
            let value = column(row, name).cloned().unwrap_or(RawValue::Null);
            (name.to_string(), value)
        })
        .collect()
}

fn contains_ci(value: Option<&RawValue>, needle: &str) -> bool {
    match value {
        Some(RawValue::Text(text)) => text.to_lowercase().contains(needle),
        _ => false,
    }
}

impl MemoryStore {
    pub fn push_row(&self, table: CatalogTable, row: RawRow) {
        self.tables.write().entry(table).or_default().push(row);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of catalog reads served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn enquiries(&self) -> Vec<NewEnquiry> {
        self.enquiries.read().clone()
    }

    fn begin_read(&self) -> Result<()> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("memory store is unavailable");
        }
        Ok(())
    }

    fn rows(&self, table: CatalogTable) -> Vec<RawRow> {
        self.tables.read().get(&table).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn distinct_values(&self, table: CatalogTable, col: &str) -> Result<Vec<String>> {
        self.begin_read()?;
        let mut out: Vec<String> = Vec::new();
        for row in self.rows(table) {
            if let Some(RawValue::Text(value)) = column(&row, col) {
                if !out.contains(value) {
                    out.push(value.clone());
                }
            }
        }
        Ok(out)
    }

    async fn count_rows(&self, table: CatalogTable) -> Result<i64> {
        self.begin_read()?;
        Ok(self.rows(table).len() as i64)
    }

    async fn fetch_rows(&self, table: CatalogTable, columns: &[&str]) -> Result<Vec<RawRow>> {
        self.begin_read()?;
        Ok(self
            .rows(table)
            .iter()
            .map(|row| select(row, columns))
            .collect())
    }

    async fn search_rows(
        &self,
        table: CatalogTable,
        query: &str,
        limit: i64,
    ) -> Result<Vec<RawRow>> {
        self.begin_read()?;
        let needle = query.to_lowercase();
        let columns = table.search_columns();
        Ok(self
            .rows(table)
            .iter()
            .filter(|row| {
                contains_ci(column(row, "brand"), &needle)
                    || contains_ci(column(row, table.name_column()), &needle)
            })
            .take(limit.max(0) as usize)
            .map(|row| select(row, &columns))
            .collect())
    }

    async fn ping(&self) -> bool {
        !self.failing.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        self.check_available()?;
        Ok(self.users.read().iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: &UserRecord) -> Result<()> {
        self.check_available()?;
        let mut users = self.users.write();
        if users.iter().any(|u| u.email == user.email) {
            bail!("duplicate key value violates unique constraint \"users_email_key\"");
        }
        users.push(user.clone());
        Ok(())
    }

    async fn insert_enquiry(&self, enquiry: &NewEnquiry) -> Result<()> {
        self.check_available()?;
        self.enquiries.write().push(enquiry.clone());
        Ok(())
    }
}
