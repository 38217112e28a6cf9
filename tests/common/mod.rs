//! Helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use diesel_migrations::MigrationHarness;
use tempfile::TempDir;

use pushkind_prices::db::{DbPool, MIGRATIONS, establish_connection_pool};
use pushkind_prices::schema::prices;

/// Temporary database used in integration tests, seeded by the migrations.
pub struct TestDb {
    pool: DbPool,
    dir: TempDir,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create a temporary directory.");
        let path = dir.path().join(filename);
        let url = path.to_str().expect("Temporary path is not UTF-8.");

        let pool = establish_connection_pool(url).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb { pool, dir }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn dir(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn path(&self, filename: &str) -> PathBuf {
        Path::new(self.dir.path()).join(filename)
    }

    /// Insert a raw row, bypassing the domain invariants.
    pub fn insert_price(&self, row: RawPrice<'_>) {
        let mut conn = self.pool.get().expect("connection");
        diesel::insert_into(prices::table)
            .values((
                prices::brand_id.eq(row.brand_id),
                prices::product_id.eq(row.product_id),
                prices::price_list.eq(row.price_list),
                prices::start_date.eq(row.start_date),
                prices::end_date.eq(row.end_date),
                prices::priority.eq(row.priority),
                prices::price.eq(row.price),
                prices::currency.eq(row.currency),
            ))
            .execute(&mut conn)
            .expect("insert price row");
    }
}

/// Column values for [`TestDb::insert_price`].
pub struct RawPrice<'a> {
    pub brand_id: i64,
    pub product_id: i64,
    pub price_list: i32,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub priority: i32,
    pub price: &'a str,
    pub currency: &'a str,
}

pub fn datetime(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .expect("valid datetime")
}

/// Reference scenarios for product 35455 / brand 1: instant, price list, amount.
pub const SCENARIOS: [(&str, i32, &str); 5] = [
    ("2020-06-14T10:00:00", 1, "35.50"),
    ("2020-06-14T16:00:00", 2, "25.45"),
    ("2020-06-14T21:00:00", 1, "35.50"),
    ("2020-06-15T10:00:00", 3, "30.50"),
    ("2020-06-16T21:00:00", 4, "38.95"),
];
