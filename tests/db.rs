mod common;

#[test]
fn test_creates_and_removes_db_files() {
    let dir;

    {
        let test_db = common::TestDb::new("test_connection.db");
        let conn = test_db.pool().get();
        assert!(conn.is_ok());
        assert!(test_db.path("test_connection.db").exists());
        dir = test_db.dir();
    }

    assert!(!dir.exists());
}

#[test]
fn test_migrations_seed_reference_tariffs() {
    use diesel::prelude::*;
    use pushkind_prices::schema::prices;

    let test_db = common::TestDb::new("test_seed.db");
    let mut conn = test_db.pool().get().expect("connection");

    let count = prices::table
        .filter(prices::product_id.eq(35455_i64))
        .filter(prices::brand_id.eq(1_i64))
        .count()
        .get_result::<i64>(&mut conn)
        .expect("count");

    assert_eq!(count, 4);
}
