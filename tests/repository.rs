use pushkind_prices::domain::price::PriceQuery;
use pushkind_prices::domain::resolver::resolve;
use pushkind_prices::repository::{DieselRepository, PriceReader, RepositoryError};

mod common;

use common::{RawPrice, SCENARIOS, datetime};

fn query(instant: &str, product_id: i64, brand_id: i64) -> PriceQuery {
    let instant = instant.parse().expect("ISO datetime");
    PriceQuery::new(instant, product_id, brand_id)
}

#[test]
fn test_fetch_candidates_filters_by_window() {
    let test_db = common::TestDb::new("test_fetch_candidates.db");
    let repo = DieselRepository::new(test_db.pool());

    let mut lists: Vec<i32> = repo
        .fetch_candidates(&query("2020-06-14T16:00:00", 35455, 1))
        .unwrap()
        .iter()
        .map(|price| price.price_list_id())
        .collect();
    lists.sort();
    assert_eq!(lists, vec![1, 2]);

    let candidates = repo
        .fetch_candidates(&query("2020-06-14T21:00:00", 35455, 1))
        .unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].price_list_id(), 1);

    assert!(
        repo.fetch_candidates(&query("2019-01-01T00:00:00", 35455, 1))
            .unwrap()
            .is_empty()
    );
    assert!(
        repo.fetch_candidates(&query("2020-06-14T10:00:00", 35455, 2))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_fetch_candidates_includes_window_edges() {
    let test_db = common::TestDb::new("test_window_edges.db");
    let repo = DieselRepository::new(test_db.pool());

    for instant in ["2020-06-14T15:00:00", "2020-06-14T18:30:00"] {
        let candidates = repo.fetch_candidates(&query(instant, 35455, 1)).unwrap();
        assert!(
            candidates.iter().any(|price| price.price_list_id() == 2),
            "price list 2 should apply at {instant}"
        );
    }

    let candidates = repo
        .fetch_candidates(&query("2020-12-31T23:59:59", 35455, 1))
        .unwrap();
    assert_eq!(candidates.len(), 2);
}

#[test]
fn test_store_and_memory_selection_agree() {
    let test_db = common::TestDb::new("test_selection_agree.db");
    let repo = DieselRepository::new(test_db.pool());

    for (instant, price_list, amount) in SCENARIOS {
        let q = query(instant, 35455, 1);

        let top = repo.find_top_price(&q).unwrap().expect("store winner");
        let resolved = resolve(repo.fetch_candidates(&q).unwrap(), q.instant).expect("winner");

        assert_eq!(top, resolved, "at {instant}");
        assert_eq!(top.price_list_id(), price_list, "at {instant}");
        assert_eq!(top.amount().to_string(), amount, "at {instant}");
        assert_eq!(top.currency().as_str(), "EUR");
    }

    assert!(
        repo.find_top_price(&query("2019-01-01T00:00:00", 35455, 1))
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_store_tie_break_matches_resolver() {
    let test_db = common::TestDb::new("test_store_tie_break.db");
    let repo = DieselRepository::new(test_db.pool());

    let start = datetime(2021, 1, 1, 0, 0, 0);
    let end = datetime(2021, 1, 31, 23, 59, 59);
    for (price_list, price) in [(9, "10.00"), (7, "12.00"), (8, "11.00")] {
        test_db.insert_price(RawPrice {
            brand_id: 2,
            product_id: 100,
            price_list,
            start_date: start,
            end_date: end,
            priority: 5,
            price,
            currency: "EUR",
        });
    }

    let q = query("2021-01-15T12:00:00", 100, 2);
    let top = repo.find_top_price(&q).unwrap().expect("store winner");
    let resolved = resolve(repo.fetch_candidates(&q).unwrap(), q.instant).expect("winner");

    assert_eq!(top.price_list_id(), 7);
    assert_eq!(top, resolved);
}

#[test]
fn test_invalid_rows_surface_as_errors() {
    let test_db = common::TestDb::new("test_invalid_rows.db");
    let repo = DieselRepository::new(test_db.pool());

    test_db.insert_price(RawPrice {
        brand_id: 3,
        product_id: 200,
        price_list: 1,
        start_date: datetime(2021, 1, 1, 0, 0, 0),
        end_date: datetime(2021, 12, 31, 0, 0, 0),
        priority: 0,
        price: "0.00",
        currency: "EUR",
    });

    let err = repo
        .fetch_candidates(&query("2021-06-01T00:00:00", 200, 3))
        .expect_err("zero price must be rejected");
    assert!(matches!(err, RepositoryError::InvalidRecord(_)));

    let err = repo
        .find_top_price(&query("2021-06-01T00:00:00", 200, 3))
        .expect_err("zero price must be rejected");
    assert!(matches!(err, RepositoryError::InvalidRecord(_)));
}
