mod support;

use rust_decimal_macros::dec;
use serde_json::json;

use repricer::adapter::wildberries::WildberriesAdapter;
use repricer::app::{WbPushMode, WildberriesConfig};
use repricer::domain::{CorrectionDebug, Price, PriceCorrection};
use repricer::marketplace::{FailureReason, MarketplaceAdapter};

use support::http::{MockServer, Reply};

fn adapter(url: &str, page_size: usize, mode: WbPushMode) -> WildberriesAdapter {
    let config = WildberriesConfig {
        api_url: url.to_string(),
        page_size,
        page_delay_ms: 0,
        task_poll_delay_ms: 0,
        push_mode: mode,
        api_key: Some("wb-key".into()),
        ..WildberriesConfig::default()
    };
    WildberriesAdapter::new(&config).unwrap()
}

fn correction(offer_id: &str, observed: Price, target: Price) -> PriceCorrection {
    PriceCorrection::new(
        offer_id,
        CorrectionDebug {
            observed_price: observed,
            previous_base: observed,
            new_base: observed,
            multiplier: dec!(1.1),
            new_target: target,
        },
    )
}

fn goods_page(offset: &str) -> Reply {
    match offset {
        "0" => Reply::json(
            200,
            json!({"data": {"listGoods": [
                {"nmID": 101, "vendorCode": "A-1", "discount": 25,
                 "sizes": [{"sizeID": 1, "price": 2000, "discountedPrice": 1500}]},
                {"nmID": 102, "vendorCode": "A-2", "discount": 10,
                 "sizes": [{"sizeID": 2, "price": 1000}]}
            ]}}),
        ),
        "2" => Reply::json(
            200,
            json!({"data": {"listGoods": [
                {"nmID": 103, "discount": 0, "sizes": []}
            ]}}),
        ),
        _ => Reply::json(200, json!({"data": {"listGoods": []}})),
    }
}

fn query_param<'a>(path: &'a str, name: &str) -> &'a str {
    path.split_once('?')
        .map(|(_, query)| query)
        .unwrap_or_default()
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .unwrap_or_default()
}

#[tokio::test]
async fn snapshot_pages_by_offset_and_derives_effective_price() {
    let server = MockServer::start(|req| goods_page(query_param(&req.path, "offset"))).await;

    let records = adapter(&server.url, 2, WbPushMode::Discount)
        .fetch_snapshot()
        .await
        .unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].offer_id, "101");
    assert_eq!(records[0].price, dec!(1500));
    assert_eq!(records[1].price, dec!(900));
    assert_eq!(records[2].price, dec!(0));
    assert!(records.iter().all(|r| r.min_price == dec!(0)));

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/v2/list/goods/filter?limit=2&offset=0");
    assert_eq!(requests[1].path, "/api/v2/list/goods/filter?limit=2&offset=2");
    assert_eq!(requests[0].header("authorization"), Some("wb-key"));
}

#[tokio::test]
async fn discount_mode_keeps_list_price_from_snapshot() {
    let server = MockServer::start(|req| {
        if req.method == "POST" {
            Reply::json(200, json!({"data": {"id": 777, "alreadyExists": false}, "error": false}))
        } else if req.path.starts_with("/api/v2/history/tasks") {
            Reply::json(200, json!({"data": {"uploadID": 777, "status": 3}}))
        } else {
            goods_page(query_param(&req.path, "offset"))
        }
    })
    .await;
    let adapter = adapter(&server.url, 2, WbPushMode::Discount);
    adapter.fetch_snapshot().await.unwrap();

    let report = adapter
        .push_corrections(&[
            correction("101", dec!(1500), dec!(1600)),
            correction("102", dec!(900), dec!(1100)),
        ])
        .await
        .unwrap();

    assert_eq!(report.succeeded, vec!["101", "102"]);
    let upload = server
        .requests()
        .into_iter()
        .find(|r| r.method == "POST")
        .unwrap();
    assert_eq!(upload.path, "/api/v2/upload/task");
    assert_eq!(
        upload.json(),
        json!({"data": [
            {"nmID": 101, "price": 2000, "discount": 20},
            {"nmID": 102, "price": 1100, "discount": 0}
        ]})
    );
}

#[tokio::test]
async fn task_history_errors_mark_items_failed() {
    let server = MockServer::start(|req| match req.path.split_once('?') {
        Some(("/api/v2/history/tasks", _)) => Reply::json(
            200,
            json!({"data": {"uploadID": 777, "status": 5,
                            "overAllGoodsNumber": 2, "successGoodsNumber": 1}}),
        ),
        Some(("/api/v2/history/goods/task", _)) => Reply::json(
            200,
            json!({"data": {"uploadID": 777, "historyGoods": [
                {"nmID": 101, "price": 950, "discount": 0, "status": 3,
                 "errorText": "new price is below the minimum price"},
                {"nmID": 102, "price": 1050, "discount": 0, "status": 2, "errorText": ""}
            ]}}),
        ),
        _ => Reply::json(200, json!({"data": {"id": 777, "alreadyExists": false}, "error": false})),
    })
    .await;

    let report = adapter(&server.url, 1000, WbPushMode::Price)
        .push_corrections(&[
            correction("101", dec!(900), dec!(950)),
            correction("102", dec!(1000), dec!(1050)),
        ])
        .await
        .unwrap();

    assert_eq!(report.succeeded, vec!["102"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].offer_id, "101");
    assert_eq!(
        report.failed[0].reason,
        FailureReason::BelowMinPrice {
            messages: vec!["new price is below the minimum price".into()]
        }
    );

    let paths: Vec<String> = server.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            "/api/v2/upload/task",
            "/api/v2/history/tasks?uploadID=777",
            "/api/v2/history/goods/task?uploadID=777&limit=1000&offset=0",
        ]
    );
}

#[tokio::test]
async fn pending_task_is_trusted_after_attempts() {
    let server = MockServer::start(|req| {
        if req.method == "POST" {
            Reply::json(200, json!({"data": {"id": 42}, "error": false}))
        } else {
            Reply::json(200, json!({"data": null}))
        }
    })
    .await;
    let config = WildberriesConfig {
        api_url: server.url.clone(),
        api_key: Some("wb-key".into()),
        task_poll_attempts: 2,
        task_poll_delay_ms: 0,
        ..WildberriesConfig::default()
    };

    let report = WildberriesAdapter::new(&config)
        .unwrap()
        .push_corrections(&[correction("101", dec!(900), dec!(950))])
        .await
        .unwrap();

    assert_eq!(report.succeeded, vec!["101"]);
    let history_calls = server
        .requests()
        .iter()
        .filter(|r| r.path.starts_with("/api/v2/history/tasks"))
        .count();
    assert_eq!(history_calls, 2);
}

#[tokio::test]
async fn quarantine_risk_is_not_sent() {
    let server = MockServer::start(|_| {
        Reply::json(200, json!({"data": {"id": 1}, "error": false}))
    })
    .await;

    let report = adapter(&server.url, 1000, WbPushMode::Price)
        .push_corrections(&[
            correction("101", dec!(900), dec!(250)),
            correction("102", dec!(900), dec!(950)),
        ])
        .await
        .unwrap();

    assert_eq!(report.succeeded, vec!["102"]);
    assert_eq!(
        report.failed[0].reason,
        FailureReason::QuarantineRisk {
            observed: dec!(900),
            target: dec!(250)
        }
    );
    let upload = &server.requests()[0];
    assert_eq!(upload.json()["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn rejected_upload_marks_batch_failed() {
    let server = MockServer::start(|_| Reply::text(400, "bad nmID")).await;

    let report = adapter(&server.url, 1000, WbPushMode::Price)
        .push_corrections(&[correction("101", dec!(900), dec!(950))])
        .await
        .unwrap();

    assert!(report.succeeded.is_empty());
    assert_eq!(
        report.failed[0].reason,
        FailureReason::BatchRejected {
            status: 400,
            message: "bad nmID".into()
        }
    );
}

#[tokio::test]
async fn upload_without_task_id_is_rejected() {
    let server = MockServer::start(|_| {
        Reply::json(200, json!({"data": null, "error": true, "errorText": "prices are the same"}))
    })
    .await;

    let report = adapter(&server.url, 1000, WbPushMode::Price)
        .push_corrections(&[correction("101", dec!(900), dec!(950))])
        .await
        .unwrap();

    assert_eq!(
        report.failed[0].reason,
        FailureReason::Rejected {
            messages: vec!["prices are the same".into()]
        }
    );
}

#[tokio::test]
async fn snapshot_error_status_is_transport_failure() {
    let server = MockServer::start(|_| Reply::text(401, "unauthorized")).await;

    let err = adapter(&server.url, 1000, WbPushMode::Discount)
        .fetch_snapshot()
        .await
        .unwrap_err();

    assert!(err.is_transport());
}
