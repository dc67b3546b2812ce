//! End-to-end consensus lifecycle: publishing, re-aggregation, and removal.

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::{json, Value};

use domains::{CommunityRepo, ListRepo, RankedList};
use integration_tests::{create_list, publish_list, register, send, test_app};
use services::AggregationEngine;
use storage_adapters::MemoryStore;

async fn community_by_name(router: &axum::Router, cookie: &str, name: &str) -> Option<Value> {
    let (status, body, _) = send(router, "GET", "/communitylists", Some(cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|list| {
            list["name"]
                .as_str()
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
        .cloned()
}

fn items_of(list: &Value) -> Vec<(String, i64)> {
    list["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| {
            (
                entry["item"].as_str().unwrap().to_string(),
                entry["points"].as_i64().unwrap(),
            )
        })
        .collect()
}

#[tokio::test]
async fn publishing_creates_the_community_list() {
    let app = test_app();
    let alice = register(&app.router, "alice").await;
    let id = create_list(&app.router, &alice, "Top Drinks").await;
    publish_list(
        &app.router,
        &alice,
        &id,
        "Top Drinks",
        ["Coffee", "Tea", "Juice", "Water", "Soda"],
    )
    .await;

    let community = community_by_name(&app.router, &alice, "Top Drinks").await.unwrap();
    assert_eq!(
        items_of(&community),
        vec![
            ("Coffee".to_string(), 5),
            ("Tea".to_string(), 4),
            ("Juice".to_string(), 3),
            ("Water".to_string(), 2),
            ("Soda".to_string(), 1),
        ]
    );
}

#[tokio::test]
async fn a_second_publisher_merges_points_with_first_seen_tie_break() {
    let app = test_app();
    let alice = register(&app.router, "alice").await;
    let bob = register(&app.router, "bob").await;

    let a = create_list(&app.router, &alice, "Top Drinks").await;
    publish_list(&app.router, &alice, &a, "Top Drinks", ["x", "y", "z", "w", "v"]).await;
    let b = create_list(&app.router, &bob, "Top Drinks").await;
    publish_list(&app.router, &bob, &b, "Top Drinks", ["y", "x", "v", "w", "z"]).await;

    // x = 5+4, y = 4+5, z = 3+1, w = 2+2, v = 1+3; ties keep first-seen order.
    let community = community_by_name(&app.router, &alice, "Top Drinks").await.unwrap();
    assert_eq!(
        items_of(&community),
        vec![
            ("x".to_string(), 9),
            ("y".to_string(), 9),
            ("z".to_string(), 4),
            ("w".to_string(), 4),
            ("v".to_string(), 4),
        ]
    );
}

#[tokio::test]
async fn item_identity_is_case_insensitive_with_first_seen_casing() {
    let app = test_app();
    let alice = register(&app.router, "alice").await;
    let bob = register(&app.router, "bob").await;

    let a = create_list(&app.router, &alice, "Top Drinks").await;
    publish_list(&app.router, &alice, &a, "Top Drinks", ["Coffee", "Tea", "Juice", "Water", "Soda"]).await;
    let b = create_list(&app.router, &bob, "top drinks").await;
    publish_list(&app.router, &bob, &b, "top drinks", ["coffee", "tea", "juice", "water", "soda"]).await;

    let community = community_by_name(&app.router, &alice, "Top Drinks").await.unwrap();
    assert_eq!(
        items_of(&community),
        vec![
            ("Coffee".to_string(), 10),
            ("Tea".to_string(), 8),
            ("Juice".to_string(), 6),
            ("Water".to_string(), 4),
            ("Soda".to_string(), 2),
        ]
    );
}

#[tokio::test]
async fn re_aggregation_preserves_engagement_counters() {
    let app = test_app();
    let alice = register(&app.router, "alice").await;
    let bob = register(&app.router, "bob").await;

    let a = create_list(&app.router, &alice, "Top Drinks").await;
    publish_list(&app.router, &alice, &a, "Top Drinks", ["a", "b", "c", "d", "e"]).await;

    let community = community_by_name(&app.router, &alice, "Top Drinks").await.unwrap();
    let community_id = community["id"].as_str().unwrap().to_string();
    send(
        &app.router,
        "PUT",
        &format!("/communitylist/{community_id}/rating"),
        Some(&alice),
        Some(json!({ "value": 1 })),
    )
    .await;
    send(
        &app.router,
        "POST",
        &format!("/communitylist/{community_id}/views"),
        Some(&alice),
        None,
    )
    .await;

    let b = create_list(&app.router, &bob, "Top Drinks").await;
    publish_list(&app.router, &bob, &b, "Top Drinks", ["e", "d", "c", "b", "a"]).await;

    let community = community_by_name(&app.router, &alice, "Top Drinks").await.unwrap();
    assert_eq!(community["id"].as_str().unwrap(), community_id);
    assert_eq!(community["likes"], json!(1));
    assert_eq!(community["views"], json!(1));
    // Every item now scores 6, so the first publisher's ordering survives.
    assert_eq!(
        items_of(&community),
        vec![
            ("a".to_string(), 6),
            ("b".to_string(), 6),
            ("c".to_string(), 6),
            ("d".to_string(), 6),
            ("e".to_string(), 6),
        ]
    );
}

#[tokio::test]
async fn deleting_the_last_contributor_removes_the_community_list() {
    let app = test_app();
    let alice = register(&app.router, "alice").await;
    let id = create_list(&app.router, &alice, "Top Drinks").await;
    publish_list(&app.router, &alice, &id, "Top Drinks", ["a", "b", "c", "d", "e"]).await;
    assert!(community_by_name(&app.router, &alice, "Top Drinks").await.is_some());

    let (status, _, _) = send(
        &app.router,
        "DELETE",
        &format!("/top5list/{id}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(community_by_name(&app.router, &alice, "Top Drinks").await.is_none());
}

#[tokio::test]
async fn unpublishing_the_only_contributor_removes_the_community_list() {
    let app = test_app();
    let alice = register(&app.router, "alice").await;
    let id = create_list(&app.router, &alice, "Top Drinks").await;
    publish_list(&app.router, &alice, &id, "Top Drinks", ["a", "b", "c", "d", "e"]).await;

    let (status, _, _) = send(
        &app.router,
        "PUT",
        &format!("/top5list/{id}"),
        Some(&alice),
        Some(json!({
            "name": "Top Drinks",
            "items": ["a", "b", "c", "d", "e"],
            "published": false,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(community_by_name(&app.router, &alice, "Top Drinks").await.is_none());
}

#[tokio::test]
async fn renaming_a_published_list_moves_its_contribution() {
    let app = test_app();
    let alice = register(&app.router, "alice").await;
    let id = create_list(&app.router, &alice, "Top Drinks").await;
    publish_list(&app.router, &alice, &id, "Top Drinks", ["a", "b", "c", "d", "e"]).await;

    let (status, _, _) = send(
        &app.router,
        "PUT",
        &format!("/top5list/{id}"),
        Some(&alice),
        Some(json!({
            "name": "Top Snacks",
            "items": ["a", "b", "c", "d", "e"],
            "published": true,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert!(community_by_name(&app.router, &alice, "Top Drinks").await.is_none());
    assert!(community_by_name(&app.router, &alice, "Top Snacks").await.is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reconciles_of_one_name_converge_on_a_single_community_list() {
    let store = MemoryStore::new();
    let mut list = RankedList::new("Top Drinks", "alice");
    list.items = ["a", "b", "c", "d", "e"].map(str::to_string);
    list.published = true;
    list.publish_date = Some(Utc::now());
    store.create_list(list).await.unwrap();

    let engine = Arc::new(AggregationEngine::new(store.clone(), store.clone()));
    let mut handles = Vec::new();
    for name in ["Top Drinks", "top drinks", "TOP DRINKS", "Top Drinks"] {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move { engine.reconcile(name).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Un-serialized triggers could both see "no community list yet" and
    // create two; the per-name lock guarantees exactly one survives.
    let all = CommunityRepo::list_all(store.as_ref()).await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].name.eq_ignore_ascii_case("Top Drinks"));
}

#[tokio::test]
async fn drafts_never_contribute_to_the_consensus() {
    let app = test_app();
    let alice = register(&app.router, "alice").await;
    create_list(&app.router, &alice, "Top Drinks").await;

    let (_, body, _) = send(&app.router, "GET", "/communitylists", Some(&alice), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}
