//! Rating, view, and comment endpoints for ranked and community lists.

use axum::http::StatusCode;
use serde_json::{json, Value};

use integration_tests::{create_list, publish_list, register, send, test_app};

async fn published_list(router: &axum::Router, cookie: &str, name: &str) -> String {
    let id = create_list(router, cookie, name).await;
    publish_list(router, cookie, &id, name, ["a", "b", "c", "d", "e"]).await;
    id
}

async fn fetch_list(router: &axum::Router, cookie: &str, id: &str) -> Value {
    let (status, body, _) = send(router, "GET", &format!("/top5list/{id}"), Some(cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    body["top5List"].clone()
}

#[tokio::test]
async fn like_then_unlike_moves_the_counter_both_ways() {
    let app = test_app();
    let alice = register(&app.router, "alice").await;
    let bob = register(&app.router, "bob").await;
    let id = published_list(&app.router, &alice, "Top Drinks").await;

    let (status, _, _) = send(
        &app.router,
        "PUT",
        &format!("/top5list/{id}/rating"),
        Some(&bob),
        Some(json!({ "value": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let list = fetch_list(&app.router, &alice, &id).await;
    assert_eq!(list["likes"], json!(1));
    assert_eq!(list["dislikes"], json!(0));

    let (status, _, _) = send(
        &app.router,
        "PUT",
        &format!("/top5list/{id}/rating"),
        Some(&bob),
        Some(json!({ "value": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let list = fetch_list(&app.router, &alice, &id).await;
    assert_eq!(list["likes"], json!(0));
    assert_eq!(list["dislikes"], json!(0));
}

#[tokio::test]
async fn switching_dislike_to_like_adjusts_both_counters() {
    let app = test_app();
    let alice = register(&app.router, "alice").await;
    let bob = register(&app.router, "bob").await;
    let id = published_list(&app.router, &alice, "Top Drinks").await;

    send(
        &app.router,
        "PUT",
        &format!("/top5list/{id}/rating"),
        Some(&bob),
        Some(json!({ "value": -1 })),
    )
    .await;
    send(
        &app.router,
        "PUT",
        &format!("/top5list/{id}/rating"),
        Some(&bob),
        Some(json!({ "value": 1 })),
    )
    .await;

    let list = fetch_list(&app.router, &alice, &id).await;
    assert_eq!(list["likes"], json!(1));
    assert_eq!(list["dislikes"], json!(0));
}

#[tokio::test]
async fn repeating_a_rating_is_a_noop() {
    let app = test_app();
    let alice = register(&app.router, "alice").await;
    let bob = register(&app.router, "bob").await;
    let id = published_list(&app.router, &alice, "Top Drinks").await;

    for _ in 0..3 {
        let (status, _, _) = send(
            &app.router,
            "PUT",
            &format!("/top5list/{id}/rating"),
            Some(&bob),
            Some(json!({ "value": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let list = fetch_list(&app.router, &alice, &id).await;
    assert_eq!(list["likes"], json!(1));
}

#[tokio::test]
async fn unpublished_lists_cannot_be_rated() {
    let app = test_app();
    let alice = register(&app.router, "alice").await;
    let id = create_list(&app.router, &alice, "Draft").await;

    let (status, _, _) = send(
        &app.router,
        "PUT",
        &format!("/top5list/{id}/rating"),
        Some(&alice),
        Some(json!({ "value": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn out_of_range_rating_is_rejected() {
    let app = test_app();
    let alice = register(&app.router, "alice").await;
    let id = published_list(&app.router, &alice, "Top Drinks").await;

    let (status, _, _) = send(
        &app.router,
        "PUT",
        &format!("/top5list/{id}/rating"),
        Some(&alice),
        Some(json!({ "value": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn views_accumulate() {
    let app = test_app();
    let alice = register(&app.router, "alice").await;
    let id = published_list(&app.router, &alice, "Top Drinks").await;

    for _ in 0..3 {
        let (status, _, _) = send(
            &app.router,
            "POST",
            &format!("/top5list/{id}/views"),
            Some(&alice),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let list = fetch_list(&app.router, &alice, &id).await;
    assert_eq!(list["views"], json!(3));
}

#[tokio::test]
async fn comments_come_back_newest_first() {
    let app = test_app();
    let alice = register(&app.router, "alice").await;
    let bob = register(&app.router, "bob").await;
    let id = published_list(&app.router, &alice, "Top Drinks").await;

    for text in ["first", "second"] {
        let (status, _, _) = send(
            &app.router,
            "POST",
            &format!("/top5list/{id}/comments"),
            Some(&bob),
            Some(json!({ "text": text })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let list = fetch_list(&app.router, &alice, &id).await;
    let comments = list["comments"].as_array().unwrap();
    assert_eq!(comments[0]["text"], json!("second"));
    assert_eq!(comments[1]["text"], json!("first"));
    assert_eq!(comments[0]["username"], json!("bob"));
}

#[tokio::test]
async fn blank_comments_are_rejected() {
    let app = test_app();
    let alice = register(&app.router, "alice").await;
    let id = published_list(&app.router, &alice, "Top Drinks").await;

    let (status, _, _) = send(
        &app.router,
        "POST",
        &format!("/top5list/{id}/comments"),
        Some(&alice),
        Some(json!({ "text": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn community_lists_take_ratings_and_views_too() {
    let app = test_app();
    let alice = register(&app.router, "alice").await;
    published_list(&app.router, &alice, "Top Drinks").await;

    let (_, body, _) = send(&app.router, "GET", "/communitylists", Some(&alice), None).await;
    let community_id = body["data"][0]["id"].as_str().unwrap().to_string();

    let (status, _, _) = send(
        &app.router,
        "PUT",
        &format!("/communitylist/{community_id}/rating"),
        Some(&alice),
        Some(json!({ "value": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(
        &app.router,
        "POST",
        &format!("/communitylist/{community_id}/views"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body, _) = send(
        &app.router,
        "GET",
        &format!("/communitylist/{community_id}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(body["communityList"]["dislikes"], json!(1));
    assert_eq!(body["communityList"]["views"], json!(1));
}
