// ABOUTME: Integration tests for recipe CRUD, permissions, and list filters
// ABOUTME: Exercises image intake, ingredient reconciliation, and viewer-dependent flags over HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use axum::http::StatusCode;
use helpers::axum_test::AxumTestRequest;
use helpers::test_utils::{
    create_test_resources, png_data_uri, seed_foodstuff, seed_recipe, seed_staff_user, seed_tag,
    seed_user, token_for,
};
use ladle::server::LadleServer;
use serde_json::{json, Value};

#[tokio::test]
async fn test_create_recipe_returns_full_detail() {
    let (resources, _media) = create_test_resources().await.unwrap();
    let author = seed_user(&resources, "author@example.com", "author")
        .await
        .unwrap();
    let tag = seed_tag(&resources, "Breakfast", "#E26C2D", "breakfast")
        .await
        .unwrap();
    let flour = seed_foodstuff(&resources, "flour", "g").await.unwrap();
    let milk = seed_foodstuff(&resources, "milk", "ml").await.unwrap();
    let token = token_for(&resources, &author);
    let app = LadleServer::router(&resources);

    let detail: Value = AxumTestRequest::post("/api/recipes")
        .bearer(&token)
        .json(&json!({
            "name": "Pancakes",
            "text": "Whisk and fry.",
            "cooking_time": 20,
            "image": png_data_uri(),
            "tags": [tag.id],
            "ingredients": [
                {"id": flour.id, "amount": 200},
                {"id": milk.id, "amount": 300},
            ],
        }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::CREATED)
        .json();

    assert_eq!(detail["name"], "Pancakes");
    assert_eq!(detail["cooking_time"], 20);
    assert_eq!(detail["author"]["username"], "author");
    assert_eq!(detail["is_favorited"], false);
    assert_eq!(detail["is_in_shopping_cart"], false);
    assert_eq!(detail["tags"][0]["slug"], "breakfast");

    let ingredients = detail["ingredients"].as_array().unwrap();
    assert_eq!(ingredients.len(), 2);
    assert_eq!(ingredients[0]["name"], "flour");
    assert_eq!(ingredients[0]["measurement_unit"], "g");
    assert_eq!(ingredients[0]["amount"], 200);
    assert_eq!(ingredients[1]["name"], "milk");
    assert_eq!(ingredients[1]["amount"], 300);

    // The stored image is served back under /media
    let image_path = detail["image"].as_str().unwrap();
    assert!(image_path.starts_with("/media/recipes/"));
    assert!(image_path.ends_with(".png"));
    AxumTestRequest::get(image_path)
        .send(app)
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_create_recipe_validation() {
    let (resources, _media) = create_test_resources().await.unwrap();
    let author = seed_user(&resources, "author@example.com", "author")
        .await
        .unwrap();
    let tag = seed_tag(&resources, "Breakfast", "#E26C2D", "breakfast")
        .await
        .unwrap();
    let flour = seed_foodstuff(&resources, "flour", "g").await.unwrap();
    let token = token_for(&resources, &author);
    let app = LadleServer::router(&resources);

    let valid = json!({
        "name": "Pancakes",
        "text": "Whisk and fry.",
        "cooking_time": 20,
        "image": png_data_uri(),
        "tags": [tag.id],
        "ingredients": [{"id": flour.id, "amount": 200}],
    });

    let with = |key: &str, value: Value| {
        let mut body = valid.clone();
        body[key] = value;
        body
    };

    // Anonymous create
    AxumTestRequest::post("/api/recipes")
        .json(&valid)
        .send(app.clone())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    // Empty ingredient list
    AxumTestRequest::post("/api/recipes")
        .bearer(&token)
        .json(&with("ingredients", json!([])))
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Empty tag list
    AxumTestRequest::post("/api/recipes")
        .bearer(&token)
        .json(&with("tags", json!([])))
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Duplicate foodstuff reference, reported with the offending ids
    let body: Value = AxumTestRequest::post("/api/recipes")
        .bearer(&token)
        .json(&with(
            "ingredients",
            json!([
                {"id": flour.id, "amount": 200},
                {"id": flour.id, "amount": 300},
            ]),
        ))
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["error"]["code"], "DUPLICATE_INGREDIENT");
    assert_eq!(body["error"]["details"]["foodstuff_ids"], json!([flour.id]));

    // Amount below the minimum
    let body: Value = AxumTestRequest::post("/api/recipes")
        .bearer(&token)
        .json(&with("ingredients", json!([{"id": flour.id, "amount": 0}])))
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["error"]["code"], "VALUE_OUT_OF_RANGE");

    // Cooking time below the minimum
    AxumTestRequest::post("/api/recipes")
        .bearer(&token)
        .json(&with("cooking_time", json!(0)))
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Unknown tag
    AxumTestRequest::post("/api/recipes")
        .bearer(&token)
        .json(&with("tags", json!([9999])))
        .send(app.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // Unknown foodstuff
    AxumTestRequest::post("/api/recipes")
        .bearer(&token)
        .json(&with("ingredients", json!([{"id": 9999, "amount": 10}])))
        .send(app.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // Image that is not a data URI
    AxumTestRequest::post("/api/recipes")
        .bearer(&token)
        .json(&with("image", json!("https://example.com/cat.png")))
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_recipe_viewer_flags() {
    let (resources, _media) = create_test_resources().await.unwrap();
    let author = seed_user(&resources, "author@example.com", "author")
        .await
        .unwrap();
    let viewer = seed_user(&resources, "viewer@example.com", "viewer")
        .await
        .unwrap();
    let recipe_id = seed_recipe(&resources, author.id, "Borscht", &[], &[])
        .await
        .unwrap();
    let token = token_for(&resources, &viewer);
    let app = LadleServer::router(&resources);

    AxumTestRequest::post(&format!("/api/recipes/{recipe_id}/favorite"))
        .bearer(&token)
        .send(app.clone())
        .await
        .assert_status(StatusCode::CREATED);
    AxumTestRequest::post(&format!("/api/recipes/{recipe_id}/shopping_cart"))
        .bearer(&token)
        .send(app.clone())
        .await
        .assert_status(StatusCode::CREATED);
    AxumTestRequest::post(&format!("/api/users/{}/subscribe", author.id))
        .bearer(&token)
        .send(app.clone())
        .await
        .assert_status(StatusCode::CREATED);

    // Anonymous read: every flag false
    let detail: Value = AxumTestRequest::get(&format!("/api/recipes/{recipe_id}"))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(detail["is_favorited"], false);
    assert_eq!(detail["is_in_shopping_cart"], false);
    assert_eq!(detail["author"]["is_subscribed"], false);

    // The viewer sees their own relationships
    let detail: Value = AxumTestRequest::get(&format!("/api/recipes/{recipe_id}"))
        .bearer(&token)
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(detail["is_favorited"], true);
    assert_eq!(detail["is_in_shopping_cart"], true);
    assert_eq!(detail["author"]["is_subscribed"], true);

    AxumTestRequest::get("/api/recipes/9999")
        .send(app)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_permissions() {
    let (resources, _media) = create_test_resources().await.unwrap();
    let author = seed_user(&resources, "author@example.com", "author")
        .await
        .unwrap();
    let other = seed_user(&resources, "other@example.com", "other")
        .await
        .unwrap();
    let staff = seed_staff_user(&resources, "staff@example.com", "staff")
        .await
        .unwrap();
    let recipe_id = seed_recipe(&resources, author.id, "Borscht", &[], &[])
        .await
        .unwrap();
    let app = LadleServer::router(&resources);

    // Author may rename
    let detail: Value = AxumTestRequest::patch(&format!("/api/recipes/{recipe_id}"))
        .bearer(&token_for(&resources, &author))
        .json(&json!({"name": "Summer Borscht"}))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(detail["name"], "Summer Borscht");

    // A non-author may not
    let body: Value = AxumTestRequest::patch(&format!("/api/recipes/{recipe_id}"))
        .bearer(&token_for(&resources, &other))
        .json(&json!({"name": "Hijacked"}))
        .send(app.clone())
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .json();
    assert_eq!(body["error"]["code"], "PERMISSION_DENIED");

    // Staff may
    AxumTestRequest::patch(&format!("/api/recipes/{recipe_id}"))
        .bearer(&token_for(&resources, &staff))
        .json(&json!({"cooking_time": 45}))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK);

    // Anonymous may not
    AxumTestRequest::patch(&format!("/api/recipes/{recipe_id}"))
        .json(&json!({"name": "Anonymous"}))
        .send(app.clone())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    AxumTestRequest::patch("/api/recipes/9999")
        .bearer(&token_for(&resources, &author))
        .json(&json!({"name": "Ghost"}))
        .send(app.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // Full replacement is not part of the API surface
    AxumTestRequest::put(&format!("/api/recipes/{recipe_id}"))
        .bearer(&token_for(&resources, &author))
        .json(&json!({"name": "Replaced"}))
        .send(app)
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_update_reconciles_ingredients() {
    let (resources, _media) = create_test_resources().await.unwrap();
    let author = seed_user(&resources, "author@example.com", "author")
        .await
        .unwrap();
    let flour = seed_foodstuff(&resources, "flour", "g").await.unwrap();
    let milk = seed_foodstuff(&resources, "milk", "ml").await.unwrap();
    let eggs = seed_foodstuff(&resources, "eggs", "pcs").await.unwrap();
    let recipe_id = seed_recipe(
        &resources,
        author.id,
        "Pancakes",
        &[],
        &[(flour.id, 200), (milk.id, 300)],
    )
    .await
    .unwrap();
    let token = token_for(&resources, &author);
    let app = LadleServer::router(&resources);

    // flour amount changes, milk leaves, eggs arrive
    let detail: Value = AxumTestRequest::patch(&format!("/api/recipes/{recipe_id}"))
        .bearer(&token)
        .json(&json!({
            "ingredients": [
                {"id": flour.id, "amount": 250},
                {"id": eggs.id, "amount": 2},
            ],
        }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();

    let ingredients = detail["ingredients"].as_array().unwrap();
    assert_eq!(ingredients.len(), 2);
    let amount_of = |name: &str| {
        ingredients
            .iter()
            .find(|i| i["name"] == name)
            .map(|i| i["amount"].clone())
            .unwrap()
    };
    assert_eq!(amount_of("flour"), 250);
    assert_eq!(amount_of("eggs"), 2);
    assert!(!ingredients.iter().any(|i| i["name"] == "milk"));

    // Emptying the tag set is rejected; omitting it keeps the stored set
    AxumTestRequest::patch(&format!("/api/recipes/{recipe_id}"))
        .bearer(&token)
        .json(&json!({"tags": []}))
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_recipe() {
    let (resources, _media) = create_test_resources().await.unwrap();
    let author = seed_user(&resources, "author@example.com", "author")
        .await
        .unwrap();
    let other = seed_user(&resources, "other@example.com", "other")
        .await
        .unwrap();
    let recipe_id = seed_recipe(&resources, author.id, "Borscht", &[], &[])
        .await
        .unwrap();
    let app = LadleServer::router(&resources);

    AxumTestRequest::delete(&format!("/api/recipes/{recipe_id}"))
        .bearer(&token_for(&resources, &other))
        .send(app.clone())
        .await
        .assert_status(StatusCode::FORBIDDEN);

    AxumTestRequest::delete(&format!("/api/recipes/{recipe_id}"))
        .bearer(&token_for(&resources, &author))
        .send(app.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    AxumTestRequest::get(&format!("/api/recipes/{recipe_id}"))
        .send(app.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    AxumTestRequest::delete(&format!("/api/recipes/{recipe_id}"))
        .bearer(&token_for(&resources, &author))
        .send(app)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_filters_and_links() {
    let (resources, _media) = create_test_resources().await.unwrap();
    let alice = seed_user(&resources, "alice@example.com", "alice")
        .await
        .unwrap();
    let bob = seed_user(&resources, "bob@example.com", "bob").await.unwrap();
    let viewer = seed_user(&resources, "viewer@example.com", "viewer")
        .await
        .unwrap();
    let breakfast = seed_tag(&resources, "Breakfast", "#E26C2D", "breakfast")
        .await
        .unwrap();
    let dinner = seed_tag(&resources, "Dinner", "#8775D2", "dinner")
        .await
        .unwrap();

    let porridge = seed_recipe(&resources, alice.id, "Porridge", &[breakfast.id], &[])
        .await
        .unwrap();
    seed_recipe(&resources, alice.id, "Goulash", &[dinner.id], &[])
        .await
        .unwrap();
    let shakshuka = seed_recipe(
        &resources,
        bob.id,
        "Shakshuka",
        &[breakfast.id, dinner.id],
        &[],
    )
    .await
    .unwrap();
    let token = token_for(&resources, &viewer);
    let app = LadleServer::router(&resources);

    // Unfiltered: everything, newest first
    let page: Value = AxumTestRequest::get("/api/recipes")
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["count"], 3);
    let names: Vec<&str> = page["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Shakshuka", "Goulash", "Porridge"]);

    // Single tag
    let page: Value = AxumTestRequest::get("/api/recipes?tags=breakfast")
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["count"], 2);

    // Repeated tag keys are OR, and a recipe matching both appears once
    let page: Value = AxumTestRequest::get("/api/recipes?tags=breakfast&tags=dinner")
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["count"], 3);
    assert_eq!(page["results"].as_array().unwrap().len(), 3);

    // Author filter
    let page: Value = AxumTestRequest::get(&format!("/api/recipes?author={}", alice.id))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["count"], 2);

    // Unparseable author matches nothing instead of erroring
    let page: Value = AxumTestRequest::get("/api/recipes?author=not-a-uuid")
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["count"], 0);
    assert_eq!(page["results"].as_array().unwrap().len(), 0);

    // Membership filter without credentials is an empty page, not an error
    let page: Value = AxumTestRequest::get("/api/recipes?is_favorited=1")
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["count"], 0);

    AxumTestRequest::post(&format!("/api/recipes/{porridge}/favorite"))
        .bearer(&token)
        .send(app.clone())
        .await
        .assert_status(StatusCode::CREATED);
    AxumTestRequest::post(&format!("/api/recipes/{shakshuka}/shopping_cart"))
        .bearer(&token)
        .send(app.clone())
        .await
        .assert_status(StatusCode::CREATED);

    let page: Value = AxumTestRequest::get("/api/recipes?is_favorited=1")
        .bearer(&token)
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["name"], "Porridge");

    let page: Value = AxumTestRequest::get("/api/recipes?is_in_shopping_cart=1")
        .bearer(&token)
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["name"], "Shakshuka");

    // Filters combine, and page links keep them without the page params
    let page: Value = AxumTestRequest::get("/api/recipes?tags=breakfast&limit=1")
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["count"], 2);
    assert_eq!(page["results"].as_array().unwrap().len(), 1);
    assert_eq!(page["next"], "/api/recipes?tags=breakfast&page=2&limit=1");
}
