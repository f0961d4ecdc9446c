use serde_json::json;
use uuid::Uuid;

use crate::common::{TestApp, routes};

async fn create_achievement(app: &TestApp, title: &str, achieved_on: Option<&str>) -> Uuid {
    let res = app
        .post_with_token(
            routes::ADMIN_ACHIEVEMENTS,
            &json!({"title": title, "achieved_on": achieved_on}),
            &app.admin_token(),
        )
        .await;
    assert_eq!(res.status, 201, "create achievement failed: {}", res.text);
    res.id()
}

async fn attach(app: &TestApp, achievement_id: Uuid, url: &str) -> Uuid {
    let res = app
        .post_with_token(
            &routes::achievement_images(achievement_id),
            &json!({"url": url}),
            &app.admin_token(),
        )
        .await;
    assert_eq!(res.status, 201, "attach failed: {}", res.text);
    res.id()
}

#[tokio::test]
async fn achievements_are_listed_newest_first_with_undated_last() {
    let app = TestApp::spawn().await;
    create_achievement(&app, "Undated", None).await;
    create_achievement(&app, "Best in Show 2022", Some("2022-05-01")).await;
    create_achievement(&app, "Best in Show 2024", Some("2024-05-01")).await;

    let res = app.get_without_token(routes::ACHIEVEMENTS).await;

    assert_eq!(res.status, 200);
    let titles: Vec<&str> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Best in Show 2024", "Best in Show 2022", "Undated"]);
}

#[tokio::test]
async fn attached_images_keep_insertion_order() {
    let app = TestApp::spawn().await;
    let id = create_achievement(&app, "Prague 2024", Some("2024-03-10")).await;
    let first = app.upload_image("shows", "ring.jpg").await;
    let second = app.upload_image("shows", "rosette.jpg").await;
    attach(&app, id, &first).await;
    attach(&app, id, &second).await;

    let res = app.get_without_token(routes::ACHIEVEMENTS).await;

    let images = res.body[0]["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0]["url"], first.as_str());
    assert_eq!(images[1]["url"], second.as_str());
}

#[tokio::test]
async fn swapping_images_exchanges_their_positions() {
    let app = TestApp::spawn().await;
    let id = create_achievement(&app, "Prague 2024", None).await;
    let first = app.upload_image("shows", "a.jpg").await;
    let second = app.upload_image("shows", "b.jpg").await;
    let first_id = attach(&app, id, &first).await;
    let second_id = attach(&app, id, &second).await;

    let res = app
        .put_with_token(
            &routes::achievement_images_swap(id),
            &json!({"first_image_id": first_id, "second_image_id": second_id}),
            &app.admin_token(),
        )
        .await;

    assert_eq!(res.status, 200, "swap failed: {}", res.text);
    let images = res.body["images"].as_array().unwrap();
    assert_eq!(images[0]["id"], second_id.to_string());
    assert_eq!(images[1]["id"], first_id.to_string());
}

#[tokio::test]
async fn swapping_with_an_image_of_another_owner_is_rejected() {
    let app = TestApp::spawn().await;
    let id = create_achievement(&app, "Prague 2024", None).await;
    let cat_id = app.create_cat("Luna", "female").await;
    let own = app.upload_image("shows", "a.jpg").await;
    let foreign = app.upload_image("cats", "luna.jpg").await;
    let own_id = attach(&app, id, &own).await;
    let foreign_id = app.assign_image(&foreign, cat_id, false).await;

    let res = app
        .put_with_token(
            &routes::achievement_images_swap(id),
            &json!({"first_image_id": own_id, "second_image_id": foreign_id}),
            &app.admin_token(),
        )
        .await;

    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn moving_a_cat_primary_to_an_achievement_promotes_the_next_cat_image() {
    let app = TestApp::spawn().await;
    let id = create_achievement(&app, "Prague 2024", None).await;
    let cat_id = app.create_cat("Luna", "female").await;
    let first = app.upload_image("cats", "a.jpg").await;
    let second = app.upload_image("cats", "b.jpg").await;
    app.assign_image(&first, cat_id, false).await;
    let second_id = app.assign_image(&second, cat_id, false).await;

    attach(&app, id, &first).await;

    let cat = app.get_without_token(&routes::cat(cat_id)).await;
    let images = cat.body["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["id"], second_id.to_string());
    assert_eq!(images[0]["is_primary"], true);
}

#[tokio::test]
async fn moving_an_achievement_primary_to_a_cat_promotes_the_next_achievement_image() {
    let app = TestApp::spawn().await;
    let id = create_achievement(&app, "Prague 2024", None).await;
    let cat_id = app.create_cat("Luna", "female").await;
    let first = app.upload_image("shows", "a.jpg").await;
    let second = app.upload_image("shows", "b.jpg").await;
    attach(&app, id, &first).await;
    let second_id = attach(&app, id, &second).await;

    app.assign_image(&first, cat_id, false).await;

    let res = app.get_without_token(routes::ACHIEVEMENTS).await;
    let images = res.body[0]["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["id"], second_id.to_string());
    assert_eq!(images[0]["is_primary"], true);
}

#[tokio::test]
async fn unassigning_an_achievement_image_detaches_it_and_promotes_the_next() {
    let app = TestApp::spawn().await;
    let id = create_achievement(&app, "Prague 2024", None).await;
    let first = app.upload_image("shows", "a.jpg").await;
    let second = app.upload_image("shows", "b.jpg").await;
    attach(&app, id, &first).await;
    let second_id = attach(&app, id, &second).await;

    let res = app
        .post_with_token(routes::GALLERY_UNASSIGN, &json!({"url": first}), &app.admin_token())
        .await;
    assert_eq!(res.status, 200, "unassign failed: {}", res.text);
    assert_eq!(res.body["is_primary"], false);

    let res = app.get_without_token(routes::ACHIEVEMENTS).await;
    let images = res.body[0]["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["id"], second_id.to_string());
    assert_eq!(images[0]["is_primary"], true);
}

#[tokio::test]
async fn deleting_an_achievement_primary_image_promotes_the_next() {
    let app = TestApp::spawn().await;
    let id = create_achievement(&app, "Prague 2024", None).await;
    let first = app.upload_image("shows", "a.jpg").await;
    let second = app.upload_image("shows", "b.jpg").await;
    attach(&app, id, &first).await;
    let second_id = attach(&app, id, &second).await;

    let res = app
        .delete_with_token(
            &format!("{}?path=shows/a.jpg", routes::GALLERY_IMAGES),
            &app.admin_token(),
        )
        .await;
    assert_eq!(res.status, 204, "delete failed: {}", res.text);

    let res = app.get_without_token(routes::ACHIEVEMENTS).await;
    let images = res.body[0]["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["id"], second_id.to_string());
    assert_eq!(images[0]["is_primary"], true);
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_with_token(
            routes::ADMIN_ACHIEVEMENTS,
            &json!({"title": "   "}),
            &app.admin_token(),
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}
