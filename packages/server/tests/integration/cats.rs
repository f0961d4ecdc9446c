use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde_json::json;
use uuid::Uuid;

use cattery_server::entity::image;

use crate::common::{TestApp, public_url, routes};

mod public_listing {
    use super::*;

    #[tokio::test]
    async fn breeding_page_lists_only_own_alive_breeding_cats_by_name() {
        let app = TestApp::spawn().await;
        app.create_cat("Nala", "female").await;
        app.create_cat("Bagheera", "male").await;
        app.create_cat_with(&json!({
            "name": "Visiting Stud",
            "gender": "male",
            "is_breeding": true,
            "is_own_breeding_cat": false,
        }))
        .await;
        app.create_cat_with(&json!({
            "name": "Retired",
            "gender": "female",
            "is_breeding": false,
            "is_own_breeding_cat": true,
        }))
        .await;
        app.create_cat_with(&json!({
            "name": "Sold Kitten",
            "gender": "female",
            "is_breeding": true,
            "is_own_breeding_cat": true,
            "status": "sold",
        }))
        .await;

        let res = app.get_without_token(routes::CATS).await;

        assert_eq!(res.status, 200);
        let names: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Bagheera", "Nala"]);
    }

    #[tokio::test]
    async fn gender_filter_narrows_the_breeding_page() {
        let app = TestApp::spawn().await;
        app.create_cat("Nala", "female").await;
        app.create_cat("Bagheera", "male").await;

        let res = app
            .get_without_token(&format!("{}?gender=female", routes::CATS))
            .await;

        assert_eq!(res.status, 200);
        let cats = res.body.as_array().unwrap();
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0]["name"], "Nala");
    }

    #[tokio::test]
    async fn unknown_gender_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&format!("{}?gender=tabby", routes::CATS))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_cat_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::cat(Uuid::now_v7())).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod images {
    use super::*;

    #[tokio::test]
    async fn first_assigned_image_becomes_primary() {
        let app = TestApp::spawn().await;
        let cat_id = app.create_cat("Luna", "female").await;
        let first = app.upload_image("cats/luna", "a.jpg").await;
        let second = app.upload_image("cats/luna", "b.jpg").await;

        app.assign_image(&first, cat_id, false).await;
        app.assign_image(&second, cat_id, false).await;

        let res = app.get_without_token(&routes::cat(cat_id)).await;
        assert_eq!(res.status, 200);
        let images = res.body["images"].as_array().unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0]["url"], first.as_str());
        assert_eq!(images[0]["is_primary"], true);
        assert_eq!(images[1]["is_primary"], false);
    }

    #[tokio::test]
    async fn set_primary_leaves_exactly_one_primary_image() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let cat_id = app.create_cat("Luna", "female").await;
        let mut ids = Vec::new();
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            let url = app.upload_image("cats/luna", name).await;
            ids.push(app.assign_image(&url, cat_id, false).await);
        }

        let res = app
            .put_with_token(&routes::image_primary(ids[2]), &json!({}), &token)
            .await;
        assert_eq!(res.status, 200, "set primary failed: {}", res.text);
        assert_eq!(res.body["is_primary"], true);

        let cat = app.get_without_token(&routes::cat(cat_id)).await;
        let images = cat.body["images"].as_array().unwrap();
        let primaries: Vec<&str> = images
            .iter()
            .filter(|i| i["is_primary"] == true)
            .map(|i| i["id"].as_str().unwrap())
            .collect();
        assert_eq!(primaries, vec![ids[2].to_string().as_str()]);
        // Display order is unchanged by the primary switch.
        assert_eq!(images[2]["id"], ids[2].to_string());
    }

    #[tokio::test]
    async fn make_primary_replaces_the_current_primary() {
        let app = TestApp::spawn().await;
        let cat_id = app.create_cat("Luna", "female").await;
        let first = app.upload_image("cats", "a.jpg").await;
        let second = app.upload_image("cats", "b.jpg").await;

        let first_id = app.assign_image(&first, cat_id, false).await;
        let second_id = app.assign_image(&second, cat_id, true).await;

        let first_row = image::Entity::find_by_id(first_id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        let second_row = image::Entity::find_by_id(second_id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert!(!first_row.is_primary);
        assert!(second_row.is_primary);
    }

    #[tokio::test]
    async fn unassigning_the_primary_promotes_the_next_image() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let cat_id = app.create_cat("Luna", "female").await;
        let first = app.upload_image("cats", "a.jpg").await;
        let second = app.upload_image("cats", "b.jpg").await;
        app.assign_image(&first, cat_id, false).await;
        let second_id = app.assign_image(&second, cat_id, false).await;

        let res = app
            .post_with_token(routes::GALLERY_UNASSIGN, &json!({"url": first}), &token)
            .await;
        assert_eq!(res.status, 200, "unassign failed: {}", res.text);
        assert_eq!(res.body["is_primary"], false);

        let cat = app.get_without_token(&routes::cat(cat_id)).await;
        let images = cat.body["images"].as_array().unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0]["id"], second_id.to_string());
        assert_eq!(images[0]["is_primary"], true);
    }

    #[tokio::test]
    async fn unordered_images_get_their_display_order_stored_on_read() {
        let app = TestApp::spawn().await;
        let cat_id = app.create_cat("Luna", "female").await;
        let now = Utc::now();
        let mut ids = Vec::new();
        for (i, name) in ["a.jpg", "b.jpg", "c.jpg"].into_iter().enumerate() {
            let id = Uuid::now_v7();
            image::ActiveModel {
                id: Set(id),
                url: Set(public_url(&format!("cats/{name}"))),
                title: Set(None),
                description: Set(None),
                is_primary: Set(i == 0),
                display_order: Set(None),
                cat_id: Set(Some(cat_id)),
                achievement_id: Set(None),
                created_at: Set(now - Duration::minutes(i as i64)),
            }
            .insert(&app.db)
            .await
            .unwrap();
            ids.push(id);
        }

        let res = app.get_without_token(&routes::cat(cat_id)).await;
        assert_eq!(res.status, 200);
        let returned: Vec<&str> = res.body["images"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_str().unwrap())
            .collect();
        // Primary first, then newest first.
        let expected: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        assert_eq!(returned, expected.iter().map(String::as_str).collect::<Vec<_>>());

        let rows = image::Entity::find()
            .filter(image::Column::CatId.eq(cat_id))
            .all(&app.db)
            .await
            .unwrap();
        for (position, id) in ids.iter().enumerate() {
            let row = rows.iter().find(|r| r.id == *id).unwrap();
            assert_eq!(row.display_order, Some(position as i32));
        }
    }

    #[tokio::test]
    async fn assigning_to_an_unknown_cat_is_not_found() {
        let app = TestApp::spawn().await;
        let url = app.upload_image("cats", "a.jpg").await;

        let res = app
            .post_with_token(
                routes::GALLERY_ASSIGN,
                &json!({"url": url, "cat_id": Uuid::now_v7()}),
                &app.admin_token(),
            )
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn deleting_a_cat_keeps_its_images_in_the_gallery() {
        let app = TestApp::spawn().await;
        let cat_id = app.create_cat("Luna", "female").await;
        let url = app.upload_image("cats", "a.jpg").await;
        let image_id = app.assign_image(&url, cat_id, false).await;

        let res = app
            .delete_with_token(&routes::admin_cat(cat_id), &app.admin_token())
            .await;
        assert_eq!(res.status, 204);

        let row = image::Entity::find_by_id(image_id)
            .one(&app.db)
            .await
            .unwrap()
            .expect("image row should survive the cat");
        assert_eq!(row.cat_id, None);
        assert!(!row.is_primary);

        let res = app.get_without_token(&routes::cat(cat_id)).await;
        assert_eq!(res.status, 404);
    }
}

mod admin {
    use super::*;

    #[tokio::test]
    async fn traits_and_medical_tests_show_up_in_details() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let cat_id = app.create_cat("Luna", "female").await;

        let color = app
            .post_with_token(
                routes::ADMIN_COLORS,
                &json!({"name": "blue silver shaded", "code": "a 11"}),
                &token,
            )
            .await;
        assert_eq!(color.status, 201, "create color failed: {}", color.text);
        let color_id = color.id();

        let res = app
            .put_with_token(
                &routes::cat_traits(cat_id),
                &json!({
                    "phenotype_color_id": color_id,
                    "genetic_code": "a 11 / ny 11",
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "set traits failed: {}", res.text);

        let res = app
            .post_with_token(
                &routes::cat_medical_tests(cat_id),
                &json!({"test_name": "HCM", "result": "negative"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "add medical test failed: {}", res.text);

        let cat = app.get_without_token(&routes::cat(cat_id)).await;
        assert_eq!(cat.body["color"]["name"], "blue silver shaded");
        assert_eq!(cat.body["genetic_code"], "a 11 / ny 11");
        assert_eq!(cat.body["medical_tests"][0]["test_name"], "HCM");
    }

    #[tokio::test]
    async fn duplicate_color_name_is_a_conflict() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let body = json!({"name": "black"});

        let first = app.post_with_token(routes::ADMIN_COLORS, &body, &token).await;
        assert_eq!(first.status, 201);

        let res = app.post_with_token(routes::ADMIN_COLORS, &body, &token).await;
        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn patch_updates_only_given_fields() {
        let app = TestApp::spawn().await;
        let cat_id = app
            .create_cat_with(&json!({
                "name": "Luna",
                "gender": "female",
                "description": "Calm",
            }))
            .await;

        let res = app
            .patch_with_token(
                &routes::admin_cat(cat_id),
                &json!({"name": "Luna II", "details": "Champion line"}),
                &app.admin_token(),
            )
            .await;

        assert_eq!(res.status, 200, "update failed: {}", res.text);
        assert_eq!(res.body["name"], "Luna II");
        assert_eq!(res.body["description"], "Calm");
        assert_eq!(res.body["details"], "Champion line");
    }

    #[tokio::test]
    async fn lookups_include_seeded_blood_types() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::LOOKUPS).await;

        assert_eq!(res.status, 200);
        let names: Vec<&str> = res.body["blood_types"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["A", "AB", "B"]);
    }
}
