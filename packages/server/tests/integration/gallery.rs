use sea_orm::EntityTrait;
use serde_json::json;

use cattery_server::entity::image;

use crate::common::{TestApp, public_url, routes};

fn gallery(path: &str) -> String {
    format!("{}?path={path}", routes::GALLERY)
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn images_and_folders_are_classified() {
        let app = TestApp::spawn().await;
        app.upload_image("cats", "luna.jpg").await;
        app.upload_image("cats/kittens", "kiara.png").await;

        let res = app.get_with_token(&gallery("cats"), &app.admin_token()).await;

        assert_eq!(res.status, 200, "list failed: {}", res.text);
        let items = res.body["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);

        assert_eq!(items[0]["name"], "kittens");
        assert_eq!(items[0]["type"], "folder");
        assert!(items[0]["url"].is_null());

        assert_eq!(items[1]["name"], "luna.jpg");
        assert_eq!(items[1]["type"], "image");
        assert_eq!(items[1]["path"], "cats/luna.jpg");
        assert_eq!(items[1]["url"], public_url("cats/luna.jpg"));
        assert!(items[1]["id"].is_null());
    }

    #[tokio::test]
    async fn new_folder_is_listed_but_its_placeholder_is_not() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();

        let res = app
            .post_with_token(routes::GALLERY_FOLDERS, &json!({"path": "cats/new"}), &token)
            .await;
        assert_eq!(res.status, 201, "create folder failed: {}", res.text);

        let parent = app.get_with_token(&gallery("cats"), &token).await;
        let items = parent.body["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "new");
        assert_eq!(items[0]["type"], "folder");

        let inside = app.get_with_token(&gallery("cats/new"), &token).await;
        assert_eq!(inside.status, 200);
        assert_eq!(inside.body["items"], json!([]));
        assert_eq!(inside.body["total_pages"], 1);
    }

    #[tokio::test]
    async fn creating_an_existing_folder_conflicts() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let body = json!({"path": "litters"});

        let first = app.post_with_token(routes::GALLERY_FOLDERS, &body, &token).await;
        assert_eq!(first.status, 201);

        let res = app.post_with_token(routes::GALLERY_FOLDERS, &body, &token).await;
        assert_eq!(res.status, 409);
    }

    #[tokio::test]
    async fn pages_split_the_folder() {
        let app = TestApp::spawn().await;
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            app.upload_image("shows", name).await;
        }

        let res = app
            .get_with_token(
                &format!("{}?path=shows&page=2&page_size=2", routes::GALLERY),
                &app.admin_token(),
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["page"], 2);
        assert_eq!(res.body["total_pages"], 2);
        let items = res.body["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "c.jpg");
    }

    #[tokio::test]
    async fn page_beyond_addressable_range_is_empty() {
        let app = TestApp::spawn().await;
        app.upload_image("shows", "a.jpg").await;

        let res = app
            .get_with_token(
                &format!("{}?path=shows&page={}&page_size=100", routes::GALLERY, u64::MAX),
                &app.admin_token(),
            )
            .await;

        assert_eq!(res.status, 200, "list failed: {}", res.text);
        assert_eq!(res.body["items"], json!([]));
        assert_eq!(res.body["page"], u64::MAX);
        assert_eq!(res.body["total_pages"], 1);
    }

    #[tokio::test]
    async fn metadata_is_merged_into_the_listing() {
        let app = TestApp::spawn().await;
        let cat_id = app.create_cat("Luna", "female").await;
        let url = app.upload_image("cats", "luna.jpg").await;
        let image_id = app.assign_image(&url, cat_id, false).await;

        let res = app
            .put_with_token(
                routes::IMAGE_METADATA,
                &json!({"url": url, "title": "Luna at six months"}),
                &app.admin_token(),
            )
            .await;
        assert_eq!(res.status, 200, "metadata failed: {}", res.text);

        let res = app.get_with_token(&gallery("cats"), &app.admin_token()).await;
        let item = &res.body["items"][0];
        assert_eq!(item["id"], image_id.to_string());
        assert_eq!(item["title"], "Luna at six months");
        assert_eq!(item["cat_id"], cat_id.to_string());
        assert_eq!(item["is_primary"], true);
    }

    #[tokio::test]
    async fn traversal_in_path_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_token(&gallery("cats/../.."), &app.admin_token())
            .await;

        assert_eq!(res.status, 400);
    }
}

mod uploads {
    use super::*;

    #[tokio::test]
    async fn non_image_files_are_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .upload_with_token("cats", "notes.txt", b"hello".to_vec(), &app.admin_token())
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn deleting_the_primary_image_promotes_the_next() {
        let app = TestApp::spawn().await;
        let cat_id = app.create_cat("Luna", "female").await;
        let first = app.upload_image("cats", "a.jpg").await;
        let second = app.upload_image("cats", "b.jpg").await;
        let first_id = app.assign_image(&first, cat_id, false).await;
        let second_id = app.assign_image(&second, cat_id, false).await;

        let res = app
            .delete_with_token(
                &format!("{}?path=cats/a.jpg", routes::GALLERY_IMAGES),
                &app.admin_token(),
            )
            .await;
        assert_eq!(res.status, 204, "delete failed: {}", res.text);

        assert!(
            image::Entity::find_by_id(first_id)
                .one(&app.db)
                .await
                .unwrap()
                .is_none()
        );
        let promoted = image::Entity::find_by_id(second_id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert!(promoted.is_primary);
        assert!(!app.storage_dir.path().join("cats/a.jpg").exists());
    }
}

mod folders {
    use super::*;

    #[tokio::test]
    async fn rename_moves_objects_and_rewrites_urls() {
        let app = TestApp::spawn().await;
        let cat_id = app.create_cat("Luna", "female").await;
        let url = app.upload_image("cats/luna", "a.jpg").await;
        let image_id = app.assign_image(&url, cat_id, false).await;

        let res = app
            .patch_with_token(
                routes::GALLERY_FOLDERS,
                &json!({"from": "cats/luna", "to": "archive/luna"}),
                &app.admin_token(),
            )
            .await;
        assert_eq!(res.status, 200, "rename failed: {}", res.text);
        assert_eq!(res.body["objects"], 1);
        assert_eq!(res.body["images"], 1);

        let row = image::Entity::find_by_id(image_id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.url, public_url("archive/luna/a.jpg"));
        assert!(app.storage_dir.path().join("archive/luna/a.jpg").exists());
        assert!(!app.storage_dir.path().join("cats/luna/a.jpg").exists());
    }

    #[tokio::test]
    async fn folder_cannot_move_into_itself() {
        let app = TestApp::spawn().await;
        app.upload_image("cats", "a.jpg").await;

        let res = app
            .patch_with_token(
                routes::GALLERY_FOLDERS,
                &json!({"from": "cats", "to": "cats/inner"}),
                &app.admin_token(),
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn delete_removes_objects_and_image_rows() {
        let app = TestApp::spawn().await;
        let cat_id = app.create_cat("Luna", "female").await;
        let url = app.upload_image("old", "a.jpg").await;
        let image_id = app.assign_image(&url, cat_id, false).await;
        app.upload_image("old/nested", "b.jpg").await;

        let res = app
            .delete_with_token(
                &format!("{}?path=old", routes::GALLERY_FOLDERS),
                &app.admin_token(),
            )
            .await;
        assert_eq!(res.status, 200, "delete folder failed: {}", res.text);
        assert_eq!(res.body["objects"], 2);
        assert_eq!(res.body["images"], 1);

        assert!(
            image::Entity::find_by_id(image_id)
                .one(&app.db)
                .await
                .unwrap()
                .is_none()
        );
        let cat = app.get_without_token(&routes::cat(cat_id)).await;
        assert_eq!(cat.body["images"], json!([]));
    }

    #[tokio::test]
    async fn deleting_a_folder_promotes_the_cats_remaining_image() {
        let app = TestApp::spawn().await;
        let cat_id = app.create_cat("Luna", "female").await;
        let doomed = app.upload_image("drafts", "a.jpg").await;
        let kept = app.upload_image("cats", "b.jpg").await;
        app.assign_image(&doomed, cat_id, false).await;
        let kept_id = app.assign_image(&kept, cat_id, false).await;

        let res = app
            .delete_with_token(
                &format!("{}?path=drafts", routes::GALLERY_FOLDERS),
                &app.admin_token(),
            )
            .await;
        assert_eq!(res.status, 200, "delete folder failed: {}", res.text);

        let cat = app.get_without_token(&routes::cat(cat_id)).await;
        let images = cat.body["images"].as_array().unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0]["id"], kept_id.to_string());
        assert_eq!(images[0]["is_primary"], true);
    }
}
