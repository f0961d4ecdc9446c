use serde_json::json;
use uuid::Uuid;

use cattery_server::entity::LitterStatus;

use crate::common::{TestApp, date, routes};

fn ids(body: &serde_json::Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_str().unwrap().to_string())
        .collect()
}

mod past_litters {
    use super::*;

    #[tokio::test]
    async fn newest_ten_are_returned_and_orphans_are_hidden() {
        let app = TestApp::spawn().await;
        let mother = app.create_cat("Nala", "female").await;
        let father = app.create_cat("Simba", "male").await;

        let mut expected = Vec::new();
        for day in 1..=12 {
            let id = app
                .insert_litter(mother, father, LitterStatus::Past, Some(date(2023, 1, day)), None)
                .await;
            expected.push(id);
        }
        // Newest of all, but its father was deleted.
        let orphan = app
            .insert_litter(mother, Uuid::now_v7(), LitterStatus::Past, Some(date(2024, 6, 1)), None)
            .await;

        let res = app.get_without_token(routes::PAST_LITTERS).await;

        assert_eq!(res.status, 200);
        let litters = res.body["litters"].as_array().unwrap();
        let returned: Vec<&str> = litters.iter().map(|l| l["id"].as_str().unwrap()).collect();
        assert!(!returned.contains(&orphan.to_string().as_str()));
        // The orphan still occupies a slot of the first page.
        assert_eq!(returned.len(), 9);
        let newest_first: Vec<String> = expected.iter().rev().map(Uuid::to_string).collect();
        assert_eq!(returned, newest_first[..9].iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(litters[0]["mother"]["name"], "Nala");
        assert_eq!(litters[0]["father"]["name"], "Simba");

        let pagination = &res.body["pagination"];
        assert_eq!(pagination["page"], 1);
        assert_eq!(pagination["limit"], 10);
        assert_eq!(pagination["total"], 13);
        assert_eq!(pagination["totalPages"], 2);
        assert_eq!(pagination["hasMore"], true);
    }

    #[tokio::test]
    async fn second_page_of_fifteen_has_five_and_no_more() {
        let app = TestApp::spawn().await;
        let mother = app.create_cat("Nala", "female").await;
        let father = app.create_cat("Simba", "male").await;
        for day in 1..=15 {
            app.insert_litter(mother, father, LitterStatus::Past, Some(date(2022, 3, day)), None)
                .await;
        }

        let res = app
            .get_without_token(&format!("{}?page=2&limit=10", routes::PAST_LITTERS))
            .await;

        assert_eq!(res.status, 200);
        let litters = res.body["litters"].as_array().unwrap();
        assert_eq!(litters.len(), 5);
        assert_eq!(litters[0]["birth_date"], "2022-03-05");
        assert_eq!(litters[4]["birth_date"], "2022-03-01");
        assert_eq!(res.body["pagination"]["hasMore"], false);
        assert_eq!(res.body["pagination"]["totalPages"], 2);
    }

    #[tokio::test]
    async fn page_beyond_addressable_range_is_empty() {
        let app = TestApp::spawn().await;
        let mother = app.create_cat("Nala", "female").await;
        let father = app.create_cat("Simba", "male").await;
        app.insert_litter(mother, father, LitterStatus::Past, Some(date(2023, 1, 1)), None)
            .await;

        let res = app
            .get_without_token(&format!("{}?page={}&limit=10", routes::PAST_LITTERS, u64::MAX))
            .await;

        assert_eq!(res.status, 200, "past litters failed: {}", res.text);
        assert_eq!(res.body["litters"], json!([]));
        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["pagination"]["page"], u64::MAX);
        assert_eq!(res.body["pagination"]["hasMore"], false);
    }

    #[tokio::test]
    async fn empty_history_has_zero_pages() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::PAST_LITTERS).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["litters"], json!([]));
        assert_eq!(res.body["pagination"]["total"], 0);
        assert_eq!(res.body["pagination"]["hasMore"], false);
    }
}

mod by_status {
    use super::*;

    #[tokio::test]
    async fn status_filter_returns_only_matching_litters() {
        let app = TestApp::spawn().await;
        let mother = app.create_cat("Nala", "female").await;
        let father = app.create_cat("Simba", "male").await;
        let current = app
            .insert_litter(mother, father, LitterStatus::Current, Some(date(2024, 5, 1)), None)
            .await;
        app.insert_litter(mother, father, LitterStatus::Past, Some(date(2020, 5, 1)), None)
            .await;

        let res = app
            .get_without_token(&format!("{}?status=current", routes::LITTERS))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(ids(&res.body), vec![current.to_string()]);
    }

    #[tokio::test]
    async fn planned_litters_are_ordered_by_expected_date_with_undated_last() {
        let app = TestApp::spawn().await;
        let mother = app.create_cat("Nala", "female").await;
        let father = app.create_cat("Simba", "male").await;
        let undated = app
            .insert_litter(mother, father, LitterStatus::Planned, None, None)
            .await;
        let autumn = app
            .insert_litter(mother, father, LitterStatus::Planned, None, Some(date(2025, 10, 1)))
            .await;
        let spring = app
            .insert_litter(mother, father, LitterStatus::Planned, None, Some(date(2025, 3, 1)))
            .await;

        let res = app
            .get_without_token(&format!("{}?status=planned", routes::LITTERS))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(
            ids(&res.body),
            vec![spring.to_string(), autumn.to_string(), undated.to_string()]
        );
    }

    #[tokio::test]
    async fn past_with_limit_returns_newest_complete_litters() {
        let app = TestApp::spawn().await;
        let mother = app.create_cat("Nala", "female").await;
        let father = app.create_cat("Simba", "male").await;

        let mut expected = Vec::new();
        for day in 1..=12 {
            let id = app
                .insert_litter(mother, father, LitterStatus::Past, Some(date(2021, 7, day)), None)
                .await;
            expected.push(id.to_string());
        }
        // Oldest of all, so it never takes a slot of the newest ten.
        let orphan = app
            .insert_litter(mother, Uuid::now_v7(), LitterStatus::Past, Some(date(2019, 1, 1)), None)
            .await;

        let res = app
            .get_without_token(&format!("{}?status=past&limit=10", routes::LITTERS))
            .await;

        assert_eq!(res.status, 200);
        let returned = ids(&res.body);
        assert_eq!(returned.len(), 10);
        assert!(!returned.contains(&orphan.to_string()));
        let newest_first: Vec<String> = expected.into_iter().rev().take(10).collect();
        assert_eq!(returned, newest_first);
    }

    #[tokio::test]
    async fn past_with_limit_excludes_orphans_among_the_newest() {
        let app = TestApp::spawn().await;
        let mother = app.create_cat("Nala", "female").await;
        let father = app.create_cat("Simba", "male").await;
        let complete = app
            .insert_litter(mother, father, LitterStatus::Past, Some(date(2021, 7, 1)), None)
            .await;
        app.insert_litter(mother, Uuid::now_v7(), LitterStatus::Past, Some(date(2022, 1, 1)), None)
            .await;

        let res = app
            .get_without_token(&format!("{}?status=past&limit=10", routes::LITTERS))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(ids(&res.body), vec![complete.to_string()]);
    }

    #[tokio::test]
    async fn missing_status_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::LITTERS).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn admin_list_includes_orphaned_litters() {
        let app = TestApp::spawn().await;
        let mother = app.create_cat("Nala", "female").await;
        let orphan = app
            .insert_litter(mother, Uuid::now_v7(), LitterStatus::Planned, None, None)
            .await;

        let public = app
            .get_without_token(&format!("{}?status=planned", routes::LITTERS))
            .await;
        assert_eq!(public.body, json!([]));

        let res = app
            .get_with_token(routes::ADMIN_LITTERS, &app.admin_token())
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(ids(&res.body), vec![orphan.to_string()]);
        assert!(res.body[0]["father"].is_null());
    }
}

mod admin {
    use super::*;

    async fn create_litter(app: &TestApp, mother: Uuid, father: Uuid, status: &str) -> Uuid {
        let res = app
            .post_with_token(
                routes::ADMIN_LITTERS,
                &json!({
                    "mother_id": mother,
                    "father_id": father,
                    "birth_date": "2024-04-01",
                    "status": status,
                }),
                &app.admin_token(),
            )
            .await;
        assert_eq!(res.status, 201, "create litter failed: {}", res.text);
        res.id()
    }

    #[tokio::test]
    async fn create_litter_checks_parent_genders() {
        let app = TestApp::spawn().await;
        let queen = app.create_cat("Nala", "female").await;
        let other_queen = app.create_cat("Sarabi", "female").await;

        let res = app
            .post_with_token(
                routes::ADMIN_LITTERS,
                &json!({
                    "mother_id": queen,
                    "father_id": other_queen,
                    "status": "planned",
                }),
                &app.admin_token(),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn kittens_move_between_litters() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let mother = app.create_cat("Nala", "female").await;
        let father = app.create_cat("Simba", "male").await;
        let kitten = app.create_cat("Kiara", "female").await;

        let first = create_litter(&app, mother, father, "current").await;
        let second = create_litter(&app, mother, father, "past").await;

        let res = app
            .put_with_token(&routes::litter_kittens(first), &json!({"cat_ids": [kitten]}), &token)
            .await;
        assert_eq!(res.status, 200, "set kittens failed: {}", res.text);
        assert_eq!(res.body["kittens"][0]["name"], "Kiara");

        let res = app
            .put_with_token(&routes::litter_kittens(second), &json!({"cat_ids": [kitten]}), &token)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["kittens"].as_array().unwrap().len(), 1);

        let all = app.get_with_token(routes::ADMIN_LITTERS, &token).await;
        let first_litter = all
            .body
            .as_array()
            .unwrap()
            .iter()
            .find(|l| l["id"] == first.to_string())
            .unwrap();
        assert_eq!(first_litter["kittens"], json!([]));
    }

    #[tokio::test]
    async fn a_parent_cannot_be_its_own_kitten() {
        let app = TestApp::spawn().await;
        let mother = app.create_cat("Nala", "female").await;
        let father = app.create_cat("Simba", "male").await;
        let litter = app
            .insert_litter(mother, father, LitterStatus::Current, Some(date(2024, 1, 1)), None)
            .await;

        let res = app
            .put_with_token(
                &routes::litter_kittens(litter),
                &json!({"cat_ids": [mother]}),
                &app.admin_token(),
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn deleting_a_litter_removes_it_from_listings() {
        let app = TestApp::spawn().await;
        let mother = app.create_cat("Nala", "female").await;
        let father = app.create_cat("Simba", "male").await;
        let litter = app
            .insert_litter(mother, father, LitterStatus::Current, Some(date(2024, 1, 1)), None)
            .await;

        let res = app
            .delete_with_token(&routes::admin_litter(litter), &app.admin_token())
            .await;
        assert_eq!(res.status, 204);

        let res = app
            .get_without_token(&format!("{}?status=current", routes::LITTERS))
            .await;
        assert_eq!(res.body, json!([]));
    }
}
