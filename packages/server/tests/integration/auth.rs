use serde_json::json;

use crate::common::{PASSWORD, TestApp, routes};

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_can_register_with_valid_credentials() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"email": "alice@example.com", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].is_string());
        assert_eq!(res.body["email"], "alice@example.com");
        assert!(res.body.get("password").is_none());
    }

    #[tokio::test]
    async fn email_is_trimmed_and_lowercased_before_storage() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"email": "  Test@Example.COM  ", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["email"], "test@example.com");

        let login = app.login("test@example.com", PASSWORD).await;
        assert_eq!(login.status, 200, "{}", login.text);
    }

    #[tokio::test]
    async fn cannot_register_the_same_email_twice_in_any_case() {
        let app = TestApp::spawn().await;

        let first = app
            .post_without_token(
                routes::REGISTER,
                &json!({"email": "alice@example.com", "password": PASSWORD}),
            )
            .await;
        assert_eq!(first.status, 201, "First registration failed: {}", first.text);

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"email": " ALICE@example.com", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "EMAIL_TAKEN");
    }

    #[tokio::test]
    async fn cannot_register_without_an_email() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REGISTER, &json!({"password": PASSWORD}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_register_without_a_password() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REGISTER, &json!({"email": "alice@example.com"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_register_with_a_malformed_email() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"email": "not-an-email", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn registered_user_receives_access_and_refresh_tokens() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice@example.com").await;

        let res = app.login("alice@example.com", PASSWORD).await;

        assert_eq!(res.status, 200);
        assert!(res.body["access"].is_string());
        assert!(res.body["refresh"].is_string());
    }

    #[tokio::test]
    async fn login_matches_email_case_insensitively() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice@example.com").await;

        let res = app.login("  Alice@EXAMPLE.com ", PASSWORD).await;

        assert_eq!(res.status, 200, "{}", res.text);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice@example.com").await;

        let res = app.login("alice@example.com", "wrongpass").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_email_is_rejected_the_same_way() {
        let app = TestApp::spawn().await;

        let res = app.login("ghost@example.com", PASSWORD).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn inactive_account_cannot_log_in() {
        use catalog_server::entity::user;
        use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice@example.com").await;

        let db_user = user::Entity::find()
            .filter(user::Column::Email.eq("alice@example.com"))
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        let mut active: user::ActiveModel = db_user.into();
        active.is_active = Set(false);
        active.update(&app.db).await.unwrap();

        let res = app.login("alice@example.com", PASSWORD).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod refresh {
    use super::*;

    #[tokio::test]
    async fn refresh_token_yields_a_working_access_token() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice@example.com").await;
        let login = app.login("alice@example.com", PASSWORD).await;

        let res = app
            .post_without_token(routes::REFRESH, &json!({"refresh": login.body["refresh"]}))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let access = res.body["access"].as_str().unwrap();

        let photographer = app
            .create_photographer("Jane", "https://example.com/@jane")
            .await;
        let create = app
            .post_with_token(
                routes::PHOTOS,
                &crate::common::photo_body_for(photographer, "Refreshed"),
                access,
            )
            .await;
        assert_eq!(create.status, 201, "{}", create.text);
    }

    #[tokio::test]
    async fn access_token_is_not_accepted_as_refresh_token() {
        let app = TestApp::spawn().await;
        let (_, access) = app.create_authenticated_user("alice@example.com").await;

        let res = app
            .post_without_token(routes::REFRESH, &json!({"refresh": access}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn refresh_token_is_not_accepted_as_bearer_token() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice@example.com").await;
        let login = app.login("alice@example.com", PASSWORD).await;

        let res = app
            .post_with_token(
                routes::PHOTOS,
                &crate::common::photo_body("Nope"),
                login.body["refresh"].as_str().unwrap(),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn garbage_refresh_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REFRESH, &json!({"refresh": "not.a.jwt"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}

mod bearer_token {
    use super::*;

    #[tokio::test]
    async fn missing_header_is_token_missing() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::PHOTOS, &crate::common::photo_body("x"))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn malformed_token_is_token_invalid() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(routes::PHOTOS, &crate::common::photo_body("x"), "garbage")
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}
