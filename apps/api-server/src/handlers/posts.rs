//! Post resource handlers.

use actix_web::{HttpResponse, web};

use writeit_core::RepoError;
use writeit_core::domain::Post;
use writeit_core::ports::Repository;
use writeit_shared::Envelope;
use writeit_shared::dto::{CreatePostRequest, UpdatePostRequest};

use super::{decode, parse_id, respond};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /posts
///
/// The owner is always the authenticated caller; a `creator_id` in the
/// body is ignored.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let req: CreatePostRequest = decode(&body, "Post").map_err(AppError::BadRequest)?;

    let post = Post::new(identity.user_id, req.post_title, req.post_body);
    let created = state
        .posts
        .create(post)
        .await
        .map_err(|e| AppError::from_repo(e, AppError::BadRequest))?;

    tracing::info!(post_id = created.id, creator_id = created.creator_id, "Post created");
    Ok(respond(Envelope::ok("Post created successfully", created)))
}

/// GET /posts
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state
        .posts
        .find_all()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(respond(Envelope::ok("Posts successfully retrieved", posts)))
}

/// GET /posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id(&path).map_err(AppError::BadRequest)?;

    let post = state.posts.find_by_id(id).await.map_err(|e| {
        if e.is_input() {
            AppError::BadRequest(e.to_string())
        } else {
            AppError::from_repo(e, AppError::NotFound)
        }
    })?;

    Ok(respond(Envelope::ok("Post successfully retrieved", post)))
}

/// PUT /posts/{id}
///
/// Only the owner may update. `created_at` is carried over from the
/// stored post; absent body fields keep their stored value.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path).map_err(AppError::BadRequest)?;
    let req: UpdatePostRequest = decode(&body, "Post").map_err(AppError::BadRequest)?;

    // Fetch and update are separate transactions; a concurrent write in
    // between is not guarded against.
    let existing = state
        .posts
        .find_by_id(id)
        .await
        .map_err(|e| AppError::from_repo(e, AppError::BadRequest))?;

    if existing.creator_id != identity.user_id {
        tracing::warn!(
            post_id = id,
            owner_id = existing.creator_id,
            caller_id = identity.user_id,
            "Rejected update of a post owned by another user"
        );
        return Err(AppError::Forbidden(format!(
            "Post {id} is not owned by user {}",
            identity.user_id
        )));
    }

    let post = Post {
        creator_id: identity.user_id,
        title: req.post_title.unwrap_or(existing.title.clone()),
        body: req.post_body.unwrap_or(existing.body.clone()),
        ..existing
    };
    if post.is_blank() {
        return Err(AppError::BadRequest(RepoError::EmptyInput("Post").to_string()));
    }

    let updated = state
        .posts
        .update(post)
        .await
        .map_err(|e| AppError::from_repo(e, AppError::BadRequest))?;

    Ok(respond(Envelope::ok("Post Successfully Updated", updated)))
}

/// DELETE /posts/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id(&path).map_err(AppError::BadRequest)?;

    state
        .posts
        .delete(id)
        .await
        .map_err(|e| AppError::from_repo(e, AppError::BadRequest))?;

    tracing::info!(post_id = id, "Post deleted");
    Ok(respond(Envelope::<()>::ok_empty(200, "Post Successfully Deleted")))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};
    use writeit_core::ports::Repository;

    use crate::handlers::test_support::{self, bearer, test_app};

    #[actix_web::test]
    async fn test_create_assigns_owner_from_claims() {
        let state = test_support::state();
        let app = test_app!(state.clone());

        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header(bearer(&state, 7))
            .set_json(json!({"post_title": "A", "post_body": "B", "creator_id": 99}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["status_code"], 200);
        assert_eq!(body["data"]["creator_id"], 7);
        assert_eq!(body["data"]["post_title"], "A");
        assert_eq!(body["data"]["post_body"], "B");
        assert!(body["data"]["created_at"].as_i64().unwrap() > 0);

        let stored = state.posts.find_by_id(1).await.unwrap();
        assert_eq!(stored.creator_id, 7);
    }

    #[actix_web::test]
    async fn test_create_without_token_is_forbidden() {
        let state = test_support::state();
        let app = test_app!(state.clone());

        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({"post_title": "A", "post_body": "B"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["status_code"], 403);
        assert!(body["data"].is_null());
        assert!(state.posts.find_all().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_create_with_forged_token_is_forbidden() {
        let state = test_support::state();
        let app = test_app!(state.clone());

        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header(("Authorization", "Bearer not.a.token"))
            .set_json(json!({"post_title": "A", "post_body": "B"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_create_with_empty_or_malformed_body() {
        let state = test_support::state();
        let app = test_app!(state.clone());

        for payload in ["", "{not json"] {
            let req = test::TestRequest::post()
                .uri("/posts")
                .insert_header(bearer(&state, 7))
                .set_payload(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }

        assert!(state.posts.find_all().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_list_empty_is_success() {
        let app = test_app!(test_support::state());

        let req = test::TestRequest::get().uri("/posts").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"], json!([]));
    }

    #[actix_web::test]
    async fn test_create_then_fetch_round_trip() {
        let state = test_support::state();
        let app = test_app!(state.clone());

        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header(bearer(&state, 3))
            .set_json(json!({"post_title": "Title", "post_body": "Body"}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/posts/{id}"))
            .to_request();
        let fetched: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(fetched["data"], created["data"]);
        assert_eq!(fetched["message"], "Post successfully retrieved");
    }

    #[actix_web::test]
    async fn test_get_bad_id_and_missing_post() {
        let app = test_app!(test_support::state());

        for (uri, status) in [
            ("/posts/abc", StatusCode::BAD_REQUEST),
            ("/posts/0", StatusCode::BAD_REQUEST),
            ("/posts/77", StatusCode::NOT_FOUND),
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), status, "{uri}");
        }
    }

    #[actix_web::test]
    async fn test_update_by_owner_keeps_created_at() {
        let state = test_support::state();
        let app = test_app!(state.clone());

        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header(bearer(&state, 7))
            .set_json(json!({"post_title": "A", "post_body": "B"}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/posts/{id}"))
            .insert_header(bearer(&state, 7))
            .set_json(json!({"post_title": "A2", "created_at": 1}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["post_title"], "A2");
        assert_eq!(body["data"]["post_body"], "B");
        assert_eq!(body["data"]["created_at"], created["data"]["created_at"]);
        assert!(body["data"]["updated_at"].is_i64());

        let stored = state.posts.find_by_id(id).await.unwrap();
        assert_eq!(stored.title, "A2");
    }

    #[actix_web::test]
    async fn test_update_by_non_owner_is_forbidden_and_leaves_post_unchanged() {
        let state = test_support::state();
        let app = test_app!(state.clone());

        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header(bearer(&state, 7))
            .set_json(json!({"post_title": "A", "post_body": "B"}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/posts/{id}"))
            .insert_header(bearer(&state, 8))
            .set_json(json!({"post_title": "mine now"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let stored = state.posts.find_by_id(id).await.unwrap();
        assert_eq!(stored.title, "A");
        assert_eq!(stored.updated_at, None);
    }

    #[actix_web::test]
    async fn test_update_missing_post_is_bad_request() {
        let state = test_support::state();
        let app = test_app!(state.clone());

        let req = test::TestRequest::put()
            .uri("/posts/5")
            .insert_header(bearer(&state, 7))
            .set_json(json!({"post_title": "x"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_delete_existing_and_missing() {
        let state = test_support::state();
        let app = test_app!(state.clone());

        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header(bearer(&state, 7))
            .set_json(json!({"post_title": "A", "post_body": "B"}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::delete()
            .uri(&format!("/posts/{id}"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert!(body["data"].is_null());

        let req = test::TestRequest::delete()
            .uri(&format!("/posts/{id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_update_cannot_blank_a_post() {
        let state = test_support::state();
        let app = test_app!(state.clone());

        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header(bearer(&state, 7))
            .set_json(json!({"post_title": "A", "post_body": "B"}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/posts/{id}"))
            .insert_header(bearer(&state, 7))
            .set_json(json!({"post_title": " ", "post_body": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Post is required");
        assert_eq!(state.posts.find_by_id(id).await.unwrap().title, "A");
    }

    #[actix_web::test]
    async fn test_store_failure_answers_internal_error_envelope() {
        let app = test_app!(test_support::state_with_broken_posts());

        let req = test::TestRequest::get().uri("/posts/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status_code"], 500);
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
    }
}
