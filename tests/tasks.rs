#[macro_use]
mod common;

use std::net::TcpListener;

use actix_web::http::StatusCode;
use actix_web::{rt, test, web, App, HttpServer};
use common::{ids, send, setup_database};
use pretty_assertions::assert_eq;
use serde_json::json;
use taskmanager::db::TaskStore;

#[actix_rt::test]
async fn should_create_task_for_user() {
    let fx = setup_database().await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::post()
        .uri("/tasks")
        .insert_header(fx.user_one.bearer())
        .set_json(json!({ "description": "From my test" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["description"], "From my test");
    assert_eq!(body["owner"], fx.user_one.user.id.to_string());

    let id = body["id"].as_str().unwrap().parse().unwrap();
    let task = fx
        .store
        .find_task(id, fx.user_one.user.id)
        .await
        .unwrap()
        .expect("task should be persisted");
    assert!(!task.completed);
}

#[actix_rt::test]
async fn should_fetch_user_tasks() {
    let fx = setup_database().await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header(fx.user_one.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ids(&body),
        vec![fx.task_one.id.to_string(), fx.task_two.id.to_string()]
    );

    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header(fx.user_two.bearer())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(ids(&body), vec![fx.task_three.id.to_string()]);
}

#[actix_rt::test]
async fn should_not_delete_other_users_tasks() {
    let fx = setup_database().await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::delete()
        .uri(&format!("/tasks/{}", fx.task_one.id))
        .insert_header(fx.user_two.bearer())
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let task = fx
        .store
        .find_task(fx.task_one.id, fx.user_one.user.id)
        .await
        .unwrap();
    assert!(task.is_some());
}

#[actix_rt::test]
async fn should_not_create_task_with_invalid_description() {
    let fx = setup_database().await;
    let app = init_app!(fx.state.clone());

    for payload in [
        json!({ "description": "" }),
        json!({ "description": "   " }),
        json!({ "completed": true }),
        json!({ "description": "Sneaky", "owner": fx.user_one.user.id }),
    ] {
        let req = test::TestRequest::post()
            .uri("/tasks")
            .insert_header(fx.user_two.bearer())
            .set_json(&payload)
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {}", payload);
        assert!(body["error"].is_string());
    }

    assert_eq!(fx.store.task_count().await, 3);
}

#[actix_rt::test]
async fn should_delete_a_task() {
    let fx = setup_database().await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::delete()
        .uri(&format!("/tasks/{}", fx.task_one.id))
        .insert_header(fx.user_one.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "First Task");

    let task = fx
        .store
        .find_task(fx.task_one.id, fx.user_one.user.id)
        .await
        .unwrap();
    assert!(task.is_none());

    let req = test::TestRequest::get()
        .uri(&format!("/tasks/{}", fx.task_one.id))
        .insert_header(fx.user_one.bearer())
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn should_not_delete_task_if_unauthenticated() {
    let fx = setup_database().await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::delete()
        .uri(&format!("/tasks/{}", fx.task_one.id))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(fx.store.task_count().await, 3);
}

#[actix_rt::test]
async fn should_not_update_other_users_task() {
    let fx = setup_database().await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::patch()
        .uri(&format!("/tasks/{}", fx.task_one.id))
        .insert_header(fx.user_two.bearer())
        .set_json(json!({ "completed": true }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let task = fx
        .store
        .find_task(fx.task_one.id, fx.user_one.user.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!task.completed);
}

#[actix_rt::test]
async fn should_update_own_task() {
    let fx = setup_database().await;
    let app = init_app!(fx.state.clone());
    let uri = format!("/tasks/{}", fx.task_one.id);

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(fx.user_one.bearer())
        .set_json(json!({ "description": " Renamed ", "completed": true }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Renamed");
    assert_eq!(body["completed"], true);

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(fx.user_one.bearer())
        .set_json(json!({ "location": "Philadelphia" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(fx.user_one.bearer())
        .set_json(json!({ "description": "" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let task = fx
        .store
        .find_task(fx.task_one.id, fx.user_one.user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(task.description, "Renamed");
}

#[actix_rt::test]
async fn should_fetch_user_task_by_id() {
    let fx = setup_database().await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::get()
        .uri(&format!("/tasks/{}", fx.task_one.id))
        .insert_header(fx.user_one.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], fx.task_one.id.to_string());
    assert_eq!(body["completed"], false);
}

#[actix_rt::test]
async fn should_not_update_task_if_unauthenticated() {
    let fx = setup_database().await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::patch()
        .uri(&format!("/tasks/{}", fx.task_one.id))
        .set_json(json!({ "completed": true }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let task = fx
        .store
        .find_task(fx.task_one.id, fx.user_one.user.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!task.completed);
}

#[actix_rt::test]
async fn should_not_fetch_user_tasks_if_unauthenticated() {
    let fx = setup_database().await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::get().uri("/tasks").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please authenticate");
}

#[actix_rt::test]
async fn should_not_fetch_user_task_by_id_if_unauthenticated() {
    let fx = setup_database().await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::get()
        .uri(&format!("/tasks/{}", fx.task_one.id))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn should_not_fetch_other_users_task_by_id() {
    let fx = setup_database().await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::get()
        .uri(&format!("/tasks/{}", fx.task_one.id))
        .insert_header(fx.user_two.bearer())
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/tasks/not-a-task-id")
        .insert_header(fx.user_one.bearer())
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn should_fetch_only_completed_tasks() {
    let fx = setup_database().await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::get()
        .uri("/tasks?completed=true")
        .insert_header(fx.user_one.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![fx.task_two.id.to_string()]);

    let req = test::TestRequest::get()
        .uri("/tasks?completed=false")
        .insert_header(fx.user_one.bearer())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(ids(&body), vec![fx.task_one.id.to_string()]);

    let req = test::TestRequest::get()
        .uri("/tasks?completed=maybe")
        .insert_header(fx.user_one.bearer())
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn should_sort_tasks_by_completion() {
    let fx = setup_database().await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::get()
        .uri("/tasks?sortBy=completed_desc")
        .insert_header(fx.user_one.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ids(&body),
        vec![fx.task_two.id.to_string(), fx.task_one.id.to_string()]
    );

    let req = test::TestRequest::get()
        .uri("/tasks?sortBy=completed:asc")
        .insert_header(fx.user_one.bearer())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(
        ids(&body),
        vec![fx.task_one.id.to_string(), fx.task_two.id.to_string()]
    );

    let req = test::TestRequest::get()
        .uri("/tasks?sortBy=owner_desc")
        .insert_header(fx.user_one.bearer())
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn should_fetch_page_of_tasks() {
    let fx = setup_database().await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::get()
        .uri("/tasks?skip=0&limit=1")
        .insert_header(fx.user_one.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![fx.task_one.id.to_string()]);

    let req = test::TestRequest::get()
        .uri("/tasks?sortBy=description_asc&skip=1&limit=1")
        .insert_header(fx.user_one.bearer())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(ids(&body), vec![fx.task_two.id.to_string()]);

    let req = test::TestRequest::get()
        .uri("/tasks?skip=5")
        .insert_header(fx.user_one.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    for uri in [
        "/tasks?limit=-1",
        "/tasks?limit=18446744073709551615",
        "/tasks?skip=9223372036854775808",
    ] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(fx.user_one.bearer())
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {}", uri);
    }
}

#[actix_rt::test]
async fn should_keep_task_after_other_user_delete_attempt() {
    let fx = setup_database().await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header(fx.user_one.bearer())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let req = test::TestRequest::delete()
        .uri(&format!("/tasks/{}", fx.task_one.id))
        .insert_header(fx.user_two.bearer())
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/tasks/{}", fx.task_one.id))
        .insert_header(fx.user_one.bearer())
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
}

#[test_log::test(actix_rt::test)]
async fn should_reject_unauthenticated_create_over_http() {
    let fx = setup_database().await;

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let data = web::Data::new(fx.state.clone());
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(taskmanager::auth::AuthMiddleware)
            .configure(taskmanager::routes::config)
    })
    .listen(listener)
    .expect("Failed to listen on test port")
    .run();
    let handle = server.handle();
    rt::spawn(server);

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://127.0.0.1:{}/tasks", port))
        .json(&json!({ "description": "Unauthorized Task" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Please authenticate");
    assert_eq!(fx.store.task_count().await, 3);

    handle.stop(false).await;
}
