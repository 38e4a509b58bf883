//! End-to-end tests against a running starter with the sandbox wallet.

mod common;

use std::sync::atomic::Ordering;

use common::{client, start_mock_rpc, start_starter, wait_for_connected, SANDBOX_ADDRESS};
use serde_json::{json, Value};

#[tokio::test]
async fn test_health_and_home_page() {
    let (rpc_url, _) = start_mock_rpc(200).await;
    let app = start_starter(&rpc_url).await;
    let client = client();

    let health: Value = client
        .get(format!("{}/health", app.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["network"], "devnet");

    let res = client.get(format!("{}/", app.base)).send().await.unwrap();
    assert!(res.headers().contains_key("x-request-id"));
    let page = res.text().await.unwrap();
    assert!(page.contains("Not Connected"));
    assert!(page.contains("Connect Wallet"));
    assert!(!page.contains("class=\"demo\""));
    assert!(page.contains("/auth/callback"));
}

#[tokio::test]
async fn test_connect_send_and_disconnect() {
    let (rpc_url, rpc_calls) = start_mock_rpc(200).await;
    let app = start_starter(&rpc_url).await;
    let client = client();

    let connected: Value = client
        .post(format!("{}/api/connect", app.base))
        .json(&json!({ "provider": "google" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(connected["addresses"][0]["address"], SANDBOX_ADDRESS);
    wait_for_connected(&client, &app.base, true).await;

    let page = client
        .get(format!("{}/", app.base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Disconnect Wallet"));
    assert!(page.contains("class=\"demo\""));

    let outcome: Value = client
        .post(format!("{}/api/transaction", app.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(outcome["kind"], "success");
    let message = outcome["message"].as_str().unwrap();
    assert!(message.starts_with("Sent! TX: "));
    assert!(message.ends_with("..."));
    assert_eq!(message.len(), "Sent! TX: ".len() + 16 + 3);
    assert_eq!(rpc_calls.load(Ordering::SeqCst), 1);

    let session: Value = client
        .get(format!("{}/api/session", app.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["notification"]["message"], message);

    let signed: Value = client
        .post(format!("{}/api/sign-message", app.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!signed["signature"].as_str().unwrap().is_empty());

    let res = client
        .post(format!("{}/api/disconnect", app.base))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    wait_for_connected(&client, &app.base, false).await;

    // Disconnecting drops the demo's notification with the session.
    let session: Value = client
        .get(format!("{}/api/session", app.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(session["notification"].is_null());
}

#[tokio::test]
async fn test_rpc_failure_reported_without_disconnecting() {
    let (rpc_url, _) = start_mock_rpc(503).await;
    let app = start_starter(&rpc_url).await;
    let client = client();

    client
        .post(format!("{}/api/connect", app.base))
        .send()
        .await
        .unwrap();
    wait_for_connected(&client, &app.base, true).await;

    let outcome: Value = client
        .post(format!("{}/api/transaction", app.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(outcome["kind"], "error");
    assert!(outcome["message"]
        .as_str()
        .unwrap()
        .starts_with("Could not fetch a recent blockhash"));

    let session: Value = client
        .get(format!("{}/api/session", app.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["status"]["connected"], true);
}

#[tokio::test]
async fn test_sign_message_requires_connection() {
    let (rpc_url, _) = start_mock_rpc(200).await;
    let app = start_starter(&rpc_url).await;

    let res = client()
        .post(format!("{}/api/sign-message", app.base))
        .json(&json!({ "message": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Wallet is not connected");
}

#[tokio::test]
async fn test_callback_redirects_home_after_sign_in() {
    let (rpc_url, _) = start_mock_rpc(200).await;
    let app = start_starter(&rpc_url).await;
    let client = client();

    let res = client
        .get(format!("{}/auth/callback?code=abc&state=xyz", app.base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/");

    wait_for_connected(&client, &app.base, true).await;
}

#[tokio::test]
async fn test_callback_failure_offers_go_back() {
    let (rpc_url, _) = start_mock_rpc(200).await;
    let app = start_starter(&rpc_url).await;
    let client = client();

    let res = client
        .get(format!(
            "{}/auth/callback?error=access_denied&error_description=User%20cancelled",
            app.base
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let page = res.text().await.unwrap();
    assert!(page.contains("User cancelled"));
    assert!(page.contains("Go Back"));

    wait_for_connected(&client, &app.base, false).await;
}

#[tokio::test]
async fn test_toggle_form_round_trip() {
    let (rpc_url, _) = start_mock_rpc(200).await;
    let app = start_starter(&rpc_url).await;
    let client = client();

    let res = client
        .post(format!("{}/toggle", app.base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::SEE_OTHER);

    let page = client
        .get(format!("{}/", app.base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains(">Connected<"));
    assert!(page.contains(SANDBOX_ADDRESS));

    client
        .post(format!("{}/toggle", app.base))
        .send()
        .await
        .unwrap();
    wait_for_connected(&client, &app.base, false).await;
}

#[tokio::test]
async fn test_callback_retry_after_failed_sign_in() {
    let (rpc_url, _) = start_mock_rpc(200).await;
    let app = start_starter(&rpc_url).await;
    let client = client();

    let first = client
        .get(format!(
            "{}/auth/callback?error=access_denied&error_description=User%20cancelled",
            app.base
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), reqwest::StatusCode::OK);
    assert!(first.text().await.unwrap().contains("User cancelled"));

    // The earlier error must not leak into the next attempt.
    let second = client
        .get(format!("{}/auth/callback?code=abc&state=xyz", app.base))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), reqwest::StatusCode::SEE_OTHER);
    assert_eq!(second.headers()["location"], "/");
    wait_for_connected(&client, &app.base, true).await;
}

#[tokio::test]
async fn test_callback_error_while_connected_fails() {
    let (rpc_url, _) = start_mock_rpc(200).await;
    let app = start_starter(&rpc_url).await;
    let client = client();

    client
        .post(format!("{}/api/connect", app.base))
        .send()
        .await
        .unwrap();
    wait_for_connected(&client, &app.base, true).await;

    let res = client
        .get(format!(
            "{}/auth/callback?error=access_denied&error_description=Denied%20again",
            app.base
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let page = res.text().await.unwrap();
    assert!(page.contains("Denied again"));
    assert!(page.contains("Go Back"));
}
