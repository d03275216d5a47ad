//! HTTP client tests against a mock backend.

use admin_panel::api::{AdminApi, AdminClient};
use admin_panel::entity::{PaymentStatus, Role};
use admin_panel::error::{AdminError, AuthReason, ErrorKind};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> AdminClient {
    AdminClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

async fn mount_login(server: &MockServer, role: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({
            "email": "admin@example.com",
            "password": "secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-123",
            "user": {
                "id": 1,
                "username": "root",
                "email": "admin@example.com",
                "role": role
            }
        })))
        .mount(server)
        .await;
}

// =============================================================================
// Login
// =============================================================================

mod login {
    use super::*;

    #[tokio::test]
    async fn test_login_stores_session() {
        let server = MockServer::start().await;
        mount_login(&server, "admin").await;
        let client = client(&server);

        assert!(!client.is_logged_in().await);
        let user = client.login("admin@example.com", "secret").await.unwrap();

        assert_eq!(user.username, "root");
        assert_eq!(user.role, Some(Role::Admin));
        assert!(client.is_logged_in().await);
        assert!(client.is_admin().await);
    }

    #[tokio::test]
    async fn test_regular_user_is_not_admin() {
        let server = MockServer::start().await;
        mount_login(&server, "user").await;
        let client = client(&server);

        let user = client.login("admin@example.com", "secret").await.unwrap();
        assert!(!user.is_admin());
        assert!(client.is_logged_in().await);
        assert!(!client.is_admin().await);

        client.logout().await;
        assert!(!client.is_logged_in().await);
    }

    #[tokio::test]
    async fn test_unauthorized_is_invalid_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .login("admin@example.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth(AuthReason::InvalidCredentials));
        assert_eq!(err.user_message(), "Invalid email or password.");
    }

    #[tokio::test]
    async fn test_forbidden_is_not_admin_whatever_the_wording() {
        for wording in ["Admin access required", "Admin privileges required"] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/api/auth/login"))
                .respond_with(ResponseTemplate::new(403).set_body_string(wording))
                .mount(&server)
                .await;

            let err = client(&server)
                .login("admin@example.com", "secret")
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Auth(AuthReason::NotAdmin));
            assert!(!err.user_message().contains(wording));
        }
    }

    #[tokio::test]
    async fn test_server_error_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
            .mount(&server)
            .await;

        let err = client(&server)
            .login("admin@example.com", "secret")
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Server { status: 500, .. }));
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(!err.user_message().contains("database"));
    }
}

// =============================================================================
// Lists
// =============================================================================

mod lists {
    use super::*;

    async fn signed_in(server: &MockServer) -> AdminClient {
        mount_login(server, "admin").await;
        let client = client(server);
        client.login("admin@example.com", "secret").await.unwrap();
        client
    }

    #[tokio::test]
    async fn test_users_sent_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/users"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "username": "ana", "email": "ana@example.com", "role": "admin",
                 "created_at": "2024-03-05T10:00:00Z"},
                {"id": 2, "username": "bob", "role": "user"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let users = signed_in(&server).await.get_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "ana");
        assert_eq!(users[1].email, None);
        assert_eq!(users[1].role, Some(Role::User));
    }

    #[tokio::test]
    async fn test_payments_in_data_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/payments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"id": 7, "user_id": 1, "booking_id": 9, "amount": "12.50",
                     "status": "completed", "payment_method": "card"},
                    {"id": 8, "amount": 3, "status": "chargeback"}
                ]
            })))
            .mount(&server)
            .await;

        let payments = signed_in(&server).await.get_payments().await.unwrap();
        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].amount, 12.5);
        assert_eq!(payments[0].status, Some(PaymentStatus::Completed));
        assert_eq!(payments[1].status, Some(PaymentStatus::Unknown));
    }

    #[tokio::test]
    async fn test_expired_token_is_session_expired() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/bookings"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = signed_in(&server).await.get_bookings().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth(AuthReason::SessionExpired));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/movies"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = signed_in(&server).await.get_movies().await.unwrap_err();
        assert!(matches!(err, AdminError::Parse(_)));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_not_signed_in_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/cinemas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server).get_cinemas().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth(AuthReason::SessionExpired));
    }
}
