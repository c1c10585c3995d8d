//! HTTP client integration tests
//!
//! Request shapes, authentication and status mapping of `ConsoleClient`.

#[cfg(test)]
mod tests {
    use crate::common::{ACCESS_KEY, TestApi, fixtures};
    use infra_console::ConsoleClient;
    use infra_console::config::ApiConfig;
    use infra_console::sdk::{
        CreateGrantRequest, DirectoryApi, GrantApi, GrantQuery, GrantSubject, SessionApi,
    };
    use infra_console::utils::error::ConsoleError;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, path_regex, query_param};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn test_session_sends_bearer_key() {
        let api = TestApi::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/self"))
            .and(header("authorization", format!("Bearer {}", ACCESS_KEY).as_str()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(fixtures::user("u1", "ann@example.com")),
            )
            .expect(1)
            .mount(&api.server)
            .await;

        let session = api.client().fetch_session().await.unwrap();
        assert_eq!(session.id, "u1");
        assert_eq!(session.name, "ann@example.com");
        assert_eq!(session.provider_names, vec!["infra"]);
        assert!(session.last_seen_at.is_some());
    }

    #[tokio::test]
    async fn test_directory_uses_list_limit() {
        let api = TestApi::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .and(query_param("limit", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::list(vec![
                fixtures::user("u1", "ann@example.com"),
                fixtures::user("u2", "bob@example.com"),
            ])))
            .expect(1)
            .mount(&api.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/groups"))
            .and(query_param("limit", "1000"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(fixtures::list(vec![fixtures::group("g1", "Admins")])),
            )
            .expect(1)
            .mount(&api.server)
            .await;

        let client = api.client();
        assert_eq!(client.list_users().await.unwrap().len(), 2);
        assert_eq!(client.list_groups().await.unwrap()[0].name, "Admins");
    }

    #[tokio::test]
    async fn test_list_grants_query() {
        let api = TestApi::start().await;
        Mock::given(method("GET"))
            .and(path("/api/grants"))
            .and(query_param("resource", "infra"))
            .and(query_param("user", "u1"))
            .and(query_param("privilege", "admin"))
            .and(query_param("showInherited", "1"))
            .and(query_param("limit", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::list(vec![
                fixtures::user_grant("g1", "u1", "infra", "admin"),
            ])))
            .expect(1)
            .mount(&api.server)
            .await;

        let query = GrantQuery::for_resource("infra")
            .user("u1")
            .privilege("admin")
            .show_inherited(true);
        let grants = api.client().list_grants(query).await.unwrap();

        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].subject, GrantSubject::User("u1".to_string()));
        assert_eq!(grants[0].created_by.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_create_grant_body() {
        let api = TestApi::start().await;
        Mock::given(method("POST"))
            .and(path("/api/grants"))
            .and(body_json(json!({
                "group": "g1",
                "privilege": "view",
                "resource": "cluster.web"
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(fixtures::group_grant("new-1", "g1", "cluster.web", "view")),
            )
            .expect(1)
            .mount(&api.server)
            .await;

        let request = CreateGrantRequest::new(
            GrantSubject::Group("g1".to_string()),
            "view",
            "cluster.web",
        );
        let grant = api.client().create_grant(request).await.unwrap();
        assert_eq!(grant.id, "new-1");
        assert_eq!(grant.subject, GrantSubject::Group("g1".to_string()));
    }

    #[tokio::test]
    async fn test_delete_grant_path() {
        let api = TestApi::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/grants/g1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&api.server)
            .await;

        api.client().delete_grant("g1".to_string()).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_grant_id_stays_in_path() {
        let api = TestApi::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/users/u1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&api.server)
            .await;
        Mock::given(method("DELETE"))
            .and(path_regex("^/api/grants/[^/]+$"))
            .respond_with(ResponseTemplate::new(404))
            .expect(2)
            .mount(&api.server)
            .await;

        let client = api.client();
        for id in ["../users/u1", "u1?force=1"] {
            let error = client.delete_grant(id.to_string()).await.unwrap_err();
            assert!(matches!(error, ConsoleError::NotFound(_)));
        }
    }

    #[tokio::test]
    async fn test_logout() {
        let api = TestApi::start().await;
        Mock::given(method("POST"))
            .and(path("/api/logout"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&api.server)
            .await;

        api.client().logout().await.unwrap();
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let api = TestApi::start().await;
        for (status, id) in [(401u16, "a"), (403, "b"), (404, "c"), (409, "d"), (502, "e")] {
            Mock::given(method("DELETE"))
                .and(path(format!("/api/grants/{}", id)))
                .respond_with(
                    ResponseTemplate::new(status).set_body_json(json!({ "message": "nope" })),
                )
                .mount(&api.server)
                .await;
        }

        let client = api.client();
        let err = |id: &str| client.delete_grant(id.to_string());

        assert!(matches!(err("a").await, Err(ConsoleError::Unauthorized(m)) if m == "nope"));
        assert!(matches!(err("b").await, Err(ConsoleError::Forbidden(_))));
        assert!(matches!(err("c").await, Err(ConsoleError::NotFound(_))));
        assert!(matches!(err("d").await, Err(ConsoleError::Conflict(_))));

        let server_error = err("e").await.unwrap_err();
        assert!(matches!(server_error, ConsoleError::Api { status: 502, .. }));
        assert!(server_error.is_retryable());
    }

    #[tokio::test]
    async fn test_plain_text_error_body() {
        let api = TestApi::start().await;
        Mock::given(method("POST"))
            .and(path("/api/grants"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid privilege"))
            .mount(&api.server)
            .await;

        let request =
            CreateGrantRequest::new(GrantSubject::User("u1".to_string()), "root", "infra");
        let error = api.client().create_grant(request).await.unwrap_err();
        assert!(
            matches!(error, ConsoleError::Api { status: 400, ref message } if message == "invalid privilege")
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let api = TestApi::start().await;
        Mock::given(method("GET"))
            .and(path("/api/grants"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "items": [{ "id": "g1", "resource": "r", "privilege": "view" }] })),
            )
            .mount(&api.server)
            .await;

        // a grant with neither user nor group is rejected
        let error = api
            .client()
            .list_grants(GrantQuery::for_resource("r"))
            .await
            .unwrap_err();
        assert!(matches!(error, ConsoleError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let client = ConsoleClient::new(&ApiConfig {
            server: "http://127.0.0.1:1".to_string(),
            timeout: 2,
            ..Default::default()
        })
        .unwrap();

        let error = client.fetch_session().await.unwrap_err();
        assert!(matches!(error, ConsoleError::Network(_)));
        assert!(error.is_retryable());
    }
}
