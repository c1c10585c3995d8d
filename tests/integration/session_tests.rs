//! Session gate integration tests

#[cfg(test)]
mod tests {
    use crate::common::{TestApi, fixtures};
    use infra_console::auth::{AdminRule, NavigationManifest, SessionState, SessionStore, decide};
    use infra_console::GateState;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn test_admin_viewer_reaches_admin_routes() {
        let api = TestApi::start().await;
        api.mock_session(fixtures::user("u1", "ann@example.com")).await;
        Mock::given(method("GET"))
            .and(path("/api/grants"))
            .and(query_param("resource", "infra"))
            .and(query_param("user", "u1"))
            .and(query_param("privilege", "admin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::list(vec![
                fixtures::user_grant("g1", "u1", "infra", "admin"),
            ])))
            .expect(1)
            .mount(&api.server)
            .await;

        let store = SessionStore::new(AdminRule::default());
        let state = store.refresh(&api.client()).await;
        assert!(state.viewer().unwrap().is_admin);

        let manifest = NavigationManifest::default();
        assert_eq!(decide(&state, "/users", &manifest), GateState::Authorized);
        assert_eq!(decide(&state, "/settings", &manifest), GateState::Authorized);
    }

    #[tokio::test]
    async fn test_member_is_sent_home() {
        let api = TestApi::start().await;
        api.mock_session(fixtures::user("u2", "bob@example.com")).await;
        api.mock_grants("infra", vec![]).await;

        let store = SessionStore::default();
        let state = store.refresh(&api.client()).await;
        assert!(!state.viewer().unwrap().is_admin);

        let manifest = NavigationManifest::default();
        assert_eq!(
            decide(&state, "/providers", &manifest),
            GateState::Redirecting("/".to_string())
        );
        assert_eq!(decide(&state, "/destinations", &manifest), GateState::Authorized);
    }

    #[tokio::test]
    async fn test_expired_session_is_anonymous() {
        let api = TestApi::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/self"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&api.server)
            .await;

        let store = SessionStore::default();
        let state = store.refresh(&api.client()).await;
        assert_eq!(state, SessionState::Anonymous);
        assert_eq!(
            decide(&state, "/users", &NavigationManifest::default()),
            GateState::Redirecting("/login".to_string())
        );
    }

    #[tokio::test]
    async fn test_logout_clears_when_server_fails() {
        let api = TestApi::start().await;
        api.mock_session(fixtures::user("u2", "bob@example.com")).await;
        api.mock_grants("infra", vec![]).await;
        Mock::given(method("POST"))
            .and(path("/api/logout"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&api.server)
            .await;

        let client = api.client();
        let store = SessionStore::default();
        store.refresh(&client).await;
        assert!(store.viewer().is_some());

        store.logout(&client).await;
        assert_eq!(store.state(), SessionState::Anonymous);
    }
}
