//! Grant editor integration tests
//!
//! The editor driving the real client, checking which calls reach the server.

#[cfg(test)]
mod tests {
    use crate::common::{TestApi, fixtures};
    use infra_console::grants::{
        AddOutcome, Candidate, CandidateDirectory, GrantEditor, PrivilegeChange,
        PrivilegePrecedence, RemoveOutcome, SkipReason,
    };
    use infra_console::sdk::{GrantSubject, SubjectKind};
    use infra_console::ConsoleClient;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn editor(api: &TestApi, resource: &str) -> GrantEditor<ConsoleClient> {
        GrantEditor::new(
            Arc::new(api.client()),
            resource,
            vec!["view".to_string(), "edit".to_string(), "admin".to_string()],
            PrivilegePrecedence::default(),
        )
    }

    #[tokio::test]
    async fn test_add_from_form() {
        let api = TestApi::start().await;
        api.mock_grants("kubernetes.prod", vec![]).await;
        api.mock_grants("kubernetes", vec![]).await;
        api.mock_directory(
            vec![fixtures::user("u1", "ann@example.com")],
            vec![fixtures::group("g1", "Admins")],
        )
        .await;
        Mock::given(method("POST"))
            .and(path("/api/grants"))
            .and(body_json(json!({
                "user": "u1",
                "privilege": "view",
                "resource": "kubernetes.prod"
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(fixtures::user_grant("new-1", "u1", "kubernetes.prod", "view")),
            )
            .expect(1)
            .mount(&api.server)
            .await;

        let client = api.client();
        let mut directory = CandidateDirectory::default();
        directory.refresh(&client).await.unwrap();

        let editor = editor(&api, "kubernetes.prod");
        editor.refresh().await.unwrap();

        editor.with_form(|form| form.set_query("ANN"));
        let found = editor.candidates(&directory);
        assert_eq!(found.len(), 1);
        editor.with_form(|form| form.select(found[0].clone()));

        let AddOutcome::Created(grant) = editor.submit().await.unwrap() else {
            panic!("expected a created grant");
        };
        assert_eq!(grant.id, "new-1");

        // the new subject is no longer offered
        editor.with_form(|form| form.set_query("a"));
        let names: Vec<_> = editor.candidates(&directory).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Admins"]);

        // adding the same grant again never reaches the server
        assert_eq!(
            editor
                .add(GrantSubject::User("u1".to_string()), "view")
                .await
                .unwrap(),
            AddOutcome::Skipped(SkipReason::Duplicate)
        );
    }

    #[tokio::test]
    async fn test_rejected_create_changes_nothing() {
        let api = TestApi::start().await;
        api.mock_grants("db", vec![]).await;
        Mock::given(method("POST"))
            .and(path("/api/grants"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "forbidden" })))
            .expect(1)
            .mount(&api.server)
            .await;

        let editor = editor(&api, "db");
        editor.refresh().await.unwrap();
        editor.with_form(|form| {
            form.select(Candidate {
                id: "g1".to_string(),
                name: "Admins".to_string(),
                kind: SubjectKind::Group,
            })
        });

        let error = editor.submit().await.unwrap_err();
        assert!(error.is_auth_error());
        assert!(editor.grants().is_empty());
        editor.with_form(|form| assert!(form.selected().is_some()));
    }

    #[tokio::test]
    async fn test_remove_and_inherited_rows() {
        let api = TestApi::start().await;
        api.mock_grants(
            "cluster.web",
            vec![
                fixtures::user_grant("own-1", "u1", "cluster.web", "view"),
                fixtures::group_grant("own-2", "g1", "cluster.web", "admin"),
            ],
        )
        .await;
        api.mock_grants(
            "cluster",
            vec![fixtures::user_grant("parent-1", "u2", "cluster", "edit")],
        )
        .await;
        Mock::given(method("DELETE"))
            .and(path("/api/grants/own-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&api.server)
            .await;

        let editor = editor(&api, "cluster.web");
        editor.refresh().await.unwrap();

        let directory = CandidateDirectory::default();
        let rows = editor.rows(&directory);
        let ids: Vec<_> = rows.iter().map(|r| (r.id.as_str(), r.inherited)).collect();
        assert_eq!(
            ids,
            vec![("own-2", false), ("own-1", false), ("parent-1", true)]
        );

        assert_eq!(
            editor.remove("parent-1").await.unwrap(),
            RemoveOutcome::Skipped(SkipReason::NotEditable)
        );
        assert_eq!(
            editor.remove("own-1").await.unwrap(),
            RemoveOutcome::Removed("own-1".to_string())
        );
        assert_eq!(editor.grants().len(), 1);
    }

    #[tokio::test]
    async fn test_change_privilege_with_failed_delete() {
        let api = TestApi::start().await;
        api.mock_grants(
            "db",
            vec![fixtures::user_grant("g1", "u1", "db", "view")],
        )
        .await;
        Mock::given(method("POST"))
            .and(path("/api/grants"))
            .and(body_json(json!({
                "user": "u1",
                "privilege": "edit",
                "resource": "db"
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(fixtures::user_grant("g2", "u1", "db", "edit")),
            )
            .expect(1)
            .mount(&api.server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/grants/g1"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&api.server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/grants/g1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&api.server)
            .await;

        let editor = editor(&api, "db");
        editor.refresh().await.unwrap();

        let change = editor.change_privilege("g1", "edit").await.unwrap();
        let PrivilegeChange::Partial { created, stale, error } = change else {
            panic!("expected a partial change");
        };
        assert_eq!(created.id, "g2");
        assert_eq!(stale, "g1");
        assert!(error.is_retryable());
        assert_eq!(editor.grants().len(), 2);

        assert_eq!(editor.retry_cleanup().await.unwrap(), 1);
        let ids: Vec<_> = editor.grants().into_iter().map(|g| g.id).collect();
        assert_eq!(ids, vec!["g2"]);
    }
}
