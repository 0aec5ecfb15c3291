use chorusllm::clients::scripted::ScriptedClient;
use chorusllm::role_selection::{
    KeywordRoleSelection, RoleSelectionPolicy, StaticRoleSelection, MAX_KEYWORD_SELECTION,
};
use chorusllm::roles::{normalize_role_name, RoleLabel, RoleRepository, SEED_ROLES};
use std::sync::Arc;

fn names(roles: &[RoleLabel]) -> Vec<&str> {
    roles.iter().map(|r| r.name.as_str()).collect()
}

#[tokio::test]
async fn test_static_policy_returns_its_table() {
    let policy = StaticRoleSelection::new(vec![
        RoleLabel::new("Systems Analyst", "Systems view"),
        RoleLabel::new("ethics_guardian", "Ethics view"),
    ]);

    let selection = policy.select_roles("any question", None).await.unwrap();

    assert_eq!(names(&selection.roles), vec!["systems_analyst", "ethics_guardian"]);
    assert!(selection.raw_output.contains("- systems_analyst: Systems view"));
    assert_eq!(policy.name(), "StaticRoleSelection");
}

#[tokio::test]
async fn test_default_static_policy_is_the_seed_set() {
    let selection = StaticRoleSelection::default()
        .select_roles("q", Some("ctx"))
        .await
        .unwrap();
    let seed_names: Vec<&str> = SEED_ROLES.iter().map(|(name, _)| *name).collect();
    assert_eq!(names(&selection.roles), seed_names);
}

#[test]
fn test_keyword_scan_follows_vocabulary_order() {
    let roles = KeywordRoleSelection::roles_from_text(
        "Cultural factors first, then environmental and psychological ones.",
    );
    assert_eq!(
        names(&roles),
        vec![
            "psychology_specialist",
            "environmental_analyst",
            "cultural_analyst",
            "risk_assessor"
        ]
    );
}

#[test]
fn test_keyword_selection_is_capped() {
    let roles = KeywordRoleSelection::roles_from_text(
        "economic social technical psychological environmental legal cultural",
    );
    assert_eq!(roles.len(), MAX_KEYWORD_SELECTION);
    assert_eq!(roles.last().unwrap().name, "risk_assessor");
}

#[test]
fn test_keyword_selection_without_hits_keeps_risk_role() {
    let roles = KeywordRoleSelection::roles_from_text("No relevant words at all.");
    assert_eq!(names(&roles), vec!["risk_assessor"]);
}

#[tokio::test]
async fn test_keyword_policy_sends_role_design_prompt() {
    let client = Arc::new(ScriptedClient::new("stub").reply_when("design the team", "a LEGAL matter"));
    let policy = KeywordRoleSelection::new(client.clone());

    let selection = policy
        .select_roles("Can we sell user data?", Some("EU-based startup"))
        .await
        .unwrap();

    assert_eq!(names(&selection.roles), vec!["legal_advisor", "risk_assessor"]);
    assert_eq!(selection.raw_output, "a LEGAL matter");
    let prompts = client.prompts().await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Can we sell user data?"));
    assert!(prompts[0].contains("EU-based startup"));
}

#[tokio::test]
async fn test_keyword_policy_propagates_model_failure() {
    let client = Arc::new(ScriptedClient::new("stub").fail_when("design the team", "offline"));
    let policy = KeywordRoleSelection::new(client);

    let err = policy.select_roles("q?", None).await.unwrap_err();
    assert_eq!(err.to_string(), "offline");
}

#[test]
fn test_repository_normalizes_and_counts() {
    let mut repo = RoleRepository::with_seed_roles();
    assert_eq!(repo.len(), 4);

    let key = repo.upsert("  Data Steward!! ", "Owns data quality.").unwrap();
    assert_eq!(key, "data_steward");
    assert_eq!(repo.increment_usage("DATA-steward").unwrap(), 1);
    assert_eq!(repo.increment_usage("data_steward").unwrap(), 2);
    assert_eq!(repo.get("Data Steward").unwrap().usage_count, 2);
    assert_eq!(repo.all_roles().last().unwrap().name, "data_steward");

    assert!(repo.upsert("***", "nothing").is_err());
    assert!(repo.increment_usage("nobody").is_err());
    assert_eq!(normalize_role_name("__Risk  Assessor__"), "risk_assessor");
}
