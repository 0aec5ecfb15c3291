use chorusllm::config::{BudgetPolicy, ContextBudget};
use chorusllm::error::{OrchestrationError, Phase};
use chorusllm::prompt_builder::{PromptBuilder, FIRST_PERSPECTIVE_MARKER, TRANSCRIPT_DELIMITER};
use chorusllm::roles::RoleLabel;
use chorusllm::run::Analysis;

fn priors() -> Vec<Analysis> {
    vec![
        Analysis::new("systems_analyst", "q", "Feedback loops dominate here.", 0),
        Analysis::new("ethics_guardian", "q", "Consent has not been sought.", 0),
        Analysis::new("practical_implementer", "q", "Start with a two-week pilot.", 0),
    ]
}

fn risk_role() -> RoleLabel {
    RoleLabel::new("risk_assessor", "Finds failure modes.")
}

#[test]
fn test_specialist_prompt_embeds_all_priors_in_order() {
    let builder = PromptBuilder::new();
    let prior = priors();
    let prompt = builder
        .build_specialist_prompt(&risk_role(), "Should we pilot the scheme?", &prior)
        .unwrap();

    let positions: Vec<usize> = prior
        .iter()
        .map(|a| prompt.find(&a.text).expect("prior text missing"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(prompt.contains("### ethics_guardian\nConsent has not been sought."));
    assert!(prompt.contains("Should we pilot the scheme?"));
    assert!(prompt.contains("Finds failure modes."));
    assert!(!prompt.contains(FIRST_PERSPECTIVE_MARKER));
}

#[test]
fn test_specialist_prompt_grows_strictly_with_priors() {
    let builder = PromptBuilder::new();
    let prior = priors();
    let lengths: Vec<usize> = (0..=prior.len())
        .map(|n| {
            builder
                .build_specialist_prompt(&risk_role(), "q?", &prior[..n])
                .unwrap()
                .chars()
                .count()
        })
        .collect();

    for (shorter, longer) in lengths.iter().zip(lengths.iter().skip(1)) {
        assert!(longer > shorter, "{:?}", lengths);
    }
}

#[test]
fn test_first_specialist_gets_marker_and_no_delimiter() {
    let prompt = PromptBuilder::new()
        .build_specialist_prompt(&risk_role(), "Anything risky?", &[])
        .unwrap();

    assert!(prompt.contains(FIRST_PERSPECTIVE_MARKER));
    assert!(!prompt.contains(TRANSCRIPT_DELIMITER));
}

#[test]
fn test_prompts_are_deterministic() {
    let builder = PromptBuilder::new().with_context("Mid-size hospital.");
    let prior = priors();
    let a = builder
        .build_specialist_prompt(&risk_role(), "q?", &prior)
        .unwrap();
    let b = builder
        .build_specialist_prompt(&risk_role(), "q?", &prior)
        .unwrap();
    assert_eq!(a, b);
    assert!(a.contains("Mid-size hospital."));
}

#[test]
fn test_blank_context_is_ignored() {
    let builder = PromptBuilder::new().with_context("   ");
    assert!(builder.context().is_none());
    let prompt = builder.build_role_design_prompt("q?").unwrap();
    assert!(!prompt.contains("SITUATION:"));
}

#[test]
fn test_synthesis_over_nothing_is_invalid_input() {
    let err = PromptBuilder::new()
        .build_synthesis_prompt("q?", &[])
        .unwrap_err();
    assert!(matches!(err, OrchestrationError::InvalidInput(_)));
}

#[test]
fn test_synthesis_prompt_embeds_every_analysis() {
    let prior = priors();
    let prompt = PromptBuilder::new()
        .build_synthesis_prompt("Should we pilot the scheme?", &prior)
        .unwrap();

    for analysis in &prior {
        assert!(prompt.contains(&analysis.text));
    }
    assert!(prompt.contains("synthesis_integrator"));
    assert!(!prompt.contains(FIRST_PERSPECTIVE_MARKER));
}

#[test]
fn test_empty_query_or_role_is_invalid_input() {
    let builder = PromptBuilder::new();
    assert!(matches!(
        builder.build_specialist_prompt(&risk_role(), "  ", &[]),
        Err(OrchestrationError::InvalidInput(_))
    ));
    let unnamed = RoleLabel {
        name: String::new(),
        description: "x".to_string(),
    };
    assert!(matches!(
        builder.build_specialist_prompt(&unnamed, "q?", &[]),
        Err(OrchestrationError::InvalidInput(_))
    ));
    assert!(builder.build_role_design_prompt("").is_err());
}

#[test]
fn test_reject_budget_reports_sizes() {
    let builder =
        PromptBuilder::new().with_budget(Some(ContextBudget::new(100, BudgetPolicy::Reject)));
    let err = builder
        .build_synthesis_prompt("q?", &priors())
        .unwrap_err();

    match err {
        OrchestrationError::ContextBudgetExceeded {
            phase,
            chars,
            limit,
        } => {
            assert_eq!(phase, Phase::Synthesis);
            assert_eq!(limit, 100);
            assert!(chars > limit);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_drop_oldest_sheds_earliest_analyses_first() {
    let prior = vec![
        Analysis::new("first", "q", "a".repeat(500), 0),
        Analysis::new("second", "q", "b".repeat(500), 0),
        Analysis::new("third", "q", "c".repeat(500), 0),
    ];
    let unbounded = PromptBuilder::new();
    let newest_only = unbounded
        .build_specialist_prompt(&risk_role(), "q?", &prior[2..])
        .unwrap()
        .chars()
        .count();

    let builder = PromptBuilder::new().with_budget(Some(ContextBudget::new(
        newest_only + 100,
        BudgetPolicy::DropOldest,
    )));
    let prompt = builder
        .build_specialist_prompt(&risk_role(), "q?", &prior)
        .unwrap();

    assert!(prompt.chars().count() <= newest_only + 100);
    assert!(prompt.contains("[2 earlier perspective(s) omitted"));
    assert!(!prompt.contains(&"a".repeat(500)));
    assert!(!prompt.contains(&"b".repeat(500)));
    assert!(prompt.contains(&"c".repeat(500)));
}

#[test]
fn test_drop_oldest_still_fails_when_frame_alone_is_too_large() {
    let builder =
        PromptBuilder::new().with_budget(Some(ContextBudget::new(10, BudgetPolicy::DropOldest)));
    let err = builder
        .build_specialist_prompt(&risk_role(), "q?", &priors())
        .unwrap_err();
    assert_eq!(err.phase(), Phase::Specialist);
}

#[test]
fn test_budget_within_limit_changes_nothing() {
    let prior = priors();
    let plain = PromptBuilder::new()
        .build_specialist_prompt(&risk_role(), "q?", &prior)
        .unwrap();
    let bounded = PromptBuilder::new()
        .with_budget(Some(ContextBudget::new(100_000, BudgetPolicy::Reject)))
        .build_specialist_prompt(&risk_role(), "q?", &prior)
        .unwrap();
    assert_eq!(plain, bounded);
}

#[test]
fn test_drop_oldest_synthesis_keeps_the_newest_analysis() {
    let analyses = vec![
        Analysis::new("first", "q", "a".repeat(2_000), 0),
        Analysis::new("second", "q", "b".repeat(2_000), 0),
    ];
    let newest_only = PromptBuilder::new()
        .build_synthesis_prompt("q?", &analyses[1..])
        .unwrap()
        .chars()
        .count();

    let roomy = PromptBuilder::new().with_budget(Some(ContextBudget::new(
        newest_only + 100,
        BudgetPolicy::DropOldest,
    )));
    let prompt = roomy.build_synthesis_prompt("q?", &analyses).unwrap();
    assert!(prompt.contains("[1 earlier perspective(s) omitted"));
    assert!(prompt.contains(&"b".repeat(2_000)));

    // Too small for even one analysis: dropping everything would leave nothing to integrate.
    let tight = PromptBuilder::new().with_budget(Some(ContextBudget::new(
        newest_only - 1_000,
        BudgetPolicy::DropOldest,
    )));
    match tight.build_synthesis_prompt("q?", &analyses).unwrap_err() {
        OrchestrationError::ContextBudgetExceeded { phase, limit, .. } => {
            assert_eq!(phase, Phase::Synthesis);
            assert_eq!(limit, newest_only - 1_000);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
