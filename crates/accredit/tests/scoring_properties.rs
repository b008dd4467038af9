use accredit::workflows::accreditation::{
    score, DecisionPolicy, DecisionStatus, ImageFinding, ImageFindings, InstitutionCategory,
    InstitutionFacts, PolicyTable, VerdictBuilder, CANONICAL_IMAGE_CATEGORIES,
};
use proptest::prelude::*;

fn arb_category() -> impl Strategy<Value = InstitutionCategory> {
    prop_oneof![
        Just(InstitutionCategory::University),
        Just(InstitutionCategory::Institute),
    ]
}

fn arb_facts() -> impl Strategy<Value = InstitutionFacts> {
    (
        arb_category(),
        0u64..500_000_000,
        0u64..20_000,
        0u64..2_000,
        0u64..1_000,
        0u64..5_000,
    )
        .prop_map(
            |(category, corpus_fund, students, faculty, computers, admin_area)| InstitutionFacts {
                name: "Generated Institution".to_string(),
                category,
                corpus_fund,
                students,
                faculty,
                computers,
                admin_area,
                ..InstitutionFacts::unidentified()
            },
        )
}

fn arb_findings() -> impl Strategy<Value = ImageFindings> {
    prop::collection::vec(
        (prop::sample::select(CANONICAL_IMAGE_CATEGORIES.to_vec()), 0.0f64..=100.0),
        0..8,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(category, confidence)| ImageFinding::new(category, confidence))
            .collect()
    })
}

proptest! {
    #[test]
    fn every_score_stays_within_bounds(facts in arb_facts(), findings in arb_findings()) {
        let table = PolicyTable::aicte();
        let rule = table.rule_for(facts.category).expect("aicte covers every category");
        let (breakdown, _) = score(&facts, &findings, rule);

        for value in [
            breakdown.financial,
            breakdown.faculty,
            breakdown.infra,
            breakdown.visual,
            breakdown.total,
        ] {
            prop_assert!((0.0..=100.0).contains(&value), "score out of range: {value}");
        }
    }

    #[test]
    fn scoring_is_a_pure_function(facts in arb_facts(), findings in arb_findings()) {
        let table = PolicyTable::aicte();
        let rule = table.rule_for(facts.category).expect("aicte covers every category");

        prop_assert_eq!(score(&facts, &findings, rule), score(&facts, &findings, rule));
    }

    #[test]
    fn strict_approval_means_no_reasons_but_the_default(
        facts in arb_facts(),
        findings in arb_findings()
    ) {
        let table = PolicyTable::aicte();
        let rule = table.rule_for(facts.category).expect("aicte covers every category");
        let (breakdown, flags) = score(&facts, &findings, rule);
        let report = VerdictBuilder::new(DecisionPolicy::Strict)
            .build(&facts, &findings, &breakdown, &flags);

        if flags.is_empty() {
            prop_assert_eq!(report.status(), DecisionStatus::Approved);
            prop_assert_eq!(report.final_decision.reasons, vec!["No issues found".to_string()]);
        } else {
            prop_assert_eq!(report.status(), DecisionStatus::Rejected);
            prop_assert_eq!(report.final_decision.reasons, flags.messages());
        }
    }

    #[test]
    fn clean_sections_score_full_marks(facts in arb_facts(), findings in arb_findings()) {
        let table = PolicyTable::aicte();
        let rule = table.rule_for(facts.category).expect("aicte covers every category");
        let (breakdown, flags) = score(&facts, &findings, rule);

        if flags.is_empty() {
            prop_assert_eq!(breakdown.total, 100.0);
        } else {
            prop_assert!(breakdown.total < 100.0);
        }
    }
}
