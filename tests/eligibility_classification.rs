use regional_jobs_monitor::eligibility::{
    packs_for, Classifier, IndustryPack, Postcode, RuleSet, RuleSetError, State,
};

const RULES: &str = r#"{
    "version": "test",
    "definitions": {
        "regionalAustralia": {
            "NSW": ["2311-2312", "2328-2411"],
            "QLD": ["4870"],
            "SA": ["ALL"]
        },
        "remoteVeryRemoteByState": {
            "QLD": ["4825", "4890-4895"],
            "NT": ["ALL"]
        },
        "northernAustralia": {
            "ntAll": true,
            "postcodes": ["4825", "4870"]
        },
        "tourismExtraPostcodes": ["2450"]
    }
}"#;

fn classifier() -> Classifier {
    Classifier::new(RuleSet::from_json(RULES).expect("test rules compile"))
}

fn postcode(raw: &str) -> Postcode {
    Postcode::parse(raw).expect("valid postcode")
}

#[test]
fn state_is_a_pure_function_of_the_leading_digit() {
    assert_eq!(postcode("2000").state(), State::Nsw);
    assert_eq!(postcode("0800").state(), State::Nt);
    assert_eq!(postcode("9999").state(), State::Nt);
    // Same leading digit, wildly different suffix: same state.
    assert_eq!(postcode("2001").state(), postcode("2999").state());
}

#[test]
fn regional_membership_follows_ranges_and_missing_states_are_empty() {
    let classifier = classifier();
    assert!(classifier.is_regional(&postcode("2311")));
    assert!(classifier.is_regional(&postcode("2400")));
    assert!(!classifier.is_regional(&postcode("2313")));
    // VIC has no regional entry in this document.
    assert!(!classifier.is_regional(&postcode("3550")));
}

#[test]
fn all_sentinel_covers_the_entire_state() {
    let classifier = classifier();
    for raw in ["5000", "5290", "5734"] {
        assert!(
            classifier.is_regional(&postcode(raw)),
            "SA postcode {raw} should be regional via ALL"
        );
    }
    for raw in ["0800", "0872", "0886"] {
        assert!(
            classifier.is_remote_or_very_remote(&postcode(raw)),
            "NT postcode {raw} should be remote via ALL"
        );
    }
}

#[test]
fn tourism_postcodes_count_as_remote_independent_of_state_rules() {
    let classifier = classifier();
    let coffs = postcode("2450");
    // Absent from NSW's remote entry (there is none), present in tourism.
    assert!(classifier.is_remote_or_very_remote(&coffs));
    assert!(!classifier.is_remote_or_very_remote(&postcode("2451")));
}

#[test]
fn northern_membership_uses_nt_flag_and_explicit_list() {
    let classifier = classifier();
    assert!(classifier.is_northern(&postcode("0870")));
    assert!(classifier.is_northern(&postcode("4825")));
    assert!(classifier.is_northern(&postcode("4870")));
    assert!(!classifier.is_northern(&postcode("4000")));
}

#[test]
fn tiers_overlap_and_pack_selection_takes_the_union() {
    let classifier = classifier();

    // Northern + regional: every pack, exactly once.
    let cairns = classifier.tiers(&postcode("4870"));
    assert!(cairns.northern && cairns.regional);
    assert_eq!(packs_for(&cairns), IndustryPack::ordered());

    // Remote only: hospitality alone.
    let gulf_country = classifier.tiers(&postcode("4890"));
    assert!(gulf_country.remote_or_very_remote && !gulf_country.northern);
    assert_eq!(packs_for(&gulf_country), vec![IndustryPack::Hospitality]);
}

#[test]
fn postcode_with_no_tier_selects_no_packs() {
    let classifier = classifier();
    let sydney = classifier.tiers(&postcode("2000"));
    assert!(!sydney.any());
    assert!(packs_for(&sydney).is_empty());
}

#[test]
fn malformed_documents_fail_fast_with_named_problems() {
    let missing = RULES.replace(r#""tourismExtraPostcodes": ["2450"]"#, r#""unused": []"#);
    match RuleSet::from_json(&missing) {
        Err(RuleSetError::MissingSection(section)) => {
            assert_eq!(section, "definitions.tourismExtraPostcodes");
        }
        other => panic!("expected missing section, got {other:?}"),
    }

    let malformed = RULES.replace("4890-4895", "4890-48g5");
    match RuleSet::from_json(&malformed) {
        Err(RuleSetError::InvalidRangeSpec { spec }) => assert_eq!(spec, "4890-48g5"),
        other => panic!("expected invalid range spec, got {other:?}"),
    }
}

#[test]
fn candidate_postcodes_union_explicit_entries_and_skip_all_states() {
    let rules = RuleSet::from_json(RULES).expect("test rules compile");
    let candidates = rules.candidate_postcodes();

    // Tourism, northern, and enumerable range entries are all present.
    for raw in ["2450", "4825", "4870", "2311", "4890"] {
        assert!(
            candidates.contains(&postcode(raw)),
            "expected {raw} among candidates"
        );
    }
    // ALL states contribute nothing enumerable.
    assert!(!candidates.iter().any(|pc| pc.state() == State::Sa));
    assert!(!candidates.iter().any(|pc| pc.state() == State::Nt));
}
