//! Property-based tests for the rule library.

use formguard_rules::prelude::*;
use formguard_rules::messages;
use proptest::prelude::*;

fn eval(rule: RuleName, value: &str, options: &RuleOptions) -> RuleOutcome {
    rule.evaluate(&FieldValue::text(value), options, &NoEnv)
        .expect("rule should not report a configuration error")
}

fn optional_message_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![Just(None), "[a-zA-Z0-9 ]{1,50}".prop_map(Some)]
}

proptest! {
    // Non-empty text always passes presence.
    #[test]
    fn presence_accepts_non_empty(value in ".{1,40}") {
        prop_assert!(eval(RuleName::Presence, &value, &RuleOptions::new()).is_success());
    }

    // A failing rule reports the custom message verbatim.
    #[test]
    fn failure_uses_custom_message(message in optional_message_strategy()) {
        let mut options = RuleOptions::new();
        options.failure_msg = message.clone();
        let outcome = eval(RuleName::Presence, "", &options);
        let expected = message.unwrap_or_else(|| messages::PRESENCE.to_string());
        prop_assert_eq!(outcome.message(), Some(expected.as_str()));
    }

    // Integers inside [min, max] pass, outside fail with the side's message.
    #[test]
    fn numericality_range(value in -1000i64..1000, min in -500i64..0, max in 0i64..500) {
        let options = RuleOptions::new().with_range(min as f64, max as f64);
        let outcome = eval(RuleName::Numericality, &value.to_string(), &options);
        let too_low = messages::too_low(min as f64);
        let too_high = messages::too_high(max as f64);
        if value < min {
            prop_assert_eq!(outcome.message(), Some(too_low.as_str()));
        } else if value > max {
            prop_assert_eq!(outcome.message(), Some(too_high.as_str()));
        } else {
            prop_assert!(outcome.is_success());
        }
    }

    // Letters never pass numericality.
    #[test]
    fn numericality_rejects_letters(value in "[a-zA-Z]{1,10}") {
        let outcome = eval(RuleName::Numericality, &value, &RuleOptions::new());
        prop_assert_eq!(outcome.message(), Some(messages::NOT_A_NUMBER));
    }

    // size counts characters, not bytes.
    #[test]
    fn size_counts_chars(value in "[a-z\u{4E00}-\u{4E20}]{0,20}", is in 0usize..20) {
        let options = RuleOptions::new().with_is(is as f64);
        let outcome = eval(RuleName::Size, &value, &options);
        prop_assert_eq!(outcome.is_success(), value.chars().count() == is);
    }

    // exclusion is the exact opposite of inclusion for present values.
    #[test]
    fn exclusion_inverts_inclusion(
        value in "[a-c]{1,2}",
        within in proptest::collection::vec("[a-c]{1,2}", 0..5),
        partial in any::<bool>(),
    ) {
        let mut options = RuleOptions::new().with_within(within);
        options.partial_match = partial;
        let included = eval(RuleName::Inclusion, &value, &options).is_success();
        let excluded = eval(RuleName::Exclusion, &value, &options).is_success();
        prop_assert_ne!(included, excluded);
    }

    // With partial matching, any substring of a candidate is listed, and so
    // is any value containing one.
    #[test]
    fn partial_inclusion_matches_both_ways(
        candidate in "[a-z]{2,8}",
        cut in 1usize..8,
        suffix in "[a-z]{0,4}",
    ) {
        let options = RuleOptions::new().with_within([candidate.clone()]).partial();
        let prefix: String = candidate.chars().take(cut).collect();
        let longer = format!("{candidate}{suffix}");
        prop_assert!(eval(RuleName::Inclusion, &prefix, &options).is_success());
        prop_assert!(eval(RuleName::Inclusion, &longer, &options).is_success());
    }

    // Negating format flips every verdict.
    #[test]
    fn negated_format_flips(value in "[a-z0-9]{0,8}") {
        let plain = RuleOptions::new().with_pattern(r"^[0-9]+$").unwrap();
        let negated = plain.clone().negated();
        prop_assert_ne!(
            eval(RuleName::Format, &value, &plain).is_success(),
            eval(RuleName::Format, &value, &negated).is_success()
        );
    }

    // Rule lists parse back to the same names.
    #[test]
    fn rule_list_parses(indices in proptest::collection::vec(0usize..13, 0..6)) {
        let names: Vec<RuleName> = indices.iter().map(|&i| RuleName::ALL[i]).collect();
        let list = names.iter().map(|n| n.as_str()).collect::<Vec<_>>().join(" ");
        prop_assert_eq!(RuleName::parse_list(&list), Ok(names));
    }
}

#[test]
fn size_without_limits_is_a_config_error() {
    let result = RuleName::Size.evaluate(&FieldValue::text("abc"), &RuleOptions::new(), &NoEnv);
    assert_eq!(result, Err(RuleConfigError::MissingSize));
}

#[test]
fn only_integer_rejects_trailing_zero_fractions() {
    let options = RuleOptions::new().integer_only();
    for value in ["5.", "5.0", "5.00", "5.5"] {
        assert_eq!(
            eval(RuleName::Numericality, value, &options).message(),
            Some(messages::NOT_AN_INTEGER),
            "{value}"
        );
    }
    assert!(eval(RuleName::Numericality, "5", &options).is_success());
}
