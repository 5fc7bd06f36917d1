use proptest::prelude::*;
use roster_filter::{decode, encode, FilterState};

fn key_strategy() -> impl Strategy<Value = String> {
    // no '=', no whitespace, never ending in '!'
    "[a-z0-9_./-]{1,10}(![a-z0-9]{1,4})?"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_=!./-]{0,12}"
}

fn phone_strategy() -> impl Strategy<Value = String> {
    "[0-9+()-]{0,12}"
}

fn state_strategy() -> impl Strategy<Value = FilterState> {
    prop_oneof![
        (key_strategy(), value_strategy(), phone_strategy())
            .prop_map(|(k, v, p)| FilterState::new(k, v, p)),
        phone_strategy().prop_map(FilterState::phone),
    ]
}

#[test]
fn documented_search_strings() {
    assert_eq!(decode("phone=5551234"), FilterState::phone("5551234"));
    assert_eq!(decode("env=a=b"), FilterState::label("env", "a=b"));

    let combined = FilterState::new("team", "ops", "5551234");
    assert_eq!(decode("team=ops phone=5551234"), combined);
    assert_eq!(encode(&combined), "team=ops phone=5551234");

    assert_eq!(encode(&FilterState::default()), "");
    assert_eq!(decode(""), FilterState::default());
}

proptest! {
    #[test]
    fn prop_round_trip(state in state_strategy()) {
        prop_assume!(state.check_round_trip().is_ok());
        prop_assert_eq!(decode(&encode(&state)), state);
    }

    #[test]
    fn prop_decode_is_stable_after_one_round_trip(
        input in "[a-z0-9=/! ]{0,30}( phone=[0-9]{0,6})?"
    ) {
        let once = encode(&decode(&input));
        let twice = encode(&decode(&once));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_decode_never_yields_keyless_value(input in "[a-z =!]{0,20}( phone=[0-9]{0,5})?") {
        let state = decode(&input);
        prop_assert!(!state.label_key.is_empty() || state.label_value.is_empty());
    }

    #[test]
    fn prop_decode_is_total(input in "\\PC{0,60}") {
        let state = decode(&input);
        let _ = encode(&state);
    }

    #[test]
    fn prop_encode_has_no_stray_spaces(state in state_strategy()) {
        let search = encode(&state);
        prop_assert_eq!(search.trim(), search.as_str());
        prop_assert!(!search.contains("  "));
    }
}
