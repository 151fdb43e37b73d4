use mindhaven_page::{Site, validate_email, validate_message};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseResult};

const FORM_PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/form_property_fuzz_test.txt";
const DEFAULT_FORM_PROPTEST_CASES: u32 = 128;

#[derive(Clone, Debug)]
enum UiAction {
    TypeName(String),
    TypeEmail(String),
    TypeMessage(String),
    SelectCategory(&'static str),
    SelectUrgency(&'static str),
    SetAnonymous(bool),
    BlurEmail,
    BlurMessage,
    ClickSubmit,
    OpenChat,
    SendChat(String),
    CloseChat,
    AdvanceTime(i64),
}

fn env_proptest_cases(var_name: &str, default_cases: u32) -> u32 {
    std::env::var(var_name)
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default_cases)
}

fn form_proptest_cases() -> u32 {
    std::env::var("MINDHAVEN_PAGE_FORM_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or_else(|| {
            env_proptest_cases("MINDHAVEN_PAGE_PROPTEST_CASES", DEFAULT_FORM_PROPTEST_CASES)
        })
}

fn emailish_strategy() -> BoxedStrategy<String> {
    vec(
        prop_oneof![
            Just('a'),
            Just('b'),
            Just('c'),
            Just('z'),
            Just('0'),
            Just('9'),
            Just('@'),
            Just('.'),
            Just('-'),
            Just('_'),
            Just('+'),
            Just(' '),
        ],
        0..=14,
    )
    .prop_map(|chars| chars.into_iter().collect())
    .boxed()
}

fn free_text_strategy() -> BoxedStrategy<String> {
    vec(
        prop_oneof![
            Just('a'),
            Just('e'),
            Just('m'),
            Just('x'),
            Just('1'),
            Just(' '),
            Just('\n'),
            Just('.'),
            Just('!'),
        ],
        0..=40,
    )
    .prop_map(|chars| chars.into_iter().collect())
    .boxed()
}

fn category_strategy() -> BoxedStrategy<&'static str> {
    prop_oneof![
        Just("general"),
        Just("support"),
        Just("feedback"),
        Just("emergency"),
    ]
    .boxed()
}

fn urgency_strategy() -> BoxedStrategy<&'static str> {
    prop_oneof![Just("low"), Just("medium"), Just("high"), Just("urgent")].boxed()
}

fn ui_action_strategy() -> BoxedStrategy<UiAction> {
    prop_oneof![
        3 => free_text_strategy().prop_map(UiAction::TypeName),
        4 => emailish_strategy().prop_map(UiAction::TypeEmail),
        4 => free_text_strategy().prop_map(UiAction::TypeMessage),
        3 => category_strategy().prop_map(UiAction::SelectCategory),
        2 => urgency_strategy().prop_map(UiAction::SelectUrgency),
        2 => any::<bool>().prop_map(UiAction::SetAnonymous),
        2 => Just(UiAction::BlurEmail),
        2 => Just(UiAction::BlurMessage),
        2 => Just(UiAction::ClickSubmit),
        1 => Just(UiAction::OpenChat),
        1 => free_text_strategy().prop_map(UiAction::SendChat),
        1 => Just(UiAction::CloseChat),
        2 => (0i64..=6000).prop_map(UiAction::AdvanceTime),
    ]
    .boxed()
}

fn ui_action_sequence_strategy() -> BoxedStrategy<Vec<UiAction>> {
    vec(ui_action_strategy(), 1..=32).boxed()
}

fn run_action(site: &mut Site, action: &UiAction) -> mindhaven_page::Result<()> {
    match action {
        UiAction::TypeName(value) => site.type_text("#name", value),
        UiAction::TypeEmail(value) => site.type_text("#email", value),
        UiAction::TypeMessage(value) => site.type_text("#message", value),
        UiAction::SelectCategory(value) => site.select_option("#category", value),
        UiAction::SelectUrgency(value) => site.select_option("#urgency", value),
        UiAction::SetAnonymous(value) => site.set_checked("#anonymous", *value),
        UiAction::BlurEmail => site.blur("#email"),
        UiAction::BlurMessage => site.blur("#message"),
        UiAction::ClickSubmit => site.click("#submit-button"),
        UiAction::OpenChat => site.click("#chat-button"),
        UiAction::SendChat(value) => {
            site.type_text("#chat-input", value)?;
            site.click("#send-chat")
        }
        UiAction::CloseChat => site.press_key(mindhaven_page::Key::Escape),
        UiAction::AdvanceTime(delta) => site.advance_time(*delta),
    }
}

fn assert_page_sequence_is_stable(seed: u64, actions: &[UiAction]) -> TestCaseResult {
    let mut site = Site::new();
    site.set_random_seed(seed);

    for (step, action) in actions.iter().enumerate() {
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            run_action(&mut site, action)
        }));

        match outcome {
            Err(_) => {
                prop_assert!(
                    false,
                    "action panicked at step {step}: {action:?}, actions={actions:?}"
                );
            }
            Ok(Err(error)) => {
                prop_assert!(
                    false,
                    "action returned error at step {step}: {action:?}, error={error:?}, actions={actions:?}"
                );
            }
            Ok(Ok(())) => {}
        }

        let state = site
            .form_state()
            .map_err(|err| proptest::test_runner::TestCaseError::fail(format!("{err:?}")))?;

        // The live counter always mirrors the message field.
        let counter = site
            .text_of(".character-counter")
            .map_err(|err| proptest::test_runner::TestCaseError::fail(format!("{err:?}")))?;
        prop_assert_eq!(
            counter,
            format!("{}/1000 characters", state.message.chars().count()),
            "stale counter after step {}: {:?}",
            step,
            action
        );

        // The emergency banner never duplicates, and tracks the category.
        let banners = site.count_with_class("emergency-warning");
        prop_assert!(
            banners <= 1,
            "duplicated emergency banner after step {step}: {action:?}"
        );
        if state.category == "emergency" {
            prop_assert_eq!(banners, 1);
            prop_assert_eq!(state.urgency.as_str(), "urgent");
        }

        // Anonymous mode keeps the identity fields empty.
        if state.anonymous {
            prop_assert!(state.name.is_empty());
            prop_assert!(state.email.is_empty());
        }

        // At most one inline annotation per validated field.
        prop_assert!(
            site.count_with_class("error-message") <= 3,
            "stacked annotations after step {step}: {action:?}"
        );
    }

    Ok(())
}

fn reference_email_check(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = trimmed.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    let domain_chars: Vec<char> = domain.chars().collect();
    domain_chars
        .iter()
        .enumerate()
        .any(|(index, ch)| *ch == '.' && index > 0 && index < domain_chars.len() - 1)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: form_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(FORM_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn page_action_sequences_keep_invariants(
        seed in any::<u64>(),
        actions in ui_action_sequence_strategy(),
    ) {
        assert_page_sequence_is_stable(seed, &actions)?;
    }

    #[test]
    fn email_rule_matches_reference_predicate(candidate in emailish_strategy()) {
        prop_assert_eq!(
            validate_email(&candidate).valid,
            reference_email_check(&candidate),
            "disagreement on {:?}",
            candidate
        );
    }

    #[test]
    fn message_rule_is_a_pure_length_window(length in 0usize..=1100) {
        let text = "x".repeat(length);
        let result = validate_message(&text);
        prop_assert_eq!(result.valid, (10..=1000).contains(&length));
        prop_assert_eq!(result.valid, result.error.is_none());
    }

    #[test]
    fn form_validation_verdict_is_stable(
        email in emailish_strategy(),
        message in free_text_strategy(),
        anonymous in any::<bool>(),
    ) {
        let mut site = Site::new();
        site.type_text("#email", &email).unwrap();
        site.type_text("#message", &message).unwrap();
        site.set_checked("#anonymous", anonymous).unwrap();

        let first = site.validate_form().unwrap();
        let annotations = site.count_with_class("error-message");
        let second = site.validate_form().unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(site.count_with_class("error-message"), annotations);
    }
}
