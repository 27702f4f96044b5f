mod common;

use common::{shared, text_map, KeyedSource};
use persondir_engine::{AttributeSource, PatternMatchMode, RegexGateway, StubSource};
use persondir_types::{AttributeError, AttributeMap, AttributeValue};
use std::collections::BTreeSet;
use std::sync::Arc;

fn mail_gateway(target: Arc<dyn AttributeSource>) -> RegexGateway {
    RegexGateway::new(target, [("mail", r".+@yahoo\.com")]).unwrap()
}

fn target() -> Arc<KeyedSource> {
    Arc::new(
        KeyedSource::new("yahoo", "mail")
            .with_entry("monkey@yahoo.com", text_map(&[("displayName", "Monkey")])),
    )
}

// ── Pattern matching ─────────────────────────────────────────────

#[test]
fn matching_seed_reaches_target() {
    let target = target();
    let gateway = mail_gateway(target.clone());

    let result = gateway
        .resolve(&text_map(&[("mail", "monkey@yahoo.com")]))
        .unwrap();

    assert_eq!(result, Some(text_map(&[("displayName", "Monkey")])));
    assert_eq!(target.seen(), vec![text_map(&[("mail", "monkey@yahoo.com")])]);
}

#[test]
fn non_matching_seed_skips_target() {
    let target = target();
    let gateway = mail_gateway(target.clone());

    assert_eq!(gateway.resolve(&text_map(&[("mail", "monkey")])).unwrap(), None);
    assert_eq!(target.calls(), 0);
}

#[test]
fn patterns_must_match_whole_value() {
    let gateway = RegexGateway::new(shared(StubSource::new("t", AttributeMap::new())), [(
        "username",
        "[a-z]+",
    )])
    .unwrap();
    assert!(gateway.matches(&text_map(&[("username", "edalquist")])).unwrap());
    assert!(!gateway.matches(&text_map(&[("username", "edalquist2")])).unwrap());
}

#[test]
fn absent_attribute_does_not_match() {
    let gateway = mail_gateway(target());
    assert!(!gateway.matches(&text_map(&[("username", "monkey")])).unwrap());
}

#[test]
fn all_patterns_required_by_default() {
    let gateway = RegexGateway::new(
        target(),
        [("mail", r".+@yahoo\.com"), ("username", "[a-z]+")],
    )
    .unwrap();

    let both = text_map(&[("mail", "monkey@yahoo.com"), ("username", "monkey")]);
    let one = text_map(&[("mail", "monkey@yahoo.com")]);

    assert!(gateway.matches(&both).unwrap());
    assert!(!gateway.matches(&one).unwrap());
}

#[test]
fn any_pattern_suffices_when_configured() {
    let gateway = RegexGateway::new(
        target(),
        [("mail", r".+@yahoo\.com"), ("username", "[a-z]+")],
    )
    .unwrap()
    .match_all_patterns(false);

    assert!(gateway.matches(&text_map(&[("username", "monkey")])).unwrap());
    assert!(!gateway.matches(&text_map(&[("username", "Monkey1")])).unwrap());
}

// ── Multi-valued attributes ──────────────────────────────────────

fn two_mails() -> AttributeMap {
    AttributeMap::new().with_values("mail", ["monkey@gmail.com", "monkey@yahoo.com"])
}

#[test]
fn any_value_mode_needs_one_match() {
    let gateway = mail_gateway(target());
    assert!(gateway.matches(&two_mails()).unwrap());
}

#[test]
fn all_value_mode_needs_every_value() {
    let gateway = mail_gateway(target()).with_value_mode(PatternMatchMode::All);
    assert!(!gateway.matches(&two_mails()).unwrap());

    let only_yahoo =
        AttributeMap::new().with_values("mail", ["a@yahoo.com", "b@yahoo.com"]);
    assert!(gateway.matches(&only_yahoo).unwrap());
}

#[test]
fn empty_value_list_never_matches() {
    let empty = AttributeMap::new().with_values("mail", Vec::<AttributeValue>::new());
    assert!(!mail_gateway(target()).matches(&empty).unwrap());
    assert!(
        !mail_gateway(target())
            .with_value_mode(PatternMatchMode::All)
            .matches(&empty)
            .unwrap()
    );
}

#[test]
fn null_values_never_match() {
    let seed = AttributeMap::new().with_values(
        "mail",
        [AttributeValue::Null, AttributeValue::from("monkey@yahoo.com")],
    );
    let gateway = mail_gateway(target());
    assert!(gateway.matches(&seed).unwrap());
    assert!(
        !gateway
            .with_value_mode(PatternMatchMode::All)
            .matches(&seed)
            .unwrap()
    );
}

// ── Errors ───────────────────────────────────────────────────────

#[test]
fn non_text_value_is_rejected() {
    let seed = AttributeMap::new().with_values(
        "mail",
        [AttributeValue::from("monkey@yahoo.com"), AttributeValue::Integer(42)],
    );
    let err = mail_gateway(target()).resolve(&seed).unwrap_err();
    assert_eq!(
        err,
        AttributeError::NonTextValue {
            attribute: "mail".to_string()
        }
    );
}

#[test]
fn invalid_pattern_is_rejected() {
    let err = RegexGateway::new(target(), [("mail", "(unclosed")]).err().unwrap();
    assert!(matches!(err, AttributeError::InvalidPattern { ref attribute, .. } if attribute == "mail"));
}

#[test]
fn empty_pattern_set_is_not_configured() {
    let err = RegexGateway::new(target(), Vec::<(String, String)>::new())
        .err()
        .unwrap();
    assert!(matches!(err, AttributeError::NotConfigured(_)));
}

// ── Delegation ───────────────────────────────────────────────────

#[test]
fn declared_names_come_from_target() {
    let gateway = mail_gateway(target());
    assert_eq!(
        gateway.possible_attribute_names().unwrap(),
        Some(BTreeSet::from(["displayName".to_string()]))
    );
    assert_eq!(
        gateway.available_query_attributes().unwrap(),
        Some(BTreeSet::from(["mail".to_string()]))
    );
    assert_eq!(gateway.name(), "gateway(yahoo)");
}
