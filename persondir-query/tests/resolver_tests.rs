use persondir_query::{
    AttributeNameMapping, CaseCanonicalization, CaseRule, QueryAttributeResolver, QueryPlan,
    QueryType, WildcardTranslation,
};
use persondir_types::{AttributeMap, AttributeValue, DefaultAttribute};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn text(s: &str) -> AttributeValue {
    AttributeValue::Text(s.to_string())
}

fn student_mapping() -> AttributeNameMapping {
    AttributeNameMapping::new()
        .bind("username", ["netid"])
        .bind("mail", ["email", "alt_email"])
}

// ── Default attribute ────────────────────────────────────────────

#[test]
fn default_attribute_builds_one_argument() {
    let resolver = QueryAttributeResolver::new(DefaultAttribute::default());
    let seed = AttributeMap::new().with_value("username", "edalquist");

    let query = resolver.resolve(&seed).into_query().unwrap();
    assert_eq!(query.arguments.len(), 1);
    assert_eq!(query.arguments[0].attribute, "username");
    assert_eq!(query.arguments[0].data_attribute, "username");
    assert_eq!(query.positional_values(), vec![&text("edalquist")]);
}

#[test]
fn default_attribute_absent_is_insufficient() {
    let resolver = QueryAttributeResolver::new(DefaultAttribute::default());
    let seed = AttributeMap::new().with_value("mail", "e@x");
    assert_eq!(resolver.resolve(&seed), QueryPlan::Insufficient);
}

#[test]
fn other_seed_attributes_are_ignored_by_default() {
    let resolver = QueryAttributeResolver::new(DefaultAttribute::new("uid"));
    let seed = AttributeMap::new()
        .with_value("uid", "e")
        .with_value("mail", "e@x");
    let query = resolver.resolve(&seed).into_query().unwrap();
    assert_eq!(query.arguments.len(), 1);
    assert_eq!(query.arguments[0].attribute, "uid");
}

#[test]
fn use_all_binds_every_seed_attribute() {
    let resolver =
        QueryAttributeResolver::new(DefaultAttribute::default()).use_all_query_attributes(true);
    let seed = AttributeMap::new()
        .with_value("username", "e")
        .with_value("mail", "e@x");
    let query = resolver.resolve(&seed).into_query().unwrap();
    let bound: Vec<_> = query.arguments.iter().map(|a| a.attribute.as_str()).collect();
    assert_eq!(bound, vec!["mail", "username"]);
    assert_eq!(resolver.available_query_attributes(), None);
}

// ── Explicit mapping ─────────────────────────────────────────────

#[test]
fn mapping_binds_in_declared_order() {
    let resolver =
        QueryAttributeResolver::new(DefaultAttribute::default()).with_mapping(student_mapping());
    let seed = AttributeMap::new()
        .with_value("mail", "e@x")
        .with_value("username", "edalquist");

    let query = resolver.resolve(&seed).into_query().unwrap();
    let columns: Vec<_> = query
        .arguments
        .iter()
        .map(|a| a.data_attribute.as_str())
        .collect();
    assert_eq!(columns, vec!["netid", "email", "alt_email"]);
    assert_eq!(
        query.positional_values(),
        vec![&text("edalquist"), &text("e@x"), &text("e@x")]
    );
}

#[test]
fn mapping_skips_absent_attributes_when_not_required() {
    let resolver =
        QueryAttributeResolver::new(DefaultAttribute::default()).with_mapping(student_mapping());
    let seed = AttributeMap::new().with_value("mail", "e@x");
    let query = resolver.resolve(&seed).into_query().unwrap();
    assert!(query.arguments.iter().all(|a| a.attribute == "mail"));
}

#[test]
fn require_all_aborts_on_missing_attribute() {
    let resolver = QueryAttributeResolver::new(DefaultAttribute::default())
        .with_mapping(student_mapping())
        .require_all_query_attributes(true);
    let seed = AttributeMap::new().with_value("mail", "e@x");
    assert_eq!(resolver.resolve(&seed), QueryPlan::Insufficient);
}

#[test]
fn require_all_passes_when_everything_present() {
    let resolver = QueryAttributeResolver::new(DefaultAttribute::default())
        .with_mapping(student_mapping())
        .require_all_query_attributes(true);
    let seed = AttributeMap::new()
        .with_value("mail", "e@x")
        .with_value("username", "e");
    assert!(matches!(resolver.resolve(&seed), QueryPlan::Ready(_)));
}

#[test]
fn mapping_with_no_present_attribute_is_insufficient() {
    let resolver =
        QueryAttributeResolver::new(DefaultAttribute::default()).with_mapping(student_mapping());
    let seed = AttributeMap::new().with_value("phone", "555");
    assert_eq!(resolver.resolve(&seed), QueryPlan::Insufficient);
}

#[test]
fn identity_entry_binds_under_own_name() {
    let mapping = AttributeNameMapping::new().identity("studentId");
    let resolver = QueryAttributeResolver::new(DefaultAttribute::default()).with_mapping(mapping);
    let seed = AttributeMap::new().with_value("studentId", 123i64);
    let query = resolver.resolve(&seed).into_query().unwrap();
    assert_eq!(query.arguments[0].data_attribute, "studentId");
    assert_eq!(query.positional_values(), vec![&AttributeValue::Integer(123)]);
}

#[test]
fn null_only_values_count_as_absent() {
    let resolver = QueryAttributeResolver::new(DefaultAttribute::default());
    let seed = AttributeMap::new().with_values("username", [AttributeValue::Null]);
    assert_eq!(resolver.resolve(&seed), QueryPlan::Insufficient);
}

#[test]
fn available_query_attributes_follow_mapping() {
    let mapped =
        QueryAttributeResolver::new(DefaultAttribute::default()).with_mapping(student_mapping());
    let expected: BTreeSet<String> = ["mail", "username"].into_iter().map(String::from).collect();
    assert_eq!(mapped.available_query_attributes(), Some(expected));

    let plain = QueryAttributeResolver::new(DefaultAttribute::new("uid"));
    assert_eq!(
        plain.available_query_attributes(),
        Some(BTreeSet::from(["uid".to_string()]))
    );
}

#[test]
fn query_type_is_carried() {
    let resolver =
        QueryAttributeResolver::new(DefaultAttribute::default()).with_query_type(QueryType::Or);
    let seed = AttributeMap::new().with_value("username", "e");
    assert_eq!(resolver.resolve(&seed).into_query().unwrap().query_type, QueryType::Or);
}

// ── Wildcards ────────────────────────────────────────────────────

#[test]
fn wildcard_is_translated_to_pattern_token() {
    let resolver = QueryAttributeResolver::new(DefaultAttribute::default());
    let seed = AttributeMap::new().with_value("username", "edal*");
    let query = resolver.resolve(&seed).into_query().unwrap();
    assert_eq!(query.arguments[0].values, vec![text("edal%")]);
    assert!(query.arguments[0].wildcard);
}

#[test]
fn plain_value_is_not_wildcard() {
    let resolver = QueryAttributeResolver::new(DefaultAttribute::default());
    let seed = AttributeMap::new().with_value("username", "edalquist");
    let query = resolver.resolve(&seed).into_query().unwrap();
    assert!(!query.arguments[0].wildcard);
}

#[test]
fn custom_wildcard_translation() {
    let resolver = QueryAttributeResolver::new(DefaultAttribute::default())
        .with_wildcard(WildcardTranslation::new("?", "*"));
    let seed = AttributeMap::new().with_value("username", "e?");
    let query = resolver.resolve(&seed).into_query().unwrap();
    assert_eq!(query.arguments[0].values, vec![text("e*")]);
}

// ── Case handling ────────────────────────────────────────────────

#[test]
fn case_insensitive_attribute_folds_value_and_column_independently() {
    let resolver = QueryAttributeResolver::new(DefaultAttribute::default()).case_insensitive(
        "username",
        CaseRule {
            value: CaseCanonicalization::Lower,
            column: CaseCanonicalization::Upper,
        },
    );
    let seed = AttributeMap::new().with_value("username", "EDalquist");
    let query = resolver.resolve(&seed).into_query().unwrap();
    let arg = &query.arguments[0];
    assert_eq!(arg.values, vec![text("edalquist")]);
    assert!(arg.case_insensitive);
    assert_eq!(arg.column_case, CaseCanonicalization::Upper);
}

#[test]
fn case_sensitive_attribute_is_left_alone() {
    let resolver = QueryAttributeResolver::new(DefaultAttribute::default())
        .case_insensitive("mail", CaseRule::both(CaseCanonicalization::Lower));
    let seed = AttributeMap::new().with_value("username", "EDalquist");
    let arg = &resolver.resolve(&seed).into_query().unwrap().arguments[0];
    assert_eq!(arg.values, vec![text("EDalquist")]);
    assert!(!arg.case_insensitive);
    assert_eq!(arg.column_case, CaseCanonicalization::None);
}
