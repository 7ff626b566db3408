//! # Person Labels
//!
//! Display names for the payload's individuals (`individu_1`, `individu_2`,
//! `enfant_N`), used when presenting results to the household. Names are
//! discovered from role-prefixed keys, role containers and child lists;
//! unnamed people get a generic label.

use std::collections::BTreeMap;

use facilaide_core::coerce::{non_empty_text, to_number};
use facilaide_core::path::lookup;
use serde_json::{Map, Value};

/// Label of `individu_1` when no name is found.
pub const DEFAULT_CLAIMANT_LABEL: &str = "le demandeur";
/// Label of `individu_2` when no name is found.
pub const DEFAULT_PARTNER_LABEL: &str = "le conjoint";

/// Key fragments marking a first-name field, by priority. Each inner slice
/// is one pattern; a key matches when it contains any of its fragments.
const FIRST_NAME_PATTERNS: &[&[&str]] = &[
    &["prenom"],
    &["prénom"],
    &["firstname", "first_name", "first-name"],
    &["givenname", "given_name", "given-name"],
];

/// Fallback patterns for a generic name field.
const NAME_PATTERNS: &[&[&str]] = &[&["nom"], &["name"]];

const ROLE_FIELDS: &[&str] = &["prenom", "prénom", "first_name", "firstname", "firstName"];
const NESTED_ROLE_FIELDS: &[&str] = &["prenom", "first_name", "firstname", "firstName"];
const CHILD_FIELDS: &[&str] = &["prenom", "first_name", "firstname"];

fn lookup_segments<'a>(raw: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let path: Vec<&str> = segments.iter().map(String::as_str).collect();
    lookup(raw, &path)
}

fn segments(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| (*s).to_string()).collect()
}

/// First string value whose key matches one of `patterns`, patterns taken
/// in priority order.
fn find_name_in_object(map: &Map<String, Value>, patterns: &[&[&str]]) -> Option<String> {
    patterns.iter().find_map(|fragments| {
        map.iter()
            .filter(|(key, _)| {
                let lowered = key.to_lowercase();
                fragments.iter().any(|f| lowered.contains(f))
            })
            .find_map(|(_, value)| non_empty_text(value))
    })
}

fn find_any_name(value: Option<&Value>) -> Option<String> {
    let map = value?.as_object()?;
    find_name_in_object(map, FIRST_NAME_PATTERNS).or_else(|| find_name_in_object(map, NAME_PATTERNS))
}

fn role_candidate_paths(role: &str) -> Vec<Vec<String>> {
    let mut paths: Vec<Vec<String>> = [
        format!("{role}_prenom"),
        format!("{role}_prénom"),
        format!("{role}_first_name"),
        format!("{role}_firstname"),
        format!("{role}_firstName"),
        format!("{role}Prenom"),
        format!("{role}FirstName"),
        format!("prenom_{role}"),
        format!("first_name_{role}"),
        format!("firstname_{role}"),
    ]
    .into_iter()
    .map(|key| vec![key])
    .collect();

    // Deeper containers only use the unaccented spellings.
    let prefixes: [(&[&str], &[&str]); 6] = [
        (&[], ROLE_FIELDS),
        (&["personnes"], ROLE_FIELDS),
        (&["situation"], NESTED_ROLE_FIELDS),
        (&["situation", "personnes"], NESTED_ROLE_FIELDS),
        (&["menage"], NESTED_ROLE_FIELDS),
        (&["menage", "personnes"], NESTED_ROLE_FIELDS),
    ];
    for (prefix, fields) in prefixes {
        for field in fields {
            let mut path = segments(prefix);
            path.push(role.to_string());
            path.push(field.to_string());
            paths.push(path);
        }
    }
    paths
}

fn role_containers<'a>(raw: &'a Value, role: &str) -> Vec<Option<&'a Value>> {
    [
        &[][..],
        &["personnes"][..],
        &["situation"][..],
        &["situation", "personnes"][..],
        &["menage"][..],
        &["menage", "personnes"][..],
    ]
    .iter()
    .map(|prefix| {
        let mut path = segments(prefix);
        path.push(role.to_string());
        lookup_segments(raw, &path)
    })
    .collect()
}

/// First name of an adult role (`demandeur` or `conjoint`).
pub fn role_name(raw: &Value, role: &str) -> Option<String> {
    if let Some(name) = role_candidate_paths(role)
        .iter()
        .find_map(|path| lookup_segments(raw, path).and_then(non_empty_text))
    {
        return Some(name);
    }
    let containers = role_containers(raw, role);
    containers
        .iter()
        .find_map(|c| c.and_then(Value::as_object).and_then(|m| find_name_in_object(m, FIRST_NAME_PATTERNS)))
        .or_else(|| {
            containers
                .iter()
                .find_map(|c| c.and_then(Value::as_object).and_then(|m| find_name_in_object(m, NAME_PATTERNS)))
        })
}

/// A child name: non-empty text that is not a number.
fn child_text(value: &Value) -> Option<String> {
    if to_number(value).is_some() {
        return None;
    }
    non_empty_text(value)
}

fn child_candidate_paths(number: usize) -> Vec<Vec<String>> {
    let index = (number - 1).to_string();
    let mut paths = vec![
        vec![format!("enfant_{number}_prenom")],
        vec![format!("enfant{number}_prenom")],
        vec![format!("prenom_enfant_{number}")],
        vec![format!("first_name_enfant_{number}")],
    ];
    for field in CHILD_FIELDS {
        paths.push(vec![format!("enfant_{number}"), field.to_string()]);
    }
    for field in CHILD_FIELDS {
        paths.push(vec!["enfant".into(), index.clone(), field.to_string()]);
    }
    for prefix in [&["enfants"][..], &["situation", "enfants"][..]] {
        let mut item = segments(prefix);
        item.push(index.clone());
        paths.push(item.clone());
        for field in CHILD_FIELDS {
            let mut path = item.clone();
            path.push(field.to_string());
            paths.push(path);
        }
    }
    for prefix in [&["personnes", "enfants"][..], &["menage", "enfants"][..]] {
        for field in CHILD_FIELDS {
            let mut path = segments(prefix);
            path.push(index.clone());
            path.push(field.to_string());
            paths.push(path);
        }
    }
    paths
}

/// First name of the child numbered `number` (1-based).
pub fn child_name(raw: &Value, number: usize) -> Option<String> {
    if number == 0 {
        return None;
    }
    if let Some(name) = child_candidate_paths(number)
        .iter()
        .find_map(|path| lookup_segments(raw, path).and_then(child_text))
    {
        return Some(name);
    }
    let index = (number - 1).to_string();
    [
        &["enfants"][..],
        &["situation", "enfants"][..],
        &["personnes", "enfants"][..],
        &["menage", "enfants"][..],
    ]
    .iter()
    .find_map(|prefix| {
        let mut path = segments(prefix);
        path.push(index.clone());
        let item = lookup_segments(raw, &path)?;
        match item {
            Value::String(_) => child_text(item),
            Value::Object(_) => find_any_name(Some(item)),
            _ => None,
        }
    })
}

/// Display labels for `individu_1`, `individu_2` and `enfant_1..=child_count`.
pub fn person_labels(raw: &Value, child_count: usize) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(
        "individu_1".to_string(),
        role_name(raw, "demandeur").unwrap_or_else(|| DEFAULT_CLAIMANT_LABEL.to_string()),
    );
    labels.insert(
        "individu_2".to_string(),
        role_name(raw, "conjoint").unwrap_or_else(|| DEFAULT_PARTNER_LABEL.to_string()),
    );
    for number in 1..=child_count {
        labels.insert(
            format!("enfant_{number}"),
            child_name(raw, number).unwrap_or_else(|| format!("enfant {number}")),
        );
    }
    labels
}
