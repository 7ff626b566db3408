//! # Child Aggregation
//!
//! Children are reported through many conventions at once: arrays of ages,
//! arrays of objects, maps keyed `enfant_1`, `enfant-2`, and flat root keys
//! `age_enfant_N`, `date_naissance_enfant_N`, `prenom_enfant_N`. This module
//! gathers three kinds of evidence (ages in order of discovery, birthdates by
//! index, first names by index) and reconciles them into one child list.
//!
//! ## Duplicate containers
//!
//! The same list is often repeated under two paths (`enfants` and
//! `situation.enfants`). Each container is identified by its
//! [`StructuralSignature`]; a container whose signature was already seen
//! contributes nothing.
//!
//! ## Count
//!
//! With a declared count `n`: `max(n, birthdate slots, first-name slots)`.
//! Without one: `max(ages found, birthdate slots, first-name slots)`.
//! The age list is truncated or padded to the count. A slot's age comes from
//! its birthdate when one parses, else from the age evidence, else
//! [`DEFAULT_CHILD_AGE`].

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use facilaide_core::coerce::to_number;
use facilaide_core::path::lookup;
use facilaide_core::record::DEFAULT_CHILD_AGE;
use facilaide_core::temporal::{age_at_end_of_month, is_valid_age, parse_date, parse_date_str};
use facilaide_core::{ChildRecord, SimulationMonth, StructuralSignature};
use serde_json::{Map, Value};

use crate::fields::{first_name, CHILD_BIRTHDATE_KEYS, CHILD_CONTAINERS, CHILD_COUNT};

/// Upper bound on the number of children materialized from one input.
pub const MAX_CHILDREN: usize = 32;

/// Keys of a child object that may hold its age.
const AGE_KEYS: &[&str] = &["age", "age_enfant", "valeur", "value"];

/// Keys of a child object holding nested child lists.
const NESTED_LIST_KEYS: &[&str] = &["enfants", "children", "details"];

// ---------------------------------------------------------------------------
// Indexed keys
// ---------------------------------------------------------------------------

fn parse_digits(s: &str) -> Option<usize> {
    (!s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .then(|| s.parse().ok())
        .flatten()
}

/// `prefix` immediately followed by digits and nothing else.
fn exact_index(key: &str, prefix: &str) -> Option<usize> {
    key.strip_prefix(prefix).and_then(parse_digits)
}

/// Same as [`exact_index`], ignoring ASCII case.
fn exact_index_ignore_case(key: &str, prefix: &str) -> Option<usize> {
    exact_index(&key.to_ascii_lowercase(), prefix)
}

/// Number following the first `enfant`, `enfant_` or `enfant-` in `key`,
/// ignoring ASCII case (`Enfant2`, `infos_enfant-3`).
fn embedded_child_number(key: &str) -> Option<usize> {
    let lowered = key.to_ascii_lowercase();
    lowered.match_indices("enfant").find_map(|(pos, word)| {
        let rest = &lowered[pos + word.len()..];
        let rest = rest
            .strip_prefix('_')
            .or_else(|| rest.strip_prefix('-'))
            .filter(|r| r.starts_with(|c: char| c.is_ascii_digit()))
            .unwrap_or(rest);
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        parse_digits(&rest[..end])
    })
}

/// Zero-based slot for a one-based child number.
fn slot(number: usize) -> Option<usize> {
    number.checked_sub(1)
}

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct ChildEvidence {
    ages: Vec<f64>,
    birthdates: BTreeMap<usize, NaiveDate>,
    first_names: BTreeMap<usize, String>,
}

impl ChildEvidence {
    fn birthdate_slots(&self) -> usize {
        self.birthdates.keys().next_back().map_or(0, |i| i + 1)
    }

    fn first_name_slots(&self) -> usize {
        self.first_names.keys().next_back().map_or(0, |i| i + 1)
    }

    fn assign_birthdate(&mut self, index: usize, date: Option<NaiveDate>) {
        if let Some(date) = date {
            self.birthdates.entry(index).or_insert(date);
        }
    }

    fn assign_first_name(&mut self, index: usize, name: Option<String>) {
        if let Some(name) = name {
            self.first_names.entry(index).or_insert(name);
        }
    }

    /// Birthdate and first name carried by one child item.
    fn inspect_item(&mut self, index: usize, item: &Value) {
        self.assign_birthdate(index, item_birthdate(item));
        self.assign_first_name(index, item_first_name(item));
    }

    fn inspect_container(&mut self, container: &Value) {
        match container {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.inspect_item(index, item);
                }
            }
            Value::Object(map) => {
                for (key, child) in map {
                    if let Some(index) = embedded_child_number(key).and_then(slot) {
                        self.inspect_item(index, child);
                    }
                }
            }
            _ => {}
        }
        collect_ages(container, &mut self.ages);
    }
}

/// A child item's birthdate: a named birthdate field of an object, or a
/// non-numeric date string.
fn item_birthdate(item: &Value) -> Option<NaiveDate> {
    match item {
        Value::Object(map) => CHILD_BIRTHDATE_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|v| !v.is_null())
            .and_then(parse_date),
        Value::String(s) if to_number(item).is_none() => parse_date_str(s),
        _ => None,
    }
}

/// A child item's first name. Numeric and date strings are not names.
fn item_first_name(item: &Value) -> Option<String> {
    match item {
        Value::String(s) if to_number(item).is_some() || parse_date_str(s).is_some() => None,
        Value::Number(_) => None,
        other => first_name(other),
    }
}

/// Every age found in a child container, in discovery order.
fn collect_ages(value: &Value, ages: &mut Vec<f64>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_ages(item, ages);
            }
        }
        Value::Number(_) | Value::String(_) => ages.extend(to_number(value)),
        Value::Object(map) => {
            ages.extend(
                AGE_KEYS
                    .iter()
                    .filter_map(|key| map.get(*key))
                    .filter_map(to_number),
            );
            for key in NESTED_LIST_KEYS {
                if let Some(Value::Array(items)) = map.get(*key) {
                    for item in items {
                        collect_ages(item, ages);
                    }
                }
            }
            for (key, child) in map {
                if exact_index(key, "enfant_").is_some() {
                    collect_ages(child, ages);
                }
            }
        }
        _ => {}
    }
}

/// Root-level `enfant_N` entries gathered into one map container.
fn root_indexed_children(root: &Map<String, Value>) -> Option<Value> {
    let entries: Map<String, Value> = root
        .iter()
        .filter(|(key, _)| exact_index(key, "enfant_").is_some())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    (!entries.is_empty()).then_some(Value::Object(entries))
}

/// Root keys `<prefix>N` (or `enfant_N<suffix>`), sorted by `N`.
fn sorted_root_keys<'a>(
    root: &'a Map<String, Value>,
    index_of: impl Fn(&str) -> Option<usize>,
) -> Vec<(usize, &'a Value)> {
    let mut found: Vec<(usize, &Value)> = root
        .iter()
        .filter_map(|(key, value)| index_of(key).map(|n| (n, value)))
        .collect();
    found.sort_by_key(|(n, _)| *n);
    found
}

fn gather_evidence(raw: &Value) -> ChildEvidence {
    let mut evidence = ChildEvidence::default();
    let mut seen: HashSet<StructuralSignature> = HashSet::new();

    let root = raw.as_object();
    let synthetic = root.and_then(root_indexed_children);
    let containers = CHILD_CONTAINERS
        .iter()
        .filter_map(|path| lookup(raw, path))
        .chain(synthetic.as_ref());

    for container in containers {
        if let Ok(signature) = StructuralSignature::of_value(container) {
            if !seen.insert(signature) {
                tracing::debug!("skipping duplicate child container");
                continue;
            }
        }
        evidence.inspect_container(container);
    }

    let Some(root) = root else {
        return evidence;
    };

    for (_, value) in sorted_root_keys(root, |k| exact_index(k, "age_enfant_")) {
        evidence.ages.extend(to_number(value));
    }
    for (n, value) in sorted_root_keys(root, |k| exact_index_ignore_case(k, "date_naissance_enfant_")) {
        if let Some(index) = slot(n) {
            evidence.assign_birthdate(index, parse_date(value));
        }
    }
    let first_name_number = |key: &str| {
        exact_index_ignore_case(key, "prenom_enfant_").or_else(|| {
            let lowered = key.to_ascii_lowercase();
            lowered
                .strip_prefix("enfant_")
                .and_then(|rest| rest.strip_suffix("_prenom"))
                .and_then(parse_digits)
        })
    };
    for (n, value) in sorted_root_keys(root, first_name_number) {
        if let Some(index) = slot(n) {
            evidence.assign_first_name(index, first_name(value));
        }
    }

    evidence
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Resolve the child list of `raw` as of the end of `month`.
pub fn resolve_children(raw: &Value, month: SimulationMonth) -> Vec<ChildRecord> {
    let evidence = gather_evidence(raw);
    let declared = CHILD_COUNT.resolve(raw).map(|n| n.round().max(0.0));

    let inferred_floor = evidence.birthdate_slots().max(evidence.first_name_slots());
    let uncapped = match declared {
        Some(n) if n > MAX_CHILDREN as f64 => MAX_CHILDREN + 1,
        Some(n) => (n as usize).max(inferred_floor),
        None => evidence.ages.len().max(inferred_floor),
    };
    let count = if uncapped > MAX_CHILDREN {
        tracing::warn!(
            requested = uncapped,
            limit = MAX_CHILDREN,
            "child count exceeds limit, truncating"
        );
        MAX_CHILDREN
    } else {
        uncapped
    };

    let children: Vec<ChildRecord> = (0..count)
        .map(|i| {
            let birthdate = evidence.birthdates.get(&i).copied();
            let age = birthdate
                .and_then(|d| age_at_end_of_month(d, month))
                .map(f64::from)
                .or_else(|| evidence.ages.get(i).copied().filter(|a| is_valid_age(*a)))
                .unwrap_or(DEFAULT_CHILD_AGE);
            ChildRecord {
                age,
                birthdate,
                first_name: evidence.first_names.get(&i).cloned(),
            }
        })
        .collect();

    tracing::debug!(
        children = children.len(),
        declared = ?declared,
        ages_found = evidence.ages.len(),
        "resolved children"
    );
    children
}
