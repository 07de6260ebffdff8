use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::types::{PropertyId, PropertyName, PropertyValue};

/// Named attribute/value pair attachable to products, e.g. `color = red`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: PropertyId,
    pub name: PropertyName,
    pub value: PropertyValue,
}

impl Display for Property {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.value)
    }
}

/// Data required to insert a new [`Property`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProperty {
    pub name: PropertyName,
    pub value: PropertyValue,
}

/// Two properties in one set share a name once case is ignored.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("property name '{existing}' duplicates '{duplicate}' (names are case-insensitive)")]
pub struct DuplicatePropertyName {
    pub existing: String,
    pub duplicate: String,
}

/// A property with the same name and value exists once case is ignored.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("property '{existing}' already exists as '{duplicate}' (compared case-insensitively)")]
pub struct DuplicateProperty {
    pub existing: String,
    pub duplicate: String,
}

/// Checks that a product's property set has pairwise distinct names.
///
/// Entries are deduplicated by id first, so attaching a property that is
/// already present is not a conflict.
pub fn ensure_distinct_property_names<'a, I>(properties: I) -> Result<(), DuplicatePropertyName>
where
    I: IntoIterator<Item = &'a Property>,
{
    let mut seen_ids = HashSet::new();
    let mut seen_names: HashMap<String, &PropertyName> = HashMap::new();

    for property in properties {
        if !seen_ids.insert(property.id) {
            continue;
        }
        if let Some(existing) = seen_names.insert(property.name.normalized(), &property.name) {
            return Err(DuplicatePropertyName {
                existing: existing.to_string(),
                duplicate: property.name.to_string(),
            });
        }
    }

    Ok(())
}

/// Checks that no other property has the same name and value as `candidate`.
///
/// Both parts are compared ignoring case, so `color/red` and `COLOR/blue` may
/// coexist while `Fabric/Cotton` and `FABRIC/COTTON` may not. `candidate_id` is
/// the id of the property being updated, which may re-case itself.
pub fn ensure_unique_property<'a, I>(
    candidate: &NewProperty,
    candidate_id: Option<PropertyId>,
    existing: I,
) -> Result<(), DuplicateProperty>
where
    I: IntoIterator<Item = &'a Property>,
{
    match existing
        .into_iter()
        .filter(|p| Some(p.id) != candidate_id)
        .find(|p| {
            p.name.eq_ignore_case(&candidate.name) && p.value.eq_ignore_case(&candidate.value)
        })
    {
        Some(clash) => Err(DuplicateProperty {
            existing: clash.to_string(),
            duplicate: format!("{} {}", candidate.name, candidate.value),
        }),
        None => Ok(()),
    }
}
