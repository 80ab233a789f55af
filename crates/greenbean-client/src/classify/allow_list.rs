use std::collections::BTreeMap;
use std::fs;

use serde_json::Value;

use super::normalize::normalize_product_name;
use crate::config::AllowListSource;
use crate::{ClientError, ClientResult};

const BUNDLED_ALLOW_LIST: &str = include_str!("default_allow_list.json");

/// Product names that count toward sustainable spend, keyed by their
/// normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    entries: BTreeMap<String, bool>,
    source: AllowListSource,
}

impl AllowList {
    pub fn bundled() -> ClientResult<Self> {
        Self::from_json_str(BUNDLED_ALLOW_LIST, AllowListSource::Bundled)
    }

    pub fn load(source: &AllowListSource) -> ClientResult<Self> {
        match source {
            AllowListSource::Bundled => Self::bundled(),
            AllowListSource::File(path) => {
                let content = fs::read_to_string(path).map_err(|error| {
                    ClientError::invalid_allow_list(&source.describe(), &error.to_string())
                })?;
                Self::from_json_str(&content, source.clone())
            }
        }
    }

    /// Parses a JSON object of `"PRODUCT NAME": true|false` pairs.
    pub fn from_json_str(content: &str, source: AllowListSource) -> ClientResult<Self> {
        let parsed = serde_json::from_str::<Value>(content).map_err(|error| {
            ClientError::invalid_allow_list(&source.describe(), &error.to_string())
        })?;

        let Some(object) = parsed.as_object() else {
            return Err(ClientError::invalid_allow_list(
                &source.describe(),
                "top-level value must be a JSON object",
            ));
        };

        let mut entries = BTreeMap::new();
        for (name, flag) in object {
            let Some(counts) = flag.as_bool() else {
                return Err(ClientError::invalid_allow_list(
                    &source.describe(),
                    &format!("value for `{name}` must be true or false"),
                ));
            };
            let key = normalize_product_name(name);
            if key.is_empty() {
                continue;
            }
            // Any `true` for a normalized name wins over a `false` duplicate.
            let entry = entries.entry(key).or_insert(false);
            *entry = *entry || counts;
        }

        Ok(Self { entries, source })
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for (name, counts) in entries {
            let key = normalize_product_name(name.as_ref());
            let entry = map.entry(key).or_insert(false);
            *entry = *entry || counts;
        }
        Self {
            entries: map,
            source: AllowListSource::Bundled,
        }
    }

    pub fn is_sustainable(&self, product_name: &str) -> bool {
        self.entries
            .get(&normalize_product_name(product_name))
            .copied()
            .unwrap_or(false)
    }

    pub fn entries(&self) -> &BTreeMap<String, bool> {
        &self.entries
    }

    pub fn source(&self) -> &AllowListSource {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
