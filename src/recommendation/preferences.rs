//! User Preferences and Consumption History
//!
//! A profile stores, per media kind, the values a user prefers under each
//! recognized [`PreferenceCategory`] and the ids of items already consumed.
//! Both only ever grow; every insert is idempotent.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::item::{MediaKind, MAX_RATING};
use crate::error::{Error, Result};

/// Named facet under which a user stores preferred values
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceCategory {
    Genres,
    Actors,
    Directors,
    Artists,
    Authors,
    Developers,
    Platforms,
    Years,
    Ratings,
}

const MOVIE_CATEGORIES: &[PreferenceCategory] = &[
    PreferenceCategory::Genres,
    PreferenceCategory::Actors,
    PreferenceCategory::Directors,
    PreferenceCategory::Years,
    PreferenceCategory::Ratings,
];

const MUSIC_CATEGORIES: &[PreferenceCategory] = &[
    PreferenceCategory::Genres,
    PreferenceCategory::Artists,
    PreferenceCategory::Years,
    PreferenceCategory::Ratings,
];

const BOOK_CATEGORIES: &[PreferenceCategory] = &[
    PreferenceCategory::Genres,
    PreferenceCategory::Authors,
    PreferenceCategory::Years,
    PreferenceCategory::Ratings,
];

const GAME_CATEGORIES: &[PreferenceCategory] = &[
    PreferenceCategory::Genres,
    PreferenceCategory::Developers,
    PreferenceCategory::Platforms,
    PreferenceCategory::Years,
    PreferenceCategory::Ratings,
];

impl PreferenceCategory {
    /// Categories recognized for a media kind
    pub fn for_kind(kind: MediaKind) -> &'static [PreferenceCategory] {
        match kind {
            MediaKind::Movie => MOVIE_CATEGORIES,
            MediaKind::Music => MUSIC_CATEGORIES,
            MediaKind::Book => BOOK_CATEGORIES,
            MediaKind::Game => GAME_CATEGORIES,
        }
    }

    pub fn applies_to(&self, kind: MediaKind) -> bool {
        Self::for_kind(kind).contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceCategory::Genres => "genres",
            PreferenceCategory::Actors => "actors",
            PreferenceCategory::Directors => "directors",
            PreferenceCategory::Artists => "artists",
            PreferenceCategory::Authors => "authors",
            PreferenceCategory::Developers => "developers",
            PreferenceCategory::Platforms => "platforms",
            PreferenceCategory::Years => "years",
            PreferenceCategory::Ratings => "ratings",
        }
    }

    /// Bring a raw value into the canonical stored form
    fn normalize(&self, raw: &str) -> Result<String> {
        let trimmed = raw.trim();
        let invalid = |message: &'static str| Error::InvalidPreference {
            category: *self,
            value: raw.to_string(),
            message: message.into(),
        };

        if trimmed.is_empty() {
            return Err(invalid("value cannot be blank"));
        }

        match self {
            PreferenceCategory::Years => parse_year(trimmed)
                .map(|year| year.to_string())
                .ok_or_else(|| invalid("expected an integer year")),
            PreferenceCategory::Ratings => {
                let threshold: f64 = trimmed
                    .parse()
                    .map_err(|_| invalid("expected a numeric rating"))?;
                if !threshold.is_finite() || !(0.0..=MAX_RATING).contains(&threshold) {
                    return Err(invalid("rating threshold outside 0-10"));
                }
                Ok(threshold.to_string())
            }
            // Categorical values are matched verbatim against item attributes
            _ => Ok(raw.to_string()),
        }
    }

    /// Encode a stored value for a persisted record
    fn encode(&self, value: &str) -> Value {
        match self {
            PreferenceCategory::Years => value
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::from(value)),
            PreferenceCategory::Ratings => value
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::from(value)),
            _ => Value::from(value),
        }
    }
}

impl fmt::Display for PreferenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferenceCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "genres" => Ok(PreferenceCategory::Genres),
            "actors" => Ok(PreferenceCategory::Actors),
            "directors" => Ok(PreferenceCategory::Directors),
            "artists" => Ok(PreferenceCategory::Artists),
            "authors" => Ok(PreferenceCategory::Authors),
            "developers" => Ok(PreferenceCategory::Developers),
            "platforms" => Ok(PreferenceCategory::Platforms),
            "years" => Ok(PreferenceCategory::Years),
            "ratings" => Ok(PreferenceCategory::Ratings),
            other => Err(format!("unknown preference category '{}'", other)),
        }
    }
}

type KindPreferences = BTreeMap<PreferenceCategory, BTreeSet<String>>;

/// User preference profile
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    preferences: BTreeMap<MediaKind, KindPreferences>,
    history: BTreeMap<MediaKind, BTreeSet<String>>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Record a preferred value. Returns whether the value was new.
    pub fn add_preference(
        &mut self,
        kind: MediaKind,
        category: PreferenceCategory,
        value: impl fmt::Display,
    ) -> Result<bool> {
        if !category.applies_to(kind) {
            return Err(Error::UnsupportedCategory { kind, category });
        }
        let value = category.normalize(&value.to_string())?;

        let inserted = self
            .preferences
            .entry(kind)
            .or_default()
            .entry(category)
            .or_default()
            .insert(value);
        Ok(inserted)
    }

    /// Mark an item as consumed. Returns whether it was new.
    pub fn add_to_history(&mut self, kind: MediaKind, item_id: impl Into<String>) -> bool {
        self.history.entry(kind).or_default().insert(item_id.into())
    }

    pub fn has_consumed(&self, kind: MediaKind, item_id: &str) -> bool {
        self.history
            .get(&kind)
            .is_some_and(|ids| ids.contains(item_id))
    }

    pub fn preferences(
        &self,
        kind: MediaKind,
        category: PreferenceCategory,
    ) -> Option<&BTreeSet<String>> {
        self.preferences.get(&kind).and_then(|p| p.get(&category))
    }

    pub fn prefers(&self, kind: MediaKind, category: PreferenceCategory, value: &str) -> bool {
        self.preferences(kind, category)
            .is_some_and(|values| values.contains(value))
    }

    /// True when at least one value is stored for the kind
    pub fn has_preferences(&self, kind: MediaKind) -> bool {
        self.preferences
            .get(&kind)
            .is_some_and(|p| p.values().any(|values| !values.is_empty()))
    }

    pub fn history(&self, kind: MediaKind) -> impl Iterator<Item = &str> {
        self.history
            .get(&kind)
            .into_iter()
            .flat_map(|ids| ids.iter().map(String::as_str))
    }

    /// Persisted form: `{user_id, name, preferences: {kind: {category: [..]}}, history: {kind: [..]}}`
    pub fn to_record(&self) -> Value {
        let mut preferences = Map::new();
        for (kind, categories) in &self.preferences {
            let mut by_category = Map::new();
            for (category, values) in categories {
                let encoded = values.iter().map(|v| category.encode(v)).collect();
                by_category.insert(category.as_str().to_string(), Value::Array(encoded));
            }
            preferences.insert(kind.as_str().to_string(), Value::Object(by_category));
        }

        let mut history = Map::new();
        for (kind, ids) in &self.history {
            history.insert(kind.as_str().to_string(), json!(ids));
        }

        json!({
            "user_id": self.user_id,
            "name": self.name,
            "preferences": preferences,
            "history": history,
        })
    }

    /// Rebuild a profile from its persisted form, normalizing every value
    pub fn from_record(record: &Value) -> Result<Self> {
        let obj = record
            .as_object()
            .ok_or_else(|| Error::profile_load("$", "profile record must be an object"))?;

        let user_id = required_str(obj, "user_id")?;
        let name = required_str(obj, "name")?;
        let mut profile = UserProfile::new(user_id, name);

        if let Some(prefs) = obj.get("preferences").filter(|v| !v.is_null()) {
            let prefs = prefs
                .as_object()
                .ok_or_else(|| Error::profile_load("preferences", "expected an object"))?;
            for (kind_key, categories) in prefs {
                let entry = format!("preferences.{}", kind_key);
                let kind: MediaKind = kind_key
                    .parse()
                    .map_err(|e: String| Error::profile_load(entry.clone(), e))?;
                let categories = categories
                    .as_object()
                    .ok_or_else(|| Error::profile_load(entry.clone(), "expected an object"))?;

                for (category_key, values) in categories {
                    let entry = format!("{}.{}", entry, category_key);
                    let category: PreferenceCategory = category_key
                        .parse()
                        .map_err(|e: String| Error::profile_load(entry.clone(), e))?;
                    let values = values
                        .as_array()
                        .ok_or_else(|| Error::profile_load(entry.clone(), "expected an array"))?;

                    for value in values {
                        let raw = scalar_to_string(value).ok_or_else(|| {
                            Error::profile_load(entry.clone(), "values must be strings or numbers")
                        })?;
                        profile
                            .add_preference(kind, category, raw)
                            .map_err(|e| Error::profile_load(entry.clone(), e.to_string()))?;
                    }
                }
            }
        }

        if let Some(history) = obj.get("history").filter(|v| !v.is_null()) {
            let history = history
                .as_object()
                .ok_or_else(|| Error::profile_load("history", "expected an object"))?;
            for (kind_key, ids) in history {
                let entry = format!("history.{}", kind_key);
                let kind: MediaKind = kind_key
                    .parse()
                    .map_err(|e: String| Error::profile_load(entry.clone(), e))?;
                let ids = ids
                    .as_array()
                    .ok_or_else(|| Error::profile_load(entry.clone(), "expected an array"))?;
                for id in ids {
                    let id = id
                        .as_str()
                        .ok_or_else(|| Error::profile_load(entry.clone(), "ids must be strings"))?;
                    profile.add_to_history(kind, id);
                }
            }
        }

        Ok(profile)
    }
}

/// Integer year; integral floats such as `2010.0` are accepted
fn parse_year(raw: &str) -> Option<i32> {
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }
    let value = raw.parse::<f64>().ok()?;
    let in_range = (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&value);
    (value.fract() == 0.0 && in_range).then_some(value as i32)
}

fn required_str(obj: &Map<String, Value>, key: &'static str) -> Result<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::profile_load(key, "missing or not a string"))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// All known profiles, keyed by user id
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, UserProfile>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty profile under the next free `user_N` id
    pub fn create(&mut self, name: impl Into<String>) -> String {
        let mut n = self.profiles.len() + 1;
        let user_id = loop {
            let candidate = format!("user_{}", n);
            if !self.profiles.contains_key(&candidate) {
                break candidate;
            }
            n += 1;
        };

        let profile = UserProfile::new(user_id.clone(), name);
        debug!("Created profile {} for {}", user_id, profile.name);
        self.profiles.insert(user_id.clone(), profile);
        user_id
    }

    /// Insert a profile, replacing any profile with the same id
    pub fn insert(&mut self, profile: UserProfile) -> Option<UserProfile> {
        self.profiles.insert(profile.user_id.clone(), profile)
    }

    pub fn get(&self, user_id: &str) -> Option<&UserProfile> {
        self.profiles.get(user_id)
    }

    pub fn get_mut(&mut self, user_id: &str) -> Option<&mut UserProfile> {
        self.profiles.get_mut(user_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn to_record(&self) -> Value {
        let map: Map<String, Value> = self
            .profiles
            .iter()
            .map(|(id, profile)| (id.clone(), profile.to_record()))
            .collect();
        Value::Object(map)
    }

    pub fn from_record(record: &Value) -> Result<Self> {
        let obj = record
            .as_object()
            .ok_or_else(|| Error::profile_load("$", "profile registry must be an object"))?;

        let mut registry = Self::new();
        for (user_id, entry) in obj {
            let profile = UserProfile::from_record(entry).map_err(|e| match e {
                Error::ProfileLoad { entry, message } => {
                    Error::profile_load(format!("{}.{}", user_id, entry), message)
                }
                other => other,
            })?;
            if &profile.user_id != user_id {
                return Err(Error::profile_load(
                    user_id.clone(),
                    format!("key does not match user_id '{}'", profile.user_id),
                ));
            }
            registry.insert(profile);
        }
        Ok(registry)
    }
}
