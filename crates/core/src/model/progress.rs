use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::TopicKey;

const VIEWED: &str = "viewed";
const COMPLETED: &str = "completed";
const LAST_VIEWED: &str = "lastViewed";
const COMPLETED_AT: &str = "completedAt";
const QUIZ_SCORE: &str = "quizScore";
const CODE_SCORE: &str = "codeScore";

const RECOGNIZED_FIELDS: [&str; 6] = [
    VIEWED,
    COMPLETED,
    LAST_VIEWED,
    COMPLETED_AT,
    QUIZ_SCORE,
    CODE_SCORE,
];

/// Highest score a quiz or code exercise can award.
pub const MAX_SCORE: f64 = 100.0;

/// Tri-state progress classification used to style and gate roadmap steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopicStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl TopicStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TopicStatus::NotStarted => "not-started",
            TopicStatus::InProgress => "in-progress",
            TopicStatus::Completed => "completed",
        }
    }

    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, TopicStatus::Completed)
    }
}

impl fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("score must be a finite value between 0 and {MAX_SCORE}, got {score}")]
    InvalidScore { score: f64 },
}

/// Canonical per-topic progress with every field explicit.
///
/// Unrecognised fields sent by the server are kept in `extra` so that
/// writing the record back does not drop them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicProgress {
    viewed: bool,
    completed: bool,
    last_viewed: Option<String>,
    completed_at: Option<String>,
    quiz_score: f64,
    code_score: f64,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TopicProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate a record from a persisted row.
    ///
    /// Blank timestamps are treated as absent and recognised field names are
    /// dropped from `extra`.
    #[must_use]
    pub fn from_persisted(
        viewed: bool,
        completed: bool,
        last_viewed: Option<String>,
        completed_at: Option<String>,
        quiz_score: f64,
        code_score: f64,
        extra: Map<String, Value>,
    ) -> Self {
        Self {
            viewed,
            completed,
            last_viewed: last_viewed.filter(|ts| !ts.is_empty()),
            completed_at: completed_at.filter(|ts| !ts.is_empty()),
            quiz_score: finite_or_zero(quiz_score),
            code_score: finite_or_zero(code_score),
            extra: extra
                .into_iter()
                .filter(|(key, _)| !is_recognized(key))
                .collect(),
        }
    }

    /// Merge a structured record coming off the wire or out of local storage.
    ///
    /// For each field the lower-camel name wins when it carries a truthy value,
    /// then the capitalised name, then any other spelling that matches ignoring
    /// ASCII case.
    #[must_use]
    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            viewed: lookup(object, VIEWED).is_some(),
            completed: lookup(object, COMPLETED).is_some(),
            last_viewed: lookup(object, LAST_VIEWED).and_then(timestamp_text),
            completed_at: lookup(object, COMPLETED_AT).and_then(timestamp_text),
            quiz_score: lookup(object, QUIZ_SCORE).map_or(0.0, score_value),
            code_score: lookup(object, CODE_SCORE).map_or(0.0, score_value),
            extra: object
                .iter()
                .filter(|(key, _)| !is_recognized(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }

    /// Convert a legacy status string into a structured record.
    #[must_use]
    pub fn from_legacy(status: &str) -> Self {
        let mut progress = Self::default();
        if status.eq_ignore_ascii_case(COMPLETED) {
            progress.completed = true;
        } else if !status.is_empty() {
            progress.viewed = true;
        }
        progress
    }

    #[must_use]
    pub fn viewed(&self) -> bool {
        self.viewed
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn last_viewed(&self) -> Option<&str> {
        self.last_viewed.as_deref()
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<&str> {
        self.completed_at.as_deref()
    }

    #[must_use]
    pub fn quiz_score(&self) -> f64 {
        self.quiz_score
    }

    #[must_use]
    pub fn code_score(&self) -> f64 {
        self.code_score
    }

    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Any field carrying a truthy value, recognised or not.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.viewed
            || self.completed
            || self.last_viewed.is_some()
            || self.completed_at.is_some()
            || self.quiz_score != 0.0
            || self.code_score != 0.0
            || self.extra.values().any(is_truthy)
    }

    #[must_use]
    pub fn status(&self) -> TopicStatus {
        if self.completed || self.completed_at.is_some() {
            TopicStatus::Completed
        } else if self.viewed || self.last_viewed.is_some() || self.is_populated() {
            TopicStatus::InProgress
        } else {
            TopicStatus::NotStarted
        }
    }

    pub fn mark_viewed(&mut self, now: DateTime<Utc>) {
        self.viewed = true;
        self.last_viewed = Some(format_timestamp(now));
    }

    /// Mark the topic completed. An existing completion time is kept.
    pub fn mark_completed(&mut self, now: DateTime<Utc>) {
        self.mark_viewed(now);
        self.completed = true;
        if self.completed_at.is_none() {
            self.completed_at = Some(format_timestamp(now));
        }
    }

    /// Record the latest quiz score.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::InvalidScore` unless `score` is finite and within `0..=MAX_SCORE`.
    pub fn record_quiz_score(&mut self, score: f64) -> Result<(), ProgressError> {
        self.quiz_score = validate_score(score)?;
        Ok(())
    }

    /// Record the latest code exercise score.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::InvalidScore` unless `score` is finite and within `0..=MAX_SCORE`.
    pub fn record_code_score(&mut self, score: f64) -> Result<(), ProgressError> {
        self.code_score = validate_score(score)?;
        Ok(())
    }

    /// Monotone merge: flags are OR-ed, the latest view and the earliest
    /// completion are kept, scores take the maximum, and unknown fields
    /// already present on `self` win.
    pub fn merge(&mut self, other: &TopicProgress) {
        self.viewed |= other.viewed;
        self.completed |= other.completed;
        self.last_viewed = pick_timestamp(
            self.last_viewed.take(),
            other.last_viewed.as_ref(),
            Pick::Latest,
        );
        self.completed_at = pick_timestamp(
            self.completed_at.take(),
            other.completed_at.as_ref(),
            Pick::Earliest,
        );
        self.quiz_score = self.quiz_score.max(other.quiz_score);
        self.code_score = self.code_score.max(other.code_score);
        for (key, value) in &other.extra {
            self.extra.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
}

impl<'de> Deserialize<'de> for TopicProgress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(ProgressRecord::from_value(&value).into_topic_progress())
    }
}

/// Progress as it arrives from storage or the server: either a bare status
/// string from older clients or a structured record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProgressRecord {
    Legacy(String),
    Structured(TopicProgress),
}

impl ProgressRecord {
    /// Interpret any JSON value as a progress record.
    ///
    /// Shapes other than strings and objects become an empty structured record.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(status) => ProgressRecord::Legacy(status.clone()),
            Value::Object(object) => ProgressRecord::Structured(TopicProgress::from_object(object)),
            _ => ProgressRecord::Structured(TopicProgress::default()),
        }
    }

    #[must_use]
    pub fn status(&self) -> TopicStatus {
        match self {
            ProgressRecord::Structured(progress) => progress.status(),
            ProgressRecord::Legacy(status) if status.eq_ignore_ascii_case(COMPLETED) => {
                TopicStatus::Completed
            }
            ProgressRecord::Legacy(status) if !status.is_empty() => TopicStatus::InProgress,
            ProgressRecord::Legacy(_) => TopicStatus::NotStarted,
        }
    }

    #[must_use]
    pub fn to_topic_progress(&self) -> TopicProgress {
        match self {
            ProgressRecord::Legacy(status) => TopicProgress::from_legacy(status),
            ProgressRecord::Structured(progress) => progress.clone(),
        }
    }

    #[must_use]
    pub fn into_topic_progress(self) -> TopicProgress {
        match self {
            ProgressRecord::Legacy(status) => TopicProgress::from_legacy(&status),
            ProgressRecord::Structured(progress) => progress,
        }
    }
}

impl<'de> Deserialize<'de> for ProgressRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(ProgressRecord::from_value(&value))
    }
}

impl From<TopicProgress> for ProgressRecord {
    fn from(progress: TopicProgress) -> Self {
        ProgressRecord::Structured(progress)
    }
}

/// Progress keyed by raw topic name, before normalization.
pub type RawProgressMap = BTreeMap<String, ProgressRecord>;

/// Normalized progress keyed by topic. A missing key means "not started".
///
/// Deserializing always goes through normalization, so a map read from any
/// source is canonical.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ProgressMap {
    topics: BTreeMap<TopicKey, TopicProgress>,
}

impl ProgressMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TopicProgress> {
        self.topics.get(key)
    }

    #[must_use]
    pub fn status_of(&self, key: &str) -> TopicStatus {
        self.get(key).map_or(TopicStatus::NotStarted, TopicProgress::status)
    }

    pub fn insert(&mut self, key: TopicKey, progress: TopicProgress) -> Option<TopicProgress> {
        self.topics.insert(key, progress)
    }

    /// Mutable access to a topic, creating an empty record when missing.
    pub fn topic_mut(&mut self, key: &TopicKey) -> &mut TopicProgress {
        self.topics.entry(key.clone()).or_default()
    }

    /// Merge `progress` into the entry for `key`, inserting it when absent.
    pub fn merge_topic(&mut self, key: TopicKey, progress: &TopicProgress) {
        match self.topics.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(progress.clone());
            }
            Entry::Occupied(mut slot) => slot.get_mut().merge(progress),
        }
    }

    pub fn merge(&mut self, other: &ProgressMap) {
        for (key, progress) in &other.topics {
            self.merge_topic(key.clone(), progress);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TopicKey, &TopicProgress)> {
        self.topics.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

impl<'de> Deserialize<'de> for ProgressMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawProgressMap::deserialize(deserializer)?;
        Ok(crate::resolver::normalize(&raw))
    }
}

impl FromIterator<(TopicKey, TopicProgress)> for ProgressMap {
    fn from_iter<I: IntoIterator<Item = (TopicKey, TopicProgress)>>(iter: I) -> Self {
        let mut map = ProgressMap::new();
        for (key, progress) in iter {
            map.merge_topic(key, &progress);
        }
        map
    }
}

/// Loose truthiness used when reading server records.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn is_recognized(key: &str) -> bool {
    RECOGNIZED_FIELDS
        .iter()
        .any(|field| field.eq_ignore_ascii_case(key))
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn lookup<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    let truthy = |value: &&Value| is_truthy(value);
    object
        .get(field)
        .filter(truthy)
        .or_else(|| object.get(&capitalize(field)).filter(truthy))
        .or_else(|| {
            object
                .iter()
                .find(|(key, value)| key.eq_ignore_ascii_case(field) && is_truthy(value))
                .map(|(_, value)| value)
        })
}

fn timestamp_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(true) => Some("true".to_owned()),
        _ => None,
    }
}

fn score_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.map_or(0.0, finite_or_zero)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn validate_score(score: f64) -> Result<f64, ProgressError> {
    if score.is_finite() && (0.0..=MAX_SCORE).contains(&score) {
        Ok(score)
    } else {
        Err(ProgressError::InvalidScore { score })
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Clone, Copy)]
enum Pick {
    Earliest,
    Latest,
}

fn pick_timestamp(current: Option<String>, other: Option<&String>, pick: Pick) -> Option<String> {
    let Some(other) = other else {
        return current;
    };
    let Some(current) = current else {
        return Some(other.clone());
    };
    let (Ok(mine), Ok(theirs)) = (
        DateTime::parse_from_rfc3339(&current),
        DateTime::parse_from_rfc3339(other),
    ) else {
        return Some(current);
    };
    let take_other = match pick {
        Pick::Earliest => theirs < mine,
        Pick::Latest => theirs > mine,
    };
    if take_other { Some(other.clone()) } else { Some(current) }
}
