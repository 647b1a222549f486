use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical topic identifier: the part of a roadmap label before the first colon.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicKey(String);

impl TopicKey {
    /// Extract the topic key from a label such as `"Ownership: moves and borrows"`.
    ///
    /// Labels without a colon are their own key. Surrounding whitespace is dropped.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let name = label.split_once(':').map_or(label, |(name, _)| name);
        Self(name.trim().to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TopicKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopicKey({:?})", self.0)
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of a roadmap, kept exactly as the generator produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoadmapStep {
    label: String,
}

impl RoadmapStep {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn key(&self) -> TopicKey {
        TopicKey::from_label(&self.label)
    }

    /// The text after the first colon, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.label
            .split_once(':')
            .map(|(_, desc)| desc.trim())
            .filter(|desc| !desc.is_empty())
    }
}

/// Ordered learning path for a skill.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roadmap {
    steps: Vec<RoadmapStep>,
}

impl Roadmap {
    #[must_use]
    pub fn new(steps: Vec<RoadmapStep>) -> Self {
        Self { steps }
    }

    /// Build a roadmap from raw labels.
    #[must_use]
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            steps: labels.into_iter().map(RoadmapStep::new).collect(),
        }
    }

    #[must_use]
    pub fn steps(&self) -> &[RoadmapStep] {
        &self.steps
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RoadmapStep> {
        self.steps.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Position of the first step whose key matches `key`.
    #[must_use]
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.key().as_str() == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RoadmapStep> {
        self.steps.iter()
    }
}

impl<'a> IntoIterator for &'a Roadmap {
    type Item = &'a RoadmapStep;
    type IntoIter = std::slice::Iter<'a, RoadmapStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_strips_description_at_first_colon() {
        let step = RoadmapStep::new("Traits: generics: and bounds");
        assert_eq!(step.key().as_str(), "Traits");
        assert_eq!(step.description(), Some("generics: and bounds"));
    }

    #[test]
    fn label_without_colon_is_its_own_key() {
        let step = RoadmapStep::new("  Closures ");
        assert_eq!(step.key().as_str(), "Closures");
        assert_eq!(step.description(), None);
    }

    #[test]
    fn empty_description_is_none() {
        assert_eq!(RoadmapStep::new("Lifetimes:  ").description(), None);
    }

    #[test]
    fn roadmap_serializes_as_label_array() {
        let roadmap = Roadmap::from_labels(["A: intro", "B"]);
        let json = serde_json::to_string(&roadmap).unwrap();
        assert_eq!(json, r#"["A: intro","B"]"#);
        let back: Roadmap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, roadmap);
        assert_eq!(back.position_of("B"), Some(1));
    }
}
