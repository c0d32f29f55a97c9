use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

use crate::models::lenient;

/// One planned interview section and the number of questions it should get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub target: u32,
}

/// Ordered section plan. Order is the visiting order and is never re-sorted.
///
/// On the wire this is a JSON object `{"SectionName": count, ...}`; decoding
/// keeps key order, drops duplicate names after the first and skips entries
/// whose count is not a non-negative whole number (`2`, `2.0` and `"2"` all
/// count). Counts are otherwise taken as given, including ones outside the
/// 2–3 range the prompt asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionPlan {
    sections: Vec<Section>,
}

impl SectionPlan {
    #[cfg(test)]
    pub fn new<I, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut plan = Self::default();
        for (name, target) in sections {
            plan.push(name.into(), target);
        }
        plan
    }

    fn push(&mut self, name: String, target: u32) -> bool {
        if self.sections.iter().any(|s| s.name == name) {
            return false;
        }
        self.sections.push(Section { name, target });
        true
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    #[cfg(test)]
    pub fn target(&self, name: &str) -> Option<u32> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.target)
    }

    /// Sum of all section targets, the upper bound on questions asked.
    pub fn total_questions(&self) -> u32 {
        self.sections.iter().map(|s| s.target).sum()
    }
}

impl Serialize for SectionPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.name, &section.target)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SectionPlan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PlanVisitor;

        impl<'de> Visitor<'de> for PlanVisitor {
            type Value = SectionPlan;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping section names to question counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SectionPlan, A::Error> {
                let mut plan = SectionPlan::default();
                while let Some((name, count)) = access.next_entry::<String, Value>()? {
                    let Some(target) = lenient::count(&count) else {
                        warn!("Section '{name}' has non-integer question count {count}; skipping");
                        continue;
                    };
                    if !plan.push(name.clone(), target) {
                        warn!("Duplicate section '{name}' in plan; keeping the first");
                    }
                }
                Ok(plan)
            }
        }

        deserializer.deserialize_map(PlanVisitor)
    }
}

/// Reply shape of the section-planning prompt: `{"sections": {...}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionPlanReply {
    #[serde(default)]
    pub sections: SectionPlan,
}

/// One answered question, in the order it was asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub section: String,
    pub question: String,
    pub answer: String,
}
