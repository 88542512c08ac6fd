//! Mission content tables and loaders.
//!
//! Content (quiz questions, reward values, badge titles) is data, not
//! logic: the engine receives a validated [`MissionCatalog`] at
//! construction and never hard-codes mission-specific values. Each mission
//! is a strictly-typed record keyed by its integer id, validated at load
//! time rather than an open map inspected at use sites.

use std::collections::BTreeMap;

use progress_core::MissionId;

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::CatalogLoader;

/// Default quiz time limit in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: f64 = 60.0;

#[cfg(feature = "serde")]
fn default_time_limit() -> f64 {
    DEFAULT_TIME_LIMIT_SECS
}

/// A single algebra question.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuizSpec {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct_answer: usize,
    pub explanation: String,
    /// Countdown shown by the UI and used for the time bonus. The engine
    /// grades against real elapsed time, so this only bounds the bonus.
    #[cfg_attr(feature = "serde", serde(default = "default_time_limit"))]
    pub time_limit_secs: f64,
}

/// Everything the engine needs to know about one mission.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MissionSpec {
    pub id: MissionId,
    /// Badge title appended to the record on completion.
    pub title: String,
    pub base_coins: u64,
    pub base_points: u64,
    pub quiz: QuizSpec,
}

/// Content validation failures, surfaced at load time.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("{id} is outside the curriculum range 1..={max}", max = progress_core::MISSION_COUNT)]
    IdOutOfRange { id: MissionId },

    #[error("duplicate content entry for {id}")]
    DuplicateId { id: MissionId },

    #[error("{id} has no answer options")]
    NoOptions { id: MissionId },

    #[error("{id} marks answer {answer} correct but has {options} options")]
    AnswerOutOfRange {
        id: MissionId,
        answer: usize,
        options: usize,
    },
}

/// Validated mission content table, keyed by mission id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MissionCatalog {
    missions: BTreeMap<MissionId, MissionSpec>,
}

impl MissionCatalog {
    /// Builds a catalog, rejecting malformed or duplicated entries.
    ///
    /// A catalog does not have to cover all 50 missions: partial content
    /// packs are fine, the engine simply refuses quizzes it has no
    /// content for.
    pub fn new(specs: Vec<MissionSpec>) -> Result<Self, ContentError> {
        let mut missions = BTreeMap::new();

        for spec in specs {
            let id = spec.id;
            if !id.is_valid() {
                return Err(ContentError::IdOutOfRange { id });
            }
            if spec.quiz.options.is_empty() {
                return Err(ContentError::NoOptions { id });
            }
            if spec.quiz.correct_answer >= spec.quiz.options.len() {
                return Err(ContentError::AnswerOutOfRange {
                    id,
                    answer: spec.quiz.correct_answer,
                    options: spec.quiz.options.len(),
                });
            }
            if missions.insert(id, spec).is_some() {
                return Err(ContentError::DuplicateId { id });
            }
        }

        Ok(Self { missions })
    }

    /// Looks up one mission's content.
    pub fn get(&self, id: MissionId) -> Option<&MissionSpec> {
        self.missions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    /// Iterates missions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &MissionSpec> {
        self.missions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: u8) -> MissionSpec {
        MissionSpec {
            id: MissionId(id),
            title: format!("Mission {id}"),
            base_coins: 20,
            base_points: 50,
            quiz: QuizSpec {
                question: "2x = 6, x = ?".into(),
                options: vec!["1".into(), "2".into(), "3".into()],
                correct_answer: 2,
                explanation: "Divide both sides by 2.".into(),
                time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            },
        }
    }

    #[test]
    fn valid_catalog_builds_and_looks_up() {
        let catalog = MissionCatalog::new(vec![spec(1), spec(2)]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(MissionId(1)).unwrap().base_coins, 20);
        assert!(catalog.get(MissionId(3)).is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = MissionCatalog::new(vec![spec(1), spec(1)]).unwrap_err();
        assert_eq!(err, ContentError::DuplicateId { id: MissionId(1) });
    }

    #[test]
    fn out_of_range_ids_are_rejected() {
        let err = MissionCatalog::new(vec![spec(51)]).unwrap_err();
        assert_eq!(err, ContentError::IdOutOfRange { id: MissionId(51) });
    }

    #[test]
    fn answer_index_must_point_at_an_option() {
        let mut bad = spec(1);
        bad.quiz.correct_answer = 3;
        let err = MissionCatalog::new(vec![bad]).unwrap_err();
        assert_eq!(
            err,
            ContentError::AnswerOutOfRange {
                id: MissionId(1),
                answer: 3,
                options: 3,
            }
        );
    }

    #[test]
    fn empty_options_are_rejected() {
        let mut bad = spec(1);
        bad.quiz.options.clear();
        let err = MissionCatalog::new(vec![bad]).unwrap_err();
        assert_eq!(err, ContentError::NoOptions { id: MissionId(1) });
    }
}
