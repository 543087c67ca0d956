//! Poll structure and staged vote drafts.
//!
//! A poll owns ordered pages of ordered questions; every question carries an
//! ordered answer list and a choice arity. Participants hold an integer
//! voting-weight snapshot taken when they were added. Votes are staged in a
//! mutable draft keyed by (poll, user) until `finish` locks the draft for
//! good. Results aggregation is a separate downstream concern and not
//! modelled here.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{AnswerId, BoardId, PollId, QuestionId, UserId};

/// Choice arity of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    /// At most one answer may be selected.
    SingleChoice,
    /// Any subset of answers may be selected.
    MultipleChoice,
}

/// Answer option within a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub text: String,
}

/// Question within a poll page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub kind: QuestionType,
    /// Answers in presentation order.
    pub answers: Vec<Answer>,
}

impl Question {
    /// Whether `answer` is one of this question's options.
    #[must_use]
    pub fn has_answer(&self, answer: &AnswerId) -> bool {
        self.answers.iter().any(|a| &a.id == answer)
    }
}

/// One page of a poll, holding questions in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollPage {
    pub questions: Vec<Question>,
}

/// Poll owned by a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    id: PollId,
    board_id: BoardId,
    title: String,
    pages: Vec<PollPage>,
    created_at: DateTime<Utc>,
}

impl Poll {
    /// Assemble a poll from its parts. Structure is authored elsewhere; this
    /// constructor only wires ownership.
    #[must_use]
    pub fn new(
        id: PollId,
        board_id: BoardId,
        title: impl Into<String>,
        pages: Vec<PollPage>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            board_id,
            title: title.into(),
            pages,
            created_at,
        }
    }

    /// Poll identifier.
    #[must_use]
    pub fn id(&self) -> &PollId {
        &self.id
    }

    /// Owning board.
    #[must_use]
    pub fn board_id(&self) -> &BoardId {
        &self.board_id
    }

    /// Poll title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Pages in presentation order.
    #[must_use]
    pub fn pages(&self) -> &[PollPage] {
        &self.pages
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Look up a question anywhere in the poll.
    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.pages
            .iter()
            .flat_map(|page| page.questions.iter())
            .find(|question| &question.id == id)
    }
}

/// Voting-weight snapshot for one poll participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub poll_id: PollId,
    pub user_id: UserId,
    /// Weight captured when the participant was enrolled; immutable afterwards.
    pub weight: u32,
}

/// Errors raised by vote-draft operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoteDraftError {
    /// The draft has been finished and is immutable.
    #[error("vote draft is already finished")]
    Finished,
    /// A single-choice question received more than one answer.
    #[error("question accepts a single answer, got {got}")]
    TooManyAnswers { got: usize },
}

/// Provisional vote selections prior to finalization.
///
/// Selections map a question to the chosen answer ids (insertion order is not
/// meaningful; the map is keyed for idempotent upserts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteDraft {
    poll_id: PollId,
    user_id: UserId,
    selections: BTreeMap<QuestionId, Vec<AnswerId>>,
    finished_at: Option<DateTime<Utc>>,
}

impl VoteDraft {
    /// Start an empty draft for `(poll_id, user_id)`.
    #[must_use]
    pub fn start(poll_id: PollId, user_id: UserId) -> Self {
        Self {
            poll_id,
            user_id,
            selections: BTreeMap::new(),
            finished_at: None,
        }
    }

    /// Rehydrate from storage.
    #[must_use]
    pub fn from_parts(
        poll_id: PollId,
        user_id: UserId,
        selections: BTreeMap<QuestionId, Vec<AnswerId>>,
        finished_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            poll_id,
            user_id,
            selections,
            finished_at,
        }
    }

    /// Owning poll.
    #[must_use]
    pub fn poll_id(&self) -> &PollId {
        &self.poll_id
    }

    /// Voting user.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Current selections.
    #[must_use]
    pub fn selections(&self) -> &BTreeMap<QuestionId, Vec<AnswerId>> {
        &self.selections
    }

    /// When the draft was finished, if it was.
    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Whether the draft is locked.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Replace the selection for one question.
    ///
    /// `kind` enforces arity: single-choice questions accept at most one
    /// answer. An empty answer list clears the selection.
    pub fn set_selection(
        &mut self,
        question: QuestionId,
        kind: QuestionType,
        answers: Vec<AnswerId>,
    ) -> Result<(), VoteDraftError> {
        if self.is_finished() {
            return Err(VoteDraftError::Finished);
        }
        if kind == QuestionType::SingleChoice && answers.len() > 1 {
            return Err(VoteDraftError::TooManyAnswers { got: answers.len() });
        }
        if answers.is_empty() {
            self.selections.remove(&question);
        } else {
            self.selections.insert(question, answers);
        }
        Ok(())
    }

    /// Lock the draft (terminal).
    pub fn finish(&mut self, at: DateTime<Utc>) -> Result<(), VoteDraftError> {
        if self.is_finished() {
            return Err(VoteDraftError::Finished);
        }
        self.finished_at = Some(at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    fn single_question() -> Question {
        Question {
            id: QuestionId::random(),
            text: "Approve the budget?".to_owned(),
            kind: QuestionType::SingleChoice,
            answers: vec![
                Answer {
                    id: AnswerId::random(),
                    text: "Yes".to_owned(),
                },
                Answer {
                    id: AnswerId::random(),
                    text: "No".to_owned(),
                },
            ],
        }
    }

    #[test]
    fn question_lookup_spans_pages() {
        let q1 = single_question();
        let q2 = single_question();
        let poll = Poll::new(
            PollId::random(),
            BoardId::random(),
            "Budget",
            vec![
                PollPage {
                    questions: vec![q1.clone()],
                },
                PollPage {
                    questions: vec![q2.clone()],
                },
            ],
            Utc::now(),
        );
        assert_eq!(poll.question(&q2.id).map(|q| &q.id), Some(&q2.id));
        assert!(poll.question(&QuestionId::random()).is_none());
    }

    #[test]
    fn single_choice_rejects_multiple_answers() {
        let question = single_question();
        let mut draft = VoteDraft::start(PollId::random(), UserId::random());
        let answers: Vec<AnswerId> = question.answers.iter().map(|a| a.id).collect();
        let err = draft
            .set_selection(question.id, QuestionType::SingleChoice, answers)
            .expect_err("two answers on a single-choice question");
        assert_eq!(err, VoteDraftError::TooManyAnswers { got: 2 });
    }

    #[test]
    fn empty_selection_clears_the_entry() {
        let question = single_question();
        let answer = question.answers[0].id;
        let mut draft = VoteDraft::start(PollId::random(), UserId::random());
        draft
            .set_selection(question.id, QuestionType::SingleChoice, vec![answer])
            .expect("one answer is fine");
        assert_eq!(draft.selections().len(), 1);
        draft
            .set_selection(question.id, QuestionType::SingleChoice, Vec::new())
            .expect("clearing is fine");
        assert!(draft.selections().is_empty());
    }

    #[test]
    fn finish_locks_the_draft() {
        let question = single_question();
        let answer = question.answers[0].id;
        let mut draft = VoteDraft::start(PollId::random(), UserId::random());
        draft.finish(Utc::now()).expect("first finish");
        assert!(draft.is_finished());
        assert_eq!(
            draft.set_selection(question.id, QuestionType::SingleChoice, vec![answer]),
            Err(VoteDraftError::Finished)
        );
        assert_eq!(draft.finish(Utc::now()), Err(VoteDraftError::Finished));
    }

    #[test]
    fn multiple_choice_accepts_subsets() {
        let question = single_question();
        let answers: Vec<AnswerId> = question.answers.iter().map(|a| a.id).collect();
        let mut draft = VoteDraft::start(PollId::random(), UserId::random());
        draft
            .set_selection(question.id, QuestionType::MultipleChoice, answers.clone())
            .expect("subsets allowed");
        assert_eq!(draft.selections()[&question.id], answers);
    }
}
