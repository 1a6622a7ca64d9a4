use quiz_core::model::{OPTION_COUNT, Question, QuestionDraft, QuestionId, option_label};
use services::{QuestionEntry, QuestionService, filter_questions};

use crate::state::{ViewError, ViewState};

/// One row of the admin question list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionRowVm {
    pub id: Option<QuestionId>,
    pub text: String,
    pub answer: String,
    pub option_count: usize,
    /// Why the record cannot be played, if it cannot.
    pub problem: Option<String>,
}

impl From<&QuestionEntry> for QuestionRowVm {
    fn from(entry: &QuestionEntry) -> Self {
        let answer = usize::try_from(entry.correct_index())
            .ok()
            .and_then(|correct| {
                entry
                    .options()
                    .get(correct)
                    .filter(|text| !text.trim().is_empty())
                    .map(|text| format!("{}) {text}", option_label(correct)))
            })
            .unwrap_or_default();
        Self {
            id: entry.id(),
            text: entry.text().to_owned(),
            answer,
            option_count: entry.options().len(),
            problem: entry.problem().map(ToString::to_string),
        }
    }
}

#[must_use]
pub fn map_question_rows(entries: &[QuestionEntry]) -> Vec<QuestionRowVm> {
    entries.iter().map(QuestionRowVm::from).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(QuestionId),
}

/// List, search and edit form for the question bank.
pub struct QuestionEditorVm {
    questions: ViewState<Vec<QuestionEntry>>,
    query: String,
    mode: Option<EditorMode>,
    draft: QuestionDraft,
    error: Option<String>,
    notice: Option<String>,
}

impl Default for QuestionEditorVm {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionEditorVm {
    #[must_use]
    pub fn new() -> Self {
        Self {
            questions: ViewState::Idle,
            query: String::new(),
            mode: None,
            draft: QuestionDraft::default(),
            error: None,
            notice: None,
        }
    }

    pub async fn load(&mut self, service: &QuestionService) {
        self.questions = ViewState::Loading;
        self.questions = ViewState::from_result(service.list().await);
    }

    #[must_use]
    pub fn questions(&self) -> &ViewState<Vec<QuestionEntry>> {
        &self.questions
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Rows matching the current query; empty until the list is loaded.
    #[must_use]
    pub fn rows(&self) -> Vec<QuestionRowVm> {
        self.questions
            .ready()
            .map(|questions| map_question_rows(&filter_questions(questions, &self.query)))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn mode(&self) -> Option<EditorMode> {
        self.mode
    }

    #[must_use]
    pub fn draft(&self) -> &QuestionDraft {
        &self.draft
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn start_create(&mut self) {
        self.mode = Some(EditorMode::Create);
        self.draft = QuestionDraft::default();
        self.error = None;
    }

    /// Open the form on a listed question, malformed ones included.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Message` if the id is not in the loaded list.
    pub fn start_edit(&mut self, id: QuestionId) -> Result<(), ViewError> {
        let entry = self
            .questions
            .ready()
            .and_then(|entries| entries.iter().find(|e| e.id() == Some(id)))
            .ok_or_else(|| ViewError::Message(format!("question {id} not found")))?;
        self.draft = entry.to_draft();
        self.mode = Some(EditorMode::Edit(id));
        self.error = None;
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.mode = None;
        self.draft = QuestionDraft::default();
        self.error = None;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    /// Indices past the fourth option are ignored.
    pub fn set_option(&mut self, index: usize, text: impl Into<String>) {
        if index < OPTION_COUNT {
            self.draft.options[index] = text.into();
        }
    }

    pub fn set_correct_index(&mut self, index: i64) {
        self.draft.set_correct_index(index);
    }

    pub fn set_explanation(&mut self, explanation: impl Into<String>) {
        self.draft.explanation = explanation.into();
    }

    /// Create or update depending on the mode, then patch the list in place.
    ///
    /// # Errors
    ///
    /// Returns `ViewError` when the form is closed, the draft is invalid or
    /// the service rejects it; the message is also kept in `error()`.
    pub async fn submit(&mut self, service: &QuestionService) -> Result<Question, ViewError> {
        let Some(mode) = self.mode else {
            return Err(ViewError::Message("no question is being edited".into()));
        };
        let draft = self.draft.clone();
        let result = match mode {
            EditorMode::Create => service.create(draft).await,
            EditorMode::Edit(id) => service.update(id, draft).await,
        };

        match result {
            Ok(question) => {
                if let ViewState::Ready(entries) = &mut self.questions {
                    let entry = QuestionEntry::Valid(question.clone());
                    match entries.iter_mut().find(|e| e.id() == Some(question.id())) {
                        Some(slot) => *slot = entry,
                        None => entries.push(entry),
                    }
                }
                self.notice = Some(match mode {
                    EditorMode::Create => "Question created".to_string(),
                    EditorMode::Edit(_) => "Question updated".to_string(),
                });
                self.cancel();
                Ok(question)
            }
            Err(err) => Err(self.fail(&err)),
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError` if the service rejects the delete.
    pub async fn delete(
        &mut self,
        service: &QuestionService,
        id: QuestionId,
    ) -> Result<(), ViewError> {
        if let Err(err) = service.delete(id).await {
            return Err(self.fail(&err));
        }
        if let ViewState::Ready(entries) = &mut self.questions {
            entries.retain(|e| e.id() != Some(id));
        }
        if self.mode == Some(EditorMode::Edit(id)) {
            self.cancel();
        }
        self.error = None;
        self.notice = Some("Question deleted".to_string());
        Ok(())
    }

    fn fail(&mut self, err: &impl std::fmt::Display) -> ViewError {
        let view_error = ViewError::from_error(err);
        self.error = Some(view_error.message().to_string());
        self.notice = None;
        view_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{InMemoryRepository, QuestionRecord};
    use std::sync::Arc;

    fn service() -> QuestionService {
        let repo = InMemoryRepository::new();
        QuestionService::new(Arc::new(repo.clone()), Arc::new(repo))
    }

    fn fill(vm: &mut QuestionEditorVm, text: &str) {
        vm.set_text(text);
        for (i, option) in ["Red", "Green", "Blue", "Yellow"].iter().enumerate() {
            vm.set_option(i, *option);
        }
    }

    #[tokio::test]
    async fn create_then_edit_updates_list_in_place() {
        let service = service();
        let mut vm = QuestionEditorVm::new();
        vm.load(&service).await;
        assert!(vm.rows().is_empty());

        vm.start_create();
        fill(&mut vm, "Colour of the sky?");
        vm.set_correct_index(7);
        assert_eq!(vm.draft().correct_index, 3);
        vm.set_correct_index(2);
        let created = vm.submit(&service).await.unwrap();
        assert_eq!(vm.mode(), None);
        assert_eq!(vm.notice(), Some("Question created"));

        let rows = vm.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].answer, "C) Blue");

        vm.start_edit(created.id()).unwrap();
        assert_eq!(vm.draft().text, "Colour of the sky?");
        vm.set_text("Colour of a clear sky?");
        vm.submit(&service).await.unwrap();
        let rows = vm.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "Colour of a clear sky?");
    }

    #[tokio::test]
    async fn malformed_row_is_flagged_and_editable() {
        let repo = InMemoryRepository::with_records(vec![QuestionRecord {
            id: Some(QuestionId::new(2)),
            text: "Largest desert?".into(),
            options: vec!["Sahara".into(), "Gobi".into()],
            correct_index: -1,
            explanation: String::new(),
        }]);
        let service = QuestionService::new(Arc::new(repo.clone()), Arc::new(repo));
        let mut vm = QuestionEditorVm::new();
        vm.load(&service).await;

        let rows = vm.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].answer, "");
        assert!(rows[0].problem.is_some());

        vm.start_edit(QuestionId::new(2)).unwrap();
        assert_eq!(vm.draft().options[1], "Gobi");
        assert_eq!(vm.draft().correct_index, 0);
        vm.set_option(2, "Kalahari");
        vm.set_option(3, "Antarctic");
        vm.set_correct_index(3);
        vm.submit(&service).await.unwrap();

        let rows = vm.rows();
        assert_eq!(rows[0].problem, None);
        assert_eq!(rows[0].answer, "D) Antarctic");
    }

    #[tokio::test]
    async fn invalid_draft_keeps_form_open_with_error() {
        let service = service();
        let mut vm = QuestionEditorVm::new();
        vm.load(&service).await;

        vm.start_create();
        vm.set_text("Missing options");
        let err = vm.submit(&service).await.unwrap_err();
        assert_eq!(vm.mode(), Some(EditorMode::Create));
        assert_eq!(vm.error(), Some(err.message()));
    }

    #[tokio::test]
    async fn search_and_delete() {
        let service = service();
        let mut vm = QuestionEditorVm::new();
        vm.load(&service).await;
        for text in ["Largest planet?", "Hottest planet?"] {
            vm.start_create();
            fill(&mut vm, text);
            vm.submit(&service).await.unwrap();
        }

        vm.set_query("HOTTEST");
        let rows = vm.rows();
        assert_eq!(rows.len(), 1);
        let id = rows[0].id.unwrap();

        vm.delete(&service, id).await.unwrap();
        assert!(vm.rows().is_empty());
        vm.set_query("");
        assert_eq!(vm.rows().len(), 1);

        assert!(vm.delete(&service, id).await.is_err());
        assert_eq!(vm.error(), Some("not found"));
    }
}
