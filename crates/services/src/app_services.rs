use std::sync::Arc;

use api::Api;

use crate::Clock;
use crate::auth_service::AuthService;
use crate::error::AppServicesError;
use crate::question_service::QuestionService;
use crate::quiz_service::QuizService;
use crate::ranking_service::RankingService;
use crate::settings::Settings;

/// Assembles the app-facing services over one set of collaborators.
#[derive(Clone)]
pub struct AppServices {
    settings: Settings,
    quiz: Arc<QuizService>,
    questions: Arc<QuestionService>,
    auth: Arc<AuthService>,
    ranking: Arc<RankingService>,
}

impl AppServices {
    /// Build services backed by the REST service named in `settings`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Rest` if the HTTP client cannot be built.
    pub fn rest(settings: Settings, clock: Clock) -> Result<Self, AppServicesError> {
        let api = Api::rest(&settings.rest_config())?;
        tracing::debug!(base_url = %settings.api.base_url, "using quiz service");
        Ok(Self::from_api(api, settings, clock))
    }

    #[must_use]
    pub fn from_api(api: Api, settings: Settings, clock: Clock) -> Self {
        let quiz = Arc::new(
            QuizService::new(clock, Arc::clone(&api.questions)).with_shuffle(settings.quiz.shuffle),
        );
        let questions = Arc::new(QuestionService::new(
            Arc::clone(&api.questions),
            Arc::clone(&api.question_store),
        ));
        let auth = Arc::new(AuthService::new(Arc::clone(&api.auth)));
        let ranking = Arc::new(RankingService::new(
            Arc::clone(&api.ranking),
            settings.ranking.limit,
        ));

        Self {
            settings,
            quiz,
            questions,
            auth,
            ranking,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn questions(&self) -> Arc<QuestionService> {
        Arc::clone(&self.questions)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn ranking(&self) -> Arc<RankingService> {
        Arc::clone(&self.ranking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_rejects_bad_base_url() {
        let mut settings = Settings::default();
        settings.api.base_url = "ftp://nowhere".into();
        assert!(matches!(
            AppServices::rest(settings, Clock::system()),
            Err(AppServicesError::Rest(_))
        ));
    }

    #[test]
    fn ranking_uses_configured_limit() {
        let mut settings = Settings::default();
        settings.ranking.limit = 4;
        let services = AppServices::from_api(Api::in_memory(), settings, Clock::system());
        assert_eq!(services.ranking().default_limit(), 4);
    }
}
