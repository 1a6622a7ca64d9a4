#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod error;
pub mod question_service;
pub mod quiz_service;
pub mod ranking_service;
pub mod settings;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use error::{AppServicesError, AuthError, QuestionServiceError, QuizError, RankingError};
pub use question_service::{QuestionEntry, QuestionService, filter_questions};
pub use quiz_service::{QuizRun, QuizService};
pub use ranking_service::RankingService;
pub use settings::{Settings, SettingsOverrides, load_settings};
