#![forbid(unsafe_code)]

pub mod repository;
pub mod rest;

pub use repository::{
    Api, ApiError, AuthGateway, InMemoryRepository, QuestionRecord, QuestionRepository,
    QuestionSource, RankingSource,
};
pub use rest::{DEFAULT_BASE_URL, RestClient, RestConfig, RestInitError};
