//! Wire shapes of the remote service and their mapping to records.

use quiz_core::model::{Identity, QuestionId, RankingEntry, UserId};
use serde::{Deserialize, Serialize};

use crate::repository::{ANONYMOUS_USER, ApiError, QuestionRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct QuestionDto {
    #[serde(rename = "codigoPergunta", default)]
    pub id: Option<u64>,
    #[serde(rename = "pergunta", default)]
    pub text: Option<String>,
    #[serde(default)]
    pub q1: Option<String>,
    #[serde(default)]
    pub q2: Option<String>,
    #[serde(default)]
    pub q3: Option<String>,
    #[serde(default)]
    pub q4: Option<String>,
    #[serde(rename = "explicacao", default)]
    pub explanation: Option<String>,
    #[serde(rename = "indiceResposta", default)]
    pub correct_index: Option<i64>,
}

impl QuestionDto {
    /// Absent trailing options are dropped so short questions keep their
    /// length. Any other missing string becomes empty and a missing index
    /// becomes 0; the record is validated later.
    pub(crate) fn into_record(self) -> QuestionRecord {
        let mut slots = vec![self.q1, self.q2, self.q3, self.q4];
        while slots.last().is_some_and(Option::is_none) {
            slots.pop();
        }
        let options = slots
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();
        QuestionRecord {
            id: self.id.map(QuestionId::new),
            text: self.text.unwrap_or_default(),
            options,
            correct_index: self.correct_index.unwrap_or(0),
            explanation: self.explanation.unwrap_or_default(),
        }
    }

    pub(crate) fn from_record(record: &QuestionRecord) -> Self {
        let option = |i: usize| Some(record.options.get(i).cloned().unwrap_or_default());
        Self {
            id: record.id.map(|id| id.value()),
            text: Some(record.text.clone()),
            q1: option(0),
            q2: option(1),
            q3: option(2),
            q4: option(3),
            explanation: Some(record.explanation.clone()),
            correct_index: Some(record.correct_index),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct UserDto {
    #[serde(rename = "codigoUsuario", default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "pontuacao", default)]
    pub score: Option<i64>,
}

impl UserDto {
    pub(crate) fn into_identity(self) -> Result<Identity, ApiError> {
        let id = self
            .id
            .ok_or_else(|| ApiError::Serialization("user response has no id".into()))?;
        Ok(Identity::new(UserId::new(id), self.email.unwrap_or_default()))
    }

    pub(crate) fn into_ranking_entry(self) -> RankingEntry {
        let display_name = self
            .email
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| ANONYMOUS_USER.to_string());
        let score = self
            .score
            .map_or(0, |s| u32::try_from(s.max(0)).unwrap_or(u32::MAX));
        RankingEntry::new(display_name, score)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CredentialsDto<'a> {
    pub email: &'a str,
    #[serde(rename = "senha")]
    pub password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_default_like_the_service_client() {
        let dto: QuestionDto = serde_json::from_value(json!({
            "codigoPergunta": 4,
            "pergunta": "Capital of France?",
            "q1": "Paris",
            "q3": "Rome",
            "q4": null
        }))
        .unwrap();

        let record = dto.into_record();
        assert_eq!(record.id, Some(QuestionId::new(4)));
        assert_eq!(record.options, vec!["Paris", "", "Rome"]);
        assert_eq!(record.correct_index, 0);
        assert_eq!(record.explanation, "");
    }

    #[test]
    fn two_option_question_stays_playable() {
        let dto: QuestionDto = serde_json::from_value(json!({
            "codigoPergunta": 4,
            "pergunta": "True or false?",
            "q1": "True",
            "q2": "False",
            "indiceResposta": 0
        }))
        .unwrap();

        let question = dto.into_record().into_question().unwrap();
        assert_eq!(question.options(), ["True", "False"]);
        assert!(question.is_correct(0));
    }

    #[test]
    fn record_serializes_with_wire_names() {
        let record = QuestionRecord {
            id: None,
            text: "Q".into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: 3,
            explanation: "because".into(),
        };
        let value = serde_json::to_value(QuestionDto::from_record(&record)).unwrap();
        assert_eq!(
            value,
            json!({
                "codigoPergunta": null,
                "pergunta": "Q",
                "q1": "a",
                "q2": "b",
                "q3": "c",
                "q4": "d",
                "explicacao": "because",
                "indiceResposta": 3
            })
        );
    }

    #[test]
    fn user_without_email_is_anonymous_in_ranking() {
        let dto = UserDto {
            id: Some(1),
            email: None,
            score: Some(-3),
        };
        assert_eq!(dto.into_ranking_entry(), RankingEntry::new(ANONYMOUS_USER, 0));
    }

    #[test]
    fn login_response_requires_id() {
        let err = UserDto::default().into_identity().unwrap_err();
        assert!(matches!(err, ApiError::Serialization(_)));
    }

    #[test]
    fn credentials_use_service_field_names() {
        let body = CredentialsDto {
            email: "a@b.c",
            password: "pw",
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({"email": "a@b.c", "senha": "pw"})
        );
    }
}
