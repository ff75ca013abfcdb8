//! Wire types shared by the session manager, services and screen state.
//!
//! DESIGN
//! ======
//! The backend is loose about shapes: login may nest the profile under
//! `user` or return it at the top level, roles may be a string or a list,
//! and check-in fields come under English or Portuguese names. All of that
//! is absorbed here so the rest of the crate sees one canonical type each.

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

// =============================================================================
// USER
// =============================================================================

/// Role claim as sent by the backend: one tag string or a list of tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Roles {
    One(String),
    Many(Vec<String>),
}

impl Roles {
    /// A single role string matches when it contains `tag`; a list matches
    /// when one element equals `tag`.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        match self {
            Self::One(role) => role.contains(tag),
            Self::Many(roles) => roles.iter().any(|r| r == tag),
        }
    }
}

/// Authenticated employee profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default, alias = "nome")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Roles>,
    /// Any other profile fields, kept so persistence round-trips them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    #[must_use]
    pub fn has_role(&self, tag: &str) -> bool {
        self.role.as_ref().is_some_and(|r| r.contains(tag))
    }
}

/// Canonical result of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginPayload {
    pub user: User,
    pub token: Option<String>,
}

/// Normalize a login response body.
///
/// The profile is read from `user` when that field is an object, otherwise
/// from the body itself. Empty tokens are treated as absent.
///
/// # Errors
///
/// Returns an error if the body is not an object or the profile does not
/// deserialize into a [`User`].
pub fn normalize_login_response(body: Value) -> Result<LoginPayload, serde_json::Error> {
    let Value::Object(mut map) = body else {
        return Err(serde_json::Error::custom("login response is not a JSON object"));
    };

    let token = map
        .remove("token")
        .and_then(|t| t.as_str().map(str::to_owned))
        .filter(|t| !t.is_empty());
    let profile = match map.remove("user") {
        Some(Value::Object(nested)) => nested,
        _ => map,
    };
    let user = serde_json::from_value(Value::Object(profile))?;
    Ok(LoginPayload { user, token })
}

// =============================================================================
// CHECK-IN
// =============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("humor level must be between 1 and 5, got {0}")]
pub struct HumorLevelError(pub u8);

/// Mood score from 1 (very bad) to 5 (excellent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HumorLevel(u8);

impl HumorLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Every valid level, worst first.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(HumorLevel)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Muito Ruim",
            2 => "Ruim",
            3 => "Regular",
            4 => "Bom",
            _ => "Excelente",
        }
    }

    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self.0 {
            1 => "😡",
            2 => "😔",
            3 => "😐",
            4 => "🙂",
            _ => "😁",
        }
    }
}

impl TryFrom<u8> for HumorLevel {
    type Error = HumorLevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) { Ok(Self(value)) } else { Err(HumorLevelError(value)) }
    }
}

impl From<HumorLevel> for u8 {
    fn from(level: HumorLevel) -> Self {
        level.0
    }
}

/// Body of `POST /checkin/novo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCheckIn {
    pub id_funcionario: i64,
    pub humor_level: HumorLevel,
    pub comment: String,
    /// RFC 3339 timestamp.
    pub date_time: String,
}

impl NewCheckIn {
    /// Build a check-in stamped at `at`.
    ///
    /// # Errors
    ///
    /// Returns an error if `at` cannot be rendered as RFC 3339.
    pub fn new(employee_id: i64, humor_level: HumorLevel, comment: &str, at: OffsetDateTime) -> Result<Self, time::error::Format> {
        Ok(Self {
            id_funcionario: employee_id,
            humor_level,
            comment: comment.trim().to_owned(),
            date_time: at.format(&Rfc3339)?,
        })
    }
}

/// A stored check-in as returned by the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "dateTime", alias = "dataHora", alias = "checkInData", default)]
    pub date_time: String,
    #[serde(alias = "comentario", default)]
    pub comment: Option<String>,
    #[serde(rename = "humorLevel", alias = "nivelHumor")]
    pub humor_level: HumorLevel,
    #[serde(rename = "idFuncionario", default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
}

impl CheckIn {
    /// Calendar date as `dd/MM/yyyy`, if the timestamp starts with an ISO date.
    #[must_use]
    pub fn display_date(&self) -> Option<String> {
        let prefix = self.date_time.get(..10)?;
        let date = time::Date::parse(prefix, format_description!("[year]-[month]-[day]")).ok()?;
        date.format(format_description!("[day]/[month]/[year]"))
            .ok()
    }
}

// =============================================================================
// SUPPORT MATERIALS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub id: i64,
    #[serde(rename = "titulo", alias = "title")]
    pub title: String,
    #[serde(rename = "conteudo", alias = "content", default)]
    pub content: String,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(rename = "nomeArquivo", alias = "fileName", default)]
    pub file_name: Option<String>,
}

impl Material {
    /// Downloadable file name, ignoring blanks.
    #[must_use]
    pub fn attachment(&self) -> Option<&str> {
        self.file_name
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }
}

// =============================================================================
// SURVEYS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySummary {
    pub id: i64,
    #[serde(rename = "titulo", alias = "title")]
    pub title: String,
    #[serde(rename = "prazo", alias = "dueDate", default)]
    pub due_date: Option<String>,
    #[serde(rename = "respondido", alias = "answered", default)]
    pub answered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: i64,
    #[serde(rename = "texto", alias = "text")]
    pub text: String,
}

/// Question shape, with the options each variant accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    SingleChoice { options: Vec<AnswerOption> },
    MultipleChoice { options: Vec<AnswerOption> },
    OpenText,
}

impl QuestionKind {
    /// Classify the backend's free-form `tipo` string.
    ///
    /// Choice kinds without options degrade to open text, since nothing
    /// could be selected.
    #[must_use]
    pub fn classify(tipo: &str, options: Vec<AnswerOption>) -> Self {
        let tipo = tipo.trim().to_uppercase();
        let is_text = ["TEXT", "ABERTA", "DISSERT", "OPEN", "LIVRE"]
            .iter()
            .any(|k| tipo.contains(k));
        if is_text || options.is_empty() {
            return Self::OpenText;
        }
        if tipo.contains("MULTIPL") || tipo == "CHECKBOX" {
            Self::MultipleChoice { options }
        } else {
            Self::SingleChoice { options }
        }
    }

    /// Backend `tipo` name that [`QuestionKind::classify`] maps back to this kind.
    #[must_use]
    pub fn tipo(&self) -> &'static str {
        match self {
            Self::SingleChoice { .. } => "UNICA_ESCOLHA",
            Self::MultipleChoice { .. } => "MULTIPLA_ESCOLHA",
            Self::OpenText => "TEXTO",
        }
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        match self {
            Self::SingleChoice { options } | Self::MultipleChoice { options } => options,
            Self::OpenText => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub kind: QuestionKind,
}

/// Options offered for questions listed only in a survey's description.
pub const SCALE: std::ops::RangeInclusive<i64> = 1..=5;

/// Survey detail. Serializes back into the backend's own shape, so the
/// output of one fetch parses into the same value again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSurvey", into = "RawSurvey")]
pub struct Survey {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<Question>,
}

#[derive(Serialize, Deserialize)]
struct RawSurvey {
    id: i64,
    #[serde(alias = "title")]
    titulo: String,
    #[serde(alias = "description", default, skip_serializing_if = "Option::is_none")]
    descricao: Option<String>,
    #[serde(default)]
    perguntas: Vec<RawQuestion>,
}

#[derive(Serialize, Deserialize)]
struct RawQuestion {
    id: i64,
    texto: String,
    #[serde(default)]
    tipo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    opcoes: Option<Vec<AnswerOption>>,
}

/// Questions for a survey without `perguntas`: one per `;`-separated piece
/// of the description, each answered on the 1 to 5 scale.
fn scale_questions(description: &str) -> Vec<Question> {
    let options: Vec<AnswerOption> = SCALE
        .map(|n| AnswerOption { id: n, text: n.to_string() })
        .collect();
    description
        .split(';')
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .zip(1..)
        .map(|(text, id)| Question {
            id,
            text: text.to_owned(),
            kind: QuestionKind::SingleChoice { options: options.clone() },
        })
        .collect()
}

impl From<RawSurvey> for Survey {
    fn from(raw: RawSurvey) -> Self {
        let questions = if raw.perguntas.is_empty() {
            raw.descricao
                .as_deref()
                .map(scale_questions)
                .unwrap_or_default()
        } else {
            raw.perguntas
                .into_iter()
                .map(|q| Question {
                    id: q.id,
                    text: q.texto,
                    kind: QuestionKind::classify(&q.tipo, q.opcoes.unwrap_or_default()),
                })
                .collect()
        };
        Self { id: raw.id, title: raw.titulo, description: raw.descricao, questions }
    }
}

impl From<Survey> for RawSurvey {
    fn from(survey: Survey) -> Self {
        let perguntas = survey
            .questions
            .into_iter()
            .map(|q| {
                let tipo = q.kind.tipo().to_owned();
                let opcoes = match q.kind {
                    QuestionKind::SingleChoice { options } | QuestionKind::MultipleChoice { options } => Some(options),
                    QuestionKind::OpenText => None,
                };
                RawQuestion { id: q.id, texto: q.text, tipo, opcoes }
            })
            .collect();
        Self { id: survey.id, titulo: survey.title, descricao: survey.description, perguntas }
    }
}

/// One element of the `POST /questionario/resposta` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerPayload {
    #[serde(rename = "perguntaId")]
    pub question_id: i64,
    #[serde(rename = "opcaoId")]
    pub option_id: Option<i64>,
    pub texto: Option<String>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
