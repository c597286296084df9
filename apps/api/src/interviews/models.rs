use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::store::Document;

pub const INTERVIEWS_COLLECTION: &str = "interviews";

const MISSING_FIELDS: &str = "Missing required fields.";

/// Stored body of an interview document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    pub role: String,
    /// e.g. "technical" / "behavioral". Not required at generation time.
    #[serde(rename = "type")]
    pub interview_type: Option<String>,
    pub level: String,
    pub techstack: Vec<String>,
    pub questions: Vec<String>,
    pub user_id: String,
    pub finalized: bool,
    pub cover_image: String,
    pub created_at: String,
}

pub type Interview = Document<InterviewRecord>;

/// `amount` as sent by the voice agent: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_json::Number),
    Text(String),
}

impl Amount {
    /// The positive integer count, if there is one.
    pub fn resolve(&self) -> Option<usize> {
        let n = match self {
            Amount::Number(n) => match n.as_u64() {
                Some(n) => n,
                None => {
                    let f = n.as_f64()?;
                    if f.fract() != 0.0 || f < 0.0 {
                        return None;
                    }
                    f as u64
                }
            },
            Amount::Text(s) => s.trim().parse::<u64>().ok()?,
        };
        usize::try_from(n).ok().filter(|n| *n > 0)
    }
}

/// Raw body of `POST /api/vapi/generate`. Every field is optional here so
/// that missing ones surface as a validation failure, not a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(rename = "type")]
    pub interview_type: Option<String>,
    pub role: Option<String>,
    pub level: Option<String>,
    pub techstack: Option<String>,
    pub amount: Option<Amount>,
    pub userid: Option<String>,
}

/// A validated question-generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRequest {
    pub role: String,
    pub level: String,
    /// Comma-delimited, exactly as received.
    pub techstack: String,
    pub amount: usize,
    pub interview_type: Option<String>,
    pub user_id: String,
}

impl GenerateRequest {
    /// Requires `userid`, `role`, `level`, `techstack` and a positive `amount`.
    /// `type` is passed through unchecked.
    pub fn validate(self) -> Result<QuestionRequest, AppError> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        Ok(QuestionRequest {
            user_id: present(self.userid).ok_or_else(missing_fields)?,
            role: present(self.role).ok_or_else(missing_fields)?,
            level: present(self.level).ok_or_else(missing_fields)?,
            techstack: present(self.techstack).ok_or_else(missing_fields)?,
            amount: self
                .amount
                .as_ref()
                .and_then(Amount::resolve)
                .ok_or_else(missing_fields)?,
            interview_type: self.interview_type,
        })
    }
}

/// Splits the comma-delimited tech stack, trimming each entry and keeping order.
pub fn parse_techstack(input: &str) -> Vec<String> {
    input.split(',').map(|s| s.trim().to_string()).collect()
}

/// The validation error returned for any missing generation field.
pub fn missing_fields() -> AppError {
    AppError::Validation(MISSING_FIELDS.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_request() -> GenerateRequest {
        serde_json::from_value(json!({
            "type": "technical",
            "role": "Frontend Developer",
            "level": "Junior",
            "techstack": "React, Node, SQL",
            "amount": 5,
            "userid": "user-1"
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_techstack_trims_and_keeps_order() {
        assert_eq!(parse_techstack("React, Node, SQL"), vec!["React", "Node", "SQL"]);
        assert_eq!(parse_techstack("Rust"), vec!["Rust"]);
    }

    #[test]
    fn test_validate_accepts_complete_request() {
        let request = full_request().validate().unwrap();
        assert_eq!(request.amount, 5);
        assert_eq!(request.user_id, "user-1");
        assert_eq!(request.interview_type.as_deref(), Some("technical"));
    }

    #[test]
    fn test_each_required_field_is_enforced() {
        let clears: [fn(&mut GenerateRequest); 5] = [
            |r| r.userid = None,
            |r| r.role = None,
            |r| r.level = None,
            |r| r.techstack = Some(String::new()),
            |r| r.amount = None,
        ];
        for clear in clears {
            let mut request = full_request();
            clear(&mut request);
            assert!(matches!(request.validate(), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn test_type_is_not_required() {
        let mut request = full_request();
        request.interview_type = None;
        let validated = request.validate().unwrap();
        assert!(validated.interview_type.is_none());
    }

    #[test]
    fn test_amount_accepts_numbers_and_numeric_strings() {
        let parse = |v: serde_json::Value| serde_json::from_value::<Amount>(v).unwrap().resolve();
        assert_eq!(parse(json!(3)), Some(3));
        assert_eq!(parse(json!("4")), Some(4));
        assert_eq!(parse(json!(5.0)), Some(5));
        assert_eq!(parse(json!(0)), None);
        assert_eq!(parse(json!(-2)), None);
        assert_eq!(parse(json!(2.5)), None);
        assert_eq!(parse(json!("many")), None);
    }

    #[test]
    fn test_record_serializes_type_and_camel_case_fields() {
        let record = InterviewRecord {
            role: "Backend".to_string(),
            interview_type: None,
            level: "Senior".to_string(),
            techstack: vec!["Go".to_string()],
            questions: vec!["Q1".to_string()],
            user_id: "u1".to_string(),
            finalized: true,
            cover_image: "/covers/adobe.png".to_string(),
            created_at: "2025-01-01T00:00:00.000Z".to_string(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], serde_json::Value::Null);
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["coverImage"], "/covers/adobe.png");
        assert_eq!(value["createdAt"], "2025-01-01T00:00:00.000Z");
    }
}
