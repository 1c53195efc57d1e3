//! # Support Requests
//!
//! The help-desk form and the static FAQ list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::checkout::is_order_number;
use crate::error::ValidationError;
use crate::validation::{optional_text, validate_email, validate_phone, validate_text, ValidationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SupportKind {
    /// General inquiry.
    General,
    /// Problem with an order.
    Order,
    /// Return or exchange.
    Return,
    /// Repair service.
    Repair,
}

/// The support form as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export)]
pub struct SupportRequestForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub order_number: Option<String>,
    pub kind: Option<SupportKind>,
    pub subject: String,
    pub description: String,
}

/// A support form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSupport {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub order_number: Option<String>,
    pub kind: SupportKind,
    pub subject: String,
    pub description: String,
}

impl SupportRequestForm {
    /// Name, email, kind, subject and description are required. Phone and
    /// order number are optional but must be well-formed when given.
    pub fn validate(&self) -> ValidationResult<ValidatedSupport> {
        let name = validate_text("name", &self.name, 100)?;
        let email = validate_email("email", &self.email)?;

        let phone = match optional_text(self.phone.as_deref()) {
            Some(phone) => Some(validate_phone("phone", &phone)?),
            None => None,
        };

        let order_number = optional_text(self.order_number.as_deref()).map(|n| n.to_uppercase());
        if let Some(number) = &order_number {
            if !is_order_number(number) {
                return Err(ValidationError::InvalidFormat {
                    field: "order_number".to_string(),
                    reason: "must look like FS123456".to_string(),
                });
            }
        }

        let kind = self.kind.ok_or_else(|| ValidationError::Required {
            field: "kind".to_string(),
        })?;

        Ok(ValidatedSupport {
            name,
            email,
            phone,
            order_number,
            kind,
            subject: validate_text("subject", &self.subject, 200)?,
            description: validate_text("description", &self.description, 4000)?,
        })
    }
}

/// A stored support request.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SupportRequest {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub order_number: Option<String>,
    pub kind: SupportKind,
    pub subject: String,
    pub description: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQS: &[Faq] = &[
    Faq {
        question: "How long does delivery take?",
        answer: "Standard delivery takes 5-7 business days. Express delivery is available for 2-3 business days.",
    },
    Faq {
        question: "What is your return policy?",
        answer: "We offer 30-day returns for unused items in original packaging. Custom furniture orders are non-returnable.",
    },
    Faq {
        question: "Do you provide assembly service?",
        answer: "Yes, we offer professional assembly service for ₹500-2000 depending on the furniture type.",
    },
    Faq {
        question: "How can I track my order?",
        answer: "You can track your order in the 'My Orders' section or use the tracking number sent via SMS/email.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SupportRequestForm {
        SupportRequestForm {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            phone: None,
            order_number: None,
            kind: Some(SupportKind::Repair),
            subject: "Chair wobbles".into(),
            description: "One leg is shorter than the others.".into(),
        }
    }

    #[test]
    fn test_minimal_form_is_valid() {
        let valid = form().validate().unwrap();
        assert_eq!(valid.kind, SupportKind::Repair);
        assert_eq!(valid.phone, None);
        assert_eq!(valid.order_number, None);
    }

    #[test]
    fn test_optional_fields_are_checked_when_present() {
        let mut with_extras = form();
        with_extras.phone = Some("  ".into());
        with_extras.order_number = Some("fs123456".into());
        let valid = with_extras.validate().unwrap();
        assert_eq!(valid.phone, None);
        assert_eq!(valid.order_number.as_deref(), Some("FS123456"));

        with_extras.order_number = Some("12345".into());
        assert_eq!(with_extras.validate().unwrap_err().field(), "order_number");
    }

    #[test]
    fn test_required_fields() {
        let mut missing = form();
        missing.kind = None;
        assert_eq!(missing.validate().unwrap_err().field(), "kind");

        let mut missing = form();
        missing.subject.clear();
        assert_eq!(missing.validate().unwrap_err().field(), "subject");
    }

    #[test]
    fn test_faqs_present() {
        assert_eq!(FAQS.len(), 4);
        assert!(FAQS.iter().all(|f| !f.question.is_empty() && !f.answer.is_empty()));
    }
}
