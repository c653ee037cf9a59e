// Client identity and contact validation.
//
// Purpose
// - ClientContact: the validated contact fields stored on a booking.
// - SessionContext: injected, read-only view of who is booking (anonymous or a known profile).
// - validate_client_details: synchronous per-field validation for the client-details step.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

// Digits with an optional leading +, separated by spaces, dashes, dots or parentheses.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-.()]+$").expect("phone pattern compiles"));

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_PHONE_DIGITS: usize = 8;
pub const MAX_PHONE_DIGITS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Phone,
    Service,
    Professional,
    Date,
    Time,
    Booking,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Service => "service",
            Field::Professional => "professional",
            Field::Date => "date",
            Field::Time => "time",
            Field::Booking => "booking",
        };
        f.write_str(name)
    }
}

/// User-correctable input problem, reported per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub errors: BTreeMap<Field, String>,
}

impl ValidationError {
    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field, message.into());
        Self { errors }
    }

    /// Keep the first message reported for a field.
    pub fn merge(&mut self, other: ValidationError) {
        for (field, message) in other.errors {
            self.errors.entry(field).or_insert(message);
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid input")?;
        for (i, (field, message)) in self.errors.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Raw form input for the client-details step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientDetailsInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub notes: Option<String>,
}

pub fn validate_client_details(
    input: &ClientDetailsInput,
) -> Result<(ClientContact, Option<String>), ValidationError> {
    let name = input.name.trim();
    let email = input.email.trim();
    let phone = input.phone.trim();

    let mut errors = BTreeMap::new();
    if name.chars().count() < MIN_NAME_CHARS {
        errors.insert(
            Field::Name,
            format!("name must be at least {MIN_NAME_CHARS} characters"),
        );
    }
    if !EMAIL_PATTERN.is_match(email) {
        errors.insert(Field::Email, "enter a valid email address".to_string());
    }
    if !is_valid_phone(phone) {
        errors.insert(Field::Phone, "enter a valid phone number".to_string());
    }
    if !errors.is_empty() {
        return Err(ValidationError { errors });
    }

    let notes = input
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    Ok((
        ClientContact {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        },
        notes,
    ))
}

fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    PHONE_PATTERN.is_match(phone) && (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
}

/// Profile of an authenticated client, as provided by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub user_id: String,
    pub display_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
}

impl ClientProfile {
    /// Display name, falling back to the local part of the email.
    pub fn name(&self) -> String {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.email.split('@').next().unwrap_or_default().to_string())
    }

    pub fn prefill(&self) -> ClientDetailsInput {
        ClientDetailsInput {
            name: self.name(),
            email: self.email.clone(),
            phone: self.phone.clone().unwrap_or_default(),
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionContext {
    #[default]
    Anonymous,
    Authenticated(ClientProfile),
}

impl SessionContext {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            SessionContext::Anonymous => None,
            SessionContext::Authenticated(profile) => Some(&profile.user_id),
        }
    }

    /// Contact to use when the client-details step is skipped.
    ///
    /// Only a profile whose prefilled fields pass validation counts as identified;
    /// an incomplete profile still goes through the client-details step.
    pub fn identified_contact(&self) -> Option<ClientContact> {
        match self {
            SessionContext::Anonymous => None,
            SessionContext::Authenticated(profile) => validate_client_details(&profile.prefill())
                .ok()
                .map(|(contact, _)| contact),
        }
    }

    pub fn is_identified(&self) -> bool {
        self.identified_contact().is_some()
    }

    pub fn prefill(&self) -> ClientDetailsInput {
        match self {
            SessionContext::Anonymous => ClientDetailsInput::default(),
            SessionContext::Authenticated(profile) => profile.prefill(),
        }
    }
}

#[cfg(test)]
mod client_validation_tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn valid_input() -> ClientDetailsInput {
        ClientDetailsInput {
            name: "Juan Perez".into(),
            email: "juan@example.com".into(),
            phone: "+56 9 1234 5678".into(),
            notes: Some("  window seat  ".into()),
        }
    }

    #[rstest]
    fn it_should_accept_valid_details(valid_input: ClientDetailsInput) {
        let (contact, notes) = validate_client_details(&valid_input).unwrap();
        assert_eq!(contact.name, "Juan Perez");
        assert_eq!(contact.phone, "+56 9 1234 5678");
        assert_eq!(notes.as_deref(), Some("window seat"));
    }

    #[rstest]
    #[case("not-an-email")]
    #[case("a@b")]
    #[case("spaces in@mail.com")]
    #[case("")]
    fn it_should_flag_bad_emails(valid_input: ClientDetailsInput, #[case] email: &str) {
        let input = ClientDetailsInput {
            email: email.into(),
            ..valid_input
        };
        let err = validate_client_details(&input).unwrap_err();
        assert!(err.get(Field::Email).is_some());
        assert_eq!(err.errors.len(), 1);
    }

    #[rstest]
    #[case("123")]
    #[case("phone-number")]
    #[case("+56 9 1234 5678 9999 99")]
    #[case("++56912345678")]
    fn it_should_flag_bad_phones(valid_input: ClientDetailsInput, #[case] phone: &str) {
        let input = ClientDetailsInput {
            phone: phone.into(),
            ..valid_input
        };
        assert!(validate_client_details(&input).unwrap_err().get(Field::Phone).is_some());
    }

    #[rstest]
    #[case("(02) 2345-6789")]
    #[case("912345678")]
    #[case("+1.555.123.4567")]
    fn it_should_accept_common_phone_layouts(valid_input: ClientDetailsInput, #[case] phone: &str) {
        let input = ClientDetailsInput {
            phone: phone.into(),
            ..valid_input
        };
        assert!(validate_client_details(&input).is_ok());
    }

    #[rstest]
    fn it_should_report_every_failing_field() {
        let err = validate_client_details(&ClientDetailsInput {
            name: " J ".into(),
            email: "nope".into(),
            phone: "12".into(),
            notes: None,
        })
        .unwrap_err();
        assert_eq!(err.errors.len(), 3);
        assert_eq!(
            err.to_string(),
            "invalid input: name: name must be at least 2 characters; email: enter a valid email address; phone: enter a valid phone number"
        );
    }

    #[rstest]
    fn it_should_identify_a_complete_profile() {
        let session = SessionContext::Authenticated(ClientProfile {
            user_id: "u-1".into(),
            display_name: None,
            email: "maria.lopez@example.com".into(),
            phone: Some("+56 9 8765 4321".into()),
        });
        let contact = session.identified_contact().expect("profile is complete");
        assert_eq!(contact.name, "maria.lopez");
        assert_eq!(session.user_id(), Some("u-1"));
    }

    #[rstest]
    fn it_should_not_identify_a_profile_without_phone() {
        let session = SessionContext::Authenticated(ClientProfile {
            user_id: "u-2".into(),
            display_name: Some("Maria".into()),
            email: "maria@example.com".into(),
            phone: None,
        });
        assert!(!session.is_identified());
        assert_eq!(session.prefill().name, "Maria");
        assert!(!SessionContext::Anonymous.is_identified());
    }
}
