//! User entity and field validation.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Minimum length for `name` and `family`.
pub const NAME_MIN: usize = 2;
/// Maximum length for `name` and `family`.
pub const NAME_MAX: usize = 30;
/// Minimum accepted age.
pub const AGE_MIN: i32 = 18;
/// Maximum accepted age.
pub const AGE_MAX: i32 = 120;
/// Maximum length for `email`, matching the storage column width.
pub const EMAIL_MAX: usize = 254;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    // Intentionally permissive: uniqueness and canonical form are owned by
    // the storage layer, this only rejects obviously malformed addresses.
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .expect("email pattern compiles")
    })
}

/// Storage-assigned surrogate key for a user.
///
/// Route segments parse into this type via [`FromStr`], accepting unsigned
/// decimal input that fits the database's `BIGSERIAL` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw database identifier.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a path segment is not a usable user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("user id must be an unsigned integer")]
pub struct ParseUserIdError;

impl FromStr for UserId {
    type Err = ParseUserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u64 = s.parse().map_err(|_| ParseUserIdError)?;
        let id = i64::try_from(raw).map_err(|_| ParseUserIdError)?;
        Ok(Self(id))
    }
}

/// Persisted user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub family: String,
    pub email: String,
    pub age: i32,
}

/// Validated draft for a user that has not been persisted yet.
///
/// The only way to obtain one is [`NewUser::new`], so a `NewUser` reaching
/// the repository always satisfies the field bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub family: String,
    pub email: String,
    pub age: i32,
}

impl NewUser {
    /// Validate all fields, collecting every violation.
    pub fn new(
        name: impl Into<String>,
        family: impl Into<String>,
        email: impl Into<String>,
        age: i32,
    ) -> Result<Self, UserValidationError> {
        let name = name.into();
        let family = family.into();
        let email = email.into();

        let mut violations = Vec::new();
        if !name_in_bounds(&name) {
            violations.push(UserFieldError::NameLength);
        }
        if !name_in_bounds(&family) {
            violations.push(UserFieldError::FamilyLength);
        }
        if !email_regex().is_match(&email) {
            violations.push(UserFieldError::EmailFormat);
        }
        if !email_in_bounds(&email) {
            violations.push(UserFieldError::EmailLength);
        }
        if !age_in_bounds(age) {
            violations.push(UserFieldError::AgeOutOfRange);
        }

        if violations.is_empty() {
            Ok(Self {
                name,
                family,
                email,
                age,
            })
        } else {
            Err(UserValidationError(violations))
        }
    }
}

/// Partial update where absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub family: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

impl UserUpdate {
    /// Validate the fields that are present, collecting every violation.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        let mut violations = Vec::new();
        if let Some(name) = &self.name
            && !name_in_bounds(name)
        {
            violations.push(UserFieldError::NameLength);
        }
        if let Some(family) = &self.family
            && !name_in_bounds(family)
        {
            violations.push(UserFieldError::FamilyLength);
        }
        if let Some(email) = &self.email {
            if !email_regex().is_match(email) {
                violations.push(UserFieldError::EmailFormat);
            }
            if !email_in_bounds(email) {
                violations.push(UserFieldError::EmailLength);
            }
        }
        if let Some(age) = self.age
            && !age_in_bounds(age)
        {
            violations.push(UserFieldError::AgeOutOfRange);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(UserValidationError(violations))
        }
    }

    /// Merge the provided fields into an existing record.
    pub fn apply(self, mut user: User) -> User {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(family) = self.family {
            user.family = family;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(age) = self.age {
            user.age = age;
        }
        user
    }
}

fn name_in_bounds(value: &str) -> bool {
    (NAME_MIN..=NAME_MAX).contains(&value.chars().count())
}

fn email_in_bounds(value: &str) -> bool {
    value.chars().count() <= EMAIL_MAX
}

fn age_in_bounds(age: i32) -> bool {
    (AGE_MIN..=AGE_MAX).contains(&age)
}

/// A single field-level validation violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFieldError {
    NameLength,
    FamilyLength,
    EmailFormat,
    EmailLength,
    AgeOutOfRange,
}

impl UserFieldError {
    /// JSON field the violation refers to.
    pub fn field(self) -> &'static str {
        match self {
            Self::NameLength => "name",
            Self::FamilyLength => "family",
            Self::EmailFormat | Self::EmailLength => "email",
            Self::AgeOutOfRange => "age",
        }
    }

    /// Stable machine-readable violation code.
    pub fn code(self) -> &'static str {
        match self {
            Self::NameLength | Self::FamilyLength | Self::EmailLength => "length",
            Self::EmailFormat => "format",
            Self::AgeOutOfRange => "range",
        }
    }
}

impl fmt::Display for UserFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameLength => {
                write!(f, "name must be between {NAME_MIN} and {NAME_MAX} characters")
            }
            Self::FamilyLength => {
                write!(f, "family must be between {NAME_MIN} and {NAME_MAX} characters")
            }
            Self::EmailFormat => write!(f, "email must be a valid email address"),
            Self::EmailLength => {
                write!(f, "email must be at most {EMAIL_MAX} characters")
            }
            Self::AgeOutOfRange => write!(f, "age must be between {AGE_MIN} and {AGE_MAX}"),
        }
    }
}

/// Collected field violations from validating a request payload.
///
/// Never empty: constructors only produce it when at least one field failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("user validation failed")]
pub struct UserValidationError(Vec<UserFieldError>);

impl UserValidationError {
    /// The individual field violations.
    pub fn violations(&self) -> &[UserFieldError] {
        &self.0
    }
}
