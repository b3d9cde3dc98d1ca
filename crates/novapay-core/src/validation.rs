//! Field validators shared by the registration wizard and the modal flows.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

pub const REQUIRED: &str = "Campo obligatorio";
pub const INVALID_EMAIL: &str = "Correo invalido";
pub const INVALID_PHONE: &str = "Debe tener 10 digitos";
pub const WEAK_PASSWORD: &str = "La contrasena no cumple todos los requisitos";
pub const PASSWORD_MISMATCH: &str = "Las contrasenas no coinciden";
pub const INVALID_AMOUNT: &str = "Monto invalido";
pub const AMOUNT_BELOW_MINIMUM: &str = "El monto minimo es $1.00";

pub const PHONE_DIGITS: usize = 10;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Per-field validation messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    entries: BTreeMap<&'static str, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.entries.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries.get(field).map(String::as_str)
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.entries.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.entries {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Password strength rules. A password must satisfy all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordRule {
    Length,
    Upper,
    Lower,
    Number,
}

impl PasswordRule {
    pub const ALL: [PasswordRule; 4] = [
        PasswordRule::Length,
        PasswordRule::Upper,
        PasswordRule::Lower,
        PasswordRule::Number,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Number => "number",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Length => "Minimo 8 caracteres",
            Self::Upper => "Al menos una letra mayuscula",
            Self::Lower => "Al menos una letra minuscula",
            Self::Number => "Al menos un numero",
        }
    }

    pub fn test(self, password: &str) -> bool {
        match self {
            Self::Length => password.chars().count() >= MIN_PASSWORD_LEN,
            Self::Upper => password.chars().any(|c| c.is_ascii_uppercase()),
            Self::Lower => password.chars().any(|c| c.is_ascii_lowercase()),
            Self::Number => password.chars().any(|c| c.is_ascii_digit()),
        }
    }
}

pub fn password_meets_all_rules(password: &str) -> bool {
    PasswordRule::ALL.iter().all(|rule| rule.test(password))
}

/// Live checklist shown under the password field.
///
/// Nothing is reported as satisfied while the password is still empty.
pub fn password_checklist(password: &str) -> Vec<(PasswordRule, bool)> {
    PasswordRule::ALL
        .iter()
        .map(|rule| (*rule, !password.is_empty() && rule.test(password)))
        .collect()
}

/// `local@domain.tld` shape. A pattern that fails to compile rejects every address.
static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == PHONE_DIGITS && phone.chars().all(|c| c.is_ascii_digit())
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
