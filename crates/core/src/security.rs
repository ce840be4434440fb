//! Form validation and input hygiene
//!
//! Pure functions used by the registration, login, profile and password
//! reset forms. Messages are user-facing and returned verbatim to the UI.

use std::sync::LazyLock;

use regex::Regex;

/// Password policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordRequirements {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_numbers: bool,
    pub require_special_chars: bool,
}

impl Default for PasswordRequirements {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: true,
            require_lowercase: true,
            require_numbers: true,
            require_special_chars: true,
        }
    }
}

/// Outcome of [`validate_password`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordReport {
    pub is_valid: bool,
    /// 0-100
    pub score: u8,
    pub errors: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Outcome of the email, age and name validators
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    fn invalid(error: impl Into<String>) -> Self {
        Self::from_errors(vec![error.into()])
    }

    /// First error, for single-line field messages
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

const SPECIAL_CHARS_PATTERN: &str = r#"[!@#$%^&*()_+\-=\[\]{};':"\\|,.<>/?]"#;

/// Local part, then one or more dot-separated domain labels with at least one dot
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$";

const NAME_PATTERN: &str = r"^[a-zA-ZáéíóúÁÉÍÓÚñÑ\s\-']+$";

static SPECIAL_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SPECIAL_CHARS_PATTERN).expect("valid regex"));
static COMMON_SEQUENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)123|abc|qwe|asd|zxc").expect("valid regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));
static QUICK_EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid regex"));
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(NAME_PATTERN).expect("valid regex"));
static EVENT_HANDLER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)on\w+=").expect("valid regex"));
static JS_PROTOCOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("valid regex"));

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "123456",
    "123456789",
    "qwerty",
    "abc123",
    "password123",
    "admin",
    "letmein",
    "welcome",
    "monkey",
];

const DISPOSABLE_DOMAINS: &[&str] = &[
    "10minutemail.com",
    "tempmail.org",
    "guerrillamail.com",
    "mailinator.com",
    "throwaway.email",
];

pub const MIN_AGE: i64 = 13;
pub const MAX_AGE: i64 = 120;

/// Length of the longest run of one repeated character
fn longest_run(s: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous = None;
    for c in s.chars() {
        if Some(c) == previous {
            current += 1;
        } else {
            current = 1;
            previous = Some(c);
        }
        longest = longest.max(current);
    }
    longest
}

/// Check password strength against `requirements`
pub fn validate_password(password: &str, requirements: &PasswordRequirements) -> PasswordReport {
    let mut errors = Vec::new();
    let mut suggestions = Vec::new();
    let mut score: i32 = 0;

    let length = password.chars().count();
    if length < requirements.min_length {
        errors.push(format!(
            "La contraseña debe tener al menos {} caracteres",
            requirements.min_length
        ));
    } else {
        score += 20;
    }

    let classes = [
        (
            requirements.require_uppercase,
            password.chars().any(|c| c.is_ascii_uppercase()),
            "La contraseña debe contener al menos una letra mayúscula",
        ),
        (
            requirements.require_lowercase,
            password.chars().any(|c| c.is_ascii_lowercase()),
            "La contraseña debe contener al menos una letra minúscula",
        ),
        (
            requirements.require_numbers,
            password.chars().any(|c| c.is_ascii_digit()),
            "La contraseña debe contener al menos un número",
        ),
        (
            requirements.require_special_chars,
            SPECIAL_CHARS_RE.is_match(password),
            "La contraseña debe contener al menos un carácter especial",
        ),
    ];

    for (required, present, message) in classes {
        if present {
            score += 20;
        } else if required {
            errors.push(message.to_string());
        }
    }

    if length > 12 {
        score += 10;
    }

    if longest_run(password) >= 3 {
        suggestions.push("Evita repetir el mismo carácter más de 2 veces".to_string());
        score -= 10;
    }

    if COMMON_SEQUENCE_RE.is_match(password) {
        suggestions.push("Evita secuencias comunes como \"123\" o \"abc\"".to_string());
        score -= 15;
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.iter().any(|common| lowered.contains(common)) {
        suggestions.push("Evita contraseñas comunes y fáciles de adivinar".to_string());
        score -= 20;
    }

    PasswordReport {
        is_valid: errors.is_empty(),
        score: score.clamp(0, 100) as u8,
        errors,
        suggestions,
    }
}

/// Validate email format and reject disposable providers
pub fn validate_email(email: &str) -> ValidationReport {
    if email.trim().is_empty() {
        return ValidationReport::invalid("El correo electrónico es requerido");
    }

    if !EMAIL_RE.is_match(email) {
        return ValidationReport::invalid("El formato del correo electrónico no es válido");
    }

    let mut errors = Vec::new();

    if email.len() > 254 {
        errors.push("El correo electrónico es demasiado largo".to_string());
    }

    if email.contains("..") || email.starts_with('.') || email.ends_with('.') {
        errors.push("El correo electrónico contiene caracteres inválidos".to_string());
    }

    let domain = email
        .split('@')
        .nth(1)
        .map(str::to_lowercase)
        .unwrap_or_default();
    if DISPOSABLE_DOMAINS.contains(&domain.as_str()) {
        errors.push("No se permiten correos electrónicos temporales".to_string());
    }

    ValidationReport::from_errors(errors)
}

/// Quick shape check used by the password recovery form
pub fn looks_like_email(email: &str) -> bool {
    QUICK_EMAIL_RE.is_match(email)
}

/// Validate an age already parsed to a number
pub fn validate_age(age: i64) -> ValidationReport {
    let mut errors = Vec::new();

    if age < MIN_AGE {
        errors.push(format!(
            "Debes tener al menos {} años para registrarte",
            MIN_AGE
        ));
    }

    if age > MAX_AGE {
        errors.push("La edad ingresada no es válida".to_string());
    }

    ValidationReport::from_errors(errors)
}

/// Validate an age typed into a text field. Leading digits are parsed the
/// way form inputs are usually read ("25 años" is 25).
pub fn validate_age_input(input: &str) -> ValidationReport {
    match parse_age(input) {
        Some(age) => validate_age(age),
        None => ValidationReport::invalid("La edad debe ser un número válido"),
    }
}

/// Leading integer of an age field, if any
pub fn parse_age(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Validate a first or last name. `field` is the label used in messages.
pub fn validate_name(name: &str, field: &str) -> ValidationReport {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return ValidationReport::invalid(format!("El {} es requerido", field));
    }

    let mut errors = Vec::new();
    let length = trimmed.chars().count();

    if length < 2 {
        errors.push(format!("El {} debe tener al menos 2 caracteres", field));
    }

    if length > 50 {
        errors.push(format!("El {} no puede tener más de 50 caracteres", field));
    }

    if !NAME_RE.is_match(name) {
        errors.push(format!(
            "El {} solo puede contener letras, espacios, guiones y apostrofes",
            field
        ));
    }

    if longest_run(name) >= 4 {
        errors.push(format!(
            "El {} no puede tener el mismo carácter repetido más de 3 veces",
            field
        ));
    }

    ValidationReport::from_errors(errors)
}

/// Strip markup and script vectors from free text
pub fn sanitize_input(input: &str) -> String {
    let stripped: String = input.trim().chars().filter(|c| *c != '<' && *c != '>').collect();
    let stripped = JS_PROTOCOL_RE.replace_all(&stripped, "");
    EVENT_HANDLER_RE.replace_all(&stripped, "").into_owned()
}

pub fn password_strength_label(score: u8) -> &'static str {
    match score {
        80..=u8::MAX => "Muy fuerte",
        60..=79 => "Fuerte",
        40..=59 => "Moderada",
        20..=39 => "Débil",
        _ => "Muy débil",
    }
}

pub fn password_strength_color(score: u8) -> &'static str {
    match score {
        80..=u8::MAX => "#4CAF50",
        60..=79 => "#8BC34A",
        40..=59 => "#FFC107",
        20..=39 => "#FF9800",
        _ => "#F44336",
    }
}
