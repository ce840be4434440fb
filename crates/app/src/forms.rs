//! Form view models
//!
//! Each form validates locally first. Any field error blocks submission and
//! no request is sent.

use std::collections::BTreeMap;

use streamia_core::{
    looks_like_email, parse_age, password_strength_color, password_strength_label,
    validate_age_input, validate_email, validate_name, validate_password, Credentials,
    PasswordRequirements, ProfileUpdate, Registration, User,
};

use crate::session::SessionStore;

pub const PASSWORDS_DIFFER: &str = "Las contraseñas no coinciden";
pub const EMAIL_REQUIRED: &str = "El correo electrónico es requerido";
pub const EMAIL_INVALID: &str = "El correo electrónico no es válido";
pub const INVALID_RESET_TOKEN: &str = "Token de recuperación no válido o expirado";

/// Field name to its first error
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Record `message` unless the field already has an error
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    fn add_first(&mut self, field: &'static str, errors: &[String]) {
        if let Some(first) = errors.first() {
            self.add(field, first.clone());
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn clear(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Strength meter shown under password inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrengthMeter {
    pub score: u8,
    pub label: &'static str,
    pub color: &'static str,
}

pub fn strength_meter(password: &str) -> StrengthMeter {
    let report = validate_password(password, &PasswordRequirements::default());
    StrengthMeter {
        score: report.score,
        label: password_strength_label(report.score),
        color: password_strength_color(report.score),
    }
}

fn check_new_password(errors: &mut FieldErrors, password: &str, confirm: &str) {
    let report = validate_password(password, &PasswordRequirements::default());
    errors.add_first("password", &report.errors);
    if password != confirm {
        errors.add("confirmPassword", PASSWORDS_DIFFER);
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub errors: FieldErrors,
}

impl LoginForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();

        if self.email.trim().is_empty() {
            errors.add("email", EMAIL_REQUIRED);
        } else if !looks_like_email(&self.email) {
            errors.add("email", EMAIL_INVALID);
        }

        if self.password.trim().is_empty() {
            errors.add("password", "La contraseña es requerida");
        } else if self.password.chars().count() < 6 {
            errors.add("password", "La contraseña debe tener al menos 6 caracteres");
        }

        errors
    }

    pub fn set_email(&mut self, value: &str) {
        self.email = value.to_string();
        self.errors.clear("email");
    }

    pub fn set_password(&mut self, value: &str) {
        self.password = value.to_string();
        self.errors.clear("password");
    }

    /// Validate, then sign in through `session`
    pub async fn submit(&mut self, session: &mut SessionStore) -> bool {
        session.clear_error();
        self.errors = self.validate();
        if !self.errors.is_empty() {
            return false;
        }
        let credentials = Credentials::new(self.email.trim(), self.password.as_str());
        session.login(&credentials).await
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub errors: FieldErrors,
}

impl RegisterForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.add_first("firstName", &validate_name(&self.first_name, "nombre").errors);
        errors.add_first("lastName", &validate_name(&self.last_name, "apellido").errors);
        errors.add_first("age", &validate_age_input(&self.age).errors);
        errors.add_first("email", &validate_email(self.email.trim()).errors);
        check_new_password(&mut errors, &self.password, &self.confirm_password);
        errors
    }

    pub fn strength(&self) -> StrengthMeter {
        strength_meter(&self.password)
    }

    /// Request body, once the form is valid
    pub fn registration(&self) -> Option<Registration> {
        if !self.validate().is_empty() {
            return None;
        }
        let age = u32::try_from(parse_age(&self.age)?).ok()?;
        Some(Registration {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            age,
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        })
    }

    pub async fn submit(&mut self, session: &mut SessionStore) -> bool {
        session.clear_error();
        self.errors = self.validate();
        match self.registration() {
            Some(registration) => session.register(&registration).await,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecoverPasswordForm {
    pub email: String,
    pub errors: FieldErrors,
}

impl RecoverPasswordForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.email.trim().is_empty() {
            errors.add("email", EMAIL_REQUIRED);
        } else if !looks_like_email(&self.email) {
            errors.add("email", EMAIL_INVALID);
        }
        errors
    }

    pub async fn submit(&mut self, session: &mut SessionStore) -> bool {
        self.errors = self.validate();
        if !self.errors.is_empty() {
            return false;
        }
        session.request_password_recovery(self.email.trim()).await
    }
}

/// Reset form opened from the recovery link. `token` comes from the link's
/// query string.
#[derive(Debug, Clone, Default)]
pub struct ResetPasswordForm {
    pub token: Option<String>,
    pub password: String,
    pub confirm_password: String,
    pub errors: FieldErrors,
    pub error: Option<String>,
}

impl ResetPasswordForm {
    pub fn new(token: Option<String>) -> Self {
        let token = token.filter(|t| !t.trim().is_empty());
        let error = token.is_none().then(|| INVALID_RESET_TOKEN.to_string());
        Self {
            token,
            error,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        check_new_password(&mut errors, &self.password, &self.confirm_password);
        errors
    }

    pub fn strength(&self) -> StrengthMeter {
        strength_meter(&self.password)
    }

    pub async fn submit(&mut self, session: &mut SessionStore) -> bool {
        self.error = None;
        self.errors = self.validate();
        if !self.errors.is_empty() {
            return false;
        }
        let Some(token) = self.token.clone() else {
            self.error = Some("Token de recuperación no válido".to_string());
            return false;
        };
        let ok = session
            .reset_password(&token, &self.password, &self.confirm_password)
            .await;
        if !ok {
            self.error = session.error().map(str::to_string);
        }
        ok
    }
}

/// Profile editor seeded from the current user
#[derive(Debug, Clone)]
pub struct ProfileForm {
    original: User,
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub errors: FieldErrors,
}

impl ProfileForm {
    pub fn new(user: &User) -> Self {
        Self {
            original: user.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            age: user.age.to_string(),
            email: user.email.clone(),
            password: String::new(),
            confirm_password: String::new(),
            errors: FieldErrors::default(),
        }
    }

    /// Validate only what changed and collect it into an update
    pub fn changes(&self) -> Result<ProfileUpdate, FieldErrors> {
        let mut errors = FieldErrors::default();
        let mut update = ProfileUpdate::default();

        let first_name = self.first_name.trim();
        if first_name != self.original.first_name {
            errors.add_first("firstName", &validate_name(first_name, "nombre").errors);
            update.first_name = Some(first_name.to_string());
        }

        let last_name = self.last_name.trim();
        if last_name != self.original.last_name {
            errors.add_first("lastName", &validate_name(last_name, "apellido").errors);
            update.last_name = Some(last_name.to_string());
        }

        if self.age.trim() != self.original.age.to_string() {
            errors.add_first("age", &validate_age_input(&self.age).errors);
            update.age = parse_age(&self.age).and_then(|a| u32::try_from(a).ok());
        }

        let email = self.email.trim();
        if email != self.original.email {
            errors.add_first("email", &validate_email(email).errors);
            update.email = Some(email.to_string());
        }

        if !self.password.is_empty() || !self.confirm_password.is_empty() {
            check_new_password(&mut errors, &self.password, &self.confirm_password);
            update.password = Some(self.password.clone());
            update.confirm_password = Some(self.confirm_password.clone());
        }

        if errors.is_empty() {
            Ok(update)
        } else {
            Err(errors)
        }
    }

    pub async fn submit(&mut self, session: &mut SessionStore) -> bool {
        session.clear_error();
        match self.changes() {
            Ok(update) if update.is_empty() => {
                self.errors = FieldErrors::default();
                false
            }
            Ok(update) => {
                self.errors = FieldErrors::default();
                let ok = session.update_profile(&update).await;
                if ok {
                    if let Some(user) = session.user() {
                        *self = Self::new(user);
                    }
                }
                ok
            }
            Err(errors) => {
                self.errors = errors;
                false
            }
        }
    }
}
