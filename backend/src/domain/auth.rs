//! Credentials for signing in and registering.
//!
//! Both constructors validate every field before failing so the caller can
//! show all problems at once, the way the registration form renders them.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{ClassLabel, DisplayName, Email, ProfileValidationError, Role};

/// Minimum password length in characters.
pub const PASSWORD_MIN: usize = 6;

/// Input field a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CredentialField {
    Email,
    Password,
    DisplayName,
    Role,
    ClassLabel,
}

impl CredentialField {
    /// Field name as used in request bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::DisplayName => "displayName",
            Self::Role => "role",
            Self::ClassLabel => "classLabel",
        }
    }
}

/// Every field-level problem found in one submission, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(CredentialField, String)>);

impl FieldErrors {
    fn push(&mut self, field: CredentialField, message: impl fmt::Display) {
        self.0.push((field, message.to_string()));
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(field, message)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (CredentialField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Message recorded for `field`, if any.
    pub fn get(&self, field: CredentialField) -> Option<&str> {
        self.iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, message)| message)
    }

    /// First message, used as the headline of the error response.
    pub fn first_message(&self) -> Option<&str> {
        self.0.first().map(|(_, message)| message.as_str())
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {message}", field.as_str())?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

fn check_password(password: &str, errors: &mut FieldErrors) {
    if password.chars().count() < PASSWORD_MIN {
        errors.push(
            CredentialField::Password,
            format_args!("Password minimal {PASSWORD_MIN} karakter"),
        );
    }
}

fn capture<T>(
    result: Result<T, ProfileValidationError>,
    field: CredentialField,
    errors: &mut FieldErrors,
) -> Option<T> {
    result.map_err(|err| errors.push(field, err)).ok()
}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased, and shaped like an address.
/// - `password` has at least [`PASSWORD_MIN`] characters and keeps any
///   surrounding whitespace the caller typed.
///
/// # Examples
/// ```
/// use lab_reports::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Guru@Sekolah.id ", "rahasia").unwrap();
/// assert_eq!(creds.email().as_ref(), "guru@sekolah.id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw email and password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = capture(Email::new(email), CredentialField::Email, &mut errors);
        check_password(password, &mut errors);
        match email {
            Some(email) if errors.is_empty() => Ok(Self {
                email,
                password: Zeroizing::new(password.to_owned()),
            }),
            _ => Err(errors),
        }
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Raw registration form values.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationInput<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub display_name: &'a str,
    pub role: &'a str,
    pub class_label: Option<&'a str>,
}

/// Validated registration request.
///
/// ## Invariants
/// - Students always carry a class label.
/// - Teachers never carry one; any submitted value is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: Email,
    password: Zeroizing<String>,
    display_name: DisplayName,
    role: Role,
    class_label: Option<ClassLabel>,
}

impl Registration {
    /// Validate every field of the registration form.
    pub fn try_from_input(input: RegistrationInput<'_>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = capture(Email::new(input.email), CredentialField::Email, &mut errors);
        check_password(input.password, &mut errors);
        let display_name = capture(
            DisplayName::new(input.display_name),
            CredentialField::DisplayName,
            &mut errors,
        );
        let role = capture(input.role.parse::<Role>(), CredentialField::Role, &mut errors);
        let class_label = match role {
            Some(Role::Murid) => capture(
                ClassLabel::new(input.class_label.unwrap_or_default()),
                CredentialField::ClassLabel,
                &mut errors,
            ),
            _ => None,
        };

        match (email, display_name, role) {
            (Some(email), Some(display_name), Some(role)) if errors.is_empty() => Ok(Self {
                email,
                password: Zeroizing::new(input.password.to_owned()),
                display_name,
                role,
                class_label,
            }),
            _ => Err(errors),
        }
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn class_label(&self) -> Option<&ClassLabel> {
        self.class_label.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn student_input() -> RegistrationInput<'static> {
        RegistrationInput {
            email: "siti@sekolah.sch.id",
            password: "rahasia",
            display_name: "Siti Rahmawati",
            role: "MURID",
            class_label: Some("XI TKJ 2"),
        }
    }

    #[rstest]
    #[case("bukan-email", "rahasia", &[CredentialField::Email])]
    #[case("guru@sekolah.id", "12345", &[CredentialField::Password])]
    #[case("", "", &[CredentialField::Email, CredentialField::Password])]
    fn login_reports_every_bad_field(
        #[case] email: &str,
        #[case] password: &str,
        #[case] fields: &[CredentialField],
    ) {
        let errors = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        let seen: Vec<_> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(seen, fields);
    }

    #[rstest]
    fn login_keeps_password_verbatim() {
        let creds = LoginCredentials::try_from_parts("guru@sekolah.id", " spasi ")
            .expect("valid credentials");
        assert_eq!(creds.password(), " spasi ");
    }

    #[rstest]
    fn student_registration_succeeds(student_input: RegistrationInput<'static>) {
        let registration = Registration::try_from_input(student_input).expect("valid input");
        assert_eq!(registration.role(), Role::Murid);
        assert_eq!(
            registration.class_label().map(AsRef::as_ref),
            Some("XI TKJ 2")
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some("   "))]
    fn student_without_class_is_rejected(
        student_input: RegistrationInput<'static>,
        #[case] class_label: Option<&'static str>,
    ) {
        let errors = Registration::try_from_input(RegistrationInput {
            class_label,
            ..student_input
        })
        .expect_err("class label required");
        assert_eq!(
            errors.get(CredentialField::ClassLabel),
            Some("Kelas wajib diisi untuk Murid")
        );
    }

    #[rstest]
    fn teacher_class_label_is_dropped(student_input: RegistrationInput<'static>) {
        let registration = Registration::try_from_input(RegistrationInput {
            role: "GURU",
            ..student_input
        })
        .expect("valid input");
        assert_eq!(registration.role(), Role::Guru);
        assert!(registration.class_label().is_none());
    }

    #[rstest]
    fn all_messages_are_collected(student_input: RegistrationInput<'static>) {
        let errors = Registration::try_from_input(RegistrationInput {
            email: "x",
            password: "1",
            display_name: "A",
            ..student_input
        })
        .expect_err("invalid input");
        assert_eq!(errors.get(CredentialField::Email), Some("Email tidak valid"));
        assert_eq!(
            errors.get(CredentialField::Password),
            Some("Password minimal 6 karakter")
        );
        assert_eq!(
            errors.get(CredentialField::DisplayName),
            Some("Nama minimal 3 karakter")
        );
        assert_eq!(errors.first_message(), Some("Email tidak valid"));
    }

    #[rstest]
    fn unknown_role_is_a_field_error(student_input: RegistrationInput<'static>) {
        let errors = Registration::try_from_input(RegistrationInput {
            role: "KEPALA",
            ..student_input
        })
        .expect_err("unknown role");
        assert!(errors.get(CredentialField::Role).is_some());
        assert!(errors.get(CredentialField::ClassLabel).is_none());
    }
}
