//! Form state and validation for the auth dialog, the password reset page and the
//! lawyer profile editor. Messages are user-facing and shown as-is.

use chrono::NaiveDate;

use crate::error::SessionError;
use crate::models::{Profile, ProfileUpdate, Role};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_PHONE_DIGITS: usize = 10;

/// The three faces of the auth dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthView {
    #[default]
    Login,
    SignUp,
    ForgotPassword,
}

impl AuthView {
    pub fn title(&self) -> &'static str {
        match self {
            AuthView::Login => "Welcome Back",
            AuthView::SignUp => "Join Unseen Lawyers",
            AuthView::ForgotPassword => "Reset Password",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    /// Which path the visitor says they are signing in on. Informational only; the
    /// real role comes from the backend after sign-in.
    pub intent: LoginIntent,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginIntent {
    #[default]
    Client,
    Lawyer,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), SessionError> {
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignUpForm {
    pub full_name: String,
    pub role: Role,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl Default for SignUpForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            role: Role::Client,
            email: String::new(),
            phone: String::new(),
            password: String::new(),
        }
    }
}

impl SignUpForm {
    /// Phone input keeps digits only, as typed.
    pub fn set_phone(&mut self, input: &str) {
        self.phone = digits_only(input);
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.full_name.trim().is_empty() {
            return Err(SessionError::validation("Please enter your full name"));
        }
        validate_email(&self.email)?;
        if self.phone.len() < MIN_PHONE_DIGITS {
            return Err(SessionError::validation("Please enter a valid phone number"));
        }
        validate_password(&self.password)
    }
}

/// New password + confirmation on `/reset-password`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPasswordForm {
    pub password: String,
    pub confirm_password: String,
}

impl NewPasswordForm {
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.password != self.confirm_password {
            return Err(SessionError::validation("Passwords do not match"));
        }
        validate_password(&self.password)
    }
}

/// Token pair carried in the fragment of a password recovery link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryFragment {
    pub access_token: String,
    pub refresh_token: String,
}

impl RecoveryFragment {
    /// Parse `#access_token=...&refresh_token=...&type=recovery`. Anything that is not a
    /// recovery link with an access token yields `None`.
    pub fn parse(fragment: &str) -> Option<Self> {
        let mut access_token = None;
        let mut refresh_token = None;
        let mut is_recovery = false;
        for (key, value) in fragment
            .trim_start_matches('#')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
        {
            match key {
                "access_token" if !value.is_empty() => access_token = Some(value.to_string()),
                "refresh_token" => refresh_token = Some(value.to_string()),
                "type" => is_recovery = value == "recovery",
                _ => {}
            }
        }
        if !is_recovery {
            return None;
        }
        Some(Self {
            access_token: access_token?,
            refresh_token: refresh_token.unwrap_or_default(),
        })
    }
}

/// Text fields of the lawyer profile editor, as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct LawyerProfileForm {
    pub full_name: String,
    pub phone: String,
    pub bio: String,
    pub date_of_birth: String,
    pub father_husband_name: String,
    pub nationality: String,
    pub enrollment_number: String,
    pub enrollment_date: String,
    pub law_degree_university: String,
    pub years_of_experience: String,
    /// Comma separated.
    pub practice_areas: String,
    pub office_address: String,
    pub city: String,
    pub state: String,
    pub linkedin_url: String,
}

impl Default for LawyerProfileForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            phone: String::new(),
            bio: String::new(),
            date_of_birth: String::new(),
            father_husband_name: String::new(),
            nationality: "Indian".to_string(),
            enrollment_number: String::new(),
            enrollment_date: String::new(),
            law_degree_university: String::new(),
            years_of_experience: String::new(),
            practice_areas: String::new(),
            office_address: String::new(),
            city: String::new(),
            state: String::new(),
            linkedin_url: String::new(),
        }
    }
}

impl LawyerProfileForm {
    /// Pre-fill from a stored profile.
    pub fn from_profile(profile: &Profile) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        let date = |value: &Option<NaiveDate>| value.map(|d| d.to_string()).unwrap_or_default();
        Self {
            full_name: text(&profile.full_name),
            phone: text(&profile.phone),
            bio: text(&profile.bio),
            date_of_birth: date(&profile.date_of_birth),
            father_husband_name: text(&profile.father_husband_name),
            nationality: profile
                .nationality
                .clone()
                .unwrap_or_else(|| "Indian".to_string()),
            enrollment_number: text(&profile.enrollment_number),
            enrollment_date: date(&profile.enrollment_date),
            law_degree_university: text(&profile.law_degree_university),
            years_of_experience: profile
                .years_of_experience
                .map(|years| years.to_string())
                .unwrap_or_default(),
            practice_areas: profile
                .practice_areas
                .as_ref()
                .map(|areas| areas.join(", "))
                .unwrap_or_default(),
            office_address: text(&profile.office_address),
            city: text(&profile.city),
            state: text(&profile.state),
            linkedin_url: text(&profile.linkedin_url),
        }
    }

    pub fn validate(&self) -> Result<ProfileUpdate, SessionError> {
        if self.full_name.trim().is_empty()
            || self.enrollment_number.trim().is_empty()
            || self.law_degree_university.trim().is_empty()
        {
            return Err(SessionError::validation(
                "Please fill in all required fields (Full Name, Enrollment Number, University).",
            ));
        }

        let years_of_experience = match self.years_of_experience.trim() {
            "" => None,
            years => Some(years.parse::<i32>().map_err(|_| {
                SessionError::validation("Years of experience must be a whole number")
            })?),
        };

        Ok(ProfileUpdate {
            full_name: self.full_name.trim().to_string(),
            phone: optional(&self.phone),
            bio: optional(&self.bio),
            date_of_birth: parse_date(&self.date_of_birth, "Date of birth")?,
            father_husband_name: optional(&self.father_husband_name),
            nationality: optional(&self.nationality),
            enrollment_number: self.enrollment_number.trim().to_string(),
            enrollment_date: parse_date(&self.enrollment_date, "Enrollment date")?,
            law_degree_university: self.law_degree_university.trim().to_string(),
            years_of_experience,
            practice_areas: self
                .practice_areas
                .split(',')
                .map(str::trim)
                .filter(|area| !area.is_empty())
                .map(str::to_string)
                .collect(),
            office_address: optional(&self.office_address),
            city: optional(&self.city),
            state: optional(&self.state),
            linkedin_url: optional(&self.linkedin_url),
        })
    }
}

pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

fn validate_email(email: &str) -> Result<(), SessionError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(SessionError::validation("Please enter a valid email address"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), SessionError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SessionError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_date(value: &str, field: &str) -> Result<Option<NaiveDate>, SessionError> {
    match value.trim() {
        "" => Ok(None),
        date => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| SessionError::validation(format!("{field} must be a date (YYYY-MM-DD)"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_phone_rules() {
        let mut form = SignUpForm {
            full_name: "Asha Rao".to_string(),
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
            ..Default::default()
        };
        form.set_phone("+91 98765-4321");
        assert_eq!(form.phone, "91987654321");
        assert!(form.validate().is_ok());

        form.set_phone("12345");
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Please enter a valid phone number"
        );
    }

    #[test]
    fn test_login_password_length() {
        let form = LoginForm {
            email: "a@x.com".to_string(),
            password: "12345".to_string(),
            ..Default::default()
        };
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn test_new_password_must_match() {
        let form = NewPasswordForm {
            password: "secret1".to_string(),
            confirm_password: "secret2".to_string(),
        };
        assert_eq!(form.validate().unwrap_err().to_string(), "Passwords do not match");
    }

    #[test]
    fn test_recovery_fragment() {
        let parsed =
            RecoveryFragment::parse("#access_token=abc&expires_in=3600&refresh_token=def&type=recovery")
                .unwrap();
        assert_eq!(parsed.access_token, "abc");
        assert_eq!(parsed.refresh_token, "def");

        assert!(RecoveryFragment::parse("#access_token=abc&type=signup").is_none());
        assert!(RecoveryFragment::parse("#type=recovery").is_none());
        assert_eq!(
            RecoveryFragment::parse("access_token=abc&type=recovery")
                .unwrap()
                .refresh_token,
            ""
        );
    }

    #[test]
    fn test_lawyer_profile_required_fields() {
        let form = LawyerProfileForm {
            full_name: "Asha Rao".to_string(),
            ..Default::default()
        };
        assert!(matches!(form.validate(), Err(SessionError::Validation(_))));
    }

    #[test]
    fn test_lawyer_profile_conversion() {
        let form = LawyerProfileForm {
            full_name: " Asha Rao ".to_string(),
            enrollment_number: "MAH/1234/2015".to_string(),
            law_degree_university: "ILS Law College".to_string(),
            years_of_experience: "9".to_string(),
            practice_areas: "Family Law, , Property ,Criminal".to_string(),
            enrollment_date: "2015-07-01".to_string(),
            ..Default::default()
        };
        let update = form.validate().unwrap();
        assert_eq!(update.full_name, "Asha Rao");
        assert_eq!(update.practice_areas, vec!["Family Law", "Property", "Criminal"]);
        assert_eq!(update.years_of_experience, Some(9));
        assert_eq!(update.nationality.as_deref(), Some("Indian"));
        assert_eq!(update.enrollment_date, NaiveDate::from_ymd_opt(2015, 7, 1));
        assert!(update.city.is_none());

        let mut profile = Profile::default();
        profile.apply(&update);
        let round = LawyerProfileForm::from_profile(&profile);
        assert_eq!(round.practice_areas, "Family Law, Property, Criminal");
        assert_eq!(round.enrollment_date, "2015-07-01");
    }

    #[test]
    fn test_bad_years_of_experience() {
        let form = LawyerProfileForm {
            full_name: "Asha".to_string(),
            enrollment_number: "E1".to_string(),
            law_degree_university: "U".to_string(),
            years_of_experience: "nine".to_string(),
            ..Default::default()
        };
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Years of experience must be a whole number"
        );
    }
}
