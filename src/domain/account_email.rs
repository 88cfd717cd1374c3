use validator::ValidateEmail;

// Login and registration emails are compared in their trimmed, lowercased form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountEmail(String);

impl AccountEmail{
    pub fn parse(raw: &str) -> Result<AccountEmail, String>{
        let normalized = raw.trim().to_lowercase();
        if normalized.validate_email() {
            Ok(Self(normalized))
        } else {
            Err(format!("{} is not a valid email", raw.trim()))
        }
    }

    // Login does not validate syntax, an unknown address is just not found
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for AccountEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
