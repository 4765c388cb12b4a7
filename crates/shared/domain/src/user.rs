//! User domain entity and its field set.

/// Stored name of the email field
pub const FIELD_EMAIL: &str = "email";

/// Stored name of the display name field
pub const FIELD_NAME: &str = "name";

/// User domain entity.
///
/// The email is the business key and never changes once the user exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub name: String,
}

impl User {
    /// Create a new user
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }

    /// Update user's name
    pub fn update_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Values of every mutable field, in storage order.
    pub fn mutable_fields(&self) -> Vec<(UserField, String)> {
        UserField::MUTABLE
            .iter()
            .map(|field| (*field, self.value_of(*field).to_string()))
            .collect()
    }

    /// Value currently held by `field`.
    pub fn value_of(&self, field: UserField) -> &str {
        match field {
            UserField::Email => &self.email,
            UserField::Name => &self.name,
        }
    }
}

/// Persisted user fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Email,
    Name,
}

impl UserField {
    /// Every persisted field
    pub const ALL: &'static [UserField] = &[UserField::Email, UserField::Name];

    /// Fields an update is allowed to overwrite
    pub const MUTABLE: &'static [UserField] = &[UserField::Name];

    /// Field name as written to the store
    pub fn as_str(&self) -> &'static str {
        match self {
            UserField::Email => FIELD_EMAIL,
            UserField::Name => FIELD_NAME,
        }
    }

    /// Check if updates may overwrite this field
    pub fn is_mutable(&self) -> bool {
        Self::MUTABLE.contains(self)
    }
}

impl std::fmt::Display for UserField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
