use std::fmt::{Display, Formatter};
use std::str::FromStr;

use assetdesk_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

const ROLE_SLUG_MAX_LENGTH: usize = 64;

/// Roles compiled into the process and seeded at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SystemRole {
    /// Organization-wide operator; bypasses branch and department scoping.
    Superuser,
    /// Branch administrator; bypasses department scoping.
    Admin,
    /// Department manager.
    Manager,
    /// Maintenance technician.
    Technician,
    /// Front-line staff.
    Staff,
    /// Read-only observer.
    Viewer,
}

impl SystemRole {
    /// Returns the stable slug for this role.
    #[must_use]
    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Superuser => "superuser",
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Technician => "technician",
            Self::Staff => "staff",
            Self::Viewer => "viewer",
        }
    }

    /// Returns a human-readable default name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Superuser => "Superuser",
            Self::Admin => "Administrator",
            Self::Manager => "Manager",
            Self::Technician => "Technician",
            Self::Staff => "Staff",
            Self::Viewer => "Viewer",
        }
    }

    /// Returns all system roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[SystemRole] = &[
            SystemRole::Superuser,
            SystemRole::Admin,
            SystemRole::Manager,
            SystemRole::Technician,
            SystemRole::Staff,
            SystemRole::Viewer,
        ];

        ALL
    }

    /// Finds the system role with the given slug.
    #[must_use]
    pub fn from_slug(value: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.as_slug() == value)
    }
}

/// Validated role slug.
///
/// Slugs are lowercase ASCII letters, digits and `_`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleSlug(String);

impl RoleSlug {
    /// Creates a validated slug.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "role slug must not be empty".to_owned(),
            ));
        }

        if trimmed.len() > ROLE_SLUG_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "role slug must be at most {ROLE_SLUG_MAX_LENGTH} characters"
            )));
        }

        if !trimmed
            .chars()
            .all(|character| matches!(character, 'a'..='z' | '0'..='9' | '_'))
        {
            return Err(AppError::Validation(format!(
                "role slug '{trimmed}' may only contain lowercase letters, digits and '_'"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the slug of a system role.
    #[must_use]
    pub fn system(role: SystemRole) -> Self {
        Self(role.as_slug().to_owned())
    }

    /// Returns the slug value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the matching system role, if any.
    #[must_use]
    pub fn as_system(&self) -> Option<SystemRole> {
        SystemRole::from_slug(self.as_str())
    }

    /// Returns whether this is the organization-wide superuser role.
    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.as_system() == Some(SystemRole::Superuser)
    }

    /// Returns whether the role sees every department.
    #[must_use]
    pub fn bypasses_department_scope(&self) -> bool {
        matches!(
            self.as_system(),
            Some(SystemRole::Superuser | SystemRole::Admin)
        )
    }
}

impl Display for RoleSlug {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for RoleSlug {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<String> for RoleSlug {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleSlug> for String {
    fn from(value: RoleSlug) -> Self {
        value.0
    }
}

/// Persisted role entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    slug: RoleSlug,
    name: String,
    description: Option<String>,
    is_system: bool,
}

impl RoleDefinition {
    /// Creates a validated role definition.
    pub fn new(
        slug: RoleSlug,
        name: impl Into<String>,
        description: Option<String>,
        is_system: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            slug,
            name: NonEmptyString::new(name)?.into(),
            description: description.filter(|value| !value.trim().is_empty()),
            is_system,
        })
    }

    /// Creates the seeded definition of a system role.
    #[must_use]
    pub fn for_system_role(role: SystemRole) -> Self {
        Self {
            slug: RoleSlug::system(role),
            name: role.display_name().to_owned(),
            description: None,
            is_system: true,
        }
    }

    /// Returns the role slug.
    #[must_use]
    pub fn slug(&self) -> &RoleSlug {
        &self.slug
    }

    /// Returns the role display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the role description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the role is system-managed.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.is_system
    }
}
