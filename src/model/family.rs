use crate::Result;
use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The 4-digit numeric access code shared by a family.
#[derive(Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pin(String);

impl Pin {
    pub const LEN: usize = 4;

    /// Exact string comparison against user input.
    pub fn matches(&self, entered: &str) -> bool {
        self.0 == entered
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Pin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Pin(****)")
    }
}

impl FromStr for Pin {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        ensure!(
            s.len() == Self::LEN && s.bytes().all(|b| b.is_ascii_digit()),
            "The PIN must be exactly {} digits",
            Self::LEN
        );
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for Pin {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Pin::from_str(&value)
    }
}

impl From<Pin> for String {
    fn from(pin: Pin) -> Self {
        pin.0
    }
}

/// The family that owns this installation: its name, the people who record transactions and the
/// PIN that unlocks the data.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyProfile {
    family_name: String,
    members: Vec<String>,
    pin: Pin,
}

impl FamilyProfile {
    /// Creates a profile. Names are trimmed and blank member names are dropped.
    ///
    /// # Errors
    /// - The family name is blank.
    /// - No non-blank members are given.
    pub fn new<S, I>(family_name: impl Into<String>, members: I, pin: Pin) -> Result<Self>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let family_name = family_name.into().trim().to_string();
        ensure!(!family_name.is_empty(), "The family name cannot be empty");
        let members: Vec<String> = members
            .into_iter()
            .map(|m| m.as_ref().trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        ensure!(!members.is_empty(), "A family needs at least one member");
        Ok(Self {
            family_name,
            members,
            pin,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn pin(&self) -> &Pin {
        &self.pin
    }

    pub fn is_member(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }

    /// Returns a copy of this profile with `name` appended to the members.
    pub fn with_member(&self, name: &str) -> Result<Self> {
        let name = name.trim();
        ensure!(!name.is_empty(), "The member name cannot be empty");
        let mut next = self.clone();
        next.members.push(name.to_string());
        Ok(next)
    }

    /// Returns a copy of this profile with every member equal to `name` removed.
    pub fn without_member(&self, name: &str) -> Result<Self> {
        if !self.is_member(name) {
            bail!("'{name}' is not a member of this family");
        }
        let mut next = self.clone();
        next.members.retain(|m| m != name);
        Ok(next)
    }
}

impl Display for FamilyProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.family_name, self.members.join(", "))
    }
}
