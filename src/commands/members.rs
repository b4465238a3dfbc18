use crate::commands::{plural, unlock, Out};
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};

pub async fn list_members(config: Config, pin: Option<&str>) -> Result<Out<Vec<String>>> {
    let household = unlock(&config, pin)?;
    let profile = household.require_profile()?;
    Ok(Out::new(
        format!(
            "The {} family has {}: {}",
            profile.family_name(),
            plural(profile.members().len(), "member", "members"),
            profile.members().join(", ")
        ),
        profile.members().to_vec(),
    ))
}

/// Adds a member. The change is saved immediately.
pub async fn add_member(config: Config, pin: Option<&str>, name: &str) -> Result<Out<Vec<String>>> {
    let mut household = unlock(&config, pin)?;
    let profile = household.add_member(name).pub_result(ErrorType::Input)?;
    Ok(Out::new(
        format!("Added '{}' to the {} family", name.trim(), profile.family_name()),
        profile.members().to_vec(),
    ))
}

/// Removes every member named `name`. Transactions they recorded are kept.
pub async fn remove_member(
    config: Config,
    pin: Option<&str>,
    name: &str,
) -> Result<Out<Vec<String>>> {
    let mut household = unlock(&config, pin)?;
    let profile = household.remove_member(name).pub_result(ErrorType::Input)?;
    Ok(Out::new(
        format!("Removed '{name}' from the {} family", profile.family_name()),
        profile.members().to_vec(),
    ))
}
