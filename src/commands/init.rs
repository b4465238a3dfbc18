use crate::args::InitArgs;
use crate::commands::{open, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{FamilyProfile, Pin};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;
use std::str::FromStr;

/// Creates the data directory, its subdirectories and `config.json` if they do not yet exist,
/// then registers the family described by `args` with `pin` as its PIN.
///
/// # Errors
/// - Returns an error if any file operations fail.
/// - Returns an error if the family data is invalid or a family is already registered.
pub async fn init(
    budget_home: &Path,
    args: &InitArgs,
    pin: Option<&str>,
) -> Result<Out<Vec<String>>> {
    let pin = pin
        .context("Choose a 4-digit PIN for your family with --pin or BUDGET_PIN")
        .and_then(Pin::from_str)
        .pub_result(ErrorType::Input)?;
    let profile =
        FamilyProfile::new(args.family_name(), args.members(), pin).pub_result(ErrorType::Input)?;

    let config = Config::create(budget_home)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;

    let mut household = open(&config)?;
    household
        .register(profile.clone())
        .pub_result(ErrorType::Storage)?;

    Ok(Out::new(
        format!(
            "Welcome, {} family! Your data is kept in '{}'",
            profile.family_name(),
            config.root().display()
        ),
        profile.members().to_vec(),
    ))
}
