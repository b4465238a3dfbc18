use crate::args::ResetArgs;
use crate::commands::{confirm, unlock, Out};
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};

/// Deletes the family profile and every transaction from this device. Backup files and the
/// configuration are kept.
pub async fn reset(config: Config, pin: Option<&str>, args: ResetArgs) -> Result<Out<()>> {
    let mut household = unlock(&config, pin)?;
    confirm(
        args.yes(),
        "Resetting deletes your family and all transactions from this device.",
    )
    .pub_result(ErrorType::Input)?;
    household.reset().pub_result(ErrorType::Storage)?;
    Ok("All data was deleted from this device".into())
}
