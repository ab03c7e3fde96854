use clap::Parser;
use log::{error, info};
use social_battery::{init_logging, run, Cli};
use social_battery::error::{AppRunError, ConfigError};

fn main() -> Result<(), AppRunError> {
    let cli = Cli::parse();

    init_logging(cli.log_level)?;
    info!(concat!("Social Battery ", env!("CARGO_PKG_VERSION")));

    match run(cli) {
        Err(AppRunError::ConfigError { source: ConfigError::CanNotLock { .. } }) => {
            eprintln!("Social Battery is already running");
            Ok(())
        },
        Err(err) => {
            error!("Unexpected error: {}", &err);
            Err(err)
        },
        Ok(_) => Ok(()),
    }
}
