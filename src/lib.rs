use std::env;
use std::sync::Arc;
use clap::Parser;
use log::info;
use crate::device::host::{AbsentHost, NfcHost};
use crate::error::{AppRunError, LoggingError};
use crate::gui::application::run_application;

pub mod badge;
pub mod config;
pub mod device;
pub mod error;
pub mod gui;

/// Pick a social battery status and write it to an NFC badge.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Ignore NFC readers and connect by tapping the icon instead
    #[arg(long)]
    pub simulate: bool,

    /// Use the reader whose name contains this text (default: the first reader)
    #[arg(long, value_name = "NAME")]
    pub reader: Option<String>,

    #[arg(long, value_name = "LEVEL", default_value_t = log::LevelFilter::Info)]
    pub log_level: log::LevelFilter,
}

pub fn init_logging(level: log::LevelFilter) -> Result<(), LoggingError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339(std::time::SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    if let Ok(log_file) = env::var("LOG_FILE") {
        dispatch = dispatch.chain(fern::log_file(log_file)?);
    }

    dispatch.apply()?;
    Ok(())
}

#[cfg(feature = "pcsc")]
fn hardware_host(reader: Option<&str>) -> Option<Arc<dyn NfcHost>> {
    match crate::device::pcsc_host::PcscHost::open(reader) {
        Ok(host) => Some(Arc::new(host)),
        Err(err) => {
            info!("No usable NFC reader ({}), falling back to simulated taps", err);
            None
        },
    }
}

#[cfg(not(feature = "pcsc"))]
fn hardware_host(_reader: Option<&str>) -> Option<Arc<dyn NfcHost>> {
    info!("Built without NFC reader support, using simulated taps");
    None
}

pub fn select_host(cli: &Cli) -> Arc<dyn NfcHost> {
    if cli.simulate {
        info!("Simulated taps requested");
        return Arc::new(AbsentHost);
    }

    hardware_host(cli.reader.as_deref()).unwrap_or_else(|| Arc::new(AbsentHost))
}

pub fn run(cli: Cli) -> Result<(), AppRunError> {
    let host = select_host(&cli);
    run_application(host)?;
    Ok(())
}
