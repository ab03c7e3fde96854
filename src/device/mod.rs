pub mod apdu;
pub mod constants;
pub mod controller;
pub mod haptics;
pub mod host;
pub mod mock;
pub mod ndef;
#[cfg(feature = "pcsc")]
pub mod pcsc_host;
pub mod subscription;
pub mod types;
