use log::debug;

/// Vibration motor of the host. Failures are never reported, haptics are a nicety.
pub trait Haptics: Send + Sync {
    // alternating on/off durations in milliseconds, starting with "on"
    fn vibrate(&self, pattern: &[u64]);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn vibrate(&self, pattern: &[u64]) {
        debug!("Vibrate {:?} (no haptics on this host)", pattern);
    }
}
