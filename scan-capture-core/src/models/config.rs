use std::time::Duration;

/// Configuration for a scan session.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfiguration {
    /// Target decode rate in frames per second (default: 15).
    pub fps: u32,

    /// Fraction of the short view side used as the scan box (default: 0.60).
    pub scan_box_factor: f32,

    /// Ideal frame width requested from the stream (default: 1280).
    pub ideal_width: u32,

    /// Ideal frame height requested from the stream (default: 720).
    pub ideal_height: u32,

    /// Suppress preview mirroring, which confuses some detectors
    /// (default: true).
    pub disable_flip: bool,

    /// How long a freshly started session may run without a single decode
    /// before the engine mode is toggled and the session restarted
    /// (default: 8s). Wall-clock based.
    pub fallback_timeout: Duration,

    /// Minimum gap before the identical payload is accepted again
    /// (default: 1.5s). Always on, independent of `suppress_duplicates`.
    pub rescan_cooldown: Duration,

    /// Skip payloads already present anywhere in the history
    /// (default: true).
    pub suppress_duplicates: bool,

    /// Character budget for the most-recent-payload stat preview
    /// (default: 120).
    pub preview_chars: usize,
}

impl ScanConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.fps == 0 {
            return Err("fps must be positive".into());
        }
        if !(self.scan_box_factor > 0.0 && self.scan_box_factor <= 1.0) {
            return Err(format!("scan box factor out of range: {}", self.scan_box_factor));
        }
        if self.fallback_timeout.is_zero() {
            return Err("fallback timeout must be positive".into());
        }
        if self.rescan_cooldown.is_zero() {
            return Err("rescan cooldown must be positive".into());
        }
        if self.preview_chars == 0 {
            return Err("preview length must be positive".into());
        }
        Ok(())
    }

    /// Stream/decode parameters handed to the backend when opening a
    /// capture with the given detector preference.
    pub fn decode_config(&self, use_native_detector: bool) -> DecodeConfig {
        DecodeConfig {
            fps: self.fps,
            scan_box_factor: self.scan_box_factor,
            ideal_width: self.ideal_width,
            ideal_height: self.ideal_height,
            disable_flip: self.disable_flip,
            use_native_detector,
        }
    }
}

impl Default for ScanConfiguration {
    fn default() -> Self {
        Self {
            fps: 15,
            scan_box_factor: 0.60,
            ideal_width: 1280,
            ideal_height: 720,
            disable_flip: true,
            fallback_timeout: Duration::from_secs(8),
            rescan_cooldown: Duration::from_millis(1500),
            suppress_duplicates: true,
            preview_chars: 120,
        }
    }
}

/// Per-open parameters for a `DecodeBackend`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeConfig {
    pub fps: u32,
    pub scan_box_factor: f32,
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub disable_flip: bool,
    /// Prefer the hardware-assisted detector when the backend has one.
    pub use_native_detector: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        assert!(ScanConfiguration::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = ScanConfiguration::default();
        config.fps = 0;
        assert!(config.validate().is_err());

        let mut config = ScanConfiguration::default();
        config.scan_box_factor = 1.5;
        assert!(config.validate().is_err());

        let mut config = ScanConfiguration::default();
        config.fallback_timeout = Duration::ZERO;
        assert!(config.validate().is_err());

        // A zero cooldown would silently disable the rescan burst guard.
        let mut config = ScanConfiguration::default();
        config.rescan_cooldown = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn decode_config_carries_detector_preference() {
        let config = ScanConfiguration::default();
        assert!(config.decode_config(true).use_native_detector);
        assert!(!config.decode_config(false).use_native_detector);
    }
}
