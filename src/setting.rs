//! Camera parameters, capture modes and transfer modes understood by the relay.

use std::fmt;

/// A camera parameter with get/set/list support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    ShutterSpeed,
    Iso,
    Aperture,
    ExposureCompensation,
    Compression,
    WhiteBalance,
}

impl Setting {
    /// Every setting, in the order the self-test walks them.
    pub const ALL: [Setting; 6] = [
        Setting::ShutterSpeed,
        Setting::Iso,
        Setting::Aperture,
        Setting::ExposureCompensation,
        Setting::Compression,
        Setting::WhiteBalance,
    ];

    /// Key string the relay expects for this setting.
    pub fn key(&self) -> &'static str {
        match self {
            Setting::ShutterSpeed => "shutterspeed",
            Setting::Iso => "Iso",
            Setting::Aperture => "aperture",
            Setting::ExposureCompensation => "exposurecompensation",
            Setting::Compression => "compressionsetting",
            Setting::WhiteBalance => "whitebalance",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Setting::ShutterSpeed => "shutter speed",
            Setting::Iso => "ISO",
            Setting::Aperture => "aperture",
            Setting::ExposureCompensation => "exposure compensation",
            Setting::Compression => "compression",
            Setting::WhiteBalance => "white balance",
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which capture command the session sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureMode {
    /// Focus before shooting.
    #[default]
    Autofocus,
    /// Shoot without focusing.
    NoAutofocus,
}

impl CaptureMode {
    pub fn from_autofocus(enabled: bool) -> Self {
        if enabled {
            CaptureMode::Autofocus
        } else {
            CaptureMode::NoAutofocus
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            CaptureMode::Autofocus => "Capture",
            CaptureMode::NoAutofocus => "CaptureNoAf",
        }
    }

    pub fn autofocus(&self) -> bool {
        matches!(self, CaptureMode::Autofocus)
    }
}

/// Where captured pictures are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    CameraOnly,
    PcOnly,
    PcAndCamera,
}

impl TransferMode {
    /// Value the relay expects after `set transfer`.
    pub fn value(&self) -> &'static str {
        match self {
            TransferMode::CameraOnly => "Save_to_camera_only",
            TransferMode::PcOnly => "Save_to_PC_only",
            TransferMode::PcAndCamera => "Save_to_PC_and_camera",
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}
