//! CLI enum types for settings and transfer modes.

use clap::ValueEnum;

use digicam_remote::{Setting, TransferMode};

/// Camera setting selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SettingArg {
    #[value(alias = "shutter")]
    Shutterspeed,
    Iso,
    Aperture,
    #[value(alias = "ec")]
    ExposureComp,
    Compression,
    #[value(alias = "wb")]
    Whitebalance,
}

impl From<SettingArg> for Setting {
    fn from(s: SettingArg) -> Self {
        match s {
            SettingArg::Shutterspeed => Setting::ShutterSpeed,
            SettingArg::Iso => Setting::Iso,
            SettingArg::Aperture => Setting::Aperture,
            SettingArg::ExposureComp => Setting::ExposureCompensation,
            SettingArg::Compression => Setting::Compression,
            SettingArg::Whitebalance => Setting::WhiteBalance,
        }
    }
}

/// Picture storage location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransferArg {
    CameraOnly,
    PcOnly,
    PcAndCamera,
}

impl From<TransferArg> for TransferMode {
    fn from(t: TransferArg) -> Self {
        match t {
            TransferArg::CameraOnly => TransferMode::CameraOnly,
            TransferArg::PcOnly => TransferMode::PcOnly,
            TransferArg::PcAndCamera => TransferMode::PcAndCamera,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_conversion() {
        assert_eq!(Setting::from(SettingArg::ExposureComp), Setting::ExposureCompensation);
        assert_eq!(Setting::from(SettingArg::Whitebalance).key(), "whitebalance");
    }

    #[test]
    fn test_setting_aliases() {
        assert_eq!(SettingArg::from_str("wb", true), Ok(SettingArg::Whitebalance));
        assert_eq!(SettingArg::from_str("exposure-comp", true), Ok(SettingArg::ExposureComp));
    }

    #[test]
    fn test_transfer_conversion() {
        assert_eq!(TransferMode::from(TransferArg::PcAndCamera).value(), "Save_to_PC_and_camera");
    }
}
