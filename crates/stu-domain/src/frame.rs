//! Decoder for the fixed 9-byte STU telemetry frame.
//!
//! A frame carries a one-byte status header followed, for location frames
//! (message type 0), by two signed 24-bit big-endian coordinates and two
//! bytes of input/vibration/fix flags. Message types 1-3 share the header
//! but their remaining bytes have no published layout, so only the header
//! is decoded for them.
//!
//! # Frame layout
//!
//! Byte 0 (status, bit 0 = LSB):
//! - bits 0-1: global message type (0-3)
//! - bit 2: battery state (0 good, 1 replace)
//! - bit 3: GPS data valid (0 valid, 1 invalid)
//! - bit 4: missed input 1
//! - bit 5: missed input 2
//! - bits 6-7: GPS fail counter (0-3)
//!
//! Location frames additionally use:
//! - bytes 1-3: latitude, signed 24-bit big-endian, scaled by 90/2^23
//! - bytes 4-6: longitude, signed 24-bit big-endian, scaled by 180/2^23
//! - byte 7: input change/state bits (0-3), message sub-type (bits 4-7)
//! - byte 8: vibration, GPS fix type, motion and confidence bits

use serde::{Serialize, Serializer};
use std::fmt;

/// Every STU frame is exactly this many bytes.
pub const FRAME_LEN: usize = 9;

const LATITUDE_SCALE: f64 = 90.0 / 8_388_608.0;
const LONGITUDE_SCALE: f64 = 180.0 / 8_388_608.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BatteryState {
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Replace battery")]
    Replace,
}

impl fmt::Display for BatteryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "Good"),
            Self::Replace => write!(f, "Replace battery"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InputState {
    Closed,
    Open,
}

impl fmt::Display for InputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "Closed"),
            Self::Open => write!(f, "Open"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VibrationState {
    #[serde(rename = "Not vibrating")]
    NotVibrating,
    Vibrating,
}

impl fmt::Display for VibrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotVibrating => write!(f, "Not vibrating"),
            Self::Vibrating => write!(f, "Vibrating"),
        }
    }
}

/// Fix type labels follow the wire bit literally (0 -> "3D fix",
/// 1 -> "2D fix"). Downstream consumers key on these exact strings, so the
/// mapping stays as observed even though it reads inverted relative to the
/// usual GPS convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GpsFixType {
    #[serde(rename = "3D fix")]
    ThreeD,
    #[serde(rename = "2D fix")]
    TwoD,
}

impl fmt::Display for GpsFixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThreeD => write!(f, "3D fix"),
            Self::TwoD => write!(f, "2D fix"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MotionState {
    #[serde(rename = "At-Rest")]
    AtRest,
    #[serde(rename = "In-Motion")]
    InMotion,
}

impl fmt::Display for MotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtRest => write!(f, "At-Rest"),
            Self::InMotion => write!(f, "In-Motion"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FixConfidence {
    High,
    Reduced,
}

impl fmt::Display for FixConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Reduced => write!(f, "Reduced"),
        }
    }
}

/// Sub-type of a location frame, drawn from the fixed 7-entry table.
/// Codes 7-15 are carried through as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSubType {
    Location,
    DeviceTurnedOn,
    LocationAreaChange,
    InputStatusChange,
    UndesiredInputState,
    ReCentering,
    SpeedAndHeading,
    Unknown(u8),
}

impl MessageSubType {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Location,
            1 => Self::DeviceTurnedOn,
            2 => Self::LocationAreaChange,
            3 => Self::InputStatusChange,
            4 => Self::UndesiredInputState,
            5 => Self::ReCentering,
            6 => Self::SpeedAndHeading,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for MessageSubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location => write!(f, "Location Message"),
            Self::DeviceTurnedOn => write!(f, "Device Turned On Message"),
            Self::LocationAreaChange => write!(f, "Change of Location Area Message"),
            Self::InputStatusChange => write!(f, "Input Status Changed Message"),
            Self::UndesiredInputState => write!(f, "Undesired Input State Message"),
            Self::ReCentering => write!(f, "Re-Centering Message"),
            Self::SpeedAndHeading => write!(f, "Speed and Heading Message"),
            Self::Unknown(code) => write!(f, "Unknown Sub-type ({code})"),
        }
    }
}

impl Serialize for MessageSubType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Status fields shared by every message type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameHeader {
    pub message_type: u8,
    pub battery: BatteryState,
    pub gps_data_valid: bool,
    pub missed_input1: bool,
    pub missed_input2: bool,
    pub gps_fail_counter: u8,
}

/// Fields present only on location frames (message type 0).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationFields {
    pub latitude: f64,
    pub longitude: f64,
    pub input1_changed: bool,
    pub input1: InputState,
    pub input2_changed: bool,
    pub input2: InputState,
    pub sub_type: MessageSubType,
    pub vibration_triggered: bool,
    pub vibration: VibrationState,
    pub gps_fix: GpsFixType,
    pub motion: MotionState,
    pub fix_confidence: FixConfidence,
}

/// One decoded 9-byte frame. `location` is populated for message type 0;
/// other types carry a note explaining that only the header was decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedFrame {
    #[serde(flatten)]
    pub header: FrameHeader,
    #[serde(flatten)]
    pub location: Option<LocationFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

fn read_i24_be(data: &[u8]) -> i32 {
    // Sign-extend 24-bit to 32-bit
    let value =
        (i32::from(data[0]) << 24) | (i32::from(data[1]) << 16) | (i32::from(data[2]) << 8);
    value >> 8
}

fn bit(byte: u8, index: u8) -> bool {
    byte >> index & 0x01 == 1
}

/// Decode one frame. `bytes` must be exactly [`FRAME_LEN`] bytes, which the
/// payload splitter guarantees; under that contract this is a total,
/// deterministic function of its input.
pub fn decode_frame(bytes: &[u8]) -> DecodedFrame {
    debug_assert_eq!(bytes.len(), FRAME_LEN);

    let status = bytes[0];
    let message_type = status & 0x03;

    let header = FrameHeader {
        message_type,
        battery: if bit(status, 2) {
            BatteryState::Replace
        } else {
            BatteryState::Good
        },
        gps_data_valid: !bit(status, 3),
        missed_input1: bit(status, 4),
        missed_input2: bit(status, 5),
        gps_fail_counter: status >> 6 & 0x03,
    };

    if message_type != 0 {
        return DecodedFrame {
            header,
            location: None,
            note: Some(format!(
                "message type {message_type} payloads are not decoded beyond the status header"
            )),
        };
    }

    let latitude = f64::from(read_i24_be(&bytes[1..4])) * LATITUDE_SCALE;
    let longitude = f64::from(read_i24_be(&bytes[4..7])) * LONGITUDE_SCALE;

    let inputs = bytes[7];
    let flags = bytes[8];

    let location = LocationFields {
        latitude,
        longitude,
        input1_changed: bit(inputs, 0),
        input1: if bit(inputs, 1) {
            InputState::Open
        } else {
            InputState::Closed
        },
        input2_changed: bit(inputs, 2),
        input2: if bit(inputs, 3) {
            InputState::Open
        } else {
            InputState::Closed
        },
        sub_type: MessageSubType::from_code(inputs >> 4),
        vibration_triggered: bit(flags, 3),
        vibration: if bit(flags, 4) {
            VibrationState::Vibrating
        } else {
            VibrationState::NotVibrating
        },
        gps_fix: if bit(flags, 5) {
            GpsFixType::TwoD
        } else {
            GpsFixType::ThreeD
        },
        motion: if bit(flags, 6) {
            MotionState::InMotion
        } else {
            MotionState::AtRest
        },
        fix_confidence: if bit(flags, 7) {
            FixConfidence::Reduced
        } else {
            FixConfidence::High
        },
    };

    DecodedFrame {
        header,
        location: Some(location),
        note: None,
    }
}
