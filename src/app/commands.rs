//! Operator commands decoded from the console.
//!
//! Each menu entry is a single ASCII digit.  Decoding never fails: anything
//! that is not a menu digit becomes [`SessionCommand::Invalid`] carrying
//! the offending byte.

/// Commands the operator can issue from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// `1`: tare and store the zero factor.
    AcquireZero,
    /// `2`: search for the calibration factor against a reference weight.
    AutoCalibrate,
    /// `3`: type a zero factor.
    SetZeroManual,
    /// `4`: type a calibration factor.
    SetCalibrationManual,
    /// `5`: stream live weight until `x`.
    StreamRead,
    /// Any other byte.
    Invalid(u8),
}

impl SessionCommand {
    /// Every valid command, in menu order.
    pub const ALL: [Self; 5] = [
        Self::AcquireZero,
        Self::AutoCalibrate,
        Self::SetZeroManual,
        Self::SetCalibrationManual,
        Self::StreamRead,
    ];

    pub fn from_byte(b: u8) -> Self {
        match b {
            b'1' => Self::AcquireZero,
            b'2' => Self::AutoCalibrate,
            b'3' => Self::SetZeroManual,
            b'4' => Self::SetCalibrationManual,
            b'5' => Self::StreamRead,
            other => Self::Invalid(other),
        }
    }

    /// Menu key for a valid command.
    pub fn key(self) -> Option<char> {
        match self {
            Self::AcquireZero => Some('1'),
            Self::AutoCalibrate => Some('2'),
            Self::SetZeroManual => Some('3'),
            Self::SetCalibrationManual => Some('4'),
            Self::StreamRead => Some('5'),
            Self::Invalid(_) => None,
        }
    }

    /// Banner text shown next to the key.
    pub fn description(self) -> &'static str {
        match self {
            Self::AcquireZero => {
                "to find and auto set zero factor (Please remove item from scale first)"
            }
            Self::AutoCalibrate => "to auto calibration factor mode",
            Self::SetZeroManual => "to manually config zero factor",
            Self::SetCalibrationManual => "to manually config calibration factor",
            Self::StreamRead => "to show weight on scales",
            Self::Invalid(_) => "",
        }
    }
}

/// `true` for the keys that leave the live-read loop.
pub fn is_exit_key(b: u8) -> bool {
    matches!(b, b'x' | b'X')
}
