/// Input device categories, mirroring the platform taxonomy the recorder
/// cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioDeviceType {
    WiredHeadset,
    WiredHeadphones,
    UsbHeadset,
    BluetoothSco,
    Telephony,
    BuiltinMic,
    /// Anything else the platform reports; always ranked last.
    Other,
}

/// An available input device as reported by the audio host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    pub name: String,
    pub device_type: AudioDeviceType,
}

impl AudioDevice {
    pub fn new(name: impl Into<String>, device_type: AudioDeviceType) -> Self {
        Self {
            name: name.into(),
            device_type,
        }
    }
}

/// Fixed preference order: wired microphones > USB > bluetooth SCO > telephony
/// > built-in microphone.
const DEVICE_PRIORITY: [AudioDeviceType; 6] = [
    AudioDeviceType::WiredHeadset,
    AudioDeviceType::WiredHeadphones,
    AudioDeviceType::UsbHeadset,
    AudioDeviceType::BluetoothSco,
    AudioDeviceType::Telephony,
    AudioDeviceType::BuiltinMic,
];

fn priority_rank(device_type: AudioDeviceType) -> usize {
    DEVICE_PRIORITY
        .iter()
        .position(|&t| t == device_type)
        .unwrap_or(usize::MAX)
}

/// Picks the best available input device, or `None` when the set is empty.
///
/// Pure and stable: devices of equal rank keep their input order, and types
/// outside the priority table sort last.
pub fn select_preferred_input(devices: &[AudioDevice]) -> Option<&AudioDevice> {
    devices.iter().min_by_key(|d| priority_rank(d.device_type))
}
