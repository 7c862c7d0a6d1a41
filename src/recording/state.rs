use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

use crate::session::SessionId;

/// Session id slot shared between the creation task, the capture task, and
/// the controller. `None` until the store has assigned the row id.
pub type SharedSessionId = Arc<Mutex<Option<SessionId>>>;

/// Handles owned by an in-flight recording.
pub struct ActiveRecording {
    pub session_id: SharedSessionId,
    /// Cooperative cancellation flag, observed between frame reads.
    pub cancel: Arc<AtomicBool>,
    /// The capture task; awaited on stop for drain-and-join semantics.
    pub handle: JoinHandle<()>,
}

/// Explicit recorder lifecycle. Illegal transitions (stop while idle, start
/// while capturing) are cleanly rejected instead of racing on nullable
/// handles.
pub enum RecorderState {
    Idle,
    Starting,
    Capturing(ActiveRecording),
    Stopping,
}
