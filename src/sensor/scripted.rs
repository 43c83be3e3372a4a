//! Deterministic sensor double for tests and examples.

use std::sync::Mutex;

use super::{EnergySensor, Snapshot};

/// A sensor that replays a fixed sequence of snapshots.
///
/// Each call to [`read`](EnergySensor::read) consumes the next scripted
/// frame; once the script is exhausted, the last frame repeats (the
/// counters look frozen). Useful for pinning down session and aggregation
/// behavior without hardware.
///
/// ```
/// use rapl_probe::{EnergySensor, ScriptedSensor};
///
/// let sensor = ScriptedSensor::new(1, vec![vec![0, 0], vec![100, 40]]);
/// assert_eq!(sensor.read(), vec![0, 0]);
/// assert_eq!(sensor.read(), vec![100, 40]);
/// assert_eq!(sensor.read(), vec![100, 40]); // frozen
/// ```
pub struct ScriptedSensor {
    sockets: usize,
    state: Mutex<State>,
}

struct State {
    frames: Vec<Snapshot>,
    next: usize,
}

impl ScriptedSensor {
    /// Create a sensor over `sockets` sockets replaying `frames` in order.
    ///
    /// # Panics
    ///
    /// Panics if `frames` is empty or any frame's length is not
    /// `2 × sockets`.
    pub fn new(sockets: usize, frames: Vec<Snapshot>) -> Self {
        assert!(!frames.is_empty(), "ScriptedSensor needs at least one frame");
        for frame in &frames {
            assert_eq!(frame.len(), 2 * sockets, "frame length must be 2 x socket count");
        }
        Self {
            sockets,
            state: Mutex::new(State { frames, next: 0 }),
        }
    }

    /// Number of frames consumed so far (capped at the script length).
    pub fn frames_read(&self) -> usize {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).next
    }
}

impl EnergySensor for ScriptedSensor {
    fn read(&self) -> Snapshot {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let idx = state.next.min(state.frames.len() - 1);
        if state.next < state.frames.len() {
            state.next += 1;
        }
        state.frames[idx].clone()
    }

    fn socket_count(&self) -> usize {
        self.sockets
    }
}
