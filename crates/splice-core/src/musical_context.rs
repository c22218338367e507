//! Host musical context.
//!
//! Hosts can answer "where are we musically?" during a render call. Kernels
//! that care receive a [`MusicalContext`] at construction and query it at
//! most once per processed segment.

/// Host tempo and position at the time of a query.
///
/// All positions are in quarter-note beats.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MusicalPosition {
    /// Tempo in BPM.
    pub tempo: f64,

    /// Time signature numerator (e.g., 3 in 3/4).
    pub time_signature_numerator: f64,

    /// Time signature denominator (e.g., 4 in 3/4).
    pub time_signature_denominator: i64,

    /// Beat position at the start of the current render call.
    pub current_beat_position: f64,

    /// Frames from the start of the render call to the next beat.
    pub sample_offset_to_next_beat: i64,

    /// Beat position of the current measure's downbeat.
    pub current_measure_downbeat_position: f64,
}

/// Source of musical position.
///
/// Called on the render thread.
pub trait MusicalContext {
    /// Current musical position, or `None` if the host has none to give.
    fn query(&mut self) -> Option<MusicalPosition>;
}

/// A context that never knows anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMusicalContext;

impl MusicalContext for NoMusicalContext {
    #[inline]
    fn query(&mut self) -> Option<MusicalPosition> {
        None
    }
}

impl<F> MusicalContext for F
where
    F: FnMut() -> Option<MusicalPosition>,
{
    #[inline]
    fn query(&mut self) -> Option<MusicalPosition> {
        self()
    }
}
