//! Common types used throughout splice.

// =============================================================================
// Time and Frame Counts
// =============================================================================

/// Absolute sample time on the host's monotonically increasing sample counter.
///
/// Signed because hosts may schedule events before the start of the current
/// render call ("late" events).
pub type SampleTime = i64;

/// Number of audio frames.
pub type FrameCount = u32;

// =============================================================================
// Parameters
// =============================================================================

/// Raw parameter address as delivered by the host.
pub type RawAddress = u64;

/// Plain (non-normalized) parameter value.
pub type ParameterValue = f32;

// =============================================================================
// Channel Limits
// =============================================================================

/// Maximum number of audio channels per segment buffer.
///
/// Segment views are built on the stack for every sub-range of a render
/// call, so the channel storage is a fixed-size array. 32 channels covers
/// 22.2 surround with headroom.
pub const MAX_CHANNELS: usize = 32;
