//! Sample-accurate event segmentation.
//!
//! A render call asks for `frame_count` frames starting at an absolute
//! sample time, together with a time-ordered run of [`RenderEvent`]s. The
//! segmenter cuts the call into contiguous sub-ranges at event times and, for
//! each sub-range:
//!
//! 1. asks the [`SegmentProcessor`] to render the sub-range, then
//! 2. delivers every event due at the sub-range's end, in sequence order.
//!
//! An event at time `t` therefore affects every frame from offset
//! `t - start` on and no frame before it.
//!
//! ```text
//! start                    t0          t1=t2                    start+F
//!   |------- segment ------|-- segment --|-------- segment --------|
//!                          ^ e0          ^ e1, e2 (FIFO)
//! ```
//!
//! Events at or before the cursor ("late" events) produce no segment and are
//! delivered immediately. Events at or past the end of the call are left
//! for a later call.
//!
//! # Real-Time Safety
//!
//! No allocation, no locking. Work is O(frame_count + events).

use crate::event::RenderEvent;
use crate::types::{FrameCount, SampleTime};

// =============================================================================
// Processor Seam
// =============================================================================

/// Callbacks driven by [`process_with_events()`].
pub trait SegmentProcessor {
    /// Render `frame_count` frames starting at absolute time `now`.
    ///
    /// `frame_offset` is the position of the first frame inside the host's
    /// buffers for this render call. `frame_count` is never zero.
    fn process_segment(&mut self, now: SampleTime, frame_offset: FrameCount, frame_count: FrameCount);

    /// Apply one event. `now` is the cursor time, which may be later than
    /// the event's own timestamp.
    fn handle_event(&mut self, now: SampleTime, event: &RenderEvent<'_>);
}

// =============================================================================
// Cursor
// =============================================================================

/// Position inside one render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingCursor {
    now: SampleTime,
    frames_remaining: FrameCount,
    frame_count: FrameCount,
}

impl ProcessingCursor {
    /// Cursor at the start of a render call.
    pub const fn new(start: SampleTime, frame_count: FrameCount) -> Self {
        Self {
            now: start,
            frames_remaining: frame_count,
            frame_count,
        }
    }

    /// Absolute sample time of the next frame to render.
    #[inline]
    pub const fn now(&self) -> SampleTime {
        self.now
    }

    /// Frames still to render in this call.
    #[inline]
    pub const fn frames_remaining(&self) -> FrameCount {
        self.frames_remaining
    }

    /// Offset of the next frame inside the host buffers.
    #[inline]
    pub const fn frame_offset(&self) -> FrameCount {
        self.frame_count - self.frames_remaining
    }

    /// Returns true once every frame has been rendered.
    #[inline]
    pub const fn is_finished(&self) -> bool {
        self.frames_remaining == 0
    }

    /// Frames from the cursor up to `time`, clamped to `0..=frames_remaining`.
    #[inline]
    pub fn frames_until(&self, time: SampleTime) -> FrameCount {
        let delta = time.saturating_sub(self.now).max(0);
        FrameCount::try_from(delta)
            .unwrap_or(FrameCount::MAX)
            .min(self.frames_remaining)
    }

    /// Consume `frames` frames. Callers never pass more than remain.
    #[inline]
    pub fn advance(&mut self, frames: FrameCount) {
        debug_assert!(frames <= self.frames_remaining);
        self.frames_remaining -= frames;
        self.now += SampleTime::from(frames);
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// What one render call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Segments handed to the processor.
    pub segments: u32,
    /// Frames rendered across all segments.
    pub frames: FrameCount,
    /// Events delivered.
    pub events: u32,
}

// =============================================================================
// Dispatch
// =============================================================================

/// Render `frame_count` frames from `start`, splitting at event times.
///
/// `events` must be ordered by non-decreasing `sample_time`. Events due
/// after the last rendered frame are not consumed.
///
/// # Example
///
/// ```ignore
/// let events = [RenderEvent::parameter(start + 200, 0, 0.5)];
/// let stats = process_with_events(&mut processor, start, 512, &events);
/// assert_eq!(stats.segments, 2);
/// ```
pub fn process_with_events<'e, 'a: 'e, P>(
    processor: &mut P,
    start: SampleTime,
    frame_count: FrameCount,
    events: impl IntoIterator<Item = &'e RenderEvent<'a>>,
) -> RenderStats
where
    P: SegmentProcessor + ?Sized,
{
    let mut stats = RenderStats::default();
    let mut cursor = ProcessingCursor::new(start, frame_count);
    let mut events = events.into_iter().peekable();

    while !cursor.is_finished() {
        let Some(next) = events.peek() else {
            let remaining = cursor.frames_remaining();
            render(processor, &mut cursor, remaining, &mut stats);
            break;
        };

        let segment_len = cursor.frames_until(next.sample_time);
        if segment_len > 0 {
            render(processor, &mut cursor, segment_len, &mut stats);
            if cursor.is_finished() {
                break;
            }
        }

        let now = cursor.now();
        while let Some(event) = events.next_if(|event| event.sample_time <= now) {
            processor.handle_event(now, event);
            stats.events += 1;
        }
    }

    stats
}

#[inline]
fn render<P: SegmentProcessor + ?Sized>(
    processor: &mut P,
    cursor: &mut ProcessingCursor,
    frames: FrameCount,
    stats: &mut RenderStats,
) {
    if frames == 0 {
        return;
    }
    processor.process_segment(cursor.now(), cursor.frame_offset(), frames);
    cursor.advance(frames);
    stats.segments += 1;
    stats.frames += frames;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RenderEventKind;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Segment {
            now: SampleTime,
            offset: FrameCount,
            frames: FrameCount,
        },
        Event {
            now: SampleTime,
            address: u64,
        },
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl SegmentProcessor for Recorder {
        fn process_segment(&mut self, now: SampleTime, frame_offset: FrameCount, frame_count: FrameCount) {
            self.calls.push(Call::Segment {
                now,
                offset: frame_offset,
                frames: frame_count,
            });
        }

        fn handle_event(&mut self, now: SampleTime, event: &RenderEvent<'_>) {
            let address = match event.kind {
                RenderEventKind::Parameter(p) => p.address,
                _ => u64::MAX,
            };
            self.calls.push(Call::Event { now, address });
        }
    }

    fn segment_lengths(calls: &[Call]) -> Vec<FrameCount> {
        calls
            .iter()
            .filter_map(|call| match call {
                Call::Segment { frames, .. } => Some(*frames),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_no_events_single_segment() {
        let mut recorder = Recorder::default();
        let events: [RenderEvent; 0] = [];
        let stats = process_with_events(&mut recorder, 1000, 256, &events);

        assert_eq!(
            recorder.calls,
            vec![Call::Segment {
                now: 1000,
                offset: 0,
                frames: 256
            }]
        );
        assert_eq!(stats.segments, 1);
        assert_eq!(stats.frames, 256);
        assert_eq!(stats.events, 0);
    }

    #[test]
    fn test_split_at_event() {
        let mut recorder = Recorder::default();
        let events = [RenderEvent::parameter(200, 1, 0.5)];
        process_with_events(&mut recorder, 0, 512, &events);

        assert_eq!(
            recorder.calls,
            vec![
                Call::Segment {
                    now: 0,
                    offset: 0,
                    frames: 200
                },
                Call::Event { now: 200, address: 1 },
                Call::Segment {
                    now: 200,
                    offset: 200,
                    frames: 312
                },
            ]
        );
    }

    #[test]
    fn test_segments_cover_frame_count() {
        let mut recorder = Recorder::default();
        let events = [
            RenderEvent::parameter(103, 0, 0.0),
            RenderEvent::parameter(150, 0, 0.0),
            RenderEvent::parameter(150, 0, 0.0),
            RenderEvent::parameter(399, 0, 0.0),
        ];
        let stats = process_with_events(&mut recorder, 100, 300, &events);

        let lengths = segment_lengths(&recorder.calls);
        assert_eq!(lengths, vec![3, 47, 249, 1]);
        assert_eq!(lengths.iter().sum::<FrameCount>(), 300);
        assert_eq!(stats.frames, 300);
        assert_eq!(stats.events, 4);
    }

    #[test]
    fn test_late_events_delivered_first() {
        let mut recorder = Recorder::default();
        let events = [
            RenderEvent::parameter(10, 1, 0.0),
            RenderEvent::parameter(64, 2, 0.0),
        ];
        let stats = process_with_events(&mut recorder, 64, 32, &events);

        assert_eq!(
            recorder.calls,
            vec![
                Call::Event { now: 64, address: 1 },
                Call::Event { now: 64, address: 2 },
                Call::Segment {
                    now: 64,
                    offset: 0,
                    frames: 32
                },
            ]
        );
        assert_eq!(stats.events, 2);
    }

    #[test]
    fn test_simultaneous_events_fifo() {
        let mut recorder = Recorder::default();
        let events = [
            RenderEvent::parameter(16, 5, 0.0),
            RenderEvent::parameter(16, 3, 0.0),
            RenderEvent::parameter(16, 9, 0.0),
        ];
        process_with_events(&mut recorder, 0, 32, &events);

        let order: Vec<u64> = recorder
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Event { address, .. } => Some(*address),
                _ => None,
            })
            .collect();
        assert_eq!(order, vec![5, 3, 9]);
        assert_eq!(segment_lengths(&recorder.calls), vec![16, 16]);
        // All three land between the two segments
        assert!(matches!(recorder.calls[1], Call::Event { .. }));
        assert!(matches!(recorder.calls[3], Call::Event { .. }));
        assert!(matches!(recorder.calls[4], Call::Segment { .. }));
    }

    #[test]
    fn test_future_events_not_consumed() {
        let mut recorder = Recorder::default();
        let events = [
            RenderEvent::parameter(40, 1, 0.0),
            RenderEvent::parameter(64, 2, 0.0),
            RenderEvent::parameter(5000, 3, 0.0),
        ];
        let stats = process_with_events(&mut recorder, 0, 64, &events);

        assert_eq!(segment_lengths(&recorder.calls), vec![40, 24]);
        assert_eq!(stats.events, 1);
        assert_eq!(stats.frames, 64);
    }

    #[test]
    fn test_zero_frames_is_noop() {
        let mut recorder = Recorder::default();
        let events = [RenderEvent::parameter(0, 1, 0.0)];
        let stats = process_with_events(&mut recorder, 0, 0, &events);

        assert!(recorder.calls.is_empty());
        assert_eq!(stats, RenderStats::default());
    }

    #[test]
    fn test_cursor_frames_until() {
        let cursor = ProcessingCursor::new(100, 50);
        assert_eq!(cursor.frames_until(90), 0);
        assert_eq!(cursor.frames_until(120), 20);
        assert_eq!(cursor.frames_until(SampleTime::MAX), 50);
        assert_eq!(cursor.frame_offset(), 0);
    }
}
