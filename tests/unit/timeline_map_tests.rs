/*!
 * Tests for the trimmed-stream to original-timeline projection
 */

use resubs::errors::TimingError;
use resubs::timing::{SpeechInterval, TimelineMap};
use crate::common;

fn intervals(pairs: &[(u64, u64)]) -> Vec<SpeechInterval> {
    pairs
        .iter()
        .map(|&(start_ms, end_ms)| SpeechInterval::new(start_ms, end_ms).unwrap())
        .collect()
}

/// Test removed spans recorded for the reference scenario
#[test]
fn test_from_intervals_withReferenceScenario_shouldRecordRemovedSpans() {
    let map = TimelineMap::from_intervals(&intervals(&[(0, 2200), (4800, 6200)]), 0);

    assert_eq!(map.trimmed_len_ms(), 3600);
    assert!(map.inserted_spans().is_empty());

    let removed = map.removed_spans();
    assert_eq!(removed.len(), 2);
    assert_eq!(removed[0].trimmed_pos_ms, 0);
    assert_eq!(removed[0].duration_ms, 0);
    assert_eq!(removed[1].trimmed_pos_ms, 2200);
    assert_eq!(removed[1].duration_ms, 2600);
}

/// Test inserted spans recorded when a silence buffer is configured
#[test]
fn test_from_intervals_withSilenceBuffer_shouldRecordInsertedSpans() {
    let map = TimelineMap::from_intervals(&intervals(&[(0, 1000), (2000, 3000)]), 500);

    // Each interval's audio is followed by a 500ms buffer
    assert_eq!(map.trimmed_len_ms(), 3000);

    let inserted = map.inserted_spans();
    assert_eq!(inserted.len(), 2);
    assert_eq!(inserted[0].trimmed_pos_ms, 1500);
    assert_eq!(inserted[0].duration_ms, 500);
    assert_eq!(inserted[1].trimmed_pos_ms, 3000);
    assert_eq!(inserted[1].duration_ms, 500);

    let removed = map.removed_spans();
    assert_eq!(removed[1].trimmed_pos_ms, 1500);
    assert_eq!(removed[1].duration_ms, 1000);
}

/// Test the round-trip property: one padded interval, one gap before it
#[test]
fn test_restore_withSinglePaddedInterval_shouldRoundTrip() {
    // Speech at [1000, 2000] padded by 200 becomes [800, 2200]; the gap
    // before it is 800ms long
    let map = TimelineMap::from_intervals(&intervals(&[(800, 2200)]), 0);
    assert_eq!(map.removed_spans().len(), 1);
    assert_eq!(map.removed_spans()[0].duration_ms, 800);

    let mut generated = common::track(&[(0, 800)]);
    map.restore(&mut generated).unwrap();

    assert_eq!(generated[0].start_time_ms, 800);
    assert_eq!(generated[0].end_time_ms, 1600);
}

/// Test lines in a later interval shift past the reinserted gap
#[test]
fn test_restore_withTwoIntervals_shouldShiftLaterLines() {
    let map = TimelineMap::from_intervals(&intervals(&[(0, 2200), (4800, 6200)]), 0);

    // One line inside each interval, in trimmed-stream time
    let mut generated = common::track(&[(100, 900), (2300, 3100)]);
    map.restore(&mut generated).unwrap();

    // First interval starts at 0 on the original timeline, so its line is
    // untouched; the second line moves by the 2600ms gap
    assert_eq!(generated[0].start_time_ms, 100);
    assert_eq!(generated[0].end_time_ms, 900);
    assert_eq!(generated[1].start_time_ms, 4900);
    assert_eq!(generated[1].end_time_ms, 5700);
}

/// Test a line whose end touches the gap boundary is pushed whole
#[test]
fn test_restore_withLineTouchingBoundary_shouldShiftBothBounds() {
    let map = TimelineMap::from_intervals(&intervals(&[(1000, 2000)]), 0);

    // End exactly at the recorded span position
    let mut generated = common::track(&[(0, 0)]);
    map.restore(&mut generated).unwrap();

    assert_eq!(generated[0].start_time_ms, 1000);
    assert_eq!(generated[0].end_time_ms, 1000);
}

/// Test inserted buffers are undone before gaps are reinserted
#[test]
fn test_restore_withSilenceBuffer_shouldUndoBuffersFirst() {
    let map = TimelineMap::from_intervals(&intervals(&[(0, 1000), (2000, 3000)]), 500);

    // Line inside the second interval's audio, which occupies trimmed
    // [1500, 2500]; at 100ms into it, original position is [2100, 2600]
    let mut generated = common::track(&[(1600, 2100)]);
    map.restore(&mut generated).unwrap();

    assert_eq!(generated[0].start_time_ms, 2100);
    assert_eq!(generated[0].end_time_ms, 2600);
}

/// Test a line right at the start of a later interval's audio
#[test]
fn test_restore_withLineAtIntervalStart_shouldLandOnIntervalStart() {
    let map = TimelineMap::from_intervals(&intervals(&[(0, 1000), (2000, 3000)]), 500);

    // Trimmed [1500, 1550] is the very start of the second interval's audio
    let mut generated = common::track(&[(1500, 1550)]);
    map.restore(&mut generated).unwrap();

    assert_eq!(generated[0].start_time_ms, 2000);
    assert_eq!(generated[0].end_time_ms, 2050);
}

/// Test multiple buffers accumulate across the track
#[test]
fn test_restore_withThreeBufferedIntervals_shouldAccumulateShifts() {
    let map = TimelineMap::from_intervals(
        &intervals(&[(1000, 2000), (3000, 4000), (5000, 6000)]),
        700,
    );
    assert_eq!(map.trimmed_len_ms(), 5100);

    // One line in each interval's audio span: [0,1000], [1700,2700], [3400,4400]
    let mut generated = common::track(&[(200, 800), (1900, 2500), (3600, 4200)]);
    map.restore(&mut generated).unwrap();

    assert_eq!(generated[0].start_time_ms, 1200);
    assert_eq!(generated[0].end_time_ms, 1800);
    assert_eq!(generated[1].start_time_ms, 3200);
    assert_eq!(generated[1].end_time_ms, 3800);
    assert_eq!(generated[2].start_time_ms, 5200);
    assert_eq!(generated[2].end_time_ms, 5800);
}

/// Test timestamps beyond the trimmed stream are rejected, not repaired
#[test]
fn test_restore_withOutOfRangeTimestamp_shouldReject() {
    let map = TimelineMap::from_intervals(&intervals(&[(0, 1000)]), 0);

    let mut generated = common::track(&[(500, 1500)]);
    let result = map.restore(&mut generated);

    assert_eq!(
        result.unwrap_err(),
        TimingError::OutOfRangeTimestamp {
            timestamp_ms: 1500,
            trimmed_len_ms: 1000
        }
    );

    // The track is left untouched on rejection
    assert_eq!(generated[0].start_time_ms, 500);
    assert_eq!(generated[0].end_time_ms, 1500);
}

/// Test an empty generated track restores to an empty track
#[test]
fn test_restore_withEmptyTrack_shouldBeNoOp() {
    let map = TimelineMap::from_intervals(&intervals(&[(0, 1000), (2000, 3000)]), 0);

    let mut generated = Vec::new();
    map.restore(&mut generated).unwrap();
    assert!(generated.is_empty());
}
