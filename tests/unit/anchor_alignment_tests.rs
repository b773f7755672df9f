/*!
 * Tests for anchor alignment of generated lines
 */

use resubs::timing::{align_to_reference, AlignmentParams};
use crate::common;

fn default_params() -> AlignmentParams {
    AlignmentParams::default()
}

/// Test a line within tolerance snaps onto the nearest anchor
#[test]
fn test_align_withNearbyAnchor_shouldSnapStartAndEnd() {
    let mut generated = common::track(&[(1030, 2030)]);
    align_to_reference(&mut generated, &[1000, 5000], &default_params());

    assert_eq!(generated[0].start_time_ms, 1000);
    assert_eq!(generated[0].end_time_ms, 2000);
}

/// Test the shift preserves line length in both directions
#[test]
fn test_align_withAnchorAfterStart_shouldShiftForward() {
    let mut generated = common::track(&[(980, 1980)]);
    align_to_reference(&mut generated, &[1000], &default_params());

    assert_eq!(generated[0].start_time_ms, 1000);
    assert_eq!(generated[0].end_time_ms, 2000);
}

/// Test a line already exactly on an anchor is never moved
#[test]
fn test_align_withExactMatch_shouldPreserveFixedPoint() {
    let mut generated = common::track(&[(1000, 2000)]);
    align_to_reference(&mut generated, &[1000, 1040], &default_params());

    assert_eq!(generated[0].start_time_ms, 1000);
    assert_eq!(generated[0].end_time_ms, 2000);
}

/// Test no two generated lines are assigned the same anchor
#[test]
fn test_align_withTwoLinesNearOneAnchor_shouldMoveOnlyCloser() {
    let mut generated = common::track(&[(960, 1460), (1010, 1510)]);
    align_to_reference(&mut generated, &[1000], &default_params());

    let assigned: Vec<_> = generated
        .iter()
        .filter(|entry| entry.start_time_ms == 1000)
        .collect();
    assert_eq!(assigned.len(), 1);

    // The closer line wins the anchor at a lower tolerance pass; by the time
    // the sweep reaches the farther line, the anchor is occupied
    assert_eq!(generated[1].start_time_ms, 1000);
    assert_eq!(generated[0].start_time_ms, 960);
}

/// Test first-come-first-served at a fixed tolerance level
#[test]
fn test_align_withEquallyCloseLines_shouldPreferTrackOrder() {
    // Both lines sit 30ms from the anchor, so the same sweep pass reaches
    // them and the earlier line in track order wins
    let mut generated = common::track(&[(1030, 1530), (970, 1470)]);
    align_to_reference(&mut generated, &[1000], &default_params());

    assert_eq!(generated[0].start_time_ms, 1000);
    assert_eq!(generated[1].start_time_ms, 970);
}

/// Test a line outside every tolerance level stays put
#[test]
fn test_align_withFarAwayLine_shouldNotMove() {
    let mut generated = common::track(&[(10_000, 11_000)]);
    align_to_reference(&mut generated, &[1000], &default_params());

    assert_eq!(generated[0].start_time_ms, 10_000);
    assert_eq!(generated[0].end_time_ms, 11_000);
}

/// Test equidistant anchors resolve to the earliest reference start
#[test]
fn test_align_withEquidistantAnchors_shouldPickEarliest() {
    let mut generated = common::track(&[(1500, 2500)]);
    align_to_reference(&mut generated, &[1000, 2000], &default_params());

    assert_eq!(generated[0].start_time_ms, 1000);
    assert_eq!(generated[0].end_time_ms, 2000);
}

/// Test empty anchors leave the track untouched
#[test]
fn test_align_withNoAnchors_shouldBeNoOp() {
    let mut generated = common::track(&[(1030, 2030)]);
    align_to_reference(&mut generated, &[], &default_params());

    assert_eq!(generated[0].start_time_ms, 1030);
}

/// Test no aligner-assigned duplicate starts across a whole track
#[test]
fn test_align_withManyLines_shouldNeverCollide() {
    let anchors: Vec<u64> = (0..20).map(|i| i * 3000).collect();
    let mut generated = common::track(
        &(0..20)
            .map(|i| (i * 3000 + 40, i * 3000 + 2500))
            .collect::<Vec<_>>(),
    );
    // A couple of extra lines crowding existing anchors
    generated.push(common::entry(21, 3080, 5400));
    generated.push(common::entry(22, 6090, 8400));

    align_to_reference(&mut generated, &anchors, &default_params());

    let mut starts: Vec<u64> = generated
        .iter()
        .map(|entry| entry.start_time_ms)
        .filter(|start| anchors.contains(start))
        .collect();
    starts.sort_unstable();
    let before = starts.len();
    starts.dedup();
    assert_eq!(before, starts.len(), "two lines were assigned the same anchor");
}
