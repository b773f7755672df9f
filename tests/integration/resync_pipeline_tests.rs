/*!
 * End-to-end tests for the timing pipeline, driven in memory with a
 * synthetic transcription result instead of external tools
 */

use resubs::app_controller::Controller;
use resubs::timing::{
    align_to_reference, merged_speech_intervals, resolve_overlaps, AlignmentParams, SpeechInterval,
    TimelineMap,
};
use crate::common;

/// Test the reference scenario end to end: merge, pad, clamp, remap
#[test]
fn test_pipeline_withReferenceScenario_shouldProduceDocumentedPlan() {
    let reference = common::track(&[(0, 1000), (1000, 2000), (5000, 6000)]);

    let plan = merged_speech_intervals(&reference, 200).unwrap();
    assert_eq!(
        plan,
        vec![
            SpeechInterval::new(0, 2200).unwrap(),
            SpeechInterval::new(4800, 6200).unwrap(),
        ]
    );

    let map = TimelineMap::from_intervals(&plan, 0);
    assert_eq!(map.trimmed_len_ms(), 3600);

    let removed = map.removed_spans();
    assert_eq!(removed.len(), 2);
    assert_eq!((removed[0].trimmed_pos_ms, removed[0].duration_ms), (0, 0));
    assert_eq!((removed[1].trimmed_pos_ms, removed[1].duration_ms), (2200, 2600));
}

/// Test a full run over the core stages with an aligned, overlap-free result
#[test]
fn test_pipeline_withSyntheticTranscription_shouldRestoreAlignAndClip() {
    common::init_test_logging();

    let reference = common::track(&[(0, 1000), (1000, 2000), (5000, 6000)]);
    let plan = merged_speech_intervals(&reference, 200).unwrap();
    let map = TimelineMap::from_intervals(&plan, 0);

    // What a transcription of the trimmed stream might look like: slightly
    // offset starts, one line in the second extracted region
    let mut generated = common::track(&[(30, 950), (1020, 1980), (2250, 3050)]);

    map.restore(&mut generated).unwrap();
    assert_eq!(generated[2].start_time_ms, 4850);
    assert_eq!(generated[2].end_time_ms, 5650);

    let anchors: Vec<u64> = reference.iter().map(|entry| entry.start_time_ms).collect();
    align_to_reference(&mut generated, &anchors, &AlignmentParams::default());

    assert_eq!(generated[0].start_time_ms, 0);
    assert_eq!(generated[1].start_time_ms, 1000);
    assert_eq!(generated[2].start_time_ms, 5000);

    resolve_overlaps(&mut generated);
    for pair in generated.windows(2) {
        assert!(pair[0].end_time_ms <= pair[1].start_time_ms);
    }

    // Line lengths survive alignment untouched
    assert_eq!(generated[0].end_time_ms - generated[0].start_time_ms, 920);
    assert_eq!(generated[1].end_time_ms - generated[1].start_time_ms, 960);
    assert_eq!(generated[2].end_time_ms - generated[2].start_time_ms, 800);
}

/// Test the legacy silence-buffer variant with alignment disabled
#[test]
fn test_pipeline_withSilenceBufferAndNoAlignment_shouldOnlyRestore() {
    let reference = common::track(&[(1000, 2000), (5000, 6000)]);
    let plan = merged_speech_intervals(&reference, 200).unwrap();
    assert_eq!(
        plan,
        vec![
            SpeechInterval::new(800, 2200).unwrap(),
            SpeechInterval::new(4800, 6200).unwrap(),
        ]
    );

    let map = TimelineMap::from_intervals(&plan, 700);

    // Trimmed layout: audio [0,1400], silence [1400,2100], audio [2100,3500],
    // silence [3500,4200]
    assert_eq!(map.trimmed_len_ms(), 4200);

    let mut generated = common::track(&[(150, 1100), (2200, 3300)]);
    map.restore(&mut generated).unwrap();

    // 150ms into the first padded interval is 950 on the original timeline
    assert_eq!(generated[0].start_time_ms, 950);
    assert_eq!(generated[0].end_time_ms, 1900);

    // 100ms into the second padded interval is 4900 on the original timeline
    assert_eq!(generated[1].start_time_ms, 4900);
    assert_eq!(generated[1].end_time_ms, 6000);
}

/// Test an overlap introduced by alignment is clipped by the final stage
#[test]
fn test_pipeline_withAlignmentInducedOverlap_shouldClipEnd() {
    let reference = common::track(&[(1000, 2000), (2000, 3000)]);

    // Both lines restored already; the first one ends past the second's start
    // once its start snaps backward onto the 1000ms anchor
    let mut generated = common::track(&[(1060, 2080), (2030, 2900)]);

    let anchors: Vec<u64> = reference.iter().map(|entry| entry.start_time_ms).collect();
    align_to_reference(&mut generated, &anchors, &AlignmentParams::default());
    assert_eq!(generated[0].start_time_ms, 1000);
    assert_eq!(generated[1].start_time_ms, 2000);

    resolve_overlaps(&mut generated);
    assert_eq!(generated[0].end_time_ms, 2000);
    assert_eq!(generated[1].end_time_ms, 2870);
}

/// Test controller construction with the default configuration
#[test]
fn test_controller_withDefaultConfig_shouldInitialize() {
    let controller = Controller::new_for_test().unwrap();
    assert!(controller.is_initialized());
}
