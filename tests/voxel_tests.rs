use porenet::percolation::Axis;
use porenet::voxel::LabeledVolume;

#[test]
fn test_binary_labeling_is_six_connected() {
    // diagonal voxels share no face and stay separate regions
    let foreground = [
        true, false, false, //
        false, true, false, //
        false, false, false,
    ];
    let volume = LabeledVolume::from_binary([3, 3, 1], &foreground).expect("volume");
    assert_eq!(volume.region_count(), 2);
    assert_eq!(volume.label_at(0, 0, 0), 1);
    assert_eq!(volume.label_at(1, 1, 0), 2);
}

#[test]
fn test_axis_spanning_keeps_the_bar() {
    // a bar across x at y = 0, one stray voxel clear of it
    let foreground = [
        true, true, true, //
        false, false, false, //
        false, true, false,
    ];
    let mut volume = LabeledVolume::from_binary([3, 3, 1], &foreground).expect("volume");
    assert_eq!(volume.region_count(), 2);
    let remaining = volume.retain_axis_spanning_labels(Axis::X);
    assert_eq!(remaining, 1);
    assert_eq!(volume.label_at(1, 2, 0), 0);
    assert_eq!(volume.label_at(0, 0, 0), 1);
    assert_eq!(volume.label_at(2, 0, 0), 1);
}

#[test]
fn test_face_count_threshold() {
    // region 1 is a full x-column, region 2 a corner voxel on three faces
    let foreground = [true, true, false, false, false, false, true, false];
    let mut volume = LabeledVolume::from_binary([2, 2, 2], &foreground).expect("volume");
    assert_eq!(volume.region_count(), 2);
    let remaining = volume.retain_spanning_labels(4);
    assert_eq!(remaining, 1);
    assert_eq!(volume.label_at(0, 0, 0), 1);
    assert_eq!(volume.label_at(0, 1, 1), 0);
}

#[test]
fn test_zero_threshold_is_a_no_op() {
    let foreground = [true, false, true, false];
    let mut volume = LabeledVolume::from_binary([4, 1, 1], &foreground).expect("volume");
    assert_eq!(volume.retain_spanning_labels(0), 2);
    assert_eq!(volume.region_count(), 2);
}

#[test]
fn test_external_labels_cleared_when_nothing_spans() {
    let mut volume = LabeledVolume::new([4, 1, 1], vec![5, 5, 0, 9]).expect("volume");
    let remaining = volume.retain_axis_spanning_labels(Axis::X);
    assert_eq!(remaining, 0);
    assert_eq!(volume.labels(), &[0, 0, 0, 0]);
}

#[test]
fn test_external_labels_length_checked() {
    assert!(LabeledVolume::new([3, 2, 1], vec![0; 5]).is_err());
}
