use tempfile::tempdir;

use carstage::detect::records::DetectionRecords;
use carstage::detect::result::Detection;
use carstage::vectorize;

#[test]
fn records_flow_into_feature_and_label_arrays() {
    let dir = tempdir().expect("tempdir");
    let records_path = dir.path().join("detections_test.json");

    let mut records = DetectionRecords::new(12);
    for (name, class_id, confidence) in [
        ("recA0000001_frame_0000_00.jpg", 0usize, 0.9f32),
        ("recA0000001_frame_0100_05.jpg", 3, 0.6),
        ("recA0000001_frame_0200_23.jpg", 7, 0.4),
    ] {
        records.ensure_entry(name);
        records
            .observe(
                name,
                &Detection {
                    class_id,
                    bbox: [0.1, 0.1, 0.5, 0.5],
                    confidence,
                },
            )
            .expect("observe");
    }
    records.write(&records_path).expect("write records");

    let dataset = vectorize::vectorize_records(&records_path).expect("vectorize");
    assert_eq!(dataset.len(), 3);

    for features in &dataset.features {
        assert_eq!(features.len(), 12 * vectorize::FEATURES_PER_CLASS);
    }

    assert_eq!(dataset.names[0], "recA0000001_frame_0000_00.jpg");
    assert_eq!(dataset.labels[0], [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(dataset.labels[1], [1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(dataset.labels[2], [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);

    // The observed class contributes its box and confidence at the right
    // slot; untouched classes stay zero.
    let second = &dataset.features[1];
    assert_eq!(&second[15..20], &[0.1, 0.1, 0.5, 0.5, 0.6]);
    assert_eq!(&second[0..5], &[0.0, 0.0, 0.0, 0.0, 0.0]);

    let out_path = dir.path().join("stage_vectors_test.json");
    dataset.write(&out_path).expect("write dataset");
    let loaded = vectorize::StageDataset::load(&out_path).expect("load dataset");
    assert_eq!(loaded, dataset);
}
