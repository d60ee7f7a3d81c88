use std::path::Path;

use tempfile::tempdir;

use carstage::config::DetectJobConfig;
use carstage::detect::backends::StubDetector;
use carstage::detect::job;
use carstage::detect::records::DetectionRecords;
use carstage::ui::Ui;

fn write_frame(path: &Path, seed: u8) {
    let image = image::RgbImage::from_fn(16, 16, |x, y| {
        image::Rgb([seed, (x * 16) as u8, (y * 16) as u8])
    });
    image.save(path).expect("write test frame");
}

fn plain_ui() -> Ui {
    Ui::from_args(Some("plain"), false, true)
}

#[test]
fn builds_records_and_annotated_copies_per_phase() {
    let dir = tempdir().expect("tempdir");
    let input_root = dir.path().join("images");
    let output_root = dir.path().join("out");
    let phase_dir = input_root.join("test");
    std::fs::create_dir_all(&phase_dir).expect("phase dir");

    for (idx, name) in ["frame_1.png", "frame_2.png", "frame_10.png"]
        .iter()
        .enumerate()
    {
        write_frame(&phase_dir.join(name), idx as u8 * 40);
    }

    let cfg = DetectJobConfig {
        input_root,
        output_root: output_root.clone(),
        phases: vec!["test".to_string()],
        batch_size: 2,
    };
    // Six classes while the stub fires at most four keeps the tail classes
    // untouched.
    let mut backend = StubDetector::new(6);

    let summaries = job::run(&cfg, &mut backend, &plain_ui()).expect("job run");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].frames, 3);

    let records_path = output_root.join("detections_test.json");
    let records = DetectionRecords::load_map(&records_path).expect("records json");
    assert_eq!(records.len(), 3);

    for (name, row) in &records {
        assert_eq!(row.len(), 6, "fixed-width row for {name}");
        assert!(row[4].is_unset());
        assert!(row[5].is_unset());
        for record in row.iter().take(4) {
            assert!(record.conf > 0.0);
            assert!(record.bbox[0] <= record.bbox[2]);
            assert!(record.bbox[1] <= record.bbox[3]);
        }
    }

    let annotated = output_root.join("annotated_test");
    for name in ["frame_1.png", "frame_2.png", "frame_10.png"] {
        assert!(annotated.join(name).is_file(), "annotated copy for {name}");
    }
}

#[test]
fn missing_phase_folder_aborts() {
    let dir = tempdir().expect("tempdir");
    let cfg = DetectJobConfig {
        input_root: dir.path().join("images"),
        output_root: dir.path().join("out"),
        phases: vec!["train".to_string()],
        batch_size: 4,
    };
    let mut backend = StubDetector::new(4);
    assert!(job::run(&cfg, &mut backend, &plain_ui()).is_err());
}
