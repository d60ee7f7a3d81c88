use std::path::Path;

use tempfile::tempdir;

use carstage::caption::backends::StubCaptioner;
use carstage::caption::{job, CaptionRun, WindowParams};
use carstage::config::CaptionJobConfig;
use carstage::ui::Ui;

fn write_frame(path: &Path, seed: u8) {
    let image = image::RgbImage::from_fn(12, 12, |x, y| {
        image::Rgb([seed, (x * 20) as u8, (y * 20) as u8])
    });
    image.save(path).expect("write test frame");
}

fn plain_ui() -> Ui {
    Ui::from_args(Some("plain"), false, true)
}

#[test]
fn captions_windows_and_skips_session_boundaries() {
    let dir = tempdir().expect("tempdir");
    let frames_dir = dir.path().join("frames");
    std::fs::create_dir_all(&frames_dir).expect("frames dir");

    // Two 8-frame recordings; the 11-character prefixes differ.
    let mut names = Vec::new();
    for session in ["recA0000001", "recB0000001"] {
        for idx in 0..8 {
            let name = format!("{session}_f{idx:02}_05.png");
            write_frame(&frames_dir.join(&name), idx as u8 * 25);
            names.push(name);
        }
    }

    let output_path = dir.path().join("out").join("captions.json");
    let cfg = CaptionJobConfig {
        input_dir: frames_dir,
        output_path: output_path.clone(),
        window: WindowParams {
            num_frames: 3,
            frames_before: 2,
            frames_after: 2,
            interval: 2,
            offset: 0,
        },
        prompt: "describe the toy car assembly state".to_string(),
        max_new_tokens: 32,
    };

    let mut backend = StubCaptioner::new();
    let summary = job::run(&cfg, &mut backend, &plain_ui()).expect("job run");

    // Centers 2, 4, 10, 12 stay inside one recording; 6 and 8 span both.
    assert_eq!(summary.captioned, 4);
    assert_eq!(summary.skipped, 2);
    assert_eq!(backend.calls(), 4);

    let document = CaptionRun::load(&output_path).expect("caption json");
    let keys: Vec<&str> = document.outputs.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "recA0000001_f02_05.png",
            "recA0000001_f04_05.png",
            "recB0000001_f02_05.png",
            "recB0000001_f04_05.png",
        ]
    );
    for sequences in document.outputs.values() {
        assert_eq!(sequences.len(), 1);
        assert!(sequences[0].starts_with("3 frames:"));
    }

    assert_eq!(document.info.num_frames, 3);
    assert_eq!(document.info.frames_before, 2);
    assert_eq!(document.info.frames_after, 2);
    assert_eq!(document.info.interval, 2);
    assert_eq!(document.info.offset, 0);
    assert_eq!(document.info.prompt, cfg.prompt);
}

#[test]
fn sequences_shorter_than_a_window_produce_an_empty_document() {
    let dir = tempdir().expect("tempdir");
    let frames_dir = dir.path().join("frames");
    std::fs::create_dir_all(&frames_dir).expect("frames dir");
    for idx in 0..3 {
        write_frame(&frames_dir.join(format!("recA0000001_f{idx:02}_05.png")), idx * 30);
    }

    let output_path = dir.path().join("captions.json");
    let cfg = CaptionJobConfig {
        input_dir: frames_dir,
        output_path: output_path.clone(),
        window: WindowParams {
            num_frames: 4,
            frames_before: 8,
            frames_after: 8,
            interval: 1,
            offset: 0,
        },
        prompt: "describe the toy car assembly state".to_string(),
        max_new_tokens: 32,
    };

    let mut backend = StubCaptioner::new();
    let summary = job::run(&cfg, &mut backend, &plain_ui()).expect("job run");
    assert_eq!(summary.captioned, 0);
    assert_eq!(backend.calls(), 0);
}
