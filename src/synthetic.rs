//! Synthetic-annotation conversion.
//!
//! Converts a COCO-style annotations file for rendered synthetic images
//! into YOLO training layout: one plain-text label file per image with
//! normalized center-based boxes, plus a copy of each referenced image.
//!
//! Label files are opened in append mode, one line per annotation, so
//! re-running into an uncleaned output folder doubles every line. The run
//! warns when the label folder is not empty but deliberately does not
//! clear it.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::config::SyntheticJobConfig;
use crate::ui::Ui;

#[derive(Debug, Deserialize)]
pub struct CocoImage {
    pub id: u64,
    pub file_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CocoAnnotation {
    pub image_id: u64,
    /// Absolute pixels, `[x, y, width, height]`.
    pub bbox: [f32; 4],
    pub category_id: u32,
}

#[derive(Debug, Deserialize)]
pub struct CocoFile {
    pub images: Vec<CocoImage>,
    pub annotations: Vec<CocoAnnotation>,
}

/// Result counts for one conversion run.
#[derive(Clone, Debug)]
pub struct ConvertSummary {
    pub annotations: usize,
    pub label_files: usize,
}

/// Format one YOLO label line from an absolute-pixel box.
///
/// `[x, y, w, h]` converts to normalized `[center_x, center_y, w, h]`.
pub fn yolo_line(category_id: u32, bbox: [f32; 4], width: u32, height: u32) -> String {
    let cx = (bbox[0] + bbox[2] / 2.0) / width as f32;
    let cy = (bbox[1] + bbox[3] / 2.0) / height as f32;
    let w = bbox[2] / width as f32;
    let h = bbox[3] / height as f32;
    format!("{} {} {} {} {}", category_id, cx, cy, w, h)
}

/// Convert an annotations file into per-image label files and image copies.
///
/// Annotations resolve their image positionally: `images[image_id]` must
/// hold the image whose `id` equals `image_id`. A file violating that
/// produces silently wrong labels, so the mismatch is a hard error here.
pub fn convert(cfg: &SyntheticJobConfig, ui: &Ui) -> Result<ConvertSummary> {
    cfg.validate()?;

    let coco = {
        let _stage = ui.stage("Read annotations");
        read_annotations(&cfg.annotations_path)?
    };

    let image_out_dir = cfg.output_root.join("images");
    let label_out_dir = cfg.output_root.join("labels");
    std::fs::create_dir_all(&image_out_dir)
        .with_context(|| format!("failed to create {}", image_out_dir.display()))?;
    std::fs::create_dir_all(&label_out_dir)
        .with_context(|| format!("failed to create {}", label_out_dir.display()))?;

    if std::fs::read_dir(&label_out_dir)?.next().is_some() {
        log::warn!(
            "label folder {} is not empty; existing files will accumulate duplicate lines",
            label_out_dir.display()
        );
    }

    let mut label_files = 0usize;
    let bar = ui.bar(coco.annotations.len() as u64, "convert annotations");
    for annotation in &coco.annotations {
        let image = resolve_image(&coco, annotation)?;

        let label_path = label_out_dir.join(label_file_name(&image.file_name)?);
        if !label_path.exists() {
            label_files += 1;
        }
        let line = yolo_line(
            annotation.category_id,
            annotation.bbox,
            cfg.image_width,
            cfg.image_height,
        );
        append_line(&label_path, &line)?;

        let src = cfg.image_dir.join(&image.file_name);
        let dst = image_out_dir.join(&image.file_name);
        std::fs::copy(&src, &dst)
            .with_context(|| format!("failed to copy image {}", src.display()))?;
        bar.inc(1);
    }
    bar.finish();

    log::info!(
        "converted {} annotations into {} label files under {}",
        coco.annotations.len(),
        label_files,
        label_out_dir.display()
    );
    Ok(ConvertSummary {
        annotations: coco.annotations.len(),
        label_files,
    })
}

fn read_annotations(path: &Path) -> Result<CocoFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read annotations file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid annotations JSON in {}", path.display()))
}

fn resolve_image<'a>(coco: &'a CocoFile, annotation: &CocoAnnotation) -> Result<&'a CocoImage> {
    let idx = annotation.image_id as usize;
    let image = coco.images.get(idx).ok_or_else(|| {
        anyhow!(
            "annotation references image_id {} but only {} images exist",
            annotation.image_id,
            coco.images.len()
        )
    })?;
    if image.id != annotation.image_id {
        return Err(anyhow!(
            "images[{}] holds id {}; positional image_id lookup does not hold for this file",
            annotation.image_id,
            image.id
        ));
    }
    Ok(image)
}

fn label_file_name(image_name: &str) -> Result<PathBuf> {
    let path = Path::new(image_name);
    if path.extension().is_none() {
        return Err(anyhow!("image name '{}' has no extension", image_name));
    }
    Ok(path.with_extension("txt"))
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open label file {}", path.display()))?;
    writeln!(file, "{}", line).with_context(|| format!("failed to append to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_boxes_against_fixed_dimensions() {
        let line = yolo_line(3, [100.0, 50.0, 200.0, 100.0], 1280, 720);
        assert_eq!(line, "3 0.15625 0.13888889 0.15625 0.13888889");
    }

    #[test]
    fn centered_full_frame_box() {
        let line = yolo_line(0, [0.0, 0.0, 1280.0, 720.0], 1280, 720);
        assert_eq!(line, "0 0.5 0.5 1 1");
    }

    #[test]
    fn label_name_swaps_the_extension() {
        assert_eq!(
            label_file_name("scene_0001.png").unwrap(),
            PathBuf::from("scene_0001.txt")
        );
        assert_eq!(
            label_file_name("scene_0001.jpeg").unwrap(),
            PathBuf::from("scene_0001.txt")
        );
        assert!(label_file_name("no_extension").is_err());
    }

    #[test]
    fn positional_mismatch_is_a_hard_error() {
        let coco = CocoFile {
            images: vec![
                CocoImage {
                    id: 1,
                    file_name: "a.png".to_string(),
                },
                CocoImage {
                    id: 0,
                    file_name: "b.png".to_string(),
                },
            ],
            annotations: vec![],
        };
        let annotation = CocoAnnotation {
            image_id: 0,
            bbox: [0.0, 0.0, 10.0, 10.0],
            category_id: 1,
        };
        let err = resolve_image(&coco, &annotation).unwrap_err();
        assert!(err.to_string().contains("positional"));
    }

    #[test]
    fn out_of_range_image_id_is_an_error() {
        let coco = CocoFile {
            images: vec![],
            annotations: vec![],
        };
        let annotation = CocoAnnotation {
            image_id: 5,
            bbox: [0.0, 0.0, 10.0, 10.0],
            category_id: 1,
        };
        assert!(resolve_image(&coco, &annotation).is_err());
    }
}
