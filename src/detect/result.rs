use serde::{Deserialize, Serialize};

/// One candidate detection on one frame.
#[derive(Clone, Debug)]
pub struct Detection {
    /// Class index in `0..num_classes`.
    pub class_id: usize,
    /// Normalized corner coordinates `[x0, y0, x1, y1]`, each in 0..1.
    pub bbox: [f32; 4],
    pub confidence: f32,
}

/// Best box kept for one class on one frame.
///
/// This is the unit of the records JSON: every frame maps to an array with
/// one `BoxRecord` per class. A class the detector never fired on keeps the
/// all-zero default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxRecord {
    #[serde(rename = "box")]
    pub bbox: [f32; 4],
    pub conf: f32,
}

impl Default for BoxRecord {
    fn default() -> Self {
        Self {
            bbox: [0.0, 0.0, 0.0, 0.0],
            conf: 0.0,
        }
    }
}

impl BoxRecord {
    /// True when no detection has been folded into this record yet.
    pub fn is_unset(&self) -> bool {
        self.conf == 0.0 && self.bbox == [0.0, 0.0, 0.0, 0.0]
    }
}
