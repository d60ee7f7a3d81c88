//! Frame sequence handling.
//!
//! Dataset frames are flat folders of `.jpg/.jpeg/.png` files whose names
//! carry two pieces of metadata positionally:
//!
//! - the first 11 characters identify the recording session, and
//! - the two characters immediately before the extension encode the
//!   assembly stage index.
//!
//! Both are parsed here with explicit validation so a malformed name fails
//! with a descriptive error instead of failing downstream inside a table
//! lookup.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{anyhow, Context, Result};
use regex::Regex;

use crate::stage::StageIndex;

/// Extensions treated as frames when listing a folder.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Length of the recording-session prefix embedded in frame names.
pub const SESSION_PREFIX_LEN: usize = 11;

/// One decoded RGB8 frame.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGB8, `width * height * 3` bytes.
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;
        if pixels.len() != expected {
            return Err(anyhow!(
                "expected {} RGB bytes for {}x{}, received {}",
                expected,
                width,
                height,
                pixels.len()
            ));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }
}

/// Decode an image file into an RGB8 frame.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let image = image::open(path)
        .with_context(|| format!("failed to decode frame {}", path.display()))?;
    let rgb = image.into_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Frame {
        width,
        height,
        pixels: rgb.into_raw(),
    })
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// List the image files in a folder in natural name order.
///
/// Natural order compares digit runs numerically, so `frame_9` sorts before
/// `frame_10`. Non-image files are ignored.
pub fn list_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list frame folder {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to read entry in {}", dir.display()))?
            .path();
        if path.is_file() && is_image_file(&path) {
            paths.push(path);
        }
    }

    paths.sort_by(|a, b| {
        let a_name = a.file_name().and_then(|n| n.to_str()).unwrap_or("");
        let b_name = b.file_name().and_then(|n| n.to_str()).unwrap_or("");
        natural_cmp(a_name, b_name)
    });
    Ok(paths)
}

/// Compare two names treating digit runs as numbers.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a_chars = a.chars().peekable();
    let mut b_chars = b.chars().peekable();

    loop {
        match (a_chars.peek().copied(), b_chars.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ac), Some(bc)) => {
                if ac.is_ascii_digit() && bc.is_ascii_digit() {
                    let a_run = take_digit_run(&mut a_chars);
                    let b_run = take_digit_run(&mut b_chars);
                    // Compare numerically: longer significant run wins.
                    let a_trim = a_run.trim_start_matches('0');
                    let b_trim = b_run.trim_start_matches('0');
                    let ord = a_trim
                        .len()
                        .cmp(&b_trim.len())
                        .then_with(|| a_trim.cmp(b_trim))
                        .then_with(|| a_run.len().cmp(&b_run.len()));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                } else {
                    if ac != bc {
                        return ac.cmp(&bc);
                    }
                    a_chars.next();
                    b_chars.next();
                }
            }
        }
    }
}

fn take_digit_run(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek() {
        if c.is_ascii_digit() {
            run.push(*c);
            chars.next();
        } else {
            break;
        }
    }
    run
}

/// Extract the recording-session prefix from a frame name.
///
/// Windows spanning two sessions are invalid for captioning, so callers
/// compare prefixes before assembling a clip.
pub fn session_prefix(name: &str) -> Result<&str> {
    let mut indices = name.char_indices();
    match indices.nth(SESSION_PREFIX_LEN - 1) {
        Some((idx, c)) => Ok(&name[..idx + c.len_utf8()]),
        None => Err(anyhow!(
            "frame name '{}' is shorter than the {}-character session prefix",
            name,
            SESSION_PREFIX_LEN
        )),
    }
}

static STAGE_SUFFIX_RE: OnceLock<Regex> = OnceLock::new();

fn stage_suffix_re() -> &'static Regex {
    STAGE_SUFFIX_RE.get_or_init(|| {
        Regex::new(r"(\d{2})\.[A-Za-z0-9]+$").expect("stage suffix regex")
    })
}

/// Parse the stage index encoded as the two digits before the extension.
///
/// Rejects names without a two-digit suffix and suffixes outside the stage
/// table range.
pub fn stage_suffix(name: &str) -> Result<StageIndex> {
    let captures = stage_suffix_re().captures(name).ok_or_else(|| {
        anyhow!(
            "frame name '{}' has no two-digit stage suffix before its extension",
            name
        )
    })?;
    let digits = &captures[1];
    let value: u8 = digits
        .parse()
        .with_context(|| format!("stage suffix '{}' in '{}' is not numeric", digits, name))?;
    StageIndex::new(value)
        .with_context(|| format!("frame name '{}' carries an invalid stage index", name))
}

/// File name portion of a frame path, as used for record keys.
pub fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("path {} has no usable file name", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_order_sorts_digit_runs_numerically() {
        let mut names = vec!["rec_10.jpg", "rec_2.jpg", "rec_1.jpg"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["rec_1.jpg", "rec_2.jpg", "rec_10.jpg"]);
    }

    #[test]
    fn natural_order_falls_back_to_lexicographic() {
        assert_eq!(natural_cmp("abc", "abd"), Ordering::Less);
        assert_eq!(natural_cmp("abc", "abc"), Ordering::Equal);
        assert_eq!(natural_cmp("frame_007", "frame_7"), Ordering::Greater);
    }

    #[test]
    fn session_prefix_is_first_eleven_chars() {
        let name = "20240611_a1_frame_0042_05.jpg";
        assert_eq!(session_prefix(name).unwrap(), "20240611_a1");
    }

    #[test]
    fn session_prefix_rejects_short_names() {
        let err = session_prefix("short.jpg").unwrap_err();
        assert!(err.to_string().contains("session prefix"));
    }

    #[test]
    fn stage_suffix_parses_two_digits_before_extension() {
        let stage = stage_suffix("20240611_a1_frame_0042_05.jpg").unwrap();
        assert_eq!(stage.get(), 5);
        let stage = stage_suffix("20240611_a1_frame_0042_23.png").unwrap();
        assert_eq!(stage.get(), 23);
    }

    #[test]
    fn stage_suffix_rejects_missing_digits() {
        assert!(stage_suffix("frame_ab.jpg").is_err());
        assert!(stage_suffix("frame").is_err());
    }

    #[test]
    fn stage_suffix_rejects_out_of_range() {
        let err = stage_suffix("20240611_a1_frame_0042_24.jpg").unwrap_err();
        assert!(format!("{:#}", err).contains("invalid stage index"));
    }
}
