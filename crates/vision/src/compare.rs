//! Image comparison capability
//!
//! The gate only needs `compareImages(before, after) -> score` where the
//! score is in [0, 1] and more visual difference always means a higher
//! score. Which metric backs that is swappable.

use crate::error::VisionError;
use image::imageops::FilterType;
use std::path::Path;

/// Side length both images are resampled to before pixel comparison
const COMPARE_SIZE: u32 = 64;

/// A normalized visual-difference metric between two image files.
///
/// # Contract
/// - Returned score is in [0, 1]: 0 = identical, 1 = maximally
///   different at the metric's comparison resolution.
/// - Monotonic: more difference never yields a lower score.
pub trait ImageComparator: Send + Sync {
    /// Metric name, carried into gate reports for audit display
    fn name(&self) -> &str;

    fn compare(&self, before: &Path, after: &Path) -> Result<f64, VisionError>;
}

impl<T: ImageComparator + ?Sized> ImageComparator for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn compare(&self, before: &Path, after: &Path) -> Result<f64, VisionError> {
        (**self).compare(before, after)
    }
}

/// Pixel-level comparator: grayscale, downsample, normalized mean
/// absolute difference.
///
/// Downsampling to a fixed small square keeps the comparison cheap and
/// resolution-independent; 255 is the per-pixel difference ceiling.
pub struct PixelDiff;

impl ImageComparator for PixelDiff {
    fn name(&self) -> &str {
        "pixel-diff"
    }

    fn compare(&self, before: &Path, after: &Path) -> Result<f64, VisionError> {
        let before = image::open(before)?
            .resize_exact(COMPARE_SIZE, COMPARE_SIZE, FilterType::Lanczos3)
            .to_luma8();
        let after = image::open(after)?
            .resize_exact(COMPARE_SIZE, COMPARE_SIZE, FilterType::Lanczos3)
            .to_luma8();

        let total: u64 = before
            .pixels()
            .zip(after.pixels())
            .map(|(a, b)| (a.0[0] as i32 - b.0[0] as i32).unsigned_abs() as u64)
            .sum();

        let pixel_count = (COMPARE_SIZE * COMPARE_SIZE) as f64;
        Ok(total as f64 / (255.0 * pixel_count))
    }
}

/// Coarse comparator for deployments without image decoding: relative
/// file-size delta.
///
/// A known weak substitute for the pixel metric - re-saving the same
/// photo at a different compression level can pass it. Kept exactly
/// this weak on purpose; strengthening it silently would change the
/// documented contract. Injected explicitly, never substituted for a
/// comparator that errored.
pub struct FileSizeDelta;

impl ImageComparator for FileSizeDelta {
    fn name(&self) -> &str {
        "filesize-heuristic"
    }

    fn compare(&self, before: &Path, after: &Path) -> Result<f64, VisionError> {
        let s1 = std::fs::metadata(before)?.len();
        let s2 = std::fs::metadata(after)?.len();
        let max = s1.max(s2);
        if max == 0 {
            return Ok(0.0);
        }
        Ok(s1.abs_diff(s2) as f64 / max as f64)
    }
}

/// A comparator returning a fixed score (for testing)
pub struct FixedScore(pub f64);

impl ImageComparator for FixedScore {
    fn name(&self) -> &str {
        "fixed-score"
    }

    fn compare(&self, _before: &Path, _after: &Path) -> Result<f64, VisionError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};
    use std::path::PathBuf;

    fn write_gray_png(dir: &Path, name: &str, value: u8) -> PathBuf {
        let path = dir.join(name);
        let img = ImageBuffer::from_pixel(32, 32, Luma([value]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_identical_images_score_zero() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_gray_png(dir.path(), "a.png", 128);
        let b = write_gray_png(dir.path(), "b.png", 128);

        let score = PixelDiff.compare(&a, &b).unwrap();
        assert!(score < 1e-6, "got {score}");
    }

    #[test]
    fn test_opposite_images_score_near_one() {
        let dir = tempfile::tempdir().unwrap();
        let black = write_gray_png(dir.path(), "black.png", 0);
        let white = write_gray_png(dir.path(), "white.png", 255);

        let score = PixelDiff.compare(&black, &white).unwrap();
        assert!(score > 0.99, "got {score}");
    }

    #[test]
    fn test_pixel_diff_symmetric() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_gray_png(dir.path(), "a.png", 40);
        let b = write_gray_png(dir.path(), "b.png", 200);

        let ab = PixelDiff.compare(&a, &b).unwrap();
        let ba = PixelDiff.compare(&b, &a).unwrap();
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn test_undecodable_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let garbage = dir.path().join("not-an-image.png");
        std::fs::write(&garbage, b"definitely not a png").unwrap();
        let other = write_gray_png(dir.path(), "ok.png", 10);

        assert!(PixelDiff.compare(&garbage, &other).is_err());
    }

    #[test]
    fn test_filesize_delta() {
        let dir = tempfile::tempdir().unwrap();
        let small = dir.path().join("small.bin");
        let large = dir.path().join("large.bin");
        std::fs::write(&small, vec![0u8; 100]).unwrap();
        std::fs::write(&large, vec![0u8; 400]).unwrap();

        let score = FileSizeDelta.compare(&small, &large).unwrap();
        assert_eq!(score, 0.75);
    }

    #[test]
    fn test_filesize_delta_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        std::fs::write(&a, b"").unwrap();
        std::fs::write(&b, b"").unwrap();

        assert_eq!(FileSizeDelta.compare(&a, &b).unwrap(), 0.0);
    }
}
