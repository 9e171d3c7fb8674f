use crate::core::{FramePickerError, Frame, PickerResult};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use walkdir::WalkDir;

pub struct FileScanner;

impl FileScanner {
    /// ディレクトリ直下の画像を連番順に列挙する
    pub fn scan_frames(directory: &Path) -> PickerResult<Vec<Frame>> {
        if !directory.exists() {
            return Err(FramePickerError::file_discovery(
                directory,
                std::io::Error::new(std::io::ErrorKind::NotFound, "directory does not exist"),
            ));
        }
        if !directory.is_dir() {
            return Err(FramePickerError::configuration(format!(
                "Images path is not a directory: {}",
                directory.display()
            )));
        }

        let mut frames = Vec::new();

        for entry in WalkDir::new(directory)
            .follow_links(true)
            .min_depth(1)
            .max_depth(1)
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(directory).to_path_buf();
                FramePickerError::file_discovery(path, e.into())
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let is_image = entry
                .path()
                .extension()
                .map(|ext| Self::is_image_extension(&ext.to_string_lossy().to_lowercase()))
                .unwrap_or(false);
            if !is_image {
                log::debug!("Skipping non-image file {}", entry.path().display());
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_string();
            let sequence = Self::extract_sequence_number(&file_name)?;
            frames.push(Frame::new(entry.into_path(), sequence));
        }

        if frames.is_empty() {
            return Err(FramePickerError::configuration(format!(
                "No images found in {}",
                directory.display()
            )));
        }

        Self::sort_by_sequence(&mut frames);
        Ok(frames)
    }

    /// 拡張子直前の数字列を連番として取り出す（例: `DSCF01234.JPG` -> 1234）
    pub fn extract_sequence_number(file_name: &str) -> PickerResult<u64> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern =
            PATTERN.get_or_init(|| Regex::new(r"(\d+)\.\w+$").expect("valid sequence regex"));

        pattern
            .captures(file_name)
            .and_then(|captures| captures.get(1))
            .and_then(|digits| digits.as_str().parse::<u64>().ok())
            .ok_or_else(|| FramePickerError::missing_sequence_number(file_name))
    }

    /// 連番（整数）で並べ替える。同じ連番はパスで順序を固定する
    pub fn sort_by_sequence(frames: &mut [Frame]) {
        frames.sort_by(|a, b| a.sequence.cmp(&b.sequence).then_with(|| a.path.cmp(&b.path)));
    }

    fn is_image_extension(extension: &str) -> bool {
        matches!(
            extension,
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "tiff" | "tif" | "webp"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorCategory;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_scan_frames_orders_by_number() {
        let temp_dir = tempdir().unwrap();
        let temp_path = temp_dir.path();

        fs::write(temp_path.join("f10.png"), b"dummy").unwrap();
        fs::write(temp_path.join("f9.png"), b"dummy").unwrap();
        fs::write(temp_path.join("f100.jpg"), b"dummy").unwrap();
        fs::write(temp_path.join("notes.txt"), b"dummy").unwrap();
        fs::create_dir(temp_path.join("nested")).unwrap();
        fs::write(temp_path.join("nested").join("f1.png"), b"dummy").unwrap();

        let frames = FileScanner::scan_frames(temp_path).unwrap();
        let names: Vec<String> = frames.iter().map(Frame::file_name).collect();

        assert_eq!(names, vec!["f9.png", "f10.png", "f100.jpg"]);
        assert_eq!(frames[1].sequence, 10);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_frames_includes_symlinked_images() {
        let source_dir = tempdir().unwrap();
        let temp_dir = tempdir().unwrap();
        fs::write(source_dir.path().join("DSCF0002.png"), b"dummy").unwrap();
        fs::write(temp_dir.path().join("DSCF0001.png"), b"dummy").unwrap();
        std::os::unix::fs::symlink(
            source_dir.path().join("DSCF0002.png"),
            temp_dir.path().join("DSCF0002.png"),
        )
        .unwrap();

        let frames = FileScanner::scan_frames(temp_dir.path()).unwrap();

        let sequences: Vec<u64> = frames.iter().map(|f| f.sequence).collect();
        assert_eq!(sequences, vec![1, 2]);
        assert_eq!(frames[1].path(), temp_dir.path().join("DSCF0002.png"));
    }

    #[test]
    fn test_extract_sequence_number() {
        assert_eq!(FileScanner::extract_sequence_number("DSCF01234.JPG").unwrap(), 1234);
        assert_eq!(FileScanner::extract_sequence_number("scan_7.png").unwrap(), 7);
        assert_eq!(FileScanner::extract_sequence_number("2024_roll_0009.tif").unwrap(), 9);
    }

    #[test]
    fn test_missing_sequence_number() {
        let error = FileScanner::extract_sequence_number("image.png").unwrap_err();

        assert!(matches!(error, FramePickerError::MissingSequenceNumber { .. }));
        assert_eq!(error.category(), ErrorCategory::InputFormat);

        assert!(FileScanner::extract_sequence_number("frame12").is_err());
        assert!(FileScanner::extract_sequence_number("12frame.png").is_err());
    }

    #[test]
    fn test_scan_fails_on_unnumbered_image() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("img1.png"), b"dummy").unwrap();
        fs::write(temp_dir.path().join("image.png"), b"dummy").unwrap();

        let error = FileScanner::scan_frames(temp_dir.path()).unwrap_err();
        assert!(matches!(error, FramePickerError::MissingSequenceNumber { .. }));
    }

    #[test]
    fn test_scan_nonexistent_directory() {
        let error = FileScanner::scan_frames(Path::new("/nonexistent/frames")).unwrap_err();

        assert!(matches!(error, FramePickerError::FileDiscovery { .. }));
        assert!(error.to_string().contains("/nonexistent/frames"));
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = tempdir().unwrap();
        let error = FileScanner::scan_frames(temp_dir.path()).unwrap_err();

        assert_eq!(error.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_is_image_extension() {
        assert!(FileScanner::is_image_extension("jpg"));
        assert!(FileScanner::is_image_extension("tif"));
        assert!(!FileScanner::is_image_extension("txt"));
    }
}
