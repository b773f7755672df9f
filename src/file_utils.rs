use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @const: Common video container extensions, lowercase
const VIDEO_EXTENSIONS: &[&str] = &[
    "webm", "mkv", "flv", "vob", "ogv", "avi", "mts", "m2ts", "ts", "mov",
    "wmv", "rm", "rmvb", "asf", "mp4", "m4p", "m4v", "mpg", "mpeg", "m2v",
    "3gp", "3g2", "mxf", "f4v",
];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @reads: Whole file as string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    // @generates: Output path for a resynchronized subtitle
    // @params: input_file, output_dir, tag, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        tag: &str,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        // Get the file stem (filename without extension)
        let stem = input_file.file_stem().unwrap_or_default();

        // Create the output filename with tag and extension
        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(tag);
        output_filename.push('.');
        output_filename.push_str(extension);

        // Join with the output directory
        output_dir.join(output_filename)
    }

    /// Check whether a path looks like a video file, by extension
    pub fn is_video_file<P: AsRef<Path>>(path: P) -> bool {
        let path = path.as_ref();
        if !path.is_file() {
            return false;
        }

        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
    }

    /// Find all video files under a directory
    pub fn find_video_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if Self::is_video_file(path) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Find the reference subtitle sitting next to a video: `<stem>.srt`
    /// first, then any `<stem>.*.srt` sibling
    pub fn find_matching_subtitle<P: AsRef<Path>>(video_path: P) -> Option<PathBuf> {
        let video_path = video_path.as_ref();
        let stem = video_path.file_stem()?.to_string_lossy().to_string();
        let parent = video_path.parent()?;

        let exact = parent.join(format!("{}.srt", stem));
        if exact.is_file() {
            return Some(exact);
        }

        let mut candidates: Vec<PathBuf> = fs::read_dir(parent)
            .ok()?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("srt"))
                    && path
                        .file_name()
                        .is_some_and(|name| name.to_string_lossy().starts_with(&format!("{}.", stem)))
            })
            .collect();

        candidates.sort();
        candidates.into_iter().next()
    }
}
