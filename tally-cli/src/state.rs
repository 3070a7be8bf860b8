use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tally_core::RawText;

/// State directory: `$TALLY_HOME`, else `~/.tally`.
pub fn tally_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TALLY_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".tally"))
}

pub fn ensure_tally_home() -> Result<PathBuf> {
    let dir = tally_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Read one OCR text file; bytes that are not UTF-8 are rejected.
pub fn read_ocr_text(path: &Path) -> Result<RawText> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    RawText::from_bytes(bytes).with_context(|| format!("load {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_ocr_text_rejects_binary() {
        let dir = std::env::temp_dir().join(format!("tally-state-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let good = dir.join("good.txt");
        fs::write(&good, "Total 300").unwrap();
        assert_eq!(read_ocr_text(&good).unwrap().as_str(), "Total 300");

        let bad = dir.join("bad.txt");
        fs::write(&bad, [0xffu8, 0xfe, 0x00]).unwrap();
        let err = read_ocr_text(&bad).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<tally_core::Error>(),
            Some(tally_core::Error::InvalidInput(_))
        ));

        fs::remove_dir_all(&dir).unwrap();
    }
}
