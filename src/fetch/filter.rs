// src/fetch/filter.rs
// =============================================================================
// Recognizes links that point at downloadable files instead of web pages.
//
// A crawler wants documents it can read links from. Following a link to a
// 40 MB zip or an mp3 wastes time and bandwidth and yields no new links, so
// these are dropped before they are ever counted or crawled.
// =============================================================================

// Extensions that mark a link as a file, matched against the end of the URL
const FILE_SUFFIXES: [&str; 18] = [
    ".pdf", ".zip", ".jpeg", ".jpg", ".gif", ".png", ".doc", ".docx", ".rar",
    ".gzip", ".tar", ".mp3", ".wav", ".mpg", ".mpeg", ".swf", ".exe", ".bin",
];

/// Returns true if the URL ends in one of the known file extensions.
///
/// The comparison ignores case, so "REPORT.PDF" counts as a file too.
pub fn is_file_link(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    FILE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_files() {
        assert!(is_file_link("https://example.com/paper.pdf"));
        assert!(is_file_link("https://example.com/archive.tar"));
        assert!(is_file_link("https://example.com/song.mp3"));
        assert!(is_file_link("https://example.com/setup.exe"));
    }

    #[test]
    fn test_ignores_case() {
        assert!(is_file_link("https://example.com/PHOTO.JPG"));
    }

    #[test]
    fn test_pages_are_not_files() {
        assert!(!is_file_link("https://example.com/"));
        assert!(!is_file_link("https://example.com/about.html"));
        // Only the end of the URL matters
        assert!(!is_file_link("https://example.com/pdf/overview"));
    }
}
