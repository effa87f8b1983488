//! Image and attachment helpers.
//!
//! Pure functions for file-name rewriting and aspect ratios, plus attachment
//! lookup by URL. The lookup itself needs the host's media database, which
//! sits behind the [`AttachmentIndex`] trait; everything around it (URL
//! normalization, choosing among candidate rows) lives here.

use url::Url;

/// Extensions rewritten by [`replace_ext_to_webp`], in replacement order.
pub const WEBP_SOURCE_EXTENSIONS: [&str; 4] = [".jpg", ".png", ".jpeg", ".gif"];

/// Replace `.jpg`, `.png`, `.jpeg` and `.gif` with `.webp`.
///
/// Every occurrence is replaced, not just a trailing extension, matching how
/// image URLs are rewritten inside srcset strings.
pub fn replace_ext_to_webp(subject: &str) -> String {
    WEBP_SOURCE_EXTENSIONS
        .iter()
        .fold(subject.to_string(), |s, ext| s.replace(ext, ".webp"))
}

/// Reduce `width:height` to lowest terms, formatted `w/h` for CSS
/// `aspect-ratio`.
///
/// # Examples
/// ```
/// # use themekit::media::calc_aspect_ratio;
/// assert_eq!(calc_aspect_ratio(1920, 1080).as_deref(), Some("16/9"));
/// assert_eq!(calc_aspect_ratio(0, 1080), None);
/// ```
pub fn calc_aspect_ratio(width: u32, height: u32) -> Option<String> {
    if width == 0 || height == 0 {
        return None;
    }
    let divisor = gcd(width, height);
    Some(format!("{}/{}", width / divisor, height / divisor))
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Where uploads are served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDir {
    /// URL of the current upload sub-directory (e.g. `.../uploads/2024/05`).
    /// Only its scheme is used.
    pub url: String,
    /// Base URL all uploads live under (e.g. `https://example.com/wp-content/uploads`).
    pub base_url: String,
}

/// One candidate row from the attachment store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    pub post_id: u64,
    /// Path relative to the upload base, as stored.
    pub path: String,
}

/// Lookup of attachments by stored relative path.
///
/// Implementations may match case-insensitively; [`resolve_image_id`] picks
/// the exact-case row when several come back.
pub trait AttachmentIndex {
    fn attached_files(&self, path: &str) -> Vec<AttachedFile>;
}

/// Turn an attachment URL into the relative path the attachment store keys on.
///
/// The URL's scheme is forced to the upload directory's (so an `http://`
/// link finds an `https://` upload), then the base URL prefix is dropped.
/// URLs outside the upload base come back with only the scheme adjusted.
pub fn attachment_path(url: &str, dir: &UploadDir) -> String {
    let mut path = url.to_string();

    let upload_scheme = Url::parse(&dir.url).ok().map(|u| u.scheme().to_string());
    let image_scheme = Url::parse(url).ok().map(|u| u.scheme().to_string());
    // Url lowercases schemes; the raw URL may not.
    if let (Some(upload), Some(image)) = (upload_scheme, image_scheme)
        && upload != image
        && path
            .get(..image.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(&image))
    {
        path = format!("{upload}{}", &path[image.len()..]);
    }

    let prefix = format!("{}/", dir.base_url);
    match path.strip_prefix(&prefix) {
        Some(relative) => relative.to_string(),
        None => path,
    }
}

/// Resolve an attachment URL to its post id.
///
/// Takes the first candidate row, preferring one whose stored path matches
/// exactly (case-sensitive) when there are several. `None` when the store
/// has no row for the path.
pub fn resolve_image_id(index: &impl AttachmentIndex, url: &str, dir: &UploadDir) -> Option<u64> {
    let path = attachment_path(url, dir);
    let candidates = index.attached_files(&path);
    let chosen = candidates
        .iter()
        .find(|c| c.path == path)
        .or_else(|| candidates.first());
    if chosen.is_none() {
        tracing::debug!(url, path, "no attachment for URL");
    }
    chosen.map(|c| c.post_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // replace_ext_to_webp() tests
    // =========================================================================

    #[test]
    fn replace_ext_to_webp_all_extensions() {
        for ext in ["jpg", "png", "jpeg", "gif"] {
            assert_eq!(
                replace_ext_to_webp(&format!("my-image-file.{ext}")),
                "my-image-file.webp"
            );
        }
    }

    #[test]
    fn replace_ext_to_webp_leaves_other_files() {
        assert_eq!(replace_ext_to_webp("logo.svg"), "logo.svg");
    }

    #[test]
    fn replace_ext_to_webp_rewrites_every_occurrence() {
        assert_eq!(
            replace_ext_to_webp("a.jpg 300w, a-2x.png 600w"),
            "a.webp 300w, a-2x.webp 600w"
        );
    }

    // =========================================================================
    // calc_aspect_ratio() tests
    // =========================================================================

    #[test]
    fn calc_aspect_ratio_reduces() {
        assert_eq!(calc_aspect_ratio(150, 200).as_deref(), Some("3/4"));
        assert_eq!(calc_aspect_ratio(800, 150).as_deref(), Some("16/3"));
        assert_eq!(calc_aspect_ratio(1200, 333).as_deref(), Some("400/111"));
        assert_eq!(calc_aspect_ratio(841, 333).as_deref(), Some("841/333"));
    }

    #[test]
    fn calc_aspect_ratio_square() {
        assert_eq!(calc_aspect_ratio(500, 500).as_deref(), Some("1/1"));
    }

    #[test]
    fn calc_aspect_ratio_zero_is_none() {
        assert_eq!(calc_aspect_ratio(0, 10), None);
        assert_eq!(calc_aspect_ratio(10, 0), None);
    }

    // =========================================================================
    // attachment lookup tests
    // =========================================================================

    struct FakeIndex(Vec<AttachedFile>);

    impl AttachmentIndex for FakeIndex {
        fn attached_files(&self, path: &str) -> Vec<AttachedFile> {
            self.0
                .iter()
                .filter(|f| f.path.eq_ignore_ascii_case(path))
                .cloned()
                .collect()
        }
    }

    fn upload_dir() -> UploadDir {
        UploadDir {
            url: "https://example.com/wp-content/uploads/2024/05".to_string(),
            base_url: "https://example.com/wp-content/uploads".to_string(),
        }
    }

    fn file(post_id: u64, path: &str) -> AttachedFile {
        AttachedFile {
            post_id,
            path: path.to_string(),
        }
    }

    #[test]
    fn attachment_path_strips_base_url() {
        assert_eq!(
            attachment_path("https://example.com/wp-content/uploads/2024/05/a.jpg", &upload_dir()),
            "2024/05/a.jpg"
        );
    }

    #[test]
    fn attachment_path_forces_upload_scheme() {
        assert_eq!(
            attachment_path("http://example.com/wp-content/uploads/http-a.jpg", &upload_dir()),
            "http-a.jpg"
        );
    }

    #[test]
    fn attachment_path_forces_upload_scheme_case_insensitively() {
        assert_eq!(
            attachment_path("HTTP://example.com/wp-content/uploads/a.jpg", &upload_dir()),
            "a.jpg"
        );
        assert_eq!(
            attachment_path("Http://example.com/wp-content/uploads/2024/b.png", &upload_dir()),
            "2024/b.png"
        );
    }

    #[test]
    fn attachment_path_outside_uploads_is_kept() {
        assert_eq!(
            attachment_path("https://cdn.example.org/a.jpg", &upload_dir()),
            "https://cdn.example.org/a.jpg"
        );
        assert_eq!(attachment_path("a.jpg", &upload_dir()), "a.jpg");
    }

    #[test]
    fn resolve_image_id_single_match() {
        let index = FakeIndex(vec![file(7, "2024/05/a.jpg")]);
        let url = "https://example.com/wp-content/uploads/2024/05/a.jpg";
        assert_eq!(resolve_image_id(&index, url, &upload_dir()), Some(7));
    }

    #[test]
    fn resolve_image_id_prefers_exact_case() {
        let index = FakeIndex(vec![file(1, "2024/05/A.jpg"), file(2, "2024/05/a.jpg")]);
        let url = "https://example.com/wp-content/uploads/2024/05/a.jpg";
        assert_eq!(resolve_image_id(&index, url, &upload_dir()), Some(2));
    }

    #[test]
    fn resolve_image_id_falls_back_to_first_row() {
        let index = FakeIndex(vec![file(1, "2024/05/A.JPG"), file(2, "2024/05/a.JPG")]);
        let url = "https://example.com/wp-content/uploads/2024/05/a.jpg";
        assert_eq!(resolve_image_id(&index, url, &upload_dir()), Some(1));
    }

    #[test]
    fn resolve_image_id_none_when_unknown() {
        let index = FakeIndex(vec![]);
        assert_eq!(
            resolve_image_id(&index, "https://example.com/x.jpg", &upload_dir()),
            None
        );
    }
}
