//! MIME type lookup for downloaded files.
//!
//! Returns the Content-Type for a file extension. Unknown or absent
//! extensions fall back to `application/octet-stream`.

/// Content-Type for a download, keyed by lowercase extension.
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    match extension {
        Some("txt") => "text/plain",
        Some("html") => "text/html",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("pdf") => "application/pdf",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ppt") => "application/vnd.ms-powerpoint",
        Some("pptx") => {
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        }
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

/// Narrower table used by the token-gated file proxy: only document formats
/// are overridden; everything else defers to the backend's Content-Type.
pub fn office_content_type(extension: Option<&str>) -> Option<&'static str> {
    match extension {
        Some(
            ext @ ("pdf" | "ppt" | "pptx" | "doc" | "docx" | "xls" | "xlsx"),
        ) => Some(content_type_for(Some(ext))),
        _ => None,
    }
}

/// Final segment of a slash-separated path, used as the download filename.
pub fn filename_of(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

/// Lowercased extension of a filename, if any.
pub fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
