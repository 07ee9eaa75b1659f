//! Mixed-content body rewriting for the viewer proxy.
//!
//! The conversion service lives on a plain-HTTP origin. Browsers block its
//! subresources when the page itself came over HTTPS, so HTML/CSS/JS bodies
//! have every literal occurrence of the service origin replaced with the
//! gateway's own proxy path. Both functions are pure: (text in, text out),
//! no transport involved.

/// Replace every occurrence of `service_origin` with `proxy_base`.
pub fn rewrite_origin(body: &str, service_origin: &str, proxy_base: &str) -> String {
    body.replace(service_origin, proxy_base)
}

/// Insert `script` immediately before the first closing `</body>` tag.
/// Bodies without a `</body>` tag are returned unchanged.
pub fn inject_before_body_close(body: &str, script: &str) -> String {
    match body.find("</body>") {
        Some(idx) => {
            let mut out = String::with_capacity(body.len() + script.len());
            out.push_str(&body[..idx]);
            out.push_str(script);
            out.push_str(&body[idx..]);
            out
        }
        None => body.to_string(),
    }
}
