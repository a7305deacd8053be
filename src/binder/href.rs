/// Turn a raw `data-href` value into a URL worth opening
///
/// Surrounding whitespace is stripped and empty values are not navigable.
/// Anything else is handed to the opener as written; encoding is the
/// opener's job.
pub fn usable_href(raw: Option<&str>) -> Option<&str> {
    let trimmed = raw?.trim();

    if trimmed.is_empty() {
        return None;
    }

    Some(trimmed)
}
