//! `Link` header parsing.

/// Returns the target of the `rel="next"` entry of a `Link` header.
///
/// Entries look like `<https://host/path?x=1>;rel="next"` and are separated by
/// commas. Targets are delimited by angle brackets, so commas inside a URL do
/// not split entries.
pub(crate) fn next_link(header: &str) -> Option<String> {
    let mut rest = header;
    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let end = after.find('>')?;
        let target = &after[..end];
        let tail = &after[end + 1..];
        let params_end = tail.find('<').unwrap_or(tail.len());

        if tail[..params_end].split(';').any(is_rel_next) {
            return Some(target.to_string());
        }
        rest = &tail[params_end..];
    }
    None
}

fn is_rel_next(param: &str) -> bool {
    let Some((key, value)) = param.split_once('=') else {
        return false;
    };
    if !key.trim().eq_ignore_ascii_case("rel") {
        return false;
    }
    value
        .trim()
        .trim_end_matches(',')
        .trim()
        .trim_matches('"')
        .split_whitespace()
        .any(|rel| rel.eq_ignore_ascii_case("next"))
}
