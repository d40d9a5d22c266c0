#![allow(dead_code)]


/// Output lines starting with `prefix`
pub fn lines_with_prefix<'l>(lines: &'l [String], prefix: &str) -> Vec<&'l String> {
    lines
        .iter()
        .filter(|line| line.starts_with(prefix))
        .collect()
}

/// Commit ids in the order their `parents` line appears
pub fn commit_order(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| {
            let mut parts = line.split(' ');
            match (parts.next(), parts.next(), parts.next()) {
                (Some("commit"), Some(oid), Some("parents")) => Some(oid.to_string()),
                _ => None,
            }
        })
        .collect()
}
