use crate::model::ProjectRef;
use crate::parsing::wbs;

/// Split a "Project name" value into a WBS code and the trailing project name.
///
/// The rightmost WBS code wins; an optional colon after it is dropped and the
/// remaining text, trimmed, becomes the name (which may be empty). Values
/// without a code are kept whole as the name.
pub fn parse_project_name(s: &str) -> ProjectRef {
    match wbs::rfind_code(s) {
        Some((start, end)) => {
            let rest = &s[end..];
            let rest = rest.strip_prefix(':').unwrap_or(rest);
            ProjectRef {
                name: rest.trim().to_string(),
                code: Some(s[start..end].to_string()),
            }
        }
        None => ProjectRef {
            name: s.to_string(),
            code: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_and_name() {
        let p = parse_project_name("ABC - P1234_1: Platform work");
        assert_eq!(p.code.as_deref(), Some("P1234_1"));
        assert_eq!(p.name, "Platform work");
    }

    #[test]
    fn test_no_code() {
        let p = parse_project_name("Generic Project");
        assert_eq!(p.code, None);
        assert_eq!(p.name, "Generic Project");
    }

    #[test]
    fn test_code_without_trailing_text() {
        let p = parse_project_name("Internal - X42");
        assert_eq!(p.code.as_deref(), Some("X42"));
        assert_eq!(p.name, "");
    }

    #[test]
    fn test_code_without_colon() {
        let p = parse_project_name("K9 Kennel upgrade");
        assert_eq!(p.code.as_deref(), Some("K9"));
        assert_eq!(p.name, "Kennel upgrade");
    }

    #[test]
    fn test_lowercase_prefix_is_not_a_code() {
        let p = parse_project_name("p1234 migration");
        assert_eq!(p.code, None);
        assert_eq!(p.name, "p1234 migration");
    }
}
