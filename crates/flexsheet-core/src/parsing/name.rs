/// Turn a "Last, First" name into "First Last".
///
/// Only the first two ", "-separated pieces are used, so suffixes such as
/// "Doe, Jane, Jr" are dropped. Values without a ", " separator are returned
/// trimmed.
pub fn friendly_name(s: &str) -> String {
    let mut parts = s.split(", ");
    match (parts.next(), parts.next()) {
        (Some(last), Some(first)) => format!("{} {}", first.trim(), last.trim()),
        _ => s.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_first() {
        assert_eq!(friendly_name("Doe, Jane"), "Jane Doe");
    }

    #[test]
    fn test_compound_last_name() {
        assert_eq!(friendly_name("Van den Berg, Jan"), "Jan Van den Berg");
    }

    #[test]
    fn test_extra_pieces_are_dropped() {
        assert_eq!(friendly_name("Doe, Jane, Jr"), "Jane Doe");
    }

    #[test]
    fn test_no_separator() {
        assert_eq!(friendly_name(" Jane Doe "), "Jane Doe");
    }
}
