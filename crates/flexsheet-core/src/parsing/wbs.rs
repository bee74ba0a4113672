//! Work-breakdown-structure codes: an uppercase ASCII letter followed by one
//! or more ASCII digits or underscores, e.g. `P1234_1`.

/// Byte length of the WBS code starting at byte `i` of `s`, if one starts there.
pub fn code_len_at(s: &str, i: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    if !bytes.get(i)?.is_ascii_uppercase() {
        return None;
    }
    let run = bytes[i + 1..]
        .iter()
        .take_while(|b| b.is_ascii_digit() || **b == b'_')
        .count();
    (run > 0).then_some(run + 1)
}

/// Byte range of the rightmost WBS code in `s`.
pub fn rfind_code(s: &str) -> Option<(usize, usize)> {
    (0..s.len())
        .rev()
        .find_map(|i| code_len_at(s, i).map(|len| (i, i + len)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_len_at() {
        assert_eq!(code_len_at("P1234_1: x", 0), Some(7));
        assert_eq!(code_len_at("X_", 0), Some(2));
        assert_eq!(code_len_at("P", 0), None);
        assert_eq!(code_len_at("p123", 0), None);
        assert_eq!(code_len_at("Platform", 0), None);
        assert_eq!(code_len_at("A1", 5), None);
    }

    #[test]
    fn test_rfind_code_takes_rightmost() {
        let s = "A1 - B22";
        assert_eq!(rfind_code(s), Some((5, 8)));
    }

    #[test]
    fn test_rfind_code_none() {
        assert_eq!(rfind_code("Generic Project"), None);
        assert_eq!(rfind_code(""), None);
    }

    #[test]
    fn test_rfind_code_with_multibyte_text() {
        let s = "Équipe – Q7";
        let (start, end) = rfind_code(s).unwrap();
        assert_eq!(&s[start..end], "Q7");
    }
}
