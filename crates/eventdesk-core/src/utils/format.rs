use std::cmp::Ordering;

/// Format a phone number for display.
/// Local mobile numbers are normalized to 01XXX-XXXXXX. Sheets often store
/// them as numbers, which drops the leading zero, so 10-digit numbers
/// starting with 1 get it back.
pub fn format_phone(phone: &str) -> String {
    // Extract just the digits
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        11 if digits.starts_with("01") => format!("{}-{}", &digits[0..5], &digits[5..11]),
        10 if digits.starts_with('1') => format!("0{}-{}", &digits[0..4], &digits[4..10]),
        13 if digits.starts_with("8801") => format!("{}-{}", &digits[2..7], &digits[7..13]),
        _ => phone.trim().to_string(), // Return original if can't format
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Case-insensitive substring check. `needle` should already be lowercased.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Case-insensitive ordering without allocating
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("01712345678"), "01712-345678");
        assert_eq!(format_phone("1712345678"), "01712-345678");
        assert_eq!(format_phone("+880 1712-345678"), "01712-345678");
        assert_eq!(format_phone("017 1234 5678"), "01712-345678");
        assert_eq!(format_phone("123"), "123"); // Too short, return as-is
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Rahim Uddin", "uddin"));
        assert!(!contains_ignore_case("Rahim Uddin", "karim"));
    }

    #[test]
    fn test_cmp_ignore_case() {
        assert_eq!(cmp_ignore_case("bus 2", "Bus 2"), Ordering::Equal);
        assert_eq!(cmp_ignore_case("alpha", "Beta"), Ordering::Less);
    }
}
