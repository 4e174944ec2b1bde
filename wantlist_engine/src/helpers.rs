//! Text utilities backing the similarity scorer.

/// Lowercases a title and strips everything that is not a letter, digit or whitespace, so that punctuation and
/// formatting noise ("(LP, Album, RE)", quotes, dashes) never influence similarity.
pub fn normalize_title(title: &str) -> String {
    let stripped = regex::Regex::new(r"[^\w\s]").unwrap();
    let collapsed = regex::Regex::new(r"\s+").unwrap();
    let lowered = title.to_lowercase();
    let cleaned = stripped.replace_all(&lowered, "");
    collapsed.replace_all(cleaned.trim(), " ").to_string()
}

/// Finds a four-digit release year (1900–2099) inside a listing title, e.g. "Kind Of Blue (1959 Mono)".
pub fn extract_year(title: &str) -> Option<i32> {
    let year = regex::Regex::new(r"\b(19|20)\d{2}\b").unwrap();
    year.find(title).and_then(|m| m.as_str().parse::<i32>().ok())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn normalizes_titles() {
        assert_eq!(normalize_title("John Coltrane - Blue Train (LP, Album, RE)"), "john coltrane blue train lp album re");
        assert_eq!(normalize_title("  Kind   Of Blue  "), "kind of blue");
        assert_eq!(normalize_title("!!!"), "");
        assert_eq!(normalize_title(""), "");
    }

    #[test]
    fn finds_years_in_titles() {
        assert_eq!(extract_year("Kind Of Blue (1959 Mono)"), Some(1959));
        assert_eq!(extract_year("Remastered 2015 Edition"), Some(2015));
        assert_eq!(extract_year("Blue Train"), None);
        assert_eq!(extract_year("Catalog 12345"), None);
        assert_eq!(extract_year("1850 press"), None);
    }
}
