/// Extract the numeric listing id from a marketplace listing URL, e.g.
/// `https://www.discogs.com/sell/item/172723812`.
pub fn extract_listing_id(url: &str) -> Option<i64> {
    let pattern = regex::Regex::new(r"/sell/item/(\d+)").unwrap();
    pattern.captures(url).and_then(|c| c.get(1)).and_then(|m| m.as_str().parse::<i64>().ok())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn finds_listing_ids_in_urls() {
        assert_eq!(extract_listing_id("https://www.discogs.com/sell/item/172723812"), Some(172723812));
        assert_eq!(extract_listing_id("https://www.discogs.com/sell/item/99?ev=item-vc"), Some(99));
        assert_eq!(extract_listing_id("https://www.discogs.com/release/3715"), None);
        assert_eq!(extract_listing_id(""), None);
    }
}
