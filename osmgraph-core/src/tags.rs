//! Tag classification helpers.
//!
//! These only inspect tags; nothing here rejects or rewrites entities.

use crate::Tags;

/// Key removed from every entity during parsing.
pub const CREATED_BY_KEY: &str = "created_by";

/// Returns true when `key` is the editor attribution key, ignoring ASCII case.
#[must_use]
pub fn is_created_by(key: &str) -> bool {
    key.eq_ignore_ascii_case(CREATED_BY_KEY)
}

/// Named amenities.
#[must_use]
pub fn is_point_of_interest(tags: &Tags) -> bool {
    tags.contains_key("amenity") && tags.contains_key("name")
}

/// Named places or administrative boundaries, excluding maritime borders.
#[must_use]
pub fn is_geo_region(tags: &Tags) -> bool {
    let maritime = tags
        .get("maritime")
        .is_some_and(|value| value.eq_ignore_ascii_case("yes"));
    !maritime
        && tags.contains_key("name")
        && (tags.contains_key("place") || tags.contains_key("boundary"))
}

/// Named highways.
#[must_use]
pub fn is_route(tags: &Tags) -> bool {
    tags.contains_key("highway") && tags.contains_key("name")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[rstest]
    #[case("created_by", true)]
    #[case("Created_By", true)]
    #[case("created", false)]
    fn detects_created_by(#[case] key: &str, #[case] expected: bool) {
        assert_eq!(is_created_by(key), expected);
    }

    #[rstest]
    #[case(&[("amenity", "cafe"), ("name", "Kaffee")], true)]
    #[case(&[("amenity", "cafe")], false)]
    fn classifies_points_of_interest(#[case] pairs: &[(&str, &str)], #[case] expected: bool) {
        assert_eq!(is_point_of_interest(&tags(pairs)), expected);
    }

    #[rstest]
    #[case(&[("place", "city"), ("name", "Berlin")], true)]
    #[case(&[("boundary", "administrative"), ("name", "Mitte")], true)]
    #[case(&[("boundary", "administrative"), ("name", "Sea"), ("maritime", "YES")], false)]
    #[case(&[("place", "city")], false)]
    fn classifies_geo_regions(#[case] pairs: &[(&str, &str)], #[case] expected: bool) {
        assert_eq!(is_geo_region(&tags(pairs)), expected);
    }

    #[rstest]
    #[case(&[("highway", "primary"), ("name", "Unter den Linden")], true)]
    #[case(&[("highway", "primary")], false)]
    fn classifies_routes(#[case] pairs: &[(&str, &str)], #[case] expected: bool) {
        assert_eq!(is_route(&tags(pairs)), expected);
    }
}
