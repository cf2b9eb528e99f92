use camino::Utf8PathBuf;

/// Epsilon for floating-point coordinate comparisons in tests
const COORDINATE_EPSILON: f64 = 1.0e-7;

/// Directory containing the XML fixtures.
pub fn fixtures_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Path to a named `.osm` fixture.
pub fn fixture_path(stem: &str) -> Utf8PathBuf {
    fixtures_dir().join(format!("{stem}.osm"))
}

/// Compare floating-point coordinates within a small epsilon.
#[allow(dead_code, reason = "not every test target compares coordinates")]
pub fn assert_close(actual: f64, expected: f64) {
    let delta = (actual - expected).abs();
    assert!(
        delta <= COORDINATE_EPSILON,
        "expected {expected}, got {actual} (|Δ| = {delta})"
    );
}
