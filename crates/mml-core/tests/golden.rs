use std::fs;
use std::path::{Path, PathBuf};

use mml_core::{Dialect, convert};

#[test]
fn golden_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let fixtures_dir = root.join("tests/fixtures");
    let expect_dir = root.join("tests/expect");
    let dialect = Dialect::from_path(&fixtures_dir.join("dialect.json"))?;

    let mut fixtures = collect_fixtures(&fixtures_dir, false)?;
    fixtures.sort_by(|a, b| file_name(a).cmp(file_name(b)));
    assert!(!fixtures.is_empty(), "no fixtures under {}", fixtures_dir.display());

    for fixture in fixtures {
        let name = file_stem(&fixture)?;
        let source = fs::read_to_string(&fixture)?;
        let conversion = convert(&dialect, &source);
        assert!(conversion.round_trip_ok(), "round trip failed for fixture {}", name);

        let html_path = expect_dir.join(format!("{}.html", name));
        if html_path.exists() {
            let expected = fs::read_to_string(&html_path)?;
            assert_eq!(
                conversion.html.trim_end(),
                expected.trim_end(),
                "HTML mismatch for fixture {}",
                name
            );
        }

        let pages_path = expect_dir.join(format!("{}.pages.json", name));
        if pages_path.exists() {
            let expected: serde_json::Value = serde_json::from_str(&fs::read_to_string(&pages_path)?)?;
            let actual = serde_json::to_value(conversion.page_table())?;
            assert_eq!(actual, expected, "page table mismatch for fixture {}", name);
        }

        let diag_path = expect_dir.join(format!("{}.diag.json", name));
        if diag_path.exists() {
            let expected: serde_json::Value = serde_json::from_str(&fs::read_to_string(&diag_path)?)?;
            let actual = serde_json::to_value(&conversion.diagnostics)?;
            assert_eq!(actual, expected, "Diagnostics mismatch for fixture {}", name);
        } else if !conversion.diagnostics.is_empty() {
            panic!(
                "Unexpected diagnostics for fixture {}: {}",
                name,
                serde_json::to_string_pretty(&conversion.diagnostics)?
            );
        }
    }

    Ok(())
}

#[test]
fn golden_sanitized_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let fixtures_dir = root.join("tests/fixtures/sani");
    let expect_dir = root.join("tests/expect/sani");
    let dialect = Dialect::from_path(&root.join("tests/fixtures/dialect.json"))?;

    let mut fixtures = collect_fixtures(&fixtures_dir, true)?;
    fixtures.sort_by(|a, b| file_name(a).cmp(file_name(b)));

    for fixture in fixtures {
        let name = file_stem(&fixture)?;
        let source = fs::read_to_string(&fixture)?;
        let html = convert(&dialect, &source).sanitized_html();

        let html_path = expect_dir.join(format!("{}.html", name));
        if html_path.exists() {
            let expected = fs::read_to_string(&html_path)?;
            assert_eq!(
                html.trim_end(),
                expected.trim_end(),
                "HTML mismatch for fixture {}",
                name
            );
        }
    }

    Ok(())
}

fn collect_fixtures(
    dir: &Path,
    recursive: bool,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut fixtures = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() && recursive {
            fixtures.extend(collect_fixtures(&path, recursive)?);
        }
        if path.extension().and_then(|ext| ext.to_str()) == Some("mml") {
            fixtures.push(path);
        }
    }
    Ok(fixtures)
}

fn file_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("")
}

fn file_stem(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|value| value.to_string())
        .ok_or_else(|| "fixture name is not valid UTF-8".into())
}
