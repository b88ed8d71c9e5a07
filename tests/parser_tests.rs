use market_atlas::aggregator::{load_regions, parse_regions};
use market_atlas::parser::load_transactions;
use market_atlas::utils::error::{ConfigError, ParseError};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_transactions_from_file() {
    let file = write_temp(
        "timestamp,username,seller,action,item_name,quantity,price,x,y,z\n\
         2023-06-01T12:00:00Z,alex,,sell,oak_log,64,12.75,-120,70,44\n\
         2023-06-02 09:30:00,steve,shop,buy,bread,3,1.5,10.5,64,-3\n",
    );

    let table = load_transactions(file.path()).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table[0].seller, None);
    assert_eq!(table[0].quantity, 64);
    assert_eq!(table[1].x, 10.5);
    assert_eq!(table[1].timestamp.to_string(), "2023-06-02 09:30:00");
}

#[test]
fn test_load_missing_file() {
    let err = load_transactions("/definitely/not/here.csv").unwrap_err();
    assert!(matches!(err, ParseError::Io(_)));
}

#[test]
fn test_ragged_row_fails_whole_load() {
    let file = write_temp(
        "timestamp,username,seller,action,item_name,quantity,price,x,y,z\n\
         2023-06-01,alex,shop,buy,dirt,1,1,0,0,0\n\
         2023-06-01,alex,shop,buy,dirt,1\n",
    );

    let err = load_transactions(file.path()).unwrap_err();
    assert!(matches!(err, ParseError::Csv(_)));
}

#[test]
fn test_error_message_names_row_and_column() {
    let file = write_temp(
        "timestamp,username,seller,action,item_name,quantity,price,x,y,z\n\
         2023-06-01,alex,shop,buy,dirt,1,free,0,0,0\n",
    );

    let message = load_transactions(file.path()).unwrap_err().to_string();

    assert!(message.contains("Row 2"));
    assert!(message.contains("price"));
    assert!(message.contains("free"));
}

#[test]
fn test_load_regions_file() {
    let file = write_temp(
        r#"
[[regions]]
name = "Government Mall"
min_point = { x = 324, y = -62, z = 762 }
max_point = { x = 403, y = 319, z = 926 }

[[regions]]
name = "Nether Hub"
min_point = { x = -50, y = 0, z = -50 }
max_point = { x = 50, y = 128, z = 50 }
"#,
    );

    let regions = load_regions(file.path()).unwrap();

    assert_eq!(regions.len(), 2);
    assert_eq!(regions.regions()[1].name, "Nether Hub");
    assert_eq!(regions.regions()[0].min_point.y, -62.0);
}

#[test]
fn test_inverted_region_rejected_at_load() {
    let err = parse_regions(
        r#"
[[regions]]
name = "Backwards"
min_point = { x = 10, y = 0, z = 0 }
max_point = { x = 0, y = 10, z = 10 }
"#,
    )
    .unwrap_err();

    match err {
        ConfigError::InvertedBounds { region, axis, min, max } => {
            assert_eq!(region, "Backwards");
            assert_eq!(axis, 'x');
            assert_eq!(min, 10.0);
            assert_eq!(max, 0.0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_region_toml() {
    let err = parse_regions("[[regions]]\nname = \"NoBox\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::TomlParse(_)));
}

#[test]
fn test_empty_region_file_is_empty_set() {
    assert!(parse_regions("").unwrap().is_empty());
}
