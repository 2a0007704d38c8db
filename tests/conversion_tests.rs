//! Conversion tests over realistic AIDX messages

use aidx2json::converters::{parse_aidx, serialize, AidxConverter, ConverterConfig, OutputFormat};
use aidx2json::{ParseErrorKind, Source};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn convert(name: &str, config: ConverterConfig) -> Value {
    AidxConverter::with_config(config)
        .convert_path(fixture(name))
        .unwrap()
        .to_json_value()
        .unwrap()
}

#[test]
fn test_flight_leg_notification() {
    let value = convert("flight_leg_notif.xml", ConverterConfig::aidx_default());

    assert_eq!(
        value,
        json!({
            "IATA_AIDX_FlightLegNotifRQ": {
                "@Version": "16.1",
                "@TimeStamp": "2024-03-01T06:15:00Z",
                "@TransactionIdentifier": "TX-7781",
                "Originator": {
                    "@CompanyShortName": "JQ",
                    "@TravelSector": "5",
                    "@Code": "JQ",
                    "@CodeContext": "3"
                },
                "DeliveringSystem": {"@CompanyShortName": "MEL"},
                "FlightLeg": {
                    "LegIdentifier": {
                        "Airline": {"@CodeContext": "3", "#text": "JQ"},
                        "FlightNumber": "255",
                        "DepartureAirport": {"@CodeContext": "3", "#text": "MEL"},
                        "ArrivalAirport": {"@CodeContext": "3", "#text": "SYD"},
                        "OriginDate": "2024-03-01"
                    },
                    "LegData": {
                        "@InternalStatus": "ON",
                        "PublicStatus": "Departed",
                        "OperationTime": [
                            {
                                "@OperationQualifier": "OFB",
                                "@CodeContext": "9750",
                                "@TimeType": "ACT",
                                "#text": "2024-03-01T06:02:00Z"
                            },
                            {
                                "@OperationQualifier": "TKO",
                                "@CodeContext": "9750",
                                "@TimeType": "ACT",
                                "#text": "2024-03-01T06:14:00Z"
                            },
                            {
                                "@OperationQualifier": "TDN",
                                "@CodeContext": "9750",
                                "@TimeType": "EST",
                                "#text": "2024-03-01T07:25:00Z"
                            }
                        ],
                        "AircraftInfo": {
                            "AircraftType": "320",
                            "Registration": "VH-VFD"
                        },
                        "Remark": "Gate change"
                    }
                }
            }
        })
    );
}

#[test]
fn test_key_order_follows_document() {
    let node = AidxConverter::with_config(ConverterConfig::aidx_default())
        .convert_path(fixture("flight_leg_notif.xml"))
        .unwrap();
    let root = node
        .get("IATA_AIDX_FlightLegNotifRQ")
        .and_then(|entry| entry.as_single())
        .and_then(|node| node.as_object())
        .unwrap();

    let keys: Vec<&str> = root.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "@Version",
            "@TimeStamp",
            "@TransactionIdentifier",
            "Originator",
            "DeliveringSystem",
            "FlightLeg"
        ]
    );
}

#[test]
fn test_vendor_extension_kept_without_skip_tags() {
    let value = convert("flight_leg_notif.xml", ConverterConfig::default());
    let leg_data = &value["IATA_AIDX_FlightLegNotifRQ"]["FlightLeg"]["LegData"];

    assert_eq!(
        leg_data["TPA_Extension"],
        json!({"VendorData": {"@Key": "crew", "Crew": "6"}})
    );
}

#[test]
fn test_preserve_namespaces() {
    let config = ConverterConfig::aidx_default()
        .to_builder()
        .with_preserve_namespaces(true)
        .build()
        .unwrap();
    let value = convert("flight_leg_notif.xml", config);
    let leg_data = &value["IATA_AIDX_FlightLegNotifRQ"]["FlightLeg"]["LegData"];

    assert_eq!(leg_data["am:Remark"], json!("Gate change"));
    assert!(leg_data.get("Remark").is_none());
    assert!(leg_data.get("TPA_Extension").is_none());
}

#[test]
fn test_include_only_leg_identifiers() {
    let config = ConverterConfig::builder()
        .include_only_tag("LegIdentifier")
        .build()
        .unwrap();
    let value = convert("two_legs.xml", config);

    assert_eq!(
        value,
        json!({
            "IATA_AIDX_FlightLegNotifRQ": {
                "FlightLeg": [
                    {"LegIdentifier": {"Airline": {"@CodeContext": "3", "#text": "JQ"}, "FlightNumber": "501"}},
                    {"LegIdentifier": {"Airline": {"@CodeContext": "3", "#text": "JQ"}, "FlightNumber": "502"}}
                ]
            }
        })
    );
}

#[test]
fn test_without_attributes() {
    let config = ConverterConfig::builder()
        .with_include_attributes(false)
        .build()
        .unwrap();
    let value = convert("two_legs.xml", config);

    assert_eq!(
        value["IATA_AIDX_FlightLegNotifRQ"]["FlightLeg"][1]["LegIdentifier"],
        json!({"Airline": "JQ", "FlightNumber": "502"})
    );
}

#[test]
fn test_malformed_fixture() {
    let err = AidxConverter::new()
        .convert_path(fixture("malformed.xml"))
        .unwrap_err();
    assert_eq!(err.parse_kind(), Some(ParseErrorKind::MalformedXml));
}

#[test]
fn test_empty_fixture() {
    let err = AidxConverter::new()
        .convert_path(fixture("empty.xml"))
        .unwrap_err();
    assert_eq!(err.parse_kind(), Some(ParseErrorKind::EmptyInput));
}

#[test]
fn test_missing_file() {
    let err = AidxConverter::new()
        .convert_path(fixture("does_not_exist.xml"))
        .unwrap_err();
    assert_eq!(err.parse_kind(), Some(ParseErrorKind::NotFound));
}

#[test]
fn test_directory_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = AidxConverter::new().convert_path(dir.path()).unwrap_err();
    assert_eq!(err.parse_kind(), Some(ParseErrorKind::NotFound));
}

#[test]
fn test_invalid_filter_tag_is_rejected() {
    let err = ConverterConfig::builder()
        .skip_tag("Flight Leg")
        .build()
        .unwrap_err();
    assert_eq!(err.parse_kind(), Some(ParseErrorKind::UnsupportedConfiguration));
}

#[test]
fn test_path_and_text_sources_agree() {
    let converter = AidxConverter::with_config(ConverterConfig::aidx_default());
    let text = std::fs::read_to_string(fixture("flight_leg_notif.xml")).unwrap();

    let from_path = converter.convert_path(fixture("flight_leg_notif.xml")).unwrap();
    let from_text = converter.convert_source(&Source::Text(text.clone())).unwrap();
    let from_bytes = converter.convert_bytes(text.as_bytes()).unwrap();

    assert_eq!(from_path, from_text);
    assert_eq!(from_text, from_bytes);
}

#[test]
fn test_one_shot_text_output() {
    let path = fixture("two_legs.xml");
    let converted = parse_aidx(
        path.to_str().unwrap(),
        OutputFormat::Text,
        Some(&ConverterConfig::aidx_default()),
    )
    .unwrap();
    let text = converted.as_text().unwrap();

    assert!(text.starts_with("{\n  \"IATA_AIDX_FlightLegNotifRQ\": {"));
    let reparsed: Value = serde_json::from_str(text).unwrap();
    assert_eq!(
        reparsed["IATA_AIDX_FlightLegNotifRQ"]["FlightLeg"][0]["LegIdentifier"]["FlightNumber"],
        json!("501")
    );
}

#[test]
fn test_serialized_output_round_trips() {
    let node = AidxConverter::with_config(ConverterConfig::aidx_default())
        .convert_path(fixture("flight_leg_notif.xml"))
        .unwrap();

    for indent in [0, 2, 4] {
        let text = serialize(&node, indent).unwrap();
        assert_eq!(aidx2json::Node::from_json_str(&text).unwrap(), node);
    }
}
