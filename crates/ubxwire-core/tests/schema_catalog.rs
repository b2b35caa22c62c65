use std::io::Cursor;
use std::path::Path;

use ubxwire_core::codec::{CodecError, CodecOptions, Record, Value, decode_payload};
use ubxwire_core::{
    ErrorPolicy, MessageMode, ReadError, ReaderConfig, SchemaRegistry, StreamReader, encode_frame,
    parse_frame,
};

fn catalog() -> SchemaRegistry {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("schemas")
        .join("ubx.json");
    SchemaRegistry::load(&path).expect("load schema catalog")
}

fn decode_one(frame: Vec<u8>, config: ReaderConfig) -> Record {
    let mut reader = StreamReader::from_reader(Cursor::new(frame), catalog(), config);
    let message = reader.next_message().unwrap().expect("one message");
    message
        .as_ubx()
        .and_then(|ubx| ubx.fields().cloned())
        .expect("decoded fields")
}

fn raise() -> ReaderConfig {
    ReaderConfig::default().with_policy(ErrorPolicy::Raise)
}

fn nav_sat_payload() -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&405_000u32.to_le_bytes());
    payload.extend_from_slice(&[0x01, 0x02, 0x00, 0x00]);
    // GPS 12: cno 38, elev 45, azim 120, prRes -2.5, quality 7, used, ephemeris
    payload.extend_from_slice(&[0x00, 0x0c, 0x26, 0x2d]);
    payload.extend_from_slice(&120i16.to_le_bytes());
    payload.extend_from_slice(&(-25i16).to_le_bytes());
    payload.extend_from_slice(&0x0000_090fu32.to_le_bytes());
    // Galileo 7: cno 0, no signal
    payload.extend_from_slice(&[0x02, 0x07, 0x00, 0xf6]);
    payload.extend_from_slice(&(-1i16).to_le_bytes());
    payload.extend_from_slice(&0i16.to_le_bytes());
    payload.extend_from_slice(&0u32.to_le_bytes());
    payload
}

#[test]
fn catalog_loads_every_message() {
    let registry = catalog();
    assert_eq!(registry.len(), 15);
    let names: Vec<_> = registry.iter().map(|schema| schema.name()).collect();
    assert_eq!(names.first(), Some(&"NAV-POSLLH"));
    assert_eq!(names.last(), Some(&"MON-VER"));
}

#[test]
fn nav_sat_repeat_group() {
    let fields = decode_one(encode_frame(0x01, 0x35, &nav_sat_payload()).unwrap(), raise());
    assert_eq!(fields["numSvs"], Value::Unsigned(2));
    let svs = fields["svs"].as_group().unwrap();
    assert_eq!(svs.len(), 2);

    let gps = &svs[0];
    assert_eq!(gps["svId"], Value::Unsigned(12));
    assert_eq!(gps["elev"], Value::Signed(45));
    assert_eq!(gps["azim"], Value::Signed(120));
    assert_eq!(gps["prRes"], Value::Float(-2.5));
    let flags = gps["flags"].as_bitfield().unwrap();
    assert_eq!(flags["qualityInd"], Value::Unsigned(7));
    assert_eq!(flags["svUsed"], Value::Bool(true));
    assert_eq!(flags["orbitSource"], Value::Unsigned(1));
    assert_eq!(flags["ephAvail"], Value::Bool(true));
    assert_eq!(flags["almAvail"], Value::Bool(false));

    let galileo = &svs[1];
    assert_eq!(galileo["gnssId"], Value::Unsigned(2));
    assert_eq!(galileo["elev"], Value::Signed(-10));
}

#[test]
fn raw_options_keep_integers() {
    let config = ReaderConfig {
        decode_bitfields: false,
        apply_scaling: false,
        ..raise()
    };
    let fields = decode_one(encode_frame(0x01, 0x35, &nav_sat_payload()).unwrap(), config);
    let gps = &fields["svs"].as_group().unwrap()[0];
    assert_eq!(gps["prRes"], Value::Signed(-25));
    assert_eq!(gps["flags"], Value::Unsigned(0x090f));
}

#[test]
fn nav_posllh_scaling() {
    let mut payload = Vec::new();
    payload.extend_from_slice(&405_000u32.to_le_bytes());
    payload.extend_from_slice(&85_652_650i32.to_le_bytes());
    payload.extend_from_slice(&472_852_332i32.to_le_bytes());
    payload.extend_from_slice(&548_123i32.to_le_bytes());
    payload.extend_from_slice(&500_123i32.to_le_bytes());
    payload.extend_from_slice(&1_500u32.to_le_bytes());
    payload.extend_from_slice(&2_100u32.to_le_bytes());

    let fields = decode_one(encode_frame(0x01, 0x02, &payload).unwrap(), raise());
    assert_eq!(fields["lon"], Value::Float(8.565265));
    assert_eq!(fields["lat"], Value::Float(47.2852332));
    assert_eq!(fields["hMSL"], Value::Signed(500_123));

    let registry = catalog();
    let frame = registry
        .encode_message(0x01, 0x02, MessageMode::Get, &fields, CodecOptions::default())
        .unwrap();
    assert_eq!(parse_frame(&frame).unwrap().payload(), payload.as_slice());
}

#[test]
fn nav_status_bitfields() {
    let payload = [
        0x10, 0x27, 0x00, 0x00, // iTOW
        0x03, // 3D fix
        0x0d, // gpsFixOk, wknSet, towSet
        0x80, // mapMatching 2
        0x1a, // psmState 2, spoofDetState 3
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    let fields = decode_one(encode_frame(0x01, 0x03, &payload).unwrap(), raise());
    assert_eq!(fields["gpsFix"], Value::Unsigned(3));
    let flags = fields["flags"].as_bitfield().unwrap();
    assert_eq!(flags["gpsFixOk"], Value::Bool(true));
    assert_eq!(flags["diffSoln"], Value::Bool(false));
    assert_eq!(flags["towSet"], Value::Bool(true));
    assert_eq!(fields["fixStat"].as_bitfield().unwrap()["mapMatching"], Value::Unsigned(2));
    let flags2 = fields["flags2"].as_bitfield().unwrap();
    assert_eq!(flags2["psmState"], Value::Unsigned(2));
    assert_eq!(flags2["spoofDetState"], Value::Unsigned(3));
}

#[test]
fn mon_ver_extensions_run_to_end() {
    let mut payload = Vec::new();
    let mut text = |value: &str, width: usize| {
        let mut field = value.as_bytes().to_vec();
        field.resize(width, 0);
        payload.extend_from_slice(&field);
    };
    text("ROM SPG 5.10 (7b202e)", 30);
    text("000A0000", 10);
    text("FWVER=SPG 5.10", 30);
    text("PROTVER=34.10", 30);

    let fields = decode_one(encode_frame(0x0a, 0x04, &payload).unwrap(), raise());
    assert_eq!(fields["swVersion"], Value::from("ROM SPG 5.10 (7b202e)"));
    assert_eq!(fields["hwVersion"], Value::from("000A0000"));
    let extensions: Vec<_> = fields["extensions"]
        .as_group()
        .unwrap()
        .iter()
        .map(|record| record["extension"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(extensions, ["FWVER=SPG 5.10", "PROTVER=34.10"]);
}

#[test]
fn cfg_rate_encodes_from_record() {
    let mut record = Record::new();
    record.insert("measRate".to_string(), Value::Unsigned(1000));
    record.insert("navRate".to_string(), Value::Unsigned(1));
    record.insert("timeRef".to_string(), Value::Unsigned(1));
    let frame = catalog()
        .encode_message(0x06, 0x08, MessageMode::Set, &record, CodecOptions::default())
        .unwrap();
    assert_eq!(
        frame,
        [0xb5, 0x62, 0x06, 0x08, 0x06, 0x00, 0xe8, 0x03, 0x01, 0x00, 0x01, 0x00, 0x01, 0x39]
    );
}

#[test]
fn decoded_length_equals_declared_length() {
    let registry = catalog();
    let options = CodecOptions::default();
    let payload = nav_sat_payload();
    let schema = registry.lookup(0x01, 0x35, MessageMode::Get).unwrap();
    assert!(decode_payload(schema, &payload, options).is_ok());
    for cut in 0..payload.len() {
        assert!(
            decode_payload(schema, &payload[..cut], options).is_err(),
            "truncated payload of {cut} bytes decoded"
        );
    }
}

#[test]
fn poll_requests_decode_in_poll_mode() {
    let poll = encode_frame(0x06, 0x08, &[]).unwrap();
    let fields = decode_one(poll.clone(), raise().with_mode(MessageMode::Poll));
    assert!(fields.is_empty());

    let mut reader = StreamReader::from_reader(Cursor::new(poll), catalog(), raise());
    let err = reader.next_message().unwrap_err();
    assert!(matches!(
        err,
        ReadError::Decode {
            class: 0x06,
            id: 0x08,
            source: CodecError::SchemaLengthMismatch { declared: 0, .. }
        }
    ));
}

#[test]
fn cfg_msg_poll_and_get_use_their_own_layouts() {
    let poll = decode_one(
        encode_frame(0x06, 0x01, &[0x01, 0x35]).unwrap(),
        raise().with_mode(MessageMode::Poll),
    );
    assert_eq!(poll.keys().collect::<Vec<_>>(), ["msgClass", "msgID"]);
    assert_eq!(poll["msgID"], Value::Unsigned(0x35));

    let get = decode_one(encode_frame(0x06, 0x01, &[0x01, 0x35, 0x01]).unwrap(), raise());
    assert_eq!(get["rate"], Value::Unsigned(1));
}

#[test]
fn messages_without_a_mode_schema_stay_opaque() {
    let ack = encode_frame(0x05, 0x01, &[0x06, 0x01]).unwrap();
    let mut reader =
        StreamReader::from_reader(Cursor::new(ack), catalog(), raise().with_mode(MessageMode::Poll));
    let message = reader.next_message().unwrap().expect("one message");
    let ubx = message.as_ubx().unwrap();
    assert!(ubx.is_opaque());
    assert_eq!(ubx.payload(), [0x06, 0x01]);
}
