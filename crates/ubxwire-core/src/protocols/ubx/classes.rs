/// Name of a binary message class, if it is a published one.
pub fn class_name(class: u8) -> Option<&'static str> {
    let name = match class {
        0x01 => "NAV",
        0x02 => "RXM",
        0x03 => "TRK",
        0x04 => "INF",
        0x05 => "ACK",
        0x06 => "CFG",
        0x08 => "TUN",
        0x09 => "UPD",
        0x0a => "MON",
        0x0b => "AID",
        0x0c => "DBG",
        0x0d => "TIM",
        0x10 => "ESF",
        0x13 => "MGA",
        0x21 => "LOG",
        0x27 => "SEC",
        0x28 => "HNR",
        0x29 => "NAV2",
        0xf0 => "NMEA-Standard",
        0xf1 => "NMEA-Proprietary",
        0xf4 => "RTCM2",
        0xf5 => "RTCM3",
        0xf6 => "SPARTN",
        0xf7 => "NMEA-NAV2",
        _ => return None,
    };
    Some(name)
}

/// Human-readable identity: the schema name when known, otherwise
/// `CLASS-id` for published classes and `UBX-classid` for the rest.
pub fn message_identity(class: u8, id: u8, schema_name: Option<&str>) -> String {
    if let Some(name) = schema_name {
        return name.to_string();
    }
    match class_name(class) {
        Some(class_name) => format!("{class_name}-{id:02X}"),
        None => format!("UBX-{class:02X}{id:02X}"),
    }
}
