use serde::Serializer;

pub(crate) fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::serialize_hex;

    #[derive(serde::Serialize)]
    struct Frame {
        #[serde(serialize_with = "serialize_hex")]
        raw: Vec<u8>,
    }

    #[test]
    fn serializes_lowercase_pairs() {
        let frame = Frame {
            raw: vec![0xb5, 0x62, 0x00, 0x0f],
        };
        assert_eq!(serde_json::to_string(&frame).unwrap(), r#"{"raw":"b562000f"}"#);
    }
}
