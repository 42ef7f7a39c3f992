//! Integration tests for textcodec

use textcodec::bits::BitString;
use textcodec::config::{CodecConfig, Lz78Policy};
use textcodec::error::CodecError;
use textcodec::*;

#[test]
fn test_full_lifecycle() {
    let codec = Codec::default();
    let text = "the quick brown fox jumps over the lazy dog ".repeat(20);
    for method in [CodecMethod::Arithmetic, CodecMethod::Lz78] {
        let encoded = codec.encode(&text, method).unwrap();
        assert!(!encoded.bits.is_empty());
        assert_eq!(codec.decode(&encoded).unwrap(), text, "{method:?}");
    }
}

#[test]
fn test_arithmetic_example() {
    let codec = Codec::default();
    let encoded = codec.arithmetic_encode("aabac").unwrap();
    assert_eq!(encoded.alphabet, "abc");
    let decoded = codec
        .arithmetic_decode(&encoded.bits.to_string(), 5, "abc")
        .unwrap();
    assert_eq!(decoded, "aabac");
}

#[test]
fn test_lz78_example() {
    let codec = Codec::default();
    let encoded = codec.lz78_encode("ABABABA").unwrap();
    assert_eq!(encoded.alphabet, "BA");
    let decoded = codec
        .lz78_decode(&encoded.bits.to_string(), &encoded.alphabet)
        .unwrap();
    assert_eq!(decoded, "ABABABA");
}

#[test]
fn test_single_distinct_character() {
    let codec = Codec::default();
    for method in [CodecMethod::Arithmetic, CodecMethod::Lz78] {
        let encoded = codec.encode("xxxx", method).unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), "xxxx", "{method:?}");
    }
}

#[test]
fn test_long_message_scales_precision() {
    let codec = Codec::default();
    let text: String = (0..5000u32)
        .map(|i| char::from(b'a' + ((i * 7 + i / 13) % 11) as u8))
        .collect();
    let encoded = codec.encode(&text, CodecMethod::Arithmetic).unwrap();
    let precision = encoded.metadata.precision.unwrap();
    assert!(precision.bits() as usize > encoded.bits.len());
    assert_eq!(codec.decode(&encoded).unwrap(), text);
}

#[test]
fn test_output_json_roundtrip() {
    let codec = Codec::default();
    let encoded = codec.encode("mississippi", CodecMethod::Arithmetic).unwrap();
    let json = serde_json::to_string(&encoded).unwrap();
    let restored: EncodedOutput = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, encoded);
    assert_eq!(codec.decode(&restored).unwrap(), "mississippi");
}

#[test]
fn test_bits_serialize_as_text() {
    let codec = Codec::default();
    let encoded = codec.lz78_encode("ABABABA").unwrap();
    let json = serde_json::to_value(&encoded).unwrap();
    assert_eq!(json["bits"], "100010111");
    assert_eq!(json["alphabet"], "BA");
}

#[test]
fn test_byte_packed_storage() {
    let codec = Codec::default();
    let text = "she sells sea shells by the sea shore";
    let encoded = codec.lz78_encode(text).unwrap();
    let bytes = encoded.bits.to_bytes().unwrap();
    assert_eq!(bytes.len(), encoded.bits.len().div_ceil(8));
    let bits = BitString::from_bytes(&bytes, encoded.bits.len()).unwrap();
    let decoded = textcodec::lz78::decode(&bits, &encoded.alphabet, codec.config()).unwrap();
    assert_eq!(decoded, text);
}

#[test]
fn test_strict_policy_accepts_valid_streams() {
    let codec = Codec::new(CodecConfig {
        lz78_policy: Lz78Policy::Strict,
        ..CodecConfig::default()
    });
    let text = "abracadabra abracadabra";
    let encoded = codec.encode(text, CodecMethod::Lz78).unwrap();
    assert_eq!(codec.decode(&encoded).unwrap(), text);
}

#[test]
fn test_lenient_decode_of_garbage_terminates() {
    let codec = Codec::default();
    let decoded = codec.lz78_decode("1111111111111111111", "cba").unwrap();
    assert!(decoded.contains('?'));
}

#[test]
fn test_arithmetic_decode_requires_all_parameters() {
    let codec = Codec::default();
    assert!(matches!(
        codec.arithmetic_decode("", 3, "abc"),
        Err(CodecError::MissingParameter("bits"))
    ));
    assert!(matches!(
        codec.arithmetic_decode("101", 0, "abc"),
        Err(CodecError::MissingParameter("length"))
    ));
    assert!(matches!(
        codec.arithmetic_decode("101", 3, ""),
        Err(CodecError::MissingParameter("alphabet"))
    ));
}

#[test]
fn test_empty_input_error() {
    let codec = Codec::default();
    assert!(matches!(
        codec.arithmetic_encode(""),
        Err(CodecError::EmptyInput)
    ));
    assert!(matches!(codec.lz78_encode(""), Err(CodecError::EmptyInput)));
}

#[test]
fn test_codec_config() {
    let config = CodecConfig {
        precision_bits: Some(512),
        ..CodecConfig::default()
    };
    let codec = Codec::new(config);
    let encoded = codec.encode("fixed precision", CodecMethod::Arithmetic).unwrap();
    assert_eq!(encoded.metadata.precision.map(|p| p.bits()), Some(512));
    assert_eq!(codec.decode(&encoded).unwrap(), "fixed precision");
}

#[test]
fn test_stored_precision_is_bounded() {
    let codec = Codec::default();
    let encoded = codec.encode("mississippi", CodecMethod::Arithmetic).unwrap();
    let mut json = serde_json::to_value(&encoded).unwrap();
    json["metadata"]["precision"] = serde_json::json!(u64::MAX);
    let tampered: EncodedOutput = serde_json::from_value(json).unwrap();
    assert!(matches!(
        codec.decode(&tampered),
        Err(CodecError::PrecisionTooLarge { bits: u64::MAX, .. })
    ));
}

#[test]
fn test_config_without_precision_limit_uses_default() {
    let config: CodecConfig = serde_json::from_str(r#"{"precision_bits": 64}"#).unwrap();
    assert_eq!(config.precision_bits, Some(64));
    assert_eq!(
        config.max_precision_bits,
        CodecConfig::default().max_precision_bits
    );
}
