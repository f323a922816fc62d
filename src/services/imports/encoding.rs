//! 上传文件的编码识别
//!
//! 有 BOM 时按 BOM 选择 UTF-8 / UTF-16LE / UTF-16BE 并去掉 BOM；
//! 没有 BOM 时合法 UTF-8 按 UTF-8 处理，否则按 Shift_JIS 解码。

use encoding_rs::{Encoding, SHIFT_JIS, UTF_8};

use crate::errors::{Result, TutorHubError};

/// 解码后的文本及识别出的编码名称
#[derive(Debug)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static str,
}

pub fn decode_upload(bytes: &[u8]) -> Result<DecodedText> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_strict(encoding, &bytes[bom_len..]);
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(DecodedText {
            text: text.to_string(),
            encoding: UTF_8.name(),
        });
    }

    decode_strict(SHIFT_JIS, bytes)
}

// 出现非法字节序列时直接失败，不做替换
fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Result<DecodedText> {
    match encoding.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => Ok(DecodedText {
            text: text.into_owned(),
            encoding: encoding.name(),
        }),
        None => Err(TutorHubError::encoding(format!(
            "File contains malformed {} byte sequences",
            encoding.name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("name,校舎\n".as_bytes());
        let decoded = decode_upload(&bytes).unwrap();
        assert_eq!(decoded.encoding, "UTF-8");
        assert_eq!(decoded.text, "name,校舎\n");
    }

    #[test]
    fn test_plain_utf8() {
        let decoded = decode_upload("名前\n田中".as_bytes()).unwrap();
        assert_eq!(decoded.encoding, "UTF-8");
        assert_eq!(decoded.text, "名前\n田中");
    }

    #[test]
    fn test_utf16_boms() {
        let text = "名前,a";

        let mut le = vec![0xFF, 0xFE];
        le.extend(text.encode_utf16().flat_map(|u| u.to_le_bytes()));
        let decoded = decode_upload(&le).unwrap();
        assert_eq!(decoded.encoding, "UTF-16LE");
        assert_eq!(decoded.text, text);

        let mut be = vec![0xFE, 0xFF];
        be.extend(text.encode_utf16().flat_map(|u| u.to_be_bytes()));
        let decoded = decode_upload(&be).unwrap();
        assert_eq!(decoded.encoding, "UTF-16BE");
        assert_eq!(decoded.text, text);
    }

    #[test]
    fn test_shift_jis_fallback() {
        let (bytes, _, had_errors) = SHIFT_JIS.encode("名前,校舎\n田中,渋谷");
        assert!(!had_errors);
        assert!(std::str::from_utf8(&bytes).is_err());

        let decoded = decode_upload(&bytes).unwrap();
        assert_eq!(decoded.encoding, "Shift_JIS");
        assert_eq!(decoded.text, "名前,校舎\n田中,渋谷");
    }

    #[test]
    fn test_malformed_input_fails() {
        // Shift_JIS 的前导字节后缺少尾字节
        let err = decode_upload(&[b'a', b',', 0x82]).unwrap_err();
        assert!(matches!(err, TutorHubError::Encoding(_)));

        let err = decode_upload(&[0xEF, 0xBB, 0xBF, 0xFF, 0xFE, b'a']).unwrap_err();
        assert!(matches!(err, TutorHubError::Encoding(_)));
    }
}
