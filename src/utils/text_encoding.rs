// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static CONTENT_TYPE_CHARSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^;"'\s]+)"#).expect("valid charset regex"));

/// 从 Content-Type 头中解析字符集
pub fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    CONTENT_TYPE_CHARSET
        .captures(content_type)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
}

/// 将响应字节解码为UTF-8文本
///
/// 优先使用 BOM，其次是 Content-Type 声明的字符集，再次是合法的 UTF-8，
/// 最后由 chardetng 猜测。
/// 解码不会失败：无法映射的字节被替换为 U+FFFD。截断的多字节字符同样如此。
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        let (text, _, _) = encoding.decode(bytes);
        return text.into_owned();
    }

    let encoding = content_type
        .and_then(charset_from_content_type)
        .unwrap_or_else(|| {
            match std::str::from_utf8(bytes) {
                Ok(_) => return UTF_8,
                // Only the tail is incomplete, the byte cap cut a character
                Err(e) if e.error_len().is_none() => return UTF_8,
                Err(_) => {}
            }
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    debug!("Decoding {} bytes as {}", bytes.len(), encoding.name());
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

/// 在字符边界处截断字符串，不超过 `max_bytes` 字节
pub fn truncate_at_char_boundary(text: &mut String, max_bytes: usize) -> bool {
    if text.len() <= max_bytes {
        return false;
    }
    let mut cut = max_bytes;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
    true
}
