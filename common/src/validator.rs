//! バーコード検証モジュール
//!
//! EAN-13 / EAN-8 / UPC-A / UPC-E のチェックディジット検証と符号体系の判定。
//!
//! すべて純粋関数で、不正な入力はエラーではなく `false` / `Symbology::Unknown`
//! として扱う（読取ミスは通常起こり得るため）。

use crate::gs1;
use crate::types::Symbology;
use serde::{Deserialize, Serialize};

/// ちょうど `N` 桁の数字列であれば各桁の値を返す
fn parse_digits<const N: usize>(text: &str) -> Option<[u8; N]> {
    let bytes = text.as_bytes();
    if bytes.len() != N {
        return None;
    }

    let mut digits = [0u8; N];
    for (slot, &b) in digits.iter_mut().zip(bytes) {
        if !b.is_ascii_digit() {
            return None;
        }
        *slot = b - b'0';
    }
    Some(digits)
}

/// 重み付き合計からチェックディジットを算出
///
/// 偶数位置（0始まり）に `even_weight`、奇数位置に `odd_weight` を掛ける。
fn check_digit(body: &[u8], even_weight: u32, odd_weight: u32) -> u8 {
    let sum: u32 = body
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            let weight = if i % 2 == 0 { even_weight } else { odd_weight };
            u32::from(d) * weight
        })
        .sum();

    ((10 - sum % 10) % 10) as u8
}

/// EAN-13 の検証（重み 1/3）
pub fn is_valid_ean13(text: &str) -> bool {
    parse_digits::<13>(text).is_some_and(|d| check_digit(&d[..12], 1, 3) == d[12])
}

/// EAN-8 の検証（重み 3/1、EAN-13と逆）
pub fn is_valid_ean8(text: &str) -> bool {
    parse_digits::<8>(text).is_some_and(|d| check_digit(&d[..7], 3, 1) == d[7])
}

/// UPC-A の検証（重み 3/1）
pub fn is_valid_upca(text: &str) -> bool {
    parse_digits::<12>(text).is_some_and(|d| check_digit(&d[..11], 3, 1) == d[11])
}

/// UPC-E の検証（UPC-Aへ展開してから検証）
pub fn is_valid_upce(text: &str) -> bool {
    expand_upce(text).is_some_and(|upca| is_valid_upca(&upca))
}

/// UPC-E（8桁）を UPC-A（12桁）へ展開
///
/// 中間6桁の末尾がパターンを決める:
/// - 0/1/2: `中間[0..2] + 中間[5] + "0000" + 中間[2..5]`
/// - 3: `中間[0..3] + "00000" + 中間[3..5]`
/// - 4: `中間[0..4] + "00000" + 中間[4]`
/// - 5〜9: `中間[0..5] + "0000" + 中間[5]`
///
/// 先頭のナンバーシステム桁と末尾のチェックディジットはそのまま残す。
/// 8桁の数字列でなければ `None`。
///
/// # Examples
/// ```
/// use barcode_scan_common::validator::expand_upce;
///
/// assert_eq!(expand_upce("01234565").as_deref(), Some("012345000065"));
/// ```
pub fn expand_upce(text: &str) -> Option<String> {
    parse_digits::<8>(text)?;

    let first = &text[0..1];
    let middle = &text[1..7];
    let last = &text[7..8];

    let body = match middle.as_bytes()[5] {
        b'0' | b'1' | b'2' => format!("{}{}0000{}", &middle[0..2], &middle[5..6], &middle[2..5]),
        b'3' => format!("{}00000{}", &middle[0..3], &middle[3..5]),
        b'4' => format!("{}00000{}", &middle[0..4], &middle[4..5]),
        _ => format!("{}0000{}", &middle[0..5], &middle[5..6]),
    };

    Some(format!("{}{}{}", first, body, last))
}

/// 桁数だけで規則を選んで検証
///
/// 8桁は EAN-8 と UPC-E のどちらかが通れば有効とする（両方通る場合もある）。
pub fn validate_barcode(text: &str) -> bool {
    match text.len() {
        13 => is_valid_ean13(text),
        8 => is_valid_ean8(text) || is_valid_upce(text),
        12 => is_valid_upca(text),
        _ => false,
    }
}

/// 符号体系を判定
///
/// 無効な13桁・12桁は推測せず `Unknown` を返す。
/// 8桁で EAN-8 と UPC-E の両方が有効な場合は EAN-8 を優先する。
pub fn identify_barcode_type(text: &str) -> Symbology {
    match text.len() {
        13 if is_valid_ean13(text) => {
            if text.starts_with("978") || text.starts_with("979") {
                Symbology::Isbn13
            } else if text.starts_with("977") {
                Symbology::Issn
            } else {
                Symbology::Ean13
            }
        }
        8 if is_valid_ean8(text) => Symbology::Ean8,
        8 if is_valid_upce(text) => Symbology::UpcE,
        12 if is_valid_upca(text) => Symbology::UpcA,
        _ => Symbology::Unknown,
    }
}

/// 分類結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub symbology: Symbology,
    pub is_valid: bool,
    pub origin_info: Option<String>,
}

/// 検証・判定・原産国参照をまとめて行う
pub fn classify(text: &str) -> Classification {
    let symbology = identify_barcode_type(text);
    let origin_info = symbology
        .is_ean13_family()
        .then(|| gs1::ean_country(text).to_string());

    Classification {
        symbology,
        is_valid: validate_barcode(text),
        origin_info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 検証用に正しいチェックディジットを付けたEAN-13を作る
    fn with_ean13_check(body: &str) -> String {
        let digits: Vec<u8> = body.bytes().map(|b| b - b'0').collect();
        format!("{}{}", body, check_digit(&digits, 1, 3))
    }

    #[test]
    fn test_ean13_valid() {
        assert!(is_valid_ean13("4006381333931"));
        assert!(is_valid_ean13("9780306406157"));
        assert!(is_valid_ean13("7891000315507"));
    }

    #[test]
    fn test_ean13_wrong_check_digit() {
        assert!(!is_valid_ean13("4006381333932"));
        assert!(!is_valid_ean13("9780306406150"));
    }

    #[test]
    fn test_ean13_malformed() {
        assert!(!is_valid_ean13(""));
        assert!(!is_valid_ean13("400638133393"));
        assert!(!is_valid_ean13("40063813339311"));
        assert!(!is_valid_ean13("40063813a3931"));
        assert!(!is_valid_ean13("+006381333931"));
    }

    #[test]
    fn test_ean13_every_check_digit_matches_formula() {
        // 12桁本体ごとに、正しいチェックディジットだけが通ることを確認
        for body in ["000000000000", "123456789012", "590123412345", "999999999999"] {
            let valid = with_ean13_check(body);
            for d in 0..10u8 {
                let candidate = format!("{}{}", body, d);
                assert_eq!(is_valid_ean13(&candidate), candidate == valid, "{}", candidate);
            }
        }
    }

    #[test]
    fn test_ean8() {
        assert!(is_valid_ean8("96385074"));
        assert!(is_valid_ean8("40170725"));
        assert!(!is_valid_ean8("96385075"));
        assert!(!is_valid_ean8("9638507"));
        assert!(!is_valid_ean8("9638507x"));
    }

    #[test]
    fn test_upca() {
        assert!(is_valid_upca("012345678905"));
        assert!(is_valid_upca("036000291452"));
        assert!(!is_valid_upca("012345678906"));
        assert!(!is_valid_upca("01234567890"));
    }

    #[test]
    fn test_expand_upce_patterns() {
        // 末尾 0/1/2
        assert_eq!(expand_upce("01234505").as_deref(), Some("012000003455"));
        assert_eq!(expand_upce("01234529").as_deref(), Some("012200003459"));
        // 末尾 3
        assert_eq!(expand_upce("01234537").as_deref(), Some("012300000457"));
        // 末尾 4
        assert_eq!(expand_upce("01234548").as_deref(), Some("012340000058"));
        // 末尾 5〜9
        assert_eq!(expand_upce("01234565").as_deref(), Some("012345000065"));
        assert_eq!(expand_upce("01234592").as_deref(), Some("012345000092"));
    }

    #[test]
    fn test_expand_upce_always_twelve_digits() {
        for last in 0..10 {
            let upce = format!("1654321{}", last);
            let upca = expand_upce(&upce).unwrap();
            assert_eq!(upca.len(), 12);
            assert!(upca.starts_with('1'));
            assert!(upca.ends_with(&last.to_string()));
        }
    }

    #[test]
    fn test_expand_upce_rejects_non_digits() {
        assert!(expand_upce("0123456").is_none());
        assert!(expand_upce("0123456A").is_none());
        assert!(expand_upce("").is_none());
    }

    #[test]
    fn test_upce_matches_expanded_upca() {
        for code in ["01234565", "01234505", "01234537", "01234548", "04252614", "12345670"] {
            let upca = expand_upce(code).unwrap();
            assert_eq!(is_valid_upce(code), is_valid_upca(&upca), "{}", code);
        }
        assert!(is_valid_upce("01234565"));
        assert!(is_valid_upce("01234505"));
    }

    #[test]
    fn test_upce_matches_expanded_upca_all_patterns() {
        // 中間末尾 0〜9 で全パターンを通る。各組み合わせでチェックディジットは1つだけ有効
        for system in 0..10 {
            for pattern in 0..10 {
                let mut valid_checks = 0;
                for check in 0..10 {
                    let code = format!("{}73916{}{}", system, pattern, check);
                    let upca = expand_upce(&code).unwrap();

                    assert_eq!(upca.len(), 12, "{}", code);
                    assert!(upca.starts_with(&system.to_string()), "{}", code);
                    assert!(upca.ends_with(&check.to_string()), "{}", code);
                    assert_eq!(is_valid_upce(&code), is_valid_upca(&upca), "{} -> {}", code, upca);

                    if is_valid_upce(&code) {
                        valid_checks += 1;
                    }
                }
                assert_eq!(valid_checks, 1, "{}73916{}?", system, pattern);
            }
        }
    }

    #[test]
    fn test_validate_barcode_dispatch() {
        assert!(validate_barcode("4006381333931"));
        assert!(validate_barcode("96385074"));
        assert!(validate_barcode("01234505")); // UPC-Eのみ有効
        assert!(validate_barcode("012345678905"));
        assert!(!validate_barcode("4006381333932"));
    }

    #[test]
    fn test_validate_barcode_other_lengths() {
        for code in ["", "1", "0123456", "0123456789", "01234567890", "40063813339310", "978030640615700"] {
            assert!(!validate_barcode(code), "{}", code);
        }
    }

    #[test]
    fn test_identify_ean13_family() {
        assert_eq!(identify_barcode_type("4006381333931"), Symbology::Ean13);
        assert_eq!(identify_barcode_type("9780306406157"), Symbology::Isbn13);
        assert_eq!(identify_barcode_type(&with_ean13_check("979100000000")), Symbology::Isbn13);
        assert_eq!(identify_barcode_type("9771234567003"), Symbology::Issn);
    }

    #[test]
    fn test_identify_invalid_is_unknown() {
        assert_eq!(identify_barcode_type("4006381333932"), Symbology::Unknown);
        assert_eq!(identify_barcode_type("9780306406150"), Symbology::Unknown);
        assert_eq!(identify_barcode_type("012345678906"), Symbology::Unknown);
        assert_eq!(identify_barcode_type("abc"), Symbology::Unknown);
    }

    #[test]
    fn test_identify_eight_digits() {
        // EAN-8とUPC-Eの両方で有効 → EAN-8を優先
        assert!(is_valid_ean8("01234565"));
        assert!(is_valid_upce("01234565"));
        assert_eq!(identify_barcode_type("01234565"), Symbology::Ean8);

        // UPC-Eのみ有効
        assert!(!is_valid_ean8("01234505"));
        assert_eq!(identify_barcode_type("01234505"), Symbology::UpcE);

        assert_eq!(identify_barcode_type("01234500"), Symbology::Unknown);
    }

    #[test]
    fn test_identify_upca() {
        assert_eq!(identify_barcode_type("012345678905"), Symbology::UpcA);
    }

    #[test]
    fn test_classify_german_ean13() {
        let c = classify("4006381333931");
        assert!(c.is_valid);
        assert_eq!(c.symbology, Symbology::Ean13);
        assert_eq!(c.origin_info.as_deref(), Some("Alemanha"));
    }

    #[test]
    fn test_classify_origin_only_for_ean13_family() {
        assert_eq!(classify("9780306406157").origin_info.as_deref(), Some("Livros (ISBN)"));
        assert!(classify("012345678905").origin_info.is_none());
        assert!(classify("96385074").origin_info.is_none());
        // 無効な13桁はUnknownなので原産国なし
        let invalid = classify("4006381333932");
        assert!(!invalid.is_valid);
        assert!(invalid.origin_info.is_none());
    }
}
