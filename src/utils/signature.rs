//! Webhook 签名（HMAC-SHA256）

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";
const SIGNATURE_PREFIX: &str = "sha256=";

/// 计算 `sha256=<hex>` 形式的签名
pub fn sign_body(secret: &str, body: &[u8]) -> String {
    // HMAC 接受任意长度的密钥
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(body);
    format!("{SIGNATURE_PREFIX}{}", hex::encode(mac.finalize().into_bytes()))
}

/// 常数时间校验签名头
pub fn verify_signature(secret: &str, body: &[u8], header: Option<&str>) -> bool {
    if secret.is_empty() {
        return false;
    }
    let Some(hex_sig) = header.and_then(|h| h.trim().strip_prefix(SIGNATURE_PREFIX)) else {
        return false;
    };
    let Ok(expected) = hex::decode(hex_sig) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"event_id":"evt-1","students":[]}"#;

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2
        let sig = sign_body("Jefe", b"what do ya want for nothing?");
        assert_eq!(
            sig,
            "sha256=5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_verify_accepts_own_signature() {
        let sig = sign_body("s3cret", BODY);
        assert!(verify_signature("s3cret", BODY, Some(&sig)));
    }

    #[test]
    fn test_verify_rejects_tampering() {
        let sig = sign_body("s3cret", BODY);
        assert!(!verify_signature("other", BODY, Some(&sig)));
        assert!(!verify_signature("s3cret", b"{}", Some(&sig)));
        assert!(!verify_signature("s3cret", BODY, Some(sig.trim_start_matches("sha256="))));
        assert!(!verify_signature("s3cret", BODY, Some("sha256=zz")));
        assert!(!verify_signature("s3cret", BODY, None));
        // 未配置密钥时一律拒绝
        assert!(!verify_signature("", BODY, Some(&sign_body("", BODY))));
    }
}
