use rand::Rng;

// 去掉 0/O、1/I/L 这类容易看错的字符，方便学生抄写
const CODE_CHARSET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHJKMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789";

/// 生成指定长度的邀请码
pub fn generate_random_code(len: usize) -> String {
    sample(CODE_CHARSET, len)
}

/// 生成初始密码，保证大小写字母和数字都出现
pub fn generate_random_password(len: usize) -> String {
    loop {
        let candidate = sample(PASSWORD_CHARSET, len.max(8));
        if candidate.chars().any(|c| c.is_ascii_uppercase())
            && candidate.chars().any(|c| c.is_ascii_lowercase())
            && candidate.chars().any(|c| c.is_ascii_digit())
        {
            return candidate;
        }
    }
}

fn sample(charset: &[u8], len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| charset[rng.random_range(0..charset.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_length_and_charset() {
        let code = generate_random_code(8);
        assert_eq!(code.len(), 8);
        assert!(code.bytes().all(|b| CODE_CHARSET.contains(&b)));
    }

    #[test]
    fn test_password_mixes_classes() {
        for _ in 0..20 {
            let password = generate_random_password(12);
            assert_eq!(password.len(), 12);
            assert!(crate::utils::validate::validate_password(&password).is_valid);
        }
    }
}
