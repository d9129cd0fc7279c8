pub mod url_validator;

/// 短码字符集：数字 + 大小写字母
pub const SHORTCODE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// 生成指定长度的随机短码
///
/// 每个字符独立均匀地取自 [`SHORTCODE_ALPHABET`]，不含任何顺序信息，
/// 多个线程可以并发调用而无需加锁。
pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| {
        SHORTCODE_ALPHABET[rand::random_range(0..SHORTCODE_ALPHABET.len())] as char
    })
    .take(length)
    .collect()
}

/// 检查短码是否只由字符集内的字符组成（长度 1..=32）
///
/// 重定向路径上用于在访问存储前拒绝明显非法的请求。
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= 32
        && code.bytes().all(|b| SHORTCODE_ALPHABET.contains(&b))
}

/// 拼接完整短链接，容忍 base_url 末尾的 `/`
pub fn full_short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}
