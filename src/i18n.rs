// ==========================================
// 库存资产管理系统 - 国际化 (i18n)
// ==========================================
// 语言包: locales/zh-CN.yml（回退）、locales/en.yml
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 回退语言
pub const FALLBACK_LOCALE: &str = "zh-CN";

/// 已提供语言包的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["zh-CN", "en"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 将配置中的语言代码归一到已支持的语言
///
/// "en-US"/"en_GB" → "en"，"zh"/"zh_CN" → "zh-CN"；其他返回 None
pub fn normalize_locale(locale: &str) -> Option<&'static str> {
    let lowered = locale.trim().replace('_', "-").to_ascii_lowercase();
    let primary = lowered.split('-').next().unwrap_or_default();
    match primary {
        "zh" => Some("zh-CN"),
        "en" => Some("en"),
        _ => None,
    }
}

/// 设置语言
///
/// 未知语言退回 zh-CN
///
/// # 返回
/// 实际生效的语言代码
pub fn set_locale(locale: &str) -> &'static str {
    let applied = match normalize_locale(locale) {
        Some(supported) => supported,
        None => {
            tracing::warn!("不支持的语言 {}，使用 {}", locale, FALLBACK_LOCALE);
            FALLBACK_LOCALE
        }
    };
    rust_i18n::set_locale(applied);
    applied
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use inventory_hub::i18n::t;
/// let msg = t("export.empty_selection");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数,占位符形如 %{name}）
///
/// # 示例
/// ```no_run
/// use inventory_hub::i18n::t_with_args;
/// let msg = t_with_args("validation.required", &[("field", "brand")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter()
        .fold(rust_i18n::t!(key).to_string(), |message, (k, v)| {
            message.replace(&format!("%{{{}}}", k), v)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // locale 为进程级全局状态,相关测试串行执行
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("en-US"), Some("en"));
        assert_eq!(normalize_locale(" en_GB "), Some("en"));
        assert_eq!(normalize_locale("zh"), Some("zh-CN"));
        assert_eq!(normalize_locale("zh_CN"), Some("zh-CN"));
        assert_eq!(normalize_locale("fr"), None);
        assert_eq!(normalize_locale(""), None);
    }

    #[test]
    fn test_set_locale_falls_back_for_unknown() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();

        assert_eq!(set_locale("en-US"), "en");
        assert_eq!(current_locale(), "en");

        assert_eq!(set_locale("de"), FALLBACK_LOCALE);
        assert_eq!(current_locale(), FALLBACK_LOCALE);
    }

    #[test]
    fn test_validation_message_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();

        set_locale("en");
        let msg = t_with_args("validation.not_a_number", &[("field", "value"), ("value", "abc")]);
        assert_eq!(msg, "value must be a number (got: abc)");

        set_locale("zh-CN");
        let msg = t_with_args("validation.not_a_number", &[("field", "value"), ("value", "abc")]);
        assert!(msg.contains("value"));
        assert!(msg.contains("abc"));
        assert!(!msg.contains("%{"));
    }

    #[test]
    fn test_every_supported_locale_has_catalogue() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();

        for locale in SUPPORTED_LOCALES {
            set_locale(locale);
            let msg = t_with_args("import.file_not_found", &[("path", "/tmp/items.csv")]);
            assert!(msg.contains("/tmp/items.csv"), "{}: {}", locale, msg);
            assert_ne!(t("export.empty_selection"), "export.empty_selection");
        }

        set_locale(FALLBACK_LOCALE);
    }
}
