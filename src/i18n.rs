use lumistream_core::Locale;

/// Labels printed by the command line front end. Unknown pairs fall back to English, then the key.
pub fn t(key: &str, lang: Locale) -> String {
    match (key, lang) {
        ("written_to", Locale::Ja) => "出力先",
        ("written_to", Locale::ZhTw) => "輸出至",
        ("written_to", Locale::ZhCn) => "输出至",
        ("written_to", _) => "Written to",

        ("diagnostics", Locale::Ja) => "診断",
        ("diagnostics", Locale::ZhTw) => "診斷",
        ("diagnostics", Locale::ZhCn) => "诊断",
        ("diagnostics", _) => "Diagnostics",

        ("toast", Locale::Ja) => "通知",
        ("toast", Locale::ZhTw | Locale::ZhCn) => "通知",
        ("toast", _) => "Toast",

        ("missing_keys", Locale::Ja) => "未翻訳のキー",
        ("missing_keys", Locale::ZhTw) => "缺少的鍵",
        ("missing_keys", Locale::ZhCn) => "缺少的键",
        ("missing_keys", _) => "missing keys",

        ("complete", Locale::Ja) => "完全",
        ("complete", Locale::ZhTw) => "完整",
        ("complete", Locale::ZhCn) => "完整",
        ("complete", _) => "complete",

        ("videos", Locale::Ja) => "本の動画",
        ("videos", Locale::ZhTw) => "部影片",
        ("videos", Locale::ZhCn) => "部视频",
        ("videos", _) => "videos",

        _ => key,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_key() {
        assert_eq!(t("written_to", Locale::En), "Written to");
        assert_eq!(t("written_to", Locale::Ja), "出力先");
        assert_eq!(t("nope", Locale::ZhCn), "nope");
    }
}
