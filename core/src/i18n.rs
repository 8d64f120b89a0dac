use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::error::TableError;
use crate::models::Locale;

/// Locale → (message key → localized string).
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    tables: HashMap<Locale, HashMap<String, String>>,
}

static BUILTIN: Lazy<TranslationTable> = Lazy::new(|| {
    let mut t = TranslationTable::default();
    for (locale, entries) in [(Locale::En, EN), (Locale::Ja, JA), (Locale::ZhTw, ZH_TW), (Locale::ZhCn, ZH_CN)] {
        for (k, v) in entries {
            t.insert(locale, *k, *v);
        }
    }
    t
});

impl TranslationTable {
    pub fn builtin() -> &'static TranslationTable {
        &BUILTIN
    }

    pub fn insert(&mut self, locale: Locale, key: impl Into<String>, value: impl Into<String>) {
        self.tables.entry(locale).or_default().insert(key.into(), value.into());
    }

    /// A miss is `None`, never an error.
    pub fn lookup(&self, locale: Locale, key: &str) -> Option<&str> {
        self.tables.get(&locale).and_then(|m| m.get(key)).map(|s| s.as_str())
    }

    pub fn has_locale(&self, locale: Locale) -> bool {
        self.tables.contains_key(&locale)
    }

    /// Parses `{"en": {"key": "value"}, "ja": {...}}`. Unknown locale codes are skipped.
    pub fn from_json(s: &str) -> Result<Self, TableError> {
        let raw: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_str(s)?;
        let mut t = TranslationTable::default();
        for (code, entries) in raw {
            match Locale::from_code(&code) {
                Ok(locale) => {
                    for (k, v) in entries {
                        t.insert(locale, k, v);
                    }
                }
                Err(e) => log::warn!("skipping translations: {}", e),
            }
        }
        if t.tables.is_empty() {
            return Err(TableError::NoLocales);
        }
        Ok(t)
    }

    /// Keys present for `reference` but absent for `locale`, sorted.
    pub fn missing_keys(&self, reference: Locale, locale: Locale) -> Vec<&str> {
        let Some(base) = self.tables.get(&reference) else { return Vec::new() };
        let other = self.tables.get(&locale);
        let mut out: Vec<&str> = base
            .keys()
            .filter(|k| other.map_or(true, |m| !m.contains_key(k.as_str())))
            .map(|k| k.as_str())
            .collect();
        out.sort_unstable();
        out
    }

    pub fn key_count(&self, locale: Locale) -> usize {
        self.tables.get(&locale).map_or(0, |m| m.len())
    }
}

/// Looks a key up after the simulated lookup latency.
pub async fn fetch_translation(table: &TranslationTable, locale: Locale, key: &str, latency: Duration) -> Option<String> {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
    table.lookup(locale, key).map(|s| s.to_string())
}

/// Replaces the first `{name}` placeholder for each parameter.
pub fn format_message(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in params {
        let needle = format!("{{{}}}", name);
        if let Some(pos) = out.find(&needle) {
            out.replace_range(pos..pos + needle.len(), value);
        }
    }
    out
}

pub fn missing_message(key: &str) -> String {
    format!("Translation for \"{}\" not found.", key)
}

const EN: &[(&str, &str)] = &[
    ("title", "LumiStream Realm - Future Video Platform"),
    ("app_name", "LumiStream Realm"),
    ("search_placeholder", "Search videos..."),
    ("upload_button_text", "Upload Video"),
    ("sidebar_home_text", "Home"),
    ("sidebar_explore_text", "Explore"),
    ("sidebar_subscriptions_text", "Subscriptions"),
    ("sidebar_library_text", "Library"),
    ("sidebar_history_text", "History"),
    ("sidebar_your_videos_text", "Your Videos"),
    ("sidebar_watch_later_text", "Watch Later"),
    ("sidebar_liked_videos_text", "Liked Videos"),
    ("sidebar_more", "More"),
    ("sidebar_settings_text", "Settings"),
    ("sidebar_help_text", "Help"),
    ("sidebar_feedback_text", "Feedback"),
    ("categories_title", "Categories"),
    ("category_all_text", "All"),
    ("category_tech_text", "Tech"),
    ("category_space_text", "Space"),
    ("category_ai_text", "AI"),
    ("category_life_science_text", "Life Science"),
    ("category_history_text", "History"),
    ("category_music_text", "Music"),
    ("recommended_title", "Recommended for You"),
    ("trending_title", "Trending Videos"),
    ("music_title", "Music"),
    ("live_badge", "LIVE"),
    ("views_suffix", " views"),
    ("footer_text", "© 2025 LumiStream Realm. All rights reserved."),
    ("account_menu_channel_text", "My Channel"),
    ("account_menu_settings_text", "Settings"),
    ("account_menu_language_text", "Language"),
    ("account_menu_help_text", "Help"),
    ("account_menu_feedback_text", "Feedback"),
    ("account_menu_signout_text", "Sign Out"),
    ("loading_text", "Loading..."),
    ("video_not_found", "Video not found"),
    ("related_videos_title", "Related Videos"),
    ("subscribe_button_text", "Subscribe"),
    ("share_button_text", "Share"),
    ("save_button_text", "Save"),
    ("channel_subscribers", "{count} subscribers"),
    ("message_liked", "You liked this video!"),
    ("message_disliked", "You disliked this video!"),
    ("message_shared", "Video shared!"),
    ("message_saved", "Video saved!"),
    ("message_subscribed", "Subscribed to channel!"),
    ("message_comment_added", "Comment added!"),
    ("message_filtered_by", "Filtered by: {filtered_category}"),
    ("message_language_set", "Language set to: {selected_language}"),
    ("message_clicked", "Clicked: {clicked_item}"),
];

const JA: &[(&str, &str)] = &[
    ("title", "LumiStream Realm - 未来の動画プラットフォーム"),
    ("app_name", "LumiStream Realm"),
    ("search_placeholder", "動画を検索..."),
    ("upload_button_text", "動画をアップロード"),
    ("sidebar_home_text", "ホーム"),
    ("sidebar_explore_text", "探索"),
    ("sidebar_subscriptions_text", "登録チャンネル"),
    ("sidebar_library_text", "ライブラリ"),
    ("sidebar_history_text", "履歴"),
    ("sidebar_your_videos_text", "あなたの動画"),
    ("sidebar_watch_later_text", "後で見る"),
    ("sidebar_liked_videos_text", "高く評価した動画"),
    ("sidebar_more", "その他"),
    ("sidebar_settings_text", "設定"),
    ("sidebar_help_text", "ヘルプ"),
    ("sidebar_feedback_text", "フィードバック"),
    ("categories_title", "カテゴリ"),
    ("category_all_text", "すべて"),
    ("category_tech_text", "テクノロジー"),
    ("category_space_text", "宇宙探査"),
    ("category_ai_text", "AI"),
    ("category_life_science_text", "生命科学"),
    ("category_history_text", "歴史"),
    ("category_music_text", "音楽"),
    ("recommended_title", "あなたへのおすすめ"),
    ("trending_title", "トレンド動画"),
    ("music_title", "音楽"),
    ("live_badge", "ライブ中"),
    ("views_suffix", " 回視聴"),
    ("footer_text", "© 2025 LumiStream Realm. 無断複写・転載を禁じます。"),
    ("account_menu_channel_text", "マイチャンネル"),
    ("account_menu_settings_text", "設定"),
    ("account_menu_language_text", "言語"),
    ("account_menu_help_text", "ヘルプ"),
    ("account_menu_feedback_text", "フィードバック"),
    ("account_menu_signout_text", "ログアウト"),
    ("loading_text", "読み込み中..."),
    ("video_not_found", "動画が見つかりません"),
    ("related_videos_title", "関連動画"),
    ("subscribe_button_text", "チャンネル登録"),
    ("share_button_text", "共有"),
    ("save_button_text", "保存"),
    ("channel_subscribers", "チャンネル登録者数 {count}人"),
    ("message_liked", "この動画を高く評価しました！"),
    ("message_disliked", "この動画を低く評価しました！"),
    ("message_shared", "動画を共有しました！"),
    ("message_saved", "動画を保存しました！"),
    ("message_subscribed", "チャンネルを登録しました！"),
    ("message_comment_added", "コメントを追加しました！"),
    ("message_filtered_by", "フィルタリング済み: {filtered_category}"),
    ("message_language_set", "言語設定: {selected_language}"),
    ("message_clicked", "クリック: {clicked_item}"),
];

const ZH_TW: &[(&str, &str)] = &[
    ("title", "LumiStream Realm - 未來影音平台"),
    ("app_name", "LumiStream Realm"),
    ("search_placeholder", "搜尋影片..."),
    ("upload_button_text", "上傳影片"),
    ("sidebar_home_text", "首頁"),
    ("sidebar_explore_text", "探索"),
    ("sidebar_subscriptions_text", "訂閱"),
    ("sidebar_library_text", "媒體庫"),
    ("sidebar_history_text", "觀看紀錄"),
    ("sidebar_your_videos_text", "我的影片"),
    ("sidebar_watch_later_text", "稍後觀看"),
    ("sidebar_liked_videos_text", "喜歡的影片"),
    ("sidebar_more", "更多"),
    ("sidebar_settings_text", "設定"),
    ("sidebar_help_text", "協助"),
    ("sidebar_feedback_text", "意見回饋"),
    ("categories_title", "分類"),
    ("category_all_text", "全部"),
    ("category_tech_text", "科技"),
    ("category_space_text", "探索宇宙"),
    ("category_ai_text", "人工智慧"),
    ("category_life_science_text", "生命科學"),
    ("category_history_text", "歷史"),
    ("category_music_text", "音樂"),
    ("recommended_title", "為您推薦"),
    ("trending_title", "熱門影片"),
    ("music_title", "音樂"),
    ("live_badge", "直播中"),
    ("views_suffix", " 次觀看"),
    ("footer_text", "© 2025 LumiStream Realm. 版權所有。"),
    ("account_menu_channel_text", "我的頻道"),
    ("account_menu_settings_text", "設定"),
    ("account_menu_language_text", "語言"),
    ("account_menu_help_text", "協助"),
    ("account_menu_feedback_text", "意見回饋"),
    ("account_menu_signout_text", "登出"),
    ("loading_text", "載入中..."),
    ("video_not_found", "找不到影片"),
    ("related_videos_title", "相關影片"),
    ("subscribe_button_text", "訂閱"),
    ("share_button_text", "分享"),
    ("save_button_text", "儲存"),
    ("channel_subscribers", "{count} 位訂閱者"),
    ("message_liked", "已喜歡此影片！"),
    ("message_disliked", "已不喜歡此影片！"),
    ("message_shared", "影片已分享！"),
    ("message_saved", "影片已儲存！"),
    ("message_subscribed", "已訂閱頻道！"),
    ("message_comment_added", "留言已新增！"),
    ("message_filtered_by", "已篩選：{filtered_category}"),
    ("message_language_set", "語言已設定為：{selected_language}"),
    ("message_clicked", "點擊了：{clicked_item}"),
];

const ZH_CN: &[(&str, &str)] = &[
    ("title", "LumiStream Realm - 未来视频平台"),
    ("app_name", "LumiStream Realm"),
    ("search_placeholder", "搜索视频..."),
    ("upload_button_text", "上传视频"),
    ("sidebar_home_text", "首页"),
    ("sidebar_explore_text", "探索"),
    ("sidebar_subscriptions_text", "订阅"),
    ("sidebar_library_text", "媒体库"),
    ("sidebar_history_text", "观看历史"),
    ("sidebar_your_videos_text", "我的视频"),
    ("sidebar_watch_later_text", "稍后观看"),
    ("sidebar_liked_videos_text", "喜欢的视频"),
    ("sidebar_more", "更多"),
    ("sidebar_settings_text", "设置"),
    ("sidebar_help_text", "帮助"),
    ("sidebar_feedback_text", "反馈"),
    ("categories_title", "分类"),
    ("category_all_text", "全部"),
    ("category_tech_text", "科技"),
    ("category_space_text", "探索宇宙"),
    ("category_ai_text", "人工智能"),
    ("category_life_science_text", "生命科学"),
    ("category_history_text", "历史"),
    ("category_music_text", "音乐"),
    ("recommended_title", "为您推荐"),
    ("trending_title", "热门视频"),
    ("music_title", "音乐"),
    ("live_badge", "直播中"),
    ("views_suffix", " 次观看"),
    ("footer_text", "© 2025 LumiStream Realm. 版权所有。"),
    ("account_menu_channel_text", "我的频道"),
    ("account_menu_settings_text", "设置"),
    ("account_menu_language_text", "语言"),
    ("account_menu_help_text", "帮助"),
    ("account_menu_feedback_text", "反馈"),
    ("account_menu_signout_text", "退出登录"),
    ("loading_text", "加载中..."),
    ("video_not_found", "未找到视频"),
    ("related_videos_title", "相关视频"),
    ("subscribe_button_text", "订阅"),
    ("share_button_text", "分享"),
    ("save_button_text", "保存"),
    ("channel_subscribers", "{count} 位订阅者"),
    ("message_liked", "已喜欢此视频！"),
    ("message_disliked", "已不喜欢此视频！"),
    ("message_shared", "视频已分享！"),
    ("message_saved", "视频已保存！"),
    ("message_subscribed", "已订阅频道！"),
    ("message_comment_added", "评论已添加！"),
    ("message_filtered_by", "已筛选：{filtered_category}"),
    ("message_language_set", "语言已设置为：{selected_language}"),
    ("message_clicked", "点击了：{clicked_item}"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_are_complete() {
        let t = TranslationTable::builtin();
        for &l in Locale::all() {
            assert!(t.has_locale(l));
            assert!(t.missing_keys(Locale::En, l).is_empty(), "{} is missing keys", l);
        }
        assert_eq!(t.lookup(Locale::Ja, "sidebar_home_text"), Some("ホーム"));
        assert_eq!(t.lookup(Locale::En, "no_such_key"), None);
    }

    #[test]
    fn formats_first_placeholder_only() {
        assert_eq!(format_message("Filtered by: {c}", &[("c", "Tech")]), "Filtered by: Tech");
        assert_eq!(format_message("{a} {a}", &[("a", "x")]), "x {a}");
        assert_eq!(format_message("no params", &[("a", "x")]), "no params");
    }

    #[test]
    fn json_table_skips_unknown_locales() {
        let t = TranslationTable::from_json(r#"{"en":{"a":"A"},"fr":{"a":"Ah"}}"#).unwrap();
        assert_eq!(t.lookup(Locale::En, "a"), Some("A"));
        assert!(!t.has_locale(Locale::Ja));
        assert_eq!(t.missing_keys(Locale::En, Locale::Ja), vec!["a"]);
        assert!(matches!(TranslationTable::from_json(r#"{"fr":{}}"#), Err(TableError::NoLocales)));
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_waits_for_latency() {
        let start = tokio::time::Instant::now();
        let v = fetch_translation(TranslationTable::builtin(), Locale::ZhCn, "app_name", Duration::from_millis(100)).await;
        assert_eq!(v.as_deref(), Some("LumiStream Realm"));
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
