//! Canned query phrases for semantic category search

/// Category name → phrases, each pairing English and Japanese synonyms
const CATEGORY_QUERIES: &[(&str, [&str; 3])] = &[
    (
        "navigation",
        [
            "navigation menu sidebar ナビゲーション メニュー サイドバー",
            "page transition user flow 画面遷移 導線 UI",
            "menu bar header footer メニューバー ヘッダー フッター",
        ],
    ),
    (
        "form",
        [
            "form input validation フォーム 入力 バリデーション",
            "text box submit button テキストボックス ボタン 送信",
            "user input data entry ユーザー入力 データ入力",
        ],
    ),
    (
        "data_display",
        [
            "data display table grid データ表示 テーブル グリッド",
            "list card overview リスト カード 一覧表示",
            "information display content 情報表示 コンテンツ",
        ],
    ),
    (
        "feedback",
        [
            "feedback notification alert フィードバック 通知 アラート",
            "error message success toast エラーメッセージ 成功通知",
            "user notification status indicator ユーザー通知 状態表示",
        ],
    ),
];

/// Names with a canned expansion
pub fn known_categories() -> impl Iterator<Item = &'static str> {
    CATEGORY_QUERIES.iter().map(|(name, _)| *name)
}

/// Sub-queries for a category; unmapped names are searched literally
pub fn expand(category: &str) -> Vec<String> {
    CATEGORY_QUERIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, phrases)| phrases.iter().map(|p| p.to_string()).collect())
        .unwrap_or_else(|| vec![category.to_string()])
}
