//! 表示用フォーマット
//!
//! ファイルサイズ・科目名・設問の並び順はどのUIでも同じ見た目にする

/// 科目別スコアの満点（バックエンドは科目ごとに20点満点へ正規化する）
pub const SUBJECT_FULL_SCORE: i64 = 20;

/// 未回答の表示テキスト
pub const UNANSWERED_LABEL: &str = "未回答";

/// バイト数を "2 KB" / "1.5 MB" 形式にする
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    // 小数2桁まで、末尾の0は省く
    let mut text = format!("{:.2}", value);
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }

    format!("{} {}", text, UNITS[unit])
}

/// 科目名の表示ラベル（先頭だけ大文字に）
pub fn subject_label(subject: &str) -> String {
    let mut chars = subject.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// 解答の表示テキスト（空文字は未回答）
pub fn answer_label(answer: &str) -> &str {
    if answer.is_empty() {
        UNANSWERED_LABEL
    } else {
        answer
    }
}

/// 設問IDを番号順に並べる
///
/// 辞書順では "Q10" が "Q2" より前に来てしまうため、
/// IDに含まれる数値で比較する
pub fn sorted_question_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut ids: Vec<&str> = ids.collect();
    ids.sort_by(|a, b| {
        question_number(a)
            .cmp(&question_number(b))
            .then_with(|| a.cmp(b))
    });
    ids
}

fn question_number(id: &str) -> Option<u64> {
    let digits: String = id.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size_zero() {
        assert_eq!(format_file_size(0), "0 Bytes");
    }

    #[test]
    fn test_format_file_size_bytes() {
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1023), "1023 Bytes");
    }

    #[test]
    fn test_format_file_size_round_units() {
        assert_eq!(format_file_size(2048), "2 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_format_file_size_fractional() {
        assert_eq!(format_file_size(1536), "1.5 KB");
        // 2.00 → "2"、2.50 → "2.5"
        assert_eq!(format_file_size(1024 + 256), "1.25 KB");
    }

    #[test]
    fn test_subject_label() {
        assert_eq!(subject_label("math"), "Math");
        assert_eq!(subject_label("physics"), "Physics");
        assert_eq!(subject_label("数学"), "数学");
        assert_eq!(subject_label(""), "");
    }

    #[test]
    fn test_answer_label() {
        assert_eq!(answer_label("A"), "A");
        assert_eq!(answer_label(""), UNANSWERED_LABEL);
    }

    #[test]
    fn test_sorted_question_ids_numeric_order() {
        let ids = ["Q10", "Q2", "Q1", "Q21"];
        assert_eq!(
            sorted_question_ids(ids.into_iter()),
            vec!["Q1", "Q2", "Q10", "Q21"]
        );
    }

    #[test]
    fn test_sorted_question_ids_without_number() {
        // 数値のないIDは先頭側に辞書順で並ぶ
        let ids = ["Q2", "bonus", "Q1"];
        assert_eq!(
            sorted_question_ids(ids.into_iter()),
            vec!["bonus", "Q1", "Q2"]
        );
    }
}
