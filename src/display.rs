//! 採点結果の端末表示

use omr_scan_common::{
    answer_label, sorted_question_ids, subject_label, ScanResult, SUBJECT_FULL_SCORE,
};

/// 採点結果を整形して表示する
pub fn print_result(result: &ScanResult, verbose: bool) {
    println!("🏆 合計点: {}", result.total_score);

    if !result.per_subject_scores.is_empty() {
        println!("\n📚 科目別スコア");
        for (subject, score) in &result.per_subject_scores {
            println!(
                "  {}: {}/{}",
                subject_label(subject),
                score,
                SUBJECT_FULL_SCORE
            );
        }
    }

    if !result.answers.is_empty() {
        println!("\n✏️ 検出された解答");
        for id in sorted_question_ids(result.answers.keys().map(|k| k.as_str())) {
            let answer = result.answers.get(id).map(String::as_str).unwrap_or("");
            match result.confidences.get(id).filter(|_| verbose) {
                Some(confidence) => {
                    println!("  {}: {} (確信度 {:.2})", id, answer_label(answer), confidence)
                }
                None => println!("  {}: {}", id, answer_label(answer)),
            }
        }
    }

    if verbose && !result.sheet_id.is_empty() {
        println!("\nシートID: {}  テンプレート: {}", result.sheet_id, result.version);
    }
}

/// 採点結果をJSONで出力する（デスクトップアプリが読む）
pub fn print_result_json(result: &ScanResult) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
