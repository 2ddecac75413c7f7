//! 出力画像パスの正規化
//!
//! バックエンドは rectified/overlay のパスをサーバ側OSの区切りで返す
//! （Windowsなら "outputs\\x_rectified.png"）。クライアントが使って
//! 良いのは末尾のファイル名だけで、`/outputs/` ルートに結合して取得する

/// パス文字列から末尾のファイル名を取り出す
///
/// `\` と `/` の両方を区切りとして扱う（サーバOS不問）
pub fn output_filename(path: &str) -> Option<&str> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path).trim();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// 出力画像の取得URLを組み立てる
///
/// パスからファイル名が取れない場合は None
pub fn output_url(base_url: &str, path: &str) -> Option<String> {
    let name = output_filename(path)?;
    Some(format!("{}/outputs/{}", base_url.trim_end_matches('/'), name))
}
