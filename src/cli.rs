use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "omr-scan")]
#[command(about = "OMRシート採点クライアント（アップロード・結果表示）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細表示（シートID・確信度も出す）
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// バックエンドURL（設定ファイルより優先）
    #[arg(long, global = true)]
    pub server: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// OMRシート画像をアップロードして採点する
    Process {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 結果をJSONで出力（表示用の整形なし）
        #[arg(long)]
        json: bool,

        /// 処理済み画像（補正・検出オーバーレイ）の保存先ディレクトリ
        #[arg(short, long)]
        save_outputs: Option<PathBuf>,
    },

    /// バックエンドの稼働状況を確認する
    Health,

    /// 設定の表示・変更
    Config {
        /// バックエンドURLを設定
        #[arg(long)]
        set_server: Option<String>,

        /// リクエストタイムアウト（秒）を設定
        #[arg(long)]
        set_timeout: Option<u64>,
    },
}
