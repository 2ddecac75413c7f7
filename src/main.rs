use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use omr_scan_rust::{cli, client, config, display, error};

use cli::{Cli, Commands};
use client::OmrClient;
use config::Config;
use error::Result;

#[tokio::main]
async fn main() {
    // 失敗はDebug表記ではなく表示用メッセージのまま返す
    if let Err(err) = run().await {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load()?;
    let server = cli.server.clone().unwrap_or_else(|| config.server_url());

    match cli.command {
        Commands::Process {
            image,
            json,
            save_outputs,
        } => {
            let client = OmrClient::new(server, config.timeout())?;

            if !json {
                println!("📝 omr-scan - OMRシート採点\n");
                println!("[1/2] アップロード中: {}", image.display());
            }

            // リクエスト中だけスピナーを回す（JSONモードでは出さない）
            let spinner = (!json).then(|| {
                let pb = ProgressBar::new_spinner();
                pb.set_style(ProgressStyle::default_spinner());
                pb.set_message("採点処理を待機中...");
                pb.enable_steady_tick(std::time::Duration::from_millis(120));
                pb
            });

            let outcome = client.process_file(&image).await;
            if let Some(pb) = &spinner {
                pb.finish_and_clear();
            }
            let result = outcome?;

            if json {
                display::print_result_json(&result)?;
            } else {
                println!("✔ 採点完了\n");
                display::print_result(&result, cli.verbose);
            }

            if let Some(dir) = save_outputs {
                if !json {
                    println!("\n[2/2] 処理済み画像を保存中...");
                }
                let paths = [
                    result.paths.rectified.as_deref(),
                    result.paths.overlay.as_deref(),
                ];
                for path in paths.into_iter().flatten() {
                    match client.fetch_output(path, &dir).await {
                        Ok(dest) => {
                            if !json {
                                println!("✔ 保存: {}", dest.display());
                            }
                        }
                        Err(err) => eprintln!("⚠ 取得失敗 ({path}): {err}"),
                    }
                }
            }

            if !json {
                println!("\n✅ 完了");
            }
        }

        Commands::Health => {
            let client = OmrClient::new(server, config.timeout())?;
            println!("🔎 {} を確認中...", client.base_url());

            if client.health_check().await {
                println!("✔ バックエンドは稼働中です");
            } else {
                println!("✖ バックエンドに接続できません（/docs が200を返しません）");
                std::process::exit(1);
            }
        }

        Commands::Config {
            set_server,
            set_timeout,
        } => {
            let mut changed = false;
            if let Some(url) = set_server {
                config.server_url = url;
                changed = true;
            }
            if let Some(secs) = set_timeout {
                config.timeout_seconds = secs;
                changed = true;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存: {}", Config::config_path()?.display());
            }
            println!("server_url: {}", config.server_url);
            println!("timeout_seconds: {}", config.timeout_seconds);
        }
    }

    Ok(())
}
