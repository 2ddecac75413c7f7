//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::File;

use crate::api::omr;
use crate::components::{
    error_message::ErrorMessage, header::Header, loading::Loading, results::Results,
    upload_area::UploadArea,
};
use omr_scan_common::{FileMeta, UploadEvent, UploadSession};

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    // 遷移はcommonの状態機械に委譲し、ここでは適用と表示だけを行う
    let (session, set_session) = signal(UploadSession::new());
    // 画像本体はブラウザのFileハンドルが所有する（WASM側へコピーしない）
    let file_handle = StoredValue::new_local(None::<File>);
    let (server_up, set_server_up) = signal(true);

    // 起動時にヘルスチェック
    Effect::new(move |_| {
        spawn_local(async move {
            set_server_up.set(omr::check_server_health().await);
        });
    });

    let on_file_select = move |file: File| {
        let meta = FileMeta::new(file.name(), file.size() as u64, file.type_());
        let accepted = meta.is_image();
        set_session.update(|s| *s = s.clone().apply(UploadEvent::FileChosen(meta)));
        if accepted {
            file_handle.set_value(Some(file));
        }
    };

    let on_remove_file = move || {
        set_session.update(|s| *s = s.clone().apply(UploadEvent::FileRemoved));
        if !session.get_untracked().is_processing() {
            file_handle.set_value(None);
        }
    };

    let on_process = move || {
        let before = session.get_untracked();
        let next = before.clone().apply(UploadEvent::ProcessRequested);
        let started = next.is_processing() && !before.is_processing();
        set_session.set(next);
        if !started {
            return;
        }
        let Some(file) = file_handle.get_value() else {
            return;
        };

        // 解決イベントだけが状態機械へ戻る再入口になる
        spawn_local(async move {
            let outcome = omr::process_omr_image(&file).await;
            set_session.update(|s| {
                *s = s.clone().apply(match outcome {
                    Ok(result) => UploadEvent::ProcessSucceeded(result),
                    Err(message) => UploadEvent::ProcessFailed(message),
                });
            });
        });
    };

    view! {
        <div class="container">
            <Header server_up=server_up />

            <main class="main-content">
                <UploadArea
                    session=session
                    on_file_select=on_file_select
                    on_remove_file=on_remove_file
                    on_process=on_process
                />

                <Show when=move || session.get().is_processing()>
                    <Loading />
                </Show>

                <Show when=move || session.get().error_message().is_some()>
                    <ErrorMessage message=Signal::derive(move || {
                        session
                            .get()
                            .error_message()
                            .map(str::to_string)
                            .unwrap_or_default()
                    }) />
                </Show>

                <Show when=move || session.get().result().is_some()>
                    <Results result=Signal::derive(move || {
                        session.get().result().cloned().unwrap_or_default()
                    }) />
                </Show>
            </main>
        </div>
    }
}
