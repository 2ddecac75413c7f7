//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header(server_up: ReadSignal<bool>) -> impl IntoView {
    view! {
        <header class="header">
            <h1>"OMRスキャナー"</h1>
            <p class="subtitle">"マークシート画像をアップロードしてその場で採点"</p>
            <Show when=move || !server_up.get()>
                <p class="server-warning">
                    "⚠ バックエンドに接続できません（127.0.0.1:8000 で起動してください）"
                </p>
            </Show>
        </header>
    }
}
