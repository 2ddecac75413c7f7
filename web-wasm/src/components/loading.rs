//! 処理中表示コンポーネント

use leptos::prelude::*;

#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="card loading">
            <div class="spinner" />
            <p>"OMRシートを採点中..."</p>
            <p class="text-muted">"しばらくお待ちください"</p>
        </div>
    }
}
