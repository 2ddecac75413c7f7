//! エラー表示コンポーネント（常に1件だけ表示する）

use leptos::prelude::*;

#[component]
pub fn ErrorMessage(message: Signal<String>) -> impl IntoView {
    view! {
        <div class="error">
            <span class="error-icon">"⚠"</span>
            <span>{move || message.get()}</span>
        </div>
    }
}
