//! アップロードエリアコンポーネント

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{DragEvent, File, FileList};

use omr_scan_common::{format_file_size, UploadSession};

#[component]
pub fn UploadArea<FS, FR, FP>(
    session: ReadSignal<UploadSession>,
    on_file_select: FS,
    on_remove_file: FR,
    on_process: FP,
) -> impl IntoView
where
    FS: Fn(File) + 'static + Copy + Send + Sync,
    FR: Fn() + 'static + Copy + Send + Sync,
    FP: Fn() + 'static + Copy + Send + Sync,
{
    let (is_dragover, set_is_dragover) = signal(false);

    let handle_files = move |files: FileList| {
        // 複数ドロップされても先頭の1枚だけ受け付ける
        if let Some(file) = files.get(0) {
            on_file_select(file);
        }
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);

        if let Some(dt) = ev.data_transfer() {
            if let Some(files) = dt.files() {
                handle_files(files);
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_click = move |_| {
        // ファイル選択ダイアログを開く
        let document = web_sys::window().unwrap().document().unwrap();
        let input: web_sys::HtmlInputElement = document
            .create_element("input")
            .unwrap()
            .dyn_into()
            .unwrap();
        input.set_type("file");
        input.set_accept("image/*");

        let input_in_closure = input.clone();
        let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
            if let Some(files) = input_in_closure.files() {
                handle_files(files);
            }
        }) as Box<dyn FnMut(_)>);

        input.set_onchange(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
        input.click();
    };

    view! {
        <div class="card">
            <Show
                when=move || session.get().file.is_some()
                fallback=move || view! {
                    <div
                        class=move || {
                            if is_dragover.get() {
                                "upload-area dragover"
                            } else {
                                "upload-area"
                            }
                        }
                        on:drop=on_drop
                        on:dragover=on_dragover
                        on:dragleave=on_dragleave
                        on:click=on_click
                    >
                        <div class="upload-icon">"📄"</div>
                        <p>"OMRシート画像をドラッグ&ドロップ または クリックして選択"</p>
                        <p class="text-muted">"対応形式: JPEG, PNG, GIF, BMP, WebP"</p>
                    </div>
                }
            >
                <div class="file-info">
                    <span class="file-icon">"🖼️"</span>
                    <div class="file-info-text">
                        <div class="file-name">
                            {move || session.get().file.map(|m| m.name).unwrap_or_default()}
                        </div>
                        <div class="file-size text-muted">
                            {move || {
                                session
                                    .get()
                                    .file
                                    .map(|m| format_file_size(m.size))
                                    .unwrap_or_default()
                            }}
                        </div>
                    </div>
                    <button
                        class="btn btn-danger"
                        disabled=move || session.get().is_processing()
                        on:click=move |_| on_remove_file()
                    >
                        "✕"
                    </button>
                </div>

                <div class="process-row">
                    <button
                        class="btn btn-success"
                        disabled=move || !session.get().can_process()
                        on:click=move |_| on_process()
                    >
                        {move || {
                            if session.get().is_processing() {
                                "採点中..."
                            } else {
                                "採点開始"
                            }
                        }}
                    </button>
                </div>
            </Show>
        </div>
    }
}
