//! 採点結果コンポーネント
//!
//! 合計点・科目別スコア・検出解答・処理済み画像（補正/オーバーレイ）を表示する

use leptos::prelude::*;

use crate::api::omr;
use omr_scan_common::{
    answer_label, sorted_question_ids, subject_label, ScanResult, SUBJECT_FULL_SCORE,
};

#[component]
pub fn Results(result: Signal<ScanResult>) -> impl IntoView {
    view! {
        <div class="card results">
            <h3>"🏆 採点結果"</h3>

            <div class="score-summary">
                <span class="score-label">"合計点"</span>
                <span class="score-value">{move || result.get().total_score}</span>
            </div>

            <SubjectScores result=result />
            <Answers result=result />
            <OutputImages result=result />
        </div>
    }
}

#[component]
fn SubjectScores(result: Signal<ScanResult>) -> impl IntoView {
    view! {
        <Show when=move || !result.get().per_subject_scores.is_empty()>
            <div class="subject-scores">
                <h4>"📚 科目別スコア"</h4>
                <div class="subject-grid">
                    <For
                        each=move || {
                            result.get().per_subject_scores.into_iter().collect::<Vec<_>>()
                        }
                        key=|(subject, _)| subject.clone()
                        children=move |(subject, score)| {
                            view! {
                                <div class="subject-score">
                                    <div class="subject-name">{subject_label(&subject)}</div>
                                    <div class="subject-value">
                                        {format!("{}/{}", score, SUBJECT_FULL_SCORE)}
                                    </div>
                                </div>
                            }
                        }
                    />
                </div>
            </div>
        </Show>
    }
}

#[component]
fn Answers(result: Signal<ScanResult>) -> impl IntoView {
    // "Q10" が "Q2" より前に来ないよう番号順に並べ替える
    let entries = move || {
        let r = result.get();
        sorted_question_ids(r.answers.keys().map(|k| k.as_str()))
            .into_iter()
            .map(|id| (id.to_string(), r.answers.get(id).cloned().unwrap_or_default()))
            .collect::<Vec<_>>()
    };

    view! {
        <Show when=move || !result.get().answers.is_empty()>
            <div class="answers-section">
                <h4>"✏️ 検出された解答"</h4>
                <div class="answers-grid">
                    <For
                        each=entries
                        key=|(id, answer)| format!("{id}:{answer}")
                        children=move |(id, answer)| {
                            let filled = !answer.is_empty();
                            view! {
                                <div class=if filled {
                                    "answer-item filled"
                                } else {
                                    "answer-item"
                                }>
                                    <div class="answer-question">{id}</div>
                                    <div class="answer-value">
                                        {answer_label(&answer).to_string()}
                                    </div>
                                </div>
                            }
                        }
                    />
                </div>
            </div>
        </Show>
    }
}

#[component]
fn OutputImages(result: Signal<ScanResult>) -> impl IntoView {
    let rectified_url =
        move || result.get().paths.rectified.as_deref().and_then(omr::output_image_url);
    let overlay_url =
        move || result.get().paths.overlay.as_deref().and_then(omr::output_image_url);

    view! {
        <Show when=move || rectified_url().is_some() || overlay_url().is_some()>
            <div class="images-section">
                <h4>"🖼️ 処理済み画像"</h4>
                <div class="image-gallery">
                    {move || {
                        rectified_url()
                            .map(|url| {
                                view! {
                                    <div class="image-item">
                                        <h5>"補正後画像"</h5>
                                        <img src=url alt="補正後のOMRシート" />
                                    </div>
                                }
                            })
                    }}
                    {move || {
                        overlay_url()
                            .map(|url| {
                                view! {
                                    <div class="image-item">
                                        <h5>"検出オーバーレイ"</h5>
                                        <img src=url alt="マーク検出結果のオーバーレイ" />
                                    </div>
                                }
                            })
                    }}
                </div>
            </div>
        </Show>
    }
}
