use chrono::Local;
use leptos::{prelude::*, task::spawn_local};
use log::{error, info};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{ReadableStreamDefaultReader, Request, RequestInit, Response};

use crate::components::feature_tiles::FeatureTiles;
use crate::components::toast::Toast;
use crate::session::{Flow, GenerationSession, SubmitError, REQUEST_FAILED_MESSAGE};
use crate::sse_codec::FrameDecoder;
use crate::types::{PipelineRequest, StatusUpdate};

pub const GENERATE_ENDPOINT: &str = "/api/generate-video";

#[component]
pub fn VideoAgent() -> impl IntoView {
    let (topic, set_topic) = signal(String::new());
    let session = RwSignal::new(GenerationSession::default());

    let toast_visible = RwSignal::new(false);
    let (toast_message, set_toast_message) = signal(String::new());

    let show_toast = move |msg: String| {
        set_toast_message.set(msg);
        toast_visible.set(true);
    };

    let is_loading = move || session.with(|s| s.is_loading());

    let submit = move || {
        let topic_value = topic.get_untracked();

        match session.try_update(|s| s.begin(&topic_value)) {
            Some(Ok(())) => {}
            Some(Err(SubmitError::EmptyTopic)) => {
                show_toast(SubmitError::EmptyTopic.to_string());
                return;
            }
            Some(Err(SubmitError::AlreadyRunning)) | None => return,
        }

        spawn_local(async move {
            info!("Requesting video for topic: {topic_value}");
            if let Err(e) = stream_generation(topic_value, session).await {
                error!("Video generation stream failed: {e}");
                session.update(|s| s.fail(&e, Local::now()));
            }
        });
    };

    view! {
        <div class="container">
            <h1 class="title">"🎬 AI Video Agent"</h1>
            <p class="subtitle">
                "Generate scripts, enhance them with AI, create videos, and auto-post to YouTube"
            </p>

            <div class="input-group">
                <input
                    type="text"
                    class="input"
                    placeholder="Enter a video topic (e.g., '5 Amazing Facts About Space')"
                    prop:value=topic
                    disabled=is_loading
                    on:input=move |ev| set_topic.set(event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" && !is_loading() {
                            submit();
                        }
                    }
                />
                <button class="button" disabled=is_loading on:click=move |_| submit()>
                    {move || if is_loading() { "⏳ Processing..." } else { "🚀 Generate & Post Video" }}
                </button>
            </div>

            <Show when=move || session.with(|s| !s.status().is_empty())>
                <div class="status-card">
                    <h3>"Current Status"</h3>
                    <p>{move || session.with(|s| s.status().to_string())}</p>
                </div>
            </Show>

            <Show when=move || session.with(|s| !s.log().is_empty())>
                <div class="logs-card">
                    <h3>"📋 Process Logs"</h3>
                    <div class="logs">
                        {move || {
                            session
                                .with(|s| s.log().entries().to_vec())
                                .into_iter()
                                .map(|entry| view! { <div class="log-entry">{entry}</div> })
                                .collect_view()
                        }}
                    </div>
                </div>
            </Show>

            {move || {
                session
                    .with(|s| s.video_url().map(str::to_string))
                    .map(|url| {
                        view! {
                            <div class="success-card">
                                <h3>"🎉 Success!"</h3>
                                <p>"Your video has been posted to YouTube"</p>
                                <a href=url target="_blank" rel="noopener noreferrer" class="link">
                                    "View on YouTube →"
                                </a>
                            </div>
                        }
                    })
            }}

            <FeatureTiles />

            <Toast message=toast_message visible=toast_visible />
        </div>
    }
}

fn js_error(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn apply(session: RwSignal<GenerationSession>, update: &StatusUpdate) -> Flow {
    session
        .try_update(|s| s.apply(update, Local::now()))
        .unwrap_or(Flow::Stop)
}

/// Posts the topic and feeds the response body through the frame decoder
/// chunk by chunk until the stream ends or an error frame arrives.
async fn stream_generation(
    topic: String,
    session: RwSignal<GenerationSession>,
) -> Result<(), String> {
    let window = web_sys::window().ok_or("no window available")?;
    let body = serde_json::to_string(&PipelineRequest::new(topic)).map_err(|e| e.to_string())?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(&body));
    let request = Request::new_with_str_and_init(GENERATE_ENDPOINT, &init).map_err(js_error)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(js_error)?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;

    if !response.ok() {
        error!("generate-video answered HTTP {}", response.status());
        return Err(REQUEST_FAILED_MESSAGE.to_string());
    }

    let reader: ReadableStreamDefaultReader = response
        .body()
        .ok_or("response has no body")?
        .get_reader()
        .unchecked_into();
    let mut decoder = FrameDecoder::new();

    loop {
        let chunk = JsFuture::from(reader.read()).await.map_err(js_error)?;
        let done = js_sys::Reflect::get(&chunk, &JsValue::from_str("done"))
            .map_err(js_error)?
            .as_bool()
            .unwrap_or(true);
        if done {
            break;
        }

        let value = js_sys::Reflect::get(&chunk, &JsValue::from_str("value")).map_err(js_error)?;
        let bytes = js_sys::Uint8Array::new(&value).to_vec();

        for update in decoder.push(&bytes) {
            if apply(session, &update) == Flow::Stop {
                let _ = reader.cancel();
                return Ok(());
            }
        }
    }

    if !decoder.pending().is_empty() {
        info!(
            "Stream ended with {} undelimited bytes, flushing",
            decoder.pending().len()
        );
    }
    if let Some(update) = decoder.finish() {
        apply(session, &update);
    }
    session.update(|s| s.finish(Local::now()));
    Ok(())
}
