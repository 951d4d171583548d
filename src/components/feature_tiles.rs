use leptos::prelude::*;

const FEATURES: [(&str, &str, &str); 4] = [
    ("📝", "Script Generation", "AI generates engaging video scripts"),
    ("✨", "AI Enhancement", "Scripts are refined and optimized"),
    ("🎥", "Video Creation", "Automatic video generation with voiceover"),
    ("📤", "Auto Upload", "Direct posting to YouTube"),
];

#[component]
pub fn FeatureTiles() -> impl IntoView {
    view! {
        <div class="features">
            {FEATURES
                .iter()
                .map(|(icon, title, blurb)| {
                    view! {
                        <div class="feature">
                            <span class="feature-icon">{*icon}</span>
                            <h4>{*title}</h4>
                            <p>{*blurb}</p>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}
