use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use axum::extract::FromRef;
        use leptos::prelude::LeptosOptions;
        use std::sync::Arc;

        use crate::config::AppConfig;
        use crate::pipeline::PipelineRunner;

        #[derive(FromRef, Clone)]
        pub struct AppState {
            pub leptos_options: LeptosOptions,
            pub pipeline: Arc<PipelineRunner>,
        }

        impl AppState {
            pub fn new(leptos_options: LeptosOptions, config: &AppConfig) -> Self {
                Self {
                    leptos_options,
                    pipeline: Arc::new(PipelineRunner::from_config(config)),
                }
            }
        }
    }
}
