use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use axum::{middleware, Router};
        use dotenv::dotenv;
        use env_logger::Env;
        use leptos::prelude::*;
        use leptos_axum::{generate_route_list, LeptosRoutes};
        use std::net::SocketAddr;
        use vidagent::app::*;
        use vidagent::config::AppConfig;
        use vidagent::handlers::generate_routes;
        use vidagent::middleware::trace_requests;
        use vidagent::state::AppState;

        #[tokio::main]
        async fn main() -> anyhow::Result<()> {
            dotenv().ok();
            env_logger::init_from_env(Env::default().default_filter_or("info"));

            let conf = get_configuration(None)?;
            let addr = conf.leptos_options.site_addr;
            let leptos_options = conf.leptos_options;

            let config = AppConfig::from_env();
            log::info!(
                "Pipeline config: chat={}, youtube={}, pacing={}, collaborator timeout={:?}",
                if config.chat.is_some() { "configured" } else { "local" },
                if config.youtube.is_some() { "configured" } else { "placeholder" },
                config.stage_pacing,
                config.collaborator_timeout,
            );

            // Generate the list of routes in your Leptos App
            let routes = generate_route_list(App);

            let app_state = AppState::new(leptos_options.clone(), &config);

            let app = Router::new()
                .merge(generate_routes(app_state.pipeline.clone()))
                .leptos_routes(&app_state, routes, {
                    let leptos_options = leptos_options.clone();
                    move || shell(leptos_options.clone())
                })
                .fallback(leptos_axum::file_and_error_handler::<AppState, _>(shell))
                .layer(middleware::from_fn(trace_requests))
                .with_state(app_state);

            log::info!("listening on http://{}", &addr);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
            Ok(())
        }
    } else {
        pub fn main() {
            // no client-side main function
            // see lib.rs for hydration function instead
        }
    }
}
