// src/main.rs
use gloo_net::http::Request;
use svg_viewer::components::svg_viewer::SvgViewer;
use svg_viewer::manifest::{ViewerManifest, MANIFEST_URL};
use svg_viewer::utils::resource_url;
use yew::prelude::*;

pub enum AppMsg {
    ManifestLoaded(ViewerManifest),
    ManifestLoadFailed(String),
}

pub struct App {
    manifest: Option<ViewerManifest>,
    error: Option<String>,
    loading: bool,
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_future(async {
            match load_manifest().await {
                Ok(manifest) => AppMsg::ManifestLoaded(manifest),
                Err(e) => AppMsg::ManifestLoadFailed(e),
            }
        });

        Self {
            manifest: None,
            error: None,
            loading: true,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::ManifestLoaded(manifest) => {
                log::info!(
                    "Loaded manifest with {} viewer(s)",
                    manifest.get_viewer_count()
                );
                self.manifest = Some(manifest);
                self.loading = false;
                true
            }
            AppMsg::ManifestLoadFailed(error) => {
                log::error!("Failed to load manifest: {}", error);
                self.error = Some(error);
                self.loading = false;
                true
            }
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        let title = self
            .manifest
            .as_ref()
            .map(|m| m.title.clone())
            .unwrap_or_else(|| "SVG Viewer".to_string());

        let body = if self.loading {
            html! { <div class="loading">{"Loading viewers..."}</div> }
        } else if let Some(error) = &self.error {
            html! { <div class="error">{format!("Could not load {}: {}", MANIFEST_URL, error)}</div> }
        } else {
            match &self.manifest {
                Some(manifest) if !manifest.viewers.is_empty() => html! {
                    <>
                        if !manifest.description.is_empty() {
                            <p class="subtitle">{manifest.description.clone()}</p>
                        }
                        {for manifest.viewers.iter().map(|entry| html! {
                            <section class="viewer-section" key={entry.id().unwrap_or_default().to_string()}>
                                <SvgViewer entry={entry.clone()} />
                            </section>
                        })}
                    </>
                },
                _ => html! { <div class="error">{"The manifest lists no viewers."}</div> },
            }
        };

        html! {
            <div class="app-container">
                <header class="app-header">
                    <h1>{title}</h1>
                </header>
                <main class="app-main">
                    {body}
                </main>
            </div>
        }
    }
}

async fn load_manifest() -> Result<ViewerManifest, String> {
    let url = resource_url(&format!("/{}", MANIFEST_URL));
    let resp = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("{:?}", e))?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    let text = resp.text().await.map_err(|e| format!("{:?}", e))?;
    ViewerManifest::from_json(&text).map_err(|e| e.to_string())
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
