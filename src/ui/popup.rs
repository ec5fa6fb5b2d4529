/// Settings popup: a global switch plus one switch per configured site

use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::registry::SITE_CONFIGS;
use crate::settings::SettingsStore;
use crate::storage::StoredSettings;
use crate::ui::components::Toggle;
use crate::web::ChromeSyncStorage;

#[derive(Clone, PartialEq)]
enum PopupState {
    Loading,
    Ready(StoredSettings),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| PopupState::Loading);

    // Load settings on mount
    {
        let state = state.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let settings = SettingsStore::new(ChromeSyncStorage).load().await;
                state.set(PopupState::Ready(settings));
            });
            || ()
        });
    }

    let on_global_toggle = {
        let state = state.clone();

        Callback::from(move |enabled: bool| {
            if let PopupState::Ready(settings) = &*state {
                let mut settings = settings.clone();
                settings.enabled = enabled;
                state.set(PopupState::Ready(settings));
            }

            spawn_local(async move {
                SettingsStore::new(ChromeSyncStorage)
                    .set_global_enabled(enabled)
                    .await;
            });
        })
    };

    let on_site_toggle = {
        let state = state.clone();
        move |site_id: &'static str| {
            let state = state.clone();
            Callback::from(move |enabled: bool| {
                if let PopupState::Ready(settings) = &*state {
                    let mut settings = settings.clone();
                    settings.site_enabled.set(site_id, enabled);
                    state.set(PopupState::Ready(settings));
                }

                spawn_local(async move {
                    SettingsStore::new(ChromeSyncStorage)
                        .set_site_enabled(site_id, enabled)
                        .await;
                });
            })
        }
    };

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"MiddleClick Everywhere"}</h1>

            {match &*state {
                PopupState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                    </div>
                },
                PopupState::Ready(settings) => html! {
                    <div class="flex-column-gap">
                        <Toggle
                            id="globalToggle"
                            label="Enabled"
                            checked={settings.enabled}
                            onchange={on_global_toggle.clone()}
                        />
                        {for SITE_CONFIGS.iter().map(|site| html! {
                            <Toggle
                                id={format!("{}Toggle", site.id)}
                                label={site.label}
                                checked={settings.is_site_enabled(site.id)}
                                onchange={on_site_toggle(site.id)}
                            />
                        })}
                        <Alert r#type={AlertType::Info} title={"Reload open pages for changes to take effect."} inline={true}>
                        </Alert>
                    </div>
                },
            }}

            <p class="footer-popup">
                {"MiddleClick Everywhere v0.1.0"}
            </p>
        </div>
    }
}
