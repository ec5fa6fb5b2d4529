/// Reusable UI components

use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ToggleProps {
    pub id: AttrValue,
    pub label: AttrValue,
    pub checked: bool,
    pub onchange: Callback<bool>,
}

/// Labelled checkbox reporting its new state
#[function_component(Toggle)]
pub fn toggle(props: &ToggleProps) -> Html {
    let onchange = {
        let onchange = props.onchange.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                onchange.emit(input.checked());
            }
        })
    };

    html! {
        <label class="toggle-row">
            <input
                type="checkbox"
                id={props.id.clone()}
                checked={props.checked}
                {onchange}
            />
            <span class="toggle-label">{props.label.clone()}</span>
        </label>
    }
}
