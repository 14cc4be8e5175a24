use leptos::prelude::*;
use preference::{Preference, PreferencePanel};

use super::use_syntax;

/// Three-way ES5 / ES6 / ESNext switch.
///
/// The highlighted option changes immediately on click; code examples follow
/// through the broadcaster. Choices made elsewhere (another selector on the
/// page, another browser tab) are reflected too.
#[component]
pub fn SyntaxSelector(
    /// Caption shown before the options
    #[prop(optional, into)]
    label: Option<String>,
) -> impl IntoView {
    let ctx = use_syntax();
    let panel = StoredValue::new(PreferencePanel::new(
        ctx.store.clone(),
        ctx.broadcaster.clone(),
    ));
    let selected = RwSignal::new(panel.with_value(|p| p.selected()));

    // The panel tracks the value itself; this makes it reactive.
    let subscription = ctx.broadcaster.subscribe(move |value| selected.set(value));
    on_cleanup(move || subscription.unsubscribe());

    let select = move |value: Preference| {
        selected.set(value);
        panel.with_value(|p| p.select_variant(value));
    };

    view! {
        <div class="syntax-selector" role="radiogroup">
            <span class="syntax-selector__label">
                {label.unwrap_or_else(|| "Syntax".to_string())}
            </span>
            {panel.with_value(|p| p.options()).into_iter().map(|option| {
                let is_active = move || selected.get() == option;
                view! {
                    <button
                        type="button"
                        role="radio"
                        aria-checked=move || is_active().to_string()
                        class=move || {
                            if is_active() {
                                "syntax-selector__item syntax-selector__item--active"
                            } else {
                                "syntax-selector__item"
                            }
                        }
                        on:click=move |_| select(option)
                    >
                        {option.display_name()}
                    </button>
                }
            }).collect_view()}
        </div>
    }
}
